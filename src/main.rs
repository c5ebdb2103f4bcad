use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use threebar::cli::Cli;
use threebar::config::AppConfig;
use threebar::engine::Engine;
use threebar::execution::broker::AlpacaClient;
use threebar::feed::stream::AlpacaWsClient;
use threebar::feed::{MarketFeed, Subscription};
use threebar::logger::init_tracing;
use threebar::market::types::FeedEvent;
use threebar::reload;

/// Spawns the WebSocket feed worker and returns the engine's event inlet.
fn start_feed(cfg: &AppConfig, firehose: bool) -> mpsc::Receiver<FeedEvent> {
    let (tx, rx) = mpsc::channel(cfg.feed_queue_capacity);

    let client = AlpacaWsClient::new(cfg.stream_url.clone(), cfg.api_key_id.clone());
    let sub = Subscription::new(cfg.symbol.clone(), firehose);

    tokio::spawn(async move {
        if let Err(e) = client.stream(sub, tx).await {
            error!(error = ?e, "market data stream terminated");
        }
    });

    rx
}

/// Spawns the artifact watch; the receiver yields once when the deployed
/// binary changes on disk.
fn start_artifact_watch(poll: Duration) -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(1);

    match std::env::current_exe() {
        Ok(path) => {
            tokio::spawn(reload::watch_artifact(path, poll, tx));
        }
        Err(e) => warn!(error = ?e, "cannot resolve running binary; artifact watch disabled"),
    }

    rx
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let is_production = std::env::var("APP_ENV").unwrap_or_default() == "production";
    init_tracing(is_production, cli.debug);

    let cfg = AppConfig::from_env()?;
    info!(symbol = %cfg.symbol, stream = %cfg.stream_url, "starting threebar");

    let events = start_feed(&cfg, cli.all);
    let mut reload_rx = start_artifact_watch(cfg.reload_poll);

    let gateway = AlpacaClient::new(&cfg)?;
    let engine = Engine::new(cfg.bar_retention, gateway);

    tokio::select! {
        outcome = engine.run(events) => match outcome {
            Some(params) => info!(
                profit_price = params.profit_price,
                loss_price = params.loss_price,
                "bracket order placed; exiting"
            ),
            None => warn!("feed ended without a signal; exiting"),
        },
        Some(()) = reload_rx.recv() => {
            info!("binary replaced on disk; exiting for supervisor restart");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}
