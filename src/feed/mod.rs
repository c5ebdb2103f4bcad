pub mod parser;
pub mod stream;

use async_trait::async_trait;
use tokio::sync::mpsc::Sender;

use crate::market::types::FeedEvent;

/// Channels subscribed on the market data stream.
///
/// Trade, quote, and minute-aggregate events for the symbol all route to
/// the same handler. `firehose` additionally subscribes the per-second
/// aggregate feed for every symbol, which can overwhelm and back up
/// during active times.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub symbol: String,
    pub firehose: bool,
}

impl Subscription {
    pub fn new(symbol: String, firehose: bool) -> Self {
        Self { symbol, firehose }
    }

    /// Comma-separated channel list for the subscribe frame.
    pub fn channels(&self) -> String {
        let mut channels = format!("T.{sym},Q.{sym},AM.{sym}", sym = self.symbol);
        if self.firehose {
            channels.push_str(",A.*");
        }
        channels
    }
}

/// Push-style market data source.
///
/// Implementations decode the wire protocol and forward `FeedEvent`s into
/// the channel one at a time, in arrival order.
#[async_trait]
pub trait MarketFeed: Send + Sync + 'static {
    async fn stream(&self, sub: Subscription, tx: Sender<FeedEvent>) -> anyhow::Result<()>;
}
