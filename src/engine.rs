use std::time::Duration;

use tokio::sync::mpsc::Receiver;
use tracing::{debug, error, info, warn};

use crate::execution::broker::OrderGateway;
use crate::execution::trigger::OrderTrigger;
use crate::logger::warn_if_slow;
use crate::market::candles::CandleAggregator;
use crate::market::pattern;
use crate::market::types::{FeedEvent, Tick, TradeParams};

/// Owns all trading state and drives it from the feed channel.
///
/// Single consumer: ticks are folded into candles strictly in arrival
/// order, the pattern is re-checked after every tick, and the one-shot
/// trigger guards submission. Nothing here is shared across tasks, so
/// there are no locks.
pub struct Engine<G> {
    aggregator: CandleAggregator,
    trigger: OrderTrigger,
    gateway: G,
}

impl<G: OrderGateway> Engine<G> {
    pub fn new(bar_retention: usize, gateway: G) -> Self {
        Self {
            aggregator: CandleAggregator::new(bar_retention),
            trigger: OrderTrigger::new(),
            gateway,
        }
    }

    /// Fold one tick in and check for a fresh, unfired signal.
    fn on_tick(&mut self, tick: &Tick) -> Option<TradeParams> {
        if self.aggregator.ingest(tick) {
            debug!(bars = self.aggregator.len(), "opened new candle");
        }

        let params = pattern::detect(self.aggregator.bars())?;
        if !self.trigger.fire() {
            return None;
        }

        Some(params)
    }

    /// Consume feed events until a signal fires or the channel closes.
    ///
    /// Returns the fired trade parameters, or `None` when the feed ended
    /// without one. Submission failures are logged and absorbed; the
    /// in-position flag stays set either way and the loop still ends.
    pub async fn run(mut self, mut rx: Receiver<FeedEvent>) -> Option<TradeParams> {
        info!("tick processing loop started");

        while let Some(event) = rx.recv().await {
            let tick = match event {
                FeedEvent::Tick(t) => t,
                FeedEvent::Control(message) => {
                    info!(%message, "stream control event");
                    continue;
                }
            };

            debug!(ts_ms = tick.ts_ms, bid = tick.bid, "tick received");

            let Some(params) = self.on_tick(&tick) else {
                continue;
            };

            info!(
                distance = params.distance,
                profit_price = params.profit_price,
                loss_price = params.loss_price,
                "three rising closes; submitting bracket order"
            );

            let submit = self.gateway.place_bracket(&params);
            match warn_if_slow("place_bracket", Duration::from_secs(2), submit).await {
                Ok(ack) => {
                    info!(order_id = %ack.id, status = %ack.status, "bracket order accepted")
                }
                Err(e) => error!(error = ?e, "bracket order submission failed"),
            }

            return Some(params);
        }

        warn!("feed channel closed before any signal fired");
        None
    }
}
