use std::collections::{HashSet, VecDeque};

use crate::market::types::{Candle, Tick};

/// Three closed bars plus the open one; the minimum the strategy can run on.
pub const MIN_RETENTION: usize = 4;

/// Folds the tick stream into one-minute OHLC bars.
///
/// Single owner, single writer: the engine feeds ticks strictly in arrival
/// order and nothing else touches the state. Ticks are assumed
/// non-decreasing in timestamp; there is no duplicate or out-of-order
/// handling.
///
/// Close semantics: a bar's close is the bid of the tick immediately
/// *preceding* the minute-boundary tick, not the boundary tick itself, so
/// the close is one observation stale.
pub struct CandleAggregator {
    /// Bars in chronological (first-seen) order; front is evicted once
    /// `retention` is exceeded.
    bars: VecDeque<Candle>,

    /// Minute keys with a bar, pruned in lockstep with `bars`.
    seen_minutes: HashSet<String>,

    /// Bid of the most recently ingested tick.
    last_bid: Option<f64>,

    retention: usize,
}

impl CandleAggregator {
    pub fn new(retention: usize) -> Self {
        Self {
            bars: VecDeque::new(),
            seen_minutes: HashSet::new(),
            last_bid: None,
            retention: retention.max(MIN_RETENTION),
        }
    }

    /// Fold one tick in. Returns whether a new bar was opened.
    ///
    /// Ticks whose timestamp cannot be bucketed are dropped whole.
    pub fn ingest(&mut self, tick: &Tick) -> bool {
        let Some(minute) = tick.minute_key() else {
            return false;
        };

        let mut opened = false;
        if !self.seen_minutes.contains(&minute) {
            self.seen_minutes.insert(minute.clone());

            // Close the outgoing bar with the last pre-boundary bid.
            if let (Some(last), Some(bid)) = (self.bars.back_mut(), self.last_bid) {
                last.close = Some(bid);
            }

            self.bars.push_back(Candle::open_at(minute, tick.bid));
            opened = true;
            self.evict_old();
        }

        // Widen the open bar; a no-op against a bar opened just above.
        if let Some(last) = self.bars.back_mut() {
            if tick.bid > last.high {
                last.high = tick.bid;
            }
            if tick.bid < last.low {
                last.low = tick.bid;
            }
        }

        self.last_bid = Some(tick.bid);
        opened
    }

    fn evict_old(&mut self) {
        while self.bars.len() > self.retention {
            if let Some(evicted) = self.bars.pop_front() {
                self.seen_minutes.remove(&evicted.minute);
            }
        }
    }

    pub fn bars(&self) -> &VecDeque<Candle> {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
