use std::collections::VecDeque;

use crate::market::types::{Candle, TradeParams};

/// Three-bar momentum check over the most recent *closed* bars.
///
/// Pure function of the bar snapshot; the engine re-runs it after every
/// tick. The last bar is always open and is never read. Fires when the
/// three closed bars directly behind it have strictly increasing closes
/// (close-over-close, not open-vs-close per bar).
pub fn detect(bars: &VecDeque<Candle>) -> Option<TradeParams> {
    let n = bars.len();
    if n <= 3 {
        return None;
    }

    let last = &bars[n - 2];
    let middle = &bars[n - 3];
    let first = &bars[n - 4];

    // Fail-safe: an unset close anywhere in the lookback means no signal.
    let (last_close, middle_close, first_close) = match (last.close, middle.close, first.close) {
        (Some(l), Some(m), Some(f)) => (l, m, f),
        _ => return None,
    };

    if !(last_close > middle_close && middle_close > first_close) {
        return None;
    }

    let distance = last_close - first.open;
    Some(TradeParams {
        distance,
        profit_price: last_close + distance * 2.0,
        loss_price: first.open,
    })
}
