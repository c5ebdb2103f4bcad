use chrono::DateTime;
use serde::Deserialize;

/// One market observation delivered by the stream: timestamp plus bid.
///
/// Ticks are consumed once and not retained; only the latest bid survives
/// inside the aggregator for the stale-close rule.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Tick {
    /// Epoch milliseconds.
    #[serde(rename = "t")]
    pub ts_ms: i64,

    /// Bid price.
    #[serde(rename = "bp")]
    pub bid: f64,
}

impl Tick {
    pub fn new(ts_ms: i64, bid: f64) -> Self {
        Self { ts_ms, bid }
    }

    /// UTC minute bucket this tick falls into, `YYYY-MM-DD HH:MM`.
    ///
    /// `None` when the timestamp is outside the representable range.
    pub fn minute_key(&self) -> Option<String> {
        DateTime::from_timestamp_millis(self.ts_ms)
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
    }
}

/// One-minute OHLC bar.
///
/// `close` stays unset while the bar is open; it is written exactly once,
/// when the first tick of the next minute arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    /// Minute key, identity and ordering in one (`YYYY-MM-DD HH:MM`, UTC).
    pub minute: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: Option<f64>,
}

impl Candle {
    /// A freshly opened bar: all prices start at the opening bid.
    pub fn open_at(minute: String, bid: f64) -> Self {
        Self {
            minute,
            open: bid,
            high: bid,
            low: bid,
            close: None,
        }
    }
}

/// Bracket prices derived from a fired three-bar pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeParams {
    /// `last.close - first.open` across the three closed bars.
    pub distance: f64,

    /// Take-profit limit: `last.close + 2 * distance`.
    pub profit_price: f64,

    /// Stop-loss: the first bar's open.
    pub loss_price: f64,
}

/// Decoded event forwarded from the market data stream to the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Tick(Tick),

    /// Stream housekeeping (auth acks, subscription confirmations).
    Control(String),
}
