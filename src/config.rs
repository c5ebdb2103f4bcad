use std::time::Duration;

use crate::error::AppError;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Brokerage API key id (`APCA_API_KEY_ID`).
    ///
    /// Required. The same key authenticates the market data stream.
    pub api_key_id: String,

    /// Brokerage API secret (`APCA_API_SECRET_KEY`). Required.
    pub api_secret_key: String,

    /// REST endpoint used for order submission.
    pub base_url: String,

    /// Market data WebSocket endpoint.
    pub stream_url: String,

    /// Instrument the strategy trades. One process trades one symbol.
    pub symbol: String,

    /// Fixed order quantity for the single bracket order.
    pub order_qty: u32,

    // =========================
    // Aggregation configuration
    // =========================
    /// How many candles to retain before the oldest is evicted.
    ///
    /// The strategy only ever reads the last four bars (three closed plus
    /// the open one), so retention is a memory bound, not a lookback knob.
    /// Values below four are clamped up to four.
    pub bar_retention: usize,

    /// Capacity of the channel between the stream reader and the engine.
    ///
    /// Acts as backpressure: if tick processing falls behind, the reader
    /// blocks instead of buffering without bound.
    pub feed_queue_capacity: usize,

    // =========================
    // Supervision configuration
    // =========================
    /// Poll cadence for the binary-artifact watch. When the deployed
    /// binary changes on disk the process exits so the supervisor can
    /// restart it.
    pub reload_poll: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            api_key_id: require("APCA_API_KEY_ID")?,
            api_secret_key: require("APCA_API_SECRET_KEY")?,

            base_url: var_or("APCA_API_BASE_URL", "https://paper-api.alpaca.markets"),
            stream_url: var_or("APCA_STREAM_URL", "wss://data.alpaca.markets/stream"),
            symbol: var_or("SYMBOL", "AAPL"),

            order_qty: parsed("ORDER_QTY", 1)?,

            bar_retention: parsed("BAR_RETENTION", 32)?,
            feed_queue_capacity: parsed("FEED_QUEUE_CAPACITY", 1024)?,

            reload_poll: Duration::from_millis(parsed("RELOAD_POLL_MS", 5_000u64)?),
        })
    }
}

fn require(key: &'static str) -> Result<String, AppError> {
    std::env::var(key).map_err(|_| AppError::MissingEnv(key))
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, AppError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::InvalidEnv { key, value: raw }),
        Err(_) => Ok(default),
    }
}
