use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use super::errors::BrokerError;
use super::types::{BracketOrderRequest, OrderAck};
use crate::config::AppConfig;
use crate::market::types::TradeParams;

/// Abstraction over order submission.
///
/// Implementations normalize transport and API failures into
/// `BrokerError`; callers treat every failure the same way and never
/// retry.
#[async_trait]
pub trait OrderGateway: Send + Sync + 'static {
    async fn place_bracket(&self, params: &TradeParams) -> Result<OrderAck, BrokerError>;
}

/// REST implementation against the brokerage order endpoint.
#[derive(Clone)]
pub struct AlpacaClient {
    http: Client,
    base_url: String,
    key_id: String,
    secret_key: String,
    symbol: String,
    qty: u32,
}

impl AlpacaClient {
    pub fn new(cfg: &AppConfig) -> Result<Self, BrokerError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http,
            base_url: cfg.base_url.clone(),
            key_id: cfg.api_key_id.clone(),
            secret_key: cfg.api_secret_key.clone(),
            symbol: cfg.symbol.clone(),
            qty: cfg.order_qty,
        })
    }
}

#[async_trait]
impl OrderGateway for AlpacaClient {
    #[instrument(
        skip(self, params),
        fields(
            symbol = %self.symbol,
            profit_price = params.profit_price,
            loss_price = params.loss_price,
        )
    )]
    async fn place_bracket(&self, params: &TradeParams) -> Result<OrderAck, BrokerError> {
        let url = format!("{}/v2/orders", self.base_url);
        let req = BracketOrderRequest::market_buy(&self.symbol, self.qty, params);

        let resp = self
            .http
            .post(&url)
            .header("APCA-API-KEY-ID", &self.key_id)
            .header("APCA-API-SECRET-KEY", &self.secret_key)
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        debug!(%status, body = %body, "order endpoint replied");

        if !status.is_success() {
            return Err(BrokerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let ack: OrderAck = serde_json::from_str(&body)?;
        Ok(ack)
    }
}
