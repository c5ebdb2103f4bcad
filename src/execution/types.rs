use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::market::types::TradeParams;

#[derive(Debug, Clone, Serialize)]
pub struct TakeProfit {
    pub limit_price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StopLoss {
    pub stop_price: f64,
}

/// Wire body for `POST /v2/orders`: a market entry bracketed by a
/// take-profit limit and a stop-loss, good till canceled.
#[derive(Debug, Clone, Serialize)]
pub struct BracketOrderRequest {
    pub symbol: String,
    pub qty: u32,
    pub side: String,

    #[serde(rename = "type")]
    pub order_type: String,

    pub time_in_force: String,
    pub order_class: String,

    /// Caller-chosen idempotency handle echoed back by the brokerage.
    pub client_order_id: String,

    pub take_profit: TakeProfit,
    pub stop_loss: StopLoss,
}

impl BracketOrderRequest {
    /// Buy-side bracket at market for the fired pattern's prices.
    pub fn market_buy(symbol: &str, qty: u32, params: &TradeParams) -> Self {
        Self {
            symbol: symbol.to_string(),
            qty,
            side: "buy".into(),
            order_type: "market".into(),
            time_in_force: "gtc".into(),
            order_class: "bracket".into(),
            client_order_id: Uuid::new_v4().to_string(),
            take_profit: TakeProfit {
                limit_price: params.profit_price,
            },
            stop_loss: StopLoss {
                stop_price: params.loss_price,
            },
        }
    }
}

/// Brokerage acknowledgement for a submitted order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderAck {
    pub id: String,
    pub client_order_id: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_buy_serializes_the_bracket_wire_shape() {
        let params = TradeParams {
            distance: 2.5,
            profit_price: 17.0,
            loss_price: 9.5,
        };

        let req = BracketOrderRequest::market_buy("AAPL", 1, &params);
        let v = serde_json::to_value(&req).expect("request should serialize");

        assert_eq!(v["symbol"], "AAPL");
        assert_eq!(v["qty"], 1);
        assert_eq!(v["side"], "buy");
        assert_eq!(v["type"], "market");
        assert_eq!(v["time_in_force"], "gtc");
        assert_eq!(v["order_class"], "bracket");
        assert_eq!(v["take_profit"]["limit_price"], 17.0);
        assert_eq!(v["stop_loss"]["stop_price"], 9.5);
        assert!(!req.client_order_id.is_empty());
    }

    #[test]
    fn client_order_ids_are_unique_per_request() {
        let params = TradeParams {
            distance: 1.0,
            profit_price: 12.0,
            loss_price: 9.0,
        };

        let a = BracketOrderRequest::market_buy("AAPL", 1, &params);
        let b = BracketOrderRequest::market_buy("AAPL", 1, &params);
        assert_ne!(a.client_order_id, b.client_order_id);
    }
}
