use std::time::Duration;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::mpsc::Sender;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, instrument, warn};

use super::parser::parse_stream_frame;
use super::{MarketFeed, Subscription};
use crate::market::types::FeedEvent;

/// WebSocket implementation of the market data feed.
pub struct AlpacaWsClient {
    pub ws_url: String,
    key_id: String,
}

impl AlpacaWsClient {
    pub fn new(ws_url: String, key_id: String) -> Self {
        Self { ws_url, key_id }
    }

    /// Authenticate and subscribe on a fresh connection.
    #[instrument(skip(write, key_id, sub), fields(channels = %sub.channels()))]
    async fn open_handshake<E>(
        write: &mut (impl futures::Sink<Message, Error = E> + Unpin),
        key_id: &str,
        sub: &Subscription,
    ) -> anyhow::Result<()>
    where
        E: std::fmt::Debug + Send + Sync + 'static,
    {
        let frames = [
            json!({ "action": "auth", "params": key_id }),
            json!({ "action": "subscribe", "params": sub.channels() }),
        ];

        for frame in frames {
            let text = serde_json::to_string(&frame)?;
            write.send(Message::Text(text.into())).await.map_err(|e| {
                error!(error = ?e, "failed to send handshake frame");
                anyhow::anyhow!("{:?}", e)
            })?;
        }

        Ok(())
    }
}

#[async_trait]
impl MarketFeed for AlpacaWsClient {
    /// Deliver decoded events until the receiver goes away, reconnecting
    /// after transport failures. Undecodable frames are dropped with a
    /// warning; the rest of the stream keeps flowing.
    #[instrument(skip(self, sub, tx), fields(url = %self.ws_url, symbol = %sub.symbol))]
    async fn stream(&self, sub: Subscription, tx: Sender<FeedEvent>) -> anyhow::Result<()> {
        info!("starting market data stream worker");

        loop {
            debug!("connecting to market data WebSocket");
            match connect_async(&self.ws_url).await {
                Ok((ws, _)) => {
                    info!("WebSocket connection established");
                    let (mut write, mut read) = ws.split();

                    if let Err(e) = Self::open_handshake(&mut write, &self.key_id, &sub).await {
                        error!(error = ?e, "auth/subscribe handshake failed; reconnecting");
                    } else {
                        // Drain this socket until it dies.
                        while let Some(msg) = read.next().await {
                            let msg = match msg {
                                Ok(m) => m,
                                Err(e) => {
                                    warn!(error = ?e, "WebSocket stream error encountered");
                                    break;
                                }
                            };

                            if msg.is_ping() || msg.is_pong() {
                                continue;
                            }

                            if !msg.is_text() {
                                debug!(msg_type = ?msg, "ignoring non-text WebSocket message");
                                continue;
                            }

                            let raw = match msg.to_text() {
                                Ok(t) => t,
                                Err(e) => {
                                    error!(error = ?e, "failed to extract text from WS message");
                                    continue;
                                }
                            };

                            match parse_stream_frame(raw) {
                                Ok(events) => {
                                    for event in events {
                                        if tx.send(event).await.is_err() {
                                            info!("event receiver dropped; stream worker shutting down");
                                            return Ok(());
                                        }
                                    }
                                }
                                Err(e) => {
                                    warn!(error = ?e, raw = %raw, "undecodable stream frame dropped")
                                }
                            }
                        }
                    }
                }
                Err(e) => {
                    error!(error = ?e, "WebSocket connection failed");
                }
            }

            let retry_interval = Duration::from_secs(3);
            warn!(interval = ?retry_interval, "disconnected; attempting reconnection");
            tokio::time::sleep(retry_interval).await;
        }
    }
}
