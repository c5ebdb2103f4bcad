use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("order rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("invalid response from brokerage: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}
