//! Error types for the delivery tracker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delivery {delivery_id} not found")]
    NotFound { delivery_id: String },

    #[error("Unexpected HTTP status {code} for delivery {delivery_id}")]
    UnexpectedStatus { code: u16, delivery_id: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Report formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Failure reported by a custom `DeliveryProvider` implementation that
    /// does not map onto the HTTP variants above.
    #[error("Delivery provider error: {0}")]
    Provider(String),
}
