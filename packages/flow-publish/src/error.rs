//! Publisher error types.

use thiserror::Error;

/// Errors from encoding or publishing a table message.
#[derive(Error, Debug)]
pub enum PublishError {
    /// Table could not be serialized to the wire format
    #[error("failed to encode table message: {0}")]
    Encode(#[from] serde_json::Error),

    /// Producer could not be constructed
    #[error("failed to create producer: {0}")]
    Producer(String),

    /// Broker rejected or dropped the message
    #[error("delivery failed: {0}")]
    Delivery(String),
}
