//! Wire encoding and topic publishing for decoded flow tables.
//!
//! One message is published per table row: the payload carries the table
//! name, the ordered typed columns, and that single row.

pub mod encode;
pub mod error;
pub mod kafka;

pub use encode::encode_row_messages;
pub use error::PublishError;
pub use kafka::{KafkaPublisher, Publisher, MESSAGE_KEY};
