//! Schema-driven binary decoding and record assembly for flow export
//! datagrams.
//!
//! Turns a raw UDP payload plus a declarative field map into typed rows
//! matching an externally declared table schema: split the datagram into a
//! header region and fixed-length record blocks, decode each field's byte
//! range under its value-type tag, merge header fields into every record,
//! and coerce the assembled records into ordered table rows.

pub mod assemble;
pub mod config;
pub mod decode;
pub mod error;
pub mod ingest;
pub mod packet;
pub mod rule;
pub mod table;

pub use ingest::{DecodedDatagram, Engine};
