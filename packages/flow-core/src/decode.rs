//! Typed interpretation of byte ranges under a value-type tag.

use std::net::Ipv4Addr;

use chrono::{DateTime, FixedOffset};

use crate::error::DecodeError;
use crate::rule::{FieldRule, ValueType};

/// A decoded field value prior to schema coercion.
///
/// Carries the value itself; the declared column type decides during row
/// building whether the value is acceptable.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Int32(i32),
    Int64(i64),
    Str(String),
    Null,
}

impl DecodedValue {
    /// Short name of the runtime variant, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodedValue::Int32(_) => "int32",
            DecodedValue::Int64(_) => "int64",
            DecodedValue::Str(_) => "string",
            DecodedValue::Null => "null",
        }
    }
}

/// How DATE fields are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
pub enum TimestampMode {
    /// `"YYYY-MM-DD HH:MM:SS"` in the hour-offset-shifted time; raw 0
    /// becomes the empty string
    #[default]
    #[serde(rename = "formatted")]
    Formatted,
    /// Epoch milliseconds as a 64-bit integer; raw 0 stays 0
    #[serde(rename = "epochMillis")]
    EpochMillis,
}

/// Decoder settings shared by every field of a deployment.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Hour offset applied when formatting DATE fields
    pub hour_offset: i32,
    /// Rendering mode for DATE fields
    pub timestamp_mode: TimestampMode,
}

fn be_u16(b: &[u8]) -> u16 {
    ((b[0] as u16) << 8) | b[1] as u16
}

fn be_u32(b: &[u8]) -> u32 {
    ((b[0] as u32) << 24) | ((b[1] as u32) << 16) | ((b[2] as u32) << 8) | b[3] as u32
}

/// Decodes one field's byte range out of `buf`.
///
/// The range must lie fully inside the buffer and be at least as wide as the
/// value type requires; otherwise the whole datagram is considered
/// undecodable and the error propagates to the caller. Unrecognized value
/// types decode to [`DecodedValue::Null`] without error.
pub fn decode_field(
    buf: &[u8],
    field: &str,
    rule: &FieldRule,
    opts: &DecodeOptions,
) -> Result<DecodedValue, DecodeError> {
    if let ValueType::Other(_) = rule.value_type {
        return Ok(DecodedValue::Null);
    }

    let slice = buf
        .get(rule.start..rule.end)
        .ok_or_else(|| DecodeError::OutOfBounds {
            field: field.to_string(),
            start: rule.start,
            end: rule.end,
            len: buf.len(),
        })?;

    let need = rule.value_type.width();
    let bytes = slice.get(..need).ok_or_else(|| DecodeError::NarrowSlice {
        field: field.to_string(),
        start: rule.start,
        end: rule.end,
        need,
    })?;

    match rule.value_type {
        ValueType::Date => decode_date(field, be_u32(bytes), opts),
        ValueType::Ip => Ok(DecodedValue::Str(
            Ipv4Addr::new(bytes[0], bytes[1], bytes[2], bytes[3]).to_string(),
        )),
        ValueType::UShort2 => Ok(DecodedValue::Int32(be_u16(bytes) as i32)),
        ValueType::ULong4 => Ok(DecodedValue::Int64(be_u32(bytes) as i64)),
        ValueType::Other(_) => Ok(DecodedValue::Null),
    }
}

fn decode_date(field: &str, secs: u32, opts: &DecodeOptions) -> Result<DecodedValue, DecodeError> {
    match opts.timestamp_mode {
        TimestampMode::EpochMillis => Ok(DecodedValue::Int64(secs as i64 * 1000)),
        TimestampMode::Formatted => {
            if secs == 0 {
                // "no time" sentinel
                return Ok(DecodedValue::Str(String::new()));
            }
            let offset = FixedOffset::east_opt(opts.hour_offset.saturating_mul(3600)).ok_or(
                DecodeError::InvalidHourOffset {
                    hours: opts.hour_offset,
                },
            )?;
            let utc = DateTime::from_timestamp(secs as i64, 0).ok_or_else(|| {
                DecodeError::TimeOutOfRange {
                    field: field.to_string(),
                    secs,
                }
            })?;
            Ok(DecodedValue::Str(
                utc.with_timezone(&offset)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string(),
            ))
        }
    }
}
