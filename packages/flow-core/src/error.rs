//! Engine error types.

use thiserror::Error;

/// Errors from parsing a single field rule string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Rule string does not have the `start:end:type:location` shape
    #[error("rule for field '{field}' has {got} components, expected 4")]
    WrongComponentCount { field: String, got: usize },

    /// A numeric component could not be parsed as an integer
    #[error("rule for field '{field}': {component} '{value}' is not an integer")]
    InvalidInteger {
        field: String,
        component: &'static str,
        value: String,
    },

    /// A byte offset component is negative
    #[error("rule for field '{field}': {component} {value} is negative")]
    NegativeOffset {
        field: String,
        component: &'static str,
        value: i64,
    },

    /// Unknown value-type tag (strict mode only)
    #[error("rule for field '{field}': unknown value type '{tag}'")]
    UnknownValueType { field: String, tag: String },

    /// Byte range is inverted or empty (strict mode only)
    #[error("rule for field '{field}': invalid byte range {start}..{end}")]
    InvalidRange {
        field: String,
        start: usize,
        end: usize,
    },

    /// Byte range does not match the width required by the value type (strict mode only)
    #[error(
        "rule for field '{field}': range {start}..{end} is {got} bytes, {value_type} requires {need}"
    )]
    WidthMismatch {
        field: String,
        start: usize,
        end: usize,
        got: usize,
        value_type: String,
        need: usize,
    },

    /// Two rules share the same field name
    #[error("duplicate rule for field '{field}'")]
    DuplicateField { field: String },
}

/// Errors from interpreting a byte range under a value-type tag.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Byte range lies outside the buffer
    #[error("field '{field}' range {start}..{end} exceeds buffer of {len} bytes")]
    OutOfBounds {
        field: String,
        start: usize,
        end: usize,
        len: usize,
    },

    /// Byte range is narrower than the value type requires
    #[error("field '{field}' range {start}..{end} is narrower than the {need} bytes required")]
    NarrowSlice {
        field: String,
        start: usize,
        end: usize,
        need: usize,
    },

    /// Configured hour offset cannot be represented as a UTC offset
    #[error("hour offset {hours} is out of range")]
    InvalidHourOffset { hours: i32 },

    /// Timestamp seconds do not map to a representable date
    #[error("field '{field}' timestamp {secs} is out of range")]
    TimeOutOfRange { field: String, secs: u32 },
}

/// Errors from building a row against a declared column specification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// Column already declared
    #[error("duplicate column '{column}'")]
    DuplicateColumn { column: String },

    /// No decoded value for a declared column
    #[error("column '{column}' has no decoded value")]
    MissingField { column: String },

    /// Decoded value does not match the declared column type
    #[error("column '{column}' declared {declared}, decoded value is {actual}")]
    TypeMismatch {
        column: String,
        declared: String,
        actual: String,
    },
}

/// Errors from loading or interpreting the collector configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read configuration: {0}")]
    Read(String),

    /// Configuration document is not valid JSON
    #[error("malformed configuration document: {0}")]
    Parse(String),

    /// Column order map skips an index
    #[error("columnOrder is missing index {index}")]
    MissingColumnIndex { index: usize },

    /// Ordered column has no declared type code
    #[error("column '{column}' has no declared type code")]
    MissingColumnType { column: String },

    /// Declared type code is not one of the supported codes
    #[error("column '{column}' has unsupported type code {code}")]
    UnsupportedTypeCode { column: String, code: i32 },

    /// Rule parsing failed (strict mode)
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// Column specification is invalid
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Errors that abort processing of a whole datagram.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No field rules are configured; decoding is a no-op
    #[error("parsing rules not configured")]
    RulesNotConfigured,

    /// Record length must be positive to split the datagram
    #[error("record length must be non-zero")]
    ZeroRecordLength,

    /// Datagram is shorter than the configured header region
    #[error("datagram of {len} bytes is shorter than the {header_len}-byte header")]
    TruncatedHeader { len: usize, header_len: usize },

    /// A field decode failed; the datagram is dropped
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
