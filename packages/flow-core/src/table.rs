//! Generic typed table built from an externally declared column specification.
//!
//! Column order is an explicit property of the specification, never derived
//! from map iteration order. Row building coerces decoded values strictly:
//! a value whose runtime variant disagrees with the declared column type
//! fails the row instead of being converted.

use std::fmt;

use crate::assemble::AssembledRecord;
use crate::decode::DecodedValue;
use crate::error::TableError;

/// Declared column types, wire-compatible with the configuration's integer
/// type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int32,
    Int64,
    Double,
    Bool,
    String,
    /// Epoch timestamp carried as a 64-bit integer
    Timestamp,
}

impl ColumnType {
    /// Maps a configuration type code to a column type.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(ColumnType::Int32),
            2 => Some(ColumnType::Int64),
            3 => Some(ColumnType::Double),
            4 => Some(ColumnType::Bool),
            5 => Some(ColumnType::String),
            6 => Some(ColumnType::Timestamp),
            _ => None,
        }
    }

    /// The configuration type code for this column type.
    pub fn code(&self) -> i32 {
        match self {
            ColumnType::Int32 => 1,
            ColumnType::Int64 => 2,
            ColumnType::Double => 3,
            ColumnType::Bool => 4,
            ColumnType::String => 5,
            ColumnType::Timestamp => 6,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int32 => write!(f, "int32"),
            ColumnType::Int64 => write!(f, "int64"),
            ColumnType::Double => write!(f, "double"),
            ColumnType::Bool => write!(f, "bool"),
            ColumnType::String => write!(f, "string"),
            ColumnType::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// One declared column: name plus target type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
}

/// Ordered list of declared columns.
///
/// The declaration order is the row field order; two specifications built
/// from the same declarations always yield the same column sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnSpec {
    columns: Vec<Column>,
}

impl ColumnSpec {
    /// Creates an empty specification.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a column declaration, rejecting duplicate names.
    pub fn push(&mut self, name: impl Into<String>, ty: ColumnType) -> Result<(), TableError> {
        let name = name.into();
        if self.columns.iter().any(|c| c.name == name) {
            return Err(TableError::DuplicateColumn { column: name });
        }
        self.columns.push(Column { name, ty });
        Ok(())
    }

    /// Declared columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of declared columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if no columns are declared.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A typed cell of a built row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    I32(i32),
    I64(i64),
    F64(f64),
    Bool(bool),
    Str(String),
}

/// One row: typed cells in column order.
pub type Row = Vec<CellValue>;

/// A named table with ordered typed columns and appended rows.
///
/// A fresh table is built per datagram and fully populated before ownership
/// passes to the publisher; it is never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table whose columns mirror the specification's
    /// declared name/type pairs, in declared order.
    pub fn new(name: impl Into<String>, spec: &ColumnSpec) -> Self {
        Self {
            name: name.into(),
            columns: spec.columns().to_vec(),
            rows: Vec::new(),
        }
    }

    /// Builds a row from an assembled record and appends it.
    ///
    /// Every declared column must have a same-named decoded value whose
    /// runtime variant matches the declared type; otherwise the row fails
    /// and the table is left unchanged.
    pub fn append_row(&mut self, record: &AssembledRecord) -> Result<(), TableError> {
        let mut row = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let value = record
                .get(&column.name)
                .ok_or_else(|| TableError::MissingField {
                    column: column.name.clone(),
                })?;
            row.push(coerce(&column.name, column.ty, value)?);
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Checks a decoded value against the declared column type.
///
/// This is a type assertion, not a conversion: no numeric widening or
/// stringification happens here, so a misconfigured schema fails loudly on
/// the first row instead of producing silently reshaped data.
fn coerce(column: &str, declared: ColumnType, value: &DecodedValue) -> Result<CellValue, TableError> {
    let mismatch = || TableError::TypeMismatch {
        column: column.to_string(),
        declared: declared.to_string(),
        actual: value.kind().to_string(),
    };
    match (declared, value) {
        (ColumnType::Int32, DecodedValue::Int32(v)) => Ok(CellValue::I32(*v)),
        (ColumnType::Int64 | ColumnType::Timestamp, DecodedValue::Int64(v)) => {
            Ok(CellValue::I64(*v))
        }
        (ColumnType::String, DecodedValue::Str(s)) => Ok(CellValue::Str(s.clone())),
        _ => Err(mismatch()),
    }
}
