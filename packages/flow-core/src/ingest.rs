//! Per-datagram decode pipeline.
//!
//! One [`Engine`] is built at startup from the immutable rule set and column
//! specification and shared by every datagram. Each datagram produces a
//! fresh [`Table`]; nothing is carried over between datagrams.

use crate::assemble::Assembler;
use crate::config::CollectorConfig;
use crate::decode::DecodeOptions;
use crate::error::{ConfigError, EngineError, RuleError, TableError};
use crate::packet::split_datagram;
use crate::rule::RuleSet;
use crate::table::{ColumnSpec, Table};

/// Immutable decoding engine for one deployment.
#[derive(Debug)]
pub struct Engine {
    rules: RuleSet,
    columns: ColumnSpec,
    table_name: String,
    header_len: usize,
    record_len: usize,
    opts: DecodeOptions,
}

/// A row that failed schema coercion; the rest of the datagram proceeds.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// Zero-based record block index within the datagram
    pub block: usize,
    pub error: TableError,
}

/// Result of decoding one datagram: the populated table plus any rows that
/// were skipped because their values did not match the declared schema.
#[derive(Debug)]
pub struct DecodedDatagram {
    pub table: Table,
    pub row_errors: Vec<RowError>,
}

impl Engine {
    /// Builds an engine directly from its parts.
    pub fn new(
        rules: RuleSet,
        columns: ColumnSpec,
        table_name: impl Into<String>,
        header_len: usize,
        record_len: usize,
        opts: DecodeOptions,
    ) -> Self {
        Self {
            rules,
            columns,
            table_name: table_name.into(),
            header_len,
            record_len,
            opts,
        }
    }

    /// Builds an engine from a loaded configuration.
    ///
    /// Returns the engine together with any rule problems tolerated under
    /// lenient parsing, so the caller can log them once at startup.
    pub fn from_config(config: &CollectorConfig) -> Result<(Self, Vec<RuleError>), ConfigError> {
        let (rules, issues) = config.rule_set()?;
        let columns = config.column_spec()?;
        tracing::debug!(
            rules = rules.len(),
            columns = columns.len(),
            table = %config.table_name,
            "engine configured"
        );
        let engine = Self::new(
            rules,
            columns,
            config.table_name.clone(),
            config.head_length,
            config.message_length,
            config.decode_options(),
        );
        Ok((engine, issues))
    }

    /// Decodes one datagram into a fresh table.
    ///
    /// A decode failure (a field slice outside its buffer) aborts the whole
    /// datagram. A coercion failure skips only the offending row and is
    /// reported in [`DecodedDatagram::row_errors`].
    pub fn process_datagram(&self, datagram: &[u8]) -> Result<DecodedDatagram, EngineError> {
        if self.rules.is_empty() {
            return Err(EngineError::RulesNotConfigured);
        }

        let (header, blocks) = split_datagram(datagram, self.header_len, self.record_len)?;
        let assembler = Assembler::new(&self.rules, &self.opts);
        let header_fields = assembler.decode_header(header)?;

        let mut table = Table::new(self.table_name.clone(), &self.columns);
        let mut row_errors = Vec::new();
        for (block, bytes) in blocks.iter().enumerate() {
            let record = assembler.assemble(bytes, &header_fields)?;
            if let Err(error) = table.append_row(&record) {
                row_errors.push(RowError { block, error });
            }
        }

        Ok(DecodedDatagram { table, row_errors })
    }

    /// Name of the table this engine populates.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}
