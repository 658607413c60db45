//! Collector configuration.
//!
//! The configuration document is JSON with the historical key names
//! (`listenUdpPort`, `netFlowMap`, ...). A missing or unreadable file is not
//! fatal: callers fall back to [`CollectorConfig::default`], under which the
//! engine performs no decoding.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::decode::{DecodeOptions, TimestampMode};
use crate::error::{ConfigError, RuleError};
use crate::rule::{RuleParseMode, RuleSet};
use crate::table::{ColumnSpec, ColumnType};

/// Collector configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectorConfig {
    /// UDP port to listen on
    pub listen_udp_port: u16,
    /// Address to bind the listener to
    pub listen_ip: String,
    /// Message bus bootstrap endpoint
    pub kafka_info: String,
    /// Topic every decoded record is published to
    pub kafka_topic: String,
    /// Hour offset applied when formatting decoded timestamps
    pub jet_lag: i32,
    /// Length of the per-datagram header region in bytes
    pub head_length: usize,
    /// Length of each fixed record block in bytes
    pub message_length: usize,
    /// Name of the published table
    pub table_name: String,
    /// Field name -> `"start:end:type:location"` rule strings
    pub net_flow_map: HashMap<String, String>,
    /// Column name -> declared type code
    pub table_data: HashMap<String, i32>,
    /// Column position (as a decimal string key) -> column name
    pub column_order: HashMap<String, String>,
    /// `"formatted"` or `"epochMillis"` rendering for DATE fields
    pub date_format: TimestampMode,
    /// `"lenient"` or `"strict"` handling of malformed rule strings
    pub rule_parse_mode: RuleParseMode,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            listen_udp_port: 2055,
            listen_ip: "0.0.0.0".to_string(),
            kafka_info: "127.0.0.1:9092".to_string(),
            kafka_topic: "netflow-log".to_string(),
            jet_lag: 0,
            head_length: 16,
            message_length: 64,
            table_name: String::new(),
            net_flow_map: HashMap::new(),
            table_data: HashMap::new(),
            column_order: HashMap::new(),
            date_format: TimestampMode::Formatted,
            rule_parse_mode: RuleParseMode::Lenient,
        }
    }
}

impl CollectorConfig {
    /// Reads and parses a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Builds the field rule set from `netFlowMap` under the configured
    /// parse mode, returning tolerated lenient-mode issues alongside it.
    pub fn rule_set(&self) -> Result<(RuleSet, Vec<RuleError>), ConfigError> {
        Ok(RuleSet::from_config(&self.net_flow_map, self.rule_parse_mode)?)
    }

    /// Builds the ordered column specification from `columnOrder` (position
    /// to name) and `tableData` (name to type code).
    ///
    /// Positions must form a gapless `0..n` sequence and every ordered
    /// column must carry a supported type code; anything else is a
    /// configuration error rather than a silently skipped column.
    pub fn column_spec(&self) -> Result<ColumnSpec, ConfigError> {
        let mut spec = ColumnSpec::new();
        for index in 0..self.column_order.len() {
            let name = self
                .column_order
                .get(&index.to_string())
                .ok_or(ConfigError::MissingColumnIndex { index })?;
            let code =
                *self
                    .table_data
                    .get(name)
                    .ok_or_else(|| ConfigError::MissingColumnType {
                        column: name.clone(),
                    })?;
            let ty = ColumnType::from_code(code).ok_or_else(|| ConfigError::UnsupportedTypeCode {
                column: name.clone(),
                code,
            })?;
            spec.push(name.clone(), ty)?;
        }
        Ok(spec)
    }

    /// Decoder settings derived from this configuration.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            hour_offset: self.jet_lag,
            timestamp_mode: self.date_format,
        }
    }
}
