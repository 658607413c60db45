//! End-to-end datagram decoding against a NetFlow-shaped deployment
//! configuration.

use std::collections::HashMap;

use flow_core::decode::TimestampMode;
use flow_core::error::EngineError;
use flow_core::table::CellValue;
use flow_core::{config::CollectorConfig, Engine};

/// A configuration shaped like a production deployment: export time in the
/// 16-byte header, addresses/ports/counters in each 64-byte record block.
fn netflow_config() -> CollectorConfig {
    let mut config = CollectorConfig::default();
    config.table_name = "netflow".to_string();

    let rules: &[(&str, &str)] = &[
        ("out_second", "8:12:DATE:0"),
        ("source_ip", "0:4:IP:1"),
        ("dest_ip", "4:8:IP:1"),
        ("src_port", "8:10:USHORT2:1"),
        ("dest_port", "10:12:USHORT2:1"),
        ("in_total_byte", "12:16:ULONG4:1"),
        ("start_time", "16:20:DATE:1"),
    ];
    for (name, rule) in rules {
        config
            .net_flow_map
            .insert(name.to_string(), rule.to_string());
    }

    let columns: &[(&str, i32)] = &[
        ("out_second", 5),
        ("source_ip", 5),
        ("dest_ip", 5),
        ("src_port", 1),
        ("dest_port", 1),
        ("in_total_byte", 2),
        ("start_time", 5),
    ];
    let mut order = HashMap::new();
    for (i, (name, code)) in columns.iter().enumerate() {
        config.table_data.insert(name.to_string(), *code);
        order.insert(i.to_string(), name.to_string());
    }
    config.column_order = order;
    config
}

/// Builds a datagram with the configured 16-byte header and `n` 64-byte
/// record blocks.
fn datagram(export_secs: u32, n: usize) -> Vec<u8> {
    let mut buf = vec![0u8; 8];
    buf.extend_from_slice(&export_secs.to_be_bytes());
    buf.extend_from_slice(&[0u8; 4]);
    assert_eq!(buf.len(), 16);

    for i in 0..n {
        let mut block = Vec::with_capacity(64);
        block.extend_from_slice(&[192, 168, 1, i as u8]);
        block.extend_from_slice(&[10, 0, 0, 1]);
        block.extend_from_slice(&(40_000 + i as u16).to_be_bytes());
        block.extend_from_slice(&443u16.to_be_bytes());
        block.extend_from_slice(&(1_000_000u32 + i as u32).to_be_bytes());
        block.extend_from_slice(&1_700_000_100u32.to_be_bytes());
        block.resize(64, 0);
        buf.extend_from_slice(&block);
    }
    buf
}

#[test]
fn test_full_pipeline_decodes_typed_rows() {
    let config = netflow_config();
    let (engine, issues) = Engine::from_config(&config).unwrap();
    assert!(issues.is_empty());

    let decoded = engine.process_datagram(&datagram(1_700_000_000, 2)).unwrap();
    assert!(decoded.row_errors.is_empty());

    let table = &decoded.table;
    assert_eq!(table.name(), "netflow");
    assert_eq!(table.columns().len(), 7);
    assert_eq!(table.row_count(), 2);

    assert_eq!(
        table.rows()[0],
        vec![
            CellValue::Str("2023-11-14 22:13:20".to_string()),
            CellValue::Str("192.168.1.0".to_string()),
            CellValue::Str("10.0.0.1".to_string()),
            CellValue::I32(40_000),
            CellValue::I32(443),
            CellValue::I64(1_000_000),
            CellValue::Str("2023-11-14 22:15:00".to_string()),
        ]
    );
    assert_eq!(
        table.rows()[1][1],
        CellValue::Str("192.168.1.1".to_string())
    );
    // Header-derived export time is identical across rows.
    assert_eq!(table.rows()[0][0], table.rows()[1][0]);
}

#[test]
fn test_record_count_matches_block_arithmetic() {
    let config = netflow_config();
    let (engine, _) = Engine::from_config(&config).unwrap();

    let mut buf = datagram(1_700_000_000, 3);
    buf.extend_from_slice(&[0u8; 10]);
    assert_eq!(buf.len(), 16 + 64 * 3 + 10);

    let decoded = engine.process_datagram(&buf).unwrap();
    assert_eq!(decoded.table.row_count(), 3);
}

#[test]
fn test_jet_lag_shifts_formatted_times() {
    let mut config = netflow_config();
    config.jet_lag = 8;
    let (engine, _) = Engine::from_config(&config).unwrap();

    let decoded = engine.process_datagram(&datagram(1_700_000_000, 1)).unwrap();
    assert_eq!(
        decoded.table.rows()[0][0],
        CellValue::Str("2023-11-15 06:13:20".to_string())
    );
}

#[test]
fn test_epoch_millis_mode_needs_timestamp_columns() {
    let mut config = netflow_config();
    config.date_format = TimestampMode::EpochMillis;
    // Under the integer rendering the DATE columns must be declared as
    // epoch timestamps instead of strings.
    config.table_data.insert("out_second".to_string(), 6);
    config.table_data.insert("start_time".to_string(), 6);

    let (engine, _) = Engine::from_config(&config).unwrap();
    let decoded = engine.process_datagram(&datagram(1_700_000_000, 1)).unwrap();
    assert!(decoded.row_errors.is_empty());
    assert_eq!(
        decoded.table.rows()[0][0],
        CellValue::I64(1_700_000_000_000)
    );
    assert_eq!(
        decoded.table.rows()[0][6],
        CellValue::I64(1_700_000_100_000)
    );
}

#[test]
fn test_zero_export_time_yields_empty_string() {
    let config = netflow_config();
    let (engine, _) = Engine::from_config(&config).unwrap();

    let decoded = engine.process_datagram(&datagram(0, 1)).unwrap();
    assert_eq!(decoded.table.rows()[0][0], CellValue::Str(String::new()));
}

#[test]
fn test_empty_field_map_is_a_per_datagram_no_op() {
    let mut config = netflow_config();
    config.net_flow_map.clear();
    let (engine, _) = Engine::from_config(&config).unwrap();

    let err = engine.process_datagram(&datagram(1_700_000_000, 2)).unwrap_err();
    assert!(matches!(err, EngineError::RulesNotConfigured));
}

#[test]
fn test_short_datagram_aborts_without_rows() {
    let config = netflow_config();
    let (engine, _) = Engine::from_config(&config).unwrap();

    let err = engine.process_datagram(&[0u8; 7]).unwrap_err();
    assert!(matches!(err, EngineError::TruncatedHeader { .. }));
}

#[test]
fn test_schema_mismatch_skips_row_keeps_listening_semantics() {
    let mut config = netflow_config();
    // Misdeclare the byte counter as a 32-bit column; ULONG4 decodes to a
    // 64-bit value, so every row fails coercion while decode succeeds.
    config.table_data.insert("in_total_byte".to_string(), 1);

    let (engine, _) = Engine::from_config(&config).unwrap();
    let decoded = engine.process_datagram(&datagram(1_700_000_000, 2)).unwrap();
    assert_eq!(decoded.table.row_count(), 0);
    assert_eq!(decoded.row_errors.len(), 2);
}
