//! Wire encoding of a decoded table.
//!
//! Consumers receive one message per record: a JSON document with the table
//! name, the ordered column declarations (name plus integer type code), and
//! a single row whose cells are tagged by their value kind (`i`, `l`, `d`,
//! `b`, `s`).

use serde::Serialize;

use flow_core::table::{CellValue, Table};

use crate::error::PublishError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireTable<'a> {
    table_name: &'a str,
    columns: Vec<WireColumn<'a>>,
    rows: Vec<WireRow<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireColumn<'a> {
    column_name: &'a str,
    column_type: i32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRow<'a> {
    field_value: Vec<WireValue<'a>>,
}

#[derive(Serialize)]
enum WireValue<'a> {
    #[serde(rename = "i")]
    I(i32),
    #[serde(rename = "l")]
    L(i64),
    #[serde(rename = "d")]
    D(f64),
    #[serde(rename = "b")]
    B(bool),
    #[serde(rename = "s")]
    S(&'a str),
}

impl<'a> From<&'a CellValue> for WireValue<'a> {
    fn from(cell: &'a CellValue) -> Self {
        match cell {
            CellValue::I32(v) => WireValue::I(*v),
            CellValue::I64(v) => WireValue::L(*v),
            CellValue::F64(v) => WireValue::D(*v),
            CellValue::Bool(v) => WireValue::B(*v),
            CellValue::Str(s) => WireValue::S(s),
        }
    }
}

/// Serializes a populated table into one payload per row.
///
/// A table with no rows produces no payloads.
pub fn encode_row_messages(table: &Table) -> Result<Vec<Vec<u8>>, PublishError> {
    let mut payloads = Vec::with_capacity(table.row_count());
    for row in table.rows() {
        let message = WireTable {
            table_name: table.name(),
            columns: table
                .columns()
                .iter()
                .map(|c| WireColumn {
                    column_name: &c.name,
                    column_type: c.ty.code(),
                })
                .collect(),
            rows: vec![WireRow {
                field_value: row.iter().map(WireValue::from).collect(),
            }],
        };
        payloads.push(serde_json::to_vec(&message)?);
    }
    Ok(payloads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flow_core::assemble::AssembledRecord;
    use flow_core::decode::DecodedValue;
    use flow_core::table::{ColumnSpec, ColumnType};

    fn table_with_rows(n: usize) -> Table {
        let mut spec = ColumnSpec::new();
        spec.push("src_ip", ColumnType::String).unwrap();
        spec.push("src_port", ColumnType::Int32).unwrap();
        let mut table = Table::new("netflow", &spec);
        for i in 0..n {
            let mut record = AssembledRecord::new();
            record.insert(
                "src_ip".to_string(),
                DecodedValue::Str(format!("10.0.0.{i}")),
            );
            record.insert("src_port".to_string(), DecodedValue::Int32(1000 + i as i32));
            table.append_row(&record).unwrap();
        }
        table
    }

    #[test]
    fn test_one_payload_per_row() {
        let table = table_with_rows(3);
        let payloads = encode_row_messages(&table).unwrap();
        assert_eq!(payloads.len(), 3);
    }

    #[test]
    fn test_empty_table_encodes_to_nothing() {
        let table = table_with_rows(0);
        assert!(encode_row_messages(&table).unwrap().is_empty());
    }

    #[test]
    fn test_payload_shape() {
        let table = table_with_rows(1);
        let payloads = encode_row_messages(&table).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&payloads[0]).unwrap();

        assert_eq!(doc["tableName"], "netflow");
        assert_eq!(doc["columns"][0]["columnName"], "src_ip");
        assert_eq!(doc["columns"][0]["columnType"], 5);
        assert_eq!(doc["columns"][1]["columnName"], "src_port");
        assert_eq!(doc["columns"][1]["columnType"], 1);

        let rows = doc["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["fieldValue"][0]["s"], "10.0.0.0");
        assert_eq!(rows[0]["fieldValue"][1]["i"], 1000);
    }

    #[test]
    fn test_each_payload_carries_exactly_its_row() {
        let table = table_with_rows(2);
        let payloads = encode_row_messages(&table).unwrap();

        let first: serde_json::Value = serde_json::from_slice(&payloads[0]).unwrap();
        let second: serde_json::Value = serde_json::from_slice(&payloads[1]).unwrap();
        assert_eq!(first["rows"].as_array().unwrap().len(), 1);
        assert_eq!(second["rows"].as_array().unwrap().len(), 1);
        assert_eq!(first["rows"][0]["fieldValue"][0]["s"], "10.0.0.0");
        assert_eq!(second["rows"][0]["fieldValue"][0]["s"], "10.0.0.1");
    }
}
