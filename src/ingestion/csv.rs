//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{DashboardError, DashboardResult};
use crate::processing::coerce::parse_timestamp;
use crate::types::{DataSet, DataType, Schema, Value};

use super::infer::infer_dataset;

/// Ingest a CSV file, keeping every source column and inferring column types.
///
/// The CSV must have a header row. Empty cells become [`Value::Null`].
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> DashboardResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader, inferring column types.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> DashboardResult<DataSet> {
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_owned()).collect();

    let mut cells: Vec<Vec<Option<String>>> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        cells.push(
            record
                .iter()
                .map(|raw| {
                    let trimmed = raw.trim();
                    (!trimmed.is_empty()).then(|| trimmed.to_owned())
                })
                .collect(),
        );
    }

    Ok(infer_dataset(headers, cells))
}

/// Ingest a CSV file against a fixed [`Schema`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain all schema fields (order can differ); extra columns are dropped.
/// - Each value is parsed according to the schema field type.
pub fn ingest_csv_with_schema_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
) -> DashboardResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_with_schema_from_reader(&mut rdr, schema)
}

/// Ingest CSV data from an existing CSV reader against a fixed [`Schema`].
pub fn ingest_csv_with_schema_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &Schema,
) -> DashboardResult<DataSet> {
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h.trim() == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(DashboardError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // 1-based, and the header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for (field, &csv_idx) in schema.fields.iter().zip(col_idxs.iter()) {
            let raw = record.get(csv_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, &field.name, &field.data_type, raw)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn parse_typed_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    raw: &str,
) -> DashboardResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Value::Null);
    }

    let parse_error = |message: String| DashboardError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(trimmed.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
        DataType::Timestamp => parse_timestamp(trimmed)
            .map(Value::Timestamp)
            .ok_or_else(|| parse_error("expected timestamp (YYYY-MM-DD[ HH:MM[:SS]])".to_string())),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::{ingest_csv_from_reader, ingest_csv_with_schema_from_reader};
    use crate::types::{DataType, Field, Schema, Value};

    fn reader(input: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input.as_bytes())
    }

    #[test]
    fn inferred_ingest_keeps_all_columns_in_source_order() {
        let input = "order_id,payment_value,payment_type\nabc,10.5,credit_card\ndef,,boleto\n";
        let ds = ingest_csv_from_reader(&mut reader(input)).unwrap();

        let names: Vec<&str> = ds.schema.field_names().collect();
        assert_eq!(names, vec!["order_id", "payment_value", "payment_type"]);
        assert_eq!(ds.schema.fields[1].data_type, DataType::Float64);
        assert_eq!(ds.rows[1][1], Value::Null);
    }

    #[test]
    fn schema_ingest_parses_timestamps() {
        let schema = Schema::new(vec![
            Field::new("order_id", DataType::Utf8),
            Field::new("order_purchase_timestamp", DataType::Timestamp),
        ]);
        let input = "order_purchase_timestamp,order_id\n2017-11-02 10:56:33,abc\n";
        let ds = ingest_csv_with_schema_from_reader(&mut reader(input), &schema).unwrap();
        assert_eq!(ds.rows[0][0], Value::Utf8("abc".to_string()));
        assert!(matches!(ds.rows[0][1], Value::Timestamp(_)));
    }

    #[test]
    fn schema_ingest_rejects_bad_timestamp() {
        let schema = Schema::new(vec![Field::new("ts", DataType::Timestamp)]);
        let err = ingest_csv_with_schema_from_reader(&mut reader("ts\nyesterday\n"), &schema)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("failed to parse value at row 2"));
        assert!(msg.contains("column 'ts'"));
    }
}
