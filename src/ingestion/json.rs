//! JSON ingestion implementation.
//!
//! Supported inputs:
//! - A JSON array of objects: `[{"a":1}, {"a":2}]`
//! - Newline-delimited JSON (NDJSON): `{"a":1}\n{"a":2}\n`
//!
//! Schema-less ingestion takes the union of top-level keys (first-seen order) as columns.
//! Schema ingestion supports nested fields using dot paths in field names (e.g. `seller.city`).

use std::fs;
use std::path::Path;

use crate::error::{DashboardError, DashboardResult};
use crate::processing::coerce::parse_timestamp;
use crate::types::{DataSet, DataType, Schema, Value};

use super::infer::infer_dataset;

/// Ingest a JSON file, inferring columns and column types.
pub fn ingest_json_from_path(path: impl AsRef<Path>) -> DashboardResult<DataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_from_str(&text)
}

/// Ingest JSON from an in-memory string, inferring columns and column types.
pub fn ingest_json_from_str(input: &str) -> DashboardResult<DataSet> {
    let values = parse_records(input)?;

    let mut headers: Vec<String> = Vec::new();
    for (idx0, v) in values.iter().enumerate() {
        let obj = as_record(idx0 + 1, v)?;
        for key in obj.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }

    let cells = values
        .iter()
        .filter_map(|v| v.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).and_then(scalar_text))
                .collect()
        })
        .collect();

    Ok(infer_dataset(headers, cells))
}

/// Ingest a JSON file against a fixed [`Schema`].
pub fn ingest_json_with_schema_from_path(
    path: impl AsRef<Path>,
    schema: &Schema,
) -> DashboardResult<DataSet> {
    let text = fs::read_to_string(path)?;
    ingest_json_with_schema_from_str(&text, schema)
}

/// Ingest JSON from an in-memory string against a fixed [`Schema`].
pub fn ingest_json_with_schema_from_str(input: &str, schema: &Schema) -> DashboardResult<DataSet> {
    let values = parse_records(input)?;

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(values.len());
    for (idx0, v) in values.iter().enumerate() {
        let row_num = idx0 + 1;
        let obj = as_record(row_num, v)?;

        let mut row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for field in &schema.fields {
            let jv = get_by_dot_path(obj, &field.name).ok_or_else(|| {
                DashboardError::SchemaMismatch {
                    message: format!("row {row_num} missing required field '{}'", field.name),
                }
            })?;
            row.push(convert_json_value(row_num, &field.name, &field.data_type, jv)?);
        }
        rows.push(row);
    }

    Ok(DataSet::new(schema.clone(), rows))
}

fn parse_records(input: &str) -> DashboardResult<Vec<serde_json::Value>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::SchemaMismatch {
            message: "json input is empty".to_string(),
        });
    }

    // A single JSON document first (array or object), then NDJSON.
    if let Ok(v) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return match v {
            serde_json::Value::Array(items) => Ok(items),
            serde_json::Value::Object(_) => Ok(vec![v]),
            _ => Err(DashboardError::SchemaMismatch {
                message: "json must be an object, an array of objects, or NDJSON".to_string(),
            }),
        };
    }

    let mut values = Vec::new();
    for line in trimmed.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        values.push(serde_json::from_str::<serde_json::Value>(line)?);
    }
    Ok(values)
}

fn as_record(
    row_num: usize,
    v: &serde_json::Value,
) -> DashboardResult<&serde_json::Map<String, serde_json::Value>> {
    v.as_object().ok_or_else(|| DashboardError::SchemaMismatch {
        message: format!("row {row_num} is not a json object"),
    })
}

fn scalar_text(v: &serde_json::Value) -> Option<String> {
    match v {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        other => Some(other.to_string()),
    }
}

fn get_by_dot_path<'a>(
    root: &'a serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Option<&'a serde_json::Value> {
    let mut segments = path.split('.');
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn convert_json_value(
    row: usize,
    column: &str,
    data_type: &DataType,
    v: &serde_json::Value,
) -> DashboardResult<Value> {
    if v.is_null() {
        return Ok(Value::Null);
    }

    let parse_error = |message: &str| DashboardError::ParseError {
        row,
        column: column.to_string(),
        raw: v.to_string(),
        message: message.to_string(),
    };

    match data_type {
        DataType::Utf8 => v
            .as_str()
            .map(|s| Value::Utf8(s.to_string()))
            .ok_or_else(|| parse_error("expected string")),
        DataType::Bool => v
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| parse_error("expected bool")),
        DataType::Int64 => {
            if let Some(n) = v.as_i64() {
                Ok(Value::Int64(n))
            } else if let Some(n) = v.as_u64() {
                i64::try_from(n)
                    .map(Value::Int64)
                    .map_err(|_| parse_error("u64 out of range for i64"))
            } else {
                Err(parse_error("expected integer number"))
            }
        }
        DataType::Float64 => v
            .as_f64()
            .map(Value::Float64)
            .ok_or_else(|| parse_error("expected number")),
        DataType::Timestamp => v
            .as_str()
            .and_then(parse_timestamp)
            .map(Value::Timestamp)
            .ok_or_else(|| parse_error("expected timestamp string")),
    }
}

#[cfg(test)]
mod tests {
    use super::{ingest_json_from_str, ingest_json_with_schema_from_str};
    use crate::types::{DataType, Field, Schema, Value};

    #[test]
    fn ndjson_columns_are_the_union_of_keys() {
        let input = "{\"customer_id\":\"c1\",\"customer_city\":\"sao paulo\"}\n\
                     {\"customer_id\":\"c2\",\"customer_state\":\"SP\"}\n";
        let ds = ingest_json_from_str(input).unwrap();

        let names: Vec<&str> = ds.schema.field_names().collect();
        assert_eq!(names, vec!["customer_id", "customer_city", "customer_state"]);
        assert_eq!(ds.rows[1][1], Value::Null);
        assert_eq!(ds.rows[0][2], Value::Null);
    }

    #[test]
    fn array_numbers_are_inferred() {
        let ds = ingest_json_from_str(r#"[{"price": 10}, {"price": 12.5}, {"price": null}]"#)
            .unwrap();
        assert_eq!(ds.schema.fields[0].data_type, DataType::Float64);
        assert_eq!(ds.rows[1][0], Value::Float64(12.5));
        assert_eq!(ds.rows[2][0], Value::Null);
    }

    #[test]
    fn schema_ingest_reads_nested_paths() {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("seller.city", DataType::Utf8),
        ]);
        let ds = ingest_json_with_schema_from_str(
            r#"[{"id": 1, "seller": {"city": "curitiba"}}]"#,
            &schema,
        )
        .unwrap();
        assert_eq!(
            ds.rows[0],
            vec![Value::Int64(1), Value::Utf8("curitiba".to_string())]
        );
    }

    #[test]
    fn non_object_rows_are_rejected() {
        let err = ingest_json_from_str("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("row 1 is not a json object"));
    }
}
