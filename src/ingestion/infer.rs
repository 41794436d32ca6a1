//! Column type inference for schema-less ingestion.
//!
//! Readers collect each cell as trimmed text (`None` for empty cells) and hand the grid to
//! [`infer_dataset`], which picks one [`DataType`] per column from all of its non-empty cells:
//!
//! - `Int64` if every value parses as an integer
//! - else `Float64` if every value parses as a float
//! - else `Bool` if every value is `true`/`false` (case-insensitive)
//! - else `Utf8`
//!
//! Only canonically written numbers count as numeric. A leading `+` or a zero-padded integer
//! part (`007`, `-01.5`) keeps the column `Utf8`, so identifiers and zip codes load as written.
//!
//! A column with no values at all becomes `Float64` (all nulls). Timestamps are never inferred;
//! they stay text until [`crate::processing::to_datetime`] coerces them.

use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Build a typed dataset from headers and raw text cells.
pub(crate) fn infer_dataset(headers: Vec<String>, cells: Vec<Vec<Option<String>>>) -> DataSet {
    let types: Vec<DataType> = (0..headers.len())
        .map(|col| infer_column_type(cells.iter().filter_map(|row| row.get(col)?.as_deref())))
        .collect();

    let rows = cells
        .into_iter()
        .map(|mut row| {
            row.resize(types.len(), None);
            row.into_iter()
                .zip(&types)
                .map(|(cell, data_type)| match cell {
                    Some(raw) => convert_inferred(raw, data_type),
                    None => Value::Null,
                })
                .collect()
        })
        .collect();

    let fields = headers
        .into_iter()
        .zip(types)
        .map(|(name, data_type)| Field::new(name, data_type))
        .collect();

    DataSet::new(Schema::new(fields), rows)
}

fn infer_column_type<'a>(values: impl Iterator<Item = &'a str>) -> DataType {
    let mut seen_any = false;
    let mut all_int = true;
    let mut all_float = true;
    let mut all_bool = true;

    for v in values {
        seen_any = true;
        let canonical = is_canonical_number(v);
        all_int = all_int && canonical && v.parse::<i64>().is_ok();
        all_float = all_float && canonical && looks_like_float(v);
        all_bool = all_bool && parse_bool_literal(v).is_some();
        if !(all_int || all_float || all_bool) {
            return DataType::Utf8;
        }
    }

    if !seen_any {
        DataType::Float64
    } else if all_int {
        DataType::Int64
    } else if all_float {
        DataType::Float64
    } else if all_bool {
        DataType::Bool
    } else {
        DataType::Utf8
    }
}

// `f64::from_str` accepts "nan"/"inf"; a city called "Inf" is still text.
fn looks_like_float(v: &str) -> bool {
    v.bytes().any(|b| b.is_ascii_digit()) && v.parse::<f64>().is_ok()
}

// Reading "007" as 7 would lose the text it was written as.
fn is_canonical_number(v: &str) -> bool {
    let unsigned = v.strip_prefix('-').unwrap_or(v);
    let padded = unsigned.len() > 1
        && unsigned.starts_with('0')
        && unsigned.as_bytes()[1].is_ascii_digit();
    !v.starts_with('+') && !padded
}

fn parse_bool_literal(v: &str) -> Option<bool> {
    if v.eq_ignore_ascii_case("true") {
        Some(true)
    } else if v.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn convert_inferred(raw: String, data_type: &DataType) -> Value {
    match data_type {
        DataType::Int64 => raw.parse().map(Value::Int64).unwrap_or(Value::Null),
        DataType::Float64 => raw.parse().map(Value::Float64).unwrap_or(Value::Null),
        DataType::Bool => parse_bool_literal(&raw).map(Value::Bool).unwrap_or(Value::Null),
        DataType::Utf8 | DataType::Timestamp => Value::Utf8(raw),
    }
}
