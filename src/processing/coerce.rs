//! Column type coercion (the Cleaner stage).
//!
//! Both coercions are table-scoped and tolerant: a cell that cannot be converted becomes
//! [`Value::Null`] instead of failing the run. Rows are never dropped and columns keep their
//! position; only the named columns' values and field types change. Applying either coercion
//! twice gives the same result as applying it once.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::DashboardResult;
use crate::types::{DataSet, DataType, Value};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp string.
///
/// Accepts `YYYY-MM-DD HH:MM:SS[.fff]` (space or `T` separator), `YYYY-MM-DD HH:MM`, and a
/// bare `YYYY-MM-DD` (midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Coerce the named columns to [`DataType::Timestamp`].
///
/// Text is parsed with [`parse_timestamp`]; existing timestamps pass through; anything else
/// (unparseable text, numbers, booleans) becomes [`Value::Null`].
///
/// Returns [`crate::DashboardError::MissingColumn`] if a named column does not exist.
pub fn to_datetime(dataset: &DataSet, columns: &[&str]) -> DashboardResult<DataSet> {
    coerce_columns(dataset, columns, DataType::Timestamp, |value| match value {
        Value::Timestamp(ts) => Value::Timestamp(*ts),
        Value::Utf8(s) => parse_timestamp(s).map(Value::Timestamp).unwrap_or(Value::Null),
        _ => Value::Null,
    })
}

/// Coerce the named columns to [`DataType::Float64`].
///
/// Floats pass through, integers widen, booleans become `1.0`/`0.0`, numeric text is parsed.
/// Non-numeric text and timestamps become [`Value::Null`].
///
/// Returns [`crate::DashboardError::MissingColumn`] if a named column does not exist.
pub fn to_float(dataset: &DataSet, columns: &[&str]) -> DashboardResult<DataSet> {
    coerce_columns(dataset, columns, DataType::Float64, |value| match value {
        Value::Utf8(s) => s.trim().parse::<f64>().map(Value::Float64).unwrap_or(Value::Null),
        other => other.as_f64().map(Value::Float64).unwrap_or(Value::Null),
    })
}

fn coerce_columns<F>(
    dataset: &DataSet,
    columns: &[&str],
    target: DataType,
    convert: F,
) -> DashboardResult<DataSet>
where
    F: Fn(&Value) -> Value,
{
    let idxs = columns
        .iter()
        .map(|c| dataset.schema.require(c))
        .collect::<DashboardResult<Vec<_>>>()?;

    let mut failed = 0usize;
    let mut out = dataset.map_rows(|row| {
        let mut row = row.to_vec();
        for &idx in &idxs {
            let converted = convert(&row[idx]);
            if converted.is_null() && !row[idx].is_null() {
                failed += 1;
            }
            row[idx] = converted;
        }
        row
    });

    for &idx in &idxs {
        out.schema.fields[idx].data_type = target.clone();
    }

    if failed > 0 {
        log::debug!(
            "coercion to {target:?} left {failed} unparseable cell(s) as null in columns {columns:?}"
        );
    }

    Ok(out)
}
