//! Core data model types.
//!
//! Every stage of the pipeline reads and produces an in-memory [`DataSet`]: a [`Schema`] (a list
//! of typed [`Field`]s) plus row-major [`Value`] storage.

use std::fmt;

use chrono::NaiveDateTime;

use crate::error::{DashboardError, DashboardResult};

/// Format used when rendering [`Value::Timestamp`] as text.
pub const TIMESTAMP_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Logical data type for a schema field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
    /// Date and time without timezone.
    Timestamp,
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns the index of a field by name, or [`DashboardError::MissingColumn`].
    pub fn require(&self, name: &str) -> DashboardResult<usize> {
        self.index_of(name)
            .ok_or_else(|| DashboardError::MissingColumn {
                column: name.to_string(),
                available: self.field_names().map(str::to_string).collect(),
            })
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value, or a value that failed to coerce.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
    /// Date and time without timezone.
    Timestamp(NaiveDateTime),
}

impl Value {
    /// `true` for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value. Integers and booleans widen; other variants yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int64(v) => Some(*v as f64),
            Value::Float64(v) => Some(*v),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// String view of a [`Value::Utf8`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Utf8(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Convert into a JSON value for export. Non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Int64(v) => serde_json::Value::from(*v),
            Value::Float64(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Utf8(s) => serde_json::Value::String(s.clone()),
            Value::Timestamp(ts) => {
                serde_json::Value::String(ts.format(TIMESTAMP_DISPLAY_FORMAT).to_string())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Utf8(s) => f.write_str(s),
            Value::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_DISPLAY_FORMAT)),
        }
    }
}

/// Hashable, totally ordered projection of a [`Value`], used as a join or group key.
///
/// Integral floats normalize to [`GroupKey::Int`] so `1` and `1.0` land in the same bucket.
/// Variant order defines cross-type ordering; [`GroupKey::Null`] sorts after everything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupKey {
    Bool(bool),
    Int(i64),
    /// Order-preserving bit pattern of a non-integral float.
    Float(u64),
    Timestamp(NaiveDateTime),
    Str(String),
    Null,
}

impl GroupKey {
    /// Build a key from a cell value.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => GroupKey::Null,
            Value::Bool(b) => GroupKey::Bool(*b),
            Value::Int64(v) => GroupKey::Int(*v),
            Value::Float64(v) => {
                if v.fract() == 0.0 && *v >= i64::MIN as f64 && *v < i64::MAX as f64 {
                    GroupKey::Int(*v as i64)
                } else {
                    GroupKey::Float(sortable_bits(*v))
                }
            }
            Value::Utf8(s) => GroupKey::Str(s.clone()),
            Value::Timestamp(ts) => GroupKey::Timestamp(*ts),
        }
    }

    /// `true` for [`GroupKey::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, GroupKey::Null)
    }
}

fn sortable_bits(v: f64) -> u64 {
    let bits = v.to_bits();
    if bits >> 63 == 1 { !bits } else { bits | (1 << 63) }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Create a dataset with no rows.
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `true` if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate the values of a named column.
    pub fn column_values<'a>(
        &'a self,
        name: &str,
    ) -> DashboardResult<impl Iterator<Item = &'a Value> + use<'a>> {
        let idx = self.schema.require(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Keep the first `n` rows.
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Create a new dataset containing only rows that match `predicate`.
    ///
    /// The returned dataset preserves the original schema.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&[Value]) -> bool,
    {
        let rows = self
            .rows
            .iter()
            .filter(|row| predicate(row.as_slice()))
            .cloned()
            .collect();
        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Create a new dataset by applying `mapper` to every row.
    ///
    /// The returned dataset preserves the original schema.
    ///
    /// # Panics
    ///
    /// Panics if `mapper` returns a row with a different length than the schema field count.
    pub fn map_rows<F>(&self, mut mapper: F) -> Self
    where
        F: FnMut(&[Value]) -> Vec<Value>,
    {
        let expected_len = self.schema.fields.len();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let out = mapper(row.as_slice());
                assert!(
                    out.len() == expected_len,
                    "mapped row length {} does not match schema length {}",
                    out.len(),
                    expected_len
                );
                out
            })
            .collect();

        Self {
            schema: self.schema.clone(),
            rows,
        }
    }

    /// Reduce (fold) all rows into an accumulator value.
    pub fn reduce_rows<A, F>(&self, init: A, mut reducer: F) -> A
    where
        F: FnMut(A, &[Value]) -> A,
    {
        self.rows
            .iter()
            .fold(init, |acc, row| reducer(acc, row.as_slice()))
    }

    /// Export rows as a JSON array of objects keyed by column name.
    pub fn to_json_records(&self) -> serde_json::Value {
        let records = self
            .rows
            .iter()
            .map(|row| {
                let obj = self
                    .schema
                    .fields
                    .iter()
                    .zip(row)
                    .map(|(field, value)| (field.name.clone(), value.to_json()))
                    .collect::<serde_json::Map<_, _>>();
                serde_json::Value::Object(obj)
            })
            .collect();
        serde_json::Value::Array(records)
    }
}

#[cfg(test)]
mod tests {
    use super::{DataSet, DataType, Field, GroupKey, Schema, Value};
    use crate::error::DashboardError;

    fn sample_dataset() -> DataSet {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("city", DataType::Utf8),
        ]);
        DataSet::new(
            schema,
            vec![
                vec![Value::Int64(1), Value::Utf8("sao paulo".to_string())],
                vec![Value::Int64(2), Value::Null],
            ],
        )
    }

    #[test]
    fn require_reports_missing_column_with_available_names() {
        let ds = sample_dataset();
        assert_eq!(ds.schema.require("city").unwrap(), 1);
        match ds.schema.require("missing") {
            Err(DashboardError::MissingColumn { column, available }) => {
                assert_eq!(column, "missing");
                assert_eq!(available, vec!["id".to_string(), "city".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn column_values_yields_cells_in_row_order() {
        let ds = sample_dataset();
        let values: Vec<&Value> = ds.column_values("id").unwrap().collect();
        assert_eq!(values, vec![&Value::Int64(1), &Value::Int64(2)]);
    }

    #[test]
    fn integral_floats_share_a_key_with_integers() {
        assert_eq!(
            GroupKey::from_value(&Value::Float64(3.0)),
            GroupKey::from_value(&Value::Int64(3))
        );
        assert_ne!(
            GroupKey::from_value(&Value::Float64(3.5)),
            GroupKey::from_value(&Value::Int64(3))
        );
    }

    #[test]
    fn float_keys_order_numerically_and_null_sorts_last() {
        let mut keys = vec![
            GroupKey::Null,
            GroupKey::from_value(&Value::Float64(2.5)),
            GroupKey::from_value(&Value::Float64(-1.5)),
            GroupKey::from_value(&Value::Float64(0.25)),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                GroupKey::from_value(&Value::Float64(-1.5)),
                GroupKey::from_value(&Value::Float64(0.25)),
                GroupKey::from_value(&Value::Float64(2.5)),
                GroupKey::Null,
            ]
        );
    }

    #[test]
    fn json_export_maps_nulls_and_names() {
        let ds = sample_dataset();
        let json = ds.to_json_records();
        assert_eq!(
            json,
            serde_json::json!([
                {"id": 1, "city": "sao paulo"},
                {"id": 2, "city": null},
            ])
        );
    }

    #[test]
    fn head_keeps_schema_and_prefix() {
        let ds = sample_dataset();
        let out = ds.head(1);
        assert_eq!(out.schema, ds.schema);
        assert_eq!(out.row_count(), 1);
        assert!(ds.head(0).is_empty());
    }

    #[test]
    fn row_ops_keep_schema() {
        let ds = sample_dataset();
        let known = ds.filter_rows(|row| !row[1].is_null());
        assert_eq!(known.row_count(), 1);
        assert_eq!(known.schema, ds.schema);

        let doubled = ds.map_rows(|row| match row[0] {
            Value::Int64(n) => vec![Value::Int64(n * 2), row[1].clone()],
            _ => row.to_vec(),
        });
        assert_eq!(doubled.rows[1][0], Value::Int64(4));

        let total = ds.reduce_rows(0i64, |acc, row| match row[0] {
            Value::Int64(n) => acc + n,
            _ => acc,
        });
        assert_eq!(total, 3);
    }

    #[test]
    #[should_panic(expected = "does not match schema length")]
    fn map_rows_rejects_arity_change() {
        sample_dataset().map_rows(|row| row[..1].to_vec());
    }
}
