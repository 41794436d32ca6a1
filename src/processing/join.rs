//! Inner equi-join of two [`DataSet`]s (the Joiner stage).

use std::collections::HashMap;

use crate::error::DashboardResult;
use crate::types::{DataSet, Field, GroupKey, Schema, Value};

/// Options for [`inner_join`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOptions {
    /// Suffixes appended to non-key column names present on both sides, as (left, right).
    pub suffixes: (String, String),
}

impl Default for JoinOptions {
    fn default() -> Self {
        Self {
            suffixes: ("_x".to_string(), "_y".to_string()),
        }
    }
}

/// Inner join `left` and `right` where `left[left_key] == right[right_key]`.
///
/// - One output row per matching (left row, right row) pair; duplicate keys expand to the
///   cross product.
/// - Rows are emitted in left-row order; matches for one left row keep right-row order.
/// - Null keys never match, not even other null keys.
/// - When the two key columns have different types, keys compare on their text form, so an
///   `Int64` id `101` matches a `Utf8` id `"101"`.
/// - Output columns are all left columns followed by all right columns. When both key names
///   are equal the right key column is omitted. Other names present on both sides get the
///   configured suffixes.
///
/// Disjoint key sets yield an empty dataset with the full joined schema.
///
/// ```rust
/// use ecommerce_dashboard::processing::{inner_join, JoinOptions};
/// use ecommerce_dashboard::types::{DataSet, DataType, Field, Schema, Value};
///
/// let orders = DataSet::new(
///     Schema::new(vec![Field::new("order_id", DataType::Utf8)]),
///     vec![vec![Value::Utf8("a".into())], vec![Value::Utf8("b".into())]],
/// );
/// let payments = DataSet::new(
///     Schema::new(vec![
///         Field::new("order_id", DataType::Utf8),
///         Field::new("payment_value", DataType::Float64),
///     ]),
///     vec![vec![Value::Utf8("a".into()), Value::Float64(10.0)]],
/// );
///
/// let joined = inner_join(&orders, &payments, "order_id", "order_id", &JoinOptions::default()).unwrap();
/// assert_eq!(joined.row_count(), 1);
/// assert_eq!(joined.schema.field_names().collect::<Vec<_>>(), vec!["order_id", "payment_value"]);
/// ```
pub fn inner_join(
    left: &DataSet,
    right: &DataSet,
    left_key: &str,
    right_key: &str,
    options: &JoinOptions,
) -> DashboardResult<DataSet> {
    let left_idx = left.schema.require(left_key)?;
    let right_idx = right.schema.require(right_key)?;
    let merge_keys = left_key == right_key;

    let right_cols: Vec<usize> = (0..right.schema.fields.len())
        .filter(|&i| !(merge_keys && i == right_idx))
        .collect();
    let schema = joined_schema(left, right, &right_cols, left_idx, right_idx, merge_keys, options);

    let textual = left.schema.fields[left_idx].data_type != right.schema.fields[right_idx].data_type;
    let key_of = |value: &Value| {
        if textual && !value.is_null() {
            GroupKey::Str(value.to_string())
        } else {
            GroupKey::from_value(value)
        }
    };

    let mut index: HashMap<GroupKey, Vec<usize>> = HashMap::new();
    for (i, row) in right.rows.iter().enumerate() {
        let key = key_of(&row[right_idx]);
        if !key.is_null() {
            index.entry(key).or_default().push(i);
        }
    }

    let mut rows = Vec::new();
    for left_row in &left.rows {
        let key = key_of(&left_row[left_idx]);
        let Some(matches) = index.get(&key) else {
            continue;
        };
        for &r in matches {
            let right_row = &right.rows[r];
            let mut out = Vec::with_capacity(schema.fields.len());
            out.extend(left_row.iter().cloned());
            out.extend(right_cols.iter().map(|&c| right_row[c].clone()));
            rows.push(out);
        }
    }

    log::debug!(
        "inner join on {left_key}={right_key}: {} x {} rows -> {} rows",
        left.row_count(),
        right.row_count(),
        rows.len()
    );

    Ok(DataSet::new(schema, rows))
}

fn joined_schema(
    left: &DataSet,
    right: &DataSet,
    right_cols: &[usize],
    left_idx: usize,
    right_idx: usize,
    merge_keys: bool,
    options: &JoinOptions,
) -> Schema {
    let (left_suffix, right_suffix) = &options.suffixes;

    // A name collides when it appears on both sides and is not the shared join key.
    let collides_left = |i: usize, name: &str| {
        !(merge_keys && i == left_idx)
            && right_cols.iter().any(|&c| right.schema.fields[c].name == name)
    };
    let collides_right = |c: usize, name: &str| {
        !(merge_keys && c == right_idx) && left.schema.index_of(name).is_some()
    };

    let mut fields = Vec::with_capacity(left.schema.fields.len() + right_cols.len());
    for (i, f) in left.schema.fields.iter().enumerate() {
        let name = if collides_left(i, &f.name) {
            format!("{}{left_suffix}", f.name)
        } else {
            f.name.clone()
        };
        fields.push(Field::new(name, f.data_type.clone()));
    }
    for &c in right_cols {
        let f = &right.schema.fields[c];
        let name = if collides_right(c, &f.name) {
            format!("{}{right_suffix}", f.name)
        } else {
            f.name.clone()
        };
        fields.push(Field::new(name, f.data_type.clone()));
    }

    Schema::new(fields)
}

#[cfg(test)]
mod tests {
    use super::{inner_join, JoinOptions};
    use crate::error::DashboardError;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn s(v: &str) -> Value {
        Value::Utf8(v.to_string())
    }

    fn items() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("order_id", DataType::Utf8),
                Field::new("product_id", DataType::Utf8),
                Field::new("price", DataType::Float64),
            ]),
            vec![
                vec![s("o1"), s("p1"), Value::Float64(10.0)],
                vec![s("o2"), s("p2"), Value::Float64(20.0)],
                vec![s("o3"), s("p9"), Value::Float64(30.0)],
                vec![s("o4"), Value::Null, Value::Float64(40.0)],
            ],
        )
    }

    fn products() -> DataSet {
        DataSet::new(
            Schema::new(vec![
                Field::new("product_id", DataType::Utf8),
                Field::new("product_category_name", DataType::Utf8),
                Field::new("price", DataType::Float64),
            ]),
            vec![
                vec![s("p1"), s("beleza_saude"), Value::Float64(9.0)],
                vec![s("p2"), s("esporte_lazer"), Value::Float64(19.0)],
                vec![Value::Null, s("orphan"), Value::Null],
            ],
        )
    }

    #[test]
    fn shared_key_appears_once_and_collisions_are_suffixed() {
        let out = inner_join(&items(), &products(), "product_id", "product_id", &JoinOptions::default())
            .unwrap();
        let names: Vec<&str> = out.schema.field_names().collect();
        assert_eq!(
            names,
            vec!["order_id", "product_id", "price_x", "product_category_name", "price_y"]
        );
        assert_eq!(
            out.rows,
            vec![
                vec![s("o1"), s("p1"), Value::Float64(10.0), s("beleza_saude"), Value::Float64(9.0)],
                vec![s("o2"), s("p2"), Value::Float64(20.0), s("esporte_lazer"), Value::Float64(19.0)],
            ]
        );
    }

    #[test]
    fn null_keys_never_match() {
        let out = inner_join(&items(), &products(), "product_id", "product_id", &JoinOptions::default())
            .unwrap();
        assert!(out.rows.iter().all(|row| !row[1].is_null()));
    }

    #[test]
    fn differently_named_keys_are_both_kept() {
        let left = DataSet::new(
            Schema::new(vec![Field::new("id", DataType::Int64)]),
            vec![vec![Value::Int64(1)], vec![Value::Int64(2)]],
        );
        let right = DataSet::new(
            Schema::new(vec![
                Field::new("ref", DataType::Float64),
                Field::new("id", DataType::Utf8),
            ]),
            vec![vec![Value::Float64(2.0), s("two")]],
        );
        let out = inner_join(&left, &right, "id", "ref", &JoinOptions::default()).unwrap();
        let names: Vec<&str> = out.schema.field_names().collect();
        assert_eq!(names, vec!["id_x", "ref", "id_y"]);
        assert_eq!(out.rows, vec![vec![Value::Int64(2), Value::Float64(2.0), s("two")]]);
    }

    #[test]
    fn duplicate_keys_expand_to_cross_product() {
        let left = DataSet::new(
            Schema::new(vec![Field::new("k", DataType::Utf8), Field::new("l", DataType::Int64)]),
            vec![
                vec![s("a"), Value::Int64(1)],
                vec![s("a"), Value::Int64(2)],
            ],
        );
        let right = DataSet::new(
            Schema::new(vec![Field::new("k", DataType::Utf8), Field::new("r", DataType::Int64)]),
            vec![
                vec![s("a"), Value::Int64(10)],
                vec![s("a"), Value::Int64(20)],
                vec![s("a"), Value::Int64(30)],
            ],
        );
        let out = inner_join(&left, &right, "k", "k", &JoinOptions::default()).unwrap();
        assert_eq!(out.row_count(), 6);
        assert_eq!(out.rows[0], vec![s("a"), Value::Int64(1), Value::Int64(10)]);
        assert_eq!(out.rows[5], vec![s("a"), Value::Int64(2), Value::Int64(30)]);
    }

    #[test]
    fn disjoint_keys_yield_empty_table_with_schema() {
        let right = DataSet::new(products().schema, vec![vec![s("zzz"), s("x"), Value::Null]]);
        let out = inner_join(&items(), &right, "product_id", "product_id", &JoinOptions::default())
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(out.schema.fields.len(), 5);
    }

    #[test]
    fn missing_key_column_is_an_error() {
        let err = inner_join(&items(), &products(), "sku", "product_id", &JoinOptions::default())
            .unwrap_err();
        assert!(matches!(err, DashboardError::MissingColumn { ref column, .. } if column == "sku"));
    }

    #[test]
    fn keys_of_different_types_match_on_text() {
        let left = DataSet::new(
            Schema::new(vec![Field::new("product_id", DataType::Int64)]),
            vec![vec![Value::Int64(101)], vec![Value::Int64(7)], vec![Value::Null]],
        );
        let right = DataSet::new(
            Schema::new(vec![
                Field::new("product_id", DataType::Utf8),
                Field::new("product_category_name", DataType::Utf8),
            ]),
            vec![
                vec![s("101"), s("perfumaria")],
                vec![s("007"), s("bebes")],
                vec![Value::Null, s("orphan")],
            ],
        );

        let out = inner_join(&left, &right, "product_id", "product_id", &JoinOptions::default())
            .unwrap();
        assert_eq!(out.rows, vec![vec![Value::Int64(101), s("perfumaria")]]);
    }
}
