//! Group-by aggregation for [`DataSet`].

use std::collections::BTreeMap;

use crate::error::{DashboardError, DashboardResult};
use crate::types::{DataSet, DataType, Field, GroupKey, Schema, Value};

/// Per-group aggregate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggOp {
    /// Number of rows in the group (nulls included). Produces `Int64`.
    Size,
    /// Number of non-null values of the column in the group. Produces `Int64`.
    Count,
    /// Sum of the column's non-null numeric values. Produces `Float64`; an all-null group
    /// sums to `0.0`.
    Sum,
}

/// One output column of a [`group_by`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    /// Input column the aggregate reads.
    pub column: String,
    /// Aggregate function.
    pub op: AggOp,
    /// Output column name.
    pub output: String,
}

impl Aggregation {
    pub fn new(column: impl Into<String>, op: AggOp, output: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            op,
            output: output.into(),
        }
    }
}

/// What to do with rows whose group key contains a null.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullKeys {
    /// Null is a group of its own, ordered after every non-null key.
    #[default]
    Include,
    /// Rows with a null key are dropped before grouping.
    Exclude,
}

/// Options for [`group_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupByOptions {
    pub null_keys: NullKeys,
}

enum Acc {
    Rows(i64),
    NonNull(i64),
    Sum(f64),
}

/// Partition rows by the values of `keys` and compute `aggregations` per partition.
///
/// Output columns are the key columns (original types) followed by one column per
/// aggregation; one row per group, ordered by ascending key. An empty input yields an empty
/// output with the same columns.
///
/// Errors if a key or aggregation column is missing, or if [`AggOp::Sum`] targets a
/// non-numeric column.
pub fn group_by(
    dataset: &DataSet,
    keys: &[&str],
    aggregations: &[Aggregation],
    options: GroupByOptions,
) -> DashboardResult<DataSet> {
    let key_idxs = keys
        .iter()
        .map(|k| dataset.schema.require(k))
        .collect::<DashboardResult<Vec<_>>>()?;

    let mut agg_idxs = Vec::with_capacity(aggregations.len());
    for agg in aggregations {
        let idx = dataset.schema.require(&agg.column)?;
        if agg.op == AggOp::Sum {
            let data_type = &dataset.schema.fields[idx].data_type;
            if !matches!(data_type, DataType::Int64 | DataType::Float64 | DataType::Bool) {
                return Err(DashboardError::SchemaMismatch {
                    message: format!(
                        "cannot sum column '{}' of type {data_type:?}",
                        agg.column
                    ),
                });
            }
        }
        agg_idxs.push(idx);
    }

    let mut groups: BTreeMap<Vec<GroupKey>, (Vec<Value>, Vec<Acc>)> = BTreeMap::new();
    for row in &dataset.rows {
        let group_key: Vec<GroupKey> = key_idxs.iter().map(|&i| GroupKey::from_value(&row[i])).collect();
        if options.null_keys == NullKeys::Exclude && group_key.iter().any(GroupKey::is_null) {
            continue;
        }

        let (_, accs) = groups.entry(group_key).or_insert_with(|| {
            let key_values = key_idxs.iter().map(|&i| row[i].clone()).collect();
            let accs = aggregations
                .iter()
                .map(|agg| match agg.op {
                    AggOp::Size => Acc::Rows(0),
                    AggOp::Count => Acc::NonNull(0),
                    AggOp::Sum => Acc::Sum(0.0),
                })
                .collect();
            (key_values, accs)
        });

        for (acc, &idx) in accs.iter_mut().zip(&agg_idxs) {
            let value = &row[idx];
            match acc {
                Acc::Rows(n) => *n += 1,
                Acc::NonNull(n) => {
                    if !value.is_null() {
                        *n += 1;
                    }
                }
                Acc::Sum(total) => {
                    if let Some(v) = value.as_f64() {
                        *total += v;
                    }
                }
            }
        }
    }

    let mut fields: Vec<Field> = key_idxs
        .iter()
        .map(|&i| dataset.schema.fields[i].clone())
        .collect();
    fields.extend(aggregations.iter().map(|agg| {
        let data_type = match agg.op {
            AggOp::Size | AggOp::Count => DataType::Int64,
            AggOp::Sum => DataType::Float64,
        };
        Field::new(agg.output.clone(), data_type)
    }));

    let rows = groups
        .into_values()
        .map(|(mut key_values, accs)| {
            key_values.extend(accs.into_iter().map(|acc| match acc {
                Acc::Rows(n) | Acc::NonNull(n) => Value::Int64(n),
                Acc::Sum(total) => Value::Float64(total),
            }));
            key_values
        })
        .collect();

    Ok(DataSet::new(Schema::new(fields), rows))
}
