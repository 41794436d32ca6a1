//! Whole-column reductions for [`crate::types::DataSet`].

use std::collections::HashSet;

use crate::types::{DataSet, DataType, GroupKey, Value};

/// Built-in reduction operations over a single column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    /// Count all rows (including nulls).
    Count,
    /// Count distinct non-null values.
    CountDistinct,
    /// Sum numeric values, ignoring nulls. An `Int64` sum that overflows is `Null`.
    Sum,
    /// Minimum numeric value, ignoring nulls.
    Min,
    /// Maximum numeric value, ignoring nulls.
    Max,
}

/// Reduce a column using a built-in [`ReduceOp`].
///
/// - Returns `None` if `column` does not exist in the schema.
/// - `Count` and `CountDistinct` return `Some(Value::Int64(_))`.
/// - `Sum`/`Min`/`Max` keep the column type (`Int64` or `Float64`) and return
///   `Some(Value::Null)` if there are no non-null values or the column is not numeric.
pub fn reduce(dataset: &DataSet, column: &str, op: ReduceOp) -> Option<Value> {
    let idx = dataset.schema.index_of(column)?;

    let out = match op {
        ReduceOp::Count => Value::Int64(dataset.row_count() as i64),
        ReduceOp::CountDistinct => {
            let distinct = dataset.reduce_rows(HashSet::new(), |mut seen, row| {
                let key = GroupKey::from_value(&row[idx]);
                if !key.is_null() {
                    seen.insert(key);
                }
                seen
            });
            Value::Int64(distinct.len() as i64)
        }
        ReduceOp::Sum | ReduceOp::Min | ReduceOp::Max => {
            match dataset.schema.fields[idx].data_type {
                DataType::Int64 => fold_numeric(
                    dataset,
                    idx,
                    op,
                    |v| match v {
                        Value::Int64(x) => Some(*x),
                        _ => None,
                    },
                    i64::checked_add,
                )
                .map(Value::Int64)
                .unwrap_or(Value::Null),
                DataType::Float64 => fold_numeric(
                    dataset,
                    idx,
                    op,
                    |v| match v {
                        Value::Float64(x) => Some(*x),
                        _ => None,
                    },
                    |a, b| Some(a + b),
                )
                .map(Value::Float64)
                .unwrap_or(Value::Null),
                _ => Value::Null,
            }
        }
    };
    Some(out)
}

#[derive(Clone, Copy)]
enum Fold<T> {
    Empty,
    Value(T),
    Overflow,
}

// `None` for an empty column and for a sum that does not fit `T`.
fn fold_numeric<T, F, A>(dataset: &DataSet, idx: usize, op: ReduceOp, extract: F, add: A) -> Option<T>
where
    T: Copy + PartialOrd,
    F: Fn(&Value) -> Option<T>,
    A: Fn(T, T) -> Option<T>,
{
    let folded = dataset.reduce_rows(Fold::Empty, |acc: Fold<T>, row| {
        let Some(v) = extract(&row[idx]) else {
            return acc;
        };
        match (op, acc) {
            (_, Fold::Overflow) => Fold::Overflow,
            (_, Fold::Empty) => Fold::Value(v),
            (ReduceOp::Sum, Fold::Value(a)) => add(a, v).map_or(Fold::Overflow, Fold::Value),
            (ReduceOp::Min, Fold::Value(a)) => Fold::Value(if v < a { v } else { a }),
            (ReduceOp::Max, Fold::Value(a)) => Fold::Value(if v > a { v } else { a }),
            (ReduceOp::Count | ReduceOp::CountDistinct, Fold::Value(a)) => Fold::Value(a),
        }
    });
    match folded {
        Fold::Value(v) => Some(v),
        Fold::Overflow => {
            log::debug!("sum over column {idx} overflowed; reducing to null");
            None
        }
        Fold::Empty => None,
    }
}
