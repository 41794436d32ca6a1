//! Row ordering for [`DataSet`].

use std::cmp::Ordering;

use crate::error::DashboardResult;
use crate::types::{DataSet, GroupKey, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Return a copy of `dataset` with rows ordered by `column`.
///
/// The sort is stable, so rows with equal values keep their relative order. Numbers compare
/// numerically (integers and floats together), text lexicographically, and nulls always go
/// last regardless of direction.
pub fn sort_by(dataset: &DataSet, column: &str, order: SortOrder) -> DashboardResult<DataSet> {
    let idx = dataset.schema.require(column)?;

    let mut rows = dataset.rows.clone();
    rows.sort_by(|a, b| {
        let (a, b) = (&a[idx], &b[idx]);
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ord = compare_values(a, b);
                match order {
                    SortOrder::Ascending => ord,
                    SortOrder::Descending => ord.reverse(),
                }
            }
        }
    });

    Ok(DataSet::new(dataset.schema.clone(), rows))
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => GroupKey::from_value(a).cmp(&GroupKey::from_value(b)),
    }
}
