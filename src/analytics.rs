//! The three dashboard aggregates and headline metrics.
//!
//! Each function is pure: it reads a cleaned table and returns a small summary table. Empty
//! inputs produce empty outputs with the documented columns; missing input columns are
//! [`crate::DashboardError::MissingColumn`].

use chrono::Datelike;

use crate::error::DashboardResult;
use crate::processing::{
    group_by, reduce, sort_by, AggOp, Aggregation, GroupByOptions, NullKeys, ReduceOp, SortOrder,
};
use crate::types::{DataSet, DataType, Field, Schema, Value};

pub const ORDER_ID: &str = "order_id";
pub const PURCHASE_TIMESTAMP: &str = "order_purchase_timestamp";
pub const PAYMENT_VALUE: &str = "payment_value";
pub const PRODUCT_CATEGORY: &str = "product_category_name";
pub const PRICE: &str = "price";
pub const CUSTOMER_CITY: &str = "customer_city";

pub const MONTH_BUCKET: &str = "month_bucket";
pub const PAYMENT_VALUE_SUM: &str = "payment_value_sum";
pub const COUNT_PRODUCT: &str = "count_product";
pub const TOTAL_PRICE: &str = "total_price";
pub const REVENUE: &str = "revenue";
pub const CITY_COUNT: &str = "city_count";

/// Sum `payment_value` per calendar month of `order_purchase_timestamp`.
///
/// Output: `(month_bucket: Utf8 "YYYY-MM", payment_value_sum: Float64)`, one row per month
/// present, ascending. `YYYY-MM` sorts lexicographically in chronological order.
///
/// Rows whose purchase timestamp is missing (or was never coerced to a timestamp) have no
/// month and are left out, so the bucket sums add up to the payment total of timestamped rows.
pub fn monthly_payment_trend(orders_payments: &DataSet) -> DashboardResult<DataSet> {
    let ts_idx = orders_payments.schema.require(PURCHASE_TIMESTAMP)?;
    let pay_idx = orders_payments.schema.require(PAYMENT_VALUE)?;

    let buckets = DataSet::new(
        Schema::new(vec![
            Field::new(MONTH_BUCKET, DataType::Utf8),
            orders_payments.schema.fields[pay_idx].clone(),
        ]),
        orders_payments
            .rows
            .iter()
            .filter_map(|row| match &row[ts_idx] {
                Value::Timestamp(ts) => Some(vec![
                    Value::Utf8(format!("{:04}-{:02}", ts.year(), ts.month())),
                    row[pay_idx].clone(),
                ]),
                _ => None,
            })
            .collect(),
    );

    group_by(
        &buckets,
        &[MONTH_BUCKET],
        &[Aggregation::new(PAYMENT_VALUE, AggOp::Sum, PAYMENT_VALUE_SUM)],
        GroupByOptions {
            null_keys: NullKeys::Exclude,
        },
    )
}

/// Per product category: row count, summed price, and `revenue = total_price * count_product`.
///
/// Output: `(product_category_name, count_product: Int64, total_price: Float64,
/// revenue: Float64)`, sorted by `count_product` descending. Rows without a category are
/// dropped.
///
/// `revenue` multiplies the price *sum* by the row count. Downstream totals and rankings are
/// defined on this figure, so it is reproduced as-is rather than as a conventional revenue.
pub fn category_revenue(items_products: &DataSet) -> DashboardResult<DataSet> {
    let grouped = group_by(
        items_products,
        &[PRODUCT_CATEGORY],
        &[
            Aggregation::new(PRODUCT_CATEGORY, AggOp::Size, COUNT_PRODUCT),
            Aggregation::new(PRICE, AggOp::Sum, TOTAL_PRICE),
        ],
        GroupByOptions {
            null_keys: NullKeys::Exclude,
        },
    )?;

    let mut schema = grouped.schema.clone();
    schema.fields.push(Field::new(REVENUE, DataType::Float64));
    let rows = grouped
        .rows
        .into_iter()
        .map(|mut row| {
            let count = row[1].as_f64().unwrap_or(0.0);
            let total = row[2].as_f64().unwrap_or(0.0);
            row.push(Value::Float64(total * count));
            row
        })
        .collect();

    sort_by(&DataSet::new(schema, rows), COUNT_PRODUCT, SortOrder::Descending)
}

/// Number of customers per city.
///
/// Output: `(customer_city, city_count: Int64)`, sorted by `city_count` descending. Customers
/// without a city are not counted.
pub fn customer_city_counts(customers: &DataSet) -> DashboardResult<DataSet> {
    let grouped = group_by(
        customers,
        &[CUSTOMER_CITY],
        &[Aggregation::new(CUSTOMER_CITY, AggOp::Size, CITY_COUNT)],
        GroupByOptions {
            null_keys: NullKeys::Exclude,
        },
    )?;
    sort_by(&grouped, CITY_COUNT, SortOrder::Descending)
}

/// The `n` rows with the largest `column` values, largest first.
pub fn top_n(table: &DataSet, column: &str, n: usize) -> DashboardResult<DataSet> {
    Ok(sort_by(table, column, SortOrder::Descending)?.head(n))
}

/// Number of distinct non-null `order_id`s.
pub fn total_orders(orders: &DataSet) -> DashboardResult<usize> {
    orders.schema.require(ORDER_ID)?;
    match reduce(orders, ORDER_ID, ReduceOp::CountDistinct) {
        Some(Value::Int64(n)) => Ok(n as usize),
        _ => Ok(0),
    }
}

/// Sum of the `revenue` column of a [`category_revenue`] table (`0.0` when empty).
pub fn total_revenue(category_revenue: &DataSet) -> DashboardResult<f64> {
    category_revenue.schema.require(REVENUE)?;
    Ok(reduce(category_revenue, REVENUE, ReduceOp::Sum)
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0))
}
