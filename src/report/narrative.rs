//! Data-driven conclusion sentences.

use crate::analytics::{
    CITY_COUNT, COUNT_PRODUCT, CUSTOMER_CITY, MONTH_BUCKET, PAYMENT_VALUE_SUM, PRODUCT_CATEGORY,
    REVENUE,
};
use crate::error::DashboardResult;
use crate::pipeline::Summary;
use crate::report::currency::{group_thousands, CurrencyFormat};
use crate::types::{DataSet, Value};

/// Label used for a missing category or city.
pub const UNKNOWN_LABEL: &str = "(unknown)";

pub(crate) fn label_of(value: &Value) -> String {
    if value.is_null() {
        UNKNOWN_LABEL.to_string()
    } else {
        value.to_string()
    }
}

fn pairs(table: &DataSet, label: &str, value: &str) -> DashboardResult<Vec<(String, f64)>> {
    let l = table.schema.require(label)?;
    let v = table.schema.require(value)?;
    Ok(table
        .rows
        .iter()
        .map(|row| (label_of(&row[l]), row[v].as_f64().unwrap_or(0.0)))
        .collect())
}

/// Peak month and the steepest month-over-month drop.
pub fn payment_trend(summary: &Summary, currency: &CurrencyFormat) -> DashboardResult<String> {
    let months = pairs(&summary.monthly_payments, MONTH_BUCKET, PAYMENT_VALUE_SUM)?;
    let Some((peak_month, peak)) = months
        .iter()
        .reduce(|best, next| if next.1 > best.1 { next } else { best })
        .cloned()
    else {
        return Ok("No payment data is available.".to_string());
    };

    let mut text = format!(
        "Payments peaked in {peak_month} at {}.",
        currency.format(peak)
    );
    let drop = months
        .windows(2)
        .map(|w| (&w[0], &w[1], w[0].1 - w[1].1))
        .filter(|(_, _, d)| *d > 0.0)
        .max_by(|a, b| a.2.total_cmp(&b.2));
    match drop {
        Some((prev, cur, d)) => text.push_str(&format!(
            " The steepest month-over-month drop came in {}, {} lower than {}.",
            cur.0,
            currency.format(d),
            prev.0
        )),
        None => text.push_str(" No month-over-month drop was recorded."),
    }
    Ok(text)
}

/// The top category by revenue.
pub fn best_category(summary: &Summary, currency: &CurrencyFormat) -> DashboardResult<String> {
    let table = &summary.category_revenue;
    let name = table.schema.require(PRODUCT_CATEGORY)?;
    let count = table.schema.require(COUNT_PRODUCT)?;
    let revenue = table.schema.require(REVENUE)?;

    let value = |row: &Vec<Value>| row[revenue].as_f64().unwrap_or(0.0);
    // First row wins ties.
    let best = table
        .rows
        .iter()
        .reduce(|best, next| if value(next) > value(best) { next } else { best });
    Ok(match best {
        Some(row) => format!(
            "{} is the best performing category with {} in revenue across {} items sold.",
            label_of(&row[name]),
            currency.format(row[revenue].as_f64().unwrap_or(0.0)),
            group_thousands(row[count].as_f64().unwrap_or(0.0) as i64)
        ),
        None => "No product data is available.".to_string(),
    })
}

/// The city with the most customers.
pub fn top_city(summary: &Summary) -> DashboardResult<String> {
    let cities = pairs(&summary.city_counts, CUSTOMER_CITY, CITY_COUNT)?;
    let top = cities
        .iter()
        .reduce(|best, next| if next.1 > best.1 { next } else { best });
    Ok(match top {
        Some((city, n)) => format!(
            "{city} has the most customers, with {} of them.",
            group_thousands(*n as i64)
        ),
        None => "No customer data is available.".to_string(),
    })
}

/// All three conclusions in report order.
pub fn conclusions(summary: &Summary, currency: &CurrencyFormat) -> DashboardResult<Vec<String>> {
    Ok(vec![
        payment_trend(summary, currency)?,
        best_category(summary, currency)?,
        top_city(summary)?,
    ])
}
