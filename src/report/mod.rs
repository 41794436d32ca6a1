//! HTML dashboard rendering.
//!
//! The report is one self-contained page: headline metrics, three inline SVG charts, and the
//! conclusions derived from the data.

pub mod currency;
mod html;
pub mod narrative;
pub mod svg;

pub use currency::{group_thousands, CurrencyFormat, SUPPORTED_LOCALES};
pub use narrative::conclusions;
pub use svg::escape as escape_html;

use crate::analytics::{
    top_n, CITY_COUNT, CUSTOMER_CITY, MONTH_BUCKET, PAYMENT_VALUE_SUM, PRODUCT_CATEGORY, REVENUE,
};
use crate::error::DashboardResult;
use crate::pipeline::Summary;
use crate::types::DataSet;
use html::{Metric, Section};
use narrative::label_of;
use svg::{bar_chart, line_chart, ChartPoint, ChartText};

const TREND_COLOR: &str = "#72BCD4";
const CATEGORY_PALETTE: &[&str] = &[
    "#D3D3D3", "#72BCD4", "#FFA07A", "#90EE90", "#DDA0DD", "#FFD700", "#FF6347", "#4682B4",
];
const CITY_PALETTE: &[&str] = &[
    "#4682B4", "#5F9EA0", "#6495ED", "#87CEEB", "#B0C4DE", "#ADD8E6", "#AFEEEE", "#E0FFFF",
];

/// Presentation settings.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    pub hero_image: Option<String>,
    pub currency: CurrencyFormat,
    /// Bars shown in the category and city charts.
    pub top_n: usize,
}

fn chart_points(
    table: &DataSet,
    label: &str,
    value: &str,
    annotate: impl Fn(f64) -> String,
) -> DashboardResult<Vec<ChartPoint>> {
    let l = table.schema.require(label)?;
    let v = table.schema.require(value)?;
    Ok(table
        .rows
        .iter()
        .map(|row| {
            let value = row[v].as_f64().unwrap_or(0.0);
            ChartPoint {
                label: label_of(&row[l]),
                value,
                annotation: annotate(value),
            }
        })
        .collect())
}

/// Render `summary` as a complete HTML document.
pub fn render(summary: &Summary, options: &ReportOptions) -> DashboardResult<String> {
    let money = |v: f64| options.currency.format(v);

    let trend = chart_points(&summary.monthly_payments, MONTH_BUCKET, PAYMENT_VALUE_SUM, money)?;
    let categories = chart_points(
        &top_n(&summary.category_revenue, REVENUE, options.top_n)?,
        PRODUCT_CATEGORY,
        REVENUE,
        money,
    )?;
    let cities = chart_points(
        &top_n(&summary.city_counts, CITY_COUNT, options.top_n)?,
        CUSTOMER_CITY,
        CITY_COUNT,
        |v| group_thousands(v as i64),
    )?;

    let sections = [
        Section {
            heading: "Daily Orders",
            metrics: vec![
                Metric {
                    label: "Total orders",
                    value: group_thousands(summary.total_orders as i64),
                },
                Metric {
                    label: "Total Revenue",
                    value: money(summary.total_revenue),
                },
            ],
            charts: vec![line_chart(
                ChartText {
                    title: "Payment Value based on Purchase Time",
                    x_label: "Purchase Time",
                    y_label: "Payment Value",
                },
                &trend,
                TREND_COLOR,
            )],
        },
        Section {
            heading: "Best Performing Product",
            metrics: Vec::new(),
            charts: vec![bar_chart(
                ChartText {
                    title: "Best Performing Product by Revenue",
                    x_label: "Product Category",
                    y_label: "Revenue",
                },
                &categories,
                CATEGORY_PALETTE,
            )],
        },
        Section {
            heading: "Top Customer Cities",
            metrics: Vec::new(),
            charts: vec![bar_chart(
                ChartText {
                    title: "Number of Customers by City",
                    x_label: "City",
                    y_label: "Customers",
                },
                &cities,
                CITY_PALETTE,
            )],
        },
    ];

    let lines = conclusions(summary, &options.currency)?;
    log::debug!(
        "rendering report: {} months, {} categories, {} cities",
        trend.len(),
        categories.len(),
        cities.len()
    );
    Ok(html::page(
        &options.title,
        options.hero_image.as_deref(),
        &sections,
        &lines,
    ))
}

#[cfg(test)]
mod tests {
    use super::{render, CurrencyFormat, ReportOptions};
    use crate::pipeline::Summary;
    use crate::types::{DataSet, DataType, Field, Schema, Value};

    fn s(v: &str) -> Value {
        Value::Utf8(v.to_string())
    }

    fn summary() -> Summary {
        let categories = (0..12)
            .map(|i| {
                vec![
                    s(&format!("cat_{i}")),
                    Value::Int64(1),
                    Value::Float64(i as f64),
                    Value::Float64(i as f64),
                ]
            })
            .collect();
        Summary {
            monthly_payments: DataSet::new(
                Schema::new(vec![
                    Field::new("month_bucket", DataType::Utf8),
                    Field::new("payment_value_sum", DataType::Float64),
                ]),
                vec![vec![s("2017-11"), Value::Float64(1234567.891)]],
            ),
            category_revenue: DataSet::new(
                Schema::new(vec![
                    Field::new("product_category_name", DataType::Utf8),
                    Field::new("count_product", DataType::Int64),
                    Field::new("total_price", DataType::Float64),
                    Field::new("revenue", DataType::Float64),
                ]),
                categories,
            ),
            city_counts: DataSet::new(
                Schema::new(vec![
                    Field::new("customer_city", DataType::Utf8),
                    Field::new("city_count", DataType::Int64),
                ]),
                vec![vec![s("<script>"), Value::Int64(2048)]],
            ),
            total_orders: 99441,
            total_revenue: 66.0,
        }
    }

    fn options() -> ReportOptions {
        ReportOptions {
            title: "E-Commerce Sales".to_string(),
            hero_image: Some("https://example.com/logo.png?a=1&b=2".to_string()),
            currency: CurrencyFormat::new("IDR", "id_ID").unwrap(),
            top_n: 8,
        }
    }

    #[test]
    fn page_has_sections_metrics_and_charts() {
        let html = render(&summary(), &options()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        for heading in ["Daily Orders", "Best Performing Product", "Top Customer Cities", "Conclusions"] {
            assert!(html.contains(&format!("<h2>{heading}</h2>")), "{heading}");
        }
        assert!(html.contains("99,441"));
        assert!(html.contains("Rp1.234.567,89"));
        assert!(html.contains("2,048"));
        assert_eq!(html.matches("<svg").count(), 3);
        assert_eq!(html.matches("<li>").count(), 3);
        assert!(html.contains("src=\"https://example.com/logo.png?a=1&amp;b=2\""));
    }

    #[test]
    fn category_chart_is_limited_to_top_n_by_revenue() {
        let html = render(&summary(), &options()).unwrap();
        assert_eq!(html.matches("<rect").count(), 8 + 1);
        assert!(html.contains(">cat_11</text>"));
        assert!(!html.contains(">cat_3</text>"));
    }

    #[test]
    fn user_text_is_escaped() {
        let html = render(&summary(), &options()).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
