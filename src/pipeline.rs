//! Explicit `load -> join -> clean -> aggregate` composition.
//!
//! Each stage takes the previous stage's output as an argument and returns a new value; no
//! stage reads ambient state. Any failure is tagged with its [`PipelineStage`] and ends the
//! run; there is no partial-results mode.

use std::path::PathBuf;

use crate::analytics;
use crate::error::{DashboardError, DashboardResult, PipelineStage};
use crate::ingestion::{IngestionOptions, IngestionRequest};
use crate::processing::{inner_join, to_datetime, to_float, JoinOptions};
use crate::types::DataSet;

/// Timestamp columns of the orders table coerced by [`clean`].
pub const ORDER_TIMESTAMP_COLUMNS: [&str; 5] = [
    "order_purchase_timestamp",
    "order_approved_at",
    "order_delivered_carrier_date",
    "order_delivered_customer_date",
    "order_estimated_delivery_date",
];

/// Numeric columns of the items/products table coerced by [`clean`].
pub const ITEM_FLOAT_COLUMNS: [&str; 2] = ["price", "freight_value"];

/// Locations of the five source tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub orders: PathBuf,
    pub payments: PathBuf,
    pub items: PathBuf,
    pub products: PathBuf,
    pub customers: PathBuf,
}

/// The five tables as read from their sources.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTables {
    pub orders: DataSet,
    pub payments: DataSet,
    pub items: DataSet,
    pub products: DataSet,
    pub customers: DataSet,
}

/// The two joined tables.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedTables {
    /// `orders ⨝ payments` on `order_id`.
    pub orders_payments: DataSet,
    /// `items ⨝ products` on `product_id`.
    pub items_products: DataSet,
}

/// Everything the report consumes.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// `(month_bucket, payment_value_sum)`, ascending by month.
    pub monthly_payments: DataSet,
    /// `(product_category_name, count_product, total_price, revenue)`.
    pub category_revenue: DataSet,
    /// `(customer_city, city_count)`.
    pub city_counts: DataSet,
    /// Distinct `order_id`s in the orders table.
    pub total_orders: usize,
    /// Sum of `category_revenue.revenue`.
    pub total_revenue: f64,
}

impl Summary {
    /// Export the summary as a JSON document.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "total_orders": self.total_orders,
            "total_revenue": self.total_revenue,
            "monthly_payments": self.monthly_payments.to_json_records(),
            "category_revenue": self.category_revenue.to_json_records(),
            "city_counts": self.city_counts.to_json_records(),
        })
    }
}

/// Read all five tables. The first failing read aborts the stage.
pub fn load(sources: &Sources, options: &IngestionOptions) -> DashboardResult<RawTables> {
    let read = |label: &str, path: &PathBuf| {
        IngestionRequest::new(label, path.clone(), options.clone())
            .run()
            .map_err(|e| e.in_stage(PipelineStage::Load))
    };

    let tables = RawTables {
        orders: read("orders", &sources.orders)?,
        payments: read("payments", &sources.payments)?,
        items: read("items", &sources.items)?,
        products: read("products", &sources.products)?,
        customers: read("customers", &sources.customers)?,
    };
    log::info!(
        "loaded orders={} payments={} items={} products={} customers={}",
        tables.orders.row_count(),
        tables.payments.row_count(),
        tables.items.row_count(),
        tables.products.row_count(),
        tables.customers.row_count()
    );
    Ok(tables)
}

/// Inner-join orders with payments and items with products.
pub fn join(raw: &RawTables) -> DashboardResult<JoinedTables> {
    let opts = JoinOptions::default();
    let in_stage = |e: DashboardError| e.in_stage(PipelineStage::Join);
    let joined = JoinedTables {
        orders_payments: inner_join(&raw.orders, &raw.payments, "order_id", "order_id", &opts)
            .map_err(in_stage)?,
        items_products: inner_join(&raw.items, &raw.products, "product_id", "product_id", &opts)
            .map_err(in_stage)?,
    };

    log::info!(
        "joined orders_payments={} items_products={}",
        joined.orders_payments.row_count(),
        joined.items_products.row_count()
    );
    Ok(joined)
}

/// Coerce order timestamps to datetimes and item price/freight to floats. No rows are dropped.
pub fn clean(joined: JoinedTables) -> DashboardResult<JoinedTables> {
    let in_stage = |e: DashboardError| e.in_stage(PipelineStage::Clean);
    let cleaned = JoinedTables {
        orders_payments: to_datetime(&joined.orders_payments, &ORDER_TIMESTAMP_COLUMNS)
            .map_err(in_stage)?,
        items_products: to_float(&joined.items_products, &ITEM_FLOAT_COLUMNS).map_err(in_stage)?,
    };

    log::info!("cleaned joined tables");
    Ok(cleaned)
}

/// Compute the three aggregates and the headline metrics.
pub fn aggregate(raw: &RawTables, cleaned: &JoinedTables) -> DashboardResult<Summary> {
    let in_stage = |e: DashboardError| e.in_stage(PipelineStage::Aggregate);
    let category_revenue =
        analytics::category_revenue(&cleaned.items_products).map_err(in_stage)?;
    let summary = Summary {
        monthly_payments: analytics::monthly_payment_trend(&cleaned.orders_payments)
            .map_err(in_stage)?,
        total_revenue: analytics::total_revenue(&category_revenue).map_err(in_stage)?,
        category_revenue,
        city_counts: analytics::customer_city_counts(&raw.customers).map_err(in_stage)?,
        total_orders: analytics::total_orders(&raw.orders).map_err(in_stage)?,
    };

    log::info!(
        "aggregated months={} categories={} cities={} total_orders={}",
        summary.monthly_payments.row_count(),
        summary.category_revenue.row_count(),
        summary.city_counts.row_count(),
        summary.total_orders
    );
    Ok(summary)
}

/// Run every stage in order.
pub fn run(sources: &Sources, options: &IngestionOptions) -> DashboardResult<Summary> {
    let raw = load(sources, options)?;
    let joined = join(&raw)?;
    let cleaned = clean(joined)?;
    aggregate(&raw, &cleaned)
}
