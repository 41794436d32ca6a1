//! `ecommerce-dashboard` turns five e-commerce CSV exports (orders, payments, order items,
//! products, customers) into a single-page HTML sales dashboard.
//!
//! The work is an explicit four-stage pipeline over in-memory [`types::DataSet`]s:
//!
//! 1. **load**: [`ingestion::ingest_from_path`] reads CSV or JSON, keeping every column and
//!    inferring types (or applying a caller-supplied [`types::Schema`])
//! 2. **join**: [`processing::inner_join`] on `order_id` and `product_id`
//! 3. **clean**: [`processing::to_datetime`] / [`processing::to_float`] coerce columns, turning
//!    unparseable cells into [`types::Value::Null`]
//! 4. **aggregate**: [`analytics`] computes the monthly payment trend, per-category revenue and
//!    per-city customer counts
//!
//! [`pipeline::run`] composes the stages; [`report::render`] draws the result.
//!
//! ## Quick example
//!
//! ```no_run
//! use ecommerce_dashboard::config::DashboardConfig;
//! use ecommerce_dashboard::ingestion::IngestionOptions;
//! use ecommerce_dashboard::{pipeline, report};
//!
//! # fn main() -> Result<(), ecommerce_dashboard::DashboardError> {
//! let cfg = DashboardConfig {
//!     data_dir: "data".into(),
//!     ..DashboardConfig::default()
//! };
//! let summary = pipeline::run(&cfg.sources(), &IngestionOptions::default())?;
//! let html = report::render(&summary, &cfg.report_options()?)?;
//! std::fs::write(&cfg.output, html)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: CSV/JSON loading, type inference and ingestion observers
//! - [`types`]: schema, values and the row-oriented dataset
//! - [`processing`]: join, coercion, group-by, sort and reduce
//! - [`analytics`]: the dashboard aggregates
//! - [`pipeline`]: stage composition
//! - [`report`]: HTML/SVG rendering and currency formatting
//! - [`config`]: run configuration
//! - [`error`]: the crate error type

pub mod analytics;
pub mod config;
pub mod error;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod types;

pub use error::{DashboardError, DashboardResult, PipelineStage};
