//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_from_path`], which loads a file into an in-memory
//! [`crate::types::DataSet`].
//!
//! - If [`IngestionOptions::format`] is `None`, the format is inferred from the file extension.
//! - If [`IngestionOptions::schema`] is `None`, every source column is kept and column types are
//!   inferred; otherwise ingestion is schema-first.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{DashboardError, DashboardResult};
use crate::types::{DataSet, Schema};

use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};
use super::{csv, json};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// JSON array-of-objects or NDJSON.
    Json,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" | "ndjson" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// If `None`, keep all source columns and infer their types.
    pub schema: Option<Schema>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("schema_fields", &self.schema.as_ref().map(|s| s.fields.len()))
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            schema: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Unified ingestion entry point for path-based sources.
///
/// The dataset label reported to observers is the file stem. Use [`IngestionRequest`] to
/// choose a label explicitly.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column counts
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```no_run
/// use ecommerce_dashboard::ingestion::{ingest_from_path, IngestionOptions};
///
/// # fn main() -> Result<(), ecommerce_dashboard::DashboardError> {
/// // Uses `.csv` to select CSV ingestion; column types are inferred.
/// let orders = ingest_from_path("data_1_orders.csv", &IngestionOptions::default())?;
/// println!("rows={}", orders.row_count());
/// # Ok(())
/// # }
/// ```
///
/// Schema-first ingestion with an explicit format:
///
/// ```no_run
/// use ecommerce_dashboard::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions};
/// use ecommerce_dashboard::types::{DataType, Field, Schema};
///
/// # fn main() -> Result<(), ecommerce_dashboard::DashboardError> {
/// let opts = IngestionOptions {
///     format: Some(IngestionFormat::Csv),
///     schema: Some(Schema::new(vec![
///         Field::new("customer_id", DataType::Utf8),
///         Field::new("customer_city", DataType::Utf8),
///     ])),
///     ..Default::default()
/// };
/// let customers = ingest_from_path("customers_export", &opts)?;
/// println!("rows={}", customers.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> DashboardResult<DataSet> {
    let path = path.as_ref();
    let label = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();
    ingest_labeled(label, path, options)
}

fn ingest_labeled(label: String, path: &Path, options: &IngestionOptions) -> DashboardResult<DataSet> {
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = IngestionContext {
        dataset: label,
        path: path.to_path_buf(),
        format: fmt,
    };

    let result = match (fmt, options.schema.as_ref()) {
        (IngestionFormat::Csv, None) => csv::ingest_csv_from_path(path),
        (IngestionFormat::Csv, Some(schema)) => csv::ingest_csv_with_schema_from_path(path, schema),
        (IngestionFormat::Json, None) => json::ingest_json_from_path(path),
        (IngestionFormat::Json, Some(schema)) => json::ingest_json_with_schema_from_path(path, schema),
    };

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(ds) => obs.on_success(
                &ctx,
                IngestionStats {
                    rows: ds.row_count(),
                    columns: ds.schema.fields.len(),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn severity_for_error(e: &DashboardError) -> IngestionSeverity {
    match e {
        DashboardError::Io(_) => IngestionSeverity::Critical,
        DashboardError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        DashboardError::Json(err) if err.is_io() => IngestionSeverity::Critical,
        _ => IngestionSeverity::Error,
    }
}

fn infer_format_from_path(path: &Path) -> DashboardResult<IngestionFormat> {
    path.extension()
        .and_then(|s| s.to_str())
        .and_then(IngestionFormat::from_extension)
        .ok_or_else(|| DashboardError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
}

/// An owned, labeled ingestion request.
///
/// The pipeline builds one per source table so observers see `orders`, `payments`, ... rather
/// than file stems.
#[derive(Clone)]
pub struct IngestionRequest {
    /// Logical table name reported to observers.
    pub label: String,
    /// Path to the input file.
    pub path: PathBuf,
    /// Options controlling ingestion.
    pub options: IngestionOptions,
}

impl fmt::Debug for IngestionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionRequest")
            .field("label", &self.label)
            .field("path", &self.path)
            .field("options", &self.options)
            .finish()
    }
}

impl IngestionRequest {
    /// Create a request for `path`, reported to observers as `label`.
    pub fn new(label: impl Into<String>, path: impl Into<PathBuf>, options: IngestionOptions) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            options,
        }
    }

    /// Execute the request.
    pub fn run(&self) -> DashboardResult<DataSet> {
        ingest_labeled(self.label.clone(), &self.path, &self.options)
    }
}
