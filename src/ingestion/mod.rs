//! Loader: ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - keeps every source column and infers column types, unless a schema is supplied
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under [`csv`] and [`json`].

pub mod csv;
mod infer;
pub mod json;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, LogObserver,
};
pub use unified::{ingest_from_path, IngestionFormat, IngestionOptions, IngestionRequest};
