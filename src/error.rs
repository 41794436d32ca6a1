use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type used across the crate.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Pipeline stage a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Reading the five source tables.
    Load,
    /// Inner joins (orders/payments, items/products).
    Join,
    /// Column type coercion.
    Clean,
    /// Group-by aggregations and headline metrics.
    Aggregate,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Load => "load",
            Self::Join => "join",
            Self::Clean => "clean",
            Self::Aggregate => "aggregate",
        };
        f.write_str(name)
    }
}

/// Error type returned by ingestion, processing, reporting and configuration.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read error (malformed row, unequal record lengths, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON read or parse error (data files and config files).
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not conform to the provided schema or an operation's type requirements.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// A referenced column does not exist in the dataset.
    #[error("missing column '{column}' (available: {available:?})")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// The ingestion format could not be determined from the path.
    #[error("unsupported input format for path ({})", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Invalid configuration (unknown locale, zero top-n, ...).
    #[error("config error: {message}")]
    Config { message: String },

    /// A failure attributed to a pipeline stage.
    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: PipelineStage,
        #[source]
        source: Box<DashboardError>,
    },
}

impl DashboardError {
    /// Attribute this error to a pipeline stage.
    ///
    /// Errors that already carry a stage are returned unchanged.
    pub fn in_stage(self, stage: PipelineStage) -> Self {
        match self {
            Self::Stage { .. } => self,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// The stage this error is attributed to, if any.
    pub fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DashboardError, PipelineStage};

    #[test]
    fn stage_wrapping_is_not_nested() {
        let err = DashboardError::Config {
            message: "bad".to_string(),
        }
        .in_stage(PipelineStage::Load)
        .in_stage(PipelineStage::Join);

        assert_eq!(err.stage(), Some(PipelineStage::Load));
        assert_eq!(err.to_string(), "load stage failed: config error: bad");
    }

    #[test]
    fn missing_column_lists_available_columns() {
        let err = DashboardError::MissingColumn {
            column: "price".to_string(),
            available: vec!["order_id".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "missing column 'price' (available: [\"order_id\"])"
        );
    }
}
