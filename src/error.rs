// Error taxonomy for the placement dashboard
// Every fatal condition a run can hit maps to one variant here.
// Empty aggregates are NOT errors - renderers draw a degenerate chart instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// File-mode source path does not exist
    #[error("{} not found. Please add the sample CSV or run in query mode.", .path.display())]
    InputNotFound { path: PathBuf },

    /// Query-mode client library was not compiled in
    #[error("{0} support is not available; rebuild with `--features {0}`")]
    MissingDependency(&'static str),

    /// Query-mode connection could not be established
    #[error("failed to connect to {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("unsupported mode '{0}'. Choose 'file' or 'query'.")]
    InvalidMode(String),

    #[error("row {row}: cannot parse offer_date '{value}' as a calendar date")]
    InvalidDate { row: usize, value: String },

    #[error("failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("query failed: {0}")]
    Query(String),

    #[error("invalid configuration in {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to render {}: {message}", .path.display())]
    Render { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for DashboardError {
    fn from(err: rusqlite::Error) -> Self {
        DashboardError::Query(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
