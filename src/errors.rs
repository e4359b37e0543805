// errors.rs
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the shell around the audit engine (file loading, config,
/// report writing). The calculation core itself never fails.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Spreadsheet error: {0}")]
    XlsxError(String),

    #[error("Report error: {0}")]
    ReportError(String),

    /// A caller asked for a listing that is not in the loaded set.
    #[error("Listing {0} not found")]
    MissingListing(i64),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }
}
