use std::path::PathBuf;
use thiserror::Error;

/// The main error type for lprindex operations.
#[derive(Debug, Error)]
pub enum LprIndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset data directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Malformed annotation file {path}: {message}")]
    MalformedAnnotation { path: PathBuf, message: String },

    #[error("No .jpg or .png image found for annotation {path}")]
    MissingImage { path: PathBuf },

    #[error("Catalog is already open on {root}; use reopen() to scan again")]
    CatalogAlreadyOpen { root: PathBuf },

    #[error("Invalid train fraction {0} (expected a value in [0.0, 1.0])")]
    InvalidSplitFraction(f64),

    #[error("Unknown subset '{0}' (supported: train, val)")]
    UnknownSubset(String),

    #[error("Failed to serialize scan report: {0}")]
    ReportJson(#[source] serde_json::Error),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl LprIndexError {
    /// Wraps a `serde_json` failure for the annotation file at `path`.
    pub(crate) fn malformed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        LprIndexError::MalformedAnnotation {
            path: path.into(),
            message: source.to_string(),
        }
    }
}
