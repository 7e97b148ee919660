//! Error types for file-level operations
//!
//! Malformed *content* never produces an error: the importers skip what they
//! cannot read and report it in an [`ImportReport`](crate::import::ImportReport).
//! Only failures of the file layer itself end up here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, writing or moving feature files
#[derive(Error, Debug)]
pub enum FeatureError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Destination already exists: {0}")]
    DestinationExists(PathBuf),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("Failed to serialize features: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("No folder selected")]
    NoFolder,

    #[error("No feature file is open")]
    NoActiveFile,
}

impl FeatureError {
    /// Wraps an IO error, mapping `NotFound` to the dedicated variant
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            FeatureError::NotFound(path)
        } else {
            FeatureError::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, FeatureError>;
