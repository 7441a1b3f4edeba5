//! Error type shared by the loader, analyzers and renderer.

use crate::table::Field;
use std::path::PathBuf;

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited input: {0}")]
    Csv(#[from] csv::Error),

    #[error("required field `{0}` is not present in the table")]
    MissingField(Field),

    #[error("row {row}: invalid {field} value `{value}`")]
    InvalidValue {
        row: usize,
        field: Field,
        value: String,
    },

    #[error("failed to render figure: {0}")]
    Render(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
