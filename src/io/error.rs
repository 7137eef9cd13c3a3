use std::path::PathBuf;

use thiserror::Error;

/// Errors from structure input.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed structure document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown element symbol '{symbol}'")]
    UnknownElement { symbol: String },

    #[error("invalid structure document: {0}")]
    BadDocument(String),
}
