//! Error types for the progression engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProgressionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),
}
