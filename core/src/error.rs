use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by index construction, loading, and persistence.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record in {file} at line {line}: {reason}")]
    Decode {
        file: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("statistics encoding error: {0}")]
    Stats(#[from] bincode::Error),

    #[error("metadata error: {0}")]
    Meta(#[from] serde_json::Error),
}

impl EngineError {
    pub(crate) fn decode<P: Into<PathBuf>, R: Into<String>>(file: P, line: usize, reason: R) -> Self {
        Self::Decode {
            file: file.into(),
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
