//! Error types for tptp-minify

use crate::oracle::Outcome;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinifyError {
    #[error("{file}:{line}: '{token}': {message}")]
    Syntax {
        file: String,
        line: usize,
        token: String,
        message: String,
    },

    #[error("Environment error: {0}")]
    Environment(String),

    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Circular include detected: {}", .0.display())]
    CircularInclude(PathBuf),

    #[error("Failed to start prover '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Initial test failed: {0}")]
    NotInteresting(Outcome),

    #[error("Final test failed: {0}")]
    Consistency(Outcome),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MinifyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        MinifyError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MinifyError>;
