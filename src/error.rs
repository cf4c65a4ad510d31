//! Error types for linekv
//!
//! Provides a unified error type for all store operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for linekv operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Key already exists: {0}")]
    DuplicateKey(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Data file is at capacity: {size} bytes (limit {limit})")]
    CapacityExceeded { size: u64, limit: u64 },

    #[error("Index and data file disagree: {0}")]
    InternalConsistency(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    /// Malformed JSON in the index or data file. `line` is 1-based and is
    /// `None` for the index file, which is a single document.
    #[error("Parse error in {}{}: {message}", .path.display(), at_line(.line))]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn at_line(line: &Option<usize>) -> String {
    match line {
        Some(n) => format!(" line {}", n),
        None => String::new(),
    }
}

impl StoreError {
    pub(crate) fn parse(path: &std::path::Path, line: Option<usize>, message: impl ToString) -> Self {
        StoreError::Parse {
            path: path.to_path_buf(),
            line,
            message: message.to_string(),
        }
    }
}
