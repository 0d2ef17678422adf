//! Error types for SetKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using SetKvError
pub type Result<T> = std::result::Result<T, SetKvError>;

/// Unified error type for SetKV operations
#[derive(Debug, Error)]
pub enum SetKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corruption detected: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<bincode::Error> for SetKvError {
    fn from(err: bincode::Error) -> Self {
        SetKvError::Serialization(err.to_string())
    }
}
