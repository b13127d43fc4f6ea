//! Error types for SnapKV
//!
//! Provides a unified error type for all fallible operations.
//! Only loading, flushing and closing can fail; in-memory reads and
//! writes never do.

use thiserror::Error;

/// Result type alias using SnapError
pub type Result<T> = std::result::Result<T, SnapError>;

/// Unified error type for SnapKV operations
#[derive(Debug, Error)]
pub enum SnapError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Scheduler Errors
    // -------------------------------------------------------------------------
    #[error("Failed to spawn flush scheduler: {0}")]
    SchedulerSpawn(String),
}

impl From<serde_json::Error> for SnapError {
    fn from(err: serde_json::Error) -> Self {
        SnapError::Serialization(format!("json: {}", err))
    }
}

impl From<bincode::Error> for SnapError {
    fn from(err: bincode::Error) -> Self {
        SnapError::Serialization(format!("bincode: {}", err))
    }
}

impl SnapError {
    /// True for errors raised by the codec rather than the backend
    pub fn is_serialization(&self) -> bool {
        matches!(self, SnapError::Serialization(_))
    }
}
