//! Error types for the index layer
//!
//! This module provides the error type returned to the query engine by the
//! index driver, indexes and lookups.

use rowstore_core::CoreError;
use thiserror::Error;

/// Result type for the index layer
pub type Result<T> = std::result::Result<T, IndexError>;

/// Error type for the index layer
#[derive(Debug, Error)]
pub enum IndexError {
    /// Error from the row store
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Capability that this version deliberately does not provide
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Unknown database name
    #[error("Database not found: {0}")]
    DatabaseNotFound(String),

    /// Unknown table name
    #[error("Table not found: {0}")]
    TableNotFound(String),
}

impl IndexError {
    /// Whether the error reports an unimplemented capability
    pub fn is_not_supported(&self) -> bool {
        matches!(self, IndexError::NotSupported(_))
    }
}

/// Helper to build a `NotSupported` error for an operation
pub fn not_supported(operation: &str) -> IndexError {
    IndexError::NotSupported(format!("{} is not supported", operation))
}
