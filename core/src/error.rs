//! Error types for the core crate
//!
//! This module provides a consolidated error type for the core crate,
//! covering schema checks, value conversion, row encoding, the map
//! writers and the chunk store.

use thiserror::Error;
use std::io;

use crate::types::Kind;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key arity or column set does not match the schema
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A value kind that conversion or encoding does not handle yet
    #[error("Unsupported kind: {0}")]
    UnsupportedKind(Kind),

    /// A value could not be converted to the kind declared by its column
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind declared by the column
        expected: Kind,
        /// Description of the value that was supplied
        found: String,
    },

    /// Schema construction failed
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// A NOT NULL column had no value
    #[error("Constraint violation: column '{column}' may not be null")]
    ConstraintViolation {
        /// Name of the offending column
        column: String,
    },

    /// A writer was used after it was closed
    #[error("Writer already closed: cannot {operation}")]
    WriterClosed {
        /// The operation that was attempted
        operation: &'static str,
    },

    /// A single map entry could not be decoded into a row
    #[error("Malformed row: {0}")]
    MalformedRow(String),

    /// A chunk referenced by a map is missing from the store
    #[error("Chunk not found: {0}")]
    ChunkNotFound(String),

    /// A chunk's bytes do not hash to its address
    #[error("Chunk corrupted: {0}")]
    ChunkCorrupted(String),

    /// Chunk store failure
    #[error("Store error: {0}")]
    StoreError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Bincode error
    #[error("Bincode error: {0}")]
    BincodeError(#[from] bincode::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl CoreError {
    /// Whether this error describes one bad map entry rather than a failure
    /// of the whole read
    pub fn is_bad_row(&self) -> bool {
        matches!(self, CoreError::MalformedRow(_))
    }
}

/// Result type for the core crate
pub type Result<T> = std::result::Result<T, CoreError>;

/// Convert a displayable error to a StoreError
pub fn to_store_error<E: std::fmt::Display>(err: E) -> CoreError {
    CoreError::StoreError(err.to_string())
}
