//! # Rowstore SQL
//!
//! Adapts row storage to the index contract of a SQL query engine. Each
//! table exposes one index, its primary key, which the engine uses for
//! point lookups of a full key.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Error types and result
pub mod error;
pub use error::{IndexError, Result};

// Query context
pub mod context;
pub use context::QueryContext;

// Databases and table access
pub mod database;
pub use database::{Database, TableSource};

// Result rows
pub mod row;
pub use row::{row_to_sql_row, SqlRow};

// Index driver, indexes and lookups
pub mod index;
pub use index::{
    Index, IndexDriver, IndexLookup, IndexValueIter, PrimaryKeyIndex, PrimaryKeyIndexDriver,
    PrimaryKeyLookup, RowIter,
};
