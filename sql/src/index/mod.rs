//! Index contract consumed by the query engine
//!
//! The engine discovers indexes through an [`IndexDriver`], asks an
//! [`Index`] for an [`IndexLookup`] bound to a key, and reads the matching
//! rows through a [`RowIter`].

mod primary_key;

pub use primary_key::{
    PrimaryKeyIndex, PrimaryKeyIndexDriver, PrimaryKeyLookup, PrimaryKeyRowIter, DRIVER_ID,
};

use crate::context::QueryContext;
use crate::error::Result;
use crate::row::SqlRow;

/// Discovers and manages the indexes of tables
pub trait IndexDriver {
    /// Identifier of the driver
    fn id(&self) -> &str;

    /// Create a new index over expressions of a table
    fn create(
        &self,
        db: &str,
        table: &str,
        id: &str,
        expressions: &[String],
    ) -> Result<Box<dyn Index>>;

    /// Persist an index
    fn save(&self, ctx: &QueryContext, index: &dyn Index) -> Result<()>;

    /// Remove an index
    fn delete(&self, index: &dyn Index) -> Result<()>;

    /// Every index of a table
    fn load_all(&self, db: &str, table: &str) -> Result<Vec<Box<dyn Index>>>;
}

/// An index over one table
pub trait Index {
    /// Identifier of the index
    fn id(&self) -> String;

    /// Database the indexed table belongs to
    fn database(&self) -> String;

    /// Name of the indexed table
    fn table(&self) -> &str;

    /// Identifier of the driver that produced the index
    fn driver(&self) -> &str;

    /// Expressions the index can satisfy, as `table.column`
    fn expressions(&self) -> Vec<String>;

    /// Prepare a lookup for a key given as positional values
    fn get(&self, key: &[serde_json::Value]) -> Result<Box<dyn IndexLookup>>;

    /// Check if a key is present
    fn has(&self, key: &[serde_json::Value]) -> Result<bool>;
}

/// A prepared lookup against one index
pub trait IndexLookup {
    /// Identifiers of the indexes the lookup uses
    fn indexes(&self) -> Vec<String>;

    /// Iterator over raw index values
    fn values(&self) -> Result<Box<dyn IndexValueIter>>;

    /// Iterator over the rows matching the lookup
    fn row_iter(&self, ctx: &QueryContext) -> Result<Box<dyn RowIter>>;
}

/// Forward-only iterator over result rows
pub trait RowIter {
    /// Next row, or `None` at the end of the sequence
    fn next_row(&mut self) -> Result<Option<SqlRow>>;

    /// Release the iterator
    fn close(&mut self) -> Result<()>;
}

/// Forward-only iterator over raw index values
pub trait IndexValueIter {
    /// Next value, or `None` at the end of the sequence
    fn next_value(&mut self) -> Result<Option<Vec<u8>>>;

    /// Release the iterator
    fn close(&mut self) -> Result<()>;
}
