//! Table versions
//!
//! A table version pairs a schema with the persistent map holding its rows.
//! Mutating a table produces a new version with a new map; existing versions
//! keep their maps and stay readable.

mod reader;
mod writer;

pub use reader::{pipe_rows, read_all_rows, MapReader, TableReader};
pub use writer::{MapCreator, MapUpdater, MapWriteCloser};

use std::sync::Arc;

use crate::error::Result;
use crate::map::PersistentMap;
use crate::row::{self, Row, TaggedValues};
use crate::schema::Schema;

/// One version of a table
#[derive(Debug, Clone)]
pub struct Table {
    schema: Arc<Schema>,
    rows: PersistentMap,
}

impl Table {
    /// Create a table version
    pub fn new(schema: Arc<Schema>, rows: PersistentMap) -> Self {
        Table { schema, rows }
    }

    /// Schema of this version
    pub fn get_schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Row map of this version
    pub fn row_data(&self) -> &PersistentMap {
        &self.rows
    }

    /// A new version with the same schema and different rows
    pub fn with_row_data(&self, rows: PersistentMap) -> Table {
        Table {
            schema: Arc::clone(&self.schema),
            rows,
        }
    }

    /// Point lookup by primary-key values
    ///
    /// `key` must hold a value for every primary-key column of `sch`.
    /// Returns `Ok(None)` when no row has that key.
    pub fn get_row_by_pk_vals(&self, key: &TaggedValues, sch: &Schema) -> Result<Option<Row>> {
        let key = row::key_tuple(sch, key)?;
        match self.rows.get(&key) {
            Some(value) => Row::from_tuples(sch, &key, value).map(Some),
            None => Ok(None),
        }
    }

    /// Reader over every row of this version
    pub fn reader(&self) -> MapReader {
        MapReader::new(&self.rows, Arc::clone(&self.schema))
    }
}
