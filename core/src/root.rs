//! Database roots
//!
//! A root is an immutable snapshot of every table in a database. Replacing a
//! table yields a new root; roots handed out earlier are unaffected.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::table::Table;

/// Snapshot of a database's tables by name
#[derive(Debug, Clone, Default)]
pub struct RootValue {
    tables: Arc<BTreeMap<String, Table>>,
}

impl RootValue {
    /// Create an empty root
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a table by name
    pub fn get_table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Check if a table exists
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Names of all tables in ascending order
    pub fn table_names(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    /// A new root with `table` stored under `name`
    pub fn put_table(&self, name: impl Into<String>, table: Table) -> RootValue {
        let mut tables = (*self.tables).clone();
        tables.insert(name.into(), table);
        RootValue {
            tables: Arc::new(tables),
        }
    }
}
