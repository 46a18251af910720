//! Databases as seen by the index layer

use std::sync::RwLock;
use log::debug;
use rowstore_core::{RootValue, Table};

use crate::context::QueryContext;

/// Source of table versions for a named database
#[cfg_attr(test, mockall::automock)]
pub trait TableSource: Send + Sync {
    /// Name of the database
    fn name(&self) -> String;

    /// Current version of a table, if it exists
    fn get_table(&self, ctx: &QueryContext, name: &str) -> Option<Table>;
}

/// A named database backed by a root snapshot
///
/// The root can be swapped for a newer one; lookups always see the root
/// current at the time of the call.
#[derive(Debug)]
pub struct Database {
    name: String,
    root: RwLock<RootValue>,
}

impl Database {
    /// Create a database
    pub fn new(name: impl Into<String>, root: RootValue) -> Self {
        Database {
            name: name.into(),
            root: RwLock::new(root),
        }
    }

    /// Current root
    pub fn root(&self) -> RootValue {
        match self.root.read() {
            Ok(root) => root.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the current root
    pub fn set_root(&self, root: RootValue) {
        debug!("database {} now has tables {:?}", self.name, root.table_names());
        match self.root.write() {
            Ok(mut current) => *current = root,
            Err(poisoned) => *poisoned.into_inner() = root,
        }
    }
}

impl TableSource for Database {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn get_table(&self, _ctx: &QueryContext, name: &str) -> Option<Table> {
        self.root().get_table(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use rowstore_core::schema::{ColCollection, Column};
    use rowstore_core::{Kind, PersistentMap, Schema};
    use rowstore_core::config::MapConfig;

    fn table() -> Table {
        let cols = ColCollection::new(vec![Column::new("id", 1, Kind::Int, true, vec![])]).unwrap();
        let sch = Arc::new(Schema::from_cols(cols).unwrap());
        Table::new(sch, PersistentMap::empty(MapConfig::default()).unwrap())
    }

    #[test]
    fn test_set_root_is_seen_by_lookups() {
        let db = Database::new("shop", RootValue::new());
        let ctx = QueryContext::new();
        assert_eq!(db.name(), "shop");
        assert!(db.get_table(&ctx, "items").is_none());

        let old = db.root();
        db.set_root(old.put_table("items", table()));
        assert!(db.get_table(&ctx, "items").is_some());
        assert!(!old.has_table("items"));
    }
}
