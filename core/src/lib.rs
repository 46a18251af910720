//! # Rowstore Core
//!
//! Row storage for a versioned tabular database. Typed table rows are
//! encoded into an immutable, content-addressed persistent map; every
//! mutation writes a new map snapshot that shares unchanged structure with
//! the previous one, so earlier table versions stay valid.
//!
//! The main pieces are:
//!
//! * [`schema`] and [`row`]: tagged columns and the rows built from them
//! * [`map`]: the persistent map and its chunk encoding
//! * [`table`]: map writers and readers, and table versions
//! * [`root`]: database snapshots mapping table names to tables

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod crypto;
pub mod error;
pub mod map;
pub mod root;
pub mod row;
pub mod schema;
pub mod store;
pub mod table;
pub mod types;
pub mod utils;

/// Re-export common types for ease of use
pub use config::StoreConfig;
pub use error::{CoreError, Result};
pub use map::PersistentMap;
pub use root::RootValue;
pub use row::{Row, TaggedValues};
pub use schema::Schema;
pub use store::{Address, ChunkStore, MemoryChunkStore};
pub use table::{MapCreator, MapReader, MapUpdater, MapWriteCloser, Table, TableReader};
pub use types::{Kind, Tuple, Value};

/// Version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use crate::schema::{ColCollection, Column};

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_write_then_lookup_through_root() {
        let cols = ColCollection::new(vec![
            Column::new("k", 1, Kind::String, true, vec![]),
            Column::new("v", 2, Kind::Float, false, vec![]),
        ])
        .unwrap();
        let sch = Arc::new(Schema::from_cols(cols).unwrap());

        let vals: TaggedValues = vec![(1, Value::from("half")), (2, Value::Float(0.5))]
            .into_iter()
            .collect();
        let mut creator = MapCreator::new(Arc::new(MemoryChunkStore::new()), sch.clone()).unwrap();
        creator.write_row(&Row::new(&sch, vals).unwrap()).unwrap();
        creator.close().unwrap();

        let table = Table::new(sch.clone(), creator.get_map().unwrap().clone());
        let root = RootValue::new().put_table("consts", table);

        let key = sch.key_values_from_args(&[serde_json::json!("half")]).unwrap();
        let found = root
            .get_table("consts")
            .unwrap()
            .get_row_by_pk_vals(&key, &sch)
            .unwrap()
            .unwrap();
        assert_eq!(found.get_col_val(2), Some(&Value::Float(0.5)));
    }
}
