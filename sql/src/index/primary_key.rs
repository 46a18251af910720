//! Primary-key index
//!
//! Every table has exactly one index: its primary key. The index is not a
//! separate structure; lookups go straight to the table's row map. Index
//! creation, persistence and deletion are not supported and fail with
//! `NotSupported`.

use std::sync::Arc;
use log::{debug, info};
use rowstore_core::{Schema, TaggedValues};

use crate::context::QueryContext;
use crate::database::TableSource;
use crate::error::{not_supported, IndexError, Result};
use crate::row::{row_to_sql_row, SqlRow};
use super::{Index, IndexDriver, IndexLookup, IndexValueIter, RowIter};

/// Identifier of the primary-key index driver
pub const DRIVER_ID: &str = "primaryKeyIndexDriver";

/// Driver exposing the primary key of every table of one database
pub struct PrimaryKeyIndexDriver {
    db: Arc<dyn TableSource>,
}

impl PrimaryKeyIndexDriver {
    /// Create a driver for a database
    pub fn new(db: Arc<dyn TableSource>) -> Self {
        PrimaryKeyIndexDriver { db }
    }
}

impl IndexDriver for PrimaryKeyIndexDriver {
    fn id(&self) -> &str {
        DRIVER_ID
    }

    fn create(
        &self,
        _db: &str,
        _table: &str,
        _id: &str,
        _expressions: &[String],
    ) -> Result<Box<dyn Index>> {
        Err(not_supported("creating indexes"))
    }

    fn save(&self, _ctx: &QueryContext, _index: &dyn Index) -> Result<()> {
        Err(not_supported("saving indexes"))
    }

    fn delete(&self, _index: &dyn Index) -> Result<()> {
        Err(not_supported("deleting indexes"))
    }

    fn load_all(&self, db: &str, table: &str) -> Result<Vec<Box<dyn Index>>> {
        if db != self.db.name() {
            return Err(IndexError::DatabaseNotFound(db.to_string()));
        }

        let ctx = QueryContext::new();
        let tbl = self
            .db
            .get_table(&ctx, table)
            .ok_or_else(|| IndexError::TableNotFound(table.to_string()))?;

        info!("loaded primary key index for {}.{}", db, table);
        Ok(vec![Box::new(PrimaryKeyIndex {
            schema: Arc::clone(tbl.get_schema()),
            table_name: table.to_string(),
            db: Arc::clone(&self.db),
        })])
    }
}

/// The primary key of one table
#[derive(Clone)]
pub struct PrimaryKeyIndex {
    schema: Arc<Schema>,
    table_name: String,
    db: Arc<dyn TableSource>,
}

impl PrimaryKeyIndex {
    /// Schema the index was loaded with
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Index for PrimaryKeyIndex {
    fn id(&self) -> String {
        format!("{}:primaryKey", self.table_name)
    }

    fn database(&self) -> String {
        self.db.name()
    }

    fn table(&self) -> &str {
        &self.table_name
    }

    fn driver(&self) -> &str {
        DRIVER_ID
    }

    fn expressions(&self) -> Vec<String> {
        // Must match the `table.column` form the query engine generates
        self.schema
            .get_pk_cols()
            .iter()
            .map(|col| format!("{}.{}", self.table_name, col.name))
            .collect()
    }

    fn get(&self, key: &[serde_json::Value]) -> Result<Box<dyn IndexLookup>> {
        let key = self.schema.key_values_from_args(key)?;
        Ok(Box::new(PrimaryKeyLookup {
            index: self.clone(),
            key,
        }))
    }

    fn has(&self, _key: &[serde_json::Value]) -> Result<bool> {
        Err(not_supported("checking index membership"))
    }
}

/// A point lookup of one full primary key
pub struct PrimaryKeyLookup {
    index: PrimaryKeyIndex,
    key: TaggedValues,
}

impl PrimaryKeyLookup {
    /// Key the lookup is bound to
    pub fn key(&self) -> &TaggedValues {
        &self.key
    }
}

impl IndexLookup for PrimaryKeyLookup {
    fn indexes(&self) -> Vec<String> {
        vec![self.index.id()]
    }

    fn values(&self) -> Result<Box<dyn IndexValueIter>> {
        Err(not_supported("iterating index values"))
    }

    fn row_iter(&self, ctx: &QueryContext) -> Result<Box<dyn RowIter>> {
        Ok(Box::new(PrimaryKeyRowIter {
            index: self.index.clone(),
            key: self.key.clone(),
            ctx: *ctx,
            done: false,
        }))
    }
}

/// Yields the row for a primary key, if there is one, then ends
///
/// The table is fetched on the first advance, so the lookup sees the
/// table version current at that moment.
pub struct PrimaryKeyRowIter {
    index: PrimaryKeyIndex,
    key: TaggedValues,
    ctx: QueryContext,
    done: bool,
}

impl RowIter for PrimaryKeyRowIter {
    fn next_row(&mut self) -> Result<Option<SqlRow>> {
        if self.done {
            return Ok(None);
        }
        self.done = true;

        let table = self
            .index
            .db
            .get_table(&self.ctx, &self.index.table_name)
            .ok_or_else(|| IndexError::TableNotFound(self.index.table_name.clone()))?;

        match table.get_row_by_pk_vals(&self.key, &self.index.schema)? {
            Some(row) => Ok(Some(row_to_sql_row(&row, &self.index.schema))),
            None => {
                debug!(
                    "no row in {} for key {:?} (query {})",
                    self.index.table_name,
                    self.key,
                    self.ctx.id()
                );
                Ok(None)
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;
    use rowstore_core::schema::{ColCollection, Column, Constraint};
    use rowstore_core::{
        CoreError, Kind, MapCreator, MapWriteCloser, MemoryChunkStore, RootValue, Row, Table,
        Value,
    };
    use crate::database::{Database, MockTableSource};

    fn people_schema() -> Arc<Schema> {
        let cols = ColCollection::new(vec![
            Column::new("name", 2, Kind::String, false, vec![]),
            Column::new("id", 1, Kind::Int, true, vec![Constraint::NotNull]),
        ])
        .unwrap();
        Arc::new(Schema::from_cols(cols).unwrap())
    }

    fn people_table() -> Table {
        let sch = people_schema();
        let mut creator = MapCreator::new(Arc::new(MemoryChunkStore::new()), sch.clone()).unwrap();
        for (id, name) in [(1, "Ann"), (2, "Bo"), (3, "Cy")] {
            let vals: TaggedValues = vec![(1, Value::Int(id)), (2, Value::from(name))]
                .into_iter()
                .collect();
            creator.write_row(&Row::new(&sch, vals).unwrap()).unwrap();
        }
        creator.close().unwrap();
        Table::new(sch, creator.get_map().unwrap().clone())
    }

    fn shop() -> Arc<Database> {
        Arc::new(Database::new("shop", RootValue::new().put_table("people", people_table())))
    }

    fn people_index(db: Arc<Database>) -> Box<dyn Index> {
        let driver = PrimaryKeyIndexDriver::new(db);
        driver.load_all("shop", "people").unwrap().remove(0)
    }

    fn two_key_index() -> PrimaryKeyIndex {
        let cols = ColCollection::new(vec![
            Column::new("region", 7, Kind::String, true, vec![]),
            Column::new("note", 5, Kind::String, false, vec![]),
            Column::new("id", 2, Kind::Uint, true, vec![]),
        ])
        .unwrap();
        PrimaryKeyIndex {
            schema: Arc::new(Schema::from_cols(cols).unwrap()),
            table_name: "orders".to_string(),
            db: shop(),
        }
    }

    #[test]
    fn test_load_all() {
        let driver = PrimaryKeyIndexDriver::new(shop());
        assert_eq!(driver.id(), "primaryKeyIndexDriver");

        let indexes = driver.load_all("shop", "people").unwrap();
        assert_eq!(indexes.len(), 1);
        let index = &indexes[0];
        assert_eq!(index.id(), "people:primaryKey");
        assert_eq!(index.database(), "shop");
        assert_eq!(index.table(), "people");
        assert_eq!(index.driver(), "primaryKeyIndexDriver");
        assert_eq!(index.expressions(), vec!["people.id".to_string()]);
    }

    #[test]
    fn test_load_all_unknown_names() {
        let driver = PrimaryKeyIndexDriver::new(shop());
        assert!(matches!(
            driver.load_all("warehouse", "people"),
            Err(IndexError::DatabaseNotFound(name)) if name == "warehouse"
        ));
        assert!(matches!(
            driver.load_all("shop", "pets"),
            Err(IndexError::TableNotFound(name)) if name == "pets"
        ));
    }

    #[test]
    fn test_unsupported_operations() {
        let db = shop();
        let driver = PrimaryKeyIndexDriver::new(db.clone());
        let index = people_index(db);

        assert!(driver
            .create("shop", "people", "by_name", &["people.name".to_string()])
            .err()
            .map_or(false, |e| e.is_not_supported()));
        assert!(driver.save(&QueryContext::new(), &*index).unwrap_err().is_not_supported());
        assert!(driver.delete(&*index).unwrap_err().is_not_supported());
        assert!(index.has(&[json!(1)]).unwrap_err().is_not_supported());

        let lookup = index.get(&[json!(1)]).unwrap();
        assert!(lookup.values().err().map_or(false, |e| e.is_not_supported()));
    }

    #[test]
    fn test_expressions_follow_pk_order() {
        let index = two_key_index();
        assert_eq!(
            index.expressions(),
            vec!["orders.id".to_string(), "orders.region".to_string()]
        );
    }

    #[rstest]
    #[case::none(vec![])]
    #[case::one(vec![json!(1)])]
    #[case::three(vec![json!(1), json!("emea"), json!("x")])]
    fn test_get_rejects_wrong_arity(#[case] key: Vec<serde_json::Value>) {
        let result = two_key_index().get(&key);
        assert!(matches!(
            result.err(),
            Some(IndexError::Core(CoreError::SchemaMismatch(_)))
        ));
    }

    #[rstest]
    #[case::bool_for_int(json!(true))]
    #[case::string_for_int(json!("1"))]
    #[case::float_for_int(json!(1.5))]
    fn test_get_rejects_wrong_type(#[case] arg: serde_json::Value) {
        let index = people_index(shop());
        assert!(matches!(
            index.get(&[arg]).err(),
            Some(IndexError::Core(CoreError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn test_get_uuid_key_is_unsupported() {
        let cols = ColCollection::new(vec![Column::new("id", 1, Kind::Uuid, true, vec![])]).unwrap();
        let index = PrimaryKeyIndex {
            schema: Arc::new(Schema::from_cols(cols).unwrap()),
            table_name: "tokens".to_string(),
            db: shop(),
        };

        let result = index.get(&[json!("0b1c6f3e-1c7e-4c4e-9d54-1f0e2a8b7c11")]);
        assert!(matches!(
            result.err(),
            Some(IndexError::Core(CoreError::UnsupportedKind(Kind::Uuid)))
        ));
    }

    #[test]
    fn test_lookup_present_key() {
        let index = people_index(shop());
        let lookup = index.get(&[json!(2)]).unwrap();
        assert_eq!(lookup.indexes(), vec!["people:primaryKey".to_string()]);

        let mut rows = lookup.row_iter(&QueryContext::new()).unwrap();
        assert_eq!(
            rows.next_row().unwrap(),
            Some(vec![Value::from("Bo"), Value::Int(2)])
        );
        assert_eq!(rows.next_row().unwrap(), None);
        assert_eq!(rows.next_row().unwrap(), None);
        rows.close().unwrap();
    }

    #[test]
    fn test_lookup_absent_key() {
        let index = people_index(shop());
        let mut rows = index
            .get(&[json!(42)])
            .unwrap()
            .row_iter(&QueryContext::new())
            .unwrap();

        assert_eq!(rows.next_row().unwrap(), None);
        assert_eq!(rows.next_row().unwrap(), None);
    }

    #[test]
    fn test_lookup_is_reusable() {
        let index = people_index(shop());
        let lookup = index.get(&[json!(3)]).unwrap();

        for _ in 0..2 {
            let mut rows = lookup.row_iter(&QueryContext::new()).unwrap();
            assert!(rows.next_row().unwrap().is_some());
            assert!(rows.next_row().unwrap().is_none());
        }
    }

    #[test]
    fn test_lookup_sees_current_root() {
        let db = shop();
        let index = people_index(db.clone());
        let lookup = index.get(&[json!(1)]).unwrap();
        let ctx = QueryContext::new();

        let mut before = lookup.row_iter(&ctx).unwrap();
        db.set_root(RootValue::new());
        assert!(matches!(
            before.next_row(),
            Err(IndexError::TableNotFound(name)) if name == "people"
        ));
        assert_eq!(before.next_row().unwrap(), None);
    }

    #[test]
    fn test_lookup_fetches_table_once_per_iterator() {
        let ctx = QueryContext::new();
        let query_id = ctx.id();

        let mut source = MockTableSource::new();
        source.expect_name().returning(|| "shop".to_string());
        source
            .expect_get_table()
            .withf(move |ctx, name| ctx.id() == query_id && name.to_string() == "people")
            .times(1)
            .returning(|_, _| Some(people_table()));

        let index = PrimaryKeyIndex {
            schema: people_schema(),
            table_name: "people".to_string(),
            db: Arc::new(source),
        };
        let mut rows = index.get(&[json!(1)]).unwrap().row_iter(&ctx).unwrap();

        assert!(rows.next_row().unwrap().is_some());
        assert!(rows.next_row().unwrap().is_none());
        assert!(rows.next_row().unwrap().is_none());
    }

    proptest! {
        #[test]
        fn prop_key_arity_must_match(len in 0usize..6) {
            prop_assume!(len != 2);
            let key: Vec<serde_json::Value> = (0..len).map(|i| json!(i)).collect();
            let is_mismatch = matches!(
                two_key_index().get(&key).err(),
                Some(IndexError::Core(CoreError::SchemaMismatch(_)))
            );
            prop_assert!(is_mismatch);
        }
    }
}
