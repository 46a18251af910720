//! Map writers
//!
//! A writer turns a sequence of rows into a new persistent map. A
//! [`MapCreator`] starts from an empty map; a [`MapUpdater`] starts from an
//! existing map, overwriting or inserting the rows it is given and carrying
//! every other entry over unchanged.
//!
//! Both are single-pass: once closed, the finished map is available through
//! [`MapWriteCloser::get_map`] and every further write or close fails with
//! `WriterClosed`. A close that fails to persist keeps the map it built;
//! calling close again retries with the same contents, and no more rows can
//! be written.

use std::mem;
use std::sync::Arc;
use log::{debug, info};

use crate::config::StoreConfig;
use crate::error::{CoreError, Result};
use crate::map::{MapEditor, PersistentMap};
use crate::row::Row;
use crate::schema::Schema;
use crate::store::ChunkStore;

/// A single-pass writer producing a persistent map
pub trait MapWriteCloser {
    /// Encode a row and apply it to the map being built
    fn write_row(&mut self, row: &Row) -> Result<()>;

    /// Finish the map and persist it
    ///
    /// Succeeds at most once.
    fn close(&mut self) -> Result<()>;

    /// The finished map, or `None` while the writer is still open
    fn get_map(&self) -> Option<&PersistentMap>;
}

/// Lifecycle of a writer
enum WriterState {
    /// Constructed, nothing written yet
    Open(MapEditor),

    /// At least one row written
    Writing(MapEditor),

    /// Built by a close whose persist failed; the next close retries it
    Finished(PersistentMap),

    /// Finished and persisted; holds the new map
    Closed(PersistentMap),
}

/// State and behaviour shared by both writer kinds
struct WriterCore {
    store: Arc<dyn ChunkStore>,
    schema: Arc<Schema>,
    config: StoreConfig,
    state: WriterState,
    rows_written: usize,
}

impl WriterCore {
    fn new(
        store: Arc<dyn ChunkStore>,
        schema: Arc<Schema>,
        base: &PersistentMap,
        config: StoreConfig,
    ) -> Self {
        WriterCore {
            store,
            schema,
            config,
            state: WriterState::Open(base.edit()),
            rows_written: 0,
        }
    }

    fn editor(&mut self) -> Result<&mut MapEditor> {
        if let WriterState::Open(editor) = &mut self.state {
            let fresh = editor.base().edit();
            let editor = mem::replace(editor, fresh);
            self.state = WriterState::Writing(editor);
        }

        match &mut self.state {
            WriterState::Open(editor) | WriterState::Writing(editor) => Ok(editor),
            WriterState::Finished(_) | WriterState::Closed(_) => Err(CoreError::WriterClosed {
                operation: "write row",
            }),
        }
    }

    fn write_row(&mut self, row: &Row) -> Result<()> {
        if let WriterState::Finished(_) | WriterState::Closed(_) = self.state {
            return Err(CoreError::WriterClosed {
                operation: "write row",
            });
        }

        if self.config.validate_rows_on_write {
            self.schema.validate_row(row)?;
        }
        let key = row.key_tuple(&self.schema)?;
        let value = row.value_tuple(&self.schema);

        self.editor()?.set(key, value);
        self.rows_written += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<PersistentMap> {
        let map = match &self.state {
            WriterState::Closed(_) => {
                return Err(CoreError::WriterClosed { operation: "close" })
            }
            // Editor stays in place until the map is built
            WriterState::Open(editor) | WriterState::Writing(editor) => editor.clone().finish()?,
            WriterState::Finished(map) => map.clone(),
        };
        self.state = WriterState::Finished(map.clone());

        map.persist(self.store.as_ref())?;
        self.state = WriterState::Closed(map.clone());
        Ok(map)
    }

    fn get_map(&self) -> Option<&PersistentMap> {
        match &self.state {
            WriterState::Closed(map) => Some(map),
            WriterState::Open(_) | WriterState::Writing(_) | WriterState::Finished(_) => None,
        }
    }
}

/// Writes a new map containing exactly the rows written to it
pub struct MapCreator {
    core: WriterCore,
}

impl MapCreator {
    /// Create a writer with the default configuration
    pub fn new(store: Arc<dyn ChunkStore>, schema: Arc<Schema>) -> Result<Self> {
        Self::with_config(store, schema, StoreConfig::default())
    }

    /// Create a writer with a configuration
    pub fn with_config(
        store: Arc<dyn ChunkStore>,
        schema: Arc<Schema>,
        config: StoreConfig,
    ) -> Result<Self> {
        config.validate()?;
        let empty = PersistentMap::empty(config.map.clone())?;
        Ok(MapCreator {
            core: WriterCore::new(store, schema, &empty, config),
        })
    }

    /// Number of rows written so far
    pub fn rows_written(&self) -> usize {
        self.core.rows_written
    }
}

impl MapWriteCloser for MapCreator {
    fn write_row(&mut self, row: &Row) -> Result<()> {
        self.core.write_row(row)
    }

    fn close(&mut self) -> Result<()> {
        let map = self.core.close()?;
        info!(
            "created map {} with {} rows",
            map.address(),
            map.len()
        );
        Ok(())
    }

    fn get_map(&self) -> Option<&PersistentMap> {
        self.core.get_map()
    }
}

/// Derives a new map from a base map
///
/// Written rows overwrite the entry with the same primary key or are
/// inserted. The base map is never modified.
pub struct MapUpdater {
    core: WriterCore,
    base: PersistentMap,
}

impl MapUpdater {
    /// Create an updater with the default configuration
    pub fn new(
        store: Arc<dyn ChunkStore>,
        base: PersistentMap,
        schema: Arc<Schema>,
    ) -> Result<Self> {
        Self::with_config(store, base, schema, StoreConfig::default())
    }

    /// Create an updater with a configuration
    ///
    /// New nodes are built with the base map's own node configuration.
    pub fn with_config(
        store: Arc<dyn ChunkStore>,
        base: PersistentMap,
        schema: Arc<Schema>,
        config: StoreConfig,
    ) -> Result<Self> {
        config.validate()?;
        base.config().validate()?;
        debug!("updating map {} ({} rows)", base.address(), base.len());
        Ok(MapUpdater {
            core: WriterCore::new(store, schema, &base, config),
            base,
        })
    }

    /// The map updates are applied to
    pub fn base(&self) -> &PersistentMap {
        &self.base
    }

    /// Number of rows written so far
    pub fn rows_written(&self) -> usize {
        self.core.rows_written
    }
}

impl MapWriteCloser for MapUpdater {
    fn write_row(&mut self, row: &Row) -> Result<()> {
        self.core.write_row(row)
    }

    fn close(&mut self) -> Result<()> {
        let map = self.core.close()?;
        info!(
            "updated map {} -> {} ({} rows written, {} rows total)",
            self.base.address(),
            map.address(),
            self.core.rows_written,
            map.len()
        );
        Ok(())
    }

    fn get_map(&self) -> Option<&PersistentMap> {
        self.core.get_map()
    }
}
