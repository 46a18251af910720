//! Content-addressed persistent map
//!
//! This module provides the immutable, ordered map that table rows are
//! stored in. A map is a B+tree of shared, immutable nodes. Deriving a new
//! map through a [`MapEditor`] copies only the nodes on the paths to edited
//! keys; everything else is shared with the map it was derived from, which
//! stays valid and unchanged for anyone still holding it.
//!
//! Every node is addressed by the hash of its chunk encoding, so the root
//! address identifies the map's full contents. Maps are written to and read
//! back from a [`ChunkStore`].

mod editor;
mod iter;
mod node;

pub use editor::MapEditor;
pub use iter::MapIter;

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use log::debug;

use crate::config::{MapConfig, StoreConfig};
use crate::crypto;
use crate::error::{CoreError, Result};
use crate::store::{Address, ChunkStore};
use crate::types::Tuple;
use node::{chunk_address, Child, Chunk, Node};

/// Domain constants for map chunk hashing
pub mod domains {
    /// Domain for leaf chunks
    pub const LEAF_NODE: &str = "ROWSTORE_MAP_LEAF";

    /// Domain for internal chunks
    pub const INTERNAL_NODE: &str = "ROWSTORE_MAP_INTERNAL";
}

/// An immutable, ordered map from key tuples to value tuples
#[derive(Clone)]
pub struct PersistentMap {
    root: Arc<Node>,
    config: MapConfig,
}

impl Debug for PersistentMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "PersistentMap {{ address: {:?}, len: {} }}",
            self.address(),
            self.len()
        )
    }
}

/// Maps are equal when their contents hash to the same address
impl PartialEq for PersistentMap {
    fn eq(&self, other: &Self) -> bool {
        self.address() == other.address()
    }
}

impl Eq for PersistentMap {}

impl PersistentMap {
    /// Create an empty map
    ///
    /// Fails with `ConfigError` if the node sizes cannot hold a split.
    pub fn empty(config: MapConfig) -> Result<Self> {
        config.validate()?;
        let root = Node::new_leaf(Vec::new(), &config)?;
        Ok(PersistentMap { root, config })
    }

    pub(crate) fn from_root(root: Arc<Node>, config: MapConfig) -> Self {
        PersistentMap { root, config }
    }

    pub(crate) fn root(&self) -> &Arc<Node> {
        &self.root
    }

    /// Configuration the map's nodes are built with
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Address of the root chunk
    pub fn address(&self) -> Address {
        self.root.address()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.root.count() as usize
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up the value for a key
    pub fn get(&self, key: &Tuple) -> Option<&Tuple> {
        self.root.get(key)
    }

    /// Check if a key is present
    pub fn has(&self, key: &Tuple) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over the entries in ascending key order
    pub fn iter(&self) -> MapIter {
        MapIter::new(Arc::clone(&self.root))
    }

    /// Start deriving a new map from this one
    pub fn edit(&self) -> MapEditor {
        MapEditor::new(self.clone())
    }

    /// Write every chunk of the map to a store
    ///
    /// Chunks already present are skipped along with everything beneath
    /// them, so persisting a derived map only writes the nodes it does not
    /// share with maps already in the store.
    pub fn persist(&self, store: &dyn ChunkStore) -> Result<Address> {
        let written = persist_node(&self.root, store)?;
        debug!(
            "persisted map {} ({} entries, {} new chunks)",
            self.address(),
            self.len(),
            written
        );
        Ok(self.address())
    }

    /// Read a map back from a store by its root address
    pub fn load(store: &dyn ChunkStore, address: Address, config: &StoreConfig) -> Result<Self> {
        config.validate()?;
        let root = load_node(store, address, config)?;
        Ok(PersistentMap {
            root,
            config: config.map.clone(),
        })
    }
}

fn persist_node(node: &Node, store: &dyn ChunkStore) -> Result<usize> {
    if store.has(&node.address())? {
        return Ok(0);
    }

    let mut written = 0;
    if let Node::Internal { children, .. } = node {
        for child in children {
            written += persist_node(&child.node, store)?;
        }
    }

    // Children go in before their parent, so a present parent implies
    // present children
    store.put(node.address(), node.encode()?)?;
    Ok(written + 1)
}

fn load_node(store: &dyn ChunkStore, address: Address, config: &StoreConfig) -> Result<Arc<Node>> {
    let bytes = store
        .get(&address)?
        .ok_or_else(|| CoreError::ChunkNotFound(address.to_string()))?;

    let chunk = Chunk::decode(&bytes)
        .map_err(|e| CoreError::ChunkCorrupted(format!("{}: {}", address, e)))?;

    if config.verify_chunks_on_load {
        let domain = match chunk {
            Chunk::Leaf { .. } => domains::LEAF_NODE,
            Chunk::Internal { .. } => domains::INTERNAL_NODE,
        };
        let actual = chunk_address(&config.map, domain, &bytes);
        if !crypto::verify_hash(address.as_bytes(), actual.as_bytes()) {
            return Err(CoreError::ChunkCorrupted(format!(
                "chunk {} hashes to {}",
                address, actual
            )));
        }
    }

    match chunk {
        Chunk::Leaf { entries } => Ok(Node::from_parts_leaf(entries, address)),
        Chunk::Internal { children } if children.is_empty() => Err(CoreError::ChunkCorrupted(
            format!("internal chunk {} has no children", address),
        )),
        Chunk::Internal { children } => {
            let mut loaded = Vec::with_capacity(children.len());
            for record in children {
                let node = load_node(store, record.address, config)?;
                loaded.push(Child {
                    last_key: record.last_key,
                    count: record.count,
                    node,
                });
            }
            Ok(Node::from_parts_internal(loaded, address))
        }
    }
}
