//! Batched edits against a persistent map

use std::collections::BTreeMap;
use log::trace;

use crate::error::Result;
use crate::types::Tuple;
use super::node::{build_sorted, Child, Node};
use super::PersistentMap;

/// Collects inserts and overwrites, then derives a new map from a base map
///
/// The base map is never modified. When the base is empty the new map is
/// built bottom-up; otherwise each edit copies only the path from the root
/// to the affected leaf, and every other node is shared with the base.
#[derive(Clone)]
pub struct MapEditor {
    base: PersistentMap,
    edits: BTreeMap<Tuple, Tuple>,
}

impl MapEditor {
    pub(crate) fn new(base: PersistentMap) -> Self {
        MapEditor {
            base,
            edits: BTreeMap::new(),
        }
    }

    /// Insert or overwrite an entry; a later set for the same key wins
    pub fn set(&mut self, key: Tuple, value: Tuple) -> &mut Self {
        self.edits.insert(key, value);
        self
    }

    /// Number of distinct keys edited so far
    pub fn pending(&self) -> usize {
        self.edits.len()
    }

    /// The map the edits apply to
    pub fn base(&self) -> &PersistentMap {
        &self.base
    }

    /// Apply the edits, producing the new map
    pub fn finish(self) -> Result<PersistentMap> {
        let config = self.base.config().clone();

        if self.base.is_empty() {
            let root = build_sorted(self.edits.into_iter().collect(), &config)?;
            return Ok(PersistentMap::from_root(root, config));
        }

        let mut root = self.base.root().clone();
        for (key, value) in self.edits {
            let (mut nodes, added) = root.insert(key, value, &config)?;
            trace!("applied map edit (new key: {})", added);
            root = if nodes.len() == 1 {
                nodes.remove(0)
            } else {
                let children = nodes.into_iter().map(Child::from_node).collect();
                Node::new_internal(children, &config)?
            };
        }

        Ok(PersistentMap::from_root(root, config))
    }
}
