//! Persistent map nodes
//!
//! Nodes are immutable once built. Each node is addressed by the hash of its
//! encoded chunk; an internal node's chunk embeds its children's addresses,
//! so a map's root address covers its entire contents.

use std::sync::Arc;
use serde::{Serialize, Deserialize};

use crate::config::MapConfig;
use crate::crypto;
use crate::error::Result;
use crate::store::Address;
use crate::types::Tuple;
use super::domains;

/// Reference from an internal node to one child
#[derive(Clone)]
pub(crate) struct Child {
    /// Largest key stored under the child
    pub last_key: Tuple,

    /// Number of entries stored under the child
    pub count: u64,

    pub node: Arc<Node>,
}

impl Child {
    /// Wrap a non-empty node
    pub fn from_node(node: Arc<Node>) -> Self {
        Child {
            last_key: node.last_key().cloned().unwrap_or_default(),
            count: node.count(),
            node,
        }
    }
}

/// Persisted form of a child reference
#[derive(Clone, Serialize, Deserialize)]
pub(crate) struct ChildRecord {
    pub last_key: Tuple,
    pub count: u64,
    pub address: Address,
}

/// Encoding side of a chunk; borrows the node's contents
#[derive(Serialize)]
enum ChunkRef<'a> {
    Leaf { entries: &'a [(Tuple, Tuple)] },
    Internal { children: Vec<ChildRecord> },
}

/// Decoding side of a chunk; must mirror `ChunkRef` variant for variant
#[derive(Deserialize)]
pub(crate) enum Chunk {
    Leaf { entries: Vec<(Tuple, Tuple)> },
    Internal { children: Vec<ChildRecord> },
}

impl Chunk {
    pub fn decode(bytes: &[u8]) -> Result<Chunk> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// A node of the tree
pub(crate) enum Node {
    Leaf {
        entries: Vec<(Tuple, Tuple)>,
        address: Address,
    },
    Internal {
        children: Vec<Child>,
        address: Address,
    },
}

impl Node {
    /// Build a leaf from entries sorted by key
    pub fn new_leaf(entries: Vec<(Tuple, Tuple)>, config: &MapConfig) -> Result<Arc<Node>> {
        let bytes = encode_leaf(&entries)?;
        let address = chunk_address(config, domains::LEAF_NODE, &bytes);
        Ok(Arc::new(Node::Leaf { entries, address }))
    }

    /// Build an internal node from children sorted by key
    pub fn new_internal(children: Vec<Child>, config: &MapConfig) -> Result<Arc<Node>> {
        let bytes = encode_internal(&children)?;
        let address = chunk_address(config, domains::INTERNAL_NODE, &bytes);
        Ok(Arc::new(Node::Internal { children, address }))
    }

    /// Rebuild a node read from a chunk store under a known address
    pub fn from_parts_leaf(entries: Vec<(Tuple, Tuple)>, address: Address) -> Arc<Node> {
        Arc::new(Node::Leaf { entries, address })
    }

    /// Rebuild an internal node read from a chunk store under a known address
    pub fn from_parts_internal(children: Vec<Child>, address: Address) -> Arc<Node> {
        Arc::new(Node::Internal { children, address })
    }

    pub fn address(&self) -> Address {
        match self {
            Node::Leaf { address, .. } | Node::Internal { address, .. } => *address,
        }
    }

    pub fn count(&self) -> u64 {
        match self {
            Node::Leaf { entries, .. } => entries.len() as u64,
            Node::Internal { children, .. } => children.iter().map(|c| c.count).sum(),
        }
    }

    pub fn last_key(&self) -> Option<&Tuple> {
        match self {
            Node::Leaf { entries, .. } => entries.last().map(|(k, _)| k),
            Node::Internal { children, .. } => children.last().map(|c| &c.last_key),
        }
    }

    /// Encode the node as chunk bytes
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Node::Leaf { entries, .. } => encode_leaf(entries),
            Node::Internal { children, .. } => encode_internal(children),
        }
    }

    /// Look up a key
    pub fn get(&self, key: &Tuple) -> Option<&Tuple> {
        match self {
            Node::Leaf { entries, .. } => entries
                .binary_search_by(|(k, _)| k.cmp(key))
                .ok()
                .map(|i| &entries[i].1),
            Node::Internal { children, .. } => {
                let idx = children.partition_point(|c| &c.last_key < key);
                children.get(idx).and_then(|c| c.node.get(key))
            }
        }
    }

    /// Insert or overwrite an entry, copying the path from this node down
    ///
    /// Returns the one or two nodes replacing this node and whether the key
    /// was new. Nodes off the path are shared, not copied.
    pub fn insert(
        &self,
        key: Tuple,
        value: Tuple,
        config: &MapConfig,
    ) -> Result<(Vec<Arc<Node>>, bool)> {
        match self {
            Node::Leaf { entries, .. } => {
                let mut entries = entries.clone();
                let added = match entries.binary_search_by(|(k, _)| k.cmp(&key)) {
                    Ok(i) => {
                        entries[i].1 = value;
                        false
                    }
                    Err(i) => {
                        entries.insert(i, (key, value));
                        true
                    }
                };

                if entries.len() > config.max_leaf_entries {
                    let right = entries.split_off(entries.len() / 2);
                    Ok((
                        vec![Node::new_leaf(entries, config)?, Node::new_leaf(right, config)?],
                        added,
                    ))
                } else {
                    Ok((vec![Node::new_leaf(entries, config)?], added))
                }
            }
            Node::Internal { children, .. } => {
                let mut idx = children.partition_point(|c| c.last_key < key);
                if idx == children.len() {
                    idx -= 1;
                }

                let (replacements, added) = children[idx].node.insert(key, value, config)?;
                let mut children = children.clone();
                children.splice(idx..=idx, replacements.into_iter().map(Child::from_node));

                if children.len() > config.max_branch_factor {
                    let right = children.split_off(children.len() / 2);
                    Ok((
                        vec![
                            Node::new_internal(children, config)?,
                            Node::new_internal(right, config)?,
                        ],
                        added,
                    ))
                } else {
                    Ok((vec![Node::new_internal(children, config)?], added))
                }
            }
        }
    }
}

fn encode_leaf(entries: &[(Tuple, Tuple)]) -> Result<Vec<u8>> {
    Ok(bincode::serialize(&ChunkRef::Leaf { entries })?)
}

fn encode_internal(children: &[Child]) -> Result<Vec<u8>> {
    let children = children
        .iter()
        .map(|c| ChildRecord {
            last_key: c.last_key.clone(),
            count: c.count,
            address: c.node.address(),
        })
        .collect();
    Ok(bincode::serialize(&ChunkRef::Internal { children })?)
}

/// Address of chunk bytes hashed under a domain
pub(crate) fn chunk_address(config: &MapConfig, domain: &str, bytes: &[u8]) -> Address {
    Address(crypto::secure_hash(config.hash_algorithm, domain, bytes))
}

/// Build a tree bottom-up from entries sorted by key with unique keys
pub(crate) fn build_sorted(entries: Vec<(Tuple, Tuple)>, config: &MapConfig) -> Result<Arc<Node>> {
    if entries.is_empty() {
        return Node::new_leaf(Vec::new(), config);
    }

    let mut level = Vec::new();
    let mut entries = entries.into_iter().peekable();
    while entries.peek().is_some() {
        let chunk: Vec<_> = entries.by_ref().take(config.max_leaf_entries).collect();
        level.push(Node::new_leaf(chunk, config)?);
    }

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len() / config.max_branch_factor + 1);
        let mut nodes = level.into_iter().peekable();
        while nodes.peek().is_some() {
            let children: Vec<Child> = nodes
                .by_ref()
                .take(config.max_branch_factor)
                .map(Child::from_node)
                .collect();
            next.push(Node::new_internal(children, config)?);
        }
        level = next;
    }

    // The loops above leave exactly one node
    Ok(level.remove(0))
}
