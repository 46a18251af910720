//! Content-addressed chunk storage
//!
//! Persistent maps are written to a chunk store as immutable chunks, each
//! keyed by the hash of its bytes. Writing a chunk that is already present
//! is a no-op, so maps that share structure share chunks.

use std::collections::HashMap;
use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::sync::RwLock;
use serde::{Serialize, Deserialize};

use crate::error::{to_store_error, Result};

/// Address of a chunk: the hash of its bytes
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Raw hash bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        // First 4 bytes are enough to tell chunks apart in logs
        write!(f, "Address({})", hex::encode(&self.0[0..4]))
    }
}

/// Storage for immutable, content-addressed chunks
#[cfg_attr(test, mockall::automock)]
pub trait ChunkStore: Send + Sync {
    /// Read a chunk
    fn get(&self, address: &Address) -> Result<Option<Vec<u8>>>;

    /// Write a chunk under its address
    fn put(&self, address: Address, data: Vec<u8>) -> Result<()>;

    /// Check if a chunk is present
    fn has(&self, address: &Address) -> Result<bool>;
}

/// In-memory chunk store
#[derive(Default)]
pub struct MemoryChunkStore {
    chunks: RwLock<HashMap<Address, Vec<u8>>>,
}

impl Debug for MemoryChunkStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "MemoryChunkStore {{ chunks: {} }}", self.chunk_count())
    }
}

impl MemoryChunkStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of chunks held
    pub fn chunk_count(&self) -> usize {
        self.chunks.read().map(|chunks| chunks.len()).unwrap_or(0)
    }
}

impl ChunkStore for MemoryChunkStore {
    fn get(&self, address: &Address) -> Result<Option<Vec<u8>>> {
        let chunks = self.chunks.read().map_err(to_store_error)?;
        Ok(chunks.get(address).cloned())
    }

    fn put(&self, address: Address, data: Vec<u8>) -> Result<()> {
        let mut chunks = self.chunks.write().map_err(to_store_error)?;
        chunks.entry(address).or_insert(data);
        Ok(())
    }

    fn has(&self, address: &Address) -> Result<bool> {
        let chunks = self.chunks.read().map_err(to_store_error)?;
        Ok(chunks.contains_key(address))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_has() {
        let store = MemoryChunkStore::new();
        let address = Address([7u8; 32]);

        assert!(!store.has(&address).unwrap());
        assert!(store.get(&address).unwrap().is_none());

        store.put(address, vec![1, 2, 3]).unwrap();
        assert!(store.has(&address).unwrap());
        assert_eq!(store.get(&address).unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(store.chunk_count(), 1);
    }

    #[test]
    fn test_put_is_idempotent() {
        let store = MemoryChunkStore::new();
        let address = Address([1u8; 32]);

        store.put(address, vec![1]).unwrap();
        store.put(address, vec![1]).unwrap();
        assert_eq!(store.chunk_count(), 1);
    }

    #[test]
    fn test_address_formatting() {
        let address = Address([0xab; 32]);
        assert_eq!(address.to_string(), "ab".repeat(32));
        assert_eq!(format!("{:?}", address), "Address(abababab)");
    }
}
