//! Secure hasher implementation with domain separation
//!
//! This module provides a trait for secure hasher implementations
//! and concrete implementations using different hash algorithms.

use sha2::{Sha256, Digest};
use blake2::Blake2s256;
use sha3::Keccak256;
use std::fmt::Debug;

/// SecureHasher trait for domain-separated hashing
pub trait SecureHasher: Debug + Send + Sync + 'static {
    /// Update the hasher with new data
    fn update(&mut self, data: &[u8]);

    /// Finalize the hash and return the result
    fn finalize(&mut self) -> [u8; 32];

    /// Hash data with domain separation
    fn hash_with_domain(&mut self, domain: &str, data: &[u8]) -> [u8; 32] {
        self.update(domain.as_bytes());

        // Domain length keeps prefixes of different domains apart
        self.update(&(domain.len() as u64).to_le_bytes());

        self.update(data);
        self.finalize()
    }
}

macro_rules! digest_hasher {
    ($(#[$doc:meta])* $name:ident, $inner:ty) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name {
            inner: $inner,
        }

        impl $name {
            /// Create a new hasher
            pub fn new() -> Self {
                $name {
                    inner: <$inner>::new(),
                }
            }
        }

        impl SecureHasher for $name {
            fn update(&mut self, data: &[u8]) {
                Digest::update(&mut self.inner, data);
            }

            fn finalize(&mut self) -> [u8; 32] {
                let result = self.inner.clone().finalize();
                let mut output = [0u8; 32];
                output.copy_from_slice(&result);
                output
            }
        }
    };
}

digest_hasher!(
    /// SHA-256 implementation of SecureHasher
    Sha256Hasher,
    Sha256
);

digest_hasher!(
    /// Blake2s implementation of SecureHasher
    Blake2sHasher,
    Blake2s256
);

digest_hasher!(
    /// Keccak-256 implementation of SecureHasher
    KeccakHasher,
    Keccak256
);
