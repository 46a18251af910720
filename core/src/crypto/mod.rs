//! Content hashing
//!
//! This module provides domain-separated hashing used to address the chunks
//! persistent maps are made of.

mod hasher;

pub use hasher::{SecureHasher, Sha256Hasher, Blake2sHasher, KeccakHasher};

use constant_time_eq::constant_time_eq;

use crate::config::HashAlgorithm;

/// Create a hasher for an algorithm
pub fn hasher_for(algorithm: HashAlgorithm) -> Box<dyn SecureHasher> {
    match algorithm {
        HashAlgorithm::Sha256 => Box::new(Sha256Hasher::new()),
        HashAlgorithm::Blake2s => Box::new(Blake2sHasher::new()),
        HashAlgorithm::Keccak256 => Box::new(KeccakHasher::new()),
    }
}

/// Create a domain-separated hash of `data`
///
/// # Arguments
///
/// * `algorithm` - Hash algorithm to use
/// * `domain` - Domain prefix (e.g., "LEAF", "NODE")
/// * `data` - Data to hash
pub fn secure_hash(algorithm: HashAlgorithm, domain: &str, data: &[u8]) -> [u8; 32] {
    hasher_for(algorithm).hash_with_domain(domain, data)
}

/// Compare two hashes in constant time
pub fn verify_hash(expected: &[u8; 32], actual: &[u8; 32]) -> bool {
    constant_time_eq(expected, actual)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_hash() {
        let data = b"test data";
        let hash = secure_hash(HashAlgorithm::Sha256, "TEST", data);

        assert_eq!(hash, secure_hash(HashAlgorithm::Sha256, "TEST", data));
        assert_ne!(hash, secure_hash(HashAlgorithm::Sha256, "DIFFERENT", data));
        assert_ne!(hash, secure_hash(HashAlgorithm::Sha256, "TEST", b"different data"));
    }

    #[test]
    fn test_algorithms_differ() {
        let data = b"chunk";
        let sha = secure_hash(HashAlgorithm::Sha256, "TEST", data);
        let blake = secure_hash(HashAlgorithm::Blake2s, "TEST", data);
        let keccak = secure_hash(HashAlgorithm::Keccak256, "TEST", data);

        assert_ne!(sha, blake);
        assert_ne!(sha, keccak);
        assert_ne!(blake, keccak);
    }

    #[test]
    fn test_verify_hash() {
        let hash = secure_hash(HashAlgorithm::Sha256, "TEST", b"test data");
        let other = secure_hash(HashAlgorithm::Sha256, "TEST", b"other data");

        assert!(verify_hash(&hash, &hash));
        assert!(!verify_hash(&hash, &other));
    }
}
