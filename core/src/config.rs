//! Configuration for the core crate
//!
//! This module provides configuration options for the core crate,
//! including content hashing, persistent map node sizes, row validation
//! and logging.

use serde::{Serialize, Deserialize};

use crate::error::{CoreError, Result};

/// Hash algorithm used to address map chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-256
    Sha256,

    /// Blake2s
    Blake2s,

    /// Keccak-256
    Keccak256,
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Sha256
    }
}

/// Persistent map configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Hash algorithm used for chunk addresses
    pub hash_algorithm: HashAlgorithm,

    /// Maximum number of entries in a leaf node
    pub max_leaf_entries: usize,

    /// Maximum number of children of an internal node
    pub max_branch_factor: usize,
}

impl MapConfig {
    /// Check that node sizes can hold a split
    pub fn validate(&self) -> Result<()> {
        if self.max_leaf_entries < 2 {
            return Err(CoreError::ConfigError(format!(
                "max_leaf_entries must be at least 2, got {}",
                self.max_leaf_entries
            )));
        }
        if self.max_branch_factor < 2 {
            return Err(CoreError::ConfigError(format!(
                "max_branch_factor must be at least 2, got {}",
                self.max_branch_factor
            )));
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            hash_algorithm: HashAlgorithm::default(),
            max_leaf_entries: 32,
            max_branch_factor: 32,
        }
    }
}

/// Core configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Persistent map configuration
    pub map: MapConfig,

    /// Whether writers validate rows against the schema before encoding
    pub validate_rows_on_write: bool,

    /// Whether chunks are checked against their address when loaded
    pub verify_chunks_on_load: bool,

    /// Log level
    pub log_level: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            map: MapConfig::default(),
            validate_rows_on_write: true,
            verify_chunks_on_load: true,
            log_level: "info".to_string(),
        }
    }
}

impl StoreConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: StoreConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_file(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.map.validate()
    }

    /// Create a development configuration
    pub fn development() -> Self {
        let mut config = Self::default();
        config.log_level = "debug".to_string();
        config
    }

    /// Create a testing configuration
    ///
    /// Small nodes so that modest row counts exercise splits and multi-level
    /// trees.
    pub fn testing() -> Self {
        let mut config = Self::default();
        config.log_level = "debug".to_string();
        config.map.max_leaf_entries = 4;
        config.map.max_branch_factor = 4;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();

        assert_eq!(config.map.hash_algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.map.max_leaf_entries, 32);
        assert_eq!(config.map.max_branch_factor, 32);
        assert!(config.validate_rows_on_write);
        assert!(config.verify_chunks_on_load);
        assert_eq!(config.log_level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(StoreConfig::development().log_level, "debug");

        let config = StoreConfig::testing();
        assert_eq!(config.map.max_leaf_entries, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_tiny_nodes() {
        let mut config = StoreConfig::default();
        config.map.max_leaf_entries = 1;
        assert!(matches!(config.validate(), Err(CoreError::ConfigError(_))));

        let mut config = StoreConfig::default();
        config.map.max_branch_factor = 0;
        assert!(matches!(config.validate(), Err(CoreError::ConfigError(_))));
    }

    #[test]
    fn test_config_serialization() {
        let mut config = StoreConfig::default();
        config.map.hash_algorithm = HashAlgorithm::Blake2s;

        let json = serde_json::to_string_pretty(&config).unwrap();
        let deserialized: StoreConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.map, config.map);
        assert_eq!(deserialized.log_level, config.log_level);
    }

    #[test]
    fn test_config_file_io() {
        let config = StoreConfig::testing();

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        config.to_file(path).unwrap();
        let loaded_config = StoreConfig::from_file(path).unwrap();

        assert_eq!(loaded_config.map, config.map);
        assert_eq!(loaded_config.verify_chunks_on_load, config.verify_chunks_on_load);
    }

    #[test]
    fn test_from_file_missing() {
        assert!(matches!(
            StoreConfig::from_file("/nonexistent/rowstore.json"),
            Err(CoreError::IoError(_))
        ));
    }
}
