//! Configuration for linekv
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// Data file size at or above which appends are refused (1 GiB)
pub const MAX_DATA_FILE_SIZE: u64 = 1 << 30;

/// File name of the key index, placed next to the data file
pub const INDEX_FILENAME: &str = "keys.json";

/// Main configuration for a store instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the line-delimited JSON data file.
    /// The key index lives in the same directory:
    ///   {parent}/
    ///     ├── store.json       (records, one JSON object per line)
    ///     └── keys.json        (key index, single JSON array)
    ///
    /// Stores whose data files share a directory also share one index file.
    /// The data file may not itself be named `keys.json` or `keys.json.tmp`.
    pub data_path: PathBuf,

    /// Appends are refused once the data file reaches this many bytes
    pub max_data_size: u64,

    /// fsync the data file after every append
    pub sync_writes: bool,

    // -------------------------------------------------------------------------
    // Delete Configuration
    // -------------------------------------------------------------------------
    /// How delete decides which data file lines belong to a key
    pub match_rule: MatchRule,
}

/// Line matching rule used when deleting a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchRule {
    /// Parse each line and compare its key field exactly
    #[default]
    KeyField,

    /// Drop any line whose raw text contains the internal key.
    /// A value that embeds the key text is dropped as well.
    Substring,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            // Relative, so it resolves against the working directory at open time
            data_path: PathBuf::from("store").join("store.json"),
            max_data_size: MAX_DATA_FILE_SIZE,
            sync_writes: true,
            match_rule: MatchRule::KeyField,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Directory holding the data and index files.
    /// A bare file name lives in the working directory.
    pub fn store_dir(&self) -> &Path {
        match self.data_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Path of the key index file
    pub fn index_path(&self) -> PathBuf {
        self.store_dir().join(INDEX_FILENAME)
    }

    /// Reject a data path that would collide with the index file or with
    /// its temp sibling. Both live in the same directory, so comparing file
    /// names is enough.
    pub fn validate(&self) -> Result<()> {
        let name = self.data_path.file_name().ok_or_else(|| {
            StoreError::Config(format!(
                "data path {} has no file name",
                self.data_path.display()
            ))
        })?;

        let index_tmp = format!("{}.tmp", INDEX_FILENAME);
        if name == INDEX_FILENAME || name == index_tmp.as_str() {
            return Err(StoreError::Config(format!(
                "data path {} collides with the key index file",
                self.data_path.display()
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data file path
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_path = path.into();
        self
    }

    /// Set the data file size ceiling (in bytes)
    pub fn max_data_size(mut self, size: u64) -> Self {
        self.config.max_data_size = size;
        self
    }

    /// Enable or disable fsync after each append
    pub fn sync_writes(mut self, sync: bool) -> Self {
        self.config.sync_writes = sync;
        self
    }

    /// Set the delete matching rule
    pub fn match_rule(mut self, rule: MatchRule) -> Self {
        self.config.match_rule = rule;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
