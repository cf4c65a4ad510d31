//! Store Module
//!
//! The facade that coordinates the key index and the record store.
//!
//! ## Responsibilities
//! - Bootstrap the store directory and files on open
//! - Validate every operation against the key index before touching data
//! - Keep the index in step with the data file after each mutation
//! - Explicit consistency check and repair
//!
//! ## Mutation order
//! ```text
//! write:  validate key → capacity → index check → append line  → index add
//! delete: validate key → index check            → rewrite file → index remove
//! ```
//!
//! The two steps of a mutation are not transactional. A failure between
//! them leaves the files disagreeing until `repair()` is run.

use std::collections::HashSet;
use std::env;
use std::fs::{self, OpenOptions};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{Result, StoreError};
use crate::index::KeyIndex;
use crate::key::InternalKey;
use crate::record::RecordStore;

/// A local key-value store: one data file plus one key index file
#[derive(Debug)]
pub struct Store {
    /// Store configuration
    config: Config,

    /// Existence authority, loaded into memory on open
    index: KeyIndex,

    /// Line-delimited record file
    records: RecordStore,
}

/// Outcome of comparing the key index with the data file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConsistencyReport {
    /// Indexed keys with no record line
    pub missing_records: Vec<String>,

    /// Record lines whose key is not indexed
    pub unindexed_records: Vec<String>,

    /// Keys stored on more than one line
    pub duplicate_records: Vec<String>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_records.is_empty()
            && self.unindexed_records.is_empty()
            && self.duplicate_records.is_empty()
    }
}

impl Store {
    /// Open or create a store with the given config
    ///
    /// On open:
    /// 0. Validate the config; nothing is created for a rejected one
    /// 1. Create the parent directory if it doesn't exist
    /// 2. Create an empty data file if missing
    /// 3. Create an `[]` index file if missing, otherwise load it
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;

        let data_path = config.data_path.clone();
        let index_path = config.index_path();

        // Step 1: Directory
        fs::create_dir_all(config.store_dir())?;

        // Step 2: Data file
        if !data_path.exists() {
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&data_path)?;
            tracing::info!(path = %data_path.display(), "Created store");
        }

        // Step 3: Index file
        let index = if index_path.exists() {
            KeyIndex::load(&index_path)?
        } else {
            let index = KeyIndex::create(&index_path)?;
            tracing::info!(path = %index_path.display(), "Created index file");
            index
        };

        let records = RecordStore::new(&data_path, config.max_data_size, config.sync_writes);

        tracing::debug!(
            path = %data_path.display(),
            keys = index.len(),
            "Store opened"
        );

        Ok(Self {
            config,
            index,
            records,
        })
    }

    /// Open with a data file path (convenience method)
    ///
    /// Uses default config with the specified data file
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_path(path).build())
    }

    /// Store `value` under a new key.
    ///
    /// Fails with `DuplicateKey` if the key already exists; values are never
    /// overwritten.
    pub fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        // Step 1: Validate the key
        let internal = InternalKey::from_raw(key)?;

        // Step 2: Capacity guard
        self.records.check_capacity()?;

        // Step 3: Existence check
        if self.index.contains(&internal) {
            return Err(StoreError::DuplicateKey(key.to_string()));
        }

        // Step 4: Append the record
        self.records.append(&internal, value)?;

        // Step 5: Index the key
        self.index.add(internal)?;

        tracing::debug!(key, "Stored record");
        Ok(())
    }

    /// Get the value stored under `key`
    pub fn read(&self, key: &str) -> Result<Value> {
        let internal = self.indexed_key(key)?;

        match self.records.scan_for_key(&internal)? {
            Some(envelope) => {
                tracing::debug!(key, "Read record");
                Ok(envelope.data)
            }
            None => {
                tracing::warn!(key, "Indexed key has no record in the data file");
                Err(StoreError::InternalConsistency(format!(
                    "key {:?} is indexed but has no record",
                    key
                )))
            }
        }
    }

    /// Get the value stored under `key`, decoded as `T`
    pub fn read_as<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let value = self.read(key)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Remove `key` and its record
    pub fn delete(&mut self, key: &str) -> Result<()> {
        let internal = self.indexed_key(key)?;

        // Step 1: Rewrite the data file without the record
        let removed = self
            .records
            .delete_line(&internal, self.config.match_rule)?;

        if removed == 0 {
            tracing::warn!(key, "Indexed key had no record line to remove");
        } else if removed > 1 {
            tracing::warn!(key, removed, "Removed more than one line for key");
        }

        // Step 2: Drop the key from the index
        self.index.remove(&internal)?;

        tracing::debug!(key, "Deleted record");
        Ok(())
    }

    /// Remove the data file, the index file and, unless it is the working
    /// directory, their containing directory.
    ///
    /// The directory is removed with `remove_dir`, so a directory holding
    /// any other file fails with `Io`.
    pub fn delete_store(self) -> Result<()> {
        let dir = self.config.store_dir().to_path_buf();

        fs::remove_file(self.records.path())?;
        fs::remove_file(self.index.path())?;

        if !is_working_dir(&dir)? {
            fs::remove_dir(&dir)?;
        }

        tracing::info!(path = %self.config.data_path.display(), "Deleted store");
        Ok(())
    }

    /// Check whether `key` exists
    pub fn contains(&self, key: &str) -> Result<bool> {
        let internal = InternalKey::from_raw(key)?;
        Ok(self.index.contains(&internal))
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.index.keys().iter().map(|k| k.raw())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Live records as `(key, value)` pairs in file order
    pub fn records(&self) -> Result<impl Iterator<Item = Result<(String, Value)>>> {
        Ok(self.records.iter()?.map(|record| {
            record.map(|r| (r.key.raw().to_string(), r.envelope.data))
        }))
    }

    /// Compare the key index against the data file
    pub fn check(&self) -> Result<ConsistencyReport> {
        let mut report = ConsistencyReport::default();
        let mut seen = HashSet::new();
        let mut reported_duplicates = HashSet::new();

        for record in self.records.iter()? {
            let record = record?;
            if !self.index.contains(&record.key) && !seen.contains(&record.key) {
                report.unindexed_records.push(record.key.raw().to_string());
            }
            if !seen.insert(record.key.clone()) && reported_duplicates.insert(record.key.clone()) {
                report.duplicate_records.push(record.key.raw().to_string());
            }
        }

        for key in self.index.keys() {
            if !seen.contains(key) {
                report.missing_records.push(key.raw().to_string());
            }
        }

        if !report.is_consistent() {
            tracing::warn!(
                missing = report.missing_records.len(),
                unindexed = report.unindexed_records.len(),
                duplicates = report.duplicate_records.len(),
                "Store is inconsistent"
            );
        }

        Ok(report)
    }

    /// Rebuild the key index from the data file.
    ///
    /// Keys are indexed in order of first appearance. Duplicate lines are
    /// left in place; `read` returns the first of them.
    pub fn repair(&mut self) -> Result<ConsistencyReport> {
        let report = self.check()?;
        if report.is_consistent() {
            return Ok(report);
        }

        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for record in self.records.iter()? {
            let record = record?;
            if seen.insert(record.key.clone()) {
                keys.push(record.key);
            }
        }

        self.index.replace(keys)?;
        tracing::info!(keys = self.index.len(), "Rebuilt key index from data file");
        Ok(report)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the data file path
    pub fn data_path(&self) -> &Path {
        self.records.path()
    }

    /// Get the index file path
    pub fn index_path(&self) -> &Path {
        self.index.path()
    }

    /// Current data file size in bytes
    pub fn data_size(&self) -> Result<u64> {
        self.records.size()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Validate `key` and require it to be indexed
    fn indexed_key(&self, key: &str) -> Result<InternalKey> {
        let internal = InternalKey::from_raw(key)?;
        if !self.index.contains(&internal) {
            return Err(StoreError::KeyNotFound(key.to_string()));
        }
        Ok(internal)
    }
}

/// Whether `dir` names the current working directory
fn is_working_dir(dir: &Path) -> Result<bool> {
    let cwd = env::current_dir()?;
    Ok(fs::canonicalize(dir)? == fs::canonicalize(cwd)?)
}
