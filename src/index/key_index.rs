//! Key Index implementation
//!
//! In-memory `Vec<InternalKey>` mirrored to a JSON array file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::atomic;
use crate::error::{Result, StoreError};
use crate::key::InternalKey;

/// Ordered set of live internal keys backed by the index file
#[derive(Debug)]
pub struct KeyIndex {
    /// Index file path
    path: PathBuf,
    /// Keys in insertion order
    keys: Vec<InternalKey>,
}

impl KeyIndex {
    /// Load the index file.
    ///
    /// A zero-length file loads as an empty index. Anything that is not a
    /// JSON array of stored keys fails with `Parse`.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;

        let keys = if contents.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str::<Vec<InternalKey>>(&contents)
                .map_err(|e| StoreError::parse(path, None, e))?
        };

        Ok(Self {
            path: path.to_path_buf(),
            keys,
        })
    }

    /// Write an empty index to `path`
    pub fn create(path: &Path) -> Result<Self> {
        let index = Self {
            path: path.to_path_buf(),
            keys: Vec::new(),
        };
        index.persist()?;
        Ok(index)
    }

    /// Membership test (linear scan)
    pub fn contains(&self, key: &InternalKey) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Append a key and rewrite the index file
    pub fn add(&mut self, key: InternalKey) -> Result<()> {
        if self.contains(&key) {
            return Err(StoreError::DuplicateKey(key.raw().to_string()));
        }

        self.keys.push(key);
        if let Err(e) = self.persist() {
            // Keep memory in step with the file that is still on disk
            self.keys.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Remove a key and rewrite the index file
    pub fn remove(&mut self, key: &InternalKey) -> Result<()> {
        let pos = self
            .keys
            .iter()
            .position(|k| k == key)
            .ok_or_else(|| StoreError::KeyNotFound(key.raw().to_string()))?;

        let removed = self.keys.remove(pos);
        if let Err(e) = self.persist() {
            self.keys.insert(pos, removed);
            return Err(e);
        }
        Ok(())
    }

    /// Replace every key at once and rewrite the index file
    pub fn replace(&mut self, keys: Vec<InternalKey>) -> Result<()> {
        let previous = std::mem::replace(&mut self.keys, keys);
        if let Err(e) = self.persist() {
            self.keys = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Keys in insertion order
    pub fn keys(&self) -> &[InternalKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Get the index file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Whole-file rewrite of the current key list
    fn persist(&self) -> Result<()> {
        let encoded = serde_json::to_vec(&self.keys)?;
        atomic::write_atomic(&self.path, &encoded)
    }
}
