//! Internal key encoding
//!
//! Every caller key is stored with a fixed 4-character suffix so record
//! keys stay namespaced from any other key kind kept in the same files.
//!
//! ```text
//! raw:       "user:42"
//! internal:  "user:42~|~|"
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError};

/// Reserved suffix appended to every stored key
pub const KEY_DELIMITER: &str = "~|~|";

/// A delimiter-suffixed key, the only form written to disk
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InternalKey(String);

impl InternalKey {
    /// Build the internal form of a caller key.
    ///
    /// Fails with `InvalidKey` for an empty key.
    pub fn from_raw(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(StoreError::InvalidKey("key must not be empty".to_string()));
        }
        Ok(Self(format!("{}{}", raw, KEY_DELIMITER)))
    }

    /// Accept a string read back from disk. Returns `None` unless it carries
    /// the delimiter and a non-empty raw part.
    pub fn from_stored(stored: impl Into<String>) -> Option<Self> {
        let stored = stored.into();
        match stored.strip_suffix(KEY_DELIMITER) {
            Some(raw) if !raw.is_empty() => Some(Self(stored)),
            _ => None,
        }
    }

    /// The caller-facing key without the delimiter
    pub fn raw(&self) -> &str {
        &self.0[..self.0.len() - KEY_DELIMITER.len()]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InternalKey {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        InternalKey::from_stored(value.clone())
            .ok_or_else(|| format!("{:?} is not a stored key (missing {:?} suffix)", value, KEY_DELIMITER))
    }
}

impl From<InternalKey> for String {
    fn from(key: InternalKey) -> Self {
        key.0
    }
}

impl fmt::Display for InternalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw())
    }
}
