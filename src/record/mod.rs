//! Record Store Module
//!
//! Append-only, line-delimited JSON storage of key → envelope records.
//!
//! ## Responsibilities
//! - Append one record per write, never rewriting in place
//! - Remove records by rewriting the file without their lines
//! - Point lookups by linear scan
//! - Refuse appends once the file reaches its size ceiling
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ {"key1~|~|":{"data":"A"}}\n                   │
//! │ {"key2~|~|":{"data":{"nested":[1,2,3]}}}\n    │
//! │ ...  (one JSON object with one key per line)  │
//! └──────────────────────────────────────────────┘
//! ```

mod iterator;
mod store;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::key::InternalKey;

pub use iterator::RecordIter;
pub use store::RecordStore;

/// The `{"data": value}` wrapper stored for every record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub data: Value,
}

/// One live line of the data file
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub key: InternalKey,
    pub envelope: Envelope,
}

/// Borrowed envelope used on the write path so callers need not build a `Value`
#[derive(Serialize)]
struct EnvelopeRef<'a, T: Serialize + ?Sized> {
    data: &'a T,
}

/// Encode a record as a single line, without the trailing newline
pub(crate) fn encode_line<T: Serialize + ?Sized>(key: &InternalKey, value: &T) -> Result<String> {
    let mut line = BTreeMap::new();
    line.insert(key.as_str(), EnvelopeRef { data: value });
    Ok(serde_json::to_string(&line)?)
}

/// Decode one data file line. `line_no` is 1-based and only used for errors.
pub(crate) fn decode_line(path: &Path, line_no: usize, line: &str) -> Result<Record> {
    let mut object: BTreeMap<String, Envelope> =
        serde_json::from_str(line).map_err(|e| StoreError::parse(path, Some(line_no), e))?;

    if object.len() != 1 {
        return Err(StoreError::parse(
            path,
            Some(line_no),
            format!("expected exactly one key per record, found {}", object.len()),
        ));
    }

    let (stored, envelope) = object
        .pop_first()
        .ok_or_else(|| StoreError::parse(path, Some(line_no), "empty record"))?;

    let key = InternalKey::from_stored(stored.clone()).ok_or_else(|| {
        StoreError::parse(path, Some(line_no), format!("{:?} is not a stored key", stored))
    })?;

    Ok(Record { key, envelope })
}
