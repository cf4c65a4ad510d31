//! Record Store implementation
//!
//! Every call opens the data file, does its work and closes it again; no
//! handle is kept between calls.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::atomic;
use crate::config::MatchRule;
use crate::error::{Result, StoreError};
use crate::key::InternalKey;

use super::{decode_line, encode_line, Envelope, RecordIter};

/// Line-delimited JSON data file
#[derive(Debug)]
pub struct RecordStore {
    /// Data file path
    path: PathBuf,
    /// Appends are refused at or above this size (bytes)
    max_size: u64,
    /// fsync after each append
    sync_writes: bool,
}

impl RecordStore {
    /// Attach to an existing data file
    pub fn new(path: &Path, max_size: u64, sync_writes: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            max_size,
            sync_writes,
        }
    }

    /// Current size of the data file in bytes
    pub fn size(&self) -> Result<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    /// Fail with `CapacityExceeded` if the data file is at its ceiling
    pub fn check_capacity(&self) -> Result<()> {
        let size = self.size()?;
        if size >= self.max_size {
            return Err(StoreError::CapacityExceeded {
                size,
                limit: self.max_size,
            });
        }
        Ok(())
    }

    /// Append `{key: {"data": value}}` as one line.
    ///
    /// Does not check whether `key` is already present; callers validate
    /// against the key index first. The capacity guard runs here as well,
    /// independently of any check the caller already made, so a direct
    /// append can never grow a full file.
    pub fn append<T: Serialize + ?Sized>(&self, key: &InternalKey, value: &T) -> Result<()> {
        self.check_capacity()?;

        let mut line = encode_line(key, value)?;
        line.push('\n');

        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        // Single write so a line is never interleaved with a partial buffer flush
        file.write_all(line.as_bytes())?;
        if self.sync_writes {
            file.sync_data()?;
        }

        Ok(())
    }

    /// Envelope of the first record stored under `key`, if any.
    ///
    /// Stops at the first match; keys are unique while the write path
    /// validates against the index.
    pub fn scan_for_key(&self, key: &InternalKey) -> Result<Option<Envelope>> {
        for record in self.iter()? {
            let record = record?;
            if &record.key == key {
                return Ok(Some(record.envelope));
            }
        }
        Ok(None)
    }

    /// Rewrite the data file without the lines belonging to `key`.
    ///
    /// Kept lines are copied in order into a temp sibling which is then
    /// renamed over the data file. Returns the number of lines removed.
    pub fn delete_line(&self, key: &InternalKey, rule: MatchRule) -> Result<usize> {
        let reader = BufReader::new(File::open(&self.path)?);
        let (tmp, file) = atomic::create_temp(&self.path)?;
        let mut writer = BufWriter::new(file);

        let filtered = self.copy_unmatched(reader, &mut writer, key, rule);
        let finished = filtered.and_then(|removed| {
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            Ok((removed, file))
        });

        match finished {
            Ok((removed, file)) => {
                atomic::commit(&tmp, file, &self.path)?;
                Ok(removed)
            }
            Err(e) => {
                let _ = fs::remove_file(&tmp);
                Err(e)
            }
        }
    }

    /// Lazy iterator over all records in file order.
    /// Reopens the file on every call.
    pub fn iter(&self) -> Result<RecordIter> {
        let file = File::open(&self.path)?;
        Ok(RecordIter::new(self.path.clone(), file))
    }

    /// Get the data file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the size ceiling
    pub fn max_size(&self) -> u64 {
        self.max_size
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn copy_unmatched(
        &self,
        reader: BufReader<File>,
        writer: &mut BufWriter<File>,
        key: &InternalKey,
        rule: MatchRule,
    ) -> Result<usize> {
        let mut removed = 0;

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if self.line_matches(i + 1, &line, key, rule)? {
                removed += 1;
                continue;
            }
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }

        writer.flush()?;
        Ok(removed)
    }

    fn line_matches(
        &self,
        line_no: usize,
        line: &str,
        key: &InternalKey,
        rule: MatchRule,
    ) -> Result<bool> {
        match rule {
            MatchRule::Substring => Ok(line.contains(key.as_str())),
            MatchRule::KeyField => {
                if line.trim().is_empty() {
                    return Ok(false);
                }
                let record = decode_line(&self.path, line_no, line)?;
                Ok(&record.key == key)
            }
        }
    }
}
