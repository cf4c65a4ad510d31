//! Record Iterator
//!
//! Lazy, file-order iteration over the records of a data file.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::PathBuf;

use crate::error::Result;

use super::{decode_line, Record};

/// Iterator over records, yielding them in file order.
///
/// Blank lines are skipped. A malformed line yields one `Err` and ends the
/// iteration.
pub struct RecordIter {
    /// Data file path (for error messages)
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    /// Number of lines consumed so far
    line_no: usize,
    done: bool,
}

impl RecordIter {
    pub(super) fn new(path: PathBuf, file: File) -> Self {
        Self {
            path,
            lines: BufReader::new(file).lines(),
            line_no: 0,
            done: false,
        }
    }
}

impl Iterator for RecordIter {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            let record = decode_line(&self.path, self.line_no, &line);
            if record.is_err() {
                self.done = true;
            }
            return Some(record);
        }
    }
}
