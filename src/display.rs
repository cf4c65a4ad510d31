//! Human-readable rendering and export of store contents.
//!
//! Read-only: nothing here changes the data or index file.

use std::fmt::Write;

use serde_json::{Map, Value};

use crate::error::Result;
use crate::store::Store;

const RULE_WIDTH: usize = 50;

impl Store {
    /// Render every live record as a plain text table
    ///
    /// ```text
    /// ==================================================
    /// key        data
    /// ==================================================
    ///
    /// key1    :    "A"
    ///
    /// ==================================================
    /// ```
    pub fn render_table(&self) -> Result<String> {
        if self.is_empty() {
            return Ok("No data is present in the store\n".to_string());
        }

        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "key        data");
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out);

        for record in self.records()? {
            let (key, value) = record?;
            let _ = writeln!(out, "{}    :    {}", key, value);
            let _ = writeln!(out);
        }

        let _ = writeln!(out, "{}", rule);
        Ok(out)
    }

    /// All live records as one JSON object of key → value
    pub fn export(&self) -> Result<Map<String, Value>> {
        let mut out = Map::new();
        for record in self.records()? {
            let (key, value) = record?;
            out.insert(key, value);
        }
        Ok(out)
    }
}
