//! # linekv
//!
//! A minimal local key-value store with:
//! - Append-only, line-delimited JSON record file
//! - A persisted key index as the existence authority
//! - Deletion by full rewrite through a temp file and rename
//! - A fixed size ceiling on the record file
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Store                                │
//! │           (validate → mutate data → update index)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  KeyIndex   │          │ RecordStore │
//!   │ (keys.json) │          │(store.json) │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use linekv::{Config, Store};
//!
//! let config = Config::builder().data_path("store/store.json").build();
//! let mut store = Store::open(config)?;
//!
//! store.write("key1", "A")?;
//! assert_eq!(store.read("key1")?, serde_json::json!("A"));
//! store.delete("key1")?;
//! # Ok::<(), linekv::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod key;
pub mod index;
pub mod record;
pub mod store;
pub mod display;

mod atomic;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{StoreError, Result};
pub use config::{Config, MatchRule};
pub use key::{InternalKey, KEY_DELIMITER};
pub use store::{ConsistencyReport, Store};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of linekv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
