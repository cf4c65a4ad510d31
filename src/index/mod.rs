//! Key Index Module
//!
//! The persisted list of live internal keys.
//!
//! ## Responsibilities
//! - Authoritative "does key K exist" check
//! - Enumeration of keys in insertion order
//! - Whole-file rewrite on every mutation
//!
//! ## File Format
//! ```text
//! ["key1~|~|","key2~|~|","key3~|~|"]
//! ```
//!
//! A linear `Vec` is used rather than a set: lookups are O(n), which is
//! fine at this scale, and insertion order survives a round trip.

mod key_index;

pub use key_index::KeyIndex;
