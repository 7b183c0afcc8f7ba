//! Shared primitive types used across the crate.

use chrono::{DateTime, Utc};

/// Unique identifier of a usage record (UUID v4, hyphenated).
pub type RecordId = String;

/// Creation instant of a usage record. Serialized as ISO-8601.
pub type Timestamp = DateTime<Utc>;

/// A key in the snapshot store. One ledger owns exactly one key.
pub type StorageKey = &'static str;
