//! SQLite persistence layer.
//!
//! RULE: Only store/ talks to the database.
//! Ledgers go through the SnapshotStore trait and never execute SQL.

use crate::{error::CoreResult, types::Timestamp};
use rusqlite::Connection;

mod snapshot;

/// Whole-value key/value persistence for ledger snapshots.
///
/// Reads and writes are independent calls with no isolation between
/// them. A read-modify-write cycle by two writers on the same key may
/// lose one update; the last write wins.
pub trait SnapshotStore {
    /// The stored payload for `key`, or `None` if the key was never written
    /// or has been removed.
    fn load_snapshot(&self, key: &str) -> CoreResult<Option<String>>;

    /// Replace the payload for `key` entirely, stamped with `updated_at`.
    fn save_snapshot(&self, key: &str, payload: &str, updated_at: Timestamp) -> CoreResult<()>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove_snapshot(&self, key: &str) -> CoreResult<()>;
}

pub struct UsageStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl UsageStore {
    pub fn open(path: &str) -> CoreResult<Self> {
        if path == ":memory:" {
            return Self::in_memory();
        }
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> CoreResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self { conn, path: None })
    }

    /// Open and migrate in one step.
    pub fn open_migrated(path: &str) -> CoreResult<Self> {
        let store = Self::open(path)?;
        store.migrate()?;
        Ok(store)
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new in-memory database (isolated).
    /// For file-based databases, this opens the same file.
    pub fn reopen(&self) -> CoreResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> CoreResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_usage_snapshot.sql"))?;
        Ok(())
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }
}
