//! Store methods for ledger snapshots.

use crate::{error::CoreResult, types::Timestamp};
use rusqlite::{params, OptionalExtension};

use super::{SnapshotStore, UsageStore};

impl SnapshotStore for UsageStore {
    fn load_snapshot(&self, key: &str) -> CoreResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM usage_snapshot WHERE storage_key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn save_snapshot(&self, key: &str, payload: &str, updated_at: Timestamp) -> CoreResult<()> {
        self.conn.execute(
            "INSERT INTO usage_snapshot (storage_key, payload, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(storage_key) DO UPDATE
             SET payload = excluded.payload, updated_at = excluded.updated_at",
            params![key, payload, updated_at.to_rfc3339()],
        )?;
        Ok(())
    }

    fn remove_snapshot(&self, key: &str) -> CoreResult<()> {
        self.conn.execute(
            "DELETE FROM usage_snapshot WHERE storage_key = ?1",
            params![key],
        )?;
        Ok(())
    }
}

impl UsageStore {
    // ── Test / summary helpers ────────────────────────────────────────

    /// Number of storage keys currently holding a snapshot.
    pub fn snapshot_count(&self) -> CoreResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM usage_snapshot",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Last write time of a key, as stored (RFC 3339).
    pub fn snapshot_updated_at(&self, key: &str) -> CoreResult<Option<String>> {
        let at = self
            .conn
            .query_row(
                "SELECT updated_at FROM usage_snapshot WHERE storage_key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(at)
    }
}
