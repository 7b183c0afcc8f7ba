//! Usage ledger: a bounded, newest-first log of user actions.
//!
//! RULES:
//!   - Records are immutable once recorded.
//!   - The snapshot never holds more than `capacity` records.
//!   - Eviction always drops the oldest (tail) records.
//!   - Recording is best-effort: storage failures are logged, never
//!     returned. A broken ledger must not break the calling flow.

use crate::{
    clock::Clock,
    config::StorageConfig,
    error::CoreResult,
    store::SnapshotStore,
    types::{RecordId, StorageKey, Timestamp},
};
use serde::{de::DeserializeOwned, Serialize};
use std::{collections::HashMap, hash::Hash, marker::PhantomData};
use uuid::Uuid;

/// A record type that can live in a ledger.
pub trait UsageRecord: Serialize + DeserializeOwned + Clone {
    /// Caller-supplied fields; the ledger adds id and timestamp.
    type Draft;

    /// Snapshot key this record type is persisted under.
    const STORAGE_KEY: StorageKey;

    /// Retention bound for this record type.
    fn capacity(config: &StorageConfig) -> usize;

    fn from_draft(id: RecordId, recorded_at: Timestamp, draft: Self::Draft) -> Self;

    fn id(&self) -> &str;
    fn recorded_at(&self) -> Timestamp;
    fn user_id(&self) -> Option<&str>;
}

pub struct Ledger<'a, R> {
    store:    &'a dyn SnapshotStore,
    clock:    &'a dyn Clock,
    capacity: usize,
    _record:  PhantomData<fn() -> R>,
}

impl<'a, R: UsageRecord> Ledger<'a, R> {
    pub fn new(store: &'a dyn SnapshotStore, clock: &'a dyn Clock, capacity: usize) -> Self {
        Self {
            store,
            clock,
            capacity,
            _record: PhantomData,
        }
    }

    pub fn from_config(
        store:  &'a dyn SnapshotStore,
        clock:  &'a dyn Clock,
        config: &StorageConfig,
    ) -> Self {
        Self::new(store, clock, R::capacity(config))
    }

    pub fn key(&self) -> StorageKey {
        R::STORAGE_KEY
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    // ── Writes ─────────────────────────────────────────────────────

    /// Stamp the draft, prepend it, trim to capacity, persist the whole
    /// snapshot. Returns the record even when persisting failed.
    pub fn record(&self, draft: R::Draft) -> R {
        let entry = R::from_draft(Uuid::new_v4().to_string(), self.clock.now(), draft);

        let mut records = self.list();
        records.insert(0, entry.clone());
        if records.len() > self.capacity {
            log::debug!(
                "ledger={} evicting {} oldest record(s)",
                self.key(),
                records.len() - self.capacity
            );
            records.truncate(self.capacity);
        }

        if let Err(e) = self.persist(&records, entry.recorded_at()) {
            log::warn!("ledger={} write failed, record {} not persisted: {e}", self.key(), entry.id());
        }
        entry
    }

    /// Remove the whole snapshot. Clearing an empty ledger succeeds.
    pub fn clear(&self) {
        match self.store.remove_snapshot(self.key()) {
            Ok(()) => log::info!("ledger={} cleared", self.key()),
            Err(e) => log::warn!("ledger={} clear failed: {e}", self.key()),
        }
    }

    // ── Reads ──────────────────────────────────────────────────────

    /// Full snapshot, newest first. Missing, unreadable or corrupt
    /// snapshots read as empty.
    pub fn list(&self) -> Vec<R> {
        match self.load() {
            Ok(records) => records,
            Err(e) => {
                log::warn!("ledger={} read failed, treating as empty: {e}", self.key());
                Vec::new()
            }
        }
    }

    pub fn count(&self) -> usize {
        self.list().len()
    }

    pub fn filter_by_user(&self, user_id: &str) -> Vec<R> {
        self.list()
            .into_iter()
            .filter(|r| r.user_id() == Some(user_id))
            .collect()
    }

    /// Records stamped within `[start, end]`, both ends inclusive.
    pub fn filter_by_range(&self, start: Timestamp, end: Timestamp) -> Vec<R> {
        self.list()
            .into_iter()
            .filter(|r| {
                let at = r.recorded_at();
                at >= start && at <= end
            })
            .collect()
    }

    pub fn average_of(&self, field: impl Fn(&R) -> f64) -> f64 {
        mean(self.list().iter().map(field))
    }

    pub fn top_by<K, F>(&self, limit: usize, key: F) -> Vec<(K, usize)>
    where
        K: Eq + Hash + Clone,
        F: Fn(&R) -> K,
    {
        let records = self.list();
        tally(&records, key)
            .into_iter()
            .take(limit)
            .map(|t| (t.key, t.count))
            .collect()
    }

    fn load(&self) -> CoreResult<Vec<R>> {
        match self.store.load_snapshot(self.key())? {
            Some(payload) => Ok(serde_json::from_str(&payload)?),
            None => Ok(Vec::new()),
        }
    }

    fn persist(&self, records: &[R], at: Timestamp) -> CoreResult<()> {
        let payload = serde_json::to_string(records)?;
        self.store.save_snapshot(self.key(), &payload, at)
    }
}

// ── Aggregation helpers ────────────────────────────────────────────

/// One bucket of a frequency count.
#[derive(Debug, Clone)]
pub struct Tally<'r, R, K> {
    pub key:   K,
    pub count: usize,
    /// First record seen with this key, in scan order.
    pub first: &'r R,
}

/// Count records by key, most frequent first. Equal counts keep the
/// order in which their keys were first seen.
pub fn tally<R, K, F>(records: &[R], key: F) -> Vec<Tally<'_, R, K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&R) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut buckets: Vec<Tally<'_, R, K>> = Vec::new();

    for record in records {
        let k = key(record);
        match index.get(&k) {
            Some(&i) => buckets[i].count += 1,
            None => {
                index.insert(k.clone(), buckets.len());
                buckets.push(Tally { key: k, count: 1, first: record });
            }
        }
    }

    // sort_by is stable, which is what preserves first-seen order on ties.
    buckets.sort_by(|a, b| b.count.cmp(&a.count));
    buckets
}

/// Arithmetic mean, 0.0 for an empty sequence.
pub fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_breaks_ties_by_first_seen() {
        let words = ["b", "a", "c", "a", "b", "d"];
        let counts: Vec<(&str, usize)> = tally(&words, |w| *w)
            .into_iter()
            .map(|t| (t.key, t.count))
            .collect();
        assert_eq!(counts, vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean(std::iter::empty()), 0.0);
        assert_eq!(mean([1.0, 2.0, 6.0].into_iter()), 3.0);
    }
}
