//! Local library persistence.
//!
//! Favorites, ratings and watch history all share the same shape: a small
//! keyed list serialized as one JSON document in a [`StorageSlot`]. The
//! generic [`RecordStore`] carries that shape once; the typed stores in
//! [`favorites`], [`ratings`] and [`watch_history`] layer their own rules
//! on top.
//!
//! Failure policy mirrors the session stores: unreadable or corrupt slots
//! degrade to an empty library with a warning, and write failures are
//! logged and dropped rather than surfaced to the request path.

mod favorites;
mod ratings;
mod slot;
mod watch_history;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

pub use favorites::Favorites;
pub use ratings::Ratings;
pub use slot::{FileSlot, MemorySlot, StorageSlot};
pub use watch_history::{PlaybackPosition, WatchHistory};

use marquee_model::{MovieSummary, RatedMovie, WatchedMovie};

/// A record that can live in a [`RecordStore`]: serializable and keyed by
/// the movie it concerns.
pub trait StoreRecord: Serialize + DeserializeOwned + Clone {
    fn key(&self) -> u64;
}

impl StoreRecord for MovieSummary {
    fn key(&self) -> u64 {
        self.id
    }
}

impl StoreRecord for RatedMovie {
    fn key(&self) -> u64 {
        self.movie.id
    }
}

impl StoreRecord for WatchedMovie {
    fn key(&self) -> u64 {
        self.id
    }
}

/// A keyed list of records persisted whole into one slot.
///
/// Loading is lazy and happens at most once; every mutation rewrites the
/// full document. At the sizes involved (tens of entries) this is cheaper
/// than being clever.
pub struct RecordStore<R: StoreRecord> {
    slot: Box<dyn StorageSlot>,
    records: Vec<R>,
    loaded: bool,
}

impl<R: StoreRecord> RecordStore<R> {
    pub fn open(slot: impl StorageSlot + 'static) -> Self {
        Self {
            slot: Box::new(slot),
            records: Vec::new(),
            loaded: false,
        }
    }

    fn ensure_loaded(&mut self) {
        if self.loaded {
            return;
        }
        self.loaded = true;

        let raw = match self.slot.read() {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(err) => {
                warn!(
                    slot = self.slot.name(),
                    "failed to read library slot, starting empty: {err}"
                );
                return;
            }
        };

        match serde_json::from_str::<Vec<R>>(&raw) {
            Ok(records) => self.records = records,
            Err(err) => {
                warn!(
                    slot = self.slot.name(),
                    "corrupt library slot, starting empty: {err}"
                );
            }
        }
    }

    fn persist(&mut self) {
        let serialized = match serde_json::to_string(&self.records) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(
                    slot = self.slot.name(),
                    "failed to serialize library slot: {err}"
                );
                return;
            }
        };
        if let Err(err) = self.slot.write(&serialized) {
            warn!(
                slot = self.slot.name(),
                "failed to write library slot, update dropped: {err}"
            );
        }
    }

    pub fn records(&mut self) -> &[R] {
        self.ensure_loaded();
        &self.records
    }

    pub fn contains(&mut self, key: u64) -> bool {
        self.ensure_loaded();
        self.records.iter().any(|r| r.key() == key)
    }

    pub fn find(&mut self, key: u64) -> Option<&R> {
        self.ensure_loaded();
        self.records.iter().find(|r| r.key() == key)
    }

    /// Replace the record with the same key, or append.
    pub fn upsert(&mut self, record: R) {
        self.ensure_loaded();
        match self.records.iter_mut().find(|r| r.key() == record.key()) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        self.persist();
    }

    /// Append only when no record with the same key exists. Returns
    /// whether the record was inserted.
    pub fn insert_if_absent(&mut self, record: R) -> bool {
        self.ensure_loaded();
        if self.records.iter().any(|r| r.key() == record.key()) {
            return false;
        }
        self.records.push(record);
        self.persist();
        true
    }

    /// Remove by key; a missing key is a no-op and does not rewrite the
    /// slot. Returns whether a record was removed.
    pub fn remove(&mut self, key: u64) -> bool {
        self.ensure_loaded();
        let before = self.records.len();
        self.records.retain(|r| r.key() != key);
        if self.records.len() == before {
            return false;
        }
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        self.ensure_loaded();
        if self.records.is_empty() {
            return;
        }
        self.records.clear();
        self.persist();
    }

    /// Mutate the whole list in place, then rewrite the slot.
    pub fn apply(&mut self, f: impl FnOnce(&mut Vec<R>)) {
        self.ensure_loaded();
        f(&mut self.records);
        self.persist();
    }
}
