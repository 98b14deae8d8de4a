use chrono::Utc;
use marquee_model::WatchedMovie;

use super::{RecordStore, StorageSlot};

/// Continue-watching shelf: most recent first, capped at
/// [`WatchHistory::MAX_ENTRIES`].
pub struct WatchHistory {
    store: RecordStore<WatchedMovie>,
}

/// Playback position reported when progress is recorded.
#[derive(Debug, Clone, Copy)]
pub struct PlaybackPosition {
    pub current_time: f64,
    pub duration: f64,
}

impl PlaybackPosition {
    /// Whole-number percentage, clamped to 0..=100. An unknown or zero
    /// duration reports 0 rather than dividing by it.
    fn progress(&self) -> u8 {
        if self.duration <= 0.0 {
            return 0;
        }
        let pct = (self.current_time / self.duration * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }
}

impl WatchHistory {
    pub const SLOT: &'static str = "watch_history";
    pub const MAX_ENTRIES: usize = 10;

    pub fn open(slot: impl StorageSlot + 'static) -> Self {
        Self { store: RecordStore::open(slot) }
    }

    pub fn all(&mut self) -> Vec<WatchedMovie> {
        self.store.records().to_vec()
    }

    /// Record playback progress for a movie, replacing any earlier entry
    /// for it, then re-sort and trim the shelf.
    pub fn record(
        &mut self,
        movie_id: u64,
        title: &str,
        poster_path: Option<String>,
        position: PlaybackPosition,
    ) {
        self.record_at(
            movie_id,
            title,
            poster_path,
            position,
            Utc::now().timestamp(),
        );
    }

    fn record_at(
        &mut self,
        movie_id: u64,
        title: &str,
        poster_path: Option<String>,
        position: PlaybackPosition,
        last_watched: i64,
    ) {
        let entry = WatchedMovie {
            id: movie_id,
            title: title.to_string(),
            poster_path,
            progress: position.progress(),
            last_watched,
            duration: position.duration,
            current_time: position.current_time,
        };

        self.store.apply(|records| {
            records.retain(|r| r.id != movie_id);
            records.push(entry);
            records.sort_by(|a, b| b.last_watched.cmp(&a.last_watched));
            records.truncate(Self::MAX_ENTRIES);
        });
    }

    pub fn remove(&mut self, movie_id: u64) {
        self.store.remove(movie_id);
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySlot;

    fn position(current: f64, duration: f64) -> PlaybackPosition {
        PlaybackPosition { current_time: current, duration }
    }

    #[test]
    fn progress_is_rounded_and_clamped() {
        assert_eq!(position(0.0, 120.0).progress(), 0);
        assert_eq!(position(120.0, 120.0).progress(), 100);
        assert_eq!(position(30.0, 120.0).progress(), 25);
        assert_eq!(position(119.4, 120.0).progress(), 100);
        assert_eq!(position(500.0, 120.0).progress(), 100);
        assert_eq!(position(10.0, 0.0).progress(), 0);
        assert_eq!(position(10.0, -5.0).progress(), 0);
    }

    #[test]
    fn shelf_keeps_ten_most_recent() {
        let mut history = WatchHistory::open(MemorySlot::new("watch_history"));
        for i in 0..12u64 {
            history.record_at(
                i,
                &format!("movie {i}"),
                None,
                position(10.0, 100.0),
                1_000 + i as i64,
            );
        }

        let shelf = history.all();
        assert_eq!(shelf.len(), WatchHistory::MAX_ENTRIES);
        assert_eq!(shelf[0].id, 11, "most recent first");
        assert_eq!(shelf.last().unwrap().id, 2, "oldest two evicted");
    }

    #[test]
    fn re_recording_moves_entry_to_front() {
        let mut history = WatchHistory::open(MemorySlot::new("watch_history"));
        history.record_at(603, "The Matrix", None, position(10.0, 100.0), 1_000);
        history.record_at(550, "Fight Club", None, position(10.0, 100.0), 2_000);
        history.record_at(603, "The Matrix", None, position(50.0, 100.0), 3_000);

        let shelf = history.all();
        assert_eq!(shelf.len(), 2);
        assert_eq!(shelf[0].id, 603);
        assert_eq!(shelf[0].progress, 50);
    }
}
