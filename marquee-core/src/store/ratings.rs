use chrono::Utc;
use marquee_model::{MovieSummary, RatedMovie};

use super::{RecordStore, StorageSlot};

/// Locally recorded ratings, merged against the upstream rated list on
/// read.
pub struct Ratings {
    store: RecordStore<RatedMovie>,
}

impl Ratings {
    pub const SLOT: &'static str = "ratings";

    pub fn open(slot: impl StorageSlot + 'static) -> Self {
        Self { store: RecordStore::open(slot) }
    }

    pub fn all(&mut self) -> Vec<RatedMovie> {
        self.store.records().to_vec()
    }

    pub fn rating_for(&mut self, movie_id: u64) -> Option<u8> {
        self.store.find(movie_id).map(|r| r.rating)
    }

    /// Record a rating, replacing any earlier rating of the same movie.
    pub fn rate(&mut self, movie: MovieSummary, rating: u8) {
        self.store.upsert(RatedMovie {
            movie,
            rating,
            rated_at: Some(Utc::now().timestamp()),
        });
    }

    pub fn remove(&mut self, movie_id: u64) {
        self.store.remove(movie_id);
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Fold the upstream rated list into the local one. Additive: remote
    /// entries for unknown movies are adopted, while movies rated both
    /// locally and remotely keep the local rating. The upstream list
    /// carries no per-entry timestamp, so recency cannot break ties.
    pub fn merge_remote(&mut self, remote: Vec<RatedMovie>) {
        self.store.apply(|records| {
            for entry in remote {
                if !records.iter().any(|r| r.movie.id == entry.movie.id) {
                    records.push(entry);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySlot;

    fn movie(id: u64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("movie {id}"),
            poster_path: None,
            backdrop_path: None,
            overview: String::new(),
            release_date: String::new(),
            vote_average: 0.0,
            vote_count: 0,
            genre_ids: Vec::new(),
            popularity: 0.0,
        }
    }

    fn remote(id: u64, rating: u8) -> RatedMovie {
        RatedMovie { movie: movie(id), rating, rated_at: None }
    }

    #[test]
    fn re_rating_replaces_the_old_value() {
        let mut ratings = Ratings::open(MemorySlot::new("ratings"));
        ratings.rate(movie(603), 6);
        ratings.rate(movie(603), 9);
        assert_eq!(ratings.rating_for(603), Some(9));
        assert_eq!(ratings.all().len(), 1);
    }

    #[test]
    fn merge_adopts_unknown_and_keeps_local() {
        let mut ratings = Ratings::open(MemorySlot::new("ratings"));
        ratings.rate(movie(603), 8);
        ratings.merge_remote(vec![remote(603, 5), remote(550, 7)]);

        assert_eq!(ratings.rating_for(603), Some(8), "local rating wins");
        assert_eq!(ratings.rating_for(550), Some(7), "remote entry adopted");
        assert_eq!(ratings.all().len(), 2);
    }
}
