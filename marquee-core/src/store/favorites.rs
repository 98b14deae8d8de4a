use marquee_model::MovieSummary;

use super::{RecordStore, StorageSlot};

/// The favorites shelf: a flat list of movie summaries, newest last.
pub struct Favorites {
    store: RecordStore<MovieSummary>,
}

impl Favorites {
    pub const SLOT: &'static str = "favorites";

    pub fn open(slot: impl StorageSlot + 'static) -> Self {
        Self { store: RecordStore::open(slot) }
    }

    pub fn all(&mut self) -> Vec<MovieSummary> {
        self.store.records().to_vec()
    }

    pub fn contains(&mut self, movie_id: u64) -> bool {
        self.store.contains(movie_id)
    }

    /// Adding an already-favorited movie is a no-op.
    pub fn add(&mut self, movie: MovieSummary) {
        self.store.insert_if_absent(movie);
    }

    pub fn remove(&mut self, movie_id: u64) {
        self.store.remove(movie_id);
    }

    /// Flip the favorite state; returns whether the movie is now
    /// favorited.
    pub fn toggle(&mut self, movie: MovieSummary) -> bool {
        if self.store.remove(movie.id) {
            false
        } else {
            self.store.insert_if_absent(movie);
            true
        }
    }

    pub fn clear(&mut self) {
        self.store.clear();
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

    #[test]
    fn double_add_keeps_one_entry() {
        let mut favorites = Favorites::open(MemorySlot::new("favorites"));
        favorites.add(movie(603));
        favorites.add(movie(603));
        assert_eq!(favorites.all().len(), 1);
    }

    #[test]
    fn toggle_flips_state() {
        let mut favorites = Favorites::open(MemorySlot::new("favorites"));
        assert!(favorites.toggle(movie(603)));
        assert!(favorites.contains(603));
        assert!(!favorites.toggle(movie(603)));
        assert!(!favorites.contains(603));
    }
}
