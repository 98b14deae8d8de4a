//! Genre records and the built-in id → name map.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Resolve a TMDB genre id to a display name without a network round trip.
///
/// Falls back to "Unknown" for ids outside the movie genre list, which is
/// stable enough to ship baked in; the live list endpoint is still exposed
/// for localized names.
pub fn genre_name(id: u64) -> &'static str {
    match id {
        28 => "Action",
        12 => "Adventure",
        16 => "Animation",
        35 => "Comedy",
        80 => "Crime",
        99 => "Documentary",
        18 => "Drama",
        10751 => "Family",
        14 => "Fantasy",
        36 => "History",
        27 => "Horror",
        10402 => "Music",
        9648 => "Mystery",
        10749 => "Romance",
        878 => "Science Fiction",
        10770 => "TV Movie",
        53 => "Thriller",
        10752 => "War",
        37 => "Western",
        _ => "Unknown",
    }
}

const BUILTIN_GENRE_IDS: [u64; 19] = [
    28, 12, 16, 35, 80, 99, 18, 10751, 14, 36, 27, 10402, 9648, 10749, 878,
    10770, 53, 10752, 37,
];

/// The full built-in movie genre list, used as the degraded result when
/// the live genre endpoint is unreachable.
pub fn builtin_genres() -> Vec<Genre> {
    BUILTIN_GENRE_IDS
        .iter()
        .map(|&id| Genre { id, name: genre_name(id).to_string() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_and_unknown_ids() {
        assert_eq!(genre_name(878), "Science Fiction");
        assert_eq!(genre_name(4), "Unknown");
    }

    #[test]
    fn builtin_list_is_complete_and_named() {
        let genres = builtin_genres();
        assert_eq!(genres.len(), 19);
        assert!(genres.iter().all(|g| g.name != "Unknown"));
    }
}
