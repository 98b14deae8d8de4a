//! Records held in the local library stores.

use serde::{Deserialize, Serialize};

use crate::movie::MovieSummary;

/// A movie the user has rated, locally or upstream.
///
/// `rated_at` is only set for ratings recorded by this install; entries
/// merged in from the upstream rated list carry no timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatedMovie {
    #[serde(flatten)]
    pub movie: MovieSummary,
    pub rating: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rated_at: Option<i64>,
}

/// A continue-watching entry: playback progress for one movie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchedMovie {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    /// Completion percentage, 0–100.
    pub progress: u8,
    /// Unix timestamp (seconds) of the last progress update.
    pub last_watched: i64,
    /// Total runtime in seconds.
    pub duration: f64,
    /// Playback position in seconds.
    pub current_time: f64,
}
