//! Movie catalog shapes as served by the API layer.
//!
//! These mirror the TMDB response surface closely enough that the client
//! crate can deserialize straight into them; fields TMDB omits for some
//! titles are optional or defaulted.

use serde::{Deserialize, Serialize};

use crate::genre::Genre;

/// Lightweight movie record used in carousels, search results and the
/// local library stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub vote_average: f32,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub popularity: f32,
}

/// One page of a paginated movie listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoviePage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<MovieSummary>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

fn first_page() -> u32 {
    1
}

impl MoviePage {
    /// An empty first page, the uniform degraded result for failed listings.
    pub fn empty() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }
}

/// Full movie details for the watch page, with credits, videos and
/// similar titles appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: u32,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    pub credits: Option<Credits>,
    #[serde(default)]
    pub videos: Vec<Video>,
    #[serde(default)]
    pub similar: Vec<MovieSummary>,
}

/// Cast and crew for a single movie.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub profile_path: Option<String>,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    pub profile_path: Option<String>,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub department: String,
}

/// A trailer/teaser/clip attached to a movie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub official: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_defaults_survive_sparse_json() {
        let page: MoviePage = serde_json::from_str("{}").unwrap();
        assert_eq!(page.page, 1);
        assert!(page.results.is_empty());
    }
}
