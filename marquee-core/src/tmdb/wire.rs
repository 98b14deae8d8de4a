//! Response shapes private to the TMDB client.
//!
//! Only the fields Marquee consumes are declared; serde drops the rest.

use marquee_model::{
    AccountProfile, Credits, Genre, MovieSummary, RatedMovie, Video,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct GuestSessionWire {
    #[serde(default)]
    pub success: bool,
    pub guest_session_id: String,
    #[serde(default)]
    pub expires_at: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct RequestTokenWire {
    #[serde(default)]
    pub success: bool,
    pub request_token: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionWire {
    #[serde(default)]
    pub success: bool,
    pub session_id: String,
}

/// Generic `{status_code, status_message, success}` envelope TMDB uses for
/// mutations and error bodies.
#[derive(Debug, Deserialize)]
pub(super) struct StatusWire {
    pub success: Option<bool>,
    pub status_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AccountWire {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub iso_639_1: String,
    #[serde(default)]
    pub iso_3166_1: String,
    pub avatar: Option<AvatarWire>,
}

#[derive(Debug, Deserialize)]
pub(super) struct AvatarWire {
    pub tmdb: Option<TmdbAvatarWire>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TmdbAvatarWire {
    pub avatar_path: Option<String>,
}

impl From<AccountWire> for AccountProfile {
    fn from(wire: AccountWire) -> Self {
        let avatar_path =
            wire.avatar.and_then(|a| a.tmdb).and_then(|t| t.avatar_path);
        AccountProfile {
            id: wire.id,
            username: wire.username,
            name: wire.name,
            avatar_path,
            iso_639_1: wire.iso_639_1,
            iso_3166_1: wire.iso_3166_1,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct GenreListWire {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Rated listings return movie summaries with an extra `rating` field.
#[derive(Debug, Deserialize)]
pub(super) struct RatedMovieWire {
    #[serde(flatten)]
    pub movie: MovieSummary,
    pub rating: f32,
}

impl From<RatedMovieWire> for RatedMovie {
    fn from(wire: RatedMovieWire) -> Self {
        RatedMovie {
            movie: wire.movie,
            rating: wire.rating.round().clamp(0.0, 10.0) as u8,
            rated_at: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RatedPageWire {
    #[serde(default)]
    pub results: Vec<RatedMovieWire>,
}

#[derive(Debug, Deserialize)]
pub(super) struct VideoListWire {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SimilarWire {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

/// `movie/{id}?append_to_response=credits,videos,similar`.
#[derive(Debug, Deserialize)]
pub(super) struct MovieDetailsWire {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub budget: u64,
    #[serde(default)]
    pub revenue: u64,
    pub credits: Option<Credits>,
    pub videos: Option<VideoListWire>,
    pub similar: Option<SimilarWire>,
}

impl From<MovieDetailsWire> for marquee_model::MovieDetails {
    fn from(wire: MovieDetailsWire) -> Self {
        marquee_model::MovieDetails {
            summary: wire.summary,
            genres: wire.genres,
            runtime: wire.runtime.unwrap_or_default(),
            tagline: wire.tagline.unwrap_or_default(),
            status: wire.status.unwrap_or_default(),
            budget: wire.budget,
            revenue: wire.revenue,
            credits: wire.credits,
            videos: wire.videos.map(|v| v.results).unwrap_or_default(),
            similar: wire.similar.map(|s| s.results).unwrap_or_default(),
        }
    }
}
