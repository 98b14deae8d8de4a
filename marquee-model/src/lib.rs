//! Core data model definitions shared across Marquee crates.
#![allow(missing_docs)]

pub mod discover;
pub mod genre;
pub mod library;
pub mod movie;
pub mod person;
pub mod session;

// Intentionally curated re-exports for downstream consumers.
pub use discover::{DiscoverFilters, SortOrder, TrendingWindow};
pub use genre::{Genre, builtin_genres, genre_name};
pub use library::{RatedMovie, WatchedMovie};
pub use movie::{
    CastMember, CrewMember, Credits, MovieDetails, MoviePage, MovieSummary,
    Video,
};
pub use person::{
    Person, PersonCastCredit, PersonCrewCredit, PersonMovieCredits,
};
pub use session::{AccountProfile, AccountSession, GuestSession, SessionState};
