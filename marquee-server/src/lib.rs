//! # Marquee Server
//!
//! HTTP front end for the Marquee movie-browsing service:
//!
//! - **Catalog**: TMDB listings, search, discover, movie and person
//!   details, all degrading to empty results when TMDB is unreachable.
//! - **Sessions**: anonymous guest sessions and full TMDB account login,
//!   carried entirely in cookies with sliding expiry.
//! - **Library**: favorites, ratings and continue-watching shelves
//!   persisted locally on disk.

pub mod errors;
pub mod handlers;
pub mod infra;
pub mod routes;

pub use errors::{AppError, AppResult};
pub use infra::app_state::AppState;
