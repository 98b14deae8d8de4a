//! # Marquee Core
//!
//! The non-presentation half of the Marquee movie-browsing service:
//!
//! - **TMDB pass-through** ([`tmdb`]): a thin client over the TMDB v3 API
//!   plus a catalog facade that degrades every failure to an empty result
//!   and keeps a short-lived response cache.
//! - **Session lifecycle** ([`session`]): the dual guest/account session
//!   model over a pluggable cookie-shaped store.
//! - **Local library** ([`store`]): one generic record store backing
//!   favorites, ratings and continue-watching slots.

pub mod session;
pub mod store;
pub mod tmdb;

pub use session::{
    ClearScope, SessionError, SessionManager, SessionPolicy, SessionStore,
};
pub use store::{
    Favorites, FileSlot, PlaybackPosition, Ratings, RecordStore, StorageSlot,
    WatchHistory,
};
pub use tmdb::{Catalog, TmdbClient, TmdbError};
