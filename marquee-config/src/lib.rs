//! Shared configuration library for Marquee.
//!
//! Centralizes environment-variable loading, defaults, and validation so the
//! server binary and tests share a single source of truth for config keys
//! and guard rails. Everything is env-driven (`MARQUEE_*` plus
//! `TMDB_API_TOKEN`), with an optional `.env` file picked up via dotenvy.

pub mod loader;
pub mod models;

pub use loader::{ConfigLoad, ConfigLoadError, ConfigLoader};
pub use models::{
    CacheConfig, Config, LibraryConfig, ServerConfig, SessionConfig,
    TmdbConfig,
};
