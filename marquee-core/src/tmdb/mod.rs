//! TMDB API pass-through.
//!
//! [`TmdbClient`] is a direct, stateless translation layer: one method per
//! consumed endpoint, each returning `Result<_, TmdbError>` with no retries
//! or backoff. [`Catalog`] wraps it with the service-wide degradation
//! policy (log and return empty) and a short TTL cache on the list
//! endpoints.

mod catalog;
mod client;
mod wire;

pub use catalog::Catalog;
pub use client::TmdbClient;

#[derive(Debug, thiserror::Error)]
pub enum TmdbError {
    /// Non-2xx response without a usable status message.
    #[error("API error: status {0}")]
    Status(u16),

    /// Non-2xx response carrying TMDB's own status message, e.g. an
    /// invalid-credentials rejection during login.
    #[error("{0}")]
    Rejected(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}
