//! Plain configuration structs consumed across the workspace.

use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub tmdb: TmdbConfig,
    pub session: SessionConfig,
    pub library: LibraryConfig,
    pub cache: CacheConfig,
}

impl Config {
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.library.data_dir)
    }

    pub fn data_dir(&self) -> &Path {
        &self.library.data_dir
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    /// Base URL of the TMDB v3 API; overridable for tests.
    pub base_url: String,
    /// v4 bearer token used on every request.
    pub api_token: String,
    /// Language sent on catalog requests, e.g. "en-US".
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Mark cookies `Secure`; disable only for plain-HTTP dev setups.
    pub secure_cookies: bool,
    /// Guest session cookie lifetime when the API expiry is unusable.
    pub guest_ttl: Duration,
    /// Account session cookie lifetime without "remember me".
    pub session_ttl: Duration,
    /// Account session cookie lifetime with "remember me".
    pub remember_session_ttl: Duration,
    /// Minimum interval between sliding-expiry cookie re-issues.
    pub refresh_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct LibraryConfig {
    /// Directory holding the favorites/ratings/watch-history slot files.
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Revalidation window for cached catalog listings.
    pub catalog_ttl: Duration,
}
