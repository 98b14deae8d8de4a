//! Environment-driven configuration loading.
//!
//! Evaluation order per key: process environment first, then the `.env`
//! file (if present), then the built-in default. `TMDB_API_TOKEN` is the
//! only required key.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::models::{
    CacheConfig, Config, LibraryConfig, ServerConfig, SessionConfig,
    TmdbConfig,
};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8554;
const DEFAULT_TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_DATA_DIR: &str = "./data";

const DEFAULT_GUEST_TTL_SECS: u64 = 60 * 60 * 24 * 7; // 7 days
const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24; // 1 day
const DEFAULT_REMEMBER_TTL_SECS: u64 = 60 * 60 * 24 * 30; // 30 days
const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 60 * 30; // 30 minutes
const DEFAULT_CATALOG_TTL_SECS: u64 = 60 * 60; // 1 hour

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("TMDB_API_TOKEN is not set; the service cannot reach TMDB")]
    MissingApiToken,

    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read env file: {0}")]
    EnvFile(#[from] dotenvy::Error),
}

/// A loaded configuration plus non-fatal findings worth logging.
#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    env_file: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.env_file = Some(path.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        match &self.env_file {
            Some(path) => {
                dotenvy::from_path(path).map(|_| ()).or_else(|err| {
                    match err {
                        // A missing .env file is fine; a malformed one is not.
                        dotenvy::Error::Io(_) => Ok(()),
                        other => Err(other),
                    }
                })?
            }
            None => {
                dotenvy::dotenv().map(|_| ()).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(()),
                    other => Err(other),
                })?
            }
        }

        let mut warnings = Vec::new();

        let api_token = env::var("TMDB_API_TOKEN")
            .ok()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigLoadError::MissingApiToken)?;

        let host =
            env_or("MARQUEE_HOST", DEFAULT_HOST.to_string(), |raw| {
                Ok(raw.to_string())
            })?;
        let port = env_or("MARQUEE_PORT", DEFAULT_PORT, parse_port)?;

        let secure_cookies =
            env_or("MARQUEE_SECURE_COOKIES", true, parse_bool)?;
        if !secure_cookies {
            warnings.push(
                "MARQUEE_SECURE_COOKIES=false: session cookies will be sent \
                 over plain HTTP"
                    .to_string(),
            );
        }

        let config = Config {
            server: ServerConfig { host, port },
            tmdb: TmdbConfig {
                base_url: env_or(
                    "MARQUEE_TMDB_BASE_URL",
                    DEFAULT_TMDB_BASE_URL.to_string(),
                    |raw| Ok(raw.trim_end_matches('/').to_string()),
                )?,
                api_token,
                language: env_or(
                    "MARQUEE_LANGUAGE",
                    DEFAULT_LANGUAGE.to_string(),
                    |raw| Ok(raw.to_string()),
                )?,
            },
            session: SessionConfig {
                secure_cookies,
                guest_ttl: Duration::from_secs(env_or(
                    "MARQUEE_GUEST_TTL_SECS",
                    DEFAULT_GUEST_TTL_SECS,
                    parse_secs,
                )?),
                session_ttl: Duration::from_secs(env_or(
                    "MARQUEE_SESSION_TTL_SECS",
                    DEFAULT_SESSION_TTL_SECS,
                    parse_secs,
                )?),
                remember_session_ttl: Duration::from_secs(env_or(
                    "MARQUEE_REMEMBER_TTL_SECS",
                    DEFAULT_REMEMBER_TTL_SECS,
                    parse_secs,
                )?),
                refresh_interval: Duration::from_secs(env_or(
                    "MARQUEE_REFRESH_INTERVAL_SECS",
                    DEFAULT_REFRESH_INTERVAL_SECS,
                    parse_secs,
                )?),
            },
            library: LibraryConfig {
                data_dir: PathBuf::from(env_or(
                    "MARQUEE_DATA_DIR",
                    DEFAULT_DATA_DIR.to_string(),
                    |raw| Ok(raw.to_string()),
                )?),
            },
            cache: CacheConfig {
                catalog_ttl: Duration::from_secs(env_or(
                    "MARQUEE_CATALOG_TTL_SECS",
                    DEFAULT_CATALOG_TTL_SECS,
                    parse_secs,
                )?),
            },
        };

        Ok(ConfigLoad { config, warnings })
    }
}

fn env_or<T, F>(
    key: &'static str,
    default: T,
    parse: F,
) -> Result<T, ConfigLoadError>
where
    F: Fn(&str) -> Result<T, String>,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => {
            parse(raw.trim()).map_err(|reason| {
                ConfigLoadError::InvalidValue { key, value: raw, reason }
            })
        }
        _ => Ok(default),
    }
}

fn parse_port(raw: &str) -> Result<u16, String> {
    match raw.parse::<u16>() {
        Ok(0) => Err("port must be non-zero".to_string()),
        Ok(port) => Ok(port),
        Err(e) => Err(e.to_string()),
    }
}

fn parse_secs(raw: &str) -> Result<u64, String> {
    raw.parse::<u64>().map_err(|e| e.to_string())
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got {other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_port_rejected() {
        assert!(parse_port("0").is_err());
        assert_eq!(parse_port("8554"), Ok(8554));
    }

    #[test]
    fn bool_spellings() {
        assert_eq!(parse_bool("Yes"), Ok(true));
        assert_eq!(parse_bool("off"), Ok(false));
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn seconds_must_be_numeric() {
        assert_eq!(parse_secs("3600"), Ok(3600));
        assert!(parse_secs("1h").is_err());
    }
}
