use std::{fmt, sync::Arc};

use anyhow::Context;
use marquee_config::Config;
use marquee_core::{
    Catalog, Favorites, FileSlot, Ratings, SessionPolicy, TmdbClient,
    WatchHistory,
};
use tokio::sync::Mutex;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tmdb: Arc<TmdbClient>,
    pub catalog: Arc<Catalog>,
    pub policy: SessionPolicy,
    pub library: Arc<Library>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

/// The three local library stores, each behind its own lock so a slow
/// favorites write does not block a watch-history read.
pub struct Library {
    pub favorites: Mutex<Favorites>,
    pub ratings: Mutex<Ratings>,
    pub watch_history: Mutex<WatchHistory>,
}

impl Library {
    fn open(config: &Config) -> Self {
        let dir = config.data_dir();
        Self {
            favorites: Mutex::new(Favorites::open(FileSlot::new(
                dir,
                Favorites::SLOT,
            ))),
            ratings: Mutex::new(Ratings::open(FileSlot::new(
                dir,
                Ratings::SLOT,
            ))),
            watch_history: Mutex::new(WatchHistory::open(FileSlot::new(
                dir,
                WatchHistory::SLOT,
            ))),
        }
    }
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        config
            .ensure_directories()
            .context("failed to create library data directory")?;

        let tmdb = Arc::new(
            TmdbClient::new(&config.tmdb)
                .context("failed to build TMDB client")?,
        );
        let catalog =
            Arc::new(Catalog::new(tmdb.clone(), config.cache.catalog_ttl));
        let policy = SessionPolicy::from(&config.session);
        let library = Arc::new(Library::open(&config));

        Ok(Self {
            config: Arc::new(config),
            tmdb,
            catalog,
            policy,
            library,
        })
    }
}
