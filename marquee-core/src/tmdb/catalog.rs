use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use marquee_model::{
    DiscoverFilters, Genre, MovieDetails, MoviePage, Person,
    PersonMovieCredits, TrendingWindow, builtin_genres,
};
use tracing::warn;

use super::{TmdbClient, TmdbError};

/// Catalog facade over [`TmdbClient`].
///
/// Applies the uniform failure policy: any upstream error is logged and
/// converted into an empty result, so callers never observe an HTTP status
/// and cannot distinguish "not found" from "service unavailable". List
/// endpoints are cached for a short window (1 hour by default) to mirror
/// the revalidation hint the original pages carried; entity lookups are
/// never cached.
#[derive(Debug)]
pub struct Catalog {
    client: Arc<TmdbClient>,
    lists: DashMap<String, CachedPage>,
    genres: DashMap<String, (Instant, Vec<Genre>)>,
    ttl: Duration,
}

#[derive(Debug, Clone)]
struct CachedPage {
    fetched_at: Instant,
    page: MoviePage,
}

impl Catalog {
    pub fn new(client: Arc<TmdbClient>, ttl: Duration) -> Self {
        Self {
            client,
            lists: DashMap::new(),
            genres: DashMap::new(),
            ttl,
        }
    }

    // --- Cached list endpoints ------------------------------------------

    pub async fn popular(&self, page: u32) -> MoviePage {
        let key = format!("popular:{page}");
        self.cached(key, "popular movies", self.client.popular(page))
            .await
    }

    pub async fn top_rated(&self, page: u32) -> MoviePage {
        let key = format!("top_rated:{page}");
        self.cached(key, "top rated movies", self.client.top_rated(page))
            .await
    }

    pub async fn now_playing(&self, page: u32) -> MoviePage {
        let key = format!("now_playing:{page}");
        self.cached(key, "now playing movies", self.client.now_playing(page))
            .await
    }

    pub async fn upcoming(&self, page: u32) -> MoviePage {
        let key = format!("upcoming:{page}");
        self.cached(key, "upcoming movies", self.client.upcoming(page))
            .await
    }

    pub async fn trending(&self, window: TrendingWindow) -> MoviePage {
        let key = format!("trending:{}", window.as_str());
        self.cached(key, "trending movies", self.client.trending(window))
            .await
    }

    pub async fn search(&self, query: &str, page: u32) -> MoviePage {
        let key = format!("search:{query}:{page}");
        self.cached(key, "movie search", self.client.search(query, page))
            .await
    }

    pub async fn discover(&self, filters: &DiscoverFilters) -> MoviePage {
        let key = format!(
            "discover:{}",
            serde_json::to_string(filters).unwrap_or_default()
        );
        self.cached(key, "discover movies", self.client.discover(filters))
            .await
    }

    pub async fn genres(&self) -> Vec<Genre> {
        if let Some(hit) = self.genres.get("movie") {
            let (fetched_at, genres) = hit.value();
            if fetched_at.elapsed() < self.ttl {
                return genres.clone();
            }
        }

        match self.client.genres().await {
            Ok(genres) => {
                self.genres
                    .insert("movie".to_string(), (Instant::now(), genres.clone()));
                genres
            }
            Err(err) => {
                // Genres degrade to the built-in list rather than an empty
                // one; ids and English names are stable.
                warn!("failed to fetch genre list, using built-in: {err}");
                builtin_genres()
            }
        }
    }

    // --- Uncached entity lookups ----------------------------------------

    pub async fn movie(&self, movie_id: u64) -> Option<MovieDetails> {
        self.entity(
            self.client.movie_details(movie_id),
            &format!("movie {movie_id}"),
        )
        .await
    }

    pub async fn person(&self, person_id: u64) -> Option<Person> {
        self.entity(
            self.client.person_details(person_id),
            &format!("person {person_id}"),
        )
        .await
    }

    pub async fn person_movie_credits(
        &self,
        person_id: u64,
    ) -> PersonMovieCredits {
        self.entity(
            self.client.person_movie_credits(person_id),
            &format!("credits for person {person_id}"),
        )
        .await
        .unwrap_or_default()
    }

    // --- Maintenance ----------------------------------------------------

    /// Drop cache entries past their revalidation window. Invoked by the
    /// server's periodic sweeper so an idle process does not hold stale
    /// pages indefinitely.
    pub fn sweep(&self) -> usize {
        let before = self.lists.len();
        self.lists
            .retain(|_, cached| cached.fetched_at.elapsed() < self.ttl);
        self.genres
            .retain(|_, (fetched_at, _)| fetched_at.elapsed() < self.ttl);
        before - self.lists.len()
    }

    async fn cached(
        &self,
        key: String,
        what: &str,
        fetch: impl Future<Output = Result<MoviePage, TmdbError>>,
    ) -> MoviePage {
        if let Some(hit) = self.lists.get(&key) {
            if hit.fetched_at.elapsed() < self.ttl {
                return hit.page.clone();
            }
        }

        match fetch.await {
            Ok(page) => {
                self.lists.insert(
                    key,
                    CachedPage { fetched_at: Instant::now(), page: page.clone() },
                );
                page
            }
            Err(err) => {
                warn!("failed to fetch {what}: {err}");
                MoviePage::empty()
            }
        }
    }

    async fn entity<T>(
        &self,
        fetch: impl Future<Output = Result<T, TmdbError>>,
        what: &str,
    ) -> Option<T> {
        match fetch.await {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("failed to fetch {what}: {err}");
                None
            }
        }
    }
}
