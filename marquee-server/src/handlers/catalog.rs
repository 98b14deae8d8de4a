//! Catalog listing endpoints.
//!
//! All of these return `200` with a page of movies; upstream failures
//! surface as an empty page (see [`marquee_core::Catalog`]).

use axum::Json;
use axum::extract::{Path, Query, State};
use marquee_model::{
    DiscoverFilters, Genre, MoviePage, SortOrder, TrendingWindow,
};
use serde::Deserialize;

use crate::errors::{AppError, AppResult};
use crate::infra::app_state::AppState;

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

pub async fn popular(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<MoviePage> {
    Json(state.catalog.popular(query.page).await)
}

pub async fn top_rated(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<MoviePage> {
    Json(state.catalog.top_rated(query.page).await)
}

pub async fn now_playing(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<MoviePage> {
    Json(state.catalog.now_playing(query.page).await)
}

pub async fn upcoming(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Json<MoviePage> {
    Json(state.catalog.upcoming(query.page).await)
}

#[derive(Debug, Deserialize)]
pub struct TrendingQuery {
    #[serde(default)]
    pub window: TrendingWindow,
}

pub async fn trending(
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Json<MoviePage> {
    Json(state.catalog.trending(query.window).await)
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<MoviePage>> {
    let term = query.query.trim();
    if term.is_empty() {
        return Err(AppError::bad_request("search query must not be empty"));
    }
    Ok(Json(state.catalog.search(term, query.page).await))
}

/// Query-string form of [`DiscoverFilters`]; genres arrive as a
/// comma-separated list.
#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    #[serde(default)]
    pub sort_by: SortOrder,
    pub year: Option<u16>,
    pub with_genres: Option<String>,
    pub vote_average_gte: Option<f32>,
    pub with_original_language: Option<String>,
    pub page: Option<u32>,
}

impl From<DiscoverQuery> for DiscoverFilters {
    fn from(query: DiscoverQuery) -> Self {
        let with_genres = query
            .with_genres
            .as_deref()
            .unwrap_or("")
            .split(',')
            .filter_map(|id| id.trim().parse().ok())
            .collect();

        DiscoverFilters {
            sort_by: query.sort_by,
            year: query.year,
            with_genres,
            vote_average_gte: query.vote_average_gte,
            with_original_language: query.with_original_language,
            page: query.page,
        }
    }
}

pub async fn discover(
    State(state): State<AppState>,
    Query(query): Query<DiscoverQuery>,
) -> Json<MoviePage> {
    Json(state.catalog.discover(&query.into()).await)
}

pub async fn genres(State(state): State<AppState>) -> Json<Vec<Genre>> {
    Json(state.catalog.genres().await)
}

pub async fn genre_movies(
    State(state): State<AppState>,
    Path(genre_id): Path<u64>,
    Query(query): Query<PageQuery>,
) -> Json<MoviePage> {
    let filters = DiscoverFilters {
        with_genres: vec![genre_id],
        page: Some(query.page),
        ..DiscoverFilters::default()
    };
    Json(state.catalog.discover(&filters).await)
}
