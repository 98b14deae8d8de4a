//! Local library endpoints: favorites, ratings, continue watching.
//!
//! These operate on the on-disk library slots and never require a
//! session, with one exception: submitting a rating also goes upstream
//! under the guest identity, and the upstream rejection wins over the
//! local write.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use marquee_core::{PlaybackPosition, SessionManager};
use marquee_model::{MovieSummary, RatedMovie, WatchedMovie};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{AppError, AppResult};
use crate::infra::app_state::AppState;
use crate::infra::session_layer::SessionHandle;

// --- Favorites ----------------------------------------------------------

pub async fn list_favorites(
    State(state): State<AppState>,
) -> Json<Vec<MovieSummary>> {
    Json(state.library.favorites.lock().await.all())
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Json(movie): Json<MovieSummary>,
) -> StatusCode {
    state.library.favorites.lock().await.add(movie);
    StatusCode::NO_CONTENT
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub favorited: bool,
}

pub async fn toggle_favorite(
    State(state): State<AppState>,
    Json(movie): Json<MovieSummary>,
) -> Json<ToggleResponse> {
    let favorited = state.library.favorites.lock().await.toggle(movie);
    Json(ToggleResponse { favorited })
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
) -> StatusCode {
    state.library.favorites.lock().await.remove(movie_id);
    StatusCode::NO_CONTENT
}

pub async fn clear_favorites(State(state): State<AppState>) -> StatusCode {
    state.library.favorites.lock().await.clear();
    StatusCode::NO_CONTENT
}

// --- Ratings ------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub movie: MovieSummary,
    pub value: u8,
}

/// The local ratings folded together with the upstream rated list for
/// the active identity. Without any session, or when the upstream list
/// is unreachable, the local list stands alone.
pub async fn list_ratings(
    State(state): State<AppState>,
    session: SessionHandle,
) -> Json<Vec<RatedMovie>> {
    let mut store = session.0.lock().await;
    let mut manager = SessionManager::new(
        &mut *store,
        state.tmdb.as_ref(),
        state.policy.clone(),
    );

    let mut ratings = state.library.ratings.lock().await;
    match manager.rated_movies().await {
        Ok(remote) => ratings.merge_remote(remote),
        Err(err) => warn!("skipping remote rated list: {err}"),
    }

    Json(ratings.all())
}

/// Submit a rating. The upstream submission happens first; only an
/// accepted rating is recorded locally.
pub async fn rate_movie(
    State(state): State<AppState>,
    session: SessionHandle,
    Json(request): Json<RateRequest>,
) -> AppResult<StatusCode> {
    if !(1..=10).contains(&request.value) {
        return Err(AppError::bad_request(
            "rating value must be between 1 and 10",
        ));
    }

    let mut store = session.0.lock().await;
    let mut manager = SessionManager::new(
        &mut *store,
        state.tmdb.as_ref(),
        state.policy.clone(),
    );
    manager.rate_movie(request.movie.id, request.value).await?;

    state
        .library
        .ratings
        .lock()
        .await
        .rate(request.movie, request.value);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_rating(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
) -> StatusCode {
    state.library.ratings.lock().await.remove(movie_id);
    StatusCode::NO_CONTENT
}

// --- Watch history ------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ProgressRequest {
    pub movie_id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub current_time: f64,
    pub duration: f64,
}

pub async fn list_watch_history(
    State(state): State<AppState>,
) -> Json<Vec<WatchedMovie>> {
    Json(state.library.watch_history.lock().await.all())
}

pub async fn record_progress(
    State(state): State<AppState>,
    Json(request): Json<ProgressRequest>,
) -> StatusCode {
    state.library.watch_history.lock().await.record(
        request.movie_id,
        &request.title,
        request.poster_path,
        PlaybackPosition {
            current_time: request.current_time,
            duration: request.duration,
        },
    );
    StatusCode::NO_CONTENT
}

pub async fn remove_watch_entry(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
) -> StatusCode {
    state.library.watch_history.lock().await.remove(movie_id);
    StatusCode::NO_CONTENT
}

pub async fn clear_watch_history(
    State(state): State<AppState>,
) -> StatusCode {
    state.library.watch_history.lock().await.clear();
    StatusCode::NO_CONTENT
}
