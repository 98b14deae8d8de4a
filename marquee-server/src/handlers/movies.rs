use axum::Json;
use axum::extract::{Path, State};
use marquee_model::MovieDetails;

use crate::errors::{AppError, AppResult};
use crate::infra::app_state::AppState;

/// Full movie record with credits, videos and similar titles appended.
pub async fn movie_details(
    State(state): State<AppState>,
    Path(movie_id): Path<u64>,
) -> AppResult<Json<MovieDetails>> {
    state
        .catalog
        .movie(movie_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("movie {movie_id}")))
}
