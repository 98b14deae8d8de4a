use axum::Json;
use axum::extract::{Path, State};
use marquee_model::{Person, PersonMovieCredits};
use serde::Serialize;

use crate::errors::{AppError, AppResult};
use crate::infra::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct PersonPayload {
    #[serde(flatten)]
    pub person: Person,
    pub movie_credits: PersonMovieCredits,
}

/// Person details joined with their filmography. The two lookups run
/// concurrently; a missing person is a 404 even when credits resolve.
pub async fn person_details(
    State(state): State<AppState>,
    Path(person_id): Path<u64>,
) -> AppResult<Json<PersonPayload>> {
    let (person, movie_credits) = tokio::join!(
        state.catalog.person(person_id),
        state.catalog.person_movie_credits(person_id),
    );

    let person = person
        .ok_or_else(|| AppError::not_found(format!("person {person_id}")))?;

    Ok(Json(PersonPayload { person, movie_credits }))
}
