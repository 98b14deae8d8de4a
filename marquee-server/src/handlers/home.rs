use axum::Json;
use axum::extract::State;
use marquee_model::{MoviePage, TrendingWindow, WatchedMovie};
use serde::Serialize;

use crate::infra::app_state::AppState;

/// Everything the landing page renders in one response.
#[derive(Debug, Serialize)]
pub struct HomePayload {
    pub trending: MoviePage,
    pub popular: MoviePage,
    pub top_rated: MoviePage,
    pub upcoming: MoviePage,
    pub continue_watching: Vec<WatchedMovie>,
}

/// The four catalog rows are fetched concurrently; each degrades to an
/// empty page on its own, so one upstream failure never blanks the rest
/// of the page.
pub async fn home(State(state): State<AppState>) -> Json<HomePayload> {
    let (trending, popular, top_rated, upcoming) = tokio::join!(
        state.catalog.trending(TrendingWindow::Day),
        state.catalog.popular(1),
        state.catalog.top_rated(1),
        state.catalog.upcoming(1),
    );

    let continue_watching = state.library.watch_history.lock().await.all();

    Json(HomePayload {
        trending,
        popular,
        top_rated,
        upcoming,
        continue_watching,
    })
}
