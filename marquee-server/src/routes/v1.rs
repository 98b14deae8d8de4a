use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::{
    handlers::{catalog, home, library, movies, people, session},
    infra::{app_state::AppState, session_layer::session_middleware},
};

/// Create all v1 API routes.
pub fn create_v1_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(create_catalog_routes())
        .merge(create_session_routes())
        .merge(create_library_routes())
        // Every route sees the cookie session, whether it uses it or not.
        .layer(middleware::from_fn_with_state(state, session_middleware))
}

fn create_catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(home::home))
        .route("/movies/popular", get(catalog::popular))
        .route("/movies/top_rated", get(catalog::top_rated))
        .route("/movies/now_playing", get(catalog::now_playing))
        .route("/movies/upcoming", get(catalog::upcoming))
        .route("/movies/trending", get(catalog::trending))
        .route("/movies/search", get(catalog::search))
        .route("/movies/discover", get(catalog::discover))
        .route("/movies/{id}", get(movies::movie_details))
        .route("/genres", get(catalog::genres))
        .route("/genres/{id}/movies", get(catalog::genre_movies))
        .route("/people/{id}", get(people::person_details))
}

fn create_session_routes() -> Router<AppState> {
    Router::new()
        .route("/session/guest", post(session::guest))
        .route("/session/login", post(session::login))
        .route("/session/logout", post(session::logout))
        .route("/session/validate", get(session::validate))
        .route("/session/refresh", post(session::refresh))
        .route("/session/me", get(session::me))
}

fn create_library_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/library/favorites",
            get(library::list_favorites)
                .post(library::add_favorite)
                .delete(library::clear_favorites),
        )
        .route("/library/favorites/toggle", post(library::toggle_favorite))
        .route("/library/favorites/{id}", delete(library::remove_favorite))
        .route(
            "/library/ratings",
            get(library::list_ratings).post(library::rate_movie),
        )
        .route("/library/ratings/{id}", delete(library::remove_rating))
        .route(
            "/library/watch-history",
            get(library::list_watch_history)
                .post(library::record_progress)
                .delete(library::clear_watch_history),
        )
        .route(
            "/library/watch-history/{id}",
            delete(library::remove_watch_entry),
        )
}
