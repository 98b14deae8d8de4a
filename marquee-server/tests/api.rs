//! End-to-end tests over the full router.
//!
//! TMDB is pointed at an unroutable local port, so every upstream call
//! fails fast; these tests exercise the local library, the degradation
//! policy, and request validation.

use std::path::Path;
use std::time::Duration;

use axum::http::{HeaderValue, header};
use axum_test::TestServer;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use marquee_config::{
    CacheConfig, Config, LibraryConfig, ServerConfig, SessionConfig,
    TmdbConfig,
};
use marquee_server::{AppState, routes};
use serde_json::{Value, json};

fn test_state(data_dir: &Path) -> AppState {
    let config = Config {
        server: ServerConfig { host: "127.0.0.1".into(), port: 0 },
        tmdb: TmdbConfig {
            // Nothing listens here; connections are refused immediately.
            base_url: "http://127.0.0.1:1".into(),
            api_token: "test-token".into(),
            language: "en-US".into(),
        },
        session: SessionConfig {
            secure_cookies: false,
            guest_ttl: Duration::from_secs(3600),
            session_ttl: Duration::from_secs(3600),
            remember_session_ttl: Duration::from_secs(7200),
            refresh_interval: Duration::from_secs(1800),
        },
        library: LibraryConfig { data_dir: data_dir.to_path_buf() },
        cache: CacheConfig { catalog_ttl: Duration::from_secs(3600) },
    };
    AppState::new(config).expect("state should build")
}

fn server(data_dir: &Path) -> TestServer {
    TestServer::new(routes::create_app(test_state(data_dir)))
        .expect("server should build")
}

fn movie_body(id: u64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "poster_path": "/p.jpg",
        "backdrop_path": null,
        "overview": "",
        "release_date": "1999-03-30",
        "vote_average": 8.2,
        "vote_count": 1000,
        "genre_ids": [28],
        "popularity": 50.0,
    })
}

fn session_cookie(session_id: &str, remember: bool, refreshed_at: i64) -> String {
    let payload = json!({
        "session_id": session_id,
        "remember": remember,
        "refreshed_at": refreshed_at,
    });
    URL_SAFE_NO_PAD.encode(payload.to_string())
}

fn profile_cookie() -> String {
    let payload = json!({
        "id": 42,
        "username": "ripley",
        "name": "Ellen Ripley",
        "avatar_path": null,
        "iso_639_1": "en",
        "iso_3166_1": "US",
    });
    URL_SAFE_NO_PAD.encode(payload.to_string())
}

fn cookie_header(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unreachable_catalog_degrades_to_empty_page() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    let response = server.get("/api/v1/movies/popular").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["results"], json!([]));
    assert_eq!(body["total_results"], 0);
}

#[tokio::test]
async fn unreachable_movie_details_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    let response = server.get("/api/v1/movies/603").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn empty_search_query_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    let response = server.get("/api/v1/movies/search?query=%20%20").await;
    response.assert_status_bad_request();
}

#[tokio::test]
async fn favorites_survive_a_server_restart() {
    let dir = tempfile::tempdir().unwrap();

    {
        let server = server(dir.path());
        server
            .post("/api/v1/library/favorites")
            .json(&movie_body(603, "The Matrix"))
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);
    }

    // A fresh server over the same data directory sees the entry.
    let server = server(dir.path());
    let body: Value = server.get("/api/v1/library/favorites").await.json();
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["id"], 603);
}

#[tokio::test]
async fn favorite_toggle_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    let on: Value = server
        .post("/api/v1/library/favorites/toggle")
        .json(&movie_body(550, "Fight Club"))
        .await
        .json();
    assert_eq!(on["favorited"], true);

    let off: Value = server
        .post("/api/v1/library/favorites/toggle")
        .json(&movie_body(550, "Fight Club"))
        .await
        .json();
    assert_eq!(off["favorited"], false);

    let list: Value = server.get("/api/v1/library/favorites").await.json();
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    for value in [0, 11] {
        let response = server
            .post("/api/v1/library/ratings")
            .json(&json!({ "movie": movie_body(603, "The Matrix"), "value": value }))
            .await;
        response.assert_status_bad_request();
    }
}

#[tokio::test]
async fn failed_upstream_rating_is_not_recorded_locally() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    // Guest session creation fails (nothing upstream), so the rating
    // must not reach the local store either.
    let response = server
        .post("/api/v1/library/ratings")
        .json(&json!({ "movie": movie_body(603, "The Matrix"), "value": 8 }))
        .await;
    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);

    let list: Value = server.get("/api/v1/library/ratings").await.json();
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn watch_history_records_progress() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    server
        .post("/api/v1/library/watch-history")
        .json(&json!({
            "movie_id": 603,
            "title": "The Matrix",
            "poster_path": "/p.jpg",
            "current_time": 30.0,
            "duration": 120.0,
        }))
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    let list: Value = server.get("/api/v1/library/watch-history").await.json();
    assert_eq!(list[0]["id"], 603);
    assert_eq!(list[0]["progress"], 25);

    server
        .delete("/api/v1/library/watch-history/603")
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);
    let list: Value = server.get("/api/v1/library/watch-history").await.json();
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn session_endpoints_without_cookies() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    let me: Value = server.get("/api/v1/session/me").await.json();
    assert_eq!(me, Value::Null);

    let validate: Value = server.get("/api/v1/session/validate").await.json();
    assert_eq!(validate["valid"], false);

    server
        .post("/api/v1/session/logout")
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);

    let refresh: Value = server.post("/api/v1/session/refresh").await.json();
    assert_eq!(refresh["refreshed"], false);
}

#[tokio::test]
async fn guest_session_fails_cleanly_when_upstream_is_down() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    let response = server.post("/api/v1/session/guest").await;
    response.assert_status(axum::http::StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn me_reports_account_without_leaking_the_session_id() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    let cookies = format!(
        "tmdb_session={}; tmdb_account={}",
        session_cookie("sess-secret", false, Utc::now().timestamp()),
        profile_cookie(),
    );
    let response = server
        .get("/api/v1/session/me")
        .add_header(header::COOKIE, cookie_header(&cookies))
        .await;
    response.assert_status_ok();

    let text = response.text();
    assert!(!text.contains("sess-secret"), "session id must stay in the cookie");
    assert!(!text.contains("refreshed_at"));

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(body["kind"], "account");
    assert_eq!(body["remember"], false);
    assert_eq!(body["profile"]["username"], "ripley");
}

#[tokio::test]
async fn me_reports_a_bare_guest_session() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    let response = server
        .get("/api/v1/session/me")
        .add_header(header::COOKIE, cookie_header("tmdb_guest_session=g123"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body, json!({ "kind": "guest" }));
}

#[tokio::test]
async fn stale_account_session_is_reissued_in_flight() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    // refreshed_at of zero is far past the 30 minute refresh interval.
    let cookies = format!(
        "tmdb_session={}; tmdb_account={}",
        session_cookie("sess-1", true, 0),
        profile_cookie(),
    );
    let response = server
        .get("/api/v1/session/me")
        .add_header(header::COOKIE, cookie_header(&cookies))
        .await;
    response.assert_status_ok();

    let set_cookies: Vec<String> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();

    let session = set_cookies
        .iter()
        .find(|c| c.starts_with("tmdb_session="))
        .expect("session cookie should be re-issued");
    let account = set_cookies
        .iter()
        .find(|c| c.starts_with("tmdb_account="))
        .expect("profile cookie should be re-issued");

    // The remembered ttl from the test config, not the short one.
    assert!(session.contains("Max-Age=7200"), "got {session}");
    assert!(account.contains("Max-Age=7200"), "got {account}");

    let raw = session
        .strip_prefix("tmdb_session=")
        .unwrap()
        .split(';')
        .next()
        .unwrap();
    let payload: Value =
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(raw).unwrap()).unwrap();
    assert_eq!(payload["session_id"], "sess-1");
    assert!(payload["refreshed_at"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn fresh_account_session_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    let cookies = format!(
        "tmdb_session={}; tmdb_account={}",
        session_cookie("sess-1", true, Utc::now().timestamp()),
        profile_cookie(),
    );
    let response = server
        .get("/api/v1/session/me")
        .add_header(header::COOKIE, cookie_header(&cookies))
        .await;
    response.assert_status_ok();

    let reissued = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .any(|v| v.to_str().unwrap().starts_with("tmdb_session="));
    assert!(!reissued, "a young session must not be re-issued");
}

#[tokio::test]
async fn unreachable_genre_list_falls_back_to_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let server = server(dir.path());

    let response = server.get("/api/v1/genres").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let genres = body.as_array().unwrap();
    assert_eq!(genres.len(), 19);
    assert!(genres.iter().any(|g| g["name"] == "Science Fiction"));
}
