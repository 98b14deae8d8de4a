//! Session lifecycle endpoints.
//!
//! Handlers drive a [`SessionManager`] over the request's cookie store;
//! cookie changes flow back through the session middleware.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use marquee_core::{SessionManager, SessionStore, TmdbClient};
use marquee_model::{AccountProfile, GuestSession, SessionState};
use serde::{Deserialize, Serialize};

use crate::errors::AppResult;
use crate::infra::app_state::AppState;
use crate::infra::cookies::CookieSessionStore;
use crate::infra::session_layer::SessionHandle;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default, rename = "rememberMe")]
    pub remember_me: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub profile: Option<AccountProfile>,
    pub expires_in_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub refreshed: bool,
}

/// Create (or re-use) the anonymous guest session.
pub async fn guest(
    State(state): State<AppState>,
    session: SessionHandle,
) -> AppResult<Json<GuestSession>> {
    let mut store = session.0.lock().await;
    let mut manager = manager(&mut store, &state);
    let guest = manager.ensure_guest().await?;
    Ok(Json(guest))
}

pub async fn login(
    State(state): State<AppState>,
    session: SessionHandle,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let mut store = session.0.lock().await;
    let mut manager = manager(&mut store, &state);
    let outcome = manager
        .login(&request.username, &request.password, request.remember_me)
        .await?;

    Ok(Json(LoginResponse {
        profile: outcome.profile,
        expires_in_secs: outcome.expires_in.as_secs(),
    }))
}

/// Logout never fails: upstream deletion is best-effort, cookies always
/// go away.
pub async fn logout(
    State(state): State<AppState>,
    session: SessionHandle,
) -> StatusCode {
    let mut store = session.0.lock().await;
    let mut manager = manager(&mut store, &state);
    manager.logout().await;
    StatusCode::NO_CONTENT
}

/// Live probe of the account session; clears it when the probe fails.
pub async fn validate(
    State(state): State<AppState>,
    session: SessionHandle,
) -> Json<ValidateResponse> {
    let mut store = session.0.lock().await;
    let mut manager = manager(&mut store, &state);
    Json(ValidateResponse { valid: manager.validate().await })
}

/// Explicit sliding-expiry refresh, for clients that want to keep an idle
/// tab alive.
pub async fn refresh(
    State(state): State<AppState>,
    session: SessionHandle,
) -> Json<RefreshResponse> {
    let mut store = session.0.lock().await;
    let mut manager = manager(&mut store, &state);
    Json(RefreshResponse { refreshed: manager.refresh() })
}

/// Script-safe session projection. Session ids stay inside the HttpOnly
/// cookies; only the reduced profile ever reaches a response body.
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionInfo {
    Guest,
    Account {
        profile: Option<AccountProfile>,
        remember: bool,
    },
}

/// The caller's identity as the cookies describe it; `null` when no
/// session is active.
pub async fn me(session: SessionHandle) -> Json<Option<SessionInfo>> {
    let store = session.0.lock().await;
    let info = store.get().map(|state| match state {
        SessionState::Guest(_) => SessionInfo::Guest,
        SessionState::Account(account) => SessionInfo::Account {
            profile: account.profile,
            remember: account.remember,
        },
    });
    Json(info)
}

fn manager<'a>(
    store: &'a mut CookieSessionStore,
    state: &'a AppState,
) -> SessionManager<'a, TmdbClient, CookieSessionStore> {
    SessionManager::new(store, state.tmdb.as_ref(), state.policy.clone())
}
