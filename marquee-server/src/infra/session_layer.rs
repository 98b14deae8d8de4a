//! Per-request session plumbing.
//!
//! The middleware reconstructs the session from the `Cookie` header,
//! applies the sliding-expiry refresh when the account session is old
//! enough, hands the store to handlers through request extensions, and
//! appends whatever `Set-Cookie` values accumulated once the handler
//! returns.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use marquee_core::SessionStore;
use marquee_model::SessionState;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::infra::app_state::AppState;
use crate::infra::cookies::CookieSessionStore;

/// Shared handle to the request's session store, inserted into request
/// extensions by [`session_middleware`].
#[derive(Clone)]
pub struct SessionHandle(pub Arc<Mutex<CookieSessionStore>>);

impl<S> FromRequestParts<S> for SessionHandle
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<SessionHandle>().cloned().ok_or_else(|| {
            AppError::internal("session middleware not configured")
        })
    }
}

pub async fn session_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let cookie_header = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let mut store = CookieSessionStore::from_cookie_header(
        cookie_header.as_deref(),
        state.config.session.secure_cookies,
    );

    // Sliding expiry: re-issue the account cookies at most once per
    // refresh interval, on whatever request happens to cross it.
    if let Some(SessionState::Account(account)) = store.get() {
        let age = Utc::now().timestamp() - account.refreshed_at;
        if age >= state.config.session.refresh_interval.as_secs() as i64 {
            store.refresh(state.policy.account_ttl(account.remember));
        }
    }

    let handle = SessionHandle(Arc::new(Mutex::new(store)));
    req.extensions_mut().insert(handle.clone());

    let mut response = next.run(req).await;

    let pending = handle.0.lock().await.take_pending();
    for cookie in pending {
        if let Ok(value) = cookie.parse() {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}
