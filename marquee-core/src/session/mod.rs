//! Dual guest/account session lifecycle.
//!
//! Sessions are issued by TMDB and the only durable state is a pair of
//! cookies, so the session contract is expressed as a small pluggable
//! store ([`SessionStore`]) rather than reads of global cookie state: the
//! server implements it over the request/response cookie pair, tests use
//! the in-memory store in [`memory`].
//!
//! Lifecycle (informal): `NoSession → GuestActive` via [`SessionManager::ensure_guest`],
//! or `NoSession → AccountActive` via login, falling back to `NoSession`
//! when a validation probe fails. There is no server-pushed invalidation;
//! an account cookie without a live upstream session is detected lazily and
//! cleared.

mod manager;
pub mod memory;

use std::time::Duration;

use marquee_model::{GuestSession, SessionState};

pub use manager::{AuthBackend, LoginOutcome, SessionManager, SessionPolicy};

use crate::tmdb::TmdbError;

/// Which cookies a [`SessionStore::clear`] call removes.
///
/// Logout removes only the account pair; the guest cookie has its own
/// explicit clearing path, matching the original cookie layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearScope {
    Guest,
    Account,
    All,
}

/// Pluggable session backing store: `{get, set, clear, refresh}` plus a
/// guest accessor, since the guest cookie stays usable while an account
/// session is active (ratings always run under the guest identity).
pub trait SessionStore {
    /// The active session; the account session wins when both exist.
    fn get(&self) -> Option<SessionState>;

    /// The guest session cookie, regardless of an active account session.
    fn guest(&self) -> Option<GuestSession>;

    /// Store a session with the given cookie lifetime.
    fn set(&mut self, state: SessionState, ttl: Duration);

    /// Remove session cookies within the given scope.
    fn clear(&mut self, scope: ClearScope);

    /// Re-issue the active session's cookies with a fresh lifetime,
    /// without changing their contents.
    fn refresh(&mut self, ttl: Duration);
}

/// Session operation failures, each carrying a human-readable reason.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to create guest session")]
    GuestUnavailable(#[source] TmdbError),

    #[error("failed to obtain a request token")]
    TokenRequest(#[source] TmdbError),

    /// Credential validation rejected; carries TMDB's own message.
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("failed to create session")]
    SessionCreation(#[source] TmdbError),

    #[error("failed to submit rating")]
    RatingFailed(#[source] TmdbError),

    #[error("no session available")]
    NoSession,
}
