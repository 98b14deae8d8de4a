//! Session identity shapes.
//!
//! Exactly one session is active per client: an anonymous guest session or
//! an authenticated account session. The account session wins when both
//! cookies are present.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Anonymous, TMDB-issued identifier allowing rating submission without a
/// full account login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestSession {
    pub id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Reduced, non-sensitive account projection kept in the script-readable
/// cookie for UI display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountProfile {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub name: String,
    pub avatar_path: Option<String>,
    #[serde(default)]
    pub iso_639_1: String,
    #[serde(default)]
    pub iso_3166_1: String,
}

/// Authenticated session tied to a real TMDB account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSession {
    pub session_id: String,
    /// `None` when the profile fetch failed after session creation;
    /// the session is still usable.
    pub profile: Option<AccountProfile>,
    pub remember: bool,
    /// Unix timestamp (seconds) of the last sliding-expiry refresh.
    #[serde(default)]
    pub refreshed_at: i64,
}

/// The caller's identity as reconstructed from cookies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionState {
    Guest(GuestSession),
    Account(AccountSession),
}

impl SessionState {
    pub fn as_guest(&self) -> Option<&GuestSession> {
        match self {
            SessionState::Guest(g) => Some(g),
            SessionState::Account(_) => None,
        }
    }

    pub fn as_account(&self) -> Option<&AccountSession> {
        match self {
            SessionState::Account(a) => Some(a),
            SessionState::Guest(_) => None,
        }
    }
}
