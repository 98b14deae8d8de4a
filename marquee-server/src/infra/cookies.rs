//! The cookie-backed [`SessionStore`].
//!
//! Three cookies carry the whole session state:
//!
//! - `tmdb_guest_session` (HttpOnly): the raw guest session id.
//! - `tmdb_session` (HttpOnly): the account session id plus the remember
//!   flag and last refresh time, as base64url JSON.
//! - `tmdb_account` (script-readable): the reduced profile as base64url
//!   JSON, for the UI to render without a round trip.
//!
//! The store is built from the request's `Cookie` header and accumulates
//! `Set-Cookie` values; the session middleware appends them to the
//! response after the handler runs. An unreadable cookie is treated as
//! absent rather than an error.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use marquee_core::{ClearScope, SessionStore};
use marquee_model::{
    AccountProfile, AccountSession, GuestSession, SessionState,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GUEST_COOKIE: &str = "tmdb_guest_session";
pub const SESSION_COOKIE: &str = "tmdb_session";
pub const ACCOUNT_COOKIE: &str = "tmdb_account";

/// Payload of the HttpOnly account session cookie.
#[derive(Debug, Serialize, Deserialize)]
struct SessionCookie {
    session_id: String,
    remember: bool,
    refreshed_at: i64,
}

#[derive(Debug)]
pub struct CookieSessionStore {
    guest: Option<GuestSession>,
    account: Option<AccountSession>,
    secure: bool,
    pending: Vec<String>,
}

impl CookieSessionStore {
    pub fn from_cookie_header(header: Option<&str>, secure: bool) -> Self {
        let header = header.unwrap_or("");

        let guest = cookie_value(header, GUEST_COOKIE)
            .filter(|id| !id.is_empty())
            .map(|id| GuestSession { id: id.to_string(), expires_at: None });

        let account = cookie_value(header, SESSION_COOKIE)
            .and_then(decode_payload::<SessionCookie>)
            .map(|session| AccountSession {
                session_id: session.session_id,
                profile: cookie_value(header, ACCOUNT_COOKIE)
                    .and_then(decode_payload::<AccountProfile>),
                remember: session.remember,
                refreshed_at: session.refreshed_at,
            });

        Self { guest, account, secure, pending: Vec::new() }
    }

    /// Accumulated `Set-Cookie` values, draining the store.
    pub fn take_pending(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    fn issue_guest(&mut self, guest: &GuestSession, ttl: Duration) {
        self.pending.push(make_cookie(
            GUEST_COOKIE,
            &guest.id,
            ttl,
            true,
            self.secure,
        ));
    }

    fn issue_account(&mut self, account: &AccountSession, ttl: Duration) {
        let session = SessionCookie {
            session_id: account.session_id.clone(),
            remember: account.remember,
            refreshed_at: account.refreshed_at,
        };
        self.pending.push(make_cookie(
            SESSION_COOKIE,
            &encode_payload(&session),
            ttl,
            true,
            self.secure,
        ));
        match &account.profile {
            Some(profile) => self.pending.push(make_cookie(
                ACCOUNT_COOKIE,
                &encode_payload(profile),
                ttl,
                false,
                self.secure,
            )),
            None => self
                .pending
                .push(delete_cookie(ACCOUNT_COOKIE, false, self.secure)),
        }
    }
}

impl SessionStore for CookieSessionStore {
    fn get(&self) -> Option<SessionState> {
        self.account
            .clone()
            .map(SessionState::Account)
            .or_else(|| self.guest.clone().map(SessionState::Guest))
    }

    fn guest(&self) -> Option<GuestSession> {
        self.guest.clone()
    }

    fn set(&mut self, state: SessionState, ttl: Duration) {
        match state {
            SessionState::Guest(guest) => {
                self.issue_guest(&guest, ttl);
                self.guest = Some(guest);
            }
            SessionState::Account(account) => {
                self.issue_account(&account, ttl);
                self.account = Some(account);
            }
        }
    }

    fn clear(&mut self, scope: ClearScope) {
        if matches!(scope, ClearScope::Guest | ClearScope::All) {
            self.guest = None;
            self.pending.push(delete_cookie(GUEST_COOKIE, true, self.secure));
        }
        if matches!(scope, ClearScope::Account | ClearScope::All) {
            self.account = None;
            self.pending
                .push(delete_cookie(SESSION_COOKIE, true, self.secure));
            self.pending
                .push(delete_cookie(ACCOUNT_COOKIE, false, self.secure));
        }
    }

    fn refresh(&mut self, ttl: Duration) {
        if let Some(account) = &mut self.account {
            account.refreshed_at = Utc::now().timestamp();
            let account = account.clone();
            self.issue_account(&account, ttl);
        } else if let Some(guest) = self.guest.clone() {
            self.issue_guest(&guest, ttl);
        }
    }
}

fn encode_payload<T: Serialize>(payload: &T) -> String {
    // Infallible for the plain structs stored here.
    let json = serde_json::to_vec(payload).unwrap_or_default();
    URL_SAFE_NO_PAD.encode(json)
}

fn decode_payload<T: DeserializeOwned>(raw: &str) -> Option<T> {
    let bytes = URL_SAFE_NO_PAD.decode(raw).ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn make_cookie(
    name: &str,
    value: &str,
    max_age: Duration,
    http_only: bool,
    secure: bool,
) -> String {
    let mut parts = vec![
        format!("{name}={value}"),
        format!("Max-Age={}", max_age.as_secs()),
        "Path=/".to_string(),
        "SameSite=Strict".to_string(),
    ];
    if http_only {
        parts.push("HttpOnly".to_string());
    }
    if secure {
        parts.push("Secure".to_string());
    }
    parts.join("; ")
}

fn delete_cookie(name: &str, http_only: bool, secure: bool) -> String {
    let mut parts = vec![
        format!("{name}="),
        "Max-Age=0".to_string(),
        "Path=/".to_string(),
        "SameSite=Strict".to_string(),
    ];
    if http_only {
        parts.push("HttpOnly".to_string());
    }
    if secure {
        parts.push("Secure".to_string());
    }
    parts.join("; ")
}

fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for part in header.split(';') {
        let trimmed = part.trim();
        if let Some(value) = trimmed
            .strip_prefix(name)
            .and_then(|rest| rest.strip_prefix('='))
        {
            return Some(value);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> AccountProfile {
        AccountProfile {
            id: 42,
            username: "ripley".into(),
            name: "Ellen Ripley".into(),
            avatar_path: None,
            iso_639_1: "en".into(),
            iso_3166_1: "US".into(),
        }
    }

    #[test]
    fn guest_cookie_round_trips() {
        let mut store = CookieSessionStore::from_cookie_header(None, false);
        store.set(
            SessionState::Guest(GuestSession {
                id: "g123".into(),
                expires_at: None,
            }),
            Duration::from_secs(60),
        );
        let pending = store.take_pending();
        assert_eq!(pending.len(), 1);
        assert!(pending[0].starts_with("tmdb_guest_session=g123"));
        assert!(pending[0].contains("HttpOnly"));

        let header = pending[0].split(';').next().unwrap().to_string();
        let reparsed =
            CookieSessionStore::from_cookie_header(Some(&header), false);
        assert_eq!(reparsed.guest().unwrap().id, "g123");
    }

    #[test]
    fn account_login_issues_session_and_profile_cookies() {
        let mut store = CookieSessionStore::from_cookie_header(None, true);
        store.set(
            SessionState::Account(AccountSession {
                session_id: "s1".into(),
                profile: Some(profile()),
                remember: true,
                refreshed_at: 0,
            }),
            Duration::from_secs(60),
        );

        let pending = store.take_pending();
        assert_eq!(pending.len(), 2);
        assert!(pending[0].starts_with("tmdb_session="));
        assert!(pending[0].contains("HttpOnly"));
        assert!(pending[0].contains("Secure"));
        assert!(pending[1].starts_with("tmdb_account="));
        assert!(
            !pending[1].contains("HttpOnly"),
            "profile cookie stays script-readable"
        );
    }

    #[test]
    fn account_wins_over_guest() {
        let mut seed = CookieSessionStore::from_cookie_header(None, false);
        seed.set(
            SessionState::Guest(GuestSession {
                id: "g1".into(),
                expires_at: None,
            }),
            Duration::from_secs(60),
        );
        seed.set(
            SessionState::Account(AccountSession {
                session_id: "s1".into(),
                profile: Some(profile()),
                remember: false,
                refreshed_at: 0,
            }),
            Duration::from_secs(60),
        );

        let header = seed
            .take_pending()
            .iter()
            .map(|c| c.split(';').next().unwrap().to_string())
            .collect::<Vec<_>>()
            .join("; ");
        let store =
            CookieSessionStore::from_cookie_header(Some(&header), false);

        match store.get() {
            Some(SessionState::Account(account)) => {
                assert_eq!(account.session_id, "s1");
                assert_eq!(account.profile, Some(profile()));
            }
            other => panic!("expected account session, got {other:?}"),
        }
        // The guest cookie stays usable underneath.
        assert_eq!(store.guest().unwrap().id, "g1");
    }

    #[test]
    fn clearing_account_leaves_guest_alone() {
        let header = format!(
            "{GUEST_COOKIE}=g1; {SESSION_COOKIE}=not-base64-json"
        );
        let mut store =
            CookieSessionStore::from_cookie_header(Some(&header), false);
        // Corrupt session cookie parses as absent.
        assert!(store.get().unwrap().as_guest().is_some());

        store.clear(ClearScope::Account);
        let pending = store.take_pending();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|c| c.contains("Max-Age=0")));
        assert_eq!(store.guest().unwrap().id, "g1");
    }
}
