//! In-memory [`SessionStore`] for tests and embedded use.

use std::time::Duration;

use marquee_model::{GuestSession, SessionState};

use super::{ClearScope, SessionStore};

/// Holds at most one guest and one account session, like the cookie pair
/// it stands in for. Counts writes so tests can assert no duplicate cookie
/// is issued.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    guest: Option<GuestSession>,
    account: Option<SessionState>,
    /// Number of `set` calls observed.
    pub set_count: usize,
    /// Number of `refresh` calls observed.
    pub refresh_count: usize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_guest(guest: GuestSession) -> Self {
        Self {
            guest: Some(guest),
            ..Self::default()
        }
    }

    pub fn with_account(account: SessionState) -> Self {
        debug_assert!(matches!(account, SessionState::Account(_)));
        Self {
            account: Some(account),
            ..Self::default()
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<SessionState> {
        self.account
            .clone()
            .or_else(|| self.guest.clone().map(SessionState::Guest))
    }

    fn guest(&self) -> Option<GuestSession> {
        self.guest.clone()
    }

    fn set(&mut self, state: SessionState, _ttl: Duration) {
        self.set_count += 1;
        match state {
            SessionState::Guest(g) => self.guest = Some(g),
            account @ SessionState::Account(_) => {
                self.account = Some(account)
            }
        }
    }

    fn clear(&mut self, scope: ClearScope) {
        match scope {
            ClearScope::Guest => self.guest = None,
            ClearScope::Account => self.account = None,
            ClearScope::All => {
                self.guest = None;
                self.account = None;
            }
        }
    }

    fn refresh(&mut self, _ttl: Duration) {
        self.refresh_count += 1;
    }
}
