use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use marquee_config::SessionConfig;
use marquee_model::{
    AccountProfile, AccountSession, GuestSession, RatedMovie, SessionState,
};
use tracing::warn;

use super::{ClearScope, SessionError, SessionStore};
use crate::tmdb::{TmdbClient, TmdbError};

/// The slice of TMDB the session lifecycle depends on. Implemented by
/// [`TmdbClient`]; mocked in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn create_guest_session(&self) -> Result<GuestSession, TmdbError>;
    async fn create_request_token(&self) -> Result<String, TmdbError>;
    async fn validate_with_login(
        &self,
        username: &str,
        password: &str,
        request_token: &str,
    ) -> Result<String, TmdbError>;
    async fn create_session(
        &self,
        request_token: &str,
    ) -> Result<String, TmdbError>;
    async fn delete_session(&self, session_id: &str)
    -> Result<(), TmdbError>;
    async fn account_details(
        &self,
        session_id: &str,
    ) -> Result<AccountProfile, TmdbError>;
    async fn rate_movie(
        &self,
        movie_id: u64,
        value: u8,
        guest_session_id: &str,
    ) -> Result<(), TmdbError>;
    async fn guest_rated_movies(
        &self,
        guest_session_id: &str,
    ) -> Result<Vec<RatedMovie>, TmdbError>;
    async fn account_rated_movies(
        &self,
        account_id: u64,
        session_id: &str,
    ) -> Result<Vec<RatedMovie>, TmdbError>;
}

#[async_trait]
impl AuthBackend for TmdbClient {
    async fn create_guest_session(&self) -> Result<GuestSession, TmdbError> {
        TmdbClient::create_guest_session(self).await
    }

    async fn create_request_token(&self) -> Result<String, TmdbError> {
        TmdbClient::create_request_token(self).await
    }

    async fn validate_with_login(
        &self,
        username: &str,
        password: &str,
        request_token: &str,
    ) -> Result<String, TmdbError> {
        TmdbClient::validate_with_login(self, username, password, request_token)
            .await
    }

    async fn create_session(
        &self,
        request_token: &str,
    ) -> Result<String, TmdbError> {
        TmdbClient::create_session(self, request_token).await
    }

    async fn delete_session(
        &self,
        session_id: &str,
    ) -> Result<(), TmdbError> {
        TmdbClient::delete_session(self, session_id).await
    }

    async fn account_details(
        &self,
        session_id: &str,
    ) -> Result<AccountProfile, TmdbError> {
        TmdbClient::account_details(self, session_id).await
    }

    async fn rate_movie(
        &self,
        movie_id: u64,
        value: u8,
        guest_session_id: &str,
    ) -> Result<(), TmdbError> {
        TmdbClient::rate_movie(self, movie_id, value, guest_session_id).await
    }

    async fn guest_rated_movies(
        &self,
        guest_session_id: &str,
    ) -> Result<Vec<RatedMovie>, TmdbError> {
        TmdbClient::guest_rated_movies(self, guest_session_id).await
    }

    async fn account_rated_movies(
        &self,
        account_id: u64,
        session_id: &str,
    ) -> Result<Vec<RatedMovie>, TmdbError> {
        TmdbClient::account_rated_movies(self, account_id, session_id).await
    }
}

/// Cookie lifetimes for each session flavor.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    pub guest_ttl: Duration,
    pub session_ttl: Duration,
    pub remember_session_ttl: Duration,
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self {
            guest_ttl: Duration::from_secs(60 * 60 * 24 * 7),
            session_ttl: Duration::from_secs(60 * 60 * 24),
            remember_session_ttl: Duration::from_secs(60 * 60 * 24 * 30),
        }
    }
}

impl From<&SessionConfig> for SessionPolicy {
    fn from(config: &SessionConfig) -> Self {
        Self {
            guest_ttl: config.guest_ttl,
            session_ttl: config.session_ttl,
            remember_session_ttl: config.remember_session_ttl,
        }
    }
}

impl SessionPolicy {
    /// Account cookie lifetime for the given "remember me" choice.
    pub fn account_ttl(&self, remember: bool) -> Duration {
        if remember {
            self.remember_session_ttl
        } else {
            self.session_ttl
        }
    }
}

/// Successful login result.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub session_id: String,
    /// `None` when the profile fetch failed; the session is still live.
    pub profile: Option<AccountProfile>,
    pub expires_in: Duration,
}

/// Drives the session lifecycle against a [`SessionStore`] and an
/// [`AuthBackend`]. Constructed per request; holds no state of its own.
pub struct SessionManager<'a, B: AuthBackend, S: SessionStore> {
    store: &'a mut S,
    backend: &'a B,
    policy: SessionPolicy,
}

impl<'a, B: AuthBackend, S: SessionStore> SessionManager<'a, B, S> {
    pub fn new(store: &'a mut S, backend: &'a B, policy: SessionPolicy) -> Self {
        Self { store, backend, policy }
    }

    /// Return the existing guest session, or create one upstream.
    ///
    /// Idempotent re-entry: a valid guest cookie short-circuits without a
    /// new upstream request and without re-setting the cookie.
    pub async fn ensure_guest(&mut self) -> Result<GuestSession, SessionError> {
        if let Some(existing) = self.store.guest() {
            return Ok(existing);
        }

        let guest = self
            .backend
            .create_guest_session()
            .await
            .map_err(SessionError::GuestUnavailable)?;

        let ttl = guest
            .expires_at
            .and_then(|at| (at - Utc::now()).to_std().ok())
            .filter(|ttl| !ttl.is_zero())
            .unwrap_or(self.policy.guest_ttl);

        self.store.set(SessionState::Guest(guest.clone()), ttl);
        Ok(guest)
    }

    /// Three-step login handshake followed by a tolerant profile fetch.
    pub async fn login(
        &mut self,
        username: &str,
        password: &str,
        remember: bool,
    ) -> Result<LoginOutcome, SessionError> {
        let request_token = self
            .backend
            .create_request_token()
            .await
            .map_err(SessionError::TokenRequest)?;

        let validated = self
            .backend
            .validate_with_login(username, password, &request_token)
            .await
            .map_err(|err| match err {
                TmdbError::Rejected(message) => {
                    SessionError::InvalidCredentials(message)
                }
                other => SessionError::InvalidCredentials(other.to_string()),
            })?;

        let session_id = self
            .backend
            .create_session(&validated)
            .await
            .map_err(SessionError::SessionCreation)?;

        // Partial success: a session without a profile is still a session.
        let profile = match self.backend.account_details(&session_id).await {
            Ok(profile) => Some(profile),
            Err(err) => {
                warn!("account lookup after login failed: {err}");
                None
            }
        };

        let ttl = self.policy.account_ttl(remember);
        self.store.set(
            SessionState::Account(AccountSession {
                session_id: session_id.clone(),
                profile: profile.clone(),
                remember,
                refreshed_at: Utc::now().timestamp(),
            }),
            ttl,
        );

        Ok(LoginOutcome { session_id, profile, expires_in: ttl })
    }

    /// Live validation of the account session. Not read-only: a failed
    /// probe forces a full logout before reporting `false`.
    pub async fn validate(&mut self) -> bool {
        let Some(SessionState::Account(account)) = self.store.get() else {
            return false;
        };

        match self.backend.account_details(&account.session_id).await {
            Ok(_) => true,
            Err(err) => {
                warn!("session validation failed, logging out: {err}");
                self.logout().await;
                false
            }
        }
    }

    /// Best-effort upstream deletion followed by unconditional local
    /// cookie clearing. Never fails.
    pub async fn logout(&mut self) {
        if let Some(SessionState::Account(account)) = self.store.get() {
            if let Err(err) =
                self.backend.delete_session(&account.session_id).await
            {
                warn!("upstream session deletion failed: {err}");
            }
        }

        self.store.clear(ClearScope::Account);
    }

    /// Drop the guest cookie without touching the account pair.
    pub fn clear_guest(&mut self) {
        self.store.clear(ClearScope::Guest);
    }

    /// Re-issue the active session's cookies with a fresh max-age; no
    /// upstream call. Returns whether a session was present to refresh.
    pub fn refresh(&mut self) -> bool {
        match self.store.get() {
            Some(SessionState::Account(account)) => {
                self.store
                    .refresh(self.policy.account_ttl(account.remember));
                true
            }
            Some(SessionState::Guest(_)) => {
                self.store.refresh(self.policy.guest_ttl);
                true
            }
            None => false,
        }
    }

    /// Rate a movie under the guest identity, creating the guest session
    /// first when necessary. A failed guest creation reports failure
    /// without contacting the rating endpoint.
    pub async fn rate_movie(
        &mut self,
        movie_id: u64,
        value: u8,
    ) -> Result<(), SessionError> {
        let guest = self.ensure_guest().await?;

        self.backend
            .rate_movie(movie_id, value, &guest.id)
            .await
            .map_err(SessionError::RatingFailed)
    }

    /// The upstream rated list for the active identity: the account list
    /// when logged in with a known profile, otherwise the guest list.
    pub async fn rated_movies(
        &mut self,
    ) -> Result<Vec<RatedMovie>, SessionError> {
        match self.store.get() {
            Some(SessionState::Account(AccountSession {
                session_id,
                profile: Some(profile),
                ..
            })) => self
                .backend
                .account_rated_movies(profile.id, &session_id)
                .await
                .map_err(SessionError::RatingFailed),
            _ => match self.store.guest() {
                Some(guest) => self
                    .backend
                    .guest_rated_movies(&guest.id)
                    .await
                    .map_err(SessionError::RatingFailed),
                None => Err(SessionError::NoSession),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::memory::MemorySessionStore;
    use chrono::Duration as ChronoDuration;
    use mockall::predicate::eq;

    fn guest(id: &str) -> GuestSession {
        GuestSession {
            id: id.to_string(),
            expires_at: Some(Utc::now() + ChronoDuration::days(1)),
        }
    }

    fn account(session_id: &str, with_profile: bool) -> SessionState {
        SessionState::Account(AccountSession {
            session_id: session_id.to_string(),
            profile: with_profile.then(|| AccountProfile {
                id: 42,
                username: "ripley".into(),
                name: "Ellen Ripley".into(),
                avatar_path: None,
                iso_639_1: "en".into(),
                iso_3166_1: "US".into(),
            }),
            remember: true,
            refreshed_at: Utc::now().timestamp(),
        })
    }

    #[tokio::test]
    async fn existing_guest_cookie_short_circuits() {
        let mut store = MemorySessionStore::with_guest(guest("g1"));
        let backend = MockAuthBackend::new(); // no expectations: any call panics

        let mut manager =
            SessionManager::new(&mut store, &backend, SessionPolicy::default());
        let first = manager.ensure_guest().await.unwrap();
        let second = manager.ensure_guest().await.unwrap();

        assert_eq!(first.id, "g1");
        assert_eq!(second.id, "g1");
        assert_eq!(store.set_count, 0, "no duplicate cookie issued");
    }

    #[tokio::test]
    async fn guest_created_once_for_two_calls() {
        let mut store = MemorySessionStore::new();
        let mut backend = MockAuthBackend::new();
        backend
            .expect_create_guest_session()
            .times(1)
            .returning(|| Ok(guest("fresh")));

        let mut manager =
            SessionManager::new(&mut store, &backend, SessionPolicy::default());
        let first = manager.ensure_guest().await.unwrap();
        let second = manager.ensure_guest().await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.set_count, 1);
    }

    #[tokio::test]
    async fn expired_guest_expiry_falls_back_to_default_ttl() {
        let mut store = MemorySessionStore::new();
        let mut backend = MockAuthBackend::new();
        backend.expect_create_guest_session().returning(|| {
            Ok(GuestSession {
                id: "stale".into(),
                // Expiry already in the past; ttl must fall back.
                expires_at: Some(Utc::now() - ChronoDuration::hours(1)),
            })
        });

        let mut manager =
            SessionManager::new(&mut store, &backend, SessionPolicy::default());
        let created = manager.ensure_guest().await.unwrap();

        assert_eq!(created.id, "stale");
        assert_eq!(store.set_count, 1);
    }

    #[tokio::test]
    async fn rating_without_session_creates_guest_first() {
        let mut store = MemorySessionStore::new();
        let mut backend = MockAuthBackend::new();
        backend
            .expect_create_guest_session()
            .times(1)
            .returning(|| Ok(guest("g-rate")));
        backend
            .expect_rate_movie()
            .with(eq(603), eq(8), eq("g-rate"))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut manager =
            SessionManager::new(&mut store, &backend, SessionPolicy::default());
        manager.rate_movie(603, 8).await.unwrap();
    }

    #[tokio::test]
    async fn failed_guest_creation_short_circuits_rating() {
        let mut store = MemorySessionStore::new();
        let mut backend = MockAuthBackend::new();
        backend
            .expect_create_guest_session()
            .returning(|| Err(TmdbError::Status(500)));
        backend.expect_rate_movie().times(0);

        let mut manager =
            SessionManager::new(&mut store, &backend, SessionPolicy::default());
        let err = manager.rate_movie(603, 8).await.unwrap_err();
        assert!(matches!(err, SessionError::GuestUnavailable(_)));
    }

    #[tokio::test]
    async fn rated_movies_include_submission() {
        let mut store = MemorySessionStore::with_guest(guest("g-list"));
        let mut backend = MockAuthBackend::new();
        backend
            .expect_rate_movie()
            .with(eq(603), eq(8), eq("g-list"))
            .returning(|_, _, _| Ok(()));
        backend
            .expect_guest_rated_movies()
            .with(eq("g-list"))
            .returning(|_| {
                Ok(vec![RatedMovie {
                    movie: marquee_model::MovieSummary {
                        id: 603,
                        title: "The Matrix".into(),
                        poster_path: None,
                        backdrop_path: None,
                        overview: String::new(),
                        release_date: "1999-03-30".into(),
                        vote_average: 8.2,
                        vote_count: 0,
                        genre_ids: vec![],
                        popularity: 0.0,
                    },
                    rating: 8,
                    rated_at: None,
                }])
            });

        let mut manager =
            SessionManager::new(&mut store, &backend, SessionPolicy::default());
        manager.rate_movie(603, 8).await.unwrap();
        let rated = manager.rated_movies().await.unwrap();

        assert_eq!(rated.len(), 1);
        assert_eq!(rated[0].movie.id, 603);
        assert_eq!(rated[0].rating, 8);
    }

    #[tokio::test]
    async fn login_tolerates_profile_fetch_failure() {
        let mut store = MemorySessionStore::new();
        let mut backend = MockAuthBackend::new();
        backend
            .expect_create_request_token()
            .returning(|| Ok("tok".into()));
        backend
            .expect_validate_with_login()
            .with(eq("ripley"), eq("nostromo"), eq("tok"))
            .returning(|_, _, _| Ok("tok".into()));
        backend
            .expect_create_session()
            .with(eq("tok"))
            .returning(|_| Ok("sess-1".into()));
        backend
            .expect_account_details()
            .returning(|_| Err(TmdbError::Status(500)));

        let mut manager =
            SessionManager::new(&mut store, &backend, SessionPolicy::default());
        let outcome =
            manager.login("ripley", "nostromo", true).await.unwrap();

        assert_eq!(outcome.session_id, "sess-1");
        assert!(outcome.profile.is_none());
        assert!(matches!(store.get(), Some(SessionState::Account(_))));
    }

    #[tokio::test]
    async fn rejected_credentials_surface_the_reason() {
        let mut store = MemorySessionStore::new();
        let mut backend = MockAuthBackend::new();
        backend
            .expect_create_request_token()
            .returning(|| Ok("tok".into()));
        backend.expect_validate_with_login().returning(|_, _, _| {
            Err(TmdbError::Rejected(
                "Invalid username and/or password".into(),
            ))
        });
        backend.expect_create_session().times(0);

        let mut manager =
            SessionManager::new(&mut store, &backend, SessionPolicy::default());
        let err =
            manager.login("ripley", "wrong", false).await.unwrap_err();

        match err {
            SessionError::InvalidCredentials(reason) => {
                assert_eq!(reason, "Invalid username and/or password")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn logout_swallows_upstream_failure() {
        let mut store = MemorySessionStore::with_account(account("sess-2", true));
        let mut backend = MockAuthBackend::new();
        backend
            .expect_delete_session()
            .with(eq("sess-2"))
            .times(1)
            .returning(|_| Err(TmdbError::Status(500)));

        let mut manager =
            SessionManager::new(&mut store, &backend, SessionPolicy::default());
        manager.logout().await;

        assert!(store.get().is_none(), "cookies cleared despite failure");
    }

    #[tokio::test]
    async fn failed_validation_forces_logout() {
        let mut store = MemorySessionStore::with_account(account("sess-3", false));
        let mut backend = MockAuthBackend::new();
        backend
            .expect_account_details()
            .with(eq("sess-3"))
            .returning(|_| Err(TmdbError::Status(401)));
        backend
            .expect_delete_session()
            .returning(|_| Ok(()));

        let mut manager =
            SessionManager::new(&mut store, &backend, SessionPolicy::default());
        assert!(!manager.validate().await);
        assert!(store.get().is_none());
    }

    #[tokio::test]
    async fn refresh_without_session_reports_false() {
        let mut store = MemorySessionStore::new();
        let backend = MockAuthBackend::new();

        let mut manager =
            SessionManager::new(&mut store, &backend, SessionPolicy::default());
        assert!(!manager.refresh());

        store.set(
            SessionState::Guest(guest("g2")),
            Duration::from_secs(60),
        );
        let mut manager =
            SessionManager::new(&mut store, &backend, SessionPolicy::default());
        assert!(manager.refresh());
        assert_eq!(store.refresh_count, 1);
    }
}
