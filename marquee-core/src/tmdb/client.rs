use chrono::{DateTime, NaiveDateTime, Utc};
use marquee_config::TmdbConfig;
use marquee_model::{
    DiscoverFilters, Genre, GuestSession, MovieDetails, MoviePage, Person,
    PersonMovieCredits, RatedMovie, TrendingWindow,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use super::TmdbError;
use super::wire::{
    AccountWire, GenreListWire, GuestSessionWire, MovieDetailsWire,
    RatedPageWire, RequestTokenWire, SessionWire, StatusWire,
};

/// TMDB expiry timestamps look like `2026-08-26 21:04:37 UTC`.
const TMDB_EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Thin client over the TMDB v3 API.
///
/// One method per consumed endpoint; every method performs exactly one
/// HTTPS request and surfaces failures as [`TmdbError`]. Degradation to
/// empty results is the caller's concern (see [`super::Catalog`]).
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
    language: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self, TmdbError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            language: config.language.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TmdbError> {
        let response = self
            .http
            .get(self.url(path))
            .bearer_auth(&self.api_token)
            .header("accept", "application/json")
            .query(query)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TmdbError> {
        let status = response.status();
        if !status.is_success() {
            // TMDB error bodies carry a human-readable status_message.
            let message = response
                .json::<StatusWire>()
                .await
                .ok()
                .and_then(|s| s.status_message);
            return Err(match message {
                Some(msg) => TmdbError::Rejected(msg),
                None => TmdbError::Status(status.as_u16()),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TmdbError::Parse(e.to_string()))
    }

    // --- Authentication ------------------------------------------------

    /// Create a new anonymous guest session.
    pub async fn create_guest_session(
        &self,
    ) -> Result<GuestSession, TmdbError> {
        let wire: GuestSessionWire = self
            .get_json("/authentication/guest_session/new", &[])
            .await?;
        if !wire.success {
            return Err(TmdbError::Rejected(
                "guest session was not granted".to_string(),
            ));
        }

        Ok(GuestSession {
            id: wire.guest_session_id,
            expires_at: parse_expiry(&wire.expires_at),
        })
    }

    /// Step 1 of the login handshake: obtain a request token.
    pub async fn create_request_token(&self) -> Result<String, TmdbError> {
        let wire: RequestTokenWire =
            self.get_json("/authentication/token/new", &[]).await?;
        if !wire.success {
            return Err(TmdbError::Rejected(
                "request token was not granted".to_string(),
            ));
        }
        Ok(wire.request_token)
    }

    /// Step 2: validate the request token against the user's credentials.
    /// Returns the validated token.
    pub async fn validate_with_login(
        &self,
        username: &str,
        password: &str,
        request_token: &str,
    ) -> Result<String, TmdbError> {
        let response = self
            .http
            .post(self.url("/authentication/token/validate_with_login"))
            .bearer_auth(&self.api_token)
            .json(&json!({
                "username": username,
                "password": password,
                "request_token": request_token,
            }))
            .send()
            .await?;

        let wire: RequestTokenWire = Self::decode(response).await?;
        Ok(wire.request_token)
    }

    /// Step 3: exchange the validated token for a session id.
    pub async fn create_session(
        &self,
        request_token: &str,
    ) -> Result<String, TmdbError> {
        let response = self
            .http
            .post(self.url("/authentication/session/new"))
            .bearer_auth(&self.api_token)
            .json(&json!({ "request_token": request_token }))
            .send()
            .await?;

        let wire: SessionWire = Self::decode(response).await?;
        if !wire.success {
            return Err(TmdbError::Rejected(
                "session was not created".to_string(),
            ));
        }
        Ok(wire.session_id)
    }

    /// Delete a server-side session.
    pub async fn delete_session(
        &self,
        session_id: &str,
    ) -> Result<(), TmdbError> {
        let response = self
            .http
            .delete(self.url("/authentication/session"))
            .bearer_auth(&self.api_token)
            .json(&json!({ "session_id": session_id }))
            .send()
            .await?;

        let _: StatusWire = Self::decode(response).await?;
        Ok(())
    }

    /// Account lookup for the session; also serves as the liveness probe
    /// during session validation.
    pub async fn account_details(
        &self,
        session_id: &str,
    ) -> Result<marquee_model::AccountProfile, TmdbError> {
        let wire: AccountWire = self
            .get_json("/account", &[("session_id", session_id.to_string())])
            .await?;
        Ok(wire.into())
    }

    // --- Ratings --------------------------------------------------------

    /// Submit a rating under a guest session.
    pub async fn rate_movie(
        &self,
        movie_id: u64,
        value: u8,
        guest_session_id: &str,
    ) -> Result<(), TmdbError> {
        let response = self
            .http
            .post(self.url(&format!("/movie/{movie_id}/rating")))
            .bearer_auth(&self.api_token)
            .query(&[("guest_session_id", guest_session_id)])
            .json(&json!({ "value": value }))
            .send()
            .await?;

        let wire: StatusWire = Self::decode(response).await?;
        if wire.success == Some(false) {
            return Err(TmdbError::Rejected(
                wire.status_message
                    .unwrap_or_else(|| "rating was not accepted".to_string()),
            ));
        }
        Ok(())
    }

    /// Movies rated under a guest session, most recent first.
    pub async fn guest_rated_movies(
        &self,
        guest_session_id: &str,
    ) -> Result<Vec<RatedMovie>, TmdbError> {
        let wire: RatedPageWire = self
            .get_json(
                &format!("/guest_session/{guest_session_id}/rated/movies"),
                &[
                    ("language", self.language.clone()),
                    ("sort_by", "created_at.desc".to_string()),
                ],
            )
            .await?;
        Ok(wire.results.into_iter().map(Into::into).collect())
    }

    /// Movies rated by a full account, most recent first.
    pub async fn account_rated_movies(
        &self,
        account_id: u64,
        session_id: &str,
    ) -> Result<Vec<RatedMovie>, TmdbError> {
        let wire: RatedPageWire = self
            .get_json(
                &format!("/account/{account_id}/rated/movies"),
                &[
                    ("language", self.language.clone()),
                    ("session_id", session_id.to_string()),
                    ("sort_by", "created_at.desc".to_string()),
                ],
            )
            .await?;
        Ok(wire.results.into_iter().map(Into::into).collect())
    }

    // --- Catalog listings ----------------------------------------------

    pub async fn popular(&self, page: u32) -> Result<MoviePage, TmdbError> {
        self.movie_list("popular", page).await
    }

    pub async fn top_rated(&self, page: u32) -> Result<MoviePage, TmdbError> {
        self.movie_list("top_rated", page).await
    }

    pub async fn now_playing(
        &self,
        page: u32,
    ) -> Result<MoviePage, TmdbError> {
        self.movie_list("now_playing", page).await
    }

    pub async fn upcoming(&self, page: u32) -> Result<MoviePage, TmdbError> {
        self.movie_list("upcoming", page).await
    }

    async fn movie_list(
        &self,
        kind: &str,
        page: u32,
    ) -> Result<MoviePage, TmdbError> {
        self.get_json(
            &format!("/movie/{kind}"),
            &[
                ("language", self.language.clone()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    pub async fn trending(
        &self,
        window: TrendingWindow,
    ) -> Result<MoviePage, TmdbError> {
        self.get_json(
            &format!("/trending/movie/{}", window.as_str()),
            &[("language", self.language.clone())],
        )
        .await
    }

    pub async fn search(
        &self,
        query: &str,
        page: u32,
    ) -> Result<MoviePage, TmdbError> {
        self.get_json(
            "/search/movie",
            &[
                ("language", self.language.clone()),
                ("query", query.to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    pub async fn discover(
        &self,
        filters: &DiscoverFilters,
    ) -> Result<MoviePage, TmdbError> {
        let mut query = vec![
            ("language", self.language.clone()),
            ("page", filters.page.unwrap_or(1).to_string()),
            ("sort_by", filters.sort_by.as_str().to_string()),
        ];
        if let Some(year) = filters.year {
            query.push(("primary_release_year", year.to_string()));
        }
        if !filters.with_genres.is_empty() {
            let genres = filters
                .with_genres
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(",");
            query.push(("with_genres", genres));
        }
        if let Some(min) = filters.vote_average_gte {
            query.push(("vote_average.gte", min.to_string()));
        }
        if let Some(lang) = &filters.with_original_language {
            query.push(("with_original_language", lang.clone()));
        }

        self.get_json("/discover/movie", &query).await
    }

    /// Genre listing, used by the explore filter dialog.
    pub async fn genres(&self) -> Result<Vec<Genre>, TmdbError> {
        let wire: GenreListWire = self
            .get_json(
                "/genre/movie/list",
                &[("language", self.language.clone())],
            )
            .await?;
        Ok(wire.genres)
    }

    // --- Details --------------------------------------------------------

    /// Movie details with credits, videos and similar titles appended.
    pub async fn movie_details(
        &self,
        movie_id: u64,
    ) -> Result<MovieDetails, TmdbError> {
        let wire: MovieDetailsWire = self
            .get_json(
                &format!("/movie/{movie_id}"),
                &[
                    ("language", self.language.clone()),
                    (
                        "append_to_response",
                        "credits,videos,similar".to_string(),
                    ),
                ],
            )
            .await?;
        Ok(wire.into())
    }

    pub async fn person_details(
        &self,
        person_id: u64,
    ) -> Result<Person, TmdbError> {
        self.get_json(
            &format!("/person/{person_id}"),
            &[("language", self.language.clone())],
        )
        .await
    }

    pub async fn person_movie_credits(
        &self,
        person_id: u64,
    ) -> Result<PersonMovieCredits, TmdbError> {
        self.get_json(
            &format!("/person/{person_id}/movie_credits"),
            &[("language", self.language.clone())],
        )
        .await
    }
}

fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TMDB_EXPIRY_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_parses_tmdb_format() {
        let parsed = parse_expiry("2026-08-26 21:04:37 UTC").unwrap();
        assert_eq!(parsed.timestamp(), 1_787_778_277);
    }

    #[test]
    fn unparseable_expiry_is_none() {
        assert!(parse_expiry("").is_none());
        assert!(parse_expiry("tomorrow").is_none());
    }
}
