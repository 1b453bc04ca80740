//! `TmdbClient` - TMDB API client implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::instrument;
use url::Url;

use super::api::TmdbApi;
use super::error::TmdbApiError;
use super::pacer::RequestPacer;
use super::types::{
    AccountListCategory, MediaMutation, MediaType, TmdbAccount, TmdbAccountStates,
    TmdbConfiguration, TmdbErrorResponse, TmdbGenreList, TmdbMovie, TmdbPage, TmdbRequestToken,
    TmdbSession, TmdbStatusResponse, TmdbTvShow,
};

/// Default base URL for TMDB API v3.
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3/";

/// Default response language.
const DEFAULT_LANGUAGE: &str = "en-US";

/// TMDB API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// Bearer API token.
    api_token: String,
    /// Response language for localized endpoints.
    language: String,
    /// Request pacer shared by concurrent calls.
    pacer: Arc<Mutex<RequestPacer>>,
}

/// Builder for `TmdbClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbClientBuilder {
    base_url: Option<Url>,
    api_token: Option<String>,
    user_agent: Option<String>,
    language: Option<String>,
    min_interval: Option<Duration>,
}

impl TmdbClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_token: None,
            user_agent: None,
            language: None,
            min_interval: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API bearer token (required).
    #[must_use]
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Sets the User-Agent (required).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the response language (default: "en-US").
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets the minimum request interval (default: 25ms).
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = Some(interval);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - `api_token` is not set.
    /// - `user_agent` is not set.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TmdbClient> {
        let api_token = self.api_token.context("api_token is required")?;
        let user_agent = self.user_agent.context("user_agent is required")?;

        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL).context("invalid default base URL")?,
        };

        let pacer = self
            .min_interval
            .map_or_else(RequestPacer::default_interval, RequestPacer::new);

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        Ok(TmdbClient {
            http_client,
            base_url,
            api_token,
            language: self
                .language
                .unwrap_or_else(|| String::from(DEFAULT_LANGUAGE)),
            pacer: Arc::new(Mutex::new(pacer)),
        })
    }
}

impl TmdbClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TmdbClientBuilder {
        TmdbClientBuilder::new()
    }

    /// Resolves an endpoint path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))
    }

    /// Sends a GET request with Bearer auth and query params.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let request = self
            .http_client
            .get(url)
            .bearer_auth(&self.api_token)
            .query(query);
        self.execute(request, path).await
    }

    /// Sends a POST request with Bearer auth, query params and a JSON body.
    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized + Sync>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let request = self
            .http_client
            .post(url)
            .bearer_auth(&self.api_token)
            .query(query)
            .json(body);
        self.execute(request, path).await
    }

    /// Paces, sends, and decodes a request.
    ///
    /// Non-2xx responses become a [`TmdbApiError`]. There is no retry;
    /// a failed request is reported to the caller as is.
    #[instrument(skip_all, fields(path = %path))]
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> Result<T> {
        self.pacer.lock().await.wait().await;

        let request = request
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(method = %request.method(), "TMDB API request");

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            let error = match serde_json::from_str::<TmdbErrorResponse>(&body) {
                Ok(error_response) => TmdbApiError {
                    status: status.as_u16(),
                    code: Some(error_response.status_code),
                    message: error_response.status_message,
                },
                Err(_) => TmdbApiError {
                    status: status.as_u16(),
                    code: None,
                    message: body,
                },
            };
            tracing::debug!(status = error.status, code = ?error.code, "TMDB API error response");
            return Err(error.into());
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;
        let raw_result: std::result::Result<T, _> = serde_json::from_str(&body);
        let parsed =
            raw_result.with_context(|| format!("failed to decode JSON response: {path}"))?;
        Ok(parsed)
    }

    /// Query params for session-scoped list endpoints.
    fn session_page_query(&self, session_id: &str, page: u32) -> Vec<(&'static str, String)> {
        vec![
            ("session_id", String::from(session_id)),
            ("language", self.language.clone()),
            ("page", page.to_string()),
        ]
    }

    /// Shared body of the favorite/watchlist mutations.
    async fn mutate_account_list(
        &self,
        list: &str,
        account_id: u64,
        session_id: &str,
        mutation: &MediaMutation,
    ) -> Result<TmdbStatusResponse> {
        let path = format!("account/{account_id}/{list}");
        let query = [("session_id", String::from(session_id))];
        let body = json!({
            "media_type": mutation.media_type,
            "media_id": mutation.media_id,
            list: mutation.value,
        });
        self.post_json(&path, &query, &body).await
    }
}

impl TmdbApi for TmdbClient {
    #[instrument(skip_all)]
    async fn create_request_token(&self) -> Result<TmdbRequestToken> {
        self.get_json("authentication/token/new", &[]).await
    }

    #[instrument(skip_all)]
    async fn validate_request_token(
        &self,
        username: &str,
        password: &str,
        request_token: &str,
    ) -> Result<TmdbRequestToken> {
        let body = json!({
            "username": username,
            "password": password,
            "request_token": request_token,
        });
        self.post_json("authentication/token/validate_with_login", &[], &body)
            .await
    }

    #[instrument(skip_all)]
    async fn create_session(&self, request_token: &str) -> Result<TmdbSession> {
        let body = json!({ "request_token": request_token });
        self.post_json("authentication/session/new", &[], &body)
            .await
    }

    #[instrument(skip_all)]
    async fn account_details(&self, session_id: &str) -> Result<TmdbAccount> {
        let query = [("session_id", String::from(session_id))];
        self.get_json("account", &query).await
    }

    #[instrument(skip_all, fields(account_id = account_id, category = %category, page = page))]
    async fn account_movies(
        &self,
        account_id: u64,
        session_id: &str,
        category: AccountListCategory,
        page: u32,
    ) -> Result<TmdbPage<TmdbMovie>> {
        let path = format!(
            "account/{account_id}/{}/{}",
            category.as_path(),
            MediaType::Movie.list_path()
        );
        let query = self.session_page_query(session_id, page);
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all, fields(account_id = account_id, category = %category, page = page))]
    async fn account_tv(
        &self,
        account_id: u64,
        session_id: &str,
        category: AccountListCategory,
        page: u32,
    ) -> Result<TmdbPage<TmdbTvShow>> {
        let path = format!(
            "account/{account_id}/{}/{}",
            category.as_path(),
            MediaType::Tv.list_path()
        );
        let query = self.session_page_query(session_id, page);
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all)]
    async fn mark_as_favorite(
        &self,
        account_id: u64,
        session_id: &str,
        mutation: &MediaMutation,
    ) -> Result<TmdbStatusResponse> {
        self.mutate_account_list("favorite", account_id, session_id, mutation)
            .await
    }

    #[instrument(skip_all)]
    async fn add_to_watchlist(
        &self,
        account_id: u64,
        session_id: &str,
        mutation: &MediaMutation,
    ) -> Result<TmdbStatusResponse> {
        self.mutate_account_list("watchlist", account_id, session_id, mutation)
            .await
    }

    #[instrument(skip_all)]
    async fn configuration(&self) -> Result<TmdbConfiguration> {
        self.get_json("configuration", &[]).await
    }

    #[instrument(skip_all)]
    async fn movie_genres(&self) -> Result<TmdbGenreList> {
        let query = [("language", self.language.clone())];
        self.get_json("genre/movie/list", &query).await
    }

    #[instrument(skip_all)]
    async fn tv_genres(&self) -> Result<TmdbGenreList> {
        let query = [("language", self.language.clone())];
        self.get_json("genre/tv/list", &query).await
    }

    #[instrument(skip_all, fields(page = page))]
    async fn now_playing_movies(&self, page: u32) -> Result<TmdbPage<TmdbMovie>> {
        let query = [
            ("language", self.language.clone()),
            ("page", page.to_string()),
        ];
        self.get_json("movie/now_playing", &query).await
    }

    #[instrument(skip_all, fields(page = page))]
    async fn popular_tv(&self, page: u32) -> Result<TmdbPage<TmdbTvShow>> {
        let query = [
            ("language", self.language.clone()),
            ("page", page.to_string()),
        ];
        self.get_json("tv/popular", &query).await
    }

    #[instrument(skip_all, fields(movie_id = movie_id))]
    async fn movie_account_states(
        &self,
        movie_id: u64,
        session_id: &str,
    ) -> Result<TmdbAccountStates> {
        let path = format!("movie/{movie_id}/account_states");
        let query = [("session_id", String::from(session_id))];
        self.get_json(&path, &query).await
    }

    #[instrument(skip_all, fields(series_id = series_id))]
    async fn tv_account_states(
        &self,
        series_id: u64,
        session_id: &str,
    ) -> Result<TmdbAccountStates> {
        let path = format!("tv/{series_id}/account_states");
        let query = [("session_id", String::from(session_id))];
        self.get_json(&path, &query).await
    }
}
