//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;

use super::types::{
    AccountListCategory, MediaMutation, TmdbAccount, TmdbAccountStates, TmdbConfiguration,
    TmdbGenreList, TmdbMovie, TmdbPage, TmdbRequestToken, TmdbSession, TmdbStatusResponse,
    TmdbTvShow,
};

/// TMDB API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Creates a new, unvalidated request token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn create_request_token(&self) -> Result<TmdbRequestToken>;

    /// Validates a request token with a username and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected, or the HTTP request
    /// or JSON parsing fails.
    async fn validate_request_token(
        &self,
        username: &str,
        password: &str,
        request_token: &str,
    ) -> Result<TmdbRequestToken>;

    /// Exchanges a validated request token for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn create_session(&self, request_token: &str) -> Result<TmdbSession>;

    /// Fetches the account bound to a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn account_details(&self, session_id: &str) -> Result<TmdbAccount>;

    /// Fetches one page of an account's movie list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn account_movies(
        &self,
        account_id: u64,
        session_id: &str,
        category: AccountListCategory,
        page: u32,
    ) -> Result<TmdbPage<TmdbMovie>>;

    /// Fetches one page of an account's TV list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn account_tv(
        &self,
        account_id: u64,
        session_id: &str,
        category: AccountListCategory,
        page: u32,
    ) -> Result<TmdbPage<TmdbTvShow>>;

    /// Adds or removes an item from the account's favorites.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn mark_as_favorite(
        &self,
        account_id: u64,
        session_id: &str,
        mutation: &MediaMutation,
    ) -> Result<TmdbStatusResponse>;

    /// Adds or removes an item from the account's watchlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn add_to_watchlist(
        &self,
        account_id: u64,
        session_id: &str,
        mutation: &MediaMutation,
    ) -> Result<TmdbStatusResponse>;

    /// Fetches the image configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn configuration(&self) -> Result<TmdbConfiguration>;

    /// Fetches the movie genre list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_genres(&self) -> Result<TmdbGenreList>;

    /// Fetches the TV genre list.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_genres(&self) -> Result<TmdbGenreList>;

    /// Fetches one page of movies now playing in theatres.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn now_playing_movies(&self, page: u32) -> Result<TmdbPage<TmdbMovie>>;

    /// Fetches one page of popular TV shows.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn popular_tv(&self, page: u32) -> Result<TmdbPage<TmdbTvShow>>;

    /// Fetches the account's favorite/watchlist/rated state for a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn movie_account_states(
        &self,
        movie_id: u64,
        session_id: &str,
    ) -> Result<TmdbAccountStates>;

    /// Fetches the account's favorite/watchlist/rated state for a TV show.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails.
    async fn tv_account_states(&self, series_id: u64, session_id: &str)
    -> Result<TmdbAccountStates>;
}
