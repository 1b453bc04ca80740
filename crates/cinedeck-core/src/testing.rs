//! Shared test fixtures and an in-memory `TmdbApi`.
#![allow(clippy::unwrap_used)]
#![allow(clippy::arithmetic_side_effects)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::Result;
use cinedeck_api::tmdb::{
    AccountListCategory, MediaMutation, TmdbAccount, TmdbAccountStates, TmdbApi, TmdbApiError,
    TmdbAvatar, TmdbConfiguration, TmdbGenre, TmdbGenreList, TmdbGravatar,
    TmdbImagesConfiguration, TmdbMovie, TmdbPage, TmdbRated, TmdbRequestToken, TmdbSession,
    TmdbStatusResponse, TmdbTvShow,
};

use crate::intent::Event;
use crate::model::{Account, Configuration, Session};
use crate::state::AppState;

/// Account ID returned by the first `account_details` call.
pub const ACCOUNT_ID: u64 = 548;

/// Session ID used by [`signed_in_state`].
pub const SESSION_ID: &str = "79191836ddaa0da3df76a5ffef6f07ad6ab0c641";

pub fn raw_movie(id: u64, genre_ids: &[u32]) -> TmdbMovie {
    TmdbMovie {
        id,
        title: format!("Movie {id}"),
        original_title: None,
        overview: None,
        release_date: Some(String::from("1999-10-15")),
        genre_ids: genre_ids.to_vec(),
        backdrop_path: Some(String::from("/x.jpg")),
        poster_path: Some(String::from("/y.jpg")),
        vote_average: 7.0,
        vote_count: 100,
        popularity: 1.0,
        rating: None,
    }
}

pub fn raw_show(id: u64, genre_ids: &[u32]) -> TmdbTvShow {
    TmdbTvShow {
        id,
        name: format!("Show {id}"),
        original_name: None,
        overview: None,
        first_air_date: Some(String::from("2008-01-20")),
        origin_country: vec![String::from("US")],
        genre_ids: genre_ids.to_vec(),
        backdrop_path: Some(String::from("/x.jpg")),
        poster_path: Some(String::from("/y.jpg")),
        vote_average: 8.0,
        vote_count: 100,
        popularity: 1.0,
        rating: None,
    }
}

pub fn sample_configuration() -> Configuration {
    Configuration {
        backdrop_base_url: String::from("https://img/"),
        poster_base_url: String::from("https://img/p/"),
        movie_genres: HashMap::from([(28, String::from("Action"))]),
        tv_genres: HashMap::from([(18, String::from("Drama"))]),
    }
}

/// Signed in, account and configuration loaded.
pub fn signed_in_state() -> AppState {
    let mut state = AppState::default();
    state.apply(&Event::SessionCreated(Session::new(SESSION_ID)));
    state.apply(&Event::ConfigurationLoaded(sample_configuration()));
    state.apply(&Event::AccountDetailLoaded(Account {
        id: ACCOUNT_ID,
        username: String::from("travisbell"),
        name: None,
        avatar_url: None,
    }));
    state
}

/// A page whose only interesting field is `total_results`.
pub fn movie_total(total_results: u32) -> TmdbPage<TmdbMovie> {
    TmdbPage {
        page: 1,
        results: Vec::new(),
        total_pages: 1,
        total_results,
    }
}

pub fn show_total(total_results: u32) -> TmdbPage<TmdbTvShow> {
    TmdbPage {
        page: 1,
        results: Vec::new(),
        total_pages: 1,
        total_results,
    }
}

/// A rated page carrying one movie per rating.
pub fn rated_movies(page: u32, total_pages: u32, ratings: &[f64]) -> TmdbPage<TmdbMovie> {
    let results = ratings
        .iter()
        .zip(1_u64..)
        .map(|(rating, n)| {
            let mut movie = raw_movie(u64::from(page) * 100 + n, &[28]);
            movie.rating = Some(*rating);
            movie
        })
        .collect();
    TmdbPage {
        page,
        results,
        total_pages,
        total_results: 0,
    }
}

/// A rated page carrying one show per rating.
pub fn rated_shows(page: u32, total_pages: u32, ratings: &[f64]) -> TmdbPage<TmdbTvShow> {
    let results = ratings
        .iter()
        .zip(1_u64..)
        .map(|(rating, n)| {
            let mut show = raw_show(u64::from(page) * 100 + n, &[18]);
            show.rating = Some(*rating);
            show
        })
        .collect();
    TmdbPage {
        page,
        results,
        total_pages,
        total_results: 0,
    }
}

/// In-memory API.
///
/// Every call is recorded as `name` or `name:detail`. A call fails with a
/// 500 when either form is listed in `failing`.
#[derive(Debug, Default)]
pub struct FakeApi {
    pub movie_pages: HashMap<(AccountListCategory, u32), TmdbPage<TmdbMovie>>,
    pub tv_pages: HashMap<(AccountListCategory, u32), TmdbPage<TmdbTvShow>>,
    pub now_playing: HashMap<u32, TmdbPage<TmdbMovie>>,
    pub popular: HashMap<u32, TmdbPage<TmdbTvShow>>,
    pub failing: HashSet<String>,
    /// Delay applied to successive `account_details` calls.
    pub account_delays: Mutex<VecDeque<Duration>>,
    /// `expires_at` of created request tokens.
    pub token_expires_at: Option<String>,
    calls: Mutex<Vec<String>>,
    account_calls: AtomicU64,
}

impl FakeApi {
    pub fn failing(mut self, call: &str) -> Self {
        self.failing.insert(String::from(call));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.as_str() == name || c.starts_with(&format!("{name}:")))
            .count()
    }

    fn record(&self, name: &str, detail: Option<String>) -> Result<()> {
        let call = detail.map_or_else(|| String::from(name), |d| format!("{name}:{d}"));
        self.calls.lock().unwrap().push(call.clone());
        if self.failing.contains(name) || self.failing.contains(&call) {
            return Err(anyhow::Error::new(TmdbApiError {
                status: 500,
                code: None,
                message: format!("{call} failed"),
            }));
        }
        Ok(())
    }
}

fn empty_page<T>(page: u32) -> TmdbPage<T> {
    TmdbPage {
        page,
        results: Vec::new(),
        total_pages: 1,
        total_results: 0,
    }
}

fn states(id: u64) -> TmdbAccountStates {
    TmdbAccountStates {
        id,
        favorite: true,
        watchlist: false,
        rated: TmdbRated::Value { value: 8.5 },
    }
}

fn genre_list(pairs: &[(u32, &str)]) -> TmdbGenreList {
    TmdbGenreList {
        genres: pairs
            .iter()
            .map(|(id, name)| TmdbGenre {
                id: *id,
                name: String::from(*name),
            })
            .collect(),
    }
}

impl TmdbApi for FakeApi {
    async fn create_request_token(&self) -> Result<TmdbRequestToken> {
        self.record("create_request_token", None)?;
        Ok(TmdbRequestToken {
            success: true,
            expires_at: self
                .token_expires_at
                .clone()
                .unwrap_or_else(|| String::from("2099-01-01 00:00:00 UTC")),
            request_token: String::from("token-1"),
        })
    }

    async fn validate_request_token(
        &self,
        username: &str,
        _password: &str,
        request_token: &str,
    ) -> Result<TmdbRequestToken> {
        self.record(
            "validate_request_token",
            Some(format!("{username}:{request_token}")),
        )?;
        Ok(TmdbRequestToken {
            success: true,
            expires_at: String::from("2099-01-01 00:00:00 UTC"),
            request_token: String::from(request_token),
        })
    }

    async fn create_session(&self, request_token: &str) -> Result<TmdbSession> {
        self.record("create_session", Some(String::from(request_token)))?;
        Ok(TmdbSession {
            success: true,
            session_id: String::from(SESSION_ID),
        })
    }

    async fn account_details(&self, session_id: &str) -> Result<TmdbAccount> {
        let n = self.account_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.account_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.record("account_details", Some(String::from(session_id)))?;
        Ok(TmdbAccount {
            id: ACCOUNT_ID + n,
            name: Some(String::new()),
            username: String::from("travisbell"),
            include_adult: false,
            iso_639_1: Some(String::from("en")),
            iso_3166_1: Some(String::from("US")),
            avatar: TmdbAvatar {
                gravatar: Some(TmdbGravatar {
                    hash: Some(String::from("c9e9fc152ee756a900db85757c29815d")),
                }),
                tmdb: None,
            },
        })
    }

    async fn account_movies(
        &self,
        account_id: u64,
        _session_id: &str,
        category: AccountListCategory,
        page: u32,
    ) -> Result<TmdbPage<TmdbMovie>> {
        self.record(
            "account_movies",
            Some(format!("{account_id}:{category}:{page}")),
        )?;
        Ok(self
            .movie_pages
            .get(&(category, page))
            .cloned()
            .unwrap_or_else(|| empty_page(page)))
    }

    async fn account_tv(
        &self,
        account_id: u64,
        _session_id: &str,
        category: AccountListCategory,
        page: u32,
    ) -> Result<TmdbPage<TmdbTvShow>> {
        self.record("account_tv", Some(format!("{account_id}:{category}:{page}")))?;
        Ok(self
            .tv_pages
            .get(&(category, page))
            .cloned()
            .unwrap_or_else(|| empty_page(page)))
    }

    async fn mark_as_favorite(
        &self,
        _account_id: u64,
        _session_id: &str,
        mutation: &MediaMutation,
    ) -> Result<TmdbStatusResponse> {
        self.record(
            "mark_as_favorite",
            Some(format!(
                "{}:{}:{}",
                mutation.media_type, mutation.media_id, mutation.value
            )),
        )?;
        Ok(TmdbStatusResponse {
            status_code: 1,
            status_message: String::from("Success."),
            success: Some(true),
        })
    }

    async fn add_to_watchlist(
        &self,
        _account_id: u64,
        _session_id: &str,
        mutation: &MediaMutation,
    ) -> Result<TmdbStatusResponse> {
        self.record(
            "add_to_watchlist",
            Some(format!(
                "{}:{}:{}",
                mutation.media_type, mutation.media_id, mutation.value
            )),
        )?;
        Ok(TmdbStatusResponse {
            status_code: 1,
            status_message: String::from("Success."),
            success: Some(true),
        })
    }

    async fn configuration(&self) -> Result<TmdbConfiguration> {
        self.record("configuration", None)?;
        Ok(TmdbConfiguration {
            images: TmdbImagesConfiguration {
                base_url: String::from("http://image.tmdb.org/t/p/"),
                secure_base_url: String::from("https://image.tmdb.org/t/p/"),
                backdrop_sizes: vec![String::from("w780"), String::from("original")],
                poster_sizes: vec![String::from("w500"), String::from("original")],
                logo_sizes: Vec::new(),
                profile_sizes: Vec::new(),
                still_sizes: Vec::new(),
            },
            change_keys: Vec::new(),
        })
    }

    async fn movie_genres(&self) -> Result<TmdbGenreList> {
        self.record("movie_genres", None)?;
        Ok(genre_list(&[(28, "Action"), (18, "Drama")]))
    }

    async fn tv_genres(&self) -> Result<TmdbGenreList> {
        self.record("tv_genres", None)?;
        Ok(genre_list(&[(18, "Drama"), (10759, "Action & Adventure")]))
    }

    async fn now_playing_movies(&self, page: u32) -> Result<TmdbPage<TmdbMovie>> {
        self.record("now_playing_movies", Some(page.to_string()))?;
        Ok(self
            .now_playing
            .get(&page)
            .cloned()
            .unwrap_or_else(|| empty_page(page)))
    }

    async fn popular_tv(&self, page: u32) -> Result<TmdbPage<TmdbTvShow>> {
        self.record("popular_tv", Some(page.to_string()))?;
        Ok(self
            .popular
            .get(&page)
            .cloned()
            .unwrap_or_else(|| empty_page(page)))
    }

    async fn movie_account_states(
        &self,
        movie_id: u64,
        _session_id: &str,
    ) -> Result<TmdbAccountStates> {
        self.record("movie_account_states", Some(movie_id.to_string()))?;
        Ok(states(movie_id))
    }

    async fn tv_account_states(
        &self,
        series_id: u64,
        _session_id: &str,
    ) -> Result<TmdbAccountStates> {
        self.record("tv_account_states", Some(series_id.to_string()))?;
        Ok(states(series_id))
    }
}
