//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB API v3 endpoints for authentication,
//! account lists, favorite/watchlist mutations, image configuration,
//! genre lists and catalog pages.

mod api;
mod client;
mod error;
mod pacer;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
#[allow(clippy::module_name_repetitions)]
pub use error::TmdbApiError;
#[allow(clippy::module_name_repetitions)]
pub use types::{
    AccountListCategory, MediaMutation, MediaType, TmdbAccount, TmdbAccountStates, TmdbAvatar,
    TmdbConfiguration, TmdbGenre, TmdbGenreList, TmdbGravatar, TmdbImagesConfiguration, TmdbMovie,
    TmdbPage, TmdbRated, TmdbRequestToken, TmdbSession, TmdbStatusResponse, TmdbTmdbAvatar,
    TmdbTvShow,
};
