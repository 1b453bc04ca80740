//! TMDB API response types, list selectors and mutation bodies.

use std::fmt;

use serde::{Deserialize, Serialize};

// --- Pagination ---

/// A page of results from any paginated list endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    /// Current page number (1-based).
    pub page: u32,
    /// Results on this page.
    pub results: Vec<T>,
    /// Total number of pages.
    pub total_pages: u32,
    /// Total number of results across all pages.
    pub total_results: u32,
}

// --- Media ---

/// A movie as returned by list endpoints (account lists, `movie/now_playing`).
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original title.
    #[serde(default)]
    pub original_title: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Release date (YYYY-MM-DD or null).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Backdrop image path, relative to the image base URL.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Poster image path, relative to the image base URL.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// The account's own rating; only present on `rated` lists.
    #[serde(default)]
    pub rating: Option<f64>,
}

/// A TV show as returned by list endpoints (account lists, `tv/popular`).
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTvShow {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original name.
    #[serde(default)]
    pub original_name: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// First air date (YYYY-MM-DD or null).
    #[serde(default)]
    pub first_air_date: Option<String>,
    /// Origin countries (ISO 3166-1).
    #[serde(default)]
    pub origin_country: Vec<String>,
    /// Genre IDs.
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    /// Backdrop image path, relative to the image base URL.
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Poster image path, relative to the image base URL.
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Vote count.
    #[serde(default)]
    pub vote_count: u32,
    /// Popularity score.
    #[serde(default)]
    pub popularity: f64,
    /// The account's own rating; only present on `rated` lists.
    #[serde(default)]
    pub rating: Option<f64>,
}

// --- Account ---

/// Response from the `account` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbAccount {
    /// TMDB account ID.
    pub id: u64,
    /// Display name (may be empty).
    #[serde(default)]
    pub name: Option<String>,
    /// Login name.
    pub username: String,
    /// Whether adult content is enabled.
    #[serde(default)]
    pub include_adult: bool,
    /// Preferred language (ISO 639-1).
    #[serde(default)]
    pub iso_639_1: Option<String>,
    /// Preferred country (ISO 3166-1).
    #[serde(default)]
    pub iso_3166_1: Option<String>,
    /// Avatar references.
    #[serde(default)]
    pub avatar: TmdbAvatar,
}

/// Avatar references attached to an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbAvatar {
    /// Gravatar reference.
    #[serde(default)]
    pub gravatar: Option<TmdbGravatar>,
    /// Avatar uploaded to TMDB.
    #[serde(default)]
    pub tmdb: Option<TmdbTmdbAvatar>,
}

/// Gravatar reference.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGravatar {
    /// MD5 hash of the account e-mail.
    #[serde(default)]
    pub hash: Option<String>,
}

/// Avatar image hosted by TMDB.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbTmdbAvatar {
    /// Image path, relative to the image base URL.
    #[serde(default)]
    pub avatar_path: Option<String>,
}

/// Per-item state of a movie or show for the signed-in account.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbAccountStates {
    /// TMDB media ID.
    pub id: u64,
    /// Marked as favorite.
    pub favorite: bool,
    /// On the watchlist.
    pub watchlist: bool,
    /// Rating given by the account.
    pub rated: TmdbRated,
}

/// The `rated` field is either `false` or `{"value": <rating>}`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TmdbRated {
    /// Rated with the given value.
    Value {
        /// Rating value (0.5-10.0).
        value: f64,
    },
    /// Not rated (`false`).
    NotRated(bool),
}

impl TmdbRated {
    /// Returns the rating value, if any.
    #[must_use]
    pub const fn value(&self) -> Option<f64> {
        match *self {
            Self::Value { value } => Some(value),
            Self::NotRated(_) => None,
        }
    }
}

// --- List selectors ---

/// Account list category (`account/{id}/{category}/...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountListCategory {
    /// Favorites.
    Favorite,
    /// Watchlist.
    Watchlist,
    /// Rated items.
    Rated,
}

impl AccountListCategory {
    /// Path segment used in the account list URL.
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::Watchlist => "watchlist",
            Self::Rated => "rated",
        }
    }
}

impl fmt::Display for AccountListCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// Media kind accepted by mutation endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Movie.
    Movie,
    /// TV show.
    Tv,
}

impl MediaType {
    /// Path segment used by account list URLs (`movies` / `tv`).
    #[must_use]
    pub const fn list_path(self) -> &'static str {
        match self {
            Self::Movie => "movies",
            Self::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => f.write_str("movie"),
            Self::Tv => f.write_str("tv"),
        }
    }
}

// --- Mutations ---

/// Favorite or watchlist change for a single media item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaMutation {
    /// Kind of the target item.
    pub media_type: MediaType,
    /// TMDB ID of the target item.
    pub media_id: u64,
    /// `true` to add, `false` to remove.
    pub value: bool,
}

impl MediaMutation {
    /// Creates a mutation that adds the item.
    #[must_use]
    pub const fn add(media_type: MediaType, media_id: u64) -> Self {
        Self {
            media_type,
            media_id,
            value: true,
        }
    }

    /// Creates a mutation that removes the item.
    #[must_use]
    pub const fn remove(media_type: MediaType, media_id: u64) -> Self {
        Self {
            media_type,
            media_id,
            value: false,
        }
    }
}

/// Status body returned by mutation endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbStatusResponse {
    /// TMDB status code (1 = created, 12 = updated, 13 = deleted).
    pub status_code: u32,
    /// Status message.
    pub status_message: String,
    /// Success flag.
    #[serde(default)]
    pub success: Option<bool>,
}

// --- Configuration ---

/// Response from the `configuration` endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbConfiguration {
    /// Image configuration.
    pub images: TmdbImagesConfiguration,
    /// Keys tracked by the change feed.
    #[serde(default)]
    pub change_keys: Vec<String>,
}

/// Image base URLs and advertised sizes.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbImagesConfiguration {
    /// Plain HTTP base URL.
    pub base_url: String,
    /// HTTPS base URL.
    pub secure_base_url: String,
    /// Available backdrop sizes (e.g. `w780`).
    #[serde(default)]
    pub backdrop_sizes: Vec<String>,
    /// Available poster sizes (e.g. `w500`).
    #[serde(default)]
    pub poster_sizes: Vec<String>,
    /// Available logo sizes.
    #[serde(default)]
    pub logo_sizes: Vec<String>,
    /// Available profile sizes.
    #[serde(default)]
    pub profile_sizes: Vec<String>,
    /// Available still sizes.
    #[serde(default)]
    pub still_sizes: Vec<String>,
}

/// Response from `genre/movie/list` and `genre/tv/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    /// Genres.
    pub genres: Vec<TmdbGenre>,
}

/// Genre entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    /// Genre ID.
    pub id: u32,
    /// Genre name.
    pub name: String,
}

// --- Authentication ---

/// Response from `authentication/token/new` and `.../validate_with_login`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbRequestToken {
    /// Success flag.
    pub success: bool,
    /// Expiry timestamp (`YYYY-MM-DD HH:MM:SS UTC`).
    pub expires_at: String,
    /// The request token.
    pub request_token: String,
}

/// Response from `authentication/session/new`.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSession {
    /// Success flag.
    pub success: bool,
    /// The new session ID.
    pub session_id: String,
}

// --- Error Response ---

/// TMDB API error response body.
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    #[allow(dead_code)]
    #[serde(default)]
    pub success: bool,
}
