//! Domain records held in state.
//!
//! Media records here are always decorated: image paths are absolute URLs
//! and genre names are resolved. They can only be built from raw API
//! records through [`crate::decorate`], which keeps decoration to exactly
//! one pass per fetch.

use std::collections::HashMap;

use cinedeck_api::tmdb::{
    TmdbAccount, TmdbAccountStates, TmdbConfiguration, TmdbGenreList, TmdbImagesConfiguration,
};

/// Gravatar URL template; `{hash}` is replaced with the account hash.
const GRAVATAR_URL: &str = "https://www.gravatar.com/avatar/{hash}.jpg?s=200";

/// Preferred backdrop size.
const BACKDROP_SIZE: &str = "w780";

/// Preferred poster size.
const POSTER_SIZE: &str = "w500";

/// Size used when the preferred one is not advertised.
const FALLBACK_SIZE: &str = "original";

/// Authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque session token.
    pub session_id: String,
}

impl Session {
    /// Wraps an existing session ID.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

/// Signed-in account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// TMDB account ID.
    pub id: u64,
    /// Login name.
    pub username: String,
    /// Display name, if set.
    pub name: Option<String>,
    /// Avatar image URL derived from the gravatar hash.
    pub avatar_url: Option<String>,
}

impl Account {
    /// Builds an account from the API record, deriving `avatar_url`.
    #[must_use]
    pub fn from_api(raw: TmdbAccount) -> Self {
        let avatar_url = raw
            .avatar
            .gravatar
            .and_then(|g| g.hash)
            .filter(|hash| !hash.is_empty())
            .map(|hash| GRAVATAR_URL.replace("{hash}", &hash));

        Self {
            id: raw.id,
            username: raw.username,
            name: raw.name.filter(|n| !n.is_empty()),
            avatar_url,
        }
    }
}

/// A decorated movie.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Overview text.
    pub overview: Option<String>,
    /// Release date.
    pub release_date: Option<String>,
    /// Genre IDs.
    pub genre_ids: Vec<u32>,
    /// Genre names resolved from the configuration.
    pub genre_names: Vec<String>,
    /// Absolute backdrop URL.
    pub backdrop_path: Option<String>,
    /// Absolute poster URL.
    pub poster_path: Option<String>,
    /// Vote average.
    pub vote_average: f64,
    /// The account's own rating (rated lists only).
    pub rating: Option<f64>,
}

/// A decorated TV show.
#[derive(Debug, Clone, PartialEq)]
pub struct TvShow {
    /// TMDB series ID.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Overview text.
    pub overview: Option<String>,
    /// First air date.
    pub first_air_date: Option<String>,
    /// Genre IDs.
    pub genre_ids: Vec<u32>,
    /// Genre names resolved from the configuration.
    pub genre_names: Vec<String>,
    /// Absolute backdrop URL.
    pub backdrop_path: Option<String>,
    /// Absolute poster URL.
    pub poster_path: Option<String>,
    /// Vote average.
    pub vote_average: f64,
    /// The account's own rating (rated lists only).
    pub rating: Option<f64>,
}

/// Favorite/watchlist/rating state of one media item for the account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccountStates {
    /// Marked as favorite.
    pub favorite: bool,
    /// On the watchlist.
    pub watchlist: bool,
    /// Account rating, if rated.
    pub rating: Option<f64>,
}

impl From<TmdbAccountStates> for AccountStates {
    fn from(raw: TmdbAccountStates) -> Self {
        Self {
            favorite: raw.favorite,
            watchlist: raw.watchlist,
            rating: raw.rated.value(),
        }
    }
}

/// Totals across movies and TV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaCount {
    /// Items on the watchlist.
    pub watchlist: u32,
    /// Items marked favorite.
    pub favorites: u32,
    /// Items rated.
    pub ratings: u32,
}

/// Image base URLs and genre maps, loaded once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    /// Base URL prepended to backdrop paths.
    pub backdrop_base_url: String,
    /// Base URL prepended to poster paths.
    pub poster_base_url: String,
    /// Movie genre ID to name.
    pub movie_genres: HashMap<u32, String>,
    /// TV genre ID to name.
    pub tv_genres: HashMap<u32, String>,
}

impl Configuration {
    /// Builds the configuration from the `configuration` and genre list
    /// responses.
    #[must_use]
    pub fn from_api(
        config: &TmdbConfiguration,
        movie_genres: TmdbGenreList,
        tv_genres: TmdbGenreList,
    ) -> Self {
        let images = &config.images;
        Self {
            backdrop_base_url: sized_base_url(images, &images.backdrop_sizes, BACKDROP_SIZE),
            poster_base_url: sized_base_url(images, &images.poster_sizes, POSTER_SIZE),
            movie_genres: genre_map(movie_genres),
            tv_genres: genre_map(tv_genres),
        }
    }
}

/// `secure_base_url` + preferred size, or the fallback size when the
/// preferred one is not advertised.
fn sized_base_url(images: &TmdbImagesConfiguration, sizes: &[String], preferred: &str) -> String {
    let size = if sizes.iter().any(|s| s == preferred) {
        preferred
    } else {
        FALLBACK_SIZE
    };
    format!("{}{size}", images.secure_base_url)
}

fn genre_map(list: TmdbGenreList) -> HashMap<u32, String> {
    list.genres.into_iter().map(|g| (g.id, g.name)).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use cinedeck_api::tmdb::{TmdbAvatar, TmdbGenre, TmdbGravatar};

    use super::*;

    fn images(backdrop_sizes: &[&str], poster_sizes: &[&str]) -> TmdbConfiguration {
        TmdbConfiguration {
            images: TmdbImagesConfiguration {
                base_url: String::from("http://image.tmdb.org/t/p/"),
                secure_base_url: String::from("https://image.tmdb.org/t/p/"),
                backdrop_sizes: backdrop_sizes.iter().map(|s| String::from(*s)).collect(),
                poster_sizes: poster_sizes.iter().map(|s| String::from(*s)).collect(),
                logo_sizes: Vec::new(),
                profile_sizes: Vec::new(),
                still_sizes: Vec::new(),
            },
            change_keys: Vec::new(),
        }
    }

    fn genres(pairs: &[(u32, &str)]) -> TmdbGenreList {
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

    #[test]
    fn test_configuration_uses_preferred_sizes() {
        // Arrange
        let config = images(&["w300", "w780", "original"], &["w185", "w500", "original"]);

        // Act
        let result = Configuration::from_api(
            &config,
            genres(&[(28, "Action")]),
            genres(&[(10759, "Action & Adventure")]),
        );

        // Assert
        assert_eq!(result.backdrop_base_url, "https://image.tmdb.org/t/p/w780");
        assert_eq!(result.poster_base_url, "https://image.tmdb.org/t/p/w500");
        assert_eq!(result.movie_genres.get(&28).unwrap(), "Action");
        assert_eq!(result.tv_genres.get(&10759).unwrap(), "Action & Adventure");
    }

    #[test]
    fn test_configuration_falls_back_to_original() {
        // Arrange
        let config = images(&["w300"], &[]);

        // Act
        let result = Configuration::from_api(&config, genres(&[]), genres(&[]));

        // Assert
        assert_eq!(
            result.backdrop_base_url,
            "https://image.tmdb.org/t/p/original"
        );
        assert_eq!(result.poster_base_url, "https://image.tmdb.org/t/p/original");
    }

    #[test]
    fn test_account_avatar_from_gravatar_hash() {
        // Arrange
        let raw = TmdbAccount {
            id: 548,
            name: Some(String::new()),
            username: String::from("travisbell"),
            include_adult: false,
            iso_639_1: None,
            iso_3166_1: None,
            avatar: TmdbAvatar {
                gravatar: Some(TmdbGravatar {
                    hash: Some(String::from("abc123")),
                }),
                tmdb: None,
            },
        };

        // Act
        let account = Account::from_api(raw);

        // Assert
        assert_eq!(
            account.avatar_url.as_deref(),
            Some("https://www.gravatar.com/avatar/abc123.jpg?s=200")
        );
        assert_eq!(account.name, None);
    }

    #[test]
    fn test_account_without_hash_has_no_avatar() {
        // Arrange
        let raw = TmdbAccount {
            id: 1,
            name: Some(String::from("Someone")),
            username: String::from("someone"),
            include_adult: false,
            iso_639_1: None,
            iso_3166_1: None,
            avatar: TmdbAvatar::default(),
        };

        // Act
        let account = Account::from_api(raw);

        // Assert
        assert!(account.avatar_url.is_none());
        assert_eq!(account.name.as_deref(), Some("Someone"));
    }
}
