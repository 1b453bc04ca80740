//! Intents, events and handler outcomes.

use std::fmt;

use cinedeck_api::tmdb::{AccountListCategory, MediaMutation, MediaType};

use crate::error::OrchestrationError;
use crate::model::{Account, AccountStates, Configuration, MediaCount, Movie, Session, TvShow};

/// Username and password for the login flow.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// TMDB username.
    pub username: String,
    /// TMDB password.
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Which account list a toggle targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleList {
    /// Favorites.
    Favorite,
    /// Watchlist.
    Watchlist,
}

/// A requested change, emitted by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Sign in and create a session.
    Login(Credentials),
    /// Load image base URLs and genre maps.
    FetchConfiguration,
    /// Load the account bound to the current session.
    FetchAccountDetail,
    /// Load one page of an account list.
    FetchAccountMedia {
        /// Movies or TV.
        media_type: MediaType,
        /// Watchlist, favorite or rated.
        category: AccountListCategory,
        /// 1-based page.
        page: u32,
    },
    /// Average the account's ratings across all pages.
    FetchAverageRating {
        /// Movies or TV.
        media_type: MediaType,
    },
    /// Count watchlist/favorite/rated items across movies and TV.
    FetchMediaCount,
    /// Add or remove an item from the watchlist.
    ToggleWatchlist(MediaMutation),
    /// Add or remove an item from the favorites.
    ToggleFavorite(MediaMutation),
    /// Load one page of movies now playing.
    FetchNowPlaying {
        /// 1-based page.
        page: u32,
    },
    /// Load one page of popular shows.
    FetchPopularShows {
        /// 1-based page.
        page: u32,
    },
    /// Refresh the account state of a movie.
    FetchMovieAccountStates {
        /// TMDB movie ID.
        movie_id: u64,
    },
    /// Refresh the account state of a show.
    FetchShowAccountStates {
        /// TMDB series ID.
        show_id: u64,
    },
}

/// Identity of an intent for switch-to-latest.
///
/// A dispatched intent supersedes an in-flight one with an equal key.
/// Toggles are keyed by target item, not by the add/remove value, so the
/// last toggle of an item wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKey {
    /// Login flow.
    Login,
    /// Configuration load.
    Configuration,
    /// Account detail load.
    AccountDetail,
    /// Account list page.
    AccountMedia(MediaType, AccountListCategory, u32),
    /// Average rating.
    AverageRating(MediaType),
    /// Media count.
    MediaCount,
    /// Toggle of one item on one list.
    Toggle(ToggleList, MediaType, u64),
    /// Now playing page.
    NowPlaying(u32),
    /// Popular shows page.
    PopularShows(u32),
    /// Movie account state.
    MovieAccountStates(u64),
    /// Show account state.
    ShowAccountStates(u64),
}

impl Intent {
    /// Switch-to-latest key of this intent.
    #[must_use]
    pub const fn key(&self) -> IntentKey {
        match *self {
            Self::Login(_) => IntentKey::Login,
            Self::FetchConfiguration => IntentKey::Configuration,
            Self::FetchAccountDetail => IntentKey::AccountDetail,
            Self::FetchAccountMedia {
                media_type,
                category,
                page,
            } => IntentKey::AccountMedia(media_type, category, page),
            Self::FetchAverageRating { media_type } => IntentKey::AverageRating(media_type),
            Self::FetchMediaCount => IntentKey::MediaCount,
            Self::ToggleWatchlist(m) => {
                IntentKey::Toggle(ToggleList::Watchlist, m.media_type, m.media_id)
            }
            Self::ToggleFavorite(m) => {
                IntentKey::Toggle(ToggleList::Favorite, m.media_type, m.media_id)
            }
            Self::FetchNowPlaying { page } => IntentKey::NowPlaying(page),
            Self::FetchPopularShows { page } => IntentKey::PopularShows(page),
            Self::FetchMovieAccountStates { movie_id } => IntentKey::MovieAccountStates(movie_id),
            Self::FetchShowAccountStates { show_id } => IntentKey::ShowAccountStates(show_id),
        }
    }

    /// Whether `event` is the terminal event of this intent.
    ///
    /// Toggles settle on the account-state refresh they trigger, or on
    /// their own failure.
    #[must_use]
    pub fn is_settled_by(&self, event: &Event) -> bool {
        match (self, event) {
            (Self::Login(_), Event::SessionCreated(_) | Event::LoginFailed(_))
            | (
                Self::FetchConfiguration,
                Event::ConfigurationLoaded(_) | Event::ConfigurationFailed(_),
            )
            | (
                Self::FetchAccountDetail,
                Event::AccountDetailLoaded(_) | Event::AccountDetailFailed(_),
            )
            | (Self::FetchMediaCount, Event::MediaCountLoaded(_) | Event::MediaCountFailed(_))
            | (
                Self::FetchNowPlaying { .. },
                Event::NowPlayingLoaded { .. } | Event::NowPlayingFailed(_),
            )
            | (
                Self::FetchPopularShows { .. },
                Event::PopularShowsLoaded { .. } | Event::PopularShowsFailed(_),
            ) => true,
            (
                Self::FetchAccountMedia {
                    media_type: MediaType::Movie,
                    category,
                    ..
                },
                Event::AccountMoviesLoaded { category: c, .. }
                | Event::AccountMoviesFailed { category: c, .. },
            )
            | (
                Self::FetchAccountMedia {
                    media_type: MediaType::Tv,
                    category,
                    ..
                },
                Event::AccountShowsLoaded { category: c, .. }
                | Event::AccountShowsFailed { category: c, .. },
            ) => category == c,
            (
                Self::FetchAverageRating { media_type },
                Event::AverageRatingLoaded { media_type: m, .. }
                | Event::AverageRatingFailed { media_type: m, .. },
            ) => media_type == m,
            (
                Self::FetchMovieAccountStates { movie_id },
                Event::MovieAccountStatesLoaded { movie_id: id, .. }
                | Event::MovieAccountStatesFailed { movie_id: id, .. },
            )
            | (
                Self::FetchShowAccountStates { show_id: movie_id },
                Event::ShowAccountStatesLoaded { show_id: id, .. }
                | Event::ShowAccountStatesFailed { show_id: id, .. },
            ) => movie_id == id,
            (Self::ToggleWatchlist(mutation) | Self::ToggleFavorite(mutation), _) => {
                toggle_settled_by(mutation, event)
            }
            _ => false,
        }
    }
}

fn toggle_settled_by(mutation: &MediaMutation, event: &Event) -> bool {
    match (mutation.media_type, event) {
        (_, Event::ToggleFailed { mutation: m, .. }) => m == mutation,
        (
            MediaType::Movie,
            Event::MovieAccountStatesLoaded { movie_id: id, .. }
            | Event::MovieAccountStatesFailed { movie_id: id, .. },
        )
        | (
            MediaType::Tv,
            Event::ShowAccountStatesLoaded { show_id: id, .. }
            | Event::ShowAccountStatesFailed { show_id: id, .. },
        ) => *id == mutation.media_id,
        _ => false,
    }
}

/// A state transition produced by a handler and applied by the reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Login succeeded.
    SessionCreated(Session),
    /// Login failed.
    LoginFailed(OrchestrationError),
    /// Configuration loaded.
    ConfigurationLoaded(Configuration),
    /// Configuration load failed.
    ConfigurationFailed(OrchestrationError),
    /// Account detail loaded.
    AccountDetailLoaded(Account),
    /// Account detail load failed.
    AccountDetailFailed(OrchestrationError),
    /// Account movie list page loaded (empty when short-circuited).
    AccountMoviesLoaded {
        /// List category.
        category: AccountListCategory,
        /// Requested page.
        page: u32,
        /// Decorated movies.
        movies: Vec<Movie>,
    },
    /// Account movie list page failed.
    AccountMoviesFailed {
        /// List category.
        category: AccountListCategory,
        /// Failure reason.
        error: OrchestrationError,
    },
    /// Account TV list page loaded (empty when short-circuited).
    AccountShowsLoaded {
        /// List category.
        category: AccountListCategory,
        /// Requested page.
        page: u32,
        /// Decorated shows.
        shows: Vec<TvShow>,
    },
    /// Account TV list page failed.
    AccountShowsFailed {
        /// List category.
        category: AccountListCategory,
        /// Failure reason.
        error: OrchestrationError,
    },
    /// Average rating computed.
    AverageRatingLoaded {
        /// Movies or TV.
        media_type: MediaType,
        /// Mean rating.
        average: f64,
    },
    /// Average rating failed.
    AverageRatingFailed {
        /// Movies or TV.
        media_type: MediaType,
        /// Failure reason.
        error: OrchestrationError,
    },
    /// Media count aggregated.
    MediaCountLoaded(MediaCount),
    /// Media count failed.
    MediaCountFailed(OrchestrationError),
    /// Watchlist or favorite mutation failed.
    ToggleFailed {
        /// Target list.
        list: ToggleList,
        /// Requested mutation.
        mutation: MediaMutation,
        /// Failure reason.
        error: OrchestrationError,
    },
    /// Now playing page loaded.
    NowPlayingLoaded {
        /// Page number.
        page: u32,
        /// Total pages.
        total_pages: u32,
        /// Decorated movies.
        movies: Vec<Movie>,
    },
    /// Now playing page failed.
    NowPlayingFailed(OrchestrationError),
    /// Popular shows page loaded.
    PopularShowsLoaded {
        /// Page number.
        page: u32,
        /// Total pages.
        total_pages: u32,
        /// Decorated shows.
        shows: Vec<TvShow>,
    },
    /// Popular shows page failed.
    PopularShowsFailed(OrchestrationError),
    /// Movie account state loaded.
    MovieAccountStatesLoaded {
        /// TMDB movie ID.
        movie_id: u64,
        /// Account state.
        states: AccountStates,
    },
    /// Movie account state failed.
    MovieAccountStatesFailed {
        /// TMDB movie ID.
        movie_id: u64,
        /// Failure reason.
        error: OrchestrationError,
    },
    /// Show account state loaded.
    ShowAccountStatesLoaded {
        /// TMDB series ID.
        show_id: u64,
        /// Account state.
        states: AccountStates,
    },
    /// Show account state failed.
    ShowAccountStatesFailed {
        /// TMDB series ID.
        show_id: u64,
        /// Failure reason.
        error: OrchestrationError,
    },
}

impl Event {
    /// The failure carried by this event, if it is a failure event.
    #[must_use]
    pub const fn failure(&self) -> Option<&OrchestrationError> {
        match self {
            Self::LoginFailed(error)
            | Self::ConfigurationFailed(error)
            | Self::AccountDetailFailed(error)
            | Self::MediaCountFailed(error)
            | Self::NowPlayingFailed(error)
            | Self::PopularShowsFailed(error)
            | Self::AccountMoviesFailed { error, .. }
            | Self::AccountShowsFailed { error, .. }
            | Self::AverageRatingFailed { error, .. }
            | Self::ToggleFailed { error, .. }
            | Self::MovieAccountStatesFailed { error, .. }
            | Self::ShowAccountStatesFailed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::SessionCreated(_) => "session_created",
            Self::LoginFailed(_) => "login_failed",
            Self::ConfigurationLoaded(_) => "configuration_loaded",
            Self::ConfigurationFailed(_) => "configuration_failed",
            Self::AccountDetailLoaded(_) => "account_detail_loaded",
            Self::AccountDetailFailed(_) => "account_detail_failed",
            Self::AccountMoviesLoaded { .. } => "account_movies_loaded",
            Self::AccountMoviesFailed { .. } => "account_movies_failed",
            Self::AccountShowsLoaded { .. } => "account_shows_loaded",
            Self::AccountShowsFailed { .. } => "account_shows_failed",
            Self::AverageRatingLoaded { .. } => "average_rating_loaded",
            Self::AverageRatingFailed { .. } => "average_rating_failed",
            Self::MediaCountLoaded(_) => "media_count_loaded",
            Self::MediaCountFailed(_) => "media_count_failed",
            Self::ToggleFailed { .. } => "toggle_failed",
            Self::NowPlayingLoaded { .. } => "now_playing_loaded",
            Self::NowPlayingFailed(_) => "now_playing_failed",
            Self::PopularShowsLoaded { .. } => "popular_shows_loaded",
            Self::PopularShowsFailed(_) => "popular_shows_failed",
            Self::MovieAccountStatesLoaded { .. } => "movie_account_states_loaded",
            Self::MovieAccountStatesFailed { .. } => "movie_account_states_failed",
            Self::ShowAccountStatesLoaded { .. } => "show_account_states_loaded",
            Self::ShowAccountStatesFailed { .. } => "show_account_states_failed",
        }
    }
}

/// What a handler produces for one intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// An event for the reducer.
    Event(Event),
    /// A follow-up intent to dispatch.
    FollowUp(Intent),
}
