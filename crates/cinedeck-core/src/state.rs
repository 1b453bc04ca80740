//! Application state slices and the reducer.
//!
//! [`AppState::apply`] is the only way state changes in response to an
//! event. [`AppState::begin`] marks the slice an intent is about to touch
//! as loading.

use std::collections::HashMap;

use cinedeck_api::tmdb::{AccountListCategory, MediaType};

use crate::error::{OrchestrationError, Precondition};
use crate::intent::{Event, Intent};
use crate::model::{Account, AccountStates, Configuration, MediaCount, Movie, Session, TvShow};

/// Loading flag and last failure of a slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    /// A request for this slice is in flight.
    pub is_loading: bool,
    /// Failure of the most recent request, cleared on the next one.
    pub failure: Option<OrchestrationError>,
}

impl Status {
    fn begin(&mut self) {
        self.is_loading = true;
        self.failure = None;
    }

    fn succeed(&mut self) {
        self.is_loading = false;
        self.failure = None;
    }

    fn fail(&mut self, error: &OrchestrationError) {
        self.is_loading = false;
        self.failure = Some(error.clone());
    }
}

/// Watchlist, favorite and rated lists of one media kind.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountLists<T> {
    /// Watchlist items, in page order.
    pub watchlist: Vec<T>,
    /// Favorite items, in page order.
    pub favorite: Vec<T>,
    /// Rated items, in page order.
    pub rated: Vec<T>,
}

impl<T> Default for AccountLists<T> {
    fn default() -> Self {
        Self {
            watchlist: Vec::new(),
            favorite: Vec::new(),
            rated: Vec::new(),
        }
    }
}

impl<T> AccountLists<T> {
    /// Items of one category.
    #[must_use]
    pub fn get(&self, category: AccountListCategory) -> &[T] {
        match category {
            AccountListCategory::Watchlist => &self.watchlist,
            AccountListCategory::Favorite => &self.favorite,
            AccountListCategory::Rated => &self.rated,
        }
    }

    fn get_mut(&mut self, category: AccountListCategory) -> &mut Vec<T> {
        match category {
            AccountListCategory::Watchlist => &mut self.watchlist,
            AccountListCategory::Favorite => &mut self.favorite,
            AccountListCategory::Rated => &mut self.rated,
        }
    }
}

/// Session slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    /// Current session, if signed in.
    pub session: Option<Session>,
    /// Login status.
    pub status: Status,
}

/// Configuration slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationState {
    /// Loaded configuration.
    pub configuration: Option<Configuration>,
    /// Load status.
    pub status: Status,
}

/// Account slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountState {
    /// Account detail.
    pub account: Option<Account>,
    /// Accumulated account movie lists.
    pub movies: AccountLists<Movie>,
    /// Accumulated account TV lists.
    pub shows: AccountLists<TvShow>,
    /// Totals across movies and TV.
    pub media_count: Option<MediaCount>,
    /// Average of the account's movie ratings.
    pub average_movie_rating: Option<f64>,
    /// Average of the account's TV ratings.
    pub average_show_rating: Option<f64>,
    /// Status of account requests.
    pub status: Status,
}

/// Movie catalog slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviesState {
    /// Now playing movies, accumulated across pages.
    pub now_playing: Vec<Movie>,
    /// Last loaded now playing page.
    pub page: u32,
    /// Total now playing pages.
    pub total_pages: u32,
    /// Account state per movie ID.
    pub account_states: HashMap<u64, AccountStates>,
    /// Status of movie requests.
    pub status: Status,
}

/// TV catalog slice.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShowsState {
    /// Popular shows, accumulated across pages.
    pub popular: Vec<TvShow>,
    /// Last loaded popular page.
    pub page: u32,
    /// Total popular pages.
    pub total_pages: u32,
    /// Account state per series ID.
    pub account_states: HashMap<u64, AccountStates>,
    /// Status of TV requests.
    pub status: Status,
}

/// The whole application state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Session.
    pub auth: AuthState,
    /// Image base URLs and genre maps.
    pub configuration: ConfigurationState,
    /// Signed-in account and its lists.
    pub account: AccountState,
    /// Movie catalog.
    pub movies: MoviesState,
    /// TV catalog.
    pub shows: ShowsState,
}

impl AppState {
    /// The current session.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::MissingPrecondition`] when signed out.
    pub fn require_session(&self) -> Result<&Session, OrchestrationError> {
        self.auth
            .session
            .as_ref()
            .ok_or(OrchestrationError::MissingPrecondition(Precondition::Session))
    }

    /// The loaded account.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::MissingPrecondition`] when not loaded.
    pub fn require_account(&self) -> Result<&Account, OrchestrationError> {
        self.account
            .account
            .as_ref()
            .ok_or(OrchestrationError::MissingPrecondition(Precondition::Account))
    }

    /// The loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestrationError::MissingPrecondition`] when not loaded.
    pub fn require_configuration(&self) -> Result<&Configuration, OrchestrationError> {
        self.configuration
            .configuration
            .as_ref()
            .ok_or(OrchestrationError::MissingPrecondition(
                Precondition::Configuration,
            ))
    }

    /// Marks the slice `intent` touches as loading.
    pub fn begin(&mut self, intent: &Intent) {
        match intent {
            Intent::Login(_) => self.auth.status.begin(),
            Intent::FetchConfiguration => self.configuration.status.begin(),
            Intent::FetchAccountDetail
            | Intent::FetchAccountMedia { .. }
            | Intent::FetchAverageRating { .. }
            | Intent::FetchMediaCount => self.account.status.begin(),
            Intent::ToggleWatchlist(mutation) | Intent::ToggleFavorite(mutation) => {
                self.media_status_mut(mutation.media_type).begin();
            }
            Intent::FetchNowPlaying { .. } | Intent::FetchMovieAccountStates { .. } => {
                self.movies.status.begin();
            }
            Intent::FetchPopularShows { .. } | Intent::FetchShowAccountStates { .. } => {
                self.shows.status.begin();
            }
        }
    }

    /// Applies one event.
    pub fn apply(&mut self, event: &Event) {
        match event {
            Event::SessionCreated(session) => {
                self.auth.session = Some(session.clone());
                self.auth.status.succeed();
                // A new session may belong to another account.
                self.account = AccountState::default();
                self.movies.account_states.clear();
                self.shows.account_states.clear();
            }
            Event::LoginFailed(error) => self.auth.status.fail(error),

            Event::ConfigurationLoaded(configuration) => {
                self.configuration.configuration = Some(configuration.clone());
                self.configuration.status.succeed();
            }
            Event::ConfigurationFailed(error) => self.configuration.status.fail(error),

            Event::AccountDetailLoaded(account) => {
                self.account.account = Some(account.clone());
                self.account.status.succeed();
            }
            Event::AccountMoviesLoaded {
                category,
                page,
                movies,
            } => {
                append_page(self.account.movies.get_mut(*category), *page, movies);
                self.account.status.succeed();
            }
            Event::AccountShowsLoaded {
                category,
                page,
                shows,
            } => {
                append_page(self.account.shows.get_mut(*category), *page, shows);
                self.account.status.succeed();
            }
            Event::AverageRatingLoaded {
                media_type,
                average,
            } => {
                match media_type {
                    MediaType::Movie => self.account.average_movie_rating = Some(*average),
                    MediaType::Tv => self.account.average_show_rating = Some(*average),
                }
                self.account.status.succeed();
            }
            Event::MediaCountLoaded(count) => {
                self.account.media_count = Some(*count);
                self.account.status.succeed();
            }
            Event::AccountDetailFailed(error)
            | Event::AccountMoviesFailed { error, .. }
            | Event::AccountShowsFailed { error, .. }
            | Event::AverageRatingFailed { error, .. }
            | Event::MediaCountFailed(error) => self.account.status.fail(error),
            Event::ToggleFailed {
                mutation, error, ..
            } => self.media_status_mut(mutation.media_type).fail(error),

            Event::NowPlayingLoaded {
                page,
                total_pages,
                movies,
            } => {
                if *page <= 1 {
                    self.movies.now_playing.clear();
                }
                self.movies.now_playing.extend(movies.iter().cloned());
                self.movies.page = *page;
                self.movies.total_pages = *total_pages;
                self.movies.status.succeed();
            }
            Event::MovieAccountStatesLoaded { movie_id, states } => {
                self.movies.account_states.insert(*movie_id, *states);
                self.movies.status.succeed();
            }
            Event::NowPlayingFailed(error) | Event::MovieAccountStatesFailed { error, .. } => {
                self.movies.status.fail(error);
            }

            Event::PopularShowsLoaded {
                page,
                total_pages,
                shows,
            } => {
                if *page <= 1 {
                    self.shows.popular.clear();
                }
                self.shows.popular.extend(shows.iter().cloned());
                self.shows.page = *page;
                self.shows.total_pages = *total_pages;
                self.shows.status.succeed();
            }
            Event::ShowAccountStatesLoaded { show_id, states } => {
                self.shows.account_states.insert(*show_id, *states);
                self.shows.status.succeed();
            }
            Event::PopularShowsFailed(error) | Event::ShowAccountStatesFailed { error, .. } => {
                self.shows.status.fail(error);
            }
        }
    }

    /// Status of the slice holding account states for `media_type`.
    fn media_status_mut(&mut self, media_type: MediaType) -> &mut Status {
        match media_type {
            MediaType::Movie => &mut self.movies.status,
            MediaType::Tv => &mut self.shows.status,
        }
    }
}

/// Appends one account list page. A first page landing on a populated list
/// is dropped: it was fetched before an earlier page 1 was applied.
fn append_page<T: Clone>(list: &mut Vec<T>, page: u32, items: &[T]) {
    if page <= 1 && !list.is_empty() {
        return;
    }
    list.extend(items.iter().cloned());
}
