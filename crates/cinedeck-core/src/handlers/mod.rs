//! Async orchestration handlers.
//!
//! Each handler reads a state snapshot, talks to the API and resolves to
//! exactly one [`Outcome`]. Failures never escape as errors; they become
//! failure events.

mod account;
mod auth;
mod catalog;
mod configuration;

use cinedeck_api::tmdb::{MediaType, TmdbApi};

use crate::intent::{Intent, Outcome, ToggleList};
use crate::state::AppState;

pub use account::{
    fetch_account_detail, fetch_account_media, fetch_average_rating, fetch_media_count, toggle,
};
pub use auth::login;
pub use catalog::{fetch_account_states, fetch_now_playing, fetch_popular_shows};
pub use configuration::fetch_configuration;

/// Runs the handler for `intent` against `state`.
pub async fn handle<A>(api: &A, state: &AppState, intent: Intent) -> Outcome
where
    A: TmdbApi + Sync,
{
    match intent {
        Intent::Login(credentials) => Outcome::Event(login(api, &credentials).await),
        Intent::FetchConfiguration => Outcome::Event(fetch_configuration(api).await),
        Intent::FetchAccountDetail => Outcome::Event(fetch_account_detail(api, state).await),
        Intent::FetchAccountMedia {
            media_type,
            category,
            page,
        } => Outcome::Event(fetch_account_media(api, state, media_type, category, page).await),
        Intent::FetchAverageRating { media_type } => {
            Outcome::Event(fetch_average_rating(api, state, media_type).await)
        }
        Intent::FetchMediaCount => Outcome::Event(fetch_media_count(api, state).await),
        Intent::ToggleWatchlist(mutation) => {
            toggle(api, state, ToggleList::Watchlist, mutation).await
        }
        Intent::ToggleFavorite(mutation) => toggle(api, state, ToggleList::Favorite, mutation).await,
        Intent::FetchNowPlaying { page } => Outcome::Event(fetch_now_playing(api, state, page).await),
        Intent::FetchPopularShows { page } => {
            Outcome::Event(fetch_popular_shows(api, state, page).await)
        }
        Intent::FetchMovieAccountStates { movie_id } => {
            Outcome::Event(fetch_account_states(api, state, MediaType::Movie, movie_id).await)
        }
        Intent::FetchShowAccountStates { show_id } => {
            Outcome::Event(fetch_account_states(api, state, MediaType::Tv, show_id).await)
        }
    }
}
