//! Catalog listings and per-item account state.

use cinedeck_api::tmdb::{MediaType, TmdbApi};
use tracing::instrument;

use crate::decorate::{decorate_movies, decorate_shows};
use crate::error::OrchestrationError;
use crate::intent::Event;
use crate::model::AccountStates;
use crate::state::AppState;

/// Loads one page of movies now playing.
#[instrument(skip_all, fields(page = page))]
pub async fn fetch_now_playing<A>(api: &A, state: &AppState, page: u32) -> Event
where
    A: TmdbApi + Sync,
{
    let result = async {
        let config = state.require_configuration()?;
        let response = api.now_playing_movies(page).await?;
        let movies = decorate_movies(config, response.results);
        Ok::<_, OrchestrationError>((response.total_pages, movies))
    }
    .await;

    match result {
        Ok((total_pages, movies)) => Event::NowPlayingLoaded {
            page,
            total_pages,
            movies,
        },
        Err(error) => {
            tracing::warn!(%error, "now playing failed");
            Event::NowPlayingFailed(error)
        }
    }
}

/// Loads one page of popular TV shows.
#[instrument(skip_all, fields(page = page))]
pub async fn fetch_popular_shows<A>(api: &A, state: &AppState, page: u32) -> Event
where
    A: TmdbApi + Sync,
{
    let result = async {
        let config = state.require_configuration()?;
        let response = api.popular_tv(page).await?;
        let shows = decorate_shows(config, response.results);
        Ok::<_, OrchestrationError>((response.total_pages, shows))
    }
    .await;

    match result {
        Ok((total_pages, shows)) => Event::PopularShowsLoaded {
            page,
            total_pages,
            shows,
        },
        Err(error) => {
            tracing::warn!(%error, "popular shows failed");
            Event::PopularShowsFailed(error)
        }
    }
}

/// Loads the account state of one movie or show.
#[instrument(skip_all, fields(media_type = %media_type, media_id = media_id))]
pub async fn fetch_account_states<A>(
    api: &A,
    state: &AppState,
    media_type: MediaType,
    media_id: u64,
) -> Event
where
    A: TmdbApi + Sync,
{
    let result = async {
        let session = state.require_session()?;
        let raw = match media_type {
            MediaType::Movie => {
                api.movie_account_states(media_id, &session.session_id)
                    .await?
            }
            MediaType::Tv => api.tv_account_states(media_id, &session.session_id).await?,
        };
        Ok::<_, OrchestrationError>(AccountStates::from(raw))
    }
    .await;

    if let Err(error) = &result {
        tracing::warn!(%error, "account states failed");
    }
    match (media_type, result) {
        (MediaType::Movie, Ok(states)) => Event::MovieAccountStatesLoaded {
            movie_id: media_id,
            states,
        },
        (MediaType::Movie, Err(error)) => Event::MovieAccountStatesFailed {
            movie_id: media_id,
            error,
        },
        (MediaType::Tv, Ok(states)) => Event::ShowAccountStatesLoaded {
            show_id: media_id,
            states,
        },
        (MediaType::Tv, Err(error)) => Event::ShowAccountStatesFailed {
            show_id: media_id,
            error,
        },
    }
}
