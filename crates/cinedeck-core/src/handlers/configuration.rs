//! Image configuration and genre maps.

use cinedeck_api::tmdb::TmdbApi;
use tracing::instrument;

use crate::error::OrchestrationError;
use crate::intent::Event;
use crate::model::Configuration;

/// Loads image base URLs and both genre lists concurrently.
#[instrument(skip_all)]
pub async fn fetch_configuration<A>(api: &A) -> Event
where
    A: TmdbApi + Sync,
{
    let result = tokio::try_join!(api.configuration(), api.movie_genres(), api.tv_genres());

    match result {
        Ok((config, movie_genres, tv_genres)) => {
            let configuration = Configuration::from_api(&config, movie_genres, tv_genres);
            tracing::debug!(
                backdrop_base_url = %configuration.backdrop_base_url,
                poster_base_url = %configuration.poster_base_url,
                movie_genres = configuration.movie_genres.len(),
                tv_genres = configuration.tv_genres.len(),
                "configuration loaded"
            );
            Event::ConfigurationLoaded(configuration)
        }
        Err(e) => {
            let error = OrchestrationError::from(e);
            tracing::warn!(%error, "configuration failed");
            Event::ConfigurationFailed(error)
        }
    }
}
