//! Configuration decoration of raw API media records.
//!
//! Turns wire records into domain records: image paths are prefixed with
//! the configured base URLs and genre IDs are resolved to names. Raw
//! records are consumed, so a record cannot be decorated twice.

use std::collections::HashMap;

use cinedeck_api::tmdb::{TmdbMovie, TmdbTvShow};

use crate::model::{Configuration, Movie, TvShow};

/// Joins an image base URL and a relative path with exactly one `/`.
#[must_use]
pub fn join_image_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Resolves genre IDs present in `genres`; unknown IDs are skipped.
fn genre_names(ids: &[u32], genres: &HashMap<u32, String>) -> Vec<String> {
    ids.iter().filter_map(|id| genres.get(id).cloned()).collect()
}

/// Decorates a single movie.
#[must_use]
pub fn decorate_movie(config: &Configuration, raw: TmdbMovie) -> Movie {
    Movie {
        genre_names: genre_names(&raw.genre_ids, &config.movie_genres),
        backdrop_path: raw
            .backdrop_path
            .map(|p| join_image_url(&config.backdrop_base_url, &p)),
        poster_path: raw
            .poster_path
            .map(|p| join_image_url(&config.poster_base_url, &p)),
        id: raw.id,
        title: raw.title,
        overview: raw.overview,
        release_date: raw.release_date,
        genre_ids: raw.genre_ids,
        vote_average: raw.vote_average,
        rating: raw.rating,
    }
}

/// Decorates a single TV show using the TV genre map.
#[must_use]
pub fn decorate_show(config: &Configuration, raw: TmdbTvShow) -> TvShow {
    TvShow {
        genre_names: genre_names(&raw.genre_ids, &config.tv_genres),
        backdrop_path: raw
            .backdrop_path
            .map(|p| join_image_url(&config.backdrop_base_url, &p)),
        poster_path: raw
            .poster_path
            .map(|p| join_image_url(&config.poster_base_url, &p)),
        id: raw.id,
        name: raw.name,
        overview: raw.overview,
        first_air_date: raw.first_air_date,
        genre_ids: raw.genre_ids,
        vote_average: raw.vote_average,
        rating: raw.rating,
    }
}

/// Decorates a page of movies.
#[must_use]
pub fn decorate_movies(config: &Configuration, raw: Vec<TmdbMovie>) -> Vec<Movie> {
    raw.into_iter().map(|m| decorate_movie(config, m)).collect()
}

/// Decorates a page of TV shows.
#[must_use]
pub fn decorate_shows(config: &Configuration, raw: Vec<TmdbTvShow>) -> Vec<TvShow> {
    raw.into_iter().map(|s| decorate_show(config, s)).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::testing::{raw_movie, raw_show, sample_configuration};

    #[test]
    fn test_decorate_movie_scenario() {
        // Arrange
        let config = sample_configuration();
        let raw = raw_movie(1, &[28]);

        // Act
        let movie = decorate_movie(&config, raw);

        // Assert
        assert_eq!(movie.genre_names, vec![String::from("Action")]);
        assert_eq!(movie.backdrop_path.as_deref(), Some("https://img/x.jpg"));
        assert_eq!(movie.poster_path.as_deref(), Some("https://img/p/y.jpg"));
    }

    #[test]
    fn test_unknown_genre_ids_are_skipped() {
        // Arrange
        let config = sample_configuration();
        let raw = raw_movie(1, &[99, 28, 12]);

        // Act
        let movie = decorate_movie(&config, raw);

        // Assert
        assert_eq!(movie.genre_ids, vec![99, 28, 12]);
        assert_eq!(movie.genre_names, vec![String::from("Action")]);
    }

    #[test]
    fn test_missing_image_paths_stay_missing() {
        // Arrange
        let config = sample_configuration();
        let mut raw = raw_movie(1, &[]);
        raw.backdrop_path = None;
        raw.poster_path = None;

        // Act
        let movie = decorate_movie(&config, raw);

        // Assert
        assert!(movie.backdrop_path.is_none());
        assert!(movie.poster_path.is_none());
    }

    #[test]
    fn test_shows_use_tv_genre_map() {
        // Arrange
        let config = sample_configuration();
        let raws = vec![raw_show(1, &[28, 18]), raw_show(2, &[18])];

        // Act
        let shows = decorate_shows(&config, raws);

        // Assert
        assert_eq!(shows[0].genre_names, vec![String::from("Drama")]);
        assert_eq!(shows[1].genre_names, vec![String::from("Drama")]);
        assert_eq!(shows[1].poster_path.as_deref(), Some("https://img/p/y.jpg"));
    }

    #[test]
    fn test_join_image_url_single_slash() {
        // Arrange & Act & Assert
        assert_eq!(join_image_url("https://img", "x.jpg"), "https://img/x.jpg");
        assert_eq!(join_image_url("https://img/", "/x.jpg"), "https://img/x.jpg");
        assert_eq!(
            join_image_url("https://image.tmdb.org/t/p/w780", "/x.jpg"),
            "https://image.tmdb.org/t/p/w780/x.jpg"
        );
    }
}
