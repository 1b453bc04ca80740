//! Account detail, account lists, ratings, counts and list toggles.

use anyhow::Result;
use cinedeck_api::tmdb::{AccountListCategory, MediaMutation, MediaType, TmdbApi};
use futures::future::try_join_all;
use tracing::instrument;

use crate::decorate::{decorate_movies, decorate_shows};
use crate::error::OrchestrationError;
use crate::intent::{Event, Intent, Outcome, ToggleList};
use crate::model::{Account, MediaCount, Movie, TvShow};
use crate::rating::average;
use crate::state::AppState;

/// Loads the account bound to the current session.
#[instrument(skip_all)]
pub async fn fetch_account_detail<A>(api: &A, state: &AppState) -> Event
where
    A: TmdbApi + Sync,
{
    match account_detail(api, state).await {
        Ok(account) => {
            tracing::debug!(account_id = account.id, "account detail loaded");
            Event::AccountDetailLoaded(account)
        }
        Err(error) => {
            tracing::warn!(%error, "account detail failed");
            Event::AccountDetailFailed(error)
        }
    }
}

async fn account_detail<A>(api: &A, state: &AppState) -> Result<Account, OrchestrationError>
where
    A: TmdbApi + Sync,
{
    let session = state.require_session()?;
    let raw = api.account_details(&session.session_id).await?;
    Ok(Account::from_api(raw))
}

/// Loads one page of an account list.
///
/// Page 1 of a list that already holds items resolves to an empty success
/// without a request.
#[instrument(skip_all, fields(media_type = %media_type, category = %category, page = page))]
pub async fn fetch_account_media<A>(
    api: &A,
    state: &AppState,
    media_type: MediaType,
    category: AccountListCategory,
    page: u32,
) -> Event
where
    A: TmdbApi + Sync,
{
    match media_type {
        MediaType::Movie => match account_movies(api, state, category, page).await {
            Ok(movies) => Event::AccountMoviesLoaded {
                category,
                page,
                movies,
            },
            Err(error) => {
                tracing::warn!(%error, "account movies failed");
                Event::AccountMoviesFailed { category, error }
            }
        },
        MediaType::Tv => match account_shows(api, state, category, page).await {
            Ok(shows) => Event::AccountShowsLoaded {
                category,
                page,
                shows,
            },
            Err(error) => {
                tracing::warn!(%error, "account shows failed");
                Event::AccountShowsFailed { category, error }
            }
        },
    }
}

async fn account_movies<A>(
    api: &A,
    state: &AppState,
    category: AccountListCategory,
    page: u32,
) -> Result<Vec<Movie>, OrchestrationError>
where
    A: TmdbApi + Sync,
{
    let account = state.require_account()?;
    let session = state.require_session()?;
    if page == 1 && !state.account.movies.get(category).is_empty() {
        tracing::debug!("list already populated, skipping first page");
        return Ok(Vec::new());
    }
    let config = state.require_configuration()?;

    let response = api
        .account_movies(account.id, &session.session_id, category, page)
        .await?;
    tracing::debug!(
        results = response.results.len(),
        total_pages = response.total_pages,
        "account movies page loaded"
    );
    Ok(decorate_movies(config, response.results))
}

async fn account_shows<A>(
    api: &A,
    state: &AppState,
    category: AccountListCategory,
    page: u32,
) -> Result<Vec<TvShow>, OrchestrationError>
where
    A: TmdbApi + Sync,
{
    let account = state.require_account()?;
    let session = state.require_session()?;
    if page == 1 && !state.account.shows.get(category).is_empty() {
        tracing::debug!("list already populated, skipping first page");
        return Ok(Vec::new());
    }
    let config = state.require_configuration()?;

    let response = api
        .account_tv(account.id, &session.session_id, category, page)
        .await?;
    tracing::debug!(
        results = response.results.len(),
        total_pages = response.total_pages,
        "account shows page loaded"
    );
    Ok(decorate_shows(config, response.results))
}

/// Averages every rating on the account's rated list.
///
/// Fetches page 1, then pages `2..=total_pages` concurrently. The mean is
/// computed over a fresh set of ratings on every call.
#[instrument(skip_all, fields(media_type = %media_type))]
pub async fn fetch_average_rating<A>(api: &A, state: &AppState, media_type: MediaType) -> Event
where
    A: TmdbApi + Sync,
{
    match average_rating(api, state, media_type).await {
        Ok(average) => {
            tracing::debug!(average = average, "average rating computed");
            Event::AverageRatingLoaded {
                media_type,
                average,
            }
        }
        Err(error) => {
            tracing::warn!(%error, "average rating failed");
            Event::AverageRatingFailed { media_type, error }
        }
    }
}

async fn average_rating<A>(
    api: &A,
    state: &AppState,
    media_type: MediaType,
) -> Result<f64, OrchestrationError>
where
    A: TmdbApi + Sync,
{
    let account = state.require_account()?;
    let session = state.require_session()?;

    let (mut ratings, total_pages) =
        rated_page(api, account.id, &session.session_id, media_type, 1).await?;
    if total_pages >= 2 {
        let rest = try_join_all(
            (2..=total_pages)
                .map(|page| rated_page(api, account.id, &session.session_id, media_type, page)),
        )
        .await?;
        ratings.extend(rest.into_iter().flat_map(|(page_ratings, _)| page_ratings));
    }
    tracing::debug!(
        ratings = ratings.len(),
        pages = total_pages,
        "rated pages collected"
    );

    average(&ratings)
}

/// Ratings on one rated page plus the page count.
async fn rated_page<A>(
    api: &A,
    account_id: u64,
    session_id: &str,
    media_type: MediaType,
    page: u32,
) -> Result<(Vec<f64>, u32)>
where
    A: TmdbApi + Sync,
{
    let category = AccountListCategory::Rated;
    match media_type {
        MediaType::Movie => {
            let response = api
                .account_movies(account_id, session_id, category, page)
                .await?;
            let ratings = response.results.iter().filter_map(|m| m.rating).collect();
            Ok((ratings, response.total_pages))
        }
        MediaType::Tv => {
            let response = api
                .account_tv(account_id, session_id, category, page)
                .await?;
            let ratings = response.results.iter().filter_map(|s| s.rating).collect();
            Ok((ratings, response.total_pages))
        }
    }
}

/// Counts watchlist, favorite and rated items across movies and TV.
///
/// The six first-page requests run concurrently; any failure fails the
/// whole count.
#[instrument(skip_all)]
pub async fn fetch_media_count<A>(api: &A, state: &AppState) -> Event
where
    A: TmdbApi + Sync,
{
    match media_count(api, state).await {
        Ok(count) => {
            tracing::debug!(
                watchlist = count.watchlist,
                favorites = count.favorites,
                ratings = count.ratings,
                "media count loaded"
            );
            Event::MediaCountLoaded(count)
        }
        Err(error) => {
            tracing::warn!(%error, "media count failed");
            Event::MediaCountFailed(error)
        }
    }
}

async fn media_count<A>(api: &A, state: &AppState) -> Result<MediaCount, OrchestrationError>
where
    A: TmdbApi + Sync,
{
    let account = state.require_account()?;
    let session = state.require_session()?;
    let (id, sid) = (account.id, session.session_id.as_str());

    let (tv_watchlist, tv_favorite, tv_rated, movie_watchlist, movie_favorite, movie_rated) = tokio::try_join!(
        list_total(api, id, sid, MediaType::Tv, AccountListCategory::Watchlist),
        list_total(api, id, sid, MediaType::Tv, AccountListCategory::Favorite),
        list_total(api, id, sid, MediaType::Tv, AccountListCategory::Rated),
        list_total(api, id, sid, MediaType::Movie, AccountListCategory::Watchlist),
        list_total(api, id, sid, MediaType::Movie, AccountListCategory::Favorite),
        list_total(api, id, sid, MediaType::Movie, AccountListCategory::Rated),
    )?;

    Ok(MediaCount {
        watchlist: tv_watchlist.saturating_add(movie_watchlist),
        favorites: tv_favorite.saturating_add(movie_favorite),
        ratings: tv_rated.saturating_add(movie_rated),
    })
}

async fn list_total<A>(
    api: &A,
    account_id: u64,
    session_id: &str,
    media_type: MediaType,
    category: AccountListCategory,
) -> Result<u32>
where
    A: TmdbApi + Sync,
{
    let total = match media_type {
        MediaType::Movie => {
            api.account_movies(account_id, session_id, category, 1)
                .await?
                .total_results
        }
        MediaType::Tv => {
            api.account_tv(account_id, session_id, category, 1)
                .await?
                .total_results
        }
    };
    Ok(total)
}

/// Adds or removes an item from the watchlist or favorites.
///
/// Success yields a follow-up refresh of the item's account state; failure
/// yields [`Event::ToggleFailed`].
#[instrument(skip_all, fields(
    list = ?list,
    media_type = %mutation.media_type,
    media_id = mutation.media_id,
    value = mutation.value,
))]
pub async fn toggle<A>(
    api: &A,
    state: &AppState,
    list: ToggleList,
    mutation: MediaMutation,
) -> Outcome
where
    A: TmdbApi + Sync,
{
    match apply_toggle(api, state, list, &mutation).await {
        Ok(()) => {
            tracing::info!("account list updated");
            Outcome::FollowUp(refresh_intent(&mutation))
        }
        Err(error) => {
            tracing::warn!(%error, "account list update failed");
            Outcome::Event(Event::ToggleFailed {
                list,
                mutation,
                error,
            })
        }
    }
}

async fn apply_toggle<A>(
    api: &A,
    state: &AppState,
    list: ToggleList,
    mutation: &MediaMutation,
) -> Result<(), OrchestrationError>
where
    A: TmdbApi + Sync,
{
    let account = state.require_account()?;
    let session = state.require_session()?;
    let status = match list {
        ToggleList::Watchlist => {
            api.add_to_watchlist(account.id, &session.session_id, mutation)
                .await?
        }
        ToggleList::Favorite => {
            api.mark_as_favorite(account.id, &session.session_id, mutation)
                .await?
        }
    };
    tracing::debug!(status_code = status.status_code, "mutation acknowledged");
    Ok(())
}

/// Account-state refresh routed by media type.
const fn refresh_intent(mutation: &MediaMutation) -> Intent {
    match mutation.media_type {
        MediaType::Movie => Intent::FetchMovieAccountStates {
            movie_id: mutation.media_id,
        },
        MediaType::Tv => Intent::FetchShowAccountStates {
            show_id: mutation.media_id,
        },
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::panic)]

    use cinedeck_api::tmdb::TmdbPage;

    use super::*;
    use crate::decorate::decorate_shows;
    use crate::error::Precondition;
    use crate::testing::{
        ACCOUNT_ID, FakeApi, SESSION_ID, movie_total, rated_movies, rated_shows, raw_movie,
        raw_show, show_total, signed_in_state,
    };

    #[tokio::test]
    async fn test_account_detail_derives_avatar() {
        // Arrange
        let api = FakeApi::default();
        let state = signed_in_state();

        // Act
        let event = fetch_account_detail(&api, &state).await;

        // Assert
        let Event::AccountDetailLoaded(account) = event else {
            panic!("expected account detail, got {event:?}");
        };
        assert_eq!(account.id, ACCOUNT_ID);
        assert_eq!(
            account.avatar_url.as_deref(),
            Some("https://www.gravatar.com/avatar/c9e9fc152ee756a900db85757c29815d.jpg?s=200")
        );
        assert_eq!(api.calls(), vec![format!("account_details:{SESSION_ID}")]);
    }

    #[tokio::test]
    async fn test_account_detail_without_session_skips_request() {
        // Arrange
        let api = FakeApi::default();
        let state = AppState::default();

        // Act
        let event = fetch_account_detail(&api, &state).await;

        // Assert
        assert_eq!(
            event,
            Event::AccountDetailFailed(OrchestrationError::MissingPrecondition(
                Precondition::Session
            ))
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_account_movies_decorates_results() {
        // Arrange
        let mut api = FakeApi::default();
        api.movie_pages.insert(
            (AccountListCategory::Watchlist, 2),
            TmdbPage {
                page: 2,
                results: vec![raw_movie(550, &[28])],
                total_pages: 2,
                total_results: 21,
            },
        );
        let state = signed_in_state();

        // Act
        let event = fetch_account_media(
            &api,
            &state,
            MediaType::Movie,
            AccountListCategory::Watchlist,
            2,
        )
        .await;

        // Assert
        let Event::AccountMoviesLoaded { page, movies, .. } = event else {
            panic!("expected movies, got {event:?}");
        };
        assert_eq!(page, 2);
        assert_eq!(movies[0].genre_names, vec![String::from("Action")]);
        assert_eq!(movies[0].poster_path.as_deref(), Some("https://img/p/y.jpg"));
        assert_eq!(
            api.calls(),
            vec![format!("account_movies:{ACCOUNT_ID}:watchlist:2")]
        );
    }

    #[tokio::test]
    async fn test_first_page_short_circuits_when_populated() {
        // Arrange
        let api = FakeApi::default();
        let mut state = signed_in_state();
        state.apply(&Event::AccountShowsLoaded {
            category: AccountListCategory::Favorite,
            page: 1,
            shows: decorate_shows(
                state.require_configuration().unwrap(),
                vec![raw_show(1396, &[18])],
            ),
        });

        // Act
        let event = fetch_account_media(
            &api,
            &state,
            MediaType::Tv,
            AccountListCategory::Favorite,
            1,
        )
        .await;

        // Assert
        assert_eq!(
            event,
            Event::AccountShowsLoaded {
                category: AccountListCategory::Favorite,
                page: 1,
                shows: Vec::new(),
            }
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_account_media_without_configuration_fails() {
        // Arrange
        let api = FakeApi::default();
        let mut state = signed_in_state();
        state.configuration.configuration = None;

        // Act
        let event = fetch_account_media(
            &api,
            &state,
            MediaType::Movie,
            AccountListCategory::Rated,
            1,
        )
        .await;

        // Assert
        assert_eq!(
            event,
            Event::AccountMoviesFailed {
                category: AccountListCategory::Rated,
                error: OrchestrationError::MissingPrecondition(Precondition::Configuration),
            }
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn test_average_rating_across_pages() {
        // Arrange
        let mut api = FakeApi::default();
        api.movie_pages.insert(
            (AccountListCategory::Rated, 1),
            rated_movies(1, 3, &[8.0, 9.0]),
        );
        api.movie_pages
            .insert((AccountListCategory::Rated, 2), rated_movies(2, 3, &[7.0]));
        api.movie_pages
            .insert((AccountListCategory::Rated, 3), rated_movies(3, 3, &[6.0]));
        let state = signed_in_state();

        // Act
        let event = fetch_average_rating(&api, &state, MediaType::Movie).await;

        // Assert
        let Event::AverageRatingLoaded { average, .. } = event else {
            panic!("expected average, got {event:?}");
        };
        assert!((average - 7.5).abs() < f64::EPSILON);
        assert_eq!(api.count("account_movies"), 3);
    }

    #[tokio::test]
    async fn test_show_average_reads_tv_on_every_page() {
        // Arrange
        let mut api = FakeApi::default();
        api.tv_pages.insert(
            (AccountListCategory::Rated, 1),
            rated_shows(1, 2, &[10.0]),
        );
        api.tv_pages
            .insert((AccountListCategory::Rated, 2), rated_shows(2, 2, &[6.0]));
        let state = signed_in_state();

        // Act
        let event = fetch_average_rating(&api, &state, MediaType::Tv).await;

        // Assert
        let Event::AverageRatingLoaded { average, .. } = event else {
            panic!("expected average, got {event:?}");
        };
        assert!((average - 8.0).abs() < f64::EPSILON);
        assert_eq!(api.count("account_tv"), 2);
        assert_eq!(api.count("account_movies"), 0);
    }

    #[tokio::test]
    async fn test_average_rating_is_not_cumulative() {
        // Arrange
        let mut api = FakeApi::default();
        api.movie_pages.insert(
            (AccountListCategory::Rated, 1),
            rated_movies(1, 1, &[4.0, 6.0]),
        );
        let state = signed_in_state();

        // Act
        let first = fetch_average_rating(&api, &state, MediaType::Movie).await;
        let second = fetch_average_rating(&api, &state, MediaType::Movie).await;

        // Assert
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_average_rating_fails_when_any_page_fails() {
        // Arrange
        let mut api = FakeApi::default().failing(&format!("account_movies:{ACCOUNT_ID}:rated:3"));
        for page in 1..=3 {
            api.movie_pages.insert(
                (AccountListCategory::Rated, page),
                rated_movies(page, 3, &[5.0]),
            );
        }
        let state = signed_in_state();

        // Act
        let event = fetch_average_rating(&api, &state, MediaType::Movie).await;

        // Assert
        let Event::AverageRatingFailed { error, .. } = event else {
            panic!("expected failure, got {event:?}");
        };
        assert!(matches!(error, OrchestrationError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_average_rating_without_ratings_fails() {
        // Arrange
        let api = FakeApi::default();
        let state = signed_in_state();

        // Act
        let event = fetch_average_rating(&api, &state, MediaType::Tv).await;

        // Assert
        assert_eq!(
            event,
            Event::AverageRatingFailed {
                media_type: MediaType::Tv,
                error: OrchestrationError::NoRatings,
            }
        );
    }

    #[tokio::test]
    async fn test_media_count_sums_movies_and_tv() {
        // Arrange
        let mut api = FakeApi::default();
        api.tv_pages
            .insert((AccountListCategory::Watchlist, 1), show_total(3));
        api.tv_pages
            .insert((AccountListCategory::Favorite, 1), show_total(1));
        api.tv_pages.insert((AccountListCategory::Rated, 1), show_total(4));
        api.movie_pages
            .insert((AccountListCategory::Watchlist, 1), movie_total(5));
        api.movie_pages
            .insert((AccountListCategory::Favorite, 1), movie_total(2));
        api.movie_pages
            .insert((AccountListCategory::Rated, 1), movie_total(0));
        let state = signed_in_state();

        // Act
        let event = fetch_media_count(&api, &state).await;

        // Assert
        assert_eq!(
            event,
            Event::MediaCountLoaded(MediaCount {
                watchlist: 8,
                favorites: 3,
                ratings: 4,
            })
        );
        assert_eq!(api.calls().len(), 6);
    }

    #[tokio::test]
    async fn test_media_count_fails_on_single_failure() {
        // Arrange
        let api = FakeApi::default().failing(&format!("account_tv:{ACCOUNT_ID}:favorite:1"));
        let state = signed_in_state();

        // Act
        let event = fetch_media_count(&api, &state).await;

        // Assert
        assert!(matches!(event, Event::MediaCountFailed(_)));
    }

    #[tokio::test]
    async fn test_toggle_watchlist_routes_refresh_by_media_type() {
        // Arrange
        let api = FakeApi::default();
        let state = signed_in_state();

        // Act
        let movie = toggle(
            &api,
            &state,
            ToggleList::Watchlist,
            MediaMutation::add(MediaType::Movie, 550),
        )
        .await;
        let show = toggle(
            &api,
            &state,
            ToggleList::Favorite,
            MediaMutation::remove(MediaType::Tv, 1396),
        )
        .await;

        // Assert
        assert_eq!(
            movie,
            Outcome::FollowUp(Intent::FetchMovieAccountStates { movie_id: 550 })
        );
        assert_eq!(
            show,
            Outcome::FollowUp(Intent::FetchShowAccountStates { show_id: 1396 })
        );
        assert_eq!(
            api.calls(),
            vec![
                String::from("add_to_watchlist:movie:550:true"),
                String::from("mark_as_favorite:tv:1396:false"),
            ]
        );
    }

    #[tokio::test]
    async fn test_toggle_failure_becomes_event() {
        // Arrange
        let api = FakeApi::default().failing("mark_as_favorite");
        let state = signed_in_state();
        let mutation = MediaMutation::add(MediaType::Movie, 550);

        // Act
        let outcome = toggle(&api, &state, ToggleList::Favorite, mutation).await;

        // Assert
        let Outcome::Event(Event::ToggleFailed { list, mutation: m, .. }) = outcome else {
            panic!("expected toggle failure, got {outcome:?}");
        };
        assert_eq!(list, ToggleList::Favorite);
        assert_eq!(m, mutation);
    }
}
