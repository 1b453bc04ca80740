//! Request-token login flow.

use chrono::{DateTime, NaiveDateTime, Utc};
use cinedeck_api::tmdb::TmdbApi;
use tracing::instrument;

use crate::error::OrchestrationError;
use crate::intent::{Credentials, Event};
use crate::model::Session;

/// `expires_at` format of request tokens.
const EXPIRES_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Creates a request token, validates it with the credentials and
/// exchanges it for a session.
#[instrument(skip_all, fields(username = %credentials.username))]
pub async fn login<A>(api: &A, credentials: &Credentials) -> Event
where
    A: TmdbApi + Sync,
{
    match create_session(api, credentials, Utc::now()).await {
        Ok(session) => {
            tracing::info!("session created");
            Event::SessionCreated(session)
        }
        Err(error) => {
            tracing::warn!(%error, "login failed");
            Event::LoginFailed(error)
        }
    }
}

async fn create_session<A>(
    api: &A,
    credentials: &Credentials,
    now: DateTime<Utc>,
) -> Result<Session, OrchestrationError>
where
    A: TmdbApi + Sync,
{
    let token = api.create_request_token().await?;
    ensure_not_expired(&token.expires_at, now)?;
    tracing::debug!(expires_at = %token.expires_at, "request token created");

    let validated = api
        .validate_request_token(
            &credentials.username,
            &credentials.password,
            &token.request_token,
        )
        .await?;
    let session = api.create_session(&validated.request_token).await?;
    Ok(Session::new(session.session_id))
}

/// Fails when `expires_at` is at or before `now`.
///
/// An unparseable timestamp is logged and treated as valid; the server
/// rejects an expired token anyway.
fn ensure_not_expired(expires_at: &str, now: DateTime<Utc>) -> Result<(), OrchestrationError> {
    match NaiveDateTime::parse_from_str(expires_at, EXPIRES_AT_FORMAT) {
        Ok(naive) if naive.and_utc() <= now => {
            Err(OrchestrationError::ExpiredToken(String::from(expires_at)))
        }
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::warn!(expires_at = expires_at, error = %e, "unparseable token expiry");
            Ok(())
        }
    }
}
