//! Failure taxonomy carried by failure events.

use std::fmt;

use cinedeck_api::tmdb::TmdbApiError;
use thiserror::Error;

/// State that must be loaded before an operation can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// No session; the user is not signed in.
    Session,
    /// Account detail not loaded yet.
    Account,
    /// Image/genre configuration not loaded yet.
    Configuration,
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session => f.write_str("session"),
            Self::Account => f.write_str("account"),
            Self::Configuration => f.write_str("configuration"),
        }
    }
}

/// Why an orchestration handler failed.
///
/// Every remote failure is converted into this type before it reaches
/// the state layer, so events stay `Clone` and free of transport types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum OrchestrationError {
    /// Network, body read, or decode failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// TMDB `status_code`, when present.
        code: Option<u32>,
        /// TMDB `status_message` or raw body.
        message: String,
    },

    /// Required state was not loaded.
    #[error("{0} is not loaded")]
    MissingPrecondition(Precondition),

    /// Average requested over an empty set of ratings.
    #[error("no ratings to average")]
    NoRatings,

    /// The login request token expired before it could be validated.
    #[error("request token expired at {0}")]
    ExpiredToken(String),
}

impl From<anyhow::Error> for OrchestrationError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<TmdbApiError>() {
            Some(api) => Self::Api {
                status: api.status,
                code: api.code,
                message: api.message.clone(),
            },
            None => Self::Transport(format!("{err:#}")),
        }
    }
}
