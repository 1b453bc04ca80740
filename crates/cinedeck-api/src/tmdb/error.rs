//! Typed error for non-success TMDB responses.

use thiserror::Error;

/// A non-2xx response from the TMDB API.
///
/// Returned inside `anyhow::Error`; callers that need to tell API failures
/// apart from transport failures recover it with `downcast_ref`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("TMDB API error (HTTP {status}): {message}")]
#[allow(clippy::module_name_repetitions)]
pub struct TmdbApiError {
    /// HTTP status code.
    pub status: u16,
    /// TMDB `status_code`, when the body could be parsed.
    pub code: Option<u32>,
    /// TMDB `status_message`, or the raw body.
    pub message: String,
}
