//! State and orchestration library for cinedeck.
//!
//! Intents are dispatched to a [`Store`], which runs the matching handler
//! against the TMDB API and applies the resulting event to [`AppState`].

/// Configuration decoration of raw media records.
pub mod decorate;
/// Failure taxonomy.
pub mod error;
/// Async orchestration handlers.
pub mod handlers;
/// Intents, events and outcomes.
pub mod intent;
/// Domain records.
pub mod model;
/// Rating aggregation.
pub mod rating;
/// State slices and the reducer.
pub mod state;
/// Dispatch and the reducer task.
pub mod store;

#[cfg(test)]
mod testing;

pub use cinedeck_api::tmdb::{AccountListCategory, MediaMutation, MediaType};
pub use error::{OrchestrationError, Precondition};
pub use intent::{Credentials, Event, Intent, IntentKey, Outcome, ToggleList};
pub use model::{Account, AccountStates, Configuration, MediaCount, Movie, Session, TvShow};
pub use state::AppState;
pub use store::Store;
