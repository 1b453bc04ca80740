//! API client library for cinedeck.
//!
//! Provides a client for the TMDB v3 account, catalog and configuration
//! endpoints used by the browsing front end.

/// TMDB API client.
pub mod tmdb;
