//! CLI operation mode handlers.
//!
//! This module contains the implementations for different operation modes:
//! - [`migrations`]: Database schema migrations
//! - [`notes`]: Create, update, delete, show and list notes
//! - [`profile`]: Store the user's GitHub username and token
//!
//! Output formatting utilities are in [`output`].

use ghnotes::persistence::SqliteStore;
use ghnotes::{GhNotesConfig, NoteError, OctocrabGateway};

pub mod migrations;
pub mod notes;
pub mod output;
pub mod profile;

/// Opens the configured note store.
///
/// # Errors
///
/// Returns [`NoteError::Configuration`] when the database URL is missing or
/// blank.
pub fn open_store(config: &GhNotesConfig) -> Result<SqliteStore, NoteError> {
    let database_url = config.require_database_url()?;
    SqliteStore::new(database_url).map_err(|error| NoteError::from_persistence(&error))
}

/// Builds the GitHub gateway from the configured API base and timeout.
///
/// # Errors
///
/// Returns [`NoteError::Configuration`] when the API base URL is invalid.
pub fn build_gateway(config: &GhNotesConfig) -> Result<OctocrabGateway, NoteError> {
    OctocrabGateway::new(&config.github_api_url)
        .map(|gateway| gateway.with_timeout(config.github_timeout()))
        .map_err(|error| NoteError::Configuration {
            message: format!("invalid GitHub API URL: {error}"),
        })
}
