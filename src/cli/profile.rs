//! GitHub profile storage.

use ghnotes::persistence::{CredentialStore, GitHubProfile};
use ghnotes::{GhNotesConfig, NoteError};
use serde::Serialize;

use super::output::write_json;
use super::open_store;

/// Profile as reported back to the user. The token itself is never echoed.
#[derive(Debug, PartialEq, Eq, Serialize)]
struct ProfileSummary {
    user: String,
    github_username: Option<String>,
    has_token: bool,
}

/// Stores the configured GitHub username and token for the user.
///
/// Blank or absent fields keep their stored values.
///
/// # Errors
///
/// Returns [`NoteError::Configuration`] if the user or database URL is
/// missing, or [`NoteError::Storage`] when the write fails.
pub fn run(config: &GhNotesConfig) -> Result<(), NoteError> {
    let summary = save_profile(config)?;
    write_json(&summary)
}

fn save_profile(config: &GhNotesConfig) -> Result<ProfileSummary, NoteError> {
    let user = config.require_user()?;
    let store = open_store(config)?;

    let GitHubProfile {
        github_username,
        github_token,
    } = store
        .save_github_profile(&user, &config.github_profile())
        .map_err(|error| NoteError::from_persistence(&error))?;
    tracing::info!("updated GitHub profile for user {user}");

    Ok(ProfileSummary {
        user: user.as_str().to_owned(),
        github_username,
        has_token: github_token.is_some(),
    })
}
