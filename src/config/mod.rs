//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.ghnotes.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `GHNOTES_DATABASE_URL`, `GHNOTES_USER`, ...
//! 4. **Command-line arguments** – `--database-url`, `--user`, `--command`/`-c`
//!
//! # Configuration File
//!
//! ```toml
//! database_url = "ghnotes.sqlite"
//! user = "alice"
//! github_api_url = "https://api.github.com"
//! github_timeout_seconds = 30
//! ```

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::notes::{NoteError, NoteFilter, NoteRequest, PageRequest};
use crate::persistence::{GitHubProfile, NoteId, PersistenceError, UserId};

/// Operation selected by the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Apply pending database migrations and exit.
    MigrateDatabase,
    /// Create a note.
    CreateNote,
    /// Update an existing note.
    UpdateNote,
    /// Delete a note.
    DeleteNote,
    /// Show a single note.
    ShowNote,
    /// List notes with optional filters.
    ListNotes,
    /// Store the user's GitHub username and token.
    UpdateProfile,
}

impl OperationMode {
    fn from_command(command: &str) -> Option<Self> {
        match command.trim().to_ascii_lowercase().as_str() {
            "create" => Some(Self::CreateNote),
            "update" => Some(Self::UpdateNote),
            "delete" => Some(Self::DeleteNote),
            "show" => Some(Self::ShowNote),
            "list" => Some(Self::ListNotes),
            "profile" => Some(Self::UpdateProfile),
            _ => None,
        }
    }
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ghnotes::GhNotesConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = GhNotesConfig::load().expect("failed to load configuration");
/// let mode = config.operation_mode().expect("a command is required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "GHNOTES",
    discovery(
        dotfile_name = ".ghnotes.toml",
        config_file_name = "ghnotes.toml",
        app_name = "ghnotes"
    )
)]
pub struct GhNotesConfig {
    /// Local `SQLite` database URL/path.
    ///
    /// Can be provided via:
    /// - CLI: `--database-url <PATH>`
    /// - Environment: `GHNOTES_DATABASE_URL`
    /// - Config file: `database_url = "..."`
    #[ortho_config()]
    pub database_url: Option<String>,

    /// Runs database migrations and exits.
    ///
    /// Can be provided via:
    /// - CLI: `--migrate-db`
    /// - Config file: `migrate_db = true`
    #[ortho_config()]
    pub migrate_db: bool,

    /// Identifier of the authenticated user acting on notes.
    #[ortho_config(cli_short = 'u')]
    pub user: Option<String>,

    /// GitHub REST API base URL.
    #[ortho_config(cli_short = 'a')]
    pub github_api_url: String,

    /// Connect and read timeout for GitHub requests, in seconds.
    #[ortho_config(cli_short = 'w')]
    pub github_timeout_seconds: u64,

    /// Operation to run: `create`, `update`, `delete`, `show`, `list` or
    /// `profile`.
    #[ortho_config(cli_short = 'c')]
    pub command: Option<String>,

    /// Identifier of the note to update, delete or show.
    #[ortho_config(cli_short = 'i')]
    pub note_id: Option<String>,

    /// Note title.
    #[ortho_config(cli_short = 't')]
    pub title: Option<String>,

    /// Note body.
    #[ortho_config(cli_short = 'C')]
    pub content: Option<String>,

    /// Owner of the repository holding the referenced pull request.
    #[ortho_config(cli_short = 'o')]
    pub repo_owner: Option<String>,

    /// Name of the repository holding the referenced pull request.
    #[ortho_config(cli_short = 'r')]
    pub repo_name: Option<String>,

    /// Number of the referenced pull request. When listing, filters on the
    /// note's stored reference.
    #[ortho_config(cli_short = 'p')]
    pub pr_number: Option<u64>,

    /// Case-insensitive text matched against note titles and bodies.
    #[ortho_config(cli_short = 's')]
    pub search: Option<String>,

    /// Only list notes linked to a pull request in this state.
    #[ortho_config(cli_short = 'S')]
    pub pr_state: Option<String>,

    /// 1-based page of the listing.
    #[ortho_config(cli_short = 'P')]
    pub page: Option<u32>,

    /// Page size of the listing, at most 100.
    #[ortho_config(cli_short = 'l')]
    pub limit: Option<u32>,

    /// GitHub login stored by the `profile` command.
    #[ortho_config(cli_short = 'g')]
    pub github_username: Option<String>,

    /// GitHub personal access token stored by the `profile` command.
    #[ortho_config(cli_short = 'k')]
    pub github_token: Option<String>,
}

const DEFAULT_GITHUB_TIMEOUT_SECONDS: u64 = 30;

impl Default for GhNotesConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            migrate_db: false,
            user: None,
            github_api_url: crate::github::DEFAULT_API_BASE.to_owned(),
            github_timeout_seconds: DEFAULT_GITHUB_TIMEOUT_SECONDS,
            command: None,
            note_id: None,
            title: None,
            content: None,
            repo_owner: None,
            repo_name: None,
            pr_number: None,
            search: None,
            pr_state: None,
            page: None,
            limit: None,
            github_username: None,
            github_token: None,
        }
    }
}

impl GhNotesConfig {
    /// Determines the operation to run.
    ///
    /// `migrate_db` takes priority over any command.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Configuration`] when no command is given or the
    /// command is not recognised.
    pub fn operation_mode(&self) -> Result<OperationMode, NoteError> {
        if self.migrate_db {
            return Ok(OperationMode::MigrateDatabase);
        }

        let command = self
            .command
            .as_deref()
            .ok_or_else(|| NoteError::Configuration {
                message: "a command is required (use --command or -c)".to_owned(),
            })?;
        OperationMode::from_command(command).ok_or_else(|| NoteError::Configuration {
            message: format!(
                "unknown command '{command}' (expected create, update, delete, show, list or \
                 profile)"
            ),
        })
    }

    /// Returns the database URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Configuration`] when no database URL is set.
    pub fn require_database_url(&self) -> Result<&str, NoteError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| NoteError::Configuration {
                message: PersistenceError::MissingDatabaseUrl.to_string(),
            })
    }

    /// Returns the acting user.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Configuration`] when no user is set or it is
    /// blank.
    pub fn require_user(&self) -> Result<UserId, NoteError> {
        self.user
            .as_deref()
            .and_then(UserId::new)
            .ok_or_else(|| NoteError::Configuration {
                message: "user is required (use --user or -u)".to_owned(),
            })
    }

    /// Returns the note identifier.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Configuration`] when no note ID is set, or
    /// [`NoteError::InvalidArgument`] when it is not a UUID.
    pub fn require_note_id(&self) -> Result<NoteId, NoteError> {
        let raw = self
            .note_id
            .as_deref()
            .ok_or_else(|| NoteError::Configuration {
                message: "note ID is required (use --note-id or -i)".to_owned(),
            })?;
        NoteId::parse(raw).map_err(|error| NoteError::InvalidArgument {
            message: format!("note ID '{raw}' is not valid: {error}"),
        })
    }

    /// Builds a create or update request from the note fields.
    #[must_use]
    pub fn note_request(&self) -> NoteRequest {
        NoteRequest {
            title: self.title.clone().unwrap_or_default(),
            content: self.content.clone().unwrap_or_default(),
            repo_owner: self.repo_owner.clone(),
            repo_name: self.repo_name.clone(),
            pr_number: self.pr_number,
        }
    }

    /// Builds the listing filter.
    #[must_use]
    pub fn note_filter(&self) -> NoteFilter {
        NoteFilter {
            search: self.search.clone(),
            pr_number: self.pr_number,
            pr_state: self.pr_state.clone(),
        }
        .normalised()
    }

    /// Builds the listing page, falling back to defaults for invalid values.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    /// Profile fields to store.
    #[must_use]
    pub fn github_profile(&self) -> GitHubProfile {
        GitHubProfile {
            github_username: self.github_username.clone(),
            github_token: self.github_token.clone(),
        }
    }

    /// Timeout applied to GitHub requests.
    #[must_use]
    pub const fn github_timeout(&self) -> Duration {
        Duration::from_secs(self.github_timeout_seconds)
    }
}

#[cfg(test)]
mod tests;
