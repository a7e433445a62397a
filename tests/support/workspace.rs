//! Migrated `SQLite` databases for integration tests.

use ghnotes::persistence::{
    CredentialStore, GitHubProfile, SqliteStore, UserId, migrate_database,
};
use ghnotes::telemetry::NoopTelemetrySink;
use tempfile::TempDir;

use super::create_temp_dir;

/// A migrated note database living in a temporary directory.
pub struct NoteDatabase {
    _temp_dir: TempDir,
    database_url: String,
    store: SqliteStore,
}

impl NoteDatabase {
    /// Creates and migrates a fresh database.
    ///
    /// # Panics
    ///
    /// Panics if the database cannot be created or migrated.
    pub fn migrated() -> Self {
        let temp_dir = create_temp_dir();
        let database_url = temp_dir
            .path()
            .join("ghnotes.sqlite")
            .to_string_lossy()
            .to_string();
        migrate_database(&database_url, &NoopTelemetrySink)
            .unwrap_or_else(|error| panic!("failed to migrate test database: {error}"));
        let store = SqliteStore::new(database_url.clone())
            .unwrap_or_else(|error| panic!("failed to open test database: {error}"));

        Self {
            _temp_dir: temp_dir,
            database_url,
            store,
        }
    }

    /// Path of the database file.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Store backed by the database.
    pub const fn store(&self) -> &SqliteStore {
        &self.store
    }

    /// Stores a GitHub token for `user`.
    ///
    /// # Panics
    ///
    /// Panics if the user name is blank or the write fails.
    pub fn save_token(&self, user: &str, token: &str) {
        let user_id =
            UserId::new(user).unwrap_or_else(|| panic!("user name must not be blank: {user:?}"));
        self.store
            .save_github_profile(
                &user_id,
                &GitHubProfile {
                    github_username: Some(user.to_owned()),
                    github_token: Some(token.to_owned()),
                },
            )
            .unwrap_or_else(|error| panic!("failed to save profile for {user}: {error}"));
    }
}
