//! Storage interfaces consumed by the note workflow.
//!
//! The traits are split by concern so tests can substitute only the part they
//! need. [`super::SqliteStore`] implements all three.

use super::PersistenceError;
use super::query::{NoteFilter, PageRequest};
use super::records::{GitHubProfile, NoteId, NoteRecord, PullRequest, PullRequestId, UserId};
use crate::github::PullRequestLocator;

/// Storage for pull request mirrors keyed by (owner, repository, number).
#[cfg_attr(test, mockall::automock)]
pub trait PullRequestStore: Send + Sync {
    /// Looks up a pull request by its natural key.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the query fails.
    fn find_pull_request(
        &self,
        locator: &PullRequestLocator,
    ) -> Result<Option<PullRequest>, PersistenceError>;

    /// Inserts a new pull request.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::UniqueViolation`] when a row with the same
    /// natural key already exists, or another [`PersistenceError`] when the
    /// write fails.
    fn insert_pull_request(&self, pull_request: &PullRequest) -> Result<(), PersistenceError>;
}

/// Storage for notes and their pull request associations.
pub trait NoteStore: Send + Sync {
    /// Loads a note if it exists and belongs to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the query fails.
    fn find_note(
        &self,
        user_id: &UserId,
        note_id: NoteId,
    ) -> Result<Option<NoteRecord>, PersistenceError>;

    /// Inserts a new note row.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the write fails.
    fn insert_note(&self, note: &NoteRecord) -> Result<(), PersistenceError>;

    /// Overwrites the mutable fields of an existing note.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the write fails or no row matched.
    fn update_note(&self, note: &NoteRecord) -> Result<(), PersistenceError>;

    /// Deletes a note owned by `user_id`, returning whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the write fails.
    fn delete_note(&self, user_id: &UserId, note_id: NoteId) -> Result<bool, PersistenceError>;

    /// Pull requests currently associated with a note, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the query fails.
    fn list_associations(&self, note_id: NoteId) -> Result<Vec<PullRequest>, PersistenceError>;

    /// Atomically replaces the note's association set with `pull_request_ids`.
    ///
    /// Duplicate identifiers collapse to a single association.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the transaction fails; the previous
    /// set is then left untouched.
    fn replace_associations(
        &self,
        note_id: NoteId,
        pull_request_ids: &[PullRequestId],
    ) -> Result<(), PersistenceError>;

    /// Lists a user's notes matching `filter`, newest first, with the total
    /// count of matching notes before pagination.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the query fails.
    fn query_notes(
        &self,
        user_id: &UserId,
        filter: &NoteFilter,
        page: PageRequest,
    ) -> Result<(Vec<NoteRecord>, u64), PersistenceError>;
}

/// Storage for per-user GitHub credentials.
pub trait CredentialStore: Send + Sync {
    /// Returns the stored GitHub profile, if the user has one.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the query fails.
    fn github_profile(&self, user_id: &UserId) -> Result<Option<GitHubProfile>, PersistenceError>;

    /// Stores the provided profile fields, keeping existing values for fields
    /// that are `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the write fails.
    fn save_github_profile(
        &self,
        user_id: &UserId,
        profile: &GitHubProfile,
    ) -> Result<GitHubProfile, PersistenceError>;
}
