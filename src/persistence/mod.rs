//! Local persistence and database migrations.
//!
//! Notes, mirrored pull requests, the links between them and per-user GitHub
//! credentials live in a local `SQLite` database. The schema is managed with
//! Diesel migrations so the database can be created and upgraded consistently
//! across machines.

mod error;
mod migrator;
mod query;
mod records;
mod sqlite;
mod store;

pub use error::PersistenceError;
pub use migrator::{
    CURRENT_SCHEMA_VERSION, INITIAL_SCHEMA_VERSION, SchemaVersion, migrate_database,
};
pub use query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, NoteFilter, PageRequest};
pub use records::{
    GitHubProfile, NoteId, NoteRecord, PullRequest, PullRequestId, PullRequestRef, UserId, now,
};
pub use sqlite::SqliteStore;
#[cfg(test)]
pub use store::MockPullRequestStore;
pub use store::{CredentialStore, NoteStore, PullRequestStore};
