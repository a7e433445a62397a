//! Ghnotes library crate: personal notes linked to GitHub pull requests.
//!
//! Notes are stored in a local `SQLite` database together with mirrored pull
//! request records. A note may name a pull request by owner, repository and
//! number; the pull request is resolved from the local store or fetched once
//! from GitHub with the user's stored token, and linked to the note.

pub mod config;
pub mod github;
pub mod notes;
pub mod persistence;
pub mod telemetry;

pub use config::{GhNotesConfig, OperationMode};
pub use github::{
    GitHubError, OctocrabGateway, PersonalAccessToken, PullRequestGateway, PullRequestLocator,
};
pub use notes::{
    AssociationManager, Note, NoteController, NoteError, NoteFilter, NotePage, NoteRequest,
    PageRequest, PullRequestResolver,
};
pub use persistence::{PersistenceError, SqliteStore};
