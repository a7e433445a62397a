//! Notes attached to GitHub pull requests.
//!
//! A note may reference a pull request by (owner, repository, number). The
//! [`PullRequestResolver`] turns such a reference into a locally stored
//! record, fetching it from GitHub at most once. The [`AssociationManager`]
//! keeps each note linked to exactly the pull request it references, and the
//! [`NoteController`] ties both into create, update, delete and read
//! operations scoped to the acting user.

mod associations;
mod controller;
mod error;
mod model;
mod resolver;

pub use associations::AssociationManager;
pub use controller::NoteController;
pub use error::NoteError;
pub use model::{MAX_TITLE_LENGTH, Note, NotePage, NoteRequest};
pub use resolver::PullRequestResolver;

pub use crate::persistence::{NoteFilter, PageRequest, PullRequest, PullRequestRef};
