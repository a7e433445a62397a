//! Record types persisted by the note store.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::github::{PullRequestData, PullRequestLocator};

/// The current time, truncated to the microsecond precision timestamps are
/// stored with.
#[must_use]
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Identifier of an already-authenticated user.
///
/// Identity is established outside this crate; the value is opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps a user identifier, rejecting blank values.
    #[must_use]
    pub fn new(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Borrow the identifier.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a fresh random identifier.
            #[must_use]
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            /// Parses an identifier from its hyphenated text form.
            ///
            /// # Errors
            ///
            /// Returns the `uuid` parse error when `value` is not a UUID.
            pub fn parse(value: &str) -> Result<Self, uuid::Error> {
                Uuid::parse_str(value.trim()).map(Self)
            }

            /// Returns the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0.hyphenated(), formatter)
            }
        }
    };
}

uuid_id!(
    /// Identifier of a note.
    NoteId
);

uuid_id!(
    /// Identifier of a locally stored pull request.
    PullRequestId
);

/// Repository owner, repository name and number a note refers to.
///
/// This is the hint supplied with a create or update request; the note's
/// associations are the authoritative link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestRef {
    /// Repository owner.
    pub repo_owner: String,
    /// Repository name.
    pub repo_name: String,
    /// Pull request number.
    pub number: u64,
}

impl PullRequestRef {
    /// Creates a reference from its three parts.
    #[must_use]
    pub fn new(repo_owner: impl Into<String>, repo_name: impl Into<String>, number: u64) -> Self {
        Self {
            repo_owner: repo_owner.into(),
            repo_name: repo_name.into(),
            number,
        }
    }
}

/// Locally stored mirror of a GitHub pull request.
///
/// At most one record exists per (owner, repository, number). Records are
/// never modified after the first fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequest {
    /// Local identifier.
    pub id: PullRequestId,
    /// Repository owner.
    pub repo_owner: String,
    /// Repository name.
    pub repo_name: String,
    /// Pull request number.
    pub number: u64,
    /// Title at fetch time.
    pub title: String,
    /// Description body at fetch time.
    pub body: String,
    /// Author login.
    pub author: String,
    /// Lifecycle state (`open`, `closed`).
    pub state: String,
    /// Canonical HTML URL.
    pub url: String,
    /// When the record was stored.
    pub created_at: DateTime<Utc>,
    /// When the record was last written.
    pub updated_at: DateTime<Utc>,
}

impl PullRequest {
    /// Builds a new record with a fresh identifier from fetched data.
    ///
    /// Owner, repository and number come from the locator used for the
    /// lookup so the natural key matches what callers query by.
    #[must_use]
    pub fn from_remote(locator: &PullRequestLocator, data: PullRequestData, now: DateTime<Utc>) -> Self {
        Self {
            id: PullRequestId::generate(),
            repo_owner: locator.owner().as_str().to_owned(),
            repo_name: locator.repository().as_str().to_owned(),
            number: locator.number().get(),
            title: data.title,
            body: data.body,
            author: data.author,
            state: data.state,
            url: data.html_url,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Persisted note row, without its associations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    /// Note identifier.
    pub id: NoteId,
    /// Owning user.
    pub user_id: UserId,
    /// Title, at most 255 characters.
    pub title: String,
    /// Free-text body.
    pub content: String,
    /// Pull request hint from the last create or update request.
    pub pull_request_ref: Option<PullRequestRef>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// GitHub profile data stored for a user.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct GitHubProfile {
    /// GitHub login, informational only.
    pub github_username: Option<String>,
    /// Personal access token used to fetch pull requests.
    pub github_token: Option<String>,
}

impl fmt::Debug for GitHubProfile {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("GitHubProfile")
            .field("github_username", &self.github_username)
            .field(
                "github_token",
                &self.github_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
