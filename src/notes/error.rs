//! Error taxonomy for note and pull request operations.

use thiserror::Error;

use crate::github::{GitHubError, PullRequestLocator, RateLimitInfo};
use crate::persistence::PersistenceError;

/// Errors returned by the resolver, the association manager and the note
/// controller.
///
/// Remote outcomes keep their kind as they travel upward; only the message
/// gains context.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NoteError {
    /// Malformed input, rejected before any I/O.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// What was wrong with the input.
        message: String,
    },

    /// The note or pull request does not exist for this user.
    #[error("not found: {message}")]
    NotFound {
        /// Which entity was missing.
        message: String,
    },

    /// A required precondition, such as a stored GitHub token, is missing.
    #[error("precondition failed: {message}")]
    PreconditionFailed {
        /// Which precondition was not met.
        message: String,
    },

    /// GitHub rejected the stored token.
    #[error("unauthorized: {message}")]
    Unauthorized {
        /// Detail from GitHub.
        message: String,
    },

    /// The token lacks scope or the repository is inaccessible.
    #[error("forbidden: {message}")]
    Forbidden {
        /// Detail from GitHub.
        message: String,
    },

    /// GitHub throttled the request. Callers may retry later.
    #[error("rate limited: {message}")]
    RateLimited {
        /// Rate limit headers, when GitHub sent them.
        rate_limit: Option<RateLimitInfo>,
        /// Detail from GitHub.
        message: String,
    },

    /// GitHub failed in some other way.
    #[error("upstream error: {message}")]
    Upstream {
        /// HTTP status when a response was received.
        status: Option<u16>,
        /// Failure detail.
        message: String,
    },

    /// The local store failed.
    #[error("storage error: {message}")]
    Storage {
        /// Failure detail with operation context.
        message: String,
    },

    /// Configuration was missing or invalid.
    #[error("configuration error: {message}")]
    Configuration {
        /// Failure detail.
        message: String,
    },

    /// Writing output failed.
    #[error("I/O error: {message}")]
    Io {
        /// Failure detail.
        message: String,
    },
}

impl NoteError {
    /// Whether repeating the same request later might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::Upstream { status, .. } => match status {
                Some(code) => *code >= 500,
                None => true,
            },
            _ => false,
        }
    }

    /// Classifies a storage failure. A missing, blank or unmigrated database
    /// is a configuration problem; anything else is a storage failure.
    #[must_use]
    pub fn from_persistence(error: &PersistenceError) -> Self {
        Self::persistence_failure(error, error.to_string())
    }

    fn persistence_failure(error: &PersistenceError, message: String) -> Self {
        match error {
            PersistenceError::MissingDatabaseUrl
            | PersistenceError::BlankDatabaseUrl
            | PersistenceError::SchemaNotInitialised => Self::Configuration { message },
            _ => Self::Storage { message },
        }
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

/// Maps a storage failure, prefixing the operation that failed.
pub(crate) fn map_persistence_error(operation: &str, error: &PersistenceError) -> NoteError {
    NoteError::persistence_failure(error, format!("{operation}: {error}"))
}

/// Maps a gateway failure for `locator` onto the caller-visible taxonomy.
pub(crate) fn map_github_error(locator: &PullRequestLocator, error: GitHubError) -> NoteError {
    match error {
        GitHubError::InvalidUrl(_)
        | GitHubError::MissingRepository
        | GitHubError::InvalidPullRequestNumber
        | GitHubError::MissingToken => NoteError::InvalidArgument {
            message: error.to_string(),
        },
        GitHubError::NotFound { .. } => NoteError::NotFound {
            message: format!(
                "PR {} not found in {}/{}",
                locator.number().get(),
                locator.owner().as_str(),
                locator.repository().as_str()
            ),
        },
        GitHubError::Unauthorized { message } => NoteError::Unauthorized {
            message: format!("fetching {locator}: {message}"),
        },
        GitHubError::Forbidden { message } => NoteError::Forbidden {
            message: format!("fetching {locator}: {message}"),
        },
        GitHubError::RateLimited {
            rate_limit,
            message,
        } => NoteError::RateLimited {
            rate_limit,
            message: format!("fetching {locator}: {message}"),
        },
        GitHubError::Upstream { status, message } => NoteError::Upstream {
            status,
            message: format!("fetching {locator}: {message}"),
        },
    }
}
