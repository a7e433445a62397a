//! Error types exposed by the GitHub pull request gateway.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while validating a pull request reference or fetching it
/// from GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GitHubError {
    /// The API base URL could not be parsed.
    #[error("GitHub API URL is invalid: {0}")]
    InvalidUrl(String),

    /// The repository owner or name was empty.
    #[error("repository owner and name are required")]
    MissingRepository,

    /// The pull request number is not a positive integer.
    #[error("pull request number must be a positive integer")]
    InvalidPullRequestNumber,

    /// The personal access token was blank.
    #[error("GitHub token is required")]
    MissingToken,

    /// GitHub answered 404 for the pull request.
    #[error("GitHub returned 404: {message}")]
    NotFound {
        /// Message returned by GitHub, or a generic description.
        message: String,
    },

    /// GitHub rejected the credential (401).
    #[error("GitHub rejected the token: {message}")]
    Unauthorized {
        /// Message returned by GitHub, or a generic description.
        message: String,
    },

    /// The credential lacks scope or the repository is inaccessible (403).
    #[error("GitHub API access forbidden: {message}")]
    Forbidden {
        /// Message returned by GitHub, or a generic description.
        message: String,
    },

    /// The API rate limit has been exhausted.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimited {
        /// Rate limit headers, when GitHub sent them.
        rate_limit: Option<RateLimitInfo>,
        /// Message returned by GitHub, or a generic description.
        message: String,
    },

    /// Any other non-2xx answer, transport failure or undecodable body.
    #[error("{}", describe_upstream(*status, message))]
    Upstream {
        /// HTTP status when a response was received.
        status: Option<u16>,
        /// Failure detail.
        message: String,
    },
}

fn describe_upstream(status: Option<u16>, message: &str) -> String {
    status.map_or_else(
        || format!("GitHub API request failed: {message}"),
        |code| format!("GitHub API error (status {code}): {message}"),
    )
}
