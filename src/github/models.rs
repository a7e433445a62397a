//! Pull request data returned by the GitHub API.
//!
//! `ApiPullRequest` is the deserialisation target for the REST payload and
//! converts into the public [`PullRequestData`].

use serde::Deserialize;

/// Remote pull request fields mirrored into local storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestData {
    /// Pull request number as reported by GitHub.
    pub number: u64,
    /// Title of the pull request.
    pub title: String,
    /// Description body, empty when GitHub returns none.
    pub body: String,
    /// Author login.
    pub author: String,
    /// Lifecycle state (`open`, `closed`).
    pub state: String,
    /// Canonical HTML URL.
    pub html_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiPullRequest {
    pub(super) number: u64,
    pub(super) title: Option<String>,
    pub(super) body: Option<String>,
    pub(super) state: Option<String>,
    pub(super) html_url: Option<String>,
    pub(super) user: Option<ApiUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
}

impl From<ApiPullRequest> for PullRequestData {
    fn from(value: ApiPullRequest) -> Self {
        Self {
            number: value.number,
            title: value.title.unwrap_or_default(),
            body: value.body.unwrap_or_default(),
            author: value
                .user
                .and_then(|user| user.login)
                .unwrap_or_default(),
            state: value.state.unwrap_or_default(),
            html_url: value.html_url.unwrap_or_default(),
        }
    }
}
