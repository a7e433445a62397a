//! Gateways for loading pull requests through Octocrab.
//!
//! The trait-based design lets the resolver run against a mock in tests while
//! the Octocrab implementation performs real HTTP requests.

mod client;
mod error_mapping;
mod http_utils;
mod pull_request;

pub use pull_request::{DEFAULT_API_BASE, OctocrabGateway};

use async_trait::async_trait;

use crate::github::error::GitHubError;
use crate::github::locator::{PersonalAccessToken, PullRequestLocator};
use crate::github::models::PullRequestData;

/// Remote lookup of a single pull request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PullRequestGateway: Send + Sync {
    /// Fetch pull request metadata using the caller's credential.
    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
        token: &PersonalAccessToken,
    ) -> Result<PullRequestData, GitHubError>;
}
