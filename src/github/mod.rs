//! GitHub pull request lookup.
//!
//! This module wraps Octocrab to fetch a single pull request with the
//! caller's personal access token. Responses are classified into the failure
//! kinds the note workflow distinguishes (not found, unauthorised, forbidden,
//! rate limited, anything else) without exposing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod rate_limit;

pub use error::GitHubError;
pub use gateway::{DEFAULT_API_BASE, OctocrabGateway, PullRequestGateway};
pub use locator::{
    PersonalAccessToken, PullRequestLocator, PullRequestNumber, RepositoryName, RepositoryOwner,
};
pub use models::PullRequestData;
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::MockPullRequestGateway;

#[cfg(test)]
mod tests;
