//! Octocrab implementation of the pull request gateway.

use std::time::Duration;

use async_trait::async_trait;
use http::Uri;
use url::Url;

use crate::github::error::GitHubError;
use crate::github::locator::{PersonalAccessToken, PullRequestLocator};
use crate::github::models::{ApiPullRequest, PullRequestData};

use super::PullRequestGateway;
use super::client::build_octocrab_client;
use super::error_mapping::{map_http_error, map_octocrab_error};
use super::http_utils::extract_github_message;

/// Public GitHub REST API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Octocrab-backed gateway.
///
/// Credentials belong to the user on whose behalf a note is written, so a
/// client is built per request rather than held by the gateway.
#[derive(Debug, Clone)]
pub struct OctocrabGateway {
    api_base: Url,
    timeout: Duration,
}

impl OctocrabGateway {
    /// Creates a gateway for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::InvalidUrl`] when `api_base` cannot be parsed.
    pub fn new(api_base: &str) -> Result<Self, GitHubError> {
        let parsed =
            Url::parse(api_base.trim()).map_err(|error| GitHubError::InvalidUrl(error.to_string()))?;
        Ok(Self {
            api_base: parsed,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Creates a gateway targeting the public GitHub API.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::InvalidUrl`] if the built-in base URL fails to
    /// parse.
    pub fn public() -> Result<Self, GitHubError> {
        Self::new(DEFAULT_API_BASE)
    }

    /// Overrides the connect and read timeout applied to each request.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// API base URL requests are sent to.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }
}

#[async_trait]
impl PullRequestGateway for OctocrabGateway {
    async fn pull_request(
        &self,
        locator: &PullRequestLocator,
        token: &PersonalAccessToken,
    ) -> Result<PullRequestData, GitHubError> {
        let client = build_octocrab_client(token, &self.api_base, self.timeout)?;
        let uri: Uri = locator
            .pull_request_path()
            .parse::<Uri>()
            .map_err(|error| GitHubError::InvalidUrl(error.to_string()))?;

        let response = client
            ._get_with_headers(uri, None)
            .await
            .map_err(|error| map_octocrab_error("pull request", &error))?;

        let status = response.status();
        let headers = response.headers().clone();

        if !status.is_success() {
            let body = client
                .body_to_string(response)
                .await
                .unwrap_or_else(|_| String::new());
            return Err(map_http_error(status, &headers, extract_github_message(&body)));
        }

        let body = client
            .body_to_string(response)
            .await
            .map_err(|error| GitHubError::Upstream {
                status: Some(status.as_u16()),
                message: format!("pull request response decode failed: {error}"),
            })?;

        let api: ApiPullRequest =
            serde_json::from_str(&body).map_err(|error| GitHubError::Upstream {
                status: Some(status.as_u16()),
                message: format!("pull request response deserialisation failed: {error}"),
            })?;

        Ok(api.into())
    }
}
