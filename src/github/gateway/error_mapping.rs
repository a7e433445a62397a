//! Maps GitHub responses and Octocrab failures onto [`GitHubError`].

use http::{HeaderMap, StatusCode};

use crate::github::error::GitHubError;
use crate::github::rate_limit::RateLimitInfo;

const DEFAULT_UNAUTHORIZED_MESSAGE: &str =
    "GitHub authentication failed; check the token and its scopes (public_repo, read:user)";
const DEFAULT_FORBIDDEN_MESSAGE: &str =
    "the token may lack the required scopes or the repository may be private";
const DEFAULT_RATE_LIMIT_MESSAGE: &str = "please try again later";

/// Checks whether a response represents an exhausted rate limit.
///
/// GitHub signals primary rate limits with 403 plus a zero
/// `X-RateLimit-Remaining` header, and secondary limits with 403 or 429 and a
/// message mentioning the rate limit.
pub(super) fn is_rate_limit_response(
    status: StatusCode,
    rate_limit: Option<RateLimitInfo>,
    message: Option<&str>,
) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    if status != StatusCode::FORBIDDEN {
        return false;
    }

    let quota_exhausted = rate_limit.is_some_and(|info| info.is_exhausted());
    let message_indicates_rate_limit =
        message.is_some_and(|text| text.to_lowercase().contains("rate limit"));

    quota_exhausted || message_indicates_rate_limit
}

/// Classifies a non-2xx response.
pub(super) fn map_http_error(
    status: StatusCode,
    headers: &HeaderMap,
    maybe_message: Option<String>,
) -> GitHubError {
    let rate_limit = RateLimitInfo::from_headers(headers);

    if is_rate_limit_response(status, rate_limit, maybe_message.as_deref()) {
        return GitHubError::RateLimited {
            rate_limit,
            message: maybe_message.unwrap_or_else(|| DEFAULT_RATE_LIMIT_MESSAGE.to_owned()),
        };
    }

    match status {
        StatusCode::NOT_FOUND => GitHubError::NotFound {
            message: maybe_message.unwrap_or_else(|| "Not Found".to_owned()),
        },
        StatusCode::UNAUTHORIZED => GitHubError::Unauthorized {
            message: maybe_message.unwrap_or_else(|| DEFAULT_UNAUTHORIZED_MESSAGE.to_owned()),
        },
        StatusCode::FORBIDDEN => GitHubError::Forbidden {
            message: maybe_message.unwrap_or_else(|| DEFAULT_FORBIDDEN_MESSAGE.to_owned()),
        },
        other => GitHubError::Upstream {
            status: Some(other.as_u16()),
            message: maybe_message.unwrap_or_else(|| "unexpected response".to_owned()),
        },
    }
}

/// Maps an Octocrab error, which covers both GitHub API errors and transport
/// failures.
pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> GitHubError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_http_error(
            source.status_code,
            &HeaderMap::new(),
            Some(format!("{operation} failed: {}", source.message)),
        );
    }

    GitHubError::Upstream {
        status: None,
        message: format!("{operation} failed: {error}"),
    }
}
