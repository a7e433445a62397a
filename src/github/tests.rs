//! Unit tests for locator validation and the Octocrab gateway.

use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::{
    GitHubError, OctocrabGateway, PersonalAccessToken, PullRequestData, PullRequestGateway,
    PullRequestLocator, RateLimitInfo,
};

fn locator() -> PullRequestLocator {
    PullRequestLocator::new("acme", "widgets", 42).expect("locator should build")
}

fn token() -> PersonalAccessToken {
    PersonalAccessToken::new("ghp_example").expect("token should build")
}

fn gateway_for(server: &MockServer) -> OctocrabGateway {
    OctocrabGateway::new(&server.uri()).expect("gateway should build")
}

#[rstest]
#[case::blank_owner("  ", "widgets", 1, GitHubError::MissingRepository)]
#[case::blank_repo("acme", "", 1, GitHubError::MissingRepository)]
#[case::zero_number("acme", "widgets", 0, GitHubError::InvalidPullRequestNumber)]
fn locator_rejects_invalid_parts(
    #[case] owner: &str,
    #[case] repo: &str,
    #[case] number: u64,
    #[case] expected: GitHubError,
) {
    assert_eq!(PullRequestLocator::new(owner, repo, number), Err(expected));
}

#[rstest]
fn locator_trims_and_formats() {
    let parsed = PullRequestLocator::new(" acme ", "widgets ", 7).expect("locator should build");
    assert_eq!(parsed.owner().as_str(), "acme");
    assert_eq!(parsed.repository().as_str(), "widgets");
    assert_eq!(parsed.to_string(), "acme/widgets#7");
    assert_eq!(parsed.pull_request_path(), "/repos/acme/widgets/pulls/7");
}

#[rstest]
fn blank_token_is_rejected() {
    let result = PersonalAccessToken::new(" \t ");
    assert!(
        matches!(result, Err(GitHubError::MissingToken)),
        "expected MissingToken, got {result:?}"
    );
}

#[rstest]
fn token_debug_output_is_redacted() {
    assert_eq!(format!("{:?}", token()), "PersonalAccessToken(<redacted>)");
}

#[rstest]
fn gateway_rejects_invalid_base_url() {
    let result = OctocrabGateway::new("not a url");
    assert!(
        matches!(result, Err(GitHubError::InvalidUrl(_))),
        "expected InvalidUrl, got {result:?}"
    );
}

#[tokio::test]
async fn gateway_fetches_pull_request_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/pulls/42"))
        .and(header("authorization", "Bearer ghp_example"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 42,
            "title": "Add widget",
            "body": null,
            "state": "open",
            "html_url": "https://github.com/acme/widgets/pull/42",
            "user": { "login": "alice" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let data = gateway
        .pull_request(&locator(), &token())
        .await
        .expect("fetch should succeed");

    assert_eq!(
        data,
        PullRequestData {
            number: 42,
            title: "Add widget".to_owned(),
            body: String::new(),
            author: "alice".to_owned(),
            state: "open".to_owned(),
            html_url: "https://github.com/acme/widgets/pull/42".to_owned(),
        }
    );
}

#[tokio::test]
async fn gateway_maps_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/pulls/42"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let result = gateway_for(&server)
        .pull_request(&locator(), &token())
        .await;

    assert_eq!(
        result,
        Err(GitHubError::NotFound {
            message: "Not Found".to_owned(),
        })
    );
}

#[tokio::test]
async fn gateway_maps_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/pulls/42"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
        )
        .mount(&server)
        .await;

    let result = gateway_for(&server)
        .pull_request(&locator(), &token())
        .await;

    assert_eq!(
        result,
        Err(GitHubError::Unauthorized {
            message: "Bad credentials".to_owned(),
        })
    );
}

#[tokio::test]
async fn gateway_maps_primary_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/pulls/42"))
        .respond_with(
            ResponseTemplate::new(403)
                .insert_header("x-ratelimit-limit", "5000")
                .insert_header("x-ratelimit-remaining", "0")
                .insert_header("x-ratelimit-reset", "1700000000")
                .set_body_json(json!({"message": "API rate limit exceeded for user ID 1."})),
        )
        .mount(&server)
        .await;

    let result = gateway_for(&server)
        .pull_request(&locator(), &token())
        .await;

    assert_eq!(
        result,
        Err(GitHubError::RateLimited {
            rate_limit: Some(RateLimitInfo::new(5000, 0, 1_700_000_000)),
            message: "API rate limit exceeded for user ID 1.".to_owned(),
        })
    );
}

#[tokio::test]
async fn gateway_maps_server_errors_to_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/pulls/42"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;

    let result = gateway_for(&server)
        .pull_request(&locator(), &token())
        .await;

    assert_eq!(
        result,
        Err(GitHubError::Upstream {
            status: Some(503),
            message: "unexpected response".to_owned(),
        })
    );
}

#[tokio::test]
async fn gateway_reports_undecodable_body_as_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/acme/widgets/pulls/42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = gateway_for(&server)
        .pull_request(&locator(), &token())
        .await;

    assert!(
        matches!(result, Err(GitHubError::Upstream { status: Some(200), .. })),
        "expected Upstream with status 200, got {result:?}"
    );
}
