//! Unit tests for the github_client crate.

use super::*; // Import items from lib.rs
use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// --- Test Constants ---
const TEST_OWNER: &str = "octocat";
const TEST_REPO: &str = "pictures";
const TEST_TOKEN: &str = "ghp_test_token";

fn test_session() -> Session {
    Session::new(TEST_OWNER, TEST_REPO, TEST_TOKEN)
}

fn file_entry_json(name: &str, sha: &str) -> serde_json::Value {
    json!({
        "name": name,
        "path": format!("images/{name}"),
        "sha": sha,
        "size": 1024,
        "type": "file",
        "download_url": format!("https://raw.githubusercontent.com/{TEST_OWNER}/{TEST_REPO}/main/images/{name}")
    })
}

fn commit_json(content: Option<serde_json::Value>) -> serde_json::Value {
    json!({
        "content": content,
        "commit": {
            "sha": "7638417db6d59f3c431d3e1f261cc637155684cd",
            "message": "test commit"
        }
    })
}

#[tokio::test]
async fn test_verify_access_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}")))
        .and(bearer_token(TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 123456,
            "name": TEST_REPO,
            "full_name": format!("{TEST_OWNER}/{TEST_REPO}"),
            "private": false,
            "default_branch": "main"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_uri(mock_server.uri());

    let result = client.verify_access(&test_session()).await;

    if let Err(e) = &result {
        eprintln!("verify_access error: {e:?}");
    }
    let repository = result.expect("access should be verified");
    assert_eq!(repository.full_name(), "octocat/pictures");
}

#[tokio::test]
async fn test_verify_access_unauthorized_maps_to_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}")))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_uri(mock_server.uri());

    let result = client.verify_access(&test_session()).await;

    match result {
        Err(Error::AuthError(msg)) => {
            assert_eq!(msg, errors::INVALID_CREDENTIALS_MESSAGE);
        }
        other => panic!("Expected AuthError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_verify_access_missing_repository_maps_to_auth_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest/repos/repos#get-a-repository"
        })))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_uri(mock_server.uri());

    let result = client.verify_access(&test_session()).await;

    assert!(
        matches!(result, Err(Error::AuthError(ref msg)) if msg == errors::INVALID_CREDENTIALS_MESSAGE)
    );
}

#[tokio::test]
async fn test_list_folder_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/contents/images")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            file_entry_json("100_b.png", "sha-b"),
            file_entry_json("200_a.png", "sha-a"),
            {
                "name": "thumbs",
                "path": "images/thumbs",
                "sha": "sha-dir",
                "size": 0,
                "type": "dir",
                "download_url": null
            }
        ])))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_uri(mock_server.uri());

    let entries = client
        .list_folder(&test_session(), "images")
        .await
        .expect("listing should succeed");

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].name, "100_b.png");
    assert_eq!(entries[0].sha, "sha-b");
    assert_eq!(entries[2].entry_type, EntryType::Dir);
}

#[tokio::test]
async fn test_list_folder_missing_folder_returns_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/contents/images")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Not Found",
            "documentation_url": "https://docs.github.com/rest/repos/contents#get-repository-content"
        })))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_uri(mock_server.uri());

    let result = client.list_folder(&test_session(), "images").await;

    assert!(matches!(result, Err(Error::NotFound)));
}

#[tokio::test]
async fn test_list_folder_server_error_carries_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/contents/images")))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "Server Error"
        })))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_uri(mock_server.uri());

    let result = client.list_folder(&test_session(), "images").await;

    match result {
        Err(Error::ApiError(msg)) => assert_eq!(msg, "Server Error"),
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_list_folder_rate_limited() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/repos/{TEST_OWNER}/{TEST_REPO}/contents/images")))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({
                    "message": "API rate limit exceeded for user",
                    "documentation_url": "https://docs.github.com/rest/overview/resources-in-the-rest-api#rate-limiting"
                }))
                .insert_header("X-RateLimit-Remaining", "0"),
        )
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_uri(mock_server.uri());

    let result = client.list_folder(&test_session(), "images").await;

    assert!(matches!(result, Err(Error::RateLimitExceeded)));
}

#[tokio::test]
async fn test_put_file_sends_message_content_and_branch() {
    let mock_server = MockServer::start().await;
    let file_path = "images/1700000000000_cat.png";

    Mock::given(method("PUT"))
        .and(path(format!(
            "/repos/{TEST_OWNER}/{TEST_REPO}/contents/{file_path}"
        )))
        .and(body_json(json!({
            "message": "Add image: 1700000000000_cat.png",
            "content": "aGVsbG8=",
            "branch": "gallery"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(commit_json(Some(
            file_entry_json("1700000000000_cat.png", "new-sha"),
        ))))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_uri(mock_server.uri());
    let session = test_session().with_branch("gallery");

    let result = client
        .put_file(
            &session,
            file_path,
            "aGVsbG8=",
            "Add image: 1700000000000_cat.png",
        )
        .await;

    if let Err(e) = &result {
        eprintln!("put_file error: {e:?}");
    }
    let commit = result.expect("upload should succeed");
    assert_eq!(
        commit.content.map(|c| c.sha),
        Some("new-sha".to_string())
    );
}

#[tokio::test]
async fn test_put_file_rejected_carries_server_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!(
            "/repos/{TEST_OWNER}/{TEST_REPO}/contents/images/1_a.png"
        )))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Invalid request.\n\n\"sha\" wasn't supplied.",
            "documentation_url": "https://docs.github.com/rest/repos/contents#create-or-update-file-contents"
        })))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_uri(mock_server.uri());

    let result = client
        .put_file(&test_session(), "images/1_a.png", "aGVsbG8=", "Add image: 1_a.png")
        .await;

    match result {
        Err(Error::ApiError(msg)) => assert!(msg.contains("\"sha\" wasn't supplied")),
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_put_file_server_error_is_sent_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!(
            "/repos/{TEST_OWNER}/{TEST_REPO}/contents/images/1_a.png"
        )))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "message": "boom"
        })))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_uri(mock_server.uri());

    let result = client
        .put_file(&test_session(), "images/1_a.png", "aGVsbG8=", "Add image: 1_a.png")
        .await;

    assert!(matches!(result, Err(Error::ApiError(ref msg)) if msg == "boom"));
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "a failed upload must not be re-sent");
}

#[tokio::test]
async fn test_put_file_rate_limited_is_sent_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path(format!(
            "/repos/{TEST_OWNER}/{TEST_REPO}/contents/images/1_a.png"
        )))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({
                    "message": "API rate limit exceeded for user"
                }))
                .insert_header("X-RateLimit-Remaining", "0"),
        )
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_uri(mock_server.uri());

    let result = client
        .put_file(&test_session(), "images/1_a.png", "aGVsbG8=", "Add image: 1_a.png")
        .await;

    assert!(matches!(result, Err(Error::RateLimitExceeded)));
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "a rate limited upload must not be re-sent");
}

#[tokio::test]
async fn test_delete_file_sends_sha_and_branch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!(
            "/repos/{TEST_OWNER}/{TEST_REPO}/contents/images/200_a.png"
        )))
        .and(body_json(json!({
            "message": "Delete image: 200_a.png",
            "sha": "sha-a",
            "branch": "main"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(commit_json(None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_uri(mock_server.uri());

    let result = client
        .delete_file(
            &test_session(),
            "images/200_a.png",
            "sha-a",
            "Delete image: 200_a.png",
        )
        .await;

    if let Err(e) = &result {
        eprintln!("delete_file error: {e:?}");
    }
    assert!(result.expect("delete should succeed").content.is_none());
}

#[tokio::test]
async fn test_delete_file_with_stale_sha_returns_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!(
            "/repos/{TEST_OWNER}/{TEST_REPO}/contents/images/200_a.png"
        )))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "message": "images/200_a.png does not match sha-stale",
            "documentation_url": "https://docs.github.com/rest/repos/contents#delete-a-file"
        })))
        .mount(&mock_server)
        .await;

    let client = GitHubClient::with_base_uri(mock_server.uri());

    let result = client
        .delete_file(
            &test_session(),
            "images/200_a.png",
            "sha-stale",
            "Delete image: 200_a.png",
        )
        .await;

    match result {
        Err(Error::ApiError(msg)) => {
            assert_eq!(msg, "images/200_a.png does not match sha-stale")
        }
        other => panic!("Expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    // Port 1 on localhost is reserved and nothing listens there
    let client = GitHubClient::with_base_uri("http://127.0.0.1:1");

    let result = client.list_folder(&test_session(), "images").await;

    assert!(
        matches!(result, Err(Error::Network(_))),
        "Expected Network error, got {result:?}"
    );
}

#[test]
fn test_default_client_targets_public_api() {
    let client = GitHubClient::new();

    assert_eq!(client.base_uri(), GITHUB_API_URL);
}

#[test]
fn test_contents_route_strips_leading_slash() {
    let session = test_session();

    assert_eq!(
        contents_route(&session, "/images/1_a.png"),
        "/repos/octocat/pictures/contents/images/1_a.png"
    );
}
