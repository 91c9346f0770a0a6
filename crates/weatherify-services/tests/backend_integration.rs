//! Integration tests for BackendClient and PlaylistRequester using wiremock.

use std::sync::Arc;

use weatherify_services::{BackendClient, BackendError, PlaylistError, PlaylistRequester};
use weatherify_weather::Mood;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_session_status_logged_in() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/spotify/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "loggedIn": true,
            "userDisplayName": "Ada"
        })))
        .mount(&mock_server)
        .await;

    let client = BackendClient::new(&mock_server.uri(), None).unwrap();
    let status = client.session_status().await.unwrap();

    assert!(status.logged_in);
    assert_eq!(status.user_display_name.as_deref(), Some("Ada"));
}

#[tokio::test]
async fn test_session_cookie_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/spotify/status"))
        .and(header("cookie", "JSESSIONID=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "loggedIn": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BackendClient::new(&mock_server.uri(), Some("JSESSIONID=abc123")).unwrap();
    let status = client.session_status().await.unwrap();

    assert!(status.logged_in);
}

#[tokio::test]
async fn test_cookie_added_after_login_is_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/spotify/status"))
        .and(header("cookie", "JSESSIONID=fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "loggedIn": true
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/spotify/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "loggedIn": false
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BackendClient::new(&mock_server.uri(), None).unwrap();
    assert!(!client.session_status().await.unwrap().logged_in);

    assert_eq!(client.add_session_cookie("JSESSIONID=fresh"), 1);
    assert!(client.session_status().await.unwrap().logged_in);
}

#[tokio::test]
async fn test_session_status_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/spotify/status"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = BackendClient::new(&mock_server.uri(), None).unwrap();
    let result = client.session_status().await;

    assert!(matches!(
        result,
        Err(BackendError::Status {
            status: 500,
            message: None
        })
    ));
}

#[tokio::test]
async fn test_session_status_malformed_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/spotify/status"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = BackendClient::new(&mock_server.uri(), None).unwrap();
    let result = client.session_status().await;

    assert!(matches!(result, Err(BackendError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_logout_success_and_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/spotify/logout"))
        .respond_with(ResponseTemplate::new(200))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/auth/spotify/logout"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = BackendClient::new(&mock_server.uri(), None).unwrap();

    assert!(client.logout().await.is_ok());
    let second = client.logout().await;
    assert_eq!(second.err().and_then(|e| e.status()), Some(503));
}

#[tokio::test]
async fn test_generate_playlist_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/playlist/generate"))
        .and(body_json(serde_json::json!({"weather": "cloudy"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "playlistUrl": "https://example/playlist/1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let backend = Arc::new(BackendClient::new(&mock_server.uri(), None).unwrap());
    let requester = PlaylistRequester::new(backend);
    let link = requester.generate(Mood::Cloudy).await.unwrap();

    assert_eq!(link.as_str(), "https://example/playlist/1");
}

#[tokio::test]
async fn test_generate_playlist_rejected_with_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/playlist/generate"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "message": "User is not logged in."
        })))
        .mount(&mock_server)
        .await;

    let backend = Arc::new(BackendClient::new(&mock_server.uri(), None).unwrap());
    let requester = PlaylistRequester::new(backend);
    let err = requester.generate(Mood::Sunny).await.unwrap_err();

    assert!(matches!(err, PlaylistError::Rejected { status: 400, .. }));
    assert_eq!(err.user_message(), "User is not logged in.");
}

#[tokio::test]
async fn test_generate_playlist_rejected_without_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/playlist/generate"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let backend = Arc::new(BackendClient::new(&mock_server.uri(), None).unwrap());
    let requester = PlaylistRequester::new(backend);
    let err = requester.generate(Mood::Rainy).await.unwrap_err();

    assert_eq!(err.user_message(), "Failed to create playlist.");
}

#[tokio::test]
async fn test_generate_with_unknown_mood_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let backend = Arc::new(BackendClient::new(&mock_server.uri(), None).unwrap());
    let requester = PlaylistRequester::new(backend);
    let err = requester.generate(Mood::Unknown).await.unwrap_err();

    assert!(matches!(err, PlaylistError::NotReady));
    assert_eq!(err.user_message(), "Weather data not ready yet, please try again.");
}

#[tokio::test]
async fn test_generate_connection_refused() {
    // Bind then drop a listener so nothing is accepting on the port.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let backend = Arc::new(BackendClient::new(&uri, None).unwrap());
    let requester = PlaylistRequester::new(backend);
    let err = requester.generate(Mood::Sunny).await.unwrap_err();

    assert!(matches!(err, PlaylistError::Failed(BackendError::Network(_))));
    assert_eq!(
        err.user_message(),
        "An error occurred while generating the playlist."
    );
}
