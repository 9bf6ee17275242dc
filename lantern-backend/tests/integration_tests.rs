use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use http_body_util::BodyExt;
use lantern_backend::{HttpLimits, create_app};
use lantern_core::{ReferenceZone, ServerStatus, SessionTracker, Snapshot, StatusBoard};
use serde_json::{Value, json};
use tower::ServiceExt;
// for `oneshot` method

/// 12:00 Berlin winter time
fn noon() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 11, 0, 0).unwrap()
}

fn online(players: &[&str]) -> Snapshot {
    Snapshot::new(ServerStatus::Online, "Survival", players.iter().copied())
}

/// Helper to create app without rate limiting (oneshot requests carry no peer address)
fn create_test_app(board: StatusBoard) -> axum::Router {
    create_app(board, ReferenceZone::default(), HttpLimits::default(), None)
}

/// Helper to build a board that has seen a short play session
fn board_with_activity() -> StatusBoard {
    let board = StatusBoard::new();
    let mut tracker = SessionTracker::new(ReferenceZone::default());
    board.publish(tracker.tick(&online(&["Steve"]), noon()));
    board.publish(tracker.tick(&online(&["Steve", "Alex"]), noon() + TimeDelta::minutes(10)));
    board.publish(tracker.tick(&online(&["Alex"]), noon() + TimeDelta::minutes(30)));
    board
}

/// Helper to send a request and get response
async fn send_request(app: axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .method(method)
        .body(Body::empty())
        .unwrap();

    // Send request
    let response = app.oneshot(request).await.unwrap();

    // Extract status
    let status = response.status();

    // Extract body
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();

    // Try to parse as JSON, or return empty object
    let json = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(json!({}))
    };

    (status, json)
}

// =============================================================================
// HEALTH AND DASHBOARD
// =============================================================================

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    // GIVEN: A running application
    let app = create_test_app(StatusBoard::new());

    // WHEN: Making a GET request to /health
    let (status, _body) = send_request(app, "GET", "/health").await;

    // THEN: Should return 200 OK
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_health_endpoint_with_post_method() {
    // GIVEN: A running application
    let app = create_test_app(StatusBoard::new());

    // WHEN: Making a POST request to /health (wrong method)
    let (status, _body) = send_request(app, "POST", "/health").await;

    // THEN: Should return 405 Method Not Allowed
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_dashboard_serves_html() {
    // GIVEN: A running application
    let app = create_test_app(StatusBoard::new());

    // WHEN: Requesting the dashboard
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    // THEN: Should return HTML that polls the JSON API
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("/api/online"));
}

// =============================================================================
// /api/online
// =============================================================================

#[tokio::test]
async fn test_online_before_first_tick() {
    // GIVEN: Nothing has been polled yet
    let app = create_test_app(StatusBoard::new());

    // WHEN: Requesting the live status
    let (status, body) = send_request(app, "GET", "/api/online").await;

    // THEN: Should return the not-started view
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unknown");
    assert_eq!(body["status_text"], "Unknown");
    assert_eq!(body["color"], "#95a5a6");
    assert_eq!(body["players"], json!([]));
    assert_eq!(body["sessions"], json!([]));
    assert_eq!(body["uptime"], "–");
    assert_eq!(body["uptime_seconds"], Value::Null);
    assert_eq!(body["last_update"], Value::Null);
}

#[tokio::test]
async fn test_online_reports_players_and_sessions() {
    // GIVEN: Steve played from 12:00 to 12:30 and Alex is still online since 12:10
    let app = create_test_app(board_with_activity());

    // WHEN: Requesting the live status
    let (status, body) = send_request(app, "GET", "/api/online").await;

    // THEN: Should describe the current state
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "online");
    assert_eq!(body["status_text"], "Online");
    assert_eq!(body["color"], "#2ecc71");
    assert_eq!(body["server_name"], "Survival");
    assert_eq!(body["players"], json!(["Alex"]));
    assert_eq!(body["uptime"], "0h 30m");
    assert_eq!(body["uptime_seconds"], 1800);
    assert_eq!(body["last_update"], "12:30:00 CET");

    // AND: Sessions in first-seen order
    let sessions = body["sessions"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);

    let steve = &sessions[0];
    assert_eq!(steve["player"], "Steve");
    assert_eq!(steve["online"], false);
    assert_eq!(steve["summary"], "12:00–12:30");
    assert_eq!(steve["total_seconds"], 1800);
    assert_eq!(steve["sessions"][0]["start"], "2024-01-10T12:00:00+01:00");
    assert_eq!(steve["sessions"][0]["end"], "2024-01-10T12:30:00+01:00");

    let alex = &sessions[1];
    assert_eq!(alex["player"], "Alex");
    assert_eq!(alex["online"], true);
    assert_eq!(alex["summary"], "12:10–…");
    assert_eq!(alex["sessions"][0]["end"], Value::Null);
    assert_eq!(alex["total"], "0h 20m");
}

#[tokio::test]
async fn test_online_is_stable_between_ticks() {
    // GIVEN: A board with a published view
    let board = board_with_activity();

    // WHEN: Requesting the status twice without a tick in between
    let (_, first) = send_request(create_test_app(board.clone()), "GET", "/api/online").await;
    let (_, second) = send_request(create_test_app(board), "GET", "/api/online").await;

    // THEN: Both responses are identical
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_online_follows_new_ticks() {
    // GIVEN: A board and an app reading from it
    let board = StatusBoard::new();
    let mut tracker = SessionTracker::new(ReferenceZone::default());
    board.publish(tracker.tick(&online(&["Steve"]), noon()));

    // WHEN: The server goes offline on the next tick
    let offline = Snapshot::new(ServerStatus::Offline, "Survival", Vec::<String>::new());
    board.publish(tracker.tick(&offline, noon() + TimeDelta::minutes(5)));
    let (_, body) = send_request(create_test_app(board), "GET", "/api/online").await;

    // THEN: Uptime is gone and Steve's session is closed
    assert_eq!(body["status"], "offline");
    assert_eq!(body["uptime"], "–");
    assert_eq!(body["players"], json!([]));
    assert_eq!(body["sessions"][0]["summary"], "12:00–12:05");
}

// =============================================================================
// /api/players/{name}
// =============================================================================

#[tokio::test]
async fn test_player_activity_found() {
    // GIVEN: Steve has played today
    let app = create_test_app(board_with_activity());

    // WHEN: Requesting Steve's activity
    let (status, body) = send_request(app, "GET", "/api/players/Steve").await;

    // THEN: Should return his sessions
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player"], "Steve");
    assert_eq!(body["total_seconds"], 1800);
    assert_eq!(body["sessions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_player_activity_not_found() {
    // GIVEN: Notch has not played today
    let app = create_test_app(board_with_activity());

    // WHEN: Requesting Notch's activity
    let (status, body) = send_request(app, "GET", "/api/players/Notch").await;

    // THEN: Should return 404 with a JSON error
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("not been online"));
    assert!(body["details"].as_str().unwrap().contains("Notch"));
}

#[tokio::test]
async fn test_player_activity_for_bedrock_name() {
    // GIVEN: A Bedrock player joined through a proxy that prefixes names with '.'
    let board = StatusBoard::new();
    let mut tracker = SessionTracker::new(ReferenceZone::default());
    board.publish(tracker.tick(&online(&[".BedrockGuy"]), noon()));
    let app = create_test_app(board);

    // WHEN: Looking the player up by the name /api/online reports
    let (status, body) = send_request(app, "GET", "/api/players/.BedrockGuy").await;

    // THEN: Should return the open session, not a validation error
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["player"], ".BedrockGuy");
    assert_eq!(body["online"], true);
    assert_eq!(body["summary"], "12:00–…");
}

#[tokio::test]
async fn test_player_activity_invalid_name() {
    // GIVEN: A running application
    let app = create_test_app(board_with_activity());

    // WHEN: Requesting a name longer than any player name
    let uri = format!("/api/players/{}", "a".repeat(33));
    let (status, body) = send_request(app, "GET", &uri).await;

    // THEN: Should return 400 with the validation message
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error_msg = body["error"].as_str().unwrap();
    assert!(
        error_msg.contains("too long") || error_msg.contains("32"),
        "Error should mention length limit: {}",
        error_msg
    );
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_unknown_route() {
    let app = create_test_app(StatusBoard::new());
    let (status, _body) = send_request(app, "GET", "/api/offline").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
