//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Running Redis instance
//! - Environment variables: DATABASE_URL, REDIS_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use arena_common::RateLimitBackend;
use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, test_config, TestServer,
};
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

/// Register a fresh account and return its tokens
async fn register(server: &TestServer) -> AuthResponse {
    let request = RegisterRequest::unique();
    let response = server.post("/auth/register", &request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

/// Create a challenge owned by `token`'s user
async fn create_challenge(server: &TestServer, token: &str) -> ChallengeResponse {
    let request = CreateChallengeRequest::named("Read daily");
    let response = server.post_auth("/challenges", token, &request).await.unwrap();
    assert_json(response, StatusCode::CREATED).await.unwrap()
}

async fn join(server: &TestServer, token: &str, code: &str) -> reqwest::Response {
    server
        .post_auth("/challenges/join", token, &json!({ "join_code": code }))
        .await
        .unwrap()
}

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_security_headers() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.unwrap();
    let headers = response.headers();

    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "SAMEORIGIN");
    assert!(headers.contains_key("content-security-policy"));
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post("/auth/register", &request).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(auth.user.username, request.username);
    assert_eq!(auth.user.timezone, "UTC");
    assert_eq!(auth.user.total_points, 0);
    assert!(auth.user.has_password);
    assert!(!auth.user.is_admin);
    assert_eq!(auth.token_type, "Bearer");
    assert!(!auth.access_token.is_empty());
    assert!(!auth.refresh_token.is_empty());
}

#[tokio::test]
async fn test_register_duplicate_username() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    server.post("/auth/register", &request).await.unwrap();

    let response = server.post("/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();
}

#[tokio::test]
async fn test_register_short_password() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let mut request = RegisterRequest::unique();
    request.password = "abc".to_string();

    let response = server.post("/auth/register", &request).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_register_form_redirects() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();

    let response = server.post_form("/auth/register", &request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/dashboard");
}

#[tokio::test]
async fn test_login_by_username_and_email() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/auth/register", &request).await.unwrap();

    let response = server.post("/auth/login", &request.login()).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.user.username, request.username);

    let by_email = LoginRequest {
        login_id: request.email.to_uppercase(),
        password: request.password.clone(),
    };
    let response = server.post("/auth/login", &by_email).await.unwrap();
    let auth: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.user.username, request.username);
}

#[tokio::test]
async fn test_login_wrong_password() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let request = RegisterRequest::unique();
    server.post("/auth/register", &request).await.unwrap();

    let login = LoginRequest {
        login_id: request.username.clone(),
        password: "wrongpassword".to_string(),
    };
    let response = server.post("/auth/login", &login).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_current_user() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server.get_auth("/users/@me", &auth.access_token).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.id, auth.user.id);
    assert_eq!(user.initial, auth.user.username[..1].to_uppercase());
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/dashboard").await.unwrap();
    let code = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(code, "MISSING_AUTHORIZATION");
}

#[tokio::test]
async fn test_refresh_rotates_session() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let body = json!({ "refresh_token": auth.refresh_token });
    let response = server.post("/auth/refresh", &body).await.unwrap();
    let refreshed: AuthResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_ne!(refreshed.refresh_token, auth.refresh_token);

    // The old refresh token died with its session
    let response = server.post("/auth/refresh", &body).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    let response = server.get_auth("/users/@me", &refreshed.access_token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_logout_revokes_session() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server
        .post_auth("/auth/logout", &auth.access_token, &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_auth("/users/@me", &auth.access_token).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_google_sign_in_not_configured() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/auth/google").await.unwrap();
    assert_status(response, StatusCode::SERVICE_UNAVAILABLE).await.unwrap();
}

// ============================================================================
// Challenge Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_view_challenge() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;
    let challenge = create_challenge(&server, &auth.access_token).await;

    assert_eq!(challenge.creator_id, auth.user.id);
    assert_eq!(challenge.join_code.len(), 6);
    assert_eq!(challenge.points_per_checkin, 10);
    assert!(!challenge.is_completed);

    let response = server
        .get_auth(&format!("/challenges/{}", challenge.id), &auth.access_token)
        .await
        .unwrap();
    let view: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(view["challenge"]["id"], challenge.id.as_str());
    assert_eq!(view["member_count"], 1);
    assert_eq!(view["checked_in_today"], false);
}

#[tokio::test]
async fn test_create_from_template() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server.get_auth("/challenges/templates", &auth.access_token).await.unwrap();
    let templates: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!templates.is_empty());
    let key = templates[0]["id"].as_str().unwrap().to_string();

    let mut request = CreateChallengeRequest::named("Templated");
    request.template = Some(key);
    let response = server.post_auth("/challenges", &auth.access_token, &request).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
}

#[tokio::test]
async fn test_join_challenge() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = register(&server).await;
    let member = register(&server).await;
    let challenge = create_challenge(&server, &owner.access_token).await;

    // Codes are matched case-insensitively
    let response = join(&server, &member.access_token, &challenge.join_code.to_lowercase()).await;
    let joined: ChallengeResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(joined.id, challenge.id);

    let response = join(&server, &member.access_token, &challenge.join_code).await;
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    let response = server
        .get_auth(&format!("/challenges/{}/leaderboard", challenge.id), &member.access_token)
        .await
        .unwrap();
    let board: Vec<LeaderboardEntry> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(board.len(), 2);
    assert_eq!(board[0].rank, 1);
}

#[tokio::test]
async fn test_join_unknown_code() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = join(&server, &auth.access_token, "QQ0000").await;
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_view_private_challenge_as_outsider() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = register(&server).await;
    let outsider = register(&server).await;
    let challenge = create_challenge(&server, &owner.access_token).await;

    let response = server
        .get_auth(&format!("/challenges/{}", challenge.id), &outsider.access_token)
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_invalid_challenge_id() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server.get_auth("/challenges/not-a-number", &auth.access_token).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Check-in Tests
// ============================================================================

#[tokio::test]
async fn test_checkin_once_per_day() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;
    let challenge = create_challenge(&server, &auth.access_token).await;
    let path = format!("/challenges/{}/checkins", challenge.id);

    let response = server
        .post_auth(&path, &auth.access_token, &json!({ "note": "chapter one" }))
        .await
        .unwrap();
    let result: CheckinResult = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(result.success);
    assert_eq!(result.new_streak, 1);
    assert_eq!(result.points_earned, 10);
    assert!(result.achievements_earned.iter().any(|name| name == "First Check-in"));

    let response = server.post_auth(&path, &auth.access_token, &json!({})).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    let response = server.get_auth("/users/@me", &auth.access_token).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.total_points, 10);
}

#[tokio::test]
async fn test_checkin_requires_membership() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = register(&server).await;
    let outsider = register(&server).await;
    let challenge = create_challenge(&server, &owner.access_token).await;

    let response = server
        .post_auth(&format!("/challenges/{}/checkins", challenge.id), &outsider.access_token, &json!({}))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

#[tokio::test]
async fn test_photo_required_without_photo() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let mut request = CreateChallengeRequest::named("Gym");
    request.verification_type = Some("photo_required".to_string());
    let response = server.post_auth("/challenges", &auth.access_token, &request).await.unwrap();
    let challenge: ChallengeResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let form = reqwest::multipart::Form::new().text("note", "leg day");
    let response = server
        .post_multipart_auth(&format!("/challenges/{}/checkins", challenge.id), &auth.access_token, form)
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

// ============================================================================
// Social Tests
// ============================================================================

#[tokio::test]
async fn test_reaction_toggle() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = register(&server).await;
    let member = register(&server).await;
    let challenge = create_challenge(&server, &owner.access_token).await;
    join(&server, &member.access_token, &challenge.join_code).await;

    let response = server
        .post_auth(&format!("/challenges/{}/checkins", challenge.id), &owner.access_token, &json!({}))
        .await
        .unwrap();
    let checkin: CheckinResult = assert_json(response, StatusCode::CREATED).await.unwrap();

    let path = format!("/challenges/{}/reactions", challenge.id);
    let body = json!({ "checkin_id": checkin.checkin_id, "reaction": "&#128293;" });

    let response = server.post_auth(&path, &member.access_token, &body).await.unwrap();
    let toggled: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(toggled["toggled"], true);
    assert_eq!(toggled["count"], 1);

    let response = server.post_auth(&path, &member.access_token, &body).await.unwrap();
    let toggled: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(toggled["toggled"], false);
    assert_eq!(toggled["count"], 0);

    let bad = json!({ "checkin_id": checkin.checkin_id, "reaction": "<script>" });
    let response = server.post_auth(&path, &member.access_token, &bad).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_comment() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;
    let challenge = create_challenge(&server, &auth.access_token).await;
    let path = format!("/challenges/{}/comments", challenge.id);

    let response = server
        .post_auth(&path, &auth.access_token, &json!({ "message": "  Day one done  " }))
        .await
        .unwrap();
    let comment: Value = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(comment["message"], "Day one done");

    let response = server
        .post_auth(&path, &auth.access_token, &json!({ "message": "x".repeat(501) }))
        .await
        .unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_nudge_flow() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = register(&server).await;
    let member = register(&server).await;
    let challenge = create_challenge(&server, &owner.access_token).await;
    join(&server, &member.access_token, &challenge.join_code).await;

    let self_nudge = format!("/challenges/{}/nudges/{}", challenge.id, owner.user.id);
    let response = server.post_xhr_auth(&self_nudge, &owner.access_token).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();

    let nudge = format!("/challenges/{}/nudges/{}", challenge.id, member.user.id);
    let response = server.post_xhr_auth(&nudge, &owner.access_token).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.post_xhr_auth(&nudge, &owner.access_token).await.unwrap();
    assert_status(response, StatusCode::CONFLICT).await.unwrap();

    let response = server.get_auth("/notifications/unread-count", &member.access_token).await.unwrap();
    let count: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(count["count"], 1);

    let response = server.get_auth("/notifications", &member.access_token).await.unwrap();
    let notifications: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["kind"], "nudge");
    assert_eq!(notifications[0]["is_read"], false);

    // Listing marks everything read
    let response = server.get_auth("/notifications/unread-count", &member.access_token).await.unwrap();
    let count: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(count["count"], 0);
}

#[tokio::test]
async fn test_join_notifies_owner() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let owner = register(&server).await;
    let member = register(&server).await;
    let challenge = create_challenge(&server, &owner.access_token).await;
    join(&server, &member.access_token, &challenge.join_code).await;

    let response = server.get_auth("/notifications", &owner.access_token).await.unwrap();
    let notifications: Vec<Value> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(notifications.iter().any(|n| n["kind"] == "challenge_activity"));
}

// ============================================================================
// Profile Tests
// ============================================================================

#[tokio::test]
async fn test_achievements_after_create() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;
    create_challenge(&server, &auth.access_token).await;

    let response = server.get_auth("/achievements", &auth.access_token).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["total_count"], 9);
    let creator = body["achievements"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["name"] == "Challenge Creator")
        .cloned()
        .unwrap();
    assert_eq!(creator["earned"], true);
}

#[tokio::test]
async fn test_update_profile() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let body = json!({ "display_name": "Reader", "timezone": "Asia/Seoul" });
    let response = server.patch_auth("/profile", &auth.access_token, &body).await.unwrap();
    let user: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(user.display_name, "Reader");
    assert_eq!(user.timezone, "Asia/Seoul");

    let body = json!({ "display_name": "Reader", "timezone": "Mars/Olympus" });
    let response = server.patch_auth("/profile", &auth.access_token, &body).await.unwrap();
    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}

#[tokio::test]
async fn test_profile_overview() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server.get_auth("/profile", &auth.access_token).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["user"]["id"], auth.user.id.as_str());
    assert!(body["calendar_days"].is_array());
}

#[tokio::test]
async fn test_dashboard() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;
    create_challenge(&server, &auth.access_token).await;

    let response = server.get_auth("/dashboard", &auth.access_token).await.unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["challenges"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["today_total"], 1);
    assert_eq!(body["today_done"], 0);
}

// ============================================================================
// Admin Tests
// ============================================================================

#[tokio::test]
async fn test_admin_delete_requires_admin() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let auth = register(&server).await;

    let response = server.delete_auth("/admin/checkins/1", &auth.access_token).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Rate Limit Tests
// ============================================================================

#[tokio::test]
async fn test_login_rate_limited() {
    if !check_test_env().await {
        return;
    }

    let mut config = test_config().unwrap();
    config.rate_limit.backend = RateLimitBackend::Memory;
    let server = TestServer::start_with_config(config).await.expect("Failed to start server");

    let login = LoginRequest {
        login_id: format!("nobody{}", unique_suffix()),
        password: "password123".to_string(),
    };

    for _ in 0..5 {
        let response = server.post("/auth/login", &login).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let response = server.post("/auth/login", &login).await.unwrap();
    let code = assert_error(response, StatusCode::TOO_MANY_REQUESTS).await.unwrap();
    assert_eq!(code, "RATE_LIMIT_EXCEEDED");
}
