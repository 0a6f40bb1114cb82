use anyhow::Result;
use axum::body::Body;
use axum::routing::{get, post};
use axum::Router;
use coursenew_api::config::Config;
use coursenew_api::routes::build_router;
use coursenew_api::server::Server;
use coursenew_api::state::AppState;
use http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

// ─── Test helpers ───────────────────────────────────────────────────────

fn seeded_app() -> Router {
    build_router(AppState::from_config(Config::default()))
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    Ok((status, body_json(response).await))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ─── Read ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_returns_seeded_users() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(&app, empty_request(Method::GET, "/api/users")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Users retrieved successfully");

    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 3);
    assert_eq!(
        users[0],
        json!({
            "id": "1",
            "email": "john.doe@example.com",
            "name": "John Doe",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-15T00:00:00.000Z",
        })
    );
    assert_eq!(users[2]["name"], "Bob Wilson");
    Ok(())
}

#[tokio::test]
async fn test_get_user_by_id() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(&app, empty_request(Method::GET, "/api/users/1")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "John Doe");
    assert_eq!(body["message"], "User retrieved successfully");
    Ok(())
}

#[tokio::test]
async fn test_get_unknown_user_is_404() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(&app, empty_request(Method::GET, "/api/users/99")).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "User not found",
            "message": "No user found with the specified ID",
        })
    );
    Ok(())
}

// ─── Create ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_user() -> Result<()> {
    let app = seeded_app();
    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/users",
            json!({"email": "alice@example.com", "name": "Alice"}),
        ))
        .await?;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()[header::LOCATION], "/api/users/4");

    let body = body_json(response).await;
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["data"]["id"], "4");
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert_eq!(body["data"]["createdAt"], body["data"]["updatedAt"]);

    let (_, list) = send(&app, empty_request(Method::GET, "/api/users")).await?;
    assert_eq!(list["data"].as_array().unwrap().len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_create_requires_email_and_name() -> Result<()> {
    let app = seeded_app();

    for payload in [
        json!({"name": "No Email"}),
        json!({"email": "x@y.com"}),
        json!({"email": "", "name": "Empty"}),
        json!({}),
    ] {
        let (status, body) = send(&app, json_request(Method::POST, "/api/users", payload)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields");
        assert_eq!(body["message"], "Email and name are required");
        assert!(body.get("data").is_none());
    }
    Ok(())
}

#[tokio::test]
async fn test_create_rejects_invalid_email() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/users",
            json!({"email": "not-an-email", "name": "X"}),
        ),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email format");
    assert_eq!(body["message"], "Please provide a valid email address");
    Ok(())
}

#[tokio::test]
async fn test_create_duplicate_email_conflicts() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/users",
            json!({"email": "jane.smith@example.com", "name": "Another Jane"}),
        ),
    )
    .await?;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");
    assert_eq!(body["message"], "A user with this email already exists");

    let (_, list) = send(&app, empty_request(Method::GET, "/api/users")).await?;
    assert_eq!(list["data"].as_array().unwrap().len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_malformed_json_is_400() -> Result<()> {
    let app = seeded_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))?;

    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid request body");
    Ok(())
}

#[tokio::test]
async fn test_create_without_body_reports_missing_fields() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(&app, empty_request(Method::POST, "/api/users")).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(body["message"], "Email and name are required");
    Ok(())
}

#[tokio::test]
async fn test_create_from_urlencoded_form() -> Result<()> {
    let app = seeded_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("email=a%40b.com&name=A"))?;

    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "a@b.com");
    assert_eq!(body["data"]["name"], "A");
    Ok(())
}

#[tokio::test]
async fn test_non_json_body_is_400() -> Result<()> {
    let app = seeded_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("email=a@b.com"))?;

    let (status, body) = send(&app, request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid request body");
    Ok(())
}

#[tokio::test]
async fn test_oversized_body_is_413_envelope() -> Result<()> {
    let app = seeded_app();
    // Above the 2 MB default extractor limit
    let name = "x".repeat(3 * 1024 * 1024);
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/users",
            json!({"email": "big@example.com", "name": name}),
        ),
    )
    .await?;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Payload too large");
    Ok(())
}

// ─── Update ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_merges_fields() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(
        &app,
        json_request(Method::PUT, "/api/users/2", json!({"name": "Jane Doe"})),
    )
    .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User updated successfully");
    assert_eq!(body["data"]["id"], "2");
    assert_eq!(body["data"]["name"], "Jane Doe");
    assert_eq!(body["data"]["email"], "jane.smith@example.com");
    assert_eq!(body["data"]["createdAt"], "2024-01-02T00:00:00.000Z");
    assert_ne!(body["data"]["updatedAt"], "2024-01-16T00:00:00.000Z");
    Ok(())
}

#[tokio::test]
async fn test_update_rejects_invalid_email() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(
        &app,
        json_request(Method::PUT, "/api/users/1", json!({"email": "bad"})),
    )
    .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid email format");

    let (_, user) = send(&app, empty_request(Method::GET, "/api/users/1")).await?;
    assert_eq!(user["data"]["email"], "john.doe@example.com");
    Ok(())
}

#[tokio::test]
async fn test_update_unknown_user_checked_before_email() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(
        &app,
        json_request(Method::PUT, "/api/users/99", json!({"email": "bad"})),
    )
    .await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
    Ok(())
}

#[tokio::test]
async fn test_update_without_body_checks_id_first() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(&app, empty_request(Method::PUT, "/api/users/99")).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
    Ok(())
}

#[tokio::test]
async fn test_update_without_body_refreshes_timestamp() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(&app, empty_request(Method::PUT, "/api/users/1")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "John Doe");
    assert_eq!(body["data"]["email"], "john.doe@example.com");
    assert_eq!(body["data"]["createdAt"], "2024-01-01T00:00:00.000Z");
    assert_ne!(body["data"]["updatedAt"], "2024-01-15T00:00:00.000Z");
    Ok(())
}

#[tokio::test]
async fn test_update_to_taken_email_conflicts() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(
        &app,
        json_request(
            Method::PUT,
            "/api/users/1",
            json!({"email": "bob.wilson@example.com"}),
        ),
    )
    .await?;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "User already exists");
    Ok(())
}

// ─── Delete ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_user() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(&app, empty_request(Method::DELETE, "/api/users/3")).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");
    assert_eq!(body["data"]["deletedUser"]["name"], "Bob Wilson");
    assert!(body["data"]["deletedAt"].as_str().unwrap().contains(", "));

    let (status, _) = send(&app, empty_request(Method::GET, "/api/users/3")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, empty_request(Method::DELETE, "/api/users/3")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
    Ok(())
}

#[tokio::test]
async fn test_ids_not_reused_after_delete() -> Result<()> {
    let app = seeded_app();
    send(&app, empty_request(Method::DELETE, "/api/users/1")).await?;

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/api/users",
            json!({"email": "new@example.com", "name": "New"}),
        ),
    )
    .await?;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["id"], "4");
    Ok(())
}

// ─── End to end ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_user_lifecycle() -> Result<()> {
    let app = seeded_app();
    let payload = json!({"email": "x@y.com", "name": "X"});

    let (status, created) = send(&app, json_request(Method::POST, "/api/users", payload.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/users/{id}");

    let (status, _) = send(&app, json_request(Method::POST, "/api/users", payload)).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, fetched) = send(&app, empty_request(Method::GET, &uri)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], created["data"]);

    let (status, updated) = send(&app, json_request(Method::PUT, &uri, json!({"name": "Y"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["name"], "Y");
    assert_eq!(updated["data"]["email"], "x@y.com");

    let (status, _) = send(&app, empty_request(Method::DELETE, &uri)).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, empty_request(Method::GET, &uri)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

// ─── Service endpoints ──────────────────────────────────────────────────

#[tokio::test]
async fn test_root_and_health() -> Result<()> {
    let app = seeded_app();

    let (status, body) = send(&app, empty_request(Method::GET, "/")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "API is running");
    assert_eq!(
        body["data"]["message"],
        "Welcome to the Full-Stack TypeScript Monorepo API"
    );

    let (status, body) = send(&app, empty_request(Method::GET, "/health")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "coursenew-api");
    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_404_envelope() -> Result<()> {
    let app = seeded_app();
    let (status, body) = send(&app, empty_request(Method::GET, "/api/widgets")).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "Route not found",
            "message": "The requested route does not exist",
        })
    );
    Ok(())
}

// ─── Full middleware stack ──────────────────────────────────────────────

#[tokio::test]
async fn test_middleware_adds_request_id_and_security_headers() -> Result<()> {
    let config = Config::default();
    let app = Server::new(config.clone()).with_middleware(build_router(AppState::from_config(config)));

    let response = app.oneshot(empty_request(Method::GET, "/api/users/1")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let request_id = response.headers()["x-request-id"].to_str()?;
    assert!(request_id.starts_with("req_"));
    assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
    Ok(())
}

#[tokio::test]
async fn test_incoming_request_id_is_propagated() -> Result<()> {
    let config = Config::default();
    let app = Server::new(config.clone()).with_middleware(build_router(AppState::from_config(config)));

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", "client-supplied-id")
        .body(Body::empty())?;
    let response = app.oneshot(request).await?;

    assert_eq!(response.headers()["x-request-id"], "client-supplied-id");
    Ok(())
}

#[tokio::test]
async fn test_body_over_configured_limit_is_413_envelope() -> Result<()> {
    let config = Config::default();
    let app = Server::new(config.clone()).with_middleware(build_router(AppState::from_config(config)));

    let payload = json!({"email": "big@example.com", "name": "x".repeat(200 * 1024)}).to_string();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(response.headers()["x-request-id"].to_str()?.starts_with("req_"));
    assert_eq!(
        body_json(response).await,
        json!({
            "success": false,
            "error": "Payload too large",
            "message": "The request body exceeds the maximum allowed size",
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_slow_handler_times_out_with_envelope() -> Result<()> {
    async fn slow() -> &'static str {
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        "late"
    }

    let mut config = Config::default();
    config.service.timeout_secs = 1;
    let app = Router::new().route("/slow", post(slow));
    let app = Server::new(config).with_middleware(app);

    let response = app.oneshot(empty_request(Method::POST, "/slow")).await?;
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Request timeout");
    Ok(())
}

#[tokio::test]
async fn test_panic_becomes_500_envelope() -> Result<()> {
    async fn boom() -> &'static str {
        panic!("handler exploded")
    }

    let app = Router::new().route("/boom", get(boom));
    let app = Server::new(Config::default()).with_middleware(app);

    let response = app.oneshot(empty_request(Method::GET, "/boom")).await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "Internal server error",
            "message": "An error occurred while processing your request",
        })
    );
    Ok(())
}
