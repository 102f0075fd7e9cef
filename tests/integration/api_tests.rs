//! API integration tests
//!
//! Each test drives the full router in process over the memory store.

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::time::Duration;
use tokio_stream::StreamExt;
use tower::ServiceExt;

use readeasybank_server::{
    api::create_router,
    config::{AppConfig, AuthMode},
    repository::Repository,
    AppState,
};

async fn app(mode: AuthMode) -> Router {
    let mut config = AppConfig::in_memory();
    config.auth.mode = mode;
    let state = AppState::new(config, Repository::memory());
    state
        .services
        .catalog
        .seed_if_empty()
        .await
        .expect("Failed to seed catalog");
    create_router(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(format!("/api/v1{}", uri));
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse response")
    };
    (status, body)
}

/// Helper to sign in and get a token
async fn login(app: &Router, email: &str, password: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body
}

fn token(grant: &Value) -> String {
    grant["token"].as_str().expect("No token in response").to_string()
}

fn titles(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("Expected an array")
        .iter()
        .map(|b| b["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = app(AuthMode::Managed).await;

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["books"], 12);
}

#[tokio::test]
async fn test_catalog_filters() {
    let app = app(AuthMode::Managed).await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/books?genres=Science&availability=available&sort=oldest",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(titles(&body), vec!["Fundamentals of Physics"]);

    let (_, body) = send(&app, Method::GET, "/books?q=LEE&sort=title-asc", None, None).await;
    assert_eq!(
        titles(&body),
        vec!["Data Structures and Algorithms", "Organic Chemistry"]
    );

    let (_, body) = send(&app, Method::GET, "/books", None, None).await;
    let years: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["published_year"].as_i64().unwrap())
        .collect();
    assert_eq!(years.len(), 12);
    assert!(years.windows(2).all(|w| w[0] >= w[1]));
    for book in body.as_array().unwrap() {
        assert_eq!(
            book["available"].as_bool().unwrap(),
            book["available_copies"].as_i64().unwrap() > 0
        );
    }
}

#[tokio::test]
async fn test_genre_filter_only_returns_tagged_books() {
    let app = app(AuthMode::Managed).await;

    let (_, body) = send(&app, Method::GET, "/books?genres=Business", None, None).await;
    let books = body.as_array().unwrap();
    assert_eq!(books.len(), 2);
    for book in books {
        let genres: Vec<&str> = book["genre"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|g| g.as_str())
            .collect();
        assert!(genres.contains(&"Business"));
    }

    let (status, body) = send(&app, Method::GET, "/books/genres", None, None).await;
    assert_eq!(status, StatusCode::OK);
    // First-seen order over the title-ordered catalog
    assert_eq!(body[0], "Programming");
}

#[tokio::test]
async fn test_home_and_book_details() {
    let app = app(AuthMode::Managed).await;

    let (status, home) = send(&app, Method::GET, "/home", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(home["recently_added"].as_array().unwrap().len(), 4);
    assert_eq!(home["popular"][0]["title"], "Calculus: Early Transcendentals");

    let id = home["popular"][0]["id"].as_str().unwrap();
    let (status, book) = send(&app, Method::GET, &format!("/books/{}", id), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["author"], "James Stewart");

    let (status, body) = send(
        &app,
        Method::GET,
        "/books/00000000-0000-0000-0000-000000000000",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchBook");
}

#[tokio::test]
async fn test_demo_login_redirects_by_role() {
    let app = app(AuthMode::Demo).await;

    let grant = login(&app, "admin@example.com", "whatever").await;
    assert_eq!(grant["role"], "librarian");
    assert_eq!(grant["redirect"], "/admin");
    assert_eq!(grant["token_type"], "Bearer");

    let grant = login(&app, "student@example.com", "whatever").await;
    assert_eq!(grant["role"], "student");
    assert_eq!(grant["redirect"], "/dashboard");
}

#[tokio::test]
async fn test_register_with_mismatched_passwords() {
    let app = app(AuthMode::Managed).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "name": "Jane Reader",
            "email": "jane@example.com",
            "password": "first-password",
            "confirm_password": "second-password"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("token").is_none());

    // Nothing was created
    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "jane@example.com", "password": "first-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_login_and_profile() {
    let app = app(AuthMode::Managed).await;

    let (status, grant) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "name": "Jane Reader",
            "email": "jane@example.com",
            "password": "s3cret-pass",
            "confirmPassword": "s3cret-pass"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(grant["redirect"], "/dashboard");

    let grant = login(&app, "jane@example.com", "s3cret-pass").await;
    let token = token(&grant);

    let (status, me) = send(&app, Method::GET, "/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "Jane Reader");

    let (status, me) = send(
        &app,
        Method::PUT,
        "/me",
        Some(&token),
        Some(json!({ "name": "Jane R." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["name"], "Jane R.");
    assert_eq!(me["role"], "student");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/me",
        Some(&token),
        Some(json!({ "email": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_out_clears_navigation_state() {
    let app = app(AuthMode::Demo).await;
    let token = token(&login(&app, "student@example.com", "pw").await);

    let (_, nav) = send(&app, Method::GET, "/auth/session", Some(&token), None).await;
    assert_eq!(nav["signed_in"], true);
    assert_eq!(nav["role"], "student");

    let (status, _) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, nav) = send(&app, Method::GET, "/auth/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(nav["signed_in"], false);

    let (status, _) = send(&app, Method::GET, "/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_require_librarian() {
    let app = app(AuthMode::Demo).await;

    let (status, _) = send(&app, Method::GET, "/admin/books", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let student = token(&login(&app, "student@example.com", "pw").await);
    let (status, body) = send(&app, Method::GET, "/admin/stats", Some(&student), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "NotAuthorized");

    let librarian = token(&login(&app, "librarian@example.com", "pw").await);
    let (status, stats) = send(&app, Method::GET, "/admin/stats", Some(&librarian), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["inventory"]["titles"], 12);
    assert_eq!(stats["users"]["students"], 1);
    assert_eq!(stats["users"]["librarians"], 1);
}

#[tokio::test]
async fn test_delete_book_removes_exactly_that_id() {
    let app = app(AuthMode::Demo).await;
    let librarian = token(&login(&app, "admin@example.com", "pw").await);

    let (_, books) = send(&app, Method::GET, "/admin/books", Some(&librarian), None).await;
    let ids: Vec<String> = books
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap().to_string())
        .collect();
    let victim = ids[3].clone();

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/admin/books/{}", victim),
        Some(&librarian),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ConfirmationRequired");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/admin/books/{}?confirm=true", victim),
        Some(&librarian),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, after) = send(&app, Method::GET, "/books?sort=title-asc", None, None).await;
    let remaining: Vec<String> = after
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap().to_string())
        .collect();
    let expected: Vec<String> = ids.into_iter().filter(|id| *id != victim).collect();
    assert_eq!(remaining, expected);
}

#[tokio::test]
async fn test_admin_add_and_edit_book() {
    let app = app(AuthMode::Demo).await;
    let librarian = token(&login(&app, "admin@example.com", "pw").await);

    let (status, _) = send(
        &app,
        Method::POST,
        "/admin/books",
        Some(&librarian),
        Some(json!({ "title": "  ", "author": "Nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, created) = send(
        &app,
        Method::POST,
        "/admin/books",
        Some(&librarian),
        Some(json!({
            "title": "Linear Algebra Done Right",
            "author": "Sheldon Axler",
            "genre": ["Mathematics"],
            "published_year": 2024,
            "total_copies": 3
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["available_copies"], 3);
    assert_eq!(created["cover_image"], "");

    let id = created["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/admin/books/{}", id),
        Some(&librarian),
        Some(json!({
            "title": "Linear Algebra Done Right",
            "author": "Sheldon Axler",
            "total_copies": 3,
            "available_copies": 5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/admin/books/{}", id),
        Some(&librarian),
        Some(json!({
            "title": "Linear Algebra Done Right",
            "author": "Sheldon Axler",
            "genre": ["Mathematics"],
            "total_copies": 3,
            "available_copies": 0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["available"], false);

    let (_, books) = send(&app, Method::GET, "/books?genres=Mathematics&availability=unavailable", None, None).await;
    assert_eq!(
        titles(&books),
        vec!["Linear Algebra Done Right", "Engineering Mathematics"]
    );
}

#[tokio::test]
async fn test_role_change_is_enforced_on_next_request() {
    let app = app(AuthMode::Managed).await;

    let (_, librarian) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "name": "Head Librarian",
            "email": "head@example.com",
            "password": "pw-123456",
            "confirm_password": "pw-123456",
            "role": "librarian"
        })),
    )
    .await;
    let (_, student) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "name": "Sam",
            "email": "sam@example.com",
            "password": "pw-123456",
            "confirm_password": "pw-123456"
        })),
    )
    .await;
    let librarian_token = token(&librarian);
    let student_token = token(&student);
    let student_id = student["profile"]["id"].as_str().unwrap();

    let (status, _) = send(&app, Method::GET, "/admin/users", Some(&student_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, users) = send(&app, Method::GET, "/admin/users", Some(&librarian_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users[0]["email"], "sam@example.com");

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/admin/users/{}/role", student_id),
        Some(&librarian_token),
        Some(json!({ "role": "librarian" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["role"], "librarian");

    // Same token, new role
    let (status, _) = send(&app, Method::GET, "/admin/users", Some(&student_token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_dashboard_and_lending() {
    let app = app(AuthMode::Demo).await;
    let token = token(&login(&app, "student@example.com", "pw").await);

    let (status, dashboard) = send(&app, Method::GET, "/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["counts"]["borrowed"], 2);
    assert_eq!(dashboard["counts"]["overdue"], 1);
    assert_eq!(dashboard["counts"]["reserved"], 1);
    assert_eq!(dashboard["counts"]["read"], 1);

    let (_, unavailable) = send(&app, Method::GET, "/books?q=organic", None, None).await;
    let organic = unavailable[0]["id"].as_str().unwrap();
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/books/{}/borrow", organic),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "BookNotAvailable");

    let (status, reservation) = send(
        &app,
        Method::POST,
        &format!("/books/{}/reserve", organic),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reservation["status"], "pending");

    let loaned = dashboard["borrowed"][0]["book"]["id"].as_str().unwrap();
    let (status, record) = send(
        &app,
        Method::POST,
        &format!("/loans/{}/return", loaned),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(record["status"], "returned");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/books/{}/borrow", organic),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_about_and_contact() {
    let app = app(AuthMode::Managed).await;

    let (status, about) = send(&app, Method::GET, "/about", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(about["contact"]["email"], "info@readyeasybank.com");

    let (status, _) = send(
        &app,
        Method::POST,
        "/contact",
        None,
        Some(json!({
            "name": "Jo",
            "email": "jo@example.com",
            "subject": "Opening hours",
            "message": "Are you open on public holidays?"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/contact",
        None,
        Some(json!({
            "name": "J",
            "email": "jo@example.com",
            "subject": "Hours",
            "message": "Open?"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_session_events_stream_reports_sign_in() {
    let app = app(AuthMode::Demo).await;

    let request = Request::builder()
        .uri("/api/v1/auth/events")
        .body(Body::empty())
        .expect("Failed to build request");
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to open event stream");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));
    let mut frames = response.into_body().into_data_stream();

    let grant = login(&app, "student@example.com", "pw").await;
    let user_id = grant["profile"]["id"].as_str().unwrap().to_string();

    let mut received = String::new();
    while !received.contains("\n\n") {
        let chunk = tokio::time::timeout(Duration::from_secs(5), frames.next())
            .await
            .expect("No session event within 5s")
            .expect("Event stream ended")
            .expect("Failed to read event");
        received.push_str(&String::from_utf8_lossy(&chunk));
    }

    let field = |name: &str| {
        received
            .lines()
            .find_map(|line| line.strip_prefix(name))
            .map(|value| value.trim_start().to_string())
    };
    assert_eq!(field("event:").as_deref(), Some("signed_in"), "{}", received);
    let data = field("data:").expect("No data line");
    let event: Value = serde_json::from_str(&data).unwrap();
    assert_eq!(event["type"], "signed_in");
    assert_eq!(event["user_id"], user_id.as_str());
    assert_eq!(event["role"], "student");
}
