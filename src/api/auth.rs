//! Authentication endpoints

use std::convert::Infallible;

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use serde::Deserialize;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{profile::Role, session::NavState},
    services::auth::{Registration, SessionGrant},
    AppState,
};

use super::{AuthenticatedUser, OptionalUser};

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub password: String,
    #[serde(alias = "confirmPassword")]
    pub confirm_password: String,
    /// Requested role; defaults to student
    pub role: Option<Role>,
}

/// Sign in and open a session
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = SessionGrant),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<SessionGrant>> {
    let grant = state
        .services
        .auth
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(grant))
}

/// Create an account and sign it in
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SessionGrant),
        (status = 400, description = "Passwords do not match or invalid input"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<SessionGrant>)> {
    // Password mismatch is reported first
    if request.password == request.confirm_password {
        request.validate()?;
    }

    let registration = Registration {
        name: request.name,
        email: request.email,
        password: request.password,
        confirm_password: request.confirm_password,
        role: request.role,
    };
    let grant = state.services.auth.register(registration).await?;
    Ok((StatusCode::CREATED, Json(grant)))
}

/// Sign out the current session
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Signed out"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> StatusCode {
    state.services.auth.logout(&claims).await;
    StatusCode::NO_CONTENT
}

/// Navigation state of the caller
#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "auth",
    responses(
        (status = 200, description = "Current navigation state", body = NavState)
    )
)]
pub async fn session(
    State(state): State<AppState>,
    OptionalUser(claims): OptionalUser,
) -> AppResult<Json<NavState>> {
    let nav = state.services.auth.nav_state(claims.as_ref()).await?;
    Ok(Json(nav))
}

/// Stream of session changes (Server-Sent Events)
#[utoipa::path(
    get,
    path = "/auth/events",
    tag = "auth",
    responses(
        (status = 200, description = "text/event-stream; each event is a SessionEvent named by its type")
    )
)]
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = BroadcastStream::new(state.services.sessions.subscribe()).filter_map(|event| {
        // Lagged receivers skip what they missed
        let event = event.ok()?;
        Event::default()
            .event(event.kind())
            .json_data(&event)
            .ok()
            .map(Ok)
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
