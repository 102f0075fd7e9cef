//! API handlers for ReadEasyBank REST endpoints

pub mod admin;
pub mod auth;
pub mod books;
pub mod dashboard;
pub mod health;
pub mod openapi;
pub mod pages;
pub mod users;

use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post, put},
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeaderRejectionReason,
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::{profile::Role, session::SessionClaims, UserProfile},
    AppState,
};

/// Bearer token of the request, `None` when there is no Authorization header
async fn bearer_token(parts: &mut Parts, state: &AppState) -> Result<Option<String>, AppError> {
    match TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state).await {
        Ok(TypedHeader(Authorization(bearer))) => Ok(Some(bearer.token().to_string())),
        Err(rejection) if matches!(rejection.reason(), TypedHeaderRejectionReason::Missing) => Ok(None),
        Err(_) => Err(AppError::Authentication("Invalid authorization header format".to_string())),
    }
}

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub SessionClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts, state)
            .await?
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        // Signature, expiry and open session
        let claims = state.services.auth.authenticate_token(&token).await?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Caller's session if there is a valid one; never rejects
pub struct OptionalUser(pub Option<SessionClaims>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = match bearer_token(parts, state).await.ok().flatten() {
            Some(token) => state.services.auth.authenticate_token(&token).await.ok(),
            None => None,
        };
        Ok(OptionalUser(claims))
    }
}

/// Minimum role a route accepts
pub trait RoleRequirement: Send + Sync + 'static {
    const ROLE: Role;
}

/// Any signed-in reader
pub struct StudentAccess;

/// Librarians only
pub struct LibrarianAccess;

impl RoleRequirement for StudentAccess {
    const ROLE: Role = Role::Student;
}

impl RoleRequirement for LibrarianAccess {
    const ROLE: Role = Role::Librarian;
}

/// Route guard: authenticates the caller, then checks the role stored on
/// their profile row (not the one in the token, which may be stale)
pub struct RequireRole<R: RoleRequirement> {
    pub claims: SessionClaims,
    pub profile: UserProfile,
    _role: PhantomData<R>,
}

pub type SignedIn = RequireRole<StudentAccess>;
pub type LibrarianOnly = RequireRole<LibrarianAccess>;

#[async_trait]
impl<R: RoleRequirement> FromRequestParts<AppState> for RequireRole<R> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;

        let profile = state
            .services
            .users
            .get_profile(claims.sub)
            .await
            .map_err(|e| match e {
                AppError::ProfileNotFound(_) => {
                    AppError::Authorization("No profile is associated with this account".to_string())
                }
                other => other,
            })?;

        if !profile.role.satisfies(R::ROLE) {
            tracing::warn!(user_id = %profile.id, required = %R::ROLE, "Access denied");
            return Err(AppError::Authorization(format!(
                "This page is restricted to {} accounts",
                R::ROLE
            )));
        }

        Ok(RequireRole {
            claims,
            profile,
            _role: PhantomData,
        })
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Catalog
        .route("/home", get(books::home))
        .route("/books", get(books::list_books))
        .route("/books/genres", get(books::list_genres))
        .route("/books/:id", get(books::get_book))
        .route("/books/:id/borrow", post(dashboard::borrow_book))
        .route("/books/:id/reserve", post(dashboard::reserve_book))
        .route("/loans/:book_id/return", post(dashboard::return_book))
        // Authentication
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
        .route("/auth/events", get(auth::events))
        // Reader
        .route("/me", get(users::get_me).put(users::update_me))
        .route("/dashboard", get(dashboard::get_dashboard))
        // Admin
        .route("/admin/books", get(admin::list_books).post(admin::create_book))
        .route("/admin/books/:id", put(admin::update_book).delete(admin::delete_book))
        .route("/admin/users", get(admin::list_users))
        .route("/admin/users/:id/role", put(admin::update_user_role))
        .route("/admin/stats", get(admin::get_stats))
        // Pages
        .route("/about", get(pages::about))
        .route("/contact", post(pages::contact))
        .with_state(state);

    // OpenAPI documentation
    let openapi = openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
