//! Librarian endpoints: catalog management, roles and statistics

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookInput, DeleteBookParams},
        profile::{RoleCounts, UpdateRole, UserProfile},
    },
    services::catalog::InventoryStats,
    AppState,
};

use super::LibrarianOnly;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminBookQuery {
    /// Free text matched against title, author and genre tags
    pub q: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AdminStats {
    pub inventory: InventoryStats,
    pub users: RoleCounts,
}

/// All books, ordered by title
#[utoipa::path(
    get,
    path = "/admin/books",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(AdminBookQuery),
    responses(
        (status = 200, description = "Books", body = Vec<Book>),
        (status = 403, description = "Librarians only")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    _librarian: LibrarianOnly,
    Query(query): Query<AdminBookQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.admin_list(query.q.as_deref()).await?;
    Ok(Json(books))
}

/// Add a book
#[utoipa::path(
    post,
    path = "/admin/books",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Librarians only")
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    _librarian: LibrarianOnly,
    Json(input): Json<BookInput>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let created = state.services.catalog.create_book(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a book
#[utoipa::path(
    put,
    path = "/admin/books/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    _librarian: LibrarianOnly,
    Path(id): Path<Uuid>,
    Json(input): Json<BookInput>,
) -> AppResult<Json<Book>> {
    let updated = state.services.catalog.update_book(id, input).await?;
    Ok(Json(updated))
}

/// Delete a book; requires `confirm=true`
#[utoipa::path(
    delete,
    path = "/admin/books/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID"),
        DeleteBookParams
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Confirmation missing"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    _librarian: LibrarianOnly,
    Path(id): Path<Uuid>,
    Query(params): Query<DeleteBookParams>,
) -> AppResult<StatusCode> {
    state
        .services
        .catalog
        .delete_book(id, params.confirm.unwrap_or(false))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// All profiles, newest first
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profiles", body = Vec<UserProfile>),
        (status = 403, description = "Librarians only")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    _librarian: LibrarianOnly,
) -> AppResult<Json<Vec<UserProfile>>> {
    let profiles = state.services.users.list_profiles().await?;
    Ok(Json(profiles))
}

/// Change a user's role
#[utoipa::path(
    put,
    path = "/admin/users/{id}/role",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateRole,
    responses(
        (status = 200, description = "Role updated", body = UserProfile),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn update_user_role(
    State(state): State<AppState>,
    librarian: LibrarianOnly,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateRole>,
) -> AppResult<Json<UserProfile>> {
    tracing::debug!(by = %librarian.profile.id, user_id = %id, "Role change requested");
    let profile = state.services.users.update_role(id, request.role).await?;
    Ok(Json(profile))
}

/// Inventory and user counts
#[utoipa::path(
    get,
    path = "/admin/stats",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Statistics", body = AdminStats),
        (status = 403, description = "Librarians only")
    )
)]
pub async fn get_stats(
    State(state): State<AppState>,
    _librarian: LibrarianOnly,
) -> AppResult<Json<AdminStats>> {
    Ok(Json(AdminStats {
        inventory: state.services.catalog.inventory_stats().await?,
        users: state.services.users.role_counts().await?,
    }))
}
