//! Reader dashboard and lending endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::lending::{BorrowRecord, Dashboard, Reservation},
    AppState,
};

use super::SignedIn;

/// Dashboard of the signed-in user
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile, loans, reservations and counters", body = Dashboard),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    user: SignedIn,
) -> AppResult<Json<Dashboard>> {
    let dashboard = state.services.dashboard.dashboard(user.profile).await?;
    Ok(Json(dashboard))
}

/// Borrow a book (acknowledged, not recorded)
#[utoipa::path(
    post,
    path = "/books/{id}/borrow",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Borrow acknowledged", body = BorrowRecord),
        (status = 404, description = "Book not found"),
        (status = 409, description = "No copy available")
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BorrowRecord>> {
    let record = state.services.dashboard.borrow(user.profile.id, id).await?;
    Ok(Json(record))
}

/// Reserve a book (acknowledged, not recorded)
#[utoipa::path(
    post,
    path = "/books/{id}/reserve",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Reservation acknowledged", body = Reservation),
        (status = 404, description = "Book not found")
    )
)]
pub async fn reserve_book(
    State(state): State<AppState>,
    user: SignedIn,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Reservation>> {
    let reservation = state.services.dashboard.reserve(user.profile.id, id).await?;
    Ok(Json(reservation))
}

/// Return a borrowed book (acknowledged, not recorded)
#[utoipa::path(
    post,
    path = "/loans/{book_id}/return",
    tag = "dashboard",
    security(("bearer_auth" = [])),
    params(
        ("book_id" = Uuid, Path, description = "ID of the borrowed book")
    ),
    responses(
        (status = 200, description = "Return acknowledged", body = BorrowRecord),
        (status = 400, description = "Book is not on loan")
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    user: SignedIn,
    Path(book_id): Path<Uuid>,
) -> AppResult<Json<BorrowRecord>> {
    let record = state
        .services
        .dashboard
        .return_book(user.profile.id, book_id)
        .await?;
    Ok(Json(record))
}
