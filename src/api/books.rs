//! Public catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book::{Book, CatalogQuery},
    services::catalog::HomeSections,
    AppState,
};

/// Home page sections
#[utoipa::path(
    get,
    path = "/home",
    tag = "books",
    responses(
        (status = 200, description = "Recently added and popular books", body = HomeSections)
    )
)]
pub async fn home(State(state): State<AppState>) -> AppResult<Json<HomeSections>> {
    let sections = state.services.catalog.home().await?;
    Ok(Json(sections))
}

/// Search, filter and sort the catalog
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Matching books", body = Vec<Book>),
        (status = 400, description = "Invalid filter value")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.search(&query).await?;
    Ok(Json(books))
}

/// Distinct genre tags, in catalog order
#[utoipa::path(
    get,
    path = "/books/genres",
    tag = "books",
    responses(
        (status = 200, description = "Genre tags", body = Vec<String>)
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let genres = state.services.catalog.genres().await?;
    Ok(Json(genres))
}

/// Book details
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}
