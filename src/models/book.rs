//! Book model, catalog query types and the row <-> API mappers

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// Row of the `books` table
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    pub cover_image: Option<String>,
    pub description: Option<String>,
    pub genre: Vec<String>,
    pub published_year: Option<i32>,
    pub total_copies: i32,
    pub available_copies: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            title: row.title,
            author: row.author,
            cover_image: row.cover_image.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            genre: row.genre,
            published_year: row
                .published_year
                .unwrap_or_else(|| Utc::now().year()),
            available: row.available_copies > 0,
            total_copies: row.total_copies,
            available_copies: row.available_copies,
        }
    }
}

/// Catalog entry as served to the pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    /// Cover image URL, empty when the book has none
    pub cover_image: String,
    pub description: String,
    /// Genre tags; unordered, duplicates allowed
    pub genre: Vec<String>,
    pub published_year: i32,
    /// `true` when at least one copy is on the shelf
    pub available: bool,
    pub total_copies: i32,
    pub available_copies: i32,
}

/// Add/edit book form submitted by the admin panel
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    pub cover_image: Option<String>,
    pub description: Option<String>,
    pub genre: Option<Vec<String>>,
    #[validate(range(min = 0, max = 9999, message = "Publication year is out of range"))]
    pub published_year: Option<i32>,
    #[validate(range(min = 0, message = "Total copies cannot be negative"))]
    pub total_copies: Option<i32>,
    #[validate(range(min = 0, message = "Available copies cannot be negative"))]
    pub available_copies: Option<i32>,
}

/// Values written to the `books` table on insert or full replace
#[derive(Debug, Clone, PartialEq)]
pub struct NewBookRow {
    pub title: String,
    pub author: String,
    pub cover_image: Option<String>,
    pub description: Option<String>,
    pub genre: Vec<String>,
    pub published_year: Option<i32>,
    pub total_copies: i32,
    pub available_copies: i32,
}

impl TryFrom<BookInput> for NewBookRow {
    type Error = AppError;

    fn try_from(input: BookInput) -> Result<Self, Self::Error> {
        input.validate()?;

        let title = input.title.trim().to_string();
        let author = input.author.trim().to_string();
        if title.is_empty() || author.is_empty() {
            return Err(AppError::Validation(
                "Book title and author are required".to_string(),
            ));
        }

        let total_copies = input.total_copies.unwrap_or(1);
        let available_copies = input.available_copies.unwrap_or(total_copies);
        if available_copies > total_copies {
            return Err(AppError::Validation(format!(
                "Available copies ({}) cannot exceed total copies ({})",
                available_copies, total_copies
            )));
        }

        Ok(NewBookRow {
            title,
            author,
            cover_image: input.cover_image.filter(|s| !s.trim().is_empty()),
            description: input.description.filter(|s| !s.trim().is_empty()),
            genre: input
                .genre
                .unwrap_or_default()
                .into_iter()
                .map(|g| g.trim().to_string())
                .filter(|g| !g.is_empty())
                .collect(),
            published_year: input.published_year,
            total_copies,
            available_copies,
        })
    }
}

/// Availability filter of the catalog sidebar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    #[default]
    All,
    Available,
    Unavailable,
}

/// Catalog sort order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    #[serde(alias = "titleAZ")]
    TitleAsc,
    #[serde(alias = "titleZA")]
    TitleDesc,
}

/// Catalog query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Free text matched against title, author and genre tags
    pub q: Option<String>,
    /// Comma-separated genre tags; a book matches when it carries any of them
    pub genres: Option<String>,
    pub availability: Option<Availability>,
    pub sort: Option<SortOrder>,
}

impl CatalogQuery {
    /// Selected genre tags, in the order given
    pub fn selected_genres(&self) -> Vec<String> {
        self.genres
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Admin delete confirmation
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteBookParams {
    /// Must be `true`; the admin panel asks before deleting
    pub confirm: Option<bool>,
}
