//! Books table on postgres

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::BookStore;
use crate::{
    error::AppResult,
    models::book::{BookRow, NewBookRow},
};

const BOOK_COLUMNS: &str = r#"
    id, title, author, cover_image, description, genre, published_year,
    total_copies, available_copies, created_at, updated_at
"#;

#[derive(Clone)]
pub struct PgBookStore {
    pool: Pool<Postgres>,
}

impl PgBookStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookStore for PgBookStore {
    async fn list_books(&self) -> AppResult<Vec<BookRow>> {
        let rows = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM books ORDER BY title ASC",
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_book(&self, id: Uuid) -> AppResult<Option<BookRow>> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_book(&self, book: &NewBookRow) -> AppResult<BookRow> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            r#"
            INSERT INTO books (title, author, cover_image, description, genre,
                               published_year, total_copies, available_copies)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.cover_image)
        .bind(&book.description)
        .bind(&book.genre)
        .bind(book.published_year)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn replace_book(&self, id: Uuid, book: &NewBookRow) -> AppResult<Option<BookRow>> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            r#"
            UPDATE books
            SET title = $2, author = $3, cover_image = $4, description = $5, genre = $6,
                published_year = $7, total_copies = $8, available_copies = $9,
                updated_at = $10
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.cover_image)
        .bind(&book.description)
        .bind(&book.genre)
        .bind(book.published_year)
        .bind(book.total_copies)
        .bind(book.available_copies)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_book(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::fixtures;

    const INIT_MIGRATION: &str = include_str!("../../migrations/20240301000000_init.sql");

    #[test]
    fn test_books_table_enforces_copy_bounds() {
        assert!(INIT_MIGRATION
            .contains("CHECK (available_copies >= 0 AND available_copies <= total_copies)"));
        // Seeding must pass the same check
        assert!(fixtures::sample_books()
            .iter()
            .all(|b| b.available_copies >= 0 && b.available_copies <= b.total_copies));
    }
}
