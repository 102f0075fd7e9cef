//! Catalog service: cached book list, search and admin CRUD

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    catalog::{self, fixtures, CatalogFilter},
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::book::{Book, BookInput, CatalogQuery, NewBookRow},
    repository::Repository,
};

/// Home page sections
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct HomeSections {
    pub recently_added: Vec<Book>,
    pub popular: Vec<Book>,
}

/// Inventory totals for the admin overview
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct InventoryStats {
    pub titles: usize,
    pub total_copies: i64,
    pub available_copies: i64,
    pub unavailable_titles: usize,
}

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    config: CatalogConfig,
    /// Last fetched list, ordered by title; cleared by every mutation
    cache: Arc<RwLock<Option<Arc<Vec<Book>>>>>,
}

impl CatalogService {
    pub fn new(repository: Repository, config: CatalogConfig) -> Self {
        Self {
            repository,
            config,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Load the sample catalog when the books table is empty
    pub async fn seed_if_empty(&self) -> AppResult<usize> {
        if !self.config.seed_fixtures || !self.repository.books.list_books().await?.is_empty() {
            return Ok(0);
        }
        let samples = fixtures::sample_books();
        for book in &samples {
            self.repository.books.insert_book(book).await?;
        }
        self.invalidate().await;
        tracing::info!("Seeded catalog with {} sample books", samples.len());
        Ok(samples.len())
    }

    /// Full book list, refetched from the store after any invalidation
    pub async fn books(&self) -> AppResult<Arc<Vec<Book>>> {
        if let Some(books) = self.cache.read().await.as_ref() {
            return Ok(books.clone());
        }

        let mut cache = self.cache.write().await;
        if let Some(books) = cache.as_ref() {
            return Ok(books.clone());
        }
        let rows = self.repository.books.list_books().await?;
        let books: Arc<Vec<Book>> = Arc::new(rows.into_iter().map(Book::from).collect());
        tracing::debug!("Fetched {} books", books.len());
        *cache = Some(books.clone());
        Ok(books)
    }

    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    /// Filter and sort the catalog
    pub async fn search(&self, query: &CatalogQuery) -> AppResult<Vec<Book>> {
        let books = self.books().await?;
        Ok(CatalogFilter::from(query).apply(&books))
    }

    /// Title-ordered list, optionally narrowed by a text query
    pub async fn admin_list(&self, text: Option<&str>) -> AppResult<Vec<Book>> {
        let books = self.books().await?;
        let text = text.map(str::trim).filter(|t| !t.is_empty()).map(str::to_lowercase);
        Ok(match text {
            Some(text) => books
                .iter()
                .filter(|b| catalog::filter::matches_text(b, &text))
                .cloned()
                .collect(),
            None => books.to_vec(),
        })
    }

    pub async fn genres(&self) -> AppResult<Vec<String>> {
        Ok(catalog::genres(&self.books().await?))
    }

    pub async fn home(&self) -> AppResult<HomeSections> {
        let books = self.books().await?;
        Ok(HomeSections {
            recently_added: catalog::recently_added(&books, self.config.featured_count),
            popular: catalog::popular(&books, self.config.featured_count),
        })
    }

    pub async fn get_book(&self, id: Uuid) -> AppResult<Book> {
        self.repository
            .books
            .get_book(id)
            .await?
            .map(Book::from)
            .ok_or_else(|| AppError::BookNotFound(format!("Book with id {} not found", id)))
    }

    pub async fn inventory_stats(&self) -> AppResult<InventoryStats> {
        let books = self.books().await?;
        Ok(InventoryStats {
            titles: books.len(),
            total_copies: books.iter().map(|b| b.total_copies as i64).sum(),
            available_copies: books.iter().map(|b| b.available_copies as i64).sum(),
            unavailable_titles: books.iter().filter(|b| !b.available).count(),
        })
    }

    /// Add a book
    pub async fn create_book(&self, input: BookInput) -> AppResult<Book> {
        let row = NewBookRow::try_from(input)?;
        let created = self.repository.books.insert_book(&row).await?;
        self.invalidate().await;
        tracing::info!(book_id = %created.id, "Book \"{}\" added", created.title);
        Ok(created.into())
    }

    /// Replace every field of an existing book
    pub async fn update_book(&self, id: Uuid, input: BookInput) -> AppResult<Book> {
        let row = NewBookRow::try_from(input)?;
        let updated = self
            .repository
            .books
            .replace_book(id, &row)
            .await?
            .ok_or_else(|| AppError::BookNotFound(format!("Book with id {} not found", id)))?;
        self.invalidate().await;
        tracing::info!(book_id = %id, "Book \"{}\" updated", updated.title);
        Ok(updated.into())
    }

    /// Delete a book once the caller has confirmed
    pub async fn delete_book(&self, id: Uuid, confirmed: bool) -> AppResult<()> {
        if !confirmed {
            return Err(AppError::ConfirmationRequired(
                "Deleting a book cannot be undone; resend with confirm=true".to_string(),
            ));
        }
        if !self.repository.books.delete_book(id).await? {
            return Err(AppError::BookNotFound(format!("Book with id {} not found", id)));
        }
        self.invalidate().await;
        tracing::info!(book_id = %id, "Book deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockBookStore, Repository};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> CatalogService {
        CatalogService::new(Repository::memory(), CatalogConfig::default())
    }

    fn input(title: &str) -> BookInput {
        BookInput {
            title: title.to_string(),
            author: "Test Author".to_string(),
            genre: Some(vec!["Testing".to_string()]),
            published_year: Some(2024),
            total_copies: Some(3),
            available_copies: Some(1),
            ..BookInput::default()
        }
    }

    #[tokio::test]
    async fn test_seed_only_once() {
        let catalog = service();
        assert_eq!(catalog.seed_if_empty().await.unwrap(), 12);
        assert_eq!(catalog.seed_if_empty().await.unwrap(), 0);
        assert_eq!(catalog.books().await.unwrap().len(), 12);
    }

    #[tokio::test]
    async fn test_mutations_invalidate_cache() {
        let catalog = service();
        catalog.seed_if_empty().await.unwrap();
        assert_eq!(catalog.books().await.unwrap().len(), 12);

        let created = catalog.create_book(input("A Testing Handbook")).await.unwrap();
        let books = catalog.books().await.unwrap();
        assert_eq!(books.len(), 13);
        assert_eq!(books[0].id, created.id);

        let mut edit = input("A Testing Handbook, 2nd ed.");
        edit.available_copies = Some(0);
        let updated = catalog.update_book(created.id, edit).await.unwrap();
        assert!(!updated.available);
        assert!(catalog
            .books()
            .await
            .unwrap()
            .iter()
            .any(|b| b.title == "A Testing Handbook, 2nd ed."));

        catalog.delete_book(created.id, true).await.unwrap();
        let books = catalog.books().await.unwrap();
        assert_eq!(books.len(), 12);
        assert!(books.iter().all(|b| b.id != created.id));
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let catalog = service();
        let created = catalog.create_book(input("Keep Me")).await.unwrap();
        assert!(matches!(
            catalog.delete_book(created.id, false).await,
            Err(AppError::ConfirmationRequired(_))
        ));
        assert!(catalog.get_book(created.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_ids() {
        let catalog = service();
        let id = Uuid::new_v4();
        assert!(matches!(catalog.get_book(id).await, Err(AppError::BookNotFound(_))));
        assert!(matches!(catalog.update_book(id, input("X")).await, Err(AppError::BookNotFound(_))));
        assert!(matches!(catalog.delete_book(id, true).await, Err(AppError::BookNotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_store() {
        let mut books = MockBookStore::new();
        books.expect_insert_book().never();
        books.expect_replace_book().never();
        let repository = Repository {
            books: Arc::new(books),
            ..Repository::memory()
        };
        let catalog = CatalogService::new(repository, CatalogConfig::default());

        let mut form = input("");
        assert!(matches!(catalog.create_book(form.clone()).await, Err(AppError::Validation(_))));

        form.title = "Over-allocated".to_string();
        form.available_copies = Some(10);
        assert!(matches!(
            catalog.update_book(Uuid::new_v4(), form).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_list_is_fetched_once_until_invalidated() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut books = MockBookStore::new();
        books.expect_list_books().returning(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![crate::models::BookRow {
                id: Uuid::new_v4(),
                title: "Only".to_string(),
                author: "One".to_string(),
                cover_image: None,
                description: None,
                genre: vec![],
                published_year: Some(2000),
                total_copies: 1,
                available_copies: 1,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }])
        });
        let repository = Repository {
            books: Arc::new(books),
            ..Repository::memory()
        };
        let catalog = CatalogService::new(repository, CatalogConfig::default());

        catalog.search(&CatalogQuery::default()).await.unwrap();
        catalog.genres().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        catalog.invalidate().await;
        catalog.home().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_admin_list_and_stats() {
        let catalog = service();
        catalog.seed_if_empty().await.unwrap();

        let all = catalog.admin_list(None).await.unwrap();
        assert!(all.windows(2).all(|w| w[0].title <= w[1].title));
        assert_eq!(catalog.admin_list(Some("Lee")).await.unwrap().len(), 2);

        let stats = catalog.inventory_stats().await.unwrap();
        assert_eq!(stats.titles, 12);
        assert_eq!(stats.total_copies, 173);
        assert_eq!(stats.available_copies, 71);
        assert_eq!(stats.unavailable_titles, 2);
    }
}
