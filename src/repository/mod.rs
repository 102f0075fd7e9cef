//! Repository layer: the external relational store and identity store.
//!
//! Each concern is a trait so the postgres tables and the in-process memory
//! backend are interchangeable behind [`Repository`].

pub mod books;
pub mod credentials;
pub mod memory;
pub mod profiles;

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{BookRow, NewBookRow},
        profile::{NewProfile, Role, UpdateProfile, UserProfile},
    },
};

/// The `books` table
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All books, ordered by title
    async fn list_books(&self) -> AppResult<Vec<BookRow>>;

    async fn get_book(&self, id: Uuid) -> AppResult<Option<BookRow>>;

    async fn insert_book(&self, book: &NewBookRow) -> AppResult<BookRow>;

    /// Full-row replace; `None` when no row has this id
    async fn replace_book(&self, id: Uuid, book: &NewBookRow) -> AppResult<Option<BookRow>>;

    /// Returns whether a row was deleted
    async fn delete_book(&self, id: Uuid) -> AppResult<bool>;
}

/// The `profiles` table
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// All profiles, newest first
    async fn list_profiles(&self) -> AppResult<Vec<UserProfile>>;

    async fn get_profile(&self, id: Uuid) -> AppResult<Option<UserProfile>>;

    async fn insert_profile(&self, profile: &NewProfile) -> AppResult<UserProfile>;

    /// Insert when no row has this id; an existing row is returned unchanged
    async fn ensure_profile(&self, profile: &NewProfile) -> AppResult<UserProfile>;

    async fn update_role(&self, id: Uuid, role: Role) -> AppResult<Option<UserProfile>>;

    /// Update name and/or email; absent fields are left unchanged
    async fn update_profile(&self, id: Uuid, update: &UpdateProfile) -> AppResult<Option<UserProfile>>;
}

/// Identity provider record
#[derive(Debug, Clone, PartialEq)]
pub struct Credential {
    pub user_id: Uuid,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
}

/// The identity provider's credential store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Case-insensitive lookup by email
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Credential>>;

    async fn insert_credential(&self, credential: &Credential) -> AppResult<()>;

    async fn delete_credential(&self, user_id: Uuid) -> AppResult<()>;
}

/// Container for all stores
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
    pub profiles: Arc<dyn ProfileStore>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl Repository {
    /// Repository backed by the postgres tables
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            books: Arc::new(books::PgBookStore::new(pool.clone())),
            profiles: Arc::new(profiles::PgProfileStore::new(pool.clone())),
            credentials: Arc::new(credentials::PgCredentialStore::new(pool)),
        }
    }

    /// Repository held entirely in process
    pub fn memory() -> Self {
        let store = Arc::new(memory::MemoryStore::default());
        Self {
            books: store.clone(),
            profiles: store.clone(),
            credentials: store,
        }
    }
}
