//! In-process store holding the same tables as postgres

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BookStore, Credential, CredentialStore, ProfileStore};
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookRow, NewBookRow},
        profile::{NewProfile, Role, UpdateProfile, UserProfile},
    },
};

#[derive(Default)]
pub struct MemoryStore {
    books: RwLock<Vec<BookRow>>,
    profiles: RwLock<Vec<UserProfile>>,
    credentials: RwLock<Vec<Credential>>,
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list_books(&self) -> AppResult<Vec<BookRow>> {
        let mut rows = self.books.read().await.clone();
        rows.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(rows)
    }

    async fn get_book(&self, id: Uuid) -> AppResult<Option<BookRow>> {
        Ok(self.books.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn insert_book(&self, book: &NewBookRow) -> AppResult<BookRow> {
        let now = Utc::now();
        let row = BookRow {
            id: Uuid::new_v4(),
            title: book.title.clone(),
            author: book.author.clone(),
            cover_image: book.cover_image.clone(),
            description: book.description.clone(),
            genre: book.genre.clone(),
            published_year: book.published_year,
            total_copies: book.total_copies,
            available_copies: book.available_copies,
            created_at: now,
            updated_at: now,
        };
        self.books.write().await.push(row.clone());
        Ok(row)
    }

    async fn replace_book(&self, id: Uuid, book: &NewBookRow) -> AppResult<Option<BookRow>> {
        let mut books = self.books.write().await;
        let Some(row) = books.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        row.title = book.title.clone();
        row.author = book.author.clone();
        row.cover_image = book.cover_image.clone();
        row.description = book.description.clone();
        row.genre = book.genre.clone();
        row.published_year = book.published_year;
        row.total_copies = book.total_copies;
        row.available_copies = book.available_copies;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_book(&self, id: Uuid) -> AppResult<bool> {
        let mut books = self.books.write().await;
        let before = books.len();
        books.retain(|b| b.id != id);
        Ok(books.len() != before)
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn list_profiles(&self) -> AppResult<Vec<UserProfile>> {
        let mut rows = self.profiles.read().await.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get_profile(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        Ok(self.profiles.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_profile(&self, profile: &NewProfile) -> AppResult<UserProfile> {
        let mut profiles = self.profiles.write().await;
        if profiles.iter().any(|p| p.id == profile.id) {
            return Err(AppError::Conflict(format!("Profile {} already exists", profile.id)));
        }
        let row = UserProfile {
            id: profile.id,
            name: profile.name.clone(),
            email: profile.email.clone(),
            role: profile.role,
            avatar: None,
            created_at: Utc::now(),
        };
        profiles.push(row.clone());
        Ok(row)
    }

    async fn ensure_profile(&self, profile: &NewProfile) -> AppResult<UserProfile> {
        let mut profiles = self.profiles.write().await;
        if let Some(existing) = profiles.iter().find(|p| p.id == profile.id) {
            return Ok(existing.clone());
        }
        let row = UserProfile {
            id: profile.id,
            name: profile.name.clone(),
            email: profile.email.clone(),
            role: profile.role,
            avatar: None,
            created_at: Utc::now(),
        };
        profiles.push(row.clone());
        Ok(row)
    }

    async fn update_role(&self, id: Uuid, role: Role) -> AppResult<Option<UserProfile>> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles.iter_mut().find(|p| p.id == id).map(|p| {
            p.role = role;
            p.clone()
        }))
    }

    async fn update_profile(&self, id: Uuid, update: &UpdateProfile) -> AppResult<Option<UserProfile>> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles.iter_mut().find(|p| p.id == id).map(|p| {
            if let Some(ref name) = update.name {
                p.name = Some(name.clone());
            }
            if let Some(ref email) = update.email {
                p.email = Some(email.clone());
            }
            p.clone()
        }))
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Credential>> {
        Ok(self
            .credentials
            .read()
            .await
            .iter()
            .find(|c| same_email(&c.email, email))
            .cloned())
    }

    async fn insert_credential(&self, credential: &Credential) -> AppResult<()> {
        let mut credentials = self.credentials.write().await;
        if credentials
            .iter()
            .any(|c| same_email(&c.email, &credential.email))
        {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }
        credentials.push(credential.clone());
        Ok(())
    }

    async fn delete_credential(&self, user_id: Uuid) -> AppResult<()> {
        self.credentials
            .write()
            .await
            .retain(|c| c.user_id != user_id);
        Ok(())
    }
}

/// Matches `LOWER(a) = LOWER(b)` on postgres
fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
