//! Credentials table on postgres

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use super::{Credential, CredentialStore};
use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: Pool<Postgres>,
}

impl PgCredentialStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Credential>> {
        let row = sqlx::query(
            "SELECT user_id, email, password_hash FROM credentials WHERE LOWER(email) = LOWER($1)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Credential {
            user_id: r.get("user_id"),
            email: r.get("email"),
            password_hash: r.get("password_hash"),
        }))
    }

    async fn insert_credential(&self, credential: &Credential) -> AppResult<()> {
        sqlx::query("INSERT INTO credentials (user_id, email, password_hash) VALUES ($1, $2, $3)")
            .bind(credential.user_id)
            .bind(&credential.email)
            .bind(&credential.password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::Conflict("An account with this email already exists".to_string())
                }
                other => AppError::Database(other),
            })?;
        Ok(())
    }

    async fn delete_credential(&self, user_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM credentials WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
