//! Profiles table on postgres

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::ProfileStore;
use crate::{
    error::{AppError, AppResult},
    models::profile::{NewProfile, Role, UpdateProfile, UserProfile},
};

#[derive(Clone)]
pub struct PgProfileStore {
    pool: Pool<Postgres>,
}

impl PgProfileStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn list_profiles(&self) -> AppResult<Vec<UserProfile>> {
        let rows = sqlx::query_as::<_, UserProfile>(
            "SELECT id, name, email, role, avatar, created_at FROM profiles ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_profile(&self, id: Uuid) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserProfile>(
            "SELECT id, name, email, role, avatar, created_at FROM profiles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_profile(&self, profile: &NewProfile) -> AppResult<UserProfile> {
        let row = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO profiles (id, name, email, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, role, avatar, created_at
            "#,
        )
        .bind(profile.id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(profile.role)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn ensure_profile(&self, profile: &NewProfile) -> AppResult<UserProfile> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, name, email, role)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(profile.id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(profile.role)
        .execute(&self.pool)
        .await?;

        self.get_profile(profile.id)
            .await?
            .ok_or_else(|| AppError::ProfileNotFound(format!("No profile for user {}", profile.id)))
    }

    async fn update_role(&self, id: Uuid, role: Role) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE profiles SET role = $2 WHERE id = $1
            RETURNING id, name, email, role, avatar, created_at
            "#,
        )
        .bind(id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_profile(&self, id: Uuid, update: &UpdateProfile) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE profiles
            SET name = COALESCE($2, name), email = COALESCE($3, email)
            WHERE id = $1
            RETURNING id, name, email, role, avatar, created_at
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
