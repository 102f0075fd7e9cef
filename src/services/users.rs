//! Profile management service

use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        profile::{Role, RoleCounts, UpdateProfile, UserProfile},
        session::SessionEvent,
    },
    repository::Repository,
    services::sessions::SessionRegistry,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    sessions: SessionRegistry,
}

impl UsersService {
    pub fn new(repository: Repository, sessions: SessionRegistry) -> Self {
        Self { repository, sessions }
    }

    /// Get profile by user id
    pub async fn get_profile(&self, id: Uuid) -> AppResult<UserProfile> {
        self.repository
            .profiles
            .get_profile(id)
            .await?
            .ok_or_else(|| AppError::ProfileNotFound(format!("Profile {} not found", id)))
    }

    /// All profiles, newest first
    pub async fn list_profiles(&self) -> AppResult<Vec<UserProfile>> {
        self.repository.profiles.list_profiles().await
    }

    pub async fn role_counts(&self) -> AppResult<RoleCounts> {
        Ok(RoleCounts::tally(&self.list_profiles().await?))
    }

    /// Update the caller's own name and email
    pub async fn update_my_profile(&self, id: Uuid, update: UpdateProfile) -> AppResult<UserProfile> {
        update.validate()?;
        let update = UpdateProfile {
            name: update.name.map(|n| n.trim().to_string()),
            email: update.email.map(|e| e.trim().to_string()),
        };
        if update.name.as_deref() == Some("") {
            return Err(AppError::Validation("Name cannot be empty".to_string()));
        }

        let profile = self
            .repository
            .profiles
            .update_profile(id, &update)
            .await?
            .ok_or_else(|| AppError::ProfileNotFound(format!("Profile {} not found", id)))?;
        tracing::info!(user_id = %id, "Profile updated");
        Ok(profile)
    }

    /// Change the role of one profile
    pub async fn update_role(&self, id: Uuid, role: Role) -> AppResult<UserProfile> {
        let profile = self
            .repository
            .profiles
            .update_role(id, role)
            .await?
            .ok_or_else(|| AppError::ProfileNotFound(format!("Profile {} not found", id)))?;
        tracing::info!(user_id = %id, role = %role, "Role changed");
        self.sessions.publish(SessionEvent::RoleChanged { user_id: id, role });
        Ok(profile)
    }
}
