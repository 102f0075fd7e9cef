//! Business logic services

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod sessions;
pub mod users;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub catalog: catalog::CatalogService,
    pub users: users::UsersService,
    pub dashboard: dashboard::DashboardService,
    pub sessions: sessions::SessionRegistry,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        let sessions = sessions::SessionRegistry::new();
        let catalog = catalog::CatalogService::new(repository.clone(), config.catalog.clone());

        Self {
            auth: auth::AuthService::new(repository.clone(), config.auth.clone(), sessions.clone()),
            users: users::UsersService::new(repository, sessions.clone()),
            dashboard: dashboard::DashboardService::new(catalog.clone(), config.catalog.clone()),
            catalog,
            sessions,
        }
    }
}
