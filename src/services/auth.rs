//! Sign-in, registration and session lifecycle

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    config::{AuthConfig, AuthMode},
    error::{AppError, AppResult},
    models::{
        profile::{NewProfile, Role, UserProfile},
        session::{NavState, SessionClaims, SessionEvent},
    },
    repository::{Credential, Repository},
    services::sessions::SessionRegistry,
};

/// Namespace for the stable user ids handed out in demo mode
const DEMO_NAMESPACE: Uuid = Uuid::from_u128(0x5265_6164_4561_7379_4261_6e6b_4465_6d6f);

/// An opened session
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionGrant {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub role: Role,
    /// Where the client goes next
    pub redirect: String,
    pub profile: UserProfile,
}

/// New account details
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<Role>,
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    sessions: SessionRegistry,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig, sessions: SessionRegistry) -> Self {
        Self {
            repository,
            config,
            sessions,
        }
    }

    /// Sign in with email and password
    pub async fn login(&self, email: &str, password: &str) -> AppResult<SessionGrant> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::Validation("Email and password are required".to_string()));
        }

        let profile = match self.config.mode {
            AuthMode::Managed => {
                let credential = self
                    .repository
                    .credentials
                    .find_by_email(email)
                    .await?
                    .ok_or_else(|| AppError::Authentication("Invalid email or password".to_string()))?;

                if !verify_password(&credential.password_hash, password)? {
                    return Err(AppError::Authentication("Invalid email or password".to_string()));
                }

                self.repository
                    .profiles
                    .get_profile(credential.user_id)
                    .await?
                    .ok_or_else(|| {
                        AppError::ProfileNotFound(format!("No profile for user {}", credential.user_id))
                    })?
            }
            AuthMode::Demo => {
                let role = Role::infer_from_email(email);
                self.repository
                    .profiles
                    .ensure_profile(&NewProfile {
                        id: demo_user_id(email),
                        name: None,
                        email: Some(email.to_string()),
                        role,
                    })
                    .await?
            }
        };

        tracing::info!(user_id = %profile.id, role = %profile.role, "User signed in");
        self.open_session(profile).await
    }

    /// Create an account and sign it in
    pub async fn register(&self, registration: Registration) -> AppResult<SessionGrant> {
        if registration.password != registration.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }
        let email = registration.email.trim().to_string();
        if email.is_empty() || registration.password.is_empty() {
            return Err(AppError::Validation("Email and password are required".to_string()));
        }
        let name = Some(registration.name.trim().to_string()).filter(|n| !n.is_empty());

        let profile = match self.config.mode {
            AuthMode::Managed => {
                if self.repository.credentials.find_by_email(&email).await?.is_some() {
                    return Err(AppError::Conflict(
                        "An account with this email already exists".to_string(),
                    ));
                }
                let user_id = Uuid::new_v4();
                self.repository
                    .credentials
                    .insert_credential(&Credential {
                        user_id,
                        email: email.clone(),
                        password_hash: hash_password(&registration.password)?,
                    })
                    .await?;
                let inserted = self
                    .repository
                    .profiles
                    .insert_profile(&NewProfile {
                        id: user_id,
                        name,
                        email: Some(email),
                        role: registration.role.unwrap_or(Role::Student),
                    })
                    .await;
                match inserted {
                    Ok(profile) => profile,
                    Err(e) => {
                        // Release the email so the account can be registered again
                        if let Err(cleanup) =
                            self.repository.credentials.delete_credential(user_id).await
                        {
                            tracing::error!(%user_id, "Failed to remove orphaned credential: {}", cleanup);
                        }
                        return Err(e);
                    }
                }
            }
            AuthMode::Demo => {
                let role = registration
                    .role
                    .unwrap_or_else(|| Role::infer_from_email(&email));
                self.repository
                    .profiles
                    .ensure_profile(&NewProfile {
                        id: demo_user_id(&email),
                        name,
                        email: Some(email),
                        role,
                    })
                    .await?
            }
        };

        tracing::info!(user_id = %profile.id, role = %profile.role, "Account registered");
        self.open_session(profile).await
    }

    /// End the session carried by `claims`
    pub async fn logout(&self, claims: &SessionClaims) {
        if self.sessions.close(claims.sid).await.is_some() {
            let remaining = self.sessions.count_for_user(claims.sub).await;
            tracing::info!(user_id = %claims.sub, remaining, "User signed out");
            self.sessions
                .publish(SessionEvent::SignedOut { user_id: claims.sub });
        }
    }

    /// Validate a bearer token against the signing key and the open sessions
    pub async fn authenticate_token(&self, token: &str) -> AppResult<SessionClaims> {
        let claims = SessionClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;
        if !self.sessions.is_active(claims.sid).await {
            return Err(AppError::Authentication("Session has ended".to_string()));
        }
        Ok(claims)
    }

    /// Navigation state of the caller; signed out when there is no session
    pub async fn nav_state(&self, claims: Option<&SessionClaims>) -> AppResult<NavState> {
        let Some(claims) = claims else {
            return Ok(NavState::signed_out());
        };
        Ok(match self.repository.profiles.get_profile(claims.sub).await? {
            Some(profile) => NavState::for_profile(&profile),
            None => NavState::signed_out(),
        })
    }

    async fn open_session(&self, profile: UserProfile) -> AppResult<SessionGrant> {
        let now = Utc::now().timestamp();
        let expires_in = self.config.jwt_expiration_hours as i64 * 3600;
        let claims = SessionClaims {
            sub: profile.id,
            sid: Uuid::new_v4(),
            email: profile.email.clone().unwrap_or_default(),
            role: profile.role,
            exp: now + expires_in,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        self.sessions.open(claims.sid, profile.id, claims.exp).await;
        self.sessions.publish(SessionEvent::SignedIn {
            user_id: profile.id,
            role: profile.role,
        });

        Ok(SessionGrant {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            role: profile.role,
            redirect: profile.role.landing_path().to_string(),
            profile,
        })
    }
}

/// Stable user id for an email address in demo mode
fn demo_user_id(email: &str) -> Uuid {
    Uuid::new_v5(&DEMO_NAMESPACE, email.to_lowercase().as_bytes())
}

fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password using Argon2
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
