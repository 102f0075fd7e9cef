//! Session token claims, session change events and navigation state

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::profile::{Role, UserProfile};

/// JWT claims of a signed-in session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Identity provider user id
    pub sub: Uuid,
    /// Session id, revoked on sign-out
    pub sid: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}

/// Broadcast whenever the session picture changes, so open views re-check it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    SignedIn { user_id: Uuid, role: Role },
    SignedOut { user_id: Uuid },
    RoleChanged { user_id: Uuid, role: Role },
}

impl SessionEvent {
    /// SSE event name
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::SignedIn { .. } => "signed_in",
            SessionEvent::SignedOut { .. } => "signed_out",
            SessionEvent::RoleChanged { .. } => "role_changed",
        }
    }

    pub fn user_id(&self) -> Uuid {
        match self {
            SessionEvent::SignedIn { user_id, .. }
            | SessionEvent::SignedOut { user_id }
            | SessionEvent::RoleChanged { user_id, .. } => *user_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NavLink {
    pub label: String,
    pub path: String,
}

impl NavLink {
    fn new(label: &str, path: &str) -> Self {
        Self {
            label: label.to_string(),
            path: path.to_string(),
        }
    }
}

/// What the navigation bar shows for the current caller
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NavState {
    pub signed_in: bool,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub links: Vec<NavLink>,
}

impl NavState {
    fn public_links() -> Vec<NavLink> {
        vec![
            NavLink::new("Home", "/"),
            NavLink::new("Browse Books", "/books"),
            NavLink::new("About Us", "/about"),
            NavLink::new("Contact", "/contact"),
        ]
    }

    pub fn signed_out() -> Self {
        Self {
            signed_in: false,
            name: None,
            role: None,
            links: Self::public_links(),
        }
    }

    pub fn for_profile(profile: &UserProfile) -> Self {
        let mut links = Self::public_links();
        links.push(NavLink::new("Dashboard", "/dashboard"));
        if profile.role == Role::Librarian {
            links.push(NavLink::new("Admin", "/admin"));
        }
        Self {
            signed_in: true,
            name: Some(profile.display_name()),
            role: Some(profile.role),
            links,
        }
    }
}
