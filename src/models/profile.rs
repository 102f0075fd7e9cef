//! User profile model and role

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Authorization role stored on the profile row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Librarian,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Librarian => "librarian",
        }
    }

    /// Development stub: an email mentioning "admin" or "librarian" belongs to a librarian
    pub fn infer_from_email(email: &str) -> Role {
        let email = email.to_lowercase();
        if email.contains("admin") || email.contains("librarian") {
            Role::Librarian
        } else {
            Role::Student
        }
    }

    /// Page a user lands on after signing in
    pub fn landing_path(&self) -> &'static str {
        match self {
            Role::Librarian => "/admin",
            Role::Student => "/dashboard",
        }
    }

    /// Librarians may do everything students may
    pub fn satisfies(&self, required: Role) -> bool {
        match required {
            Role::Student => true,
            Role::Librarian => *self == Role::Librarian,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "librarian" => Ok(Role::Librarian),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

// SQLx conversion for Role (stored as TEXT)
impl sqlx::Type<Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for Role {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Row of the `profiles` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    /// Same id as the identity provider's user
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Name shown in the navigation bar and dashboard greeting
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| "Reader".to_string())
    }
}

/// Profile created alongside a new identity
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
}

/// Self-service profile edit (name and email only)
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfile {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Role change request (librarian only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRole {
    pub role: Role,
}

/// Users per role, for the admin overview
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct RoleCounts {
    pub students: usize,
    pub librarians: usize,
}

impl RoleCounts {
    pub fn tally(profiles: &[UserProfile]) -> Self {
        profiles.iter().fold(Self::default(), |mut counts, p| {
            match p.role {
                Role::Student => counts.students += 1,
                Role::Librarian => counts.librarians += 1,
            }
            counts
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_inference_from_email() {
        assert_eq!(Role::infer_from_email("admin@example.com"), Role::Librarian);
        assert_eq!(Role::infer_from_email("head.Librarian@school.edu"), Role::Librarian);
        assert_eq!(Role::infer_from_email("student@example.com"), Role::Student);
    }

    #[test]
    fn test_landing_path() {
        assert_eq!(Role::Librarian.landing_path(), "/admin");
        assert_eq!(Role::Student.landing_path(), "/dashboard");
    }

    #[test]
    fn test_role_satisfies() {
        assert!(Role::Librarian.satisfies(Role::Student));
        assert!(Role::Librarian.satisfies(Role::Librarian));
        assert!(Role::Student.satisfies(Role::Student));
        assert!(!Role::Student.satisfies(Role::Librarian));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("Librarian".parse::<Role>(), Ok(Role::Librarian));
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_display_name_fallbacks() {
        let mut profile = UserProfile {
            id: Uuid::new_v4(),
            name: Some(" ".to_string()),
            email: Some("john.doe@example.com".to_string()),
            role: Role::Student,
            avatar: None,
            created_at: Utc::now(),
        };
        assert_eq!(profile.display_name(), "john.doe@example.com");
        profile.name = Some("John Doe".to_string());
        assert_eq!(profile.display_name(), "John Doe");
    }
}
