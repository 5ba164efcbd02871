use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::auth::repo::User;
use crate::validation::{check_length, is_valid_email, FieldError, Validate};

/// Request body for user registration.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Unique login name
    #[schema(example = "alice", min_length = 3, max_length = 50)]
    pub username: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(min_length = 8)]
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_length(&mut errors, "username", &self.username, 3, Some(50));
        if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "must be a valid email address"));
        }
        check_length(&mut errors, "password", &self.password, 8, None);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Request body for login. Only its shape is checked; bad credentials are a 401.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    #[schema(value_type = String, example = "bearer")]
    pub token_type: &'static str,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize, ToSchema)]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            full_name: u.full_name,
            is_active: u.is_active,
            created_at: u.created_at,
        }
    }
}
