use serde::Serialize;
use time::OffsetDateTime;

/// User record held by the user store.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,                      // sequential, starts at 1
    pub username: String,             // unique key
    pub email: String,
    pub full_name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,        // Argon2 hash, not exposed in JSON
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,   // creation timestamp
}

/// Fields supplied at registration; id and timestamps are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub password_hash: String,
}
