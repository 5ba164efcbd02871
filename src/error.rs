//! Boundary error type: every handler failure ends up here and is rendered
//! as a JSON `{"detail": ...}` body with the matching status code.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::{auth::repo::UsernameTaken, items::repo::ItemError, validation::FieldError};

pub const INVALID_CREDENTIALS: &str = "Could not validate credentials";
pub const BAD_LOGIN: &str = "Incorrect username or password";
pub const USER_NOT_FOUND: &str = "User not found";
pub const ITEM_NOT_FOUND: &str = "Item not found";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Username already registered")]
    UsernameTaken,

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("Not enough permissions")]
    Forbidden,

    #[error("{0}")]
    NotFound(&'static str),

    #[error("internal error: {0:#}")]
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::UsernameTaken => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(fields) => (status, Json(json!({ "detail": fields }))).into_response(),
            ApiError::Unauthorized(msg) => (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                Json(json!({ "detail": msg })),
            )
                .into_response(),
            ApiError::Internal(e) => {
                error!(error = %format!("{e:#}"), "internal error");
                (status, Json(json!({ "detail": "Internal server error" }))).into_response()
            }
            other => (status, Json(json!({ "detail": other.to_string() }))).into_response(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(fields: Vec<FieldError>) -> Self {
        ApiError::Validation(fields)
    }
}

impl From<UsernameTaken> for ApiError {
    fn from(_: UsernameTaken) -> Self {
        ApiError::UsernameTaken
    }
}

impl From<ItemError> for ApiError {
    fn from(e: ItemError) -> Self {
        match e {
            ItemError::NotFound(_) => ApiError::NotFound(ITEM_NOT_FOUND),
            ItemError::Forbidden { .. } => ApiError::Forbidden,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(vec![FieldError::new("query", rejection.body_text())])
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(vec![FieldError::new("path", rejection.body_text())])
    }
}
