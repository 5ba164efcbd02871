use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::{docs, state::AppState};

/// Landing page: service name, version and where to look next.
#[derive(Debug, Serialize, ToSchema)]
pub struct Banner {
    #[schema(value_type = String)]
    pub message: &'static str,
    #[schema(value_type = String)]
    pub version: &'static str,
    #[schema(value_type = String, example = "/health")]
    pub health: &'static str,
    #[schema(value_type = String, example = "/docs")]
    pub docs: &'static str,
    #[schema(value_type = String, example = "/redoc")]
    pub redoc: &'static str,
    #[schema(value_type = String, example = "/api-docs/openapi.json")]
    pub openapi: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(value_type = String, example = "healthy")]
    pub status: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub timestamp: OffsetDateTime,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses((status = 200, description = "Service banner", body = Banner))
)]
pub async fn root() -> Json<Banner> {
    Json(Banner {
        message: "Welcome to itemvault",
        version: env!("CARGO_PKG_VERSION"),
        health: "/health",
        docs: docs::SWAGGER_UI_PATH,
        redoc: docs::REDOC_PATH,
        openapi: docs::OPENAPI_JSON_PATH,
    })
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses((status = 200, description = "Liveness probe", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: OffsetDateTime::now_utc(),
    })
}

/// Router fallback for unknown paths.
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": "Resource not found" })),
    )
}
