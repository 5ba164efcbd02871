use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    routing::{get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::extractors::AuthUser,
    error::{ApiError, ITEM_NOT_FOUND},
    items::{
        dto::{DeletedResponse, ItemRequest, Pagination},
        repo::Item,
    },
    state::AppState,
    validation::{FieldError, ValidatedJson},
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items))
        .route("/items/", get(list_items))
        .route("/items/:id", get(get_item))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/items", post(create_item))
        .route("/items/", post(create_item))
        .route("/items/:id", put(update_item).delete(delete_item))
}

// --- handlers ---

#[utoipa::path(
    post,
    path = "/items/",
    tag = "items",
    security(("bearer" = [])),
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Item created and owned by the caller", body = Item),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 422, description = "Invalid field values", body = [FieldError]),
    )
)]
#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn create_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidatedJson(payload): ValidatedJson<ItemRequest>,
) -> Json<Item> {
    let item = state.items.create(payload.into(), user.id);
    info!(item_id = item.id, "item created");
    Json(item)
}

#[utoipa::path(
    get,
    path = "/items/",
    tag = "items",
    params(Pagination),
    responses(
        (status = 200, description = "Items in creation order", body = [Item]),
        (status = 422, description = "Non-integer query value", body = [FieldError]),
    )
)]
#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    query: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let Query(p) = query?;
    Ok(Json(state.items.list_page(p.skip, p.limit)))
}

#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "The item", body = Item),
        (status = 404, description = "Item not found"),
    )
)]
#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Item>, ApiError> {
    let Path(id) = path?;
    state
        .items
        .get(id)
        .map(Json)
        .ok_or(ApiError::NotFound(ITEM_NOT_FOUND))
}

#[utoipa::path(
    put,
    path = "/items/{id}",
    tag = "items",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Item id")),
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Item replaced", body = Item),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 403, description = "Caller does not own the item"),
        (status = 404, description = "Item not found"),
        (status = 422, description = "Invalid field values", body = [FieldError]),
    )
)]
#[instrument(skip(state, user, payload), fields(user_id = user.id))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
    ValidatedJson(payload): ValidatedJson<ItemRequest>,
) -> Result<Json<Item>, ApiError> {
    let Path(id) = path?;
    let item = state
        .items
        .update(id, payload.into(), user.id)
        .map_err(|e| {
            warn!(error = %e, "update rejected");
            ApiError::from(e)
        })?;
    info!(item_id = item.id, "item updated");
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/items/{id}",
    tag = "items",
    security(("bearer" = [])),
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted", body = DeletedResponse),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 403, description = "Caller does not own the item"),
        (status = 404, description = "Item not found"),
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let Path(id) = path?;
    state.items.delete(id, user.id).map_err(|e| {
        warn!(error = %e, "delete rejected");
        ApiError::from(e)
    })?;
    info!(item_id = id, "item deleted");
    Ok(Json(DeletedResponse {
        message: "Item deleted successfully",
    }))
}
