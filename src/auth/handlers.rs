use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn, Span};

use crate::{
    auth::{
        dto::{LoginRequest, PublicUser, RegisterRequest, TokenResponse},
        extractors::AuthUser,
        password::{hash_password, verify_password},
        repo::NewUser,
    },
    error::{ApiError, BAD_LOGIN},
    state::AppState,
    validation::{FieldError, ValidatedJson},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(get_me))
}

#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User created", body = PublicUser),
        (status = 400, description = "Username already registered"),
        (status = 422, description = "Invalid field values", body = [FieldError]),
    )
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    // Cheap pre-check so duplicates don't pay for hashing; `create` re-checks under the lock.
    if state.users.find_by_username(&payload.username).is_some() {
        warn!("username already registered");
        return Err(ApiError::UsernameTaken);
    }

    let password_hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Internal(e)
    })?;

    let user = state
        .users
        .create(NewUser {
            username: payload.username,
            email: payload.email,
            full_name: payload.full_name,
            password_hash,
        })
        .map_err(|e| {
            warn!(error = %e, "lost registration race");
            ApiError::from(e)
        })?;

    info!(user_id = user.id, "user registered");
    Ok(Json(user.into()))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Bearer token issued", body = TokenResponse),
        (status = 401, description = "Incorrect username or password"),
        (status = 422, description = "Malformed body", body = [FieldError]),
    )
)]
#[instrument(skip(state, payload), fields(username = tracing::field::Empty))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(payload) = payload?;
    Span::current().record("username", payload.username.as_str());

    let Some(user) = state.users.find_by_username(&payload.username) else {
        warn!("login unknown username");
        return Err(ApiError::Unauthorized(BAD_LOGIN));
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, user_id = user.id, "verify_password failed");
        ApiError::Internal(e)
    })?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::Unauthorized(BAD_LOGIN));
    }

    let access_token = state
        .keys
        .issue(&user.username, Some(state.keys.access_ttl))
        .map_err(|e| {
            error!(error = %e, "jwt sign failed");
            ApiError::Internal(e.into())
        })?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(TokenResponse::bearer(access_token)))
}

#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "The authenticated user", body = PublicUser),
        (status = 401, description = "Missing, invalid or expired token"),
    )
)]
#[instrument(skip_all, fields(user_id = user.id))]
pub async fn get_me(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(user.into())
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses((status = 200, description = "All registered users", body = [PublicUser]))
)]
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<PublicUser>> {
    Json(state.users.list_all().into_iter().map(PublicUser::from).collect())
}
