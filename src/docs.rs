//! OpenAPI document for the public routes, plus the Swagger UI and ReDoc
//! pages that render it.

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{self, dto as auth_dto},
    items::{self, dto as item_dto, repo::Item},
    state::AppState,
    system::{self, Banner, HealthResponse},
    validation::FieldError,
};

pub const SWAGGER_UI_PATH: &str = "/docs";
pub const REDOC_PATH: &str = "/redoc";
pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Name of the security scheme guarded operations refer to.
const BEARER: &str = "bearer";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "itemvault",
        description = "Users register and log in for a bearer token, then manage the items they own."
    ),
    paths(
        system::root,
        system::health,
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::get_me,
        auth::handlers::list_users,
        items::handlers::create_item,
        items::handlers::list_items,
        items::handlers::get_item,
        items::handlers::update_item,
        items::handlers::delete_item,
    ),
    components(schemas(
        auth_dto::RegisterRequest,
        auth_dto::LoginRequest,
        auth_dto::TokenResponse,
        auth_dto::PublicUser,
        item_dto::ItemRequest,
        item_dto::DeletedResponse,
        Item,
        Banner,
        HealthResponse,
        FieldError,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "User lookup"),
        (name = "items", description = "Owner-scoped item CRUD"),
        (name = "system", description = "Banner and health"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            BEARER,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// Serves the JSON document and both UIs. None of these need a token.
pub fn router() -> Router<AppState> {
    let doc = ApiDoc::openapi();
    Router::new()
        .merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, doc.clone()))
        .merge(Redoc::with_url(REDOC_PATH, doc))
}
