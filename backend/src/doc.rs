//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every handler under `/api` plus the health probes
//! - **Schemas**: domain entities, request bodies and the error envelope
//! - **Security**: the bearer token read from the `Authorization` header
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::domain::{
    AuthoredComment, AuthoredReview, BearerToken, Comment, Error, ErrorCode, Item, Review, User,
};
use crate::inbound::http::auth::CredentialsRequest;
use crate::inbound::http::comments::CommentRequest;
use crate::inbound::http::reviews::ReviewRequest;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the security scheme guarding identity-gated routes.
pub const BEARER_TOKEN_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_TOKEN_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "Token issued by POST /api/auth/login, sent verbatim without a scheme prefix.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Reviewhub API",
        description = "Catalogue items with per-user reviews and comments."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::catalogue::list_items,
        crate::inbound::http::catalogue::get_item,
        crate::inbound::http::reviews::list_item_reviews,
        crate::inbound::http::reviews::get_item_review,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::my_reviews,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::comments::list_review_comments,
        crate::inbound::http::comments::create_comment,
        crate::inbound::http::comments::my_comments,
        crate::inbound::http::comments::update_comment,
        crate::inbound::http::comments::delete_comment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Item,
        Review,
        AuthoredReview,
        Comment,
        AuthoredComment,
        BearerToken,
        Error,
        ErrorCode,
        CredentialsRequest,
        ReviewRequest,
        CommentRequest,
    )),
    tags(
        (name = "auth", description = "Registration, login and identity"),
        (name = "catalogue", description = "Reviewable items"),
        (name = "reviews", description = "Item reviews"),
        (name = "comments", description = "Comments on reviews"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
