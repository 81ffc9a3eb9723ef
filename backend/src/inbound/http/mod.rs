//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod catalogue;
pub mod comments;
pub mod error;
pub mod health;
pub mod identity_gate;
pub mod reviews;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use identity_gate::{CurrentUser, RequireIdentity};

/// Register every `/api` route on `cfg`.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(auth::register)
            .service(auth::login)
            .service(auth::current_user)
            .service(catalogue::list_items)
            .service(reviews::list_item_reviews)
            .service(reviews::get_item_review)
            .service(reviews::create_review)
            .service(comments::list_review_comments)
            .service(comments::create_comment)
            .service(catalogue::get_item)
            .service(reviews::my_reviews)
            .service(reviews::update_review)
            .service(reviews::delete_review)
            .service(comments::my_comments)
            .service(comments::update_comment)
            .service(comments::delete_comment),
    );
}

/// JSON extractor configuration that reports body errors with the domain
/// error envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(validation::json_error_handler)
}
