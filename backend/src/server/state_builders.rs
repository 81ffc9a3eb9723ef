//! Builders for HTTP state ports backed by the Diesel repositories.

use std::sync::Arc;

use mockable::DefaultClock;

use reviewhub::demo_data::DemoSeeder;
use reviewhub::domain::{CatalogueService, CommentService, IdentityService, ReviewService};
use reviewhub::inbound::http::state::HttpState;
use reviewhub::outbound::persistence::{
    DieselCommentRepository, DieselItemRepository, DieselReviewRepository, DieselUserRepository,
};
use reviewhub::outbound::security::{Argon2CredentialHasher, JwtTokenCodec};

use super::ServerConfig;

/// Wire the domain services over the configured pool.
///
/// # Errors
/// Returns [`std::io::Error`] when the hashing parameters are rejected.
pub fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let pool = &config.db_pool;
    let hasher = Argon2CredentialHasher::new(config.hashing)
        .map_err(|e| std::io::Error::other(format!("invalid hashing parameters: {e}")))?;
    let tokens = JwtTokenCodec::new(
        &config.token_secret,
        config.token_ttl,
        Arc::new(DefaultClock),
    );

    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let items = Arc::new(DieselItemRepository::new(pool.clone()));
    let reviews_repo = Arc::new(DieselReviewRepository::new(pool.clone()));
    let comments_repo = Arc::new(DieselCommentRepository::new(pool.clone()));

    let identity = Arc::new(IdentityService::new(
        users,
        Arc::new(hasher),
        Arc::new(tokens),
    ));
    let reviews = Arc::new(ReviewService::new(Arc::clone(&reviews_repo)));
    let comments = Arc::new(CommentService::new(comments_repo, reviews_repo));

    Ok(HttpState {
        identity: identity.clone(),
        registration: identity,
        catalogue: Arc::new(CatalogueService::new(items)),
        reviews: reviews.clone(),
        reviews_query: reviews,
        comments: comments.clone(),
        comments_query: comments,
    })
}

/// Build a demo seeder that writes through the same services as requests.
pub fn build_demo_seeder(config: &ServerConfig, http_state: &HttpState) -> DemoSeeder {
    DemoSeeder::new(
        Arc::clone(&http_state.registration),
        Arc::new(DieselItemRepository::new(config.db_pool.clone())),
        Arc::clone(&http_state.reviews),
        Arc::clone(&http_state.comments),
    )
}
