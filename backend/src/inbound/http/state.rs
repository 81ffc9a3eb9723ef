//! Shared HTTP adapter state.
//!
//! Handlers and the identity gate receive this through `web::Data`, so they
//! depend on driving ports only and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    CatalogueQuery, CommentsCommand, CommentsQuery, IdentityResolver, ReviewsCommand,
    ReviewsQuery, UserRegistration,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<dyn IdentityResolver>,
    pub registration: Arc<dyn UserRegistration>,
    pub catalogue: Arc<dyn CatalogueQuery>,
    pub reviews: Arc<dyn ReviewsCommand>,
    pub reviews_query: Arc<dyn ReviewsQuery>,
    pub comments: Arc<dyn CommentsCommand>,
    pub comments_query: Arc<dyn CommentsQuery>,
}
