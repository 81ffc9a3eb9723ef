//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::ports::{
    CatalogueQuery, CommentsCommand, CommentsQuery, IdentityResolver, MockCatalogueQuery,
    MockCommentsCommand, MockCommentsQuery, MockIdentityResolver, MockReviewsCommand,
    MockReviewsQuery, MockUserRegistration, ReviewsCommand, ReviewsQuery, UserRegistration,
};
use crate::domain::{Error, User, UserId, Username};

use super::state::HttpState;

/// Token accepted by [`resolver_for`].
pub const TEST_TOKEN: &str = "test-token";

/// Builds an [`HttpState`] whose ports default to expectation-free mocks, so
/// any unexpected port call panics.
pub struct StateBuilder {
    state: HttpState,
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self {
            state: HttpState {
                identity: Arc::new(MockIdentityResolver::new()),
                registration: Arc::new(MockUserRegistration::new()),
                catalogue: Arc::new(MockCatalogueQuery::new()),
                reviews: Arc::new(MockReviewsCommand::new()),
                reviews_query: Arc::new(MockReviewsQuery::new()),
                comments: Arc::new(MockCommentsCommand::new()),
                comments_query: Arc::new(MockCommentsQuery::new()),
            },
        }
    }
}

impl StateBuilder {
    pub fn identity(mut self, port: impl IdentityResolver + 'static) -> Self {
        self.state.identity = Arc::new(port);
        self
    }

    pub fn registration(mut self, port: impl UserRegistration + 'static) -> Self {
        self.state.registration = Arc::new(port);
        self
    }

    pub fn catalogue(mut self, port: impl CatalogueQuery + 'static) -> Self {
        self.state.catalogue = Arc::new(port);
        self
    }

    pub fn reviews(mut self, port: impl ReviewsCommand + 'static) -> Self {
        self.state.reviews = Arc::new(port);
        self
    }

    pub fn reviews_query(mut self, port: impl ReviewsQuery + 'static) -> Self {
        self.state.reviews_query = Arc::new(port);
        self
    }

    pub fn comments(mut self, port: impl CommentsCommand + 'static) -> Self {
        self.state.comments = Arc::new(port);
        self
    }

    pub fn comments_query(mut self, port: impl CommentsQuery + 'static) -> Self {
        self.state.comments_query = Arc::new(port);
        self
    }

    pub fn build(self) -> HttpState {
        self.state
    }
}

/// State with only the identity port wired.
pub fn state_with_identity(identity: Arc<dyn IdentityResolver>) -> HttpState {
    let mut state = StateBuilder::default().build();
    state.identity = identity;
    state
}

/// A user named `username` with a fresh identifier.
pub fn user_named(username: &str) -> User {
    User::new(
        UserId::random(),
        Username::new(username).expect("valid username"),
    )
}

/// Resolver that maps [`TEST_TOKEN`] to `user` and rejects everything else.
pub fn resolver_for(user: User) -> MockIdentityResolver {
    let mut identity = MockIdentityResolver::new();
    identity.expect_resolve().returning(move |token| {
        if token == TEST_TOKEN {
            Ok(user.clone())
        } else {
            Err(Error::unauthorized("invalid token"))
        }
    });
    identity
}
