//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mockable::DefaultClock;

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, ItemRepository, ItemRepositoryError,
    ReviewRepository, ReviewRepositoryError, UserPersistenceError, UserRepository,
};
use crate::domain::{
    AuthoredComment, AuthoredReview, CatalogueService, Comment, CommentContent, CommentId,
    CommentService, IdentityService, Item, ItemId, OwnedResource, Review, ReviewContent, ReviewId,
    ReviewService, StoredUser, User, UserId, Username, locate_owned,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::security::{Argon2CredentialHasher, HashingParams, JwtTokenCodec, TokenSecret};

/// Argon2 parameters cheap enough for tests.
pub fn fast_hashing_params() -> HashingParams {
    HashingParams {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    }
}

/// A fixed 32-byte signing secret.
pub fn fixed_token_secret() -> TokenSecret {
    TokenSecret::from_bytes(vec![b'k'; 32])
}

#[derive(Default)]
struct Tables {
    users: Vec<StoredUser>,
    items: Vec<Item>,
    reviews: Vec<Review>,
    comments: Vec<Comment>,
}

impl Tables {
    fn username_of(&self, id: &UserId) -> Option<Username> {
        self.users
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| stored.user.username().clone())
    }
}

/// In-memory implementation of every repository port.
///
/// Mirrors the relational adapters: unique usernames, item names and
/// `(user, item)` review pairs, ownership-scoped replace-by-recreate with
/// comments following their review, and cascading review deletes. All
/// mutations happen under one lock, so each is atomic.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored comments, across every review.
    pub fn comment_count(&self) -> usize {
        self.tables().comments.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &StoredUser) -> Result<(), UserPersistenceError> {
        let mut tables = self.tables();
        if tables
            .users
            .iter()
            .any(|stored| stored.user.username() == user.user.username())
        {
            return Err(UserPersistenceError::duplicate_username());
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<StoredUser>, UserPersistenceError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|stored| stored.user.username() == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|stored| stored.user.id() == id)
            .map(|stored| stored.user.clone()))
    }
}

#[async_trait]
impl ItemRepository for InMemoryStore {
    async fn list(&self) -> Result<Vec<Item>, ItemRepositoryError> {
        Ok(self.tables().items.clone())
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        Ok(self.tables().items.iter().find(|item| item.id == *id).cloned())
    }

    async fn create(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut tables = self.tables();
        if tables.items.iter().any(|existing| existing.name == item.name) {
            return Err(ItemRepositoryError::duplicate_name());
        }
        tables.items.push(item.clone());
        Ok(())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn create(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut tables = self.tables();
        if !tables.items.iter().any(|item| item.id == review.item_id) {
            return Err(ReviewRepositoryError::item_not_found());
        }
        if tables
            .reviews
            .iter()
            .any(|existing| existing.user_id == review.user_id && existing.item_id == review.item_id)
        {
            return Err(ReviewRepositoryError::duplicate_review());
        }
        tables.reviews.push(review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        Ok(self
            .tables()
            .reviews
            .iter()
            .find(|review| review.id == *id)
            .cloned())
    }

    async fn list_for_item(&self, item_id: &ItemId) -> Result<Vec<Review>, ReviewRepositoryError> {
        Ok(self
            .tables()
            .reviews
            .iter()
            .filter(|review| review.item_id == *item_id)
            .cloned()
            .collect())
    }

    async fn list_authored_by(
        &self,
        author: &UserId,
    ) -> Result<Vec<AuthoredReview>, ReviewRepositoryError> {
        let tables = self.tables();
        let Some(username) = tables.username_of(author) else {
            return Ok(Vec::new());
        };
        Ok(tables
            .reviews
            .iter()
            .filter(|review| review.is_owned_by(author))
            .map(|review| AuthoredReview {
                review: review.clone(),
                username: username.clone(),
            })
            .collect())
    }

    async fn replace_owned(
        &self,
        actor: &UserId,
        id: &ReviewId,
        content: ReviewContent,
    ) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut tables = self.tables();
        let Some(replacement) =
            locate_owned(&tables.reviews, *id, actor).map(|review| review.recreated(content))
        else {
            return Ok(None);
        };
        tables.reviews.retain(|review| review.id != *id);
        tables.reviews.push(replacement.clone());
        for comment in tables
            .comments
            .iter_mut()
            .filter(|comment| comment.review_id == *id)
        {
            comment.review_id = replacement.id;
        }
        Ok(Some(replacement))
    }

    async fn delete_owned(
        &self,
        actor: &UserId,
        id: &ReviewId,
    ) -> Result<bool, ReviewRepositoryError> {
        let mut tables = self.tables();
        if locate_owned(&tables.reviews, *id, actor).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|comment| comment.review_id != *id);
        tables.reviews.retain(|review| review.id != *id);
        Ok(true)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, comment: &Comment) -> Result<(), CommentRepositoryError> {
        let mut tables = self.tables();
        if !tables
            .reviews
            .iter()
            .any(|review| review.id == comment.review_id)
        {
            return Err(CommentRepositoryError::review_not_found());
        }
        tables.comments.push(comment.clone());
        Ok(())
    }

    async fn list_for_review(
        &self,
        review_id: &ReviewId,
    ) -> Result<Vec<Comment>, CommentRepositoryError> {
        Ok(self
            .tables()
            .comments
            .iter()
            .filter(|comment| comment.review_id == *review_id)
            .cloned()
            .collect())
    }

    async fn list_authored_by(
        &self,
        author: &UserId,
    ) -> Result<Vec<AuthoredComment>, CommentRepositoryError> {
        let tables = self.tables();
        let Some(username) = tables.username_of(author) else {
            return Ok(Vec::new());
        };
        Ok(tables
            .comments
            .iter()
            .filter(|comment| comment.is_owned_by(author))
            .map(|comment| AuthoredComment {
                comment: comment.clone(),
                username: username.clone(),
            })
            .collect())
    }

    async fn replace_owned(
        &self,
        actor: &UserId,
        id: &CommentId,
        content: CommentContent,
    ) -> Result<Option<Comment>, CommentRepositoryError> {
        let mut tables = self.tables();
        let Some(replacement) =
            locate_owned(&tables.comments, *id, actor).map(|comment| comment.recreated(content))
        else {
            return Ok(None);
        };
        tables.comments.retain(|comment| comment.id != *id);
        tables.comments.push(replacement.clone());
        Ok(Some(replacement))
    }

    async fn delete_owned(
        &self,
        actor: &UserId,
        id: &CommentId,
    ) -> Result<bool, CommentRepositoryError> {
        let mut tables = self.tables();
        if locate_owned(&tables.comments, *id, actor).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|comment| comment.id != *id);
        Ok(true)
    }
}

/// Wire the real services over `store` with a cheap hasher and a fixed secret.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
///
/// use reviewhub::test_support::{InMemoryStore, http_state};
///
/// let state = http_state(Arc::new(InMemoryStore::new()));
/// let _identity = state.identity.clone();
/// ```
pub fn http_state(store: Arc<InMemoryStore>) -> HttpState {
    let hasher = Arc::new(
        Argon2CredentialHasher::new(fast_hashing_params()).unwrap_or_else(|error| {
            panic!("test hashing parameters must be valid: {error}")
        }),
    );
    let tokens = Arc::new(JwtTokenCodec::new(
        &fixed_token_secret(),
        None,
        Arc::new(DefaultClock),
    ));
    let identity = Arc::new(IdentityService::new(Arc::clone(&store), hasher, tokens));
    let catalogue = Arc::new(CatalogueService::new(Arc::clone(&store)));
    let reviews = Arc::new(ReviewService::new(Arc::clone(&store)));
    let comments = Arc::new(CommentService::new(Arc::clone(&store), store));

    HttpState {
        identity: identity.clone(),
        registration: identity,
        catalogue,
        reviews: reviews.clone(),
        reviews_query: reviews,
        comments: comments.clone(),
        comments_query: comments,
    }
}
