//! Demo data seeding for local development.
//!
//! When `REVIEWHUB_SEED_DEMO_DATA` is enabled, start-up populates an empty
//! catalogue with two users, two items, one review and one comment. Seeding
//! goes through the same driving ports as HTTP requests, so passwords are
//! hashed and every invariant is checked as usual.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::domain::ports::{
    CommentsCommand, ItemRepository, ItemRepositoryError, ReviewsCommand, UserRegistration,
};
use crate::domain::{
    CommentContent, CommentValidationError, Error, Item, ItemValidationError, LoginCredentials,
    LoginValidationError, ReviewContent, ReviewValidationError,
};

const DEMO_USERS: [(&str, &str); 2] = [("testuser1", "password1"), ("testuser2", "password2")];
const DEMO_ITEMS: [(&str, &str, &str); 2] = [
    ("Item 1", "Description for Item 1", "image1.jpg"),
    ("Item 2", "Description for Item 2", "image2.jpg"),
];
const DEMO_REVIEW: (&str, i32) = ("Great product!", 5);
const DEMO_COMMENT: &str = "I agree!";

/// Errors returned while seeding demo data.
#[derive(Debug, Error)]
pub enum DemoSeedError {
    #[error("demo credentials are invalid: {0}")]
    Credentials(#[from] LoginValidationError),
    #[error("demo item is invalid: {0}")]
    Item(#[from] ItemValidationError),
    #[error("demo review is invalid: {0}")]
    Review(#[from] ReviewValidationError),
    #[error("demo comment is invalid: {0}")]
    Comment(#[from] CommentValidationError),
    #[error("item repository error: {0}")]
    Repository(#[from] ItemRepositoryError),
    #[error("demo seeding failed: {0}")]
    Domain(#[from] Error),
}

/// Summary of an applied seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSeedOutcome {
    pub users: usize,
    pub items: usize,
    pub reviews: usize,
    pub comments: usize,
}

/// Seeds demo rows through the driving ports.
pub struct DemoSeeder {
    registration: Arc<dyn UserRegistration>,
    items: Arc<dyn ItemRepository>,
    reviews: Arc<dyn ReviewsCommand>,
    comments: Arc<dyn CommentsCommand>,
}

impl DemoSeeder {
    pub fn new(
        registration: Arc<dyn UserRegistration>,
        items: Arc<dyn ItemRepository>,
        reviews: Arc<dyn ReviewsCommand>,
        comments: Arc<dyn CommentsCommand>,
    ) -> Self {
        Self {
            registration,
            items,
            reviews,
            comments,
        }
    }

    /// Seed demo data unless the catalogue already has items.
    ///
    /// Returns `None` when seeding was skipped.
    pub async fn seed(&self) -> Result<Option<DemoSeedOutcome>, DemoSeedError> {
        if !self.items.list().await?.is_empty() {
            info!(reason = "catalogue not empty", "demo data seeding skipped");
            return Ok(None);
        }

        let mut users = Vec::with_capacity(DEMO_USERS.len());
        for (username, password) in DEMO_USERS {
            let credentials = LoginCredentials::try_from_parts(username, password)?;
            users.push(self.registration.register(&credentials).await?);
        }

        let mut items = Vec::with_capacity(DEMO_ITEMS.len());
        for (name, description, image_url) in DEMO_ITEMS {
            let item = Item::try_new(
                name,
                Some(description.to_owned()),
                Some(image_url.to_owned()),
            )?;
            self.items.create(&item).await?;
            items.push(item);
        }

        let (reviewer, commenter, item) = match (users.first(), users.get(1), items.first()) {
            (Some(reviewer), Some(commenter), Some(item)) => (reviewer, commenter, item),
            _ => return Err(Error::internal("demo fixtures are incomplete").into()),
        };

        let (text, rating) = DEMO_REVIEW;
        let review = self
            .reviews
            .create_review(
                reviewer.id(),
                &item.id,
                ReviewContent::try_from_parts(text, rating)?,
            )
            .await?;
        self.comments
            .create_comment(
                commenter.id(),
                &item.id,
                &review.id,
                CommentContent::try_new(DEMO_COMMENT)?,
            )
            .await?;

        let outcome = DemoSeedOutcome {
            users: users.len(),
            items: items.len(),
            reviews: 1,
            comments: 1,
        };
        info!(
            users = outcome.users,
            items = outcome.items,
            reviews = outcome.reviews,
            comments = outcome.comments,
            "demo data seeded"
        );
        Ok(Some(outcome))
    }
}

/// Apply demo data on start-up when enabled.
pub async fn seed_demo_data_on_startup(
    enabled: bool,
    seeder: &DemoSeeder,
) -> Result<Option<DemoSeedOutcome>, DemoSeedError> {
    if !enabled {
        info!(reason = "disabled", "demo data seeding skipped");
        return Ok(None);
    }
    seeder.seed().await
}
