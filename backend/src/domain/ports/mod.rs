//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod catalogue_query;
mod comment_repository;
mod comments_command;
mod comments_query;
mod credential_hasher;
mod identity_resolver;
mod item_repository;
mod review_repository;
mod reviews_command;
mod reviews_query;
mod token_codec;
mod user_registration;
mod user_repository;

pub use catalogue_query::CatalogueQuery;
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
pub use comments_command::CommentsCommand;
#[cfg(test)]
pub use comments_command::MockCommentsCommand;
pub use comments_query::CommentsQuery;
#[cfg(test)]
pub use comments_query::MockCommentsQuery;
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHasher};
pub use identity_resolver::IdentityResolver;
#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use item_repository::{ItemRepository, ItemRepositoryError};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use reviews_command::MockReviewsCommand;
pub use reviews_command::ReviewsCommand;
#[cfg(test)]
pub use reviews_query::MockReviewsQuery;
pub use reviews_query::ReviewsQuery;
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenError};
#[cfg(test)]
pub use user_registration::MockUserRegistration;
pub use user_registration::UserRegistration;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
