//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed entities of the review service and the
//! use-cases that act on them. Nothing here knows about HTTP or SQL; inbound
//! adapters call the driving ports and outbound adapters implement the driven
//! ones.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure taxonomy.
//! - `User`, `Item`, `Review`, `Comment` and their validated content types.
//! - `IdentityService`, `CatalogueService`, `ReviewService`,
//!   `CommentService`: the use-cases behind the driving ports.

pub mod auth;
pub mod catalogue;
mod catalogue_service;
pub mod comments;
mod comment_service;
pub mod error;
mod identifiers;
mod identity_service;
pub mod ownership;
pub mod ports;
mod review_service;
pub mod reviews;
mod trace_id;
pub mod user;

pub use self::auth::{BearerToken, LoginCredentials, LoginValidationError, PasswordDigest, StoredUser};
pub use self::catalogue::{ITEM_NAME_MAX, Item, ItemValidationError};
pub use self::catalogue_service::CatalogueService;
pub use self::comment_service::CommentService;
pub use self::comments::{AuthoredComment, Comment, CommentContent, CommentValidationError};
pub use self::error::{
    Error, ErrorCode, ErrorValidationError, NOT_FOUND_OR_FORBIDDEN, TRACE_ID_HEADER,
};
pub use self::identifiers::{CommentId, InvalidIdentifier, ItemId, ReviewId, UserId};
pub use self::identity_service::IdentityService;
pub use self::ownership::{OwnedResource, locate_owned};
pub use self::review_service::ReviewService;
pub use self::reviews::{
    AuthoredReview, RATING_MAX, RATING_MIN, Rating, Review, ReviewContent, ReviewValidationError,
};
pub use self::trace_id::TraceId;
pub use self::user::{USERNAME_MAX, User, UserValidationError, Username};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use reviewhub::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found_or_forbidden("Review"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
