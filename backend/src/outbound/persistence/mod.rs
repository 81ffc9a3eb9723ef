//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports, backed by
//! PostgreSQL through `diesel-async` and a `bb8` connection pool.
//!
//! - Row structs (`models.rs`) and the table DSL (`schema.rs`) stay private
//!   to this module; repositories translate them into domain types.
//! - Every Diesel error is mapped to the port's error type, with constraint
//!   names translated into domain meaning where one exists.
//! - Owner-scoped updates and deletes run inside a single transaction that
//!   locks the target row.
//!
//! # Example
//!
//! ```ignore
//! use reviewhub::outbound::persistence::{DbPool, DieselReviewRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/reviewhub")).await?;
//! let reviews = DieselReviewRepository::new(pool);
//! ```

pub(crate) mod diesel_helpers;
mod diesel_comment_repository;
mod diesel_item_repository;
mod diesel_review_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_item_repository::DieselItemRepository;
pub use diesel_review_repository::DieselReviewRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
