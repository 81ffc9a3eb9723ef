//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **security**: Argon2id credential hashing and signed bearer tokens
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod persistence;
pub mod security;
