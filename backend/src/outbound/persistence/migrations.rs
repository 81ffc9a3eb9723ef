//! Embedded schema migrations.
//!
//! Diesel's migration harness is synchronous, so migrations open a dedicated
//! `PgConnection` on the blocking pool rather than borrowing from [`DbPool`].
//!
//! [`DbPool`]: super::DbPool

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Could not open the migration connection.
    #[error("failed to connect for migrations: {message}")]
    Connect { message: String },
    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
    /// The blocking task panicked or was cancelled.
    #[error("migration task did not complete: {message}")]
    Task { message: String },
}

/// Apply all pending migrations to the database at `database_url`.
pub async fn run_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || apply_pending(&url))
        .await
        .map_err(|err| MigrationError::Task {
            message: err.to_string(),
        })?
}

fn apply_pending(database_url: &str) -> Result<(), MigrationError> {
    // Connection errors can echo the URL; keep only the error kind.
    let mut conn =
        PgConnection::establish(database_url).map_err(|err| MigrationError::Connect {
            message: connection_error_kind(&err).to_owned(),
        })?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrationError::Apply {
            message: err.to_string(),
        })?;
    info!(count = applied.len(), "database migrations applied");
    Ok(())
}

fn connection_error_kind(error: &diesel::ConnectionError) -> &'static str {
    match error {
        diesel::ConnectionError::InvalidCString(_) => "invalid connection string",
        diesel::ConnectionError::BadConnection(_) => "database unreachable",
        diesel::ConnectionError::InvalidConnectionUrl(_) => "invalid connection url",
        diesel::ConnectionError::CouldntSetupConfiguration(_) => "connection setup failed",
        _ => "connection failed",
    }
}
