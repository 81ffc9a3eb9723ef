//! Shared error mapping for Diesel repository implementations.
//!
//! Each repository supplies constructors for its own port error; these
//! helpers decide which one applies and log the underlying failure at debug
//! level. Messages handed to the constructors are fixed strings so no row
//! data reaches the domain error.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    debug!(%error, "database pool checkout failed");
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map Diesel errors that carry no repository-specific meaning.
pub(crate) fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    log_diesel_error(&error);

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DeserializationError(_) => query("stored row failed validation"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// A constraint violation reported by PostgreSQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Violation<'a> {
    Unique(Option<&'a str>),
    ForeignKey(Option<&'a str>),
}

impl Violation<'_> {
    /// Whether the violated constraint is `name`.
    pub(crate) fn is(&self, name: &str) -> bool {
        match self {
            Self::Unique(constraint) | Self::ForeignKey(constraint) => *constraint == Some(name),
        }
    }
}

/// Classify `error` as a unique or foreign-key violation, if it is one.
pub(crate) fn constraint_violation(error: &DieselError) -> Option<Violation<'_>> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(Violation::Unique(info.constraint_name()))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            Some(Violation::ForeignKey(info.constraint_name()))
        }
        _ => None,
    }
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, constraint = ?info.constraint_name(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, PartialEq, Eq)]
    enum Sample {
        Query(&'static str),
        Connection(String),
    }

    fn map(error: DieselError) -> Sample {
        map_basic_diesel_error(error, Sample::Query, |msg: &'static str| {
            Sample::Connection(msg.to_owned())
        })
    }

    struct Info(&'static str, Option<&'static str>);

    impl diesel::result::DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            self.0
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.1
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(Info("boom", constraint)))
    }

    #[rstest]
    fn closed_connections_map_to_connection_errors() {
        assert_eq!(
            map(database_error(DatabaseErrorKind::ClosedConnection, None)),
            Sample::Connection("database connection error".to_owned())
        );
    }

    #[rstest]
    #[case(DieselError::NotFound, "record not found")]
    #[case(DieselError::RollbackTransaction, "database error")]
    fn other_failures_map_to_query_errors(
        #[case] error: DieselError,
        #[case] expected: &'static str,
    ) {
        assert_eq!(map(error), Sample::Query(expected));
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        let mapped = map_basic_pool_error(PoolError::checkout("timed out"), Sample::Connection);
        assert_eq!(mapped, Sample::Connection("timed out".to_owned()));
    }

    #[rstest]
    fn unique_violations_are_classified_with_their_constraint() {
        let error = database_error(
            DatabaseErrorKind::UniqueViolation,
            Some("unique_user_id_per_review"),
        );
        let violation = constraint_violation(&error).expect("violation");

        assert!(matches!(violation, Violation::Unique(_)));
        assert!(violation.is("unique_user_id_per_review"));
        assert!(!violation.is("users_username_key"));
    }

    #[rstest]
    fn non_constraint_errors_are_not_violations() {
        assert_eq!(constraint_violation(&DieselError::NotFound), None);
    }
}
