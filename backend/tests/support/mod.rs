//! PostgreSQL provisioning for the repository integration suite.
//!
//! By default a single embedded cluster (`pg-embed-setup-unpriv`) is shared by
//! the test binary and every test gets its own temporary database with the
//! migrations applied. Setting `REVIEWHUB_TEST_DATABASE_URL` points the suite
//! at an existing server instead.
//!
//! A cluster that cannot start fails the test. Set `SKIP_TEST_CLUSTER=1` in
//! environments where that is expected.

use std::fmt::Display;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;

use reviewhub::outbound::persistence::run_migrations;

/// Environment variable naming an external database to test against.
pub const DATABASE_URL_ENV: &str = "REVIEWHUB_TEST_DATABASE_URL";

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

static MIGRATION_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// A migrated database for one test.
///
/// Dropping it drops the temporary database when one was provisioned.
pub struct TestDatabase {
    url: String,
    _temporary: Option<TemporaryDatabase>,
}

impl TestDatabase {
    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

/// Returns true when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when skipping is allowed, otherwise fail the test.
pub fn handle_cluster_setup_failure<T>(reason: impl Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) => {
                if attempt >= SHARED_CLUSTER_RETRIES {
                    return Err(format!("shared cluster: {error:?}"));
                }
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Provision a database and apply the migrations to it.
pub fn provision_database(runtime: &Runtime) -> Result<TestDatabase, String> {
    let (url, temporary) = match std::env::var(DATABASE_URL_ENV) {
        Ok(url) => (url, None),
        Err(_) => {
            let database = shared_cluster()?
                .temporary_database(format!("reviewhub_{}", uuid::Uuid::new_v4().simple()))
                .map_err(|err| format!("temporary database: {err:?}"))?;
            (database.url().to_string(), Some(database))
        }
    };

    {
        // Parallel tests sharing an external database must not race on the
        // migrations table.
        let _guard = MIGRATION_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|err| err.into_inner());
        runtime
            .block_on(run_migrations(&url))
            .map_err(|err| err.to_string())?;
    }

    Ok(TestDatabase {
        url,
        _temporary: temporary,
    })
}
