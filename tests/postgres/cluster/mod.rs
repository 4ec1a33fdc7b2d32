//! Embedded `PostgreSQL` cluster shared by the adapter tests.

mod env_utils;
mod fs_utils;

use self::env_utils::{env_vars_to_os, port_override};
use self::fs_utils::{sync_password_from_file, sync_port_from_pid};
use crate::test_helpers::EnvVarGuard;
use diesel::prelude::*;
use pg_embedded_setup_unpriv::worker_process_test_api::{
    WorkerOperation, WorkerRequest, WorkerRequestArgs, run as run_worker,
};
use pg_embedded_setup_unpriv::{ExecutionPrivileges, TestBootstrapSettings, bootstrap_for_tests};
use postgresql_embedded::{PostgreSQL, Settings, Status};
use rstest::fixture;
use std::sync::{Mutex, OnceLock};
use tokio::runtime::Runtime;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

static SHARED_CLUSTER: OnceLock<Result<ManagedCluster, String>> = OnceLock::new();
static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Shared cluster handle.
pub type PostgresCluster = &'static ManagedCluster;

/// A running embedded cluster.
///
/// In-process clusters keep their runtime and server handle here; clusters
/// started through the privileged worker outlive the test process.
pub struct ManagedCluster {
    settings: Settings,
    _runtime: Option<Runtime>,
    _postgres: Option<PostgreSQL>,
}

impl ManagedCluster {
    fn start() -> Result<Self, BoxError> {
        let port_guard = EnvVarGuard::set_many(&port_override()?);
        let bootstrap = bootstrap_for_tests().map_err(boxed)?;
        drop(port_guard);
        match bootstrap.privileges {
            ExecutionPrivileges::Root => Self::start_via_worker(bootstrap),
            ExecutionPrivileges::Unprivileged => Self::start_in_process(bootstrap),
        }
    }

    fn start_in_process(mut bootstrap: TestBootstrapSettings) -> Result<Self, BoxError> {
        sync_password_from_file(&mut bootstrap.settings)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(boxed)?;
        let env_guard = EnvVarGuard::set_many(&env_vars_to_os(&bootstrap.environment.to_env()));
        let mut postgres = PostgreSQL::new(bootstrap.settings.clone());
        let started = runtime.block_on(async {
            postgres.setup().await.map_err(boxed)?;
            if !matches!(postgres.status(), Status::Started) {
                postgres.start().await.map_err(boxed)?;
            }
            Ok::<(), BoxError>(())
        });
        drop(env_guard);
        started?;

        let mut settings = postgres.settings().clone();
        sync_port_from_pid(&mut settings)?;
        Ok(Self {
            settings,
            _runtime: Some(runtime),
            _postgres: Some(postgres),
        })
    }

    fn start_via_worker(mut bootstrap: TestBootstrapSettings) -> Result<Self, BoxError> {
        sync_password_from_file(&mut bootstrap.settings)?;
        let worker = bootstrap.worker_binary.as_ref().ok_or_else(|| {
            boxed(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "running as root requires PG_EMBEDDED_WORKER to name a worker binary",
            ))
        })?;
        let env_vars = bootstrap.environment.to_env();
        let steps = [
            (WorkerOperation::Setup, bootstrap.setup_timeout),
            (WorkerOperation::Start, bootstrap.start_timeout),
        ];
        for (operation, timeout) in steps {
            let args = WorkerRequestArgs {
                worker: worker.as_path(),
                settings: &bootstrap.settings,
                env_vars: &env_vars,
                operation,
                timeout,
            };
            run_worker(&WorkerRequest::new(args)).map_err(boxed)?;
        }

        let mut settings = bootstrap.settings.clone();
        sync_port_from_pid(&mut settings)?;
        Ok(Self {
            settings,
            _runtime: None,
            _postgres: None,
        })
    }

    /// Returns the connection URL for `database`.
    #[must_use]
    pub fn database_url(&self, database: &str) -> String {
        self.settings.url(database)
    }

    /// Creates `template` and runs `migrate` against its URL unless it
    /// already exists. A failed migration drops the half-built template.
    pub fn ensure_template<F>(&self, template: &str, migrate: F) -> Result<(), BoxError>
    where
        F: FnOnce(&str) -> Result<(), BoxError>,
    {
        let _guard = TEMPLATE_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if self.database_exists(template)? {
            return Ok(());
        }
        self.execute_admin_sql(&format!("CREATE DATABASE {}", quote_identifier(template)))?;
        if let Err(err) = migrate(&self.database_url(template)) {
            self.drop_database(template)?;
            return Err(err);
        }
        Ok(())
    }

    /// Clones `template` into a database that is dropped with the handle.
    pub fn temporary_database_from_template(
        &'static self,
        name: &str,
        template: &str,
    ) -> Result<TemporaryDatabase, BoxError> {
        self.execute_admin_sql(&format!(
            "CREATE DATABASE {} TEMPLATE {}",
            quote_identifier(name),
            quote_identifier(template),
        ))?;
        Ok(TemporaryDatabase {
            cluster: self,
            name: name.to_owned(),
            url: self.database_url(name),
        })
    }

    fn drop_database(&self, name: &str) -> Result<(), BoxError> {
        self.execute_admin_sql(&format!(
            "DROP DATABASE IF EXISTS {} WITH (FORCE)",
            quote_identifier(name)
        ))
    }

    fn admin_connection(&self) -> Result<PgConnection, BoxError> {
        Ok(PgConnection::establish(&self.database_url("postgres"))?)
    }

    fn execute_admin_sql(&self, sql: &str) -> Result<(), BoxError> {
        let mut conn = self.admin_connection()?;
        diesel::sql_query(sql).execute(&mut conn)?;
        Ok(())
    }

    fn database_exists(&self, name: &str) -> Result<bool, BoxError> {
        #[derive(diesel::QueryableByName)]
        struct ExistsRow {
            #[diesel(sql_type = diesel::sql_types::Bool)]
            exists: bool,
        }

        let mut conn = self.admin_connection()?;
        let row = diesel::sql_query(
            "SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1) AS exists",
        )
        .bind::<diesel::sql_types::Text, _>(name)
        .get_result::<ExistsRow>(&mut conn)?;
        Ok(row.exists)
    }
}

/// A per-test database, dropped together with open connections.
pub struct TemporaryDatabase {
    cluster: PostgresCluster,
    name: String,
    url: String,
}

impl TemporaryDatabase {
    /// Returns the connection URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for TemporaryDatabase {
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(&self.name) {
            tracing::warn!(database = %self.name, error = %err, "failed to drop test database");
        }
    }
}

/// Returns the shared cluster, or `None` when the host cannot run one.
#[fixture]
pub fn postgres_cluster() -> Option<PostgresCluster> {
    match SHARED_CLUSTER.get_or_init(start_shared) {
        Ok(cluster) => Some(cluster),
        Err(reason) => {
            tracing::warn!(%reason, "SKIP-TEST-CLUSTER: PostgreSQL is unavailable");
            None
        }
    }
}

// Start-up blocks on its own runtime, which cannot happen on a tokio worker.
fn start_shared() -> Result<ManagedCluster, String> {
    std::thread::scope(|scope| scope.spawn(ManagedCluster::start).join())
        .map_err(|_| "cluster start-up panicked".to_owned())?
        .map_err(|err| err.to_string())
}

fn boxed(err: impl std::error::Error + Send + Sync + 'static) -> BoxError {
    Box::new(err)
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
