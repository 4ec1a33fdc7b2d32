//! Kanban service host.
//!
//! Resolves configuration, installs tracing, wires the façade to
//! `PostgreSQL` when `database_url` is set (in-memory storage otherwise),
//! and loads the persisted users and boards.
//!
//! Usage:
//!
//! ```text
//! kanban [--config <path>]
//! ```

use clap::Parser;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use kanban::board::adapters::{memory::InMemoryBoardRepository, postgres::PostgresBoardRepository};
use kanban::board::ports::BoardRepository;
use kanban::board::services::{DataSummary, ErrorReport, KanbanFacade};
use kanban::config::{ConfigError, DEFAULT_LOG_FILTER, KanbanConfig};
use kanban::telemetry;
use kanban::user::adapters::{memory::InMemoryUserRepository, postgres::PostgresUserRepository};
use kanban::user::ports::UserRepository;
use mockable::DefaultClock;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// CLI arguments for the service host.
#[derive(Parser, Debug)]
#[command(version, about = "Kanban board manager")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long, env = "KANBAN_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
    #[error("failed to load data: {}", .0.message)]
    Load(ErrorReport),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli).await {
        Ok(summary) => {
            info!(users = summary.users, boards = summary.boards, "kanban data loaded");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "kanban startup failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> Result<DataSummary, StartupError> {
    let config = match KanbanConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            install_tracing(DEFAULT_LOG_FILTER);
            return Err(err.into());
        }
    };
    install_tracing(&config.log_filter);

    let clock = Arc::new(DefaultClock);
    if let Some(url) = config.database_url.as_deref() {
        let pool = Pool::builder().build(ConnectionManager::<PgConnection>::new(url))?;
        info!("using PostgreSQL storage");
        let facade = KanbanFacade::new(
            Arc::new(PostgresBoardRepository::new(pool.clone())),
            Arc::new(PostgresUserRepository::new(pool)),
            clock,
            config.policy,
        );
        load(facade).await
    } else {
        info!("using in-memory storage");
        let facade = KanbanFacade::new(
            Arc::new(InMemoryBoardRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
            clock,
            config.policy,
        );
        load(facade).await
    }
}

async fn load<BR, UR>(mut facade: KanbanFacade<BR, UR, DefaultClock>) -> Result<DataSummary, StartupError>
where
    BR: BoardRepository,
    UR: UserRepository,
{
    let response = facade.load_data().await;
    match response.to_json() {
        Ok(json) => info!(response = %json, "load_data"),
        Err(err) => warn!(error = %err, "failed to serialize load_data response"),
    }
    response.into_result().map_err(StartupError::Load)
}

fn install_tracing(filter: &str) {
    if let Err(err) = telemetry::init(filter) {
        let fallback = telemetry::init(DEFAULT_LOG_FILTER);
        warn!(error = %err, filter, installed = fallback.is_ok(), "invalid log filter, using default");
    }
}
