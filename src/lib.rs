//! Kanban: a multi-user Kanban board manager.
//!
//! Users register, log in, and create or join boards. Each board holds an
//! ordered set of columns with optional work-in-progress limits, and tasks
//! advance column by column from the backlog to the done column.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`user`]: Accounts, password rules, and login sessions
//! - [`board`]: Boards, columns, tasks, the registry, and the service façade
//! - [`config`]: TOML and environment configuration
//! - [`telemetry`]: Tracing subscriber setup
//! - [`error`]: Error classification shared at the service boundary

pub mod board;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod user;
