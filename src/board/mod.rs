//! Kanban boards, columns, and tasks.
//!
//! Boards are created by a registered user, joined by other users, and hold
//! an ordered set of columns through which tasks advance one step at a time
//! until they reach the frozen done column. Every registry operation takes
//! an explicit [`Session`](crate::user::domain::Session). The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
