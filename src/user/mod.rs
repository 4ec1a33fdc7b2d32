//! User accounts and login sessions.
//!
//! Users register with an email and password, log in to obtain an explicit
//! [`Session`](domain::Session), and pass that session into every board
//! operation. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
