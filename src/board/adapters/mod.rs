//! Adapter implementations for board persistence.

pub mod memory;
pub mod postgres;
