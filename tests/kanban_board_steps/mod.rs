//! Step definitions for Kanban board workflow scenarios.

pub mod given;
