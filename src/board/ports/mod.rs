//! Port contracts for board persistence.

pub mod repository;

pub use repository::{BoardRepository, BoardRepositoryError, BoardRepositoryResult};

#[cfg(test)]
pub use repository::MockBoardRepository;
