//! In-memory adapters for boards.

mod repository;

pub use repository::InMemoryBoardRepository;
