//! Orchestration services for boards.

mod facade;
mod registry;

pub use facade::{
    BoardView, ColumnView, DataSummary, ErrorReport, KanbanError, KanbanFacade, Response,
};
pub use registry::{BoardRegistry, BoardRegistryError, BoardRegistryResult};
