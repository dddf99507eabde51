pub mod filter_state;
pub mod task_store;

pub use filter_state::{FilterState, FILTER_KEY};
pub use task_store::{TaskStore, TASKS_KEY};

use thiserror::Error;

/// Failures of task and filter operations
#[derive(Debug, Error)]
pub enum TaskError {
    /// Blank text on add or edit; the user is asked again and nothing changes
    #[error("Please enter a valid task")]
    EmptyText,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}
