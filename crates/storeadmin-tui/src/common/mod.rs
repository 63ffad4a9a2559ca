//! Shared TUI utilities.

pub mod layout;
pub mod search;
pub mod task;
pub mod text;

pub use search::SearchBox;
pub use task::{TaskCompleted, TaskId, TaskKind, TaskSeq, TaskStarted, TaskState, Tasks};
