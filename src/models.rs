//! Frontend Models
//!
//! Entities come from the sync core; the rest are UI-only.

pub use todo_sync::{
    NewTodo, SortKey, StatusFilter, SuggestionPanel as SuggestionState, SyncConfig, SyncError, Todo,
    TodoId, TodoPatch, TodoView, Urgency,
};

/// Bulk delete waiting for confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    DeleteAll,
    DeleteCompleted,
}

impl BulkAction {
    pub fn title(&self) -> &'static str {
        match self {
            BulkAction::DeleteAll => "Are you sure?",
            BulkAction::DeleteCompleted => "Delete Completed Todos?",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BulkAction::DeleteAll => "This will permanently delete all todos. This action cannot be undone.",
            BulkAction::DeleteCompleted => {
                "This will permanently delete all completed todos. This action cannot be undone."
            }
        }
    }

    pub fn confirm_label(&self) -> &'static str {
        match self {
            BulkAction::DeleteAll => "Delete All",
            BulkAction::DeleteCompleted => "Delete Completed",
        }
    }
}
