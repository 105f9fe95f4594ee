//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. `todos` mirrors
//! the sync cache through a subscription and is never written by components.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{BulkAction, SuggestionState, Todo, TodoId, TodoView};
use crate::notify::{NoticeLevel, NoticeQueue};

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Latest cache snapshot, in cache order
    pub todos: Vec<Todo>,
    /// Sort and status filter of the list
    pub view: TodoView,
    /// Initial list load in progress
    pub loading: bool,
    /// Initial list load failed
    pub load_error: Option<String>,
    pub notices: NoticeQueue,
    pub suggestions: SuggestionState,
    /// Bulk delete waiting in the confirm dialog
    pub confirm: Option<BulkAction>,
    /// Row currently in inline edit mode
    pub editing: Option<TodoId>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Replace the mirrored todos with a cache snapshot
pub fn store_set_todos(store: &AppStore, todos: &[Todo]) {
    *store.todos().write() = todos.to_vec();
}

pub fn store_push_notice(store: &AppStore, level: NoticeLevel, text: String) -> u64 {
    store.notices().write().push(level, text)
}

pub fn store_dismiss_notice(store: &AppStore, id: u64) {
    store.notices().write().dismiss(id);
}

pub fn store_set_suggestions(store: &AppStore, state: SuggestionState) {
    *store.suggestions().write() = state;
}
