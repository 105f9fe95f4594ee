//! Todo List Component
//!
//! Renders the sorted and filtered view of the store, plus the bulk actions.

use leptos::prelude::*;
use todo_sync::{filtered_view, has_completed};

use crate::components::TodoRow;
use crate::models::{BulkAction, Todo, TodoId, Urgency};
use crate::store::{use_app_store, AppStateStoreFields};

/// Rows re-render whenever a displayed field changes
fn row_key(todo: &Todo) -> (TodoId, String, bool, Urgency, Option<i64>) {
    (
        todo.id,
        todo.title.clone(),
        todo.completed,
        todo.urgency,
        todo.updated_at.map(|at| at.timestamp_millis()),
    )
}

#[component]
pub fn TodoList() -> impl IntoView {
    let store = use_app_store();

    let visible = Memo::new(move |_| filtered_view(&store.todos().read(), store.view().get()));
    let any_completed = Memo::new(move |_| has_completed(&store.todos().read()));
    let is_empty = move || store.todos().read().is_empty();

    view! {
        <div class="todo-list">
            <Show
                when=move || !visible.get().is_empty()
                fallback=|| view! { <p class="empty-list">"No todos yet"</p> }
            >
                <For each=move || visible.get() key=row_key let:todo>
                    <TodoRow todo=todo />
                </For>
            </Show>

            <div class="bulk-actions">
                <button
                    class="delete-completed-btn"
                    disabled=move || !any_completed.get()
                    on:click=move |_| store.confirm().set(Some(BulkAction::DeleteCompleted))
                >
                    "Delete Completed"
                </button>
                <button
                    class="delete-all-btn"
                    disabled=is_empty
                    on:click=move |_| store.confirm().set(Some(BulkAction::DeleteAll))
                >
                    "Delete All"
                </button>
            </div>
        </div>
    }
}
