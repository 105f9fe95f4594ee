//! Todo Row Component
//!
//! One todo with checkbox, inline edit, suggest and delete. A row that is
//! still being saved cannot be changed yet.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::components::UrgencySelector;
use crate::context::use_app_context;
use crate::models::{Todo, TodoPatch, Urgency};
use crate::store::AppStateStoreFields;

#[component]
pub fn TodoRow(todo: Todo) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let id = todo.id;
    let pending = todo.is_pending();
    let completed = todo.completed;
    let urgency = todo.urgency;
    let title = todo.title;

    let (draft_title, set_draft_title) = signal(title.clone());
    let (draft_urgency, set_draft_urgency) = signal(urgency);
    let (error, set_error) = signal::<Option<String>>(None);

    let editing = move || store.editing().get() == Some(id);

    let start_edit = {
        let title = title.clone();
        move |_| {
            set_draft_title.set(title.clone());
            set_draft_urgency.set(urgency);
            set_error.set(None);
            store.editing().set(Some(id));
        }
    };

    let save = move |_| {
        let changes = TodoPatch::default()
            .with_title(draft_title.get())
            .with_urgency(draft_urgency.get());
        match changes.validate() {
            Err(err) => set_error.set(Some(err.to_string())),
            Ok(changes) => {
                store.editing().set(None);
                spawn_local(async move {
                    let _ = commands::update_todo(ctx, id, changes).await;
                });
            }
        }
    };

    let suggest = {
        let title = title.clone();
        move |_| spawn_local(commands::request_suggestions(ctx, title.clone(), urgency))
    };

    let row_class = format!(
        "todo-row{}{}",
        if completed { " completed" } else { "" },
        if pending { " pending" } else { "" }
    );

    view! {
        <div class=row_class>
            <input
                type="checkbox"
                checked=completed
                disabled=pending
                on:change=move |_| spawn_local(commands::toggle_todo(ctx, id))
            />

            <Show
                when=editing
                fallback=move || view! {
                    <span class=format!("urgency-dot {}", urgency.css_class()) title=urgency.label()></span>
                    <span class="todo-title">{title.clone()}</span>
                    {pending.then(|| view! { <span class="saving">"Saving..."</span> })}
                }
            >
                <input
                    type="text"
                    class="edit-title"
                    prop:value=move || draft_title.get()
                    on:input=move |ev| set_draft_title.set(event_target_value(&ev))
                />
                <UrgencySelector value=draft_urgency on_change=move |level: Urgency| set_draft_urgency.set(level) />
                {move || error.get().map(|msg| view! { <span class="field-error">{msg}</span> })}
                <button class="save-btn" on:click=save>"Save"</button>
                <button class="cancel-btn" on:click=move |_| store.editing().set(None)>"Cancel"</button>
            </Show>

            <button class="edit-btn" disabled={completed || pending} on:click=start_edit>"Edit"</button>
            <button class="suggest-btn" disabled={completed || pending} on:click=suggest>"Suggest"</button>
            <button class="delete-btn" disabled=pending on:click=move |_| spawn_local(commands::delete_todo(ctx, id))>
                "×"
            </button>
        </div>
    }
}
