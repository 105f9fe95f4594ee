//! Todo App
//!
//! Main application component: wires the reconciler to the store and lays
//! out the form, list and overlays.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use todo_sync::{GraphQlClient, Reconciler, TodoCache};

use crate::commands;
use crate::components::{ConfirmDialog, LogPanel, NotificationBar, SortDropdown, SuggestionPanel, TodoForm, TodoList};
use crate::context::AppContext;
use crate::models::{BulkAction, SyncConfig};
use crate::store::{store_set_todos, AppState, AppStateStoreFields};

#[component]
pub fn App(config: SyncConfig) -> impl IntoView {
    let store = Store::new(AppState::new());
    let cache = TodoCache::new();
    let api = GraphQlClient::new(config.endpoint.clone());
    let ctx = AppContext::new(Reconciler::with_config(api, cache.clone(), &config), store, &config);

    // Provide context to all children
    provide_context(ctx);
    provide_context(store);

    // Mirror every cache write into the store
    let subscription = cache.subscribe(move |snapshot| store_set_todos(&store, snapshot));
    on_cleanup(move || {
        cache.unsubscribe(subscription);
        ctx.detach();
    });

    tracing::info!(endpoint = %config.endpoint, "loading todos");
    spawn_local(commands::load_todos(ctx));

    let retry = move |_| spawn_local(commands::load_todos(ctx));

    let confirm_dialog = move || {
        store.confirm().get().map(|action| {
            let on_confirm = Callback::new(move |_: ()| {
                store.confirm().set(None);
                spawn_local(async move {
                    match action {
                        BulkAction::DeleteAll => commands::delete_all_todos(ctx).await,
                        BulkAction::DeleteCompleted => commands::delete_completed_todos(ctx).await,
                    }
                });
            });
            view! {
                <ConfirmDialog
                    title=action.title()
                    description=action.description()
                    confirm_label=action.confirm_label()
                    on_confirm=on_confirm
                    on_cancel=move |_: ()| store.confirm().set(None)
                />
            }
        })
    };

    view! {
        <div class="app-layout">
            <main class="main-content">
                <h1>"Todos"</h1>

                <TodoForm />
                <SortDropdown />

                <Show
                    when=move || !store.loading().get()
                    fallback=|| view! { <p class="loading">"Loading..."</p> }
                >
                    {move || match store.load_error().get() {
                        Some(err) => view! {
                            <div class="load-error">
                                <p>"Error: " {err}</p>
                                <button on:click=retry>"Retry"</button>
                            </div>
                        }.into_any(),
                        None => view! { <TodoList /> }.into_any(),
                    }}
                </Show>

                <p class="item-count">
                    {move || {
                        let todos = store.todos().read();
                        let done = todos.iter().filter(|todo| todo.completed).count();
                        format!("{} todos, {} completed", todos.len(), done)
                    }}
                </p>

                <LogPanel />
            </main>

            <SuggestionPanel />
            {confirm_dialog}
            <NotificationBar />
        </div>
    }
}
