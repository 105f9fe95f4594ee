//! Suggestion Panel Component
//!
//! Shows generated titles for a todo and creates the picked ones. An empty
//! answer and a failed request both open the panel.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::context::use_app_context;
use crate::models::SuggestionState;
use crate::store::AppStateStoreFields;

#[component]
pub fn SuggestionPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let apply = move |_| {
        let picks = store.suggestions().read().selection();
        if picks.is_empty() {
            return;
        }
        spawn_local(commands::apply_suggestions(ctx, picks));
    };
    let nothing_selected = move || {
        let state = store.suggestions().read();
        state.is_loading() || state.selection().is_empty()
    };

    view! {
        <Show when=move || store.suggestions().read().is_open()>
            <div class="dialog-backdrop">
                <div class="dialog suggestion-panel">
                    <h2 class="dialog-title">"Generated Suggestions"</h2>
                    {move || store.suggestions().read().base().map(|base| view! {
                        <p class="dialog-description">{format!("Based on \"{}\"", base)}</p>
                    })}

                    {move || match store.suggestions().get() {
                        SuggestionState::Loading { .. } => view! {
                            <p class="loading">"Generating suggestions..."</p>
                        }.into_any(),
                        SuggestionState::Ready { suggestions, .. } if !suggestions.is_empty() => view! {
                            <ul class="suggestion-list">
                                {suggestions.into_iter().enumerate().map(|(index, text)| view! {
                                    <li>
                                        <label class="suggestion-item">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || store.suggestions().read().is_selected(index)
                                                on:change=move |_| store.suggestions().write().toggle(index)
                                            />
                                            <span>{text}</span>
                                        </label>
                                    </li>
                                }).collect_view()}
                            </ul>
                        }.into_any(),
                        SuggestionState::Failed { message, .. } => view! {
                            <p class="empty-list">"No suggestions available"</p>
                            <p class="field-error">{message}</p>
                        }.into_any(),
                        _ => view! { <p class="empty-list">"No suggestions available"</p> }.into_any(),
                    }}

                    <div class="dialog-footer">
                        <button class="cancel-btn" on:click=move |_| store.suggestions().write().close()>
                            "Close"
                        </button>
                        <button class="confirm-btn" disabled=nothing_selected on:click=apply>
                            "Add Selected"
                        </button>
                    </div>
                </div>
            </div>
        </Show>
    }
}
