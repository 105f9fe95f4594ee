//! Todo Form Component
//!
//! Title input with urgency selector. Invalid input is reported inline and
//! never sent.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::commands;
use crate::components::UrgencySelector;
use crate::context::use_app_context;
use crate::models::{NewTodo, Urgency};

#[component]
pub fn TodoForm() -> impl IntoView {
    let ctx = use_app_context();

    let (title, set_title) = signal(String::new());
    let (urgency, set_urgency) = signal(Urgency::default());
    let (error, set_error) = signal::<Option<String>>(None);

    let create_todo = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = title.get();
        let level = urgency.get();
        if let Err(err) = NewTodo::new(&draft, level) {
            set_error.set(Some(err.to_string()));
            return;
        }
        set_error.set(None);
        set_title.set(String::new());
        set_urgency.set(Urgency::default());

        spawn_local(async move {
            let _ = commands::create_todo(ctx, draft, level).await;
        });
    };

    view! {
        <form class="todo-form" on:submit=create_todo>
            <div class="todo-form-row">
                <input
                    type="text"
                    placeholder="What needs to be done?"
                    prop:value=move || title.get()
                    on:input=move |ev| {
                        set_title.set(event_target_value(&ev));
                        set_error.set(None);
                    }
                />
                <button type="submit">"Add"</button>
            </div>

            <UrgencySelector value=urgency on_change=move |level: Urgency| set_urgency.set(level) />

            {move || error.get().map(|msg| view! { <p class="field-error">{msg}</p> })}
        </form>
    }
}
