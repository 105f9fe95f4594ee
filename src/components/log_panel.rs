//! Log Panel Component
//!
//! Collapsible view of the most recent log lines.

use leptos::prelude::*;

#[component]
pub fn LogPanel() -> impl IntoView {
    let (collapsed, set_collapsed) = signal(true);
    let (lines, set_lines) = signal(Vec::<String>::new());

    // Lines are read when the panel opens
    let toggle = move |_| {
        let new_state = !collapsed.get();
        if !new_state {
            set_lines.set(rolling_logger::recent().iter().map(ToString::to_string).collect());
        }
        set_collapsed.set(new_state);
    };

    view! {
        <section class="log-panel">
            <button class="log-toggle" on:click=toggle>
                {move || if collapsed.get() { "Show log" } else { "Hide log" }}
            </button>
            <Show when=move || !collapsed.get()>
                <pre class="log-lines">
                    {move || {
                        let lines = lines.get();
                        if lines.is_empty() { "No log lines yet".to_string() } else { lines.join("\n") }
                    }}
                </pre>
            </Show>
        </section>
    }
}
