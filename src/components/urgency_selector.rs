//! Urgency Selector Component
//!
//! Reusable urgency buttons, highest first.

use leptos::prelude::*;

use crate::models::Urgency;

#[component]
pub fn UrgencySelector(
    #[prop(into)] value: Signal<Urgency>,
    #[prop(into)] on_change: Callback<Urgency>,
) -> impl IntoView {
    view! {
        <div class="urgency-selector">
            {Urgency::ALL.into_iter().map(|urgency| {
                let is_selected = move || value.get() == urgency;
                view! {
                    <button
                        type="button"
                        class=move || if is_selected() { "urgency-btn active" } else { "urgency-btn" }
                        title=urgency.label()
                        on:click=move |_| on_change.run(urgency)
                    >
                        <span class=format!("urgency-dot {}", urgency.css_class())></span>
                        {urgency.label()}
                    </button>
                }
            }).collect_view()}
        </div>
    }
}
