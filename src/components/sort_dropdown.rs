//! Sort Dropdown Component
//!
//! Sort key and status filter of the list.

use leptos::prelude::*;

use crate::models::{SortKey, StatusFilter};
use crate::store::{use_app_store, AppStateStoreFields};

#[component]
pub fn SortDropdown() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="view-controls">
            <select
                class="sort-dropdown"
                prop:value=move || store.view().get().sort.as_str()
                on:change=move |ev| {
                    store.view().write().sort = SortKey::parse_or_default(&event_target_value(&ev));
                }
            >
                {SortKey::ALL.into_iter().map(|key| view! {
                    <option value=key.as_str()>{key.label()}</option>
                }).collect_view()}
            </select>

            <select
                class="filter-dropdown"
                prop:value=move || store.view().get().filter.as_str()
                on:change=move |ev| {
                    store.view().write().filter = StatusFilter::parse_or_default(&event_target_value(&ev));
                }
            >
                {StatusFilter::ALL.into_iter().map(|filter| view! {
                    <option value=filter.as_str()>{filter.label()}</option>
                }).collect_view()}
            </select>
        </div>
    }
}
