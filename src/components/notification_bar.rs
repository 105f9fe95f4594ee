//! Notification Bar Component
//!
//! Stack of transient notices; each dismisses itself after a timeout.

use leptos::prelude::*;

use crate::store::{store_dismiss_notice, use_app_store, AppStateStoreFields};

#[component]
pub fn NotificationBar() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="notification-bar">
            <For
                each=move || store.notices().read().notices().to_vec()
                key=|notice| notice.id
                let:notice
            >
                <div class=notice.level.css_class()>
                    <span class="notice-text">{notice.text.clone()}</span>
                    <button class="dismiss-btn" on:click=move |_| store_dismiss_notice(&store, notice.id)>
                        "×"
                    </button>
                </div>
            </For>
        </div>
    }
}
