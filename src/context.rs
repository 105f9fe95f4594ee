//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use todo_sync::{GraphQlClient, Reconciler};

use crate::models::{SyncConfig, SyncError};
use crate::notify::{notice_for, NoticeLevel};
use crate::store::{store_dismiss_notice, store_push_notice, AppStore};

pub type TodoReconciler = Reconciler<GraphQlClient>;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Browser futures are not `Send`, so the reconciler lives in local storage
    reconciler: StoredValue<Rc<TodoReconciler>, LocalStorage>,
    pub store: AppStore,
    notice_timeout_ms: u32,
}

impl AppContext {
    pub fn new(reconciler: TodoReconciler, store: AppStore, config: &SyncConfig) -> Self {
        Self {
            reconciler: StoredValue::new_local(Rc::new(reconciler)),
            store,
            notice_timeout_ms: config.notice_timeout_ms,
        }
    }

    pub fn reconciler(&self) -> Rc<TodoReconciler> {
        self.reconciler.get_value()
    }

    /// Stop applying server answers (component unmount)
    pub fn detach(&self) {
        let _ = self.reconciler.try_with_value(|reconciler| reconciler.detach());
    }

    /// Show a notice and dismiss it after the configured timeout
    pub fn notify(&self, level: NoticeLevel, text: String) {
        let store = self.store;
        let id = store_push_notice(&store, level, text);
        let timeout = self.notice_timeout_ms;
        spawn_local(async move {
            TimeoutFuture::new(timeout).await;
            store_dismiss_notice(&store, id);
        });
    }

    /// Route a mutation error to the notification bar
    pub fn report(&self, err: &SyncError) {
        if let Some((level, text)) = notice_for(err) {
            self.notify(level, text);
        }
    }
}

pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
