//! Todo Commands
//!
//! List loading and the optimistic mutations.

use leptos::prelude::*;

use crate::context::AppContext;
use crate::models::{SyncError, Todo, TodoId, TodoPatch, Urgency};
use crate::notify::NoticeLevel;
use crate::store::AppStateStoreFields;

/// Initial load; failures are shown in place of the list
pub async fn load_todos(ctx: AppContext) {
    ctx.store.loading().set(true);
    match ctx.reconciler().refresh().await {
        Ok(snapshot) => {
            let _ = rolling_logger::info(&format!("Loaded {} todos", snapshot.len()));
            ctx.store.load_error().set(None);
        }
        Err(SyncError::Detached) => {}
        Err(err) => {
            let _ = rolling_logger::error(&format!("Loading todos failed: {}", err));
            ctx.store.load_error().set(Some(err.to_string()));
        }
    }
    ctx.store.loading().set(false);
}

pub async fn create_todo(ctx: AppContext, title: String, urgency: Urgency) -> Result<Todo, SyncError> {
    let result = ctx.reconciler().create(&title, urgency).await;
    if let Err(err) = &result {
        ctx.report(err);
    }
    result
}

pub async fn update_todo(ctx: AppContext, id: TodoId, changes: TodoPatch) -> Result<Todo, SyncError> {
    let result = ctx.reconciler().update(id, changes).await;
    if let Err(err) = &result {
        ctx.report(err);
    }
    result
}

pub async fn toggle_todo(ctx: AppContext, id: TodoId) {
    if let Err(err) = ctx.reconciler().toggle(id).await {
        ctx.report(&err);
    }
}

pub async fn delete_todo(ctx: AppContext, id: TodoId) {
    if let Err(err) = ctx.reconciler().delete(id).await {
        ctx.report(&err);
    }
}

pub async fn delete_all_todos(ctx: AppContext) {
    match ctx.reconciler().delete_all().await {
        Ok(count) => announce_deleted(ctx, count),
        Err(err) => ctx.report(&err),
    }
}

pub async fn delete_completed_todos(ctx: AppContext) {
    match ctx.reconciler().delete_completed().await {
        Ok(count) => announce_deleted(ctx, count),
        Err(err) => ctx.report(&err),
    }
}

fn announce_deleted(ctx: AppContext, count: Option<u32>) {
    if let Some(count) = count {
        let noun = if count == 1 { "todo" } else { "todos" };
        ctx.notify(NoticeLevel::Info, format!("Deleted {} {}", count, noun));
    }
}
