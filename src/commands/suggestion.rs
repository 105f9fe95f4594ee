//! Suggestion Commands
//!
//! Failures stay inside the suggestion panel and never reach the todo list.

use crate::context::AppContext;
use crate::models::{SuggestionState, Urgency};
use crate::notify::NoticeLevel;
use crate::store::store_set_suggestions;

/// Open the panel for `title` and fill it with the generator's answer
pub async fn request_suggestions(ctx: AppContext, title: String, urgency: Urgency) {
    store_set_suggestions(&ctx.store, SuggestionState::open_loading(title.clone()));
    let result = ctx.reconciler().suggest(&[title.clone()], urgency).await;
    if result.is_err() && ctx.reconciler().is_detached() {
        return;
    }
    store_set_suggestions(&ctx.store, SuggestionState::resolve(title, result));
}

/// Create the picked suggestions concurrently and close the panel
pub async fn apply_suggestions(ctx: AppContext, picks: Vec<(String, Urgency)>) {
    store_set_suggestions(&ctx.store, SuggestionState::Closed);
    let results = ctx.reconciler().apply_suggestions(&picks).await;

    let mut failed = 0;
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        failed += 1;
        tracing::warn!(error = %err, "suggested todo was not created");
    }
    if failed > 0 {
        ctx.notify(
            NoticeLevel::Error,
            format!("{} of {} suggested todos could not be added", failed, picks.len()),
        );
    }
}
