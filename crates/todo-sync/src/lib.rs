//! Todo Sync Core
//!
//! Layered architecture:
//! - model: Todo entity, urgency levels, validated inputs
//! - cache: shared snapshot store with subscriptions
//! - patch: optimistic patches and their inverses
//! - api: remote operation set and the GraphQL transport
//! - reconcile: optimistic mutation lifecycle against the server
//! - view: derived orderings for display
//! - suggestion: suggestion panel state

mod config;
mod error;
mod model;
mod cache;
mod patch;
mod api;
mod reconcile;
mod view;
mod suggestion;

#[cfg(test)]
mod mock;

pub use config::SyncConfig;
pub use error::{ApiError, SuggestionError, SyncError, ValidationError};
pub use model::{CorrelationId, NewTodo, Todo, TodoId, TodoPatch, Urgency};
pub use cache::{Snapshot, SubscriptionId, TodoCache};
pub use api::{GraphQlClient, TodoApi};
pub use reconcile::{MutationKind, MutationState, Reconciler};
pub use view::{filtered_view, has_completed, sorted_view, SortKey, StatusFilter, TodoView};
pub use suggestion::SuggestionPanel;
