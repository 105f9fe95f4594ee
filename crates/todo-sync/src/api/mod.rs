//! Remote Operation Set
//!
//! Defines the abstract contract with the GraphQL collaborator.
//! `GraphQlClient` is the HTTP implementation; tests substitute their own.

mod record;
mod graphql;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::model::{NewTodo, Todo, TodoPatch, Urgency};

pub use graphql::GraphQlClient;

/// Request/response contract of the todo server
///
/// Browser futures are not `Send`, so the wasm build drops that bound.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TodoApi {
    /// List every todo, in server order
    async fn list_todos(&self) -> Result<Vec<Todo>, ApiError>;

    /// Create a todo; the server assigns id and timestamps
    async fn create_todo(&self, draft: &NewTodo) -> Result<Todo, ApiError>;

    /// Partial update: only the supplied fields change
    async fn update_todo(&self, id: i64, patch: &TodoPatch) -> Result<Todo, ApiError>;

    /// Delete a todo; the server echoes the removed record
    async fn delete_todo(&self, id: i64) -> Result<Todo, ApiError>;

    /// Delete every todo; returns the count when the server reports one
    async fn delete_all_todos(&self) -> Result<Option<u32>, ApiError>;

    /// Delete completed todos; returns the count when the server reports one
    async fn delete_completed_todos(&self) -> Result<Option<u32>, ApiError>;

    /// Ask the suggestion generator for related titles
    async fn generate_suggestions(
        &self,
        existing_todos: &[String],
        urgency: Urgency,
    ) -> Result<Vec<String>, ApiError>;
}
