//! GraphQL Transport
//!
//! Posts `{operationName, query, variables}` documents to the todo server
//! and unwraps the `{data, errors}` envelope.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::record::TodoRecord;
use super::TodoApi;
use crate::error::ApiError;
use crate::model::{NewTodo, Todo, TodoPatch, Urgency};

// ========================
// Documents
// ========================

const TODO_FIELDS: &str = "id title completed urgency createdAt updatedAt";

fn get_todos() -> String {
    format!("query GetTodos {{ todos {{ {} }} }}", TODO_FIELDS)
}

fn create_todo() -> String {
    format!(
        "mutation CreateTodo($title: String!, $urgency: Int!) {{ \
         createTodo(input: {{ title: $title, urgency: $urgency }}) {{ {} }} }}",
        TODO_FIELDS
    )
}

fn update_todo() -> String {
    format!(
        "mutation UpdateTodo($id: Int!, $title: String, $completed: Boolean, $urgency: Int) {{ \
         updateTodo(id: $id, input: {{ title: $title, completed: $completed, urgency: $urgency }}) {{ {} }} }}",
        TODO_FIELDS
    )
}

fn delete_todo() -> String {
    format!("mutation DeleteTodo($id: Int!) {{ deleteTodo(id: $id) {{ {} }} }}", TODO_FIELDS)
}

const DELETE_ALL_TODOS: &str = "mutation DeleteAllTodos { deleteAllTodos }";

const DELETE_COMPLETED_TODOS: &str = "mutation DeleteCompletedTodos { deleteCompletedTodos }";

const GENERATE_TODO_SUGGESTION: &str = "mutation GenerateTodoSuggestion($existingTodos: [String!]!, $urgency: Int!) { \
     generateTodoSuggestion(existingTodos: $existingTodos, urgency: $urgency) { suggestions } }";

// ========================
// Request / Response Structs
// ========================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphQlRequest<'a, V: Serialize> {
    operation_name: &'a str,
    query: &'a str,
    variables: V,
}

#[derive(Serialize)]
struct NoVariables {}

#[derive(Serialize)]
struct CreateTodoVars<'a> {
    title: &'a str,
    urgency: Urgency,
}

#[derive(Serialize)]
struct UpdateTodoVars<'a> {
    id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    urgency: Option<Urgency>,
}

#[derive(Serialize)]
struct IdVars {
    id: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionVars<'a> {
    existing_todos: &'a [String],
    urgency: Urgency,
}

/// One entry of the `errors` array
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct TodosData {
    todos: Vec<TodoRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateData {
    create_todo: TodoRecord,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateData {
    update_todo: Option<TodoRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteData {
    delete_todo: Option<TodoRecord>,
}

/// Bulk deletes answer with a count, or with `{success}` on older servers
#[derive(Deserialize)]
#[serde(untagged)]
enum BulkResult {
    Count(u32),
    Flag {
        #[allow(dead_code)]
        success: bool,
    },
}

impl BulkResult {
    fn count(self) -> Option<u32> {
        match self {
            BulkResult::Count(n) => Some(n),
            BulkResult::Flag { .. } => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteAllData {
    delete_all_todos: BulkResult,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteCompletedData {
    delete_completed_todos: BulkResult,
}

#[derive(Deserialize)]
struct SuggestionPayload {
    #[serde(default)]
    suggestions: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SuggestionData {
    generate_todo_suggestion: Option<SuggestionPayload>,
}

/// Check `errors` first: a failed field may leave `data` partial or null
pub(crate) fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
        return Err(ApiError::Server {
            messages: errors.into_iter().map(|e| e.message).collect(),
        });
    }
    match envelope.data {
        Some(data) => Ok(serde_json::from_value(data)?),
        None => Err(ApiError::Decode("response carries neither data nor errors".to_string())),
    }
}

fn into_todo(record: Option<TodoRecord>, id: i64) -> Result<Todo, ApiError> {
    match record {
        Some(record) => Todo::try_from(record),
        None => Err(ApiError::server(format!("Todo with id {} not found", id))),
    }
}

// ========================
// Client
// ========================

/// HTTP client for the todo GraphQL endpoint
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphQlClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(http: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self { http, endpoint: endpoint.into() }
    }

    async fn execute<V, T>(&self, operation_name: &str, query: &str, variables: V) -> Result<T, ApiError>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let request = GraphQlRequest { operation_name, query, variables };
        tracing::debug!(operation = operation_name, endpoint = %self.endpoint, "graphql request");

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(operation = operation_name, status = status.as_u16(), "graphql request rejected");
            return Err(ApiError::Http { status: status.as_u16() });
        }
        let body = response.text().await?;
        decode_envelope(&body)
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TodoApi for GraphQlClient {
    async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        let data: TodosData = self.execute("GetTodos", &get_todos(), NoVariables {}).await?;
        data.todos.into_iter().map(Todo::try_from).collect()
    }

    async fn create_todo(&self, draft: &NewTodo) -> Result<Todo, ApiError> {
        let vars = CreateTodoVars { title: &draft.title, urgency: draft.urgency };
        let data: CreateData = self.execute("CreateTodo", &create_todo(), vars).await?;
        Todo::try_from(data.create_todo)
    }

    async fn update_todo(&self, id: i64, patch: &TodoPatch) -> Result<Todo, ApiError> {
        let vars = UpdateTodoVars {
            id,
            title: patch.title.as_deref(),
            completed: patch.completed,
            urgency: patch.urgency,
        };
        let data: UpdateData = self.execute("UpdateTodo", &update_todo(), vars).await?;
        into_todo(data.update_todo, id)
    }

    async fn delete_todo(&self, id: i64) -> Result<Todo, ApiError> {
        let data: DeleteData = self.execute("DeleteTodo", &delete_todo(), IdVars { id }).await?;
        into_todo(data.delete_todo, id)
    }

    async fn delete_all_todos(&self) -> Result<Option<u32>, ApiError> {
        let data: DeleteAllData = self.execute("DeleteAllTodos", DELETE_ALL_TODOS, NoVariables {}).await?;
        Ok(data.delete_all_todos.count())
    }

    async fn delete_completed_todos(&self) -> Result<Option<u32>, ApiError> {
        let data: DeleteCompletedData = self
            .execute("DeleteCompletedTodos", DELETE_COMPLETED_TODOS, NoVariables {})
            .await?;
        Ok(data.delete_completed_todos.count())
    }

    async fn generate_suggestions(
        &self,
        existing_todos: &[String],
        urgency: Urgency,
    ) -> Result<Vec<String>, ApiError> {
        let vars = SuggestionVars { existing_todos, urgency };
        let data: SuggestionData = self
            .execute("GenerateTodoSuggestion", GENERATE_TODO_SUGGESTION, vars)
            .await?;
        Ok(data
            .generate_todo_suggestion
            .and_then(|payload| payload.suggestions)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_variables_skip_unset_fields() {
        let vars = UpdateTodoVars { id: 5, title: None, completed: Some(true), urgency: None };
        assert_eq!(serde_json::to_value(&vars).unwrap(), json!({"id": 5, "completed": true}));

        let vars = UpdateTodoVars { id: 5, title: Some("X"), completed: None, urgency: Some(Urgency::High) };
        assert_eq!(serde_json::to_value(&vars).unwrap(), json!({"id": 5, "title": "X", "urgency": 3}));
    }

    #[test]
    fn test_request_envelope_shape() {
        let request = GraphQlRequest {
            operation_name: "CreateTodo",
            query: "q",
            variables: CreateTodoVars { title: "Call Dan", urgency: Urgency::Medium },
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"operationName": "CreateTodo", "query": "q", "variables": {"title": "Call Dan", "urgency": 2}})
        );
        let request = GraphQlRequest { operation_name: "GetTodos", query: "q", variables: NoVariables {} };
        assert_eq!(serde_json::to_value(&request).unwrap()["variables"], json!({}));
    }

    #[test]
    fn test_suggestion_variables_are_camel_case() {
        let seeds = vec!["Buy milk".to_string()];
        let vars = SuggestionVars { existing_todos: &seeds, urgency: Urgency::Low };
        assert_eq!(serde_json::to_value(&vars).unwrap(), json!({"existingTodos": ["Buy milk"], "urgency": 1}));
    }

    #[test]
    fn test_decode_list() {
        let body = r#"{"data":{"todos":[{"id":1,"title":"Buy milk","completed":false,"urgency":1,"createdAt":"2024-01-01T00:00:00","updatedAt":null}]}}"#;
        let data: TodosData = decode_envelope(body).unwrap();
        assert_eq!(data.todos.len(), 1);
        assert_eq!(data.todos[0].title, "Buy milk");
    }

    #[test]
    fn test_errors_win_over_partial_data() {
        let body = r#"{"data":null,"errors":[{"message":"Todo with id 9 not found","path":["updateTodo"]}]}"#;
        let result: Result<UpdateData, _> = decode_envelope(body);
        assert_eq!(
            result.err(),
            Some(ApiError::Server { messages: vec!["Todo with id 9 not found".to_string()] })
        );
    }

    #[test]
    fn test_null_update_payload_is_server_error() {
        let data: UpdateData = decode_envelope(r#"{"data":{"updateTodo":null}}"#).unwrap();
        assert!(matches!(into_todo(data.update_todo, 9), Err(ApiError::Server { .. })));
    }

    #[test]
    fn test_bulk_result_shapes() {
        let data: DeleteAllData = decode_envelope(r#"{"data":{"deleteAllTodos":3}}"#).unwrap();
        assert_eq!(data.delete_all_todos.count(), Some(3));
        let data: DeleteCompletedData =
            decode_envelope(r#"{"data":{"deleteCompletedTodos":{"success":true}}}"#).unwrap();
        assert_eq!(data.delete_completed_todos.count(), None);
    }

    #[test]
    fn test_empty_suggestions() {
        let data: SuggestionData =
            decode_envelope(r#"{"data":{"generateTodoSuggestion":{"suggestions":[]}}}"#).unwrap();
        assert!(data.generate_todo_suggestion.and_then(|p| p.suggestions).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_body_is_decode_error() {
        let result: Result<TodosData, _> = decode_envelope("<html>502</html>");
        assert!(matches!(result, Err(ApiError::Decode(_))));
        let result: Result<TodosData, _> = decode_envelope("{}");
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_documents_name_their_operations() {
        assert!(get_todos().starts_with("query GetTodos"));
        assert!(create_todo().contains("createTodo(input: { title: $title, urgency: $urgency })"));
        assert!(update_todo().contains("updateTodo(id: $id"));
        assert!(delete_todo().contains(TODO_FIELDS));
    }
}
