//! In-memory stand-in for the GraphQL server
//!
//! Scripted failures are queued per operation; gated operations wait for a
//! semaphore permit so tests can look at the cache while a call is in flight.
//! Held answers are computed first and delivered once a permit arrives, which
//! models a response that is already stale when it lands.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Semaphore;

use crate::api::TodoApi;
use crate::error::ApiError;
use crate::model::{NewTodo, Todo, TodoId, TodoPatch, Urgency};

#[derive(Default)]
struct MockServer {
    todos: Vec<Todo>,
    next_id: i64,
    failures: HashMap<&'static str, VecDeque<ApiError>>,
    held: HashMap<&'static str, usize>,
    suggestions: Option<Result<Vec<String>, ApiError>>,
    suggestion_requests: Vec<(Vec<String>, Urgency)>,
    calls: Vec<&'static str>,
}

pub(crate) struct MockApi {
    server: Mutex<MockServer>,
    gated: HashSet<&'static str>,
    gate: Arc<Semaphore>,
}

impl MockApi {
    pub(crate) fn new(todos: Vec<Todo>) -> Self {
        let next_id = todos.iter().filter_map(|t| t.id.server()).max().unwrap_or(0) + 1;
        Self {
            server: Mutex::new(MockServer { todos, next_id, ..Default::default() }),
            gated: HashSet::new(),
            gate: Arc::new(Semaphore::new(0)),
        }
    }

    /// Hold the named operations until a permit is added to the returned gate
    pub(crate) fn gated(mut self, ops: &[&'static str]) -> (Self, Arc<Semaphore>) {
        self.gated = ops.iter().copied().collect();
        let gate = self.gate.clone();
        (self, gate)
    }

    pub(crate) fn fail_next(&self, op: &'static str, err: ApiError) {
        self.server.lock().unwrap().failures.entry(op).or_default().push_back(err);
    }

    /// Read the server state for the next `op` call now, answer on the gate
    pub(crate) fn hold_next_answer(&self, op: &'static str) {
        *self.server.lock().unwrap().held.entry(op).or_default() += 1;
    }

    pub(crate) fn set_suggestions(&self, result: Result<Vec<String>, ApiError>) {
        self.server.lock().unwrap().suggestions = Some(result);
    }

    /// Change the server state behind the client's back
    pub(crate) fn insert_remote(&self, title: &str, completed: bool) -> TodoId {
        let mut server = self.server.lock().unwrap();
        let id = TodoId::Server(server.next_id);
        server.next_id += 1;
        server.todos.push(Todo {
            id,
            title: title.to_string(),
            completed,
            urgency: Urgency::Low,
            created_at: Utc::now(),
            updated_at: None,
        });
        id
    }

    pub(crate) fn suggestion_requests(&self) -> Vec<(Vec<String>, Urgency)> {
        self.server.lock().unwrap().suggestion_requests.clone()
    }

    pub(crate) fn server_todos(&self) -> Vec<Todo> {
        self.server.lock().unwrap().todos.clone()
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        self.server.lock().unwrap().calls.clone()
    }

    async fn enter(&self, op: &'static str) -> Result<(), ApiError> {
        if self.gated.contains(op) {
            let permit = self.gate.acquire().await.expect("gate closed");
            permit.forget();
        }
        let mut server = self.server.lock().unwrap();
        server.calls.push(op);
        match server.failures.get_mut(op).and_then(|queue| queue.pop_front()) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn deliver<T>(&self, op: &'static str, answer: T) -> T {
        let hold = {
            let mut server = self.server.lock().unwrap();
            match server.held.get_mut(op) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    true
                }
                _ => false,
            }
        };
        if hold {
            let permit = self.gate.acquire().await.expect("gate closed");
            permit.forget();
        }
        answer
    }

    fn not_found(id: i64) -> ApiError {
        ApiError::server(format!("Todo with id {} not found", id))
    }
}

#[async_trait]
impl TodoApi for MockApi {
    async fn list_todos(&self) -> Result<Vec<Todo>, ApiError> {
        self.enter("list_todos").await?;
        let todos = self.server_todos();
        Ok(self.deliver("list_todos", todos).await)
    }

    async fn create_todo(&self, draft: &NewTodo) -> Result<Todo, ApiError> {
        self.enter("create_todo").await?;
        let mut server = self.server.lock().unwrap();
        let todo = Todo {
            id: TodoId::Server(server.next_id),
            title: draft.title.clone(),
            completed: false,
            urgency: draft.urgency,
            created_at: Utc::now(),
            updated_at: None,
        };
        server.next_id += 1;
        server.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update_todo(&self, id: i64, patch: &TodoPatch) -> Result<Todo, ApiError> {
        self.enter("update_todo").await?;
        let mut server = self.server.lock().unwrap();
        let todo = server
            .todos
            .iter_mut()
            .find(|t| t.id == TodoId::Server(id))
            .ok_or_else(|| Self::not_found(id))?;
        patch.apply_to(todo);
        todo.updated_at = Some(Utc::now());
        Ok(todo.clone())
    }

    async fn delete_todo(&self, id: i64) -> Result<Todo, ApiError> {
        self.enter("delete_todo").await?;
        let mut server = self.server.lock().unwrap();
        let index = server
            .todos
            .iter()
            .position(|t| t.id == TodoId::Server(id))
            .ok_or_else(|| Self::not_found(id))?;
        Ok(server.todos.remove(index))
    }

    async fn delete_all_todos(&self) -> Result<Option<u32>, ApiError> {
        self.enter("delete_all_todos").await?;
        let mut server = self.server.lock().unwrap();
        let count = server.todos.len() as u32;
        server.todos.clear();
        Ok(Some(count))
    }

    async fn delete_completed_todos(&self) -> Result<Option<u32>, ApiError> {
        self.enter("delete_completed_todos").await?;
        let mut server = self.server.lock().unwrap();
        let before = server.todos.len();
        server.todos.retain(|t| !t.completed);
        Ok(Some((before - server.todos.len()) as u32))
    }

    async fn generate_suggestions(
        &self,
        existing_todos: &[String],
        urgency: Urgency,
    ) -> Result<Vec<String>, ApiError> {
        self.enter("generate_suggestions").await?;
        let mut server = self.server.lock().unwrap();
        server.suggestion_requests.push((existing_todos.to_vec(), urgency));
        server.suggestions.clone().unwrap_or_else(|| Ok(Vec::new()))
    }
}
