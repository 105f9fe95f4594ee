//! Reconciliation Policy
//!
//! Every mutation follows the same lifecycle:
//! 1. validate the input and check the target exists and is confirmed
//! 2. reserve a correlation id; a second in-flight change to the same todo is
//!    rejected with `SyncError::Busy`
//! 3. apply the optimistic patch to the cache
//! 4. send the request
//! 5. on success apply the confirm patch built from the server's payload,
//!    on failure apply the exact inverse of step 3
//!
//! A list fetched while mutations confirm is patched with the confirms it
//! missed before it replaces the cache.
//!
//! No lock is ever held across an await point. Lock order is ledger, then cache.

mod pending;

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use futures::future::join_all;

use crate::api::TodoApi;
use crate::cache::{Snapshot, TodoCache};
use crate::config::SyncConfig;
use crate::error::{ApiError, SuggestionError, SyncError};
use crate::model::{CorrelationId, NewTodo, Todo, TodoId, TodoPatch, Urgency};
use crate::patch;

use pending::{Claim, Confirm, Ledger, Undo};

pub use pending::{MutationKind, MutationState};

/// Drives optimistic mutations against a `TodoApi` and keeps the cache
/// consistent with the server's answers.
pub struct Reconciler<A> {
    api: A,
    cache: TodoCache,
    ledger: Mutex<Ledger>,
    refetch_after_mutation: bool,
}

impl<A: TodoApi> Reconciler<A> {
    pub fn new(api: A, cache: TodoCache) -> Self {
        Self::with_config(api, cache, &SyncConfig::default())
    }

    pub fn with_config(api: A, cache: TodoCache, config: &SyncConfig) -> Self {
        Self {
            api,
            cache,
            ledger: Mutex::new(Ledger::default()),
            refetch_after_mutation: config.refetch_after_mutation,
        }
    }

    /// Toggle the list refetch that follows each successful mutation
    pub fn with_refetch(mut self, enabled: bool) -> Self {
        self.refetch_after_mutation = enabled;
        self
    }

    pub fn cache(&self) -> &TodoCache {
        &self.cache
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ========================
    // Lifecycle
    // ========================

    /// Stop applying server answers; anything still in flight is discarded
    pub fn detach(&self) {
        let mut ledger = self.ledger();
        ledger.detached = true;
        tracing::info!(pending = ledger.pending_count(), "reconciler detached");
    }

    pub fn is_detached(&self) -> bool {
        self.ledger().detached
    }

    pub fn state_of(&self, id: CorrelationId) -> MutationState {
        self.ledger().state_of(id)
    }

    pub fn pending_count(&self) -> usize {
        self.ledger().pending_count()
    }

    /// Confirmed server id of a cached todo, or why it cannot be targeted
    fn target(&self, id: TodoId) -> Result<i64, SyncError> {
        let server_id = id.server().ok_or(SyncError::Unconfirmed(id))?;
        if !self.cache.contains(id) {
            return Err(SyncError::NotFound(id));
        }
        Ok(server_id)
    }

    /// Reserve a correlation id and apply the optimistic patch
    fn begin(
        &self,
        kind: MutationKind,
        claim: Claim,
        optimistic: impl FnOnce(&mut Vec<Todo>, CorrelationId) -> Result<Undo, SyncError>,
    ) -> Result<CorrelationId, SyncError> {
        let mut ledger = self.ledger();
        if ledger.detached {
            return Err(SyncError::Detached);
        }
        let id = ledger.reserve(kind, claim).ok_or(SyncError::Busy)?;

        match self.cache.try_modify(|todos| optimistic(todos, id)) {
            Ok(undo) => {
                ledger.arm(id, undo);
                tracing::debug!(correlation = %id, %kind, "optimistic patch applied");
                Ok(id)
            }
            Err(err) => {
                ledger.release(id);
                Err(err)
            }
        }
    }

    /// Apply the confirm patch or the rollback for a finished request
    fn settle<T>(
        &self,
        id: CorrelationId,
        outcome: Result<T, ApiError>,
        confirm: impl FnOnce(&T) -> Confirm,
    ) -> Result<T, SyncError> {
        let mut ledger = self.ledger();
        let entry = ledger.take(id);
        if ledger.detached {
            ledger.settle(id, MutationState::Discarded);
            tracing::info!(correlation = %id, "response after detach ignored");
            return Err(SyncError::Detached);
        }

        match outcome {
            Ok(value) => {
                let confirmed = confirm(&value);
                self.cache.modify(|todos| confirmed.apply(todos));
                ledger.record_confirm(confirmed);
                ledger.settle(id, MutationState::Confirmed);
                tracing::debug!(correlation = %id, "mutation confirmed");
                Ok(value)
            }
            Err(err) => {
                if let Some(undo) = entry.and_then(|e| e.undo) {
                    self.cache.modify(|todos| undo.revert(todos));
                }
                ledger.settle(id, MutationState::RolledBack);
                tracing::warn!(correlation = %id, error = %err, "mutation rolled back");
                Err(err.into())
            }
        }
    }

    async fn after_mutation(&self) {
        if !self.refetch_after_mutation || self.is_detached() {
            return;
        }
        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "refetch after mutation failed");
        }
    }

    // ========================
    // Queries
    // ========================

    /// Load the server list; confirms that landed while it was in flight are
    /// replayed, then pending optimistic patches are re-applied on top
    pub async fn refresh(&self) -> Result<Snapshot, SyncError> {
        let mark = self.ledger().open_read();
        let outcome = self.api.list_todos().await;

        // The ledger lock orders this write against begin/settle
        let mut ledger = self.ledger();
        let missed = ledger.close_read(mark);
        if ledger.detached {
            return Err(SyncError::Detached);
        }
        let mut todos = outcome.map_err(|err| {
            tracing::warn!(error = %err, "failed to load todos");
            SyncError::from(err)
        })?;

        if !missed.is_empty() {
            tracing::debug!(replayed = missed.len(), "list predates confirmed changes");
        }
        for confirm in &missed {
            confirm.apply(&mut todos);
        }
        ledger.rebase(&mut todos, Utc::now());
        let snapshot = self.cache.write(todos);
        drop(ledger);

        tracing::info!(count = snapshot.len(), "todo list refreshed");
        Ok(snapshot)
    }

    /// Ask for related titles; the cache is never touched. A todo without
    /// urgency asks at Low.
    pub async fn suggest(
        &self,
        existing_todos: &[String],
        urgency: Urgency,
    ) -> Result<Vec<String>, SuggestionError> {
        let urgency = if urgency == Urgency::None { Urgency::Low } else { urgency };
        let outcome = self.api.generate_suggestions(existing_todos, urgency).await;
        if self.is_detached() {
            return Err(SuggestionError::Detached);
        }
        match outcome {
            Ok(suggestions) => {
                tracing::debug!(count = suggestions.len(), "suggestions received");
                Ok(suggestions)
            }
            Err(err) => {
                tracing::warn!(error = %err, "suggestion request failed");
                Err(err.into())
            }
        }
    }

    // ========================
    // Mutations
    // ========================

    pub async fn create(&self, title: &str, urgency: Urgency) -> Result<Todo, SyncError> {
        let draft = NewTodo::new(title, urgency)?;
        let now = Utc::now();

        let id = self.begin(MutationKind::Create, Claim::Fresh, |todos, id| {
            let placeholder = Todo::placeholder(id, &draft, now);
            patch::insert_placeholder(todos, placeholder.clone());
            Ok(Undo::Create { placeholder })
        })?;

        let outcome = self.api.create_todo(&draft).await;
        let created = self.settle(id, outcome, |created: &Todo| Confirm::Created {
            placeholder: TodoId::Pending(id),
            todo: created.clone(),
        })?;

        tracing::info!(id = %created.id, title = %created.title, "todo created");
        self.after_mutation().await;
        Ok(created)
    }

    /// Create several todos concurrently, one result per title, in order
    pub async fn apply_suggestions(&self, picks: &[(String, Urgency)]) -> Vec<Result<Todo, SyncError>> {
        join_all(picks.iter().map(|(title, urgency)| self.create(title, *urgency))).await
    }

    pub async fn update(&self, id: TodoId, changes: TodoPatch) -> Result<Todo, SyncError> {
        let changes = changes.validate()?;
        let server_id = self.target(id)?;
        let now = Utc::now();

        let ticket = self.begin(MutationKind::Update, Claim::One(id), |todos, _| {
            let prior = patch::apply_patch(todos, id, &changes, now).ok_or(SyncError::NotFound(id))?;
            Ok(Undo::Update { id, patch: changes.clone(), prior: Some(prior) })
        })?;

        let outcome = self.api.update_todo(server_id, &changes).await;
        let updated = self.settle(ticket, outcome, |updated: &Todo| Confirm::Updated(updated.clone()))?;

        tracing::info!(id = %updated.id, "todo updated");
        self.after_mutation().await;
        Ok(updated)
    }

    /// Flip the completed flag of a cached todo
    pub async fn toggle(&self, id: TodoId) -> Result<Todo, SyncError> {
        let current = self.cache.get(id).ok_or(SyncError::NotFound(id))?;
        self.update(id, TodoPatch::completed(!current.completed)).await
    }

    pub async fn delete(&self, id: TodoId) -> Result<Todo, SyncError> {
        let server_id = self.target(id)?;

        let ticket = self.begin(MutationKind::Delete, Claim::One(id), |todos, _| {
            let removed = patch::remove_entry(todos, id).ok_or(SyncError::NotFound(id))?;
            Ok(Undo::Delete { id, removed: Some(removed) })
        })?;

        let outcome = self.api.delete_todo(server_id).await;
        let deleted = self.settle(ticket, outcome, |_| Confirm::Deleted(id))?;

        tracing::info!(id = %deleted.id, "todo deleted");
        self.after_mutation().await;
        Ok(deleted)
    }

    /// Remove every todo; returns the server's count when it reports one
    pub async fn delete_all(&self) -> Result<Option<u32>, SyncError> {
        self.delete_bulk(false).await
    }

    /// Remove exactly the completed todos
    pub async fn delete_completed(&self) -> Result<Option<u32>, SyncError> {
        self.delete_bulk(true).await
    }

    async fn delete_bulk(&self, completed_only: bool) -> Result<Option<u32>, SyncError> {
        let kind = if completed_only { MutationKind::DeleteCompleted } else { MutationKind::DeleteAll };

        let ticket = self.begin(kind, Claim::All, |todos, _| {
            let removed = if completed_only {
                patch::remove_completed(todos)
            } else {
                patch::remove_all(todos)
            };
            Ok(Undo::Bulk { completed_only, removed })
        })?;

        let outcome = if completed_only {
            self.api.delete_completed_todos().await
        } else {
            self.api.delete_all_todos().await
        };
        let count = self.settle(ticket, outcome, |_| Confirm::Bulk { completed_only })?;

        tracing::info!(%kind, count = ?count, "bulk delete confirmed");
        self.after_mutation().await;
        Ok(count)
    }
}
