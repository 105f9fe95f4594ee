//! Pending-operations table
//!
//! Every in-flight mutation is recorded under its correlation id together
//! with the data needed to undo it or to re-apply it on top of a fresh list.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use chrono::{DateTime, Utc};

use crate::model::{CorrelationId, Todo, TodoId, TodoPatch};
use crate::patch::{self, Removed};

/// Settled outcomes kept for `state_of`
const HISTORY_LIMIT: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    DeleteAll,
    DeleteCompleted,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
            MutationKind::DeleteAll => "delete-all",
            MutationKind::DeleteCompleted => "delete-completed",
        };
        f.write_str(name)
    }
}

/// Lifecycle of one mutation: Idle -> Optimistic -> Confirmed | RolledBack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationState {
    /// Unknown or forgotten correlation id
    Idle,
    /// Patched locally, waiting for the server
    Optimistic,
    Confirmed,
    RolledBack,
    /// The answer arrived after the client detached and was ignored
    Discarded,
}

/// Ids a mutation owns while in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Claim {
    /// A create; its placeholder cannot be targeted, so only bulk deletes collide
    Fresh,
    One(TodoId),
    All,
}

impl Claim {
    fn overlaps(&self, other: &Claim) -> bool {
        match (self, other) {
            (Claim::All, _) | (_, Claim::All) => true,
            (Claim::One(a), Claim::One(b)) => a == b,
            _ => false,
        }
    }
}

/// What the optimistic patch did, enough to undo or replay it
#[derive(Debug, Clone)]
pub(crate) enum Undo {
    Create { placeholder: Todo },
    Update { id: TodoId, patch: TodoPatch, prior: Option<Todo> },
    Delete { id: TodoId, removed: Option<Removed> },
    Bulk { completed_only: bool, removed: Vec<Removed> },
}

impl Undo {
    /// Revert the optimistic patch
    pub(crate) fn revert(&self, todos: &mut Vec<Todo>) {
        match self {
            Undo::Create { placeholder } => {
                patch::discard_placeholder(todos, placeholder.id);
            }
            Undo::Update { prior, .. } => {
                if let Some(prior) = prior {
                    patch::restore_fields(todos, prior);
                }
            }
            Undo::Delete { removed, .. } => {
                if let Some((index, todo)) = removed {
                    patch::reinsert_entry(todos, *index, todo.clone());
                }
            }
            Undo::Bulk { removed, .. } => patch::reinsert_entries(todos, removed),
        }
    }

    /// Replay the patch on a freshly fetched list, recapturing undo data
    pub(crate) fn reapply(&mut self, todos: &mut Vec<Todo>, now: DateTime<Utc>) {
        match self {
            Undo::Create { placeholder } => patch::insert_placeholder(todos, placeholder.clone()),
            Undo::Update { id, patch: changes, prior } => {
                *prior = patch::apply_patch(todos, *id, changes, now);
            }
            Undo::Delete { id, removed } => {
                *removed = patch::remove_entry(todos, *id);
            }
            Undo::Bulk { completed_only, removed } => {
                *removed = if *completed_only {
                    patch::remove_completed(todos)
                } else {
                    patch::remove_all(todos)
                };
            }
        }
    }
}

/// Effect of a server-confirmed mutation, replayed onto lists that were
/// requested before it landed
#[derive(Debug, Clone)]
pub(crate) enum Confirm {
    Created { placeholder: TodoId, todo: Todo },
    Updated(Todo),
    Deleted(TodoId),
    Bulk { completed_only: bool },
}

impl Confirm {
    pub(crate) fn apply(&self, todos: &mut Vec<Todo>) {
        match self {
            Confirm::Created { placeholder, todo } => {
                patch::confirm_created(todos, *placeholder, todo.clone());
            }
            Confirm::Updated(todo) => {
                patch::replace_entry(todos, todo.clone());
            }
            Confirm::Deleted(id) => {
                patch::remove_entry(todos, *id);
            }
            Confirm::Bulk { completed_only: true } => {
                patch::remove_completed(todos);
            }
            Confirm::Bulk { completed_only: false } => {
                patch::remove_all(todos);
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct PendingMutation {
    pub kind: MutationKind,
    claim: Claim,
    /// None while the optimistic patch is being applied
    pub undo: Option<Undo>,
}

#[derive(Debug, Default)]
pub(crate) struct Ledger {
    last_id: u64,
    pending: BTreeMap<CorrelationId, PendingMutation>,
    settled: VecDeque<(CorrelationId, MutationState)>,
    /// Number of confirms applied so far
    confirms: u64,
    /// Confirms that some open list request has not seen yet
    confirm_log: VecDeque<(u64, Confirm)>,
    /// Confirm count at the start of each list request still in flight
    open_reads: Vec<u64>,
    pub detached: bool,
}

impl Ledger {
    /// Reserve a correlation id for a mutation, unless its claim is taken
    pub(crate) fn reserve(&mut self, kind: MutationKind, claim: Claim) -> Option<CorrelationId> {
        if self.pending.values().any(|m| m.claim.overlaps(&claim)) {
            return None;
        }
        self.last_id += 1;
        let id = CorrelationId(self.last_id);
        self.pending.insert(id, PendingMutation { kind, claim, undo: None });
        Some(id)
    }

    /// Attach the undo data once the optimistic patch has been applied
    pub(crate) fn arm(&mut self, id: CorrelationId, undo: Undo) {
        if let Some(entry) = self.pending.get_mut(&id) {
            entry.undo = Some(undo);
        }
    }

    /// Drop a reservation whose optimistic patch could not be applied
    pub(crate) fn release(&mut self, id: CorrelationId) {
        self.pending.remove(&id);
    }

    pub(crate) fn take(&mut self, id: CorrelationId) -> Option<PendingMutation> {
        self.pending.remove(&id)
    }

    pub(crate) fn settle(&mut self, id: CorrelationId, state: MutationState) {
        if self.settled.len() == HISTORY_LIMIT {
            self.settled.pop_front();
        }
        self.settled.push_back((id, state));
    }

    pub(crate) fn state_of(&self, id: CorrelationId) -> MutationState {
        if self.pending.contains_key(&id) {
            return MutationState::Optimistic;
        }
        self.settled
            .iter()
            .rev()
            .find(|(sid, _)| *sid == id)
            .map(|(_, state)| *state)
            .unwrap_or(MutationState::Idle)
    }

    /// Record a confirm that was just applied to the cache
    pub(crate) fn record_confirm(&mut self, confirm: Confirm) {
        self.confirms += 1;
        if !self.open_reads.is_empty() {
            self.confirm_log.push_back((self.confirms, confirm));
        }
    }

    /// Start a list request; the returned mark goes back to `close_read`
    pub(crate) fn open_read(&mut self) -> u64 {
        self.open_reads.push(self.confirms);
        self.confirms
    }

    /// Finish a list request and return the confirms it missed, in order
    pub(crate) fn close_read(&mut self, mark: u64) -> Vec<Confirm> {
        if let Some(index) = self.open_reads.iter().position(|m| *m == mark) {
            self.open_reads.swap_remove(index);
        }
        let missed = self
            .confirm_log
            .iter()
            .filter(|(seq, _)| *seq > mark)
            .map(|(_, confirm)| confirm.clone())
            .collect();

        let floor = self.open_reads.iter().copied().min().unwrap_or(self.confirms);
        while self.confirm_log.front().is_some_and(|(seq, _)| *seq <= floor) {
            self.confirm_log.pop_front();
        }
        missed
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Re-apply every pending patch, in issue order, on top of `base`
    pub(crate) fn rebase(&mut self, base: &mut Vec<Todo>, now: DateTime<Utc>) {
        for entry in self.pending.values_mut() {
            if let Some(undo) = entry.undo.as_mut() {
                undo.reapply(base, now);
            }
        }
    }
}
