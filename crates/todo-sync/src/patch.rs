//! Cache patches
//!
//! One apply/undo pair per remote operation. Each function works on the
//! working copy handed out by `TodoCache::modify`; none of them are used
//! ad hoc outside the reconciler.

use chrono::{DateTime, Utc};

use crate::model::{Todo, TodoId, TodoPatch};

/// Entry removed from the list together with its former position
pub(crate) type Removed = (usize, Todo);

// ========================
// Create
// ========================

pub(crate) fn insert_placeholder(todos: &mut Vec<Todo>, placeholder: Todo) {
    if todos.iter().any(|t| t.id == placeholder.id) {
        return;
    }
    todos.push(placeholder);
}

pub(crate) fn discard_placeholder(todos: &mut Vec<Todo>, id: TodoId) -> bool {
    let before = todos.len();
    todos.retain(|t| t.id != id);
    todos.len() != before
}

/// Replace the placeholder with the server's record, never merging the two.
/// If a refresh already brought in the server id, that entry wins and the
/// placeholder is dropped so ids stay unique.
pub(crate) fn confirm_created(todos: &mut Vec<Todo>, placeholder: TodoId, created: Todo) {
    let existing = todos.iter().position(|t| t.id == created.id);
    let slot = todos.iter().position(|t| t.id == placeholder);
    match (existing, slot) {
        (Some(index), _) => {
            todos[index] = created;
            todos.retain(|t| t.id != placeholder);
        }
        (None, Some(index)) => todos[index] = created,
        (None, None) => todos.push(created),
    }
}

// ========================
// Update
// ========================

/// Patch fields in place; returns the entry as it was before
pub(crate) fn apply_patch(
    todos: &mut [Todo],
    id: TodoId,
    patch: &TodoPatch,
    now: DateTime<Utc>,
) -> Option<Todo> {
    let todo = todos.iter_mut().find(|t| t.id == id)?;
    let prior = todo.clone();
    patch.apply_to(todo);
    todo.updated_at = Some(now);
    Some(prior)
}

/// Undo of `apply_patch`: put back the fields the patch can touch
pub(crate) fn restore_fields(todos: &mut [Todo], prior: &Todo) -> bool {
    let Some(todo) = todos.iter_mut().find(|t| t.id == prior.id) else {
        return false;
    };
    todo.title = prior.title.clone();
    todo.completed = prior.completed;
    todo.urgency = prior.urgency;
    todo.updated_at = prior.updated_at;
    true
}

/// Overwrite the entry with the same id; used for authoritative server payloads
pub(crate) fn replace_entry(todos: &mut [Todo], todo: Todo) -> bool {
    match todos.iter_mut().find(|t| t.id == todo.id) {
        Some(slot) => {
            *slot = todo;
            true
        }
        None => false,
    }
}

// ========================
// Delete
// ========================

pub(crate) fn remove_entry(todos: &mut Vec<Todo>, id: TodoId) -> Option<Removed> {
    let index = todos.iter().position(|t| t.id == id)?;
    Some((index, todos.remove(index)))
}

/// Put a removed entry back at its former position (clamped to the list end)
pub(crate) fn reinsert_entry(todos: &mut Vec<Todo>, index: usize, todo: Todo) {
    if todos.iter().any(|t| t.id == todo.id) {
        return;
    }
    let index = index.min(todos.len());
    todos.insert(index, todo);
}

// ========================
// Bulk delete
// ========================

pub(crate) fn remove_all(todos: &mut Vec<Todo>) -> Vec<Removed> {
    todos.drain(..).enumerate().collect()
}

pub(crate) fn remove_completed(todos: &mut Vec<Todo>) -> Vec<Removed> {
    let mut removed = Vec::new();
    let mut kept = Vec::with_capacity(todos.len());
    for (index, todo) in todos.drain(..).enumerate() {
        if todo.completed {
            removed.push((index, todo));
        } else {
            kept.push(todo);
        }
    }
    *todos = kept;
    removed
}

/// Undo of a bulk removal; `removed` is in ascending index order
pub(crate) fn reinsert_entries(todos: &mut Vec<Todo>, removed: &[Removed]) {
    for (index, todo) in removed {
        reinsert_entry(todos, *index, todo.clone());
    }
}
