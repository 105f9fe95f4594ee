//! Client-Side Cache
//!
//! Holds the authoritative in-memory list of todos as an immutable snapshot.
//! Writers swap in a whole new snapshot, so a reader never sees a partial
//! write. The handle is cheap to clone and is passed explicitly; there is no
//! global instance.

use std::convert::Infallible;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::model::{Todo, TodoId};

/// Immutable view of the cache at one instant
pub type Snapshot = Arc<Vec<Todo>>;

type Listener = Arc<dyn Fn(&Snapshot) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Inner {
    snapshot: Snapshot,
    version: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

/// Shared handle to the todo cache
#[derive(Clone)]
pub struct TodoCache {
    inner: Arc<Mutex<Inner>>,
}

impl Default for TodoCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TodoCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("TodoCache")
            .field("version", &inner.version)
            .field("todos", &inner.snapshot.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl TodoCache {
    pub fn new() -> Self {
        Self::with_todos(Vec::new())
    }

    pub fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                snapshot: Arc::new(todos),
                version: 0,
                listeners: Vec::new(),
                next_subscription: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking listener never runs under the lock, so the data is intact
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current snapshot; unaffected by later writes
    pub fn read(&self) -> Snapshot {
        self.lock().snapshot.clone()
    }

    /// Replace the held list atomically and notify subscribers
    pub fn write(&self, todos: Vec<Todo>) -> Snapshot {
        Self::publish(self.lock(), todos)
    }

    /// Copy-on-write modification; nothing is written when the closure fails
    pub(crate) fn try_modify<R, E>(
        &self,
        f: impl FnOnce(&mut Vec<Todo>) -> Result<R, E>,
    ) -> Result<R, E> {
        let inner = self.lock();
        let mut todos = inner.snapshot.as_ref().clone();
        let out = f(&mut todos)?;
        Self::publish(inner, todos);
        Ok(out)
    }

    pub(crate) fn modify<R>(&self, f: impl FnOnce(&mut Vec<Todo>) -> R) -> R {
        match self.try_modify(|todos| Ok::<R, Infallible>(f(todos))) {
            Ok(out) => out,
            Err(never) => match never {},
        }
    }

    /// Swap in the new list, then notify with the lock released
    fn publish(mut inner: MutexGuard<'_, Inner>, todos: Vec<Todo>) -> Snapshot {
        inner.snapshot = Arc::new(todos);
        inner.version += 1;
        let snapshot = inner.snapshot.clone();
        let listeners: Vec<Listener> = inner.listeners.iter().map(|(_, l)| l.clone()).collect();
        drop(inner);
        for listener in listeners {
            listener(&snapshot);
        }
        snapshot
    }

    /// Register a listener called with every new snapshot
    pub fn subscribe(&self, listener: impl Fn(&Snapshot) + Send + Sync + 'static) -> SubscriptionId {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.listeners.push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|(sid, _)| *sid != id);
        inner.listeners.len() != before
    }

    pub fn get(&self, id: TodoId) -> Option<Todo> {
        self.lock().snapshot.iter().find(|todo| todo.id == id).cloned()
    }

    pub fn contains(&self, id: TodoId) -> bool {
        self.lock().snapshot.iter().any(|todo| todo.id == id)
    }

    pub fn len(&self) -> usize {
        self.lock().snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of writes since creation
    pub fn version(&self) -> u64 {
        self.lock().version
    }
}
