//! Todo Entity
//!
//! A task with an urgency level. Ids are assigned by the server; an optimistic
//! copy carries a pending id until the server answers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Locally generated id of one mutation, unique per reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CorrelationId(pub u64);

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a todo inside the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TodoId {
    /// Assigned by the server
    Server(i64),
    /// Placeholder of an unconfirmed create, keyed by its correlation id
    Pending(CorrelationId),
}

impl TodoId {
    pub fn is_pending(&self) -> bool {
        matches!(self, TodoId::Pending(_))
    }

    /// Server id, if this todo has been confirmed
    pub fn server(&self) -> Option<i64> {
        match self {
            TodoId::Server(id) => Some(*id),
            TodoId::Pending(_) => None,
        }
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Server(id) => write!(f, "{}", id),
            TodoId::Pending(c) => write!(f, "pending{}", c),
        }
    }
}

/// Urgency level: 0 = none, 1 = low, 2 = medium, 3 = high
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Urgency {
    None,
    #[default]
    Low,
    Medium,
    High,
}

impl Urgency {
    /// Highest first, the order the selector shows them in
    pub const ALL: [Urgency; 4] = [Urgency::High, Urgency::Medium, Urgency::Low, Urgency::None];

    pub fn level(&self) -> i32 {
        match self {
            Urgency::None => 0,
            Urgency::Low => 1,
            Urgency::Medium => 2,
            Urgency::High => 3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Urgency::None => "None",
            Urgency::Low => "Low",
            Urgency::Medium => "Medium",
            Urgency::High => "High",
        }
    }

    /// CSS modifier used by the urgency dot
    pub fn css_class(&self) -> &'static str {
        match self {
            Urgency::None => "urgency-none",
            Urgency::Low => "urgency-low",
            Urgency::Medium => "urgency-medium",
            Urgency::High => "urgency-high",
        }
    }
}

impl TryFrom<i32> for Urgency {
    type Error = ValidationError;

    fn try_from(level: i32) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Urgency::None),
            1 => Ok(Urgency::Low),
            2 => Ok(Urgency::Medium),
            3 => Ok(Urgency::High),
            other => Err(ValidationError::UrgencyOutOfRange(other)),
        }
    }
}

impl From<Urgency> for i32 {
    fn from(urgency: Urgency) -> Self {
        urgency.level()
    }
}

/// A todo as held by the cache
#[derive(Debug, Clone, PartialEq)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub completed: bool,
    pub urgency: Urgency,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Todo {
    /// Optimistic copy of a create that has not been answered yet
    pub fn placeholder(correlation: CorrelationId, draft: &NewTodo, now: DateTime<Utc>) -> Self {
        Self {
            id: TodoId::Pending(correlation),
            title: draft.title.clone(),
            completed: false,
            urgency: draft.urgency,
            created_at: now,
            updated_at: Some(now),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.id.is_pending()
    }
}

/// Validated input of a create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub urgency: Urgency,
}

impl NewTodo {
    /// Trims the title; whitespace-only titles are rejected
    pub fn new(title: &str, urgency: Urgency) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(Self { title: title.to_string(), urgency })
    }
}

/// Partial update: only the supplied fields change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub urgency: Option<Urgency>,
}

impl TodoPatch {
    pub fn completed(completed: bool) -> Self {
        Self { completed: Some(completed), ..Default::default() }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_urgency(mut self, urgency: Urgency) -> Self {
        self.urgency = Some(urgency);
        self
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none() && self.urgency.is_none()
    }

    /// Trims the title and rejects patches that would change nothing
    pub fn validate(self) -> Result<Self, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyPatch);
        }
        let title = match self.title {
            Some(title) => {
                let trimmed = title.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::EmptyTitle);
                }
                Some(trimmed.to_string())
            }
            None => None,
        };
        Ok(Self { title, ..self })
    }

    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        if let Some(urgency) = self.urgency {
            todo.urgency = urgency;
        }
    }

    /// Current values of exactly the fields this patch touches
    pub fn capture(&self, todo: &Todo) -> TodoPatch {
        TodoPatch {
            title: self.title.as_ref().map(|_| todo.title.clone()),
            completed: self.completed.map(|_| todo.completed),
            urgency: self.urgency.map(|_| todo.urgency),
        }
    }
}
