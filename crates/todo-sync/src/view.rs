//! Sort/Filter View
//!
//! Pure projections of a cache snapshot for display. Sorting is stable, so
//! ties keep cache order.

use serde::{Deserialize, Serialize};

use crate::model::Todo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first by creation time
    #[default]
    Recency,
    /// Highest urgency first
    Urgency,
}

impl SortKey {
    pub const ALL: [SortKey; 2] = [SortKey::Recency, SortKey::Urgency];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Recency => "recency",
            SortKey::Urgency => "urgency",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Recency => "Sort by Time",
            SortKey::Urgency => "Sort by Urgency",
        }
    }

    /// Unknown values fall back to the default
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "urgency" => SortKey::Urgency,
            _ => SortKey::Recency,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [StatusFilter::All, StatusFilter::Active, StatusFilter::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Active => "Active",
            StatusFilter::Completed => "Completed",
        }
    }

    /// Unknown values fall back to the default
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "active" => StatusFilter::Active,
            "completed" => StatusFilter::Completed,
            _ => StatusFilter::All,
        }
    }

    fn admits(&self, todo: &Todo) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !todo.completed,
            StatusFilter::Completed => todo.completed,
        }
    }
}

/// Display settings of the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoView {
    pub sort: SortKey,
    pub filter: StatusFilter,
}

pub fn sorted_view(snapshot: &[Todo], sort: SortKey) -> Vec<Todo> {
    let mut todos = snapshot.to_vec();
    match sort {
        SortKey::Recency => todos.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Urgency => todos.sort_by(|a, b| b.urgency.cmp(&a.urgency)),
    }
    todos
}

pub fn filtered_view(snapshot: &[Todo], view: TodoView) -> Vec<Todo> {
    let mut todos = sorted_view(snapshot, view.sort);
    todos.retain(|todo| view.filter.admits(todo));
    todos
}

/// Whether "delete completed" has anything to remove
pub fn has_completed(snapshot: &[Todo]) -> bool {
    snapshot.iter().any(|todo| todo.completed)
}
