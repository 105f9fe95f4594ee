//! Suggestion panel state
//!
//! The panel opens on every answer, including an empty list or a failure,
//! and never touches the todo cache.

use crate::error::SuggestionError;
use crate::model::Urgency;

/// Urgency given to todos created from a suggestion
pub const SUGGESTION_URGENCY: Urgency = Urgency::Low;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SuggestionPanel {
    #[default]
    Closed,
    Loading {
        base: String,
    },
    Ready {
        base: String,
        suggestions: Vec<String>,
        selected: Vec<bool>,
    },
    Failed {
        base: String,
        message: String,
    },
}

impl SuggestionPanel {
    pub fn open_loading(base: impl Into<String>) -> Self {
        SuggestionPanel::Loading { base: base.into() }
    }

    /// Settle a loading panel with the generator's answer
    pub fn resolve(base: impl Into<String>, result: Result<Vec<String>, SuggestionError>) -> Self {
        let base = base.into();
        match result {
            Ok(suggestions) => {
                let selected = vec![false; suggestions.len()];
                SuggestionPanel::Ready { base, suggestions, selected }
            }
            Err(err) => SuggestionPanel::Failed { base, message: err.to_string() },
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, SuggestionPanel::Closed)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SuggestionPanel::Loading { .. })
    }

    pub fn base(&self) -> Option<&str> {
        match self {
            SuggestionPanel::Closed => None,
            SuggestionPanel::Loading { base }
            | SuggestionPanel::Ready { base, .. }
            | SuggestionPanel::Failed { base, .. } => Some(base),
        }
    }

    pub fn suggestions(&self) -> &[String] {
        match self {
            SuggestionPanel::Ready { suggestions, .. } => suggestions,
            _ => &[],
        }
    }

    /// Open with nothing to pick from
    pub fn is_empty(&self) -> bool {
        self.is_open() && !self.is_loading() && self.suggestions().is_empty()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        match self {
            SuggestionPanel::Ready { selected, .. } => selected.get(index).copied().unwrap_or(false),
            _ => false,
        }
    }

    pub fn toggle(&mut self, index: usize) {
        if let SuggestionPanel::Ready { selected, .. } = self {
            if let Some(flag) = selected.get_mut(index) {
                *flag = !*flag;
            }
        }
    }

    /// Selected titles, each paired with the urgency it is created with
    pub fn selection(&self) -> Vec<(String, Urgency)> {
        match self {
            SuggestionPanel::Ready { suggestions, selected, .. } => suggestions
                .iter()
                .zip(selected)
                .filter(|(_, picked)| **picked)
                .map(|(title, _)| (title.clone(), SUGGESTION_URGENCY))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn close(&mut self) {
        *self = SuggestionPanel::Closed;
    }
}
