//! Error taxonomy
//!
//! Validation failures never reach the network. Transport and server failures
//! roll back the optimistic patch that preceded them. Suggestion failures stay
//! inside the suggestion panel.

use thiserror::Error;

use crate::model::TodoId;

/// Input rejected before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("urgency {0} is outside 0..=3")]
    UrgencyOutOfRange(i32),
    #[error("update carries no fields to change")]
    EmptyPatch,
}

/// Failure reported by the remote collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("server answered with HTTP {status}")]
    Http { status: u16 },
    #[error("server error: {}", .messages.join("; "))]
    Server { messages: Vec<String> },
    #[error("undecodable response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn server(message: impl Into<String>) -> Self {
        ApiError::Server { messages: vec![message.into()] }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ApiError::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => ApiError::Http { status: status.as_u16() },
            None => ApiError::Transport(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

/// Error surfaced by a reconciled mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("network request failed: {0}")]
    Transport(String),
    #[error("server rejected the change: {0}")]
    Server(String),
    #[error("todo {0} does not exist")]
    NotFound(TodoId),
    #[error("todo {0} has not been saved yet")]
    Unconfirmed(TodoId),
    #[error("another change to the same todos is still in flight")]
    Busy,
    #[error("client detached before the response arrived")]
    Detached,
}

impl SyncError {
    /// True when the error reverted an optimistic patch
    pub fn is_rollback(&self) -> bool {
        matches!(self, SyncError::Transport(_) | SyncError::Server(_))
    }
}

impl From<ApiError> for SyncError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Server { messages } => SyncError::Server(messages.join("; ")),
            other => SyncError::Transport(other.to_string()),
        }
    }
}

/// Failure of the suggestion collaborator; never touches the todo cache
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestionError {
    #[error("suggestions unavailable: {0}")]
    Unavailable(String),
    #[error("client detached before suggestions arrived")]
    Detached,
}

impl From<ApiError> for SuggestionError {
    fn from(err: ApiError) -> Self {
        SuggestionError::Unavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_mapping() {
        let server: SyncError = ApiError::Server { messages: vec!["a".into(), "b".into()] }.into();
        assert_eq!(server, SyncError::Server("a; b".to_string()));
        assert!(server.is_rollback());

        let http: SyncError = ApiError::Http { status: 502 }.into();
        assert!(matches!(http, SyncError::Transport(ref msg) if msg.contains("502")));
        assert!(http.is_rollback());
    }

    #[test]
    fn test_validation_is_not_rollback() {
        let err: SyncError = ValidationError::EmptyTitle.into();
        assert!(!err.is_rollback());
        assert!(!SyncError::Busy.is_rollback());
        assert_eq!(err.to_string(), "title must not be empty");
    }
}
