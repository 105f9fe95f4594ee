//! Notifications
//!
//! Non-fatal errors end up here as short-lived notices. Validation errors are
//! shown inline instead and never become a notice.

use todo_sync::SyncError;

/// Notices shown at once; the oldest is dropped first
const MAX_VISIBLE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

impl NoticeLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            NoticeLevel::Info => "notice notice-info",
            NoticeLevel::Error => "notice notice-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub level: NoticeLevel,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeQueue {
    next_id: u64,
    notices: Vec<Notice>,
}

impl NoticeQueue {
    /// Add a notice; returns its id for later dismissal
    pub fn push(&mut self, level: NoticeLevel, text: impl Into<String>) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.notices.push(Notice { id, level, text: text.into() });
        if self.notices.len() > MAX_VISIBLE {
            self.notices.remove(0);
        }
        id
    }

    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.notices.len();
        self.notices.retain(|n| n.id != id);
        self.notices.len() != before
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

/// User-facing notice for a failed mutation, if it warrants one
pub fn notice_for(err: &SyncError) -> Option<(NoticeLevel, String)> {
    match err {
        SyncError::Validation(_) | SyncError::Detached => None,
        SyncError::Busy => Some((NoticeLevel::Info, "Another change to this todo is still saving".to_string())),
        SyncError::NotFound(_) => Some((NoticeLevel::Info, "That todo no longer exists".to_string())),
        SyncError::Unconfirmed(_) => Some((NoticeLevel::Info, "This todo is still being saved".to_string())),
        SyncError::Transport(msg) => Some((
            NoticeLevel::Error,
            format!("Could not reach the server, change undone ({})", msg),
        )),
        SyncError::Server(msg) => Some((
            NoticeLevel::Error,
            format!("The server rejected the change: {}", msg),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_sync::{TodoId, ValidationError};

    #[test]
    fn test_queue_drops_oldest() {
        let mut queue = NoticeQueue::default();
        let first = queue.push(NoticeLevel::Info, "one");
        for text in ["two", "three", "four"] {
            queue.push(NoticeLevel::Error, text);
        }
        assert_eq!(queue.notices().len(), MAX_VISIBLE);
        assert!(!queue.dismiss(first));
        assert_eq!(queue.notices()[0].text, "two");
    }

    #[test]
    fn test_dismiss() {
        let mut queue = NoticeQueue::default();
        let id = queue.push(NoticeLevel::Info, "saved");
        assert!(queue.dismiss(id));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_rollbacks_are_errors_validation_is_silent() {
        let (level, text) = notice_for(&SyncError::Transport("offline".into())).unwrap();
        assert_eq!(level, NoticeLevel::Error);
        assert!(text.contains("offline"));

        assert_eq!(notice_for(&SyncError::Validation(ValidationError::EmptyTitle)), None);
        assert_eq!(notice_for(&SyncError::Detached), None);
        assert_eq!(notice_for(&SyncError::NotFound(TodoId::Server(3))).map(|(l, _)| l), Some(NoticeLevel::Info));
    }
}
