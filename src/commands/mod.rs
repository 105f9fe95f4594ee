//! Reconciler Command Wrappers
//!
//! Async entry points used by components, organized by domain. Each one runs
//! a reconciler operation and routes its error to the notification bar.

mod todo;
mod suggestion;

// Re-export all public items
pub use todo::*;
pub use suggestion::*;
