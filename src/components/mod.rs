//! UI Components
//!
//! Reusable Leptos components.

mod urgency_selector;
mod todo_form;
mod todo_row;
mod todo_list;
mod sort_dropdown;
mod confirm_dialog;
mod suggestion_panel;
mod notification_bar;
mod log_panel;

pub use urgency_selector::UrgencySelector;
pub use todo_form::TodoForm;
pub use todo_row::TodoRow;
pub use todo_list::TodoList;
pub use sort_dropdown::SortDropdown;
pub use confirm_dialog::ConfirmDialog;
pub use suggestion_panel::SuggestionPanel;
pub use notification_bar::NotificationBar;
pub use log_panel::LogPanel;
