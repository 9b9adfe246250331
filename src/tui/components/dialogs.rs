//! Modal dialogs
//!
//! Dialogs are windows that take exclusive ownership of input while they sit
//! on the manager's modal stack. The three built-in dialogs cover the common
//! cases: a message, a yes/no question and a one-line text prompt.

pub mod confirm;
pub mod dialog;
pub mod input;
pub mod manager;
pub mod message;
pub mod types;

pub use confirm::ConfirmDialog;
pub use dialog::{Dialog, ModalDialog};
pub use input::{InputDialog, InputOutcome};
pub use manager::{Dispatch, WidgetManager};
pub use message::MessageBox;
pub use types::*;
