//! Core dialog types
//!
//! Identifiers, lifecycle state, stack errors and the optional callback slots
//! shared by every modal dialog.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

static DIALOG_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for dialog instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogId(u64);

impl DialogId {
    pub(crate) fn next() -> Self {
        Self(DIALOG_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DialogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dialog#{}", self.0)
    }
}

/// Dialog lifecycle
///
/// `Created -> Active -> Completed`. A dialog popped before it completes
/// returns to `Created`; nothing leaves `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Created,
    Active,
    Completed,
}

/// Violations of the modal stack discipline
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModalStackError {
    #[error("{0} is already on the modal stack")]
    AlreadyActive(DialogId),

    #[error("{0} has already completed")]
    AlreadyCompleted(DialogId),

    #[error("{requested} is not the top of the modal stack (top: {top:?})")]
    NotTop {
        requested: DialogId,
        top: Option<DialogId>,
    },

    #[error("{0} is not an active modal dialog")]
    NotActive(DialogId),

    #[error("{0} finished as a different dialog type than requested")]
    UnexpectedKind(DialogId),
}

/// Optional callback slot that fires at most once
pub struct Handler<A> {
    slot: Option<Box<dyn FnMut(A)>>,
}

impl<A> Handler<A> {
    pub fn new() -> Self {
        Self { slot: None }
    }

    pub fn set(&mut self, handler: impl FnMut(A) + 'static) {
        self.slot = Some(Box::new(handler));
    }

    pub fn is_bound(&self) -> bool {
        self.slot.is_some()
    }

    /// Run and unbind the handler. An empty slot is a no-op returning `false`.
    pub fn fire(&mut self, arg: A) -> bool {
        match self.slot.take() {
            Some(mut handler) => {
                handler(arg);
                true
            }
            None => {
                trace!("no handler bound");
                false
            }
        }
    }
}

impl<A> Default for Handler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Handler<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("bound", &self.is_bound())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_dialog_ids_unique() {
        let a = DialogId::next();
        let b = DialogId::next();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("dialog#"));
    }

    #[test]
    fn test_handler_fires_once() {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        let mut handler = Handler::new();
        handler.set(move |n: u32| seen.set(seen.get() + n));

        assert!(handler.fire(2));
        assert!(!handler.fire(5));
        assert_eq!(count.get(), 2);
        assert!(!handler.is_bound());
    }

    #[test]
    fn test_unbound_handler_is_noop() {
        let mut handler: Handler<bool> = Handler::default();
        assert!(!handler.fire(true));
    }

    #[test]
    fn test_stack_error_messages() {
        let id = DialogId::next();
        let err = ModalStackError::NotTop {
            requested: id,
            top: None,
        };
        assert!(err.to_string().contains("not the top"));
        assert_eq!(
            ModalStackError::NotActive(id).to_string(),
            format!("{} is not an active modal dialog", id)
        );
    }
}
