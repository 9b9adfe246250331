//! Window and modal stack management
//!
//! The manager is responsible for:
//! - Owning the main windows (last = active)
//! - Keeping the LIFO stack of active modal dialogs
//! - Routing input to the modal top, or to the active main window
//! - Parking completed dialogs until their waiter collects them
//! - Rendering everything bottom-to-top

use super::dialog::ModalDialog;
use super::types::{DialogId, DialogState, ModalStackError};
use crate::tui::components::{ClickHandler, EventResult};
use crate::tui::events::Event;
use crate::tui::render::Renderer;
use crate::tui::window::{Window, WindowId, WindowInput};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use std::fmt;
use tracing::{debug, error, trace};

/// What the caller must do after input was routed
pub enum Dispatch {
    Ignored,
    Consumed,
    /// A main window button was pressed; run its handler once borrows are released
    Invoke(ClickHandler),
}

impl fmt::Debug for Dispatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatch::Ignored => f.write_str("Ignored"),
            Dispatch::Consumed => f.write_str("Consumed"),
            Dispatch::Invoke(_) => f.write_str("Invoke(..)"),
        }
    }
}

impl From<EventResult> for Dispatch {
    fn from(result: EventResult) -> Self {
        match result {
            EventResult::Ignored => Dispatch::Ignored,
            EventResult::Consumed | EventResult::Activated => Dispatch::Consumed,
        }
    }
}

/// Owns the main windows and the modal stack
#[derive(Default)]
pub struct WidgetManager {
    /// Main windows (last = active)
    windows: Vec<Window>,

    /// Active modal dialogs (last = topmost)
    modal_stack: Vec<Box<dyn ModalDialog>>,

    /// Completed dialogs not yet collected by their waiter
    finished: Vec<Box<dyn ModalDialog>>,
}

impl WidgetManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a main window and make it the active one
    pub fn register_main_window(&mut self, window: Window) -> WindowId {
        let id = window.id();
        debug!(window = %id, title = window.title(), "main window registered");
        self.windows.push(window);
        id
    }

    /// Remove a main window, handing it back
    pub fn close_window(&mut self, id: WindowId) -> Option<Window> {
        let index = self.windows.iter().position(|window| window.id() == id)?;
        debug!(window = %id, "main window closed");
        Some(self.windows.remove(index))
    }

    /// The active main window
    pub fn main_window(&self) -> Option<&Window> {
        self.windows.last()
    }

    pub fn main_window_mut(&mut self) -> Option<&mut Window> {
        self.windows.last_mut()
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|window| window.id() == id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|window| window.id() == id)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Make `dialog` the exclusive input target.
    ///
    /// Once completed, the dialog is parked in the finished list until
    /// [`WidgetManager::take_finished`] collects it. `Ui::wait_for_result` does
    /// that; callers pushing dialogs without waiting on them must take them
    /// back themselves.
    pub fn push_modal(&mut self, mut dialog: Box<dyn ModalDialog>) -> Result<DialogId, ModalStackError> {
        let id = dialog.dialog().id();
        let violation = match dialog.dialog().state() {
            DialogState::Active => Some(ModalStackError::AlreadyActive(id)),
            DialogState::Completed => Some(ModalStackError::AlreadyCompleted(id)),
            DialogState::Created if self.is_active(id) => Some(ModalStackError::AlreadyActive(id)),
            DialogState::Created => None,
        };
        if let Some(err) = violation {
            error!(dialog = %id, "rejected modal push: {}", err);
            return Err(err);
        }

        dialog.dialog_mut().set_state(DialogState::Active);
        self.modal_stack.push(dialog);
        debug!(dialog = %id, depth = self.modal_stack.len(), "modal pushed");
        Ok(id)
    }

    /// Remove `id` from the top of the stack. A dialog popped before completion returns to `Created`.
    pub fn pop_modal(&mut self, id: DialogId) -> Result<Box<dyn ModalDialog>, ModalStackError> {
        let top = self.top_modal().map(|dialog| dialog.dialog().id());
        if top != Some(id) {
            let err = ModalStackError::NotTop { requested: id, top };
            error!(dialog = %id, "rejected modal pop: {}", err);
            return Err(err);
        }

        let mut dialog = self
            .modal_stack
            .pop()
            .ok_or(ModalStackError::NotActive(id))?;
        if dialog.dialog().state() == DialogState::Active {
            dialog.dialog_mut().set_state(DialogState::Created);
        }
        debug!(dialog = %id, depth = self.modal_stack.len(), "modal popped");
        Ok(dialog)
    }

    pub fn modal_depth(&self) -> usize {
        self.modal_stack.len()
    }

    pub fn top_modal(&self) -> Option<&dyn ModalDialog> {
        self.modal_stack.last().map(|dialog| dialog.as_ref())
    }

    /// Whether `id` is on the modal stack
    pub fn is_active(&self, id: DialogId) -> bool {
        self.modal_stack
            .iter()
            .any(|dialog| dialog.dialog().id() == id)
    }

    /// Completed dialogs not yet collected
    pub fn finished_count(&self) -> usize {
        self.finished.len()
    }

    /// Collect a completed dialog
    pub fn take_finished(&mut self, id: DialogId) -> Option<Box<dyn ModalDialog>> {
        let index = self
            .finished
            .iter()
            .position(|dialog| dialog.dialog().id() == id)?;
        Some(self.finished.remove(index))
    }

    /// Route one input event
    pub fn dispatch_input(&mut self, event: &Event) -> Dispatch {
        match event {
            Event::Key(key) => {
                trace!(?key, modal_depth = self.modal_stack.len(), "dispatching key");
                if let Some(top) = self.modal_stack.last_mut() {
                    let result = top.handle_input(*key);
                    return self.settle_modal(result);
                }
                match self.windows.last_mut() {
                    Some(window) => {
                        let input = window.handle_input(*key);
                        self.resolve(input)
                    }
                    None => Dispatch::Ignored,
                }
            }
            Event::Mouse(mouse) => self.dispatch_mouse(mouse),
            Event::Resize(..) | Event::Tick => Dispatch::Ignored,
        }
    }

    fn dispatch_mouse(&mut self, mouse: &MouseEvent) -> Dispatch {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Dispatch::Ignored;
        }
        let (column, row) = (mouse.column, mouse.row);

        if let Some(top) = self.modal_stack.last_mut() {
            if !top.dialog().window().geometry().contains(column as i32, row as i32) {
                // Clicks outside the modal top never reach the backdrop
                return Dispatch::Consumed;
            }
            let result = top.handle_mouse(column, row);
            return self.settle_modal(result);
        }

        match self.windows.last_mut() {
            Some(window) if window.geometry().contains(column as i32, row as i32) => {
                let input = window.handle_mouse(column, row);
                self.resolve(input)
            }
            _ => Dispatch::Ignored,
        }
    }

    /// Turn a main window outcome into a dispatch
    fn resolve(&self, input: WindowInput) -> Dispatch {
        match input {
            WindowInput::Ignored => Dispatch::Ignored,
            WindowInput::Consumed => Dispatch::Consumed,
            WindowInput::Activated(child) => {
                let handler = self
                    .window(child.window())
                    .and_then(|window| window.click_handler(child));
                match handler {
                    Some(handler) => Dispatch::Invoke(handler),
                    None => {
                        trace!("activated button has no click handler");
                        Dispatch::Consumed
                    }
                }
            }
        }
    }

    /// Turn the modal top's outcome into a dispatch and retire it if it completed
    fn settle_modal(&mut self, result: EventResult) -> Dispatch {
        let dispatch = match result {
            EventResult::Activated => self.modal_click_handler(),
            other => other.into(),
        };
        self.retire();
        dispatch
    }

    /// Click handler of the pressed button in the modal top.
    ///
    /// Keys go to the focused child and clicks focus a button before
    /// activating it, so the pressed button is the focused one.
    fn modal_click_handler(&self) -> Dispatch {
        let handler = self.top_modal().and_then(|dialog| {
            let window = dialog.dialog().window();
            window
                .focused()
                .and_then(|child| window.click_handler(child))
        });
        match handler {
            Some(handler) => Dispatch::Invoke(handler),
            None => {
                trace!("activated dialog button has no click handler");
                Dispatch::Consumed
            }
        }
    }

    /// Move a completed top dialog to the finished list
    fn retire(&mut self) {
        let completed = self
            .top_modal()
            .map(|dialog| dialog.dialog().is_completed())
            .unwrap_or(false);
        if !completed {
            return;
        }
        if let Some(dialog) = self.modal_stack.pop() {
            debug!(dialog = %dialog.dialog().id(), depth = self.modal_stack.len(), "modal closed");
            self.finished.push(dialog);
        }
    }

    /// Main windows bottom-to-top, then the modal stack bottom-to-top
    pub fn render_all(&self, renderer: &mut dyn Renderer) {
        for window in &self.windows {
            window.render(renderer);
        }
        for dialog in &self.modal_stack {
            dialog.render(renderer);
        }
    }
}

impl fmt::Debug for WidgetManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetManager")
            .field("windows", &self.windows.len())
            .field("modal_depth", &self.modal_stack.len())
            .field("finished", &self.finished.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::dialogs::{ConfirmDialog, InputDialog, MessageBox};
    use crate::tui::components::{Button, TextBox};
    use crate::tui::render::buffer_line;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn manager_with_field() -> WidgetManager {
        let mut manager = WidgetManager::new();
        let mut window = Window::new(0, 0, 80, 24, "Main").unwrap();
        window.add_child(TextBox::new(2, 2, 20));
        manager.register_main_window(window);
        manager
    }

    #[test]
    fn test_push_order_and_top() {
        let mut manager = WidgetManager::new();
        let mut ids = Vec::new();
        for n in 0..4 {
            let id = manager
                .push_modal(Box::new(MessageBox::new("Stack", format!("#{}", n))))
                .unwrap();
            ids.push(id);
            assert_eq!(manager.modal_depth(), n + 1);
            assert_eq!(manager.top_modal().map(|d| d.dialog().id()), Some(id));
        }
        for id in ids.iter().rev() {
            manager.pop_modal(*id).unwrap();
        }
        assert_eq!(manager.modal_depth(), 0);
    }

    #[test]
    fn test_pop_non_top_fails() {
        let mut manager = WidgetManager::new();
        let bottom = manager.push_modal(Box::new(MessageBox::new("A", "a"))).unwrap();
        let top = manager.push_modal(Box::new(MessageBox::new("B", "b"))).unwrap();

        assert_eq!(
            manager.pop_modal(bottom).err(),
            Some(ModalStackError::NotTop {
                requested: bottom,
                top: Some(top),
            })
        );
        assert_eq!(manager.modal_depth(), 2);
    }

    #[test]
    fn test_push_rejects_active_or_completed() {
        let mut manager = WidgetManager::new();

        let mut active = MessageBox::new("A", "a");
        active.dialog_mut().set_state(DialogState::Active);
        let id = active.dialog().id();
        assert_eq!(
            manager.push_modal(Box::new(active)).err(),
            Some(ModalStackError::AlreadyActive(id))
        );

        let mut done = MessageBox::new("B", "b");
        done.accept();
        let id = done.dialog().id();
        assert_eq!(
            manager.push_modal(Box::new(done)).err(),
            Some(ModalStackError::AlreadyCompleted(id))
        );
        assert_eq!(manager.modal_depth(), 0);
    }

    #[test]
    fn test_pop_before_completion_resets_state() {
        let mut manager = WidgetManager::new();
        let id = manager.push_modal(Box::new(MessageBox::new("A", "a"))).unwrap();
        assert_eq!(manager.top_modal().unwrap().dialog().state(), DialogState::Active);

        let dialog = manager.pop_modal(id).unwrap();
        assert_eq!(dialog.dialog().state(), DialogState::Created);
        assert!(manager.push_modal(dialog).is_ok());
    }

    #[test]
    fn test_input_goes_only_to_top() {
        let mut manager = manager_with_field();
        let lower = manager.push_modal(Box::new(ConfirmDialog::new("Lower", "?"))).unwrap();
        let upper = manager
            .push_modal(Box::new(InputDialog::new("Upper", "?", "")))
            .unwrap();

        manager.dispatch_input(&key(KeyCode::Char('x')));

        let top = manager.top_modal().unwrap().as_any().downcast_ref::<InputDialog>().unwrap();
        assert_eq!(top.content(), "x");
        assert_eq!(top.dialog().id(), upper);
        let main = manager.main_window().unwrap();
        let field = main.focused().and_then(|id| main.child(id)).unwrap();
        let field = field.as_any().downcast_ref::<TextBox>().unwrap();
        assert!(field.content().is_empty());
        assert!(manager.is_active(lower));
    }

    #[test]
    fn test_completed_top_is_retired() {
        let mut manager = manager_with_field();
        let id = manager.push_modal(Box::new(ConfirmDialog::new("Q", "?"))).unwrap();

        assert!(matches!(manager.dispatch_input(&key(KeyCode::Esc)), Dispatch::Consumed));
        assert_eq!(manager.modal_depth(), 0);

        let finished = manager.take_finished(id).unwrap();
        let confirm = finished.as_any().downcast_ref::<ConfirmDialog>().unwrap();
        assert!(!confirm.result());
        assert_eq!(confirm.dialog().state(), DialogState::Completed);
        assert!(manager.take_finished(id).is_none());
    }

    #[test]
    fn test_main_window_receives_input_without_modal() {
        let mut manager = manager_with_field();
        manager.dispatch_input(&key(KeyCode::Char('a')));
        let main = manager.main_window().unwrap();
        let field = main.focused().and_then(|id| main.child(id)).unwrap();
        assert_eq!(field.as_any().downcast_ref::<TextBox>().unwrap().content(), "a");
    }

    #[test]
    fn test_button_activation_yields_handler() {
        let mut manager = WidgetManager::new();
        let mut window = Window::new(0, 0, 40, 10, "Main").unwrap();
        let bound = window.add_child(Button::new(1, 1, 10, "Bound"));
        window.add_child(Button::new(1, 2, 10, "Bare"));
        window.get_mut(bound).unwrap().set_on_click(|_ui| Ok(()));
        manager.register_main_window(window);

        assert!(matches!(
            manager.dispatch_input(&key(KeyCode::Enter)),
            Dispatch::Invoke(_)
        ));
        manager.dispatch_input(&key(KeyCode::Tab));
        assert!(matches!(
            manager.dispatch_input(&key(KeyCode::Enter)),
            Dispatch::Consumed
        ));
        assert!(matches!(
            manager.dispatch_input(&key(KeyCode::F(5))),
            Dispatch::Ignored
        ));
    }

    #[test]
    fn test_dialog_button_yields_handler() {
        let mut manager = manager_with_field();
        let mut message = MessageBox::new("Top", "msg");
        let mut more = Button::new(2, 5, 10, "More");
        more.set_on_click(|_ui| Ok(()));
        message.dialog_mut().window_mut().add_child(more);
        message.dialog_mut().window_mut().add_child(Button::new(14, 5, 10, "Bare"));
        manager.push_modal(Box::new(message)).unwrap();

        // OK has focus first; Tab moves to "More"
        manager.dispatch_input(&key(KeyCode::Tab));
        assert!(matches!(
            manager.dispatch_input(&key(KeyCode::Char(' '))),
            Dispatch::Invoke(_)
        ));
        assert_eq!(manager.modal_depth(), 1);

        manager.dispatch_input(&key(KeyCode::Tab));
        assert!(matches!(
            manager.dispatch_input(&key(KeyCode::Char(' '))),
            Dispatch::Consumed
        ));

        // The message box sits at (20, 10), so "More" is at (22, 15)
        assert!(matches!(manager.dispatch_input(&click(23, 15)), Dispatch::Invoke(_)));
        assert_eq!(manager.modal_depth(), 1);

        manager.dispatch_input(&key(KeyCode::Enter));
        assert_eq!(manager.modal_depth(), 0);
    }

    #[test]
    fn test_finished_dialog_kept_until_taken() {
        let mut manager = manager_with_field();
        let id = manager.push_modal(Box::new(MessageBox::new("A", "a"))).unwrap();
        manager.dispatch_input(&key(KeyCode::Enter));

        assert_eq!(manager.modal_depth(), 0);
        assert_eq!(manager.finished_count(), 1);
        assert!(manager.take_finished(id).is_some());
        assert_eq!(manager.finished_count(), 0);
    }

    #[test]
    fn test_clicks_outside_modal_are_swallowed() {
        let mut manager = WidgetManager::new();
        let mut window = Window::new(0, 0, 80, 24, "Main").unwrap();
        let button = window.add_child(Button::new(1, 1, 10, "Under"));
        window.get_mut(button).unwrap().set_on_click(|_ui| Ok(()));
        manager.register_main_window(window);
        manager.push_modal(Box::new(MessageBox::new("Top", "msg"))).unwrap();

        assert!(matches!(manager.dispatch_input(&click(2, 1)), Dispatch::Consumed));
        assert_eq!(manager.modal_depth(), 1);

        // OK button of the message box
        manager.dispatch_input(&click(37, 17));
        assert_eq!(manager.modal_depth(), 0);
    }

    #[test]
    fn test_close_window_activates_previous() {
        let mut manager = WidgetManager::new();
        let menu = manager.register_main_window(Window::new(0, 0, 40, 10, "Menu").unwrap());
        let sub = manager.register_main_window(Window::new(2, 2, 30, 8, "Sub").unwrap());

        assert_eq!(manager.main_window().map(Window::id), Some(sub));
        assert!(manager.close_window(sub).is_some());
        assert_eq!(manager.main_window().map(Window::id), Some(menu));
        assert!(manager.close_window(sub).is_none());
    }

    #[test]
    fn test_render_stacks_modal_over_backdrop() {
        let mut manager = WidgetManager::new();
        manager.register_main_window(Window::new(0, 0, 80, 24, "Backdrop").unwrap());
        manager.push_modal(Box::new(MessageBox::new("On top", "Hello"))).unwrap();

        let mut buffer = Buffer::empty(Rect::new(0, 0, 80, 24));
        manager.render_all(&mut buffer);

        assert!(buffer_line(&buffer, 0).contains(" Backdrop "));
        assert!(buffer_line(&buffer, 10).contains(" On top "));
        assert!(buffer_line(&buffer, 12).contains("Hello"));
    }
}
