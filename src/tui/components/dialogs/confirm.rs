//! Yes/No question dialog
//!
//! Enter answers yes and Escape answers no, whichever button has focus.

use super::dialog::{Dialog, ModalDialog};
use super::types::Handler;
use crate::tui::components::{Button, EventResult};
use crate::tui::render::Renderer;
use crate::tui::window::{Geometry, WidgetId, WidgetRef};
use crossterm::event::{KeyCode, KeyEvent};
use std::any::Any;

const WIDTH: u16 = 50;
const HEIGHT: u16 = 12;

/// Yes/No question
pub struct ConfirmDialog {
    dialog: Dialog,
    message: String,
    yes: WidgetRef<Button>,
    no: WidgetRef<Button>,
    result: bool,
    on_result: Handler<bool>,
}

impl ConfirmDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        let mut dialog = Dialog::new(Geometry::fixed(15, 8, WIDTH, HEIGHT), title);
        let row = HEIGHT as i32 - 3;
        let window = dialog.window_mut();
        let yes = window.add_child(Button::new(WIDTH as i32 / 2 - 12, row, 10, "Yes"));
        let no = window.add_child(Button::new(WIDTH as i32 / 2 + 2, row, 10, "No"));

        Self {
            dialog,
            message: message.into(),
            yes,
            no,
            result: false,
            on_result: Handler::new(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Answer chosen by the user; `false` until completed
    pub fn result(&self) -> bool {
        self.result
    }

    pub fn set_on_result(&mut self, handler: impl FnMut(bool) + 'static) {
        self.on_result.set(handler);
    }

    /// Store the answer, fire `on_result` and close. Later calls are ignored.
    pub fn set_and_complete(&mut self, result: bool) {
        if self.dialog.is_completed() {
            return;
        }
        self.result = result;
        self.on_result.fire(result);
        if result {
            self.dialog.accept();
        } else {
            self.dialog.cancel();
        }
    }
}

impl ModalDialog for ConfirmDialog {
    fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    fn dialog_mut(&mut self) -> &mut Dialog {
        &mut self.dialog
    }

    fn handle_input(&mut self, event: KeyEvent) -> EventResult {
        match event.code {
            KeyCode::Enter => self.set_and_complete(true),
            KeyCode::Esc => self.set_and_complete(false),
            _ => return self.forward_key(event),
        }
        EventResult::Consumed
    }

    fn activate_child(&mut self, child: WidgetId) -> bool {
        if self.yes == child {
            self.set_and_complete(true);
        } else if self.no == child {
            self.set_and_complete(false);
        } else {
            return false;
        }
        true
    }

    fn render(&self, renderer: &mut dyn Renderer) {
        self.dialog.window().render(renderer);
        self.dialog.render_message(renderer, &self.message);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
