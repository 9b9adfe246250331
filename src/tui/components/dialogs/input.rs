//! One-line text prompt with OK and Cancel
//!
//! Enter submits the field content and Escape cancels. The outcome keeps the
//! two apart, so an empty submission is not mistaken for a cancel.

use super::dialog::{Dialog, ModalDialog};
use super::types::Handler;
use crate::tui::components::{Button, EventResult, TextBox};
use crate::tui::render::Renderer;
use crate::tui::window::{Geometry, WidgetId, WidgetRef};
use crossterm::event::{KeyCode, KeyEvent};
use std::any::Any;

const WIDTH: u16 = 50;
const HEIGHT: u16 = 14;

/// How an input dialog was closed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    Submitted(String),
    Cancelled,
}

impl InputOutcome {
    /// Submitted text, or an empty string when cancelled
    pub fn text(&self) -> &str {
        match self {
            InputOutcome::Submitted(text) => text,
            InputOutcome::Cancelled => "",
        }
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            InputOutcome::Submitted(text) => Some(text),
            InputOutcome::Cancelled => None,
        }
    }
}

/// Single-line text prompt with OK/Cancel
pub struct InputDialog {
    dialog: Dialog,
    message: String,
    field: WidgetRef<TextBox>,
    ok_button: WidgetRef<Button>,
    cancel_button: WidgetRef<Button>,
    outcome: Option<InputOutcome>,
    on_input: Handler<String>,
}

impl InputDialog {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        let mut dialog = Dialog::new(Geometry::fixed(15, 8, WIDTH, HEIGHT), title);
        let row = HEIGHT as i32 - 3;
        let window = dialog.window_mut();

        let mut text_box = TextBox::new(4, 4, WIDTH - 8);
        text_box.set_content(default_value);
        let field = window.add_child(text_box);
        let ok_button = window.add_child(Button::new(WIDTH as i32 / 2 - 12, row, 10, "OK"));
        let cancel_button = window.add_child(Button::new(WIDTH as i32 / 2 + 2, row, 10, "Cancel"));

        Self {
            dialog,
            message: message.into(),
            field,
            ok_button,
            cancel_button,
            outcome: None,
            on_input: Handler::new(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Current text in the field
    pub fn content(&self) -> &str {
        self.dialog
            .window()
            .get(self.field)
            .map(TextBox::content)
            .unwrap_or_default()
    }

    /// Text result; empty when cancelled or not yet completed
    pub fn result(&self) -> &str {
        self.outcome.as_ref().map(InputOutcome::text).unwrap_or_default()
    }

    /// Outcome once completed
    pub fn outcome(&self) -> Option<&InputOutcome> {
        self.outcome.as_ref()
    }

    pub fn into_outcome(self) -> Option<InputOutcome> {
        self.outcome
    }

    pub fn set_on_input(&mut self, handler: impl FnMut(String) + 'static) {
        self.on_input.set(handler);
    }

    /// Close with the field's current content
    pub fn submit(&mut self) {
        let text = self.content().to_string();
        self.finish(InputOutcome::Submitted(text));
    }

    /// Close with no answer
    pub fn cancel(&mut self) {
        self.finish(InputOutcome::Cancelled);
    }

    fn finish(&mut self, outcome: InputOutcome) {
        if self.dialog.is_completed() {
            return;
        }
        let cancelled = outcome == InputOutcome::Cancelled;
        self.on_input.fire(outcome.text().to_string());
        self.outcome = Some(outcome);
        if cancelled {
            self.dialog.cancel();
        } else {
            self.dialog.accept();
        }
    }
}

impl ModalDialog for InputDialog {
    fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    fn dialog_mut(&mut self) -> &mut Dialog {
        &mut self.dialog
    }

    fn handle_input(&mut self, event: KeyEvent) -> EventResult {
        match event.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => self.cancel(),
            _ => return self.forward_key(event),
        }
        EventResult::Consumed
    }

    fn activate_child(&mut self, child: WidgetId) -> bool {
        if self.ok_button == child {
            self.submit();
        } else if self.cancel_button == child {
            self.cancel();
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
