//! Message box: a line of text and an OK button

use super::dialog::{Dialog, ModalDialog};
use super::types::Handler;
use crate::tui::components::{Button, EventResult};
use crate::tui::render::Renderer;
use crate::tui::window::{Geometry, WidgetId, WidgetRef};
use crossterm::event::{KeyCode, KeyEvent};
use std::any::Any;

const WIDTH: u16 = 40;
const HEIGHT: u16 = 10;

/// Informational dialog with a single OK button
pub struct MessageBox {
    dialog: Dialog,
    message: String,
    ok: WidgetRef<Button>,
    on_ok: Handler<()>,
}

impl MessageBox {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        let mut dialog = Dialog::new(Geometry::fixed(20, 10, WIDTH, HEIGHT), title);
        let ok = dialog.window_mut().add_child(Button::new(
            WIDTH as i32 / 2 - 4,
            HEIGHT as i32 - 3,
            8,
            "OK",
        ));

        Self {
            dialog,
            message: message.into(),
            ok,
            on_ok: Handler::new(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_on_ok(&mut self, handler: impl FnMut(()) + 'static) {
        self.on_ok.set(handler);
    }

    /// Fire `on_ok` and close the dialog
    pub fn accept(&mut self) {
        if self.dialog.is_completed() {
            return;
        }
        self.on_ok.fire(());
        self.dialog.accept();
    }
}

impl ModalDialog for MessageBox {
    fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    fn dialog_mut(&mut self) -> &mut Dialog {
        &mut self.dialog
    }

    fn handle_input(&mut self, event: KeyEvent) -> EventResult {
        match event.code {
            KeyCode::Enter | KeyCode::Esc => {
                self.accept();
                EventResult::Consumed
            }
            _ => self.forward_key(event),
        }
    }

    fn activate_child(&mut self, child: WidgetId) -> bool {
        if self.ok != child {
            return false;
        }
        self.accept();
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::buffer_line;
    use crossterm::event::KeyModifiers;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;
    use std::cell::Cell;
    use std::rc::Rc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_layout_and_focus() {
        let message = MessageBox::new("Info", "Saved");
        let geometry = message.dialog().window().geometry();
        assert_eq!((geometry.x, geometry.y, geometry.width, geometry.height), (20, 10, 40, 10));
        assert_eq!(message.dialog().window().focused(), Some(message.ok.id()));
    }

    #[test]
    fn test_escape_and_enter_accept() {
        for code in [KeyCode::Esc, KeyCode::Enter, KeyCode::Char(' ')] {
            let fired = Rc::new(Cell::new(0));
            let counter = fired.clone();
            let mut message = MessageBox::new("Info", "Saved");
            message.set_on_ok(move |_| counter.set(counter.get() + 1));

            assert_eq!(message.handle_input(key(code)), EventResult::Consumed);
            assert!(message.dialog().is_completed());
            assert_eq!(fired.get(), 1);
        }
    }

    #[test]
    fn test_tab_keeps_focus_on_ok() {
        let mut message = MessageBox::new("Info", "Saved");
        message.handle_input(key(KeyCode::Tab));
        assert_eq!(message.dialog().window().focused(), Some(message.ok.id()));
        assert!(!message.dialog().is_completed());
    }

    #[test]
    fn test_click_on_ok_accepts() {
        let mut message = MessageBox::new("Info", "Saved");
        // OK button sits at (20 + 16, 10 + 7)
        assert_eq!(message.handle_mouse(37, 17), EventResult::Consumed);
        assert!(message.dialog().is_completed());
    }

    #[test]
    fn test_renders_centered_message() {
        let message = MessageBox::new("Info", "Saved");
        let mut buffer = Buffer::empty(Rect::new(0, 0, 80, 24));
        message.render(&mut buffer);

        let row: String = buffer_line(&buffer, 12).chars().skip(20).take(40).collect();
        assert_eq!(row.trim_matches(|c| c == '║' || c == ' '), "Saved");
        assert_eq!(row.chars().position(|c| c == 'S'), Some(17));
        assert!(buffer_line(&buffer, 17).contains("[ OK ]"));
    }
}
