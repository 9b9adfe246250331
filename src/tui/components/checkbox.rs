use super::{EventResult, Widget, WidgetState};
use crate::tui::render::Canvas;
use crate::tui::styles::ColorStyle;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::Color;
use std::any::Any;
use unicode_width::UnicodeWidthStr;

pub struct CheckBox {
    state: WidgetState,
    label: String,
    checked: bool,
    style: ColorStyle,
}

impl CheckBox {
    pub fn new(x: i32, y: i32, label: impl Into<String>, checked: bool) -> Self {
        let label = label.into();
        Self {
            state: WidgetState::new()
                .at(x, y)
                .with_size(label.width() as u16 + 4, 1),
            label,
            checked,
            style: ColorStyle::new(Color::White),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    pub fn toggle(&mut self) {
        self.checked = !self.checked;
    }
}

impl Widget for CheckBox {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }

    fn render(&self, canvas: &mut Canvas<'_>, x: i32, y: i32) {
        let mark = if self.checked { 'x' } else { ' ' };
        let style = if self.state.has_focus {
            self.style.bold()
        } else {
            self.style
        };
        canvas.draw_text(x, y, &format!("[{}] {}", mark, self.label), style);
    }

    fn handle_input(&mut self, event: KeyEvent) -> EventResult {
        match event.code {
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.toggle();
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn handle_click(&mut self) -> EventResult {
        self.toggle();
        EventResult::Consumed
    }

    fn can_focus(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_checkbox_toggles() {
        let mut checkbox = CheckBox::new(0, 0, "Details", false);
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);

        assert_eq!(checkbox.handle_input(space), EventResult::Consumed);
        assert!(checkbox.is_checked());
        assert_eq!(checkbox.handle_click(), EventResult::Consumed);
        assert!(!checkbox.is_checked());
        assert_eq!(checkbox.state().width, 11);
    }
}
