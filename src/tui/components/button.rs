use super::{EventResult, Widget, WidgetState};
use crate::tui::render::Canvas;
use crate::tui::styles::ColorStyle;
use crate::tui::Ui;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::Color;
use std::any::Any;
use std::fmt;
use std::rc::Rc;
use unicode_width::UnicodeWidthStr;

/// Action run when a button in a main window is activated.
///
/// Handlers get the application context and may open dialogs; the manager
/// invokes them only after it has released every borrow of its windows.
pub type ClickHandler = Rc<dyn Fn(&mut Ui) -> anyhow::Result<()>>;

/// Push button rendered as `[ label ]`
pub struct Button {
    state: WidgetState,
    label: String,
    on_click: Option<ClickHandler>,
    style: ColorStyle,
}

impl Button {
    pub fn new(x: i32, y: i32, width: u16, label: impl Into<String>) -> Self {
        Self {
            state: WidgetState::new().at(x, y).with_size(width, 1),
            label: label.into(),
            on_click: None,
            style: ColorStyle::new(Color::White),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_on_click(&mut self, handler: impl Fn(&mut Ui) -> anyhow::Result<()> + 'static) {
        self.on_click = Some(Rc::new(handler));
    }

    pub fn on_click(&self) -> Option<&ClickHandler> {
        self.on_click.as_ref()
    }

    pub fn set_style(&mut self, style: ColorStyle) {
        self.style = style;
    }

    /// Caption centered in the button width, falling back to the bare brackets
    fn caption(&self) -> String {
        let text = format!("[ {} ]", self.label);
        let width = self.state.width as usize;
        let text_width = text.width();
        if text_width >= width {
            return text;
        }
        let left = (width - text_width) / 2;
        format!("{:left$}{}{:right$}", "", text, "", left = left, right = width - text_width - left)
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("label", &self.label)
            .field("has_handler", &self.on_click.is_some())
            .finish()
    }
}

impl Widget for Button {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }

    fn render(&self, canvas: &mut Canvas<'_>, x: i32, y: i32) {
        let style = if self.state.has_focus {
            self.style.bold().reversed()
        } else {
            self.style
        };
        canvas.draw_text(x, y, &self.caption(), style);
    }

    fn handle_input(&mut self, event: KeyEvent) -> EventResult {
        match event.code {
            KeyCode::Enter | KeyCode::Char(' ') => EventResult::Activated,
            _ => EventResult::Ignored,
        }
    }

    fn handle_click(&mut self) -> EventResult {
        EventResult::Activated
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
    fn test_button_activation_keys() {
        let mut button = Button::new(0, 0, 10, "OK");
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        let other = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);

        assert_eq!(button.handle_input(enter), EventResult::Activated);
        assert_eq!(button.handle_input(space), EventResult::Activated);
        assert_eq!(button.handle_input(other), EventResult::Ignored);
        assert_eq!(button.handle_click(), EventResult::Activated);
        assert!(button.on_click().is_none());
    }

    #[test]
    fn test_caption_centered_in_width() {
        let button = Button::new(0, 0, 10, "OK");
        assert_eq!(button.caption(), "  [ OK ]  ");

        let narrow = Button::new(0, 0, 4, "Cancel");
        assert_eq!(narrow.caption(), "[ Cancel ]");
    }
}
