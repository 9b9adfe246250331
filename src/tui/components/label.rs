use super::{Widget, WidgetState};
use crate::tui::render::Canvas;
use crate::tui::styles::ColorStyle;
use ratatui::style::Color;
use std::any::Any;
use unicode_width::UnicodeWidthStr;

/// Static single-line text
pub struct Label {
    state: WidgetState,
    text: String,
    style: ColorStyle,
}

impl Label {
    pub fn new(x: i32, y: i32, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            state: WidgetState::new().at(x, y).with_size(text.width() as u16, 1),
            text,
            style: ColorStyle::new(Color::White),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.state.width = self.text.width() as u16;
    }

    pub fn set_style(&mut self, style: ColorStyle) {
        self.style = style;
    }
}

impl Widget for Label {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }

    fn render(&self, canvas: &mut Canvas<'_>, x: i32, y: i32) {
        canvas.draw_text(x, y, &self.text, self.style);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
