use super::{EventResult, Widget, WidgetState};
use crate::tui::render::Canvas;
use crate::tui::styles::ColorStyle;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::Color;
use std::any::Any;
use unicode_width::UnicodeWidthChar;

/// Single-line editable text field
pub struct TextBox {
    state: WidgetState,
    content: String,
    placeholder: String,
    /// Cursor position in characters
    cursor: usize,
    style: ColorStyle,
}

impl TextBox {
    pub fn new(x: i32, y: i32, width: u16) -> Self {
        Self {
            state: WidgetState::new().at(x, y).with_size(width.max(1), 1),
            content: String::new(),
            placeholder: String::new(),
            cursor: 0,
            style: ColorStyle::new(Color::White).on(Color::DarkGray),
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Replace the content and move the cursor to its end
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = self.content.chars().count();
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, cursor: usize) -> usize {
        self.content
            .char_indices()
            .nth(cursor)
            .map(|(index, _)| index)
            .unwrap_or(self.content.len())
    }

    fn insert_char(&mut self, c: char) {
        let index = self.byte_index(self.cursor);
        self.content.insert(index, c);
        self.cursor += 1;
    }

    fn delete_previous_char(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let index = self.byte_index(self.cursor);
        self.content.remove(index);
    }

    fn delete_char(&mut self) {
        if self.cursor < self.content.chars().count() {
            let index = self.byte_index(self.cursor);
            self.content.remove(index);
        }
    }

    /// Text visible in the field, scrolled so the cursor cell stays inside.
    /// Always exactly `width` cells wide.
    fn visible_text(&self) -> String {
        let width = self.state.width as usize;
        let widths: Vec<usize> = self.content.chars().map(char_width).collect();
        let cursor = self.cursor.min(widths.len());

        let mut offset = 0;
        let mut before_cursor: usize = widths[..cursor].iter().sum();
        while offset < cursor && before_cursor + 1 > width {
            before_cursor -= widths[offset];
            offset += 1;
        }
        fit_to_width(self.content.chars().skip(offset), width)
    }
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Take characters while they fit in `width` cells, then pad with spaces
fn fit_to_width(chars: impl Iterator<Item = char>, width: usize) -> String {
    let mut text = String::new();
    let mut used = 0;
    for c in chars {
        let cells = char_width(c);
        if used + cells > width {
            break;
        }
        text.push(c);
        used += cells;
    }
    text.extend(std::iter::repeat(' ').take(width - used));
    text
}

impl Widget for TextBox {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }

    fn render(&self, canvas: &mut Canvas<'_>, x: i32, y: i32) {
        if self.content.is_empty() && !self.state.has_focus && !self.placeholder.is_empty() {
            let text = fit_to_width(self.placeholder.chars(), self.state.width as usize);
            canvas.draw_text(x, y, &text, ColorStyle::new(Color::Gray).on(self.style.bg));
            return;
        }

        let style = if self.state.has_focus {
            self.style.bold()
        } else {
            self.style
        };
        canvas.draw_text(x, y, &self.visible_text(), style);
    }

    fn handle_input(&mut self, event: KeyEvent) -> EventResult {
        if event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return EventResult::Ignored;
        }

        match event.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.delete_previous_char(),
            KeyCode::Delete => self.delete_char(),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.content.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.content.chars().count(),
            _ => return EventResult::Ignored,
        }
        EventResult::Consumed
    }

    fn handle_click(&mut self) -> EventResult {
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
