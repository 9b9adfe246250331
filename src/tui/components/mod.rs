pub mod button;
pub mod checkbox;
pub mod dialogs;
pub mod label;
pub mod progress;
pub mod text_box;

pub use button::{Button, ClickHandler};
pub use checkbox::CheckBox;
pub use label::Label;
pub use progress::ProgressBar;
pub use text_box::TextBox;

use crate::tui::render::Canvas;
use crossterm::event::KeyEvent;
use std::any::Any;

/// Outcome of offering an input event to a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// The widget did not use the event
    Ignored,
    /// The widget used the event
    Consumed,
    /// The widget was activated (a button press); the owner decides what happens
    Activated,
}

/// Base trait for all placed UI elements
pub trait Widget: Any {
    /// Shared placement and focus state
    fn state(&self) -> &WidgetState;

    /// Mutable shared state
    fn state_mut(&mut self) -> &mut WidgetState;

    /// Render the widget with its top-left cell at `(x, y)` in screen coordinates
    fn render(&self, canvas: &mut Canvas<'_>, x: i32, y: i32);

    /// Handle keyboard input while focused
    fn handle_input(&mut self, event: KeyEvent) -> EventResult {
        let _ = event;
        EventResult::Ignored
    }

    /// Handle a pointer click on the widget
    fn handle_click(&mut self) -> EventResult {
        EventResult::Ignored
    }

    /// Whether the widget takes part in the focus chain
    fn can_focus(&self) -> bool {
        false
    }

    fn has_focus(&self) -> bool {
        self.state().has_focus
    }

    fn set_focus(&mut self, focus: bool) {
        self.state_mut().has_focus = focus;
    }

    fn is_visible(&self) -> bool {
        self.state().is_visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.state_mut().is_visible = visible;
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Base widget state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetState {
    /// Offset from the owning window's top-left corner
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
    pub has_focus: bool,
    pub is_visible: bool,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 0,
            height: 1,
            has_focus: false,
            is_visible: true,
        }
    }
}

impl WidgetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Whether a window-relative point lies on the widget
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && x < self.x + self.width as i32
            && y >= self.y
            && y < self.y + self.height as i32
    }
}
