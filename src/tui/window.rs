//! Windows: rectangular containers that own their widgets
//!
//! A window owns its children outright. Callers address a child through a
//! [`WidgetRef`], a copyable index tagged with the owning window's id, so a
//! handle can never resolve against a different window.

use super::components::{Button, ClickHandler, EventResult, Widget};
use super::render::{Canvas, Renderer};
use super::styles::{BoxStyle, ColorStyle};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::Color;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

static WINDOW_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for window instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(u64);

impl WindowId {
    fn next() -> Self {
        Self(WINDOW_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Window-level error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("invalid window geometry {width}x{height}: width and height must be positive")]
    InvalidGeometry { width: i32, height: i32 },

    #[error("{0} is not registered")]
    UnknownWindow(WindowId),
}

/// Position and size in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl Geometry {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Result<Self, WindowError> {
        let invalid = WindowError::InvalidGeometry { width, height };
        if width <= 0 || height <= 0 {
            return Err(invalid);
        }
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(invalid);
        };
        Ok(Self::fixed(x, y, w, h))
    }

    /// Geometry from sizes known to be positive
    pub(crate) const fn fixed(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Area inside the frame border
    pub fn interior(&self) -> Geometry {
        Geometry {
            x: self.x + 1,
            y: self.y + 1,
            width: self.width.saturating_sub(2),
            height: self.height.saturating_sub(2),
        }
    }

    /// Same size, centered on `parent`
    pub fn centered_on(&self, parent: &Geometry) -> Geometry {
        let center_x = parent.x + parent.width as i32 / 2;
        let center_y = parent.y + parent.height as i32 / 2;
        Geometry {
            x: center_x - self.width as i32 / 2,
            y: center_y - self.height as i32 / 2,
            ..*self
        }
    }
}

/// Untyped address of a child inside a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId {
    window: WindowId,
    index: usize,
}

impl WidgetId {
    pub fn window(&self) -> WindowId {
        self.window
    }
}

/// Typed handle to a child widget, valid only against the window that issued it
pub struct WidgetRef<W> {
    id: WidgetId,
    _marker: PhantomData<fn() -> W>,
}

impl<W> WidgetRef<W> {
    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn window(&self) -> WindowId {
        self.id.window
    }
}

impl<W> Clone for WidgetRef<W> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<W> Copy for WidgetRef<W> {}

impl<W> PartialEq<WidgetId> for WidgetRef<W> {
    fn eq(&self, other: &WidgetId) -> bool {
        self.id == *other
    }
}

impl<W> fmt::Debug for WidgetRef<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WidgetRef").field(&self.id).finish()
    }
}

/// Direction for focus traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDirection {
    Next,
    Previous,
}

/// Outcome of offering input to a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowInput {
    Ignored,
    Consumed,
    /// A child was activated; the window's owner decides what that means
    Activated(WidgetId),
}

/// Rectangular container owning an ordered list of widgets
pub struct Window {
    id: WindowId,
    geometry: Geometry,
    title: String,
    box_style: BoxStyle,
    color_style: ColorStyle,
    children: Vec<Box<dyn Widget>>,
    modal: bool,
}

impl Window {
    pub fn new(
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        title: impl Into<String>,
    ) -> Result<Self, WindowError> {
        Ok(Self::with_geometry(Geometry::new(x, y, width, height)?, title))
    }

    pub fn with_geometry(geometry: Geometry, title: impl Into<String>) -> Self {
        Self {
            id: WindowId::next(),
            geometry,
            title: title.into(),
            box_style: BoxStyle::Single,
            color_style: ColorStyle::new(Color::White),
            children: Vec::new(),
            modal: false,
        }
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn box_style(&self) -> BoxStyle {
        self.box_style
    }

    pub fn set_box_style(&mut self, box_style: BoxStyle) {
        self.box_style = box_style;
    }

    pub fn color_style(&self) -> ColorStyle {
        self.color_style
    }

    pub fn set_color_style(&mut self, color_style: ColorStyle) {
        self.color_style = color_style;
    }

    pub fn is_modal(&self) -> bool {
        self.modal
    }

    pub(crate) fn set_modal(&mut self, modal: bool) {
        self.modal = modal;
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.geometry.x = x;
        self.geometry.y = y;
    }

    pub fn center_on(&mut self, parent: &Geometry) {
        self.geometry = self.geometry.centered_on(parent);
    }

    /// Append a child. The first focusable child added receives focus.
    pub fn add_child<W: Widget>(&mut self, mut widget: W) -> WidgetRef<W> {
        let takes_focus = widget.can_focus() && self.focused_index().is_none();
        widget.set_focus(takes_focus);

        let id = WidgetId {
            window: self.id,
            index: self.children.len(),
        };
        self.children.push(Box::new(widget));
        WidgetRef {
            id,
            _marker: PhantomData,
        }
    }

    pub fn get<W: Widget>(&self, widget: WidgetRef<W>) -> Option<&W> {
        self.child(widget.id)?.as_any().downcast_ref::<W>()
    }

    pub fn get_mut<W: Widget>(&mut self, widget: WidgetRef<W>) -> Option<&mut W> {
        self.child_mut(widget.id)?.as_any_mut().downcast_mut::<W>()
    }

    pub fn child(&self, id: WidgetId) -> Option<&dyn Widget> {
        if id.window != self.id {
            return None;
        }
        self.children.get(id.index).map(|child| child.as_ref())
    }

    pub fn child_mut(&mut self, id: WidgetId) -> Option<&mut dyn Widget> {
        if id.window != self.id {
            return None;
        }
        match self.children.get_mut(id.index) {
            Some(child) => Some(child.as_mut()),
            None => None,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    fn widget_id(&self, index: usize) -> WidgetId {
        WidgetId {
            window: self.id,
            index,
        }
    }

    fn focused_index(&self) -> Option<usize> {
        self.children.iter().position(|child| child.has_focus())
    }

    /// Currently focused child, if any
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused_index().map(|index| self.widget_id(index))
    }

    /// Move focus to `id`. Returns false if it does not name a focusable child here.
    pub fn set_focus(&mut self, id: WidgetId) -> bool {
        let focusable = self
            .child(id)
            .map(|child| child.can_focus() && child.is_visible())
            .unwrap_or(false);
        if !focusable {
            return false;
        }
        self.focus_index(id.index);
        true
    }

    fn focus_index(&mut self, index: usize) {
        for (i, child) in self.children.iter_mut().enumerate() {
            child.set_focus(i == index);
        }
    }

    /// Advance focus along the focus chain, wrapping around
    pub fn cycle_focus(&mut self, direction: FocusDirection) {
        let chain: Vec<usize> = self
            .children
            .iter()
            .enumerate()
            .filter(|(_, child)| child.can_focus() && child.is_visible())
            .map(|(index, _)| index)
            .collect();
        if chain.len() <= 1 {
            return;
        }

        let current = self
            .focused_index()
            .and_then(|focused| chain.iter().position(|&index| index == focused));
        let next = match (current, direction) {
            (Some(pos), FocusDirection::Next) => (pos + 1) % chain.len(),
            (Some(pos), FocusDirection::Previous) => (pos + chain.len() - 1) % chain.len(),
            (None, FocusDirection::Next) => 0,
            (None, FocusDirection::Previous) => chain.len() - 1,
        };
        trace!(window = %self.id, focus = chain[next], "focus moved");
        self.focus_index(chain[next]);
    }

    /// Offer a key to the focused child first, then apply window bindings
    pub fn handle_input(&mut self, event: KeyEvent) -> WindowInput {
        if let Some(index) = self.focused_index() {
            match self.children[index].handle_input(event) {
                EventResult::Consumed => return WindowInput::Consumed,
                EventResult::Activated => return WindowInput::Activated(self.widget_id(index)),
                EventResult::Ignored => {}
            }
        }

        match event.code {
            KeyCode::Tab => {
                self.cycle_focus(FocusDirection::Next);
                WindowInput::Consumed
            }
            KeyCode::BackTab => {
                self.cycle_focus(FocusDirection::Previous);
                WindowInput::Consumed
            }
            _ => WindowInput::Ignored,
        }
    }

    /// Click at a screen position: focus and click the topmost child under it
    pub fn handle_mouse(&mut self, column: u16, row: u16) -> WindowInput {
        let x = column as i32 - self.geometry.x;
        let y = row as i32 - self.geometry.y;
        let Some(index) = self
            .children
            .iter()
            .rposition(|child| child.is_visible() && child.state().contains(x, y))
        else {
            return WindowInput::Ignored;
        };

        if self.children[index].can_focus() {
            self.focus_index(index);
        }
        match self.children[index].handle_click() {
            EventResult::Activated => WindowInput::Activated(self.widget_id(index)),
            EventResult::Consumed => WindowInput::Consumed,
            EventResult::Ignored => WindowInput::Ignored,
        }
    }

    /// Click handler of the button at `id`, if it is a button with one bound
    pub fn click_handler(&self, id: WidgetId) -> Option<ClickHandler> {
        self.child(id)?
            .as_any()
            .downcast_ref::<Button>()?
            .on_click()
            .cloned()
    }

    /// Draw the frame, then every visible child clipped to the interior
    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.draw_box(self.geometry, self.box_style, self.color_style, &self.title);

        let mut canvas = self.canvas(renderer);
        for child in self.children.iter().filter(|child| child.is_visible()) {
            let state = child.state();
            child.render(&mut canvas, self.geometry.x + state.x, self.geometry.y + state.y);
        }
    }

    /// Canvas clipped to this window's interior
    pub fn canvas<'a>(&self, renderer: &'a mut dyn Renderer) -> Canvas<'a> {
        Canvas::new(renderer, self.geometry.interior())
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("id", &self.id)
            .field("geometry", &self.geometry)
            .field("title", &self.title)
            .field("children", &self.children.len())
            .field("modal", &self.modal)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::{CheckBox, Label, TextBox};
    use crate::tui::render::buffer_line;
    use crossterm::event::KeyModifiers;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        assert_eq!(
            Window::new(0, 0, 0, 5, "zero").unwrap_err(),
            WindowError::InvalidGeometry { width: 0, height: 5 }
        );
        assert!(Window::new(0, 0, 10, -1, "negative").is_err());
        assert!(Window::new(0, 0, 70_000, 5, "too wide").is_err());
        assert!(Window::new(-3, -3, 1, 1, "tiny").is_ok());
    }

    #[test]
    fn test_first_focusable_child_gets_focus() {
        let mut window = Window::new(0, 0, 40, 10, "Main").unwrap();
        window.add_child(Label::new(1, 1, "Name"));
        let field = window.add_child(TextBox::new(1, 2, 10));
        let button = window.add_child(Button::new(1, 3, 10, "Go"));

        assert_eq!(window.focused(), Some(field.id()));
        assert!(!window.get(button).unwrap().has_focus());
    }

    #[test]
    fn test_tab_cycles_and_wraps() {
        let mut window = Window::new(0, 0, 40, 10, "Main").unwrap();
        let a = window.add_child(Button::new(1, 1, 8, "A"));
        window.add_child(Label::new(1, 2, "not focusable"));
        let b = window.add_child(Button::new(1, 3, 8, "B"));
        let c = window.add_child(CheckBox::new(1, 4, "C", false));

        assert_eq!(window.handle_input(key(KeyCode::Tab)), WindowInput::Consumed);
        assert_eq!(window.focused(), Some(b.id()));
        window.handle_input(key(KeyCode::Tab));
        assert_eq!(window.focused(), Some(c.id()));
        window.handle_input(key(KeyCode::Tab));
        assert_eq!(window.focused(), Some(a.id()));
        window.handle_input(key(KeyCode::BackTab));
        assert_eq!(window.focused(), Some(c.id()));
    }

    #[test]
    fn test_cycle_focus_noop_with_single_focusable() {
        let mut window = Window::new(0, 0, 40, 10, "Main").unwrap();
        let only = window.add_child(Button::new(1, 1, 8, "Only"));
        window.cycle_focus(FocusDirection::Next);
        assert_eq!(window.focused(), Some(only.id()));

        let mut empty = Window::new(0, 0, 40, 10, "Empty").unwrap();
        empty.cycle_focus(FocusDirection::Previous);
        assert_eq!(empty.focused(), None);
    }

    #[test]
    fn test_at_most_one_focused_child() {
        let mut window = Window::new(0, 0, 40, 10, "Main").unwrap();
        let a = window.add_child(Button::new(1, 1, 8, "A"));
        let b = window.add_child(Button::new(1, 2, 8, "B"));
        let label = window.add_child(Label::new(1, 3, "label"));

        assert!(window.set_focus(b.id()));
        assert!(!window.set_focus(label.id()));
        let focused = [a.id(), b.id(), label.id()]
            .iter()
            .filter(|id| window.child(**id).unwrap().has_focus())
            .count();
        assert_eq!(focused, 1);
        assert_eq!(window.focused(), Some(b.id()));
    }

    #[test]
    fn test_handles_do_not_cross_windows() {
        let mut first = Window::new(0, 0, 40, 10, "First").unwrap();
        let mut second = Window::new(0, 0, 40, 10, "Second").unwrap();
        let label = first.add_child(Label::new(1, 1, "mine"));
        second.add_child(Label::new(1, 1, "other"));

        assert_eq!(first.get(label).unwrap().text(), "mine");
        assert!(second.get(label).is_none());
        assert!(second.child(label.id()).is_none());
    }

    #[test]
    fn test_focused_child_sees_keys_first() {
        let mut window = Window::new(0, 0, 40, 10, "Main").unwrap();
        let field = window.add_child(TextBox::new(1, 1, 10));
        let button = window.add_child(Button::new(1, 2, 8, "Go"));

        assert_eq!(window.handle_input(key(KeyCode::Char('a'))), WindowInput::Consumed);
        assert_eq!(window.get(field).unwrap().content(), "a");
        assert_eq!(window.handle_input(key(KeyCode::Esc)), WindowInput::Ignored);

        window.handle_input(key(KeyCode::Tab));
        assert_eq!(
            window.handle_input(key(KeyCode::Enter)),
            WindowInput::Activated(button.id())
        );
    }

    #[test]
    fn test_mouse_click_focuses_and_activates() {
        let mut window = Window::new(10, 5, 40, 10, "Main").unwrap();
        window.add_child(TextBox::new(2, 2, 10));
        let button = window.add_child(Button::new(2, 4, 8, "Go"));

        assert_eq!(window.handle_mouse(14, 9), WindowInput::Activated(button.id()));
        assert_eq!(window.focused(), Some(button.id()));
        assert_eq!(window.handle_mouse(0, 0), WindowInput::Ignored);
    }

    #[test]
    fn test_click_handler_only_for_bound_buttons() {
        let mut window = Window::new(0, 0, 40, 10, "Main").unwrap();
        let bare = window.add_child(Button::new(1, 1, 8, "Bare"));
        let bound = window.add_child(Button::new(1, 2, 8, "Bound"));
        let label = window.add_child(Label::new(1, 3, "label"));
        window.get_mut(bound).unwrap().set_on_click(|_ui| Ok(()));

        assert!(window.click_handler(bare.id()).is_none());
        assert!(window.click_handler(bound.id()).is_some());
        assert!(window.click_handler(label.id()).is_none());
    }

    #[test]
    fn test_render_skips_overflowing_children() {
        let mut window = Window::new(0, 0, 12, 4, "T").unwrap();
        window.add_child(Label::new(1, 1, "fits"));
        window.add_child(Label::new(1, 2, "this label is too long"));

        let mut buffer = Buffer::empty(Rect::new(0, 0, 20, 5));
        window.render(&mut buffer);

        assert!(buffer_line(&buffer, 0).contains(" T "));
        let row = |y| buffer_line(&buffer, y).chars().take(12).collect::<String>();
        assert_eq!(row(1), "│fits      │");
        assert_eq!(row(2), "│          │");
    }

    #[test]
    fn test_center_on_parent() {
        let parent = Geometry::new(15, 5, 50, 15).unwrap();
        let mut window = Window::new(0, 0, 40, 10, "Child").unwrap();
        window.center_on(&parent);
        assert_eq!(window.geometry().x, 20);
        assert_eq!(window.geometry().y, 7);
    }
}
