//! Dialog base and the modal capability trait
//!
//! A [`Dialog`] is a modal window plus the lifecycle state and completion
//! hooks every concrete dialog shares. Concrete dialogs implement
//! [`ModalDialog`], which is what the modal stack stores and routes input to.

use super::types::{DialogId, DialogState, Handler};
use crate::tui::components::EventResult;
use crate::tui::render::{centered_text_column, Renderer};
use crate::tui::styles::{BoxStyle, ColorStyle, Theme};
use crate::tui::window::{Geometry, WidgetId, Window, WindowInput};
use crossterm::event::KeyEvent;
use ratatui::style::Color;
use std::any::Any;
use std::fmt;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

/// Modal window with a lifecycle and completion hooks
#[derive(Debug)]
pub struct Dialog {
    id: DialogId,
    window: Window,
    state: DialogState,
    message_style: ColorStyle,
    on_accept: Handler<()>,
    on_cancel: Handler<()>,
    on_complete: Handler<()>,
}

impl Dialog {
    pub fn new(geometry: Geometry, title: impl Into<String>) -> Self {
        let mut window = Window::with_geometry(geometry, title);
        window.set_modal(true);
        window.set_box_style(BoxStyle::Double);
        window.set_color_style(ColorStyle::new(Color::White).bold());

        Self {
            id: DialogId::next(),
            window,
            state: DialogState::Created,
            message_style: ColorStyle::new(Color::White),
            on_accept: Handler::new(),
            on_cancel: Handler::new(),
            on_complete: Handler::new(),
        }
    }

    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == DialogState::Completed
    }

    pub(crate) fn set_state(&mut self, state: DialogState) {
        self.state = state;
    }

    pub fn message_style(&self) -> ColorStyle {
        self.message_style
    }

    pub fn set_message_style(&mut self, style: ColorStyle) {
        self.message_style = style;
    }

    /// Use the theme's dialog frame and message styles
    pub fn apply_theme(&mut self, theme: &Theme) {
        self.window.set_box_style(theme.dialog_box);
        self.window.set_color_style(theme.dialog);
        self.message_style = theme.message;
    }

    pub fn center_on(&mut self, parent: &Geometry) {
        self.window.center_on(parent);
    }

    pub fn set_on_accept(&mut self, handler: impl FnMut(()) + 'static) {
        self.on_accept.set(handler);
    }

    pub fn set_on_cancel(&mut self, handler: impl FnMut(()) + 'static) {
        self.on_cancel.set(handler);
    }

    pub fn set_on_complete(&mut self, handler: impl FnMut(()) + 'static) {
        self.on_complete.set(handler);
    }

    /// Fire `on_accept`, then complete
    pub fn accept(&mut self) {
        if self.is_completed() {
            return;
        }
        self.on_accept.fire(());
        self.complete_with_result();
    }

    /// Fire `on_cancel`, then complete
    pub fn cancel(&mut self) {
        if self.is_completed() {
            return;
        }
        self.on_cancel.fire(());
        self.complete_with_result();
    }

    /// Mark the dialog completed. Hooks run before the state changes.
    ///
    /// The manager removes a completed dialog from the modal stack as soon as
    /// the input that completed it has been handled.
    pub fn complete_with_result(&mut self) {
        if self.is_completed() {
            return;
        }
        self.on_complete.fire(());
        self.state = DialogState::Completed;
        debug!(dialog = %self.id, title = self.window.title(), "dialog completed");
    }

    /// Draw `message` centered on the third row, or not at all if it would touch the frame
    pub fn render_message(&self, renderer: &mut dyn Renderer, message: &str) {
        let geometry = self.window.geometry();
        if let Some(column) = centered_text_column(geometry.x, geometry.width, message.width()) {
            renderer.draw_text(column, geometry.y + 2, message, self.message_style);
        }
    }
}

/// Capability of content that can sit on the modal stack
pub trait ModalDialog: Any {
    fn dialog(&self) -> &Dialog;

    fn dialog_mut(&mut self) -> &mut Dialog;

    /// Handle a key while this dialog is the top of the modal stack
    fn handle_input(&mut self, event: KeyEvent) -> EventResult {
        self.forward_key(event)
    }

    /// Offer a key to the dialog's window and route the outcome
    fn forward_key(&mut self, event: KeyEvent) -> EventResult {
        let input = self.dialog_mut().window_mut().handle_input(event);
        self.route(input)
    }

    /// Handle a left click at a screen position
    fn handle_mouse(&mut self, column: u16, row: u16) -> EventResult {
        let input = self.dialog_mut().window_mut().handle_mouse(column, row);
        self.route(input)
    }

    /// `Activated` means a child button was pressed that the dialog does not
    /// handle itself; the manager then runs the button's click handler.
    fn route(&mut self, input: WindowInput) -> EventResult {
        match input {
            WindowInput::Activated(child) if self.activate_child(child) => EventResult::Consumed,
            WindowInput::Activated(_) => EventResult::Activated,
            WindowInput::Consumed => EventResult::Consumed,
            WindowInput::Ignored => EventResult::Ignored,
        }
    }

    /// A child button was pressed; false when the dialog has no use for it
    fn activate_child(&mut self, _child: WidgetId) -> bool {
        false
    }

    fn render(&self, renderer: &mut dyn Renderer) {
        self.dialog().window().render(renderer);
    }

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl fmt::Debug for dyn ModalDialog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dialog = self.dialog();
        f.debug_struct("ModalDialog")
            .field("id", &dialog.id())
            .field("title", &dialog.window().title())
            .field("state", &dialog.state())
            .finish()
    }
}
