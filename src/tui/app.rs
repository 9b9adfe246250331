//! Application context
//!
//! [`Ui`] is created once at startup and handed to every click handler as
//! `&mut Ui`. It owns the platform, the window manager, the key map and the
//! theme, and it drives the input/render loop. Dialogs opened through it look
//! synchronous to the caller: `show_confirm` returns only once the user has
//! answered, by pumping the loop until that dialog completes.

use super::components::dialogs::{
    ConfirmDialog, Dialog, DialogId, Dispatch, InputDialog, MessageBox, ModalDialog,
    ModalStackError, WidgetManager,
};
use super::components::{Button, CheckBox, Label, ProgressBar, TextBox, Widget};
use super::events::Event;
use super::keys::KeyMap;
use super::platform::Platform;
use super::styles::Theme;
use super::window::{WidgetRef, Window, WindowError, WindowId};
use crate::config::Config;
use anyhow::Result;
use ratatui::buffer::Buffer;
use std::time::Duration;
use tracing::{debug, error, trace, warn};

/// Main application state and controller
pub struct Ui {
    platform: Box<dyn Platform>,
    manager: WidgetManager,
    key_map: KeyMap,
    theme: Theme,
    tick_rate: Duration,
    running: bool,
}

impl Ui {
    pub fn new(platform: Box<dyn Platform>) -> Self {
        Self::with_config(platform, &Config::default())
    }

    pub fn with_config(platform: Box<dyn Platform>, config: &Config) -> Self {
        Self {
            platform,
            manager: WidgetManager::new(),
            key_map: KeyMap::default(),
            theme: config.theme(),
            tick_rate: config.tick_rate(),
            running: true,
        }
    }

    pub fn manager(&self) -> &WidgetManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut WidgetManager {
        &mut self.manager
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    pub fn set_key_map(&mut self, key_map: KeyMap) {
        self.key_map = key_map;
    }

    /// Screen size as (columns, rows)
    pub fn screen_size(&self) -> Result<(u16, u16)> {
        self.platform.screen_size()
    }

    /// Create a main window and make it the active one
    pub fn create_window(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        title: impl Into<String>,
    ) -> Result<WindowId> {
        let mut window = Window::new(x, y, width, height, title)?;
        window.set_box_style(self.theme.window_box);
        window.set_color_style(self.theme.window);
        Ok(self.manager.register_main_window(window))
    }

    /// Close a main window; the previous one becomes active again
    pub fn close_window(&mut self, id: WindowId) -> Result<()> {
        self.manager
            .close_window(id)
            .ok_or(WindowError::UnknownWindow(id))?;
        Ok(())
    }

    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.manager.window(id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.manager.window_mut(id)
    }

    fn add_widget<W: Widget>(&mut self, window: WindowId, widget: W) -> Result<WidgetRef<W>> {
        let window = self
            .manager
            .window_mut(window)
            .ok_or(WindowError::UnknownWindow(window))?;
        Ok(window.add_child(widget))
    }

    pub fn add_label(
        &mut self,
        window: WindowId,
        x: i32,
        y: i32,
        text: impl Into<String>,
    ) -> Result<WidgetRef<Label>> {
        self.add_widget(window, Label::new(x, y, text))
    }

    pub fn add_button(
        &mut self,
        window: WindowId,
        x: i32,
        y: i32,
        width: u16,
        label: impl Into<String>,
        on_click: impl Fn(&mut Ui) -> Result<()> + 'static,
    ) -> Result<WidgetRef<Button>> {
        let mut button = Button::new(x, y, width, label);
        button.set_on_click(on_click);
        self.add_widget(window, button)
    }

    pub fn add_check_box(
        &mut self,
        window: WindowId,
        x: i32,
        y: i32,
        label: impl Into<String>,
        checked: bool,
    ) -> Result<WidgetRef<CheckBox>> {
        self.add_widget(window, CheckBox::new(x, y, label, checked))
    }

    pub fn add_text_box(
        &mut self,
        window: WindowId,
        x: i32,
        y: i32,
        width: u16,
        placeholder: impl Into<String>,
    ) -> Result<WidgetRef<TextBox>> {
        self.add_widget(window, TextBox::new(x, y, width).with_placeholder(placeholder))
    }

    pub fn add_progress_bar(
        &mut self,
        window: WindowId,
        x: i32,
        y: i32,
        width: u16,
        progress: f32,
    ) -> Result<WidgetRef<ProgressBar>> {
        self.add_widget(window, ProgressBar::new(x, y, width, progress))
    }

    pub fn widget<W: Widget>(&self, widget: WidgetRef<W>) -> Option<&W> {
        self.manager.window(widget.window())?.get(widget)
    }

    pub fn widget_mut<W: Widget>(&mut self, widget: WidgetRef<W>) -> Option<&mut W> {
        self.manager.window_mut(widget.window())?.get_mut(widget)
    }

    /// Apply the dialog theme and center on the active main window
    fn place_dialog(&self, dialog: &mut Dialog) {
        dialog.apply_theme(&self.theme);
        if let Some(parent) = self.manager.main_window() {
            dialog.center_on(&parent.geometry());
        }
    }

    /// Show `dialog` modally and hand it back once it has completed
    pub fn run_modal<D: ModalDialog>(&mut self, dialog: D) -> Result<D> {
        let id = self.manager.push_modal(Box::new(dialog))?;
        let finished = self.wait_for_result(id)?;
        match finished.into_any().downcast::<D>() {
            Ok(dialog) => Ok(*dialog),
            Err(_) => {
                error!(dialog = %id, "finished dialog has an unexpected type");
                Err(ModalStackError::UnexpectedKind(id).into())
            }
        }
    }

    /// Pump the event loop until dialog `id` completes, then take it back.
    ///
    /// Handlers run inside the pump may open further dialogs and wait on them;
    /// this loop simply resumes once they are gone.
    pub fn wait_for_result(&mut self, id: DialogId) -> Result<Box<dyn ModalDialog>> {
        if !self.manager.is_active(id) {
            error!(dialog = %id, "wait on a dialog that is not on the modal stack");
            return Err(ModalStackError::NotActive(id).into());
        }

        debug!(dialog = %id, depth = self.manager.modal_depth(), "waiting for dialog");
        match self.pump_until_finished(id) {
            Ok(dialog) => {
                debug!(dialog = %id, "dialog result ready");
                Ok(dialog)
            }
            Err(err) => {
                self.abandon(id);
                Err(err)
            }
        }
    }

    fn pump_until_finished(&mut self, id: DialogId) -> Result<Box<dyn ModalDialog>> {
        self.refresh()?;
        loop {
            if let Some(dialog) = self.manager.take_finished(id) {
                return Ok(dialog);
            }
            self.update_frame()?;
        }
    }

    /// Drop a dialog whose wait failed, so it stops capturing input
    fn abandon(&mut self, id: DialogId) {
        if self.manager.is_active(id) {
            match self.manager.pop_modal(id) {
                Ok(_) => debug!(dialog = %id, "abandoned dialog removed"),
                Err(err) => warn!(dialog = %id, "abandoned dialog left on the stack: {}", err),
            }
        } else if self.manager.take_finished(id).is_some() {
            debug!(dialog = %id, "abandoned finished dialog dropped");
        }
    }

    pub fn show_message(&mut self, title: &str, text: &str) -> Result<()> {
        let mut dialog = MessageBox::new(title, text);
        self.place_dialog(dialog.dialog_mut());
        self.run_modal(dialog)?;
        Ok(())
    }

    pub fn show_confirm(&mut self, title: &str, text: &str) -> Result<bool> {
        let mut dialog = ConfirmDialog::new(title, text);
        self.place_dialog(dialog.dialog_mut());
        Ok(self.run_modal(dialog)?.result())
    }

    /// Ask for a line of text; cancelling yields an empty string
    pub fn show_input(&mut self, title: &str, text: &str, default_value: &str) -> Result<String> {
        Ok(self
            .prompt_input(title, text, default_value)?
            .unwrap_or_default())
    }

    /// Ask for a line of text; `None` when cancelled
    pub fn prompt_input(
        &mut self,
        title: &str,
        text: &str,
        default_value: &str,
    ) -> Result<Option<String>> {
        let mut dialog = InputDialog::new(title, text, default_value);
        self.place_dialog(dialog.dialog_mut());
        let dialog = self.run_modal(dialog)?;
        Ok(dialog.into_outcome().and_then(|outcome| outcome.into_option()))
    }

    /// Run the event loop until [`Ui::exit_application`] is called
    pub fn run_application(&mut self) -> Result<()> {
        debug!("starting event loop");
        self.running = true;
        self.refresh()?;
        while self.running {
            self.update_frame()?;
        }
        debug!("event loop finished");
        Ok(())
    }

    pub fn is_application_running(&self) -> bool {
        self.running
    }

    /// Stop the loop after the current frame
    pub fn exit_application(&mut self) {
        debug!("exit requested");
        self.running = false;
    }

    /// Process one input event and present a frame
    pub fn update_frame(&mut self) -> Result<()> {
        let event = self.platform.next_event(self.tick_rate)?;
        self.handle_event(event)?;
        self.refresh()
    }

    /// Present a frame without reading input
    pub fn refresh(&mut self) -> Result<()> {
        let manager = &self.manager;
        self.platform
            .draw(&mut |buffer: &mut Buffer| manager.render_all(buffer))
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match self.manager.dispatch_input(&event) {
            Dispatch::Invoke(handler) => handler(self),
            Dispatch::Consumed => Ok(()),
            Dispatch::Ignored => self.handle_global_key(&event),
        }
    }

    /// Global bindings, only while no dialog is open
    fn handle_global_key(&mut self, event: &Event) -> Result<()> {
        let Event::Key(key) = event else {
            return Ok(());
        };
        if self.manager.modal_depth() > 0 {
            return Ok(());
        }

        if self.key_map.should_quit(key) {
            self.exit_application();
        } else if self.key_map.should_show_help(key) {
            trace!("showing key help");
            let help = self.key_map.help_text();
            self.show_message("Keys", &help)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::dialogs::DialogState;
    use crate::tui::platform::ScriptedPlatform;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ui_with(events: Vec<Event>) -> Ui {
        let platform = ScriptedPlatform::new(80, 24).with_events(events);
        let mut ui = Ui::new(Box::new(platform));
        ui.create_window(0, 0, 80, 24, "Main").unwrap();
        ui
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_nested_confirms_from_button_handler() {
        let answers = Rc::new(RefCell::new(None));
        let mut ui = ui_with(vec![key(KeyCode::Enter), key(KeyCode::Enter), key(KeyCode::Esc)]);
        let main = ui.manager().main_window().unwrap().id();

        let seen = answers.clone();
        ui.add_button(main, 2, 2, 20, "Nested", move |ui| {
            let first = ui.show_confirm("First", "first dialog")?;
            if first {
                let second = ui.show_confirm("Second", "second dialog")?;
                *seen.borrow_mut() = Some((first, second));
            }
            Ok(())
        })
        .unwrap();

        ui.update_frame().unwrap();

        assert_eq!(*answers.borrow(), Some((true, false)));
        assert_eq!(ui.manager().modal_depth(), 0);
        assert!(ui.is_application_running());
    }

    #[test]
    fn test_input_default_returned_on_ok() {
        let mut ui = ui_with(vec![key(KeyCode::Tab), key(KeyCode::Char(' '))]);
        let text = ui.show_input("Input", "Comment:", "Example").unwrap();
        assert_eq!(text, "Example");
    }

    #[test]
    fn test_input_ok_click() {
        // 50x14 dialog centered on the 80x24 main window lands at (15, 5);
        // OK sits at (15 + 13, 5 + 11)
        let mut ui = ui_with(vec![click(30, 16)]);
        let text = ui.show_input("Input", "Comment:", "Example").unwrap();
        assert_eq!(text, "Example");
    }

    #[test]
    fn test_input_cancel_distinguished() {
        let mut ui = ui_with(vec![key(KeyCode::Esc), key(KeyCode::Enter)]);
        assert_eq!(ui.prompt_input("Input", "Name:", "x").unwrap(), None);
        assert_eq!(ui.prompt_input("Input", "Name:", "").unwrap(), Some(String::new()));
    }

    #[test]
    fn test_message_keeps_application_running() {
        let mut ui = ui_with(vec![key(KeyCode::Enter)]);
        ui.show_message("Info", "Hello").unwrap();
        assert!(ui.is_application_running());
        assert_eq!(ui.manager().modal_depth(), 0);
    }

    #[test]
    fn test_wait_requires_active_dialog() {
        let mut ui = ui_with(vec![]);
        let dialog = MessageBox::new("Info", "Hello");
        let id = dialog.dialog().id();

        let err = ui.wait_for_result(id).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ModalStackError>(),
            Some(&ModalStackError::NotActive(id))
        );
    }

    #[test]
    fn test_failed_wait_releases_input() {
        let mut ui = ui_with(vec![]);
        let main = ui.manager().main_window().unwrap().id();
        let name = ui.add_text_box(main, 2, 2, 20, "").unwrap();

        let err = ui.show_confirm("Confirm", "?").unwrap_err();
        assert_eq!(err.to_string(), "input script exhausted");
        assert_eq!(ui.manager().modal_depth(), 0);
        assert_eq!(ui.manager().finished_count(), 0);

        ui.handle_event(key(KeyCode::Char('a'))).unwrap();
        assert_eq!(ui.widget(name).unwrap().content(), "a");
    }

    #[test]
    fn test_failed_wait_inside_handler_unwinds() {
        let mut ui = ui_with(vec![key(KeyCode::Enter)]);
        let main = ui.manager().main_window().unwrap().id();
        ui.add_button(main, 2, 2, 20, "Nested", |ui| {
            ui.show_confirm("First", "?")?;
            Ok(())
        })
        .unwrap();

        // Enter opens the confirm, whose wait then runs out of input
        assert!(ui.update_frame().is_err());
        assert_eq!(ui.manager().modal_depth(), 0);
    }

    #[test]
    fn test_dialog_button_opens_nested_dialog() {
        let log = Rc::new(RefCell::new(Vec::new()));
        // Tab to "More", press it, answer the inner confirm with No, then dismiss
        let mut ui = ui_with(vec![
            key(KeyCode::Tab),
            key(KeyCode::Char(' ')),
            key(KeyCode::Esc),
            key(KeyCode::Esc),
        ]);

        let mut message = MessageBox::new("Outer", "outer dialog");
        let mut more = Button::new(2, 5, 10, "More");
        let seen = log.clone();
        more.set_on_click(move |ui| {
            let depth = ui.manager().modal_depth();
            let answer = ui.show_confirm("Inner", "inner dialog")?;
            seen.borrow_mut().push(format!("inner {} at depth {}", answer, depth));
            Ok(())
        });
        message.dialog_mut().window_mut().add_child(more);
        let seen = log.clone();
        message.set_on_ok(move |_| seen.borrow_mut().push("outer".to_string()));

        let message = ui.run_modal(message).unwrap();

        assert!(message.dialog().is_completed());
        assert_eq!(*log.borrow(), vec!["inner false at depth 1", "outer"]);
        assert_eq!(ui.manager().modal_depth(), 0);
        assert_eq!(ui.manager().finished_count(), 0);
    }

    #[test]
    fn test_outer_wait_survives_inner_dialog() {
        let mut ui = ui_with(vec![key(KeyCode::Esc), key(KeyCode::Enter)]);
        let outer = ui.manager_mut().push_modal(Box::new(ConfirmDialog::new("Outer", "?"))).unwrap();
        let inner = ui.manager_mut().push_modal(Box::new(ConfirmDialog::new("Inner", "?"))).unwrap();

        let finished = ui.wait_for_result(outer).unwrap();
        let confirm = finished.as_any().downcast_ref::<ConfirmDialog>().unwrap();
        assert!(confirm.result());
        assert_eq!(confirm.dialog().state(), DialogState::Completed);

        let inner = ui.manager_mut().take_finished(inner).unwrap();
        assert!(!inner.as_any().downcast_ref::<ConfirmDialog>().unwrap().result());
    }

    #[test]
    fn test_quit_key_stops_loop() {
        let quit = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        let mut ui = ui_with(vec![key(KeyCode::Tab), quit]);
        ui.run_application().unwrap();
        assert!(!ui.is_application_running());
    }

    #[test]
    fn test_quit_key_ignored_while_modal() {
        let quit = Event::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        let mut ui = ui_with(vec![quit, key(KeyCode::Esc)]);
        assert!(!ui.show_confirm("Confirm", "?").unwrap());
        assert!(ui.is_application_running());
    }

    #[test]
    fn test_help_key_opens_message() {
        let mut ui = ui_with(vec![key(KeyCode::F(1)), key(KeyCode::Esc)]);
        ui.update_frame().unwrap();
        assert_eq!(ui.manager().modal_depth(), 0);
        assert!(ui.is_application_running());
    }

    #[test]
    fn test_widgets_through_handles() {
        let keys = "Ann".chars().map(|c| key(KeyCode::Char(c))).collect();
        let mut ui = ui_with(keys);
        let main = ui.manager().main_window().unwrap().id();
        let name = ui.add_text_box(main, 2, 2, 20, "Your name").unwrap();
        let bar = ui.add_progress_bar(main, 2, 4, 20, 0.0).unwrap();

        for _ in 0..3 {
            ui.update_frame().unwrap();
        }
        ui.widget_mut(bar).unwrap().set_progress(0.5);

        assert_eq!(ui.widget(name).unwrap().content(), "Ann");
        assert_eq!(ui.widget(bar).unwrap().progress(), 0.5);
    }

    #[test]
    fn test_handler_errors_propagate() {
        let mut ui = ui_with(vec![key(KeyCode::Enter)]);
        let main = ui.manager().main_window().unwrap().id();
        ui.add_button(main, 2, 2, 10, "Fail", |_ui| Err(anyhow::anyhow!("handler failed")))
            .unwrap();

        let err = ui.update_frame().unwrap_err();
        assert_eq!(err.to_string(), "handler failed");
    }

    #[test]
    fn test_unknown_window_rejected() {
        let mut ui = ui_with(vec![]);
        let sub = ui.create_window(5, 5, 20, 5, "Sub").unwrap();
        ui.close_window(sub).unwrap();

        assert!(ui.add_label(sub, 1, 1, "gone").is_err());
        let err = ui.close_window(sub).unwrap_err();
        assert_eq!(
            err.downcast_ref::<WindowError>(),
            Some(&WindowError::UnknownWindow(sub))
        );
        assert!(ui.create_window(0, 0, 0, 10, "Empty").is_err());
    }

    #[test]
    fn test_dialogs_center_on_main_window() {
        let mut ui = Ui::new(Box::new(ScriptedPlatform::new(80, 24)));
        ui.create_window(10, 5, 60, 15, "Main").unwrap();

        let mut message = MessageBox::new("Info", "Hello");
        ui.place_dialog(message.dialog_mut());
        let geometry = message.dialog().window().geometry();
        assert_eq!((geometry.x, geometry.y), (20, 7));
        assert_eq!(message.dialog().window().box_style(), ui.theme().dialog_box);
    }
}
