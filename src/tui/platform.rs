//! Terminal backends
//!
//! [`Platform`] is the seam between the toolkit and the outside world: it
//! yields input events, reports the screen size and presents frames.
//! [`TerminalPlatform`] drives a real terminal through crossterm and ratatui;
//! [`ScriptedPlatform`] replays a fixed list of events into an in-memory
//! buffer, for tests and headless runs.

use super::events::Event;
use anyhow::{anyhow, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, KeyCode, KeyEvent, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::cell::{Ref, RefCell};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, warn};

pub type Backend = CrosstermBackend<io::Stdout>;

/// Input, screen size and frame presentation
pub trait Platform {
    /// Wait up to `timeout` for input; `Event::Tick` when nothing arrived
    fn next_event(&mut self, timeout: Duration) -> Result<Event>;

    /// Screen size as (columns, rows)
    fn screen_size(&self) -> Result<(u16, u16)>;

    /// Render a frame into a cleared buffer and present it
    fn draw(&mut self, render: &mut dyn FnMut(&mut Buffer)) -> Result<()>;
}

/// Initialize the terminal for TUI mode
pub fn init_terminal(mouse: bool) -> Result<Terminal<Backend>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
pub fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Real terminal in raw mode on the alternate screen
pub struct TerminalPlatform {
    terminal: Terminal<Backend>,
}

impl TerminalPlatform {
    pub fn new(mouse: bool) -> Result<Self> {
        let mut terminal = init_terminal(mouse)?;
        terminal.hide_cursor()?;
        debug!(mouse, "terminal initialized");
        Ok(Self { terminal })
    }
}

impl Platform for TerminalPlatform {
    fn next_event(&mut self, timeout: Duration) -> Result<Event> {
        if !event::poll(timeout)? {
            return Ok(Event::Tick);
        }
        Ok(Event::from_crossterm(event::read()?).unwrap_or(Event::Tick))
    }

    fn screen_size(&self) -> Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }

    fn draw(&mut self, render: &mut dyn FnMut(&mut Buffer)) -> Result<()> {
        self.terminal.draw(|frame| render(frame.buffer_mut()))?;
        Ok(())
    }
}

impl Drop for TerminalPlatform {
    fn drop(&mut self) {
        if let Err(err) = restore_terminal(&mut self.terminal) {
            warn!("failed to restore terminal: {}", err);
        }
    }
}

/// Headless platform replaying queued events
#[derive(Debug)]
pub struct ScriptedPlatform {
    events: VecDeque<Event>,
    screen: Rc<RefCell<Buffer>>,
    frames: usize,
}

impl ScriptedPlatform {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            events: VecDeque::new(),
            screen: Rc::new(RefCell::new(Buffer::empty(Rect::new(0, 0, columns, rows)))),
            frames: 0,
        }
    }

    pub fn with_events(mut self, events: impl IntoIterator<Item = Event>) -> Self {
        self.events.extend(events);
        self
    }

    /// Queue plain key presses
    pub fn with_keys(self, keys: impl IntoIterator<Item = KeyCode>) -> Self {
        self.with_events(
            keys.into_iter()
                .map(|code| Event::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        )
    }

    pub fn push(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Queue a left click at a screen position
    pub fn push_click(&mut self, column: u16, row: u16) {
        self.push(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }

    /// Last presented frame
    pub fn buffer(&self) -> Ref<'_, Buffer> {
        self.screen.borrow()
    }

    /// Shared handle to the presented frame, still readable once the platform
    /// has been handed to a `Ui`
    pub fn screen(&self) -> Rc<RefCell<Buffer>> {
        Rc::clone(&self.screen)
    }

    pub fn frames_drawn(&self) -> usize {
        self.frames
    }
}

impl Platform for ScriptedPlatform {
    fn next_event(&mut self, _timeout: Duration) -> Result<Event> {
        self.events
            .pop_front()
            .ok_or_else(|| anyhow!("input script exhausted"))
    }

    fn screen_size(&self) -> Result<(u16, u16)> {
        let area = self.screen.borrow().area;
        Ok((area.width, area.height))
    }

    fn draw(&mut self, render: &mut dyn FnMut(&mut Buffer)) -> Result<()> {
        let mut screen = self.screen.borrow_mut();
        screen.reset();
        render(&mut *screen);
        self.frames += 1;
        Ok(())
    }
}
