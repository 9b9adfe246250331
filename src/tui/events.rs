use crossterm::event::{Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent};

/// Application events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Keyboard input event
    Key(KeyEvent),

    /// Mouse input event
    Mouse(MouseEvent),

    /// Terminal resize event
    Resize(u16, u16),

    /// Nothing arrived before the poll timeout
    Tick,
}

impl Event {
    /// Convert crossterm events to application events.
    ///
    /// Key releases and repeats, focus changes and pastes carry nothing the
    /// toolkit reacts to and come back as `None`.
    pub fn from_crossterm(event: CrosstermEvent) -> Option<Self> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
            CrosstermEvent::Mouse(mouse) => Some(Event::Mouse(mouse)),
            CrosstermEvent::Resize(width, height) => Some(Event::Resize(width, height)),
            _ => None,
        }
    }
}
