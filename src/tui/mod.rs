//! Terminal user interface toolkit built on ratatui and crossterm

pub mod app;
pub mod components;
pub mod events;
pub mod keys;
pub mod platform;
pub mod render;
pub mod styles;
pub mod window;

pub use app::Ui;
pub use components::dialogs::WidgetManager;
pub use events::Event;
pub use keys::KeyMap;
pub use platform::{Platform, ScriptedPlatform, TerminalPlatform};
