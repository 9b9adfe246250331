//! textui - a terminal widget toolkit
//!
//! Windows own rectangular widgets (labels, buttons, check boxes, text boxes,
//! progress bars). A [`tui::WidgetManager`] keeps the main windows and a LIFO
//! stack of modal dialogs, and the [`tui::Ui`] context drives the single
//! input/render loop. Dialogs look synchronous to their caller: `show_confirm`
//! returns only once the user has answered, by pumping the loop until that
//! dialog completes.

pub mod config;
pub mod tui;

pub use config::Config;
pub use tui::{
    components::{
        dialogs::{
            ConfirmDialog, Dialog, DialogId, DialogState, InputDialog, InputOutcome, MessageBox,
            ModalDialog, ModalStackError,
        },
        Button, CheckBox, EventResult, Label, ProgressBar, TextBox, Widget,
    },
    events::Event,
    platform::{Platform, ScriptedPlatform, TerminalPlatform},
    styles::{BoxStyle, ColorStyle, Theme},
    window::{FocusDirection, Geometry, WidgetId, WidgetRef, Window, WindowError, WindowId},
    Ui, WidgetManager,
};
