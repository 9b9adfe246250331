use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;
use serde::{Deserialize, Serialize};

/// Border drawing style for window frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxStyle {
    #[default]
    Single,
    Double,
    Rounded,
    Heavy,
}

impl BoxStyle {
    pub fn border_type(self) -> BorderType {
        match self {
            Self::Single => BorderType::Plain,
            Self::Double => BorderType::Double,
            Self::Rounded => BorderType::Rounded,
            Self::Heavy => BorderType::Thick,
        }
    }
}

/// Foreground/background pair used for text and frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorStyle {
    pub fg: Color,
    pub bg: Color,
    pub bold: bool,
    pub reversed: bool,
}

impl Default for ColorStyle {
    fn default() -> Self {
        Self::new(Color::Reset)
    }
}

impl ColorStyle {
    pub const fn new(fg: Color) -> Self {
        Self {
            fg,
            bg: Color::Reset,
            bold: false,
            reversed: false,
        }
    }

    pub const fn on(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    pub const fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub const fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }
}

impl From<ColorStyle> for Style {
    fn from(color: ColorStyle) -> Self {
        let mut style = Style::default().fg(color.fg).bg(color.bg);
        if color.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if color.reversed {
            style = style.add_modifier(Modifier::REVERSED);
        }
        style
    }
}

/// Frame styles applied to windows and dialogs created through [`crate::tui::Ui`]
#[derive(Debug, Clone)]
pub struct Theme {
    /// Main window frames
    pub window_box: BoxStyle,
    pub window: ColorStyle,

    /// Modal dialog frames
    pub dialog_box: BoxStyle,
    pub dialog: ColorStyle,

    /// Message text inside dialogs
    pub message: ColorStyle,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            window_box: BoxStyle::Single,
            window: ColorStyle::new(Color::White),
            dialog_box: BoxStyle::Double,
            dialog: ColorStyle::new(Color::White).bold(),
            message: ColorStyle::new(Color::Gray),
        }
    }
}

impl Theme {
    pub fn with_box_styles(mut self, window_box: BoxStyle, dialog_box: BoxStyle) -> Self {
        self.window_box = window_box;
        self.dialog_box = dialog_box;
        self
    }
}
