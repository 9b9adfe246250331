use super::{Widget, WidgetState};
use crate::tui::render::Canvas;
use crate::tui::styles::ColorStyle;
use ratatui::style::Color;
use std::any::Any;

/// Horizontal progress bar followed by a percentage
pub struct ProgressBar {
    state: WidgetState,
    progress: f32,
    style: ColorStyle,
}

impl ProgressBar {
    pub fn new(x: i32, y: i32, width: u16, progress: f32) -> Self {
        let mut bar = Self {
            state: WidgetState::new().at(x, y).with_size(width, 1),
            progress: 0.0,
            style: ColorStyle::new(Color::Green),
        };
        bar.set_progress(progress);
        bar
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Set progress, clamped to `0.0..=1.0`
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
    }

    fn bar_text(&self) -> String {
        let percent = format!(" {:>3}%", (self.progress * 100.0).round() as u32);
        let cells = (self.state.width as usize).saturating_sub(percent.len());
        let filled = (cells as f32 * self.progress).round() as usize;
        format!(
            "{}{}{}",
            "█".repeat(filled),
            "░".repeat(cells - filled),
            percent
        )
    }
}

impl Widget for ProgressBar {
    fn state(&self) -> &WidgetState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut WidgetState {
        &mut self.state
    }

    fn render(&self, canvas: &mut Canvas<'_>, x: i32, y: i32) {
        canvas.draw_text(x, y, &self.bar_text(), self.style);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
