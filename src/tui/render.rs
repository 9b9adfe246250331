//! Drawing primitives consumed by windows and widgets
//!
//! Everything in the toolkit draws through [`Renderer`], which has a single
//! production implementation on top of [`ratatui::buffer::Buffer`]. Widgets
//! receive a [`Canvas`] instead, which clips every span to the owning window's
//! interior and drops spans that would not fit completely.

use super::styles::{BoxStyle, ColorStyle};
use super::window::Geometry;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Widget as _};
use unicode_width::UnicodeWidthStr;

/// Grid drawing capability
pub trait Renderer {
    /// Draw `text` with its first cell at `(x, y)`
    fn draw_text(&mut self, x: i32, y: i32, text: &str, style: ColorStyle);

    /// Draw a framed box, clearing its interior
    fn draw_box(&mut self, rect: Geometry, box_style: BoxStyle, style: ColorStyle, title: &str);
}

impl Renderer for Buffer {
    fn draw_text(&mut self, x: i32, y: i32, text: &str, style: ColorStyle) {
        let area = self.area;
        let width = text.width() as i32;
        let fits = x >= area.x as i32
            && y >= area.y as i32
            && y < area.bottom() as i32
            && x + width <= area.right() as i32;
        if !fits || text.is_empty() {
            return;
        }
        self.set_string(x as u16, y as u16, text, Style::from(style));
    }

    fn draw_box(&mut self, rect: Geometry, box_style: BoxStyle, style: ColorStyle, title: &str) {
        let Some(area) = visible_rect(rect, self.area) else {
            return;
        };

        Clear.render(area, self);

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(box_style.border_type())
            .border_style(Style::from(style))
            .title_alignment(Alignment::Center);
        if !title.is_empty() {
            block = block.title(format!(" {} ", title));
        }
        block.render(area, self);
    }
}

/// Part of `rect` that lies on screen, if any
fn visible_rect(rect: Geometry, screen: Rect) -> Option<Rect> {
    let left = rect.x.max(screen.x as i32);
    let top = rect.y.max(screen.y as i32);
    let right = rect.right().min(screen.right() as i32);
    let bottom = rect.bottom().min(screen.bottom() as i32);
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

/// Clipping view over a renderer, bounded to one window's interior
pub struct Canvas<'a> {
    renderer: &'a mut dyn Renderer,
    clip: Geometry,
}

impl<'a> Canvas<'a> {
    pub fn new(renderer: &'a mut dyn Renderer, clip: Geometry) -> Self {
        Self { renderer, clip }
    }

    pub fn clip(&self) -> Geometry {
        self.clip
    }

    /// Whether a span of `width` cells starting at `(x, y)` lies inside the clip area
    pub fn fits(&self, x: i32, y: i32, width: usize) -> bool {
        let width = width as i32;
        x >= self.clip.x
            && x + width <= self.clip.right()
            && y >= self.clip.y
            && y < self.clip.bottom()
    }

    /// Draw `text` only if the whole span fits. Returns whether anything was drawn.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, style: ColorStyle) -> bool {
        if text.is_empty() || !self.fits(x, y, text.width()) {
            return false;
        }
        self.renderer.draw_text(x, y, text, style);
        true
    }
}

/// Start column for `text_width` cells centered in a frame at `x` of `width` cells.
///
/// Returns `None` when the centered span would touch or cross the frame border,
/// in which case nothing must be drawn.
pub fn centered_text_column(x: i32, width: u16, text_width: usize) -> Option<i32> {
    let width = width as i32;
    let text_width = text_width as i32;
    let column = x + (width - text_width) / 2;
    (column > x && column + text_width < x + width).then_some(column)
}

#[cfg(test)]
pub(crate) fn buffer_line(buffer: &Buffer, y: u16) -> String {
    let area = buffer.area;
    (area.x..area.right())
        .map(|x| buffer.get(x, y).symbol())
        .collect::<String>()
}
