//! Drawing primitives in dot coordinates.
//!
//! Layout code produces a list of [`Mark`]s; drawing is a separate pass that
//! raises dots on a [`Page`]. Dots falling outside the page are dropped and
//! counted, never an error.

use enum_dispatch::enum_dispatch;

use crate::canvas::Page;
use crate::texture::Texture;
use crate::types::IntRect;

use super::text::BrailleCell;

/// Common behavior for all marks
#[enum_dispatch]
pub trait Draw {
    /// Raise this mark's dots on `page`. Returns the number of dots that
    /// fell outside the page.
    fn draw(&self, page: &mut Page) -> usize;
}

/// A mark enum wrapping all mark types
#[enum_dispatch(Draw)]
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Line(LineMark),
    Frame(FrameMark),
    Fill(FillMark),
    Text(TextMark),
}

fn raise(page: &mut Page, x: i64, y: i64, dropped: &mut usize) {
    if !page.set(x, y, true) {
        *dropped += 1;
    }
}

// ============================================================================
// Lines
// ============================================================================

/// Dash pattern along a line, in dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dash {
    pub on: usize,
    pub off: usize,
}

/// A one-dot line between two dots, both ends included.
#[derive(Debug, Clone, PartialEq)]
pub struct LineMark {
    pub from: (i64, i64),
    pub to: (i64, i64),
    pub dash: Option<Dash>,
}

impl LineMark {
    pub fn new(from: (i64, i64), to: (i64, i64)) -> Self {
        LineMark {
            from,
            to,
            dash: None,
        }
    }

    pub fn horizontal(y: i64, x0: i64, x1: i64) -> Self {
        LineMark::new((x0, y), (x1, y))
    }

    pub fn vertical(x: i64, y0: i64, y1: i64) -> Self {
        LineMark::new((x, y0), (x, y1))
    }

    pub fn dashed(mut self, on: usize, off: usize) -> Self {
        self.dash = Some(Dash { on, off });
        self
    }

    /// Dots on the line from `from` to `to` (Bresenham), before dashing.
    pub fn points(&self) -> Vec<(i64, i64)> {
        let (mut x, mut y) = self.from;
        let (x1, y1) = self.to;
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut points = Vec::with_capacity((dx - dy + 1) as usize);
        loop {
            points.push((x, y));
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        points
    }
}

impl Draw for LineMark {
    fn draw(&self, page: &mut Page) -> usize {
        let mut dropped = 0;
        for (i, (x, y)) in self.points().into_iter().enumerate() {
            let on = match self.dash {
                Some(Dash { on, off }) if on + off > 0 => i % (on + off) < on,
                _ => true,
            };
            if on {
                raise(page, x, y, &mut dropped);
            }
        }
        dropped
    }
}

// ============================================================================
// Frames and fills
// ============================================================================

/// One-dot border around a dot rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameMark {
    pub rect: IntRect,
}

impl Draw for FrameMark {
    fn draw(&self, page: &mut Page) -> usize {
        let r = &self.rect;
        if r.is_empty() {
            return 0;
        }
        let mut dropped = 0;
        for x in r.x..=r.right {
            raise(page, x, r.y, &mut dropped);
            if r.bottom != r.y {
                raise(page, x, r.bottom, &mut dropped);
            }
        }
        for y in r.y + 1..r.bottom {
            raise(page, r.x, y, &mut dropped);
            if r.right != r.x {
                raise(page, r.right, y, &mut dropped);
            }
        }
        dropped
    }
}

/// Texture sampled over a dot rectangle in page coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct FillMark {
    pub rect: IntRect,
    pub texture: Texture,
}

impl Draw for FillMark {
    fn draw(&self, page: &mut Page) -> usize {
        let r = &self.rect;
        let mut dropped = 0;
        for y in r.y..=r.bottom {
            for x in r.x..=r.right {
                if self.texture.value_at(x, y) {
                    raise(page, x, y, &mut dropped);
                }
            }
        }
        dropped
    }
}

// ============================================================================
// Text
// ============================================================================

/// Braille cells laid out left to right from a dot origin, wrapping after
/// `columns` cells. Cells past `max_lines` are not drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMark {
    pub x: i64,
    pub y: i64,
    pub columns: usize,
    pub max_lines: Option<usize>,
    pub cell_width: usize,
    pub cell_height: usize,
    pub cells: Vec<BrailleCell>,
    /// Print text the cells were translated from.
    pub text: String,
}

impl TextMark {
    pub fn lines(&self) -> usize {
        self.cells.len().div_ceil(self.columns.max(1))
    }
}

impl Draw for TextMark {
    fn draw(&self, page: &mut Page) -> usize {
        let columns = self.columns.max(1);
        let mut dropped = 0;
        for (i, cell) in self.cells.iter().enumerate() {
            let line = i / columns;
            if self.max_lines.is_some_and(|max| line >= max) {
                break;
            }
            let cx = self.x + ((i % columns) * self.cell_width) as i64;
            let cy = self.y + (line * self.cell_height) as i64;
            for dx in 0..self.cell_width.min(2) {
                for dy in 0..self.cell_height.min(4) {
                    if cell.dot(dx, dy) {
                        raise(page, cx + dx as i64, cy + dy as i64, &mut dropped);
                    }
                }
            }
        }
        dropped
    }
}
