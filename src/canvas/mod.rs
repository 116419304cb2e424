//! Canvases: printable area computation and page ownership.
//!
//! - `page`: the dot matrix a raster canvas hands to the printer encoder
//! - `raster`: cell/dot grid on top of the printable area
//!
//! Margins are a format concern and the printer constraint is a device
//! concern. The two boxes are combined by intersection, so a constraint
//! without width or height behaves as unbounded on that axis.

pub mod page;
pub mod raster;

pub use page::Page;
pub use raster::{Grid, PositionTable, RasterCanvas};

use crate::config::{PageFormat, PrinterConstraint};
use crate::errors::CanvasError;
use crate::log::debug;
use crate::types::{Rect, non_negative, positive};

/// Printable area plus the pages drawn on it.
///
/// `P` is the page representation of the backend; the raster backend uses
/// [`Page`]. Pages are append-only and kept in creation order.
#[derive(Debug, Clone)]
pub struct Canvas<P> {
    format: PageFormat,
    constraint: PrinterConstraint,
    printable_area: Rect,
    pages: Vec<P>,
}

impl<P> Canvas<P> {
    pub fn new(format: PageFormat, constraint: PrinterConstraint) -> Result<Self, CanvasError> {
        let printable_area = printable_area(&format, &constraint)?;
        debug!(area = %printable_area, "computed printable area");
        Ok(Canvas {
            format,
            constraint,
            printable_area,
            pages: Vec::new(),
        })
    }

    pub fn format(&self) -> &PageFormat {
        &self.format
    }

    pub fn constraint(&self) -> &PrinterConstraint {
        &self.constraint
    }

    /// Printable area in millimeters, relative to the constraint origin.
    pub fn printable_area(&self) -> Rect {
        self.printable_area
    }

    pub fn printable_width(&self) -> f64 {
        self.printable_area.width
    }

    pub fn printable_height(&self) -> f64 {
        self.printable_area.height
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn pages(&self) -> impl Iterator<Item = &P> {
        self.pages.iter()
    }

    pub fn into_pages(self) -> Vec<P> {
        self.pages
    }

    pub(crate) fn push_page(&mut self, page: P) -> &mut P {
        self.pages.push(page);
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Last page, created with `make` when there is none yet.
    pub(crate) fn current_page_or_insert_with(&mut self, make: impl FnOnce() -> P) -> &mut P {
        if self.pages.is_empty() {
            self.pages.push(make());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

fn check(name: &'static str, value: f64, positive_only: bool) -> Result<f64, CanvasError> {
    let checked = if positive_only {
        positive(value)
    } else {
        non_negative(value)
    };
    checked.map_err(|reason| CanvasError::InvalidSetting { name, reason })
}

/// Intersect the margin box with the constraint box and move the result
/// into constraint coordinates.
fn printable_area(format: &PageFormat, constraint: &PrinterConstraint) -> Result<Rect, CanvasError> {
    let page = Rect::new(
        0.0,
        0.0,
        check("page width", format.width, true)?,
        check("page height", format.height, true)?,
    );
    let margins = &format.margins;
    let margin_box = [
        (margins.top, "top margin"),
        (margins.left, "left margin"),
        (margins.bottom, "bottom margin"),
        (margins.right, "right margin"),
    ]
    .into_iter()
    .enumerate()
    .try_fold(page, |remaining, (edge, (extent, name))| {
        let extent = check(name, extent, false)?;
        let cropped = match edge {
            0 => remaining.remove_from_top(extent),
            1 => remaining.remove_from_left(extent),
            2 => remaining.remove_from_bottom(extent),
            _ => remaining.remove_from_right(extent),
        };
        cropped
            .map(|(_, rest)| rest)
            .map_err(|source| CanvasError::MarginsExceedPage { source })
    })?;

    let constraint_box = Rect::new(
        check("constraint left", constraint.left, false)?,
        check("constraint top", constraint.top, false)?,
        constraint.width.unwrap_or(f64::INFINITY),
        constraint.height.unwrap_or(f64::INFINITY),
    );
    let area = margin_box
        .intersected_with(&constraint_box)
        .translated_by(-constraint_box.x, -constraint_box.y);
    if area.is_empty() {
        return Err(CanvasError::EmptyPrintableArea {
            width: area.width,
            height: area.height,
        });
    }
    Ok(area)
}
