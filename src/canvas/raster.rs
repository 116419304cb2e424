//! Raster canvas: the printable area quantized into cells of dots.
//!
//! Dot spacing differs inside a cell and across a cell boundary, so dot
//! positions are not an arithmetic sequence. Both axes get a precomputed
//! [`PositionTable`] and millimeter positions are mapped to dots by search.

use crate::config::{CanvasSettings, RasterSettings};
use crate::errors::CanvasError;
use crate::log::debug;
use crate::types::{Rect, positive};

use super::{Canvas, Page};

/// Cell geometry and spacing, immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub cell_width: usize,
    pub cell_height: usize,
    pub horizontal_dot_distance: f64,
    pub vertical_dot_distance: f64,
    pub horizontal_cell_distance: f64,
    pub vertical_cell_distance: f64,
}

impl Grid {
    pub fn new(raster: &RasterSettings) -> Result<Self, CanvasError> {
        let check = |name: &'static str, value: f64| {
            positive(value).map_err(|reason| CanvasError::InvalidSetting { name, reason })
        };
        check("cell width", raster.cell_width as f64)?;
        check("cell height", raster.cell_height as f64)?;
        Ok(Grid {
            cell_width: raster.cell_width,
            cell_height: raster.cell_height,
            horizontal_dot_distance: check("horizontal dot distance", raster.horizontal_dot_distance)?,
            vertical_dot_distance: check("vertical dot distance", raster.vertical_dot_distance)?,
            horizontal_cell_distance: check("horizontal cell distance", raster.horizontal_cell_distance)?,
            vertical_cell_distance: check("vertical cell distance", raster.vertical_cell_distance)?,
        })
    }

    /// Horizontal pitch of one cell in millimeters.
    pub fn cell_pitch_x(&self) -> f64 {
        self.horizontal_dot_distance * (self.cell_width - 1) as f64 + self.horizontal_cell_distance
    }

    /// Vertical pitch of one cell in millimeters.
    pub fn cell_pitch_y(&self) -> f64 {
        self.vertical_dot_distance * (self.cell_height - 1) as f64 + self.vertical_cell_distance
    }
}

/// Ascending absolute dot positions (mm) along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionTable {
    positions: Vec<f64>,
}

impl PositionTable {
    /// Walk `cells` cells of `dots_per_cell` dots each, stepping `dot_distance`
    /// inside a cell and `cell_distance` between cells.
    pub fn build(cells: usize, dots_per_cell: usize, dot_distance: f64, cell_distance: f64) -> Self {
        let mut positions = Vec::with_capacity(cells * dots_per_cell);
        let mut position = 0.0;
        for _ in 0..cells {
            for dot in 0..dots_per_cell {
                positions.push(position);
                if dot + 1 < dots_per_cell {
                    position += dot_distance;
                }
            }
            position += cell_distance;
        }
        PositionTable { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.positions
    }

    /// Millimeter position of a dot index.
    pub fn position(&self, index: usize) -> Option<f64> {
        self.positions.get(index).copied()
    }

    /// Index of the dot closest to `mm`.
    ///
    /// Scans upward while the distance keeps shrinking; the first index where
    /// it stops is one past the answer. Ties resolve to the lower index.
    pub fn quantize(&self, mm: f64) -> usize {
        let mut min_distance = f64::INFINITY;
        for (i, position) in self.positions.iter().enumerate() {
            let distance = (position - mm).abs();
            if distance < min_distance {
                min_distance = distance;
            } else {
                return i.saturating_sub(1);
            }
        }
        self.positions.len().saturating_sub(1)
    }
}

/// A canvas whose pages are dot matrices.
#[derive(Debug, Clone)]
pub struct RasterCanvas {
    canvas: Canvas<Page>,
    grid: Grid,
    /// Usable cells, in cell coordinates.
    cell_area: Rect,
    column_count: usize,
    row_count: usize,
    x_positions: PositionTable,
    y_positions: PositionTable,
}

impl RasterCanvas {
    pub fn new(settings: &CanvasSettings) -> Result<Self, CanvasError> {
        let canvas = Canvas::new(settings.format, settings.constraint)?;
        let grid = Grid::new(&settings.raster)?;
        let area = canvas.printable_area();
        let (pitch_x, pitch_y) = (grid.cell_pitch_x(), grid.cell_pitch_y());

        // Round inward: only whole cells count.
        let left = (area.x / pitch_x).ceil();
        let top = (area.y / pitch_y).ceil();
        let right = (area.right() / pitch_x).floor();
        let bottom = (area.bottom() / pitch_y).floor();
        let cell_box = Rect::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0));

        let rc = settings.raster.constraint;
        let constraint_box = Rect::new(
            rc.left as f64,
            rc.top as f64,
            rc.width.map_or(f64::INFINITY, |w| w as f64),
            rc.height.map_or(f64::INFINITY, |h| h as f64),
        );
        let cell_area = cell_box
            .intersected_with(&constraint_box)
            .translated_by(-constraint_box.x, -constraint_box.y);
        if cell_area.is_empty() {
            return Err(CanvasError::EmptyRaster {
                columns: cell_area.width,
                rows: cell_area.height,
            });
        }

        // Leading empty cells stay part of the matrix so dot addresses match the page edge.
        let cells_x = cell_area.right().round() as usize;
        let cells_y = cell_area.bottom().round() as usize;
        let column_count = cells_x * grid.cell_width;
        let row_count = cells_y * grid.cell_height;
        let x_positions = PositionTable::build(
            cells_x,
            grid.cell_width,
            grid.horizontal_dot_distance,
            grid.horizontal_cell_distance,
        );
        let y_positions = PositionTable::build(
            cells_y,
            grid.cell_height,
            grid.vertical_dot_distance,
            grid.vertical_cell_distance,
        );
        debug!(
            cells = %cell_area,
            columns = column_count,
            rows = row_count,
            "computed raster"
        );

        Ok(RasterCanvas {
            canvas,
            grid,
            cell_area,
            column_count,
            row_count,
            x_positions,
            y_positions,
        })
    }

    pub fn canvas(&self) -> &Canvas<Page> {
        &self.canvas
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn cell_width(&self) -> usize {
        self.grid.cell_width
    }

    pub fn cell_height(&self) -> usize {
        self.grid.cell_height
    }

    /// Usable area in cell coordinates.
    pub fn cell_area(&self) -> Rect {
        self.cell_area
    }

    /// Usable area in dot coordinates.
    pub fn dot_area(&self) -> Rect {
        self.to_dot_rectangle(&self.cell_area)
    }

    pub fn horizontal_cell_count(&self) -> usize {
        self.cell_area.width.round() as usize
    }

    pub fn vertical_cell_count(&self) -> usize {
        self.cell_area.height.round() as usize
    }

    /// Dot columns of every page.
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Dot rows of every page.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Width in millimeters spanned by the usable cells.
    pub fn printable_width(&self) -> f64 {
        self.horizontal_cell_count() as f64 * self.grid.cell_pitch_x()
            - self.grid.horizontal_cell_distance
    }

    /// Height in millimeters spanned by the usable cells.
    pub fn printable_height(&self) -> f64 {
        self.vertical_cell_count() as f64 * self.grid.cell_pitch_y()
            - self.grid.vertical_cell_distance
    }

    pub fn x_positions(&self) -> &PositionTable {
        &self.x_positions
    }

    pub fn y_positions(&self) -> &PositionTable {
        &self.y_positions
    }

    /// Closest dot column for a horizontal millimeter position.
    pub fn quantize_x(&self, mm: f64) -> usize {
        self.x_positions.quantize(mm)
    }

    /// Closest dot row for a vertical millimeter position.
    pub fn quantize_y(&self, mm: f64) -> usize {
        self.y_positions.quantize(mm)
    }

    pub fn to_dot_rectangle(&self, cells: &Rect) -> Rect {
        cells.scaled_by(self.grid.cell_width as f64, self.grid.cell_height as f64)
    }

    pub fn cell_x_from_dot_x(&self, dot_x: usize) -> usize {
        dot_x / self.grid.cell_width
    }

    pub fn cell_y_from_dot_y(&self, dot_y: usize) -> usize {
        dot_y / self.grid.cell_height
    }

    /// Append a blank page and make it current.
    pub fn new_page(&mut self) -> &mut Page {
        debug!(page = self.canvas.page_count(), "new page");
        let page = Page::new(self.row_count, self.column_count);
        self.canvas.push_page(page)
    }

    /// The last page, created on first access.
    pub fn current_page(&mut self) -> &mut Page {
        let (rows, columns) = (self.row_count, self.column_count);
        self.canvas
            .current_page_or_insert_with(|| Page::new(rows, columns))
    }

    pub fn page_count(&self) -> usize {
        self.canvas.page_count()
    }

    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.canvas.pages()
    }

    pub fn into_pages(self) -> Vec<Page> {
        self.canvas.into_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Margins, PageFormat, PrinterConstraint, RasterConstraint};

    fn letter_settings() -> CanvasSettings {
        CanvasSettings {
            format: PageFormat::new(216.0, 279.0, Margins::uniform(6.0)),
            constraint: PrinterConstraint::unconstrained(),
            raster: RasterSettings::braille_6dot(),
        }
    }

    // ==================== geometry ====================

    #[test]
    fn cell_pitch() {
        let grid = Grid::new(&RasterSettings::braille_6dot()).unwrap();
        assert_eq!(grid.cell_pitch_x(), 6.0);
        assert_eq!(grid.cell_pitch_y(), 10.0);
    }

    #[test]
    fn letter_page_golden_values() {
        let canvas = RasterCanvas::new(&letter_settings()).unwrap();
        assert_eq!(canvas.cell_area(), Rect::new(1.0, 1.0, 34.0, 26.0));
        assert_eq!(canvas.horizontal_cell_count(), 34);
        assert_eq!(canvas.vertical_cell_count(), 26);
        assert_eq!(canvas.column_count(), 70);
        assert_eq!(canvas.row_count(), 81);
        assert_eq!(canvas.printable_width(), 200.5);
        assert_eq!(canvas.printable_height(), 255.0);
        assert_eq!(canvas.dot_area(), Rect::new(2.0, 3.0, 68.0, 78.0));
    }

    #[test]
    fn raster_constraint_limits_cells() {
        let mut settings = letter_settings();
        settings.raster.constraint = RasterConstraint {
            left: 0,
            top: 0,
            width: Some(20),
            height: Some(10),
        };
        let canvas = RasterCanvas::new(&settings).unwrap();
        assert_eq!(canvas.cell_area(), Rect::new(1.0, 1.0, 19.0, 9.0));
        assert_eq!(canvas.column_count(), 40);
        assert_eq!(canvas.row_count(), 30);
    }

    #[test]
    fn raster_constraint_outside_cells_is_empty() {
        let mut settings = letter_settings();
        settings.raster.constraint = RasterConstraint {
            left: 50,
            top: 0,
            width: None,
            height: None,
        };
        assert!(matches!(
            RasterCanvas::new(&settings),
            Err(CanvasError::EmptyRaster { .. })
        ));
    }

    #[test]
    fn area_smaller_than_a_cell_is_empty() {
        let mut settings = letter_settings();
        settings.format = PageFormat::new(8.0, 279.0, Margins::default());
        // 8mm holds one 6mm cell; shift it so no whole cell fits
        settings.format.margins.left = 3.0;
        assert!(matches!(
            RasterCanvas::new(&settings),
            Err(CanvasError::EmptyRaster { .. })
        ));
    }

    #[test]
    fn zero_cell_height_is_rejected() {
        let mut settings = letter_settings();
        settings.raster.cell_height = 0;
        assert!(matches!(
            RasterCanvas::new(&settings),
            Err(CanvasError::InvalidSetting { name: "cell height", .. })
        ));
    }

    // ==================== quantization ====================

    #[test]
    fn position_table_has_cell_gaps() {
        let table = PositionTable::build(3, 2, 2.5, 3.5);
        assert_eq!(table.as_slice(), &[0.0, 2.5, 6.0, 8.5, 12.0, 14.5]);
    }

    #[test]
    fn position_tables_cover_every_dot() {
        let canvas = RasterCanvas::new(&letter_settings()).unwrap();
        assert_eq!(canvas.x_positions().len(), canvas.column_count());
        assert_eq!(canvas.y_positions().len(), canvas.row_count());
        assert_eq!(canvas.y_positions().position(3), Some(10.0));
    }

    #[test]
    fn tables_are_strictly_ascending_and_quantize_to_themselves() {
        let canvas = RasterCanvas::new(&letter_settings()).unwrap();
        for table in [canvas.x_positions(), canvas.y_positions()] {
            let values = table.as_slice();
            assert!(values.windows(2).all(|w| w[0] < w[1]));
            for (i, &mm) in values.iter().enumerate() {
                assert_eq!(table.quantize(mm), i);
            }
        }
    }

    #[test]
    fn quantize_picks_nearest_and_clamps() {
        let table = PositionTable::build(3, 2, 2.5, 3.5);
        assert_eq!(table.quantize(-10.0), 0);
        assert_eq!(table.quantize(1.0), 0);
        assert_eq!(table.quantize(2.0), 1);
        assert_eq!(table.quantize(4.0), 1);
        assert_eq!(table.quantize(4.5), 2);
        assert_eq!(table.quantize(100.0), 5);
    }

    #[test]
    fn quantize_ties_go_to_the_lower_index() {
        let table = PositionTable::build(1, 2, 2.0, 1.0);
        assert_eq!(table.quantize(1.0), 0);
    }

    #[test]
    fn quantize_is_monotonic() {
        let canvas = RasterCanvas::new(&letter_settings()).unwrap();
        let mut last = 0;
        let mut mm = -5.0;
        while mm < 230.0 {
            let q = canvas.quantize_x(mm);
            assert!(q >= last, "quantize({mm}) = {q} < {last}");
            last = q;
            mm += 0.37;
        }
    }

    // ==================== pages ====================

    #[test]
    fn current_page_is_created_once() {
        let mut canvas = RasterCanvas::new(&letter_settings()).unwrap();
        assert_eq!(canvas.page_count(), 0);
        canvas.current_page().set(0, 0, true);
        assert_eq!(canvas.page_count(), 1);
        assert!(canvas.current_page().get(0, 0));
        canvas.new_page();
        assert_eq!(canvas.page_count(), 2);
        assert!(!canvas.current_page().get(0, 0));
        let page = canvas.pages().next().unwrap();
        assert_eq!((page.rows(), page.columns()), (81, 70));
    }

    #[test]
    fn cell_and_dot_conversion() {
        let canvas = RasterCanvas::new(&letter_settings()).unwrap();
        assert_eq!(canvas.cell_x_from_dot_x(5), 2);
        assert_eq!(canvas.cell_y_from_dot_y(5), 1);
        assert_eq!(
            canvas.to_dot_rectangle(&Rect::new(1.0, 2.0, 3.0, 4.0)),
            Rect::new(2.0, 6.0, 6.0, 12.0)
        );
    }
}
