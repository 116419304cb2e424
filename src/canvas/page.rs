//! Dot matrix pages.

use std::fmt;

/// One embossed page: a fixed `rows x columns` boolean matrix, row-major.
///
/// Coordinates outside the matrix are ignored on write and read as flat.
#[derive(Clone, PartialEq, Eq)]
pub struct Page {
    rows: usize,
    columns: usize,
    dots: Vec<bool>,
}

impl Page {
    pub fn new(rows: usize, columns: usize) -> Self {
        Page {
            rows,
            columns,
            dots: vec![false; rows * columns],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.columns && y < self.rows).then(|| y * self.columns + x)
    }

    pub fn get(&self, x: i64, y: i64) -> bool {
        self.index(x, y).is_some_and(|i| self.dots[i])
    }

    /// Set a dot. Returns `false` when the coordinate lies outside the page.
    pub fn set(&mut self, x: i64, y: i64, value: bool) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.dots[i] = value;
                true
            }
            None => false,
        }
    }

    /// Raised dots in one row.
    pub fn row(&self, y: usize) -> &[bool] {
        let start = (y * self.columns).min(self.dots.len());
        let end = (start + self.columns).min(self.dots.len());
        &self.dots[start..end]
    }

    pub fn raised_count(&self) -> usize {
        self.dots.iter().filter(|&&d| d).count()
    }

    pub fn is_blank(&self) -> bool {
        !self.dots.iter().any(|&d| d)
    }

    /// `X` for raised, `.` for flat, one line per dot row.
    pub fn to_ascii(&self) -> String {
        self.window_ascii(0, 0, self.columns, self.rows)
    }

    /// ASCII rendering of a window of the page.
    pub fn window_ascii(&self, x: usize, y: usize, width: usize, height: usize) -> String {
        (y..y + height)
            .map(|row| {
                (x..x + width)
                    .map(|col| if self.get(col as i64, row as i64) { 'X' } else { '.' })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Unicode braille preview, one character per cell.
    ///
    /// Cells may be at most 2 dots wide and 4 dots high (the extent of the
    /// Unicode braille block); other geometries return `None`.
    pub fn to_braille(&self, cell_width: usize, cell_height: usize) -> Option<String> {
        if cell_width == 0 || cell_height == 0 || cell_width > 2 || cell_height > 4 {
            return None;
        }
        // Unicode dot bits by (column, row)
        const BITS: [[u32; 4]; 2] = [[0x01, 0x02, 0x04, 0x40], [0x08, 0x10, 0x20, 0x80]];
        let cell_rows = self.rows.div_ceil(cell_height);
        let cell_columns = self.columns.div_ceil(cell_width);
        let mut out = String::with_capacity(cell_rows * (cell_columns * 3 + 1));
        for cy in 0..cell_rows {
            if cy > 0 {
                out.push('\n');
            }
            for cx in 0..cell_columns {
                let mut bits = 0;
                for (dx, column_bits) in BITS.iter().enumerate().take(cell_width) {
                    for (dy, bit) in column_bits.iter().enumerate().take(cell_height) {
                        let x = (cx * cell_width + dx) as i64;
                        let y = (cy * cell_height + dy) as i64;
                        if self.get(x, y) {
                            bits |= bit;
                        }
                    }
                }
                out.push(char::from_u32(0x2800 + bits).unwrap_or('?'));
            }
        }
        Some(out)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .field("raised", &self.raised_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_writes_are_dropped() {
        let mut page = Page::new(3, 4);
        assert!(page.set(3, 2, true));
        assert!(!page.set(4, 0, true));
        assert!(!page.set(-1, 0, true));
        assert!(!page.get(-1, -1));
        assert_eq!(page.raised_count(), 1);
    }

    #[test]
    fn ascii_rendering() {
        let mut page = Page::new(2, 3);
        page.set(0, 0, true);
        page.set(2, 1, true);
        insta::assert_snapshot!(page.to_ascii(), @r"
        X..
        ..X
        ");
    }

    #[test]
    fn braille_preview_of_six_dot_cells() {
        let mut page = Page::new(3, 4);
        // first cell: dots 1 and 5, second cell: dots 1..6
        page.set(0, 0, true);
        page.set(1, 1, true);
        for y in 0..3 {
            page.set(2, y, true);
            page.set(3, y, true);
        }
        assert_eq!(page.to_braille(2, 3).as_deref(), Some("⠑⠿"));
    }

    #[test]
    fn braille_preview_needs_small_cells() {
        assert_eq!(Page::new(6, 6).to_braille(3, 2), None);
        assert_eq!(Page::new(0, 0).to_braille(2, 3).as_deref(), Some(""));
    }

    #[test]
    fn row_access() {
        let mut page = Page::new(2, 2);
        page.set(1, 1, true);
        assert_eq!(page.row(1), &[false, true]);
        assert!(!page.is_blank());
    }
}
