//! Braille text: translation tables and cell-aligned text layout.
//!
//! Translation is a service object passed explicitly to the rasterizers that
//! need it. A table maps a string to a sequence of braille cells; the layout
//! code only ever asks how many cells a string takes and which dots each cell
//! raises.

use std::fmt;

use crate::types::Rect;

use super::marks::TextMark;

/// One braille character. Bit `n` is dot `n + 1` (dots 7 and 8 for 8-dot cells).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BrailleCell(pub u8);

impl BrailleCell {
    pub const EMPTY: BrailleCell = BrailleCell(0);
    /// All six dots raised.
    pub const FULL: BrailleCell = BrailleCell(0x3f);

    /// Cell from dot numbers (1-8).
    pub fn from_dots(dots: &[u8]) -> Self {
        BrailleCell(
            dots.iter()
                .filter(|&&d| (1..=8).contains(&d))
                .fold(0, |bits, &d| bits | 1 << (d - 1)),
        )
    }

    /// Whether the dot at `column` (0-1) and `row` (0-3) is raised.
    pub fn dot(self, column: usize, row: usize) -> bool {
        let number = match (column, row) {
            (0, 0..=2) => row,
            (1, 0..=2) => row + 3,
            (0, 3) => 6,
            (1, 3) => 7,
            _ => return false,
        };
        self.0 & (1 << number) != 0
    }

    pub fn to_unicode(self) -> char {
        char::from_u32(0x2800 + u32::from(self.0)).unwrap_or(' ')
    }
}

impl fmt::Debug for BrailleCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_unicode())
    }
}

/// Translation from print text to braille cells.
pub trait BrailleTable: fmt::Debug {
    fn translate(&self, text: &str) -> Vec<BrailleCell>;

    /// Length of `text` in cells.
    fn measure(&self, text: &str) -> usize {
        self.translate(text).len()
    }
}

/// Uncontracted 6-dot literary braille.
///
/// Lower case letters map directly, upper case letters get the capital sign,
/// digit runs are introduced by the number sign and a letter a-j right after
/// a digit gets the letter sign. Characters without a mapping become a full
/// cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteraryTable;

const CAPITAL_SIGN: u8 = 0x20; // dot 6
const NUMBER_SIGN: u8 = 0x3c; // dots 3456
const LETTER_SIGN: u8 = 0x30; // dots 56

#[rustfmt::skip]
const LETTERS: [u8; 26] = [
    0x01, 0x03, 0x09, 0x19, 0x11, 0x0b, 0x1b, 0x13, 0x0a, 0x1a, // a-j
    0x05, 0x07, 0x0d, 0x1d, 0x15, 0x0f, 0x1f, 0x17, 0x0e, 0x1e, // k-t
    0x25, 0x27, 0x3a, 0x2d, 0x3d, 0x35,                         // u-z
];

impl LiteraryTable {
    fn punctuation(c: char) -> Option<u8> {
        let bits = match c {
            ' ' => 0x00,
            ',' => 0x02,
            ';' => 0x06,
            ':' => 0x12,
            '.' => 0x32,
            '!' => 0x16,
            '?' => 0x26,
            '-' => 0x24,
            '/' => 0x0c,
            '\'' => 0x04,
            '(' | ')' => 0x36,
            '=' => 0x3f,
            _ => return None,
        };
        Some(bits)
    }

    fn digit(c: char) -> Option<u8> {
        let d = c.to_digit(10)?;
        // 1-9 are a-i, 0 is j
        let letter = if d == 0 { 9 } else { d as usize - 1 };
        Some(LETTERS[letter])
    }
}

impl BrailleTable for LiteraryTable {
    fn translate(&self, text: &str) -> Vec<BrailleCell> {
        let mut cells = Vec::with_capacity(text.len() + 2);
        let mut in_number = false;
        for c in text.chars() {
            if let Some(bits) = Self::digit(c) {
                if !in_number {
                    cells.push(BrailleCell(NUMBER_SIGN));
                    in_number = true;
                }
                cells.push(BrailleCell(bits));
                continue;
            }
            // decimal separators do not end a number
            if in_number && (c == '.' || c == ',') {
                cells.push(BrailleCell(Self::punctuation(c).unwrap_or(0)));
                continue;
            }
            let was_number = in_number;
            in_number = false;
            let lower = c.to_ascii_lowercase();
            if lower.is_ascii_lowercase() {
                let index = (lower as u8 - b'a') as usize;
                if c.is_ascii_uppercase() {
                    cells.push(BrailleCell(CAPITAL_SIGN));
                } else if was_number && index < 10 {
                    cells.push(BrailleCell(LETTER_SIGN));
                }
                cells.push(BrailleCell(LETTERS[index]));
            } else {
                cells.push(BrailleCell(Self::punctuation(c).unwrap_or(BrailleCell::FULL.0)));
            }
        }
        cells
    }
}

/// Lines needed to show `cells` cells wrapped at `columns` cells per line.
pub fn line_count(cells: usize, columns: usize) -> Option<usize> {
    if columns == 0 {
        return (cells == 0).then_some(0);
    }
    Some(cells.div_ceil(columns))
}

/// Text placed into a cell-space rectangle, wrapped at its width.
///
/// `area` is in cells; `cell_width`/`cell_height` convert to dots.
pub fn text_mark(
    table: &dyn BrailleTable,
    text: &str,
    area: &Rect,
    cell_width: usize,
    cell_height: usize,
) -> TextMark {
    let cells = area.to_int();
    TextMark {
        x: cells.x * cell_width as i64,
        y: cells.y * cell_height as i64,
        columns: cells.width.max(1) as usize,
        max_lines: Some(cells.height.max(0) as usize),
        cell_width,
        cell_height,
        cells: table.translate(text),
        text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dots(cells: &[BrailleCell]) -> String {
        cells.iter().map(|c| c.to_unicode()).collect()
    }

    #[test]
    fn letters() {
        assert_eq!(dots(&LiteraryTable.translate("abz")), "⠁⠃⠵");
        assert_eq!(dots(&LiteraryTable.translate("w")), "⠺");
    }

    #[test]
    fn capitals_get_the_capital_sign() {
        assert_eq!(dots(&LiteraryTable.translate("Ab")), "⠠⠁⠃");
    }

    #[test]
    fn numbers_get_the_number_sign_once() {
        assert_eq!(dots(&LiteraryTable.translate("10")), "⠼⠁⠚");
        assert_eq!(dots(&LiteraryTable.translate("2.5")), "⠼⠃⠲⠑");
        assert_eq!(dots(&LiteraryTable.translate("-3")), "⠤⠼⠉");
    }

    #[test]
    fn letter_sign_after_digits() {
        assert_eq!(dots(&LiteraryTable.translate("1a")), "⠼⠁⠰⠁");
        assert_eq!(dots(&LiteraryTable.translate("1 a")), "⠼⠁⠀⠁");
        assert_eq!(dots(&LiteraryTable.translate("1x")), "⠼⠁⠭");
    }

    #[test]
    fn unknown_characters_become_full_cells() {
        assert_eq!(dots(&LiteraryTable.translate("€")), "⠿");
    }

    #[test]
    fn measure_counts_cells() {
        assert_eq!(LiteraryTable.measure("n/a"), 3);
        assert_eq!(LiteraryTable.measure("Sales"), 6);
    }

    #[test]
    fn cell_dot_layout() {
        let cell = BrailleCell::from_dots(&[1, 5, 7]);
        assert!(cell.dot(0, 0));
        assert!(cell.dot(1, 1));
        assert!(cell.dot(0, 3));
        assert!(!cell.dot(1, 0));
        assert!(!cell.dot(2, 0));
    }

    #[test]
    fn wrapping() {
        assert_eq!(line_count(7, 3), Some(3));
        assert_eq!(line_count(6, 3), Some(2));
        assert_eq!(line_count(0, 0), Some(0));
        assert_eq!(line_count(1, 0), None);
    }
}
