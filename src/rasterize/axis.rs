//! Horizontal value axis: nice-number scaling, ticks and labels.

use crate::types::Rect;

use super::marks::{LineMark, Mark};
use super::text::{BrailleTable, text_mark};

/// Step multipliers tried for each power of ten, ascending.
const CANDIDATES: [f64; 5] = [0.1, 0.2, 0.25, 0.5, 1.0];

/// Value of one axis unit so that `total_range` fits into `units` units.
///
/// Picks the smallest `candidate * 10^k` that is at least
/// `total_range / units`, with `10^k` the power of ten at or above that
/// quotient. A zero range is scaled like a range of one.
pub fn nice_scale(total_range: f64, units: usize) -> f64 {
    let total = if total_range > 0.0 && total_range.is_finite() {
        total_range
    } else {
        1.0
    };
    let min_per_unit = total / units.max(1) as f64;
    let magnitude = 10f64.powf(min_per_unit.log10().ceil());
    CANDIDATES
        .iter()
        .map(|c| c * magnitude)
        .find(|&step| step >= min_per_unit)
        // log10 rounding just above a power of ten
        .unwrap_or(magnitude * 2.0)
}

/// Whole units needed to show `range` at `per_unit` per unit.
fn units_for(range: f64, per_unit: f64) -> usize {
    (range / per_unit - 1e-9).ceil().max(0.0) as usize
}

/// Nice unit value under which both sides of the origin fit into `units`.
///
/// Starts from [`nice_scale`] of the whole range and steps up to the next
/// nice value while rounding each side up to whole units overflows the axis.
/// Returns `None` when a range on both sides needs more than `units` units
/// at any scale.
pub fn fit_scale(negative_range: f64, positive_range: f64, units: usize) -> Option<f64> {
    let sides = usize::from(negative_range > 0.0) + usize::from(positive_range > 0.0);
    if units < sides.max(1) {
        return None;
    }
    let mut per_unit = nice_scale(negative_range + positive_range, units);
    while units_for(negative_range, per_unit) + units_for(positive_range, per_unit) > units {
        per_unit = nice_scale(per_unit * (1.0 + 1e-9), 1);
    }
    Some(per_unit)
}

/// Shortest decimal rendering of a scale value.
pub fn format_value(value: f64) -> String {
    let s = format!("{value:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Placement of a value axis in dot coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XAxis {
    /// Dot column of the zero line.
    pub origin: i64,
    /// Dots per axis unit.
    pub unit_size: usize,
    /// Data value of one axis unit.
    pub per_unit: f64,
    pub negative_units: usize,
    pub positive_units: usize,
}

impl XAxis {
    /// Split `units` units starting at dot column `left` between the negative
    /// and the positive side, proportional to the two ranges. Each side keeps
    /// at least the units its range needs at `per_unit`.
    pub fn new(
        left: i64,
        units: usize,
        unit_size: usize,
        per_unit: f64,
        negative_range: f64,
        positive_range: f64,
    ) -> Self {
        let total_range = negative_range + positive_range;
        let proportional = if total_range > 0.0 {
            (units as f64 * negative_range / total_range).round() as usize
        } else {
            0
        };
        let negative_units = proportional
            .max(units_for(negative_range, per_unit))
            .min(units.saturating_sub(units_for(positive_range, per_unit)));
        XAxis {
            origin: left + (negative_units * unit_size) as i64,
            unit_size,
            per_unit,
            negative_units,
            positive_units: units - negative_units,
        }
    }

    /// First dot column of the axis.
    pub fn left(&self) -> i64 {
        self.origin - (self.negative_units * self.unit_size) as i64
    }

    /// Last dot column of the axis.
    pub fn right(&self) -> i64 {
        self.origin + (self.positive_units * self.unit_size) as i64
    }

    /// Dot length of a bar for `value`, limited to the room on its side.
    /// Non-zero values are at least one dot long.
    pub fn length_of(&self, value: f64) -> i64 {
        let mut length = (value.abs() / self.per_unit * self.unit_size as f64).round() as i64;
        if value != 0.0 {
            length = length.max(1);
        }
        let room = if value < 0.0 {
            self.negative_units
        } else {
            self.positive_units
        };
        length.min((room * self.unit_size) as i64)
    }

    /// Axis line with ticks on the first dot row of `area` and unit labels on
    /// its second cell row. Labels that would collide with the previous one
    /// or leave the area are skipped.
    pub fn marks(
        &self,
        area: &Rect,
        tick_interval: usize,
        table: &dyn BrailleTable,
        cell_width: usize,
        cell_height: usize,
    ) -> Vec<Mark> {
        let cells = area.to_int();
        let y = cells.y * cell_height as i64;
        let mut marks = vec![Mark::from(LineMark::horizontal(y, self.left(), self.right()))];

        let interval = tick_interval.max(1) as i64;
        let first = -(self.negative_units as i64 / interval) * interval;
        let mut next_free = i64::MIN;
        let mut unit = first;
        while unit <= self.positive_units as i64 {
            let x = self.origin + unit * self.unit_size as i64;
            marks.push(LineMark::vertical(x, y, y + 1).into());

            if cells.height >= 2 {
                let label = unit.to_string();
                let length = table.measure(&label) as i64;
                let cell_x = x.div_euclid(cell_width as i64);
                if cell_x >= next_free && cell_x + length <= cells.x + cells.width {
                    let label_area = Rect::new(cell_x as f64, (cells.y + 1) as f64, length as f64, 1.0);
                    marks.push(text_mark(table, &label, &label_area, cell_width, cell_height).into());
                    next_free = cell_x + length + 1;
                }
            }
            unit += interval;
        }
        marks
    }

    /// The zero line from `top` down to `bottom` (dot rows, inclusive).
    pub fn y_axis(&self, top: i64, bottom: i64) -> Mark {
        LineMark::vertical(self.origin, top, bottom).into()
    }
}
