//! Geometry primitives for tactplot.
//!
//! `Rect` is a real-valued axis-aligned box used in three unit systems:
//! millimeters (page and printable area), cells (layout) and dots (drawing).
//! Partitioning never mutates in place: the `remove_from_*` family consumes the
//! working rectangle and hands back the cropped slice together with the
//! remainder, so sequential layout code threads one owned value through.

use std::fmt;

use crate::errors::PartitionError;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is zero when non-zero required
    Zero,
    /// Value is negative when positive required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Zero => write!(f, "value is zero"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Accept finite values that are zero or larger.
#[inline]
pub fn non_negative(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Accept finite values strictly larger than zero.
#[inline]
pub fn positive(val: f64) -> Result<f64, NumericError> {
    let val = non_negative(val)?;
    if val == 0.0 {
        Err(NumericError::Zero)
    } else {
        Ok(val)
    }
}

/// Edge of a rectangle, used to report which partition failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Edge::Top => "top",
            Edge::Bottom => "bottom",
            Edge::Left => "left",
            Edge::Right => "right",
        };
        f.write_str(name)
    }
}

/// Axis-aligned rectangle with real-valued origin and extent.
///
/// Width and height are never negative. A width or height of `f64::INFINITY`
/// is allowed and means "unbounded" (printer constraints without a size).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    /// x coordinate of the far (right) edge.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// y coordinate of the far (bottom) edge.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    fn check(edge: Edge, extent: f64, available: f64) -> Result<(), PartitionError> {
        if extent < 0.0 || extent.is_nan() {
            return Err(PartitionError::NegativeExtent { edge, extent });
        }
        if extent > available {
            return Err(PartitionError::OutOfSpace {
                edge,
                requested: extent,
                available,
            });
        }
        Ok(())
    }

    /// Slice of `extent` along the top edge.
    pub fn from_top(&self, extent: f64) -> Result<Rect, PartitionError> {
        Self::check(Edge::Top, extent, self.height)?;
        Ok(Rect::new(self.x, self.y, self.width, extent))
    }

    /// Slice of `extent` along the bottom edge.
    pub fn from_bottom(&self, extent: f64) -> Result<Rect, PartitionError> {
        Self::check(Edge::Bottom, extent, self.height)?;
        Ok(Rect::new(self.x, self.bottom() - extent, self.width, extent))
    }

    /// Slice of `extent` along the left edge.
    pub fn from_left(&self, extent: f64) -> Result<Rect, PartitionError> {
        Self::check(Edge::Left, extent, self.width)?;
        Ok(Rect::new(self.x, self.y, extent, self.height))
    }

    /// Slice of `extent` along the right edge.
    pub fn from_right(&self, extent: f64) -> Result<Rect, PartitionError> {
        Self::check(Edge::Right, extent, self.width)?;
        Ok(Rect::new(self.right() - extent, self.y, extent, self.height))
    }

    /// Crop `extent` off the top. Returns `(slice, remainder)`.
    pub fn remove_from_top(self, extent: f64) -> Result<(Rect, Rect), PartitionError> {
        let slice = self.from_top(extent)?;
        let rest = Rect::new(self.x, self.y + extent, self.width, self.height - extent);
        Ok((slice, rest))
    }

    /// Crop `extent` off the bottom. Returns `(slice, remainder)`.
    pub fn remove_from_bottom(self, extent: f64) -> Result<(Rect, Rect), PartitionError> {
        let slice = self.from_bottom(extent)?;
        let rest = Rect::new(self.x, self.y, self.width, self.height - extent);
        Ok((slice, rest))
    }

    /// Crop `extent` off the left. Returns `(slice, remainder)`.
    pub fn remove_from_left(self, extent: f64) -> Result<(Rect, Rect), PartitionError> {
        let slice = self.from_left(extent)?;
        let rest = Rect::new(self.x + extent, self.y, self.width - extent, self.height);
        Ok((slice, rest))
    }

    /// Crop `extent` off the right. Returns `(slice, remainder)`.
    pub fn remove_from_right(self, extent: f64) -> Result<(Rect, Rect), PartitionError> {
        let slice = self.from_right(extent)?;
        let rest = Rect::new(self.x, self.y, self.width - extent, self.height);
        Ok((slice, rest))
    }

    /// Overlap of two rectangles. Disjoint rectangles give zero extent, never negative.
    pub fn intersected_with(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Rect::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
    }

    pub fn translated_by(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn scaled_by(&self, sx: f64, sy: f64) -> Rect {
        Rect::new(self.x * sx, self.y * sy, self.width * sx, self.height * sy)
    }

    /// Integer projection, treating the rectangle as a run of discrete units.
    pub fn to_int(&self) -> IntRect {
        IntRect {
            x: self.x.round() as i64,
            y: self.y.round() as i64,
            width: self.width.round() as i64,
            height: self.height.round() as i64,
            right: self.right().round() as i64 - 1,
            bottom: self.bottom().round() as i64 - 1,
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[x={} y={} w={} h={}]",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Read-only integer view of a [`Rect`].
///
/// `right` and `bottom` are the last addressable unit inside the rectangle,
/// i.e. `round(x + width) - 1`, not the exclusive far edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IntRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub right: i64,
    pub bottom: i64,
}

impl IntRect {
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Rect {
        Rect::new(2.0, 3.0, 10.0, 6.0)
    }

    // ==================== numeric validation ====================

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(non_negative(0.0), Ok(0.0));
        assert_eq!(non_negative(-0.5), Err(NumericError::Negative));
        assert_eq!(non_negative(f64::NAN), Err(NumericError::NaN));
    }

    #[test]
    fn positive_rejects_zero() {
        assert_eq!(positive(0.0), Err(NumericError::Zero));
        assert_eq!(positive(f64::INFINITY), Err(NumericError::Infinite));
        assert_eq!(positive(2.5), Ok(2.5));
    }

    // ==================== slicing ====================

    #[test]
    fn from_edges_do_not_touch_receiver() {
        let r = sample();
        assert_eq!(r.from_top(2.0).unwrap(), Rect::new(2.0, 3.0, 10.0, 2.0));
        assert_eq!(r.from_bottom(2.0).unwrap(), Rect::new(2.0, 7.0, 10.0, 2.0));
        assert_eq!(r.from_left(4.0).unwrap(), Rect::new(2.0, 3.0, 4.0, 6.0));
        assert_eq!(r.from_right(4.0).unwrap(), Rect::new(8.0, 3.0, 4.0, 6.0));
        assert_eq!(r, sample());
    }

    #[test]
    fn remove_from_top_moves_origin() {
        let (slice, rest) = sample().remove_from_top(2.0).unwrap();
        assert_eq!(slice, Rect::new(2.0, 3.0, 10.0, 2.0));
        assert_eq!(rest, Rect::new(2.0, 5.0, 10.0, 4.0));
    }

    #[test]
    fn remove_from_left_and_right() {
        let (left, rest) = sample().remove_from_left(3.0).unwrap();
        assert_eq!(left, Rect::new(2.0, 3.0, 3.0, 6.0));
        let (right, rest) = rest.remove_from_right(3.0).unwrap();
        assert_eq!(right, Rect::new(9.0, 3.0, 3.0, 6.0));
        assert_eq!(rest, Rect::new(5.0, 3.0, 4.0, 6.0));
    }

    #[test]
    fn remove_from_bottom_keeps_origin() {
        let (bottom, rest) = sample().remove_from_bottom(1.5).unwrap();
        assert_eq!(bottom, Rect::new(2.0, 7.5, 10.0, 1.5));
        assert_eq!(rest, Rect::new(2.0, 3.0, 10.0, 4.5));
    }

    #[test]
    fn crop_and_uncrop_round_trip() {
        for extent in [0.0, 0.5, 3.0, 6.0] {
            let original = sample();
            let (_, mut rest) = original.remove_from_top(extent).unwrap();
            rest.height += extent;
            rest.y -= extent;
            assert_eq!(rest, original, "extent {extent}");
        }
    }

    #[test]
    fn whole_extent_leaves_empty_remainder() {
        let (slice, rest) = sample().remove_from_left(10.0).unwrap();
        assert_eq!(slice.width, 10.0);
        assert!(rest.is_empty());
    }

    #[test]
    fn oversized_requests_fail() {
        let r = sample();
        assert!(matches!(
            r.from_top(6.5),
            Err(PartitionError::OutOfSpace { edge: Edge::Top, .. })
        ));
        assert!(r.from_bottom(7.0).is_err());
        assert!(r.from_left(10.1).is_err());
        assert!(r.from_right(11.0).is_err());
        assert!(r.remove_from_top(6.01).is_err());
        assert!(r.remove_from_bottom(100.0).is_err());
        assert!(r.remove_from_left(10.5).is_err());
        assert!(matches!(
            r.remove_from_right(12.0),
            Err(PartitionError::OutOfSpace {
                edge: Edge::Right,
                requested,
                available,
            }) if requested == 12.0 && available == 10.0
        ));
    }

    #[test]
    fn negative_extent_is_rejected() {
        assert!(matches!(
            sample().from_left(-1.0),
            Err(PartitionError::NegativeExtent { .. })
        ));
    }

    // ==================== intersection ====================

    #[test]
    fn intersection_is_commutative() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(4.0, -2.0, 10.0, 5.0);
        assert_eq!(a.intersected_with(&b), b.intersected_with(&a));
        assert_eq!(a.intersected_with(&b), Rect::new(4.0, 0.0, 6.0, 3.0));
    }

    #[test]
    fn disjoint_intersection_is_empty_not_negative() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        let b = Rect::new(5.0, 7.0, 1.0, 1.0);
        let i = a.intersected_with(&b);
        assert_eq!(i.width, 0.0);
        assert_eq!(i.height, 0.0);
        assert!(i.is_empty());
        assert_eq!(b.intersected_with(&a).width, 0.0);
    }

    #[test]
    fn intersection_with_unbounded_rect() {
        let page = Rect::new(6.0, 6.0, 204.0, 267.0);
        let unbounded = Rect::new(0.0, 0.0, f64::INFINITY, f64::INFINITY);
        assert_eq!(page.intersected_with(&unbounded), page);
    }

    // ==================== transforms ====================

    #[test]
    fn translate_and_scale() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(r.translated_by(-1.0, 1.0), Rect::new(0.0, 3.0, 3.0, 4.0));
        assert_eq!(r.scaled_by(2.0, 3.0), Rect::new(2.0, 6.0, 6.0, 12.0));
    }

    // ==================== integer view ====================

    #[test]
    fn int_view_counts_units() {
        let r = Rect::new(2.0, 3.0, 4.0, 6.0).to_int();
        assert_eq!(r.x, 2);
        assert_eq!(r.width, 4);
        assert_eq!(r.right, 5);
        assert_eq!(r.bottom, 8);
    }

    #[test]
    fn int_view_rounds_far_edge_independently() {
        let r = Rect::new(0.4, 0.0, 1.2, 1.0).to_int();
        assert_eq!(r.x, 0);
        assert_eq!(r.width, 1);
        // round(1.6) - 1
        assert_eq!(r.right, 1);
    }

    #[test]
    fn int_view_debug_snapshot() {
        insta::assert_debug_snapshot!(Rect::new(1.0, 1.0, 34.0, 26.0).to_int(), @r"
        IntRect {
            x: 1,
            y: 1,
            width: 34,
            height: 26,
            right: 34,
            bottom: 26,
        }
        ");
    }
}
