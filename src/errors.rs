//! Error types with miette diagnostics.
//!
//! The layers mirror the way a rasterizing session fails: partition bounds
//! (never surfaced raw), configuration, canvas geometry, layout and dispatch.

use miette::Diagnostic;
use thiserror::Error;

use crate::types::{Edge, NumericError};

// ============================================================================
// Partition Errors
// ============================================================================

/// A rectangle could not be cropped as requested.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum PartitionError {
    #[error("cannot take {requested} from the {edge} edge, only {available} available")]
    #[diagnostic(code(tactplot::geometry::out_of_space))]
    OutOfSpace {
        edge: Edge,
        requested: f64,
        available: f64,
    },

    #[error("negative extent {extent} requested from the {edge} edge")]
    #[diagnostic(code(tactplot::geometry::negative_extent))]
    NegativeExtent { edge: Edge, extent: f64 },
}

// ============================================================================
// Configuration Errors
// ============================================================================

/// Errors while reading typed settings from a property set.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing property: {key}")]
    #[diagnostic(code(tactplot::config::missing))]
    Missing { key: String },

    #[error("property {key} has type {found}, expected {expected}")]
    #[diagnostic(code(tactplot::config::wrong_type))]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid value for {key}: {reason}")]
    #[diagnostic(code(tactplot::config::invalid_value))]
    InvalidValue {
        key: String,
        #[source]
        reason: NumericError,
    },

    #[error("unknown raster type: {value}")]
    #[diagnostic(
        code(tactplot::config::unknown_raster_type),
        help("supported raster types are \"6-dot\", \"8-dot\" and \"1-dot\"")
    )]
    UnknownRasterType { value: String },

    #[error("{min_key} ({min}) exceeds {max_key} ({max})")]
    #[diagnostic(code(tactplot::config::invalid_range))]
    InvalidRange {
        min_key: String,
        max_key: String,
        min: usize,
        max: usize,
    },
}

// ============================================================================
// Canvas Errors
// ============================================================================

/// Page, margin and printer settings do not describe a usable page.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum CanvasError {
    #[error("margins exceed the page")]
    #[diagnostic(
        code(tactplot::canvas::margins_exceed_page),
        help("reduce the margins or choose a larger page format")
    )]
    MarginsExceedPage {
        #[source]
        source: PartitionError,
    },

    #[error("printable area is empty ({width} x {height} mm)")]
    #[diagnostic(
        code(tactplot::canvas::empty_printable_area),
        help("the printer constraint does not overlap the area inside the margins")
    )]
    EmptyPrintableArea { width: f64, height: f64 },

    #[error("printable area holds no complete cell ({columns} x {rows} cells)")]
    #[diagnostic(code(tactplot::canvas::empty_raster))]
    EmptyRaster { columns: f64, rows: f64 },

    #[error("invalid canvas setting {name}: {reason}")]
    #[diagnostic(code(tactplot::canvas::invalid_setting))]
    InvalidSetting {
        name: &'static str,
        #[source]
        reason: NumericError,
    },
}

// ============================================================================
// Layout Errors
// ============================================================================

/// A diagram does not fit the page it is being laid out on.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("title needs {rows} lines, at most {max_rows} allowed")]
    #[diagnostic(
        code(tactplot::layout::title_too_tall),
        help("shorten the title or raise barchart.maxTitleHeight")
    )]
    TitleTooTall { rows: usize, max_rows: usize },

    #[error(
        "bars need {required_cells} cell rows at the minimum thickness of {min_thickness} dots, \
         only {available_cells} available"
    )]
    #[diagnostic(
        code(tactplot::layout::no_bar_layout),
        help("use a taller page format or lower barchart.minThickness")
    )]
    NoBarLayout {
        required_cells: usize,
        available_cells: usize,
        min_thickness: usize,
    },

    #[error("{series} series cannot be told apart with {textures} textures")]
    #[diagnostic(code(tactplot::layout::too_many_series))]
    TooManySeries { series: usize, textures: usize },

    #[error("{groups} groups cannot be captioned with {captions} single-letter captions")]
    #[diagnostic(code(tactplot::layout::too_many_groups))]
    TooManyGroups { groups: usize, captions: usize },

    #[error("no room for a single x-axis step ({width} dots wide)")]
    #[diagnostic(code(tactplot::layout::no_axis_space))]
    NoAxisSpace { width: i64 },

    #[error("not enough space for the {context}")]
    #[diagnostic(code(tactplot::layout::insufficient_space))]
    Partition {
        context: &'static str,
        #[source]
        source: PartitionError,
    },
}

/// Attach layout context to a low-level partition result.
pub trait LayoutContext<T> {
    fn in_layout(self, context: &'static str) -> Result<T, LayoutError>;
}

impl<T> LayoutContext<T> for Result<T, PartitionError> {
    fn in_layout(self, context: &'static str) -> Result<T, LayoutError> {
        self.map_err(|source| LayoutError::Partition { context, source })
    }
}

// ============================================================================
// Rasterize Errors
// ============================================================================

/// Errors raised by a rasterizing session.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RasterizeError {
    #[error("no raster canvas is bound to the registry")]
    #[diagnostic(
        code(tactplot::rasterize::no_canvas),
        help("call RasterizerRegistry::set_canvas before rasterizing")
    )]
    NoCanvas,

    #[error("no rasterizer registered for diagram type {diagram}")]
    #[diagnostic(code(tactplot::rasterize::no_rasterizer))]
    NoRasterizer { diagram: &'static str },

    #[error("rasterizer needs {expected_width}x{expected_height} dot cells, canvas has {width}x{height}")]
    #[diagnostic(code(tactplot::rasterize::unsupported_raster))]
    UnsupportedRaster {
        width: usize,
        height: usize,
        expected_width: usize,
        expected_height: usize,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Layout(#[from] LayoutError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_error_gains_layout_context() {
        let res: Result<(), PartitionError> = Err(PartitionError::OutOfSpace {
            edge: Edge::Top,
            requested: 2.0,
            available: 1.0,
        });
        let err = res.in_layout("x-axis").unwrap_err();
        assert_eq!(err.to_string(), "not enough space for the x-axis");
        assert!(matches!(err, LayoutError::Partition { context: "x-axis", .. }));
    }

    #[test]
    fn layout_errors_convert_transparently() {
        let err: RasterizeError = LayoutError::TitleTooTall {
            rows: 5,
            max_rows: 2,
        }
        .into();
        assert_eq!(err.to_string(), "title needs 5 lines, at most 2 allowed");
    }
}
