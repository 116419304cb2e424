//! Tactile chart rasterization for braille embossers.
//!
//! A session turns page and printer settings into a [`RasterCanvas`] (the
//! printable area quantized into braille cells of dots), then hands diagrams
//! to a [`RasterizerRegistry`] which draws them onto dot-matrix pages:
//!
//! ```text
//! settings -> Canvas (mm) -> RasterCanvas (cells, dots) -> registry -> pages
//! ```
//!
//! Pages are plain boolean matrices; encoding them for a particular printer
//! is left to the caller.

pub mod canvas;
pub mod config;
pub mod defaults;
pub mod diagram;
pub mod errors;
pub mod log;
pub mod rasterize;
pub mod texture;
pub mod types;

use std::sync::Arc;

pub use canvas::{Canvas, Page, RasterCanvas};
pub use config::{CanvasSettings, PageFormat, PrinterConstraint, Properties, RasterSettings};
pub use diagram::{BarChart, CategoricalBarChart, Diagram};
pub use errors::{CanvasError, ConfigError, LayoutError, PartitionError, RasterizeError};
pub use rasterize::{BarChartRasterizer, LiteraryTable, Rasterizer, RasterizerRegistry};
pub use texture::{Texture, TextureTransform};
pub use types::Rect;

/// Rasterize one diagram with the built-in rasterizers.
///
/// Returns the canvas holding the drawn pages, or an error with diagnostics.
pub fn rasterize(settings: &CanvasSettings, diagram: &dyn Diagram) -> Result<RasterCanvas, miette::Report> {
    let canvas = RasterCanvas::new(settings)?;
    let mut registry = RasterizerRegistry::with_default_rasterizers(Arc::new(LiteraryTable));
    registry.set_canvas(canvas);
    registry.rasterize(diagram)?;
    let canvas = registry.take_canvas().ok_or(RasterizeError::NoCanvas)?;
    crate::log::info!(
        diagram = diagram.type_name(),
        pages = canvas.page_count(),
        "rasterized"
    );
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Margins;
    use crate::diagram::{DataPoint, PointList};

    fn settings() -> CanvasSettings {
        CanvasSettings {
            format: PageFormat::new(216.0, 279.0, Margins::uniform(6.0)),
            constraint: PrinterConstraint::unconstrained(),
            raster: RasterSettings::braille_6dot(),
        }
    }

    #[test]
    fn simple_bar_chart_end_to_end() {
        let chart = BarChart {
            categories: PointList::new(
                "sales",
                vec![DataPoint::named("apples", 0.0, 4.0), DataPoint::named("pears", 1.0, 9.0)],
            ),
            ..Default::default()
        };
        let canvas = rasterize(&settings(), &chart).unwrap();
        assert_eq!(canvas.page_count(), 2);
    }

    #[test]
    fn errors_become_reports() {
        let mut s = settings();
        s.format.margins.left = 500.0;
        let report = rasterize(&s, &BarChart::default()).unwrap_err();
        assert_eq!(report.to_string(), "margins exceed the page");
    }
}
