//! Rasterizers and their registry.
//!
//! Diagrams stay plain data. A [`RasterizerRegistry`] maps each concrete
//! diagram type to the algorithm that draws it, and dispatches on the runtime
//! type of the diagram it is handed.
//!
//! - `marks`: dot-space drawing primitives
//! - `text`: braille translation and text placement
//! - `axis`: value axis scaling and ticks
//! - `legend`: legend pages
//! - `bar_chart`: grouped bar charts

pub mod axis;
pub mod bar_chart;
pub mod legend;
pub mod marks;
pub mod text;

pub use axis::{XAxis, fit_scale, nice_scale};
pub use bar_chart::{BarChartPlan, BarChartRasterizer, BarChartSettings};
pub use legend::{Explanation, ExplanationGroup, Legend, LegendRasterizer};
pub use marks::{Draw, FillMark, FrameMark, LineMark, Mark, TextMark};
pub use text::{BrailleCell, BrailleTable, LiteraryTable};

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::canvas::RasterCanvas;
use crate::diagram::{BarChart, CategoricalBarChart, Diagram};
use crate::errors::RasterizeError;
use crate::log::debug;

/// Draws diagrams of type `D` onto a raster canvas.
pub trait Rasterizer<D: Diagram> {
    fn rasterize(&self, diagram: &D, canvas: &mut RasterCanvas) -> Result<(), RasterizeError>;
}

impl<D, F> Rasterizer<D> for F
where
    D: Diagram,
    F: Fn(&D, &mut RasterCanvas) -> Result<(), RasterizeError>,
{
    fn rasterize(&self, diagram: &D, canvas: &mut RasterCanvas) -> Result<(), RasterizeError> {
        self(diagram, canvas)
    }
}

type ErasedRasterizer = Box<dyn Fn(&dyn Any, &mut RasterCanvas) -> Result<(), RasterizeError> + Send + Sync>;

struct Entry {
    diagram: &'static str,
    rasterize: ErasedRasterizer,
}

/// Type-keyed rasterizer lookup plus the canvas being drawn on.
#[derive(Default)]
pub struct RasterizerRegistry {
    rasterizers: HashMap<TypeId, Entry>,
    canvas: Option<RasterCanvas>,
}

impl RasterizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the built-in rasterizers, translating text with `table`.
    pub fn with_default_rasterizers(table: Arc<dyn BrailleTable + Send + Sync>) -> Self {
        let bar_chart = BarChartRasterizer::new(table);
        let mut registry = Self::new();
        registry
            .register::<CategoricalBarChart, _>(bar_chart.clone())
            .register::<BarChart, _>(bar_chart);
        registry
    }

    /// Use `rasterizer` for diagrams of type `D`, replacing any previous one.
    pub fn register<D, R>(&mut self, rasterizer: R) -> &mut Self
    where
        D: Diagram,
        R: Rasterizer<D> + Send + Sync + 'static,
    {
        let rasterize: ErasedRasterizer = Box::new(move |diagram: &dyn Any, canvas: &mut RasterCanvas| {
            match diagram.downcast_ref::<D>() {
                Some(diagram) => rasterizer.rasterize(diagram, canvas),
                None => Err(RasterizeError::NoRasterizer {
                    diagram: type_name::<D>(),
                }),
            }
        });
        let entry = Entry {
            diagram: type_name::<D>(),
            rasterize,
        };
        if self.rasterizers.insert(TypeId::of::<D>(), entry).is_some() {
            debug!(diagram = type_name::<D>(), "replaced rasterizer");
        }
        self
    }

    pub fn is_registered<D: Diagram>(&self) -> bool {
        self.rasterizers.contains_key(&TypeId::of::<D>())
    }

    /// Bind the canvas that subsequent calls draw on.
    pub fn set_canvas(&mut self, canvas: RasterCanvas) {
        self.canvas = Some(canvas);
    }

    pub fn canvas(&self) -> Option<&RasterCanvas> {
        self.canvas.as_ref()
    }

    pub fn canvas_mut(&mut self) -> Option<&mut RasterCanvas> {
        self.canvas.as_mut()
    }

    /// Unbind and return the canvas with everything drawn on it.
    pub fn take_canvas(&mut self) -> Option<RasterCanvas> {
        self.canvas.take()
    }

    /// Draw `diagram` with the rasterizer registered for its exact type.
    pub fn rasterize(&mut self, diagram: &dyn Diagram) -> Result<(), RasterizeError> {
        let canvas = self.canvas.as_mut().ok_or(RasterizeError::NoCanvas)?;
        let any = diagram.as_any();
        let entry = self
            .rasterizers
            .get(&any.type_id())
            .ok_or(RasterizeError::NoRasterizer {
                diagram: diagram.type_name(),
            })?;
        debug!(diagram = entry.diagram, "rasterizing");
        (entry.rasterize)(any, canvas)
    }
}

impl fmt::Debug for RasterizerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut diagrams: Vec<_> = self.rasterizers.values().map(|e| e.diagram).collect();
        diagrams.sort_unstable();
        f.debug_struct("RasterizerRegistry")
            .field("diagrams", &diagrams)
            .field("canvas", &self.canvas.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CanvasSettings, Margins, PageFormat, PrinterConstraint, RasterSettings};

    fn canvas() -> RasterCanvas {
        RasterCanvas::new(&CanvasSettings {
            format: PageFormat::new(216.0, 279.0, Margins::uniform(6.0)),
            constraint: PrinterConstraint::unconstrained(),
            raster: RasterSettings::braille_6dot(),
        })
        .unwrap()
    }

    fn mark_origin(_: &BarChart, canvas: &mut RasterCanvas) -> Result<(), RasterizeError> {
        canvas.current_page().set(0, 0, true);
        Ok(())
    }

    #[test]
    fn rasterize_needs_a_canvas() {
        let mut registry = RasterizerRegistry::new();
        registry.register::<BarChart, _>(mark_origin);
        assert_eq!(
            registry.rasterize(&BarChart::default()),
            Err(RasterizeError::NoCanvas)
        );
    }

    #[test]
    fn unregistered_type_is_rejected() {
        let mut registry = RasterizerRegistry::new();
        registry.register::<BarChart, _>(mark_origin);
        registry.set_canvas(canvas());
        let err = registry
            .rasterize(&CategoricalBarChart::default())
            .unwrap_err();
        assert!(matches!(
            err,
            RasterizeError::NoRasterizer { diagram } if diagram.ends_with("CategoricalBarChart")
        ));
    }

    #[test]
    fn closures_are_rasterizers() {
        let mut registry = RasterizerRegistry::new();
        registry.register::<BarChart, _>(mark_origin);
        registry.set_canvas(canvas());
        registry.rasterize(&BarChart::default()).unwrap();
        let canvas = registry.take_canvas().unwrap();
        assert!(canvas.pages().next().unwrap().get(0, 0));
        assert!(registry.canvas().is_none());
    }

    #[test]
    fn defaults_cover_both_bar_charts() {
        let registry = RasterizerRegistry::with_default_rasterizers(Arc::new(LiteraryTable));
        assert!(registry.is_registered::<BarChart>());
        assert!(registry.is_registered::<CategoricalBarChart>());
    }
}
