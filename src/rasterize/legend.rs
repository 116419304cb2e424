//! Legend pages: explanations of symbols and textures used in a chart.

use crate::canvas::RasterCanvas;
use crate::defaults::SWATCH_WIDTH;
use crate::errors::{LayoutContext, LayoutError};
use crate::log::debug;
use crate::texture::{Texture, TextureTransform};
use crate::types::Rect;

use super::marks::{Draw, FillMark, FrameMark, Mark};
use super::text::{BrailleTable, line_count, text_mark};

/// Cell rows of a texture swatch.
const SWATCH_HEIGHT: usize = 2;

/// One legend line.
#[derive(Debug, Clone, PartialEq)]
pub enum Explanation {
    /// A symbol printed in the chart and its meaning.
    Symbol { symbol: String, text: String },
    /// A fill texture shown as a swatch next to its meaning.
    Texture { texture: Texture, text: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExplanationGroup {
    pub name: String,
    pub entries: Vec<Explanation>,
}

/// Named groups of explanations, kept in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Legend {
    pub title: Option<String>,
    groups: Vec<ExplanationGroup>,
}

impl Legend {
    pub fn new(title: Option<String>) -> Self {
        Legend {
            title,
            groups: Vec::new(),
        }
    }

    /// The group called `name`, appended when it does not exist yet.
    pub fn group_mut(&mut self, name: &str) -> &mut ExplanationGroup {
        let index = match self.groups.iter().position(|g| g.name == name) {
            Some(index) => index,
            None => {
                self.groups.push(ExplanationGroup {
                    name: name.to_string(),
                    entries: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    pub fn add(&mut self, group: &str, explanation: Explanation) {
        self.group_mut(group).entries.push(explanation);
    }

    pub fn groups(&self) -> &[ExplanationGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.entries.is_empty())
    }
}

/// Cell rows handed out top to bottom, continuing on a new page when the
/// current one fills up.
struct Flow {
    area: Rect,
    rest: Rect,
    pages: Vec<Vec<Mark>>,
}

impl Flow {
    fn new(area: Rect) -> Self {
        Flow {
            area,
            rest: area,
            pages: vec![Vec::new()],
        }
    }

    /// The next `rows` full-width rows. Fails only when they do not fit on
    /// an empty page either.
    fn take(&mut self, rows: usize) -> Result<Rect, LayoutError> {
        let rows = rows as f64;
        if rows > self.rest.height && self.rest.height < self.area.height {
            self.break_page();
        }
        let (slice, rest) = self.rest.remove_from_top(rows).in_layout("legend")?;
        self.rest = rest;
        Ok(slice)
    }

    /// A blank separator row, dropped at a page break.
    fn skip(&mut self) {
        match self.rest.remove_from_top(1.0) {
            Ok((_, rest)) => self.rest = rest,
            Err(_) => self.break_page(),
        }
    }

    fn break_page(&mut self) {
        self.pages.push(Vec::new());
        self.rest = self.area;
    }

    fn push(&mut self, mark: Mark) {
        if let Some(page) = self.pages.last_mut() {
            page.push(mark);
        }
    }

    fn finish(mut self) -> Vec<Vec<Mark>> {
        self.pages.retain(|page| !page.is_empty());
        self.pages
    }
}

/// Lays out a [`Legend`] top to bottom on pages of its own.
#[derive(Debug, Clone, Copy)]
pub struct LegendRasterizer<'a> {
    table: &'a dyn BrailleTable,
}

impl<'a> LegendRasterizer<'a> {
    pub fn new(table: &'a dyn BrailleTable) -> Self {
        LegendRasterizer { table }
    }

    /// Marks for `legend`, one list per page, each page spanning `area` (cells).
    pub fn plan(
        &self,
        legend: &Legend,
        area: Rect,
        cell_width: usize,
        cell_height: usize,
    ) -> Result<Vec<Vec<Mark>>, LayoutError> {
        let mut flow = Flow::new(area);
        let (cw, ch) = (cell_width, cell_height);
        if let Some(title) = &legend.title {
            self.line(&mut flow, title, cw, ch)?;
            flow.skip();
        }
        for (i, group) in legend.groups.iter().filter(|g| !g.entries.is_empty()).enumerate() {
            if i > 0 {
                flow.skip();
            }
            self.line(&mut flow, &group.name, cw, ch)?;
            for entry in &group.entries {
                match entry {
                    Explanation::Symbol { symbol, text } => {
                        self.line(&mut flow, &format!("{symbol}: {text}"), cw, ch)?
                    }
                    Explanation::Texture { texture, text } => {
                        self.swatch(&mut flow, texture, text, cw, ch)?
                    }
                }
            }
        }
        Ok(flow.finish())
    }

    /// Wrapped text taking as many full-width lines as it needs.
    fn line(
        &self,
        flow: &mut Flow,
        content: &str,
        cell_width: usize,
        cell_height: usize,
    ) -> Result<(), LayoutError> {
        let lines = line_count(self.table.measure(content), flow.area.width as usize).unwrap_or(1);
        let line = flow.take(lines)?;
        flow.push(text_mark(self.table, content, &line, cell_width, cell_height).into());
        Ok(())
    }

    /// A framed texture sample with its meaning to the right.
    fn swatch(
        &self,
        flow: &mut Flow,
        texture: &Texture,
        meaning: &str,
        cell_width: usize,
        cell_height: usize,
    ) -> Result<(), LayoutError> {
        let text_width = flow.area.width - (SWATCH_WIDTH + 1) as f64;
        let lines = if text_width >= 1.0 {
            line_count(self.table.measure(meaning), text_width as usize).unwrap_or(1)
        } else {
            1
        };
        let row = flow.take(lines.max(SWATCH_HEIGHT))?;
        let (sample, label) = row.remove_from_left(SWATCH_WIDTH as f64).in_layout("legend")?;
        let (_, label) = label.remove_from_left(1.0).in_layout("legend")?;

        let frame = Rect::new(sample.x, sample.y, sample.width, SWATCH_HEIGHT as f64)
            .scaled_by(cell_width as f64, cell_height as f64);
        let inner = Rect::new(frame.x + 1.0, frame.y + 1.0, frame.width - 2.0, frame.height - 2.0);
        let align = TextureTransform::translation(-inner.x, -inner.y);
        flow.push(FrameMark { rect: frame.to_int() }.into());
        flow.push(
            FillMark {
                rect: inner.to_int(),
                texture: texture.compose_transform(&align),
            }
            .into(),
        );
        flow.push(text_mark(self.table, meaning, &label, cell_width, cell_height).into());
        Ok(())
    }

    /// Draw `legend` on freshly appended pages of `canvas`.
    pub fn rasterize(&self, legend: &Legend, canvas: &mut RasterCanvas) -> Result<(), LayoutError> {
        let pages = self.plan(
            legend,
            canvas.cell_area(),
            canvas.cell_width(),
            canvas.cell_height(),
        )?;
        debug!(groups = legend.groups().len(), pages = pages.len(), "legend pages");
        for marks in &pages {
            let page = canvas.new_page();
            for mark in marks {
                mark.draw(page);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Page;
    use crate::rasterize::text::LiteraryTable;
    use crate::texture::catalog;

    #[test]
    fn groups_keep_insertion_order() {
        let mut legend = Legend::new(None);
        legend.add(
            "series",
            Explanation::Symbol {
                symbol: "x".into(),
                text: "one".into(),
            },
        );
        legend.group_mut("groups");
        legend.add(
            "series",
            Explanation::Symbol {
                symbol: "y".into(),
                text: "two".into(),
            },
        );
        let names: Vec<&str> = legend.groups().iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["series", "groups"]);
        assert_eq!(legend.groups()[0].entries.len(), 2);
    }

    #[test]
    fn swatch_is_framed_and_filled() {
        let mut legend = Legend::new(None);
        legend.add(
            "s",
            Explanation::Texture {
                texture: catalog()[2].clone(),
                text: "x".into(),
            },
        );
        let pages = LegendRasterizer::new(&LiteraryTable)
            .plan(&legend, Rect::new(0.0, 0.0, 6.0, 4.0), 2, 3)
            .unwrap();
        assert_eq!(pages.len(), 1);
        let mut page = Page::new(12, 12);
        for mark in &pages[0] {
            mark.draw(&mut page);
        }
        // heading on the first line, swatch and meaning below it
        insta::assert_snapshot!(page.window_ascii(0, 3, 10, 6), @r"
        XXXXXX..XX
        XX.X.X....
        X.X.XX..XX
        XX.X.X....
        X.X.XX....
        XXXXXX....
        ");
    }

    #[test]
    fn overflow_is_a_layout_error() {
        let mut legend = Legend::new(Some("a long legend title".into()));
        legend.add(
            "g",
            Explanation::Symbol {
                symbol: "a".into(),
                text: "b".into(),
            },
        );
        let err = LegendRasterizer::new(&LiteraryTable)
            .plan(&legend, Rect::new(0.0, 0.0, 5.0, 3.0), 2, 3)
            .unwrap_err();
        assert!(matches!(err, LayoutError::Partition { context: "legend", .. }));
    }

    #[test]
    fn long_legend_continues_on_next_page() {
        let mut legend = Legend::new(None);
        for symbol in ["a", "b", "c", "d", "e"] {
            legend.add(
                "g",
                Explanation::Symbol {
                    symbol: symbol.into(),
                    text: "x".into(),
                },
            );
        }
        let pages = LegendRasterizer::new(&LiteraryTable)
            .plan(&legend, Rect::new(0.0, 0.0, 10.0, 3.0), 2, 3)
            .unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 3);
        assert_eq!(pages[1].len(), 3);
        let first_on_second_page = match &pages[1][0] {
            Mark::Text(t) => t.text.as_str(),
            other => panic!("unexpected mark {other:?}"),
        };
        assert_eq!(first_on_second_page, "c: x");
        assert!(matches!(&pages[1][0], Mark::Text(t) if t.y == 0));
    }
}
