//! Horizontal grouped bar charts.
//!
//! Layout works on the canvas's cell rectangle and carves regions off it
//! with the partition operations of [`Rect`]:
//!
//! ```text
//! +--------------------------------+
//! | title (wrapped)                |
//! | y-axis name                    |
//! | c |pad| bars ... |origin| bars |
//! | c |   |          |      |      |
//! |   |   | x-axis, ticks, labels  |
//! | x-axis name                    |
//! +--------------------------------+
//! ```
//!
//! Bars are drawn in dot coordinates. Each bar is a top border, a texture
//! fill, an end cap at the value and a bottom border; the texture is aligned
//! to the origin so it grows outward on both sides of the zero line.

use std::sync::Arc;

use crate::canvas::RasterCanvas;
use crate::config::Properties;
use crate::defaults;
use crate::diagram::{BarChart, CategoricalBarChart};
use crate::errors::{ConfigError, LayoutContext, LayoutError, RasterizeError};
use crate::log::{debug, warn};
use crate::texture::{TextureTransform, catalog};
use crate::types::{NumericError, Rect};

use super::Rasterizer;
use super::axis::{XAxis, fit_scale, format_value};
use super::legend::{Explanation, Legend, LegendRasterizer};
use super::marks::{Draw, FillMark, LineMark, Mark};
use super::text::{BrailleTable, line_count, text_mark};

/// Cell geometry this rasterizer lays out for.
const CELL_WIDTH: usize = 2;
const CELL_HEIGHT: usize = 3;

/// Single-letter group captions.
const CAPTIONS: usize = 26;

/// Tunable layout values. Distances are in dots unless noted otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartSettings {
    pub min_thickness: usize,
    pub max_thickness: usize,
    pub bar_padding: usize,
    pub group_padding: usize,
    /// Cells between the caption column and the bars.
    pub caption_padding: usize,
    /// Lines the title may take.
    pub max_title_height: usize,
    pub unit_size: usize,
    /// Units between labelled ticks.
    pub tick_interval: usize,
    pub helper_line_min_gap: usize,
    pub missing_placeholder: String,
}

impl Default for BarChartSettings {
    fn default() -> Self {
        BarChartSettings {
            min_thickness: defaults::MIN_BAR_THICKNESS,
            max_thickness: defaults::MAX_BAR_THICKNESS,
            bar_padding: defaults::BAR_PADDING,
            group_padding: defaults::GROUP_PADDING,
            caption_padding: defaults::CAPTION_PADDING,
            max_title_height: defaults::MAX_TITLE_HEIGHT,
            unit_size: defaults::UNIT_SIZE,
            tick_interval: defaults::TICK_INTERVAL,
            helper_line_min_gap: defaults::HELPER_LINE_MIN_GAP,
            missing_placeholder: defaults::MISSING_PLACEHOLDER.to_string(),
        }
    }
}

impl BarChartSettings {
    /// Read `barchart.*` keys, falling back to the defaults.
    pub fn from_properties(props: &Properties) -> Result<Self, ConfigError> {
        let d = BarChartSettings::default();
        let unit_size = props.get_usize_or("barchart.unitSize", d.unit_size)?;
        if unit_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "barchart.unitSize".to_string(),
                reason: NumericError::Zero,
            });
        }
        let settings = BarChartSettings {
            min_thickness: props.get_usize_or("barchart.minThickness", d.min_thickness)?,
            max_thickness: props.get_usize_or("barchart.maxThickness", d.max_thickness)?,
            bar_padding: props.get_usize_or("barchart.barPadding", d.bar_padding)?,
            group_padding: props.get_usize_or("barchart.groupPadding", d.group_padding)?,
            caption_padding: props.get_usize_or("barchart.captionPadding", d.caption_padding)?,
            max_title_height: props.get_usize_or("barchart.maxTitleHeight", d.max_title_height)?,
            unit_size,
            tick_interval: props.get_usize_or("barchart.tickInterval", d.tick_interval)?,
            helper_line_min_gap: props
                .get_usize_or("barchart.helperLineMinGap", d.helper_line_min_gap)?,
            missing_placeholder: props
                .get_str_or("barchart.missingPlaceholder", &d.missing_placeholder)?
                .to_string(),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Reject thickness bounds no bar can be drawn with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_thickness == 0 {
            return Err(ConfigError::InvalidValue {
                key: "barchart.minThickness".to_string(),
                reason: NumericError::Zero,
            });
        }
        if self.min_thickness > self.max_thickness {
            return Err(ConfigError::InvalidRange {
                min_key: "barchart.minThickness".to_string(),
                max_key: "barchart.maxThickness".to_string(),
                min: self.min_thickness,
                max: self.max_thickness,
            });
        }
        Ok(())
    }
}

/// Full layout of one chart, computed without touching any page.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartPlan {
    pub axis: XAxis,
    /// Bar thickness in dots, borders included.
    pub thickness: usize,
    /// Region holding the bars, in cells.
    pub bar_area: Rect,
    pub marks: Vec<Mark>,
    pub legend: Legend,
    /// Legend marks, one list per legend page.
    pub legend_pages: Vec<Vec<Mark>>,
}

impl BarChartPlan {
    /// Placeholder texts drawn for missing values.
    pub fn placeholders<'a>(&'a self, placeholder: &'a str) -> impl Iterator<Item = (i64, i64)> + 'a {
        self.marks.iter().filter_map(move |m| match m {
            Mark::Text(t) if t.text == placeholder => Some((t.x, t.y)),
            _ => None,
        })
    }
}

/// Rasterizer for [`CategoricalBarChart`] and [`BarChart`].
#[derive(Debug, Clone)]
pub struct BarChartRasterizer {
    settings: BarChartSettings,
    table: Arc<dyn BrailleTable + Send + Sync>,
}

impl BarChartRasterizer {
    pub fn new(table: Arc<dyn BrailleTable + Send + Sync>) -> Self {
        Self::with_settings(table, BarChartSettings::default())
    }

    pub fn with_settings(table: Arc<dyn BrailleTable + Send + Sync>, settings: BarChartSettings) -> Self {
        BarChartRasterizer { settings, table }
    }

    pub fn settings(&self) -> &BarChartSettings {
        &self.settings
    }

    fn table(&self) -> &dyn BrailleTable {
        self.table.as_ref()
    }

    fn text(&self, content: &str, area: &Rect) -> Mark {
        text_mark(self.table(), content, area, CELL_WIDTH, CELL_HEIGHT).into()
    }

    /// Lay out `chart` on `canvas`.
    pub fn plan(&self, chart: &CategoricalBarChart, canvas: &RasterCanvas) -> Result<BarChartPlan, RasterizeError> {
        let (cw, ch) = (canvas.cell_width(), canvas.cell_height());
        if (cw, ch) != (CELL_WIDTH, CELL_HEIGHT) {
            return Err(RasterizeError::UnsupportedRaster {
                width: cw,
                height: ch,
                expected_width: CELL_WIDTH,
                expected_height: CELL_HEIGHT,
            });
        }
        let s = &self.settings;
        let textures = catalog();
        if chart.groups.len() > CAPTIONS {
            return Err(LayoutError::TooManyGroups {
                groups: chart.groups.len(),
                captions: CAPTIONS,
            }
            .into());
        }
        if chart.series_count() > textures.len() {
            return Err(LayoutError::TooManySeries {
                series: chart.series_count(),
                textures: textures.len(),
            }
            .into());
        }

        let mut marks = Vec::new();
        let mut rest = canvas.cell_area();

        // Title
        if let Some(title) = chart.labels.title.as_deref().filter(|t| !t.is_empty()) {
            let cells = self.table().measure(title);
            let rows = line_count(cells, rest.width as usize).unwrap_or(usize::MAX);
            if rows > s.max_title_height {
                return Err(LayoutError::TitleTooTall {
                    rows,
                    max_rows: s.max_title_height,
                }
                .into());
            }
            let (title_area, remaining) = rest.remove_from_top(rows as f64).in_layout("title")?;
            marks.push(self.text(title, &title_area));
            rest = remaining;
        }

        // Axis names and the x-axis
        let (y_name_area, remaining) = rest.remove_from_top(1.0).in_layout("y-axis name")?;
        let (x_name_area, remaining) = remaining.remove_from_bottom(1.0).in_layout("x-axis name")?;
        let (axis_area, remaining) = remaining
            .remove_from_bottom(defaults::X_AXIS_HEIGHT as f64)
            .in_layout("x-axis")?;
        if let Some(name) = &chart.labels.y_axis_name {
            marks.push(self.text(name, &y_name_area));
        }
        if let Some(name) = &chart.labels.x_axis_name {
            marks.push(self.text(name, &x_name_area));
        }

        // Captions
        let (caption_area, remaining) = remaining.remove_from_left(1.0).in_layout("group captions")?;
        let (_, bar_area) = remaining
            .remove_from_left(s.caption_padding as f64)
            .in_layout("caption padding")?;

        // Scale
        let negative_range = (-chart.min_value().unwrap_or(0.0)).max(0.0);
        let positive_range = chart.max_value().unwrap_or(0.0).max(0.0);
        let dots = canvas.to_dot_rectangle(&bar_area).to_int();
        let unit_size = s.unit_size.max(1);
        let units = (dots.width - 1).max(0) as usize / unit_size;
        let per_unit = fit_scale(negative_range, positive_range, units)
            .ok_or(LayoutError::NoAxisSpace { width: dots.width })?;
        let axis = XAxis::new(dots.x, units, unit_size, per_unit, negative_range, positive_range);
        debug!(per_unit, units, origin = axis.origin, "x-axis scale");

        // Thickness
        let groups = chart.groups.len();
        let series = chart.series_count();
        let bars = groups * series;
        let available_cells = bar_area.height.round() as usize;
        let required_cells = |thickness: usize| {
            let required = groups * s.group_padding + bars * thickness + bars.saturating_sub(groups) * s.bar_padding;
            required.div_ceil(ch)
        };
        let thickness = (s.min_thickness.max(1)..=s.max_thickness)
            .rev()
            .find(|&t| required_cells(t) <= available_cells)
            .ok_or(LayoutError::NoBarLayout {
                required_cells: required_cells(s.min_thickness),
                available_cells,
                min_thickness: s.min_thickness,
            })?;
        debug!(thickness, groups, bars, "bar thickness");

        let mut legend = Legend::new(chart.labels.title.clone());
        legend.add(
            chart.labels.x_axis_name.as_deref().unwrap_or("x-axis"),
            Explanation::Symbol {
                symbol: "1 unit".to_string(),
                text: format_value(per_unit),
            },
        );

        // Bars
        let caption_x = caption_area.x;
        let mut y = dots.y;
        for (g, group) in chart.groups.iter().enumerate() {
            y += s.group_padding as i64;
            let group_top = y;
            let mut nearest = axis.origin;
            for index in 0..series {
                let top = y;
                let bottom = top + thickness as i64 - 1;
                match group.points.get(index) {
                    Some(point) => {
                        let left = self.bar(&axis, point.y, index, top, bottom, &mut marks);
                        nearest = nearest.min(left);
                    }
                    None => {
                        let row = ((top + bottom) / 2).div_euclid(ch as i64);
                        let column = (axis.origin + 1).div_euclid(cw as i64) + 1;
                        let width = self.table().measure(&s.missing_placeholder).max(1);
                        let area = Rect::new(column as f64, row as f64, width as f64, 1.0);
                        marks.push(self.text(&s.missing_placeholder, &area));
                    }
                }
                y = bottom + 1;
                if index + 1 < series {
                    y += s.bar_padding as i64;
                }
            }
            let group_bottom = y - 1;

            let caption = char::from(b'a' + g as u8).to_string();
            let row = ((group_top + group_bottom) / 2).div_euclid(ch as i64);
            marks.push(self.text(&caption, &Rect::new(caption_x, row as f64, 1.0, 1.0)));
            let gap = nearest - dots.x;
            if gap > s.helper_line_min_gap as i64 {
                let line_y = row * ch as i64 + 1;
                marks.push(LineMark::horizontal(line_y, dots.x, nearest - 2).dashed(1, 1).into());
            }
            legend.add(
                "groups",
                Explanation::Symbol {
                    symbol: caption,
                    text: group.name.clone(),
                },
            );
        }

        // Axes
        let axis_y = axis_area.y.round() as i64 * ch as i64;
        marks.push(axis.y_axis(dots.y, axis_y));
        marks.extend(axis.marks(&axis_area, s.tick_interval, self.table(), cw, ch));
        for index in 0..series {
            legend.add(
                "series",
                Explanation::Texture {
                    texture: textures[index % textures.len()].clone(),
                    text: chart.series_name(index),
                },
            );
        }

        let legend_pages = LegendRasterizer::new(self.table()).plan(&legend, canvas.cell_area(), cw, ch)?;

        Ok(BarChartPlan {
            axis,
            thickness,
            bar_area,
            marks,
            legend,
            legend_pages,
        })
    }

    /// Marks for one bar. Returns the bar's leftmost dot column.
    ///
    /// A bar of zero length keeps its borders, collapsed onto the origin.
    fn bar(
        &self,
        axis: &XAxis,
        value: f64,
        series: usize,
        top: i64,
        bottom: i64,
        marks: &mut Vec<Mark>,
    ) -> i64 {
        let length = axis.length_of(value).max(0);
        let textures = catalog();
        let texture = &textures[series % textures.len()];
        let (start, end, fill) = if length == 0 {
            (axis.origin, axis.origin, None)
        } else if value < 0.0 {
            let end = axis.origin - length;
            let align = TextureTransform::translation(-(axis.origin - 1) as f64, -(top + 1) as f64)
                .compose(&TextureTransform::mirror_x());
            (axis.origin - 1, end, Some((end + 1, axis.origin - 1, align)))
        } else {
            let end = axis.origin + length;
            let align = TextureTransform::translation(-(axis.origin + 1) as f64, -(top + 1) as f64);
            (axis.origin + 1, end, Some((axis.origin + 1, end - 1, align)))
        };

        marks.push(LineMark::horizontal(top, start, end).into());
        let fill = fill.filter(|(left, right, _)| left <= right && bottom - top >= 2);
        if let Some((fill_left, fill_right, align)) = fill {
            let rect = Rect::new(
                fill_left as f64,
                (top + 1) as f64,
                (fill_right - fill_left + 1) as f64,
                (bottom - top - 1) as f64,
            );
            marks.push(
                FillMark {
                    rect: rect.to_int(),
                    texture: texture.compose_transform(&align),
                }
                .into(),
            );
        }
        marks.push(LineMark::vertical(end, top, bottom).into());
        marks.push(LineMark::horizontal(bottom, start, end).into());
        start.min(end)
    }

    /// Plan everything, then draw the chart on a blank page and the legend on
    /// the pages after it.
    fn draw(&self, chart: &CategoricalBarChart, canvas: &mut RasterCanvas) -> Result<(), RasterizeError> {
        let plan = self.plan(chart, canvas)?;
        let page = if canvas.current_page().is_blank() {
            canvas.current_page()
        } else {
            canvas.new_page()
        };
        let mut dropped: usize = plan.marks.iter().map(|mark| mark.draw(page)).sum();
        for marks in &plan.legend_pages {
            let page = canvas.new_page();
            dropped += marks.iter().map(|mark| mark.draw(page)).sum::<usize>();
        }
        debug!(legend_pages = plan.legend_pages.len(), "bar chart drawn");
        if dropped > 0 {
            warn!(dropped, "dots outside the page were dropped");
        }
        Ok(())
    }
}

impl Rasterizer<CategoricalBarChart> for BarChartRasterizer {
    fn rasterize(&self, chart: &CategoricalBarChart, canvas: &mut RasterCanvas) -> Result<(), RasterizeError> {
        self.draw(chart, canvas)
    }
}

impl Rasterizer<BarChart> for BarChartRasterizer {
    fn rasterize(&self, chart: &BarChart, canvas: &mut RasterCanvas) -> Result<(), RasterizeError> {
        self.draw(&CategoricalBarChart::from(chart), canvas)
    }
}
