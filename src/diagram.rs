//! Diagram values handed to rasterizers.
//!
//! Diagrams are plain data produced by the data-source parsers. They carry no
//! rendering behavior; rasterizers are looked up by the diagram's concrete
//! type in a [`RasterizerRegistry`](crate::rasterize::RasterizerRegistry).

use std::any::Any;
use std::fmt;

/// Anything a rasterizer can be registered for.
pub trait Diagram: Any + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    /// Name of the concrete type, for error messages.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// One parsed data point.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    pub fn new(x: f64, y: f64) -> Self {
        DataPoint { name: None, x, y }
    }

    pub fn named(name: impl Into<String>, x: f64, y: f64) -> Self {
        DataPoint {
            name: Some(name.into()),
            x,
            y,
        }
    }
}

/// A named, ordered list of points.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointList {
    pub name: String,
    pub points: Vec<DataPoint>,
}

impl PointList {
    pub fn new(name: impl Into<String>, points: Vec<DataPoint>) -> Self {
        PointList {
            name: name.into(),
            points,
        }
    }

    /// A list whose points carry only y values, x being the position.
    pub fn from_values(name: impl Into<String>, values: &[f64]) -> Self {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, &y)| DataPoint::new(i as f64, y))
            .collect();
        PointList::new(name, points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn min_y(&self) -> Option<f64> {
        self.points.iter().map(|p| p.y).reduce(f64::min)
    }

    pub fn max_y(&self) -> Option<f64> {
        self.points.iter().map(|p| p.y).reduce(f64::max)
    }
}

/// Titles shared by all chart kinds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartLabels {
    pub title: Option<String>,
    pub x_axis_name: Option<String>,
    pub y_axis_name: Option<String>,
}

/// Bar chart with one bar per category.
///
/// Each point of `categories` is a category: `name` labels it, `y` is the value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarChart {
    pub labels: ChartLabels,
    pub categories: PointList,
}

impl Diagram for BarChart {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Grouped bar chart.
///
/// Every group is one category; its `i`-th point holds the value of series
/// `i`. Groups may be shorter than `series_names`, the missing trailing
/// series have no data in that group.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoricalBarChart {
    pub labels: ChartLabels,
    pub series_names: Vec<String>,
    pub groups: Vec<PointList>,
}

impl CategoricalBarChart {
    /// Series slots per group: the longest group or the named series, whichever is larger.
    pub fn series_count(&self) -> usize {
        self.groups
            .iter()
            .map(PointList::len)
            .max()
            .unwrap_or(0)
            .max(self.series_names.len())
    }

    pub fn bar_count(&self) -> usize {
        self.groups.len() * self.series_count()
    }

    pub fn min_value(&self) -> Option<f64> {
        self.groups.iter().filter_map(PointList::min_y).reduce(f64::min)
    }

    pub fn max_value(&self) -> Option<f64> {
        self.groups.iter().filter_map(PointList::max_y).reduce(f64::max)
    }

    /// Name of series `index`, falling back to its position.
    pub fn series_name(&self, index: usize) -> String {
        self.series_names
            .get(index)
            .cloned()
            .unwrap_or_else(|| format!("series {}", index + 1))
    }
}

impl From<&BarChart> for CategoricalBarChart {
    fn from(chart: &BarChart) -> Self {
        let series = if chart.categories.name.is_empty() {
            "values".to_string()
        } else {
            chart.categories.name.clone()
        };
        let groups = chart
            .categories
            .points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let name = point
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("category {}", i + 1));
                PointList::new(name, vec![DataPoint::new(0.0, point.y)])
            })
            .collect();
        CategoricalBarChart {
            labels: chart.labels.clone(),
            series_names: vec![series],
            groups,
        }
    }
}

impl Diagram for CategoricalBarChart {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart() -> CategoricalBarChart {
        CategoricalBarChart {
            labels: ChartLabels::default(),
            series_names: vec!["2023".into(), "2024".into()],
            groups: vec![
                PointList::from_values("north", &[3.0, -2.0]),
                PointList::from_values("south", &[7.5]),
            ],
        }
    }

    #[test]
    fn value_range() {
        let c = chart();
        assert_eq!(c.min_value(), Some(-2.0));
        assert_eq!(c.max_value(), Some(7.5));
        assert_eq!(c.series_count(), 2);
        assert_eq!(c.bar_count(), 4);
    }

    #[test]
    fn empty_chart_has_no_range() {
        let c = CategoricalBarChart::default();
        assert_eq!(c.min_value(), None);
        assert_eq!(c.series_count(), 0);
    }

    #[test]
    fn unnamed_series_fall_back_to_position() {
        let c = chart();
        assert_eq!(c.series_name(1), "2024");
        assert_eq!(c.series_name(2), "series 3");
    }

    #[test]
    fn simple_chart_becomes_one_series_per_group() {
        let simple = BarChart {
            labels: ChartLabels::default(),
            categories: PointList::new(
                "sales",
                vec![DataPoint::named("apples", 0.0, 4.0), DataPoint::new(1.0, 2.0)],
            ),
        };
        let grouped = CategoricalBarChart::from(&simple);
        assert_eq!(grouped.series_names, vec!["sales".to_string()]);
        assert_eq!(grouped.groups[0].name, "apples");
        assert_eq!(grouped.groups[1].name, "category 2");
        assert_eq!(grouped.groups[1].points[0].y, 2.0);
    }

    #[test]
    fn type_name_reports_concrete_type() {
        let d: &dyn Diagram = &BarChart::default();
        assert!(d.type_name().ends_with("BarChart"));
    }
}
