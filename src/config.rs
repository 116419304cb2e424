//! Typed settings for a rasterizing session.
//!
//! Configuration files are parsed elsewhere; what arrives here is a flat
//! [`Properties`] set per concern (printer, format, diagram). This module
//! turns those into the immutable settings structs the canvas and the
//! rasterizers consume.

use std::collections::HashMap;
use std::fmt;

use crate::errors::ConfigError;
use crate::types::{non_negative, positive};

/// A single property value as delivered by the configuration parser.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Double(f64),
    Integer(i64),
    Bool(bool),
    Text(String),
}

impl PropertyValue {
    fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Double(_) => "double",
            PropertyValue::Integer(_) => "integer",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Text(_) => "text",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Double(v) => write!(f, "{v}"),
            PropertyValue::Integer(v) => write!(f, "{v}"),
            PropertyValue::Bool(v) => write!(f, "{v}"),
            PropertyValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Double(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Integer(v)
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_string())
    }
}

/// Flat key/value property set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: HashMap<String, PropertyValue>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    fn require(&self, key: &str) -> Result<&PropertyValue, ConfigError> {
        self.values.get(key).ok_or_else(|| ConfigError::Missing {
            key: key.to_string(),
        })
    }

    fn wrong_type(key: &str, expected: &'static str, found: &PropertyValue) -> ConfigError {
        ConfigError::WrongType {
            key: key.to_string(),
            expected,
            found: found.type_name(),
        }
    }

    /// Numeric property; integers are widened.
    pub fn get_f64(&self, key: &str) -> Result<f64, ConfigError> {
        match self.require(key)? {
            PropertyValue::Double(v) => Ok(*v),
            PropertyValue::Integer(v) => Ok(*v as f64),
            other => Err(Self::wrong_type(key, "double", other)),
        }
    }

    pub fn get_f64_or(&self, key: &str, default: f64) -> Result<f64, ConfigError> {
        if self.contains(key) {
            self.get_f64(key)
        } else {
            Ok(default)
        }
    }

    /// Optional numeric property: absent means `None`, present must be numeric.
    pub fn get_f64_opt(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        if self.contains(key) {
            self.get_f64(key).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Count-like property. Negative integers are rejected.
    pub fn get_usize(&self, key: &str) -> Result<usize, ConfigError> {
        match self.require(key)? {
            PropertyValue::Integer(v) => usize::try_from(*v).map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                reason: crate::types::NumericError::Negative,
            }),
            other => Err(Self::wrong_type(key, "integer", other)),
        }
    }

    pub fn get_usize_or(&self, key: &str, default: usize) -> Result<usize, ConfigError> {
        if self.contains(key) {
            self.get_usize(key)
        } else {
            Ok(default)
        }
    }

    pub fn get_usize_opt(&self, key: &str) -> Result<Option<usize>, ConfigError> {
        if self.contains(key) {
            self.get_usize(key).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, ConfigError> {
        match self.require(key)? {
            PropertyValue::Bool(v) => Ok(*v),
            other => Err(Self::wrong_type(key, "bool", other)),
        }
    }

    pub fn get_str(&self, key: &str) -> Result<&str, ConfigError> {
        match self.require(key)? {
            PropertyValue::Text(v) => Ok(v),
            other => Err(Self::wrong_type(key, "text", other)),
        }
    }

    pub fn get_str_or<'a>(&'a self, key: &str, default: &'a str) -> Result<&'a str, ConfigError> {
        if self.contains(key) {
            self.get_str(key)
        } else {
            Ok(default)
        }
    }

    fn non_negative_f64(&self, key: &str) -> Result<f64, ConfigError> {
        non_negative(self.get_f64(key)?).map_err(|reason| ConfigError::InvalidValue {
            key: key.to_string(),
            reason,
        })
    }

    fn positive_f64(&self, key: &str) -> Result<f64, ConfigError> {
        positive(self.get_f64(key)?).map_err(|reason| ConfigError::InvalidValue {
            key: key.to_string(),
            reason,
        })
    }

    fn non_negative_f64_opt(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        if self.contains(key) {
            self.non_negative_f64(key).map(Some)
        } else {
            Ok(None)
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// Page margins in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl Margins {
    pub const fn uniform(mm: f64) -> Self {
        Margins {
            top: mm,
            left: mm,
            bottom: mm,
            right: mm,
        }
    }
}

/// Paper size and margins: the content side of the printable area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFormat {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl PageFormat {
    pub const fn new(width: f64, height: f64, margins: Margins) -> Self {
        PageFormat {
            width,
            height,
            margins,
        }
    }

    /// Read `page.*` and `margin.*` keys. Margins default to zero.
    pub fn from_properties(format: &Properties) -> Result<Self, ConfigError> {
        Ok(PageFormat {
            width: format.positive_f64("page.width")?,
            height: format.positive_f64("page.height")?,
            margins: Margins {
                top: format.non_negative_f64_opt("margin.top")?.unwrap_or(0.0),
                left: format.non_negative_f64_opt("margin.left")?.unwrap_or(0.0),
                bottom: format.non_negative_f64_opt("margin.bottom")?.unwrap_or(0.0),
                right: format.non_negative_f64_opt("margin.right")?.unwrap_or(0.0),
            },
        })
    }
}

/// Device constraint in millimeters. Missing width or height means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PrinterConstraint {
    pub left: f64,
    pub top: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl PrinterConstraint {
    pub fn unconstrained() -> Self {
        Self::default()
    }

    pub fn from_properties(printer: &Properties) -> Result<Self, ConfigError> {
        Ok(PrinterConstraint {
            left: printer.non_negative_f64_opt("constraint.left")?.unwrap_or(0.0),
            top: printer.non_negative_f64_opt("constraint.top")?.unwrap_or(0.0),
            width: printer.non_negative_f64_opt("constraint.width")?,
            height: printer.non_negative_f64_opt("constraint.height")?,
        })
    }
}

/// Device constraint expressed in whole cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RasterConstraint {
    pub left: usize,
    pub top: usize,
    pub width: Option<usize>,
    pub height: Option<usize>,
}

/// Cell geometry and dot spacing of a raster printer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSettings {
    /// Dots per cell, horizontally.
    pub cell_width: usize,
    /// Dots per cell, vertically.
    pub cell_height: usize,
    pub horizontal_dot_distance: f64,
    pub vertical_dot_distance: f64,
    pub horizontal_cell_distance: f64,
    pub vertical_cell_distance: f64,
    pub constraint: RasterConstraint,
}

impl RasterSettings {
    /// Standard 6-dot braille with common embosser spacing.
    pub fn braille_6dot() -> Self {
        RasterSettings {
            cell_width: 2,
            cell_height: 3,
            horizontal_dot_distance: 2.5,
            vertical_dot_distance: 2.5,
            horizontal_cell_distance: 3.5,
            vertical_cell_distance: 5.0,
            constraint: RasterConstraint::default(),
        }
    }

    pub fn from_properties(printer: &Properties) -> Result<Self, ConfigError> {
        let raster_type = printer.get_str_or("raster.type", "6-dot")?;
        let (cell_width, cell_height) = match raster_type {
            "6-dot" => (2, 3),
            "8-dot" => (2, 4),
            "1-dot" => (1, 1),
            other => {
                return Err(ConfigError::UnknownRasterType {
                    value: other.to_string(),
                });
            }
        };
        Ok(RasterSettings {
            cell_width,
            cell_height,
            horizontal_dot_distance: printer.positive_f64("raster.dotDistance.horizontal")?,
            vertical_dot_distance: printer.positive_f64("raster.dotDistance.vertical")?,
            horizontal_cell_distance: printer.positive_f64("raster.cellDistance.horizontal")?,
            vertical_cell_distance: printer.positive_f64("raster.cellDistance.vertical")?,
            constraint: RasterConstraint {
                left: printer.get_usize_or("raster.constraint.left", 0)?,
                top: printer.get_usize_or("raster.constraint.top", 0)?,
                width: printer.get_usize_opt("raster.constraint.width")?,
                height: printer.get_usize_opt("raster.constraint.height")?,
            },
        })
    }
}

/// Everything a raster canvas needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasSettings {
    pub format: PageFormat,
    pub constraint: PrinterConstraint,
    pub raster: RasterSettings,
}

impl CanvasSettings {
    pub fn from_properties(printer: &Properties, format: &Properties) -> Result<Self, ConfigError> {
        Ok(CanvasSettings {
            format: PageFormat::from_properties(format)?,
            constraint: PrinterConstraint::from_properties(printer)?,
            raster: RasterSettings::from_properties(printer)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NumericError;

    fn printer() -> Properties {
        Properties::new()
            .with("raster.type", "6-dot")
            .with("raster.dotDistance.horizontal", 2.5)
            .with("raster.dotDistance.vertical", 2.5)
            .with("raster.cellDistance.horizontal", 3.5)
            .with("raster.cellDistance.vertical", 5.0)
    }

    fn format() -> Properties {
        Properties::new()
            .with("page.width", 216i64)
            .with("page.height", 279i64)
            .with("margin.top", 6.0)
            .with("margin.left", 6.0)
            .with("margin.bottom", 6.0)
            .with("margin.right", 6.0)
    }

    #[test]
    fn integers_widen_to_doubles() {
        let props = Properties::new().with("n", 3i64);
        assert_eq!(props.get_f64("n"), Ok(3.0));
    }

    #[test]
    fn missing_and_mistyped_properties() {
        let props = Properties::new().with("flag", true);
        assert_eq!(
            props.get_f64("nope"),
            Err(ConfigError::Missing {
                key: "nope".to_string()
            })
        );
        assert_eq!(
            props.get_f64("flag"),
            Err(ConfigError::WrongType {
                key: "flag".to_string(),
                expected: "double",
                found: "bool",
            })
        );
        assert_eq!(props.get_bool("flag"), Ok(true));
    }

    #[test]
    fn defaults_apply_only_when_absent() {
        let props = Properties::new().with("a", 2i64);
        assert_eq!(props.get_usize_or("a", 9), Ok(2));
        assert_eq!(props.get_usize_or("b", 9), Ok(9));
        assert_eq!(props.get_str_or("c", "x"), Ok("x"));
    }

    #[test]
    fn negative_count_is_rejected() {
        let props = Properties::new().with("n", -1i64);
        assert!(matches!(
            props.get_usize("n"),
            Err(ConfigError::InvalidValue {
                reason: NumericError::Negative,
                ..
            })
        ));
    }

    #[test]
    fn canvas_settings_from_properties() {
        let settings = CanvasSettings::from_properties(&printer(), &format()).unwrap();
        assert_eq!(settings.format.width, 216.0);
        assert_eq!(settings.format.margins, Margins::uniform(6.0));
        assert_eq!(settings.constraint, PrinterConstraint::unconstrained());
        assert_eq!(settings.raster, RasterSettings::braille_6dot());
    }

    #[test]
    fn printer_constraint_is_optional_per_axis() {
        let props = printer()
            .with("constraint.left", 10.0)
            .with("constraint.width", 100.0);
        let c = PrinterConstraint::from_properties(&props).unwrap();
        assert_eq!(c.left, 10.0);
        assert_eq!(c.width, Some(100.0));
        assert_eq!(c.height, None);
    }

    #[test]
    fn eight_dot_raster_type() {
        let props = printer().with("raster.type", "8-dot");
        let raster = RasterSettings::from_properties(&props).unwrap();
        assert_eq!((raster.cell_width, raster.cell_height), (2, 4));
    }

    #[test]
    fn unknown_raster_type() {
        let props = printer().with("raster.type", "12-dot");
        assert!(matches!(
            RasterSettings::from_properties(&props),
            Err(ConfigError::UnknownRasterType { .. })
        ));
    }

    #[test]
    fn zero_dot_distance_is_invalid() {
        let props = printer().with("raster.dotDistance.vertical", 0.0);
        assert!(matches!(
            RasterSettings::from_properties(&props),
            Err(ConfigError::InvalidValue {
                reason: NumericError::Zero,
                ..
            })
        ));
    }
}
