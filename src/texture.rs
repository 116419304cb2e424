//! Periodic dot textures for filling bars on a monochrome medium.
//!
//! A [`Texture`] pairs a shared, immutable [`Pattern`] with a
//! [`TextureTransform`]. Sampling applies the translation, then the 2x2
//! linear map, floors to the lattice and wraps modulo the pattern size, so it
//! is total for any coordinate.
//!
//! The catalog holds a handful of base textures. Per-series variants are made
//! by attaching a transform at use time; the pattern arrays are never copied.

use std::fmt;
use std::sync::{Arc, LazyLock};

use glam::{DMat2, DVec2, dvec2};

/// A rectangular boolean pattern, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Pattern {
    width: usize,
    height: usize,
    dots: Vec<bool>,
}

impl Pattern {
    /// Parse rows of `X` (raised) and `.` (flat), separated by newlines.
    ///
    /// Returns `None` for an empty or ragged pattern.
    pub fn parse(rows: &str) -> Option<Pattern> {
        let rows: Vec<&str> = rows.lines().map(str::trim).filter(|r| !r.is_empty()).collect();
        let width = rows.first()?.chars().count();
        if width == 0 || rows.iter().any(|r| r.chars().count() != width) {
            return None;
        }
        let dots = rows
            .iter()
            .flat_map(|r| r.chars().map(|c| c == 'X'))
            .collect();
        Some(Pattern {
            width,
            height: rows.len(),
            dots,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Lattice lookup with Euclidean wrap-around.
    pub fn get(&self, x: i64, y: i64) -> bool {
        let col = x.rem_euclid(self.width as i64) as usize;
        let row = y.rem_euclid(self.height as i64) as usize;
        self.dots[row * self.width + col]
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<String> = self
            .dots
            .chunks(self.width)
            .map(|row| row.iter().map(|&d| if d { 'X' } else { '.' }).collect())
            .collect();
        f.debug_tuple("Pattern").field(&rows.join("/")).finish()
    }
}

/// Translation followed by a 2x2 linear map.
///
/// Composition adds translations and multiplies the linear parts, which is
/// what lets a series texture accumulate rotation and alignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureTransform {
    pub translation: DVec2,
    pub linear: DMat2,
}

impl Default for TextureTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TextureTransform {
    pub const IDENTITY: TextureTransform = TextureTransform {
        translation: DVec2::ZERO,
        linear: DMat2::IDENTITY,
    };

    /// From `[tx, ty, a, b, c, d]`, where the linear part is `[[a, b], [c, d]]`.
    pub fn from_array(v: [f64; 6]) -> Self {
        TextureTransform {
            translation: dvec2(v[0], v[1]),
            linear: DMat2::from_cols(dvec2(v[2], v[4]), dvec2(v[3], v[5])),
        }
    }

    pub fn to_array(&self) -> [f64; 6] {
        let m = self.linear;
        [
            self.translation.x,
            self.translation.y,
            m.x_axis.x,
            m.y_axis.x,
            m.x_axis.y,
            m.y_axis.y,
        ]
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        TextureTransform {
            translation: dvec2(dx, dy),
            linear: DMat2::IDENTITY,
        }
    }

    /// Exact rotation by `quarter_turns * 90°`.
    pub fn rotation(quarter_turns: i32) -> Self {
        let (cos, sin) = match quarter_turns.rem_euclid(4) {
            0 => (1.0, 0.0),
            1 => (0.0, 1.0),
            2 => (-1.0, 0.0),
            _ => (0.0, -1.0),
        };
        TextureTransform::from_array([0.0, 0.0, cos, -sin, sin, cos])
    }

    /// Mirror along the x axis (x becomes -x).
    pub fn mirror_x() -> Self {
        TextureTransform::from_array([0.0, 0.0, -1.0, 0.0, 0.0, 1.0])
    }

    pub fn compose(&self, other: &TextureTransform) -> TextureTransform {
        TextureTransform {
            translation: self.translation + other.translation,
            linear: self.linear * other.linear,
        }
    }

    pub fn apply(&self, p: DVec2) -> DVec2 {
        self.linear * (p + self.translation)
    }
}

/// A pattern sampled through a transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    name: &'static str,
    pattern: Arc<Pattern>,
    transform: TextureTransform,
}

impl Texture {
    pub fn new(name: &'static str, pattern: Pattern) -> Self {
        Texture {
            name,
            pattern: Arc::new(pattern),
            transform: TextureTransform::IDENTITY,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn transform(&self) -> &TextureTransform {
        &self.transform
    }

    /// Same pattern, transform replaced.
    pub fn with_transform(&self, transform: TextureTransform) -> Texture {
        Texture {
            name: self.name,
            pattern: Arc::clone(&self.pattern),
            transform,
        }
    }

    /// Same pattern, `transform` composed onto the current one.
    pub fn compose_transform(&self, transform: &TextureTransform) -> Texture {
        self.with_transform(self.transform.compose(transform))
    }

    pub fn shares_pattern_with(&self, other: &Texture) -> bool {
        Arc::ptr_eq(&self.pattern, &other.pattern)
    }

    pub fn value_at(&self, x: i64, y: i64) -> bool {
        let p = self.transform.apply(dvec2(x as f64, y as f64)).floor();
        self.pattern.get(p.x as i64, p.y as i64)
    }

    /// ASCII rendering of a `width` x `height` window starting at the origin.
    pub fn render(&self, width: i64, height: i64) -> String {
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| if self.value_at(x, y) { 'X' } else { '.' })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn base(name: &'static str, rows: &str) -> Texture {
    match Pattern::parse(rows) {
        Some(pattern) => Texture::new(name, pattern),
        // Catalog literals are fixed; an unparsable one degrades to a single raised dot.
        None => Texture::new(
            name,
            Pattern {
                width: 1,
                height: 1,
                dots: vec![true],
            },
        ),
    }
}

static CATALOG: LazyLock<Vec<Texture>> = LazyLock::new(|| {
    let diagonal = base("diagonal", "X..\n.X.\n..X");
    let vertical = base("vertical lines", "X.");
    let anti_diagonal = Texture {
        name: "anti-diagonal",
        ..diagonal.with_transform(TextureTransform::rotation(1))
    };
    let horizontal = Texture {
        name: "horizontal lines",
        ..vertical.with_transform(TextureTransform::rotation(1))
    };
    vec![
        diagonal,
        vertical,
        base("checker", "X.\n.X"),
        anti_diagonal,
        base("dotted grid", "X..\n..."),
        horizontal,
    ]
});

/// Textures available for distinguishing data series, in assignment order.
pub fn catalog() -> &'static [Texture] {
    &CATALOG
}
