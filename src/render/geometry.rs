// src/render/geometry.rs

//! Box sizing, coordinate normalization and anchor selection.
//!
//! All values here live in the normalized `[0, 1]` drawing space; the SVG
//! writer scales them up by [`RenderOptions::scale`].

use crate::render::RenderOptions;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    pub fn midpoint(&self, other: &Point) -> Self {
        Self::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// Side of a node box an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Right,
    Top,
    Left,
    Bottom,
}

impl Face {
    /// Anchor position as a fraction of the box size, from its top-left.
    pub fn fraction(self) -> (f64, f64) {
        match self {
            Face::Right => (1.0, 0.5),
            Face::Top => (0.5, 0.0),
            Face::Left => (0.0, 0.5),
            Face::Bottom => (0.5, 1.0),
        }
    }
}

/// Estimated label box size from line count and longest line.
pub fn label_size(text: &str, options: &RenderOptions) -> Size {
    let lines: Vec<&str> = text.split('\n').collect();
    let widest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let glyph = options.font_size / options.scale;
    Size {
        width: widest as f64 * glyph,
        height: lines.len() as f64 * glyph * options.line_spacing,
    }
}

/// Min-max normalize each axis independently into `[0, 1]`.
///
/// An axis with no spread maps every point to `0.5`.
pub fn normalize(points: &[Point]) -> Vec<Point> {
    let axis = |get: fn(&Point) -> f64| {
        points.iter().map(get).fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
    };
    let (xmin, xmax) = axis(|p| p.x);
    let (ymin, ymax) = axis(|p| p.y);

    let scale = |v: f64, lo: f64, hi: f64| {
        let span = hi - lo;
        if span > f64::EPSILON { (v - lo) / span } else { 0.5 }
    };

    points
        .iter()
        .map(|p| Point::new(scale(p.x, xmin, xmax), scale(p.y, ymin, ymax)))
        .collect()
}

/// Move a box's top-left corner so the whole box stays inside
/// `[padding, 1 - padding]` on both axes.
pub fn clip(corner: Point, size: Size, padding: f64) -> Point {
    let fit = |a: f64, extent: f64| {
        if a + extent > 1.0 - padding {
            1.0 - padding - extent
        } else if a < padding {
            padding
        } else {
            a
        }
    };
    Point::new(fit(corner.x, size.width), fit(corner.y, size.height))
}

/// Face of the box centred at `from` that points towards `to`.
///
/// The circle is cut into four 90° sectors offset by 45°. SVG's y axis
/// points down, so it is flipped before taking the angle.
pub fn face_towards(from: Point, to: Point) -> Face {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let degrees = ((-dy).atan2(dx).to_degrees() + 45.0).rem_euclid(360.0);
    match (degrees / 90.0).floor() as i64 {
        0 => Face::Right,
        1 => Face::Top,
        2 => Face::Left,
        _ => Face::Bottom,
    }
}

/// Anchor point on the given face of a box.
pub fn anchor(corner: Point, size: Size, face: Face) -> Point {
    let (fx, fy) = face.fraction();
    Point::new(corner.x + size.width * fx, corner.y + size.height * fy)
}

/// Centre of a box.
pub fn center(corner: Point, size: Size) -> Point {
    Point::new(corner.x + size.width * 0.5, corner.y + size.height * 0.5)
}

/// Rotation for an edge label so it reads along the edge, flipped when the
/// edge points leftwards so the text is never upside down.
pub fn label_rotation(from: Point, to: Point) -> f64 {
    let degrees = (to.y - from.y).atan2(to.x - from.x).to_degrees();
    if degrees > 90.0 {
        degrees - 180.0
    } else if degrees < -90.0 {
        degrees + 180.0
    } else {
        degrees
    }
}
