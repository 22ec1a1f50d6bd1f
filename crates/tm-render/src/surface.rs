//! Drawable-surface abstraction.
//!
//! Layers draw through `Surface` so the same frame can go to a Vello scene
//! (`scene::VelloSurface`) or to a recorded display list
//! (`recording::DisplayList`) for headless checks. The trait is object safe;
//! layers receive `&mut dyn Surface`.

use kurbo::{Affine, BezPath, Circle, Line, Point, Rect, Shape, Stroke};
use peniko::{Color, Image};

/// A shape a surface knows how to fill, stroke, or clip to.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Rect(Rect),
    Circle(Circle),
    Line(Line),
    Path(BezPath),
}

impl Primitive {
    pub fn bounding_box(&self) -> Rect {
        match self {
            Primitive::Rect(r) => *r,
            Primitive::Circle(c) => c.bounding_box(),
            Primitive::Line(l) => l.bounding_box(),
            Primitive::Path(p) => p.bounding_box(),
        }
    }

    /// Whether a fill of this primitive covers `pt`. Lines cover nothing.
    pub fn contains(&self, pt: Point) -> bool {
        match self {
            Primitive::Rect(r) => r.contains(pt),
            Primitive::Circle(c) => c.contains(pt),
            Primitive::Line(_) => false,
            Primitive::Path(p) => p.contains(pt),
        }
    }

    /// The primitive with `affine` applied. Circles assume a uniform scale.
    pub fn transformed(&self, affine: Affine) -> Primitive {
        if affine == Affine::IDENTITY {
            return self.clone();
        }
        match self {
            Primitive::Rect(r) => Primitive::Rect(affine.transform_rect_bbox(*r)),
            Primitive::Circle(c) => {
                let scale = affine.as_coeffs()[0].hypot(affine.as_coeffs()[1]);
                Primitive::Circle(Circle::new(affine * c.center, c.radius * scale))
            }
            Primitive::Line(l) => Primitive::Line(Line::new(affine * l.p0, affine * l.p1)),
            Primitive::Path(p) => Primitive::Path(affine * p.clone()),
        }
    }
}

impl From<Rect> for Primitive {
    fn from(r: Rect) -> Self {
        Primitive::Rect(r)
    }
}

impl From<Circle> for Primitive {
    fn from(c: Circle) -> Self {
        Primitive::Circle(c)
    }
}

impl From<Line> for Primitive {
    fn from(l: Line) -> Self {
        Primitive::Line(l)
    }
}

impl From<BezPath> for Primitive {
    fn from(p: BezPath) -> Self {
        Primitive::Path(p)
    }
}

/// Where a text anchor point sits relative to the laid-out string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    Center,
}

pub trait Surface {
    /// Fill the whole surface, ignoring the current transform.
    fn clear(&mut self, color: Color);

    fn fill(&mut self, shape: &Primitive, color: Color);

    fn stroke(&mut self, shape: &Primitive, style: &Stroke, color: Color);

    /// Draw a single line of text. `size` is the font size in pixels.
    fn text(&mut self, text: &str, at: Point, size: f64, anchor: TextAnchor, color: Color);

    /// Draw `image` stretched to fill `dest`.
    fn draw_image(&mut self, image: &Image, dest: Rect);

    /// Restrict drawing to `shape` until the matching `pop_clip`.
    fn push_clip(&mut self, shape: &Primitive);

    fn pop_clip(&mut self);

    /// Push the current transform.
    fn save(&mut self);

    /// Pop back to the last saved transform.
    fn restore(&mut self);

    /// Pre-multiply the current transform (subsequent drawing happens in
    /// the new local space).
    fn transform(&mut self, affine: Affine);
}

/// Convert a model color to a surface color, multiplying in `opacity`.
pub fn to_color(color: tm_core::Color, opacity: f32) -> Color {
    Color::new([
        color.r.clamp(0.0, 1.0),
        color.g.clamp(0.0, 1.0),
        color.b.clamp(0.0, 1.0),
        (color.a * opacity).clamp(0.0, 1.0),
    ])
}

/// Alpha channel of a surface color.
pub fn alpha(color: Color) -> f32 {
    color.components[3]
}

/// A dashed stroke of the given width.
pub fn dashed(width: f64, dash: f64) -> Stroke {
    Stroke::new(width).with_dashes(0.0, [dash, dash * 0.6])
}
