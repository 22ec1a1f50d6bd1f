//! A `Surface` that records draw operations instead of rasterizing them.
//!
//! Geometry is stored in surface space (the current transform is already
//! applied), so a recorded frame can be queried for what ends up on top of a
//! given pixel. Used for headless rendering checks.

use crate::surface::{Primitive, Surface, TextAnchor};
use kurbo::{Affine, Point, Rect, Stroke};
use peniko::{Color, Image};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    Fill {
        shape: Primitive,
        color: Color,
    },
    Stroke {
        shape: Primitive,
        width: f64,
        dashed: bool,
        color: Color,
    },
    Text {
        text: String,
        at: Point,
        size: f64,
        anchor: TextAnchor,
        color: Color,
    },
    Image {
        dest: Rect,
    },
    PushClip(Primitive),
    PopClip,
}

#[derive(Debug, Default)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
    current: Affine,
    saved: Vec<Affine>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
        self.current = Affine::IDENTITY;
        self.saved.clear();
    }

    /// All recorded text strings, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// The last fill (or clear) that covers `pt`, i.e. what is visible
    /// there if every fill were opaque. Clips are ignored.
    pub fn topmost_fill_at(&self, pt: Point) -> Option<&DrawOp> {
        self.ops.iter().rev().find(|op| match op {
            DrawOp::Fill { shape, .. } => shape.contains(pt),
            DrawOp::Clear(_) => true,
            _ => false,
        })
    }

    /// Index of the first op at or after `from` matching `pred`.
    pub fn position_from(&self, from: usize, pred: impl Fn(&DrawOp) -> bool) -> Option<usize> {
        self.ops
            .iter()
            .skip(from)
            .position(pred)
            .map(|i| i + from)
    }
}

impl Surface for DisplayList {
    fn clear(&mut self, color: Color) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn fill(&mut self, shape: &Primitive, color: Color) {
        self.ops.push(DrawOp::Fill {
            shape: shape.transformed(self.current),
            color,
        });
    }

    fn stroke(&mut self, shape: &Primitive, style: &Stroke, color: Color) {
        self.ops.push(DrawOp::Stroke {
            shape: shape.transformed(self.current),
            width: style.width,
            dashed: !style.dash_pattern.is_empty(),
            color,
        });
    }

    fn text(&mut self, text: &str, at: Point, size: f64, anchor: TextAnchor, color: Color) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at: self.current * at,
            size,
            anchor,
            color,
        });
    }

    fn draw_image(&mut self, _image: &Image, dest: Rect) {
        self.ops.push(DrawOp::Image {
            dest: self.current.transform_rect_bbox(dest),
        });
    }

    fn push_clip(&mut self, shape: &Primitive) {
        self.ops.push(DrawOp::PushClip(shape.transformed(self.current)));
    }

    fn pop_clip(&mut self) {
        self.ops.push(DrawOp::PopClip);
    }

    fn save(&mut self) {
        self.saved.push(self.current);
    }

    fn restore(&mut self) {
        if let Some(t) = self.saved.pop() {
            self.current = t;
        }
    }

    fn transform(&mut self, affine: Affine) {
        self.current *= affine;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Circle;

    #[test]
    fn records_in_surface_space() {
        let mut list = DisplayList::new();
        list.save();
        list.transform(Affine::translate((100.0, 50.0)));
        list.fill(&Primitive::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)), Color::from_rgba8(255, 0, 0, 255));
        list.restore();
        list.fill(&Primitive::Circle(Circle::new((5.0, 5.0), 2.0)), Color::from_rgba8(0, 0, 255, 255));

        assert_eq!(
            list.ops()[0],
            DrawOp::Fill {
                shape: Primitive::Rect(Rect::new(100.0, 50.0, 110.0, 60.0)),
                color: Color::from_rgba8(255, 0, 0, 255),
            }
        );
        assert!(matches!(
            list.topmost_fill_at(Point::new(105.0, 55.0)),
            Some(DrawOp::Fill { color, .. }) if *color == Color::from_rgba8(255, 0, 0, 255)
        ));
        assert!(list.topmost_fill_at(Point::new(500.0, 500.0)).is_none());
    }

    #[test]
    fn restore_without_save_is_harmless() {
        let mut list = DisplayList::new();
        list.restore();
        list.text("A", Point::new(1.0, 2.0), 10.0, TextAnchor::Center, Color::from_rgba8(0, 0, 0, 255));
        assert_eq!(list.texts(), vec!["A"]);
    }
}
