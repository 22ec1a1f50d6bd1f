//! `Surface` backed by a Vello scene.
//!
//! Call once per frame with a freshly-reset `Scene`; the host presents the
//! scene through its own wgpu setup.

use crate::surface::{Primitive, Surface, TextAnchor};
use kurbo::{Affine, Point, Rect, Stroke};
use peniko::{Color, Fill, Image, Mix};
use vello::Scene;

pub struct VelloSurface<'a> {
    scene: &'a mut Scene,
    width: f64,
    height: f64,
    current: Affine,
    saved: Vec<Affine>,
    clip_depth: usize,
}

impl<'a> VelloSurface<'a> {
    pub fn new(scene: &'a mut Scene, width: f64, height: f64) -> Self {
        Self {
            scene,
            width,
            height,
            current: Affine::IDENTITY,
            saved: Vec::new(),
            clip_depth: 0,
        }
    }
}

impl Drop for VelloSurface<'_> {
    fn drop(&mut self) {
        // Unbalanced clips would leak into whatever the host appends next.
        while self.clip_depth > 0 {
            self.scene.pop_layer();
            self.clip_depth -= 1;
        }
    }
}

impl Surface for VelloSurface<'_> {
    fn clear(&mut self, color: Color) {
        let full = Rect::new(0.0, 0.0, self.width, self.height);
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, color, None, &full);
    }

    fn fill(&mut self, shape: &Primitive, color: Color) {
        let t = self.current;
        match shape {
            Primitive::Rect(r) => self.scene.fill(Fill::NonZero, t, color, None, r),
            Primitive::Circle(c) => self.scene.fill(Fill::NonZero, t, color, None, c),
            Primitive::Path(p) => self.scene.fill(Fill::NonZero, t, color, None, p),
            Primitive::Line(_) => {}
        }
    }

    fn stroke(&mut self, shape: &Primitive, style: &Stroke, color: Color) {
        let t = self.current;
        match shape {
            Primitive::Rect(r) => self.scene.stroke(style, t, color, None, r),
            Primitive::Circle(c) => self.scene.stroke(style, t, color, None, c),
            Primitive::Line(l) => self.scene.stroke(style, t, color, None, l),
            Primitive::Path(p) => self.scene.stroke(style, t, color, None, p),
        }
    }

    fn text(&mut self, text: &str, at: Point, size: f64, anchor: TextAnchor, _color: Color) {
        // No font context yet: text is traced and skipped.
        log::trace!("TEXT {text:?} at ({}, {}) size {size} {anchor:?}", at.x, at.y);
    }

    fn draw_image(&mut self, image: &Image, dest: Rect) {
        if image.width == 0 || image.height == 0 {
            return;
        }
        let sx = dest.width() / image.width as f64;
        let sy = dest.height() / image.height as f64;
        let placement = self.current
            * Affine::translate(dest.origin().to_vec2())
            * Affine::scale_non_uniform(sx, sy);
        self.scene.draw_image(image, placement);
    }

    fn push_clip(&mut self, shape: &Primitive) {
        let t = self.current;
        match shape {
            Primitive::Rect(r) => self.scene.push_layer(Mix::Clip, 1.0, t, r),
            Primitive::Circle(c) => self.scene.push_layer(Mix::Clip, 1.0, t, c),
            Primitive::Path(p) => self.scene.push_layer(Mix::Clip, 1.0, t, p),
            Primitive::Line(l) => {
                // A line has no area; clip to its bounds so pop_clip stays balanced.
                let bounds = shape.bounding_box();
                log::debug!("clip to line {l:?} uses its bounding box");
                self.scene.push_layer(Mix::Clip, 1.0, t, &bounds);
            }
        }
        self.clip_depth += 1;
    }

    fn pop_clip(&mut self) {
        if self.clip_depth > 0 {
            self.scene.pop_layer();
            self.clip_depth -= 1;
        }
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
    use crate::context::RenderContext;
    use crate::layer::Pipeline;
    use crate::theme::Theme;
    use tm_core::{EntityId, GridMap, Token, Viewport};

    #[test]
    fn full_frame_encodes_without_panicking() {
        let viewport = Viewport::default();
        let theme = Theme::default();
        let mut map = GridMap::new(12, 8);
        map.reveal(0, 0, 4, 4);
        let tokens = [Token::new(EntityId::intern("scene-token"), 1, 1)];
        let mut ctx = RenderContext::new(&viewport, &theme);
        ctx.map = Some(&map);
        ctx.tokens = &tokens;

        let mut scene = Scene::new();
        {
            let mut surface = VelloSurface::new(&mut scene, 800.0, 600.0);
            Pipeline::standard().render(&mut surface, &ctx);
            // Left open on purpose; dropping the surface closes it.
            surface.push_clip(&Primitive::Rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
        }
        scene.reset();
    }
}
