//! Grid layer: minor and major lines, plus coordinate labels once cells
//! are large enough to read them.

use crate::context::RenderContext;
use crate::layer::{Layer, LayerKind};
use crate::surface::{Primitive, Surface, TextAnchor, to_color};
use kurbo::{Line, Point, Stroke};
use tm_core::GridPos;

const MINOR_WIDTH: f64 = 1.0;
const MAJOR_WIDTH: f64 = 1.5;

/// Minor lines on every cell boundary, major lines every N cells at double
/// opacity, and row/column labels once cells are big enough to read them.
pub struct GridLayer;

impl Layer for GridLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Grid
    }

    fn render(&self, surface: &mut dyn Surface, ctx: &RenderContext<'_>) {
        let Some(map) = ctx.map else { return };
        if !ctx.show_grid || !map.show_grid {
            return;
        }
        let Some(cells) = ctx.visible_cells() else {
            return;
        };

        let area = ctx.bounds_rect(cells);
        let every = ctx.theme.major_line_every.max(1);
        let minor = to_color(map.grid_color, map.grid_opacity);
        let major = to_color(map.grid_color, (map.grid_opacity * 2.0).min(1.0));
        let style_for = |i: i32| {
            if i.rem_euclid(every) == 0 {
                (Stroke::new(MAJOR_WIDTH), major)
            } else {
                (Stroke::new(MINOR_WIDTH), minor)
            }
        };

        for gx in cells.min.x..=cells.max.x.saturating_add(1) {
            let x = ctx.viewport.grid_to_screen(GridPos::new(gx, 0)).x as f64;
            let (stroke, color) = style_for(gx);
            let line = Line::new((x, area.y0), (x, area.y1));
            surface.stroke(&Primitive::Line(line), &stroke, color);
        }
        for gy in cells.min.y..=cells.max.y.saturating_add(1) {
            let y = ctx.viewport.grid_to_screen(GridPos::new(0, gy)).y as f64;
            let (stroke, color) = style_for(gy);
            let line = Line::new((area.x0, y), (area.x1, y));
            surface.stroke(&Primitive::Line(line), &stroke, color);
        }

        let size = ctx.cell_size();
        if size < ctx.theme.grid_label_min_cell as f64 {
            return;
        }
        let font = (size * 0.25).clamp(8.0, 14.0);
        let label = to_color(ctx.theme.grid_label_color, 1.0);
        for gx in cells.min.x..=cells.max.x {
            let r = ctx.cell_rect(GridPos::new(gx, cells.min.y), 1);
            let at = Point::new(r.x0 + 2.0, r.y0 + 2.0);
            surface.text(&gx.to_string(), at, font, TextAnchor::TopLeft, label);
        }
        for gy in cells.min.y..=cells.max.y {
            let r = ctx.cell_rect(GridPos::new(cells.min.x, gy), 1);
            let at = Point::new(r.x0 + 2.0, r.y0 + size / 2.0);
            surface.text(&gy.to_string(), at, font, TextAnchor::TopLeft, label);
        }
    }
}
