//! Topmost UI layer: hover outline, measurement template, then tool
//! affordances (fog brush preview, drag ghost).

use crate::context::{RenderContext, point};
use crate::layer::{Layer, LayerKind};
use crate::surface::{Primitive, Surface, TextAnchor, dashed, to_color};
use kurbo::{BezPath, Circle, Line, Point, Rect, Stroke};
use tm_core::{BRUSH_SIZE, GridBounds, Template, brush_origin, measure_template};

const HOVER_WIDTH: f64 = 2.0;
const MEASURE_WIDTH: f64 = 2.0;
const LABEL_SIZE: f64 = 14.0;
const GHOST_OPACITY: f32 = 0.35;

pub struct UiLayer;

impl Layer for UiLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Ui
    }

    fn render(&self, surface: &mut dyn Surface, ctx: &RenderContext<'_>) {
        let Some(map) = ctx.map else { return };
        let theme = ctx.theme;

        if let Some(hover) = ctx.hover
            && map.in_bounds(hover)
        {
            surface.stroke(
                &Primitive::Rect(ctx.cell_rect(hover, 1)),
                &Stroke::new(HOVER_WIDTH),
                to_color(theme.hover_color, 1.0),
            );
        }

        if let Some(m) = ctx.measurement {
            let template = measure_template(m.kind, m.start, m.end, ctx.viewport);
            draw_template(surface, ctx, &template);
        }

        if ctx.brush_preview
            && let Some(hover) = ctx.hover
        {
            let origin = brush_origin(hover);
            let brush = GridBounds::from_rect(origin.x, origin.y, BRUSH_SIZE, BRUSH_SIZE);
            surface.stroke(
                &Primitive::Rect(ctx.bounds_rect(brush)),
                &dashed(HOVER_WIDTH, 6.0),
                to_color(theme.brush_color, 1.0),
            );
        }

        if let Some(drag) = ctx.drag
            && let Some(token) = ctx.tokens.iter().find(|t| t.id == drag.token)
        {
            let ghost = Primitive::Rect(ctx.cell_rect(drag.cell, token.footprint()));
            surface.fill(&ghost, to_color(theme.selection_color, GHOST_OPACITY));
            surface.stroke(
                &ghost,
                &dashed(HOVER_WIDTH, 6.0),
                to_color(theme.selection_color, 1.0),
            );
        }
    }
}

fn draw_template(surface: &mut dyn Surface, ctx: &RenderContext<'_>, template: &Template) {
    let theme = ctx.theme;
    let line_color = to_color(theme.measure_color, 1.0);
    let fill_color = to_color(theme.measure_color, theme.measure_fill_opacity);
    let stroke = Stroke::new(MEASURE_WIDTH);
    let label_color = to_color(theme.terrain_label_color, 1.0);

    match template {
        Template::Line {
            from,
            to,
            label,
            label_at,
        } => {
            let line = Primitive::Line(Line::new(point(*from), point(*to)));
            surface.stroke(&line, &stroke, line_color);
            surface.text(label, point(*label_at), LABEL_SIZE, TextAnchor::Center, label_color);
        }
        Template::Cone { apex, left, right } => {
            let mut path = BezPath::new();
            path.move_to(point(*apex));
            path.line_to(point(*left));
            path.line_to(point(*right));
            path.close_path();
            let cone = Primitive::Path(path);
            surface.fill(&cone, fill_color);
            surface.stroke(&cone, &stroke, line_color);
        }
        Template::Circle {
            center,
            radius,
            label,
        } => {
            let circle = Primitive::Circle(Circle::new(point(*center), *radius as f64));
            surface.fill(&circle, fill_color);
            surface.stroke(&circle, &stroke, line_color);
            let at = Point::new(center.x as f64, center.y as f64 - LABEL_SIZE);
            surface.text(label, at, LABEL_SIZE, TextAnchor::Center, label_color);
        }
        Template::Square { min, max } => {
            let square = Primitive::Rect(Rect::from_points(point(*min), point(*max)));
            surface.fill(&square, fill_color);
            surface.stroke(&square, &stroke, line_color);
        }
    }
}
