//! Terrain layer: tinted overlays, hatched difficult ground, effect labels.

use crate::context::{RenderContext, point};
use crate::layer::{Layer, LayerKind};
use crate::surface::{Primitive, Surface, TextAnchor, to_color};
use kurbo::{Circle, Line, Rect, Stroke};
use tm_core::{Color, GridPos, Region, TerrainOverlay, TerrainType};

const OUTLINE_WIDTH: f64 = 1.5;
const HATCH_WIDTH: f64 = 1.5;
const MIN_HATCH_PERIOD: f64 = 4.0;

/// Fill color for an overlay without an explicit one.
pub fn default_terrain_color(kind: TerrainType) -> Color {
    match kind {
        TerrainType::Normal => Color::rgb8(0x80, 0x80, 0x80),
        TerrainType::DifficultTerrain => Color::rgb8(0x8B, 0x69, 0x14),
        TerrainType::Water => Color::rgb8(0x1E, 0x88, 0xE5),
        TerrainType::Lava => Color::rgb8(0xFF, 0x57, 0x22),
        TerrainType::Pit => Color::rgb8(0x21, 0x21, 0x21),
        TerrainType::Wall => Color::rgb8(0x5D, 0x40, 0x37),
        TerrainType::Cover => Color::rgb8(0x79, 0x55, 0x48),
        TerrainType::SpellEffect => Color::rgb8(0x9C, 0x27, 0xB0),
        TerrainType::Hazard => Color::rgb8(0xFF, 0xEB, 0x3B),
        TerrainType::Custom => Color::rgb8(0x9E, 0x9E, 0x9E),
    }
}

pub struct TerrainLayer;

impl Layer for TerrainLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Terrain
    }

    fn render(&self, surface: &mut dyn Surface, ctx: &RenderContext<'_>) {
        let Some(map) = ctx.map else { return };
        let Some(visible) = ctx.visible_cells() else {
            return;
        };
        for overlay in &map.terrain {
            let bounds = overlay.region.bounds();
            if bounds.is_empty() || !bounds.intersects(&visible) {
                continue;
            }
            draw_overlay(surface, ctx, overlay);
        }
    }
}

fn draw_overlay(surface: &mut dyn Surface, ctx: &RenderContext<'_>, overlay: &TerrainOverlay) {
    let color = overlay
        .color
        .unwrap_or_else(|| default_terrain_color(overlay.kind));
    let shape = region_shape(ctx, &overlay.region);

    surface.fill(&shape, to_color(color, overlay.opacity));
    surface.stroke(&shape, &Stroke::new(OUTLINE_WIDTH), to_color(color, 1.0));

    if overlay.kind == TerrainType::DifficultTerrain {
        draw_hatch(surface, ctx, &shape, color);
    }

    if let Some(text) = overlay.effect_description.as_deref()
        && !text.is_empty()
    {
        let font = (ctx.cell_size() * 0.3).clamp(9.0, 16.0);
        surface.text(
            text,
            shape.bounding_box().center(),
            font,
            TextAnchor::Center,
            to_color(ctx.theme.terrain_label_color, 1.0),
        );
    }
}

fn region_shape(ctx: &RenderContext<'_>, region: &Region) -> Primitive {
    match *region {
        Region::Rect { .. } => Primitive::Rect(ctx.bounds_rect(region.bounds())),
        Region::Circle { x, y, r } => {
            let center = point(ctx.viewport.cell_center(GridPos::new(x, y)));
            let radius = (r.max(0.0) as f64 + 0.5) * ctx.cell_size();
            Primitive::Circle(Circle::new(center, radius))
        }
    }
}

/// Diagonal stripes clipped to `shape`, only over the on-screen part.
fn draw_hatch(surface: &mut dyn Surface, ctx: &RenderContext<'_>, shape: &Primitive, color: Color) {
    let screen = Rect::new(
        0.0,
        0.0,
        ctx.viewport.width() as f64,
        ctx.viewport.height() as f64,
    );
    let area = shape.bounding_box().intersect(screen);
    if area.width() <= 0.0 || area.height() <= 0.0 {
        return;
    }

    let period = (ctx.cell_size() / 4.0).max(MIN_HATCH_PERIOD);
    let stroke = Stroke::new(HATCH_WIDTH);
    let stripe = to_color(color, 1.0);

    surface.push_clip(shape);
    let h = area.height();
    let mut d = -h;
    while d < area.width() {
        let line = Line::new((area.x0 + d, area.y0), (area.x0 + d + h, area.y1));
        surface.stroke(&Primitive::Line(line), &stroke, stripe);
        d += period;
    }
    surface.pop_clip();
}
