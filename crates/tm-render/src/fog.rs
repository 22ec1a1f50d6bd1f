//! Fog-of-war layer.
//!
//! Every visible unrevealed cell gets a full-cell fog rect: opaque in player
//! view, translucent in GM view. Soft edges never thin that rect; they add
//! fading bands that reach *into* revealed neighbors, so the hidden side of
//! the boundary stays fully covered.

use crate::context::RenderContext;
use crate::layer::{Layer, LayerKind};
use crate::surface::{Primitive, Surface, to_color};
use kurbo::Rect;

/// (depth as a fraction of the feather, opacity factor), innermost first.
const FEATHER_BANDS: [(f64, f32); 2] = [(0.5, 0.5), (1.0, 0.25)];

#[derive(Clone, Copy)]
enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    /// Band of `depth` px just outside `rect` on this side.
    fn band(self, rect: Rect, from: f64, to: f64) -> Rect {
        match self {
            Side::North => Rect::new(rect.x0, rect.y0 - to, rect.x1, rect.y0 - from),
            Side::East => Rect::new(rect.x1 + from, rect.y0, rect.x1 + to, rect.y1),
            Side::South => Rect::new(rect.x0, rect.y1 + from, rect.x1, rect.y1 + to),
            Side::West => Rect::new(rect.x0 - to, rect.y0, rect.x0 - from, rect.y1),
        }
    }
}

pub struct FogLayer;

impl Layer for FogLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::FogOfWar
    }

    fn render(&self, surface: &mut dyn Surface, ctx: &RenderContext<'_>) {
        if !ctx.use_fog {
            return;
        }
        let Some(map) = ctx.map else { return };
        let Some(cells) = ctx.visible_cells() else {
            return;
        };

        let theme = ctx.theme;
        let fog = theme.fog_fill(ctx.is_dm_view);
        if fog.a <= 0.0 {
            return;
        }
        let feather = theme.fog_feather.clamp(0.0, 0.5) as f64 * ctx.cell_size();
        let soft = theme.soft_fog_edges && feather > 0.0;

        for cell in cells.cells() {
            if map.is_revealed(cell) {
                continue;
            }
            let rect = ctx.cell_rect(cell, 1);
            surface.fill(&Primitive::Rect(rect), to_color(fog, 1.0));

            if !soft {
                continue;
            }
            // `ALL` is in `cardinal_neighbors` order.
            for (side, n) in Side::ALL.into_iter().zip(cell.cardinal_neighbors()) {
                if !map.in_bounds(n) || !map.is_revealed(n) {
                    continue;
                }
                let mut from = 0.0;
                for (depth, factor) in FEATHER_BANDS {
                    let to = feather * depth;
                    let band = side.band(rect, from, to);
                    surface.fill(&Primitive::Rect(band), to_color(fog, factor));
                    from = to;
                }
            }
        }
    }
}
