//! Background layer: the map color, then the optional backdrop image.

use crate::context::RenderContext;
use crate::layer::{Layer, LayerKind};
use crate::surface::{Surface, to_color};
use tm_core::{Color, GridBounds};

/// Clears to the map color, then stretches the background image (if any)
/// over the grid's bounding box.
pub struct BackgroundLayer;

impl Layer for BackgroundLayer {
    fn kind(&self) -> LayerKind {
        LayerKind::Background
    }

    fn render(&self, surface: &mut dyn Surface, ctx: &RenderContext<'_>) {
        let Some(map) = ctx.map else {
            surface.clear(to_color(Color::BLACK, 1.0));
            return;
        };
        surface.clear(to_color(map.background_color, 1.0));

        if let Some(image) = ctx.background
            && map.grid_width > 0
            && map.grid_height > 0
        {
            let grid = GridBounds::from_rect(0, 0, map.grid_width, map.grid_height);
            surface.draw_image(image, ctx.bounds_rect(grid));
        }
    }
}
