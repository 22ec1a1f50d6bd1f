//! Per-frame, read-only render context shared by every layer.
//!
//! Assembled fresh for each frame by the controller. Layers never mutate
//! anything through it; all mutation happens between frames.

use crate::theme::Theme;
use kurbo::{Point, Rect};
use peniko::Image;
use tm_core::{EntityId, GridBounds, GridMap, GridPos, MeasureKind, ScreenPoint, Token, Viewport};

/// A measurement gesture in progress (or a static preview).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurePreview {
    pub kind: MeasureKind,
    pub start: GridPos,
    pub end: GridPos,
}

/// A token being dragged, shown as a ghost footprint at `cell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragPreview {
    pub token: EntityId,
    pub cell: GridPos,
}

#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub map: Option<&'a GridMap>,
    pub tokens: &'a [Token],
    pub viewport: &'a Viewport,
    pub theme: &'a Theme,
    pub background: Option<&'a Image>,
    pub selected: Option<EntityId>,
    pub hover: Option<GridPos>,
    pub measurement: Option<MeasurePreview>,
    pub drag: Option<DragPreview>,
    /// Draw the fog brush outline around the hover cell.
    pub brush_preview: bool,
    pub show_grid: bool,
    pub use_fog: bool,
    pub is_dm_view: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(viewport: &'a Viewport, theme: &'a Theme) -> Self {
        Self {
            map: None,
            tokens: &[],
            viewport,
            theme,
            background: None,
            selected: None,
            hover: None,
            measurement: None,
            drag: None,
            brush_preview: false,
            show_grid: true,
            use_fog: true,
            is_dm_view: false,
        }
    }

    pub fn cell_size(&self) -> f64 {
        self.viewport.effective_cell_size() as f64
    }

    /// Map cells currently on screen, or `None` with no map or nothing visible.
    pub fn visible_cells(&self) -> Option<GridBounds> {
        let map = self.map?;
        let bounds = self.viewport.visible_grid_bounds().clamp_to(map.size());
        (!bounds.is_empty()).then_some(bounds)
    }

    /// Screen rectangle of a `span × span` block anchored at `cell`.
    pub fn cell_rect(&self, cell: GridPos, span: i32) -> Rect {
        let p = self.viewport.grid_to_screen(cell);
        let size = self.cell_size() * span as f64;
        Rect::from_origin_size((p.x as f64, p.y as f64), (size, size))
    }

    /// Screen rectangle of an inclusive cell range.
    pub fn bounds_rect(&self, bounds: GridBounds) -> Rect {
        let min = self.viewport.grid_to_screen(bounds.min);
        let max = self.viewport.grid_to_screen(bounds.max.offset(1, 1));
        Rect::new(min.x as f64, min.y as f64, max.x as f64, max.y as f64)
    }

    /// Whether a token should be drawn (and hit) in the current view.
    pub fn shows_token(&self, token: &Token) -> bool {
        token.is_visible || self.is_dm_view
    }
}

pub fn point(p: ScreenPoint) -> Point {
    Point::new(p.x as f64, p.y as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_cells_clamp_to_map() {
        let viewport = Viewport::default();
        let theme = Theme::default();
        let map = GridMap::new(10, 8);
        let mut ctx = RenderContext::new(&viewport, &theme);
        assert_eq!(ctx.visible_cells(), None);
        ctx.map = Some(&map);
        assert_eq!(
            ctx.visible_cells(),
            Some(GridBounds::new(GridPos::new(0, 0), GridPos::new(9, 7)))
        );
    }

    #[test]
    fn cell_rect_spans_footprint() {
        let viewport = Viewport::default();
        let theme = Theme::default();
        let ctx = RenderContext::new(&viewport, &theme);
        assert_eq!(
            ctx.cell_rect(GridPos::new(1, 2), 2),
            Rect::new(40.0, 80.0, 120.0, 160.0)
        );
    }
}
