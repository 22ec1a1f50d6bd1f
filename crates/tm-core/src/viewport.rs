//! Screen ↔ grid coordinate transform.
//!
//! `screen = grid * effective_cell_size + pan`. The viewport also carries the
//! on-screen surface size so it can report which cells are visible; that
//! window is the only culling the renderer does.

use crate::cell::{GridBounds, GridPos};
use crate::config::ViewConfig;

/// Smallest on-screen cell size, in pixels. Keeps the transform invertible.
pub const MIN_CELL_SIZE: f32 = 1.0;

/// A position in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(&self, other: ScreenPoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(&self, other: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pan_x: f32,
    pan_y: f32,
    zoom: f32,
    base_cell_size: f32,
    min_zoom: f32,
    max_zoom: f32,
    width: f32,
    height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0, &ViewConfig::default())
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32, config: &ViewConfig) -> Self {
        let config = config.sanitized();
        Self {
            pan_x: 0.0,
            pan_y: 0.0,
            zoom: 1.0_f32.clamp(config.min_zoom, config.max_zoom),
            base_cell_size: config.base_cell_size,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            width,
            height,
        }
    }

    pub fn pan_offset(&self) -> ScreenPoint {
        ScreenPoint::new(self.pan_x, self.pan_y)
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn base_cell_size(&self) -> f32 {
        self.base_cell_size
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// On-screen pixel size of one cell. Always strictly positive.
    pub fn effective_cell_size(&self) -> f32 {
        (self.base_cell_size * self.zoom).max(MIN_CELL_SIZE)
    }

    // ─── Conversions ─────────────────────────────────────────────────────

    /// Top-left pixel of a cell.
    pub fn grid_to_screen(&self, cell: GridPos) -> ScreenPoint {
        self.grid_to_screen_f(cell.x as f32, cell.y as f32)
    }

    /// Pixel of a fractional grid position.
    pub fn grid_to_screen_f(&self, gx: f32, gy: f32) -> ScreenPoint {
        let size = self.effective_cell_size();
        ScreenPoint::new(gx * size + self.pan_x, gy * size + self.pan_y)
    }

    pub fn cell_center(&self, cell: GridPos) -> ScreenPoint {
        self.grid_to_screen_f(cell.x as f32 + 0.5, cell.y as f32 + 0.5)
    }

    /// Fractional grid position under a pixel.
    pub fn screen_to_grid_f(&self, p: ScreenPoint) -> (f32, f32) {
        let size = self.effective_cell_size();
        ((p.x - self.pan_x) / size, (p.y - self.pan_y) / size)
    }

    /// The cell containing a pixel.
    pub fn screen_to_grid(&self, p: ScreenPoint) -> GridPos {
        let (gx, gy) = self.screen_to_grid_f(p);
        GridPos::new(gx.floor() as i32, gy.floor() as i32)
    }

    /// Inclusive range of cells at least partly on screen. Not clamped to
    /// the map; see `GridBounds::clamp_to`.
    pub fn visible_grid_bounds(&self) -> GridBounds {
        GridBounds::new(
            self.screen_to_grid(ScreenPoint::new(0.0, 0.0)),
            self.screen_to_grid(ScreenPoint::new(self.width, self.height)),
        )
    }

    // ─── Mutation ────────────────────────────────────────────────────────

    /// Shift the view by a pixel delta. Panning past map edges is allowed.
    pub fn pan_by(&mut self, dx: f32, dy: f32) -> bool {
        if !(dx.is_finite() && dy.is_finite()) || (dx == 0.0 && dy == 0.0) {
            return false;
        }
        self.pan_x += dx;
        self.pan_y += dy;
        true
    }

    pub fn set_pan(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.pan_x = x;
            self.pan_y = y;
        }
    }

    /// Multiply zoom by `factor`, keeping the grid point under `pivot` fixed
    /// on screen. Returns whether the zoom changed.
    pub fn zoom_at(&mut self, factor: f32, pivot: ScreenPoint) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            return false;
        }
        self.zoom_to(self.zoom * factor, pivot)
    }

    /// Set an absolute zoom level (clamped), pivoting about `pivot`.
    pub fn zoom_to(&mut self, level: f32, pivot: ScreenPoint) -> bool {
        if !level.is_finite() || !pivot.is_finite() {
            return false;
        }
        let level = level.clamp(self.min_zoom, self.max_zoom);
        if level == self.zoom {
            return false;
        }
        // Pivot must be taken in grid space under the old zoom.
        let (gx, gy) = self.screen_to_grid_f(pivot);
        self.zoom = level;
        let size = self.effective_cell_size();
        self.pan_x = pivot.x - gx * size;
        self.pan_y = pivot.y - gy * size;
        true
    }

    /// External zoom setter; pivots about the viewport center.
    pub fn set_zoom(&mut self, level: f32) -> bool {
        let center = ScreenPoint::new(self.width / 2.0, self.height / 2.0);
        self.zoom_to(level, center)
    }

    /// Pan so the center of `cell` sits at the center of the viewport.
    pub fn center_on_grid(&mut self, cell: GridPos) {
        let size = self.effective_cell_size();
        self.pan_x = self.width / 2.0 - (cell.x as f32 + 0.5) * size;
        self.pan_y = self.height / 2.0 - (cell.y as f32 + 0.5) * size;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width.is_finite() && height.is_finite() {
            self.width = width.max(0.0);
            self.height = height.max(0.0);
        }
    }
}
