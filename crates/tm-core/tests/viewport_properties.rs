//! Property tests: the screen ↔ grid transform stays consistent across pan
//! and zoom.

use proptest::prelude::*;
use tm_core::{GridPos, ScreenPoint, ViewConfig, Viewport};

fn viewport(pan_x: f32, pan_y: f32, zoom: f32) -> Viewport {
    let mut vp = Viewport::new(1024.0, 768.0, &ViewConfig::default());
    vp.set_zoom(zoom);
    vp.set_pan(pan_x, pan_y);
    vp
}

proptest! {
    #[test]
    fn cell_center_round_trips(
        x in -500i32..500,
        y in -500i32..500,
        pan_x in -5000.0f32..5000.0,
        pan_y in -5000.0f32..5000.0,
        zoom in 0.25f32..4.0,
    ) {
        let vp = viewport(pan_x, pan_y, zoom);
        let cell = GridPos::new(x, y);
        prop_assert_eq!(vp.screen_to_grid(vp.cell_center(cell)), cell);
    }

    #[test]
    fn corner_round_trips_within_one_cell(
        x in -500i32..500,
        y in -500i32..500,
        pan_x in -5000.0f32..5000.0,
        pan_y in -5000.0f32..5000.0,
        zoom in 0.25f32..4.0,
    ) {
        let vp = viewport(pan_x, pan_y, zoom);
        let cell = GridPos::new(x, y);
        let back = vp.screen_to_grid(vp.grid_to_screen(cell));
        prop_assert!((back.x - cell.x).abs() <= 1 && (back.y - cell.y).abs() <= 1);
    }

    #[test]
    fn zoom_preserves_pivot(
        pan_x in -2000.0f32..2000.0,
        pan_y in -2000.0f32..2000.0,
        zoom in 0.25f32..4.0,
        factor in 0.5f32..2.0,
        px in 0.0f32..1024.0,
        py in 0.0f32..768.0,
    ) {
        let mut vp = viewport(pan_x, pan_y, zoom);
        let pivot = ScreenPoint::new(px, py);
        let (bx, by) = vp.screen_to_grid_f(pivot);
        vp.zoom_at(factor, pivot);
        let (ax, ay) = vp.screen_to_grid_f(pivot);
        // Tolerance scales with distance from the origin in grid units.
        let tol = 1e-3 * (1.0 + bx.abs().max(by.abs()));
        prop_assert!((bx - ax).abs() <= tol, "x drifted {} -> {}", bx, ax);
        prop_assert!((by - ay).abs() <= tol, "y drifted {} -> {}", by, ay);
    }

    #[test]
    fn effective_cell_size_stays_positive(
        zoom in -10.0f32..10.0,
        base in -100.0f32..100.0,
    ) {
        let config = ViewConfig { base_cell_size: base, ..ViewConfig::default() };
        let mut vp = Viewport::new(800.0, 600.0, &config);
        vp.set_zoom(zoom);
        prop_assert!(vp.effective_cell_size() > 0.0);
    }
}
