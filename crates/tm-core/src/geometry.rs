//! Tabletop geometry: movement distance, line rasterization, areas of effect,
//! and measurement templates.
//!
//! ## Distance rule
//!
//! Diagonals alternate 5 ft / 10 ft. With `diag = min(dx, dy)` and
//! `straight = max(dx, dy) - diag`:
//!
//! | Move        | straight | diag | feet |
//! |-------------|----------|------|------|
//! | (4, 0)      | 4        | 0    | 20   |
//! | (1, 1)      | 0        | 1    | 5    |
//! | (3, 3)      | 0        | 3    | 20   |
//! | (5, 2)      | 3        | 2    | 30   |

use crate::cell::{GridBounds, GridPos};
use crate::model::FEET_PER_CELL;
use crate::viewport::{ScreenPoint, Viewport};
use serde::{Deserialize, Serialize};

/// Movement cost in feet between two cells under the alternating diagonal
/// rule. `diag / 2` truncates. Saturates at `i32::MAX` for cells too far
/// apart to express.
pub fn distance_feet(from: GridPos, to: GridPos) -> i32 {
    let dx = i64::from(from.x.abs_diff(to.x));
    let dy = i64::from(from.y.abs_diff(to.y));
    let diag = dx.min(dy);
    let straight = dx.max(dy) - diag;
    let feet = (straight + diag + diag / 2) * i64::from(FEET_PER_CELL);
    i32::try_from(feet).unwrap_or(i32::MAX)
}

/// Bresenham rasterization from `from` to `to`, both endpoints included,
/// ordered starting at `from`.
pub fn line_cells(from: GridPos, to: GridPos) -> Vec<GridPos> {
    let (x1, y1) = (i64::from(to.x), i64::from(to.y));
    let dx = (x1 - i64::from(from.x)).abs();
    let dy = -(y1 - i64::from(from.y)).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };

    let mut cells = Vec::with_capacity(dx.max(-dy) as usize + 1);
    let (mut x, mut y) = (i64::from(from.x), i64::from(from.y));
    let mut err = dx + dy;

    loop {
        // Every step moves toward `to`, so x and y stay in i32 range.
        cells.push(GridPos::new(x as i32, y as i32));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}

/// True unless a cell strictly between the endpoints blocks sight. The
/// endpoints themselves never block (a creature standing in a doorway can
/// still see out of it).
pub fn has_line_of_sight(from: GridPos, to: GridPos, blocks: impl Fn(GridPos) -> bool) -> bool {
    let line = line_cells(from, to);
    let inner = line.len().saturating_sub(2);
    !line.iter().skip(1).take(inner).any(|cell| blocks(*cell))
}

/// Area-of-effect shapes understood by `area_cells`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaShape {
    Circle,
    Square,
    Cone,
    Line,
}

/// Whether `cell` lies within Euclidean `radius` of `center`. Computed in
/// `i64`, so any pair of cells is safe.
pub fn within_radius(center: GridPos, cell: GridPos, radius: i32) -> bool {
    let dx = i64::from(cell.x) - i64::from(center.x);
    let dy = i64::from(cell.y) - i64::from(center.y);
    let r = i64::from(radius.max(0));
    dx * dx + dy * dy <= r * r
}

/// Cells affected by an area centered on `center` with `radius` in cells.
///
/// - `Circle`: Euclidean distance `<= radius`.
/// - `Square`: the box `[cx-r, cx+r] × [cy-r, cy+r]`.
/// - Anything else degrades to the center cell alone.
///
/// Negative radii behave as zero. The result grows with `radius²`; callers
/// with a map at hand should clip to it first, as `FogOfWar::reveal_area`
/// does.
pub fn area_cells(center: GridPos, radius: i32, shape: AreaShape) -> Vec<GridPos> {
    let r = radius.max(0);
    let square = GridBounds::new(center.offset(-r, -r), center.offset(r, r));
    match shape {
        AreaShape::Circle => square
            .cells()
            .filter(|cell| within_radius(center, *cell, r))
            .collect(),
        AreaShape::Square => square.cells().collect(),
        AreaShape::Cone | AreaShape::Line => vec![center],
    }
}

// ─── Measurement templates ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureKind {
    Line,
    Cone,
    Circle,
    Square,
}

impl MeasureKind {
    pub fn name(self) -> &'static str {
        match self {
            MeasureKind::Line => "line",
            MeasureKind::Cone => "cone",
            MeasureKind::Circle => "circle",
            MeasureKind::Square => "square",
        }
    }
}

/// Screen-space shape previewing a measurement. Render-only.
#[derive(Debug, Clone, PartialEq)]
pub enum Template {
    /// Segment with a distance label at its midpoint.
    Line {
        from: ScreenPoint,
        to: ScreenPoint,
        label: String,
        label_at: ScreenPoint,
    },
    /// Triangle with a 90° apex at the origin, opening toward the cursor.
    /// Narrower 53° cones are not modelled.
    Cone {
        apex: ScreenPoint,
        left: ScreenPoint,
        right: ScreenPoint,
    },
    /// Circle through the cursor with its radius labelled in feet.
    Circle {
        center: ScreenPoint,
        radius: f32,
        label: String,
    },
    /// Axis-aligned box spanned by origin and cursor. No label.
    Square { min: ScreenPoint, max: ScreenPoint },
}

/// Build the preview template between two cells. Endpoints are cell centers.
pub fn measure_template(
    kind: MeasureKind,
    start: GridPos,
    end: GridPos,
    viewport: &Viewport,
) -> Template {
    let a = viewport.cell_center(start);
    let b = viewport.cell_center(end);

    match kind {
        MeasureKind::Line => Template::Line {
            from: a,
            to: b,
            label: format!("{} ft", distance_feet(start, end)),
            label_at: a.midpoint(b),
        },
        MeasureKind::Cone => {
            // Base half-width equals the axis length, giving a 90° apex.
            let (dx, dy) = (b.x - a.x, b.y - a.y);
            Template::Cone {
                apex: a,
                left: ScreenPoint::new(b.x - dy, b.y + dx),
                right: ScreenPoint::new(b.x + dy, b.y - dx),
            }
        }
        MeasureKind::Circle => {
            let radius = a.distance(b);
            let feet = radius / viewport.effective_cell_size() * FEET_PER_CELL as f32;
            Template::Circle {
                center: a,
                radius,
                label: format!("{} ft", feet.round() as i32),
            }
        }
        MeasureKind::Square => Template::Square {
            min: ScreenPoint::new(a.x.min(b.x), a.y.min(b.y)),
            max: ScreenPoint::new(a.x.max(b.x), a.y.max(b.y)),
        },
    }
}
