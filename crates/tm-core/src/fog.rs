//! Fog-of-war model: the sparse set of revealed cells.
//!
//! Memory is proportional to the revealed area rather than the map, and the
//! set serializes as a flat JSON array of `"x,y"` keys. Every mutation is
//! bounds-checked against the map size passed in, so the set never holds a
//! cell outside `0..width × 0..height`.
//!
//! Two reveal shapes exist for two different callers: the interactive brush
//! paints fixed rectangles (`reveal` / `hide`), while spell and save effects
//! use `reveal_area` with a Euclidean radius.

use crate::cell::{GridBounds, GridPos, GridSize, parse_cell_key};
use crate::error::Result;
use crate::geometry::within_radius;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

/// Side length of the interactive fog brush, in cells.
pub const BRUSH_SIZE: i32 = 3;

/// Top-left cell of the brush painted around `center`.
pub const fn brush_origin(center: GridPos) -> GridPos {
    center.offset(-(BRUSH_SIZE / 2), -(BRUSH_SIZE / 2))
}

/// Circle cells, visiting only the part of the circle's box inside the map.
fn circle_in_bounds(
    center: GridPos,
    radius: i32,
    bounds: GridSize,
) -> impl Iterator<Item = GridPos> {
    let r = radius.max(0);
    GridBounds::new(center.offset(-r, -r), center.offset(r, r))
        .clamp_to(bounds)
        .cells()
        .filter(move |cell| within_radius(center, *cell, r))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FogOfWar {
    cells: BTreeSet<GridPos>,
}

impl FogOfWar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_revealed(&self, cell: GridPos) -> bool {
        self.cells.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = GridPos> + '_ {
        self.cells.iter().copied()
    }

    /// Revealed cells in row-major order.
    pub fn revealed_cells(&self) -> Vec<GridPos> {
        self.iter().collect()
    }

    /// Revealed cells as persisted `"x,y"` keys, row-major.
    pub fn revealed_keys(&self) -> Vec<String> {
        self.cells.iter().map(GridPos::key).collect()
    }

    /// Reveal a `w × h` block with top-left `(x, y)`. Returns whether the
    /// set changed.
    pub fn reveal(&mut self, x: i32, y: i32, w: i32, h: i32, bounds: GridSize) -> bool {
        let block = GridBounds::from_rect(x, y, w, h).clamp_to(bounds);
        let before = self.cells.len();
        self.cells.extend(block.cells());
        self.cells.len() != before
    }

    /// Hide a `w × h` block with top-left `(x, y)`. Returns whether the set
    /// changed.
    pub fn hide(&mut self, x: i32, y: i32, w: i32, h: i32, bounds: GridSize) -> bool {
        let block = GridBounds::from_rect(x, y, w, h).clamp_to(bounds);
        let before = self.cells.len();
        for cell in block.cells() {
            self.cells.remove(&cell);
        }
        self.cells.len() != before
    }

    /// Reveal every in-bounds cell within Euclidean `radius` of `center`.
    pub fn reveal_area(&mut self, center: GridPos, radius: i32, bounds: GridSize) -> bool {
        let before = self.cells.len();
        self.cells.extend(circle_in_bounds(center, radius, bounds));
        self.cells.len() != before
    }

    /// Hide every cell within Euclidean `radius` of `center`.
    pub fn hide_area(&mut self, center: GridPos, radius: i32, bounds: GridSize) -> bool {
        let before = self.cells.len();
        for cell in circle_in_bounds(center, radius, bounds) {
            self.cells.remove(&cell);
        }
        self.cells.len() != before
    }

    pub fn reset(&mut self) {
        self.cells.clear();
    }

    /// Drop cells outside `bounds` (after a map resize or an untrusted load).
    pub fn retain_in_bounds(&mut self, bounds: GridSize) {
        let before = self.cells.len();
        self.cells.retain(|c| bounds.contains(*c));
        let dropped = before - self.cells.len();
        if dropped > 0 {
            log::debug!("dropped {dropped} revealed cells outside {bounds:?}");
        }
    }

    /// Build from persisted keys, skipping any that fail to parse.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let cells = keys
            .into_iter()
            .filter_map(|key| match parse_cell_key(key) {
                Ok(cell) => Some(cell),
                Err(e) => {
                    log::warn!("skipping revealed cell: {e}");
                    None
                }
            })
            .collect();
        Self { cells }
    }

    /// Decode a persisted JSON array of `"x,y"` keys.
    pub fn from_json(json: &str) -> Result<Self> {
        let keys: Vec<String> = serde_json::from_str(json)?;
        Ok(Self::from_keys(keys.iter().map(String::as_str)))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl<'de> Deserialize<'de> for FogOfWar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let keys = Vec::<String>::deserialize(deserializer)?;
        Ok(Self::from_keys(keys.iter().map(String::as_str)))
    }
}

impl FromIterator<GridPos> for FogOfWar {
    fn from_iter<T: IntoIterator<Item = GridPos>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}
