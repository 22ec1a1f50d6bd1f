//! Grid cell coordinates, inclusive cell ranges, and the `"x,y"` key format.
//!
//! Persisted revealed-cell lists use `"x,y"` strings; `GridPos` serializes to
//! and from that form directly so the fog set round-trips as a flat list.

use crate::error::{MapError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use winnow::ascii::space0;
use winnow::combinator::separated_pair;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::take_while;

/// Integer grid coordinate. One cell is 5 game-feet per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shift by `(dx, dy)`, saturating at the `i32` range.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// The four edge-adjacent neighbors: north, east, south, west.
    pub const fn cardinal_neighbors(self) -> [GridPos; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }

    /// Persisted key form, `"x,y"`.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

// Row-major: sets of cells enumerate top row first, left to right.
impl Ord for GridPos {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for GridPos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

impl Serialize for GridPos {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GridPos {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse_cell_key(&s).map_err(serde::de::Error::custom)
    }
}

/// Map dimensions in cells. Valid cells satisfy `0 <= x < width`,
/// `0 <= y < height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridSize {
    pub width: i32,
    pub height: i32,
}

impl GridSize {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }
}

/// An inclusive range of cells, `min..=max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub min: GridPos,
    pub max: GridPos,
}

impl GridBounds {
    pub const fn new(min: GridPos, max: GridPos) -> Self {
        Self { min, max }
    }

    /// Always-empty bounds.
    pub const EMPTY: Self = Self {
        min: GridPos::new(0, 0),
        max: GridPos::new(-1, -1),
    };

    /// Bounds covering a `w × h` block whose top-left cell is `(x, y)`.
    /// Non-positive sizes are empty; the far edge saturates at `i32::MAX`.
    pub const fn from_rect(x: i32, y: i32, w: i32, h: i32) -> Self {
        if w <= 0 || h <= 0 {
            return Self::EMPTY;
        }
        Self {
            min: GridPos::new(x, y),
            max: GridPos::new(x.saturating_add(w - 1), y.saturating_add(h - 1)),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y
    }

    pub const fn contains(&self, pos: GridPos) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }

    /// Intersect with the valid cells of a map. May produce empty bounds.
    pub fn clamp_to(&self, size: GridSize) -> Self {
        Self {
            min: GridPos::new(self.min.x.max(0), self.min.y.max(0)),
            max: GridPos::new(
                self.max.x.min(size.width.saturating_sub(1)),
                self.max.y.min(size.height.saturating_sub(1)),
            ),
        }
    }

    pub fn intersects(&self, other: &GridBounds) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Iterate cells row by row. Empty bounds yield nothing.
    pub fn cells(self) -> impl Iterator<Item = GridPos> {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| GridPos::new(x, y)))
    }
}

// ─── Key parsing ─────────────────────────────────────────────────────────

/// Parse a persisted `"x,y"` cell key. Whitespace around the comma and the
/// whole key is tolerated; anything else is rejected.
pub fn parse_cell_key(key: &str) -> Result<GridPos> {
    parse_cell
        .parse(key.trim())
        .map_err(|_| MapError::InvalidCellKey(key.to_string()))
}

fn parse_cell(input: &mut &str) -> ModalResult<GridPos> {
    separated_pair(parse_int, (space0, ',', space0), parse_int)
        .map(|(x, y)| GridPos::new(x, y))
        .parse_next(input)
}

fn parse_int(input: &mut &str) -> ModalResult<i32> {
    let start = *input;
    if input.starts_with('-') {
        *input = &input[1..];
    }
    let _ = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    let matched = &start[..start.len() - input.len()];
    matched
        .parse::<i32>()
        .map_err(|_| ErrMode::Backtrack(ContextError::new()))
}
