//! Battle-map read models: map settings, terrain overlays, and tokens.
//!
//! These are snapshots supplied by the persistence layer. The engine reads
//! them every frame and only ever mutates the map's revealed-cell set (via
//! the fog model). Token positions change exclusively through the host
//! committing a `TokenDragged` event and pushing a fresh token list.
//!
//! Decoding is forgiving where a bad value only affects decoration: an
//! unparsable color falls back to the type default, and a malformed entry in
//! a token's `conditions` or `auras` list is dropped on its own.

use crate::cell::{GridBounds, GridPos, GridSize};
use crate::error::Result;
use crate::fog::FogOfWar;
use crate::id::EntityId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

/// Game-feet per grid cell on a standard map.
pub const FEET_PER_CELL: i32 = 5;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// Helper to parse a single hex digit.
pub fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
    /// The string may optionally start with `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();

        let short = |i: usize| hex_val(bytes[i]).map(|v| (v * 17) as f32 / 255.0);
        let long = |i: usize| {
            let hi = hex_val(bytes[i])?;
            let lo = hex_val(bytes[i + 1])?;
            Some((hi << 4 | lo) as f32 / 255.0)
        };

        match bytes.len() {
            3 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, 1.0)),
            4 => Some(Self::rgba(short(0)?, short(1)?, short(2)?, short(3)?)),
            6 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, 1.0)),
            8 => Some(Self::rgba(long(0)?, long(2)?, long(4)?, long(6)?)),
            _ => None,
        }
    }

    /// Emit as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (byte(self.r), byte(self.g), byte(self.b), byte(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color {s:?}")))
    }
}

// ─── Terrain ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TerrainType {
    #[default]
    Normal,
    DifficultTerrain,
    Water,
    Lava,
    Pit,
    Wall,
    Cover,
    SpellEffect,
    Hazard,
    Custom,
}

/// The cells an overlay covers. Coordinates and radius are in cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum Region {
    Rect { x: i32, y: i32, w: i32, h: i32 },
    /// Centered on cell `(x, y)`; covers cells within Euclidean distance `r`.
    Circle { x: i32, y: i32, r: f32 },
}

impl Region {
    pub fn contains(&self, cell: GridPos) -> bool {
        match *self {
            Region::Rect { x, y, w, h } => GridBounds::from_rect(x, y, w, h).contains(cell),
            Region::Circle { x, y, r } => {
                let dx = f64::from(cell.x) - f64::from(x);
                let dy = f64::from(cell.y) - f64::from(y);
                let r = f64::from(r);
                dx * dx + dy * dy <= r * r
            }
        }
    }

    /// Smallest inclusive cell range containing the region.
    pub fn bounds(&self) -> GridBounds {
        match *self {
            Region::Rect { x, y, w, h } => GridBounds::from_rect(x, y, w, h),
            Region::Circle { x, y, r } => {
                // `as` saturates, and NaN becomes 0.
                let reach = r.max(0.0).floor() as i32;
                let center = GridPos::new(x, y);
                GridBounds::new(center.offset(-reach, -reach), center.offset(reach, reach))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerrainOverlay {
    pub id: EntityId,
    #[serde(rename = "type", default)]
    pub kind: TerrainType,
    pub region: Region,
    /// Explicit fill color; `None` uses the per-type default.
    #[serde(default, deserialize_with = "lenient_color")]
    pub color: Option<Color>,
    #[serde(default = "default_overlay_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub blocks_movement: bool,
    #[serde(default)]
    pub blocks_sight: bool,
    #[serde(default)]
    pub effect_description: Option<String>,
}

fn default_overlay_opacity() -> f32 {
    0.5
}

impl TerrainOverlay {
    pub fn new(id: EntityId, kind: TerrainType, region: Region) -> Self {
        Self {
            id,
            kind,
            region,
            color: None,
            opacity: default_overlay_opacity(),
            blocks_movement: matches!(kind, TerrainType::Wall | TerrainType::Pit),
            blocks_sight: matches!(kind, TerrainType::Wall),
            effect_description: None,
        }
    }
}

/// Decode a persisted terrain list (JSON array of overlay objects).
pub fn terrain_from_json(json: &str) -> Result<Vec<TerrainOverlay>> {
    Ok(serde_json::from_str(json)?)
}

/// Encode terrain overlays as a JSON array.
pub fn terrain_to_json(terrain: &[TerrainOverlay]) -> Result<String> {
    Ok(serde_json::to_string(terrain)?)
}

// ─── Tokens ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CreatureSize {
    Tiny,
    Small,
    #[default]
    Medium,
    Large,
    Huge,
    Gargantuan,
}

impl CreatureSize {
    /// Side length of the token's footprint in cells.
    pub const fn footprint(self) -> i32 {
        match self {
            CreatureSize::Tiny | CreatureSize::Small | CreatureSize::Medium => 1,
            CreatureSize::Large => 2,
            CreatureSize::Huge => 3,
            CreatureSize::Gargantuan => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TokenShape {
    #[default]
    Circle,
    Square,
}

/// A radius effect drawn around a token (e.g. Spirit Guardians).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aura {
    pub radius_feet: f32,
    #[serde(default, deserialize_with = "lenient_color")]
    pub color: Option<Color>,
}

impl Aura {
    pub fn is_drawable(&self) -> bool {
        self.radius_feet.is_finite() && self.radius_feet > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: EntityId,
    pub grid_x: i32,
    pub grid_y: i32,
    #[serde(default)]
    pub size: CreatureSize,
    #[serde(default)]
    pub shape: TokenShape,
    #[serde(default, deserialize_with = "lenient_color")]
    pub color: Option<Color>,
    #[serde(default)]
    pub is_enemy: bool,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "currentHP")]
    pub current_hp: i32,
    #[serde(default, rename = "maxHP")]
    pub max_hp: i32,
    #[serde(default, rename = "tempHP")]
    pub temp_hp: i32,
    #[serde(default)]
    pub movement_used: i32,
    #[serde(default)]
    pub movement_total: i32,
    #[serde(default, deserialize_with = "lenient_list")]
    pub conditions: SmallVec<[String; 2]>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub auras: SmallVec<[Aura; 1]>,
}

fn default_true() -> bool {
    true
}

impl Token {
    pub fn new(id: EntityId, grid_x: i32, grid_y: i32) -> Self {
        Self {
            id,
            grid_x,
            grid_y,
            size: CreatureSize::Medium,
            shape: TokenShape::Circle,
            color: None,
            is_enemy: false,
            is_visible: true,
            label: String::new(),
            current_hp: 0,
            max_hp: 0,
            temp_hp: 0,
            movement_used: 0,
            movement_total: 0,
            conditions: SmallVec::new(),
            auras: SmallVec::new(),
        }
    }

    pub fn position(&self) -> GridPos {
        GridPos::new(self.grid_x, self.grid_y)
    }

    pub fn footprint(&self) -> i32 {
        self.size.footprint()
    }

    /// Cells covered by the token, anchored at its top-left cell.
    pub fn cell_bounds(&self) -> GridBounds {
        let n = self.footprint();
        GridBounds::from_rect(self.grid_x, self.grid_y, n, n)
    }

    pub fn occupies(&self, cell: GridPos) -> bool {
        self.cell_bounds().contains(cell)
    }

    /// Fraction of hit points remaining, or `None` when HP isn't tracked.
    pub fn hp_ratio(&self) -> Option<f32> {
        (self.max_hp > 0).then(|| (self.current_hp as f32 / self.max_hp as f32).clamp(0.0, 1.0))
    }

    /// Feet of movement left this turn, or `None` when movement isn't tracked.
    pub fn movement_remaining(&self) -> Option<i32> {
        (self.movement_total > 0).then(|| (self.movement_total - self.movement_used).max(0))
    }
}

// ─── Map ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridMap {
    #[serde(default = "default_grid_extent")]
    pub grid_width: i32,
    #[serde(default = "default_grid_extent")]
    pub grid_height: i32,
    #[serde(default = "default_cell_feet")]
    pub cell_size_feet: i32,
    #[serde(default = "default_background")]
    pub background_color: Color,
    #[serde(default = "default_true")]
    pub show_grid: bool,
    #[serde(default = "default_grid_color")]
    pub grid_color: Color,
    #[serde(default = "default_grid_opacity")]
    pub grid_opacity: f32,
    #[serde(default)]
    pub revealed_cells: FogOfWar,
    #[serde(default)]
    pub terrain: Vec<TerrainOverlay>,
}

fn default_grid_extent() -> i32 {
    20
}

fn default_cell_feet() -> i32 {
    FEET_PER_CELL
}

fn default_background() -> Color {
    Color::rgb8(0x2B, 0x2B, 0x2B)
}

fn default_grid_color() -> Color {
    Color::BLACK
}

fn default_grid_opacity() -> f32 {
    0.3
}

impl Default for GridMap {
    fn default() -> Self {
        Self::new(default_grid_extent(), default_grid_extent())
    }
}

impl GridMap {
    pub fn new(grid_width: i32, grid_height: i32) -> Self {
        Self {
            grid_width,
            grid_height,
            cell_size_feet: FEET_PER_CELL,
            background_color: default_background(),
            show_grid: true,
            grid_color: default_grid_color(),
            grid_opacity: default_grid_opacity(),
            revealed_cells: FogOfWar::new(),
            terrain: Vec::new(),
        }
    }

    /// Decode a map snapshot. Revealed cells outside the grid are dropped.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut map: GridMap = serde_json::from_str(json)?;
        let size = map.size();
        map.revealed_cells.retain_in_bounds(size);
        Ok(map)
    }

    pub fn size(&self) -> GridSize {
        GridSize::new(self.grid_width, self.grid_height)
    }

    pub fn in_bounds(&self, cell: GridPos) -> bool {
        self.size().contains(cell)
    }

    /// Feet per cell, falling back to the standard 5 when unset.
    pub fn feet_per_cell(&self) -> f32 {
        if self.cell_size_feet > 0 {
            self.cell_size_feet as f32
        } else {
            FEET_PER_CELL as f32
        }
    }

    pub fn terrain_at(&self, cell: GridPos) -> impl Iterator<Item = &TerrainOverlay> {
        self.terrain.iter().filter(move |t| t.region.contains(cell))
    }

    pub fn blocks_sight(&self, cell: GridPos) -> bool {
        self.terrain_at(cell).any(|t| t.blocks_sight)
    }

    pub fn blocks_movement(&self, cell: GridPos) -> bool {
        self.terrain_at(cell).any(|t| t.blocks_movement)
    }

    /// Whether a line of sight between two cells is clear of blocking terrain.
    pub fn has_line_of_sight(&self, from: GridPos, to: GridPos) -> bool {
        crate::geometry::has_line_of_sight(from, to, |cell| self.blocks_sight(cell))
    }

    // ─── Fog shortcuts (bounds taken from this map) ──────────────────────

    pub fn is_revealed(&self, cell: GridPos) -> bool {
        self.revealed_cells.is_revealed(cell)
    }

    pub fn reveal(&mut self, x: i32, y: i32, w: i32, h: i32) -> bool {
        let size = self.size();
        self.revealed_cells.reveal(x, y, w, h, size)
    }

    pub fn hide(&mut self, x: i32, y: i32, w: i32, h: i32) -> bool {
        let size = self.size();
        self.revealed_cells.hide(x, y, w, h, size)
    }

    pub fn reveal_area(&mut self, center: GridPos, radius: i32) -> bool {
        let size = self.size();
        self.revealed_cells.reveal_area(center, radius, size)
    }

    pub fn hide_area(&mut self, center: GridPos, radius: i32) -> bool {
        let size = self.size();
        self.revealed_cells.hide_area(center, radius, size)
    }

    pub fn reset_fog(&mut self) {
        self.revealed_cells.reset();
    }
}

// ─── Lenient decoders ────────────────────────────────────────────────────

fn lenient_color<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Color>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(s) => {
            let color = Color::from_hex(&s);
            if color.is_none() {
                log::warn!("ignoring unparsable color {s:?}");
            }
            Ok(color)
        }
        other => {
            log::warn!("ignoring non-string color {other}");
            Ok(None)
        }
    }
}

/// Decode a list item by item, dropping entries that fail to decode.
fn lenient_list<'de, D, A>(deserializer: D) -> std::result::Result<SmallVec<A>, D::Error>
where
    D: Deserializer<'de>,
    A: smallvec::Array,
    A::Item: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let items = match value {
        serde_json::Value::Null => return Ok(SmallVec::new()),
        serde_json::Value::Array(items) => items,
        other => {
            log::warn!("ignoring token decoration list that is not an array: {other}");
            return Ok(SmallVec::new());
        }
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                log::warn!("skipping malformed token decoration: {e}");
                None
            }
        })
        .collect())
}
