//! Render theme: colors, opacities, and thresholds used by the layers.
//!
//! Loadable from JSON; every field is optional and falls back to the dark
//! preset.

use serde::{Deserialize, Serialize};
use tm_core::{Color, MapError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    // Fog
    /// Fog tint. Its alpha is ignored: player view is always opaque.
    pub fog_color: Color,
    /// Fog alpha in GM preview.
    pub fog_dm_opacity: f32,
    pub soft_fog_edges: bool,
    /// Depth of the soft-edge feather, as a fraction of a cell.
    pub fog_feather: f32,

    // Grid
    pub major_line_every: i32,
    /// Minimum effective cell size (px) before coordinate labels appear.
    pub grid_label_min_cell: f32,
    pub grid_label_color: Color,

    // Tokens
    pub ally_color: Color,
    pub enemy_color: Color,
    pub token_outline: Color,
    pub selection_color: Color,
    pub token_label_color: Color,
    pub aura_opacity: f32,
    pub hp_low: Color,
    pub hp_mid: Color,
    pub hp_high: Color,
    pub hp_track: Color,
    pub temp_hp_color: Color,
    pub badge_color: Color,
    pub badge_text: Color,

    // Overlays
    pub hover_color: Color,
    pub measure_color: Color,
    pub measure_fill_opacity: f32,
    pub brush_color: Color,
    pub terrain_label_color: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark table, the default.
    pub fn dark() -> Self {
        Self {
            fog_color: Color::rgb8(0x10, 0x10, 0x14),
            fog_dm_opacity: 0.5,
            soft_fog_edges: true,
            fog_feather: 0.25,
            major_line_every: 5,
            grid_label_min_cell: 20.0,
            grid_label_color: Color::rgba(1.0, 1.0, 1.0, 0.6),
            ally_color: Color::rgb8(0x3A, 0x7B, 0xD5),
            enemy_color: Color::rgb8(0xD6, 0x45, 0x41),
            token_outline: Color::rgb8(0x1A, 0x1A, 0x1A),
            selection_color: Color::rgb8(0xFF, 0xD7, 0x00),
            token_label_color: Color::WHITE,
            aura_opacity: 0.15,
            hp_low: Color::rgb8(0xE5, 0x39, 0x35),
            hp_mid: Color::rgb8(0xFB, 0x8C, 0x00),
            hp_high: Color::rgb8(0x43, 0xA0, 0x47),
            hp_track: Color::rgba(0.0, 0.0, 0.0, 0.6),
            temp_hp_color: Color::rgb8(0x42, 0xA5, 0xF5),
            badge_color: Color::rgb8(0x37, 0x47, 0x4F),
            badge_text: Color::WHITE,
            hover_color: Color::rgba(1.0, 1.0, 1.0, 0.8),
            measure_color: Color::rgb8(0xFF, 0x57, 0x22),
            measure_fill_opacity: 0.25,
            brush_color: Color::WHITE,
            terrain_label_color: Color::WHITE,
        }
    }

    /// Parchment table.
    pub fn light() -> Self {
        Self {
            fog_color: Color::rgb8(0x4A, 0x4A, 0x52),
            grid_label_color: Color::rgba(0.0, 0.0, 0.0, 0.6),
            token_outline: Color::rgb8(0x20, 0x20, 0x20),
            hover_color: Color::rgba(0.0, 0.0, 0.0, 0.7),
            brush_color: Color::rgb8(0x20, 0x20, 0x20),
            terrain_label_color: Color::rgb8(0x20, 0x20, 0x20),
            ..Self::dark()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Fog alpha for the current view mode. Player view is pinned to 1.0
    /// whatever the theme says, so unrevealed cells never show through.
    pub fn fog_opacity(&self, is_dm_view: bool) -> f32 {
        if is_dm_view {
            self.fog_dm_opacity.clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Fog fill for the current view mode, built from the opaque tint.
    pub fn fog_fill(&self, is_dm_view: bool) -> Color {
        Color {
            a: self.fog_opacity(is_dm_view),
            ..self.fog_color
        }
    }

    /// HP bar color: red below 25%, orange below 50%, green otherwise.
    pub fn hp_color(&self, ratio: f32) -> Color {
        if ratio < 0.25 {
            self.hp_low
        } else if ratio < 0.5 {
            self.hp_mid
        } else {
            self.hp_high
        }
    }
}
