use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Viewport tuning. Every field has a default so hosts can supply a partial
/// JSON object (or none at all).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewConfig {
    /// On-screen pixel size of one cell at zoom 1.0.
    pub base_cell_size: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Multiplicative factor for one zoom-in / zoom-out step.
    pub zoom_step: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            base_cell_size: 40.0,
            min_zoom: 0.25,
            max_zoom: 4.0,
            zoom_step: 1.2,
        }
    }
}

impl ViewConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ViewConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Replace nonsensical values with defaults so the viewport invariant
    /// (strictly positive cell size) can always hold.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let positive = |v: f32, fallback: f32| if v.is_finite() && v > 0.0 { v } else { fallback };

        let base_cell_size = positive(self.base_cell_size, defaults.base_cell_size);
        let mut min_zoom = positive(self.min_zoom, defaults.min_zoom);
        let mut max_zoom = positive(self.max_zoom, defaults.max_zoom);
        if min_zoom > max_zoom {
            std::mem::swap(&mut min_zoom, &mut max_zoom);
        }
        let zoom_step = if self.zoom_step.is_finite() && self.zoom_step > 1.0 {
            self.zoom_step
        } else {
            defaults.zoom_step
        };

        Self {
            base_cell_size,
            min_zoom,
            max_zoom,
            zoom_step,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let config = ViewConfig::from_json(r#"{"baseCellSize": 64}"#).unwrap();
        assert_eq!(config.base_cell_size, 64.0);
        assert_eq!(config.max_zoom, 4.0);
    }

    #[test]
    fn nonsense_values_are_sanitized() {
        let config = ViewConfig::from_json(
            r#"{"baseCellSize": -3, "minZoom": 8, "maxZoom": 0.5, "zoomStep": 0.9}"#,
        )
        .unwrap();
        assert_eq!(config.base_cell_size, 40.0);
        assert_eq!((config.min_zoom, config.max_zoom), (0.5, 8.0));
        assert_eq!(config.zoom_step, 1.2);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(ViewConfig::from_json("{baseCellSize").is_err());
    }
}
