//! Outbound domain events.
//!
//! Queued during input handling and drained by the host afterwards, so no
//! host code runs while a gesture is mid-update.

use tm_core::{EntityId, GridPos, MeasureKind, Token};

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    CellTapped {
        x: i32,
        y: i32,
    },
    TokenSelected {
        token: Token,
    },
    /// A drag ended on a different cell. The host validates and commits the
    /// move; the canvas never changes token positions itself.
    TokenDragged {
        token: EntityId,
        from: GridPos,
        to: GridPos,
    },
    ViewportChanged {
        offset_x: f32,
        offset_y: f32,
        zoom: f32,
    },
    /// The full revealed set after a change, sorted row-major.
    FogChanged {
        revealed: Vec<GridPos>,
    },
    MeasurementCompleted {
        start: GridPos,
        end: GridPos,
        kind: MeasureKind,
        distance_feet: i32,
    },
}

impl MapEvent {
    /// Host-facing event name.
    pub fn name(&self) -> &'static str {
        match self {
            MapEvent::CellTapped { .. } => "cellTapped",
            MapEvent::TokenSelected { .. } => "tokenSelected",
            MapEvent::TokenDragged { .. } => "tokenDragged",
            MapEvent::ViewportChanged { .. } => "viewportChanged",
            MapEvent::FogChanged { .. } => "fogChanged",
            MapEvent::MeasurementCompleted { .. } => "measurementCompleted",
        }
    }

    /// Revealed cells as persisted `"x,y"` keys (only for `FogChanged`).
    pub fn revealed_keys(&self) -> Option<Vec<String>> {
        match self {
            MapEvent::FogChanged { revealed } => Some(revealed.iter().map(GridPos::key).collect()),
            _ => None,
        }
    }
}
