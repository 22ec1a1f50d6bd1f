pub mod cell;
pub mod config;
pub mod error;
pub mod fog;
pub mod geometry;
pub mod id;
pub mod model;
pub mod viewport;

pub use cell::{GridBounds, GridPos, GridSize, parse_cell_key};
pub use config::ViewConfig;
pub use error::MapError;
pub use fog::{BRUSH_SIZE, FogOfWar, brush_origin};
pub use geometry::{
    AreaShape, MeasureKind, Template, area_cells, distance_feet, has_line_of_sight, line_cells,
    measure_template, within_radius,
};
pub use id::EntityId;
pub use model::*;
pub use viewport::{ScreenPoint, Viewport};
