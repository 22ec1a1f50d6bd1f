pub mod background;
pub mod context;
pub mod fog;
pub mod grid;
pub mod hit;
pub mod layer;
pub mod overlay;
pub mod recording;
pub mod scene;
pub mod surface;
pub mod terrain;
pub mod theme;
pub mod tokens;

pub use context::{DragPreview, MeasurePreview, RenderContext};
pub use hit::{hit_test_tokens, tokens_at};
pub use layer::{Layer, LayerKind, Pipeline};
pub use recording::{DisplayList, DrawOp};
pub use scene::VelloSurface;
pub use surface::{Primitive, Surface, TextAnchor};
pub use theme::Theme;
