//! Layer trait and the ordered composition pipeline.
//!
//! ## Fixed order
//!
//! | Layer      | z  |
//! |------------|----|
//! | Background | 0  |
//! | Grid       | 10 |
//! | Terrain    | 20 |
//! | Tokens     | 30 |
//! | FogOfWar   | 40 |
//! | Ui         | 50 |
//!
//! Fog sits above tokens and terrain so hidden content is occluded in player
//! view; UI is always topmost. The pipeline sorts by z-index on insertion, so
//! the order does not depend on how layers are registered.

use crate::background::BackgroundLayer;
use crate::context::RenderContext;
use crate::fog::FogLayer;
use crate::grid::GridLayer;
use crate::overlay::UiLayer;
use crate::surface::Surface;
use crate::terrain::TerrainLayer;
use crate::tokens::TokenLayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Background,
    Grid,
    Terrain,
    Tokens,
    FogOfWar,
    Ui,
}

impl LayerKind {
    pub const ALL: [LayerKind; 6] = [
        LayerKind::Background,
        LayerKind::Grid,
        LayerKind::Terrain,
        LayerKind::Tokens,
        LayerKind::FogOfWar,
        LayerKind::Ui,
    ];

    pub const fn z_index(self) -> i32 {
        match self {
            LayerKind::Background => 0,
            LayerKind::Grid => 10,
            LayerKind::Terrain => 20,
            LayerKind::Tokens => 30,
            LayerKind::FogOfWar => 40,
            LayerKind::Ui => 50,
        }
    }
}

/// One stage of the frame.
pub trait Layer {
    fn kind(&self) -> LayerKind;

    fn z_index(&self) -> i32 {
        self.kind().z_index()
    }

    /// Draw this layer. Must not assume anything about what earlier layers
    /// drew beyond their z-order.
    fn render(&self, surface: &mut dyn Surface, ctx: &RenderContext<'_>);
}

struct Entry {
    layer: Box<dyn Layer>,
    visible: bool,
}

/// Layers in ascending z-order, each with its own visibility flag.
pub struct Pipeline {
    entries: Vec<Entry>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::standard()
    }
}

impl Pipeline {
    /// An empty pipeline.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The six battle-map layers.
    pub fn standard() -> Self {
        let mut pipeline = Self::new();
        pipeline.push(Box::new(BackgroundLayer));
        pipeline.push(Box::new(GridLayer));
        pipeline.push(Box::new(TerrainLayer));
        pipeline.push(Box::new(TokenLayer));
        pipeline.push(Box::new(FogLayer));
        pipeline.push(Box::new(UiLayer));
        pipeline
    }

    /// Insert a layer after every layer with a z-index <= its own.
    pub fn push(&mut self, layer: Box<dyn Layer>) {
        let z = layer.z_index();
        let at = self
            .entries
            .iter()
            .position(|e| e.layer.z_index() > z)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            at,
            Entry {
                layer,
                visible: true,
            },
        );
    }

    /// Show or hide every layer of `kind`. Returns whether any layer matched.
    pub fn set_layer_visible(&mut self, kind: LayerKind, visible: bool) -> bool {
        let mut found = false;
        for entry in self.entries.iter_mut().filter(|e| e.layer.kind() == kind) {
            entry.visible = visible;
            found = true;
        }
        found
    }

    pub fn is_layer_visible(&self, kind: LayerKind) -> bool {
        self.entries
            .iter()
            .any(|e| e.layer.kind() == kind && e.visible)
    }

    /// Layer kinds in render order.
    pub fn kinds(&self) -> Vec<LayerKind> {
        self.entries.iter().map(|e| e.layer.kind()).collect()
    }

    /// Render one frame, bottom layer first.
    pub fn render(&self, surface: &mut dyn Surface, ctx: &RenderContext<'_>) {
        for entry in &self.entries {
            if !entry.visible {
                continue;
            }
            log::trace!("render layer {:?}", entry.layer.kind());
            entry.layer.render(surface, ctx);
        }
    }
}
