//! The map canvas controller.
//!
//! Owns the read models supplied by the host (map, tokens, background), the
//! viewport, the render pipeline, and the interaction state machine. Every
//! setter marks the frame dirty; the host calls `render` when
//! `needs_redraw()` is set and drains outbound events after each input.

use crate::events::MapEvent;
use crate::input::PointerEvent;
use crate::interaction::{Board, Gesture, Interaction};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::ToolMode;
use peniko::Image;
use tm_core::{GridMap, GridPos, ScreenPoint, TerrainOverlay, Token, ViewConfig, Viewport};
use tm_render::{
    DragPreview, LayerKind, MeasurePreview, Pipeline, RenderContext, Surface, Theme,
};

pub struct MapCanvas {
    map: Option<GridMap>,
    tokens: Vec<Token>,
    background: Option<Image>,
    viewport: Viewport,
    config: ViewConfig,
    theme: Theme,
    pipeline: Pipeline,
    tool: ToolMode,
    show_grid: bool,
    use_fog: bool,
    is_dm_view: bool,
    interaction: Interaction,
    dirty: bool,
}

impl MapCanvas {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_config(width, height, ViewConfig::default())
    }

    pub fn with_config(width: f32, height: f32, config: ViewConfig) -> Self {
        let config = config.sanitized();
        Self {
            map: None,
            tokens: Vec::new(),
            background: None,
            viewport: Viewport::new(width, height, &config),
            config,
            theme: Theme::default(),
            pipeline: Pipeline::standard(),
            tool: ToolMode::default(),
            show_grid: true,
            use_fog: true,
            is_dm_view: false,
            interaction: Interaction::new(),
            dirty: true,
        }
    }

    // ─── Inbound setters ─────────────────────────────────────────────────

    /// Replace the map snapshot. Any gesture in flight is cancelled and fog
    /// history is dropped, since it described a different map.
    pub fn set_map(&mut self, map: Option<GridMap>) {
        self.cancel_gesture();
        self.interaction.fog_history_mut().clear();
        self.map = map.map(|mut m| {
            let size = m.size();
            m.revealed_cells.retain_in_bounds(size);
            m
        });
        self.dirty = true;
    }

    /// Replace the token list. A selection or drag whose token disappeared
    /// is dropped.
    pub fn set_tokens(&mut self, tokens: Vec<Token>) {
        self.tokens = tokens;
        let exists = |id| self.tokens.iter().any(|t| t.id == id);
        if let Some(id) = self.interaction.selected()
            && !exists(id)
        {
            self.interaction.set_selected(None);
        }
        if let Some(token) = self.interaction.gesture().dragged_token()
            && !exists(token)
        {
            self.cancel_gesture();
        }
        self.dirty = true;
    }

    pub fn set_terrain(&mut self, terrain: Vec<TerrainOverlay>) {
        match self.map.as_mut() {
            Some(map) => map.terrain = terrain,
            None => log::debug!("terrain set without a map; ignored"),
        }
        self.dirty = true;
    }

    /// Switch tools. A gesture belonging to the old tool is cancelled.
    pub fn set_tool(&mut self, tool: ToolMode) {
        if tool == self.tool {
            return;
        }
        self.cancel_gesture();
        self.tool = tool;
        self.dirty = true;
    }

    /// Switch tools by host-facing name; unknown names select `Select`.
    pub fn set_tool_name(&mut self, name: &str) {
        let tool = ToolMode::from_name(name).unwrap_or_else(|| {
            log::debug!("unknown tool {name:?}; using select");
            ToolMode::Select
        });
        self.set_tool(tool);
    }

    pub fn set_show_grid(&mut self, show: bool) {
        self.show_grid = show;
        self.dirty = true;
    }

    pub fn set_use_fog(&mut self, use_fog: bool) {
        self.use_fog = use_fog;
        self.dirty = true;
    }

    pub fn set_dm_view(&mut self, is_dm_view: bool) {
        self.is_dm_view = is_dm_view;
        self.dirty = true;
    }

    /// External zoom setter, pivoting about the viewport center. Does not
    /// emit `ViewportChanged`; the host already knows.
    pub fn set_zoom_level(&mut self, zoom: f32) {
        if self.viewport.set_zoom(zoom) {
            self.dirty = true;
        }
    }

    /// `None` clears the background (also what hosts pass for an image that
    /// failed to decode).
    pub fn set_background(&mut self, image: Option<Image>) {
        self.background = image;
        self.dirty = true;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.dirty = true;
    }

    pub fn set_layer_visible(&mut self, kind: LayerKind, visible: bool) {
        if self.pipeline.set_layer_visible(kind, visible) {
            self.dirty = true;
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.resize(width, height);
        self.dirty = true;
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed one pointer event. Returns whether the frame needs a redraw.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        let mut board = Board {
            viewport: &mut self.viewport,
            map: self.map.as_mut(),
            tokens: &self.tokens,
            tool: self.tool,
            is_dm_view: self.is_dm_view,
        };
        let changed = self.interaction.handle(event, &mut board);
        self.dirty |= changed;
        changed
    }

    /// Resolve and apply a keyboard shortcut. Returns the action taken.
    pub fn handle_key(
        &mut self,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let action = ShortcutMap::resolve(key, ctrl, shift, alt, meta)?;
        match action {
            ShortcutAction::Tool(tool) => self.set_tool(tool),
            ShortcutAction::Undo => {
                self.undo_fog();
            }
            ShortcutAction::Redo => {
                self.redo_fog();
            }
            ShortcutAction::ZoomIn => self.zoom_step(self.config.zoom_step),
            ShortcutAction::ZoomOut => self.zoom_step(1.0 / self.config.zoom_step),
            ShortcutAction::ResetView => self.reset_view(),
            ShortcutAction::ToggleGrid => self.set_show_grid(!self.show_grid),
            ShortcutAction::ToggleDmView => self.set_dm_view(!self.is_dm_view),
            ShortcutAction::Cancel => {
                self.handle_pointer(PointerEvent::Cancel);
            }
        }
        Some(action)
    }

    /// Take every event queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        self.interaction.drain_events()
    }

    // ─── View ────────────────────────────────────────────────────────────

    fn zoom_step(&mut self, factor: f32) {
        let center = ScreenPoint::new(self.viewport.width() / 2.0, self.viewport.height() / 2.0);
        if self.viewport.zoom_at(factor, center) {
            self.interaction.emit_viewport(&self.viewport);
            self.dirty = true;
        }
    }

    /// Back to zoom 1.0 with the grid origin at the top-left corner.
    pub fn reset_view(&mut self) {
        self.viewport.set_zoom(1.0);
        self.viewport.set_pan(0.0, 0.0);
        self.interaction.emit_viewport(&self.viewport);
        self.dirty = true;
    }

    pub fn center_on(&mut self, cell: GridPos) {
        self.viewport.center_on_grid(cell);
        self.interaction.emit_viewport(&self.viewport);
        self.dirty = true;
    }

    // ─── Fog ─────────────────────────────────────────────────────────────

    /// Reveal every cell within `radius` of `center` (spell/sight radius).
    /// Returns whether any cell changed.
    pub fn reveal_area(&mut self, center: GridPos, radius: i32) -> bool {
        self.edit_fog(|map| map.reveal_area(center, radius))
    }

    /// Hide every cell within `radius` of `center`.
    pub fn hide_area(&mut self, center: GridPos, radius: i32) -> bool {
        self.edit_fog(|map| map.hide_area(center, radius))
    }

    /// Hide the whole map again.
    pub fn reset_fog(&mut self) -> bool {
        self.edit_fog(|map| {
            let had_any = !map.revealed_cells.is_empty();
            map.reset_fog();
            had_any
        })
    }

    pub fn undo_fog(&mut self) -> bool {
        let Some(map) = self.map.as_mut() else {
            return false;
        };
        if !self.interaction.fog_history_mut().undo(&mut map.revealed_cells) {
            return false;
        }
        self.fog_changed();
        true
    }

    pub fn redo_fog(&mut self) -> bool {
        let Some(map) = self.map.as_mut() else {
            return false;
        };
        if !self.interaction.fog_history_mut().redo(&mut map.revealed_cells) {
            return false;
        }
        self.fog_changed();
        true
    }

    /// Run a programmatic fog edit as one undo step, emitting `FogChanged`
    /// when it changed anything.
    fn edit_fog(&mut self, edit: impl FnOnce(&mut GridMap) -> bool) -> bool {
        // A brush stroke in progress would swallow this edit into its batch.
        if self.interaction.gesture().is_painting_fog() {
            self.cancel_gesture();
        }
        let Some(map) = self.map.as_mut() else {
            return false;
        };
        let history = self.interaction.fog_history_mut();
        history.begin_batch(&map.revealed_cells);
        let changed = edit(map);
        history.end_batch(&map.revealed_cells);
        if changed {
            self.fog_changed();
        }
        changed
    }

    fn fog_changed(&mut self) {
        if let Some(map) = &self.map {
            let revealed = map.revealed_cells.revealed_cells();
            self.interaction.emit(MapEvent::FogChanged { revealed });
        }
        self.dirty = true;
    }

    fn cancel_gesture(&mut self) {
        self.handle_pointer(PointerEvent::Cancel);
    }

    // ─── Rendering ───────────────────────────────────────────────────────

    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    /// Draw one frame and clear the dirty flag.
    pub fn render(&mut self, surface: &mut dyn Surface) {
        let ctx = self.render_context();
        self.pipeline.render(surface, &ctx);
        self.dirty = false;
    }

    /// The per-frame context the pipeline draws from.
    pub fn render_context(&self) -> RenderContext<'_> {
        let mut ctx = RenderContext::new(&self.viewport, &self.theme);
        ctx.map = self.map.as_ref();
        ctx.tokens = &self.tokens;
        ctx.background = self.background.as_ref();
        ctx.selected = self.interaction.selected();
        ctx.hover = self.interaction.hover();
        ctx.show_grid = self.show_grid;
        ctx.use_fog = self.use_fog;
        ctx.is_dm_view = self.is_dm_view;
        ctx.brush_preview = self.tool.is_fog();

        match *self.interaction.gesture() {
            Gesture::Measuring { kind, start, end } => {
                ctx.measurement = Some(MeasurePreview { kind, start, end });
            }
            Gesture::DraggingToken { token, .. } => {
                ctx.drag = self.interaction.hover().map(|cell| DragPreview { token, cell });
            }
            _ => {}
        }
        ctx
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn map(&self) -> Option<&GridMap> {
        self.map.as_ref()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    pub fn gesture(&self) -> &Gesture {
        self.interaction.gesture()
    }

    pub fn hover_cell(&self) -> Option<GridPos> {
        self.interaction.hover()
    }

    pub fn selected_token(&self) -> Option<&Token> {
        let id = self.interaction.selected()?;
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn can_undo_fog(&self) -> bool {
        self.interaction.fog_history().can_undo()
    }

    pub fn can_redo_fog(&self) -> bool {
        self.interaction.fog_history().can_redo()
    }
}
