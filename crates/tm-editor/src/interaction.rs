//! Interaction state machine.
//!
//! Pointer events arrive in screen pixels and are converted to grid cells
//! immediately. The active `ToolMode` decides what a press starts; the
//! resulting `Gesture` decides what move/release do. At most one gesture is
//! active at a time and `cancel` returns to `Idle` from any state.
//!
//! ```text
//!            press (by tool)
//!   Idle ─────────────────────► Panning | DraggingToken | Measuring | PaintingFog
//!    ▲                                        │
//!    └──────────── release / cancel ──────────┘
//! ```
//!
//! Outbound events are queued and drained by the host.

use crate::commands::FogHistory;
use crate::events::MapEvent;
use crate::input::PointerEvent;
use crate::tools::ToolMode;
use std::collections::VecDeque;
use tm_core::{
    BRUSH_SIZE, EntityId, GridMap, GridPos, MeasureKind, ScreenPoint, Token, Viewport,
    brush_origin, distance_feet,
};
use tm_render::hit_test_tokens;

/// The gesture in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Panning {
        last: ScreenPoint,
    },
    /// Only a preview; the token itself does not move until the host
    /// commits the `TokenDragged` event.
    DraggingToken {
        token: EntityId,
        from: GridPos,
    },
    Measuring {
        kind: MeasureKind,
        start: GridPos,
        end: GridPos,
    },
    PaintingFog {
        reveal: bool,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, Gesture::Panning { .. })
    }

    pub fn is_dragging_token(&self) -> bool {
        matches!(self, Gesture::DraggingToken { .. })
    }

    pub fn is_painting_fog(&self) -> bool {
        matches!(self, Gesture::PaintingFog { .. })
    }

    pub fn dragged_token(&self) -> Option<EntityId> {
        match self {
            Gesture::DraggingToken { token, .. } => Some(*token),
            _ => None,
        }
    }

    pub fn measure_start(&self) -> Option<GridPos> {
        match self {
            Gesture::Measuring { start, .. } => Some(*start),
            _ => None,
        }
    }

    pub fn measure_end(&self) -> Option<GridPos> {
        match self {
            Gesture::Measuring { end, .. } => Some(*end),
            _ => None,
        }
    }
}

/// Everything a pointer event may read or mutate, borrowed from the owner
/// for the duration of one event.
pub struct Board<'a> {
    pub viewport: &'a mut Viewport,
    pub map: Option<&'a mut GridMap>,
    pub tokens: &'a [Token],
    pub tool: ToolMode,
    pub is_dm_view: bool,
}

#[derive(Debug, Default)]
pub struct Interaction {
    gesture: Gesture,
    hover: Option<GridPos>,
    selected: Option<EntityId>,
    events: VecDeque<MapEvent>,
    fog_history: FogHistory,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn hover(&self) -> Option<GridPos> {
        self.hover
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn set_selected(&mut self, id: Option<EntityId>) {
        self.selected = id;
    }

    pub fn fog_history(&self) -> &FogHistory {
        &self.fog_history
    }

    pub fn fog_history_mut(&mut self) -> &mut FogHistory {
        &mut self.fog_history
    }

    /// Queue an outbound event.
    pub fn emit(&mut self, event: MapEvent) {
        log::debug!("emit {}", event.name());
        self.events.push_back(event);
    }

    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<MapEvent> {
        self.events.drain(..).collect()
    }

    /// Dispatch one pointer event. Returns whether the frame needs a redraw.
    pub fn handle(&mut self, event: PointerEvent, board: &mut Board<'_>) -> bool {
        if let Some(p) = event.position()
            && !p.is_finite()
        {
            log::debug!("ignoring non-finite pointer event {event:?}");
            return false;
        }
        match event {
            PointerEvent::Press { x, y } => self.press(ScreenPoint::new(x, y), board),
            PointerEvent::Move { x, y } => self.pointer_move(ScreenPoint::new(x, y), board),
            PointerEvent::Release { x, y } => self.release(ScreenPoint::new(x, y), board),
            PointerEvent::Cancel => self.cancel(board),
            PointerEvent::Scroll { x, y, zoom } => self.scroll(ScreenPoint::new(x, y), zoom, board),
        }
    }

    fn press(&mut self, p: ScreenPoint, board: &mut Board<'_>) -> bool {
        if !self.gesture.is_idle() {
            log::debug!("press during {:?}; cancelling stale gesture", self.gesture);
            self.cancel(board);
        }

        let cell = board.viewport.screen_to_grid(p);
        self.hover = Some(cell);

        match board.tool {
            ToolMode::Pan => {
                self.gesture = Gesture::Panning { last: p };
            }
            ToolMode::Select => {
                self.selected = hit_test_tokens(board.tokens, cell, self.selected, board.is_dm_view);
                if let Some(token) = self.selected_in(board.tokens) {
                    let token = token.clone();
                    self.emit(MapEvent::TokenSelected { token });
                }
                self.emit(MapEvent::CellTapped {
                    x: cell.x,
                    y: cell.y,
                });
            }
            ToolMode::Move => {
                let hit = hit_test_tokens(board.tokens, cell, self.selected, board.is_dm_view);
                if let Some(token) = hit.and_then(|id| board.tokens.iter().find(|t| t.id == id)) {
                    self.selected = Some(token.id);
                    self.gesture = Gesture::DraggingToken {
                        token: token.id,
                        from: token.position(),
                    };
                }
            }
            ToolMode::MeasureLine
            | ToolMode::MeasureCone
            | ToolMode::MeasureCircle
            | ToolMode::MeasureSquare => {
                if let Some(kind) = board.tool.measure_kind() {
                    self.gesture = Gesture::Measuring {
                        kind,
                        start: cell,
                        end: cell,
                    };
                }
            }
            ToolMode::RevealFog | ToolMode::HideFog => {
                let reveal = board.tool == ToolMode::RevealFog;
                if let Some(map) = board.map.as_deref_mut() {
                    self.fog_history.begin_batch(&map.revealed_cells);
                    paint_brush(map, cell, reveal);
                    self.gesture = Gesture::PaintingFog { reveal };
                }
            }
            ToolMode::PlaceToken => {
                self.emit(MapEvent::CellTapped {
                    x: cell.x,
                    y: cell.y,
                });
            }
        }
        log::debug!("press at {cell} with {} -> {:?}", board.tool, self.gesture);
        true
    }

    fn pointer_move(&mut self, p: ScreenPoint, board: &mut Board<'_>) -> bool {
        let cell = board.viewport.screen_to_grid(p);
        let hover_changed = self.hover != Some(cell);

        match &mut self.gesture {
            Gesture::Panning { last } => {
                let (dx, dy) = (p.x - last.x, p.y - last.y);
                *last = p;
                // The view moved under the pointer, so re-derive the cell.
                let moved = board.viewport.pan_by(dx, dy);
                self.hover = Some(board.viewport.screen_to_grid(p));
                moved
            }
            Gesture::Measuring { end, .. } => {
                *end = cell;
                self.hover = Some(cell);
                hover_changed
            }
            Gesture::PaintingFog { reveal } => {
                let reveal = *reveal;
                self.hover = Some(cell);
                match board.map.as_deref_mut() {
                    Some(map) => paint_brush(map, cell, reveal) || hover_changed,
                    None => hover_changed,
                }
            }
            Gesture::DraggingToken { .. } | Gesture::Idle => {
                self.hover = Some(cell);
                hover_changed
            }
        }
    }

    fn release(&mut self, p: ScreenPoint, board: &mut Board<'_>) -> bool {
        let cell = board.viewport.screen_to_grid(p);
        let gesture = std::mem::take(&mut self.gesture);

        match gesture {
            Gesture::Idle => return false,
            Gesture::Panning { .. } => {
                self.emit_viewport(board.viewport);
            }
            Gesture::DraggingToken { token, from } => {
                self.hover = Some(cell);
                if cell != from {
                    self.emit(MapEvent::TokenDragged {
                        token,
                        from,
                        to: cell,
                    });
                }
            }
            Gesture::Measuring { kind, start, end } => {
                // Release is the last pointer position; it supersedes the
                // end tracked by moves when no move preceded it.
                if end != cell {
                    log::debug!("measurement end {end} updated to release cell {cell}");
                }
                self.hover = Some(cell);
                self.emit(MapEvent::MeasurementCompleted {
                    start,
                    end: cell,
                    kind,
                    distance_feet: distance_feet(start, cell),
                });
            }
            Gesture::PaintingFog { .. } => {
                self.finish_fog(board);
            }
        }
        log::debug!("release at {cell}; {gesture:?} finished");
        true
    }

    /// Abort whatever gesture is active. Safe from every state.
    pub fn cancel(&mut self, board: &mut Board<'_>) -> bool {
        let gesture = std::mem::take(&mut self.gesture);
        match gesture {
            Gesture::Idle => false,
            Gesture::PaintingFog { .. } => {
                // Cells were already painted; report them like a release.
                self.finish_fog(board);
                true
            }
            _ => {
                log::debug!("cancelled {gesture:?}");
                true
            }
        }
    }

    fn scroll(&mut self, p: ScreenPoint, zoom: f32, board: &mut Board<'_>) -> bool {
        if !board.viewport.zoom_at(zoom, p) {
            return false;
        }
        self.emit_viewport(board.viewport);
        true
    }

    fn finish_fog(&mut self, board: &mut Board<'_>) {
        let Some(map) = board.map.as_deref() else {
            return;
        };
        self.fog_history.end_batch(&map.revealed_cells);
        let revealed = map.revealed_cells.revealed_cells();
        self.emit(MapEvent::FogChanged { revealed });
    }

    pub fn emit_viewport(&mut self, viewport: &Viewport) {
        let offset = viewport.pan_offset();
        self.emit(MapEvent::ViewportChanged {
            offset_x: offset.x,
            offset_y: offset.y,
            zoom: viewport.zoom(),
        });
    }

    fn selected_in<'t>(&self, tokens: &'t [Token]) -> Option<&'t Token> {
        let id = self.selected?;
        tokens.iter().find(|t| t.id == id)
    }
}

/// Paint the 3×3 brush centered on `cell`. Returns whether anything changed.
fn paint_brush(map: &mut GridMap, cell: GridPos, reveal: bool) -> bool {
    let origin = brush_origin(cell);
    if reveal {
        map.reveal(origin.x, origin.y, BRUSH_SIZE, BRUSH_SIZE)
    } else {
        map.hide(origin.x, origin.y, BRUSH_SIZE, BRUSH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct World {
        viewport: Viewport,
        map: GridMap,
        tokens: Vec<Token>,
        tool: ToolMode,
    }

    impl World {
        fn new(tool: ToolMode) -> Self {
            Self {
                viewport: Viewport::default(),
                map: GridMap::new(20, 15),
                tokens: vec![Token::new(EntityId::intern("hero"), 2, 2)],
                tool,
            }
        }

        fn send(&mut self, ix: &mut Interaction, event: PointerEvent) -> bool {
            let mut board = Board {
                viewport: &mut self.viewport,
                map: Some(&mut self.map),
                tokens: &self.tokens,
                tool: self.tool,
                is_dm_view: false,
            };
            ix.handle(event, &mut board)
        }
    }

    // Screen center of cell (x, y) at the default 40px cells.
    fn at(x: i32, y: i32) -> (f32, f32) {
        (x as f32 * 40.0 + 20.0, y as f32 * 40.0 + 20.0)
    }

    fn press(x: i32, y: i32) -> PointerEvent {
        let (sx, sy) = at(x, y);
        PointerEvent::press(sx, sy)
    }

    fn moved(x: i32, y: i32) -> PointerEvent {
        let (sx, sy) = at(x, y);
        PointerEvent::moved(sx, sy)
    }

    fn release(x: i32, y: i32) -> PointerEvent {
        let (sx, sy) = at(x, y);
        PointerEvent::release(sx, sy)
    }

    #[test]
    fn pan_moves_viewport_and_reports_on_release() {
        let mut world = World::new(ToolMode::Pan);
        let mut ix = Interaction::new();
        world.send(&mut ix, PointerEvent::press(100.0, 100.0));
        assert!(ix.gesture().is_panning());
        assert!(world.send(&mut ix, PointerEvent::moved(130.0, 90.0)));
        assert_eq!(world.viewport.pan_offset(), ScreenPoint::new(30.0, -10.0));
        world.send(&mut ix, PointerEvent::release(130.0, 90.0));
        assert!(ix.gesture().is_idle());
        assert_eq!(
            ix.drain_events(),
            vec![MapEvent::ViewportChanged {
                offset_x: 30.0,
                offset_y: -10.0,
                zoom: 1.0
            }]
        );
    }

    #[test]
    fn drag_emits_only_when_the_cell_changes() {
        let mut world = World::new(ToolMode::Move);
        let mut ix = Interaction::new();
        world.send(&mut ix, press(2, 2));
        assert!(ix.gesture().is_dragging_token());
        assert_eq!(ix.gesture().dragged_token(), Some(EntityId::intern("hero")));
        assert_eq!(ix.selected(), Some(EntityId::intern("hero")));
        world.send(&mut ix, moved(4, 3));
        assert_eq!(ix.hover(), Some(GridPos::new(4, 3)));
        world.send(&mut ix, release(4, 3));
        assert_eq!(
            ix.drain_events(),
            vec![MapEvent::TokenDragged {
                token: EntityId::intern("hero"),
                from: GridPos::new(2, 2),
                to: GridPos::new(4, 3),
            }]
        );
        // Position is the host's to change.
        assert_eq!(world.tokens[0].position(), GridPos::new(2, 2));

        world.send(&mut ix, press(2, 2));
        world.send(&mut ix, release(2, 2));
        assert!(ix.drain_events().is_empty());
    }

    #[test]
    fn move_tool_on_empty_cell_starts_nothing() {
        let mut world = World::new(ToolMode::Move);
        let mut ix = Interaction::new();
        world.send(&mut ix, press(9, 9));
        assert!(ix.gesture().is_idle());
        assert!(!world.send(&mut ix, release(9, 9)));
    }

    #[test]
    fn measurement_is_one_shot() {
        let mut world = World::new(ToolMode::MeasureLine);
        let mut ix = Interaction::new();
        world.send(&mut ix, press(0, 0));
        world.send(&mut ix, moved(3, 3));
        assert_eq!(
            *ix.gesture(),
            Gesture::Measuring {
                kind: MeasureKind::Line,
                start: GridPos::new(0, 0),
                end: GridPos::new(3, 3),
            }
        );
        assert_eq!(ix.gesture().measure_start(), Some(GridPos::new(0, 0)));
        assert_eq!(ix.gesture().measure_end(), Some(GridPos::new(3, 3)));
        world.send(&mut ix, release(3, 3));
        assert_eq!(ix.gesture().measure_start(), None);
        assert_eq!(
            ix.drain_events(),
            vec![MapEvent::MeasurementCompleted {
                start: GridPos::new(0, 0),
                end: GridPos::new(3, 3),
                kind: MeasureKind::Line,
                distance_feet: 20,
            }]
        );
        assert!(ix.gesture().is_idle());
    }

    #[test]
    fn release_cell_is_the_reported_end() {
        let mut world = World::new(ToolMode::MeasureSquare);
        let mut ix = Interaction::new();
        world.send(&mut ix, press(1, 1));
        world.send(&mut ix, moved(2, 2));
        assert_eq!(ix.gesture().measure_end(), Some(GridPos::new(2, 2)));
        // The pointer jumped between the last move and the release.
        world.send(&mut ix, release(4, 1));
        assert_eq!(
            ix.drain_events(),
            vec![MapEvent::MeasurementCompleted {
                start: GridPos::new(1, 1),
                end: GridPos::new(4, 1),
                kind: MeasureKind::Square,
                distance_feet: 15,
            }]
        );
        assert_eq!(ix.hover(), Some(GridPos::new(4, 1)));
    }

    #[test]
    fn far_off_screen_fog_press_is_harmless() {
        let mut world = World::new(ToolMode::RevealFog);
        let mut ix = Interaction::new();
        assert!(world.send(&mut ix, PointerEvent::press(-1.0e12, 10.0)));
        world.send(&mut ix, PointerEvent::moved(1.0e12, -1.0e12));
        world.send(&mut ix, PointerEvent::release(1.0e12, -1.0e12));
        assert!(world.map.revealed_cells.is_empty());
        assert!(!ix.fog_history().can_undo());
    }

    #[test]
    fn cancel_clears_every_gesture() {
        for tool in ToolMode::ALL {
            let mut world = World::new(tool);
            let mut ix = Interaction::new();
            world.send(&mut ix, press(2, 2));
            world.send(&mut ix, moved(5, 5));
            world.send(&mut ix, PointerEvent::Cancel);
            assert!(ix.gesture().is_idle(), "{tool} leaked a gesture");
            assert!(!world.send(&mut ix, PointerEvent::Cancel));
        }
    }

    #[test]
    fn cancel_while_painting_reports_fog() {
        let mut world = World::new(ToolMode::RevealFog);
        let mut ix = Interaction::new();
        world.send(&mut ix, press(5, 5));
        world.send(&mut ix, PointerEvent::Cancel);
        let events = ix.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].revealed_keys().map(|k| k.len()), Some(9));
    }

    #[test]
    fn press_during_gesture_cancels_it_first() {
        let mut world = World::new(ToolMode::MeasureCircle);
        let mut ix = Interaction::new();
        world.send(&mut ix, press(1, 1));
        world.send(&mut ix, press(6, 6));
        world.send(&mut ix, release(8, 6));
        let events = ix.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            MapEvent::MeasurementCompleted { start, .. } if start == GridPos::new(6, 6)
        ));
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let mut world = World::new(ToolMode::Select);
        let mut ix = Interaction::new();
        assert!(!world.send(&mut ix, PointerEvent::press(f32::NAN, 1.0)));
        assert!(!world.send(&mut ix, PointerEvent::moved(1.0, f32::INFINITY)));
        assert!(!ix.has_events());
        assert_eq!(ix.hover(), None);
    }

    #[test]
    fn scroll_zooms_about_the_pointer() {
        let mut world = World::new(ToolMode::Select);
        let mut ix = Interaction::new();
        let before = world.viewport.screen_to_grid_f(ScreenPoint::new(200.0, 120.0));
        assert!(world.send(
            &mut ix,
            PointerEvent::Scroll {
                x: 200.0,
                y: 120.0,
                zoom: 2.0
            }
        ));
        let after = world.viewport.screen_to_grid_f(ScreenPoint::new(200.0, 120.0));
        assert!((before.0 - after.0).abs() < 1e-4 && (before.1 - after.1).abs() < 1e-4);
        assert_eq!(world.viewport.zoom(), 2.0);
        let events = ix.drain_events();
        assert!(matches!(
            events.as_slice(),
            [MapEvent::ViewportChanged { zoom, .. }] if *zoom == 2.0
        ));
    }

    #[test]
    fn place_token_only_taps() {
        let mut world = World::new(ToolMode::PlaceToken);
        let mut ix = Interaction::new();
        world.send(&mut ix, press(2, 2));
        world.send(&mut ix, release(2, 2));
        assert_eq!(ix.drain_events(), vec![MapEvent::CellTapped { x: 2, y: 2 }]);
        assert_eq!(ix.selected(), None);
    }
}
