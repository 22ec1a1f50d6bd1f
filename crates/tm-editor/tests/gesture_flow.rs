use pretty_assertions::assert_eq;
use tm_core::{CreatureSize, EntityId, GridMap, GridPos, MeasureKind, Token};
use tm_editor::{Gesture, MapCanvas, MapEvent, PointerEvent, ToolMode};
use tm_render::DisplayList;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn table() -> MapCanvas {
    init();
    let mut canvas = MapCanvas::new(800.0, 600.0);
    canvas.set_map(Some(GridMap::new(20, 15)));
    let mut troll = Token::new(EntityId::intern("troll"), 6, 6);
    troll.size = CreatureSize::Large;
    canvas.set_tokens(vec![Token::new(EntityId::intern("rogue"), 2, 3), troll]);
    canvas
}

fn center(x: i32, y: i32) -> (f32, f32) {
    (x as f32 * 40.0 + 20.0, y as f32 * 40.0 + 20.0)
}

fn tap(canvas: &mut MapCanvas, x: i32, y: i32) {
    let (sx, sy) = center(x, y);
    canvas.handle_pointer(PointerEvent::press(sx, sy));
    canvas.handle_pointer(PointerEvent::release(sx, sy));
}

#[test]
fn select_press_fires_token_selected_then_cell_tapped() {
    let mut canvas = table();
    tap(&mut canvas, 2, 3);

    assert_eq!(canvas.selected_token().map(|t| t.id), Some(EntityId::intern("rogue")));
    let events = canvas.drain_events();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], MapEvent::TokenSelected { token } if token.id == EntityId::intern("rogue")));
    assert_eq!(events[1], MapEvent::CellTapped { x: 2, y: 3 });
}

#[test]
fn select_on_empty_cell_clears_selection() {
    let mut canvas = table();
    tap(&mut canvas, 2, 3);
    canvas.drain_events();

    tap(&mut canvas, 12, 1);
    assert!(canvas.selected_token().is_none());
    assert_eq!(canvas.drain_events(), vec![MapEvent::CellTapped { x: 12, y: 1 }]);
}

#[test]
fn large_tokens_are_hit_on_every_footprint_cell() {
    let mut canvas = table();
    tap(&mut canvas, 7, 7);
    assert_eq!(canvas.selected_token().map(|t| t.id), Some(EntityId::intern("troll")));
}

#[test]
fn gestures_leave_only_hover_behind() {
    let sequences: [(ToolMode, (i32, i32), (i32, i32)); 5] = [
        (ToolMode::Pan, (1, 1), (4, 2)),
        (ToolMode::Move, (2, 3), (5, 3)),
        (ToolMode::MeasureSquare, (0, 0), (3, 2)),
        (ToolMode::RevealFog, (5, 5), (8, 5)),
        (ToolMode::HideFog, (5, 5), (6, 6)),
    ];
    for (tool, from, to) in sequences {
        let mut canvas = table();
        canvas.set_tool(tool);
        let (ax, ay) = center(from.0, from.1);
        let (bx, by) = center(to.0, to.1);
        canvas.handle_pointer(PointerEvent::press(ax, ay));
        assert!(!canvas.gesture().is_idle(), "{tool} did not start a gesture");
        canvas.handle_pointer(PointerEvent::moved((ax + bx) / 2.0, (ay + by) / 2.0));
        canvas.handle_pointer(PointerEvent::moved(bx, by));
        canvas.handle_pointer(PointerEvent::release(bx, by));

        assert_eq!(*canvas.gesture(), Gesture::Idle, "{tool} leaked a gesture");
        assert!(canvas.hover_cell().is_some());
    }
}

#[test]
fn drag_reports_and_leaves_token_in_place() {
    let mut canvas = table();
    canvas.set_tool(ToolMode::Move);
    let (ax, ay) = center(2, 3);
    let (bx, by) = center(5, 1);
    canvas.handle_pointer(PointerEvent::press(ax, ay));
    canvas.handle_pointer(PointerEvent::moved(bx, by));

    let ctx = canvas.render_context();
    assert_eq!(ctx.drag.map(|d| d.cell), Some(GridPos::new(5, 1)));

    canvas.handle_pointer(PointerEvent::release(bx, by));
    assert_eq!(
        canvas.drain_events(),
        vec![MapEvent::TokenDragged {
            token: EntityId::intern("rogue"),
            from: GridPos::new(2, 3),
            to: GridPos::new(5, 1),
        }]
    );
    assert_eq!(canvas.tokens()[0].position(), GridPos::new(2, 3));
}

#[test]
fn measurement_reports_diagonal_distance() {
    let mut canvas = table();
    canvas.set_tool(ToolMode::MeasureCircle);
    let (ax, ay) = center(1, 1);
    let (bx, by) = center(6, 3);
    canvas.handle_pointer(PointerEvent::press(ax, ay));
    canvas.handle_pointer(PointerEvent::moved(bx, by));
    canvas.handle_pointer(PointerEvent::release(bx, by));
    assert_eq!(
        canvas.drain_events(),
        vec![MapEvent::MeasurementCompleted {
            start: GridPos::new(1, 1),
            end: GridPos::new(6, 3),
            kind: MeasureKind::Circle,
            // straight 3, diag 2: 15 + 10 + 5
            distance_feet: 30,
        }]
    );
}

#[test]
fn cancel_mid_gesture_emits_nothing_for_pan_drag_measure() {
    for tool in [ToolMode::Pan, ToolMode::Move, ToolMode::MeasureLine] {
        let mut canvas = table();
        canvas.set_tool(tool);
        let (ax, ay) = center(2, 3);
        canvas.handle_pointer(PointerEvent::press(ax, ay));
        canvas.handle_pointer(PointerEvent::moved(ax + 90.0, ay));
        canvas.handle_pointer(PointerEvent::Cancel);
        assert!(canvas.gesture().is_idle());
        assert!(canvas.drain_events().is_empty(), "{tool} emitted on cancel");
    }
}

#[test]
fn panned_view_still_maps_presses_to_cells() {
    let mut canvas = table();
    canvas.set_tool(ToolMode::Pan);
    canvas.handle_pointer(PointerEvent::press(300.0, 300.0));
    canvas.handle_pointer(PointerEvent::moved(220.0, 260.0));
    canvas.handle_pointer(PointerEvent::release(220.0, 260.0));
    assert!(matches!(
        canvas.drain_events()[..],
        [MapEvent::ViewportChanged { offset_x, offset_y, .. }] if offset_x == -80.0 && offset_y == -40.0
    ));

    canvas.set_tool(ToolMode::PlaceToken);
    canvas.handle_pointer(PointerEvent::press(10.0, 10.0));
    assert_eq!(canvas.drain_events(), vec![MapEvent::CellTapped { x: 2, y: 1 }]);
}

#[test]
fn rendering_a_frame_clears_dirty() {
    let mut canvas = table();
    let mut list = DisplayList::new();
    canvas.render(&mut list);
    assert!(!canvas.needs_redraw());
    assert!(canvas.handle_pointer(PointerEvent::moved(500.0, 500.0)));
    assert!(canvas.needs_redraw());
}
