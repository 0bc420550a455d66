// File: crates/linetool-core/tests/interaction.rs
// Purpose: Pointer-driven scenarios: creation, hover/selection, dragging, shift locks, flips.

use std::rc::Rc;

use linetool_core::{
    AfterEditStage, FixedAdvanceMeasurer, LinearPriceScale, LinearTimeScale, NoMagnet, PaneEnv, PointerEvent,
    PointerEventKind, ToolKind, ToolLayer, ToolPoint,
};

// Screen x == timestamp, screen y == 100 - price.
fn scales() -> (LinearPriceScale, LinearTimeScale) {
    (LinearPriceScale::new(0.0, 100.0, 0.0, 100.0), LinearTimeScale::new(0.0, 100.0, 0.0, 1.0))
}

fn env<'a>(price: &'a LinearPriceScale, time: &'a LinearTimeScale) -> PaneEnv<'a> {
    PaneEnv {
        price_scale: price,
        time_scale: time,
        base_value: 0.0,
        width: 100.0,
        height: 100.0,
        viewport_version: 0,
    }
}

fn layer() -> ToolLayer {
    ToolLayer::new(Rc::new(FixedAdvanceMeasurer::default()))
}

fn event(kind: PointerEventKind, x: f64, y: f64) -> PointerEvent {
    PointerEvent { kind, x, y, shift: false }
}

fn shift_event(kind: PointerEventKind, x: f64, y: f64) -> PointerEvent {
    PointerEvent { kind, x, y, shift: true }
}

fn pt(price: f64, timestamp: f64) -> ToolPoint {
    ToolPoint::new(price, timestamp)
}

#[test]
fn two_click_creation_fires_finished_event() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = layer();
    let mut magnet = NoMagnet;

    let id = layer.start_tool(ToolKind::Rectangle, None).unwrap();

    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 10.0, 10.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseUp, 10.0, 10.0));
    assert!(!layer.tool(&id).unwrap().finished());
    assert!(layer.take_events().is_empty(), "one click is not enough to finish");

    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseMove, 25.0, 20.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 40.0, 30.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseUp, 40.0, 30.0));

    let tool = layer.tool(&id).unwrap();
    assert!(tool.finished());
    assert!(tool.selected());
    assert_eq!(tool.stored_points(), &[pt(90.0, 10.0), pt(70.0, 40.0)]);

    let events = layer.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].stage, AfterEditStage::LineToolFinished);
    assert_eq!(events[0].export.id, id);
}

#[test]
fn creating_tool_consumes_events_before_lower_tools() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = layer();
    let mut magnet = NoMagnet;

    let line_id =
        layer.add_tool(ToolKind::TrendLine, None, vec![pt(100.0, 0.0), pt(50.0, 50.0)]).unwrap();
    layer.start_tool(ToolKind::Rectangle, None).unwrap();

    // The click lands on the trend line, but the creating tool claims it.
    let consumed = layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 25.0, 25.0));
    assert!(consumed);
    assert!(!layer.tool(&line_id).unwrap().selected());
}

#[test]
fn hover_toggles_and_miss_click_deselects() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = layer();
    let mut magnet = NoMagnet;

    let id = layer.add_tool(ToolKind::TrendLine, None, vec![pt(100.0, 0.0), pt(50.0, 50.0)]).unwrap();

    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseMove, 25.0, 25.0));
    assert!(layer.tool(&id).unwrap().hovered());

    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseMove, 90.0, 10.0));
    assert!(!layer.tool(&id).unwrap().hovered());

    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 25.0, 25.0));
    assert!(layer.tool(&id).unwrap().selected());

    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 90.0, 10.0));
    assert!(!layer.tool(&id).unwrap().selected());
}

#[test]
fn whole_shape_drag_translates_all_points() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = layer();
    let mut magnet = NoMagnet;

    let id = layer.add_tool(ToolKind::Rectangle, None, vec![pt(90.0, 10.0), pt(70.0, 40.0)]).unwrap();

    // Select on the top edge, then grab the body and move it by (5, 5).
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 25.0, 10.0));
    assert!(layer.tool(&id).unwrap().selected());
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::PressedMouseMove, 25.0, 10.0));
    assert!(layer.tool(&id).unwrap().editing());
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::PressedMouseMove, 30.0, 15.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseUp, 30.0, 15.0));

    let tool = layer.tool(&id).unwrap();
    assert!(!tool.editing());
    assert_eq!(tool.stored_points(), &[pt(85.0, 15.0), pt(65.0, 45.0)]);

    let events = layer.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].stage, AfterEditStage::LineToolEdited);
}

#[test]
fn rectangle_shift_drag_locks_the_anchor_price() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = layer();
    let mut magnet = NoMagnet;

    // Corners (t=0, p=100) and (t=10, p=90), i.e. screen (0,0) and (10,10).
    let id = layer.add_tool(ToolKind::Rectangle, None, vec![pt(100.0, 0.0), pt(90.0, 10.0)]).unwrap();

    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 0.0, 0.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::PressedMouseMove, 0.0, 0.0));
    layer.handle_event(&env, &mut magnet, &shift_event(PointerEventKind::PressedMouseMove, 5.0, 30.0));
    layer.handle_event(&env, &mut magnet, &shift_event(PointerEventKind::MouseUp, 5.0, 30.0));

    // The vertical axis is locked: point 0 keeps its mouse-down price and
    // only its timestamp follows the pointer.
    let tool = layer.tool(&id).unwrap();
    assert_eq!(tool.stored_points()[0], pt(100.0, 5.0));
    assert_eq!(tool.stored_points()[1], pt(90.0, 10.0));
}

#[test]
fn trend_line_shift_drag_levels_with_other_endpoint() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = layer();
    let mut magnet = NoMagnet;

    let id = layer.add_tool(ToolKind::TrendLine, None, vec![pt(80.0, 0.0), pt(50.0, 50.0)]).unwrap();

    // Grab the second endpoint at (50, 50) and drag with shift.
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 50.0, 50.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::PressedMouseMove, 50.0, 50.0));
    layer.handle_event(&env, &mut magnet, &shift_event(PointerEventKind::PressedMouseMove, 70.0, 90.0));
    layer.handle_event(&env, &mut magnet, &shift_event(PointerEventKind::MouseUp, 70.0, 90.0));

    // The dragged endpoint levels with the first: same price, new timestamp.
    let tool = layer.tool(&id).unwrap();
    assert_eq!(tool.stored_points()[1], pt(80.0, 70.0));
}

#[test]
fn long_short_flip_recomputes_target() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = layer();
    let mut magnet = NoMagnet;

    // Long position: entry 50 @ t0, stop 40 @ t10, target 80 (3x distance).
    let id = layer
        .add_tool(
            ToolKind::LongShortPosition,
            None,
            vec![pt(50.0, 0.0), pt(40.0, 10.0), pt(80.0, 10.0)],
        )
        .unwrap();

    // Stop anchor sits at screen (10, 60). Drag it above the entry to 60.
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 10.0, 60.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::PressedMouseMove, 10.0, 60.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::PressedMouseMove, 10.0, 40.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseUp, 10.0, 40.0));

    let tool = layer.tool(&id).unwrap();
    let points = tool.stored_points();
    assert_eq!(points[1].price, 60.0, "stop follows the drag");
    // Orientation flipped to short; target re-derived as entry - 3 * distance,
    // clamped at least one min move below the entry.
    assert_eq!(points[2].price, 50.0 - 3.0 * 10.0);
    assert!(points[2].price <= 50.0 - 0.01);
}

#[test]
fn brush_draws_while_pressed_and_finishes_on_release() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = layer();
    let mut magnet = NoMagnet;

    let id = layer.start_tool(ToolKind::Brush, None).unwrap();

    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 10.0, 10.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::PressedMouseMove, 20.0, 15.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::PressedMouseMove, 30.0, 10.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseUp, 30.0, 10.0));

    let tool = layer.tool(&id).unwrap();
    assert!(tool.finished());
    assert_eq!(tool.stored_points().len(), 3);
    assert_eq!(layer.take_events().len(), 1);
}

#[test]
fn path_close_gesture_fires_path_finished() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = layer();
    let mut magnet = NoMagnet;

    layer.start_tool(ToolKind::Path, None).unwrap();

    for (x, y) in [(10.0, 10.0), (50.0, 10.0), (50.0, 40.0)] {
        layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, x, y));
        layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseUp, x, y));
    }
    assert!(layer.take_events().is_empty());

    // A click within 10 px of the previous point closes the path.
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 52.0, 42.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseUp, 52.0, 42.0));

    let events = layer.take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].stage, AfterEditStage::PathFinished);
}

#[test]
fn magnet_snaps_creation_prices_within_threshold() {
    use linetool_core::CandidateMagnet;

    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = layer();
    let mut magnet = CandidateMagnet::new(vec![88.0], 3.0);

    let id = layer.start_tool(ToolKind::TrendLine, None).unwrap();

    // First click lands before the magnet is enabled.
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 10.0, 10.0));
    // Moving the preview enables the magnet for the rest of the gesture.
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseMove, 20.0, 15.0));
    // The second click at price 89 snaps onto the 88 candidate.
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 30.0, 11.0));
    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseUp, 30.0, 11.0));

    let tool = layer.tool(&id).unwrap();
    assert_eq!(tool.stored_points()[0].price, 90.0);
    assert_eq!(tool.stored_points()[1].price, 88.0);
}

#[test]
fn empty_scales_render_nothing_and_stay_silent() {
    use linetool_core::scale::EmptyScale;

    let mut layer = layer();
    let mut magnet = NoMagnet;
    layer.add_tool(ToolKind::TrendLine, None, vec![pt(100.0, 0.0), pt(50.0, 50.0)]).unwrap();

    let empty = EmptyScale;
    let env = PaneEnv {
        price_scale: &empty,
        time_scale: &empty,
        base_value: 0.0,
        width: 100.0,
        height: 100.0,
        viewport_version: 0,
    };

    assert!(layer.hit_test(&env, 25.0, 25.0).is_none());
    let consumed = layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 25.0, 25.0));
    assert!(!consumed);
}

#[test]
fn non_editable_tools_never_select() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = layer();
    let mut magnet = NoMagnet;

    let patch = serde_json::json!({ "editable": false });
    let id = layer
        .add_tool(ToolKind::TrendLine, Some(&patch), vec![pt(100.0, 0.0), pt(50.0, 50.0)])
        .unwrap();

    layer.handle_event(&env, &mut magnet, &event(PointerEventKind::MouseDown, 25.0, 25.0));
    assert!(!layer.tool(&id).unwrap().selected());
}

#[test]
fn import_preserves_ids_and_rejects_garbage() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = layer();

    let id = layer.add_tool(ToolKind::Circle, None, vec![pt(50.0, 50.0), pt(50.0, 60.0)]).unwrap();
    let exported = layer.export_tools();

    let mut restored = ToolLayer::new(Rc::new(FixedAdvanceMeasurer::default()));
    assert_eq!(restored.import_tools(&exported), 1);
    let tool = restored.tool(&id).expect("id preserved across import");
    assert_eq!(tool.kind(), ToolKind::Circle);
    assert!(tool.finished());
    assert!(!tool.selected());

    assert_eq!(restored.import_tools("not json"), 0);
    assert_eq!(restored.import_tools("[{\"id\":\"x\"}]"), 0);
    assert_eq!(restored.len(), 1);

    // Pattern removal: invalid patterns remove nothing.
    assert_eq!(restored.remove_tools_matching("["), 0);
    assert_eq!(restored.remove_tools_matching("^.*$"), 1);
    assert!(restored.is_empty());
    let _ = env;
}
