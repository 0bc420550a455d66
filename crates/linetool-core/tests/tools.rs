// File: crates/linetool-core/tests/tools.rs
// Purpose: Tool entity lifecycle, virtual anchors, per-kind constraints, export/import.

use linetool_core::tool::position;
use linetool_core::{
    LinearPriceScale, LinearTimeScale, LineTool, PaneEnv, ToolKind, ToolPoint,
};

// Scales chosen so screen x == timestamp and screen y == 100 - price.
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

fn pt(price: f64, timestamp: f64) -> ToolPoint {
    ToolPoint::new(price, timestamp)
}

#[test]
fn creation_lifecycle_and_finish_idempotence() {
    let (price, time) = scales();
    let env = env(&price, &time);

    let mut tool = LineTool::new(ToolKind::TrendLine, None).unwrap();
    assert!(tool.creating());
    assert!(!tool.finished());

    tool.add_point(pt(50.0, 10.0), &env);
    tool.try_finish(&env);
    assert!(!tool.finished(), "two-point tool cannot finish with one stored point");

    tool.add_point(pt(60.0, 20.0), &env);
    tool.try_finish(&env);
    assert!(tool.finished());
    assert!(tool.selected());
    assert!(!tool.creating());

    // Finishing again changes nothing.
    let selected = tool.selected();
    tool.set_selected(false);
    tool.try_finish(&env);
    assert!(!tool.selected());
    assert!(tool.finished());
    let _ = selected;
}

#[test]
fn restored_tools_do_not_auto_select() {
    let tool = LineTool::with_points(ToolKind::Rectangle, None, vec![pt(90.0, 0.0), pt(80.0, 10.0)]).unwrap();
    assert!(tool.finished());
    assert!(!tool.selected());
    assert!(!tool.creating());

    let partial = LineTool::with_points(ToolKind::Rectangle, None, vec![pt(90.0, 0.0)]).unwrap();
    assert!(!partial.finished());
    assert!(partial.creating());
}

#[test]
fn trend_line_has_no_virtual_anchors() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let tool = LineTool::with_points(ToolKind::TrendLine, None, vec![pt(50.0, 0.0), pt(60.0, 10.0)]).unwrap();
    assert!(tool.get_point(0, &env).is_some());
    assert!(tool.get_point(1, &env).is_some());
    assert_eq!(tool.get_point(2, &env), None);
}

#[test]
fn rectangle_exposes_derived_corners_and_midpoints() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let tool = LineTool::with_points(ToolKind::Rectangle, None, vec![pt(100.0, 0.0), pt(90.0, 10.0)]).unwrap();

    assert_eq!(tool.get_point(2, &env), Some(pt(90.0, 0.0)));
    assert_eq!(tool.get_point(3, &env), Some(pt(100.0, 10.0)));
    assert_eq!(tool.get_point(4, &env), Some(pt(95.0, 0.0)));
    assert_eq!(tool.get_point(5, &env), Some(pt(95.0, 10.0)));
    assert_eq!(tool.get_point(6, &env), Some(pt(100.0, 5.0)));
    assert_eq!(tool.get_point(7, &env), Some(pt(90.0, 5.0)));
    assert_eq!(tool.get_point(8, &env), None);
}

#[test]
fn rectangle_virtual_writes_redistribute_between_corners() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut tool = LineTool::with_points(ToolKind::Rectangle, None, vec![pt(100.0, 0.0), pt(90.0, 10.0)]).unwrap();

    // Index 2 moves the opposite corner's price and this corner's timestamp.
    tool.set_point(2, pt(85.0, 2.0), &env);
    assert_eq!(tool.stored_points()[1].price, 85.0);
    assert_eq!(tool.stored_points()[0].timestamp, 2.0);

    // Side midpoints move one scalar only.
    tool.set_point(5, pt(0.0, 20.0), &env);
    assert_eq!(tool.stored_points()[1].timestamp, 20.0);
    tool.set_point(6, pt(97.0, 0.0), &env);
    assert_eq!(tool.stored_points()[0].price, 97.0);
}

#[test]
fn parallel_channel_keeps_equal_width_and_derives_handles() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut tool = LineTool::with_points(
        ToolKind::ParallelChannel,
        None,
        vec![pt(80.0, 0.0), pt(70.0, 50.0), pt(60.0, 0.0)],
    )
    .unwrap();

    // Derived far end of the second boundary and the two midpoint handles.
    assert_eq!(tool.get_point(3, &env), Some(pt(50.0, 50.0)));
    assert_eq!(tool.get_point(4, &env), Some(pt(55.0, 25.0)));
    assert_eq!(tool.get_point(5, &env), Some(pt(75.0, 25.0)));

    // Moving the first point drags the third along, preserving pixel height.
    tool.set_point(0, pt(90.0, 10.0), &env);
    let stored = tool.stored_points();
    assert_eq!(stored[0], pt(90.0, 10.0));
    assert!((stored[2].price - 70.0).abs() < 1e-9, "channel width must be preserved");
}

#[test]
fn position_target_is_three_times_the_stop_distance() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut tool = LineTool::new(ToolKind::LongShortPosition, None).unwrap();

    // First click: entry plus rolling preview of stop and target.
    tool.position_state_mut().click_count = 1;
    tool.add_point(pt(50.0, 10.0), &env);
    assert_eq!(tool.stored_points().len(), 3);

    position::update_preview(&mut tool, pt(45.0, 20.0), &env);
    assert_eq!(tool.stored_points()[2].price, 50.0 + 3.0 * 5.0);

    // Second click fixes the stop and finishes.
    tool.position_state_mut().click_count = 2;
    tool.add_point(pt(45.0, 20.0), &env);
    assert!(tool.finished());
    assert_eq!(tool.stored_points()[2].price, 65.0);
    assert_eq!(tool.stored_points()[2].timestamp, 20.0);
}

#[test]
fn position_flip_detection_and_target_clamp() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut tool = LineTool::with_points(
        ToolKind::LongShortPosition,
        None,
        vec![pt(50.0, 0.0), pt(40.0, 10.0), pt(80.0, 10.0)],
    )
    .unwrap();

    assert!(position::is_current_long(&tool));
    // Dragging the stop above the entry flips a long position.
    assert!(position::check_flip(&tool, 1, 60.0, Some(true)));
    assert!(!position::check_flip(&tool, 1, 45.0, Some(true)));
    // Dragging the entry below the stop flips too.
    assert!(position::check_flip(&tool, 0, 35.0, Some(true)));

    // A target dragged to the wrong side of the entry clamps to one min move.
    position::set_point(&mut tool, 2, pt(45.0, 10.0), false, &env);
    assert!((tool.stored_points()[2].price - 50.01).abs() < 1e-9);
}

#[test]
fn brush_drops_points_closer_than_two_pixels() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut tool = LineTool::new(ToolKind::Brush, None).unwrap();

    tool.add_point(pt(50.0, 10.0), &env);
    tool.add_point(pt(50.0, 11.0), &env); // 1 px away on screen
    assert_eq!(tool.stored_points().len(), 1);

    tool.add_point(pt(50.0, 20.0), &env);
    assert_eq!(tool.stored_points().len(), 2);
}

#[test]
fn path_finishes_on_closing_gesture() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut tool = LineTool::new(ToolKind::Path, None).unwrap();

    tool.add_point(pt(50.0, 0.0), &env);
    tool.add_point(pt(50.0, 50.0), &env);
    tool.try_finish(&env);
    assert!(!tool.finished(), "distant points are not a closing gesture");

    tool.add_point(pt(52.0, 52.0), &env); // ~2.8 px from the previous point
    tool.try_finish(&env);
    assert!(tool.finished());
    assert_eq!(tool.stored_points().len(), 2, "closing gesture collapses the last point");
}

#[test]
fn axis_points_suppressed_per_kind() {
    let (price, time) = scales();
    let env = env(&price, &time);

    let vertical = LineTool::with_points(ToolKind::VerticalLine, None, vec![pt(50.0, 10.0)]).unwrap();
    assert!(vertical.price_axis_points(&env).is_empty());
    assert_eq!(vertical.time_axis_points(&env).len(), 1);

    let horizontal = LineTool::with_points(ToolKind::HorizontalLine, None, vec![pt(50.0, 10.0)]).unwrap();
    assert!(horizontal.time_axis_points(&env).is_empty());
    assert_eq!(horizontal.price_axis_points(&env).len(), 1);

    let channel = LineTool::with_points(
        ToolKind::ParallelChannel,
        None,
        vec![pt(80.0, 0.0), pt(70.0, 50.0), pt(60.0, 0.0)],
    )
    .unwrap();
    assert_eq!(channel.price_axis_points(&env).len(), 4);
    assert_eq!(channel.time_axis_points(&env).len(), 2);
}

#[test]
fn export_import_round_trip_preserves_identity() {
    let patch = serde_json::json!({ "text": { "value": "note" }, "shape": { "extend": { "right": true } } });
    let tool =
        LineTool::with_points(ToolKind::Rectangle, Some(&patch), vec![pt(90.0, 0.0), pt(80.0, 10.0)]).unwrap();

    let export = tool.export();
    let restored = LineTool::from_export(&export).unwrap();

    assert_eq!(restored.id(), tool.id());
    assert_eq!(restored.kind(), tool.kind());
    assert_eq!(restored.stored_points(), tool.stored_points());
    assert_eq!(restored.options(), tool.options());
    assert!(restored.finished());
    assert!(!restored.selected());
}
