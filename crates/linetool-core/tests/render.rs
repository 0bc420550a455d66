// File: crates/linetool-core/tests/render.rs
// Purpose: Headless render smoke tests, hit-test/draw agreement, depth-line scaling, word wrap.

use std::rc::Rc;

use skia_safe as skia;

use linetool_core::geometry::Point;
use linetool_core::render::market_depth::scaled_line_length;
use linetool_core::render::text::{TextData, TextRenderer};
use linetool_core::render::PaneRenderer;
use linetool_core::view::brush;
use linetool_core::{
    FixedAdvanceMeasurer, HitTarget, LinearPriceScale, LinearTimeScale, PaneEnv, ToolKind, ToolLayer, ToolPoint,
};

fn scales() -> (LinearPriceScale, LinearTimeScale) {
    (LinearPriceScale::new(0.0, 300.0, 0.0, 300.0), LinearTimeScale::new(0.0, 400.0, 0.0, 1.0))
}

fn env<'a>(price: &'a LinearPriceScale, time: &'a LinearTimeScale) -> PaneEnv<'a> {
    PaneEnv {
        price_scale: price,
        time_scale: time,
        base_value: 0.0,
        width: 400.0,
        height: 300.0,
        viewport_version: 0,
    }
}

fn pt(price: f64, timestamp: f64) -> ToolPoint {
    ToolPoint::new(price, timestamp)
}

#[test]
fn every_tool_kind_renders_without_panicking() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = ToolLayer::new(Rc::new(FixedAdvanceMeasurer::default()));

    let two = vec![pt(200.0, 40.0), pt(120.0, 160.0)];
    let three = vec![pt(200.0, 40.0), pt(120.0, 160.0), pt(160.0, 240.0)];
    let single = vec![pt(150.0, 200.0)];
    let stroke = vec![pt(100.0, 20.0), pt(130.0, 60.0), pt(90.0, 110.0), pt(140.0, 150.0)];

    let kinds: Vec<(ToolKind, Vec<ToolPoint>)> = vec![
        (ToolKind::TrendLine, two.clone()),
        (ToolKind::Ray, two.clone()),
        (ToolKind::Arrow, two.clone()),
        (ToolKind::ExtendedLine, two.clone()),
        (ToolKind::HorizontalLine, single.clone()),
        (ToolKind::HorizontalRay, single.clone()),
        (ToolKind::VerticalLine, single.clone()),
        (ToolKind::CrossLine, single.clone()),
        (ToolKind::Rectangle, two.clone()),
        (ToolKind::Circle, vec![pt(150.0, 200.0), pt(150.0, 240.0)]),
        (ToolKind::Triangle, three.clone()),
        (ToolKind::PriceRange, two.clone()),
        (ToolKind::ParallelChannel, three.clone()),
        (ToolKind::FibRetracement, two.clone()),
        (ToolKind::LongShortPosition, vec![pt(150.0, 100.0), pt(130.0, 140.0), pt(210.0, 140.0)]),
        (ToolKind::Brush, stroke.clone()),
        (ToolKind::Highlighter, stroke.clone()),
        (ToolKind::Path, stroke.clone()),
        (ToolKind::Text, single.clone()),
        (ToolKind::Callout, two.clone()),
        (ToolKind::MarketDepth, single.clone()),
    ];

    for (kind, points) in kinds {
        let patch = match kind {
            ToolKind::Text => Some(serde_json::json!({ "text": { "value": "note" } })),
            ToolKind::TrendLine => Some(serde_json::json!({ "text": { "value": "trend" } })),
            ToolKind::MarketDepth => Some(serde_json::json!({
                "marketDepth": { "data": {
                    "bids": [ { "price": 140.0, "totalSize": 50.0 }, { "price": 130.0, "totalSize": 100.0 } ],
                    "asks": [ { "price": 160.0, "totalSize": 75.0 } ],
                } },
            })),
            _ => None,
        };
        layer.add_tool(kind, patch.as_ref(), points).unwrap();
    }

    let mut surface = skia::surfaces::raster_n32_premul((400, 300)).expect("raster surface");
    let canvas = surface.canvas();
    canvas.clear(skia::Color::from_argb(255, 18, 18, 20));
    layer.draw(canvas, &env, 2.0);

    let image = surface.image_snapshot();
    #[allow(deprecated)]
    let data = image.encode_to_data(skia::EncodedImageFormat::PNG).expect("png encode");
    let bytes = data.as_bytes();
    assert!(bytes.starts_with(&[137, 80, 78, 71]), "should be PNG header");

    let decoded = image::load_from_memory(bytes).expect("decode rendered png").to_rgba8();
    assert_eq!(decoded.dimensions(), (400, 300));
}

#[test]
fn hit_testing_picks_topmost_tool_first() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = ToolLayer::new(Rc::new(FixedAdvanceMeasurer::default()));

    // Two overlapping trend lines crossing at (100, 100).
    let below = layer.add_tool(ToolKind::TrendLine, None, vec![pt(250.0, 0.0), pt(150.0, 200.0)]).unwrap();
    let above = layer.add_tool(ToolKind::TrendLine, None, vec![pt(300.0, 0.0), pt(100.0, 200.0)]).unwrap();

    let (hit_id, result) = layer.hit_test(&env, 100.0, 100.0).expect("crossing point hits");
    assert_eq!(hit_id, above, "later-added tool draws on top and wins picks");
    assert_ne!(hit_id, below);
    assert!(matches!(result.target, HitTarget::MovePoint | HitTarget::ChangePoint));

    // A miss far away from both lines.
    assert!(layer.hit_test(&env, 390.0, 10.0).is_none());
}

#[test]
fn incomplete_geometry_never_hits() {
    let (price, time) = scales();
    let env = env(&price, &time);
    let mut layer = ToolLayer::new(Rc::new(FixedAdvanceMeasurer::default()));

    layer.add_tool(ToolKind::Rectangle, None, vec![pt(200.0, 40.0)]).unwrap();
    assert!(layer.hit_test(&env, 40.0, 100.0).is_none());
}

#[test]
fn market_depth_line_length_is_proportional() {
    assert_eq!(scaled_line_length(50.0, 100.0, 100.0, 1.0), 50.0);
    assert_eq!(scaled_line_length(50.0, 100.0, 100.0, 2.0), 100.0);
    assert_eq!(scaled_line_length(100.0, 100.0, 100.0, 1.0), 100.0);
    assert_eq!(scaled_line_length(10.0, 0.0, 100.0, 1.0), 0.0);
}

#[test]
fn brush_smoothing_adds_points_and_terminates() {
    let two = [Point::new(0.0, 0.0), Point::new(40.0, 0.0)];
    let interpolated = brush::interpolate(&two, 5.0);
    let smoothed = brush::smooth_points(&interpolated, 5);
    assert!(smoothed.len() > two.len(), "smoothing must densify the stroke");

    // Coincident consecutive points must not loop or divide by zero.
    let coincident = [Point::new(10.0, 10.0), Point::new(10.0, 10.0), Point::new(12.0, 10.0)];
    let interpolated = brush::interpolate(&coincident, 5.0);
    assert!(interpolated.len() >= coincident.len());
    for point in &interpolated {
        assert!(point.x.is_finite() && point.y.is_finite());
    }
}

#[test]
fn word_wrap_splits_long_lines_to_width() {
    let measurer: Rc<FixedAdvanceMeasurer> = Rc::new(FixedAdvanceMeasurer { advance: 0.5 });

    let mut narrow = TextRenderer::new(measurer.clone());
    let mut text = linetool_core::options::TextOptions::default();
    text.value = "alpha beta gamma delta".to_string();
    text.font.size = 10.0; // 5 px per character
    text.word_wrap_width = 40.0;
    narrow.set_data(TextData { text: text.clone(), points: vec![Point::new(50.0, 50.0)] });

    let mut wide = TextRenderer::new(measurer);
    text.word_wrap_width = 0.0;
    wide.set_data(TextData { text, points: vec![Point::new(50.0, 50.0)] });

    let (_, narrow_height) = narrow.measure();
    let (wide_width, wide_height) = wide.measure();
    assert!(narrow_height > wide_height, "wrapping must add lines");
    assert!(wide_width > 40.0);

    // The wrapped box sits above its anchor (top alignment) and is pickable.
    assert!(narrow.hit_test(55.0, 45.0).is_some());
    assert!(narrow.hit_test(55.0, 60.0).is_none());
}
