// File: crates/linetool-core/tests/options_merge.rs
// Purpose: Defaults, deep option merging (array truncation), color round-trips.

use serde_json::json;

use linetool_core::options::{Color, FibRetracementToolOptions, LineStyle};
use linetool_core::{merge_values, LineTool, ToolKind, ToolOptions, ToolPoint};

#[test]
fn merge_overwrites_scalars_and_recurses_objects() {
    let mut dst = json!({ "line": { "width": 1.0, "color": "#2962ff" }, "visible": true });
    let src = json!({ "line": { "width": 3.0 } });
    merge_values(&mut dst, &src);

    assert_eq!(dst["line"]["width"], 3.0);
    assert_eq!(dst["line"]["color"], "#2962ff");
    assert_eq!(dst["visible"], true);
}

#[test]
fn shorter_source_arrays_truncate_the_destination() {
    let mut dst = json!({ "levels": [{ "coeff": 0.0 }, { "coeff": 0.5 }, { "coeff": 1.0 }] });
    let src = json!({ "levels": [{ "coeff": 0.25 }] });
    merge_values(&mut dst, &src);

    let levels = dst["levels"].as_array().unwrap();
    assert_eq!(levels.len(), 1, "stale tail elements must not survive");
    assert_eq!(levels[0]["coeff"], 0.25);
}

#[test]
fn longer_source_arrays_extend_the_destination() {
    let mut dst = json!({ "values": [1, 2] });
    let src = json!({ "values": [9, 8, 7] });
    merge_values(&mut dst, &src);
    assert_eq!(dst["values"], json!([9, 8, 7]));
}

#[test]
fn fib_levels_patch_replaces_the_default_table() {
    let patch = json!({
        "levels": [
            { "coeff": 0.5, "color": "#ff0000", "opacity": 0.1, "distanceFromCoeffEnabled": false, "distanceFromCoeff": 0.0 },
        ],
    });
    let options = ToolOptions::from_value(ToolKind::FibRetracement, &patch).unwrap();
    let fib = options.as_fib().unwrap();
    assert_eq!(fib.levels.len(), 1);
    assert_eq!(fib.levels[0].coeff, 0.5);
    assert_eq!(fib.levels[0].color, Color::rgb(0xff, 0, 0));
}

#[test]
fn defaults_carry_the_standard_fib_ladder() {
    let defaults = FibRetracementToolOptions::default();
    let coeffs: Vec<f64> = defaults.levels.iter().map(|l| l.coeff).collect();
    assert_eq!(coeffs, vec![0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0, 1.618, 2.618, 3.618, 4.236]);
}

#[test]
fn kind_specific_defaults_differ_within_the_trend_family() {
    let ray = ToolOptions::defaults_for(ToolKind::Ray);
    let ray = ray.as_line().unwrap();
    assert!(ray.line.extend.right);
    assert!(!ray.line.extend.left);

    let extended = ToolOptions::defaults_for(ToolKind::ExtendedLine);
    let extended = extended.as_line().unwrap();
    assert!(extended.line.extend.left && extended.line.extend.right);

    let horizontal = ToolOptions::defaults_for(ToolKind::HorizontalLine);
    let horizontal = horizontal.as_line().unwrap();
    assert!(horizontal.line.extend.left && horizontal.line.extend.right);

    let horizontal_ray = ToolOptions::defaults_for(ToolKind::HorizontalRay);
    let horizontal_ray = horizontal_ray.as_line().unwrap();
    assert!(!horizontal_ray.line.extend.left && horizontal_ray.line.extend.right);
}

#[test]
fn apply_options_patches_in_place() {
    let mut tool = LineTool::with_points(
        ToolKind::TrendLine,
        None,
        vec![ToolPoint::new(10.0, 0.0), ToolPoint::new(20.0, 10.0)],
    )
    .unwrap();

    tool.apply_options(&json!({ "visible": false, "line": { "style": "dashed" } })).unwrap();
    let options = tool.options().as_line().unwrap();
    assert!(!tool.visible());
    assert_eq!(options.line.style, LineStyle::Dashed);

    // Broken patches leave the options untouched.
    let before = tool.options().clone();
    assert!(tool.apply_options(&json!({ "line": { "width": "wide" } })).is_err());
    assert_eq!(tool.options(), &before);
}

#[test]
fn color_string_round_trip() {
    let opaque = Color::parse("#2962ff").unwrap();
    assert_eq!(opaque.to_string(), "#2962ff");

    let translucent = Color::rgb(0x29, 0x62, 0xff).with_alpha(0.2);
    let parsed = Color::parse(&translucent.to_string()).unwrap();
    assert_eq!(parsed, translucent);

    assert!(Color::parse("red").is_none());
    assert!(Color::parse("#12345").is_none());
}

#[test]
fn dash_patterns_scale_with_line_width() {
    assert!(LineStyle::Solid.dash_pattern(2.0).is_empty());
    assert_eq!(LineStyle::Dotted.dash_pattern(2.0), vec![2.0, 2.0]);
    assert_eq!(LineStyle::Dashed.dash_pattern(2.0), vec![4.0, 4.0]);
    assert_eq!(LineStyle::LargeDashed.dash_pattern(1.0), vec![6.0, 6.0]);
    assert_eq!(LineStyle::SparseDotted.dash_pattern(1.0), vec![1.0, 4.0]);
}
