// File: crates/linetool-core/src/render/draw.rs
// Summary: Low-level line drawing: paints, dash styles, pixel-grid corrections, end caps, clipping.

use skia_safe as skia;

use crate::geometry::{
    intersect_line_and_box, intersect_line_segment_and_box, intersect_ray_and_box, line_segment,
    line_through_points, Box2, BoxClip, Point, Segment,
};
use crate::options::{Color, LineStyle};

/// Stroke paint with the dash pattern implied by `style` at the given
/// (already scaled) line width.
pub fn stroke_paint(color: Color, width: f64, style: LineStyle) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(width as f32);
    paint.set_color(color.to_skia());
    let pattern = style.dash_pattern(width);
    if !pattern.is_empty() {
        paint.set_path_effect(skia::PathEffect::dash(&pattern, 0.0));
    }
    paint
}

pub fn fill_paint(color: Color) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Fill);
    paint.set_color(color.to_skia());
    paint
}

pub fn draw_line(canvas: &skia::Canvas, x1: f64, y1: f64, x2: f64, y2: f64, paint: &skia::Paint) {
    if !x1.is_finite() || !y1.is_finite() || !x2.is_finite() || !y2.is_finite() {
        return;
    }
    canvas.draw_line((x1 as f32, y1 as f32), (x2 as f32, y2 as f32), paint);
}

/// Horizontal line snapped to the pixel grid: odd widths sit on half-pixels.
pub fn draw_horizontal_line(canvas: &skia::Canvas, y: f64, left: f64, right: f64, paint: &skia::Paint) {
    let correction = if (paint.stroke_width() as i64) % 2 != 0 { 0.5 } else { 0.0 };
    draw_line(canvas, left, y + correction, right, y + correction, paint);
}

pub fn draw_vertical_line(canvas: &skia::Canvas, x: f64, top: f64, bottom: f64, paint: &skia::Paint) {
    let correction = if (paint.stroke_width() as i64) % 2 != 0 { 0.5 } else { 0.0 };
    draw_line(canvas, x + correction, top, x + correction, bottom, paint);
}

/// End-cap size multiplier shrinks as lines get thicker.
pub fn compute_end_line_size(line_width: f64) -> f64 {
    match line_width.round() as i64 {
        1 => 3.5,
        2 => 2.0,
        3 => 1.5,
        4 => 1.25,
        _ => 1.0,
    }
}

pub fn draw_circle_end(canvas: &skia::Canvas, point: Point, width: f64, pixel_ratio: f32, color: Color) {
    let multiplier = compute_end_line_size(width);
    let paint = fill_paint(color);
    let pr = pixel_ratio as f64;
    canvas.draw_circle(
        ((point.x * pr) as f32, (point.y * pr) as f32),
        (width * multiplier * pr) as f32,
        &paint,
    );
}

pub fn draw_arrow_end(
    canvas: &skia::Canvas,
    point0: Point,
    point1: Point,
    width: f64,
    pixel_ratio: f32,
    paint: &skia::Paint,
) {
    if point1.subtract(point0).length() < 1.0 {
        return;
    }
    let pr = pixel_ratio as f64;
    for [a, b] in arrow_points(point0, point1, width) {
        draw_line(canvas, a.x * pr, a.y * pr, b.x * pr, b.y * pr, paint);
    }
}

/// Stroke segments forming an arrow head at `point1`, pointing away from
/// `point0`.
pub fn arrow_points(point0: Point, point1: Point, width: f64) -> Vec<Segment> {
    let half = 0.5 * width;
    let sqrt2 = std::f64::consts::SQRT_2;
    let direction = point1.subtract(point0).normalized();
    let head_length = 5.0 * width * compute_end_line_size(width);
    let cap = half;

    if head_length * sqrt2 * 0.2 <= cap {
        return Vec::new();
    }

    let back = point1.subtract(direction.scaled(head_length));
    let normal = direction.transposed();
    let wing = normal.scaled(head_length);
    let left = back.add(wing);
    let right = back.subtract(wing);
    let left_tip = point1.add(left.subtract(point1).normalized().scaled(cap));
    let right_tip = point1.add(right.subtract(point1).normalized().scaled(cap));

    let barb = half * (sqrt2 - 1.0);
    let barb_offset = normal.scaled(barb);
    let inset = (head_length - half / sqrt2).min(half * sqrt2);
    let spine_end = point1.subtract(direction.scaled(inset));

    vec![
        [left, left_tip],
        [right, right_tip],
        [point1.subtract(barb_offset), spine_end.subtract(barb_offset)],
        [point1.add(barb_offset), spine_end.add(barb_offset)],
    ]
}

/// Extend a segment across the viewport per the extend flags and clip the
/// result to the viewport box. `None` when nothing remains visible.
pub fn extend_and_clip_line_segment(
    point0: Point,
    point1: Point,
    width: f64,
    height: f64,
    extend_left: bool,
    extend_right: bool,
) -> Option<Segment> {
    if point0 == point1 {
        return None;
    }
    let viewport = Box2::new(Point::new(0.0, 0.0), Point::new(width, height));

    if extend_left && extend_right {
        return intersect_line_and_box(line_through_points(point0, point1), viewport)?.as_segment();
    }
    if extend_left {
        let point = intersect_ray_and_box(point1, point0, viewport)?;
        if point == point1 {
            return None;
        }
        return Some(line_segment(point1, point));
    }
    if extend_right {
        let point = intersect_ray_and_box(point0, point1, viewport)?;
        if point == point0 {
            return None;
        }
        return Some(line_segment(point0, point));
    }
    match intersect_line_segment_and_box(line_segment(point0, point1), viewport)? {
        BoxClip::Segment(segment) => Some(segment),
        BoxClip::Point(_) => None,
    }
}

/// Rounded rectangle path; a zero radius degenerates to a plain rectangle.
pub fn round_rect(x: f64, y: f64, width: f64, height: f64, radius: f64) -> skia::RRect {
    let rect = skia::Rect::from_xywh(x as f32, y as f32, width as f32, height as f32);
    skia::RRect::new_rect_xy(rect, radius.max(0.0) as f32, radius.max(0.0) as f32)
}

/// Background fill plus a centered border around an axis-aligned rectangle,
/// optionally running the horizontal edges out to the viewport sides.
#[allow(clippy::too_many_arguments)]
pub fn fill_rect_with_border(
    canvas: &skia::Canvas,
    point0: Point,
    point1: Point,
    background: Option<Color>,
    border: Option<(Color, f64, LineStyle)>,
    extend_left: bool,
    extend_right: bool,
    container_width: f64,
) {
    let x1 = if extend_left { 0.0 } else { point0.x };
    let x2 = if extend_right { container_width } else { point1.x };

    if let Some(color) = background {
        let paint = fill_paint(color);
        let rect = skia::Rect::new(x1 as f32, point0.y as f32, x2 as f32, point1.y as f32);
        canvas.draw_rect(rect, &paint);
    }

    if let Some((color, width, style)) = border {
        if width > 0.0 {
            let paint = stroke_paint(color, width, style);
            let half = 0.5 * width;
            // Top and bottom run the extended span; verticals sit on the stored ends.
            draw_line(canvas, x1, point0.y - half, x2, point0.y - half, &paint);
            draw_line(canvas, x1, point1.y + half, x2, point1.y + half, &paint);
            draw_line(canvas, point0.x, point0.y, point0.x, point1.y, &paint);
            draw_line(canvas, point1.x, point0.y, point1.x, point1.y, &paint);
        }
    }
}
