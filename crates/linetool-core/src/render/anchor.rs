// File: crates/linetool-core/src/render/anchor.rs
// Summary: Round/square anchor handle renderer with hover halo; anchors pick before bodies.

use skia_safe as skia;

use crate::geometry::Point;
use crate::hit_test::{CursorType, HitTarget, HitTestResult};
use crate::options::Color;

use super::{tolerance, AnchorPoint, PaneRenderer};

#[derive(Clone, Debug)]
pub struct LineAnchorData {
    pub points: Vec<AnchorPoint>,
    /// Fill behind each handle (pane background at that height).
    pub background_colors: Vec<Color>,
    pub cursors: Option<Vec<CursorType>>,
    pub edited_point_index: Option<usize>,
    /// Current pointer position, for the hover halo.
    pub current_point: Point,
    pub color: Color,
    pub radius: f64,
    pub stroke_width: f64,
    pub hovered_stroke_width: f64,
    pub selected: bool,
    pub visible: bool,
    pub hit_target: HitTarget,
}

impl LineAnchorData {
    pub fn new(points: Vec<AnchorPoint>, selected: bool, visible: bool, current_point: Point) -> Self {
        let background_colors = vec![Color::rgb(0xff, 0xff, 0xff); points.len()];
        Self {
            points,
            background_colors,
            cursors: None,
            edited_point_index: None,
            current_point,
            color: Color::rgb(0x1e, 0x53, 0xe5),
            radius: 6.0,
            stroke_width: 1.0,
            hovered_stroke_width: 4.0,
            selected,
            visible,
            hit_target: HitTarget::ChangePoint,
        }
    }
}

pub struct LineAnchorRenderer {
    data: Option<LineAnchorData>,
}

impl LineAnchorRenderer {
    pub fn new() -> Self {
        Self { data: None }
    }

    pub fn set_data(&mut self, data: LineAnchorData) {
        self.data = Some(data);
    }
}

impl Default for LineAnchorRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneRenderer for LineAnchorRenderer {
    fn draw(&self, canvas: &skia::Canvas, pixel_ratio: f32, _is_hovered: bool) {
        let Some(data) = &self.data else { return };
        if !data.visible {
            return;
        }

        let pr = pixel_ratio as f64;
        let mut line_width = (data.stroke_width * pr).floor().max(1.0);
        if data.selected {
            line_width += (pr / 2.0).floor().max(1.0);
        }

        let pr_int = pr.floor().max(1.0);
        let mut radius = (data.radius * pr * 2.0).round();
        if (pr as i64) % 2 != (pr_int as i64) % 2 {
            radius += 1.0;
        }
        let shift = if (pr_int as i64) % 2 != 0 { 0.5 } else { 0.0 };

        for (i, anchor) in data.points.iter().enumerate() {
            if data.edited_point_index == Some(anchor.index) {
                continue;
            }
            let fill = data.background_colors.get(i).copied().unwrap_or(Color::rgb(255, 255, 255));
            let x = (anchor.x() * pr).round() + shift;
            let y = (anchor.y() * pr).round() + shift;
            let center = Point::new(x, y);

            draw_body(canvas, center, anchor.square, radius / 2.0, line_width, fill, data.color);

            let hovered = anchor.point.subtract(data.current_point).length() <= data.radius + tolerance::ANCHOR;
            if hovered {
                let halo_width = (data.hovered_stroke_width * pr).floor().max(1.0);
                draw_halo(canvas, center, anchor.square, radius / 2.0, halo_width, data.color);
            }
        }
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<HitTestResult> {
        let data = self.data.as_ref()?;
        let position = Point::new(x, y);
        for (i, anchor) in data.points.iter().enumerate() {
            if anchor.point.subtract(position).length() <= data.radius + tolerance::ANCHOR {
                let cursor = data
                    .cursors
                    .as_ref()
                    .and_then(|cursors| cursors.get(i).copied())
                    .unwrap_or(CursorType::Default);
                return Some(HitTestResult {
                    target: data.hit_target,
                    point_index: Some(anchor.index),
                    cursor: Some(cursor),
                });
            }
        }
        None
    }
}

fn draw_body(
    canvas: &skia::Canvas,
    center: Point,
    square: bool,
    radius: f64,
    line_width: f64,
    fill: Color,
    stroke: Color,
) {
    let mut fill_paint = skia::Paint::default();
    fill_paint.set_anti_alias(true);
    fill_paint.set_color(fill.to_skia());

    let mut stroke_paint = skia::Paint::default();
    stroke_paint.set_anti_alias(true);
    stroke_paint.set_style(skia::paint::Style::Stroke);
    stroke_paint.set_stroke_width(line_width as f32);
    stroke_paint.set_color(stroke.to_skia());

    if square {
        let half = radius - line_width / 2.0;
        let rect = skia::Rect::new(
            (center.x - half) as f32,
            (center.y - half) as f32,
            (center.x + half) as f32,
            (center.y + half) as f32,
        );
        canvas.draw_rect(rect, &fill_paint);
        canvas.draw_rect(rect, &stroke_paint);
    } else {
        let xy = (center.x as f32, center.y as f32);
        canvas.draw_circle(xy, (radius - line_width / 2.0) as f32, &fill_paint);
        canvas.draw_circle(xy, (radius - line_width / 2.0) as f32, &stroke_paint);
    }
}

fn draw_halo(canvas: &skia::Canvas, center: Point, square: bool, radius: f64, line_width: f64, color: Color) {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(line_width as f32);
    paint.set_color(color.with_alpha(0.2).to_skia());

    if square {
        let half = radius + line_width / 2.0;
        let rect = skia::Rect::new(
            (center.x - half) as f32,
            (center.y - half) as f32,
            (center.x + half) as f32,
            (center.y + half) as f32,
        );
        canvas.draw_rect(rect, &paint);
    } else {
        canvas.draw_circle((center.x as f32, center.y as f32), (radius + line_width / 2.0) as f32, &paint);
    }
}
