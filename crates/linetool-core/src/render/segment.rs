// File: crates/linetool-core/src/render/segment.rs
// Summary: Line-segment renderer with viewport extension, end caps and distance hit-testing.

use skia_safe as skia;

use crate::geometry::{distance_to_segment, Point, Segment};
use crate::hit_test::{HitTarget, HitTestResult};
use crate::options::{LineEnd, LineOptions};

use super::draw::{
    draw_arrow_end, draw_circle_end, draw_horizontal_line, draw_line, draw_vertical_line,
    extend_and_clip_line_segment, stroke_paint,
};
use super::{tolerance, AnchorPoint, PaneRenderer};

pub struct SegmentData {
    pub line: LineOptions,
    pub points: Vec<AnchorPoint>,
    /// Viewport size in CSS pixels; extension and clipping run against it.
    pub width: f64,
    pub height: f64,
}

pub struct SegmentRenderer {
    data: Option<SegmentData>,
    hit: HitTestResult,
}

impl SegmentRenderer {
    pub fn new() -> Self {
        Self { data: None, hit: HitTestResult::new(HitTarget::MovePoint) }
    }

    pub fn set_data(&mut self, data: SegmentData) {
        self.data = Some(data);
    }

    pub fn set_hit_test(&mut self, hit: HitTestResult) {
        self.hit = hit;
    }

    fn extend_and_clip(&self, data: &SegmentData) -> Option<Segment> {
        extend_and_clip_line_segment(
            data.points[0].point,
            data.points[1].point,
            data.width,
            data.height,
            data.line.extend.left,
            data.line.extend.right,
        )
    }

    fn draw_ends(&self, canvas: &skia::Canvas, data: &SegmentData, pixel_ratio: f32, paint: &skia::Paint) {
        let [p0, p1] = [data.points[0].point, data.points[1].point];
        match data.line.end.left {
            LineEnd::Arrow => draw_arrow_end(canvas, p1, p0, data.line.width, pixel_ratio, paint),
            LineEnd::Circle => draw_circle_end(canvas, p0, data.line.width, pixel_ratio, data.line.color),
            LineEnd::Normal => {}
        }
        match data.line.end.right {
            LineEnd::Arrow => draw_arrow_end(canvas, p0, p1, data.line.width, pixel_ratio, paint),
            LineEnd::Circle => draw_circle_end(canvas, p1, data.line.width, pixel_ratio, data.line.color),
            LineEnd::Normal => {}
        }
    }
}

impl Default for SegmentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneRenderer for SegmentRenderer {
    fn draw(&self, canvas: &skia::Canvas, pixel_ratio: f32, _is_hovered: bool) {
        let Some(data) = &self.data else { return };
        if data.points.len() < 2 {
            return;
        }

        let scaled_width = (data.line.width * pixel_ratio as f64).floor().max(1.0);
        let paint = stroke_paint(data.line.color, scaled_width, data.line.style);

        self.draw_ends(canvas, data, pixel_ratio, &paint);

        let Some(line) = self.extend_and_clip(data) else { return };
        if data.line.width <= 0.0 {
            return;
        }
        let pr = pixel_ratio as f64;
        let [a, b] = line;
        if a.x == b.x {
            draw_vertical_line(canvas, (a.x * pr).round(), a.y * pr, b.y * pr, &paint);
        } else if a.y == b.y {
            draw_horizontal_line(canvas, (a.y * pr).round(), a.x * pr, b.x * pr, &paint);
        } else {
            draw_line(canvas, a.x * pr, a.y * pr, b.x * pr, b.y * pr, &paint);
        }
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<HitTestResult> {
        let data = self.data.as_ref()?;
        if data.points.len() < 2 {
            return None;
        }
        let line = self.extend_and_clip(data)?;
        if distance_to_segment(line[0], line[1], Point::new(x, y)).distance <= tolerance::LINE {
            Some(self.hit)
        } else {
            None
        }
    }
}
