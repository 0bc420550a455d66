// File: crates/linetool-core/src/render/rectangle.rs
// Summary: Axis-aligned rectangle renderer with per-side viewport extension.

use skia_safe as skia;

use crate::geometry::{distance_to_segment, point_in_box, Box2, Point, Segment};
use crate::hit_test::{HitTarget, HitTestResult};
use crate::options::ShapeOptions;

use super::draw::fill_rect_with_border;
use super::{draw_scaled, tolerance, AnchorPoint, PaneRenderer};

pub struct RectangleData {
    pub shape: ShapeOptions,
    pub points: Vec<AnchorPoint>,
    pub hit_test_background: bool,
    /// Pane width in CSS pixels; the horizontal edges extend to it.
    pub width: f64,
}

pub struct RectangleRenderer {
    data: Option<RectangleData>,
    hit: HitTestResult,
    back_hit: HitTestResult,
}

impl RectangleRenderer {
    pub fn new() -> Self {
        Self {
            data: None,
            hit: HitTestResult::new(HitTarget::MovePoint),
            back_hit: HitTestResult::new(HitTarget::MovePointBackground),
        }
    }

    pub fn set_data(&mut self, data: RectangleData) {
        self.data = Some(data);
    }

    fn corners(data: &RectangleData) -> (Point, Point) {
        let p0 = data.points[0].point;
        let p1 = data.points[1].point;
        (Point::new(p0.x.min(p1.x), p0.y.min(p1.y)), Point::new(p0.x.max(p1.x), p0.y.max(p1.y)))
    }

    /// Horizontal edge clipped/extended against `[0, width]`.
    fn clip_edge(data: &RectangleData, end0: Point, end1: Point) -> Option<Segment> {
        if end0 == end1 {
            return None;
        }
        let min_x = end0.x.min(end1.x);
        let max_x = end0.x.max(end1.x);
        let x1 = if data.shape.extend.left { 0.0 } else { min_x.max(0.0) };
        let x2 = if data.shape.extend.right { data.width } else { max_x.min(data.width) };
        if x1 > x2 || x2 <= 0.0 || x1 >= data.width {
            None
        } else {
            Some([Point::new(x1, end0.y), Point::new(x2, end1.y)])
        }
    }

    fn hit_edge(&self, data: &RectangleData, target: Point, end0: Point, end1: Point) -> Option<HitTestResult> {
        let edge = Self::clip_edge(data, end0, end1)?;
        (distance_to_segment(edge[0], edge[1], target).distance <= tolerance::LINE).then_some(self.hit)
    }
}

impl Default for RectangleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneRenderer for RectangleRenderer {
    fn draw(&self, canvas: &skia::Canvas, pixel_ratio: f32, _is_hovered: bool) {
        let Some(data) = &self.data else { return };
        let border_width = data.shape.border.as_ref().map_or(0.0, |b| b.width);
        let background = data.shape.background.as_ref().map(|b| b.color);
        if data.points.len() < 2 || (border_width <= 0.0 && background.is_none()) {
            return;
        }

        let (top_left, bottom_right) = Self::corners(data);
        let border = data.shape.border.as_ref().map(|b| (b.color, b.width.max(1.0), b.style));
        draw_scaled(canvas, pixel_ratio, |canvas| {
            fill_rect_with_border(
                canvas,
                top_left,
                bottom_right,
                background,
                border,
                data.shape.extend.left,
                data.shape.extend.right,
                data.width,
            );
        });
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<HitTestResult> {
        let data = self.data.as_ref()?;
        if data.points.len() < 2 {
            return None;
        }
        let target = Point::new(x, y);
        let (top_left, bottom_right) = Self::corners(data);
        let top_right = Point::new(bottom_right.x, top_left.y);
        let bottom_left = Point::new(top_left.x, bottom_right.y);

        // Only the horizontal edges pick; the verticals are left to anchors.
        if let Some(hit) = self.hit_edge(data, target, top_left, top_right) {
            return Some(hit);
        }
        if let Some(hit) = self.hit_edge(data, target, bottom_left, bottom_right) {
            return Some(hit);
        }

        if data.hit_test_background {
            let edge = Self::clip_edge(data, top_left, bottom_right)?;
            if point_in_box(target, Box2::new(edge[0], edge[1])) {
                return Some(self.back_hit);
            }
        }
        None
    }
}
