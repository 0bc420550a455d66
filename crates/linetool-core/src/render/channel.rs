// File: crates/linetool-core/src/render/channel.rs
// Summary: Parallel channel renderer: two boundaries, middle line, half-plane-clipped fill.

use skia_safe as skia;

use crate::geometry::{
    distance_to_line, distance_to_segment, half_plane_through_point, intersect_polygon_and_half_plane,
    line_through_points, Point, Segment,
};
use crate::hit_test::{HitTarget, HitTestResult};
use crate::options::ParallelChannelToolOptions;

use super::draw::{draw_line, extend_and_clip_line_segment, fill_paint, stroke_paint};
use super::{draw_scaled, tolerance, AnchorPoint, PaneRenderer};

pub struct ParallelChannelData {
    pub options: ParallelChannelToolOptions,
    /// Two points while creating, four once the second boundary exists
    /// (both ends of the first line, then both ends of the second).
    pub points: Vec<AnchorPoint>,
    pub hit_test_background: bool,
    pub width: f64,
    pub height: f64,
}

pub struct ParallelChannelRenderer {
    data: Option<ParallelChannelData>,
    hit: HitTestResult,
    back_hit: HitTestResult,
}

impl ParallelChannelRenderer {
    pub fn new() -> Self {
        Self {
            data: None,
            hit: HitTestResult::new(HitTarget::MovePoint),
            back_hit: HitTestResult::new(HitTarget::MovePointBackground),
        }
    }

    pub fn set_data(&mut self, data: ParallelChannelData) {
        self.data = Some(data);
    }

    fn extend_and_clip(data: &ParallelChannelData, end0: Point, end1: Point) -> Option<Segment> {
        extend_and_clip_line_segment(
            end0,
            end1,
            data.width,
            data.height,
            data.options.extend.left,
            data.options.extend.right,
        )
    }

    fn draw_boundary(canvas: &skia::Canvas, data: &ParallelChannelData, end0: Point, end1: Point, paint: &skia::Paint) {
        if let Some(line) = Self::extend_and_clip(data, end0, end1) {
            draw_line(canvas, line[0].x, line[0].y, line[1].x, line[1].y, paint);
        }
    }

    fn hit_boundary(&self, data: &ParallelChannelData, target: Point, end0: Point, end1: Point) -> Option<HitTestResult> {
        let line = Self::extend_and_clip(data, end0, end1)?;
        (distance_to_segment(line[0], line[1], target).distance <= tolerance::LINE).then_some(self.hit)
    }

    fn draw_background(canvas: &skia::Canvas, data: &ParallelChannelData) {
        let Some(background) = &data.options.background else { return };
        let [end0, end1, end2, end3] =
            [data.points[0].point, data.points[1].point, data.points[2].point, data.points[3].point];
        if end0 == end1 || end2 == end3 || data.width <= 0.0 || data.height <= 0.0 {
            return;
        }
        // Degenerate channel: the second boundary collapsed onto the first.
        if distance_to_line(end0, end1, end2).distance < 1e-6 || distance_to_line(end0, end1, end3).distance < 1e-6 {
            return;
        }

        let viewport = vec![
            Point::new(0.0, 0.0),
            Point::new(data.width, 0.0),
            Point::new(data.width, data.height),
            Point::new(0.0, data.height),
        ];

        let clip = |points: Option<Vec<Point>>, a: Point, b: Point, inside: Point| -> Option<Vec<Point>> {
            let points = points?;
            intersect_polygon_and_half_plane(&points, half_plane_through_point(line_through_points(a, b), inside))
        };

        let mut polygon = Some(viewport);
        polygon = clip(polygon, end0, end1, end3);
        if !data.options.extend.right {
            polygon = clip(polygon, end1, end3, end2);
        }
        polygon = clip(polygon, end3, end2, end0);
        if !data.options.extend.left {
            polygon = clip(polygon, end2, end0, end1);
        }

        if let Some(polygon) = polygon {
            let mut path = skia::PathBuilder::new();
            path.move_to((polygon[0].x as f32, polygon[0].y as f32));
            for point in &polygon[1..] {
                path.line_to((point.x as f32, point.y as f32));
            }
            path.close();
            let path = path.detach();
            canvas.draw_path(&path, &fill_paint(background.color));
        }
    }

    fn hit_background(&self, data: &ParallelChannelData, target: Point) -> Option<HitTestResult> {
        if data.points.len() != 4 {
            return None;
        }
        let [end0, end1, end2] = [data.points[0].point, data.points[1].point, data.points[2].point];
        let slope = (end1.y - end0.y) / (end1.x - end0.x);
        let line1_y = end2.y + slope * (target.x - end2.x);
        let line0_y = end0.y + slope * (target.x - end0.x);
        let bottom = line0_y.max(line1_y);
        let top = line0_y.min(line1_y);
        let max_x = end0.x.max(end1.x);
        let min_x = end0.x.min(end1.x);

        if (!data.options.extend.left && target.x < min_x) || (!data.options.extend.right && target.x > max_x) {
            return None;
        }
        (target.y >= top && target.y <= bottom).then_some(self.back_hit)
    }
}

impl Default for ParallelChannelRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneRenderer for ParallelChannelRenderer {
    fn draw(&self, canvas: &skia::Canvas, pixel_ratio: f32, _is_hovered: bool) {
        let Some(data) = &self.data else { return };
        if data.points.len() < 2 {
            return;
        }

        draw_scaled(canvas, pixel_ratio, |canvas| {
            let channel = &data.options.channel_line;
            let paint = stroke_paint(channel.color, channel.width, channel.style);
            let [end0, end1] = [data.points[0].point, data.points[1].point];
            Self::draw_boundary(canvas, data, end0, end1, &paint);

            if data.points.len() == 4 {
                let [end2, end3] = [data.points[2].point, data.points[3].point];
                Self::draw_boundary(canvas, data, end2, end3, &paint);
                Self::draw_background(canvas, data);

                if data.options.show_middle_line {
                    let middle = &data.options.middle_line;
                    let middle_paint = stroke_paint(middle.color, middle.width, middle.style);
                    let mid0 = end0.add(end2).scaled(0.5);
                    let mid1 = end1.add(end3).scaled(0.5);
                    Self::draw_boundary(canvas, data, mid0, mid1, &middle_paint);
                }
            }
        });
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<HitTestResult> {
        let data = self.data.as_ref()?;
        if data.points.len() < 2 {
            return None;
        }
        let target = Point::new(x, y);
        let [end0, end1] = [data.points[0].point, data.points[1].point];
        if let Some(hit) = self.hit_boundary(data, target, end0, end1) {
            return Some(hit);
        }

        if data.points.len() == 4 {
            let [end2, end3] = [data.points[2].point, data.points[3].point];
            if let Some(hit) = self.hit_boundary(data, target, end2, end3) {
                return Some(hit);
            }
            if data.options.show_middle_line {
                let mid0 = end0.add(end2).scaled(0.5);
                let mid1 = end1.add(end3).scaled(0.5);
                if let Some(hit) = self.hit_boundary(data, target, mid0, mid1) {
                    return Some(hit);
                }
            }
        }

        if data.hit_test_background {
            self.hit_background(data, target)
        } else {
            None
        }
    }
}
