// File: crates/linetool-core/src/render/triangle.rs
// Summary: Filled triangle renderer; degenerates to a segment until the third point lands.

use skia_safe as skia;

use crate::geometry::{distance_to_segment, point_in_triangle, Point};
use crate::hit_test::{HitTarget, HitTestResult};
use crate::options::ShapeOptions;

use super::draw::stroke_paint;
use super::{draw_scaled, tolerance, AnchorPoint, PaneRenderer};

pub struct TriangleData {
    pub shape: ShapeOptions,
    pub points: Vec<AnchorPoint>,
    pub hit_test_background: bool,
}

pub struct TriangleRenderer {
    data: Option<TriangleData>,
}

impl TriangleRenderer {
    pub fn new() -> Self {
        Self { data: None }
    }

    pub fn set_data(&mut self, data: TriangleData) {
        self.data = Some(data);
    }
}

impl Default for TriangleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneRenderer for TriangleRenderer {
    fn draw(&self, canvas: &skia::Canvas, pixel_ratio: f32, _is_hovered: bool) {
        let Some(data) = &self.data else { return };
        if data.points.len() < 2 {
            return;
        }
        let p0 = data.points[0].point;
        let p1 = data.points[1].point;
        let p2 = if data.points.len() == 2 { p1 } else { data.points[2].point };

        draw_scaled(canvas, pixel_ratio, |canvas| {
            let mut path = skia::PathBuilder::new();
            path.move_to((p0.x as f32, p0.y as f32));
            path.line_to((p1.x as f32, p1.y as f32));
            path.line_to((p2.x as f32, p2.y as f32));
            path.close();
            let path = path.detach();

            if let Some(background) = &data.shape.background {
                let mut fill = skia::Paint::default();
                fill.set_anti_alias(true);
                fill.set_color(background.color.to_skia());
                canvas.draw_path(&path, &fill);
            }
            if let Some(border) = &data.shape.border {
                if border.width > 0.0 {
                    let paint = stroke_paint(border.color, border.width, border.style);
                    canvas.draw_path(&path, &paint);
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
        let p0 = data.points[0].point;
        let p1 = data.points[1].point;

        if distance_to_segment(p0, p1, target).distance <= tolerance::LINE {
            return Some(HitTestResult::new(HitTarget::MovePoint));
        }
        if data.points.len() != 3 {
            return None;
        }
        let p2 = data.points[2].point;
        if distance_to_segment(p1, p2, target).distance <= tolerance::LINE
            || distance_to_segment(p2, p0, target).distance <= tolerance::LINE
        {
            return Some(HitTestResult::new(HitTarget::MovePoint));
        }
        if data.hit_test_background && point_in_triangle(target, p0, p1, p2) {
            return Some(HitTestResult::new(HitTarget::MovePointBackground));
        }
        None
    }
}
