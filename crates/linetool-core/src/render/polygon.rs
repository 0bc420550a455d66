// File: crates/linetool-core/src/render/polygon.rs
// Summary: Open/closed vector path renderer for brush, highlighter and path tools.

use skia_safe as skia;

use crate::geometry::{distance_to_segment, point_in_circle, point_in_polygon, Point};
use crate::hit_test::{HitTarget, HitTestResult};
use crate::options::{BackgroundOptions, LineEnd, LineOptions};

use super::draw::{draw_arrow_end, stroke_paint};
use super::{draw_scaled, tolerance, AnchorPoint, PaneRenderer};

pub struct PolygonData {
    pub line: LineOptions,
    pub background: Option<BackgroundOptions>,
    pub points: Vec<AnchorPoint>,
}

pub struct PolygonRenderer {
    data: Option<PolygonData>,
    hit: HitTestResult,
    back_hit: HitTestResult,
}

impl PolygonRenderer {
    pub fn new() -> Self {
        Self {
            data: None,
            hit: HitTestResult::new(HitTarget::MovePoint),
            back_hit: HitTestResult::new(HitTarget::MovePointBackground),
        }
    }

    pub fn set_data(&mut self, data: PolygonData) {
        self.data = Some(data);
    }

    pub fn set_hit_test(&mut self, hit: HitTestResult) {
        self.hit = hit;
    }
}

impl Default for PolygonRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneRenderer for PolygonRenderer {
    fn draw(&self, canvas: &skia::Canvas, pixel_ratio: f32, _is_hovered: bool) {
        let Some(data) = &self.data else { return };
        if data.points.is_empty() {
            return;
        }

        draw_scaled(canvas, pixel_ratio, |canvas| {
            if data.points.len() == 1 {
                // A lone point is only visible with zero line width (dot mode).
                if data.line.width == 0.0 {
                    let mut paint = skia::Paint::default();
                    paint.set_anti_alias(true);
                    paint.set_color(data.line.color.to_skia());
                    canvas.draw_circle((data.points[0].x() as f32, data.points[0].y() as f32), 0.5, &paint);
                }
                return;
            }

            let mut path = skia::PathBuilder::new();
            path.move_to((data.points[0].x() as f32, data.points[0].y() as f32));
            for anchor in &data.points {
                path.line_to((anchor.x() as f32, anchor.y() as f32));
            }
            let path = path.detach();

            if let Some(background) = &data.background {
                let mut fill = skia::Paint::default();
                fill.set_anti_alias(true);
                fill.set_color(background.color.to_skia());
                canvas.draw_path(&path, &fill);
            }

            if data.line.width > 0.0 {
                let mut stroke = stroke_paint(data.line.color, data.line.width, data.line.style);
                stroke.set_stroke_join(data.line.join.to_skia());
                stroke.set_stroke_cap(data.line.cap.to_skia());
                canvas.draw_path(&path, &stroke);

                let count = data.points.len();
                if data.line.end.left == LineEnd::Arrow {
                    draw_arrow_end(canvas, data.points[1].point, data.points[0].point, data.line.width, 1.0, &stroke);
                }
                if data.line.end.right == LineEnd::Arrow {
                    draw_arrow_end(
                        canvas,
                        data.points[count - 2].point,
                        data.points[count - 1].point,
                        data.line.width,
                        1.0,
                        &stroke,
                    );
                }
            }
        });
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<HitTestResult> {
        let data = self.data.as_ref()?;
        let target = Point::new(x, y);
        let distance = tolerance::LINE.max((data.line.width / 2.0).ceil());
        let count = data.points.len();

        if count == 1 {
            return point_in_circle(target, data.points[0].point, distance).then_some(self.hit);
        }

        for i in 1..count {
            if distance_to_segment(data.points[i - 1].point, data.points[i].point, target).distance <= distance {
                return Some(self.hit);
            }
        }

        if data.background.is_some() && count > 0 {
            // Closing edge participates when the shape is filled.
            if distance_to_segment(data.points[0].point, data.points[count - 1].point, target).distance <= distance {
                return Some(self.hit);
            }
            let polygon: Vec<Point> = data.points.iter().map(|a| a.point).collect();
            if point_in_polygon(target, &polygon) {
                return Some(self.back_hit);
            }
        }
        None
    }
}
