// File: crates/linetool-core/src/render/circle.rs
// Summary: Circle renderer; first point is the center, second sets the radius.

use skia_safe as skia;

use crate::geometry::Point;
use crate::hit_test::{HitTarget, HitTestResult};
use crate::options::ShapeOptions;

use super::draw::stroke_paint;
use super::{draw_scaled, tolerance, AnchorPoint, PaneRenderer};

pub fn distance(a: Point, b: Point) -> f64 {
    b.subtract(a).length()
}

pub struct CircleData {
    pub shape: ShapeOptions,
    pub points: Vec<AnchorPoint>,
    /// Viewport size in CSS pixels, for off-screen culling.
    pub width: f64,
    pub height: f64,
}

pub struct CircleRenderer {
    data: Option<CircleData>,
    hit: HitTestResult,
}

impl CircleRenderer {
    pub fn new() -> Self {
        Self { data: None, hit: HitTestResult::new(HitTarget::MovePoint) }
    }

    pub fn set_data(&mut self, data: CircleData) {
        self.data = Some(data);
    }

    fn is_visible(data: &CircleData, center: Point, radius: f64) -> bool {
        center.x + radius >= 0.0
            && center.x - radius <= data.width
            && center.y + radius >= 0.0
            && center.y - radius <= data.height
    }
}

impl Default for CircleRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneRenderer for CircleRenderer {
    fn draw(&self, canvas: &skia::Canvas, pixel_ratio: f32, _is_hovered: bool) {
        let Some(data) = &self.data else { return };
        let border_width = data.shape.border.as_ref().map_or(0.0, |b| b.width);
        let background = data.shape.background.as_ref().map(|b| b.color);
        if data.points.len() < 2 || (border_width <= 0.0 && background.is_none()) {
            return;
        }

        let center = data.points[0].point;
        let radius = distance(center, data.points[1].point);
        if !Self::is_visible(data, center, radius) {
            return;
        }

        draw_scaled(canvas, pixel_ratio, |canvas| {
            let center_xy = (center.x as f32, center.y as f32);
            if let Some(color) = background {
                let mut fill = skia::Paint::default();
                fill.set_anti_alias(true);
                fill.set_color(color.to_skia());
                canvas.draw_circle(center_xy, radius as f32, &fill);
            }
            if let Some(border) = &data.shape.border {
                if border.width > 0.0 {
                    let paint = stroke_paint(border.color, border.width.max(1.0), border.style);
                    canvas.draw_circle(center_xy, radius as f32, &paint);
                }
            }
        });
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<HitTestResult> {
        let data = self.data.as_ref()?;
        if data.points.len() < 2 {
            return None;
        }
        let center = data.points[0].point;
        let target = Point::new(x, y);
        let to_center = distance(center, target);
        let radius = distance(center, data.points[1].point);
        let border_width = data.shape.border.as_ref().map_or(1.0, |b| b.width.max(1.0));

        // A widened band on the border, plus a grab zone around the center.
        let on_border = to_center >= radius + border_width - tolerance::CIRCLE_BORDER
            && to_center <= radius + border_width;
        let near_center = to_center <= tolerance::CIRCLE_BORDER * 2.0;
        (on_border || near_center).then_some(self.hit)
    }
}
