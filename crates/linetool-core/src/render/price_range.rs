// File: crates/linetool-core/src/render/price_range.rs
// Summary: Price-range box renderer: fill, top/bottom borders, direction arrow, center lines.

use skia_safe as skia;

use crate::geometry::{distance_to_segment, point_in_box, Box2, Point, Segment};
use crate::hit_test::{HitTarget, HitTestResult};
use crate::options::PriceRangeShapeOptions;

use super::draw::{fill_paint, stroke_paint};
use super::{draw_scaled, tolerance, AnchorPoint, PaneRenderer};

const ARROW_SIZE: f64 = 10.0;

pub struct PriceRangeData {
    pub options: PriceRangeShapeOptions,
    pub points: Vec<AnchorPoint>,
    pub hit_test_background: bool,
    pub width: f64,
}

pub struct PriceRangeRenderer {
    data: Option<PriceRangeData>,
    hit: HitTestResult,
    back_hit: HitTestResult,
}

impl PriceRangeRenderer {
    pub fn new() -> Self {
        Self {
            data: None,
            hit: HitTestResult::new(HitTarget::MovePoint),
            back_hit: HitTestResult::new(HitTarget::MovePointBackground),
        }
    }

    pub fn set_data(&mut self, data: PriceRangeData) {
        self.data = Some(data);
    }

    fn corners(data: &PriceRangeData) -> (Point, Point) {
        let p0 = data.points[0].point;
        let p1 = data.points[1].point;
        (Point::new(p0.x.min(p1.x), p0.y.min(p1.y)), Point::new(p0.x.max(p1.x), p0.y.max(p1.y)))
    }

    fn clip_edge(data: &PriceRangeData, end0: Point, end1: Point) -> Option<Segment> {
        if end0 == end1 {
            return None;
        }
        let min_x = end0.x.min(end1.x);
        let max_x = end0.x.max(end1.x);
        let x1 = if data.options.extend.left { 0.0 } else { min_x.max(0.0) };
        let x2 = if data.options.extend.right { data.width } else { max_x.min(data.width) };
        if x1 > x2 || x2 <= 0.0 || x1 >= data.width {
            None
        } else {
            Some([Point::new(x1, end0.y), Point::new(x2, end1.y)])
        }
    }

    fn hit_edge(&self, data: &PriceRangeData, target: Point, end0: Point, end1: Point) -> Option<HitTestResult> {
        let edge = Self::clip_edge(data, end0, end1)?;
        (distance_to_segment(edge[0], edge[1], target).distance <= tolerance::LINE).then_some(self.hit)
    }
}

impl Default for PriceRangeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneRenderer for PriceRangeRenderer {
    fn draw(&self, canvas: &skia::Canvas, pixel_ratio: f32, _is_hovered: bool) {
        let Some(data) = &self.data else { return };
        let border_width = data.options.border.as_ref().map_or(0.0, |b| b.width);
        let background = data.options.background.as_ref().map(|b| b.color);
        if data.points.len() < 2 || (border_width <= 0.0 && background.is_none()) {
            return;
        }

        // First click is the range start; the vertical arrow points toward it.
        let p0 = data.points[0].point;
        let p1 = data.points[1].point;
        let extend = data.options.extend;

        draw_scaled(canvas, pixel_ratio, |canvas| {
            if let Some(color) = background {
                let rect = skia::Rect::new(p0.x as f32, p0.y as f32, p1.x as f32, p1.y as f32);
                canvas.draw_rect(rect, &fill_paint(color));
            }

            if let Some(border) = &data.options.border {
                if border.width > 0.0 {
                    let paint = stroke_paint(border.color, border.width.max(1.0), border.style);
                    let adjust = 0.5 * border.width.max(1.0);
                    let left_x = p0.x - if extend.left { adjust } else { 0.0 };
                    let right_x = p1.x + if extend.right { adjust } else { 0.0 };

                    let mut path = skia::PathBuilder::new();
                    path.move_to((left_x as f32, (p0.y - adjust) as f32));
                    path.line_to((right_x as f32, (p0.y - adjust) as f32));
                    path.move_to((left_x as f32, (p1.y + adjust) as f32));
                    path.line_to((right_x as f32, (p1.y + adjust) as f32));

                    if data.options.show_center_vertical_line {
                        let center_x = (p0.x + p1.x) / 2.0;
                        path.move_to((center_x as f32, p0.y as f32));
                        path.line_to((center_x as f32, p1.y as f32));

                        let y_diff = (p0.y - p1.y).abs();
                        if y_diff > ARROW_SIZE {
                            // Arrow tip sits at the second point's edge.
                            let (tip_y, flare) = if p0.y >= p1.y {
                                (p1.y + adjust, ARROW_SIZE)
                            } else {
                                (p1.y - adjust, -ARROW_SIZE)
                            };
                            path.move_to(((center_x - ARROW_SIZE) as f32, (tip_y + flare) as f32));
                            path.line_to((center_x as f32, tip_y as f32));
                            path.line_to(((center_x + ARROW_SIZE) as f32, (tip_y + flare) as f32));
                        }
                    }
                    let path = path.detach();
                    canvas.draw_path(&path, &paint);

                    if data.options.show_center_horizontal_line {
                        let center_y = (p0.y + p1.y) / 2.0;
                        let line_paint = stroke_paint(
                            border.color,
                            data.options.center_horizontal_line_width.max(1.0),
                            data.options.center_horizontal_line_style,
                        );
                        canvas.draw_line(
                            (left_x as f32, center_y as f32),
                            (right_x as f32, center_y as f32),
                            &line_paint,
                        );
                    }
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
        let (top_left, bottom_right) = Self::corners(data);
        let top_right = Point::new(bottom_right.x, top_left.y);
        let bottom_left = Point::new(top_left.x, bottom_right.y);

        if let Some(hit) = self.hit_edge(data, target, top_left, top_right) {
            return Some(hit);
        }
        if let Some(hit) = self.hit_edge(data, target, bottom_left, bottom_right) {
            return Some(hit);
        }
        if distance_to_segment(top_right, bottom_right, target).distance <= tolerance::LINE
            || distance_to_segment(top_left, bottom_left, target).distance <= tolerance::LINE
        {
            return Some(self.hit);
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
