// File: crates/linetool-core/src/render/market_depth.rs
// Summary: Market-depth ladder: per-level size labels plus lines proportional to total size.

use std::rc::Rc;

use skia_safe as skia;

use crate::geometry::{point_in_box, Box2, Point};
use crate::hit_test::{HitTarget, HitTestResult};
use crate::options::{MarketDepthOptions, TextOptions};
use crate::text_metrics::TextMeasurer;

use super::draw::{fill_paint, stroke_paint};
use super::{draw_scaled, PaneRenderer};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthSide {
    Bid,
    Ask,
}

/// One ladder row, already projected to screen space by the view.
#[derive(Clone, Debug)]
pub struct DepthLevelRow {
    pub y: f64,
    pub label: String,
    pub total_size: f64,
    pub side: DepthSide,
}

pub struct MarketDepthRendererData {
    pub text: TextOptions,
    pub options: MarketDepthOptions,
    pub anchor: Point,
    pub rows: Vec<DepthLevelRow>,
    pub highest_bid: f64,
    pub highest_ask: f64,
}

/// Drawn line length for a level: proportional share of `line_length`, scaled
/// by the pixel ratio.
pub fn scaled_line_length(total_size: f64, highest_total_size: f64, line_length: f64, pixel_ratio: f32) -> f64 {
    if highest_total_size <= 0.0 {
        return 0.0;
    }
    (total_size / highest_total_size) * line_length * pixel_ratio as f64
}

pub struct MarketDepthRenderer {
    data: Option<MarketDepthRendererData>,
    hit: HitTestResult,
    measurer: Rc<dyn TextMeasurer>,
}

impl MarketDepthRenderer {
    pub fn new(measurer: Rc<dyn TextMeasurer>) -> Self {
        Self { data: None, hit: HitTestResult::new(HitTarget::MovePoint), measurer }
    }

    pub fn set_data(&mut self, data: MarketDepthRendererData) {
        self.data = Some(data);
    }

    fn highest_for(&self, data: &MarketDepthRendererData, side: DepthSide) -> f64 {
        use crate::options::DepthCalcMethod;
        match data.options.total_calc_method {
            DepthCalcMethod::Combined => data.highest_bid.max(data.highest_ask),
            DepthCalcMethod::Independent => match side {
                DepthSide::Bid => data.highest_bid,
                DepthSide::Ask => data.highest_ask,
            },
        }
    }

    fn ladder_box(&self, data: &MarketDepthRendererData) -> Option<Box2> {
        if data.rows.is_empty() {
            return None;
        }
        let font_size = data.text.font.size.max(1.0);
        let max_label = data
            .rows
            .iter()
            .map(|row| self.measurer.text_width(&row.label, &data.text.font, font_size))
            .fold(0.0, f64::max);
        let min_y = data.rows.iter().map(|r| r.y).fold(f64::INFINITY, f64::min);
        let max_y = data.rows.iter().map(|r| r.y).fold(f64::NEG_INFINITY, f64::max);
        let left = data.anchor.x + data.options.timestamp_start_offset;
        let right = left + max_label.max(data.options.line_offset + data.options.line_length);
        Some(Box2::new(
            Point::new(left, min_y - font_size),
            Point::new(right, max_y + font_size),
        ))
    }
}

impl PaneRenderer for MarketDepthRenderer {
    fn draw(&self, canvas: &skia::Canvas, pixel_ratio: f32, _is_hovered: bool) {
        let Some(data) = &self.data else { return };
        if data.rows.is_empty() {
            return;
        }

        let font_size = data.text.font.size.max(1.0);
        let mut font = skia::Font::default();
        font.set_size(font_size as f32);
        let text_paint = fill_paint(data.text.font.color);

        let x = data.anchor.x + data.options.timestamp_start_offset;
        let line_width = data.options.line_width.max(1.0);

        draw_scaled(canvas, pixel_ratio, |canvas| {
            for row in &data.rows {
                canvas.draw_str(
                    row.label.as_str(),
                    (x as f32, (row.y + line_width) as f32),
                    &font,
                    &text_paint,
                );
            }
        });

        // Lines are drawn in device pixels so their length scales with the
        // pixel ratio exactly like the original.
        for row in &data.rows {
            let highest = self.highest_for(data, row.side);
            let length = scaled_line_length(row.total_size, highest, data.options.line_length, pixel_ratio);
            if length <= 0.0 {
                continue;
            }
            let color = match row.side {
                DepthSide::Bid => data.options.line_bid_color,
                DepthSide::Ask => data.options.line_ask_color,
            };
            let paint = stroke_paint(color, line_width * pixel_ratio as f64, data.options.line_style);
            let pr = pixel_ratio as f64;
            let start_x = x * pr + data.options.line_offset * pr;
            let y = row.y * pr;
            canvas.draw_line((start_x as f32, y as f32), ((start_x + length) as f32, y as f32), &paint);
        }
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<HitTestResult> {
        let data = self.data.as_ref()?;
        let ladder = self.ladder_box(data)?;
        point_in_box(Point::new(x, y), ladder).then_some(self.hit)
    }
}
