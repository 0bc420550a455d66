// File: crates/linetool-core/src/render/text.rs
// Summary: Text box renderer: greedy word wrap, aligned/rotated box layout, shadow/border/fill.

use std::rc::Rc;

use skia_safe as skia;

use crate::geometry::{point_in_polygon, Point};
use crate::hit_test::{HitTarget, HitTestResult};
use crate::options::{BoxHorizontalAlignment, BoxVerticalAlignment, TextAlignment, TextOptions};
use crate::text_metrics::TextMeasurer;

use super::draw::{fill_paint, round_rect, stroke_paint};
use super::{draw_scaled, PaneRenderer};

pub struct TextData {
    pub text: TextOptions,
    pub points: Vec<Point>,
}

#[derive(Clone, Debug)]
struct LinesInfo {
    lines: Vec<String>,
    lines_max_width: f64,
}

#[derive(Clone, Copy, Debug)]
struct InternalData {
    box_left: f64,
    box_top: f64,
    box_width: f64,
    box_height: f64,
    text_start: f64,
    text_top: f64,
    align: TextAlignment,
}

pub struct TextRenderer {
    data: Option<TextData>,
    hit: HitTestResult,
    measurer: Rc<dyn TextMeasurer>,
}

impl TextRenderer {
    pub fn new(measurer: Rc<dyn TextMeasurer>) -> Self {
        Self { data: None, hit: HitTestResult::new(HitTarget::MovePoint), measurer }
    }

    pub fn set_data(&mut self, data: TextData) {
        self.data = Some(data);
    }

    pub fn set_hit_test(&mut self, hit: HitTestResult) {
        self.hit = hit;
    }

    /// Measured box size in CSS pixels, before rotation.
    pub fn measure(&self) -> (f64, f64) {
        match &self.data {
            Some(data) => {
                let lines = self.lines_info(data);
                (box_width(data, lines.lines_max_width), box_height(data, lines.lines.len()))
            }
            None => (0.0, 0.0),
        }
    }

    fn lines_info(&self, data: &TextData) -> LinesInfo {
        let size = scaled_font_size(data);
        let mut lines = word_wrap(
            &data.text.value,
            data.text.word_wrap_width * font_aware_scale(data),
            self.measurer.as_ref(),
            data,
        );

        if let Some(max_height) = data.text.box_layout.max_height {
            let padding = scaled_padding(data);
            let max_lines = ((max_height + padding) / (size + padding)).floor().max(0.0) as usize;
            if lines.len() > max_lines {
                lines.truncate(max_lines);
            }
        }

        let lines_max_width = if data.text.word_wrap_width > 0.0 && !data.text.force_calculate_max_line_width {
            data.text.word_wrap_width * font_aware_scale(data)
        } else {
            lines
                .iter()
                .map(|line| self.measurer.text_width(line, &data.text.font, size))
                .fold(0.0, f64::max)
        };
        LinesInfo { lines, lines_max_width }
    }

    fn internal_data(&self, data: &TextData) -> InternalData {
        let padding_x = scaled_box_padding_x(data);
        let padding_y = scaled_box_padding_y(data);
        let inflation_x = scaled_inflation_x(data) + padding_x;
        let inflation_y = scaled_inflation_y(data) + padding_y;

        let lines = self.lines_info(data);
        let box_width = box_width(data, lines.lines_max_width);
        let box_height = box_height(data, lines.lines.len());

        let anchor = data.points[0];
        let offset = data.text.box_layout.offset.unwrap_or_default();
        let mut anchor_x = anchor.x;
        let mut anchor_y = anchor.y;

        match data.text.box_layout.alignment.vertical {
            BoxVerticalAlignment::Top => anchor_y -= box_height + offset.y,
            BoxVerticalAlignment::Middle => anchor_y -= box_height / 2.0,
            BoxVerticalAlignment::Bottom => anchor_y += offset.y,
        }
        match data.text.box_layout.alignment.horizontal {
            BoxHorizontalAlignment::Left => anchor_x += offset.x,
            BoxHorizontalAlignment::Center => anchor_x -= box_width / 2.0,
            BoxHorizontalAlignment::Right => anchor_x -= box_width + offset.x,
        }

        let text_y = anchor_y + inflation_y + scaled_font_size(data) / 2.0;
        let (align, text_x) = match data.text.alignment {
            TextAlignment::Start | TextAlignment::Left => (TextAlignment::Start, anchor_x + inflation_x),
            TextAlignment::Center => (TextAlignment::Center, anchor_x + box_width / 2.0),
            TextAlignment::Right | TextAlignment::End => (TextAlignment::End, anchor_x + box_width - inflation_x),
        };

        InternalData {
            box_left: anchor_x,
            box_top: anchor_y,
            box_width,
            box_height,
            text_start: text_x - anchor_x,
            text_top: text_y - anchor_y,
            align,
        }
    }

    fn rotation_point(&self, data: &TextData, internal: InternalData) -> Point {
        let x = match data.text.box_layout.alignment.horizontal {
            BoxHorizontalAlignment::Center => internal.box_left + internal.box_width / 2.0,
            BoxHorizontalAlignment::Left => internal.box_left,
            BoxHorizontalAlignment::Right => internal.box_left + internal.box_width,
        };
        let y = match data.text.box_layout.alignment.vertical {
            BoxVerticalAlignment::Middle => internal.box_top + internal.box_height / 2.0,
            BoxVerticalAlignment::Bottom => internal.box_top,
            BoxVerticalAlignment::Top => internal.box_top + internal.box_height,
        };
        Point::new(x, y)
    }

    fn polygon_points(&self, data: &TextData) -> Vec<Point> {
        let internal = self.internal_data(data);
        let pivot = self.rotation_point(data, internal);
        let angle = -data.text.box_layout.angle.to_radians();
        vec![
            rotate_point(Point::new(internal.box_left, internal.box_top), pivot, angle),
            rotate_point(Point::new(internal.box_left + internal.box_width, internal.box_top), pivot, angle),
            rotate_point(
                Point::new(internal.box_left + internal.box_width, internal.box_top + internal.box_height),
                pivot,
                angle,
            ),
            rotate_point(Point::new(internal.box_left, internal.box_top + internal.box_height), pivot, angle),
        ]
    }
}

impl PaneRenderer for TextRenderer {
    fn draw(&self, canvas: &skia::Canvas, pixel_ratio: f32, _is_hovered: bool) {
        let Some(data) = &self.data else { return };
        if data.points.is_empty() || data.text.value.is_empty() {
            return;
        }

        let internal = self.internal_data(data);
        let pivot = self.rotation_point(data, internal);
        let font_size = scaled_font_size(data);
        let lines = self.lines_info(data);

        draw_scaled(canvas, pixel_ratio, |canvas| {
            canvas.save();
            canvas.rotate(
                -data.text.box_layout.angle as f32,
                Some(skia::Point::new(pivot.x as f32, pivot.y as f32)),
            );

            let box_opts = &data.text.box_layout;
            let left = internal.box_left;
            let top = internal.box_top;
            let right = left + internal.box_width;
            let bottom = top + internal.box_height;

            if let Some(shadow) = &box_opts.shadow {
                let rrect = round_rect(
                    left + shadow.offset.x,
                    top + shadow.offset.y,
                    right - left,
                    bottom - top,
                    box_opts.border.as_ref().map_or(0.0, |b| b.radius),
                );
                canvas.draw_rrect(rrect, &fill_paint(shadow.color));
            }

            match &box_opts.border {
                Some(border) if border.width > 0.0 => {
                    let rrect = round_rect(
                        left - border.width / 2.0,
                        top - border.width / 2.0,
                        right - left + border.width,
                        bottom - top + border.width,
                        border.radius,
                    );
                    if let Some(background) = &box_opts.background {
                        canvas.draw_rrect(rrect, &fill_paint(background.color));
                    }
                    canvas.draw_rrect(rrect, &stroke_paint(border.color, border.width, border.style));
                }
                _ => {
                    if let Some(background) = &box_opts.background {
                        let rect = skia::Rect::new(left as f32, top as f32, right as f32, bottom as f32);
                        canvas.draw_rect(rect, &fill_paint(background.color));
                    }
                }
            }

            let mut font = skia::Font::default();
            font.set_size(font_size as f32);
            font.set_embolden(data.text.font.bold);
            let paint = fill_paint(data.text.font.color);

            let extra_space = 0.05 * font_size;
            let line_padding = scaled_padding(data);
            let x = left + internal.text_start;
            let mut y = top + internal.text_top + extra_space;

            for line in &lines.lines {
                let line_width = self.measurer.text_width(line, &data.text.font, font_size);
                let draw_x = match internal.align {
                    TextAlignment::Center => x - line_width / 2.0,
                    TextAlignment::End | TextAlignment::Right => x - line_width,
                    _ => x,
                };
                // Baseline sits below the line's vertical middle.
                let baseline = y + font_size * 0.35;
                canvas.draw_str(line.as_str(), (draw_x as f32, baseline as f32), &font, &paint);
                y += font_size + line_padding;
            }
            canvas.restore();
        });
    }

    fn hit_test(&self, x: f64, y: f64) -> Option<HitTestResult> {
        let data = self.data.as_ref()?;
        if data.points.is_empty() {
            return None;
        }
        point_in_polygon(Point::new(x, y), &self.polygon_points(data)).then_some(self.hit)
    }
}

// ---- layout helpers ---------------------------------------------------------

fn font_aware_scale(data: &TextData) -> f64 {
    let scale = data.text.box_layout.scale.clamp(0.2, 1.0);
    if scale == 1.0 {
        return scale;
    }
    let font_size = font_size(data);
    (scale * font_size).ceil() / font_size
}

fn font_size(data: &TextData) -> f64 {
    if data.text.font.size > 0.0 {
        data.text.font.size
    } else {
        30.0
    }
}

fn scaled_font_size(data: &TextData) -> f64 {
    (font_size(data) * font_aware_scale(data)).ceil()
}

fn scaled_padding(data: &TextData) -> f64 {
    data.text.padding * font_aware_scale(data)
}

fn scaled_box_padding_x(data: &TextData) -> f64 {
    match data.text.box_layout.padding {
        Some(padding) if padding.x != 0.0 => padding.x * font_aware_scale(data),
        _ => scaled_font_size(data) / 3.0,
    }
}

fn scaled_box_padding_y(data: &TextData) -> f64 {
    match data.text.box_layout.padding {
        Some(padding) => padding.y * font_aware_scale(data),
        None => scaled_font_size(data) / 3.0,
    }
}

fn scaled_inflation_x(data: &TextData) -> f64 {
    data.text.box_layout.background.as_ref().map_or(0.0, |b| b.inflation.x) * font_aware_scale(data)
}

fn scaled_inflation_y(data: &TextData) -> f64 {
    data.text.box_layout.background.as_ref().map_or(0.0, |b| b.inflation.y) * font_aware_scale(data)
}

fn box_width(data: &TextData, max_line_width: f64) -> f64 {
    max_line_width + 2.0 * scaled_inflation_x(data) + 2.0 * scaled_box_padding_x(data)
}

fn box_height(data: &TextData, lines_count: usize) -> f64 {
    let n = lines_count as f64;
    scaled_font_size(data) * n
        + scaled_padding(data) * (n - 1.0).max(0.0)
        + 2.0 * scaled_inflation_y(data)
        + 2.0 * scaled_box_padding_y(data)
}

fn rotate_point(point: Point, pivot: Point, angle: f64) -> Point {
    if angle == 0.0 {
        return point;
    }
    let (sin, cos) = angle.sin_cos();
    Point::new(
        (point.x - pivot.x) * cos - (point.y - pivot.y) * sin + pivot.x,
        (point.x - pivot.x) * sin + (point.y - pivot.y) * cos + pivot.y,
    )
}

/// Greedy width-fitting wrap. Lines split on newlines first; each long line is
/// packed word by word, and a word wider than the wrap width breaks mid-word.
fn word_wrap(text: &str, wrap_width: f64, measurer: &dyn TextMeasurer, data: &TextData) -> Vec<String> {
    let size = scaled_font_size(data);
    let lines: Vec<&str> = text.split('\n').collect();
    if !(wrap_width.is_finite() && wrap_width > 0.0) {
        return lines.into_iter().map(str::to_string).collect();
    }

    let mut wrapped = Vec::new();
    for line in lines {
        if measurer.text_width(line, &data.text.font, size) <= wrap_width {
            wrapped.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for token in split_tokens(line) {
            let candidate = format!("{current}{token}");
            if measurer.text_width(candidate.trim_end(), &data.text.font, size) <= wrap_width || current.is_empty() {
                current = candidate;
                // An over-long single token breaks by characters.
                while measurer.text_width(current.trim_end(), &data.text.font, size) > wrap_width {
                    let mut head = String::new();
                    let mut chars = current.chars();
                    for c in chars.by_ref() {
                        let next = format!("{head}{c}");
                        if !head.is_empty() && measurer.text_width(&next, &data.text.font, size) > wrap_width {
                            wrapped.push(head.clone());
                            head = c.to_string();
                        } else {
                            head = next;
                        }
                    }
                    current = head;
                    break;
                }
            } else {
                wrapped.push(current.trim_end().to_string());
                current = token.trim_start().to_string();
            }
        }
        if !current.trim_end().is_empty() {
            wrapped.push(current.trim_end().to_string());
        }
    }
    wrapped
}

/// Break a line into word tokens, keeping trailing whitespace and punctuation
/// attached so breaks land after separators.
fn split_tokens(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in line.chars() {
        current.push(c);
        if c.is_whitespace() || matches!(c, '-' | ')' | ']' | '}' | ',' | '.' | '!' | '?' | ':' | ';') {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}
