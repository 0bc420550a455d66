// File: crates/linetool-core/src/view/compose.rs
// Summary: Builds the per-kind renderer composite from tool state and screen anchors.

use std::rc::Rc;

use crate::geometry::Point;
use crate::hit_test::CursorType;
use crate::options::{
    BoxHorizontalAlignment, BoxVerticalAlignment, ExtendOptions, LineOptions, TextAlignment, TextOptions, Vec2,
};
use crate::render::anchor::{LineAnchorData, LineAnchorRenderer};
use crate::render::channel::{ParallelChannelData, ParallelChannelRenderer};
use crate::render::circle::{distance, CircleData, CircleRenderer};
use crate::render::composite::CompositeRenderer;
use crate::render::market_depth::{DepthLevelRow, DepthSide, MarketDepthRenderer, MarketDepthRendererData};
use crate::render::polygon::{PolygonData, PolygonRenderer};
use crate::render::price_range::{PriceRangeData, PriceRangeRenderer};
use crate::render::rectangle::{RectangleData, RectangleRenderer};
use crate::render::segment::{SegmentData, SegmentRenderer};
use crate::render::text::{TextData, TextRenderer};
use crate::render::triangle::{TriangleData, TriangleRenderer};
use crate::render::AnchorPoint;
use crate::scale::PriceScale;
use crate::text_metrics::TextMeasurer;
use crate::tool::kind::ToolKind;
use crate::tool::LineTool;

use super::brush;
use super::PaneEnv;

/// View state handed to the composition step.
pub(crate) struct ComposeCtx<'a> {
    pub env: &'a PaneEnv<'a>,
    pub measurer: &'a Rc<dyn TextMeasurer>,
    pub anchors_visible: bool,
    pub selected: bool,
    pub edited_point_index: Option<usize>,
    pub current_point: Point,
}

impl ComposeCtx<'_> {
    fn anchor_renderer(
        &self,
        points: Vec<AnchorPoint>,
        cursors: Option<Vec<CursorType>>,
    ) -> Box<LineAnchorRenderer> {
        let mut data = LineAnchorData::new(points, self.selected, self.anchors_visible, self.current_point);
        data.cursors = cursors;
        data.edited_point_index = self.edited_point_index;
        let mut renderer = LineAnchorRenderer::new();
        renderer.set_data(data);
        Box::new(renderer)
    }
}

/// A tool wholly left of the visible time range is culled unless extended.
fn outside_left(tool: &LineTool, ctx: &ComposeCtx, extend: ExtendOptions) -> bool {
    if extend.left || extend.right {
        return false;
    }
    let Some(range) = ctx.env.time_scale.visible_range() else { return true };
    tool.stored_points().iter().map(|p| p.timestamp).fold(f64::NEG_INFINITY, f64::max) < range.from
}

pub(crate) fn build_renderer(
    tool: &LineTool,
    anchors: &[AnchorPoint],
    ctx: &ComposeCtx,
) -> Option<CompositeRenderer> {
    match tool.kind() {
        ToolKind::TrendLine | ToolKind::Ray | ToolKind::Arrow | ToolKind::ExtendedLine | ToolKind::Callout => {
            compose_trend_line(tool, anchors, ctx)
        }
        ToolKind::HorizontalLine | ToolKind::HorizontalRay => compose_horizontal_line(tool, anchors, ctx),
        ToolKind::VerticalLine => compose_vertical_line(tool, anchors, ctx),
        ToolKind::CrossLine => compose_cross_line(tool, anchors, ctx),
        ToolKind::Rectangle => compose_rectangle(tool, anchors, ctx),
        ToolKind::Circle => compose_circle(tool, anchors, ctx),
        ToolKind::Triangle => compose_triangle(tool, anchors, ctx),
        ToolKind::PriceRange => compose_price_range(tool, anchors, ctx),
        ToolKind::ParallelChannel => compose_channel(tool, anchors, ctx),
        ToolKind::FibRetracement => compose_fib(tool, anchors, ctx),
        ToolKind::LongShortPosition => compose_position(tool, anchors, ctx),
        ToolKind::Brush | ToolKind::Highlighter => compose_brush(tool, anchors, ctx),
        ToolKind::Path => compose_path(tool, anchors, ctx),
        ToolKind::Text => compose_text(tool, anchors, ctx),
        ToolKind::MarketDepth => compose_market_depth(tool, anchors, ctx),
    }
}

/// Label angled along a segment, pivot chosen by its horizontal alignment.
fn segment_label(text: &TextOptions, point0: Point, point1: Point, angled: bool) -> (TextOptions, Point) {
    let start = if point0.x < point1.x { point0 } else { point1 };
    let end = if start == point0 { point1 } else { point0 };

    let angle = if angled {
        ((end.y - start.y) / (end.x - start.x)).atan() / std::f64::consts::PI * -180.0
    } else {
        0.0
    };
    let pivot = match text.box_layout.alignment.horizontal {
        BoxHorizontalAlignment::Left => start,
        BoxHorizontalAlignment::Right => end,
        BoxHorizontalAlignment::Center => Point::new((point0.x + point1.x) / 2.0, (point0.y + point1.y) / 2.0),
    };

    let mut label = text.clone();
    label.box_layout.angle = angle;
    (label, pivot)
}

/// Label aligned inside a shape's bounding box, with mid-box padding and a
/// max-height clamp for middle alignment.
fn box_label(text: &TextOptions, min: Point, max: Point) -> (TextOptions, Point) {
    let text_half_size = text.font.size / 3.0;
    let mut horizontal_padding = 0.0;
    let mut pivot = min;

    match text.box_layout.alignment.vertical {
        BoxVerticalAlignment::Middle => {
            pivot.y = (min.y + max.y) / 2.0;
            horizontal_padding = text_half_size;
        }
        BoxVerticalAlignment::Top => pivot.y = min.y,
        BoxVerticalAlignment::Bottom => pivot.y = max.y,
    }
    match text.box_layout.alignment.horizontal {
        BoxHorizontalAlignment::Center => pivot.x = (min.x + max.x) / 2.0,
        BoxHorizontalAlignment::Left => pivot.x = min.x,
        BoxHorizontalAlignment::Right => pivot.x = max.x,
    }

    let mut label = text.clone();
    label.box_layout.padding = Some(Vec2::new(horizontal_padding, text_half_size));
    if text.box_layout.alignment.vertical == BoxVerticalAlignment::Middle {
        label.box_layout.max_height = Some(max.y - min.y);
    }
    (label, pivot)
}

fn text_renderer(ctx: &ComposeCtx, text: TextOptions, pivot: Point) -> Box<TextRenderer> {
    let mut renderer = TextRenderer::new(Rc::clone(ctx.measurer));
    renderer.set_data(TextData { text, points: vec![pivot] });
    Box::new(renderer)
}

fn segment_renderer(ctx: &ComposeCtx, line: LineOptions, points: Vec<AnchorPoint>) -> Box<SegmentRenderer> {
    let mut renderer = SegmentRenderer::new();
    renderer.set_data(SegmentData { line, points, width: ctx.env.width, height: ctx.env.height });
    Box::new(renderer)
}

fn compose_trend_line(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_line()?;
    if outside_left(tool, ctx, options.line.extend) {
        return None;
    }
    if anchors.len() < 2 {
        return None;
    }

    let mut composite = CompositeRenderer::new();
    composite.append(segment_renderer(ctx, options.line.clone(), anchors.to_vec()));

    if !options.text.value.is_empty() {
        let (label, pivot) = if tool.kind() == ToolKind::Callout {
            // The callout box hangs off the second point, unrotated.
            (options.text.clone(), anchors[1].point)
        } else {
            segment_label(&options.text, anchors[0].point, anchors[1].point, true)
        };
        composite.append(text_renderer(ctx, label, pivot));
    }

    composite.append(ctx.anchor_renderer(anchors.to_vec(), None));
    Some(composite)
}

fn compose_horizontal_line(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_line()?;
    if anchors.is_empty() {
        return None;
    }
    let point = anchors[0].point;
    if point.y < 0.0 || point.y > ctx.env.height {
        return None;
    }
    let extend = options.line.extend;
    let start = if extend.left { AnchorPoint::new(0.0, point.y, 0) } else { AnchorPoint::new(point.x, point.y, 0) };
    let end = if extend.right {
        AnchorPoint::new(ctx.env.width, point.y, 1)
    } else {
        AnchorPoint::new(point.x, point.y, 1)
    };
    if start.x().floor() == end.x().floor() || end.x().max(start.x()) <= 0.0 || end.x() < start.x() {
        return None;
    }

    let mut handle = anchors[0];
    if extend.left && extend.right {
        handle = AnchorPoint::square(ctx.env.width / 2.0, point.y, 0);
    }

    let mut line = options.line.clone();
    line.end = Default::default();

    let mut composite = CompositeRenderer::new();
    composite.append(segment_renderer(ctx, line, vec![start, end]));
    if !options.text.value.is_empty() {
        let (label, pivot) = segment_label(&options.text, start.point, end.point, true);
        composite.append(text_renderer(ctx, label, pivot));
    }
    composite.append(ctx.anchor_renderer(vec![handle], None));
    Some(composite)
}

fn compose_vertical_line(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_line()?;
    if anchors.is_empty() {
        return None;
    }
    let stored = tool.stored_points();
    if let (Some(first), Some(range)) = (stored.first(), ctx.env.time_scale.visible_range()) {
        if first.timestamp > range.to || first.timestamp < range.from {
            return None;
        }
    }

    let point = anchors[0].point;
    let start = AnchorPoint::new(point.x, ctx.env.height, 0);
    let end = AnchorPoint::new(point.x, 0.0, 1);
    let handle = AnchorPoint::square(point.x, ctx.env.height / 2.0, 0);

    let mut line = options.line.clone();
    line.end = Default::default();
    line.extend = ExtendOptions::default();

    let mut composite = CompositeRenderer::new();
    composite.append(segment_renderer(ctx, line, vec![start, end]));
    if !options.text.value.is_empty() {
        let (label, pivot) = segment_label(&options.text, start.point, end.point, true);
        composite.append(text_renderer(ctx, label, pivot));
    }
    composite.append(ctx.anchor_renderer(vec![handle], None));
    Some(composite)
}

fn compose_cross_line(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_cross_line()?;
    if anchors.is_empty() {
        return None;
    }
    let point = anchors[0].point;
    let mut line = options.line.clone();
    line.end = Default::default();
    line.extend = ExtendOptions::default();

    let mut composite = CompositeRenderer::new();
    composite.append(segment_renderer(
        ctx,
        line.clone(),
        vec![AnchorPoint::new(point.x, ctx.env.height, 0), AnchorPoint::new(point.x, 0.0, 1)],
    ));
    composite.append(segment_renderer(
        ctx,
        line,
        vec![AnchorPoint::new(0.0, point.y, 0), AnchorPoint::new(ctx.env.width, point.y, 1)],
    ));
    composite.append(ctx.anchor_renderer(vec![anchors[0]], None));
    Some(composite)
}

/// Eight rectangle handles: stored corners, derived corners, side midpoints.
fn rect_anchor_set(top_left: Point, bottom_right: Point) -> (Vec<AnchorPoint>, Vec<CursorType>) {
    let bottom_left = AnchorPoint::new(top_left.x, bottom_right.y, 2);
    let top_right = AnchorPoint::new(bottom_right.x, top_left.y, 3);
    let middle_left = AnchorPoint::square(top_left.x, 0.5 * (top_left.y + bottom_right.y), 4);
    let middle_right = AnchorPoint::square(bottom_right.x, 0.5 * (top_left.y + bottom_right.y), 5);
    let top_center = AnchorPoint::square(0.5 * (top_left.x + bottom_right.x), top_left.y, 6);
    let bottom_center = AnchorPoint::square(0.5 * (top_left.x + bottom_right.x), bottom_right.y, 7);

    let sign = ((top_left.x - bottom_right.x) * (top_left.y - bottom_right.y)).signum();
    let diagonal = |flip: bool| {
        if (sign < 0.0) == flip {
            CursorType::DiagonalNwSeResize
        } else {
            CursorType::DiagonalNeSwResize
        }
    };
    let cursors = vec![
        diagonal(false),
        diagonal(false),
        diagonal(true),
        diagonal(true),
        CursorType::HorizontalResize,
        CursorType::HorizontalResize,
        CursorType::VerticalResize,
        CursorType::VerticalResize,
    ];
    let points = vec![
        AnchorPoint::new(top_left.x, top_left.y, 0),
        AnchorPoint::new(bottom_right.x, bottom_right.y, 1),
        bottom_left,
        top_right,
        middle_left,
        middle_right,
        top_center,
        bottom_center,
    ];
    (points, cursors)
}

fn compose_rectangle(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_shape()?;
    if outside_left(tool, ctx, options.shape.extend) {
        return None;
    }
    if anchors.len() < 2 {
        return None;
    }

    let mut composite = CompositeRenderer::new();
    let mut renderer = RectangleRenderer::new();
    renderer.set_data(RectangleData {
        shape: options.shape.clone(),
        points: anchors.to_vec(),
        hit_test_background: false,
        width: ctx.env.width,
    });
    composite.append(Box::new(renderer));

    let p0 = anchors[0].point;
    let p1 = anchors[1].point;
    if !options.text.value.is_empty() {
        let min = Point::new(p0.x.min(p1.x), p0.y.min(p1.y));
        let max = Point::new(p0.x.max(p1.x), p0.y.max(p1.y));
        let (label, pivot) = box_label(&options.text, min, max);
        composite.append(text_renderer(ctx, label, pivot));
    }

    let (points, cursors) = rect_anchor_set(p0, p1);
    composite.append(ctx.anchor_renderer(points, Some(cursors)));
    Some(composite)
}

fn compose_circle(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_shape()?;
    if outside_left(tool, ctx, options.shape.extend) {
        return None;
    }
    if anchors.len() < 2 {
        return None;
    }

    let mut composite = CompositeRenderer::new();
    let mut renderer = CircleRenderer::new();
    renderer.set_data(CircleData {
        shape: options.shape.clone(),
        points: anchors.to_vec(),
        width: ctx.env.width,
        height: ctx.env.height,
    });
    composite.append(Box::new(renderer));

    let center = anchors[0].point;
    if !options.text.value.is_empty() {
        // The label box spans the whole circle, not just the two anchors.
        let radius = distance(center, anchors[1].point);
        let min = Point::new(center.x - radius, center.y - radius);
        let max = Point::new(center.x + radius, center.y + radius);
        let (label, pivot) = box_label(&options.text, min, max);
        composite.append(text_renderer(ctx, label, pivot));
    }

    let cursors = vec![CursorType::Default, CursorType::DiagonalNwSeResize];
    composite.append(ctx.anchor_renderer(anchors[..2].to_vec(), Some(cursors)));
    Some(composite)
}

fn compose_triangle(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_triangle()?;
    if anchors.len() < 2 {
        return None;
    }
    if anchors.len() == 3 {
        let all_above = anchors.iter().all(|a| a.y() < 0.0);
        let all_below = anchors.iter().all(|a| a.y() > ctx.env.height);
        if all_above || all_below || outside_left(tool, ctx, ExtendOptions::default()) {
            return None;
        }
        if let Some(range) = ctx.env.time_scale.visible_range() {
            let min_ts = tool.stored_points().iter().map(|p| p.timestamp).fold(f64::INFINITY, f64::min);
            if min_ts > range.to {
                return None;
            }
        }
    }

    let mut composite = CompositeRenderer::new();
    let mut renderer = TriangleRenderer::new();
    renderer.set_data(TriangleData {
        shape: options.triangle.clone(),
        points: anchors.to_vec(),
        hit_test_background: false,
    });
    composite.append(Box::new(renderer));
    composite.append(ctx.anchor_renderer(anchors.to_vec(), None));
    Some(composite)
}

fn compose_price_range(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_price_range()?;
    if outside_left(tool, ctx, options.price_range.extend) {
        return None;
    }
    if anchors.len() < 2 {
        return None;
    }

    let mut composite = CompositeRenderer::new();
    let mut renderer = PriceRangeRenderer::new();
    renderer.set_data(PriceRangeData {
        options: options.price_range.clone(),
        points: anchors.to_vec(),
        hit_test_background: false,
        width: ctx.env.width,
    });
    composite.append(Box::new(renderer));

    let p0 = anchors[0].point;
    let p1 = anchors[1].point;
    if !options.text.value.is_empty() {
        let min = Point::new(p0.x.min(p1.x), p0.y.min(p1.y));
        let max = Point::new(p0.x.max(p1.x), p0.y.max(p1.y));
        let (label, pivot) = box_label(&options.text, min, max);
        composite.append(text_renderer(ctx, label, pivot));
    }

    let (points, cursors) = rect_anchor_set(p0, p1);
    composite.append(ctx.anchor_renderer(points, Some(cursors)));
    Some(composite)
}

fn compose_channel(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_channel()?;
    if anchors.len() < 2 {
        return None;
    }

    // Screen points for the renderer: first boundary, then the second derived
    // from the stored third point.
    let mut points = vec![anchors[0], anchors[1]];
    if anchors.len() >= 3 {
        let height = anchors[2].y() - anchors[0].y();
        points.push(AnchorPoint::new(anchors[2].x(), anchors[2].y(), 2));
        points.push(AnchorPoint::new(anchors[1].x(), anchors[1].y() + height, 3));
    }

    let mut composite = CompositeRenderer::new();
    let mut renderer = ParallelChannelRenderer::new();
    renderer.set_data(ParallelChannelData {
        options: options.clone(),
        points: points.clone(),
        hit_test_background: options.background.is_some(),
        width: ctx.env.width,
        height: ctx.env.height,
    });
    composite.append(Box::new(renderer));

    let mut handles: Vec<AnchorPoint> = Vec::with_capacity(6);
    for (index, anchor) in anchors.iter().take(3).enumerate() {
        handles.push(AnchorPoint::new(anchor.x(), anchor.y(), index));
    }
    if points.len() == 4 {
        handles.push(AnchorPoint::new(points[3].x(), points[3].y(), 3));
        handles.push(AnchorPoint::square(
            (points[2].x() + points[3].x()) / 2.0,
            (points[2].y() + points[3].y()) / 2.0,
            4,
        ));
        handles.push(AnchorPoint::square(
            (points[0].x() + points[1].x()) / 2.0,
            (points[0].y() + points[1].y()) / 2.0,
            5,
        ));
    }
    let cursors = vec![
        CursorType::Default,
        CursorType::Default,
        CursorType::Default,
        CursorType::Default,
        CursorType::VerticalResize,
        CursorType::VerticalResize,
    ];
    composite.append(ctx.anchor_renderer(handles, Some(cursors)));
    Some(composite)
}

fn compose_fib(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_fib()?;
    if outside_left(tool, ctx, options.extend) {
        return None;
    }
    if anchors.len() < 2 {
        return None;
    }
    let stored = tool.stored_points();
    if stored.len() < 2 {
        return None;
    }

    let min_x = anchors[0].x().min(anchors[1].x());
    let max_x = anchors[0].x().max(anchors[1].x());
    let max_price = stored[0].price.max(stored[1].price);
    let gap = max_price - stored[0].price.min(stored[1].price);

    struct LevelData {
        coordinate: f64,
        price_label: String,
        price: f64,
    }
    let levels: Vec<LevelData> = options
        .levels
        .iter()
        .map(|level| {
            let price = max_price - level.coeff * gap;
            LevelData {
                coordinate: ctx.env.price_scale.price_to_coordinate(price, ctx.env.base_value),
                price_label: ctx.env.price_scale.format_price(price, ctx.env.base_value),
                price,
            }
        })
        .collect();

    let mut composite = CompositeRenderer::new();
    for (i, level) in levels.iter().enumerate() {
        let line_points =
            vec![AnchorPoint::new(min_x, level.coordinate, 0), AnchorPoint::new(max_x, level.coordinate, 0)];

        // Optional distance annotation against another coefficient's line.
        let mut distance_text = String::new();
        let level_def = &options.levels[i];
        if level_def.distance_from_coeff_enabled {
            if let Some(other) = options.levels.iter().position(|l| l.coeff == level_def.distance_from_coeff) {
                let difference = (level.price - levels[other].price).abs();
                if difference > 0.0 {
                    distance_text =
                        format!(">>>>{difference} from {} line", options.levels[other].coeff);
                }
            }
        }

        let mut line = options.line.clone();
        line.color = level_def.color;
        line.extend = options.extend;
        composite.append(segment_renderer(ctx, line, line_points.clone()));

        let mut label = TextOptions {
            value: format!("{}({}){distance_text}", level_def.coeff, level.price_label),
            alignment: TextAlignment::Right,
            ..TextOptions::default()
        };
        label.font.color = level_def.color;
        label.font.size = 11.0;
        label.box_layout.alignment.horizontal = BoxHorizontalAlignment::Right;
        label.box_layout.alignment.vertical = BoxVerticalAlignment::Middle;
        composite.append(text_renderer(ctx, label, line_points[0].point));

        if i > 0 {
            let mut renderer = RectangleRenderer::new();
            let shape = crate::options::ShapeOptions {
                background: Some(crate::options::BackgroundOptions {
                    color: level_def.color.with_alpha(level_def.opacity as f32),
                    inflation: Vec2::default(),
                }),
                border: None,
                extend: options.extend,
            };
            renderer.set_data(RectangleData {
                shape,
                points: vec![
                    AnchorPoint::new(min_x, levels[i - 1].coordinate, 0),
                    AnchorPoint::new(max_x, level.coordinate, 0),
                ],
                hit_test_background: false,
                width: ctx.env.width,
            });
            composite.append(Box::new(renderer));
        }
    }

    composite.append(ctx.anchor_renderer(anchors.to_vec(), None));
    Some(composite)
}

fn compose_position(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_position()?;
    if anchors.is_empty() {
        return None;
    }

    let mut composite = CompositeRenderer::new();
    if anchors.len() >= 3 {
        let entry_stop = vec![anchors[0], anchors[1]];
        let entry_target = vec![anchors[0], AnchorPoint::new(anchors[2].x(), anchors[2].y(), 2)];

        let mut stop_renderer = RectangleRenderer::new();
        stop_renderer.set_data(RectangleData {
            shape: options.entry_stop_rectangle.clone(),
            points: entry_stop.clone(),
            hit_test_background: false,
            width: ctx.env.width,
        });
        let mut target_renderer = RectangleRenderer::new();
        target_renderer.set_data(RectangleData {
            shape: options.entry_target_rectangle.clone(),
            points: entry_target.clone(),
            hit_test_background: false,
            width: ctx.env.width,
        });
        composite.append(Box::new(stop_renderer));
        composite.append(Box::new(target_renderer));

        let boxes = [
            (&options.entry_stop_text, &entry_stop),
            (&options.entry_target_text, &entry_target),
        ];
        for (text, points) in boxes {
            if text.value.is_empty() {
                continue;
            }
            let p0 = points[0].point;
            let p1 = points[1].point;
            let min = Point::new(p0.x.min(p1.x), p0.y.min(p1.y));
            let max = Point::new(p0.x.max(p1.x), p0.y.max(p1.y));
            let (label, pivot) = box_label(text, min, max);
            composite.append(text_renderer(ctx, label, pivot));
        }

        let cursors = vec![
            CursorType::DiagonalNwSeResize,
            CursorType::DiagonalNeSwResize,
            CursorType::VerticalResize,
        ];
        composite.append(ctx.anchor_renderer(anchors[..3].to_vec(), Some(cursors)));
    }
    Some(composite)
}

fn compose_brush(tool: &LineTool, anchors: &[AnchorPoint], _ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_brush()?;
    if anchors.is_empty() {
        return None;
    }

    let smooth = 5.0;
    let raw: Vec<Point> = anchors.iter().map(|a| a.point).collect();
    let interpolated = brush::interpolate(&raw, smooth);
    let smoothed = brush::smooth_points(&interpolated, smooth as usize);
    let points: Vec<AnchorPoint> =
        smoothed.into_iter().enumerate().map(|(i, p)| AnchorPoint::new(p.x, p.y, i)).collect();

    let mut renderer = PolygonRenderer::new();
    renderer.set_data(PolygonData {
        line: options.line.clone(),
        background: options.background,
        points,
    });

    let mut composite = CompositeRenderer::new();
    composite.append(Box::new(renderer));
    Some(composite)
}

fn compose_path(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_path()?;
    let mut renderer = PolygonRenderer::new();
    renderer.set_data(PolygonData {
        line: options.line.clone(),
        background: None,
        points: anchors.to_vec(),
    });

    let mut composite = CompositeRenderer::new();
    composite.append(Box::new(renderer));
    composite.append(ctx.anchor_renderer(anchors.to_vec(), None));
    Some(composite)
}

fn compose_text(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_text()?;
    if anchors.is_empty() {
        return None;
    }
    let point = anchors[0].point;
    if point.y < 0.0 || point.y > ctx.env.height {
        return None;
    }
    if let Some(range) = ctx.env.time_scale.visible_range() {
        if let Some(first) = tool.stored_points().first() {
            if first.timestamp > range.to || first.timestamp < range.from {
                return None;
            }
        }
    }

    let mut text = options.text.clone();
    text.box_layout.alignment.vertical = BoxVerticalAlignment::Top;
    text.box_layout.alignment.horizontal = BoxHorizontalAlignment::Center;
    text.alignment = TextAlignment::Center;

    let mut composite = CompositeRenderer::new();
    composite.append(text_renderer(ctx, text, point));
    composite.append(ctx.anchor_renderer(vec![anchors[0]], None));
    Some(composite)
}

fn compose_market_depth(tool: &LineTool, anchors: &[AnchorPoint], ctx: &ComposeCtx) -> Option<CompositeRenderer> {
    let options = tool.options().as_market_depth()?;
    if anchors.is_empty() {
        return None;
    }

    let depth = &options.market_depth;
    let to_row = |level: &crate::options::DepthLevel, side: DepthSide| DepthLevelRow {
        y: ctx.env.price_scale.price_to_coordinate(level.price, ctx.env.base_value),
        label: format!("{}", level.total_size),
        total_size: level.total_size,
        side,
    };
    let mut rows: Vec<DepthLevelRow> = depth.data.bids.iter().map(|l| to_row(l, DepthSide::Bid)).collect();
    rows.extend(depth.data.asks.iter().map(|l| to_row(l, DepthSide::Ask)));

    let highest = |levels: &[crate::options::DepthLevel]| {
        levels.iter().map(|l| l.total_size).fold(0.0, f64::max)
    };

    let mut renderer = MarketDepthRenderer::new(Rc::clone(ctx.measurer));
    renderer.set_data(MarketDepthRendererData {
        text: options.text.clone(),
        options: depth.clone(),
        anchor: anchors[0].point,
        rows,
        highest_bid: highest(&depth.data.bids),
        highest_ask: highest(&depth.data.asks),
    });

    let mut composite = CompositeRenderer::new();
    composite.append(Box::new(renderer));
    composite.append(ctx.anchor_renderer(vec![anchors[0]], None));
    Some(composite)
}
