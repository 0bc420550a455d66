// File: crates/linetool-core/src/view/mod.rs
// Summary: Per-tool interaction controller: anchors cache and the pointer-event state machine.

pub mod brush;
pub(crate) mod compose;

use std::rc::Rc;

use crate::geometry::Point;
use crate::hit_test::{CursorType, HitTestResult};
use crate::magnet::Magnet;
use crate::render::composite::CompositeRenderer;
use crate::render::{AnchorPoint, PaneRenderer};
use crate::scale::{PriceScale, TimeScale};
use crate::text_metrics::TextMeasurer;
use crate::tool::kind::ToolKind;
use crate::tool::{position, CoordinateMapper, LineTool, LineToolExport, ToolPoint};

/// Everything a controller needs from the host chart for one pane: the two
/// scales, the owner series' base value and the pane size in CSS pixels.
pub struct PaneEnv<'a> {
    pub price_scale: &'a dyn PriceScale,
    pub time_scale: &'a dyn TimeScale,
    pub base_value: f64,
    pub width: f64,
    pub height: f64,
    /// Bumped by the host on pan/zoom/resize; invalidates cached anchors.
    pub viewport_version: u64,
}

impl CoordinateMapper for PaneEnv<'_> {
    fn point_to_screen(&self, point: ToolPoint) -> Option<Point> {
        if self.price_scale.is_empty() || self.time_scale.is_empty() {
            return None;
        }
        let x = self.time_scale.time_to_coordinate(point.timestamp);
        let y = self.price_scale.price_to_coordinate(point.price, self.base_value);
        Some(Point::new(x, y))
    }

    fn screen_to_point(&self, point: Point) -> Option<ToolPoint> {
        if self.price_scale.is_empty() || self.time_scale.is_empty() {
            return None;
        }
        let price = self.price_scale.coordinate_to_price(point.y, self.base_value);
        let timestamp = self.time_scale.coordinate_to_time(point.x);
        Some(ToolPoint::new(price, timestamp))
    }

    fn round_price(&self, price: f64) -> f64 {
        self.price_scale.format_price(price, self.base_value).parse().unwrap_or(price)
    }

    fn min_price_move(&self) -> f64 {
        self.price_scale.min_move()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEventKind {
    MouseDown,
    MouseMove,
    /// Move while the primary button is held.
    PressedMouseMove,
    MouseUp,
}

#[derive(Clone, Copy, Debug)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub x: f64,
    pub y: f64,
    /// Modifier key for axis-locked dragging.
    pub shift: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfterEditStage {
    LineToolFinished,
    PathFinished,
    LineToolEdited,
}

/// Edit notification surfaced to the host after a tool finishes or changes.
#[derive(Clone, Debug)]
pub struct AfterEditEvent {
    pub stage: AfterEditStage,
    pub export: LineToolExport,
}

/// What one pointer event did; `consumed` stops propagation to tools below.
#[derive(Clone, Debug, Default)]
pub struct EventOutcome {
    pub consumed: bool,
    pub changed: bool,
    pub cursor: Option<CursorType>,
    pub after_edit: Option<AfterEditEvent>,
}

/// Interaction controller for one tool. Owns the screen-space anchor cache and
/// turns raw pointer events into point edits, selection and dragging.
pub struct PaneView {
    anchors: Vec<AnchorPoint>,
    renderer: Option<CompositeRenderer>,
    cached_versions: Option<(u64, u64)>,
    last_move_point: Option<Point>,
    edited_point_index: Option<usize>,
    mouse_down_initial: Vec<AnchorPoint>,
    is_flipped: bool,
    current_point: Point,
    measurer: Rc<dyn TextMeasurer>,
}

impl PaneView {
    pub fn new(measurer: Rc<dyn TextMeasurer>) -> Self {
        Self {
            anchors: Vec::new(),
            renderer: None,
            cached_versions: None,
            last_move_point: None,
            edited_point_index: None,
            mouse_down_initial: Vec::new(),
            is_flipped: false,
            current_point: Point::new(0.0, 0.0),
            measurer,
        }
    }

    pub fn invalidate(&mut self) {
        self.cached_versions = None;
    }

    pub fn edited_point_index(&self, tool: &LineTool) -> Option<usize> {
        if tool.editing() {
            self.edited_point_index
        } else {
            None
        }
    }

    pub fn anchors_visible(tool: &LineTool) -> bool {
        tool.hovered() || tool.selected() || tool.editing() || !tool.finished()
    }

    /// Current renderer, recomputed when the tool or viewport changed.
    pub fn renderer(&mut self, tool: &LineTool, env: &PaneEnv) -> Option<&CompositeRenderer> {
        if !tool.visible() {
            self.renderer = None;
            self.cached_versions = None;
            return None;
        }
        let versions = (tool.version(), env.viewport_version);
        if self.cached_versions != Some(versions) {
            self.update_impl(tool, env);
            self.cached_versions = Some(versions);
        }
        self.renderer.as_ref()
    }

    /// Recompute screen anchors from chart points and rebuild the composite.
    /// Empty scales mean "render nothing" and are never an error.
    fn update_impl(&mut self, tool: &LineTool, env: &PaneEnv) {
        self.renderer = None;
        self.anchors.clear();

        if env.time_scale.is_empty() || env.price_scale.is_empty() {
            tracing::debug!(tool = tool.id(), "skipping update, scales are empty");
            return;
        }

        let points = tool.points(env);
        for (index, point) in points.iter().enumerate() {
            let Some(screen) = env.point_to_screen(*point) else { return };
            self.anchors.push(AnchorPoint::new(screen.x, screen.y, index));
        }

        let ctx = compose::ComposeCtx {
            env,
            measurer: &self.measurer,
            anchors_visible: Self::anchors_visible(tool),
            selected: tool.selected(),
            edited_point_index: self.edited_point_index(tool),
            current_point: self.current_point,
        };
        self.renderer = compose::build_renderer(tool, &self.anchors, &ctx);
    }

    pub fn hit_test(&self, x: f64, y: f64) -> Option<HitTestResult> {
        self.renderer.as_ref()?.hit_test(x, y)
    }

    /// Pointer-event entry point; the single place creation, hover, selection
    /// and dragging are decided.
    pub fn handle_event(
        &mut self,
        tool: &mut LineTool,
        env: &PaneEnv,
        magnet: &mut dyn Magnet,
        event: &PointerEvent,
        already_consumed: bool,
    ) -> EventOutcome {
        // Keep the renderer current so hit-testing sees this frame's geometry.
        let _ = self.renderer(tool, env);
        if self.renderer.is_none() && tool.finished() {
            return EventOutcome::default();
        }

        let origin = Point::new(event.x, event.y);
        self.current_point = origin;
        let applied = self.applied_point(tool, env, magnet, origin);

        let mut outcome = EventOutcome::default();
        let changed = match event.kind {
            PointerEventKind::MouseDown => self.on_mouse_down(tool, env, origin, applied, event, &mut outcome),
            PointerEventKind::MouseMove => {
                self.on_mouse_move(tool, env, magnet, origin, applied, event, already_consumed, &mut outcome)
            }
            PointerEventKind::PressedMouseMove => {
                self.on_pressed_mouse_move(tool, env, magnet, origin, applied, event, &mut outcome)
            }
            PointerEventKind::MouseUp => self.on_mouse_up(tool, env, magnet, &mut outcome),
        };

        outcome.changed = changed;
        outcome.consumed = tool.editing() || !tool.finished();
        outcome
    }

    /// Magnet-adjusted pointer position (price snapped to nearby OHLC values).
    fn applied_point(&self, tool: &LineTool, env: &PaneEnv, magnet: &dyn Magnet, origin: Point) -> Point {
        if !tool.kind().has_magnet() {
            return origin;
        }
        let Some(chart) = env.screen_to_point(origin) else { return origin };
        let snapped = magnet.align(chart.price, chart.timestamp);
        match env.point_to_screen(ToolPoint::new(snapped, chart.timestamp)) {
            Some(point) => point,
            None => origin,
        }
    }

    fn on_mouse_down(
        &mut self,
        tool: &mut LineTool,
        env: &PaneEnv,
        origin: Point,
        mut applied: Point,
        event: &PointerEvent,
        outcome: &mut EventOutcome,
    ) -> bool {
        // Lock anchor positions for shift-constrained drags.
        self.mouse_down_initial = self.anchors.clone();

        // A restored position tool latches its orientation on first grab so a
        // later drag can detect the flip.
        if tool.kind() == ToolKind::LongShortPosition
            && tool.stored_points().len() == 3
            && tool.position.click_count == 2
        {
            let entry = env.round_price(tool.stored_points()[0].price);
            let stop = env.round_price(tool.stored_points()[1].price);
            tool.position.is_long = Some(entry > stop);
        }

        if !tool.finished() {
            if tool.kind() == ToolKind::LongShortPosition {
                self.is_flipped = false;
                if tool.position.click_count < 2 {
                    tool.position.click_count += 1;
                    if let Some(point) = env.screen_to_point(applied) {
                        tool.add_point(point, env);
                    }
                    if tool.finished() {
                        outcome.after_edit = Some(AfterEditEvent {
                            stage: AfterEditStage::LineToolFinished,
                            export: tool.export(),
                        });
                    }
                }
            } else {
                self.apply_shift_constraint(tool, &mut applied, event.shift, false);
                if let Some(point) = env.screen_to_point(applied) {
                    tool.add_point(point, env);
                }
            }
            return false;
        }

        if tool.editable() {
            let hit = self.hit_test(origin.x, origin.y);
            return match hit {
                None => {
                    tool.set_selected(false);
                    true
                }
                Some(_) => tool.set_selected(true),
            };
        }
        false
    }

    #[allow(clippy::too_many_arguments)]
    fn on_mouse_move(
        &mut self,
        tool: &mut LineTool,
        env: &PaneEnv,
        magnet: &mut dyn Magnet,
        origin: Point,
        mut applied: Point,
        event: &PointerEvent,
        already_consumed: bool,
        outcome: &mut EventOutcome,
    ) -> bool {
        if !tool.finished() {
            if tool.kind() == ToolKind::LongShortPosition {
                if tool.position.click_count == 1 {
                    if tool.kind().has_magnet() {
                        magnet.enable();
                    }
                    self.apply_shift_constraint(tool, &mut applied, event.shift, false);
                    if let Some(point) = env.screen_to_point(applied) {
                        position::update_preview(tool, point, env);
                    }
                }
            } else {
                if tool.kind().has_magnet() {
                    magnet.enable();
                }
                self.apply_shift_constraint(tool, &mut applied, event.shift, false);
                if let Some(point) = env.screen_to_point(applied) {
                    tool.set_last_point(Some(point));
                }
            }
            return false;
        }

        let hit = self.hit_test(origin.x, origin.y);
        let changed = tool.set_hovered(hit.is_some() && !already_consumed);
        if tool.hovered() && !already_consumed {
            if tool.editable() {
                outcome.cursor = Some(hit.and_then(|h| h.cursor).unwrap_or(CursorType::Pointer));
                self.edited_point_index = hit.and_then(|h| h.point_index);
            } else {
                outcome.cursor = Some(hit.and_then(|h| h.cursor).unwrap_or(CursorType::NotAllowed));
            }
        }
        changed
    }

    #[allow(clippy::too_many_arguments)]
    fn on_pressed_mouse_move(
        &mut self,
        tool: &mut LineTool,
        env: &PaneEnv,
        magnet: &mut dyn Magnet,
        origin: Point,
        mut applied: Point,
        event: &PointerEvent,
        outcome: &mut EventOutcome,
    ) -> bool {
        if !tool.finished() {
            if tool.kind().drawn_with_pressed_button() {
                if let Some(point) = env.screen_to_point(applied) {
                    tool.add_point(point, env);
                }
            }
            return false;
        }
        if !tool.selected() {
            return false;
        }

        if !tool.editing() {
            // Drag begins: decide between anchor edit and whole-shape move.
            let hit = self.hit_test(origin.x, origin.y);
            tool.set_editing(tool.hovered() || hit.is_some());
            self.last_move_point = Some(applied);
            if let Some(index) = hit.and_then(|h| h.point_index) {
                self.edited_point_index = Some(index);
            }
            if hit.is_some() {
                magnet.enable();
            }
            return false;
        }

        outcome.cursor = Some(if self.edited_point_index.is_some() {
            CursorType::Default
        } else {
            CursorType::Grabbing
        });

        if let Some(index) = self.edited_point_index {
            self.apply_shift_constraint(tool, &mut applied, event.shift, true);

            if tool.kind() == ToolKind::LongShortPosition {
                self.drag_position_anchor(tool, env, index, applied);
            } else if let Some(point) = env.screen_to_point(applied) {
                tool.set_point(index, point, env);
            }
        } else if let Some(last) = self.last_move_point {
            // Whole-shape translation: shift every anchor, write back.
            let diff = applied.subtract(last);
            for anchor in &mut self.anchors {
                anchor.point = anchor.point.add(diff);
            }
            self.last_move_point = Some(applied);
            self.update_source_points(tool, env);
        }
        false
    }

    /// Entry/stop drags watch for orientation flips and re-derive the target;
    /// a target drag keeps its timestamp pinned to the stop's.
    fn drag_position_anchor(&mut self, tool: &mut LineTool, env: &PaneEnv, index: usize, applied: Point) {
        let Some(chart) = env.screen_to_point(applied) else { return };

        if index <= 1 {
            let rounded = env.round_price(chart.price);
            if position::check_flip(tool, index, rounded, tool.position.is_long) {
                tool.position.is_long = Some(!tool.position.is_long.unwrap_or(false));
                self.is_flipped = true;
                position::update_target(tool, true, env);
            }
            position::set_point(tool, index, chart, self.is_flipped, env);
            tool.touch();
        } else if index == 2 {
            let stop_timestamp = tool.stored_points().get(1).map(|p| p.timestamp).unwrap_or(chart.timestamp);
            position::set_point(
                tool,
                2,
                ToolPoint::new(chart.price, stop_timestamp),
                self.is_flipped,
                env,
            );
            tool.touch();
        }
    }

    fn on_mouse_up(
        &mut self,
        tool: &mut LineTool,
        env: &PaneEnv,
        magnet: &mut dyn Magnet,
        outcome: &mut EventOutcome,
    ) -> bool {
        if tool.kind() == ToolKind::LongShortPosition {
            // Flips do not carry over between drags.
            self.is_flipped = false;
        }

        if !tool.finished() {
            if tool.kind() != ToolKind::LongShortPosition {
                tool.try_finish(env);
            }
            if !tool.editing() && !tool.creating() {
                outcome.after_edit = Some(AfterEditEvent {
                    stage: AfterEditStage::LineToolFinished,
                    export: tool.export(),
                });
            } else if tool.finished() {
                outcome.after_edit = Some(AfterEditEvent {
                    stage: AfterEditStage::PathFinished,
                    export: tool.export(),
                });
            }
            false
        } else if tool.editing() {
            magnet.disable();
            self.update_source_points(tool, env);

            self.last_move_point = None;
            self.edited_point_index = None;
            tool.set_editing(false);
            tool.set_creating(false);

            outcome.after_edit = Some(AfterEditEvent {
                stage: AfterEditStage::LineToolEdited,
                export: tool.export(),
            });
            true
        } else {
            false
        }
    }

    /// Flush dragged screen anchors back into chart-space points.
    fn update_source_points(&self, tool: &mut LineTool, env: &PaneEnv) {
        let mut points = Vec::with_capacity(self.anchors.len());
        for anchor in &self.anchors {
            let Some(point) = env.screen_to_point(anchor.point) else { return };
            points.push(point);
        }
        tool.set_points(points);
    }

    /// Axis lock under the modifier key. The index-to-constraint mapping is
    /// tool-specific: trend-like lines level the dragged endpoint with its
    /// pair, fib/position/rectangle kinds pin the dragged anchor's price to
    /// its position at mouse-down.
    fn apply_shift_constraint(&self, tool: &LineTool, applied: &mut Point, shift: bool, use_edited_index: bool) {
        if !shift {
            return;
        }
        let kind = tool.kind();
        let anchors = &self.anchors;
        let initial = &self.mouse_down_initial;

        if kind.is_trend_like() && !anchors.is_empty() {
            if use_edited_index {
                match self.edited_point_index {
                    Some(1) => applied.y = anchors[0].y(),
                    Some(0) if anchors.len() > 1 => applied.y = anchors[1].y(),
                    Some(2) if anchors.len() > 2 => {
                        // The channel's fourth handle is untracked; reconstruct
                        // its height from the first boundary.
                        let diff = anchors[0].y() - anchors[1].y();
                        applied.y = anchors[2].y() - diff;
                    }
                    Some(3) if anchors.len() > 2 => applied.y = anchors[2].y(),
                    _ => {}
                }
            } else {
                applied.y = anchors[0].y();
            }
        }

        if kind == ToolKind::FibRetracement && anchors.len() == 2 && initial.len() == 2 {
            if let Some(index) = self.edited_point_index {
                if let Some(anchor) = initial.get(index) {
                    applied.y = anchor.y();
                }
            }
        }

        if kind == ToolKind::LongShortPosition && anchors.len() >= 2 && initial.len() >= 2 {
            match self.edited_point_index {
                Some(index @ (0 | 1)) => applied.y = initial[index].y(),
                _ => {}
            }
        }

        if matches!(kind, ToolKind::Rectangle | ToolKind::PriceRange) && anchors.len() == 2 && initial.len() == 2 {
            match self.edited_point_index {
                Some(0 | 3) => applied.y = initial[0].y(),
                Some(1 | 2) => applied.y = initial[1].y(),
                _ => {}
            }
        }
    }
}
