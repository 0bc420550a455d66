// File: crates/linetool-core/src/tool/mod.rs
// Summary: Tool entity: chart-space points, lifecycle flags, per-kind point constraints, export/import.

pub mod channel;
pub mod kind;
pub mod position;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::geometry::Point;
use crate::options::ToolOptions;
use kind::{PointsCount, ToolKind};
use position::PositionState;

/// A point in chart space. Owned by the tool; mutated while dragging.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct ToolPoint {
    pub price: f64,
    pub timestamp: f64,
}

impl ToolPoint {
    pub const fn new(price: f64, timestamp: f64) -> Self {
        Self { price, timestamp }
    }
}

/// Chart-space <-> screen-space conversion, supplied by the pane environment.
/// `None` means the scales are empty and the operation should be skipped.
pub trait CoordinateMapper {
    fn point_to_screen(&self, point: ToolPoint) -> Option<Point>;
    fn screen_to_point(&self, point: Point) -> Option<ToolPoint>;
    /// Round a price to the scale's display precision.
    fn round_price(&self, price: f64) -> f64;
    fn min_price_move(&self) -> f64;
}

/// Persistence shape; round-trips through JSON byte-for-byte in structure.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineToolExport {
    pub id: String,
    pub tool_type: ToolKind,
    pub options: Value,
    pub points: Vec<ToolPoint>,
}

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("invalid options payload: {0}")]
    InvalidOptions(#[source] serde_json::Error),
    #[error("malformed tool export: {0}")]
    MalformedExport(#[source] serde_json::Error),
}

fn random_hash(count: usize) -> String {
    const SOURCE: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut rng = rand::thread_rng();
    (0..count).map(|_| SOURCE[rng.gen_range(0..SOURCE.len())] as char).collect()
}

/// One annotation instance. Creation accumulates points until the kind's
/// capacity is reached; afterwards the tool toggles between finished and
/// editing until it is removed from its owning layer.
#[derive(Clone, Debug)]
pub struct LineTool {
    pub(crate) id: String,
    pub(crate) kind: ToolKind,
    pub(crate) options: ToolOptions,
    pub(crate) points: Vec<ToolPoint>,
    pub(crate) last_point: Option<ToolPoint>,
    pub(crate) hovered: bool,
    pub(crate) selected: bool,
    pub(crate) editing: bool,
    pub(crate) creating: bool,
    pub(crate) finished: bool,
    pub(crate) version: u64,
    pub(crate) position: PositionState,
}

impl LineTool {
    /// A fresh tool in creation mode, defaults overlaid with `patch`.
    pub fn new(kind: ToolKind, patch: Option<&Value>) -> Result<Self, ToolError> {
        Self::with_points(kind, patch, Vec::new())
    }

    /// A tool restored with pre-existing points (e.g. from an import).
    pub fn with_points(kind: ToolKind, patch: Option<&Value>, points: Vec<ToolPoint>) -> Result<Self, ToolError> {
        let options = match patch {
            Some(value) => ToolOptions::from_value(kind, value).map_err(ToolError::InvalidOptions)?,
            None => ToolOptions::defaults_for(kind),
        };
        let finished = points.len() >= kind.finish_capacity();
        let creating = if points.is_empty() { true } else { !finished };
        let mut position = PositionState::default();
        if kind == ToolKind::LongShortPosition && points.len() == 3 {
            position.click_count = 2;
        }
        Ok(Self {
            id: random_hash(12),
            kind,
            options,
            points,
            last_point: None,
            hovered: false,
            selected: false,
            editing: false,
            creating,
            finished,
            version: 0,
            position,
        })
    }

    pub fn from_export(export: &LineToolExport) -> Result<Self, ToolError> {
        let mut tool = Self::with_points(export.tool_type, Some(&export.options), export.points.clone())?;
        tool.id = export.id.clone();
        Ok(tool)
    }

    pub fn export(&self) -> LineToolExport {
        LineToolExport {
            id: self.id.clone(),
            tool_type: self.kind,
            options: self.options.to_value(),
            points: self.points.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn options(&self) -> &ToolOptions {
        &self.options
    }

    pub fn apply_options(&mut self, patch: &Value) -> Result<(), ToolError> {
        self.options.apply(patch).map_err(ToolError::InvalidOptions)?;
        self.touch();
        Ok(())
    }

    pub fn visible(&self) -> bool {
        self.options.visible()
    }

    pub fn editable(&self) -> bool {
        self.options.editable()
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn creating(&self) -> bool {
        self.creating
    }

    pub fn editing(&self) -> bool {
        self.editing
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn hovered(&self) -> bool {
        self.hovered
    }

    /// Monotonic mutation counter; the view layer memoizes on it.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Long/short position state (click protocol, latched orientation).
    /// Meaningful only for `ToolKind::LongShortPosition`.
    pub fn position_state(&self) -> &PositionState {
        &self.position
    }

    pub fn position_state_mut(&mut self) -> &mut PositionState {
        &mut self.position
    }

    pub(crate) fn touch(&mut self) {
        self.version = self.version.wrapping_add(1);
    }

    pub fn set_hovered(&mut self, hovered: bool) -> bool {
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        if changed {
            self.touch();
        }
        changed
    }

    pub fn set_selected(&mut self, selected: bool) -> bool {
        let changed = selected != self.selected;
        self.selected = selected;
        if changed {
            self.touch();
        }
        changed
    }

    pub fn set_editing(&mut self, editing: bool) -> bool {
        let changed = editing != self.editing;
        self.editing = editing;
        if changed {
            self.touch();
        }
        changed
    }

    pub fn set_creating(&mut self, creating: bool) -> bool {
        let changed = creating != self.creating;
        self.creating = creating;
        if changed {
            self.touch();
        }
        changed
    }

    /// Stored points plus the transient preview point, bounded by the kind's
    /// capacity. The parallel channel corrects its in-flight third point so
    /// the channel stays parallel.
    pub fn points(&self, conv: &dyn CoordinateMapper) -> Vec<ToolPoint> {
        let mut points = self.points.clone();
        if let Some(last) = self.last_point {
            points.push(last);
        }
        if let PointsCount::Fixed(count) = self.kind.points_count() {
            points.truncate(count);
        }
        if self.kind == ToolKind::ParallelChannel && points.len() == 3 && !self.finished {
            points[2] = channel::correct_last_point(self, points[2], conv);
        }
        points
    }

    /// Raw stored points, no preview, no per-kind correction.
    pub fn stored_points(&self) -> &[ToolPoint] {
        &self.points
    }

    pub fn set_points(&mut self, points: Vec<ToolPoint>) {
        self.points = points;
        self.touch();
    }

    pub fn set_last_point(&mut self, point: Option<ToolPoint>) {
        self.last_point = point;
        self.touch();
    }

    /// Append a creation click. Kind-specific behavior: freehand strokes drop
    /// points closer than 2 px to the previous one, the parallel channel
    /// corrects its third point, the position tool runs its click protocol.
    pub fn add_point(&mut self, point: ToolPoint, conv: &dyn CoordinateMapper) {
        match self.kind {
            ToolKind::Brush | ToolKind::Highlighter => {
                if self.finished {
                    return;
                }
                self.last_point = None;
                if let Some(end) = self.points.last().copied() {
                    let near = match (conv.point_to_screen(end), conv.point_to_screen(point)) {
                        (Some(a), Some(b)) => b.subtract(a).length() < 2.0,
                        _ => false,
                    };
                    if near {
                        return;
                    }
                }
                self.points.push(point);
            }
            ToolKind::ParallelChannel => {
                let point = if self.points.len() == 2 {
                    channel::correct_last_point(self, point, conv)
                } else {
                    point
                };
                self.points.push(point);
            }
            ToolKind::LongShortPosition => {
                position::add_point(self, point, conv);
            }
            _ => self.points.push(point),
        }
        self.touch();
    }

    /// Write through an anchor index; virtual indices redistribute price and
    /// timestamp between the stored points per kind.
    pub fn set_point(&mut self, index: usize, point: ToolPoint, conv: &dyn CoordinateMapper) {
        match self.kind {
            ToolKind::Rectangle | ToolKind::PriceRange => self.rect_like_set_point(index, point),
            ToolKind::ParallelChannel => channel::set_point(self, index, point, conv),
            ToolKind::LongShortPosition => position::set_point(self, index, point, false, conv),
            _ => {
                if index < self.points.len() {
                    self.points[index] = point;
                }
            }
        }
        self.touch();
    }

    /// Read a stored or virtual anchor point. Plain kinds return `None` past
    /// their capacity; rectangle-like kinds expose derived corners and
    /// midpoints, the channel its projected handles.
    pub fn get_point(&self, index: usize, conv: &dyn CoordinateMapper) -> Option<ToolPoint> {
        match self.kind {
            ToolKind::Rectangle | ToolKind::PriceRange if index >= 2 => self.rect_like_anchor(index),
            ToolKind::ParallelChannel if index >= 3 => channel::get_point(self, index, conv),
            ToolKind::LongShortPosition if index >= 3 => position::get_point(self, index, conv),
            _ => self.points(conv).get(index).copied(),
        }
    }

    /// Transition to finished once enough points exist. A no-op on an already
    /// finished tool. Path tools instead finish on the closing gesture: the
    /// last two points within 10 px collapse into one.
    pub fn try_finish(&mut self, conv: &dyn CoordinateMapper) {
        if self.finished {
            return;
        }
        if self.kind == ToolKind::Path {
            if self.points.len() > 1 {
                let last = self.points[self.points.len() - 1];
                let prev = self.points[self.points.len() - 2];
                if let (Some(a), Some(b)) = (conv.point_to_screen(last), conv.point_to_screen(prev)) {
                    if a.subtract(b).length() < 10.0 {
                        self.points.pop();
                        self.finished = true;
                        self.selected = true;
                        self.last_point = None;
                        self.touch();
                    }
                }
            }
            return;
        }

        if self.points.len() >= usize::max(1, self.kind.finish_capacity_for_creation()) {
            self.finished = true;
            self.selected = true;
            self.creating = false;
            self.last_point = None;
            self.touch();
        }
    }

    /// Chart points contributing price-axis labels. Vertical lines have none.
    pub fn price_axis_points(&self, conv: &dyn CoordinateMapper) -> Vec<ToolPoint> {
        match self.kind {
            ToolKind::VerticalLine => Vec::new(),
            ToolKind::ParallelChannel => channel::axis_points(self, conv),
            _ => self.points(conv),
        }
    }

    /// Chart points contributing time-axis labels. Horizontal lines have none.
    pub fn time_axis_points(&self, conv: &dyn CoordinateMapper) -> Vec<ToolPoint> {
        match self.kind {
            ToolKind::HorizontalLine | ToolKind::HorizontalRay => Vec::new(),
            ToolKind::ParallelChannel => {
                let mut points = channel::axis_points(self, conv);
                points.truncate(2);
                points
            }
            _ => self.points(conv),
        }
    }

    fn rect_like_set_point(&mut self, index: usize, point: ToolPoint) {
        if index < 2 && index < self.points.len() {
            self.points[index] = point;
        }
        if self.points.len() < 2 {
            return;
        }
        match index {
            2 => {
                self.points[1].price = point.price;
                self.points[0].timestamp = point.timestamp;
            }
            3 => {
                self.points[0].price = point.price;
                self.points[1].timestamp = point.timestamp;
            }
            4 => self.points[0].timestamp = point.timestamp,
            5 => self.points[1].timestamp = point.timestamp,
            6 => self.points[0].price = point.price,
            7 => self.points[1].price = point.price,
            _ => {}
        }
    }

    fn rect_like_anchor(&self, index: usize) -> Option<ToolPoint> {
        if self.points.len() < 2 {
            return None;
        }
        let start = self.points[0];
        let end = self.points[1];
        let mid_price = (start.price + end.price) / 2.0;
        let mid_time = (start.timestamp + end.timestamp) / 2.0;
        match index {
            2 => Some(ToolPoint::new(end.price, start.timestamp)),
            3 => Some(ToolPoint::new(start.price, end.timestamp)),
            4 => Some(ToolPoint::new(mid_price, start.timestamp)),
            5 => Some(ToolPoint::new(mid_price, end.timestamp)),
            6 => Some(ToolPoint::new(start.price, mid_time)),
            7 => Some(ToolPoint::new(end.price, mid_time)),
            _ => None,
        }
    }
}

impl ToolKind {
    /// During creation, unbounded kinds can finish after a single point (the
    /// stroke ends when the button lifts); fixed kinds need their full arity.
    fn finish_capacity_for_creation(self) -> usize {
        match self.points_count() {
            PointsCount::Fixed(n) => n,
            PointsCount::Unbounded => 1,
        }
    }
}
