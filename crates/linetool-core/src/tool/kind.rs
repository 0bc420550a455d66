// File: crates/linetool-core/src/tool/kind.rs
// Summary: Closed set of tool kinds and the per-kind policy table.

use serde::{Deserialize, Serialize};

/// Every annotation kind the engine knows how to create, edit and render.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolKind {
    TrendLine,
    Ray,
    Arrow,
    ExtendedLine,
    HorizontalLine,
    HorizontalRay,
    VerticalLine,
    CrossLine,
    ParallelChannel,
    FibRetracement,
    Rectangle,
    Circle,
    Triangle,
    PriceRange,
    LongShortPosition,
    Brush,
    Highlighter,
    Path,
    Text,
    Callout,
    MarketDepth,
}

/// How many chart-space points a kind stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointsCount {
    Fixed(usize),
    Unbounded,
}

impl ToolKind {
    pub fn points_count(self) -> PointsCount {
        use ToolKind::*;
        match self {
            HorizontalLine | HorizontalRay | VerticalLine | CrossLine | Text | MarketDepth => PointsCount::Fixed(1),
            TrendLine | Ray | Arrow | ExtendedLine | Rectangle | Circle | PriceRange | FibRetracement | Callout => {
                PointsCount::Fixed(2)
            }
            Triangle | ParallelChannel | LongShortPosition => PointsCount::Fixed(3),
            Brush | Highlighter | Path => PointsCount::Unbounded,
        }
    }

    /// Stored points required before `try_finish` may complete the tool.
    /// Unbounded kinds restore as finished once they carry at least two.
    pub fn finish_capacity(self) -> usize {
        match self.points_count() {
            PointsCount::Fixed(n) => n,
            PointsCount::Unbounded => 2,
        }
    }

    /// Freehand kinds accumulate points while the primary button is held.
    pub fn drawn_with_pressed_button(self) -> bool {
        matches!(self, ToolKind::Brush | ToolKind::Highlighter)
    }

    /// Whether the snap magnet assists while creating or dragging this kind.
    pub fn has_magnet(self) -> bool {
        !self.drawn_with_pressed_button()
    }

    /// Kinds whose endpoints level with each other under shift-constrained drag.
    pub fn is_trend_like(self) -> bool {
        matches!(
            self,
            ToolKind::TrendLine | ToolKind::Ray | ToolKind::Arrow | ToolKind::ExtendedLine | ToolKind::ParallelChannel
        )
    }
}
