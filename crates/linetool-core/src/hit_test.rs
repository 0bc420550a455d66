// File: crates/linetool-core/src/hit_test.rs
// Summary: Hit-test result types shared by renderers and the interaction layer.

/// What part of a shape a pointer coordinate landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    Regular,
    /// Shape body; dragging moves every point.
    MovePoint,
    /// Filled background; dragging moves every point.
    MovePointBackground,
    /// An editable anchor; dragging moves that point only.
    ChangePoint,
    Custom,
}

/// Pointer cursor the pane should show for a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorType {
    Default,
    Pointer,
    Grabbing,
    NotAllowed,
    HorizontalResize,
    VerticalResize,
    DiagonalNeSwResize,
    DiagonalNwSeResize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitTestResult {
    pub target: HitTarget,
    /// Anchor index for `ChangePoint` hits.
    pub point_index: Option<usize>,
    pub cursor: Option<CursorType>,
}

impl HitTestResult {
    pub fn new(target: HitTarget) -> Self {
        Self { target, point_index: None, cursor: None }
    }

    pub fn change_point(point_index: usize, cursor: CursorType) -> Self {
        Self { target: HitTarget::ChangePoint, point_index: Some(point_index), cursor: Some(cursor) }
    }

    /// Anchor hits edit a single point; everything else drags the whole shape.
    pub fn moves_single_point(&self) -> bool {
        self.target == HitTarget::ChangePoint
    }
}
