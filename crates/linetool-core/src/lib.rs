// File: crates/linetool-core/src/lib.rs
// Summary: Core library entry point; exports the annotation engine's public API.

pub mod geometry;
pub mod hit_test;
pub mod layer;
pub mod magnet;
pub mod options;
pub mod render;
pub mod scale;
pub mod text_metrics;
pub mod tool;
pub mod view;

pub use geometry::{Box2, HalfPlane, Line, Point, Segment};
pub use hit_test::{CursorType, HitTarget, HitTestResult};
pub use layer::ToolLayer;
pub use magnet::{CandidateMagnet, Magnet, NoMagnet};
pub use options::{merge_values, ToolOptions};
pub use render::composite::CompositeRenderer;
pub use render::{AnchorPoint, PaneRenderer};
pub use scale::{LinearPriceScale, LinearTimeScale, PriceScale, TimeScale};
pub use text_metrics::{FixedAdvanceMeasurer, SkiaTextMeasurer, TextMeasurer};
pub use tool::kind::{PointsCount, ToolKind};
pub use tool::{CoordinateMapper, LineTool, LineToolExport, ToolError, ToolPoint};
pub use view::{AfterEditEvent, AfterEditStage, EventOutcome, PaneEnv, PaneView, PointerEvent, PointerEventKind};
