// File: crates/linetool-core/src/layer.rs
// Summary: Z-ordered tool collection: event routing, drawing, hit-testing, bulk export/import.

use std::rc::Rc;

use regex::Regex;
use serde_json::Value;
use skia_safe as skia;
use tracing::{debug, warn};

use crate::hit_test::HitTestResult;
use crate::magnet::Magnet;
use crate::render::PaneRenderer;
use crate::text_metrics::TextMeasurer;
use crate::tool::kind::ToolKind;
use crate::tool::{LineTool, LineToolExport, ToolError, ToolPoint};
use crate::view::{AfterEditEvent, PaneEnv, PaneView, PointerEvent};

struct ToolSlot {
    tool: LineTool,
    view: PaneView,
}

/// All annotations of one pane in stable z-order (insertion order). Drawing
/// walks front-to-back in that order; hit-testing walks it in reverse so the
/// visually topmost tool wins ties.
pub struct ToolLayer {
    slots: Vec<ToolSlot>,
    events: Vec<AfterEditEvent>,
    measurer: Rc<dyn TextMeasurer>,
}

impl ToolLayer {
    pub fn new(measurer: Rc<dyn TextMeasurer>) -> Self {
        Self { slots: Vec::new(), events: Vec::new(), measurer }
    }

    fn push(&mut self, tool: LineTool) -> String {
        let id = tool.id().to_string();
        let view = PaneView::new(Rc::clone(&self.measurer));
        self.slots.push(ToolSlot { tool, view });
        id
    }

    /// Begin interactive creation of a tool; it receives all pointer events
    /// until finished. Any current selection/edit state is cleared first.
    pub fn start_tool(&mut self, kind: ToolKind, options: Option<&Value>) -> Result<String, ToolError> {
        for slot in &mut self.slots {
            slot.tool.set_selected(false);
            slot.tool.set_hovered(false);
            slot.tool.set_editing(false);
            slot.tool.set_creating(false);
        }
        let tool = LineTool::new(kind, options)?;
        Ok(self.push(tool))
    }

    /// Add a tool with known points (programmatic creation).
    pub fn add_tool(
        &mut self,
        kind: ToolKind,
        options: Option<&Value>,
        points: Vec<ToolPoint>,
    ) -> Result<String, ToolError> {
        let tool = LineTool::with_points(kind, options, points)?;
        Ok(self.push(tool))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn tool(&self, id: &str) -> Option<&LineTool> {
        self.slots.iter().find(|slot| slot.tool.id() == id).map(|slot| &slot.tool)
    }

    pub fn tool_mut(&mut self, id: &str) -> Option<&mut LineTool> {
        self.slots.iter_mut().find(|slot| slot.tool.id() == id).map(|slot| &mut slot.tool)
    }

    pub fn tools(&self) -> impl Iterator<Item = &LineTool> {
        self.slots.iter().map(|slot| &slot.tool)
    }

    pub fn remove_tool(&mut self, id: &str) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.tool.id() != id);
        self.slots.len() != before
    }

    /// Remove every tool whose id matches `pattern`. An invalid pattern
    /// removes nothing and returns 0.
    pub fn remove_tools_matching(&mut self, pattern: &str) -> usize {
        let regex = match Regex::new(pattern) {
            Ok(regex) => regex,
            Err(error) => {
                warn!(%pattern, %error, "invalid removal pattern");
                return 0;
            }
        };
        let before = self.slots.len();
        self.slots.retain(|slot| !regex.is_match(slot.tool.id()));
        before - self.slots.len()
    }

    pub fn apply_options(&mut self, id: &str, patch: &Value) -> Result<(), ToolError> {
        match self.tool_mut(id) {
            Some(tool) => tool.apply_options(patch),
            None => {
                debug!(%id, "apply_options: tool not found");
                Ok(())
            }
        }
    }

    /// Route a pointer event through the tools, topmost first. Returns true
    /// when some tool consumed the event.
    pub fn handle_event(&mut self, env: &PaneEnv, magnet: &mut dyn Magnet, event: &PointerEvent) -> bool {
        let mut consumed = false;
        for slot in self.slots.iter_mut().rev() {
            let outcome = slot.view.handle_event(&mut slot.tool, env, magnet, event, consumed);
            if let Some(after_edit) = outcome.after_edit {
                self.events.push(after_edit);
            }
            if outcome.consumed {
                consumed = true;
                break;
            }
        }
        consumed
    }

    /// Drain queued after-edit notifications (finished/edited tools).
    pub fn take_events(&mut self) -> Vec<AfterEditEvent> {
        std::mem::take(&mut self.events)
    }

    /// Draw every visible tool in z-order.
    pub fn draw(&mut self, canvas: &skia::Canvas, env: &PaneEnv, pixel_ratio: f32) {
        for slot in &mut self.slots {
            let hovered = slot.tool.hovered();
            if let Some(renderer) = slot.view.renderer(&slot.tool, env) {
                renderer.draw(canvas, pixel_ratio, hovered);
            }
        }
    }

    /// Pick the topmost tool at a coordinate.
    pub fn hit_test(&mut self, env: &PaneEnv, x: f64, y: f64) -> Option<(String, HitTestResult)> {
        for slot in self.slots.iter_mut().rev() {
            let _ = slot.view.renderer(&slot.tool, env);
            if let Some(result) = slot.view.hit_test(x, y) {
                return Some((slot.tool.id().to_string(), result));
            }
        }
        None
    }

    pub fn export_tool(&self, id: &str) -> Option<LineToolExport> {
        self.tool(id).map(LineTool::export)
    }

    /// Serialize every tool as a JSON array of export records.
    pub fn export_tools(&self) -> String {
        let exports: Vec<LineToolExport> = self.slots.iter().map(|slot| slot.tool.export()).collect();
        serde_json::to_string(&exports).expect("tool exports serialize to JSON")
    }

    /// Import a JSON array of export records, preserving ids. Malformed input
    /// imports nothing; individually broken records are skipped with a warning.
    pub fn import_tools(&mut self, json: &str) -> usize {
        let exports: Vec<LineToolExport> = match serde_json::from_str(json) {
            Ok(exports) => exports,
            Err(error) => {
                warn!(%error, "malformed line tool import");
                return 0;
            }
        };

        let mut imported = 0;
        for export in &exports {
            match LineTool::from_export(export) {
                Ok(tool) => {
                    self.push(tool);
                    imported += 1;
                }
                Err(error) => warn!(id = %export.id, %error, "skipping tool import"),
            }
        }
        imported
    }
}
