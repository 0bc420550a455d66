// File: crates/linetool-core/src/render/composite.rs
// Summary: Ordered renderer group; draws in insertion order, hit-tests topmost first.

use skia_safe as skia;

use crate::hit_test::HitTestResult;

use super::PaneRenderer;

pub struct CompositeRenderer {
    renderers: Vec<Box<dyn PaneRenderer>>,
    global_alpha: f32,
}

impl CompositeRenderer {
    pub fn new() -> Self {
        Self { renderers: Vec::new(), global_alpha: 1.0 }
    }

    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha.clamp(0.0, 1.0);
    }

    pub fn append(&mut self, renderer: Box<dyn PaneRenderer>) {
        self.renderers.push(renderer);
    }

    pub fn insert(&mut self, renderer: Box<dyn PaneRenderer>, index: usize) {
        self.renderers.insert(index.min(self.renderers.len()), renderer);
    }

    pub fn clear(&mut self) {
        self.renderers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}

impl Default for CompositeRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PaneRenderer for CompositeRenderer {
    fn draw(&self, canvas: &skia::Canvas, pixel_ratio: f32, is_hovered: bool) {
        let translucent = self.global_alpha < 1.0;
        for renderer in &self.renderers {
            if translucent {
                let alpha = (self.global_alpha * 255.0).round() as u8;
                canvas.save_layer_alpha(None, alpha as u32);
            } else {
                canvas.save();
            }
            renderer.draw(canvas, pixel_ratio, is_hovered);
            canvas.restore();
        }
    }

    /// Last appended draws on top, so it wins pick priority.
    fn hit_test(&self, x: f64, y: f64) -> Option<HitTestResult> {
        for renderer in self.renderers.iter().rev() {
            if let Some(result) = renderer.hit_test(x, y) {
                return Some(result);
            }
        }
        None
    }
}
