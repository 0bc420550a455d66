// File: crates/linetool-core/src/text_metrics.rs
// Summary: Injected text measurement capability; skia-backed in production, fixed-advance in tests.

use skia_safe as skia;

use crate::options::TextFontOptions;

/// Measures rendered text width for word wrapping and box layout. Passed into
/// the view layer explicitly so metrics are testable without a drawing surface.
pub trait TextMeasurer {
    /// Width in CSS pixels of `text` at `size` using `font`'s family/weight.
    fn text_width(&self, text: &str, font: &TextFontOptions, size: f64) -> f64;
}

/// Skia-backed measurer using the default font manager.
#[derive(Default)]
pub struct SkiaTextMeasurer;

impl TextMeasurer for SkiaTextMeasurer {
    fn text_width(&self, text: &str, _font: &TextFontOptions, size: f64) -> f64 {
        let mut skia_font = skia::Font::default();
        skia_font.set_size(size as f32);
        let (width, _bounds) = skia_font.measure_str(text, None);
        width as f64
    }
}

/// Fixed-advance measurer for tests: every glyph is `advance * size` wide.
#[derive(Clone, Copy, Debug)]
pub struct FixedAdvanceMeasurer {
    pub advance: f64,
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn text_width(&self, text: &str, _font: &TextFontOptions, size: f64) -> f64 {
        text.chars().count() as f64 * self.advance * size
    }
}
