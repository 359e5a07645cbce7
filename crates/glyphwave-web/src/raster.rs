use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use glyphwave::{AlphaMask, TextLayout, TextRasterizer};

/// Rasterizes text with the browser's font engine on a detached canvas.
///
/// Call sites should wait for `document.fonts.ready` before the first
/// resize, or the sampled glyphs come from a fallback face.
pub struct CanvasTextRasterizer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasTextRasterizer {
    pub fn new(document: &Document) -> Result<Self, JsValue> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("offscreen canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Glyph-by-glyph so letter spacing works on browsers without
    /// `ctx.letterSpacing`.
    fn draw(&self, layout: &TextLayout) -> Result<AlphaMask, JsValue> {
        let (w, h) = (layout.width, layout.height);
        self.canvas.set_width(w);
        self.canvas.set_height(h);

        let ctx = &self.ctx;
        ctx.clear_rect(0.0, 0.0, w as f64, h as f64);
        ctx.set_font(&layout.font);
        ctx.set_fill_style_str("white");
        ctx.set_text_align("left");
        ctx.set_text_baseline("middle");

        let glyphs: Vec<String> = layout.text.chars().map(String::from).collect();
        let mut advances = Vec::with_capacity(glyphs.len());
        for g in &glyphs {
            advances.push(ctx.measure_text(g)?.width());
        }
        let spacing = layout.letter_spacing as f64;
        let total: f64 =
            advances.iter().sum::<f64>() + spacing * glyphs.len().saturating_sub(1) as f64;

        let mut x = (w as f64 - total) / 2.0;
        let y = h as f64 / 2.0;
        for (g, advance) in glyphs.iter().zip(advances) {
            ctx.fill_text(g, x, y)?;
            x += advance + spacing;
        }

        let image = ctx.get_image_data(0.0, 0.0, w as f64, h as f64)?;
        Ok(AlphaMask::from_rgba(w, h, &image.data().0))
    }
}

impl TextRasterizer for CanvasTextRasterizer {
    fn rasterize(&mut self, layout: &TextLayout) -> AlphaMask {
        match self.draw(layout) {
            Ok(mask) => mask,
            Err(e) => {
                log::warn!("raster: drawing {:?} failed: {:?}", layout.text, e);
                AlphaMask::new(layout.width, layout.height)
            }
        }
    }
}
