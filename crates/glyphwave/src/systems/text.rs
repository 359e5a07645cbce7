//! Text sampling: rasterize a string and pick particle seeds on its glyphs.
//!
//! Rasterization is delegated to a [`TextRasterizer`] so the core stays
//! host-agnostic. Browsers draw with a real font on an offscreen canvas
//! (`glyphwave-web`); headless hosts and tests use [`OutlineFont`], which
//! fills TrueType outlines with `ab_glyph` (bundled DejaVu Sans Bold by
//! default).
//!
//! Font readiness is the caller's problem: a browser rasterizer invoked
//! before the web font loads silently falls back to a generic face.

use ab_glyph::{point, Font, FontRef, InvalidFont, PxScale, ScaleFont};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::core::viewport::Viewport;

/// Font and sizing policy for the sampled text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// CSS font family list.
    pub family: String,
    /// CSS font weight (e.g. 300, 700).
    pub weight: u16,
    /// Font size as a fraction of viewport width.
    pub scale: f32,
    /// Font size cap in pixels.
    pub max_size: f32,
    /// Extra space between glyphs as a fraction of font size.
    pub letter_spacing: f32,
    /// Alpha a sampled pixel must exceed to become a seed (0-255).
    pub alpha_threshold: u8,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            family: "'Helvetica Neue', Arial, sans-serif".to_string(),
            weight: 700,
            scale: 0.15,
            max_size: 200.0,
            letter_spacing: 0.1,
            alpha_threshold: 128,
        }
    }
}

impl FontConfig {
    /// Font size for a viewport: proportional to width, capped.
    /// Rounded to 1/100 px so the CSS shorthand stays short.
    pub fn size_for(&self, viewport: Viewport) -> f32 {
        let size = (viewport.width * self.scale).min(self.max_size).max(0.0);
        (size * 100.0).round() / 100.0
    }
}

/// Everything a rasterizer needs to draw the string for one viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub text: String,
    /// Raster width in pixels (matches the viewport).
    pub width: u32,
    /// Raster height in pixels (matches the viewport).
    pub height: u32,
    pub font_size: f32,
    /// Extra pixels between consecutive glyphs.
    pub letter_spacing: f32,
    /// CSS font shorthand, e.g. `700 200px sans-serif`.
    pub font: String,
}

impl TextLayout {
    pub fn for_viewport(text: &str, viewport: Viewport, font: &FontConfig) -> Self {
        let font_size = font.size_for(viewport);
        Self {
            text: text.to_string(),
            width: viewport.width.round() as u32,
            height: viewport.height.round() as u32,
            font_size,
            letter_spacing: font_size * font.letter_spacing,
            font: format!("{} {}px {}", font.weight, font_size, font.family),
        }
    }

    /// Raster center; text is centered on it both ways.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// Alpha channel of a rasterized text image, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaMask {
    pub width: u32,
    pub height: u32,
    pub alpha: Vec<u8>,
}

impl AlphaMask {
    /// Fully transparent mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            alpha: vec![0; width as usize * height as usize],
        }
    }

    /// Build from RGBA8 pixels (e.g. canvas `ImageData`), keeping only alpha.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> Self {
        let alpha = rgba.chunks_exact(4).map(|px| px[3]).collect();
        Self { width, height, alpha }
    }

    /// Alpha at (x, y); 0 outside the mask.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.alpha
            .get(y as usize * self.width as usize + x as usize)
            .copied()
            .unwrap_or(0)
    }

    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        if x < self.width && y < self.height {
            let idx = y as usize * self.width as usize + x as usize;
            self.alpha[idx] = value;
        }
    }
}

/// Renders a laid-out string to an alpha mask of the layout's dimensions,
/// centered horizontally and vertically.
pub trait TextRasterizer {
    fn rasterize(&mut self, layout: &TextLayout) -> AlphaMask;
}

/// Walk the mask on a `gap`-pixel grid; every sampled pixel whose alpha
/// exceeds `threshold` becomes one seed at that pixel coordinate.
pub fn sample_seeds(mask: &AlphaMask, gap: u32, threshold: u8) -> Vec<Vec2> {
    let step = gap.max(1) as usize;
    let mut seeds = Vec::new();
    for y in (0..mask.height).step_by(step) {
        for x in (0..mask.width).step_by(step) {
            if mask.get(x, y) > threshold {
                seeds.push(Vec2::new(x as f32, y as f32));
            }
        }
    }
    seeds
}

/// Lay out, rasterize, and sample `text` for a viewport.
/// A zero-area viewport yields no seeds and never reaches the rasterizer.
pub fn sample_text(
    rasterizer: &mut dyn TextRasterizer,
    text: &str,
    viewport: Viewport,
    font: &FontConfig,
    gap: u32,
) -> Vec<Vec2> {
    if viewport.is_empty() || text.is_empty() {
        return Vec::new();
    }
    let layout = TextLayout::for_viewport(text, viewport, font);
    let mask = rasterizer.rasterize(&layout);
    let seeds = sample_seeds(&mask, gap, font.alpha_threshold);
    log::debug!(
        "text sampler: {:?} at {}px -> {} seeds ({}x{}, gap {})",
        text,
        layout.font_size,
        seeds.len(),
        layout.width,
        layout.height,
        gap
    );
    seeds
}

// ---------------------------------------------------------------------------
// Outline rasterizer
// ---------------------------------------------------------------------------

/// DejaVu Sans Bold, matching the default 700 weight.
static EMBEDDED_FACE: &[u8] = include_bytes!("../../assets/DejaVuSans-Bold.ttf");

/// Headless rasterizer filling TrueType outlines with anti-aliased coverage.
///
/// Glyphs are placed one by one with kerning plus the layout's letter
/// spacing, centered on the raster like the canvas path (`middle` baseline).
#[derive(Clone)]
pub struct OutlineFont {
    font: FontRef<'static>,
}

impl OutlineFont {
    /// The bundled face.
    pub fn embedded() -> Result<Self, InvalidFont> {
        Self::from_bytes(EMBEDDED_FACE)
    }

    /// Any TrueType/OpenType face held for the program's lifetime.
    pub fn from_bytes(bytes: &'static [u8]) -> Result<Self, InvalidFont> {
        Ok(Self {
            font: FontRef::try_from_slice(bytes)?,
        })
    }

    /// `ab_glyph` scales by ascent-to-descent height; CSS sizes are em sizes.
    fn px_scale(&self, font_size: f32) -> PxScale {
        let height = self.font.height_unscaled();
        let per_em = self.font.units_per_em().unwrap_or(height);
        PxScale::from(font_size * height / per_em)
    }
}

impl TextRasterizer for OutlineFont {
    fn rasterize(&mut self, layout: &TextLayout) -> AlphaMask {
        let mut mask = AlphaMask::new(layout.width, layout.height);
        if layout.font_size <= 0.0 {
            return mask;
        }
        let scale = self.px_scale(layout.font_size);
        let scaled = self.font.as_scaled(scale);

        let mut caret = 0.0;
        let mut placed = Vec::with_capacity(layout.text.len());
        let mut prev = None;
        for c in layout.text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id) + layout.letter_spacing;
            }
            placed.push((id, caret));
            caret += scaled.h_advance(id);
            prev = Some(id);
        }

        let center = layout.center();
        let left = center.x - caret / 2.0;
        let baseline = center.y + (scaled.ascent() + scaled.descent()) / 2.0;

        for (id, x) in placed {
            let glyph = id.with_scale_and_position(scale, point(left + x, baseline));
            let Some(outlined) = self.font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            let (ox, oy) = (bounds.min.x as i64, bounds.min.y as i64);
            outlined.draw(|gx, gy, coverage| {
                let (x, y) = (ox + gx as i64, oy + gy as i64);
                if x < 0 || y < 0 {
                    return;
                }
                let (x, y) = (x as u32, y as u32);
                let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
                // Overlapping glyphs keep the stronger coverage.
                if alpha > mask.get(x, y) {
                    mask.set(x, y, alpha);
                }
            });
        }
        mask
    }
}
