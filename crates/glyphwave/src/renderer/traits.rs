//! Drawing-surface contract for the compositor.
//!
//! The core never talks to a browser or GPU directly. Hosts implement
//! [`Surface2D`] on whatever they draw with: `glyphwave-web` wraps a
//! `CanvasRenderingContext2d`, and [`DrawList`](super::draw_list::DrawList)
//! records commands into a flat buffer for tests and buffer-reading hosts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Straight-alpha color, all channels in 0.0-1.0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    /// Same color with a different alpha (clamped to 0.0-1.0).
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }

    /// CSS `rgba(...)` string for Canvas2D style setters.
    pub fn to_css(&self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("rgba({}, {}, {}, {})", c(self.r), c(self.g), c(self.b), self.a.clamp(0.0, 1.0))
    }
}

/// One color stop of a radial gradient. `offset` runs 0.0 (center) to 1.0 (rim).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

impl GradientStop {
    pub const fn new(offset: f32, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Immediate-mode 2D drawing surface.
///
/// Every call composites source-over onto what is already there; the
/// compositor relies on that for the trail effect.
pub trait Surface2D {
    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Stroke a circle outline of the given line width.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Rgba);

    /// Fill a circle of `radius` with a radial gradient centered on `center`.
    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_string_rounds_channels() {
        let c = Rgba::new(1.0, 0.5, 0.0, 0.25);
        assert_eq!(c.to_css(), "rgba(255, 128, 0, 0.25)");
    }

    #[test]
    fn with_alpha_clamps() {
        assert_eq!(Rgba::WHITE.with_alpha(1.7).a, 1.0);
        assert_eq!(Rgba::WHITE.with_alpha(-0.2).a, 0.0);
    }

    #[test]
    fn from_rgb8_is_opaque() {
        let c = Rgba::from_rgb8(220, 230, 255);
        assert_eq!(c.a, 1.0);
        assert!((c.b - 1.0).abs() < 1e-6);
    }
}
