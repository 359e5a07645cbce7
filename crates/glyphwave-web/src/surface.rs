use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use glyphwave::{GradientStop, Rgba, Surface2D};

/// `Surface2D` over the visible canvas's 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, ctx })
    }

    /// Match the backing store to the given CSS size. Resizing a canvas
    /// clears it, which is fine: the next frame repaints everything.
    pub fn set_size(&self, width: f32, height: f32) {
        self.canvas.set_width(width.max(0.0).round() as u32);
        self.canvas.set_height(height.max(0.0).round() as u32);
    }

    pub fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn circle_path(&self, center: Vec2, radius: f32) -> bool {
        self.ctx.begin_path();
        self.ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_ok()
    }
}

impl Surface2D for CanvasSurface {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx
            .fill_rect(x as f64, y as f64, width as f64, height as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        self.ctx.set_fill_style_str(&color.to_css());
        if self.circle_path(center, radius) {
            self.ctx.fill();
        }
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(line_width as f64);
        if self.circle_path(center, radius) {
            self.ctx.stroke();
        }
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        if radius <= 0.0 {
            return;
        }
        let (x, y, r) = (center.x as f64, center.y as f64, radius as f64);
        let gradient = match self.ctx.create_radial_gradient(x, y, 0.0, x, y, r) {
            Ok(g) => g,
            Err(e) => {
                log::warn!("surface: radial gradient failed: {:?}", e);
                return;
            }
        };
        for stop in stops {
            if gradient
                .add_color_stop(stop.offset.clamp(0.0, 1.0), &stop.color.to_css())
                .is_err()
            {
                return;
            }
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        if self.circle_path(center, radius) {
            self.ctx.fill();
        }
    }
}
