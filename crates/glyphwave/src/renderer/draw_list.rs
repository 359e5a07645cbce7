use glam::Vec2;

use super::traits::{GradientStop, Rgba, Surface2D};

/// What a recorded command draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    FillRect,
    FillCircle,
    StrokeCircle,
    /// Radial gradient header; `stop_count` `GradientStop` records follow.
    RadialGradient,
    GradientStop,
}

/// One recorded draw call.
///
/// Field meaning per kind:
/// - `FillRect`: `x, y` top-left, `p0, p1` width/height.
/// - `FillCircle`: `x, y` center, `p0` radius.
/// - `StrokeCircle`: `x, y` center, `p0` radius, `p1` line width.
/// - `RadialGradient`: `x, y` center, `p0` radius, `p1` stop count.
/// - `GradientStop`: `p0` offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub kind: DrawKind,
    pub x: f32,
    pub y: f32,
    pub p0: f32,
    pub p1: f32,
    pub color: Rgba,
}

impl DrawCommand {
    fn new(kind: DrawKind, x: f32, y: f32, p0: f32, p1: f32, color: Rgba) -> Self {
        Self {
            kind,
            x,
            y,
            p0,
            p1,
            color,
        }
    }
}

/// Recording surface: every draw call becomes a `DrawCommand`.
/// Used by headless hosts and tests to inspect a frame.
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(4096),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn command_count(&self) -> u32 {
        self.commands.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Commands of one kind, in draw order.
    pub fn of_kind(&self, kind: DrawKind) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(move |c| c.kind == kind)
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface2D for DrawList {
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        self.commands
            .push(DrawCommand::new(DrawKind::FillRect, x, y, width, height, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands
            .push(DrawCommand::new(DrawKind::FillCircle, center.x, center.y, radius, 0.0, color));
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Rgba) {
        self.commands.push(DrawCommand::new(
            DrawKind::StrokeCircle,
            center.x,
            center.y,
            radius,
            line_width,
            color,
        ));
    }

    fn fill_radial_gradient(&mut self, center: Vec2, radius: f32, stops: &[GradientStop]) {
        self.commands.push(DrawCommand::new(
            DrawKind::RadialGradient,
            center.x,
            center.y,
            radius,
            stops.len() as f32,
            Rgba::default(),
        ));
        for stop in stops {
            self.commands.push(DrawCommand::new(
                DrawKind::GradientStop,
                0.0,
                0.0,
                stop.offset,
                0.0,
                stop.color,
            ));
        }
    }
}
