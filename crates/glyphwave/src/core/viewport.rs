use glam::Vec2;

/// Drawing-surface dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// A zero-area viewport: nothing is sampled, simulated, or drawn.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Wavefront geometry for this viewport.
    ///
    /// The origin sits `origin_offset * width` beyond the left edge, vertically
    /// centered. Pulses are born touching the left edge and retire once they
    /// have swept past the farthest corner plus `margin`.
    pub fn emission(&self, origin_offset: f32, margin: f32) -> Emission {
        let origin = Vec2::new(-self.width * origin_offset.max(0.0), self.height / 2.0);
        let initial_radius = -origin.x;
        let far_corner = Vec2::new(self.width, 0.0);
        let max_radius = origin.distance(far_corner) + margin.max(0.0);
        Emission {
            origin,
            initial_radius,
            max_radius,
        }
    }
}

/// Viewport-derived constants shared by every pulse.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Emission {
    /// Fixed off-screen point all pulses expand from.
    pub origin: Vec2,
    /// Distance from the origin to the nearer screen edge.
    pub initial_radius: f32,
    /// Distance from the origin to the farthest on-screen corner, plus margin.
    pub max_radius: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_when_any_dimension_is_zero() {
        assert!(Viewport::new(0.0, 100.0).is_empty());
        assert!(Viewport::new(100.0, 0.0).is_empty());
        assert!(Viewport::default().is_empty());
        assert!(!Viewport::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn negative_dimensions_clamp_to_zero() {
        let vp = Viewport::new(-10.0, 50.0);
        assert_eq!(vp.width, 0.0);
        assert!(vp.is_empty());
    }

    #[test]
    fn emission_geometry_for_hd_viewport() {
        let vp = Viewport::new(1920.0, 1080.0);
        let e = vp.emission(0.5, 100.0);
        assert_eq!(e.origin, Vec2::new(-960.0, 540.0));
        assert_eq!(e.initial_radius, 960.0);
        let expected = (2880.0f32 * 2880.0 + 540.0 * 540.0).sqrt() + 100.0;
        assert!((e.max_radius - expected).abs() < 1e-3);
        assert!(e.max_radius > e.initial_radius);
    }

    #[test]
    fn max_radius_covers_every_corner() {
        let vp = Viewport::new(800.0, 600.0);
        let e = vp.emission(0.5, 0.0);
        for corner in [
            Vec2::ZERO,
            Vec2::new(800.0, 0.0),
            Vec2::new(0.0, 600.0),
            Vec2::new(800.0, 600.0),
        ] {
            assert!(e.origin.distance(corner) <= e.max_radius + 1e-3);
        }
    }
}
