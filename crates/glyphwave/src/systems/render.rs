//! Compositor: paints one frame onto a `Surface2D`.
//!
//! Order is fixed: translucent trail overlay, wave rings, background
//! particles, text particles. Text is always drawn last so glyphs stay on
//! top of the dust.

use glam::Vec2;

use crate::api::config::{AmbientConfig, CompositorConfig};
use crate::core::viewport::Viewport;
use crate::renderer::traits::{GradientStop, Rgba, Surface2D};
use crate::systems::particles::{Particle, ParticleStore};
use crate::systems::pulse::Pulse;

/// Paint a black overlay at `alpha` instead of clearing, so moving
/// particles leave fading trails.
pub fn draw_trail<S: Surface2D + ?Sized>(surface: &mut S, viewport: Viewport, alpha: f32) {
    surface.fill_rect(
        0.0,
        0.0,
        viewport.width,
        viewport.height,
        Rgba::BLACK.with_alpha(alpha),
    );
}

/// Ring alpha falloff: `(1 - i/n)^1.5`.
pub fn ring_falloff(index: u32, count: u32) -> f32 {
    if count == 0 {
        return 0.0;
    }
    (1.0 - index as f32 / count as f32).max(0.0).powf(1.5)
}

/// Concentric rings trailing inward from each pulse's radius, plus a wide
/// faint stroke on the leading edge.
pub fn draw_pulse_rings<S: Surface2D + ?Sized>(
    surface: &mut S,
    pulses: &[Pulse],
    origin: Vec2,
    cfg: &CompositorConfig,
) {
    for pulse in pulses {
        for i in 0..cfg.ring_count {
            let radius = pulse.radius - i as f32 * cfg.ring_spacing;
            if radius <= 0.0 {
                continue;
            }
            let alpha = ring_falloff(i, cfg.ring_count) * pulse.opacity * cfg.ring_alpha;
            surface.stroke_circle(origin, radius, 1.0, Rgba::WHITE.with_alpha(alpha));
        }
        if pulse.radius > 0.0 {
            surface.stroke_circle(
                origin,
                pulse.radius,
                cfg.glow_width,
                Rgba::WHITE.with_alpha(pulse.opacity * cfg.glow_alpha),
            );
        }
    }
}

/// Filled white circles at each particle's current opacity.
pub fn draw_particles<'a, S, I>(surface: &mut S, particles: I)
where
    S: Surface2D + ?Sized,
    I: IntoIterator<Item = &'a Particle>,
{
    for p in particles {
        surface.fill_circle(p.pos, p.size, Rgba::WHITE.with_alpha(p.opacity));
    }
}

/// Ambient dust: smallest (farthest) first, near-invisible particles
/// skipped, larger particles wrapped in a soft radial glow.
pub fn draw_ambient_particles<S: Surface2D + ?Sized>(
    surface: &mut S,
    particles: &[Particle],
    glow_scale: f32,
) {
    let mut sorted: Vec<&Particle> = particles.iter().collect();
    sorted.sort_by(|a, b| a.size.total_cmp(&b.size));

    let halo = Rgba::from_rgb8(220, 230, 255);
    for p in sorted {
        if p.opacity <= 0.01 {
            continue;
        }
        if p.size > 1.0 {
            let stops = [
                GradientStop::new(0.0, Rgba::WHITE.with_alpha(p.opacity * 0.3)),
                GradientStop::new(0.5, halo.with_alpha(p.opacity * 0.1)),
                GradientStop::new(1.0, Rgba::WHITE.with_alpha(0.0)),
            ];
            surface.fill_radial_gradient(p.pos, p.size * glow_scale, &stops);
        }
        surface.fill_circle(p.pos, p.size, Rgba::WHITE.with_alpha(p.opacity));
    }
}

/// Full wave-mode frame.
pub fn render_wave<S: Surface2D + ?Sized>(
    surface: &mut S,
    viewport: Viewport,
    store: &ParticleStore,
    pulses: &[Pulse],
    origin: Vec2,
    cfg: &CompositorConfig,
) {
    if viewport.is_empty() {
        return;
    }
    draw_trail(surface, viewport, cfg.trail_alpha);
    draw_pulse_rings(surface, pulses, origin, cfg);
    draw_particles(surface, store.background());
    draw_particles(surface, store.text());
}

/// Full ambient-mode frame.
pub fn render_ambient<S: Surface2D + ?Sized>(
    surface: &mut S,
    viewport: Viewport,
    store: &ParticleStore,
    cfg: &CompositorConfig,
    ambient: &AmbientConfig,
) {
    if viewport.is_empty() {
        return;
    }
    draw_trail(surface, viewport, cfg.trail_alpha);
    draw_ambient_particles(surface, store.background(), ambient.glow_scale);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::draw_list::{DrawKind, DrawList};
    use crate::systems::particles::ParticleKind;

    fn vp() -> Viewport {
        Viewport::new(640.0, 480.0)
    }

    fn store() -> ParticleStore {
        let mut store = ParticleStore::new();
        // Distinct radii identify the population in the draw list.
        let text = (0..4)
            .map(|i| Particle::new(ParticleKind::Text, Vec2::new(i as f32, 0.0), 5.0, 0.9))
            .collect();
        let background = (0..6)
            .map(|i| Particle::new(ParticleKind::Background, Vec2::new(0.0, i as f32), 0.5, 0.2))
            .collect();
        store.replace(text, background);
        store
    }

    fn pulse(radius: f32, opacity: f32) -> Pulse {
        Pulse { birth_ms: 0.0, radius, opacity }
    }

    #[test]
    fn trail_comes_first_and_covers_viewport() {
        let mut list = DrawList::new();
        render_wave(&mut list, vp(), &store(), &[], Vec2::ZERO, &CompositorConfig::default());
        let first = list.commands()[0];
        assert_eq!(first.kind, DrawKind::FillRect);
        assert_eq!((first.p0, first.p1), (640.0, 480.0));
        assert_eq!(first.color.a, 0.25);
        assert_eq!(first.color.r, 0.0);
    }

    #[test]
    fn background_never_drawn_over_text() {
        let mut list = DrawList::new();
        render_wave(&mut list, vp(), &store(), &[pulse(300.0, 1.0)], Vec2::ZERO, &CompositorConfig::default());

        let radii: Vec<f32> = list.of_kind(DrawKind::FillCircle).map(|c| c.p0).collect();
        assert_eq!(radii.len(), 10);
        let first_text = radii.iter().position(|&r| r == 5.0).unwrap();
        let last_background = radii.iter().rposition(|&r| r == 0.5).unwrap();
        assert!(last_background < first_text);
    }

    #[test]
    fn rings_before_particles() {
        let mut list = DrawList::new();
        render_wave(&mut list, vp(), &store(), &[pulse(300.0, 1.0)], Vec2::ZERO, &CompositorConfig::default());
        let kinds: Vec<_> = list.commands().iter().map(|c| c.kind).collect();
        let last_stroke = kinds.iter().rposition(|k| *k == DrawKind::StrokeCircle).unwrap();
        let first_fill = kinds.iter().position(|k| *k == DrawKind::FillCircle).unwrap();
        assert!(last_stroke < first_fill);
    }

    #[test]
    fn ring_alpha_follows_power_falloff() {
        let cfg = CompositorConfig::default();
        let mut list = DrawList::new();
        draw_pulse_rings(&mut list, &[pulse(300.0, 0.5)], Vec2::ZERO, &cfg);

        let strokes: Vec<_> = list.of_kind(DrawKind::StrokeCircle).copied().collect();
        // 5 rings + 1 glow
        assert_eq!(strokes.len(), 6);
        for (i, s) in strokes.iter().take(5).enumerate() {
            assert_eq!(s.p0, 300.0 - i as f32 * 12.0);
            let expected = (1.0 - i as f32 / 5.0).powf(1.5) * 0.5 * 0.15;
            assert!((s.color.a - expected).abs() < 1e-6);
            assert_eq!(s.p1, 1.0);
        }
        let glow = strokes[5];
        assert_eq!(glow.p0, 300.0);
        assert_eq!(glow.p1, 8.0);
        assert!((glow.color.a - 0.025).abs() < 1e-6);
    }

    #[test]
    fn rings_with_non_positive_radius_skipped() {
        let mut list = DrawList::new();
        draw_pulse_rings(&mut list, &[pulse(20.0, 1.0)], Vec2::ZERO, &CompositorConfig::default());
        // radii 20, 8 survive; -4, -16, -28 dropped; plus glow.
        assert_eq!(list.of_kind(DrawKind::StrokeCircle).count(), 3);
    }

    #[test]
    fn empty_viewport_draws_nothing() {
        let mut list = DrawList::new();
        let cfg = CompositorConfig::default();
        render_wave(&mut list, Viewport::new(0.0, 0.0), &store(), &[pulse(10.0, 1.0)], Vec2::ZERO, &cfg);
        render_ambient(&mut list, Viewport::new(0.0, 480.0), &store(), &cfg, &AmbientConfig::default());
        assert!(list.is_empty());
    }

    #[test]
    fn no_pulses_no_particles_is_just_the_trail() {
        let mut list = DrawList::new();
        render_wave(&mut list, vp(), &ParticleStore::new(), &[], Vec2::ZERO, &CompositorConfig::default());
        assert_eq!(list.command_count(), 1);
    }

    #[test]
    fn ambient_sorted_by_size_with_glow_for_large() {
        let mut store = ParticleStore::new();
        store.replace(
            Vec::new(),
            vec![
                Particle::new(ParticleKind::Background, Vec2::ZERO, 3.0, 0.6),
                Particle::new(ParticleKind::Background, Vec2::ZERO, 0.4, 0.1),
                Particle::new(ParticleKind::Background, Vec2::ZERO, 1.2, 0.005),
            ],
        );
        let mut list = DrawList::new();
        render_ambient(&mut list, vp(), &store, &CompositorConfig::default(), &AmbientConfig::default());

        let radii: Vec<f32> = list.of_kind(DrawKind::FillCircle).map(|c| c.p0).collect();
        // 1.2 is too faint to draw; the rest ascend by size.
        assert_eq!(radii, vec![0.4, 3.0]);
        let glows: Vec<_> = list.of_kind(DrawKind::RadialGradient).collect();
        assert_eq!(glows.len(), 1);
        assert_eq!(glows[0].p0, 12.0);
        assert_eq!(glows[0].p1, 3.0);
    }
}
