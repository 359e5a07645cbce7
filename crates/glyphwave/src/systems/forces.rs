//! Per-frame particle integration.
//!
//! Wave mode: spring toward the rest position, plus a push from every
//! wavefront whose band the particle sits in, then damping and a relaxation
//! of opacity back to baseline.
//!
//! Ambient mode: rise, sway, twinkle, and recycle at the edges. No springs.

use glam::Vec2;

use crate::api::config::{AmbientConfig, ForceConfig};
use crate::core::rng::Rng;
use crate::core::viewport::Viewport;
use crate::systems::particles::{ambient_particle, Particle, ParticleKind, ParticleStore};
use crate::systems::pulse::Pulse;

/// Read-only view of the wavefronts for one frame.
#[derive(Debug, Clone, Copy)]
pub struct WaveField<'a> {
    pub pulses: &'a [Pulse],
    pub origin: Vec2,
    /// Global time in seconds, phase of the tangential shimmer.
    pub time_s: f32,
}

/// Contribution of one pulse to one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveImpulse {
    pub delta_v: Vec2,
    /// Band proximity scaled by pulse opacity, 0.0-1.0.
    pub strength: f32,
}

pub fn spring_constant(kind: ParticleKind, forces: &ForceConfig) -> f32 {
    match kind {
        ParticleKind::Text => forces.text_spring,
        ParticleKind::Background => forces.background_spring,
    }
}

pub fn wave_multiplier(kind: ParticleKind, forces: &ForceConfig) -> f32 {
    match kind {
        ParticleKind::Text => forces.text_wave_multiplier,
        ParticleKind::Background => forces.background_wave_multiplier,
    }
}

/// Velocity change from a single pulse, or `None` when the particle is
/// outside the band. The band edge itself (`|d - radius| == wave_width`)
/// is outside.
pub fn wave_impulse(
    p: &Particle,
    pulse: &Pulse,
    origin: Vec2,
    time_s: f32,
    forces: &ForceConfig,
) -> Option<WaveImpulse> {
    let offset = p.pos - origin;
    let distance = offset.length();
    let band = (distance - pulse.radius).abs();
    if !(band < forces.wave_width) {
        return None;
    }

    let strength = (1.0 - band / forces.wave_width) * pulse.opacity;
    let angle = offset.y.atan2(offset.x);
    let multiplier = wave_multiplier(p.kind, forces);

    // Shimmer ignores band proximity: full amplitude anywhere inside the band.
    let shimmer = (distance * forces.shimmer_wavenumber + time_s * forces.shimmer_frequency).sin()
        * forces.shimmer_amplitude
        * multiplier;
    let push = strength * forces.radial_gain * multiplier;

    let radial = Vec2::from_angle(angle);
    let tangential = radial.perp();
    Some(WaveImpulse {
        delta_v: radial * push + tangential * shimmer,
        strength,
    })
}

/// Advance one particle by one frame under spring and wave forces.
pub fn update_particle(p: &mut Particle, field: &WaveField, forces: &ForceConfig) {
    p.vel += (p.rest - p.pos) * spring_constant(p.kind, forces);

    for pulse in field.pulses {
        let Some(impulse) = wave_impulse(p, pulse, field.origin, field.time_s, forces) else {
            continue;
        };
        p.vel += impulse.delta_v;
        let lit = (p.base_opacity + impulse.strength * forces.brighten).min(1.0);
        if p.opacity < lit {
            p.opacity = lit;
        }
    }

    p.vel *= forces.damping;
    p.pos += p.vel;
    p.opacity += (p.base_opacity - p.opacity) * forces.opacity_relax;
    p.opacity = p.opacity.clamp(0.0, 1.0);
}

/// Advance the whole store one frame in wave mode.
pub fn update_wave_field(store: &mut ParticleStore, field: &WaveField, forces: &ForceConfig) {
    for p in store.iter_mut() {
        update_particle(p, field, forces);
    }
}

/// Advance one ambient particle: rise, sway around its anchor, twinkle,
/// and recycle it when it leaves the viewport.
///
/// `frame` drives the slow linear drift, so it must be the global frame
/// counter rather than a per-particle age.
pub fn update_ambient(
    p: &mut Particle,
    viewport: Viewport,
    frame: u64,
    ambient: &AmbientConfig,
    rng: &mut Rng,
) {
    let Some(d) = p.drift.as_mut() else {
        return;
    };

    p.pos.y -= d.rise_speed;

    d.sway_phase += d.sway_speed;
    let drifted = d.drift * frame as f32;
    p.pos.x = p.rest.x + d.sway_phase.sin() * ambient.sway + drifted;

    d.twinkle_phase += d.twinkle_speed;
    let twinkle = d.twinkle_phase.sin() * 0.3 + 0.7;
    p.opacity = (p.base_opacity * twinkle).clamp(0.0, 1.0);

    let margin = ambient.edge_margin;
    if p.pos.y < -margin {
        p.pos.y = viewport.height + margin;
        p.pos.x = rng.next_f32() * viewport.width;
        d.sway_phase = rng.angle();
        // Re-anchor so the next frame continues from the new spot.
        p.rest.x = p.pos.x - drifted - d.sway_phase.sin() * ambient.sway;
    }

    let wrapped_x = if p.pos.x < -margin {
        Some(viewport.width + margin)
    } else if p.pos.x > viewport.width + margin {
        Some(-margin)
    } else {
        None
    };
    if let Some(x) = wrapped_x {
        p.rest.x += x - p.pos.x;
        p.pos.x = x;
    }
}

/// Advance every ambient particle one frame.
pub fn update_ambient_field(
    store: &mut ParticleStore,
    viewport: Viewport,
    frame: u64,
    ambient: &AmbientConfig,
    rng: &mut Rng,
) {
    for p in store.background_mut() {
        update_ambient(p, viewport, frame, ambient, rng);
    }
}

/// Occasionally add one particle below the bottom edge to keep the field
/// dense. Returns true if a particle was added.
pub fn top_up(
    store: &mut ParticleStore,
    viewport: Viewport,
    ambient: &AmbientConfig,
    rng: &mut Rng,
) -> bool {
    let roll = rng.chance(ambient.spawn_chance);
    if roll && store.background().len() < ambient.max_particles {
        store.push_background(ambient_particle(viewport, true, rng));
        return true;
    }
    false
}
