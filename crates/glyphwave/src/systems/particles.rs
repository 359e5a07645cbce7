//! Particle records and the two populations that own them.

use glam::Vec2;

use crate::core::rng::Rng;
use crate::core::viewport::Viewport;

/// Population a particle belongs to. Selects spring stiffness and wave
/// force multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Text,
    Background,
}

/// Per-particle motion state for the rising ambient field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftState {
    /// Upward pixels per frame.
    pub rise_speed: f32,
    /// Horizontal pixels per frame, accumulated against the frame counter.
    pub drift: f32,
    pub sway_phase: f32,
    pub sway_speed: f32,
    pub twinkle_phase: f32,
    pub twinkle_speed: f32,
}

/// A single rendered dot.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Current render position.
    pub pos: Vec2,
    /// Anchor the spring pulls toward (ambient mode: sway center).
    pub rest: Vec2,
    pub vel: Vec2,
    /// Radius in pixels, always > 0.
    pub size: f32,
    pub base_opacity: f32,
    pub opacity: f32,
    pub kind: ParticleKind,
    /// Only set for ambient-mode particles.
    pub drift: Option<DriftState>,
}

impl Particle {
    /// A resting particle at `pos`.
    pub fn new(kind: ParticleKind, pos: Vec2, size: f32, base_opacity: f32) -> Self {
        let base_opacity = base_opacity.clamp(0.0, 1.0);
        Self {
            pos,
            rest: pos,
            vel: Vec2::ZERO,
            size: size.max(f32::MIN_POSITIVE),
            base_opacity,
            opacity: base_opacity,
            kind,
            drift: None,
        }
    }

    pub fn with_rest(mut self, rest: Vec2) -> Self {
        self.rest = rest;
        self
    }

    pub fn with_drift(mut self, drift: DriftState) -> Self {
        self.drift = Some(drift);
        self
    }
}

/// Creation ranges. Text particles are large and bright so the glyphs
/// read clearly; background dust is small and dim.
const TEXT_SIZE: (f32, f32) = (1.0, 2.2);
const TEXT_OPACITY: (f32, f32) = (0.7, 1.0);
const BACKGROUND_SIZE: (f32, f32) = (0.5, 2.0);
const BACKGROUND_OPACITY: (f32, f32) = (0.1, 0.5);

/// Text particle anchored at a sampled glyph pixel.
pub fn text_particle(seed: Vec2, rng: &mut Rng) -> Particle {
    let size = rng.range(TEXT_SIZE.0, TEXT_SIZE.1);
    let opacity = rng.range(TEXT_OPACITY.0, TEXT_OPACITY.1);
    Particle::new(ParticleKind::Text, seed, size, opacity)
}

/// Background particle. Its anchor is a second, independent draw, so the
/// spring pulls it toward a point unrelated to where it spawned.
pub fn background_particle(viewport: Viewport, rng: &mut Rng) -> Particle {
    let pos = random_point(viewport, rng);
    let rest = random_point(viewport, rng);
    let size = rng.range(BACKGROUND_SIZE.0, BACKGROUND_SIZE.1);
    let opacity = rng.range(BACKGROUND_OPACITY.0, BACKGROUND_OPACITY.1);
    Particle::new(ParticleKind::Background, pos, size, opacity).with_rest(rest)
}

/// Ambient dust in one of three depth layers: rare close particles are
/// large, slow, and prominent; far ones are tiny, fast, and dim.
///
/// `from_bottom` places the particle up to 100 px below the bottom edge
/// (top-up spawns); otherwise anywhere on screen (initial fill).
pub fn ambient_particle(viewport: Viewport, from_bottom: bool, rng: &mut Rng) -> Particle {
    let x = rng.next_f32() * viewport.width;
    let y = if from_bottom {
        viewport.height + rng.next_f32() * 100.0
    } else {
        rng.next_f32() * viewport.height
    };

    let depth = rng.next_f32();
    let (size, rise_speed, opacity) = if depth > 0.85 {
        (rng.range(1.5, 3.5), rng.range(0.15, 0.45), rng.range(0.3, 0.7))
    } else if depth > 0.4 {
        (rng.range(0.6, 1.8), rng.range(0.25, 0.75), rng.range(0.15, 0.45))
    } else {
        (rng.range(0.2, 0.8), rng.range(0.4, 1.2), rng.range(0.05, 0.2))
    };

    let drift = DriftState {
        rise_speed,
        drift: (rng.next_f32() - 0.5) * 0.2,
        sway_phase: rng.angle(),
        sway_speed: rng.range(0.002, 0.007),
        twinkle_phase: rng.angle(),
        twinkle_speed: rng.range(0.01, 0.03),
    };

    // Motion comes from the drift state alone; `vel` stays zero.
    Particle::new(ParticleKind::Background, Vec2::new(x, y), size, opacity).with_drift(drift)
}

fn random_point(viewport: Viewport, rng: &mut Rng) -> Vec2 {
    Vec2::new(rng.next_f32() * viewport.width, rng.next_f32() * viewport.height)
}

/// Background particle count for a viewport: `floor(area / divisor)`.
pub fn background_count(viewport: Viewport, divisor: f32) -> usize {
    if viewport.is_empty() || !(divisor > 0.0) {
        return 0;
    }
    (viewport.area() / divisor).floor() as usize
}

/// Owns the text and background populations.
///
/// Populations are only ever swapped whole: builders produce fresh `Vec`s
/// and `replace` installs them, so a half-built population is never seen by
/// the force model or the compositor.
pub struct ParticleStore {
    text: Vec<Particle>,
    background: Vec<Particle>,
}

impl ParticleStore {
    pub fn new() -> Self {
        Self {
            text: Vec::new(),
            background: Vec::new(),
        }
    }

    /// Build a text population from seeds without installing it.
    pub fn build_text(seeds: &[Vec2], rng: &mut Rng) -> Vec<Particle> {
        seeds.iter().map(|&s| text_particle(s, rng)).collect()
    }

    /// Build a background population without installing it.
    pub fn build_background(viewport: Viewport, divisor: f32, rng: &mut Rng) -> Vec<Particle> {
        let count = background_count(viewport, divisor);
        (0..count).map(|_| background_particle(viewport, rng)).collect()
    }

    /// Build an ambient population without installing it.
    pub fn build_ambient(viewport: Viewport, divisor: f32, rng: &mut Rng) -> Vec<Particle> {
        let count = background_count(viewport, divisor);
        (0..count).map(|_| ambient_particle(viewport, false, rng)).collect()
    }

    /// Replace the text population: one resting particle per seed.
    pub fn initialize_text(&mut self, seeds: &[Vec2], rng: &mut Rng) {
        self.text = Self::build_text(seeds, rng);
    }

    /// Replace the background population for a viewport.
    pub fn initialize_background(&mut self, viewport: Viewport, divisor: f32, rng: &mut Rng) {
        self.background = Self::build_background(viewport, divisor, rng);
    }

    /// Replace the whole store with an ambient (background-only) population.
    pub fn initialize_ambient(&mut self, viewport: Viewport, divisor: f32, rng: &mut Rng) {
        let dust = Self::build_ambient(viewport, divisor, rng);
        self.replace(Vec::new(), dust);
    }

    /// Swap in both populations at once.
    pub fn replace(&mut self, text: Vec<Particle>, background: Vec<Particle>) {
        self.text = text;
        self.background = background;
    }

    /// Append one background particle (ambient top-up).
    pub fn push_background(&mut self, particle: Particle) {
        self.background.push(particle);
    }

    pub fn text(&self) -> &[Particle] {
        &self.text
    }

    pub fn background(&self) -> &[Particle] {
        &self.background
    }

    pub fn background_mut(&mut self) -> &mut [Particle] {
        &mut self.background
    }

    /// Every particle mutably, background first.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
        self.background.iter_mut().chain(self.text.iter_mut())
    }

    pub fn len(&self) -> usize {
        self.text.len() + self.background.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.background.is_empty()
    }
}

impl Default for ParticleStore {
    fn default() -> Self {
        Self::new()
    }
}
