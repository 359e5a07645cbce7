use serde::{Deserialize, Serialize};

use crate::systems::text::FontConfig;

/// Which physics model drives the field. The two are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMode {
    /// Text glyphs plus background dust, spring-restored and pushed by
    /// expanding wavefronts.
    #[default]
    Wave,
    /// Background dust only, rising with sinusoidal drift and twinkle.
    Ambient,
}

/// Wavefront cadence and geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// Milliseconds between pulse births (default: 1000).
    pub interval_ms: f64,
    /// Radius growth in pixels per second (default: 120).
    pub speed: f32,
    /// Emission origin distance beyond the left edge, as a fraction of
    /// viewport width (default: 0.5).
    pub origin_offset: f32,
    /// Extra radius past the farthest corner before retirement (default: 100).
    pub radius_margin: f32,
    /// Fraction of the initial-to-max span after which pulses fade (default: 0.3).
    pub fade_fraction: f32,
    /// Pulses at or below this opacity are retired (default: 0.01).
    pub retire_opacity: f32,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000.0,
            speed: 120.0,
            origin_offset: 0.5,
            radius_margin: 100.0,
            fade_fraction: 0.3,
            retire_opacity: 0.01,
        }
    }
}

/// Spring and wave force constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Half-width of the band around a pulse radius that feels force (default: 120).
    pub wave_width: f32,
    /// Spring stiffness for text particles (default: 0.08).
    pub text_spring: f32,
    /// Spring stiffness for background particles (default: 0.03).
    pub background_spring: f32,
    /// Wave force multiplier for text particles (default: 0.4).
    pub text_wave_multiplier: f32,
    /// Wave force multiplier for background particles (default: 2.5).
    pub background_wave_multiplier: f32,
    /// Radial push gain (default: 2.5).
    pub radial_gain: f32,
    /// Tangential shimmer amplitude (default: 3.0).
    pub shimmer_amplitude: f32,
    /// Shimmer phase per pixel of distance from the origin (default: 0.02).
    pub shimmer_wavenumber: f32,
    /// Shimmer phase per second (default: 3.0).
    pub shimmer_frequency: f32,
    /// Velocity kept per frame (default: 0.92).
    pub damping: f32,
    /// Fraction of the gap to base opacity closed per frame (default: 0.05).
    pub opacity_relax: f32,
    /// Opacity boost per unit wave strength (default: 0.5).
    pub brighten: f32,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            wave_width: 120.0,
            text_spring: 0.08,
            background_spring: 0.03,
            text_wave_multiplier: 0.4,
            background_wave_multiplier: 2.5,
            radial_gain: 2.5,
            shimmer_amplitude: 3.0,
            shimmer_wavenumber: 0.02,
            shimmer_frequency: 3.0,
            damping: 0.92,
            opacity_relax: 0.05,
            brighten: 0.5,
        }
    }
}

/// Rising-dust constants for `FieldMode::Ambient`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    /// Per-frame chance of adding one particle from below (default: 0.02).
    pub spawn_chance: f32,
    /// Top-up stops at this population (default: 500).
    pub max_particles: usize,
    /// Distance past an edge before respawn or wrap (default: 50).
    pub edge_margin: f32,
    /// Horizontal sway amplitude in pixels (default: 30).
    pub sway: f32,
    /// Glow radius as a multiple of particle size (default: 4).
    pub glow_scale: f32,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            spawn_chance: 0.02,
            max_particles: 500,
            edge_margin: 50.0,
            sway: 30.0,
            glow_scale: 4.0,
        }
    }
}

/// Per-frame drawing constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Alpha of the black overlay painted each frame (default: 0.25).
    pub trail_alpha: f32,
    /// Rings drawn per pulse (default: 5).
    pub ring_count: u32,
    /// Pixels between rings (default: 12).
    pub ring_spacing: f32,
    /// Alpha of the leading ring at full pulse opacity (default: 0.15).
    pub ring_alpha: f32,
    /// Line width of the leading-edge glow stroke (default: 8).
    pub glow_width: f32,
    /// Alpha of the glow stroke at full pulse opacity (default: 0.05).
    pub glow_alpha: f32,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            trail_alpha: 0.25,
            ring_count: 5,
            ring_spacing: 12.0,
            ring_alpha: 0.15,
            glow_width: 8.0,
            glow_alpha: 0.05,
        }
    }
}

/// Configuration for a particle field, provided by the embedding application.
/// Every field has a default, so JSON overrides may be partial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub mode: FieldMode,
    /// String sampled into text particles (ignored in ambient mode).
    pub text: String,
    pub font: FontConfig,
    /// Sampling grid stride in pixels (default: 3).
    pub sampling_gap: u32,
    /// Viewport area per background particle (default: 3000).
    pub background_divisor: f32,
    pub pulse: PulseConfig,
    pub forces: ForceConfig,
    pub ambient: AmbientConfig,
    pub compositor: CompositorConfig,
    /// RNG seed for particle creation.
    pub seed: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            mode: FieldMode::Wave,
            text: "JAGHI".to_string(),
            font: FontConfig::default(),
            sampling_gap: 3,
            background_divisor: 3000.0,
            pulse: PulseConfig::default(),
            forces: ForceConfig::default(),
            ambient: AmbientConfig::default(),
            compositor: CompositorConfig::default(),
            seed: 42,
        }
    }
}

impl FieldConfig {
    /// Preset for the rising-dust field.
    pub fn ambient() -> Self {
        Self {
            mode: FieldMode::Ambient,
            background_divisor: 4000.0,
            compositor: CompositorConfig {
                trail_alpha: 0.15,
                ..CompositorConfig::default()
            },
            ..Self::default()
        }
    }

    /// Parse a (possibly partial) config from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replace values that would divide by zero or stall the sampler with
    /// their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.sampling_gap == 0 {
            log::warn!("config: sampling_gap must be >= 1, using {}", defaults.sampling_gap);
            self.sampling_gap = defaults.sampling_gap;
        }
        if !(self.background_divisor > 0.0) {
            log::warn!(
                "config: background_divisor must be > 0, using {}",
                defaults.background_divisor
            );
            self.background_divisor = defaults.background_divisor;
        }
        if !(self.forces.wave_width > 0.0) {
            log::warn!("config: wave_width must be > 0, using {}", defaults.forces.wave_width);
            self.forces.wave_width = defaults.forces.wave_width;
        }
        if !(self.pulse.interval_ms > 0.0) {
            log::warn!("config: pulse interval must be > 0, using {}", defaults.pulse.interval_ms);
            self.pulse.interval_ms = defaults.pulse.interval_ms;
        }
        self.pulse.fade_fraction = self.pulse.fade_fraction.clamp(0.0, 1.0);
        self.forces.damping = self.forces.damping.clamp(0.0, 1.0);
        self.forces.opacity_relax = self.forces.opacity_relax.clamp(0.0, 1.0);
        self.compositor.trail_alpha = self.compositor.trail_alpha.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_constants() {
        let c = FieldConfig::default();
        assert_eq!(c.mode, FieldMode::Wave);
        assert_eq!(c.sampling_gap, 3);
        assert_eq!(c.background_divisor, 3000.0);
        assert_eq!(c.pulse.interval_ms, 1000.0);
        assert_eq!(c.pulse.speed, 120.0);
        assert_eq!(c.forces.wave_width, 120.0);
        assert_eq!(c.forces.text_spring, 0.08);
        assert_eq!(c.forces.background_spring, 0.03);
        assert_eq!(c.forces.damping, 0.92);
        assert_eq!(c.compositor.trail_alpha, 0.25);
        assert_eq!(c.compositor.ring_count, 5);
        assert_eq!(c.compositor.ring_spacing, 12.0);
    }

    #[test]
    fn ambient_preset() {
        let c = FieldConfig::ambient();
        assert_eq!(c.mode, FieldMode::Ambient);
        assert_eq!(c.background_divisor, 4000.0);
        assert_eq!(c.compositor.trail_alpha, 0.15);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{
            "text": "HELLO",
            "pulse": { "interval_ms": 500 },
            "forces": { "damping": 0.9 }
        }"#;
        let c = FieldConfig::from_json(json).unwrap();
        assert_eq!(c.text, "HELLO");
        assert_eq!(c.pulse.interval_ms, 500.0);
        assert_eq!(c.pulse.speed, 120.0);
        assert_eq!(c.forces.damping, 0.9);
        assert_eq!(c.forces.wave_width, 120.0);
        assert_eq!(c.sampling_gap, 3);
    }

    #[test]
    fn mode_parses_snake_case() {
        let c = FieldConfig::from_json(r#"{ "mode": "ambient" }"#).unwrap();
        assert_eq!(c.mode, FieldMode::Ambient);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(FieldConfig::from_json("{ not json").is_err());
        assert!(FieldConfig::from_json(r#"{ "sampling_gap": "three" }"#).is_err());
    }

    #[test]
    fn sanitized_replaces_degenerate_values() {
        let mut c = FieldConfig::default();
        c.sampling_gap = 0;
        c.background_divisor = 0.0;
        c.forces.wave_width = -1.0;
        c.pulse.interval_ms = f64::NAN;
        c.compositor.trail_alpha = 3.0;
        let c = c.sanitized();
        assert_eq!(c.sampling_gap, 3);
        assert_eq!(c.background_divisor, 3000.0);
        assert_eq!(c.forces.wave_width, 120.0);
        assert_eq!(c.pulse.interval_ms, 1000.0);
        assert_eq!(c.compositor.trail_alpha, 1.0);
    }
}
