//! Expanding circular wavefronts: spawn on a fixed cadence, grow, fade, retire.

use crate::api::config::PulseConfig;
use crate::core::viewport::Emission;

/// One expanding wavefront.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    /// Host timestamp (ms) at which the pulse was born.
    pub birth_ms: f64,
    /// Current distance of the wavefront from the emission origin.
    pub radius: f32,
    /// 1.0 at birth, fading to 0.0 over the last stretch before max radius.
    pub opacity: f32,
}

/// Owns all active pulses, oldest first.
pub struct PulseManager {
    pulses: Vec<Pulse>,
    last_pulse_ms: f64,
    emission: Emission,
    config: PulseConfig,
}

impl PulseManager {
    pub fn new(config: PulseConfig) -> Self {
        Self {
            pulses: Vec::with_capacity(16),
            last_pulse_ms: 0.0,
            emission: Emission::default(),
            config,
        }
    }

    /// Install new viewport-derived geometry. Active pulses keep their birth
    /// times and are re-measured against the new geometry on the next tick.
    pub fn set_emission(&mut self, emission: Emission) {
        self.emission = emission;
    }

    pub fn emission(&self) -> &Emission {
        &self.emission
    }

    /// Radius at which fading begins.
    pub fn fade_start(&self) -> f32 {
        let e = &self.emission;
        e.initial_radius + self.config.fade_fraction * (e.max_radius - e.initial_radius)
    }

    /// Radius of a pulse born at `birth_ms`, observed at `now_ms`.
    pub fn radius_at(&self, birth_ms: f64, now_ms: f64) -> f32 {
        let age_s = ((now_ms - birth_ms).max(0.0) / 1000.0) as f32;
        self.emission.initial_radius + age_s * self.config.speed
    }

    /// Opacity for a given radius: 1 until `fade_start`, then linear to 0 at max.
    pub fn opacity_at(&self, radius: f32) -> f32 {
        let fade_start = self.fade_start();
        if radius <= fade_start {
            return 1.0;
        }
        let span = self.emission.max_radius - fade_start;
        if span <= 0.0 {
            return 0.0;
        }
        (1.0 - (radius - fade_start) / span).clamp(0.0, 1.0)
    }

    /// Spawn (at most one) pulse if the interval has elapsed, then advance
    /// every pulse and retire the finished ones. Returns true if a pulse was born.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        let spawned = now_ms - self.last_pulse_ms >= self.config.interval_ms;
        if spawned {
            self.last_pulse_ms = now_ms;
            self.pulses.push(Pulse {
                birth_ms: now_ms,
                radius: self.emission.initial_radius,
                opacity: 1.0,
            });
            log::trace!("pulse: born at {}ms ({} active)", now_ms, self.pulses.len());
        }

        for i in 0..self.pulses.len() {
            let radius = self.radius_at(self.pulses[i].birth_ms, now_ms);
            let opacity = self.opacity_at(radius);
            let pulse = &mut self.pulses[i];
            pulse.radius = radius;
            pulse.opacity = opacity;
        }

        let max_radius = self.emission.max_radius;
        let retire_opacity = self.config.retire_opacity;
        let before = self.pulses.len();
        self.pulses
            .retain(|p| p.radius < max_radius && p.opacity > retire_opacity);
        if self.pulses.len() != before {
            log::trace!("pulse: retired {}", before - self.pulses.len());
        }

        spawned
    }

    /// Active pulses, oldest first.
    pub fn active(&self) -> &[Pulse] {
        &self.pulses
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::viewport::Viewport;

    fn manager() -> PulseManager {
        let config = PulseConfig::default();
        let emission = Viewport::new(1920.0, 1080.0).emission(config.origin_offset, config.radius_margin);
        let mut pm = PulseManager::new(config);
        pm.set_emission(emission);
        pm
    }

    #[test]
    fn first_pulse_waits_one_interval() {
        let mut pm = manager();
        assert!(!pm.tick(0.0));
        assert!(pm.is_empty());
        assert!(!pm.tick(999.0));
        assert!(pm.is_empty());

        assert!(pm.tick(1000.0));
        assert_eq!(pm.len(), 1);
        assert_eq!(pm.active()[0].birth_ms, 1000.0);
    }

    #[test]
    fn at_most_one_pulse_per_tick() {
        let mut pm = manager();
        // A long stall spans several intervals but still yields one pulse.
        pm.tick(5000.0);
        assert_eq!(pm.len(), 1);
    }

    #[test]
    fn radius_starts_at_initial_and_grows() {
        let mut pm = manager();
        pm.tick(1000.0);
        let initial = pm.emission().initial_radius;
        assert_eq!(pm.active()[0].radius, initial);

        let mut last = initial;
        for step in 1..50 {
            pm.tick(1000.0 + step as f64 * 16.0);
            let r = pm.active()[0].radius;
            assert!(r > last, "radius must strictly increase");
            last = r;
        }
        // 120 px/s
        assert!((pm.radius_at(1000.0, 2000.0) - (initial + 120.0)).abs() < 1e-3);
    }

    #[test]
    fn opacity_is_one_until_fade_start_then_decreasing() {
        let pm = manager();
        let fade_start = pm.fade_start();
        let max = pm.emission().max_radius;
        assert_eq!(pm.opacity_at(pm.emission().initial_radius), 1.0);
        assert_eq!(pm.opacity_at(fade_start), 1.0);

        let mut last = 1.0;
        let steps = 20;
        for i in 1..=steps {
            let r = fade_start + (max - fade_start) * i as f32 / steps as f32;
            let o = pm.opacity_at(r);
            assert!(o < last, "opacity must strictly decrease past fade start");
            last = o;
        }
        assert_eq!(pm.opacity_at(max), 0.0);
    }

    #[test]
    fn pulse_retired_by_max_radius() {
        let mut pm = manager();
        pm.tick(1000.0);
        let e = *pm.emission();
        let lifetime_ms = ((e.max_radius - e.initial_radius) / 120.0 * 1000.0) as f64;

        let mut now = 1000.0;
        while now < 1000.0 + lifetime_ms {
            now += 250.0;
            pm.tick(now);
            assert!(pm.active().iter().all(|p| p.radius < e.max_radius));
        }
        assert!(pm.active().iter().all(|p| p.birth_ms > 1000.0));
    }

    #[test]
    fn pulses_stay_ordered_by_birth() {
        let mut pm = manager();
        for t in (0..10).map(|i| i as f64 * 1000.0) {
            pm.tick(t);
        }
        let births: Vec<f64> = pm.active().iter().map(|p| p.birth_ms).collect();
        let mut sorted = births.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(births, sorted);
        assert!(!births.is_empty());
    }

    #[test]
    fn degenerate_geometry_retires_immediately() {
        let mut pm = PulseManager::new(PulseConfig::default());
        // Default emission: zero initial and max radius.
        pm.tick(1000.0);
        assert!(pm.is_empty());
    }
}
