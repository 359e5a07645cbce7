use crate::api::config::{FieldConfig, FieldMode};
use crate::core::rng::Rng;
use crate::core::time::FrameClock;
use crate::core::viewport::Viewport;
use crate::input::queue::{EventQueue, SurfaceEvent};
use crate::renderer::traits::Surface2D;
use crate::systems::forces::{top_up, update_ambient_field, update_wave_field, WaveField};
use crate::systems::particles::ParticleStore;
use crate::systems::pulse::PulseManager;
use crate::systems::render::{render_ambient, render_wave};
use crate::systems::text::{sample_text, TextRasterizer};

/// All mutable state of one particle field.
///
/// The host owns exactly one of these per canvas and drives it with
/// `frame()`. Nothing is global; two simulations never share state.
pub struct Simulation {
    config: FieldConfig,
    viewport: Viewport,
    store: ParticleStore,
    pulses: PulseManager,
    clock: FrameClock,
    rng: Rng,
    events: EventQueue,
}

impl Simulation {
    pub fn new(config: FieldConfig) -> Self {
        let config = config.sanitized();
        Self {
            viewport: Viewport::default(),
            store: ParticleStore::new(),
            pulses: PulseManager::new(config.pulse.clone()),
            clock: FrameClock::new(),
            rng: Rng::new(config.seed),
            events: EventQueue::new(),
            config,
        }
    }

    /// Replace the sampled string. Takes effect at the next resize.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.config.text = text.into();
        self
    }

    /// Queue a host event. Applied at the start of the next tick.
    pub fn push_event(&mut self, event: SurfaceEvent) {
        self.events.push(event);
    }

    /// Adopt a new viewport: recompute emission geometry, then rebuild the
    /// populations off to the side and swap them in whole.
    ///
    /// A zero-area viewport is recorded (so ticks and renders skip) but the
    /// populations are left untouched.
    pub fn resize(&mut self, viewport: Viewport, rasterizer: &mut dyn TextRasterizer) {
        self.viewport = viewport;
        if viewport.is_empty() {
            log::debug!(
                "simulation: zero-area viewport {}x{}, keeping {} particles",
                viewport.width,
                viewport.height,
                self.store.len()
            );
            return;
        }

        let pulse_cfg = &self.config.pulse;
        self.pulses
            .set_emission(viewport.emission(pulse_cfg.origin_offset, pulse_cfg.radius_margin));

        match self.config.mode {
            FieldMode::Wave => {
                let seeds = sample_text(
                    rasterizer,
                    &self.config.text,
                    viewport,
                    &self.config.font,
                    self.config.sampling_gap,
                );
                let text = ParticleStore::build_text(&seeds, &mut self.rng);
                let background = ParticleStore::build_background(
                    viewport,
                    self.config.background_divisor,
                    &mut self.rng,
                );
                self.store.replace(text, background);
            }
            FieldMode::Ambient => {
                // Dust survives resizes; respawn and wrap pull it into the new bounds.
                if self.store.background().is_empty() {
                    self.store.initialize_ambient(
                        viewport,
                        self.config.background_divisor,
                        &mut self.rng,
                    );
                }
            }
        }

        log::info!(
            "simulation: {}x{} -> {} text, {} background particles",
            viewport.width,
            viewport.height,
            self.store.text().len(),
            self.store.background().len()
        );
    }

    /// Advance one frame: apply pending resizes, then pulses and forces.
    pub fn tick(&mut self, now_ms: f64, rasterizer: &mut dyn TextRasterizer) {
        let latest = self.events.latest_resize();
        self.events.clear();
        if let Some((width, height)) = latest {
            self.resize(Viewport::new(width, height), rasterizer);
        }

        if self.viewport.is_empty() {
            log::debug!("simulation: zero-area viewport, tick skipped");
            return;
        }
        self.clock.advance(now_ms);

        match self.config.mode {
            FieldMode::Wave => {
                self.pulses.tick(now_ms);
                let field = WaveField {
                    pulses: self.pulses.active(),
                    origin: self.pulses.emission().origin,
                    time_s: self.clock.seconds(),
                };
                update_wave_field(&mut self.store, &field, &self.config.forces);
            }
            FieldMode::Ambient => {
                update_ambient_field(
                    &mut self.store,
                    self.viewport,
                    self.clock.frame(),
                    &self.config.ambient,
                    &mut self.rng,
                );
                top_up(&mut self.store, self.viewport, &self.config.ambient, &mut self.rng);
            }
        }
    }

    /// Draw the current state.
    pub fn render<S: Surface2D + ?Sized>(&self, surface: &mut S) {
        match self.config.mode {
            FieldMode::Wave => render_wave(
                surface,
                self.viewport,
                &self.store,
                self.pulses.active(),
                self.pulses.emission().origin,
                &self.config.compositor,
            ),
            FieldMode::Ambient => render_ambient(
                surface,
                self.viewport,
                &self.store,
                &self.config.compositor,
                &self.config.ambient,
            ),
        }
    }

    /// `tick` then `render`.
    pub fn frame<S: Surface2D + ?Sized>(
        &mut self,
        now_ms: f64,
        rasterizer: &mut dyn TextRasterizer,
        surface: &mut S,
    ) {
        self.tick(now_ms, rasterizer);
        self.render(surface);
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn pulses(&self) -> &PulseManager {
        &self.pulses
    }

    /// Ticks that actually advanced the field (zero-area ticks excluded).
    pub fn frame_count(&self) -> u64 {
        self.clock.frame()
    }
}
