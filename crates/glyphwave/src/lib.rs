pub mod api;
pub mod core;
pub mod systems;
pub mod renderer;
pub mod input;

// Re-export key types at crate root for convenience
pub use api::config::{
    AmbientConfig, CompositorConfig, FieldConfig, FieldMode, ForceConfig, PulseConfig,
};
pub use api::simulation::Simulation;
pub use core::rng::Rng;
pub use core::run_loop::{RunLoop, StopHandle};
pub use core::time::FrameClock;
pub use core::viewport::{Emission, Viewport};
pub use input::queue::{EventQueue, SurfaceEvent};
pub use renderer::draw_list::{DrawCommand, DrawKind, DrawList};
pub use renderer::traits::{GradientStop, Rgba, Surface2D};
pub use systems::particles::{DriftState, Particle, ParticleKind, ParticleStore};
pub use systems::pulse::{Pulse, PulseManager};
pub use systems::text::{AlphaMask, FontConfig, OutlineFont, TextLayout, TextRasterizer};
