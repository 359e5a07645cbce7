pub mod raster;
pub mod runner;
pub mod surface;

pub use glyphwave;
pub use raster::CanvasTextRasterizer;
pub use runner::{mount, start, FieldRunner};
pub use surface::CanvasSurface;

/// Generate all `#[wasm_bindgen]` exports for a particle field.
///
/// Generates:
/// - `thread_local!` storage for the mounted runner
/// - `with_runner()` helper function
/// - `field_init`, `field_init_with_config`, `field_start`, `field_stop`,
///   `field_frame`, `field_resize` and the counter accessors
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// glyphwave_web::export_field!(glyphwave_web::glyphwave::FieldConfig::default(), "my-field");
/// ```
///
/// # Arguments
///
/// - `$config`: expression producing the default `FieldConfig`
/// - `$name`: a string literal used in the initialization log message
#[macro_export]
macro_rules! export_field {
    ($config:expr, $name:literal) => {
        use std::cell::RefCell;
        use std::rc::Rc;

        thread_local! {
            static RUNNER: RefCell<Option<Rc<RefCell<$crate::FieldRunner>>>> = RefCell::new(None);
        }

        fn runner() -> Option<Rc<RefCell<$crate::FieldRunner>>> {
            RUNNER.with(|cell| cell.borrow().clone())
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::FieldRunner) -> R) -> Option<R> {
            runner().map(|r| f(&mut r.borrow_mut()))
        }

        fn not_initialized() -> JsValue {
            JsValue::from_str(concat!($name, ": not initialized, call field_init() first"))
        }

        fn install(canvas_id: &str, config: $crate::glyphwave::FieldConfig) -> Result<(), JsValue> {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            if let Some(old) = runner() {
                old.borrow_mut().unmount();
            }
            let mounted = $crate::mount(canvas_id, config)?;
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(mounted);
            });
            log::info!("{}: initialized on #{}", $name, canvas_id);
            Ok(())
        }

        #[wasm_bindgen]
        pub fn field_init(canvas_id: &str) -> Result<(), JsValue> {
            install(canvas_id, $config)
        }

        /// Mount with a JSON config; missing keys keep their defaults.
        #[wasm_bindgen]
        pub fn field_init_with_config(canvas_id: &str, json: &str) -> Result<(), JsValue> {
            let config = $crate::glyphwave::FieldConfig::from_json(json)
                .map_err(|e| JsValue::from_str(&format!("{}: bad config: {}", $name, e)))?;
            install(canvas_id, config)
        }

        #[wasm_bindgen]
        pub fn field_start() -> Result<(), JsValue> {
            let r = runner().ok_or_else(not_initialized)?;
            $crate::start(&r)
        }

        #[wasm_bindgen]
        pub fn field_stop() {
            with_runner(|r| r.stop());
        }

        /// Advance and draw one frame from a host-driven loop.
        #[wasm_bindgen]
        pub fn field_frame(now_ms: f64) {
            with_runner(|r| r.frame(now_ms));
        }

        #[wasm_bindgen]
        pub fn field_resize(width: f32, height: f32) {
            with_runner(|r| r.resize(width, height));
        }

        // ---- Counters ----

        #[wasm_bindgen]
        pub fn field_is_running() -> bool {
            with_runner(|r| r.is_running()).unwrap_or(false)
        }

        #[wasm_bindgen]
        pub fn field_particle_count() -> u32 {
            with_runner(|r| r.particle_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn field_pulse_count() -> u32 {
            with_runner(|r| r.pulse_count()).unwrap_or(0)
        }

        #[wasm_bindgen]
        pub fn field_frame_count() -> f64 {
            with_runner(|r| r.frame_count() as f64).unwrap_or(0.0)
        }
    };
}
