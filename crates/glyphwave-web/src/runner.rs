use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, Window};

use glyphwave::{FieldConfig, Simulation, StopHandle, SurfaceEvent};

use crate::raster::CanvasTextRasterizer;
use crate::surface::CanvasSurface;

/// Owns one field and the browser objects it draws with.
///
/// Each demo crate keeps a `thread_local!` handle to a runner and exports
/// free functions via `#[wasm_bindgen]` (see `export_field!`), because
/// wasm-bindgen cannot export the animation-frame closure chain directly.
pub struct FieldRunner {
    sim: Simulation,
    surface: CanvasSurface,
    rasterizer: CanvasTextRasterizer,
    stop: StopHandle,
    frames: u64,
    /// Window `resize` listener installed by `mount`; removed on unmount.
    on_resize: Option<Closure<dyn FnMut()>>,
}

impl FieldRunner {
    pub fn new(
        document: &Document,
        canvas: HtmlCanvasElement,
        config: FieldConfig,
    ) -> Result<Self, JsValue> {
        let rasterizer = CanvasTextRasterizer::new(document)?;
        let surface = CanvasSurface::new(canvas)?;
        // Idle until `start`.
        let stop = StopHandle::new();
        stop.stop();
        Ok(Self {
            sim: Simulation::new(config),
            surface,
            rasterizer,
            stop,
            frames: 0,
            on_resize: None,
        })
    }

    /// Resize the canvas now and rebuild the field at the next frame.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.surface.set_size(width, height);
        self.sim.push_event(SurfaceEvent::Resized { width, height });
    }

    /// One animation frame at a `requestAnimationFrame` timestamp.
    pub fn frame(&mut self, now_ms: f64) {
        self.sim.frame(now_ms, &mut self.rasterizer, &mut self.surface);
        self.frames += 1;
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Stop the loop and detach the window listener. The runner can still
    /// be driven by hand with `frame`/`resize` afterwards.
    pub fn unmount(&mut self) {
        self.stop();
        self.detach_resize();
    }

    fn detach_resize(&mut self) {
        let Some(listener) = self.on_resize.take() else {
            return;
        };
        let removed = window().and_then(|w| {
            w.remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
        });
        if let Err(e) = removed {
            log::warn!("runner: removing resize listener failed: {:?}", e);
        }
        log::debug!("runner: resize listener detached");
    }

    pub fn is_running(&self) -> bool {
        !self.stop.is_stopped()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn particle_count(&self) -> u32 {
        self.sim.store().len() as u32
    }

    pub fn pulse_count(&self) -> u32 {
        self.sim.pulses().len() as u32
    }
}

impl Drop for FieldRunner {
    fn drop(&mut self) {
        self.detach_resize();
    }
}

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))
}

/// CSS size of the window's layout viewport.
pub fn window_size(window: &Window) -> Result<(f32, f32), JsValue> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width as f32, height as f32))
}

/// Look up `canvas_id`, build a runner over it, size it to the window and
/// keep it sized on every window resize until it is unmounted or dropped.
pub fn mount(canvas_id: &str, config: FieldConfig) -> Result<Rc<RefCell<FieldRunner>>, JsValue> {
    let window = window()?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("window has no document"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element #{}", canvas_id)))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("#{} is not a canvas", canvas_id)))?;

    let runner = Rc::new(RefCell::new(FieldRunner::new(&document, canvas, config)?));
    let (width, height) = window_size(&window)?;
    runner.borrow_mut().resize(width, height);

    // Weak: the runner owns the listener, so a strong handle would be a cycle.
    let on_resize = {
        let runner: Weak<RefCell<FieldRunner>> = Rc::downgrade(&runner);
        let window = window.clone();
        Closure::<dyn FnMut()>::new(move || {
            let Some(runner) = runner.upgrade() else {
                return;
            };
            match window_size(&window) {
                Ok((w, h)) => runner.borrow_mut().resize(w, h),
                Err(e) => log::warn!("runner: window size unavailable: {:?}", e),
            }
        })
    };
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    runner.borrow_mut().on_resize = Some(on_resize);

    Ok(runner)
}

/// Start (or restart) the animation-frame loop. A previous loop on the same
/// runner is stopped first, so at most one chain is ever live.
pub fn start(runner: &Rc<RefCell<FieldRunner>>) -> Result<(), JsValue> {
    let stop = {
        let mut r = runner.borrow_mut();
        r.stop.stop();
        r.stop = StopHandle::new();
        r.stop.clone()
    };

    let next: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let first = next.clone();
    let runner = runner.clone();
    *first.borrow_mut() = Some(Closure::new(move |now_ms: f64| {
        if stop.is_stopped() {
            // Dropping the closure ends the chain.
            let _ = next.borrow_mut().take();
            log::debug!("runner: loop stopped");
            return;
        }
        runner.borrow_mut().frame(now_ms);
        if let Some(cb) = next.borrow().as_ref() {
            if let Err(e) = request_animation_frame(cb) {
                log::error!("runner: requestAnimationFrame failed: {:?}", e);
            }
        }
    }));

    if let Some(cb) = first.borrow().as_ref() {
        request_animation_frame(cb)?;
    }
    log::debug!("runner: loop started");
    Ok(())
}

fn request_animation_frame(cb: &Closure<dyn FnMut(f64)>) -> Result<i32, JsValue> {
    window()?.request_animation_frame(cb.as_ref().unchecked_ref())
}
