//! Explicit frame loop for hosts that pull timestamps instead of receiving
//! per-frame callbacks.

use std::cell::Cell;
use std::rc::Rc;

use crate::api::simulation::Simulation;
use crate::renderer::traits::Surface2D;
use crate::systems::text::TextRasterizer;

/// Cloneable stop flag. All clones observe the same flag.
///
/// Single-threaded by construction: the loop and whatever stops it run on
/// the same thread (the browser main thread, or a native event loop).
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Rc<Cell<bool>>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop before its next frame.
    pub fn stop(&self) {
        self.stopped.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.get()
    }
}

/// Drives `Simulation::frame` until stopped or the frame source runs dry.
pub struct RunLoop {
    stop: StopHandle,
    frames: u64,
}

impl RunLoop {
    pub fn new() -> Self {
        Self {
            stop: StopHandle::new(),
            frames: 0,
        }
    }

    /// A handle that stops this loop.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Frames completed across all `run` calls.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run frames until the stop flag is raised or `next_frame` returns `None`.
    ///
    /// `next_frame` blocks (or awaits a vsync signal) and returns the next
    /// monotonic timestamp in milliseconds.
    pub fn run<S, F>(
        &mut self,
        sim: &mut Simulation,
        rasterizer: &mut dyn TextRasterizer,
        surface: &mut S,
        mut next_frame: F,
    ) where
        S: Surface2D + ?Sized,
        F: FnMut() -> Option<f64>,
    {
        log::debug!("run loop: started");
        while !self.stop.is_stopped() {
            let Some(now_ms) = next_frame() else {
                break;
            };
            sim.frame(now_ms, rasterizer, surface);
            self.frames += 1;
        }
        log::debug!("run loop: exited after {} frames", self.frames);
    }
}

impl Default for RunLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::FieldConfig;
    use crate::input::queue::SurfaceEvent;
    use crate::renderer::draw_list::DrawList;
    use crate::systems::text::OutlineFont;

    fn small_sim() -> Simulation {
        let mut sim = Simulation::new(FieldConfig::default());
        sim.push_event(SurfaceEvent::Resized { width: 320.0, height: 200.0 });
        sim
    }

    #[test]
    fn runs_until_frames_exhausted() {
        let mut sim = small_sim();
        let mut font = OutlineFont::embedded().expect("bundled face parses");
        let mut surface = DrawList::new();
        let mut stamps = vec![0.0, 16.0, 33.0].into_iter();

        let mut run_loop = RunLoop::new();
        run_loop.run(&mut sim, &mut font, &mut surface, || stamps.next());

        assert_eq!(run_loop.frames(), 3);
        assert_eq!(sim.frame_count(), 3);
    }

    #[test]
    fn stop_handle_halts_loop() {
        let mut sim = small_sim();
        let mut font = OutlineFont::embedded().expect("bundled face parses");
        let mut surface = DrawList::new();

        let mut run_loop = RunLoop::new();
        let stop = run_loop.stop_handle();
        let mut t = 0.0;
        run_loop.run(&mut sim, &mut font, &mut surface, || {
            t += 16.0;
            if t > 80.0 {
                stop.stop();
            }
            Some(t)
        });

        // The frame that raised the flag still completes; the next one never starts.
        assert_eq!(run_loop.frames(), 6);
        assert!(run_loop.stop_handle().is_stopped());
    }

    #[test]
    fn stopped_loop_runs_no_frames() {
        let mut sim = small_sim();
        let mut font = OutlineFont::embedded().expect("bundled face parses");
        let mut surface = DrawList::new();

        let mut run_loop = RunLoop::new();
        run_loop.stop_handle().stop();
        run_loop.run(&mut sim, &mut font, &mut surface, || Some(0.0));
        assert_eq!(run_loop.frames(), 0);
    }
}
