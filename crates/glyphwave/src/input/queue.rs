/// Events the host delivers between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// The drawing surface changed size (CSS pixels).
    Resized { width: f32, height: f32 },
}

/// A queue of surface events.
/// The host pushes events whenever they fire; the simulation consumes them
/// at the start of its next tick, so a rebuild never interleaves with a frame.
///
/// A resize supersedes any resize still pending, so a host that keeps
/// firing resizes while the loop is stopped holds at most one.
pub struct EventQueue {
    events: Vec<SurfaceEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(4),
        }
    }

    /// Push a new event (called from the host's event handler).
    pub fn push(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Resized { .. } => self
                .events
                .retain(|e| !matches!(e, SurfaceEvent::Resized { .. })),
        }
        self.events.push(event);
    }

    /// Discard every pending event, keeping the allocation.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// The pending resize, if any.
    pub fn latest_resize(&self) -> Option<(f32, f32)> {
        self.events.iter().rev().find_map(|e| match *e {
            SurfaceEvent::Resized { width, height } => Some((width, height)),
        })
    }

    /// Check if there are pending events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
