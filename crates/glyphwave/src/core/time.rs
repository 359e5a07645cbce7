/// Frame clock driven by the host's monotonic timestamps.
/// Tracks the frame counter (the ambient drift advances per frame, not per
/// millisecond) and the most recent timestamp.
pub struct FrameClock {
    /// Frames advanced so far.
    frame: u64,
    /// Timestamp of the latest frame in milliseconds.
    now_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            frame: 0,
            now_ms: 0.0,
        }
    }

    /// Advance to a new host timestamp.
    pub fn advance(&mut self, now_ms: f64) {
        self.now_ms = now_ms;
        self.frame += 1;
    }

    /// Number of frames advanced.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Latest timestamp in seconds, as used by the oscillating wave terms.
    pub fn seconds(&self) -> f32 {
        (self.now_ms / 1000.0) as f32
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_frames() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        clock.advance(16.0);
        clock.advance(33.0);
        assert_eq!(clock.frame(), 3);
        assert!((clock.seconds() - 0.033).abs() < 1e-6);
    }

    #[test]
    fn seconds_follow_the_latest_timestamp() {
        let mut clock = FrameClock::new();
        clock.advance(2500.0);
        assert!((clock.seconds() - 2.5).abs() < 1e-6);
        // Host clock reset: the phase follows the host, frames still count up.
        clock.advance(10.0);
        assert!((clock.seconds() - 0.01).abs() < 1e-6);
        assert_eq!(clock.frame(), 2);
    }
}
