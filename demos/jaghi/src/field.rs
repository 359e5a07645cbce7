use glyphwave::FieldConfig;

/// The landing-page field: "JAGHI" in heavy sans, one wavefront per second.
pub fn jaghi() -> FieldConfig {
    FieldConfig {
        text: "JAGHI".to_string(),
        ..FieldConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphwave::{DrawList, OutlineFont, Simulation, SurfaceEvent};

    #[test]
    fn runs_headless_for_a_few_seconds() {
        let mut sim = Simulation::new(jaghi());
        let mut font = OutlineFont::embedded().expect("bundled face parses");
        let mut list = DrawList::new();
        sim.push_event(SurfaceEvent::Resized { width: 1280.0, height: 720.0 });

        for i in 0..240 {
            list.clear();
            sim.frame(i as f64 * 1000.0 / 60.0, &mut font, &mut list);
        }
        assert_eq!(sim.frame_count(), 240);
        assert!(!sim.store().text().is_empty());
        assert!(!sim.pulses().is_empty());
        assert!(!list.is_empty());
    }
}
