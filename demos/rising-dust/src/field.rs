use glyphwave::FieldConfig;

/// Rising dust behind the landing page: no text, no wavefronts.
pub fn rising_dust() -> FieldConfig {
    FieldConfig::ambient()
}
