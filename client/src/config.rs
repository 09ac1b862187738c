use crate::camera::EdgeScroll;

pub const EDGE_BAND: f64 = 200.0;
pub const MAX_VELOCITY: f64 = 8.0;
pub const CULL_BUFFER: i64 = 300;

/// Screen rows (inclusive) where a click may start a new planting.
pub const PLANT_MIN_Y: f64 = 80.0;
pub const PLANT_MAX_Y: f64 = 680.0;

pub const HIGHLIGHT_MS: f64 = 2600.0;
pub const HOVER_DELAY_MS: f64 = 450.0;
pub const TWINKLE_MS: f64 = 4000.0;

pub const SETTINGS_KEY: &str = "meadow_settings";

/// Tuning for the meadow field that does not depend on the viewport size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    pub edge: EdgeScroll,
    pub cull_buffer: i64,
    pub plant_min_y: f64,
    pub plant_max_y: f64,
    pub highlight_ms: f64,
    pub hover_delay_ms: f64,
    pub twinkle_ms: f64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            edge: EdgeScroll {
                band: EDGE_BAND,
                max_velocity: MAX_VELOCITY,
            },
            cull_buffer: CULL_BUFFER,
            plant_min_y: PLANT_MIN_Y,
            plant_max_y: PLANT_MAX_Y,
            highlight_ms: HIGHLIGHT_MS,
            hover_delay_ms: HOVER_DELAY_MS,
            twinkle_ms: TWINKLE_MS,
        }
    }
}

impl FieldConfig {
    pub fn in_plantable_band(&self, py: f64) -> bool {
        py.is_finite() && py >= self.plant_min_y && py <= self.plant_max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plantable_band_is_inclusive() {
        let cfg = FieldConfig::default();
        assert!(cfg.in_plantable_band(PLANT_MIN_Y));
        assert!(cfg.in_plantable_band(120.0));
        assert!(cfg.in_plantable_band(PLANT_MAX_Y));
        assert!(!cfg.in_plantable_band(PLANT_MIN_Y - 1.0));
        assert!(!cfg.in_plantable_band(PLANT_MAX_Y + 0.5));
        assert!(!cfg.in_plantable_band(f64::NAN));
    }
}
