/// Size of the visible meadow area in screen units, plus the world/screen
/// mapping for a horizontal camera offset. The meadow only scrolls sideways,
/// so `y` passes through unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Vertical position of the focal point as a fraction of the viewport height.
pub const FOCAL_Y_RATIO: f64 = 0.42;

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Where an inspected flower is pinned, independent of the camera.
    pub fn focal_point(&self) -> (f64, f64) {
        (self.width / 2.0, self.height * FOCAL_Y_RATIO)
    }

    pub fn world_to_screen(&self, wx: i64, wy: i64, offset: i64) -> (f64, f64) {
        ((wx + offset) as f64, wy as f64)
    }

    /// Removes the camera translation; repeated clicks on the same pixel map to
    /// the same world point only while the offset is unchanged.
    pub fn screen_to_world(&self, sx: f64, sy: f64, offset: i64) -> (i64, i64) {
        (sx.round() as i64 - offset, sy.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_world_conversion_is_offset_only() {
        let vp = Viewport::new(1024.0, 768.0);
        assert_eq!(vp.screen_to_world(500.0, 120.0, -50), (550, 120));
        assert_eq!(vp.world_to_screen(550, 120, -50), (500.0, 120.0));
    }

    #[test]
    fn focal_point_is_centered_horizontally() {
        let vp = Viewport::new(1000.0, 500.0);
        assert_eq!(vp.focal_point(), (500.0, 210.0));
    }

    #[test]
    fn negative_sizes_clamp_to_zero() {
        let vp = Viewport::new(-5.0, -1.0);
        assert_eq!((vp.width, vp.height), (0.0, 0.0));
    }
}
