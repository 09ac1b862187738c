use crate::mode::Mode;

/// Edge-scroll tuning: a band of `band` units along each side of the viewport
/// in which the camera drifts, up to `max_velocity` units per frame at the edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeScroll {
    pub band: f64,
    pub max_velocity: f64,
}

impl Default for EdgeScroll {
    fn default() -> Self {
        Self {
            band: 200.0,
            max_velocity: 8.0,
        }
    }
}

/// Scroll velocity for a pointer at `px` in a viewport `width` wide.
///
/// Linear ramp: zero at the inner edge of the band, `max_velocity` at the
/// viewport edge. Positive velocity moves content right, revealing the world
/// to the left; negative reveals the world to the right.
pub fn edge_velocity(px: f64, width: f64, edge: EdgeScroll) -> f64 {
    if !px.is_finite() || width <= 0.0 || edge.band <= 0.0 {
        return 0.0;
    }
    let px = px.clamp(0.0, width);

    if px < edge.band {
        edge.max_velocity * (1.0 - px / edge.band)
    } else if px > width - edge.band {
        -edge.max_velocity * (1.0 - (width - px) / edge.band)
    } else {
        0.0
    }
}

/// Horizontal camera: the live offset, the current scroll velocity and the
/// offset captured on entry to a zoomed mode.
///
/// Outside of `tick`, the offset only changes through `save`/`restore`, which
/// are reserved for the mode state machine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Camera {
    offset: i64,
    velocity: f64,
    saved_offset: i64,
    /// Sub-unit motion carried between frames so slow drifts still move.
    residual: f64,
}

impl Camera {
    pub fn with_offset(offset: i64) -> Self {
        Self {
            offset,
            saved_offset: offset,
            ..Self::default()
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn saved_offset(&self) -> i64 {
        self.saved_offset
    }

    pub fn is_moving(&self) -> bool {
        self.velocity != 0.0
    }

    /// Requested velocity only sticks while browsing; any other mode pins it to zero.
    pub fn set_velocity(&mut self, requested: f64, mode: &Mode) {
        if mode.is_browsing() && requested.is_finite() && requested != 0.0 {
            self.velocity = requested;
        } else {
            self.halt();
        }
    }

    /// Advance one animation frame. Returns whether another frame is needed.
    pub fn tick(&mut self, mode: &Mode) -> bool {
        if !mode.is_browsing() {
            self.halt();
            return false;
        }
        if self.velocity == 0.0 {
            return false;
        }

        self.residual += self.velocity;
        let whole = self.residual.trunc();
        self.residual -= whole;
        self.offset += whole as i64;
        true
    }

    pub(crate) fn halt(&mut self) {
        self.velocity = 0.0;
        self.residual = 0.0;
    }

    pub(crate) fn save(&mut self) {
        self.saved_offset = self.offset;
    }

    pub(crate) fn restore(&mut self) {
        self.offset = self.saved_offset;
        self.residual = 0.0;
    }
}
