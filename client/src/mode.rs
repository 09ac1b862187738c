use meadow_shared::{Flower, WorldPoint};

/// The mutually exclusive interaction state of the meadow.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    #[default]
    Browsing,
    Inspecting {
        flower: Flower,
    },
    Placing {
        point: WorldPoint,
    },
}

impl Mode {
    pub fn is_browsing(&self) -> bool {
        matches!(self, Mode::Browsing)
    }

    /// Inspecting and placing both freeze the camera at a saved offset.
    pub fn is_zoomed(&self) -> bool {
        !self.is_browsing()
    }

    pub fn selected(&self) -> Option<&Flower> {
        match self {
            Mode::Inspecting { flower } => Some(flower),
            _ => None,
        }
    }

    pub fn selected_slug(&self) -> Option<&str> {
        self.selected().map(|f| f.slug.as_str())
    }

    pub fn placement_point(&self) -> Option<WorldPoint> {
        match self {
            Mode::Placing { point } => Some(*point),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mode::Browsing => "browsing",
            Mode::Inspecting { .. } => "inspecting",
            Mode::Placing { .. } => "placing",
        }
    }
}
