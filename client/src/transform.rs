use meadow_shared::Flower;

use crate::mode::Mode;
use crate::viewport::Viewport;

pub const FOCUS_SCALE: f64 = 2.4;
pub const HIDDEN_SCALE: f64 = 0.6;

pub const STACK_HIDDEN: i32 = 0;
pub const STACK_NORMAL: i32 = 10;
pub const STACK_FOCUSED: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Treatment {
    Normal,
    Focused,
    Hidden,
}

impl Treatment {
    pub fn css_class(self) -> &'static str {
        match self {
            Treatment::Normal => "flower",
            Treatment::Focused => "flower flower--focused",
            Treatment::Hidden => "flower flower--hidden",
        }
    }

    /// Hidden siblings let clicks fall through to the meadow underneath.
    pub fn takes_pointer(self) -> bool {
        !matches!(self, Treatment::Hidden)
    }
}

/// Where and how a flower is drawn for one render pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub screen_x: f64,
    pub screen_y: f64,
    pub scale: f64,
    pub opacity: f64,
    pub stack_order: i32,
    pub treatment: Treatment,
}

/// Screen placement of `flower` for the current mode.
///
/// The focused flower is pinned to the focal point, so the live offset has no
/// effect on it. Hidden siblings are laid out against `saved_offset`, which is
/// where they were when the zoom started, so they fade in place instead of
/// jumping.
pub fn place(
    flower: &Flower,
    mode: &Mode,
    offset: i64,
    saved_offset: i64,
    viewport: &Viewport,
) -> Placement {
    match mode.selected() {
        Some(selected) if selected.slug == flower.slug => {
            let (screen_x, screen_y) = viewport.focal_point();
            Placement {
                screen_x,
                screen_y,
                scale: FOCUS_SCALE,
                opacity: 1.0,
                stack_order: STACK_FOCUSED,
                treatment: Treatment::Focused,
            }
        }
        Some(_) => {
            let (screen_x, screen_y) = viewport.world_to_screen(flower.x(), flower.y(), saved_offset);
            Placement {
                screen_x,
                screen_y,
                scale: HIDDEN_SCALE,
                opacity: 0.0,
                stack_order: STACK_HIDDEN,
                treatment: Treatment::Hidden,
            }
        }
        None => {
            let (screen_x, screen_y) = viewport.world_to_screen(flower.x(), flower.y(), offset);
            Placement {
                screen_x,
                screen_y,
                scale: 1.0,
                opacity: 1.0,
                stack_order: STACK_NORMAL,
                treatment: Treatment::Normal,
            }
        }
    }
}
