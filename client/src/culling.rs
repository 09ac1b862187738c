use meadow_shared::Flower;

use crate::mode::Mode;

/// Whether a flower at world `x` lands within `buffer` units of the viewport.
pub fn is_on_screen(x: i64, offset: i64, width: f64, buffer: i64) -> bool {
    let screen_x = (x + offset) as f64;
    let buffer = buffer as f64;
    screen_x >= -buffer && screen_x <= width + buffer
}

/// Flowers worth rendering this pass. While zoomed every flower stays in the
/// set so siblings can fade out instead of popping.
pub fn visible<'a>(
    flowers: impl IntoIterator<Item = &'a Flower>,
    mode: &Mode,
    offset: i64,
    width: f64,
    buffer: i64,
) -> Vec<&'a Flower> {
    let flowers = flowers.into_iter();
    if mode.is_zoomed() {
        return flowers.collect();
    }
    flowers
        .filter(|f| is_on_screen(f.x(), offset, width, buffer))
        .collect()
}
