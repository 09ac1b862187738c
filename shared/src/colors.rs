use crate::flower::Category;

/// Base hue (degrees), saturation and lightness for each category's petals.
fn category_base_hsl(category: Category) -> (f64, f64, f64) {
    match category {
        Category::Daisy => (52.0, 0.35, 0.92),
        Category::Tulip => (330.0, 0.70, 0.62),
        Category::Rose => (352.0, 0.75, 0.48),
        Category::Sunflower => (45.0, 0.92, 0.55),
        Category::Lily => (280.0, 0.45, 0.72),
        Category::Poppy => (12.0, 0.85, 0.52),
    }
}

/// Deterministic petal color for a flower: the category's base color with a
/// hue jitter of up to ±12 degrees taken from a CRC32 hash of the slug, so
/// neighbouring flowers of the same kind are told apart without storing a color.
pub fn petal_color(slug: &str, category: Category) -> (u8, u8, u8) {
    let hash = crc32fast::hash(slug.as_bytes());
    let jitter = (hash % 25) as f64 - 12.0;
    let (h, s, l) = category_base_hsl(category);
    hsl_to_rgb((h + jitter).rem_euclid(360.0), s, l)
}

/// Raise lightness by `amount` (0..1), clamped. Used for the newly-planted glow.
pub fn lighten(rgb: (u8, u8, u8), amount: f64) -> (u8, u8, u8) {
    let (h, s, l) = rgb_to_hsl(rgb.0, rgb.1, rgb.2);
    hsl_to_rgb(h, s, (l + amount).clamp(0.0, 1.0))
}

pub fn rgba_css(rgb: (u8, u8, u8), alpha: f64) -> String {
    format!("rgba({},{},{},{alpha:.2})", rgb.0, rgb.1, rgb.2)
}

/// Convert RGB to HSL. Returns (h: 0..360, s: 0..1, l: 0..1).
pub fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = r as f64 / 255.0;
    let g = g as f64 / 255.0;
    let b = b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let d = max - min;
    if d.abs() < f64::EPSILON {
        return (0.0, 0.0, l);
    }

    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let sector = if (max - r).abs() < f64::EPSILON {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if (max - g).abs() < f64::EPSILON {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    (sector * 60.0, s, l)
}

/// Convert HSL to RGB.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let to_byte = |v: f64| (v * 255.0).round() as u8;
    if s.abs() < f64::EPSILON {
        let v = to_byte(l);
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h = h / 360.0;

    (
        to_byte(hue_channel(p, q, h + 1.0 / 3.0)),
        to_byte(hue_channel(p, q, h)),
        to_byte(hue_channel(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_roundtrip_preserves_primaries() {
        for rgb in [(255, 0, 0), (0, 255, 0), (0, 0, 255), (128, 128, 128)] {
            let (h, s, l) = rgb_to_hsl(rgb.0, rgb.1, rgb.2);
            assert_eq!(hsl_to_rgb(h, s, l), rgb);
        }
    }

    #[test]
    fn petal_color_is_deterministic_per_slug() {
        let a = petal_color("hello-abc123", Category::Rose);
        let b = petal_color("hello-abc123", Category::Rose);
        assert_eq!(a, b);
    }

    #[test]
    fn petal_color_stays_near_category_hue() {
        let (r, g, b) = petal_color("sunny-000001", Category::Sunflower);
        let (h, _, _) = rgb_to_hsl(r, g, b);
        assert!((h - 45.0).abs() <= 13.0, "hue {h} drifted from sunflower");
    }

    #[test]
    fn lighten_raises_lightness_and_clamps() {
        let base = (100, 40, 40);
        let (_, _, l0) = rgb_to_hsl(base.0, base.1, base.2);
        let out = lighten(base, 0.2);
        let (_, _, l1) = rgb_to_hsl(out.0, out.1, out.2);
        assert!(l1 > l0);
        assert_eq!(lighten(base, 5.0), (255, 255, 255));
    }

    #[test]
    fn rgba_css_formats_alpha() {
        assert_eq!(rgba_css((1, 2, 3), 0.5), "rgba(1,2,3,0.50)");
    }
}
