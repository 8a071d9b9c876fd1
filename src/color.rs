use crate::rng::RandomSource;

/// 8-bit RGB triple, the color type every surface draws with.
pub type Rgb = (u8, u8, u8);

/// RGB color with an opacity in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    pub alpha: f32,
}

impl Rgba {
    pub fn new(rgb: Rgb, alpha: f32) -> Self {
        Self { rgb, alpha: alpha.clamp(0.0, 1.0) }
    }
}

/// Converts HSL (hue in degrees, saturation and lightness in `[0, 1]`) to RGB.
pub fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgb {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    let to_u8 = |c: f32| ((c + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}

/// Random fully saturated, half-lightness color, `hsl(random·360, 100%, 50%)`.
pub fn random_vivid<R: RandomSource + ?Sized>(rng: &mut R) -> Rgb {
    hsl_to_rgb(rng.range(0.0, 360.0), 1.0, 0.5)
}

pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRng;

    #[test]
    fn test_primary_hues() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0, 0, 255));
        assert_eq!(hsl_to_rgb(360.0, 1.0, 0.5), (255, 0, 0));
    }

    #[test]
    fn test_grey_and_extremes() {
        assert_eq!(hsl_to_rgb(200.0, 0.0, 0.5), (128, 128, 128));
        assert_eq!(hsl_to_rgb(42.0, 1.0, 0.0), (0, 0, 0));
        assert_eq!(hsl_to_rgb(42.0, 1.0, 1.0), (255, 255, 255));
    }

    #[test]
    fn test_random_vivid_uses_hue() {
        let mut rng = SequenceRng::constant(0.5);
        assert_eq!(random_vivid(&mut rng), (0, 255, 255));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("1a1b26"), Some((0x1a, 0x1b, 0x26)));
        assert_eq!(parse_hex_color("#FFFFFF"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("fff"), None);
        assert_eq!(parse_hex_color("zzzzzz"), None);
    }
}
