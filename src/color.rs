//! RGB colors, `#RRGGBB` parsing and linear interpolation.

pub use rgb::RGB8 as Color;

/// The neutral midpoint between the cool and blaze ends of the palette.
pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };

/// Parse a 6-digit hex color such as `#FF00AA` (the leading `#` is
/// optional, digits are case-insensitive).  Returns `None` for anything
/// else.
pub fn hex_to_rgb(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(Color::new(channel(0)?, channel(2)?, channel(4)?))
}

/// Blend `a` towards `b` by `factor`.  The factor is not clamped, so
/// values outside \[0, 1\] extrapolate; each rounded channel saturates
/// into \[0, 255\].
pub fn interpolate(a: Color, b: Color, factor: f64) -> Color {
    let mix = |x: u8, y: u8| -> u8 {
        let x = x as f64;
        let v = (x + factor * (y as f64 - x)).round();
        v.clamp(0., 255.) as u8
    };
    Color::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

pub fn css_rgb(c: Color) -> String {
    format!("rgb({}, {}, {})", c.r, c.g, c.b)
}

pub fn css_hex(c: Color) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

/// Serde adapter writing colors as `#rrggbb` strings.
pub mod hex_serde {
    use super::{css_hex, hex_to_rgb, Color};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(c: &Color, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&css_hex(*c))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Color, D::Error> {
        let s = String::deserialize(d)?;
        hex_to_rgb(s.trim())
            .ok_or_else(|| de::Error::custom(format!("not a #RRGGBB color: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(hex_to_rgb("#FF00AA"), Some(Color::new(255, 0, 170)));
        assert_eq!(hex_to_rgb("1e90ff"), Some(Color::new(30, 144, 255)));
        assert_eq!(hex_to_rgb("notacolor"), None);
        assert_eq!(hex_to_rgb("#FFF"), None);
        assert_eq!(hex_to_rgb("#FF00AA00"), None);
        assert_eq!(hex_to_rgb("#+F00AA"), None);
    }

    #[test]
    fn interpolation_endpoints() {
        let pairs = [
            (Color::new(0, 0, 255), WHITE),
            (Color::new(12, 200, 7), Color::new(250, 3, 99)),
            (WHITE, Color::new(255, 0, 0)),
        ];
        for (a, b) in pairs {
            assert_eq!(interpolate(a, b, 0.), a);
            assert_eq!(interpolate(a, b, 1.), b);
        }
    }

    #[test]
    fn interpolation_rounds_half_up() {
        let c = interpolate(WHITE, Color::new(255, 0, 0), 0.5);
        assert_eq!(c, Color::new(255, 128, 128));
    }

    #[test]
    fn extrapolation_saturates() {
        let c = interpolate(Color::new(0, 100, 255), WHITE, -1.);
        assert_eq!(c, Color::new(0, 0, 255));
        let c = interpolate(Color::new(0, 100, 255), WHITE, 2.);
        assert_eq!(c, Color::new(255, 255, 255));
    }

    #[test]
    fn css_rendering() {
        let c = Color::new(255, 0, 170);
        assert_eq!(css_rgb(c), "rgb(255, 0, 170)");
        assert_eq!(css_hex(c), "#ff00aa");
    }
}
