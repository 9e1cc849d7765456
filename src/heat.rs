//! The heat color mapper.
//!
//! Heat runs from the palette's cool color at -6 through white at 0 to its
//! blaze color at 6.  The palette comes from a [`PaletteProvider`] and the
//! things being colored are reached through [`HeatElement`], so nothing
//! here knows about HTML.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color::{self, css_hex, hex_to_rgb, interpolate, Color, WHITE};
use crate::error::HeatError;

pub const MAX_HEAT: i64 = 6;

pub const COOL_PROPERTY: &str = "--cool";
pub const BLAZE_PROPERTY: &str = "--blaze";

/// Anything that can answer CSS custom property lookups.
pub trait PaletteProvider {
    fn custom_property(&self, name: &str) -> Option<String>;
}

impl PaletteProvider for HashMap<String, String> {
    fn custom_property(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// The two extreme colors of the heat scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(with = "color::hex_serde")]
    pub cool: Color,
    #[serde(with = "color::hex_serde")]
    pub blaze: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(Color::new(0x1e, 0x90, 0xff), Color::new(0xff, 0x45, 0x00))
    }
}

impl Palette {
    pub fn new(cool: Color, blaze: Color) -> Self {
        Self { cool, blaze }
    }

    /// Read `--cool` and `--blaze` from `provider`.
    pub fn from_provider(provider: &impl PaletteProvider) -> Result<Self, HeatError> {
        Ok(Self {
            cool: lookup(provider, COOL_PROPERTY)?,
            blaze: lookup(provider, BLAZE_PROPERTY)?,
        })
    }

    /// Build a palette from two hex strings, as sent by an admin.
    pub fn from_hex(cool: &str, blaze: &str) -> Result<Self, HeatError> {
        Ok(Self {
            cool: parse_palette_color(COOL_PROPERTY, cool)?,
            blaze: parse_palette_color(BLAZE_PROPERTY, blaze)?,
        })
    }

    pub fn to_stylesheet(&self) -> String {
        format!(
            ":root {{\n  {}: {};\n  {}: {};\n}}\n",
            COOL_PROPERTY,
            css_hex(self.cool),
            BLAZE_PROPERTY,
            css_hex(self.blaze)
        )
    }
}

fn lookup(provider: &impl PaletteProvider, name: &str) -> Result<Color, HeatError> {
    let value = provider
        .custom_property(name)
        .ok_or_else(|| HeatError::MissingPaletteProperty(name.to_string()))?;
    parse_palette_color(name, &value)
}

fn parse_palette_color(name: &str, value: &str) -> Result<Color, HeatError> {
    hex_to_rgb(value.trim()).ok_or_else(|| HeatError::InvalidPaletteColor {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// Map `heat` onto the palette.
///
/// Below zero the blend factor is `(heat + 3) / 3`, which reaches the cool
/// color at -3 and goes negative for -5 and -4.  That factor is kept as is:
/// the extrapolated channels saturate, which lands on or past the cool
/// color.  Zero and above use `heat / 6` from white to blaze.
pub fn color_for_heat(heat: i64, palette: &Palette) -> Color {
    if heat <= -MAX_HEAT {
        return palette.cool;
    }
    if heat >= MAX_HEAT {
        return palette.blaze;
    }
    let heat = heat as f64;
    if heat < 0. {
        interpolate(palette.cool, WHITE, (heat + 3.) / 3.)
    } else {
        interpolate(WHITE, palette.blaze, heat / MAX_HEAT as f64)
    }
}

pub fn css_color_for_heat(heat: i64, palette: &Palette) -> String {
    color::css_rgb(color_for_heat(heat, palette))
}

/// Read a heat value from card text.
///
/// Leading whitespace and an optional sign are accepted, then the leading
/// run of decimal digits is taken and anything after it ignored, so `"2.5"`
/// reads as 2.  Text without a leading digit is an error.
pub fn parse_heat(text: &str) -> Result<i64, HeatError> {
    let text = text.trim();
    let invalid = || HeatError::InvalidHeatValue(text.to_string());
    let sign_len = usize::from(matches!(text.as_bytes().first(), Some(b'-' | b'+')));
    let len = text[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if len == 0 {
        return Err(invalid());
    }
    text[..sign_len + len].parse().map_err(|_| invalid())
}

/// Like [`parse_heat`], falling back to 0 (white) for unreadable text.
pub fn heat_or_default(text: &str) -> i64 {
    parse_heat(text).unwrap_or_else(|e| {
        tracing::warn!("{}, using heat 0", e);
        0
    })
}

/// Something displaying a heat value that can take a background color.
pub trait HeatElement {
    fn heat_text(&self) -> &str;
    fn set_background(&mut self, css: String);
}

/// Color every element by its heat.  Returns how many were painted.
pub fn paint_heat_elements<'a, E, I>(palette: &Palette, elements: I) -> usize
where
    E: HeatElement + 'a,
    I: IntoIterator<Item = &'a mut E>,
{
    let mut painted = 0;
    for element in elements {
        let heat = heat_or_default(element.heat_text());
        element.set_background(css_color_for_heat(heat, palette));
        painted += 1;
    }
    tracing::debug!("Colored {} heat elements", painted);
    painted
}
