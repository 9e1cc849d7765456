//! Display modes and the page colors for each of them

use serde::{Deserialize, Serialize};

/// Hour of day (local time) from which the page stays dark.
pub const DARK_FROM_HOUR: u32 = 21;

pub const LIGHT_MODE_CLASS: &str = "light-mode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Dark,
    Light,
}

impl DisplayMode {
    pub fn toggle(self) -> Self {
        match self {
            DisplayMode::Dark => DisplayMode::Light,
            DisplayMode::Light => DisplayMode::Dark,
        }
    }

    /// Class carried by `<body>`; dark is the unclassed default.
    pub fn body_class(self) -> &'static str {
        match self {
            DisplayMode::Light => LIGHT_MODE_CLASS,
            DisplayMode::Dark => "",
        }
    }

    /// Glyph shown on the toggle button, pointing at the other mode.
    pub fn toggle_glyph(self) -> &'static str {
        match self {
            DisplayMode::Light => "🌜",
            DisplayMode::Dark => "🌞",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Dark => "dark",
            DisplayMode::Light => "light",
        }
    }

    pub fn colors(self) -> &'static ThemeColors {
        match self {
            DisplayMode::Dark => &DARK,
            DisplayMode::Light => &LIGHT,
        }
    }
}

/// Mode a page opens in: the dark default, toggled once before 21:00.
pub fn initial_mode(hour: u32) -> DisplayMode {
    let mode = DisplayMode::Dark;
    if hour < DARK_FROM_HOUR {
        mode.toggle()
    } else {
        mode
    }
}

#[derive(Debug)]
pub struct ThemeColors {
    pub background: &'static str,
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
    pub card_fill: &'static str,
    pub card_stroke: &'static str,
    pub heat_text: &'static str,
}

pub const LIGHT: ThemeColors = ThemeColors {
    background: "white",
    text_primary: "#4A4A4A",
    text_secondary: "#888888",
    card_fill: "white",
    card_stroke: "#6B6B6B",
    // Badge text
    heat_text: "#1a1a1a",
};

pub const DARK: ThemeColors = ThemeColors {
    background: "#1a1a1a",
    text_primary: "#E0E0E0",
    text_secondary: "#AAAAAA",
    card_fill: "#2a2a2a",
    card_stroke: "#9B9B9B",
    heat_text: "#1a1a1a",
};
