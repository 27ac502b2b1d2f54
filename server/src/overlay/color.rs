//! Fixed overlay color table
//!
//! Names are canonical and case-sensitive. Every name maps to exactly one
//! RGB triple; unknown names fail resolution so that bad client input is
//! surfaced instead of silently tinted pink.

use serde::Serialize;

use super::OverlayError;

/// A color from the fixed overlay palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorName {
    Pink,
    Blue,
    Silver,
    Green,
    Gold,
    Aqua,
    Red,
    Yellow,
    Purple,
}

/// Entry in the color listing response
#[derive(Debug, Clone, Serialize)]
pub struct ColorListItem {
    pub name: &'static str,
    pub hex: String,
}

impl ColorName {
    /// All palette colors, in display order
    pub const ALL: &'static [ColorName] = &[
        ColorName::Pink,
        ColorName::Blue,
        ColorName::Silver,
        ColorName::Green,
        ColorName::Gold,
        ColorName::Aqua,
        ColorName::Red,
        ColorName::Yellow,
        ColorName::Purple,
    ];

    /// Resolve a canonical color name
    pub fn from_name(name: &str) -> Result<Self, OverlayError> {
        match name {
            "Pink" => Ok(ColorName::Pink),
            "Blue" => Ok(ColorName::Blue),
            "Silver" => Ok(ColorName::Silver),
            "Green" => Ok(ColorName::Green),
            "Gold" => Ok(ColorName::Gold),
            "Aqua" => Ok(ColorName::Aqua),
            "Red" => Ok(ColorName::Red),
            "Yellow" => Ok(ColorName::Yellow),
            "Purple" => Ok(ColorName::Purple),
            _ => Err(OverlayError::InvalidColor(name.to_string())),
        }
    }

    /// Canonical display name
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorName::Pink => "Pink",
            ColorName::Blue => "Blue",
            ColorName::Silver => "Silver",
            ColorName::Green => "Green",
            ColorName::Gold => "Gold",
            ColorName::Aqua => "Aqua",
            ColorName::Red => "Red",
            ColorName::Yellow => "Yellow",
            ColorName::Purple => "Purple",
        }
    }

    /// Canonical RGB value
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            ColorName::Pink => [0xFF, 0x69, 0xB4],
            ColorName::Blue => [0x00, 0x00, 0xFF],
            ColorName::Silver => [0xC0, 0xC0, 0xC0],
            ColorName::Green => [0x00, 0x80, 0x00],
            ColorName::Gold => [0xFF, 0xD7, 0x00],
            ColorName::Aqua => [0x00, 0xFF, 0xFF],
            ColorName::Red => [0xFF, 0x00, 0x00],
            ColorName::Yellow => [0xFF, 0xFF, 0x00],
            ColorName::Purple => [0x80, 0x00, 0x80],
        }
    }

    /// Hex string for the color listing endpoint
    pub fn hex(&self) -> String {
        let [r, g, b] = self.rgb();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Build the full palette listing
    pub fn list() -> Vec<ColorListItem> {
        Self::ALL
            .iter()
            .map(|c| ColorListItem {
                name: c.as_str(),
                hex: c.hex(),
            })
            .collect()
    }
}
