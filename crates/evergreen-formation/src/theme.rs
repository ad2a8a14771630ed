//! Named color themes and geometry kinds accepted in scene files

use evergreen_core::{Color, EvergreenError, Result};

/// Ornament material color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTheme {
    Gold,
    Red,
    Silver,
}

impl ColorTheme {
    pub const KEYS: [&'static str; 3] = ["gold", "red", "silver"];

    pub fn from_key(key: &str) -> Result<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "gold" => Ok(ColorTheme::Gold),
            "red" => Ok(ColorTheme::Red),
            "silver" => Ok(ColorTheme::Silver),
            _ => Err(EvergreenError::UnknownKey {
                kind: "color theme",
                value: key.to_string(),
                allowed: Self::KEYS.to_vec(),
            }),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ColorTheme::Gold => "gold",
            ColorTheme::Red => "red",
            ColorTheme::Silver => "silver",
        }
    }

    /// Linear color decoded from the theme's sRGB hex value
    pub fn color(self) -> Color {
        match self {
            ColorTheme::Gold => Color::from_hex(0xFFD700),
            ColorTheme::Red => Color::from_hex(0x8B0000),
            ColorTheme::Silver => Color::from_hex(0xE0E0E0),
        }
    }
}

/// Shape drawn for each particle of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    /// Camera-facing sprite, foliage only
    Point,
    /// Unit cube
    Box,
    /// Sphere of radius 0.6
    Sphere,
}

impl GeometryKind {
    pub const KEYS: [&'static str; 3] = ["point", "box", "sphere"];

    /// Parse a geometry key; `cube` is accepted as a synonym for `box`
    pub fn from_key(key: &str) -> Result<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "point" => Ok(GeometryKind::Point),
            "box" | "cube" => Ok(GeometryKind::Box),
            "sphere" => Ok(GeometryKind::Sphere),
            _ => Err(EvergreenError::UnknownKey {
                kind: "geometry",
                value: key.to_string(),
                allowed: Self::KEYS.to_vec(),
            }),
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            GeometryKind::Point => "point",
            GeometryKind::Box => "box",
            GeometryKind::Sphere => "sphere",
        }
    }

    /// Whether this kind is drawn as an instanced mesh
    pub fn is_mesh(self) -> bool {
        !matches!(self, GeometryKind::Point)
    }
}
