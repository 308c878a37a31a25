//! Color materials applied to selected items

use serde::{Deserialize, Serialize};

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Material used to paint an item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorMaterial {
    /// Diffuse color
    pub diffuse: Rgba,
    /// Overall opacity (0-255)
    pub opacity: u8,
    /// Specular exponent
    pub glossiness: u8,
    pub specular: Rgba,
    pub ambient: Rgba,
    pub emissive: Rgba,
}

impl ColorMaterial {
    /// Opaque material with the given diffuse color and stock lighting
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            diffuse: Rgba::new(r, g, b, 255),
            opacity: 255,
            glossiness: 10,
            specular: Rgba::new(255, 255, 255, 0),
            ambient: Rgba::new(0, 0, 0, 0),
            emissive: Rgba::new(0, 0, 0, 0),
        }
    }

    pub const fn with_glossiness(self, glossiness: u8) -> Self {
        Self { glossiness, ..self }
    }

    pub const fn with_specular(self, specular: Rgba) -> Self {
        Self { specular, ..self }
    }
}

/// Yellow highlight for the selected item
pub const HIGHLIGHT: ColorMaterial = ColorMaterial::from_rgb(255, 255, 0)
    .with_glossiness(4)
    .with_specular(Rgba::new(255, 255, 255, 0));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight() {
        assert_eq!(HIGHLIGHT.diffuse, Rgba::new(255, 255, 0, 255));
        assert_eq!(HIGHLIGHT.opacity, 255);
        assert_eq!(HIGHLIGHT.glossiness, 4);
        assert_eq!(HIGHLIGHT.specular, Rgba::new(255, 255, 255, 0));
    }
}
