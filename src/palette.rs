//! Discrete color palettes.
//!
//! Particles pick one palette entry each; colors are never blended.

use crate::error::ConfigError;
use crate::spawn::SpawnContext;
use crate::Vec3;

/// A non-empty list of RGB colors (each channel 0.0-1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Vec3>,
}

impl Palette {
    /// Build a palette from RGB colors.
    pub fn new(colors: Vec<Vec3>) -> Result<Self, ConfigError> {
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self { colors })
    }

    /// Build a palette from hex strings such as `"#D4AF37"`.
    pub fn from_hex<S: AsRef<str>>(entries: &[S]) -> Result<Self, ConfigError> {
        let colors = entries
            .iter()
            .map(|s| parse_hex(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// All colors in the palette.
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Number of colors. Always at least one.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Draw one color uniformly.
    pub fn pick(&self, ctx: &mut SpawnContext) -> Vec3 {
        self.colors[ctx.random_index(self.colors.len())]
    }
}

/// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB` into normalized RGB.
pub fn parse_hex(input: &str) -> Result<Vec3, ConfigError> {
    let invalid = || ConfigError::InvalidColor(input.to_string());
    let hex = input.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() {
        return Err(invalid());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    let (r, g, b) = match hex.len() {
        6 => (channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?),
        // #abc is shorthand for #aabbcc
        3 => (
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        ),
        _ => return Err(invalid()),
    };

    Ok(Vec3::new(r as f32, g as f32, b as f32) / 255.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_long_and_short() {
        let gold = parse_hex("#D4AF37").unwrap();
        assert!((gold.x - 212.0 / 255.0).abs() < 1e-6);
        assert!((gold.y - 175.0 / 255.0).abs() < 1e-6);
        assert!((gold.z - 55.0 / 255.0).abs() < 1e-6);

        assert_eq!(parse_hex("fff").unwrap(), Vec3::ONE);
        assert_eq!(parse_hex("#f00").unwrap(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        for bad in ["", "#12345", "#gg0000", "red", "#ff00ff00", "#é00"] {
            assert!(matches!(parse_hex(bad), Err(ConfigError::InvalidColor(_))), "{bad}");
        }
    }

    #[test]
    fn test_empty_palette_rejected() {
        let empty: [&str; 0] = [];
        assert!(matches!(Palette::from_hex(&empty), Err(ConfigError::EmptyPalette)));
    }

    #[test]
    fn test_pick_stays_in_palette() {
        let palette = Palette::from_hex(&["#004d25", "#005c2e", "#003319"]).unwrap();
        let mut ctx = SpawnContext::new(1, 11);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let c = palette.pick(&mut ctx);
            let i = palette.colors().iter().position(|p| *p == c).unwrap();
            seen[i] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
