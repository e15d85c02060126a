//! Visual roles a batch can play.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a batch represents in the scene.
///
/// The role picks the per-particle scale range and the angular step used to
/// fan successive particles around the spiral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Many small elements forming the body of the tree.
    #[default]
    Needles,
    /// Fewer, larger decorative elements.
    Ornaments,
}

impl Role {
    /// Half-open `[min, max)` range particle scales are drawn from.
    pub fn scale_range(self) -> (f32, f32) {
        match self {
            Role::Needles => (0.05, 0.20),
            Role::Ornaments => (0.2, 0.6),
        }
    }

    /// Spiral offset added per particle index, in radians.
    pub fn offset_step(self) -> f32 {
        match self {
            Role::Needles | Role::Ornaments => 0.5,
        }
    }

    /// Particle count used when a config does not say otherwise.
    pub fn default_count(self) -> usize {
        match self {
            Role::Needles => 2500,
            Role::Ornaments => 350,
        }
    }

    /// Hex palette used when a config does not say otherwise.
    pub fn default_palette(self) -> &'static [&'static str] {
        match self {
            // Deep emerald greens
            Role::Needles => &["#004d25", "#005c2e", "#003319"],
            // Gold, bright gold, bronze
            Role::Ornaments => &["#D4AF37", "#FFD700", "#CD7F32"],
        }
    }

    /// Lowercase name, matching the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            Role::Needles => "needles",
            Role::Ornaments => "ornaments",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ornaments_are_larger() {
        let (needle_min, needle_max) = Role::Needles.scale_range();
        let (orn_min, orn_max) = Role::Ornaments.scale_range();
        assert!(needle_min < needle_max);
        assert!(orn_min < orn_max);
        assert!(orn_max - orn_min > needle_max - needle_min);
    }

    #[test]
    fn test_role_serde_names() {
        let json = serde_json::to_string(&Role::Ornaments).unwrap();
        assert_eq!(json, "\"ornaments\"");
        let role: Role = serde_json::from_str("\"needles\"").unwrap();
        assert_eq!(role, Role::Needles);
    }
}
