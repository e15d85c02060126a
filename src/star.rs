//! The star crowning the tree.
//!
//! Unlike batch particles the star keeps its own position and eases toward
//! whichever anchor the current state selects, so it trails the batches
//! slightly when the state flips.

use crate::compositor::InstanceTransform;
use crate::transition::TreeState;
use crate::Vec3;
use serde::{Deserialize, Serialize};

/// Star placement and motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    /// Whether the scene has a star at all.
    pub enabled: bool,
    /// Resting point while scattered.
    pub scatter_anchor: [f32; 3],
    /// Resting point on top of the tree.
    pub tree_anchor: [f32; 3],
    /// Fraction of the remaining distance covered per second.
    pub follow_rate: f32,
    /// Spin about the vertical axis (radians per second).
    pub spin_rate: f32,
    /// Relative size change of the pulse.
    pub pulse_amplitude: f32,
    /// Pulse angular frequency (radians per second).
    pub pulse_frequency: f32,
    /// RGB tint.
    pub color: [f32; 3],
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scatter_anchor: [0.0, 15.0, 0.0],
            tree_anchor: [0.0, 10.5, 0.0],
            follow_rate: 2.0,
            spin_rate: 0.5,
            pulse_amplitude: 0.1,
            pulse_frequency: 2.0,
            // #F9E076
            color: [249.0 / 255.0, 224.0 / 255.0, 118.0 / 255.0],
        }
    }
}

/// Runtime state of the star.
#[derive(Debug, Clone)]
pub struct Star {
    config: StarConfig,
    position: Vec3,
    rotation_y: f32,
    scale: f32,
}

impl Star {
    /// Place the star on its scatter anchor.
    pub fn new(config: StarConfig) -> Self {
        Self {
            position: Vec3::from_array(config.scatter_anchor),
            rotation_y: 0.0,
            scale: 1.0,
            config,
        }
    }

    /// Anchor for `state`.
    pub fn anchor(&self, state: TreeState) -> Vec3 {
        match state {
            TreeState::Scattered => Vec3::from_array(self.config.scatter_anchor),
            TreeState::Tree => Vec3::from_array(self.config.tree_anchor),
        }
    }

    /// Advance one frame.
    pub fn update(&mut self, state: TreeState, elapsed: f32, delta: f32) {
        let delta = if delta.is_finite() { delta.max(0.0) } else { 0.0 };
        let blend = (delta * self.config.follow_rate).min(1.0);
        self.position = self.position.lerp(self.anchor(state), blend);
        self.rotation_y += delta * self.config.spin_rate;
        self.scale =
            1.0 + (elapsed * self.config.pulse_frequency).sin() * self.config.pulse_amplitude;
    }

    /// Current position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current uniform scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// RGBA tint for the renderer.
    pub fn color(&self) -> [f32; 4] {
        let [r, g, b] = self.config.color;
        [r, g, b, 1.0]
    }

    /// Transform for the renderer.
    pub fn transform(&self) -> InstanceTransform {
        InstanceTransform::new(self.position, Vec3::new(0.0, self.rotation_y, 0.0), self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_eases_to_tree_anchor() {
        let mut star = Star::new(StarConfig::default());
        assert_eq!(star.position(), Vec3::new(0.0, 15.0, 0.0));

        star.update(TreeState::Tree, 0.0, 1.0 / 60.0);
        let y = star.position().y;
        assert!(y < 15.0 && y > 10.5);

        for i in 0..600 {
            star.update(TreeState::Tree, i as f32 / 60.0, 1.0 / 60.0);
        }
        assert!((star.position().y - 10.5).abs() < 1e-3);
    }

    #[test]
    fn test_long_frame_lands_on_anchor() {
        let mut star = Star::new(StarConfig::default());
        star.update(TreeState::Tree, 0.0, 5.0);
        assert!((star.position() - Vec3::new(0.0, 10.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_pulse_and_spin() {
        let mut star = Star::new(StarConfig::default());
        let elapsed = std::f32::consts::FRAC_PI_4;
        star.update(TreeState::Scattered, elapsed, 0.5);
        // sin(pi/2) = 1
        assert!((star.scale() - 1.1).abs() < 1e-5);
        assert!((star.transform().rotation[1] - 0.25).abs() < 1e-6);
    }
}
