//! Transition controller: one damped progress scalar per batch.
//!
//! Progress 0.0 means fully scattered, 1.0 means fully assembled into the
//! tree. Each frame the scalar moves a fixed fraction of the remaining
//! distance toward its target, scaled by the frame delta, so the approach
//! is exponential and independent of frame rate. Flipping the target
//! mid-flight just changes where the scalar is heading.

use crate::dataset::non_negative;
use crate::error::ConfigError;
use log::warn;
use serde::{Deserialize, Serialize};

/// Layout the host wants the particles to settle into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeState {
    /// Particles drift in a loose sphere.
    #[default]
    Scattered,
    /// Particles assemble into the spiral cone.
    Tree,
}

impl TreeState {
    /// Progress value this state pulls toward.
    #[inline]
    pub fn target(self) -> f32 {
        match self {
            TreeState::Scattered => 0.0,
            TreeState::Tree => 1.0,
        }
    }

    /// The other state.
    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            TreeState::Scattered => TreeState::Tree,
            TreeState::Tree => TreeState::Scattered,
        }
    }
}

/// Default damping rate (per second).
pub const DEFAULT_DAMPING_RATE: f32 = 2.5;
/// Default distance at which progress snaps onto its target.
pub const DEFAULT_SNAP_EPSILON: f32 = 0.001;

/// Owns the progress scalar of a single batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    progress: f32,
    damping_rate: f32,
    epsilon: f32,
}

impl Transition {
    /// Start fully scattered.
    ///
    /// Both the rate and the snap distance must be finite and non-negative.
    pub fn new(damping_rate: f32, epsilon: f32) -> Result<Self, ConfigError> {
        non_negative("damping_rate", damping_rate)?;
        non_negative("snap_epsilon", epsilon)?;
        Ok(Self {
            progress: 0.0,
            damping_rate,
            epsilon,
        })
    }

    /// Start at a given progress, clamped to `[0, 1]`.
    pub fn with_progress(mut self, progress: f32) -> Self {
        self.progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Current progress in `[0, 1]`.
    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Damping rate in use.
    #[inline]
    pub fn damping_rate(&self) -> f32 {
        self.damping_rate
    }

    /// Whether progress sits exactly on the target of `state`.
    #[inline]
    pub fn is_settled(&self, state: TreeState) -> bool {
        self.progress == state.target()
    }

    /// Advance one frame toward `state` and return the new progress.
    ///
    /// The per-frame blend factor is capped at 1 so a long frame lands on
    /// the target instead of overshooting past it. Negative or non-finite
    /// deltas count as zero.
    pub fn update(&mut self, state: TreeState, delta: f32) -> f32 {
        let delta = if delta.is_finite() && delta >= 0.0 {
            delta
        } else {
            warn!("ignoring invalid frame delta {delta}");
            0.0
        };

        let target = state.target();
        let diff = target - self.progress;
        let step = self.damping_rate * delta;
        if diff.abs() <= self.epsilon {
            self.progress = target;
        } else if step >= 1.0 {
            warn!("frame delta {delta}s jumps the transition onto its target");
            self.progress = target;
        } else {
            self.progress = (self.progress + diff * step).clamp(0.0, 1.0);
        }
        self.progress
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            progress: 0.0,
            damping_rate: DEFAULT_DAMPING_RATE,
            epsilon: DEFAULT_SNAP_EPSILON,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_starts_scattered() {
        let t = Transition::default();
        assert_eq!(t.progress(), 0.0);
        assert!(t.is_settled(TreeState::Scattered));
    }

    #[test]
    fn test_idempotent_at_target() {
        let mut t = Transition::default();
        for _ in 0..100 {
            assert_eq!(t.update(TreeState::Scattered, DT), 0.0);
        }
        let mut t = Transition::default().with_progress(1.0);
        for _ in 0..100 {
            assert_eq!(t.update(TreeState::Tree, DT), 1.0);
        }
    }

    #[test]
    fn test_converges_and_snaps() {
        let mut t = Transition::default();
        let mut frames = 0;
        while !t.is_settled(TreeState::Tree) {
            let before = t.progress();
            let after = t.update(TreeState::Tree, DT);
            assert!(after >= before);
            assert!((0.0..=1.0).contains(&after));
            frames += 1;
            assert!(frames < 1000, "did not converge");
        }
        assert_eq!(t.progress(), 1.0);

        // About 2.8 seconds at 60fps for rate 2.5
        assert!(frames > 100 && frames < 250, "frames = {frames}");
    }

    #[test]
    fn test_frame_rate_independent() {
        let mut fast = Transition::default();
        let mut slow = Transition::default();
        for _ in 0..120 {
            fast.update(TreeState::Tree, 1.0 / 120.0);
        }
        for _ in 0..30 {
            slow.update(TreeState::Tree, 1.0 / 30.0);
        }
        assert!((fast.progress() - slow.progress()).abs() < 0.05);
    }

    #[test]
    fn test_huge_delta_does_not_overshoot() {
        let mut t = Transition::default().with_progress(0.3);
        let p = t.update(TreeState::Tree, 10.0);
        assert_eq!(p, 1.0);

        let mut t = Transition::new(1000.0, 0.001).unwrap().with_progress(0.7);
        let p = t.update(TreeState::Scattered, 0.5);
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_long_frame_snaps_exactly_at_unit_step() {
        // rate * delta == 1 lands on the target, one tick less does not
        let mut t = Transition::new(2.0, 0.0).unwrap().with_progress(0.25);
        assert_eq!(t.update(TreeState::Tree, 0.5), 1.0);

        let mut t = Transition::new(2.0, 0.0).unwrap().with_progress(0.25);
        let p = t.update(TreeState::Tree, 0.49);
        assert!(p < 1.0 && p > 0.25);
    }

    #[test]
    fn test_new_rejects_bad_rates() {
        for rate in [f32::NAN, -1.0, f32::INFINITY] {
            assert!(matches!(
                Transition::new(rate, DEFAULT_SNAP_EPSILON),
                Err(ConfigError::InvalidParameter { name: "damping_rate", .. })
            ));
        }
        assert!(matches!(
            Transition::new(DEFAULT_DAMPING_RATE, -0.1),
            Err(ConfigError::InvalidParameter { name: "snap_epsilon", .. })
        ));

        let t = Transition::new(0.0, 0.0).unwrap();
        assert_eq!(t, Transition { damping_rate: 0.0, epsilon: 0.0, progress: 0.0 });
    }

    #[test]
    fn test_zero_rate_holds_progress() {
        let mut t = Transition::new(0.0, DEFAULT_SNAP_EPSILON)
            .unwrap()
            .with_progress(0.4);
        for _ in 0..60 {
            assert_eq!(t.update(TreeState::Tree, DT), 0.4);
        }
    }

    #[test]
    fn test_invalid_delta_is_ignored() {
        let mut t = Transition::default().with_progress(0.5);
        assert_eq!(t.update(TreeState::Tree, -1.0), 0.5);
        assert_eq!(t.update(TreeState::Tree, f32::NAN), 0.5);
        assert_eq!(t.update(TreeState::Tree, f32::INFINITY), 0.5);
    }

    #[test]
    fn test_reversal_is_continuous() {
        let mut t = Transition::default();
        let max_step = DEFAULT_DAMPING_RATE * DT + 1e-6;
        let mut state = TreeState::Tree;
        let mut prev = t.progress();
        for frame in 0..600 {
            // Flip faster than the damping time constant
            if frame % 17 == 0 {
                state = state.toggled();
            }
            let p = t.update(state, DT);
            assert!((p - prev).abs() <= max_step);
            prev = p;
        }
    }

    #[test]
    fn test_reversal_changes_direction_without_reset() {
        let mut t = Transition::default();
        for _ in 0..30 {
            t.update(TreeState::Tree, DT);
        }
        let mid = t.progress();
        assert!(mid > 0.3 && mid < 1.0);
        let next = t.update(TreeState::Scattered, DT);
        assert!(next < mid);
        assert!(mid - next < 0.1);
    }

    #[test]
    fn test_with_progress_clamps() {
        assert_eq!(Transition::default().with_progress(2.0).progress(), 1.0);
        assert_eq!(Transition::default().with_progress(-1.0).progress(), 0.0);
        assert_eq!(Transition::default().with_progress(f32::NAN).progress(), 0.0);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(TreeState::Scattered.toggled(), TreeState::Tree);
        assert_eq!(TreeState::Tree.toggled().toggled(), TreeState::Tree);
    }
}
