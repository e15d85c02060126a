//! A batch: one role's particles, its transition and its output buffer.

use crate::compositor::{compose, InstanceBuffer, MotionParams};
use crate::dataset::{LayoutParams, Particle, ParticleSet};
use crate::error::ConfigError;
use crate::palette::Palette;
use crate::role::Role;
use crate::transition::{Transition, TreeState};
use log::info;
use serde::{Deserialize, Serialize};

/// Configuration-level description of a batch.
///
/// Changing any of these means rebuilding the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Display name, used in logs and errors.
    pub name: String,
    /// Number of particles. Must be greater than zero.
    pub count: usize,
    /// Visual role.
    pub role: Role,
    /// Hex colors particles are tinted from. Must not be empty.
    pub palette: Vec<String>,
    /// Seed for the particle layout. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl BatchConfig {
    /// Config with the role's default count and palette.
    pub fn for_role(role: Role) -> Self {
        Self {
            name: role.name().to_string(),
            count: role.default_count(),
            role,
            palette: role.default_palette().iter().map(|s| s.to_string()).collect(),
            seed: None,
        }
    }

    /// Set the particle count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Replace the palette.
    pub fn with_palette<S: Into<String>>(mut self, palette: impl IntoIterator<Item = S>) -> Self {
        self.palette = palette.into_iter().map(Into::into).collect();
        self
    }

    /// Fix the layout seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check count and palette without building anything.
    pub fn validate(&self) -> Result<Palette, ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::ZeroCount.in_batch(&self.name));
        }
        Palette::from_hex(&self.palette).map_err(|e| e.in_batch(&self.name))
    }
}

/// Inputs the host supplies once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Layout to move toward.
    pub target: TreeState,
    /// Seconds since the animation started. Monotonic.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
}

/// A fixed-size group of particles animated and drawn together.
#[derive(Debug, Clone)]
pub struct Batch {
    config: BatchConfig,
    particles: ParticleSet,
    transition: Transition,
    buffer: InstanceBuffer,
    motion: MotionParams,
}

impl Batch {
    /// Build a batch, starting fully scattered.
    pub fn new(
        config: BatchConfig,
        layout: &LayoutParams,
        motion: &MotionParams,
    ) -> Result<Self, ConfigError> {
        let palette = config.validate()?;
        motion.validate().map_err(|e| e.in_batch(&config.name))?;

        let transition = Transition::new(motion.damping_rate, motion.snap_epsilon)
            .map_err(|e| e.in_batch(&config.name))?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let particles = ParticleSet::build(config.count, config.role, &palette, layout, seed)
            .map_err(|e| e.in_batch(&config.name))?;
        let buffer = InstanceBuffer::new(particles.particles());

        Ok(Self {
            particles,
            transition,
            buffer,
            motion: *motion,
            config,
        })
    }

    /// Replace the particle set with one built from `config`.
    ///
    /// Progress carries over so a rebuild never pops the animation. On error
    /// the batch is left untouched.
    pub fn reconfigure(
        &mut self,
        config: BatchConfig,
        layout: &LayoutParams,
    ) -> Result<(), ConfigError> {
        let progress = self.transition.progress();
        let mut rebuilt = Batch::new(config, layout, &self.motion)?;
        rebuilt.transition = rebuilt.transition.with_progress(progress);

        info!(
            "reconfigured batch '{}': {} {} particles",
            rebuilt.config.name,
            rebuilt.len(),
            rebuilt.config.role
        );
        *self = rebuilt;
        Ok(())
    }

    /// Run one frame: update progress, then compose every transform.
    pub fn advance(&mut self, frame: &FrameInput) -> f32 {
        let progress = self.transition.update(frame.target, frame.delta);
        compose(
            self.particles.particles(),
            progress,
            frame.elapsed,
            &self.motion,
            &mut self.buffer,
        );
        progress
    }

    /// Batch name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Batch role.
    pub fn role(&self) -> Role {
        self.config.role
    }

    /// Configuration this batch was built from.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Current transition progress.
    pub fn progress(&self) -> f32 {
        self.transition.progress()
    }

    /// Static particle data.
    pub fn particles(&self) -> &[Particle] {
        self.particles.particles()
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Always `false` for a built batch.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Output buffer for reading.
    pub fn buffer(&self) -> &InstanceBuffer {
        &self.buffer
    }

    /// Output buffer for the renderer to drain.
    pub fn buffer_mut(&mut self) -> &mut InstanceBuffer {
        &mut self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(target: TreeState, elapsed: f32) -> FrameInput {
        FrameInput {
            target,
            elapsed,
            delta: 1.0 / 60.0,
        }
    }

    #[test]
    fn test_for_role_defaults() {
        let config = BatchConfig::for_role(Role::Ornaments);
        assert_eq!(config.name, "ornaments");
        assert_eq!(config.count, 350);
        assert_eq!(config.palette.len(), 3);
    }

    #[test]
    fn test_zero_count_names_batch() {
        let config = BatchConfig::for_role(Role::Needles).with_count(0);
        let err = Batch::new(config, &LayoutParams::default(), &MotionParams::default())
            .unwrap_err();
        match err {
            ConfigError::Batch { name, source } => {
                assert_eq!(name, "needles");
                assert!(matches!(*source, ConfigError::ZeroCount));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_empty_palette_rejected() {
        let config = BatchConfig::for_role(Role::Needles).with_palette(Vec::<String>::new());
        assert!(Batch::new(config, &LayoutParams::default(), &MotionParams::default()).is_err());
    }

    #[test]
    fn test_advance_fills_buffer() {
        let config = BatchConfig::for_role(Role::Needles).with_count(50).with_seed(1);
        let mut batch = Batch::new(config, &LayoutParams::default(), &MotionParams::default())
            .unwrap();
        assert_eq!(batch.progress(), 0.0);

        let p = batch.advance(&frame(TreeState::Tree, 0.0));
        assert!(p > 0.0);
        assert_eq!(batch.buffer().len(), 50);
        assert_eq!(batch.buffer().generation(), 1);
        assert!(batch.buffer_mut().take_dirty().is_some());
    }

    #[test]
    fn test_reconfigure_keeps_progress() {
        let layout = LayoutParams::default();
        let config = BatchConfig::for_role(Role::Needles).with_count(20).with_seed(2);
        let mut batch = Batch::new(config.clone(), &layout, &MotionParams::default()).unwrap();
        for i in 0..40 {
            batch.advance(&frame(TreeState::Tree, i as f32 / 60.0));
        }
        let before = batch.progress();

        batch.reconfigure(config.with_count(80), &layout).unwrap();
        assert_eq!(batch.len(), 80);
        assert_eq!(batch.buffer().len(), 80);
        assert_eq!(batch.progress(), before);
    }

    #[test]
    fn test_failed_reconfigure_leaves_batch() {
        let layout = LayoutParams::default();
        let config = BatchConfig::for_role(Role::Ornaments).with_count(10).with_seed(3);
        let mut batch = Batch::new(config.clone(), &layout, &MotionParams::default()).unwrap();
        let before = batch.particles().to_vec();

        assert!(batch.reconfigure(config.with_count(0), &layout).is_err());
        assert_eq!(batch.particles(), before.as_slice());
    }
}
