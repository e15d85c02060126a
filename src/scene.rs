//! A scene: every batch plus the star, driven by one shared state flag.
//!
//! Batches never read each other's data, so they can be advanced in any
//! order, including in parallel.

use crate::batch::{Batch, BatchConfig, FrameInput};
use crate::compositor::MotionParams;
use crate::config::SceneConfig;
use crate::dataset::LayoutParams;
use crate::error::ConfigError;
use crate::star::Star;
use crate::transition::TreeState;
use log::{error, info};
use rayon::prelude::*;

/// All batches of a scene and the state they are heading toward.
#[derive(Debug, Clone)]
pub struct Scene {
    batches: Vec<Batch>,
    /// Batches rejected at build time, in config order.
    skipped: Vec<ConfigError>,
    star: Option<Star>,
    state: TreeState,
    layout: LayoutParams,
    motion: MotionParams,
}

impl Scene {
    /// Build every batch described by `config`.
    ///
    /// A batch that fails to build is logged and left out; the rest of the
    /// scene still runs. Fails only when the shared layout or motion blocks
    /// are invalid, or when every configured batch was rejected. Batches
    /// without a seed derive one from the scene seed when that is set.
    pub fn from_config(config: &SceneConfig) -> Result<Self, ConfigError> {
        config.layout.validate()?;
        config.motion.validate()?;

        let mut batches = Vec::with_capacity(config.batches.len());
        let mut skipped = Vec::new();
        for (i, batch) in config.batches.iter().enumerate() {
            let mut batch = batch.clone();
            if batch.seed.is_none() {
                batch.seed = config.seed.map(|seed| derive_seed(seed, i));
            }
            match Batch::new(batch, &config.layout, &config.motion) {
                Ok(batch) => batches.push(batch),
                Err(err) => {
                    error!("skipping {err}");
                    skipped.push(err);
                }
            }
        }

        if batches.is_empty() && !skipped.is_empty() {
            return Err(ConfigError::NoValidBatches {
                skipped: skipped.len(),
            });
        }

        let total: usize = batches.iter().map(Batch::len).sum();
        info!("scene ready: {} batches, {} particles", batches.len(), total);

        Ok(Self {
            batches,
            skipped,
            star: config.star.enabled.then(|| Star::new(config.star)),
            state: config.initial_state,
            layout: config.layout,
            motion: config.motion,
        })
    }

    /// State the batches are moving toward.
    pub fn state(&self) -> TreeState {
        self.state
    }

    /// Set the target state. Progress is never reset.
    pub fn set_state(&mut self, state: TreeState) {
        if state != self.state {
            info!("state -> {:?}", state);
            self.state = state;
        }
    }

    /// Flip the target state and return the new one.
    pub fn toggle(&mut self) -> TreeState {
        self.set_state(self.state.toggled());
        self.state
    }

    /// Advance every batch and the star by one frame.
    pub fn update(&mut self, elapsed: f32, delta: f32) {
        let frame = self.frame(elapsed, delta);
        for batch in &mut self.batches {
            batch.advance(&frame);
        }
        self.update_star(&frame);
    }

    /// Like [`Scene::update`], advancing batches on the rayon pool.
    pub fn update_parallel(&mut self, elapsed: f32, delta: f32) {
        let frame = self.frame(elapsed, delta);
        self.batches.par_iter_mut().for_each(|batch| {
            batch.advance(&frame);
        });
        self.update_star(&frame);
    }

    fn frame(&self, elapsed: f32, delta: f32) -> FrameInput {
        FrameInput {
            target: self.state,
            elapsed,
            delta,
        }
    }

    fn update_star(&mut self, frame: &FrameInput) {
        if let Some(star) = &mut self.star {
            star.update(frame.target, frame.elapsed, frame.delta);
        }
    }

    /// Rebuild the batch at `index` from a new config.
    ///
    /// On error the old batch stays in place and keeps animating.
    pub fn reconfigure_batch(
        &mut self,
        index: usize,
        config: BatchConfig,
    ) -> Result<(), ConfigError> {
        let layout = self.layout;
        let batch = self.batches.get_mut(index).ok_or(ConfigError::InvalidParameter {
            name: "batch index",
            value: index as f32,
        })?;
        batch.reconfigure(config, &layout)
    }

    /// Errors of the batches left out when the scene was built.
    pub fn skipped(&self) -> &[ConfigError] {
        &self.skipped
    }

    /// All batches in config order.
    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    /// Mutable access for renderers draining buffers.
    pub fn batches_mut(&mut self) -> &mut [Batch] {
        &mut self.batches
    }

    /// Batch by name.
    pub fn batch(&self, name: &str) -> Option<&Batch> {
        self.batches.iter().find(|b| b.name() == name)
    }

    /// The star, if enabled.
    pub fn star(&self) -> Option<&Star> {
        self.star.as_ref()
    }

    /// Geometry every batch was laid out with.
    pub fn layout(&self) -> &LayoutParams {
        &self.layout
    }

    /// Motion tuning shared by every batch.
    pub fn motion(&self) -> &MotionParams {
        &self.motion
    }

    /// Total particle count over all batches.
    pub fn particle_count(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }
}

/// Spread one scene seed over several batches.
fn derive_seed(seed: u64, index: usize) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
