//! Per-particle static attributes.
//!
//! A [`ParticleSet`] is built once per batch configuration. Both layout
//! targets are computed up front so the frame loop only blends between them.

use crate::error::ConfigError;
use crate::palette::Palette;
use crate::role::Role;
use crate::spawn::{SpawnContext, TreeShape};
use crate::Vec3;
use log::debug;
use serde::{Deserialize, Serialize};

/// Static data for one particle. Never changes after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Stable index within the batch; also the phase seed for wobble.
    pub id: u32,
    /// Where the particle rests when scattered.
    pub scatter_position: Vec3,
    /// Where the particle rests on the tree.
    pub tree_position: Vec3,
    /// Euler angles (XYZ order) the particle starts from.
    pub base_rotation: Vec3,
    /// Uniform size multiplier.
    pub scale: f32,
    /// Tint drawn from the batch palette.
    pub color: Option<Vec3>,
}

/// Geometry of the two layouts and the jitter applied to them.
///
/// Jitter spans are full widths: a span of 0.5 perturbs by up to +-0.25.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    /// Radius of the scatter sphere.
    pub scatter_radius: f32,
    /// Spiral cone for the tree layout.
    pub tree: TreeShape,
    /// Perturbation of the index-to-height ratio.
    pub ratio_jitter: f32,
    /// Perturbation of tree targets on x and z.
    pub lateral_jitter: f32,
    /// Perturbation of tree targets on y.
    pub vertical_jitter: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            scatter_radius: 12.0,
            tree: TreeShape::default(),
            ratio_jitter: 0.1,
            lateral_jitter: 0.5,
            vertical_jitter: 0.2,
        }
    }
}

impl LayoutParams {
    /// Reject non-finite values and non-positive sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("scatter_radius", self.scatter_radius)?;
        positive("tree.height", self.tree.height)?;
        positive("tree.base_radius", self.tree.base_radius)?;
        finite("tree.half_turns", self.tree.half_turns)?;
        non_negative("ratio_jitter", self.ratio_jitter)?;
        non_negative("lateral_jitter", self.lateral_jitter)?;
        non_negative("vertical_jitter", self.vertical_jitter)?;
        Ok(())
    }
}

pub(crate) fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

pub(crate) fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter { name, value })
    }
}

/// Immutable particle array for one batch.
#[derive(Debug, Clone)]
pub struct ParticleSet {
    role: Role,
    particles: Vec<Particle>,
}

impl ParticleSet {
    /// Build `count` particles for `role`, coloring them from `palette`.
    ///
    /// Every draw comes from an RNG seeded with `seed`, so the same inputs
    /// always produce the same set.
    pub fn build(
        count: usize,
        role: Role,
        palette: &Palette,
        layout: &LayoutParams,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if count == 0 {
            return Err(ConfigError::ZeroCount);
        }
        let count_u32 = u32::try_from(count).map_err(|_| ConfigError::InvalidParameter {
            name: "count",
            value: count as f32,
        })?;
        layout.validate()?;

        let (scale_min, scale_max) = role.scale_range();
        let offset_step = role.offset_step();
        let mut ctx = SpawnContext::new(count_u32, seed);

        let particles = (0..count_u32)
            .map(|i| {
                ctx.index = i;

                let scatter_position = ctx.random_in_sphere(layout.scatter_radius);

                // Loosen the index-to-height mapping so the spiral is not mechanical
                let ratio = (ctx.progress() + ctx.jitter(layout.ratio_jitter)).clamp(0.0, 1.0);
                let mut tree_position = layout.tree.point(ratio, i as f32 * offset_step);
                tree_position.x += ctx.jitter(layout.lateral_jitter);
                tree_position.z += ctx.jitter(layout.lateral_jitter);
                tree_position.y += ctx.jitter(layout.vertical_jitter);

                let scale = ctx.random_range(scale_min, scale_max);
                let base_rotation =
                    Vec3::new(ctx.random_angle(), ctx.random_angle(), ctx.random_angle());
                let color = palette.pick(&mut ctx);

                Particle {
                    id: i,
                    scatter_position,
                    tree_position,
                    base_rotation,
                    scale,
                    color: Some(color),
                }
            })
            .collect();

        debug!("built {} {} particles (seed {:#x})", count, role, seed);

        Ok(Self { role, particles })
    }

    /// Role this set was built for.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Particles in index order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of particles. Never zero.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Always `false` for a successfully built set.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
