//! Spatial distributions and the spawn context used to build particle sets.
//!
//! Two layouts are supported: a uniform volumetric scatter inside a sphere,
//! and a rising spiral on a cone (the "tree").

use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Random point inside a sphere of given radius, centered at origin.
///
/// Distribution is uniform throughout the volume: the polar angle is drawn
/// through `acos` so directions are uniform on the sphere, and the radius
/// through a cube root so density does not pile up near the center.
pub fn random_in_sphere<R: Rng + ?Sized>(rng: &mut R, radius: f32) -> Vec3 {
    let theta = TAU * rng.gen::<f32>();
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
    let r = radius * rng.gen::<f32>().cbrt();

    let sin_phi = phi.sin();
    Vec3::new(
        r * sin_phi * theta.cos(),
        r * sin_phi * theta.sin(),
        r * phi.cos(),
    )
}

/// Point on the default spiral cone.
///
/// Shorthand for [`TreeShape::point`] with the default winding.
pub fn tree_point(height: f32, base_radius: f32, ratio: f32, offset_angle: f32) -> Vec3 {
    TreeShape {
        height,
        base_radius,
        ..TreeShape::default()
    }
    .point(ratio, offset_angle)
}

/// Spiral cone the particles settle into.
///
/// The cone is centered vertically on the origin: its base sits at
/// `-height / 2` with radius `base_radius`, its apex at `+height / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeShape {
    /// Total height from base to apex.
    pub height: f32,
    /// Radius of the cone at its base.
    pub base_radius: f32,
    /// Spiral angle gained from base to apex, in multiples of PI.
    pub half_turns: f32,
}

impl Default for TreeShape {
    fn default() -> Self {
        Self {
            height: 10.0,
            base_radius: 3.5,
            half_turns: 15.0,
        }
    }
}

impl TreeShape {
    /// Point on the spiral at normalized height `ratio` (0 = base, 1 = apex).
    ///
    /// `offset_angle` rotates the point around the trunk so successive
    /// particles spread around the spiral instead of stacking.
    pub fn point(&self, ratio: f32, offset_angle: f32) -> Vec3 {
        let y = (ratio - 0.5) * self.height;
        let current_radius = self.base_radius * (1.0 - ratio);
        let angle = offset_angle + ratio * PI * self.half_turns;

        Vec3::new(angle.cos() * current_radius, y, angle.sin() * current_radius)
    }
}

/// Context threaded through particle construction.
///
/// Wraps the batch RNG and the current particle index so the builder can
/// ask for "the next random thing" without carrying the RNG around.
pub struct SpawnContext {
    /// Index of the particle being spawned (0 to count-1).
    pub index: u32,
    /// Total number of particles being spawned. Never zero.
    pub count: u32,
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context for a batch of `count` particles.
    ///
    /// The same seed always yields the same sequence of draws.
    pub(crate) fn new(count: u32, seed: u64) -> Self {
        debug_assert!(count > 0);
        Self {
            index: 0,
            count,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Normalized position of the current particle in the batch (0.0 to <1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        self.index as f32 / self.count as f32
    }

    /// Random f32 between 0.0 and 1.0.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max)`. Returns `min` for an empty range.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        if max > min {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Symmetric perturbation in `[-span/2, span/2)`.
    #[inline]
    pub fn jitter(&mut self, span: f32) -> f32 {
        (self.random() - 0.5) * span
    }

    /// Random angle in `[0, PI)`.
    #[inline]
    pub fn random_angle(&mut self) -> f32 {
        self.random() * PI
    }

    /// Random index into a collection of `len` items.
    #[inline]
    pub fn random_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        self.rng.gen_range(0..len)
    }

    /// Random point inside a sphere, see [`random_in_sphere`].
    pub fn random_in_sphere(&mut self, radius: f32) -> Vec3 {
        random_in_sphere(&mut self.rng, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_context_progress() {
        let mut ctx = SpawnContext::new(100, 7);
        ctx.index = 50;
        assert!((ctx.progress() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_random_in_sphere_bounds() {
        let mut rng = SmallRng::seed_from_u64(1);
        for radius in [0.01, 1.0, 12.0, 500.0] {
            for _ in 0..10_000 {
                let pos = random_in_sphere(&mut rng, radius);
                assert!(pos.length() <= radius * (1.0 + 1e-5));
            }
        }
    }

    #[test]
    fn test_random_in_sphere_uniform_density() {
        // Equal-volume shells: a uniform sampler puts ~1/4 of points in each.
        let mut rng = SmallRng::seed_from_u64(99);
        let radius = 12.0;
        let n = 40_000;
        let mut shells = [0usize; 4];
        for _ in 0..n {
            let r = random_in_sphere(&mut rng, radius).length() / radius;
            let v = (r * r * r).min(0.999_999);
            shells[(v * 4.0) as usize] += 1;
        }
        for count in shells {
            let frac = count as f32 / n as f32;
            assert!((frac - 0.25).abs() < 0.02, "shell fraction {frac}");
        }
    }

    #[test]
    fn test_random_in_sphere_no_axis_bias() {
        let mut rng = SmallRng::seed_from_u64(5);
        let n = 20_000;
        let mut upper = 0usize;
        let mut sum = Vec3::ZERO;
        for _ in 0..n {
            let p = random_in_sphere(&mut rng, 1.0);
            if p.z > 0.0 {
                upper += 1;
            }
            sum += p;
        }
        let frac = upper as f32 / n as f32;
        assert!((frac - 0.5).abs() < 0.02);
        assert!((sum / n as f32).length() < 0.03);
    }

    #[test]
    fn test_tree_point_endpoints() {
        for (h, r) in [(10.0, 3.5), (1.0, 0.25), (42.0, 9.0)] {
            let base = tree_point(h, r, 0.0, 0.0);
            assert!((base.y - (-h / 2.0)).abs() < 1e-6);
            let base_radius = (base.x * base.x + base.z * base.z).sqrt();
            assert!((base_radius - r).abs() < 1e-4);

            let apex = tree_point(h, r, 1.0, 0.0);
            assert!((apex.y - h / 2.0).abs() < 1e-6);
            assert!(apex.x.abs() < 1e-6);
            assert!(apex.z.abs() < 1e-6);
        }
    }

    #[test]
    fn test_tree_point_radius_shrinks_linearly() {
        let shape = TreeShape::default();
        let p = shape.point(0.5, 1.3);
        let radius = (p.x * p.x + p.z * p.z).sqrt();
        assert!((radius - shape.base_radius * 0.5).abs() < 1e-4);
        assert!(p.y.abs() < 1e-6);
    }

    #[test]
    fn test_tree_point_offset_rotates() {
        let shape = TreeShape::default();
        let a = shape.point(0.0, 0.0);
        let b = shape.point(0.0, PI);
        assert!((a.x + b.x).abs() < 1e-4);
        assert!((a.z + b.z).abs() < 1e-4);
    }

    #[test]
    fn test_jitter_span() {
        let mut ctx = SpawnContext::new(1, 3);
        for _ in 0..1000 {
            let j = ctx.jitter(0.2);
            assert!((-0.1..0.1).contains(&j));
        }
    }

    #[test]
    fn test_random_range_empty() {
        let mut ctx = SpawnContext::new(1, 3);
        assert_eq!(ctx.random_range(0.5, 0.5), 0.5);
    }
}
