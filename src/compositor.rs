//! Frame compositor: turns static particle data plus the current progress
//! into per-instance transforms.
//!
//! The output buffer is sized once when the batch is built. Each frame
//! overwrites every slot in place and then bumps the generation counter a
//! single time, so a renderer sees either the whole previous frame or the
//! whole new one.

use crate::dataset::{finite, non_negative, Particle};
use crate::error::ConfigError;
use crate::transition::{DEFAULT_DAMPING_RATE, DEFAULT_SNAP_EPSILON};
use crate::Vec3;
use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat};
use log::error;
use serde::{Deserialize, Serialize};

/// One particle's transform, laid out for an instance vertex buffer.
///
/// 32 bytes: position and scale share the first 16, rotation and padding
/// the second.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct InstanceTransform {
    /// World position.
    pub position: [f32; 3],
    /// Uniform scale.
    pub scale: f32,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: [f32; 3],
    pub _padding: f32,
}

impl InstanceTransform {
    /// Pack a transform.
    #[inline]
    pub fn new(position: Vec3, rotation: Vec3, scale: f32) -> Self {
        Self {
            position: position.to_array(),
            scale,
            rotation: rotation.to_array(),
            _padding: 0.0,
        }
    }

    /// Position as a vector.
    #[inline]
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Rotation as a vector of Euler angles.
    #[inline]
    pub fn rotation(&self) -> Vec3 {
        Vec3::from_array(self.rotation)
    }

    /// Model matrix: scale, then rotate (XYZ), then translate.
    pub fn to_matrix(&self) -> Mat4 {
        let [x, y, z] = self.rotation;
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, x, y, z),
            self.position(),
        )
    }
}

/// Per-frame motion tuning shared by every batch in a scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionParams {
    /// How quickly progress chases its target (per second).
    pub damping_rate: f32,
    /// Distance at which progress snaps onto its target.
    pub snap_epsilon: f32,
    /// Continuous spin on the x and y axes (radians per second).
    pub spin_rate: f32,
    /// Wobble radius when fully scattered.
    pub noise_amplitude: f32,
    /// Phase offset between consecutive particle ids.
    pub noise_phase_step: f32,
    /// Wobble is only applied while progress is below this.
    pub noise_cutoff: f32,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            damping_rate: DEFAULT_DAMPING_RATE,
            snap_epsilon: DEFAULT_SNAP_EPSILON,
            spin_rate: 0.2,
            noise_amplitude: 0.5,
            noise_phase_step: 0.1,
            noise_cutoff: 0.9,
        }
    }
}

impl MotionParams {
    /// Reject negative rates and non-finite values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("damping_rate", self.damping_rate)?;
        non_negative("snap_epsilon", self.snap_epsilon)?;
        finite("spin_rate", self.spin_rate)?;
        non_negative("noise_amplitude", self.noise_amplitude)?;
        finite("noise_phase_step", self.noise_phase_step)?;
        finite("noise_cutoff", self.noise_cutoff)?;
        Ok(())
    }
}

/// Fixed-length transform and color storage for one batch.
#[derive(Debug, Clone)]
pub struct InstanceBuffer {
    transforms: Vec<InstanceTransform>,
    colors: Vec<[f32; 4]>,
    generation: u64,
    dirty: bool,
    colors_dirty: bool,
}

impl InstanceBuffer {
    /// Allocate slots for `particles` and write their colors.
    ///
    /// Particles without a color render white.
    pub fn new(particles: &[Particle]) -> Self {
        let colors = particles
            .iter()
            .map(|p| p.color.unwrap_or(Vec3::ONE).extend(1.0).to_array())
            .collect();

        Self {
            transforms: vec![InstanceTransform::default(); particles.len()],
            colors,
            generation: 0,
            dirty: false,
            colors_dirty: true,
        }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// Whether there are no slots.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Transforms from the most recent frame.
    #[inline]
    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// RGBA colors, fixed since construction.
    #[inline]
    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    /// Number of frames composed into this buffer.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a composed frame is waiting for upload.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Hand out the latest frame once; `None` until the next frame lands.
    pub fn take_dirty(&mut self) -> Option<&[InstanceTransform]> {
        if self.dirty {
            self.dirty = false;
            Some(&self.transforms)
        } else {
            None
        }
    }

    /// Hand out the colors the first time only.
    pub fn take_colors(&mut self) -> Option<&[[f32; 4]]> {
        if self.colors_dirty {
            self.colors_dirty = false;
            Some(&self.colors)
        } else {
            None
        }
    }

    fn finish_frame(&mut self) {
        self.generation += 1;
        self.dirty = true;
    }
}

/// Write one frame of transforms for `particles` into `out`.
///
/// Position blends linearly from the scatter target to the tree target by
/// `progress`. While still mostly scattered, each particle also wobbles on
/// x and y with a phase seeded by its id; the wobble fades to nothing as
/// progress approaches 1. Spin on x and y runs regardless of progress.
///
/// `out` must have one slot per particle. On a length mismatch nothing is
/// written and the generation stays put, so a renderer never sees a
/// partially updated frame.
pub fn compose(
    particles: &[Particle],
    progress: f32,
    elapsed: f32,
    motion: &MotionParams,
    out: &mut InstanceBuffer,
) {
    if particles.len() != out.len() {
        error!(
            "compose: {} particles for a buffer of {} slots, frame dropped",
            particles.len(),
            out.len()
        );
        return;
    }

    let t = progress.clamp(0.0, 1.0);
    let keep = 1.0 - t;
    let wobble = if t < motion.noise_cutoff {
        keep * motion.noise_amplitude
    } else {
        0.0
    };
    let spin = elapsed * motion.spin_rate;

    for (slot, p) in out.transforms.iter_mut().zip(particles) {
        // Exact at both ends: t = 1 yields the tree target bit for bit
        let mut position = p.scatter_position * keep + p.tree_position * t;
        if wobble > 0.0 {
            let (sin, cos) = (elapsed + p.id as f32 * motion.noise_phase_step).sin_cos();
            position.x += sin * wobble;
            position.y += cos * wobble;
        }

        let rotation = Vec3::new(
            p.base_rotation.x + spin,
            p.base_rotation.y + spin,
            p.base_rotation.z,
        );

        *slot = InstanceTransform::new(position, rotation, p.scale);
    }

    out.finish_frame();
}
