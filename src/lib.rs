//! # treemorph
//!
//! Particles that morph between a scattered cloud and a spiral cone tree.
//!
//! Every particle carries two fixed positions, one inside a sphere and one on
//! a spiral around a cone. A single damped `progress` value moves from 0
//! (scattered) to 1 (tree) and back, and each frame the compositor blends the
//! two positions, adds a wobble while the shape is still forming, spins each
//! particle and writes one [`InstanceTransform`] per particle into a buffer a
//! renderer can upload as-is.
//!
//! ## Quick Start
//!
//! ```ignore
//! use treemorph::prelude::*;
//!
//! let mut scene = Scene::from_config(&SceneConfig::default())?;
//! scene.set_state(TreeState::Tree);
//!
//! let mut time = Time::new();
//! loop {
//!     let (elapsed, delta) = time.update();
//!     scene.update(elapsed, delta);
//!     for batch in scene.batches_mut() {
//!         if let Some(transforms) = batch.buffer_mut().take_dirty() {
//!             // upload `bytemuck::cast_slice(transforms)`
//!         }
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Batches
//!
//! A [`Batch`] is a fixed number of particles sharing a [`Role`] and a
//! [`Palette`]. Its particle data is generated once from a seed and never
//! changes; only the [`Transition`] progress and the output buffer move.
//!
//! ### State
//!
//! The host owns one [`TreeState`] flag per [`Scene`]. Flipping it mid-way
//! reverses the motion from wherever progress currently is.
//!
//! ### Viewer
//!
//! With the `viewer` feature the crate also ships a wgpu/winit window that
//! draws each batch as instanced low-poly meshes with a pulsing star on top.

pub mod batch;
pub mod camera;
pub mod compositor;
pub mod config;
pub mod dataset;
pub mod error;
pub mod mesh;
pub mod palette;
pub mod role;
pub mod scene;
pub mod shader;
pub mod spawn;
pub mod star;
pub mod time;
pub mod transition;

#[cfg(feature = "viewer")]
mod gpu;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use bytemuck;
pub use glam::{Mat4, Quat, Vec3, Vec4};

pub use batch::{Batch, BatchConfig, FrameInput};
pub use compositor::{compose, InstanceBuffer, InstanceTransform, MotionParams};
pub use config::SceneConfig;
pub use dataset::{LayoutParams, Particle, ParticleSet};
pub use error::{ConfigError, SceneError};
pub use palette::Palette;
pub use role::Role;
pub use scene::Scene;
pub use spawn::{SpawnContext, TreeShape};
pub use star::{Star, StarConfig};
pub use transition::{Transition, TreeState};

/// Common imports for driving a scene.
///
/// ```ignore
/// use treemorph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::batch::{Batch, BatchConfig, FrameInput};
    pub use crate::compositor::{InstanceBuffer, InstanceTransform, MotionParams};
    pub use crate::config::SceneConfig;
    pub use crate::dataset::LayoutParams;
    pub use crate::error::{ConfigError, SceneError};
    pub use crate::palette::Palette;
    pub use crate::role::Role;
    pub use crate::scene::Scene;
    pub use crate::star::StarConfig;
    pub use crate::time::Time;
    pub use crate::transition::TreeState;
    pub use crate::Vec3;

    #[cfg(feature = "viewer")]
    pub use crate::viewer::{run, ViewerOptions};
}
