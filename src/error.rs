//! Error types for treemorph.
//!
//! Configuration problems are caught when a batch is built, never mid-frame.
//! The frame loop itself cannot fail.

use thiserror::Error;

/// Errors raised while validating or building a particle batch.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// A batch was configured with no particles.
    #[error("particle count must be greater than zero")]
    ZeroCount,

    /// A batch was configured with no colors to draw from.
    #[error("palette must contain at least one color")]
    EmptyPalette,

    /// A palette entry could not be parsed as a hex color.
    #[error("invalid color '{0}', expected #RRGGBB or #RGB")]
    InvalidColor(String),

    /// A numeric parameter is out of its valid domain.
    #[error("invalid value {value} for parameter '{name}'")]
    InvalidParameter {
        /// Parameter name as it appears in the config.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// Every batch of a scene was rejected.
    #[error("no valid batches ({skipped} skipped)")]
    NoValidBatches {
        /// Number of batches that failed to build.
        skipped: usize,
    },

    /// Wraps an error with the name of the batch it came from.
    #[error("batch '{name}': {source}")]
    Batch {
        /// Batch name.
        name: String,
        /// Underlying problem.
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Attach a batch name to this error.
    pub fn in_batch(self, name: &str) -> Self {
        ConfigError::Batch {
            name: name.to_string(),
            source: Box::new(self),
        }
    }
}

/// Errors that can occur when loading or saving a scene configuration.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Failed to read or write the config file.
    #[error("failed to access scene config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid JSON for a scene.
    #[error("failed to parse scene config: {0}")]
    Json(#[from] serde_json::Error),

    /// The config parsed but describes an invalid scene.
    #[error("invalid scene config: {0}")]
    Config(#[from] ConfigError),
}

/// Errors that can occur while running the interactive viewer.
#[cfg(feature = "viewer")]
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    /// The surface reports no texture formats for this adapter.
    #[error("surface is not supported by the adapter")]
    UnsupportedSurface,

    /// Scene could not be loaded or built.
    #[error(transparent)]
    Scene(#[from] SceneError),
}
