//! Scene configuration, stored as JSON.

use crate::batch::BatchConfig;
use crate::compositor::MotionParams;
use crate::dataset::LayoutParams;
use crate::error::{ConfigError, SceneError};
use crate::role::Role;
use crate::star::StarConfig;
use crate::transition::TreeState;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Everything needed to build a [`Scene`](crate::Scene).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Batches in draw order.
    pub batches: Vec<BatchConfig>,
    /// Scatter sphere and tree cone geometry.
    pub layout: LayoutParams,
    /// Transition and per-frame motion tuning.
    pub motion: MotionParams,
    /// The star on top.
    pub star: StarConfig,
    /// Seed for batches that do not carry their own.
    pub seed: Option<u64>,
    /// State the scene starts heading toward.
    pub initial_state: TreeState,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            batches: vec![
                BatchConfig::for_role(Role::Needles),
                BatchConfig::for_role(Role::Ornaments),
            ],
            layout: LayoutParams::default(),
            motion: MotionParams::default(),
            star: StarConfig::default(),
            seed: None,
            initial_state: TreeState::Scattered,
        }
    }
}

impl SceneConfig {
    /// Save the configuration to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a configuration from a JSON file.
    ///
    /// Invalid layout or motion blocks are an error. Invalid batches are
    /// only logged, since a scene skips them when it is built.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.layout.validate()?;
        config.motion.validate()?;
        for err in config.batch_errors() {
            warn!("{err}");
        }
        Ok(config)
    }

    /// Check every batch and parameter block without building particles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.motion.validate()?;
        match self.batch_errors().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Errors of every batch that would fail to build, in config order.
    pub fn batch_errors(&self) -> Vec<ConfigError> {
        self.batches
            .iter()
            .filter_map(|batch| batch.validate().err())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.batches.len(), 2);
        assert_eq!(config.batches[0].count, 2500);
        assert_eq!(config.batches[1].count, 350);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r##"{
            "batches": [
                { "name": "lights", "count": 12, "role": "ornaments", "palette": ["#ff0000"] }
            ],
            "motion": { "damping_rate": 4.0 }
        }"##;
        let config: SceneConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.batches.len(), 1);
        assert_eq!(config.batches[0].seed, None);
        assert_eq!(config.motion.damping_rate, 4.0);
        assert_eq!(config.motion.spin_rate, MotionParams::default().spin_rate);
        assert_eq!(config.layout, LayoutParams::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let mut config = SceneConfig::default();
        config.seed = Some(77);
        config.initial_state = TreeState::Tree;
        config.save(&path).unwrap();
        assert_eq!(SceneConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_keeps_invalid_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        fs::write(
            &path,
            r##"{ "batches": [
                { "name": "x", "count": 0, "role": "needles", "palette": ["#fff"] },
                { "name": "y", "count": 5, "role": "needles", "palette": ["#fff"] }
            ] }"##,
        )
        .unwrap();
        let config = SceneConfig::load(&path).unwrap();
        assert_eq!(config.batches.len(), 2);
        let errors = config.batch_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("'x'"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_rejects_invalid_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        fs::write(&path, r##"{ "layout": { "scatter_radius": -1.0 } }"##).unwrap();
        assert!(matches!(SceneConfig::load(&path), Err(SceneError::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            SceneConfig::load("/definitely/not/here.json"),
            Err(SceneError::Io(_))
        ));
    }
}
