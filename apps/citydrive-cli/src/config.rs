//! Session configuration file: motion tuning, camera and key bindings.
//!
//! Every section is optional. `.json` files are read as JSON, anything else
//! as YAML.

use anyhow::{Context, Result};
use citydrive_input::KeyBindings;
use citydrive_kernel::MotionConfig;
use citydrive_render::CameraConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub motion: MotionConfig,
    pub camera: CameraConfig,
    pub bindings: KeyBindings,
}

impl DriveConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        let config: Self = if is_json {
            serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        } else {
            serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))?
        };
        config.motion.validate()?;
        config.camera.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `path` if given, else defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }
}
