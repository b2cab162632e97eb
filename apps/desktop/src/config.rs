use anyhow::{Context, Result};
use playback::{Extent, DEFAULT_FRAME_SIZE, STEP_DELTA};
use scripts::ScriptOrder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "config.json";

/// User preferences read from `config.json` in the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Overrides the database location.
    pub db_path: Option<PathBuf>,
    pub list_order: ScriptOrder,
    /// Offset change for the step-forward and step-backward controls.
    pub step_delta: f32,
    /// Size the floating overlay opens at.
    pub overlay_size: Extent,
    /// Add the welcome script when the store is empty on startup.
    pub seed_sample: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            list_order: ScriptOrder::Title,
            step_delta: STEP_DELTA,
            overlay_size: DEFAULT_FRAME_SIZE,
            seed_sample: false,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        scripts::app_data_dir().join(CONFIG_FILE)
    }

    /// Missing or unreadable config falls back to defaults.
    pub fn load(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "failed to read config, using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str::<AppConfig>(&raw) {
            Ok(cfg) => cfg.sanitized(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create config dir {}", dir.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("write config {}", path.display()))?;
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(scripts::default_db_path)
    }

    fn sanitized(mut self) -> Self {
        if !self.step_delta.is_finite() || self.step_delta <= 0.0 {
            self.step_delta = STEP_DELTA;
        }
        if !(self.overlay_size.width > 0.0 && self.overlay_size.height > 0.0) {
            self.overlay_size = DEFAULT_FRAME_SIZE;
        }
        self
    }
}
