//! Config store for loading and saving rigger.toml.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{RiggerConfig, parser};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
    data_dir: PathBuf,
}

impl ConfigStore {
    /// Store for the per-user config file of the current user.
    pub fn from_default_location() -> anyhow::Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(Self::from_home(&home_dir))
    }

    /// Store for the per-user config file below `home_dir`.
    pub fn from_home(home_dir: &Path) -> Self {
        Self::from_paths(
            super::paths::default_config_path(home_dir),
            super::paths::default_data_dir(home_dir),
        )
    }

    /// `data_dir` roots the defaults used when the file does not exist.
    pub fn from_paths(config_path: PathBuf, data_dir: PathBuf) -> Self {
        Self {
            config_path,
            data_dir,
        }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> anyhow::Result<RiggerConfig> {
        if !self.config_path.exists() {
            tracing::debug!(
                "No config at {}, using defaults under {}",
                self.config_path.display(),
                self.data_dir.display()
            );
            return Ok(RiggerConfig::rooted_at(&self.data_dir));
        }
        parser::parse_rigger_toml(&self.config_path)
    }

    pub fn save(&self, config: &RiggerConfig) -> anyhow::Result<()> {
        let content = parser::to_toml(config)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.config_path, content).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;
        Ok(())
    }
}
