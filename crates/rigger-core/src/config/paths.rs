//! Config path resolution helpers.

use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "rigger.toml";

/// Directory holding the global config, falling back to `~/.config/rigger`.
pub fn default_config_dir(home_dir: &Path) -> PathBuf {
    dirs::config_dir()
        .map(|p| p.join("rigger"))
        .unwrap_or_else(|| home_dir.join(".config").join("rigger"))
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    default_config_dir(home_dir).join(CONFIG_FILE_NAME)
}

/// Root for unit definitions and instances when the config leaves them out.
pub fn default_data_dir(home_dir: &Path) -> PathBuf {
    dirs::data_dir()
        .map(|p| p.join("rigger"))
        .unwrap_or_else(|| home_dir.join(".local").join("share").join("rigger"))
}
