//! Configuration schema for rigger.toml

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::task::env::RESERVED_KEYS;

/// Root configuration structure for rigger.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiggerConfig {
    /// Root holding one directory per subsystem, each with `<unit>.install` dirs
    pub installfiles: PathBuf,

    /// Root holding one directory per instance
    pub instances_dir: PathBuf,

    /// Database command handed to task scripts as `MYSQL_COMMAND`
    #[serde(default)]
    pub mysql_command: String,

    /// Extra fixed values exported to every task script
    #[serde(default)]
    pub task_env: BTreeMap<String, String>,

    /// Kill task scripts that run longer than this
    #[serde(default)]
    pub task_timeout_secs: Option<u64>,

    /// Directory containing one subdirectory per tag
    #[serde(default)]
    pub tags_dir: Option<PathBuf>,

    /// Path inside a tag directory where units live
    #[serde(default = "default_tag_subdir")]
    pub tag_subdir: String,

    #[serde(default)]
    pub vcs: VcsConfig,

    #[serde(default)]
    pub subsystems: BTreeMap<String, SubsystemConfig>,
}

fn default_tag_subdir() -> String {
    "extensions".to_string()
}

/// Per-subsystem settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsystemConfig {
    /// Base source location; units live at `<source_base>/<unit>`
    #[serde(default)]
    pub source_base: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsKind {
    #[default]
    Subversion,
    Git,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VcsConfig {
    #[serde(default)]
    pub kind: VcsKind,

    /// Client binary used by the subversion backend
    #[serde(default = "default_vcs_command")]
    pub command: String,
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            kind: VcsKind::default(),
            command: default_vcs_command(),
        }
    }
}

fn default_vcs_command() -> String {
    "svn".to_string()
}

impl RiggerConfig {
    /// Config with every directory placed under `root`.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            installfiles: root.join("installfiles"),
            instances_dir: root.join("instances"),
            mysql_command: String::new(),
            task_env: BTreeMap::new(),
            task_timeout_secs: None,
            tags_dir: None,
            tag_subdir: default_tag_subdir(),
            vcs: VcsConfig::default(),
            subsystems: BTreeMap::new(),
        }
    }

    /// Directory holding the unit definitions of a subsystem.
    pub fn subsystem_dir(&self, system_name: &str) -> PathBuf {
        self.installfiles.join(system_name)
    }

    pub fn source_base(&self, system_name: &str) -> Option<&str> {
        self.subsystems
            .get(system_name)
            .and_then(|s| s.source_base.as_deref())
    }

    pub fn task_timeout(&self) -> Option<Duration> {
        self.task_timeout_secs.map(Duration::from_secs)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.installfiles.as_os_str().is_empty() {
            anyhow::bail!("'installfiles' must not be empty");
        }
        if self.instances_dir.as_os_str().is_empty() {
            anyhow::bail!("'instances_dir' must not be empty");
        }
        if self.task_timeout_secs == Some(0) {
            anyhow::bail!("'task_timeout_secs' must be greater than zero");
        }
        for key in self.task_env.keys() {
            if RESERVED_KEYS.contains(&key.as_str()) {
                anyhow::bail!("task_env key '{}' is reserved for the task contract", key);
            }
        }
        for name in self.subsystems.keys() {
            if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
                anyhow::bail!("Invalid subsystem name '{}'", name);
            }
        }
        Ok(())
    }
}
