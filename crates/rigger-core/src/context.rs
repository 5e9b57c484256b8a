//! Application context for unified dependency injection.

use std::sync::Arc;

use crate::config::{ConfigStore, RiggerConfig};
use crate::installer::{DownloadInstaller, Installer, ScriptedInstaller};
use crate::instance::Instance;
use crate::vcs::{self, VersionControl};

/// Built once from a loaded config; frontends use it to create installers
/// and instances.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: RiggerConfig,
    vcs: Arc<dyn VersionControl>,
}

impl AppContext {
    pub fn new(config: RiggerConfig) -> Self {
        let vcs: Arc<dyn VersionControl> = Arc::from(vcs::from_config(&config.vcs));
        Self { config, vcs }
    }

    /// Create context with an explicit version-control backend (for testing).
    pub fn with_vcs(config: RiggerConfig, vcs: Arc<dyn VersionControl>) -> Self {
        Self { config, vcs }
    }

    pub fn load(store: &ConfigStore) -> anyhow::Result<Self> {
        Ok(Self::new(store.load()?))
    }

    pub fn config(&self) -> &RiggerConfig {
        &self.config
    }

    pub fn vcs(&self) -> Arc<dyn VersionControl> {
        Arc::clone(&self.vcs)
    }

    /// Installer for a subsystem; `"download"` selects the download-only one.
    pub fn installer(&self, system_name: &str) -> Box<dyn Installer> {
        if system_name == crate::installer::DOWNLOAD_SYSTEM {
            Box::new(DownloadInstaller::new(&self.config, self.vcs()))
        } else {
            Box::new(ScriptedInstaller::new(system_name, &self.config, self.vcs()))
        }
    }

    pub fn scripted_installer(&self, system_name: &str) -> ScriptedInstaller {
        ScriptedInstaller::new(system_name, &self.config, self.vcs())
    }

    pub fn download_installer(&self) -> DownloadInstaller {
        DownloadInstaller::new(&self.config, self.vcs())
    }

    /// Instance deployed at `<instances_dir>/<id>`.
    pub fn instance(&self, id: &str) -> Instance {
        Instance::new(id).with_destination(self.config.instances_dir.join(id))
    }
}
