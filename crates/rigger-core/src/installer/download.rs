//! Installer that only checks unit sources out of version control.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use super::lifecycle::{self, LifecycleSteps};
use super::{InstallReport, Installer, NoSettings, SettingsHook, UninstallReport};
use crate::config::RiggerConfig;
use crate::error::{InstallerError, Result};
use crate::instance::Instance;
use crate::revision::{self, Revisionable};
use crate::status::InstallStatus;
use crate::tags::{TagIndex, Taggable};
use crate::vcs::VersionControl;

pub const SYSTEM_NAME: &str = "download";

/// Downloads a unit into `<instances_dir>/<instance>/extensions/<unit>` and
/// does nothing else.
///
/// Units are whatever the version-control backend lists under the source
/// base. There are no task scripts: a unit counts as installed when its
/// checkout directory exists, and uninstalling deletes that directory.
#[derive(Debug)]
pub struct DownloadInstaller {
    instances_dir: PathBuf,
    instance: Option<Instance>,
    source_base: Option<String>,
    tags: TagIndex,
    vcs: Arc<dyn VersionControl>,
    settings: Box<dyn SettingsHook>,
}

impl DownloadInstaller {
    pub fn new(config: &RiggerConfig, vcs: Arc<dyn VersionControl>) -> Self {
        Self {
            instances_dir: config.instances_dir.clone(),
            instance: None,
            source_base: config.source_base(SYSTEM_NAME).map(str::to_string),
            tags: TagIndex::new(config.tags_dir.clone(), config.tag_subdir.clone()),
            vcs,
            settings: Box::new(NoSettings),
        }
    }

    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.set_instance(instance);
        self
    }

    pub fn with_settings(mut self, settings: Box<dyn SettingsHook>) -> Self {
        self.settings = settings;
        self
    }

    /// Check `unit` out into the instance without running anything else.
    pub fn download(&self, unit: &str) -> Result<()> {
        self.require_unit(unit)?;
        self.download_step(unit)
    }

    fn current_instance(&self) -> Result<&Instance> {
        self.instance.as_ref().ok_or(InstallerError::MissingInstance)
    }

    fn effective_source_base(&self) -> Option<String> {
        let tag = self.instance.as_ref().and_then(|i| i.tag.as_deref());
        self.tags.source_base(tag, self.source_base.as_deref())
    }

    fn require_source_base(&self) -> Result<String> {
        self.effective_source_base().ok_or_else(|| {
            InstallerError::Other(anyhow::anyhow!(
                "No source_base configured for subsystem '{}'",
                SYSTEM_NAME
            ))
        })
    }

    /// Directory the unit is checked out into; the alias wins over the name.
    fn checkout_dir(&self, unit: &str) -> Result<PathBuf> {
        let instance = self.current_instance()?;
        let name = instance.alias.as_deref().unwrap_or(unit);
        Ok(instance.destination()?.join(name))
    }
}

impl LifecycleSteps for DownloadInstaller {
    fn require_unit(&self, unit: &str) -> Result<()> {
        if unit.is_empty() {
            return Err(InstallerError::MissingUnitName);
        }
        if !self.exists(unit)? {
            return Err(InstallerError::not_found(SYSTEM_NAME, unit));
        }
        Ok(())
    }

    fn require_destination(&self) -> Result<()> {
        self.current_instance()?.destination().map(|_| ())
    }

    fn status(&self, unit: &str) -> Result<InstallStatus> {
        Ok(InstallStatus::from(self.checkout_dir(unit)?.is_dir()))
    }

    fn download_step(&self, unit: &str) -> Result<()> {
        let target = self.checkout_dir(unit)?;
        let base = self.require_source_base()?;
        let revision = self.current_instance()?.revision.as_deref();

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create destination directory: {}", parent.display())
            })?;
        }

        tracing::info!("Checking out {} into {}", unit, target.display());
        self.vcs
            .checkout(&base, unit, revision, &target)
            .map_err(|err| InstallerError::StepFailed {
                unit: unit.to_string(),
                step: "download".to_string(),
                message: format!("{err:#}"),
            })
    }

    fn install_settings_step(&self, unit: &str) -> Result<()> {
        self.settings
            .install_settings(unit, self.current_instance()?)
    }

    fn setup_step(&self, _unit: &str) -> Result<()> {
        Ok(())
    }

    fn uninstall_step(&self, unit: &str) -> Result<()> {
        let target = self.checkout_dir(unit)?;
        if remove_dir_if_exists(&target)? {
            tracing::info!("Removed {}", target.display());
        }
        Ok(())
    }

    fn uninstall_settings_step(&self, unit: &str) -> Result<()> {
        self.settings
            .uninstall_settings(unit, self.current_instance()?)
    }
}

impl Installer for DownloadInstaller {
    fn system_name(&self) -> &str {
        SYSTEM_NAME
    }

    fn instance(&self) -> Option<&Instance> {
        self.instance.as_ref()
    }

    fn set_instance(&mut self, mut instance: Instance) {
        instance.destination_dir = Some(self.instances_dir.join(&instance.id).join("extensions"));
        self.instance = Some(instance);
    }

    fn list_units(&self) -> Result<Vec<String>> {
        let base = self.require_source_base()?;
        let mut units = self.vcs.list(&base)?;
        units.sort();
        Ok(units)
    }

    fn is_installed(&self, unit: &str) -> Result<InstallStatus> {
        self.require_unit(unit)?;
        self.status(unit)
    }

    fn install(&self, unit: &str) -> Result<InstallReport> {
        lifecycle::install(self, unit)
    }

    fn uninstall(&self, unit: &str) -> Result<UninstallReport> {
        lifecycle::uninstall(self, unit)
    }

    fn revisions(&self) -> Option<&dyn Revisionable> {
        Some(self)
    }

    fn tags(&self) -> Option<&dyn Taggable> {
        Some(self)
    }
}

impl Revisionable for DownloadInstaller {
    fn list_revisions(&self, unit: &str) -> Result<Vec<String>> {
        self.require_unit(unit)?;
        let base = self.effective_source_base();
        revision::generic_revisions(self.vcs.as_ref(), base.as_deref(), unit)
    }
}

impl Taggable for DownloadInstaller {
    fn list_tags(&self, unit: &str) -> Result<Vec<String>> {
        self.require_unit(unit)?;
        self.tags.tags_for(unit)
    }
}

/// Remove a directory tree, treating a missing one as already removed.
fn remove_dir_if_exists(path: &Path) -> anyhow::Result<bool> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(err) => {
            Err(err).with_context(|| format!("Failed to remove directory: {}", path.display()))
        }
    }
}
