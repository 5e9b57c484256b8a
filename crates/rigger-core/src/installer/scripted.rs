//! Installer driven by per-unit task scripts.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use super::lifecycle::{self, LifecycleSteps};
use super::{
    InstallReport, Installer, NoSettings, SettingsHook, TaskRunner, UninstallReport, UnitInfo,
};
use crate::catalog::Catalog;
use crate::config::RiggerConfig;
use crate::error::{InstallerError, Result};
use crate::instance::Instance;
use crate::revision::{self, Revisionable};
use crate::status::{InstallStatus, parse_status_output};
use crate::tags::{TagIndex, Taggable};
use crate::task::{self, Task, TaskEnv, TaskExecutor, TaskOutput};
use crate::vcs::VersionControl;

const INFO_FILE: &str = "info";

/// Installs units of one subsystem by running the scripts in their
/// `<unit>.install` directories.
///
/// Every task is optional. Install runs `download`, the settings hook and
/// `setup`; uninstall runs `uninstall` and the settings hook; `is_installed`
/// reports status and `get_revisions` overrides revision listing.
#[derive(Debug)]
pub struct ScriptedInstaller {
    catalog: Catalog,
    instance: Option<Instance>,
    executor: TaskExecutor,
    mysql_command: String,
    task_env: BTreeMap<String, String>,
    source_base: Option<String>,
    tags: TagIndex,
    vcs: Arc<dyn VersionControl>,
    settings: Box<dyn SettingsHook>,
}

impl ScriptedInstaller {
    pub fn new(system_name: &str, config: &RiggerConfig, vcs: Arc<dyn VersionControl>) -> Self {
        Self {
            catalog: Catalog::new(system_name, config.subsystem_dir(system_name)),
            instance: None,
            executor: TaskExecutor::new(config.task_timeout()),
            mysql_command: config.mysql_command.clone(),
            task_env: config.task_env.clone(),
            source_base: config.source_base(system_name).map(str::to_string),
            tags: TagIndex::new(config.tags_dir.clone(), config.tag_subdir.clone()),
            vcs,
            settings: Box::new(NoSettings),
        }
    }

    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.instance = Some(instance);
        self
    }

    pub fn with_settings(mut self, settings: Box<dyn SettingsHook>) -> Self {
        self.settings = settings;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Run the download step on its own.
    pub fn download(&self, unit: &str) -> Result<()> {
        self.require_unit(unit)?;
        self.download_step(unit)
    }

    /// Run the setup step on its own.
    pub fn setup(&self, unit: &str) -> Result<()> {
        self.require_unit(unit)?;
        self.setup_step(unit)
    }

    fn destination(&self) -> Result<&Path> {
        self.instance
            .as_ref()
            .ok_or(InstallerError::MissingInstance)?
            .destination()
    }

    fn current_instance(&self) -> Result<&Instance> {
        self.instance.as_ref().ok_or(InstallerError::MissingInstance)
    }

    fn build_env(&self, unit: &str, extra_env: &BTreeMap<String, String>) -> TaskEnv {
        let (destination, revision, tag) = match &self.instance {
            Some(instance) => (
                instance.destination_dir.as_deref().unwrap_or(Path::new("")),
                instance.revision_or_empty(),
                instance.tag_or_empty(),
            ),
            None => (Path::new(""), "", ""),
        };

        TaskEnv::new(&self.catalog.unit_dir(unit), destination, unit, revision, tag)
            .with_mysql_command(&self.mysql_command)
            .layered(&self.task_env)
            .layered(extra_env)
    }

    /// Locate and run a task without re-checking that the unit exists.
    fn run_task(
        &self,
        unit: &str,
        task: &Task,
        extra_env: &BTreeMap<String, String>,
    ) -> Result<Option<TaskOutput>> {
        let Some(script) = task::locate(&self.catalog.unit_dir(unit), &task.name)? else {
            return Ok(None);
        };
        let env = self.build_env(unit, extra_env);
        Ok(Some(self.executor.run(&script, task, env)?))
    }

    /// Run `task_name` if the unit ships an executable script for it.
    fn run_optional(&self, unit: &str, task_name: &str) -> Result<bool> {
        if !task::can_execute(&self.catalog.unit_dir(unit), task_name)? {
            return Ok(false);
        }
        self.run_task(unit, &Task::new(task_name), &BTreeMap::new())?;
        Ok(true)
    }
}

impl LifecycleSteps for ScriptedInstaller {
    fn require_unit(&self, unit: &str) -> Result<()> {
        self.catalog.require(unit)
    }

    fn require_destination(&self) -> Result<()> {
        self.destination().map(|_| ())
    }

    fn status(&self, unit: &str) -> Result<InstallStatus> {
        self.destination()?;

        if !task::can_execute(&self.catalog.unit_dir(unit), task::IS_INSTALLED)? {
            tracing::warn!("{} does not support 'is_installed'.", unit);
            return Ok(InstallStatus::Unknown);
        }

        let Some(output) = self.run_task(unit, &Task::new(task::IS_INSTALLED), &BTreeMap::new())?
        else {
            tracing::warn!("{} does not support 'is_installed'.", unit);
            return Ok(InstallStatus::Unknown);
        };

        let status = parse_status_output(&output.stdout);
        if status == InstallStatus::Unknown {
            if output.stdout.trim().is_empty() {
                tracing::warn!("{} 'is_installed' produced no output.", unit);
            } else {
                tracing::warn!(
                    "{} 'is_installed' provides unexpected output: {}",
                    unit,
                    output.stdout.trim()
                );
            }
        }
        Ok(status)
    }

    fn download_step(&self, unit: &str) -> Result<()> {
        self.destination()?;
        if !self.run_optional(unit, task::DOWNLOAD)? {
            tracing::info!("notice: cannot execute download script for {}", unit);
        }
        Ok(())
    }

    fn install_settings_step(&self, unit: &str) -> Result<()> {
        self.settings
            .install_settings(unit, self.current_instance()?)
    }

    fn setup_step(&self, unit: &str) -> Result<()> {
        self.destination()?;
        self.run_optional(unit, task::SETUP)?;
        Ok(())
    }

    fn uninstall_step(&self, unit: &str) -> Result<()> {
        self.destination()?;
        self.run_optional(unit, task::UNINSTALL)?;
        Ok(())
    }

    fn uninstall_settings_step(&self, unit: &str) -> Result<()> {
        self.settings
            .uninstall_settings(unit, self.current_instance()?)
    }
}

impl Installer for ScriptedInstaller {
    fn system_name(&self) -> &str {
        self.catalog.system_name()
    }

    fn instance(&self) -> Option<&Instance> {
        self.instance.as_ref()
    }

    fn set_instance(&mut self, instance: Instance) {
        self.instance = Some(instance);
    }

    fn list_units(&self) -> Result<Vec<String>> {
        Ok(self.catalog.list_units()?)
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

    fn task_runner(&self) -> Option<&dyn TaskRunner> {
        Some(self)
    }

    fn revisions(&self) -> Option<&dyn Revisionable> {
        Some(self)
    }

    fn tags(&self) -> Option<&dyn Taggable> {
        Some(self)
    }
}

impl TaskRunner for ScriptedInstaller {
    fn can_execute(&self, unit: &str, task_name: &str) -> Result<bool> {
        self.require_unit(unit)?;
        Ok(task::can_execute(&self.catalog.unit_dir(unit), task_name)?)
    }

    fn execute(
        &self,
        unit: &str,
        task: &Task,
        extra_env: &BTreeMap<String, String>,
    ) -> Result<Option<TaskOutput>> {
        self.require_unit(unit)?;
        self.run_task(unit, task, extra_env)
    }

    fn info(&self, unit: &str) -> Result<UnitInfo> {
        self.require_unit(unit)?;
        let path = self.catalog.unit_dir(unit).join(INFO_FILE);
        if !path.is_file() {
            return Ok(UnitInfo::Missing);
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read info file: {}", path.display()))?;
        Ok(UnitInfo::Provided(text))
    }
}

impl Revisionable for ScriptedInstaller {
    fn list_revisions(&self, unit: &str) -> Result<Vec<String>> {
        self.require_unit(unit)?;

        if task::can_execute(&self.catalog.unit_dir(unit), task::GET_REVISIONS)? {
            let output = self.run_task(unit, &Task::new(task::GET_REVISIONS), &BTreeMap::new())?;
            return Ok(output
                .map(|o| revision::split_revision_output(&o.stdout))
                .unwrap_or_default());
        }

        let tag = self.instance.as_ref().and_then(|i| i.tag.as_deref());
        let base = self.tags.source_base(tag, self.source_base.as_deref());
        revision::generic_revisions(self.vcs.as_ref(), base.as_deref(), unit)
    }
}

impl Taggable for ScriptedInstaller {
    fn list_tags(&self, unit: &str) -> Result<Vec<String>> {
        self.require_unit(unit)?;
        self.tags.tags_for(unit)
    }
}
