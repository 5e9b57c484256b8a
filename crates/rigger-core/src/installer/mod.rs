//! Installers: the capability contracts and their two implementations.
//!
//! Every installer implements [`Installer`]. Optional capabilities are
//! exposed through probes so callers holding a `dyn Installer` can discover
//! them at runtime:
//!
//! | Capability        | Scripted | Download |
//! |-------------------|----------|----------|
//! | [`TaskRunner`]    | yes      | no       |
//! | [`Revisionable`]  | yes      | yes      |
//! | [`Taggable`]      | yes      | yes      |

mod download;
mod lifecycle;
mod scripted;
mod settings;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use download::{DownloadInstaller, SYSTEM_NAME as DOWNLOAD_SYSTEM};
pub use scripted::ScriptedInstaller;
pub use settings::{NoSettings, SettingsHook};

use crate::error::{InstallerError, Result};
use crate::instance::Instance;
use crate::revision::Revisionable;
use crate::status::InstallStatus;
use crate::tags::Taggable;
use crate::task::{Task, TaskOutput};

/// Message shown for units that ship no `info` file.
pub const NO_INFO_MESSAGE: &str = "This installer provides no information.";

pub trait Installer: fmt::Debug {
    fn system_name(&self) -> &str;

    fn instance(&self) -> Option<&Instance>;

    fn set_instance(&mut self, instance: Instance);

    /// Units this installer knows about, sorted.
    fn list_units(&self) -> Result<Vec<String>>;

    fn exists(&self, unit: &str) -> Result<bool> {
        Ok(self.list_units()?.iter().any(|u| u == unit))
    }

    fn is_installed(&self, unit: &str) -> Result<InstallStatus>;

    /// Install `unit` unless it already is.
    ///
    /// The reported status always comes from a fresh status check after the
    /// steps ran, never from the steps themselves.
    fn install(&self, unit: &str) -> Result<InstallReport>;

    /// Uninstall `unit` unless it is known to be absent.
    fn uninstall(&self, unit: &str) -> Result<UninstallReport>;

    /// Units whose status is `Installed`; `Unknown` units are left out.
    fn list_installed(&self) -> Result<Vec<String>> {
        let mut installed = Vec::new();
        for unit in self.list_units()? {
            if self.is_installed(&unit)? == InstallStatus::Installed {
                installed.push(unit);
            }
        }
        Ok(installed)
    }

    fn task_runner(&self) -> Option<&dyn TaskRunner> {
        None
    }

    fn revisions(&self) -> Option<&dyn Revisionable> {
        None
    }

    fn tags(&self) -> Option<&dyn Taggable> {
        None
    }
}

/// Installers backed by per-unit task scripts.
pub trait TaskRunner {
    /// Whether `task_name` resolves to an executable script for `unit`.
    fn can_execute(&self, unit: &str, task_name: &str) -> Result<bool>;

    /// Run a task script. `Ok(None)` means the unit has no script for it.
    fn execute(
        &self,
        unit: &str,
        task: &Task,
        extra_env: &BTreeMap<String, String>,
    ) -> Result<Option<TaskOutput>>;

    fn info(&self, unit: &str) -> Result<UnitInfo>;
}

/// Contents of a unit's `info` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitInfo {
    Provided(String),
    Missing,
}

impl fmt::Display for UnitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provided(text) => f.write_str(text),
            Self::Missing => f.write_str(NO_INFO_MESSAGE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleOutcome {
    /// The lifecycle steps ran
    Attempted,
    /// The unit was already in the requested state
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallReport {
    pub unit: String,
    pub outcome: LifecycleOutcome,
    pub status: InstallStatus,
    /// Soft failure that cut the step sequence short
    pub step_failure: Option<String>,
}

impl InstallReport {
    pub fn succeeded(&self) -> bool {
        self.status == InstallStatus::Installed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UninstallReport {
    pub unit: String,
    pub outcome: LifecycleOutcome,
    pub status: InstallStatus,
}

impl UninstallReport {
    /// Success means the status check now says `NotInstalled`; `Unknown`
    /// does not confirm removal.
    pub fn succeeded(&self) -> bool {
        self.status == InstallStatus::NotInstalled
    }
}

/// Result for one unit of a batch operation.
#[derive(Debug)]
pub struct BatchEntry<T> {
    pub unit: String,
    pub result: std::result::Result<T, InstallerError>,
}

/// Install every unit in turn; a failing unit never stops the others.
pub fn install_many(installer: &dyn Installer, units: &[String]) -> Vec<BatchEntry<InstallReport>> {
    run_batch(installer, units, |unit| installer.install(unit))
}

/// Uninstall every unit in turn; a failing unit never stops the others.
pub fn uninstall_many(
    installer: &dyn Installer,
    units: &[String],
) -> Vec<BatchEntry<UninstallReport>> {
    run_batch(installer, units, |unit| installer.uninstall(unit))
}

/// An instance alias renames a single unit, so it cannot apply to a batch.
fn run_batch<T>(
    installer: &dyn Installer,
    units: &[String],
    op: impl Fn(&str) -> Result<T>,
) -> Vec<BatchEntry<T>> {
    let alias = installer
        .instance()
        .and_then(|instance| instance.alias.as_deref())
        .filter(|_| units.len() > 1);

    units
        .iter()
        .map(|unit| BatchEntry {
            unit: unit.clone(),
            result: match alias {
                Some(alias) => Err(InstallerError::AliasForManyUnits {
                    alias: alias.to_string(),
                    count: units.len(),
                }),
                None => op(unit),
            },
        })
        .collect()
}
