//! Enumeration of the units a subsystem defines on disk.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::{InstallerError, Result};

/// Suffix of a unit definition directory.
pub const UNIT_DIR_SUFFIX: &str = ".install";

/// Units of one subsystem, read from `<installfiles>/<subsystem>/<unit>.install`.
#[derive(Debug, Clone)]
pub struct Catalog {
    system_name: String,
    subsystem_dir: PathBuf,
}

impl Catalog {
    pub fn new(system_name: impl Into<String>, subsystem_dir: PathBuf) -> Self {
        Self {
            system_name: system_name.into(),
            subsystem_dir,
        }
    }

    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    pub fn subsystem_dir(&self) -> &Path {
        &self.subsystem_dir
    }

    /// Definition directory of `unit`. Does not check that it exists.
    pub fn unit_dir(&self, unit: &str) -> PathBuf {
        self.subsystem_dir.join(format!("{unit}{UNIT_DIR_SUFFIX}"))
    }

    /// Names of all units, sorted.
    pub fn list_units(&self) -> anyhow::Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.subsystem_dir).with_context(|| {
            format!(
                "Failed to read subsystem directory: {}",
                self.subsystem_dir.display()
            )
        })?;

        let mut units = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(unit) = name.strip_suffix(UNIT_DIR_SUFFIX)
                && !unit.is_empty()
            {
                units.push(unit.to_string());
            }
        }

        units.sort();
        Ok(units)
    }

    pub fn exists(&self, unit: &str) -> anyhow::Result<bool> {
        Ok(self.list_units()?.iter().any(|u| u == unit))
    }

    /// Fail with `NotFound` unless `unit` is listed.
    pub fn require(&self, unit: &str) -> Result<()> {
        if unit.is_empty() {
            return Err(InstallerError::MissingUnitName);
        }
        if !self.exists(unit)? {
            return Err(InstallerError::not_found(&self.system_name, unit));
        }
        Ok(())
    }
}
