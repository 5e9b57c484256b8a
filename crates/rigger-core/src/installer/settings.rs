use std::fmt;

use crate::error::Result;
use crate::instance::Instance;

/// Hooks for writing and removing a unit's settings in the target
/// application. Runs between download and setup on install, and after the
/// uninstall task on uninstall.
pub trait SettingsHook: fmt::Debug {
    fn install_settings(&self, _unit: &str, _instance: &Instance) -> Result<()> {
        Ok(())
    }

    fn uninstall_settings(&self, _unit: &str, _instance: &Instance) -> Result<()> {
        Ok(())
    }
}

/// Leaves application settings untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSettings;

impl SettingsHook for NoSettings {}
