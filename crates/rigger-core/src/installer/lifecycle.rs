//! The install/uninstall state machine shared by every installer.

use super::{InstallReport, LifecycleOutcome, UninstallReport};
use crate::error::{Disposition, Result};
use crate::status::InstallStatus;

/// The individual steps an installer plugs into the state machine.
pub(super) trait LifecycleSteps {
    /// Fail with `NotFound` unless the unit exists.
    fn require_unit(&self, unit: &str) -> Result<()>;

    /// Fail unless an instance with a destination is selected.
    fn require_destination(&self) -> Result<()>;

    fn status(&self, unit: &str) -> Result<InstallStatus>;

    fn download_step(&self, unit: &str) -> Result<()>;

    fn install_settings_step(&self, unit: &str) -> Result<()>;

    fn setup_step(&self, unit: &str) -> Result<()>;

    fn uninstall_step(&self, unit: &str) -> Result<()>;

    fn uninstall_settings_step(&self, unit: &str) -> Result<()>;
}

pub(super) fn install<S: LifecycleSteps + ?Sized>(steps: &S, unit: &str) -> Result<InstallReport> {
    steps.require_unit(unit)?;

    if steps.status(unit)? == InstallStatus::Installed {
        tracing::info!("{} already installed.", unit);
        return Ok(InstallReport {
            unit: unit.to_string(),
            outcome: LifecycleOutcome::NoOp,
            status: InstallStatus::Installed,
            step_failure: None,
        });
    }

    let step_failure = match run_install_steps(steps, unit) {
        Ok(()) => None,
        Err(err) if err.disposition() == Disposition::Recheck => {
            tracing::warn!("Installing '{}' stopped early: {}", unit, err);
            Some(err.to_string())
        }
        Err(err) => return Err(err),
    };

    // Whatever the steps reported, the unit decides whether it is installed.
    let status = steps.status(unit)?;
    Ok(InstallReport {
        unit: unit.to_string(),
        outcome: LifecycleOutcome::Attempted,
        status,
        step_failure,
    })
}

fn run_install_steps<S: LifecycleSteps + ?Sized>(steps: &S, unit: &str) -> Result<()> {
    steps.download_step(unit)?;
    steps.install_settings_step(unit)?;
    steps.setup_step(unit)?;
    Ok(())
}

pub(super) fn uninstall<S: LifecycleSteps + ?Sized>(
    steps: &S,
    unit: &str,
) -> Result<UninstallReport> {
    steps.require_unit(unit)?;
    steps.require_destination()?;

    let before = steps.status(unit)?;
    if before == InstallStatus::NotInstalled {
        tracing::info!("{} does not appear to be installed.", unit);
        return Ok(UninstallReport {
            unit: unit.to_string(),
            outcome: LifecycleOutcome::NoOp,
            status: InstallStatus::NotInstalled,
        });
    }

    if before == InstallStatus::Unknown {
        tracing::warn!("Status of '{}' is unknown; uninstalling anyway.", unit);
    }
    steps.uninstall_step(unit)?;
    steps.uninstall_settings_step(unit)?;

    let status = steps.status(unit)?;
    if status == InstallStatus::Unknown {
        tracing::warn!("Could not confirm that '{}' was removed.", unit);
    }
    Ok(UninstallReport {
        unit: unit.to_string(),
        outcome: LifecycleOutcome::Attempted,
        status,
    })
}
