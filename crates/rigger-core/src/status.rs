//! Tri-state install status and the parser for `is_installed` output.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a unit is installed in an instance.
///
/// `Unknown` is a real answer, not a failure: it means the unit could not
/// report its status. It must never be read as `NotInstalled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallStatus {
    Installed,
    NotInstalled,
    Unknown,
}

impl InstallStatus {
    pub fn is_installed(self) -> bool {
        self == Self::Installed
    }

    pub fn is_not_installed(self) -> bool {
        self == Self::NotInstalled
    }
}

impl From<bool> for InstallStatus {
    fn from(installed: bool) -> Self {
        if installed {
            Self::Installed
        } else {
            Self::NotInstalled
        }
    }
}

impl fmt::Display for InstallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Installed => "installed",
            Self::NotInstalled => "not installed",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Interpret the stdout of an `is_installed` task.
///
/// Matching is an exact, case-sensitive substring search; "true" is checked
/// before "false".
pub fn parse_status_output(stdout: &str) -> InstallStatus {
    if stdout.contains("true") {
        InstallStatus::Installed
    } else if stdout.contains("false") {
        InstallStatus::NotInstalled
    } else {
        InstallStatus::Unknown
    }
}
