//! Rigger Core Library
//!
//! Installs, uninstalls and inspects named units (extensions, tools, ...)
//! in an instance by running the optional task scripts each unit ships,
//! falling back to generic behaviour where a unit provides none.

pub mod catalog;
pub mod config;
pub mod context;
pub mod error;
pub mod installer;
pub mod instance;
pub mod revision;
pub mod status;
pub mod tags;
pub mod task;
pub mod vcs;

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::catalog::Catalog;
    pub use crate::config::{ConfigStore, RiggerConfig, VcsKind};
    pub use crate::context::AppContext;
    pub use crate::error::{Disposition, ExecutionError, InstallerError};
    pub use crate::installer::{
        DownloadInstaller, InstallReport, Installer, LifecycleOutcome, ScriptedInstaller,
        SettingsHook, TaskRunner, UninstallReport, UnitInfo,
    };
    pub use crate::instance::Instance;
    pub use crate::revision::Revisionable;
    pub use crate::status::InstallStatus;
    pub use crate::tags::Taggable;
    pub use crate::task::{Task, TaskOutput};
    pub use crate::vcs::VersionControl;
}
