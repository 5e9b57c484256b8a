//! Version-control backends used for generic revision listing and for the
//! download-only installer.

mod git;
mod subversion;

use std::fmt;
use std::path::Path;

pub use git::GitMirror;
pub use subversion::Subversion;

use crate::config::{VcsConfig, VcsKind};

/// Access to the history and content of unit sources.
///
/// `base` is a subsystem's source base; a unit lives at `<base>/<unit>`.
pub trait VersionControl: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Revisions touching `unit`, in the order the backend reports them
    /// (newest first for both built-in backends).
    fn revisions(&self, base: &str, unit: &str) -> anyhow::Result<Vec<String>>;

    /// Unit names directly below `base`.
    fn list(&self, base: &str) -> anyhow::Result<Vec<String>>;

    /// Materialise `unit` at `revision` (or the latest one) into `destination`.
    fn checkout(
        &self,
        base: &str,
        unit: &str,
        revision: Option<&str>,
        destination: &Path,
    ) -> anyhow::Result<()>;
}

pub fn from_config(config: &VcsConfig) -> Box<dyn VersionControl> {
    match config.kind {
        VcsKind::Subversion => Box::new(Subversion::new(config.command.clone())),
        VcsKind::Git => Box::new(GitMirror),
    }
}
