//! The deployment an installer operates on.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{InstallerError, Result};

/// Target context units are installed into.
///
/// The destination directory must be resolved before any install or
/// uninstall call; revision and tag pins are handed to every task script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    pub destination_dir: Option<PathBuf>,
    pub alias: Option<String>,
    pub revision: Option<String>,
    pub tag: Option<String>,
}

impl Instance {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_destination(mut self, dir: impl Into<PathBuf>) -> Self {
        self.destination_dir = Some(dir.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = Some(revision.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// The destination directory, or `MissingDestination` if unset or empty.
    pub fn destination(&self) -> Result<&Path> {
        match self.destination_dir.as_deref() {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(dir),
            _ => Err(InstallerError::MissingDestination),
        }
    }

    pub fn revision_or_empty(&self) -> &str {
        self.revision.as_deref().unwrap_or("")
    }

    pub fn tag_or_empty(&self) -> &str {
        self.tag.as_deref().unwrap_or("")
    }
}
