//! Tags: named snapshots of the unit sources.
//!
//! Each subdirectory of `tags_dir` is a tag. A tag offers a unit when
//! `<tags_dir>/<tag>/<tag_subdir>/<unit>` exists, and pinning a tag on an
//! instance redirects the source base to `<tags_dir>/<tag>/<tag_subdir>`.

use std::path::PathBuf;

use anyhow::Context;

use crate::error::{InstallerError, Result};

/// Installers whose units can be pinned to a tag.
pub trait Taggable {
    fn list_tags(&self, unit: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Clone)]
pub struct TagIndex {
    tags_dir: Option<PathBuf>,
    tag_subdir: String,
}

impl TagIndex {
    pub fn new(tags_dir: Option<PathBuf>, tag_subdir: impl Into<String>) -> Self {
        Self {
            tags_dir,
            tag_subdir: tag_subdir.into(),
        }
    }

    /// Tags offering `unit`, sorted. Empty when no tags directory is configured.
    pub fn tags_for(&self, unit: &str) -> Result<Vec<String>> {
        if unit.is_empty() {
            return Err(InstallerError::MissingUnitName);
        }
        let Some(tags_dir) = &self.tags_dir else {
            return Ok(Vec::new());
        };
        if !tags_dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(tags_dir)
            .with_context(|| format!("Failed to read tags directory: {}", tags_dir.display()))?;

        let mut tags = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read tags directory entry")?;
            let Some(tag) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if entry.path().join(&self.tag_subdir).join(unit).exists() {
                tags.push(tag);
            }
        }
        tags.sort();
        Ok(tags)
    }

    /// Source base for a pinned tag; without a tag, `default` is used.
    pub fn source_base(&self, tag: Option<&str>, default: Option<&str>) -> Option<String> {
        match (tag, &self.tags_dir) {
            (Some(tag), Some(tags_dir)) => Some(
                tags_dir
                    .join(tag)
                    .join(&self.tag_subdir)
                    .to_string_lossy()
                    .into_owned(),
            ),
            (Some(tag), None) => {
                tracing::warn!("Tag '{}' is pinned but no tags_dir is configured", tag);
                None
            }
            (None, _) => default.map(str::to_string),
        }
    }
}
