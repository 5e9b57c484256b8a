#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use rigger_core::config::RiggerConfig;
use rigger_core::installer::ScriptedInstaller;
use rigger_core::instance::Instance;
use rigger_core::vcs::{Subversion, VersionControl};

pub const SUBSYSTEM: &str = "extensions";

/// Temporary installfiles tree with helpers to define units and scripts.
pub struct Fixture {
    pub temp: TempDir,
    pub config: RiggerConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let config = RiggerConfig::rooted_at(temp.path());
        fs::create_dir_all(config.subsystem_dir(SUBSYSTEM)).unwrap();
        fs::create_dir_all(&config.instances_dir).unwrap();
        Self { temp, config }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// Create `<unit>.install` in the default subsystem.
    pub fn unit(&self, name: &str) -> PathBuf {
        let dir = self
            .config
            .subsystem_dir(SUBSYSTEM)
            .join(format!("{name}.install"));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn destination(&self) -> PathBuf {
        let dir = self.config.instances_dir.join("wiki1");
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    pub fn instance(&self) -> Instance {
        Instance::new("wiki1").with_destination(self.destination())
    }

    /// Scripted installer for the default subsystem, with an instance set.
    pub fn installer(&self) -> ScriptedInstaller {
        self.bare_installer().with_instance(self.instance())
    }

    /// Scripted installer with no instance selected.
    pub fn bare_installer(&self) -> ScriptedInstaller {
        ScriptedInstaller::new(SUBSYSTEM, &self.config, default_vcs())
    }
}

pub fn default_vcs() -> Arc<dyn VersionControl> {
    Arc::new(Subversion::new("svn"))
}

/// Write an executable `/bin/sh` script.
pub fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Write a file without the execute bit.
pub fn plain_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
    path
}

/// Script that appends its task name to `<unit dir>/calls.log`.
pub fn recording_script(dir: &Path, name: &str) -> PathBuf {
    script(dir, name, &format!("echo {name} >> \"$INSTALL_DIR/calls.log\""))
}

pub fn recorded_calls(unit_dir: &Path) -> Vec<String> {
    fs::read_to_string(unit_dir.join("calls.log"))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// `is_installed` script that reports whether `marker` exists in the destination.
pub fn marker_status_script(dir: &Path, marker: &str) -> PathBuf {
    script(
        dir,
        "is_installed.sh",
        &format!(
            "if [ -f \"$DESTINATION_DIR/{marker}\" ]; then echo true; else echo false; fi"
        ),
    )
}

/// Stage everything in the work tree and commit it on HEAD.
pub fn commit_all(repo: &git2::Repository, message: &str) -> git2::Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let sig = git2::Signature::now("Test", "test@example.com").unwrap();
    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .unwrap()
}

/// Git mirror with units `Foo` (two commits) and `Bar` (one commit).
pub fn unit_mirror(root: &Path) -> (git2::Repository, Vec<git2::Oid>) {
    let repo = git2::Repository::init(root).unwrap();
    let foo = root.join("Foo");
    fs::create_dir_all(foo.join("lib")).unwrap();
    fs::write(foo.join("README"), "v1\n").unwrap();
    fs::write(foo.join("lib/Foo.php"), "<?php\n").unwrap();
    script(&foo, "build.sh", "true");
    let first = commit_all(&repo, "Add Foo");

    let bar = root.join("Bar");
    fs::create_dir_all(&bar).unwrap();
    fs::write(bar.join("README"), "bar\n").unwrap();
    let second = commit_all(&repo, "Add Bar");

    fs::write(foo.join("README"), "v2\n").unwrap();
    let third = commit_all(&repo, "Update Foo");

    (repo, vec![first, second, third])
}
