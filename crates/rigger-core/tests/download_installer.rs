#![cfg(unix)]

mod support;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use rigger_core::config::{RiggerConfig, SubsystemConfig};
use rigger_core::context::AppContext;
use rigger_core::error::InstallerError;
use rigger_core::installer::{
    DOWNLOAD_SYSTEM, DownloadInstaller, Installer, LifecycleOutcome, install_many, uninstall_many,
};
use rigger_core::instance::Instance;
use rigger_core::status::InstallStatus;
use rigger_core::vcs::{GitMirror, VersionControl};

use support::{Fixture, unit_mirror};

fn mirrored_config(fixture: &Fixture) -> RiggerConfig {
    let mirror = fixture.root().join("mirror");
    fs::create_dir_all(&mirror).unwrap();
    unit_mirror(&mirror);

    let mut config = fixture.config.clone();
    config.subsystems.insert(
        DOWNLOAD_SYSTEM.to_string(),
        SubsystemConfig {
            source_base: Some(mirror.to_string_lossy().into_owned()),
        },
    );
    config
}

fn download_installer(config: &RiggerConfig) -> DownloadInstaller {
    DownloadInstaller::new(config, Arc::new(GitMirror)).with_instance(Instance::new("wiki1"))
}

#[test]
fn units_come_from_the_source_base() {
    let fixture = Fixture::new();
    let config = mirrored_config(&fixture);
    let installer = download_installer(&config);

    assert_eq!(installer.list_units().unwrap(), ["Bar", "Foo"]);
    assert!(installer.exists("Foo").unwrap());
}

#[test]
fn install_status_uninstall() {
    let fixture = Fixture::new();
    let config = mirrored_config(&fixture);
    let installer = download_installer(&config);
    let checkout = config.instances_dir.join("wiki1/extensions/Foo");

    assert_eq!(installer.is_installed("Foo").unwrap(), InstallStatus::NotInstalled);

    let report = installer.install("Foo").unwrap();
    assert_eq!(report.outcome, LifecycleOutcome::Attempted);
    assert_eq!(report.status, InstallStatus::Installed);
    assert_eq!(fs::read_to_string(checkout.join("README")).unwrap(), "v2\n");

    let again = installer.install("Foo").unwrap();
    assert_eq!(again.outcome, LifecycleOutcome::NoOp);

    let report = installer.uninstall("Foo").unwrap();
    assert_eq!(report.status, InstallStatus::NotInstalled);
    assert!(!checkout.exists());

    let again = installer.uninstall("Foo").unwrap();
    assert_eq!(again.outcome, LifecycleOutcome::NoOp);
}

#[test]
fn destination_is_forced_below_the_instance() {
    let fixture = Fixture::new();
    let config = mirrored_config(&fixture);
    let installer = DownloadInstaller::new(&config, Arc::new(GitMirror))
        .with_instance(Instance::new("wiki1").with_destination("/somewhere/else"));

    let destination = installer.instance().unwrap().destination().unwrap();
    assert_eq!(destination, config.instances_dir.join("wiki1").join("extensions"));
}

#[test]
fn alias_and_revision_shape_the_checkout() {
    let fixture = Fixture::new();
    let config = mirrored_config(&fixture);
    let first = GitMirror
        .revisions(config.source_base(DOWNLOAD_SYSTEM).unwrap(), "Foo")
        .unwrap()
        .pop()
        .unwrap();
    let installer = DownloadInstaller::new(&config, Arc::new(GitMirror)).with_instance(
        Instance::new("wiki1")
            .with_alias("FooLegacy")
            .with_revision(first),
    );

    installer.download("Foo").unwrap();

    let checkout = config.instances_dir.join("wiki1/extensions/FooLegacy");
    assert_eq!(fs::read_to_string(checkout.join("README")).unwrap(), "v1\n");
    assert!(!config.instances_dir.join("wiki1/extensions/Foo").exists());
}

#[test]
fn alias_is_rejected_for_several_units() {
    let fixture = Fixture::new();
    let config = mirrored_config(&fixture);
    let installer = DownloadInstaller::new(&config, Arc::new(GitMirror))
        .with_instance(Instance::new("wiki1").with_alias("X"));
    let units = ["Foo", "Bar"].map(String::from);

    let entries = install_many(&installer, &units);
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        assert!(matches!(
            entry.result,
            Err(InstallerError::AliasForManyUnits { count: 2, .. })
        ));
    }
    assert!(!config.instances_dir.join("wiki1/extensions/X").exists());
    assert_eq!(installer.is_installed("Bar").unwrap(), InstallStatus::NotInstalled);

    let entries = uninstall_many(&installer, &units);
    assert!(entries.iter().all(|e| e.result.is_err()));

    let single = install_many(&installer, &units[..1]);
    assert!(single[0].result.as_ref().unwrap().succeeded());
    assert!(config.instances_dir.join("wiki1/extensions/X").is_dir());
}

#[test]
fn uninstall_tolerates_a_vanished_checkout() {
    let fixture = Fixture::new();
    let config = mirrored_config(&fixture);
    let installer = download_installer(&config);
    installer.install("Foo").unwrap();
    let checkout = config.instances_dir.join("wiki1/extensions/Foo");
    fs::remove_dir_all(&checkout).unwrap();

    let report = installer.uninstall("Foo").unwrap();
    assert_eq!(report.outcome, LifecycleOutcome::NoOp);
}

#[test]
fn operations_need_an_instance() {
    let fixture = Fixture::new();
    let config = mirrored_config(&fixture);
    let installer = DownloadInstaller::new(&config, Arc::new(GitMirror));

    assert!(matches!(
        installer.install("Foo").unwrap_err(),
        InstallerError::MissingInstance
    ));
    assert!(matches!(
        installer.is_installed("Foo").unwrap_err(),
        InstallerError::MissingInstance
    ));
    assert!(matches!(
        installer.install("Nope").unwrap_err(),
        InstallerError::NotFound { .. }
    ));
}

#[test]
fn missing_source_base_is_an_error() {
    let fixture = Fixture::new();
    let installer = download_installer(&fixture.config);

    assert!(installer.list_units().is_err());
}

#[test]
fn capabilities() {
    let fixture = Fixture::new();
    let config = mirrored_config(&fixture);
    let installer = download_installer(&config);

    assert!(installer.task_runner().is_none());
    assert!(installer.tags().is_some());
    let revisions = installer.revisions().unwrap().list_revisions("Bar").unwrap();
    assert_eq!(revisions.len(), 1);
}

#[test]
fn context_selects_the_download_installer() {
    let fixture = Fixture::new();
    let config = mirrored_config(&fixture);
    let ctx = AppContext::with_vcs(config, Arc::new(GitMirror));

    assert_eq!(ctx.installer(DOWNLOAD_SYSTEM).system_name(), "download");
    assert_eq!(ctx.installer("extensions").system_name(), "extensions");
    assert!(ctx.installer("extensions").task_runner().is_some());
}

/// Backend whose checkouts always fail.
#[derive(Debug)]
struct UnreachableRepo;

impl VersionControl for UnreachableRepo {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    fn revisions(&self, _base: &str, _unit: &str) -> anyhow::Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn list(&self, _base: &str) -> anyhow::Result<Vec<String>> {
        Ok(vec!["Foo".to_string()])
    }

    fn checkout(
        &self,
        _base: &str,
        _unit: &str,
        _revision: Option<&str>,
        _destination: &Path,
    ) -> anyhow::Result<()> {
        anyhow::bail!("connection refused")
    }
}

#[test]
fn failed_checkout_is_a_soft_failure() {
    let fixture = Fixture::new();
    let mut config = fixture.config.clone();
    config.subsystems.insert(
        DOWNLOAD_SYSTEM.to_string(),
        SubsystemConfig {
            source_base: Some("svn://example.org/extensions".to_string()),
        },
    );
    let installer =
        DownloadInstaller::new(&config, Arc::new(UnreachableRepo)).with_instance(Instance::new("wiki1"));

    let report = installer.install("Foo").unwrap();
    assert_eq!(report.outcome, LifecycleOutcome::Attempted);
    assert_eq!(report.status, InstallStatus::NotInstalled);
    let failure = report.step_failure.unwrap();
    assert!(failure.contains("connection refused"), "{failure}");
}
