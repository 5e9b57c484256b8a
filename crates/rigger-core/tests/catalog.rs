#![cfg(unix)]

mod support;

use std::fs;

use rigger_core::error::InstallerError;
use rigger_core::installer::{Installer, TaskRunner, UnitInfo};
use rigger_core::tags::Taggable;

use support::{Fixture, SUBSYSTEM, marker_status_script, plain_file, script};

#[test]
fn units_are_sorted_without_suffix() {
    let fixture = Fixture::new();
    fixture.unit("Zeta");
    fixture.unit("Alpha");
    fixture.unit("Mid");
    let subsystem_dir = fixture.config.subsystem_dir(SUBSYSTEM);
    fs::create_dir(subsystem_dir.join("notes")).unwrap();
    fs::write(subsystem_dir.join("README"), "").unwrap();

    let installer = fixture.installer();
    assert_eq!(installer.list_units().unwrap(), ["Alpha", "Mid", "Zeta"]);
    assert!(installer.exists("Mid").unwrap());
    assert!(!installer.exists("notes").unwrap());
}

#[test]
fn missing_subsystem_is_an_error() {
    let fixture = Fixture::new();
    let mut config = fixture.config.clone();
    config.installfiles = fixture.root().join("elsewhere");
    let installer = rigger_core::installer::ScriptedInstaller::new(
        SUBSYSTEM,
        &config,
        support::default_vcs(),
    );

    assert!(installer.list_units().is_err());
}

#[test]
fn installed_listing_excludes_unknown() {
    let fixture = Fixture::new();
    let installed = fixture.unit("Installed");
    marker_status_script(&installed, "Installed.marker");
    fs::write(fixture.destination().join("Installed.marker"), "").unwrap();
    let absent = fixture.unit("Absent");
    marker_status_script(&absent, "Absent.marker");
    fixture.unit("Opaque");

    let installer = fixture.installer();
    assert_eq!(installer.list_installed().unwrap(), ["Installed"]);
}

#[test]
fn info_file_is_returned_verbatim() {
    let fixture = Fixture::new();
    let unit_dir = fixture.unit("Foo");
    plain_file(&unit_dir, "info", "Foo adds a\nfoo tag.\n");
    fixture.unit("Bar");
    let installer = fixture.installer();

    assert_eq!(
        installer.info("Foo").unwrap(),
        UnitInfo::Provided("Foo adds a\nfoo tag.\n".to_string())
    );
    let missing = installer.info("Bar").unwrap();
    assert_eq!(missing, UnitInfo::Missing);
    assert_eq!(missing.to_string(), "This installer provides no information.");
    assert!(matches!(
        installer.info("Nope").unwrap_err(),
        InstallerError::NotFound { .. }
    ));
}

#[test]
fn can_execute_checks_unit_first() {
    let fixture = Fixture::new();
    let unit_dir = fixture.unit("Foo");
    script(&unit_dir, "setup.sh", "true");
    let installer = fixture.installer();

    assert!(installer.can_execute("Foo", "setup").unwrap());
    assert!(!installer.can_execute("Foo", "download").unwrap());
    assert!(matches!(
        installer.can_execute("Nope", "setup").unwrap_err(),
        InstallerError::NotFound { .. }
    ));
}

#[test]
fn tags_offering_a_unit() {
    let mut fixture = Fixture::new();
    let tags_dir = fixture.root().join("tags");
    for (tag, units) in [("1.15", &["Foo"][..]), ("1.13", &["Foo", "Bar"][..]), ("1.14", &[][..])] {
        for unit in units {
            fs::create_dir_all(tags_dir.join(tag).join("extensions").join(unit)).unwrap();
        }
        fs::create_dir_all(tags_dir.join(tag)).unwrap();
    }
    fixture.config.tags_dir = Some(tags_dir);
    fixture.unit("Foo");
    fixture.unit("Bar");
    let installer = fixture.installer();

    assert_eq!(installer.list_tags("Foo").unwrap(), ["1.13", "1.15"]);
    assert_eq!(installer.list_tags("Bar").unwrap(), ["1.13"]);
    assert!(installer.tags().is_some());
}

#[test]
fn no_tags_without_tags_dir() {
    let fixture = Fixture::new();
    fixture.unit("Foo");

    assert!(fixture.installer().list_tags("Foo").unwrap().is_empty());
}
