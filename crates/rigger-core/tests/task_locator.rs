#![cfg(unix)]

mod support;

use std::fs;

use tempfile::TempDir;

use rigger_core::task::{can_execute, locate};

use support::{plain_file, script};

#[test]
fn locate_matches_by_prefix_and_never_matches_other_tasks() {
    let temp = TempDir::new().unwrap();
    script(temp.path(), "setup.sh", "true");
    script(temp.path(), "setup_helper.py", "true");
    plain_file(temp.path(), "info", "About this unit");

    let found = locate(temp.path(), "setup").unwrap().unwrap();
    let name = found.file_name().unwrap().to_str().unwrap();
    assert!(name == "setup.sh" || name == "setup_helper.py");
    assert_ne!(name, "info");
}

#[test]
fn locate_picks_the_same_script_every_time() {
    let temp = TempDir::new().unwrap();
    script(temp.path(), "setup_helper.py", "true");
    script(temp.path(), "setup.sh", "true");

    let first = locate(temp.path(), "setup").unwrap();
    for _ in 0..5 {
        assert_eq!(locate(temp.path(), "setup").unwrap(), first);
    }
    assert_eq!(first.unwrap(), temp.path().join("setup.sh"));
}

#[test]
fn locate_returns_none_without_match() {
    let temp = TempDir::new().unwrap();
    script(temp.path(), "download.sh", "true");

    assert_eq!(locate(temp.path(), "setup").unwrap(), None);
    assert_eq!(locate(temp.path(), "").unwrap(), None);
}

#[test]
fn locate_ignores_directories() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("setup.d")).unwrap();

    assert_eq!(locate(temp.path(), "setup").unwrap(), None);
}

#[test]
fn locate_fails_for_missing_unit_directory() {
    let temp = TempDir::new().unwrap();
    let result = locate(&temp.path().join("missing.install"), "setup");
    assert!(result.is_err());
}

#[test]
fn can_execute_requires_execute_bit() {
    let temp = TempDir::new().unwrap();
    script(temp.path(), "download.sh", "true");
    plain_file(temp.path(), "setup.sh", "#!/bin/sh\ntrue\n");

    assert!(can_execute(temp.path(), "download").unwrap());
    assert!(!can_execute(temp.path(), "setup").unwrap());
    assert!(!can_execute(temp.path(), "uninstall").unwrap());
}
