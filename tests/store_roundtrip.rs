//! Integration tests for load/save round trips against real files

use std::fs;

use confkeep::{AccessMode, ConfigStore, StoreError};
use tempfile::TempDir;

const SAMPLE: &str = "\
; launcher configuration
[zdl.general]
port=gzdoom
skill=4

[zdl.save]
iwad=doom2.wad
; extra files follow
file0=brutal.pk3
";

#[test]
fn test_load_save_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("zdl.ini");
    fs::write(&path, SAMPLE).unwrap();

    let mut store = ConfigStore::new(AccessMode::all());
    store.load(&path).unwrap();

    let out_path = temp_dir.path().join("out.ini");
    store.save(&out_path).unwrap();

    assert_eq!(fs::read_to_string(&out_path).unwrap(), SAMPLE);
}

#[test]
fn test_mutation_keeps_unrelated_lines() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("zdl.ini");
    fs::write(&path, SAMPLE).unwrap();

    let mut store = ConfigStore::new(AccessMode::all());
    store.load(&path).unwrap();
    store.set_value("zdl.general", "skill", "1").unwrap();
    store.delete_value("zdl.save", "file0").unwrap();
    store.save(&path).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("; launcher configuration"));
    assert!(written.contains("; extra files follow"));
    assert!(written.contains("skill=1"));
    assert!(written.contains("iwad=doom2.wad"));
    assert!(!written.contains("file0"));
}

#[test]
fn test_reload_of_written_file_sees_same_values() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("zdl.ini");
    fs::write(&path, SAMPLE).unwrap();

    let mut store = ConfigStore::new(AccessMode::all());
    store.load(&path).unwrap();
    store.set_int("zdl.general", "warp", 12).unwrap();
    store.save(&path).unwrap();

    let mut reloaded = ConfigStore::new(AccessMode::all());
    reloaded.load(&path).unwrap();
    assert_eq!(
        reloaded.value("zdl.general", "warp").unwrap(),
        Some("12".to_string())
    );
    assert_eq!(
        reloaded.value("zdl.general", "port").unwrap(),
        Some("gzdoom".to_string())
    );
}

#[test]
fn test_read_only_file_downgrades_file_write() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("locked.ini");
    fs::write(&path, SAMPLE).unwrap();

    let mut permissions = fs::metadata(&path).unwrap().permissions();
    permissions.set_readonly(true);
    fs::set_permissions(&path, permissions).unwrap();

    let mut store = ConfigStore::new(AccessMode::all());
    store.load(&path).unwrap();

    // The capability was downgraded to match the medium.
    assert!(!store.mode().contains(AccessMode::FILE_WRITE));
    assert!(matches!(
        store.save(&path),
        Err(StoreError::PermissionDenied(_))
    ));

    // In-memory access is unaffected.
    assert_eq!(
        store.value("zdl.general", "port").unwrap(),
        Some("gzdoom".to_string())
    );
    assert!(store.set_value("zdl.general", "port", "prboom").is_ok());

    // Restore so the tempdir can be cleaned up on every platform.
    let mut permissions = fs::metadata(&path).unwrap().permissions();
    #[allow(clippy::permissions_set_readonly_false)]
    permissions.set_readonly(false);
    fs::set_permissions(&path, permissions).unwrap();
}

#[test]
fn test_load_without_file_read_fails_and_leaves_store_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("zdl.ini");
    fs::write(&path, SAMPLE).unwrap();

    let mut store = ConfigStore::new(AccessMode::READ | AccessMode::WRITE);
    assert!(matches!(
        store.load(&path),
        Err(StoreError::PermissionDenied(_))
    ));
    assert_eq!(store.section_count(), 0);
    assert_eq!(store.reads(), 0);
}

#[test]
fn test_failed_open_still_registers_anonymous_section() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.ini");

    let mut store = ConfigStore::new(AccessMode::all());
    assert!(matches!(store.load(&missing), Err(StoreError::Io(_))));
    assert_eq!(store.section_count(), 1);
    assert!(store.iter().next().unwrap().is_anonymous());
}

#[test]
fn test_save_without_file_write_leaves_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("zdl.ini");
    fs::write(&path, SAMPLE).unwrap();

    let mut store = ConfigStore::new(AccessMode::FILE_READ | AccessMode::WRITE);
    store.load(&path).unwrap();
    store.set_value("zdl.general", "skill", "0").unwrap();
    assert!(matches!(
        store.save(&path),
        Err(StoreError::PermissionDenied(_))
    ));

    assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
}

#[test]
fn test_clone_round_trips_like_the_original() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("zdl.ini");
    fs::write(&path, SAMPLE).unwrap();

    let mut store = ConfigStore::new(AccessMode::all());
    store.load(&path).unwrap();

    let mut copy = store.clone();
    copy.reopen(AccessMode::all());
    let copy_path = temp_dir.path().join("copy.ini");
    copy.save(&copy_path).unwrap();

    assert_eq!(fs::read_to_string(&copy_path).unwrap(), SAMPLE);
}
