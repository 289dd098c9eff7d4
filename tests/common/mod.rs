#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use finanza_core::{config::ConfigManager, core::Database, storage::JsonFileStore};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 15).expect("valid date")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Creates a unique base directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Opens a database over `<base>/store` without seeding it.
pub fn open_database(base: &Path) -> Database {
    let store = JsonFileStore::new(base.join("store")).expect("create json store");
    Database::new(Box::new(store))
}

/// Creates an isolated, seeded database and a config manager sharing one base directory.
pub fn setup_test_env() -> (Database, ConfigManager, PathBuf) {
    let base = temp_base();
    let mut db = open_database(&base);
    db.initialize(today()).expect("seed database");
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (db, config_manager, base)
}
