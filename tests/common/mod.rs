#![allow(dead_code)]

use std::path::Path;
use std::sync::Mutex;

use bizdash_core::{
    config::ConfigManager,
    engine::{FixedClock, Session, WorkflowSettings},
};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Config manager rooted in a fresh temporary directory.
pub fn setup_config_manager() -> ConfigManager {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    ConfigManager::with_base_dir(base).expect("create config manager for temp dir")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn today() -> NaiveDate {
    date(2024, 7, 10)
}

pub fn seeded_session() -> Session {
    Session::seeded(WorkflowSettings::default(), &FixedClock::new(today()))
}

pub fn empty_session() -> Session {
    Session::empty(WorkflowSettings::default(), &FixedClock::new(today()))
}

/// The CLI binary in script mode, isolated to `home` and pinned to [`today`].
pub fn script_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("bizdash_cli").expect("binary built");
    cmd.env("BIZDASH_CLI_SCRIPT", "1")
        .env("BIZDASH_HOME", home)
        .env("BIZDASH_TODAY", "2024-07-10")
        .env_remove("RUST_LOG");
    cmd
}
