#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use subscription_core::{
    config::Config,
    core::{FixedClock, SubscriptionManager},
    notifications::InMemoryScheduler,
    storage::{JsonStore, MemoryStore},
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Creates a fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Manager over an in-memory store with the clock pinned to `today`.
pub fn memory_manager(today: NaiveDate) -> (SubscriptionManager, InMemoryScheduler) {
    let scheduler = InMemoryScheduler::new();
    let manager = SubscriptionManager::new(
        Box::new(MemoryStore::new()),
        Box::new(scheduler.clone()),
        Box::new(FixedClock::on(today)),
        Config::default(),
    );
    (manager, scheduler)
}

/// Manager over a JSON store in a unique temp directory.
pub fn json_manager(today: NaiveDate) -> (SubscriptionManager, InMemoryScheduler, PathBuf) {
    let path = temp_base().join("subscriptions.json");
    let (store, report) = JsonStore::open(&path).expect("open json store");
    assert!(report.is_clean());
    let scheduler = InMemoryScheduler::new();
    let manager = SubscriptionManager::new(
        Box::new(store),
        Box::new(scheduler.clone()),
        Box::new(FixedClock::on(today)),
        Config::default(),
    );
    (manager, scheduler, path)
}
