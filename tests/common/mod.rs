#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use module_config::options::AccountSetRecord;
use module_config::storage::JsonModuleStore;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Store in a fresh directory, seeded with a few account sets.
pub fn seeded_store() -> Arc<JsonModuleStore> {
    let store = JsonModuleStore::new(Some(temp_base()), Some(3)).expect("create json store");
    store
        .save_account_sets(&sample_account_sets())
        .expect("seed account sets");
    Arc::new(store)
}

pub fn sample_account_sets() -> Vec<AccountSetRecord> {
    vec![
        AccountSetRecord::new("1110.01.0101", "Cash at bank", "asset"),
        AccountSetRecord::new("2110.01.0101", "Individual deposits", "liability"),
        AccountSetRecord::new("2120.01.0101", "Frozen individual deposits", "liability"),
        AccountSetRecord::new("9110.02.0201", "Facility omnibus", "offBalanceSheet"),
        AccountSetRecord::new("6110.01.0100", "Interest income", "revenue"),
    ]
}
