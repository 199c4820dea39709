//! File-backed module configuration store.
//!
//! Layout under the store root:
//!
//! ```text
//! modules/<module>.json          persisted configuration, unset values as null
//! backups/<module>/<stamp>.json  previous configuration, newest kept first
//! account_sets.json              selectable account sets
//! ```

use async_trait::async_trait;
use chrono::Utc;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::{
    errors::ConfigError,
    form_data::{FormData, ModuleConfig},
    options::AccountSetRecord,
    sink::{ConfigureModule, SinkError},
    utils::{
        ensure_dir,
        persistence::{load_json_opt, save_json_atomic},
        resolve_base,
    },
};

use super::Result;

pub const ACCOUNT_SETS_FILE: &str = "account_sets.json";

const MODULES_DIR: &str = "modules";
const BACKUPS_DIR: &str = "backups";
const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";
const DEFAULT_RETENTION: usize = 5;

#[derive(Debug, Clone)]
pub struct JsonModuleStore {
    root: PathBuf,
    modules_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonModuleStore {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = resolve_base(root);
        let modules_dir = root.join(MODULES_DIR);
        let backups_dir = root.join(BACKUPS_DIR);
        ensure_dir(&modules_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root,
            modules_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self, module: &str) -> PathBuf {
        self.modules_dir
            .join(format!("{}.{}", canonical_name(module), BACKUP_EXTENSION))
    }

    fn backup_dir(&self, module: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(module))
    }

    /// `None` until the module has been configured once.
    pub fn load_config(&self, module: &str) -> Result<Option<ModuleConfig>> {
        load_json_opt(&self.config_path(module))
    }

    /// Replaces the whole record, keeping the previous one as a backup.
    pub fn save_config(&self, module: &str, config: &ModuleConfig) -> Result<()> {
        let path = self.config_path(module);
        if path.exists() {
            self.backup_existing(module, &path)?;
        }
        save_json_atomic(config, &path)?;
        info!(module, path = %path.display(), "module configuration written");
        Ok(())
    }

    /// Backup file names, newest first.
    pub fn list_backups(&self, module: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(module);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| b.cmp(a));
        Ok(entries)
    }

    pub fn load_backup(&self, module: &str, backup_name: &str) -> Result<ModuleConfig> {
        let path = self.backup_dir(module).join(backup_name);
        load_json_opt(&path)?.ok_or_else(|| {
            ConfigError::Storage(format!("backup `{}` not found", backup_name))
        })
    }

    /// Selectable account sets; an absent file means none are defined yet.
    pub fn load_account_sets(&self) -> Result<Vec<AccountSetRecord>> {
        Ok(load_json_opt(&self.root.join(ACCOUNT_SETS_FILE))?.unwrap_or_default())
    }

    pub fn save_account_sets(&self, records: &[AccountSetRecord]) -> Result<()> {
        save_json_atomic(records, &self.root.join(ACCOUNT_SETS_FILE))
    }

    fn backup_existing(&self, module: &str, path: &Path) -> Result<()> {
        let dir = self.backup_dir(module);
        ensure_dir(&dir)?;
        let stem = format!(
            "{}_{}",
            canonical_name(module),
            Utc::now().format(BACKUP_TIMESTAMP_FORMAT)
        );
        let mut attempt = 0;
        let mut target = dir.join(backup_file_name(&stem, attempt));
        while target.exists() {
            attempt += 1;
            target = dir.join(backup_file_name(&stem, attempt));
        }
        fs::copy(path, &target)?;
        debug!(module, backup = %target.display(), "previous configuration backed up");
        self.prune_backups(module)
    }

    fn prune_backups(&self, module: &str) -> Result<()> {
        let backups = self.list_backups(module)?;
        for stale in backups.iter().skip(self.retention) {
            let path = self.backup_dir(module).join(stale);
            if let Err(err) = fs::remove_file(&path) {
                warn!(module, backup = %path.display(), error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ConfigureModule for JsonModuleStore {
    async fn configure(
        &self,
        module: &str,
        input: &FormData,
    ) -> std::result::Result<(), SinkError> {
        self.save_config(module, &ModuleConfig::from_form_data(input))
            .map_err(|err| {
                SinkError::new(format!("Could not save the {} configuration: {}", module, err))
            })
    }
}

/// Same-millisecond collisions get a zero-padded attempt suffix so names keep
/// sorting in creation order.
fn backup_file_name(stem: &str, attempt: usize) -> String {
    if attempt == 0 {
        format!("{}.{}", stem, BACKUP_EXTENSION)
    } else {
        format!("{}_{:03}.{}", stem, attempt, BACKUP_EXTENSION)
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "module".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_temp_dir(retention: usize) -> (JsonModuleStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonModuleStore::new(Some(temp.path().to_path_buf()), Some(retention))
            .expect("json store");
        (store, temp)
    }

    #[test]
    fn unconfigured_modules_load_as_none() {
        let (store, _guard) = store_with_temp_dir(3);
        assert!(store.load_config("credit").expect("load").is_none());
        assert!(store.load_account_sets().expect("account sets").is_empty());
    }

    #[test]
    fn saves_replace_the_record_and_keep_backups() {
        let (store, _guard) = store_with_temp_dir(2);
        for code in ["1", "2", "3", "4"] {
            let config = ModuleConfig::new().with_entry("a", code);
            store.save_config("deposit", &config).expect("save");
        }

        let loaded = store.load_config("deposit").expect("load").expect("configured");
        assert_eq!(loaded.entries.get("a"), Some(&Some("4".to_string())));

        let backups = store.list_backups("deposit").expect("backups");
        assert_eq!(backups.len(), 2);
        let newest = store.load_backup("deposit", &backups[0]).expect("backup");
        assert_eq!(newest.entries.get("a"), Some(&Some("3".to_string())));
    }

    #[test]
    fn colliding_backups_list_newest_first() {
        let (store, _guard) = store_with_temp_dir(20);
        let dir = store.backup_dir("deposit");
        ensure_dir(&dir).expect("backup dir");
        let stem = "deposit_20260101_000000_000";
        for attempt in [0, 2, 10, 1] {
            fs::write(dir.join(backup_file_name(stem, attempt)), "{}").expect("write backup");
        }

        let backups = store.list_backups("deposit").expect("backups");
        assert_eq!(
            backups,
            vec![
                format!("{}_010.json", stem),
                format!("{}_002.json", stem),
                format!("{}_001.json", stem),
                format!("{}.json", stem),
            ]
        );
    }

    #[test]
    fn missing_backup_is_a_storage_error() {
        let (store, _guard) = store_with_temp_dir(2);
        let err = store.load_backup("credit", "nope.json").unwrap_err();
        assert!(matches!(err, ConfigError::Storage(_)));
    }

    #[test]
    fn account_sets_round_trip() {
        let (store, _guard) = store_with_temp_dir(2);
        let records = vec![AccountSetRecord::new("2110", "Deposits", "liability")];
        store.save_account_sets(&records).expect("save");
        assert_eq!(store.load_account_sets().expect("load"), records);
    }

    #[test]
    fn module_names_cannot_escape_the_store() {
        let (store, guard) = store_with_temp_dir(2);
        let path = store.config_path("../credit");
        assert!(path.starts_with(guard.path()));
    }
}
