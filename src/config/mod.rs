use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::utils::{
    ensure_dir,
    persistence::{load_json_opt, save_json_atomic},
    resolve_base,
};

const CONFIG_FILE: &str = "console.json";
const DEFAULT_BACKUP_RETENTION: usize = 5;

/// Settings of the operator console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub locale: String,
    /// Overrides the directory holding module configurations and account sets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
    pub backup_retention: usize,
    /// Prefill documented default codes when editing a module that has never
    /// been configured.
    pub seed_defaults: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            store_dir: None,
            backup_retention: DEFAULT_BACKUP_RETENTION,
            seed_defaults: false,
        }
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_base(resolve_base(None))
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
            base,
        })
    }

    pub fn load(&self) -> Result<ConsoleConfig, ConfigError> {
        Ok(load_json_opt(&self.path)?.unwrap_or_default())
    }

    pub fn save(&self, config: &ConsoleConfig) -> Result<(), ConfigError> {
        save_json_atomic(config, &self.path)
    }

    /// Store directory the config points at, else the application directory.
    pub fn store_root(&self, config: &ConsoleConfig) -> PathBuf {
        config
            .store_dir
            .clone()
            .unwrap_or_else(|| self.base.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
