pub mod json_backend;

use crate::errors::ConfigError;

pub type Result<T> = std::result::Result<T, ConfigError>;

pub use json_backend::{JsonModuleStore, ACCOUNT_SETS_FILE};
