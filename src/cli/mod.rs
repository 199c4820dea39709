//! Operator console: an interactive shell, or a script runner when
//! `MODULE_CONFIG_CLI_SCRIPT` is set, over the module registry and local store.

pub mod commands;
pub mod core;
pub mod output;
pub mod registry;
pub mod render;
mod shell;

pub use self::core::{CliError, CliMode, CommandError, ShellContext};
pub use shell::run_cli;
