//! Shell state, dispatch and error reporting.

use std::{io, path::PathBuf, sync::Arc};

use dialoguer::{theme::ColorfulTheme, Confirm};
use rustyline::error::ReadlineError;
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigManager, ConsoleConfig};
use crate::dialog::{DialogError, DialogSession, DialogStep};
use crate::errors::ConfigError;
use crate::modules::{ConfigurableModule, ModuleRegistry};
use crate::sink::ConfigureModule;
use crate::storage::JsonModuleStore;

use super::commands;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("No module is being edited. Use `edit <module>` first.")]
    NoActiveDialog,
    #[error(transparent)]
    Dialog(#[from] DialogError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
    #[error("{0}")]
    Message(String),
    #[error("exit requested")]
    ExitRequested,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

/// The dialog currently driven by the shell and the module it belongs to.
pub(crate) struct ActiveDialog {
    pub module: &'static str,
    pub session: Box<dyn DialogSession>,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub modules: ModuleRegistry,
    pub theme: ColorfulTheme,
    pub last_command: Option<String>,
    pub running: bool,
    store: Arc<JsonModuleStore>,
    config_manager: ConfigManager,
    config: ConsoleConfig,
    active: Option<ActiveDialog>,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::new()?)
    }

    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        Self::with_config_manager(mode, ConfigManager::with_base_dir(base)?)
    }

    fn with_config_manager(mode: CliMode, config_manager: ConfigManager) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        let store = JsonModuleStore::new(
            Some(config_manager.store_root(&config)),
            Some(config.backup_retention),
        )?;
        debug!(store = %store.base_dir().display(), ?mode, "shell context ready");

        Ok(Self {
            mode,
            registry,
            modules: ModuleRegistry::new(),
            theme: ColorfulTheme::default(),
            last_command: None,
            running: true,
            store: Arc::new(store),
            config_manager,
            config,
            active: None,
        })
    }

    pub fn store(&self) -> &JsonModuleStore {
        &self.store
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn config_mut(&mut self) -> &mut ConsoleConfig {
        &mut self.config
    }

    pub(crate) fn module(&self, key: &str) -> Result<&dyn ConfigurableModule, CommandError> {
        Ok(self.modules.require(key)?)
    }

    pub(crate) fn prompt(&self) -> String {
        match &self.active {
            Some(active) => {
                let step = match active.session.step() {
                    DialogStep::Edit => "edit",
                    DialogStep::Confirm => "review",
                };
                format!("module_config[{}:{}]> ", active.module, step)
            }
            None => "module_config> ".to_string(),
        }
    }

    /// Opens a fresh dialog for `key` seeded from the stored configuration.
    pub(crate) fn open_dialog(&mut self, key: &str) -> Result<&mut ActiveDialog, CommandError> {
        if let Some(active) = &self.active {
            return Err(CommandError::Message(format!(
                "Still editing `{}`. Use `cancel` or `save` first.",
                active.module
            )));
        }
        let module = self.modules.require(key)?;
        let module_key = module.key();
        let sink: Arc<dyn ConfigureModule> = self.store.clone();
        let mut session = module.new_session(sink);
        session.load_options(self.store.load_account_sets().map_err(|err| err.to_string()));

        let stored = self.store.load_config(module_key)?;
        session.open(stored.as_ref());
        if stored.is_none() && self.config.seed_defaults {
            let seeded = session.apply(&module.default_form_data())?;
            debug!(module = module_key, seeded, "default codes applied");
        }

        Ok(self.active.insert(ActiveDialog {
            module: module_key,
            session,
        }))
    }

    pub(crate) fn active(&self) -> Result<&ActiveDialog, CommandError> {
        self.active.as_ref().ok_or(CommandError::NoActiveDialog)
    }

    pub(crate) fn active_mut(&mut self) -> Result<&mut ActiveDialog, CommandError> {
        self.active.as_mut().ok_or(CommandError::NoActiveDialog)
    }

    /// Drops the dialog once its session has closed (after a save, or cancel).
    pub(crate) fn release_closed_dialog(&mut self) {
        if self
            .active
            .as_ref()
            .is_some_and(|active| !active.session.is_open())
        {
            self.active = None;
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        let Some(handler) = self.registry.handler(command) else {
            self.suggest_command(raw);
            return Ok(LoopControl::Continue);
        };
        match handler(self, args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = self.registry.closest(input, 3) {
            output::info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        let prompt = if self.active.is_some() {
            "Discard the open dialog and exit?"
        } else {
            "Exit shell?"
        };
        Ok(Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Dialog(DialogError::NothingToReview) => {
                output::error(DialogError::NothingToReview);
                output::hint("Change at least one field with `set` or `pick`.");
            }
            other => output::error(other),
        }
        Ok(())
    }
}
