use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "config",
            "Show or change console settings",
            "config [seed-defaults on|off | retention <n>]",
            cmd_config,
        ),
        CommandEntry::new("version", "Show version and data location", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {}
        ["seed-defaults", value] => {
            context.config_mut().seed_defaults = parse_switch(value)?;
            context.persist_config()?;
        }
        ["retention", value] => {
            let retention = value
                .parse::<usize>()
                .ok()
                .filter(|count| *count > 0)
                .ok_or_else(|| {
                    CommandError::InvalidArguments("retention must be a positive number".into())
                })?;
            context.config_mut().backup_retention = retention;
            context.persist_config()?;
            output::hint("Retention applies from the next start.");
        }
        _ => {
            return Err(CommandError::InvalidArguments(
                "usage: config [seed-defaults on|off | retention <n>]".into(),
            ))
        }
    }
    let config = context.config();
    output::info(format!("  locale          : {}", config.locale));
    output::info(format!(
        "  store           : {}",
        context.store().base_dir().display()
    ));
    output::info(format!("  backup retention: {}", config.backup_retention));
    output::info(format!(
        "  seed defaults   : {}",
        if config.seed_defaults { "on" } else { "off" }
    ));
    Ok(())
}

fn parse_switch(value: &str) -> Result<bool, CommandError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected on or off, got `{}`",
            other
        ))),
    }
}

fn cmd_version(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section(format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")));
    output::info(format!("  Modules : {}", context.modules.keys().join(", ")));
    output::info(format!("  Data    : {}", context.store().base_dir().display()));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => {
                output::info(format!("{} - {}", entry.name, entry.description));
                output::info(format!("usage: {}", entry.usage));
            }
            None => context.suggest_command(name),
        }
        return Ok(());
    }

    output::section("Available commands");
    let width = context
        .command_names()
        .iter()
        .map(|name| name.len())
        .max()
        .unwrap_or(0);
    for entry in context.registry.list() {
        output::info(format!("  {:<width$}  {}", entry.name, entry.description));
    }
    output::hint("Use `help <command>` for details.");
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
