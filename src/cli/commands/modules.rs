use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render::{self, ModuleLine};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("modules", "List configurable modules", "modules", cmd_modules),
        CommandEntry::new(
            "show",
            "Show the stored configuration of a module",
            "show <module>",
            cmd_show,
        ),
        CommandEntry::new(
            "options",
            "List account sets, optionally for one category",
            "options [category]",
            cmd_options,
        ),
    ]
}

fn cmd_modules(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let mut lines = Vec::new();
    for module in context.modules.iter() {
        lines.push(ModuleLine {
            key: module.key(),
            title: module.title(),
            fields: module.field_keys().len(),
            configured: context.store().load_config(module.key())?.is_some(),
        });
    }
    output::section("Modules");
    print!("{}", render::render_modules(&lines));
    Ok(())
}

fn cmd_show(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: show <module>".into()))?;
    let module = context.module(key)?;
    let stored = context.store().load_config(module.key())?;
    let records = match context.store().load_account_sets() {
        Ok(records) => records,
        Err(err) => {
            output::warning(format!("Account sets unavailable: {}", err));
            Vec::new()
        }
    };
    let summary = module.summarize(stored.as_ref(), &records);
    print!("{}", render::render_summary(module.title(), &summary));
    Ok(())
}

fn cmd_options(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut records = context.store().load_account_sets()?;
    if let Some(category) = args.first() {
        records.retain(|record| record.category.eq_ignore_ascii_case(category));
    }
    print!("{}", render::render_account_sets(&records));
    Ok(())
}
