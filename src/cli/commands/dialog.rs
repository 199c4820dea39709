use dialoguer::Select;
use futures::executor::block_on;

use crate::cli::core::{CliMode, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::render;
use crate::dialog::CommitOutcome;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("edit", "Start editing a module", "edit <module>", cmd_edit),
        CommandEntry::new("fields", "List fields and working values", "fields", cmd_fields),
        CommandEntry::new(
            "set",
            "Set a field to an account set code",
            "set <field|#> <code>",
            cmd_set,
        ),
        CommandEntry::new("clear", "Unset a field", "clear <field|#>", cmd_clear),
        CommandEntry::new(
            "pick",
            "Choose a field's account set from a list",
            "pick <field|#>",
            cmd_pick,
        ),
        CommandEntry::new(
            "defaults",
            "Apply the documented default codes",
            "defaults",
            cmd_defaults,
        ),
        CommandEntry::new("changes", "Show pending changes", "changes", cmd_changes),
        CommandEntry::new("review", "Review changes before saving", "review", cmd_review),
        CommandEntry::new("back", "Return from review to editing", "back", cmd_back),
        CommandEntry::new("save", "Save the reviewed configuration", "save", cmd_save),
        CommandEntry::new("cancel", "Discard the open dialog", "cancel", cmd_cancel),
    ]
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let key = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: edit <module>".into()))?;
    let title = context.module(key)?.title();
    let active = context.open_dialog(key)?;
    if active.session.options_errored() {
        output::warning("Account sets could not be loaded; fields cannot be picked.");
    }
    let pending = active.session.review().len();
    output::success(format!("Editing {} configuration.", title));
    if pending > 0 {
        output::info(format!("{} default codes applied; review them with `changes`.", pending));
    }
    Ok(())
}

fn cmd_fields(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let session = &context.active()?.session;
    print!(
        "{}",
        render::render_sections(&session.sections(), session.options_errored())
    );
    Ok(())
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [field, code] = args else {
        return Err(CommandError::InvalidArguments(
            "usage: set <field|#> <code>".into(),
        ));
    };
    let key = resolve_field(context, field)?;
    context
        .active_mut()?
        .session
        .set_field_value(key, code.trim().to_string())?;
    output::info(format!("{} = {}", key, code.trim()));
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let field = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: clear <field|#>".into()))?;
    let key = resolve_field(context, field)?;
    context
        .active_mut()?
        .session
        .set_field_value(key, String::new())?;
    output::info(format!("{} cleared", key));
    Ok(())
}

fn cmd_pick(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if context.mode == CliMode::Script {
        return Err(CommandError::Message(
            "`pick` needs an interactive terminal; use `set` instead.".into(),
        ));
    }
    let field = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: pick <field|#>".into()))?;
    let key = resolve_field(context, field)?;
    let view = context
        .active()?
        .session
        .field(key)
        .ok_or_else(|| CommandError::InvalidArguments(format!("unknown field `{}`", key)))?;
    if view.disabled {
        return Err(CommandError::Message(format!(
            "No {} account sets are available for {}.",
            view.category, key
        )));
    }

    let labels: Vec<&str> = view.options.iter().map(|option| option.label.as_str()).collect();
    let current = view
        .options
        .iter()
        .position(|option| option.value == view.value)
        .unwrap_or(0);
    let choice = Select::with_theme(&context.theme)
        .with_prompt(key)
        .items(&labels)
        .default(current)
        .interact_opt()?;
    let Some(index) = choice else {
        output::info("Selection cancelled.");
        return Ok(());
    };
    let picked = view.options[index].value.clone();
    context.active_mut()?.session.set_field_value(key, picked)?;
    output::info(format!("{} = {}", key, view.options[index].label));
    Ok(())
}

fn cmd_defaults(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let module = context.active()?.module;
    let defaults = context.module(module)?.default_form_data();
    let changed = context.active_mut()?.session.apply(&defaults)?;
    output::info(format!("{} fields set to their default codes.", changed));
    Ok(())
}

fn cmd_changes(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let active = context.active()?;
    let changes = active.session.review();
    if changes.is_empty() {
        output::info("No pending changes.");
        return Ok(());
    }
    let title = context.module(active.module)?.title();
    print!("{}", render::render_review(title, &changes));
    Ok(())
}

fn cmd_review(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let active = context.active_mut()?;
    active.session.request_review()?;
    let module = active.module;
    let changes = active.session.review();
    let title = context.module(module)?.title();
    print!("{}", render::render_review(title, &changes));
    output::hint("`save` to apply, `back` to keep editing.");
    Ok(())
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.active_mut()?.session.go_back()?;
    output::info("Back to editing.");
    Ok(())
}

fn cmd_save(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let outcome = block_on(context.active_mut()?.session.commit())?;
    context.release_closed_dialog();
    match outcome {
        CommitOutcome::Committed { message } => {
            output::success(message);
            Ok(())
        }
        CommitOutcome::Failed { message } => Err(CommandError::Message(format!(
            "Save failed: {}. Use `save` to retry or `back` to edit.",
            message
        ))),
        CommitOutcome::Ignored => Ok(()),
    }
}

fn cmd_cancel(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let active = context.active_mut()?;
    let module = active.module;
    active.session.close();
    context.release_closed_dialog();
    output::info(format!("Discarded changes to {}.", module));
    Ok(())
}

/// Accepts a field key or its 1-based position in the `fields` listing.
fn resolve_field(context: &ShellContext, input: &str) -> Result<&'static str, CommandError> {
    let active = context.active()?;
    let keys: Vec<&'static str> = active
        .session
        .sections()
        .iter()
        .flat_map(|section| section.fields.iter().map(|field| field.key))
        .collect();
    if let Ok(position) = input.parse::<usize>() {
        return position
            .checked_sub(1)
            .and_then(|index| keys.get(index).copied())
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!(
                    "field number must be between 1 and {}",
                    keys.len()
                ))
            });
    }
    keys.iter()
        .copied()
        .find(|key| key.eq_ignore_ascii_case(input))
        .ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "`{}` is not a field of the {} module",
                input, active.module
            ))
        })
}
