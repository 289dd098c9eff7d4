use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "config",
        "Show or change preferences",
        "config show\nconfig set <key> <value>",
        cmd_config,
    )
    .with_actions(&["show", "set"])]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => show(context),
        [action, rest @ ..] => match action.to_lowercase().as_str() {
            "show" => show(context),
            "set" => set(context, rest),
            other => Err(CommandError::InvalidArguments(format!(
                "unknown config subcommand `{}`",
                other
            ))),
        },
    }
}

fn show(context: &ShellContext) -> CommandResult {
    output::section("Configuration");
    for (key, value) in context.config.entries() {
        output::info(format!("  {key:<17}: {value}"));
    }
    output::info(format!(
        "  {:<17}: {}",
        "config_file",
        context.config_manager.config_path().display()
    ));
    Ok(())
}

fn set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [key, value @ ..] = args else {
        return Err(context.usage_error("config"));
    };
    if value.is_empty() {
        return Err(context.usage_error("config"));
    }
    let value = value.join(" ");
    context.config.set(key, &value)?;
    context.persist_config()?;
    context.apply_output_preferences();
    output::success(format!("Set {key} = {value}."));
    if matches!(*key, "key_prefix" | "data_root") {
        output::hint("Store changes apply the next time the shell starts.");
    }
    Ok(())
}
