use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, Alignment};
use crate::cli::registry::CommandEntry;
use crate::core::services::UserService;
use crate::domain::{Role, User};

use super::parse_role;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "user",
        "Manage user accounts (admin)",
        "user list\nuser add <name> <email> <password> [admin|user]\nuser remove <id>",
        cmd_user,
    )
    .with_actions(&["list", "add", "remove"])]
}

fn cmd_user(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return Err(context.usage_error("user"));
    };
    match action.to_lowercase().as_str() {
        "list" => handle_list(context),
        "add" => handle_add(context, rest),
        "remove" => handle_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown user subcommand `{}`",
            other
        ))),
    }
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let users = UserService::list(&context.db)?;
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|user| {
            vec![
                user.id.clone(),
                user.name.clone(),
                user.email.clone(),
                user.role.to_string(),
            ]
        })
        .collect();
    output::print_table(
        &[
            ("ID", Alignment::Left),
            ("Name", Alignment::Left),
            ("Email", Alignment::Left),
            ("Role", Alignment::Left),
        ],
        &rows,
    );
    Ok(())
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [name, email, password, rest @ ..] = args else {
        return Err(context.usage_error("user"));
    };
    let role = match rest.first() {
        Some(role) => parse_role(role)?,
        None => Role::User,
    };
    let user = UserService::save(&mut context.db, User::new(*name, *email, *password, role))?;
    output::success(format!("User `{}` created with id {}.", user.name, user.id));
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(id) = args.first() else {
        return Err(context.usage_error("user"));
    };
    if !context.confirm(&format!("Remove user `{id}`?"))? {
        output::info("Operation cancelled.");
        return Ok(());
    }
    UserService::delete(&mut context.db, id)?;
    output::success(format!("User `{id}` removed."));
    Ok(())
}
