use crate::cli::core::{CliMode, CommandResult, ShellContext};
use crate::cli::io as cli_io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::core::services::AuthService;
use crate::domain::Displayable;

use super::parse_role;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "login",
            "Start a session by email or name",
            "login <email|name> [password] [admin|user]",
            cmd_login,
        ),
        CommandEntry::new("logout", "End the current session", "logout", cmd_logout),
        CommandEntry::new("whoami", "Show the logged-in user", "whoami", cmd_whoami),
    ]
}

fn cmd_login(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(identifier) = args.first() else {
        return Err(context.usage_error("login"));
    };
    let password = match args.get(1) {
        Some(password) => (*password).to_string(),
        None if context.mode == CliMode::Interactive => {
            cli_io::prompt_password(&context.theme, "Password")?
        }
        None => return Err(context.usage_error("login")),
    };
    let role = match args.get(2) {
        Some(role) => parse_role(role)?,
        None => context.config.default_role,
    };

    let user = AuthService::login(&mut context.db, identifier, &password, role)?;
    output::success(format!("Welcome, {} ({}).", user.name, user.role));
    Ok(())
}

fn cmd_logout(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !AuthService::is_authenticated(&context.db)? {
        output::info("No active session.");
        return Ok(());
    }
    AuthService::logout(&mut context.db)?;
    output::success("Logged out.");
    Ok(())
}

fn cmd_whoami(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match AuthService::current_user(&context.db)? {
        Some(user) => output::info(format!("{} id={}", user.display_label(), user.id)),
        None => output::info("Not logged in."),
    }
    Ok(())
}
