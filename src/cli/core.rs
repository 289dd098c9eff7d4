//! Core CLI loop state, dispatch, and error reporting.

use std::io;

use chrono::{Local, NaiveDate};
use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use tracing::debug;

use crate::{
    config::{Config, ConfigManager},
    core::{
        services::{AuthService, ServiceError},
        utils::store_dir_in,
        Database,
    },
    errors::FinanceError,
    storage::JsonFileStore,
};

use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};

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

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("Command failed: {0}")]
    Command(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Finance(#[from] FinanceError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub db: Database,
    pub config: Config,
    pub config_manager: ConfigManager,
    pub theme: ColorfulTheme,
    pub running: bool,
}

impl ShellContext {
    /// Loads the configuration, opens the store it points at and seeds any
    /// missing collections.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let root = config
            .data_root
            .clone()
            .unwrap_or_else(|| store_dir_in(config_manager.base_dir()));
        let store = JsonFileStore::new(root)?;
        let mut db = Database::with_keys(Box::new(store), config.store_keys());
        db.initialize(Local::now().date_naive())?;
        debug!(config = %config_manager.config_path().display(), "shell context ready");
        Ok(Self::with_parts(mode, db, config, config_manager))
    }

    pub fn with_parts(
        mode: CliMode,
        db: Database,
        config: Config,
        config_manager: ConfigManager,
    ) -> Self {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);
        let context = Self {
            mode,
            registry,
            db,
            config,
            config_manager,
            theme: ColorfulTheme::default(),
            running: true,
        };
        context.apply_output_preferences();
        context
    }

    pub(crate) fn apply_output_preferences(&self) {
        output::set_preferences(OutputPreferences {
            color_enabled: self.config.ui_color_enabled && self.mode == CliMode::Interactive,
        });
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    pub(crate) fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub(crate) fn prompt(&self) -> String {
        match AuthService::current_user(&self.db).ok().flatten() {
            Some(user) => format!("finanza({})> ", user.name),
            None => "finanza> ".into(),
        }
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.find(name)
    }

    /// Formats `amount` with the configured currency code.
    pub(crate) fn format_amount(&self, amount: f64) -> String {
        format!("{amount:.2} {}", self.config.currency)
    }

    pub(crate) fn usage_error(&self, command: &str) -> CommandError {
        match self.command(command) {
            Some(entry) => CommandError::InvalidArguments(format!("Usage: {}", entry.usage)),
            None => CommandError::InvalidArguments(format!("Invalid arguments for `{command}`")),
        }
    }

    /// Asks before destructive actions. Script mode never prompts.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    /// Splits one shell line into words and runs the command it names.
    /// Quoting errors and unknown commands are reported without failing.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let words = match shell_words::split(line) {
            Ok(words) => words,
            Err(err) => {
                output::warning(format!("Could not parse line: {err}"));
                return Ok(LoopControl::Continue);
            }
        };
        let Some((command, rest)) = words.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let Some(handler) = self.command(command).map(|entry| entry.handler) else {
            self.suggest_command(command);
            return Ok(LoopControl::Continue);
        };

        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        match handler(self, &args) {
            Ok(()) => Ok(LoopControl::Continue),
            Err(CommandError::ExitRequested) => {
                self.running = false;
                Ok(LoopControl::Exit)
            }
            Err(err) => Err(err),
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        if let Some(best) = self.registry.closest(input) {
            output::info(format!("Suggestion: `{best}`?"));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true)
            .map_err(|err| CliError::Command(err.to_string()))
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::Service(ServiceError::NotAuthenticated) => {
                output::error(ServiceError::NotAuthenticated);
                output::hint("Use `login <email|name> <password> [role]` first.");
                Ok(())
            }
            other => {
                output::error(other);
                Ok(())
            }
        }
    }
}
