use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use tracing::warn;

use crate::cli::core::{CliError, CliMode, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandRegistry;
use crate::core::services::AuthService;

pub const SCRIPT_ENV: &str = "FINANZA_CLI_SCRIPT";

const HISTORY_FILE: &str = "history.txt";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };
    let mut context = ShellContext::new(mode)?;

    match mode {
        CliMode::Script => run_loop(&mut context, &mut ScriptInput::new(io::stdin().lock())),
        CliMode::Interactive => {
            let mut input = EditorInput::open(&context)?;
            greet(&context);
            let outcome = run_loop(&mut context, &mut input);
            input.save_history();
            outcome
        }
    }
}

/// What the next read produced.
enum Line {
    Text(String),
    Interrupted,
    Closed,
}

trait LineSource {
    fn read(&mut self, prompt: &str) -> Result<Line, CliError>;

    fn remember(&mut self, _line: &str) {}
}

/// Reads until the input closes or a command ends the session. Blank lines
/// and `#` comments are skipped; command failures are reported and the loop
/// carries on.
fn run_loop(context: &mut ShellContext, input: &mut dyn LineSource) -> Result<(), CliError> {
    while context.running {
        // The prompt names whoever is signed in, so it is rebuilt every turn.
        let prompt = match context.mode {
            CliMode::Interactive => context.prompt(),
            CliMode::Script => String::new(),
        };
        let text = match input.read(&prompt)? {
            Line::Text(text) => text,
            Line::Interrupted => {
                if context.confirm_exit()? {
                    break;
                }
                continue;
            }
            Line::Closed => break,
        };

        let line = text.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        input.remember(line);
        if let Err(err) = context.process_line(line) {
            context.report_error(err)?;
        }
    }
    Ok(())
}

fn greet(context: &ShellContext) {
    output::info("FinanzaPro shell. Type `help` to list commands.");
    match AuthService::current_user(&context.db) {
        Ok(Some(user)) => output::info(format!("Signed in as {} ({}).", user.name, user.role)),
        Ok(None) => output::hint("Use `login <email|name> <password> [role]` to start."),
        Err(err) => warn!(error = %err, "could not read the stored session"),
    }
}

struct ScriptInput<R> {
    lines: io::Lines<R>,
}

impl<R: BufRead> ScriptInput<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }
}

impl<R: BufRead> LineSource for ScriptInput<R> {
    fn read(&mut self, _prompt: &str) -> Result<Line, CliError> {
        match self.lines.next() {
            Some(line) => Ok(Line::Text(line?)),
            None => Ok(Line::Closed),
        }
    }
}

struct EditorInput {
    editor: Editor<ShellHelper, DefaultHistory>,
    history: PathBuf,
}

impl EditorInput {
    fn open(context: &ShellContext) -> Result<Self, CliError> {
        let mut editor = Editor::<ShellHelper, DefaultHistory>::new()?;
        editor.set_helper(Some(ShellHelper {
            registry: context.registry.clone(),
        }));
        editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

        let history = context.config_manager.base_dir().join(HISTORY_FILE);
        if history.exists() {
            if let Err(err) = editor.load_history(&history) {
                warn!(path = %history.display(), error = %err, "history not loaded");
            }
        }
        Ok(Self { editor, history })
    }

    fn save_history(&mut self) {
        if let Err(err) = self.editor.save_history(&self.history) {
            warn!(path = %self.history.display(), error = %err, "history not saved");
        }
    }
}

impl LineSource for EditorInput {
    fn read(&mut self, prompt: &str) -> Result<Line, CliError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Line::Text(line)),
            Err(ReadlineError::Interrupted) => Ok(Line::Interrupted),
            Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                Ok(Line::Closed)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn remember(&mut self, line: &str) {
        // Passwords typed inline stay out of the history file.
        if !line.to_lowercase().starts_with("login") {
            self.editor.add_history_entry(line).ok();
        }
    }
}

/// Completes command names, then subcommands, then `--flags`, all taken from
/// the registered command entries.
struct ShellHelper {
    registry: CommandRegistry,
}

impl ShellHelper {
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let typed = &line[..pos];
        let start = typed
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let before: Vec<&str> = typed[..start].split_whitespace().collect();
        let partial = &typed[start..];
        let dashes = if partial.starts_with("--") { "--" } else { "" };

        let pairs = self
            .registry
            .completions(&before, partial)
            .into_iter()
            .map(|word| Pair {
                display: word.to_string(),
                replacement: format!("{dashes}{word}"),
            })
            .collect();
        (start, pairs)
    }
}

impl Helper for ShellHelper {}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}
