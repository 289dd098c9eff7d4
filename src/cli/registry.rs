use strsim::levenshtein;

use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Largest edit distance still offered as a "did you mean" suggestion.
const SUGGESTION_DISTANCE: usize = 3;

/// A top-level shell command. `actions` lists its subcommands and `flags`
/// the long options any of them accept; both feed tab completion.
#[derive(Clone, Copy)]
pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
    pub actions: &'static [&'static str],
    pub flags: &'static [&'static str],
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
            actions: &[],
            flags: &[],
        }
    }

    pub fn with_actions(mut self, actions: &'static [&'static str]) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_flags(mut self, flags: &'static [&'static str]) -> Self {
        self.flags = flags;
        self
    }
}

/// Commands in registration order, which is also the order `help` lists them.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `entry`, replacing any earlier command of the same name in place.
    pub fn register(&mut self, entry: CommandEntry) {
        match self.entries.iter_mut().find(|known| known.name == entry.name) {
            Some(slot) => *slot = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn find(&self, name: &str) -> Option<&CommandEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name))
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// The registered name closest to a mistyped `input`, if any is near enough.
    pub fn closest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.entries
            .iter()
            .map(|entry| (levenshtein(entry.name, &needle), entry.name))
            .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }

    /// Candidates for the word being typed. `before` holds the words already
    /// complete on the line; `partial` is the prefix under the cursor.
    pub fn completions(&self, before: &[&str], partial: &str) -> Vec<&'static str> {
        let needle = partial.to_ascii_lowercase();
        let pool: Vec<&'static str> = match before.split_first() {
            None => self.entries.iter().map(|entry| entry.name).collect(),
            Some((command, rest)) => {
                let Some(entry) = self.find(command) else {
                    return Vec::new();
                };
                if let Some(flag) = needle.strip_prefix("--") {
                    return entry
                        .flags
                        .iter()
                        .filter(|name| name.starts_with(flag))
                        .copied()
                        .collect();
                }
                if rest.is_empty() {
                    entry.actions.to_vec()
                } else {
                    Vec::new()
                }
            }
        };
        let mut matches: Vec<&'static str> = pool
            .into_iter()
            .filter(|name| name.starts_with(&needle))
            .collect();
        matches.sort_unstable();
        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(
            CommandEntry::new("movement", "", "", noop)
                .with_actions(&["list", "add", "update", "remove"])
                .with_flags(&["type", "amount", "category", "date", "desc"]),
        );
        registry.register(CommandEntry::new("logout", "", "", noop));
        registry.register(CommandEntry::new("login", "", "", noop));
        registry
    }

    #[test]
    fn first_word_completes_command_names() {
        assert_eq!(registry().completions(&[], "lo"), vec!["login", "logout"]);
        assert_eq!(registry().completions(&[], ""), vec!["login", "logout", "movement"]);
    }

    #[test]
    fn second_word_completes_subcommands() {
        let registry = registry();
        assert_eq!(registry.completions(&["movement"], "u"), vec!["update"]);
        assert_eq!(registry.completions(&["MOVEMENT"], "re"), vec!["remove"]);
        assert!(registry.completions(&["movement", "add"], "x").is_empty());
        assert!(registry.completions(&["logout"], "").is_empty());
    }

    #[test]
    fn double_dash_completes_flag_names() {
        let registry = registry();
        assert_eq!(registry.completions(&["movement", "add"], "--d"), vec!["date", "desc"]);
        assert!(registry.completions(&["budgets", "add"], "--").is_empty());
    }

    #[test]
    fn reregistering_keeps_listing_order() {
        let mut registry = registry();
        registry.register(CommandEntry::new("movement", "replaced", "", noop));
        let names: Vec<_> = registry.entries().iter().map(|entry| entry.name).collect();
        assert_eq!(names, vec!["movement", "logout", "login"]);
        assert_eq!(registry.find("movement").map(|entry| entry.description), Some("replaced"));
    }

    #[test]
    fn close_typos_get_a_suggestion() {
        let registry = registry();
        assert_eq!(registry.closest("movment"), Some("movement"));
        assert_eq!(registry.closest("LOGN"), Some("login"));
        assert_eq!(registry.closest("xyzzyplugh"), None);
    }
}
