pub mod auth;
pub mod budget;
pub mod category;
pub mod config;
pub mod movement;
pub mod summary;
pub mod system;
pub mod user;

use chrono::NaiveDate;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;
use crate::domain::{MonthKey, MovementKind, Role};

pub fn register_all(registry: &mut CommandRegistry) {
    let groups = [
        system::definitions(),
        auth::definitions(),
        user::definitions(),
        category::definitions(),
        movement::definitions(),
        summary::definitions(),
        budget::definitions(),
        config::definitions(),
    ];
    for entry in groups.into_iter().flatten() {
        registry.register(entry);
    }
}

/// Positional arguments plus `--flag value` / `--flag=value` pairs.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    flags: Vec<(&'a str, &'a str)>,
}

impl<'a> ParsedArgs<'a> {
    pub fn flag(&self, name: &str) -> Option<&'a str> {
        self.flags
            .iter()
            .rev()
            .find(|(flag, _)| *flag == name)
            .map(|(_, value)| *value)
    }

    pub fn has_flags(&self) -> bool {
        !self.flags.is_empty()
    }
}

/// Splits `args` into positionals and the flags listed in `known`.
pub(crate) fn parse_args<'a>(
    args: &[&'a str],
    known: &[&str],
) -> Result<ParsedArgs<'a>, CommandError> {
    let mut parsed = ParsedArgs::default();
    let mut iter = args.iter().copied();
    while let Some(arg) = iter.next() {
        let Some(flag) = arg.strip_prefix("--") else {
            parsed.positional.push(arg);
            continue;
        };
        let (name, inline) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };
        if !known.iter().any(|known| *known == name) {
            return Err(CommandError::InvalidArguments(format!(
                "Unknown option `--{name}`"
            )));
        }
        let value = match inline {
            Some(value) => value,
            None => iter.next().ok_or_else(|| {
                CommandError::InvalidArguments(format!("Option `--{name}` requires a value"))
            })?,
        };
        parsed.flags.push((name, value));
    }
    Ok(parsed)
}

pub(crate) fn parse_kind(value: &str) -> Result<MovementKind, CommandError> {
    value.parse().map_err(CommandError::InvalidArguments)
}

pub(crate) fn parse_role(value: &str) -> Result<Role, CommandError> {
    value.parse().map_err(CommandError::InvalidArguments)
}

pub(crate) fn parse_month(value: &str) -> Result<MonthKey, CommandError> {
    value.parse().map_err(CommandError::InvalidArguments)
}

pub(crate) fn parse_amount(value: &str) -> Result<f64, CommandError> {
    value
        .trim()
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("Invalid amount `{value}`")))
}

/// Parses `YYYY-MM-DD`; `today` resolves to `today`.
pub(crate) fn parse_date(value: &str, today: NaiveDate) -> Result<NaiveDate, CommandError> {
    if value.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("Invalid date `{value}`. Use YYYY-MM-DD."))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_split_from_positionals() {
        let args = ["income", "100", "--date", "2024-03-01", "Salario", "--desc=bonus"];
        let parsed = parse_args(&args, &["date", "desc"]).unwrap();
        assert_eq!(parsed.positional, vec!["income", "100", "Salario"]);
        assert_eq!(parsed.flag("date"), Some("2024-03-01"));
        assert_eq!(parsed.flag("desc"), Some("bonus"));
        assert!(parsed.has_flags());
    }

    #[test]
    fn parsed_flags_outlive_the_known_list() {
        let args = ["--type", "income"];
        let parsed = {
            let known = vec![String::from("type")];
            let known: Vec<&str> = known.iter().map(String::as_str).collect();
            parse_args(&args, &known).unwrap()
        };
        assert_eq!(parsed.flag("type"), Some("income"));
    }

    #[test]
    fn unknown_or_incomplete_flags_fail() {
        assert!(parse_args(&["--color", "red"], &["date"]).is_err());
        assert!(parse_args(&["--date"], &["date"]).is_err());
    }

    #[test]
    fn dates_accept_today_keyword() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date("today", today).unwrap(), today);
        assert_eq!(
            parse_date("2024-02-29", today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date("29/02/2024", today).is_err());
    }

    #[test]
    fn amounts_ignore_thousands_separators() {
        assert_eq!(parse_amount("1,250.50").unwrap(), 1250.5);
        assert!(parse_amount("abc").is_err());
    }
}
