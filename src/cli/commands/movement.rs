use std::collections::HashMap;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, Alignment};
use crate::cli::registry::CommandEntry;
use crate::core::services::{MovementFilter, MovementService};
use crate::domain::{Displayable, Movement, MovementDraft, MovementKind};

use super::{parse_amount, parse_args, parse_date, parse_kind};

const LIST_FLAGS: &[&str] = &["type", "category", "from", "to"];
const EDIT_FLAGS: &[&str] = &["type", "amount", "category", "date", "desc"];

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "movement",
        "Record and browse income and expenses",
        "movement list [--type income|expense|all] [--category TEXT] [--from YYYY-MM-DD] [--to YYYY-MM-DD]\n\
         movement add <income|expense> <amount> <category> [--date YYYY-MM-DD] [--desc TEXT]\n\
         movement update <id> [--type T] [--amount N] [--category C] [--date D] [--desc TEXT]\n\
         movement remove <id>",
        cmd_movement,
    )
    .with_actions(&["list", "add", "update", "remove"])
    .with_flags(&["type", "amount", "category", "from", "to", "date", "desc"])]
}

fn cmd_movement(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return Err(context.usage_error("movement"));
    };
    match action.to_lowercase().as_str() {
        "list" => handle_list(context, rest),
        "add" => handle_add(context, rest),
        "update" => handle_update(context, rest),
        "remove" => handle_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown movement subcommand `{}`",
            other
        ))),
    }
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args, LIST_FLAGS)?;
    if !parsed.positional.is_empty() {
        return Err(context.usage_error("movement"));
    }
    let today = context.today();
    let mut filter = MovementFilter::default();
    if let Some(kind) = parsed.flag("type") {
        if !kind.eq_ignore_ascii_case("all") {
            filter = filter.kind(parse_kind(kind)?);
        }
    }
    if let Some(category) = parsed.flag("category") {
        filter = filter.category(category);
    }
    if let Some(from) = parsed.flag("from") {
        filter = filter.since(parse_date(from, today)?);
    }
    if let Some(to) = parsed.flag("to") {
        filter = filter.until(parse_date(to, today)?);
    }

    let movements = MovementService::filter(&context.db, &filter)?;
    if movements.is_empty() {
        output::info("No movements found.");
        return Ok(());
    }
    print_movements(context, &movements)?;

    let (income, expenses) = movements
        .iter()
        .fold((0.0, 0.0), |(income, expenses), movement| match movement.kind {
            MovementKind::Income => (income + movement.amount, expenses),
            MovementKind::Expense => (income, expenses + movement.amount),
        });
    output::info(format!(
        "{} movement(s). Income {} / Expenses {}",
        movements.len(),
        context.format_amount(income),
        context.format_amount(expenses)
    ));
    Ok(())
}

fn print_movements(context: &ShellContext, movements: &[Movement]) -> CommandResult {
    let names: HashMap<String, String> = context
        .db
        .categories(None)?
        .into_iter()
        .map(|category| (category.id, category.name))
        .collect();
    let rows: Vec<Vec<String>> = movements
        .iter()
        .map(|movement| {
            vec![
                movement.id.clone(),
                movement.date.to_string(),
                movement.kind.to_string(),
                names
                    .get(&movement.category_id)
                    .cloned()
                    .unwrap_or_else(|| "Uncategorized".into()),
                movement.description.clone(),
                format!("{:.2}", movement.amount),
            ]
        })
        .collect();
    output::print_table(
        &[
            ("ID", Alignment::Left),
            ("Date", Alignment::Left),
            ("Type", Alignment::Left),
            ("Category", Alignment::Left),
            ("Description", Alignment::Left),
            ("Amount", Alignment::Right),
        ],
        &rows,
    );
    Ok(())
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args, &["date", "desc"])?;
    let [kind, amount, category] = parsed.positional.as_slice() else {
        return Err(context.usage_error("movement"));
    };
    let date = match parsed.flag("date") {
        Some(date) => parse_date(date, context.today())?,
        None => context.today(),
    };
    let mut draft = MovementDraft::new(parse_kind(kind)?, parse_amount(amount)?, *category, date);
    if let Some(description) = parsed.flag("desc") {
        draft = draft.with_description(description);
    }

    let saved = MovementService::save(&mut context.db, draft)?;
    output::success(format!(
        "Movement {} saved: {} [{}].",
        saved.id,
        saved.display_label(),
        saved.category_id
    ));
    Ok(())
}

fn handle_update(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args, EDIT_FLAGS)?;
    let [id] = parsed.positional.as_slice() else {
        return Err(context.usage_error("movement"));
    };
    if !parsed.has_flags() {
        return Err(CommandError::InvalidArguments(
            "Nothing to update. Pass at least one option.".into(),
        ));
    }
    let existing = MovementService::by_id(&context.db, id)?
        .ok_or_else(|| CommandError::Message(format!("Movement `{id}` not found")))?;

    let mut draft = MovementDraft::from(&existing);
    if let Some(kind) = parsed.flag("type") {
        draft.kind = parse_kind(kind)?;
    }
    if let Some(amount) = parsed.flag("amount") {
        draft.amount = parse_amount(amount)?;
    }
    if let Some(category) = parsed.flag("category") {
        draft.category = category.to_string();
    }
    if let Some(date) = parsed.flag("date") {
        draft.date = parse_date(date, context.today())?;
    }
    if let Some(description) = parsed.flag("desc") {
        draft.description = description.to_string();
    }

    let saved = MovementService::save(&mut context.db, draft)?;
    output::success(format!("Movement {} updated: {}.", saved.id, saved.display_label()));
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(id) = args.first() else {
        return Err(context.usage_error("movement"));
    };
    if !context.confirm(&format!("Remove movement `{id}`?"))? {
        output::info("Operation cancelled.");
        return Ok(());
    }
    MovementService::delete(&mut context.db, id)?;
    output::success(format!("Movement `{id}` removed."));
    Ok(())
}
