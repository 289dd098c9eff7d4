use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, Alignment};
use crate::cli::registry::CommandEntry;
use crate::core::services::{CategoryService, MovementService};
use crate::domain::{Category, Displayable, MovementKind};

use super::{parse_args, parse_kind};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "category",
        "Manage categories",
        "category list [income|expense]\n\
         category add <name> <income|expense> [--color HEX]\n\
         category remove <id>\n\
         category search <text>\n\
         category suggest [name]\n\
         category top [income|expense]",
        cmd_category,
    )
    .with_actions(&["list", "add", "remove", "search", "suggest", "top"])
    .with_flags(&["color"])]
}

fn cmd_category(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return Err(context.usage_error("category"));
    };
    match action.to_lowercase().as_str() {
        "list" => handle_list(context, rest),
        "add" => handle_add(context, rest),
        "remove" => handle_remove(context, rest),
        "search" => handle_search(context, rest),
        "suggest" => handle_suggest(context, rest),
        "top" => handle_top(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown category subcommand `{}`",
            other
        ))),
    }
}

fn print_categories(categories: &[Category]) {
    if categories.is_empty() {
        output::info("No categories found.");
        return;
    }
    let rows: Vec<Vec<String>> = categories
        .iter()
        .map(|category| {
            vec![
                category.id.clone(),
                category.name.clone(),
                category.kind.to_string(),
                category.color.clone(),
            ]
        })
        .collect();
    output::print_table(
        &[
            ("ID", Alignment::Left),
            ("Name", Alignment::Left),
            ("Type", Alignment::Left),
            ("Color", Alignment::Left),
        ],
        &rows,
    );
}

fn handle_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let categories = match args.first() {
        Some(kind) => CategoryService::by_type(&context.db, parse_kind(kind)?)?,
        None => CategoryService::list(&context.db, None)?,
    };
    print_categories(&categories);
    Ok(())
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args, &["color"])?;
    let [name, kind] = parsed.positional.as_slice() else {
        return Err(context.usage_error("category"));
    };
    let mut category = Category::new(*name, parse_kind(kind)?);
    if let Some(color) = parsed.flag("color") {
        category = category.with_color(color);
    }
    let saved = CategoryService::save(&mut context.db, category)?;
    output::success(format!("Category `{}` saved with id {}.", saved.name, saved.id));
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(id) = args.first() else {
        return Err(context.usage_error("category"));
    };
    let in_use = MovementService::by_category(&context.db, id)?.len();
    if in_use > 0 {
        output::warning(format!(
            "{in_use} movement(s) still reference `{id}` and will show as Uncategorized."
        ));
    }
    if !context.confirm(&format!("Remove category `{id}`?"))? {
        output::info("Operation cancelled.");
        return Ok(());
    }
    CategoryService::delete(&mut context.db, id)?;
    output::success(format!("Category `{id}` removed."));
    Ok(())
}

fn handle_search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(context.usage_error("category"));
    }
    let query = args.join(" ");
    print_categories(&CategoryService::search(&context.db, &query)?);
    Ok(())
}

fn handle_suggest(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        let name = args.join(" ");
        let suggestion = CategoryService::suggestions()
            .iter()
            .find(|suggestion| suggestion.name.eq_ignore_ascii_case(name.trim()))
            .copied()
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("No suggested category named `{name}`"))
            })?;
        let saved = CategoryService::save(&mut context.db, suggestion.to_category())?;
        output::success(format!("Category `{}` saved with id {}.", saved.name, saved.id));
        return Ok(());
    }

    let rows: Vec<Vec<String>> = CategoryService::suggestions()
        .iter()
        .map(|suggestion| {
            vec![
                suggestion.name.to_string(),
                suggestion.kind.to_string(),
                suggestion.color.to_string(),
            ]
        })
        .collect();
    output::print_table(
        &[
            ("Name", Alignment::Left),
            ("Type", Alignment::Left),
            ("Color", Alignment::Left),
        ],
        &rows,
    );
    Ok(())
}

fn handle_top(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kind: Option<MovementKind> = args.first().map(|kind| parse_kind(kind)).transpose()?;
    match CategoryService::most_used(&context.db, kind)? {
        Some((category, count)) => output::info(format!(
            "Most used: {} [{}] with {} movement(s).",
            category.display_label(),
            category.id,
            count
        )),
        None => output::info("No movements recorded yet."),
    }
    Ok(())
}
