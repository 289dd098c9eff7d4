use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, Alignment};
use crate::cli::registry::CommandEntry;
use crate::core::services::{BudgetService, CategoryService};
use crate::domain::Budget;

use super::{parse_amount, parse_args, parse_month};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "budget",
        "Manage spending budgets",
        "budget list\n\
         budget add <amount> [--category ID] [--month YYYY-MM]\n\
         budget remove <id>",
        cmd_budget,
    )
    .with_actions(&["list", "add", "remove"])
    .with_flags(&["category", "month"])]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((action, rest)) = args.split_first() else {
        return Err(context.usage_error("budget"));
    };
    match action.to_lowercase().as_str() {
        "list" => handle_list(context),
        "add" => handle_add(context, rest),
        "remove" => handle_remove(context, rest),
        other => Err(CommandError::InvalidArguments(format!(
            "unknown budget subcommand `{}`",
            other
        ))),
    }
}

fn handle_list(context: &mut ShellContext) -> CommandResult {
    let budgets = BudgetService::list(&context.db, None)?;
    if budgets.is_empty() {
        output::info("No budgets defined.");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = budgets
        .iter()
        .map(|budget| {
            vec![
                budget.id.clone(),
                budget.category_id.clone().unwrap_or_else(|| "-".into()),
                budget
                    .month
                    .map(|month| month.to_string())
                    .unwrap_or_else(|| "-".into()),
                format!("{:.2}", budget.amount),
            ]
        })
        .collect();
    output::print_table(
        &[
            ("ID", Alignment::Left),
            ("Category", Alignment::Left),
            ("Month", Alignment::Left),
            ("Amount", Alignment::Right),
        ],
        &rows,
    );
    Ok(())
}

fn handle_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args, &["category", "month"])?;
    let [amount] = parsed.positional.as_slice() else {
        return Err(context.usage_error("budget"));
    };
    let mut budget = Budget::new(parse_amount(amount)?);
    if let Some(category_id) = parsed.flag("category") {
        if CategoryService::by_id(&context.db, category_id)?.is_none() {
            return Err(CommandError::Message(format!(
                "Category `{category_id}` not found"
            )));
        }
        budget = budget.for_category(category_id);
    }
    if let Some(month) = parsed.flag("month") {
        budget = budget.for_month(parse_month(month)?);
    }
    let saved = BudgetService::save(&mut context.db, budget)?;
    output::success(format!(
        "Budget {} saved for {}.",
        saved.id,
        context.format_amount(saved.amount)
    ));
    Ok(())
}

fn handle_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(id) = args.first() else {
        return Err(context.usage_error("budget"));
    };
    if !context.confirm(&format!("Remove budget `{id}`?"))? {
        output::info("Operation cancelled.");
        return Ok(());
    }
    BudgetService::delete(&mut context.db, id)?;
    output::success(format!("Budget `{id}` removed."));
    Ok(())
}
