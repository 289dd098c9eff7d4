use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output::{self, Alignment};
use crate::cli::registry::CommandEntry;
use crate::core::services::SummaryService;
use crate::domain::{MonthKey, MovementKind};

use super::{parse_args, parse_month};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![CommandEntry::new(
        "summary",
        "Monthly income, expenses and category breakdown",
        "summary [YYYY-MM] [--user ID]",
        cmd_summary,
    )
    .with_flags(&["user"])]
}

fn cmd_summary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = parse_args(args, &["user"])?;
    let month = match parsed.positional.as_slice() {
        [] => MonthKey::of(context.today()),
        [month] => parse_month(month)?,
        _ => return Err(context.usage_error("summary")),
    };
    let user = parsed.flag("user");

    let summary = SummaryService::monthly(&context.db, user, month)?;
    output::section(format!("Summary {}", summary.month));
    output::info(format!("  Income   : {}", context.format_amount(summary.income)));
    output::info(format!("  Expenses : {}", context.format_amount(summary.expenses)));
    output::info(format!("  Balance  : {}", context.format_amount(summary.balance)));

    for kind in [MovementKind::Expense, MovementKind::Income] {
        let shares = SummaryService::category_breakdown(&context.db, user, kind, Some(month))?;
        if shares.is_empty() {
            continue;
        }
        output::section(format!("{} by category", kind));
        let rows: Vec<Vec<String>> = shares
            .iter()
            .map(|share| {
                vec![
                    share.total.name.clone(),
                    format!("{:.2}", share.total.amount),
                    format!("{:.2}%", share.percentage),
                ]
            })
            .collect();
        output::print_table(
            &[
                ("Category", Alignment::Left),
                ("Amount", Alignment::Right),
                ("Share", Alignment::Right),
            ],
            &rows,
        );
    }
    Ok(())
}
