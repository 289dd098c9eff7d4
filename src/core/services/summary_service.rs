use crate::core::Database;
use crate::domain::{MonthKey, MovementKind};
use crate::utils::{percentage, round_to};

use super::movement_service::tally;
use super::{owner_or_session, CategoryTotal, MovementService, ServiceResult};

/// Income, expenses and their difference for one user and month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub income: f64,
    pub expenses: f64,
    pub balance: f64,
}

/// A category total together with its share of the kind's overall total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub total: CategoryTotal,
    pub percentage: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn monthly(
        db: &Database,
        user_id: Option<&str>,
        month: MonthKey,
    ) -> ServiceResult<MonthlySummary> {
        let income = MovementService::monthly_income(db, user_id, month)?;
        let expenses = MovementService::monthly_expenses(db, user_id, month)?;
        Ok(MonthlySummary {
            month,
            income: round_to(income, 2),
            expenses: round_to(expenses, 2),
            balance: round_to(income - expenses, 2),
        })
    }

    /// Per-category totals of `kind` for `user_id` (the session user when
    /// `None`), optionally limited to one month, largest first.
    pub fn category_breakdown(
        db: &Database,
        user_id: Option<&str>,
        kind: MovementKind,
        month: Option<MonthKey>,
    ) -> ServiceResult<Vec<CategoryShare>> {
        let owner = owner_or_session(db, user_id)?;
        let movements = db.movements(Some(&owner))?;
        let categories = db.categories(None)?;
        let totals = tally(
            movements.iter().filter(|movement| {
                movement.kind == kind && month.map_or(true, |month| month.contains(movement.date))
            }),
            &categories,
        );
        let grand_total = totals.iter().fold(0.0, |sum, total| sum + total.amount);
        let mut shares: Vec<CategoryShare> = totals
            .into_iter()
            .map(|total| CategoryShare {
                percentage: percentage(total.amount, grand_total),
                total,
            })
            .collect();
        shares.sort_by(|a, b| b.total.amount.total_cmp(&a.total.amount));
        Ok(shares)
    }
}
