use crate::core::Database;
use crate::domain::Budget;

use super::{ensure_can_modify, owner_or_session, read_scope, ServiceError, ServiceResult};

pub struct BudgetService;

impl BudgetService {
    pub fn list(db: &Database, user_id: Option<&str>) -> ServiceResult<Vec<Budget>> {
        let scope = read_scope(db, user_id)?;
        Ok(db.budgets(scope.as_deref())?)
    }

    pub fn save(db: &mut Database, mut budget: Budget) -> ServiceResult<Budget> {
        if !budget.amount.is_finite() || budget.amount < 0.0 {
            return Err(ServiceError::Invalid(
                "Budget amount cannot be negative".into(),
            ));
        }
        let existing = match budget.id.as_str() {
            "" => None,
            id => db.budgets(None)?.into_iter().find(|stored| stored.id == id),
        };
        if let Some(existing) = &existing {
            ensure_can_modify(db, Some(&existing.user_id))?;
        }
        let explicit_owner = Some(budget.user_id.as_str())
            .filter(|owner| !owner.trim().is_empty())
            .or(existing.as_ref().map(|existing| existing.user_id.as_str()));
        let owner = owner_or_session(db, explicit_owner)?;
        ensure_can_modify(db, Some(&owner))?;
        budget.user_id = owner;
        Ok(db.save_budget(budget)?)
    }

    pub fn delete(db: &mut Database, id: &str) -> ServiceResult<()> {
        let existing = db
            .budgets(None)?
            .into_iter()
            .find(|budget| budget.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Budget `{id}`")))?;
        ensure_can_modify(db, Some(&existing.user_id))?;
        db.delete_budget(id)?;
        Ok(())
    }

    pub fn by_id(db: &Database, id: &str) -> ServiceResult<Option<Budget>> {
        Ok(Self::list(db, None)?
            .into_iter()
            .find(|budget| budget.id == id))
    }
}
