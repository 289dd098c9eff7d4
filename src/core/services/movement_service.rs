use chrono::NaiveDate;
use tracing::{debug, info};

use crate::core::Database;
use crate::domain::{
    Category, MonthKey, Movement, MovementDraft, MovementKind, DEFAULT_COLORS,
    UNCATEGORIZED_COLOR,
};

use super::{
    ensure_can_modify, owner_or_session, read_scope, CategoryService, ServiceError, ServiceResult,
};

const DESCRIPTION_MAX_LEN: usize = 120;
const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// Criteria for [`MovementService::filter`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementFilter {
    pub kind: Option<MovementKind>,
    pub category: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
}

impl MovementFilter {
    pub fn kind(mut self, kind: MovementKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, query: impl Into<String>) -> Self {
        self.category = Some(query.into());
        self
    }

    pub fn since(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn until(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }
}

/// Sum of movement amounts attributed to one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category_id: String,
    pub name: String,
    pub color: String,
    pub amount: f64,
}

pub struct MovementService;

impl MovementService {
    /// Movements of `user_id`, or of the session scope when `None`.
    pub fn list(db: &Database, user_id: Option<&str>) -> ServiceResult<Vec<Movement>> {
        let scope = read_scope(db, user_id)?;
        Ok(db.movements(scope.as_deref())?)
    }

    /// Creates or updates a movement, resolving `draft.category` to a category
    /// of the movement's owner and creating that category when nothing matches.
    pub fn save(db: &mut Database, draft: MovementDraft) -> ServiceResult<Movement> {
        Self::validate(&draft)?;

        let existing = match draft.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => db.movements(None)?.into_iter().find(|m| m.id == id),
            None => None,
        };
        if let Some(existing) = &existing {
            ensure_can_modify(db, Some(&existing.user_id))?;
        }
        let explicit_owner = draft
            .user_id
            .clone()
            .or_else(|| existing.map(|movement| movement.user_id));
        let owner = owner_or_session(db, explicit_owner.as_deref())?;
        ensure_can_modify(db, Some(&owner))?;

        let category = Self::resolve_category(db, &owner, &draft.category, draft.kind)?;
        let movement = draft.into_movement(owner, category.id);
        let saved = db.save_movement(movement)?;
        debug!(movement_id = %saved.id, category_id = %saved.category_id, "movement saved");
        Ok(saved)
    }

    pub fn delete(db: &mut Database, id: &str) -> ServiceResult<()> {
        let existing = db
            .movements(None)?
            .into_iter()
            .find(|movement| movement.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("Movement `{id}`")))?;
        ensure_can_modify(db, Some(&existing.user_id))?;
        db.delete_movement(id)?;
        Ok(())
    }

    pub fn by_id(db: &Database, id: &str) -> ServiceResult<Option<Movement>> {
        Ok(Self::list(db, None)?
            .into_iter()
            .find(|movement| movement.id == id))
    }

    pub fn by_category(db: &Database, category_id: &str) -> ServiceResult<Vec<Movement>> {
        Ok(Self::list(db, None)?
            .into_iter()
            .filter(|movement| movement.category_id == category_id)
            .collect())
    }

    /// Applies `filters` to the session scope and sorts newest first.
    pub fn filter(db: &Database, filters: &MovementFilter) -> ServiceResult<Vec<Movement>> {
        let mut movements = Self::list(db, None)?;

        if let Some(kind) = filters.kind {
            movements.retain(|movement| movement.kind == kind);
        }

        if let Some(query) = filters
            .category
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
        {
            let needle = query.to_lowercase();
            let categories = db.categories(None)?;
            movements.retain(|movement| {
                categories
                    .iter()
                    .find(|category| category.id == movement.category_id)
                    .is_some_and(|category| category.name.to_lowercase().contains(&needle))
            });
        }

        if let Some(from) = filters.date_from {
            movements.retain(|movement| movement.date >= from);
        }
        if let Some(to) = filters.date_to {
            movements.retain(|movement| movement.date <= to);
        }

        movements.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(movements)
    }

    pub fn monthly_expenses(
        db: &Database,
        user_id: Option<&str>,
        month: MonthKey,
    ) -> ServiceResult<f64> {
        Self::monthly_total(db, user_id, MovementKind::Expense, month)
    }

    pub fn monthly_income(
        db: &Database,
        user_id: Option<&str>,
        month: MonthKey,
    ) -> ServiceResult<f64> {
        Self::monthly_total(db, user_id, MovementKind::Income, month)
    }

    /// Sum of `kind` amounts dated within `month` for `user_id`, defaulting to
    /// the session user.
    pub fn monthly_total(
        db: &Database,
        user_id: Option<&str>,
        kind: MovementKind,
        month: MonthKey,
    ) -> ServiceResult<f64> {
        let owner = owner_or_session(db, user_id)?;
        Ok(db
            .movements(Some(&owner))?
            .iter()
            .filter(|movement| movement.kind == kind && month.contains(movement.date))
            .fold(0.0, |total, movement| total + movement.amount))
    }

    /// Per-category sums over the session scope, in order of first appearance.
    pub fn totals_by_category(
        db: &Database,
        kind: Option<MovementKind>,
    ) -> ServiceResult<Vec<CategoryTotal>> {
        let movements = Self::list(db, None)?;
        let categories = db.categories(None)?;
        Ok(tally(
            movements
                .iter()
                .filter(|movement| kind.map_or(true, |kind| movement.kind == kind)),
            &categories,
        ))
    }

    fn validate(draft: &MovementDraft) -> ServiceResult<()> {
        if !draft.amount.is_finite() || draft.amount <= 0.0 {
            return Err(ServiceError::Invalid(
                "Amount must be a positive number".into(),
            ));
        }
        if draft.description.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(ServiceError::Invalid(format!(
                "Description cannot exceed {DESCRIPTION_MAX_LEN} characters"
            )));
        }
        if draft.category.trim().is_empty() {
            return Err(ServiceError::Invalid("Category is required".into()));
        }
        Ok(())
    }

    /// Finds the owner's category by id, then by name and kind; creates it
    /// when neither matches. An id pointing at a category of the other kind
    /// resolves by that category's name instead.
    fn resolve_category(
        db: &mut Database,
        owner: &str,
        reference: &str,
        kind: MovementKind,
    ) -> ServiceResult<Category> {
        let owned = db.categories(Some(owner))?;
        let mut name = reference.trim();
        if let Some(category) = owned.iter().find(|category| category.id == name) {
            if category.kind == kind {
                return Ok(category.clone());
            }
            name = category.name.as_str();
        }
        if let Some(category) = owned
            .iter()
            .find(|category| category.kind == kind && category.matches_name(name))
        {
            return Ok(category.clone());
        }

        CategoryService::validate_name(name)?;
        let color = DEFAULT_COLORS[owned.len() % DEFAULT_COLORS.len()];
        let created = db.save_category(
            Category::new(name, kind)
                .owned_by(owner)
                .with_color(color),
        )?;
        info!(category_id = %created.id, name = %created.name, "category auto-created");
        Ok(created)
    }
}

/// Groups `movements` by category id, keeping first-appearance order.
pub(crate) fn tally<'a>(
    movements: impl IntoIterator<Item = &'a Movement>,
    categories: &[Category],
) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    for movement in movements {
        if let Some(total) = totals
            .iter_mut()
            .find(|total| total.category_id == movement.category_id)
        {
            total.amount += movement.amount;
            continue;
        }
        let category = categories
            .iter()
            .find(|category| category.id == movement.category_id);
        totals.push(CategoryTotal {
            category_id: movement.category_id.clone(),
            name: category
                .map(|category| category.name.clone())
                .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string()),
            color: category
                .map(|category| category.color.clone())
                .unwrap_or_else(|| UNCATEGORIZED_COLOR.to_string()),
            amount: movement.amount,
        });
    }
    totals
}
