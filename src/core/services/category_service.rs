use std::collections::HashMap;

use tracing::debug;

use crate::core::Database;
use crate::domain::{Category, CategorySuggestion, MovementKind, DEFAULT_COLORS};

use super::{ensure_can_modify, owner_or_session, read_scope, ServiceError, ServiceResult};

const NAME_MIN_LEN: usize = 3;
const NAME_MAX_LEN: usize = 50;

const SUGGESTIONS: [CategorySuggestion; 9] = [
    CategorySuggestion::new("Salario", MovementKind::Income, "#10b981"),
    CategorySuggestion::new("Freelance", MovementKind::Income, "#3b82f6"),
    CategorySuggestion::new("Alimentacion", MovementKind::Expense, "#f59e0b"),
    CategorySuggestion::new("Transporte", MovementKind::Expense, "#ef4444"),
    CategorySuggestion::new("Entretenimiento", MovementKind::Expense, "#8b5cf6"),
    CategorySuggestion::new("Servicios", MovementKind::Expense, "#06b6d4"),
    CategorySuggestion::new("Salud", MovementKind::Expense, "#ef4444"),
    CategorySuggestion::new("Vivienda", MovementKind::Expense, "#f59e0b"),
    CategorySuggestion::new("Ahorro", MovementKind::Income, "#3b82f6"),
];

pub struct CategoryService;

impl CategoryService {
    /// Categories of `user_id`, or of the session scope when `None`.
    pub fn list(db: &Database, user_id: Option<&str>) -> ServiceResult<Vec<Category>> {
        let scope = read_scope(db, user_id)?;
        Ok(db.categories(scope.as_deref())?)
    }

    pub fn save(db: &mut Database, mut category: Category) -> ServiceResult<Category> {
        Self::validate_name(&category.name)?;
        let owner = owner_or_session(db, category.user_id.as_deref())?;
        ensure_can_modify(db, Some(&owner))?;
        if !category.id.is_empty() {
            if let Some(existing) = Self::by_id(db, &category.id)? {
                ensure_can_modify(db, existing.user_id.as_deref())?;
            }
        }
        category.name = category.name.trim().to_string();
        category.user_id = Some(owner);
        if category.color.trim().is_empty() {
            category.color = DEFAULT_COLORS[0].to_string();
        }
        let saved = db.save_category(category)?;
        debug!(category_id = %saved.id, "category saved");
        Ok(saved)
    }

    /// Removes a category. Movements pointing at it are left untouched.
    pub fn delete(db: &mut Database, id: &str) -> ServiceResult<()> {
        let existing = Self::by_id(db, id)?
            .ok_or_else(|| ServiceError::NotFound(format!("Category `{id}`")))?;
        ensure_can_modify(db, existing.user_id.as_deref())?;
        db.delete_category(id)?;
        Ok(())
    }

    /// Looks up a category by id regardless of owner.
    pub fn by_id(db: &Database, id: &str) -> ServiceResult<Option<Category>> {
        Ok(db
            .categories(None)?
            .into_iter()
            .find(|category| category.id == id))
    }

    pub fn by_type(db: &Database, kind: MovementKind) -> ServiceResult<Vec<Category>> {
        Ok(Self::list(db, None)?
            .into_iter()
            .filter(|category| category.kind == kind)
            .collect())
    }

    /// Case-insensitive substring search on category names within the session scope.
    pub fn search(db: &Database, query: &str) -> ServiceResult<Vec<Category>> {
        let needle = query.to_lowercase();
        Ok(Self::list(db, None)?
            .into_iter()
            .filter(|category| category.name.to_lowercase().contains(&needle))
            .collect())
    }

    pub fn suggestions() -> &'static [CategorySuggestion] {
        &SUGGESTIONS
    }

    pub fn validate_name(name: &str) -> ServiceResult<()> {
        let length = name.trim().chars().count();
        if length == 0 {
            Err(ServiceError::Invalid("Category name cannot be empty".into()))
        } else if length < NAME_MIN_LEN {
            Err(ServiceError::Invalid(format!(
                "Category name must have at least {NAME_MIN_LEN} characters"
            )))
        } else if length > NAME_MAX_LEN {
            Err(ServiceError::Invalid(format!(
                "Category name cannot exceed {NAME_MAX_LEN} characters"
            )))
        } else {
            Ok(())
        }
    }

    /// The category with the most movements in the session scope, optionally
    /// restricted to one kind. Ties go to the category used first.
    pub fn most_used(
        db: &Database,
        kind: Option<MovementKind>,
    ) -> ServiceResult<Option<(Category, usize)>> {
        let scope = read_scope(db, None)?;
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for movement in db.movements(scope.as_deref())? {
            if kind.is_some_and(|kind| movement.kind != kind) {
                continue;
            }
            let count = counts.entry(movement.category_id.clone()).or_insert(0);
            if *count == 0 {
                order.push(movement.category_id);
            }
            *count += 1;
        }

        let categories = db.categories(None)?;
        let mut best: Option<(Category, usize)> = None;
        for id in order {
            let Some(category) = categories.iter().find(|category| category.id == id) else {
                continue;
            };
            let count = counts.get(&id).copied().unwrap_or(0);
            if best.as_ref().map_or(true, |(_, top)| count > *top) {
                best = Some((category.clone(), count));
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::test_support::{seeded_as_admin, seeded_as_juan};
    use crate::core::services::AuthService;

    #[test]
    fn list_is_scoped_to_session_user() {
        let db = seeded_as_juan();
        let categories = CategoryService::list(&db, None).unwrap();
        assert_eq!(categories.len(), 12);
        assert!(categories
            .iter()
            .all(|c| c.user_id.as_deref() == Some("u1")));

        let admin = seeded_as_admin();
        assert_eq!(CategoryService::list(&admin, None).unwrap().len(), 48);
        assert_eq!(CategoryService::list(&admin, Some("u2")).unwrap().len(), 12);
    }

    #[test]
    fn list_requires_session() {
        let mut db = seeded_as_juan();
        AuthService::logout(&mut db).unwrap();
        assert!(matches!(
            CategoryService::list(&db, None),
            Err(ServiceError::NotAuthenticated)
        ));
    }

    #[test]
    fn save_fills_owner_and_trims_name() {
        let mut db = seeded_as_juan();
        let saved =
            CategoryService::save(&mut db, Category::new("  Mascotas ", MovementKind::Expense))
                .unwrap();
        assert_eq!(saved.user_id.as_deref(), Some("u1"));
        assert_eq!(saved.name, "Mascotas");
        assert!(CategoryService::by_id(&db, &saved.id).unwrap().is_some());
    }

    #[test]
    fn save_rejects_foreign_owner_for_regular_users() {
        let mut db = seeded_as_juan();
        let foreign = Category::new("Regalos", MovementKind::Income).owned_by("u2");
        assert!(matches!(
            CategoryService::save(&mut db, foreign.clone()),
            Err(ServiceError::Forbidden(_))
        ));

        let mut admin = seeded_as_admin();
        let saved = CategoryService::save(&mut admin, foreign).unwrap();
        assert_eq!(saved.user_id.as_deref(), Some("u2"));
    }

    #[test]
    fn validate_name_enforces_length_bounds() {
        assert!(CategoryService::validate_name("Gym").is_ok());
        let empty = CategoryService::validate_name("   ").unwrap_err();
        assert!(empty.to_string().contains("empty"));
        let short = CategoryService::validate_name("ab").unwrap_err();
        assert!(short.to_string().contains("at least 3"));
        let long = CategoryService::validate_name(&"x".repeat(51)).unwrap_err();
        assert!(long.to_string().contains("exceed 50"));
        assert!(CategoryService::validate_name(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn by_type_and_search_stay_in_scope() {
        let db = seeded_as_juan();
        let income = CategoryService::by_type(&db, MovementKind::Income).unwrap();
        assert_eq!(income.len(), 5);

        let hits = CategoryService::search(&db, "SAL").unwrap();
        let names: Vec<_> = hits.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Salario", "Salud", "Salud"]);
    }

    #[test]
    fn delete_does_not_touch_movements() {
        let mut db = seeded_as_juan();
        CategoryService::delete(&mut db, "c3-u1").unwrap();
        assert!(CategoryService::by_id(&db, "c3-u1").unwrap().is_none());
        let movements = db.movements(Some("u1")).unwrap();
        assert!(movements.iter().any(|m| m.category_id == "c3-u1"));
    }

    #[test]
    fn delete_checks_existence_and_ownership() {
        let mut db = seeded_as_juan();
        assert!(matches!(
            CategoryService::delete(&mut db, "nope"),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            CategoryService::delete(&mut db, "c1-u2"),
            Err(ServiceError::Forbidden(_))
        ));
    }

    #[test]
    fn most_used_counts_movements() {
        let db = seeded_as_juan();
        let (category, count) = CategoryService::most_used(&db, Some(MovementKind::Expense))
            .unwrap()
            .expect("an expense category is used");
        assert_eq!(category.id, "c3-u1");
        assert_eq!(count, 1);

        let (first, _) = CategoryService::most_used(&db, None).unwrap().unwrap();
        assert_eq!(first.id, "c1-u1");
    }

    #[test]
    fn suggestions_are_fixed() {
        let suggestions = CategoryService::suggestions();
        assert_eq!(suggestions.len(), 9);
        assert_eq!(suggestions[0].name, "Salario");
        assert_eq!(suggestions[8].to_category().kind, MovementKind::Income);
    }
}
