//! Typed access to the record collections kept in a [`KeyValueStore`].

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    domain::{Budget, Category, Identifiable, Movement, Owned, User},
    errors::Result,
    storage::{KeyValueStore, MemoryStore, StoreKeys},
};

use super::seed;

const USER_ID_PREFIX: &str = "u";
const MOVEMENT_ID_PREFIX: &str = "m";
const CATEGORY_ID_PREFIX: &str = "c";
const BUDGET_ID_PREFIX: &str = "b";

/// Reads and writes whole collections; every call goes straight to the store.
pub struct Database {
    store: Box<dyn KeyValueStore>,
    keys: StoreKeys,
}

impl Database {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_keys(store, StoreKeys::default())
    }

    pub fn with_keys(store: Box<dyn KeyValueStore>, keys: StoreKeys) -> Self {
        Self { store, keys }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()))
    }

    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    /// Seeds every collection whose key is still absent. Sample movements are
    /// dated within the month of `today`.
    pub fn initialize(&mut self, today: NaiveDate) -> Result<()> {
        if !self.store.contains(&self.keys.users)? {
            let key = self.keys.users.clone();
            self.write_collection(&key, &seed::default_users())?;
        }
        if !self.store.contains(&self.keys.categories)? {
            let users = self.users()?;
            let key = self.keys.categories.clone();
            self.write_collection(&key, &seed::default_categories(&users))?;
        }
        if !self.store.contains(&self.keys.movements)? {
            let key = self.keys.movements.clone();
            self.write_collection(&key, &seed::sample_movements(today))?;
        }
        if !self.store.contains(&self.keys.budgets)? {
            let key = self.keys.budgets.clone();
            self.write_collection::<Budget>(&key, &[])?;
        }
        info!("database initialized");
        Ok(())
    }

    // Users

    pub fn users(&self) -> Result<Vec<User>> {
        self.read_collection(&self.keys.users)
    }

    pub fn save_user(&mut self, user: User) -> Result<User> {
        let key = self.keys.users.clone();
        self.upsert(&key, USER_ID_PREFIX, user)
    }

    pub fn delete_user(&mut self, id: &str) -> Result<()> {
        let key = self.keys.users.clone();
        self.delete_by_id::<User>(&key, id)
    }

    // Movements

    pub fn movements(&self, user_id: Option<&str>) -> Result<Vec<Movement>> {
        Ok(owned_by(self.read_collection(&self.keys.movements)?, user_id))
    }

    pub fn save_movement(&mut self, movement: Movement) -> Result<Movement> {
        let key = self.keys.movements.clone();
        self.upsert(&key, MOVEMENT_ID_PREFIX, movement)
    }

    pub fn delete_movement(&mut self, id: &str) -> Result<()> {
        let key = self.keys.movements.clone();
        self.delete_by_id::<Movement>(&key, id)
    }

    // Categories

    pub fn categories(&self, user_id: Option<&str>) -> Result<Vec<Category>> {
        Ok(owned_by(self.read_collection(&self.keys.categories)?, user_id))
    }

    pub fn save_category(&mut self, category: Category) -> Result<Category> {
        let key = self.keys.categories.clone();
        self.upsert(&key, CATEGORY_ID_PREFIX, category)
    }

    pub fn delete_category(&mut self, id: &str) -> Result<()> {
        let key = self.keys.categories.clone();
        self.delete_by_id::<Category>(&key, id)
    }

    // Budgets

    pub fn budgets(&self, user_id: Option<&str>) -> Result<Vec<Budget>> {
        Ok(owned_by(self.read_collection(&self.keys.budgets)?, user_id))
    }

    pub fn save_budget(&mut self, budget: Budget) -> Result<Budget> {
        let key = self.keys.budgets.clone();
        self.upsert(&key, BUDGET_ID_PREFIX, budget)
    }

    pub fn delete_budget(&mut self, id: &str) -> Result<()> {
        let key = self.keys.budgets.clone();
        self.delete_by_id::<Budget>(&key, id)
    }

    // Session snapshot

    pub fn current_user(&self) -> Result<Option<User>> {
        match self.store.get(&self.keys.current_user)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_current_user(&mut self, user: &User) -> Result<()> {
        let json = serde_json::to_string(user)?;
        self.store.set(&self.keys.current_user, &json)
    }

    pub fn clear_current_user(&mut self) -> Result<()> {
        self.store.remove(&self.keys.current_user)
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        match self.store.get(key)? {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    fn write_collection<T: Serialize>(&mut self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.store.set(key, &json)?;
        debug!(key, count = items.len(), "collection written");
        Ok(())
    }

    /// Replaces the record sharing `record`'s id, or appends it. Records
    /// without an id get a fresh `<prefix><uuid>` id.
    fn upsert<T>(&mut self, key: &str, prefix: &str, mut record: T) -> Result<T>
    where
        T: Identifiable + Serialize + DeserializeOwned + Clone,
    {
        let mut items: Vec<T> = self.read_collection(key)?;
        let position = if record.id().is_empty() {
            None
        } else {
            items.iter().position(|item| item.id() == record.id())
        };
        match position {
            Some(index) => items[index] = record.clone(),
            None => {
                if record.id().is_empty() {
                    record.set_id(new_id(prefix));
                }
                items.push(record.clone());
            }
        }
        self.write_collection(key, &items)?;
        Ok(record)
    }

    fn delete_by_id<T>(&mut self, key: &str, id: &str) -> Result<()>
    where
        T: Identifiable + Serialize + DeserializeOwned,
    {
        let mut items: Vec<T> = self.read_collection(key)?;
        let before = items.len();
        items.retain(|item| item.id() != id);
        if items.len() != before {
            self.write_collection(key, &items)?;
        }
        Ok(())
    }
}

fn owned_by<T: Owned>(items: Vec<T>, user_id: Option<&str>) -> Vec<T> {
    match user_id {
        Some(user_id) => items
            .into_iter()
            .filter(|item| item.owner() == Some(user_id))
            .collect(),
        None => items,
    }
}

fn new_id(prefix: &str) -> String {
    format!("{}{}", prefix, Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MovementKind, Role};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    #[test]
    fn initialize_seeds_every_collection() {
        let mut db = Database::in_memory();
        db.initialize(today()).unwrap();

        let users = db.users().unwrap();
        assert_eq!(users.len(), 4);
        assert!(users.iter().any(|u| u.id == "admin" && u.role == Role::Admin));

        assert_eq!(db.categories(None).unwrap().len(), 4 * 12);
        assert_eq!(db.categories(Some("u2")).unwrap().len(), 12);

        let movements = db.movements(Some("u1")).unwrap();
        assert_eq!(movements.len(), 3);
        assert!(movements
            .iter()
            .all(|m| m.date.format("%Y-%m").to_string() == "2024-05"));
        assert!(db.budgets(None).unwrap().is_empty());
    }

    #[test]
    fn initialize_keeps_existing_collections() {
        let mut db = Database::in_memory();
        db.initialize(today()).unwrap();
        db.delete_user("u3").unwrap();
        db.initialize(today()).unwrap();
        assert_eq!(db.users().unwrap().len(), 3);
    }

    #[test]
    fn save_assigns_prefixed_ids_and_updates_in_place() {
        let mut db = Database::in_memory();
        let saved = db
            .save_category(Category::new("Rent", MovementKind::Expense).owned_by("u1"))
            .unwrap();
        assert!(saved.id.starts_with('c'));
        assert!(saved.id.len() > 1);

        let mut renamed = saved.clone();
        renamed.name = "Housing".into();
        db.save_category(renamed).unwrap();

        let stored = db.categories(None).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, saved.id);
        assert_eq!(stored[0].name, "Housing");
    }

    #[test]
    fn delete_unknown_id_is_a_no_op() {
        let mut db = Database::in_memory();
        db.save_budget(Budget::new(100.0)).unwrap();
        db.delete_budget("missing").unwrap();
        assert_eq!(db.budgets(None).unwrap().len(), 1);
    }

    #[test]
    fn session_snapshot_round_trips() {
        let mut db = Database::in_memory();
        assert_eq!(db.current_user().unwrap(), None);
        let user = User::new("Ana", "ana@example.com", "secret", Role::User).with_id("u9");
        db.set_current_user(&user).unwrap();
        assert_eq!(db.current_user().unwrap(), Some(user));
        db.clear_current_user().unwrap();
        assert_eq!(db.current_user().unwrap(), None);
    }

    #[test]
    fn stored_layout_uses_original_field_names() {
        let mut store = MemoryStore::new();
        store
            .set(
                "finanzapro_movements",
                r#"[{"id":"m1","userId":"u1","type":"income","description":"Pay","amount":10.5,"categoryId":"c1-u1","date":"2024-01-01"}]"#,
            )
            .unwrap();
        let db = Database::new(Box::new(store));
        let movements = db.movements(None).unwrap();
        assert_eq!(movements[0].user_id, "u1");
        assert_eq!(movements[0].kind, MovementKind::Income);
        assert_eq!(movements[0].category_id, "c1-u1");
    }
}
