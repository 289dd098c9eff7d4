pub mod json_backend;
pub mod memory;

use crate::errors::Result;

/// Flat string key-value persistence, the only thing the finance records need
/// from their host.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;

    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

pub const DEFAULT_KEY_PREFIX: &str = "finanzapro";

/// Fixed keys under which each collection and the session snapshot are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreKeys {
    pub users: String,
    pub movements: String,
    pub categories: String,
    pub budgets: String,
    pub current_user: String,
}

impl StoreKeys {
    pub fn with_prefix(prefix: &str) -> Self {
        let prefix = prefix.trim();
        let prefix = if prefix.is_empty() {
            DEFAULT_KEY_PREFIX
        } else {
            prefix
        };
        Self {
            users: format!("{prefix}_users"),
            movements: format!("{prefix}_movements"),
            categories: format!("{prefix}_categories"),
            budgets: format!("{prefix}_budgets"),
            current_user: format!("{prefix}_current_user"),
        }
    }
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self::with_prefix(DEFAULT_KEY_PREFIX)
    }
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
