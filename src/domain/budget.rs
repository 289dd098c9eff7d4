//! Spending budgets. Stored and listed only; nothing aggregates them yet.

use serde::{Deserialize, Serialize};

use crate::domain::common::{Identifiable, MonthKey, Owned};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<MonthKey>,
}

impl Budget {
    pub fn new(amount: f64) -> Self {
        Self {
            id: String::new(),
            user_id: String::new(),
            category_id: None,
            amount,
            month: None,
        }
    }

    pub fn for_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn for_month(mut self, month: MonthKey) -> Self {
        self.month = Some(month);
        self
    }
}

impl Identifiable for Budget {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Owned for Budget {
    fn owner(&self) -> Option<&str> {
        (!self.user_id.is_empty()).then_some(self.user_id.as_str())
    }
}
