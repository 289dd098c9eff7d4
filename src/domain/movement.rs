//! Income and expense movements.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Identifiable, MovementKind, Owned};

/// A single income or expense entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    #[serde(default)]
    pub description: String,
    pub amount: f64,
    pub category_id: String,
    pub date: NaiveDate,
}

impl Identifiable for Movement {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Owned for Movement {
    fn owner(&self) -> Option<&str> {
        Some(&self.user_id)
    }
}

impl Displayable for Movement {
    fn display_label(&self) -> String {
        format!(
            "{} {} {:.2} ({})",
            self.date, self.kind, self.amount, self.description
        )
    }
}

/// Input for creating or updating a movement.
///
/// `category` holds either an existing category id or a category name; names
/// that match nothing create a new category when the draft is saved.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementDraft {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub kind: MovementKind,
    pub description: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
}

impl MovementDraft {
    pub fn new(
        kind: MovementKind,
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: None,
            user_id: None,
            kind,
            description: String::new(),
            amount,
            category: category.into(),
            date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub(crate) fn into_movement(self, user_id: String, category_id: String) -> Movement {
        Movement {
            id: self.id.unwrap_or_default(),
            user_id,
            kind: self.kind,
            description: self.description,
            amount: self.amount,
            category_id,
            date: self.date,
        }
    }
}

impl From<&Movement> for MovementDraft {
    fn from(movement: &Movement) -> Self {
        Self {
            id: Some(movement.id.clone()),
            user_id: Some(movement.user_id.clone()),
            kind: movement.kind,
            description: movement.description.clone(),
            amount: movement.amount,
            category: movement.category_id.clone(),
            date: movement.date,
        }
    }
}
