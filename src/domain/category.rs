//! Domain types representing movement categories.

use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, Identifiable, MovementKind, Owned, DEFAULT_COLORS};

/// Groups movements of one kind under a user-chosen label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MovementKind,
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: MovementKind) -> Self {
        Self {
            id: String::new(),
            user_id: None,
            name: name.into(),
            kind,
            color: DEFAULT_COLORS[0].to_string(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn owned_by(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Case-insensitive comparison against a trimmed candidate name.
    pub fn matches_name(&self, candidate: &str) -> bool {
        self.name.trim().to_lowercase() == candidate.trim().to_lowercase()
    }
}

impl Identifiable for Category {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

impl Owned for Category {
    fn owner(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}

/// A ready-made category name offered to users creating their first categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySuggestion {
    pub name: &'static str,
    pub kind: MovementKind,
    pub color: &'static str,
}

impl CategorySuggestion {
    pub const fn new(name: &'static str, kind: MovementKind, color: &'static str) -> Self {
        Self { name, kind, color }
    }

    pub fn to_category(self) -> Category {
        Category::new(self.name, self.kind).with_color(self.color)
    }
}
