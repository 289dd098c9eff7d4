pub mod budget;
pub mod category;
pub mod common;
pub mod movement;
pub mod user;

pub use budget::Budget;
pub use category::{Category, CategorySuggestion};
pub use common::{
    Displayable, Identifiable, MonthKey, MovementKind, Owned, DEFAULT_COLORS,
    UNCATEGORIZED_COLOR,
};
pub use movement::{Movement, MovementDraft};
pub use user::{Role, User};
