pub mod auth_service;
pub mod budget_service;
pub mod category_service;
pub mod movement_service;
pub mod summary_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use budget_service::BudgetService;
pub use category_service::CategoryService;
pub use movement_service::{CategoryTotal, MovementFilter, MovementService};
pub use summary_service::{CategoryShare, MonthlySummary, SummaryService};
pub use user_service::UserService;

use crate::core::Database;
use crate::errors::FinanceError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("No active session. Log in first.")]
    NotAuthenticated,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Permission denied: {0}")]
    Forbidden(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Invalid(String),
    #[error(transparent)]
    Store(#[from] FinanceError),
}

/// Resolves which owner a read operates on: the explicit user when given,
/// everyone for admins, otherwise the session user.
pub(crate) fn read_scope(db: &Database, user_id: Option<&str>) -> ServiceResult<Option<String>> {
    if let Some(user_id) = user_id {
        return Ok(Some(user_id.to_string()));
    }
    match db.current_user()? {
        Some(user) if user.is_admin() => Ok(None),
        Some(user) => Ok(Some(user.id)),
        None => Err(ServiceError::NotAuthenticated),
    }
}

/// Returns `explicit` when non-empty, otherwise the session user's id.
pub(crate) fn owner_or_session(db: &Database, explicit: Option<&str>) -> ServiceResult<String> {
    match explicit.filter(|id| !id.trim().is_empty()) {
        Some(id) => Ok(id.to_string()),
        None => db
            .current_user()?
            .map(|user| user.id)
            .ok_or(ServiceError::NotAuthenticated),
    }
}

/// Non-admin sessions may only change records they own.
pub(crate) fn ensure_can_modify(db: &Database, owner: Option<&str>) -> ServiceResult<()> {
    let session = db.current_user()?.ok_or(ServiceError::NotAuthenticated)?;
    if session.is_admin() || owner.map_or(true, |owner| owner == session.id) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            "record belongs to another user".into(),
        ))
    }
}
