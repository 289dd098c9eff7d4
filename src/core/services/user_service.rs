use tracing::info;

use crate::core::Database;
use crate::domain::User;
use crate::utils::is_valid_email;

use super::{AuthService, ServiceError, ServiceResult};

/// Account management, available to admins only.
pub struct UserService;

impl UserService {
    pub fn list(db: &Database) -> ServiceResult<Vec<User>> {
        AuthService::require_admin(db)?;
        Ok(db.users()?)
    }

    pub fn save(db: &mut Database, mut user: User) -> ServiceResult<User> {
        AuthService::require_admin(db)?;
        user.name = user.name.trim().to_string();
        user.email = user.email.trim().to_string();
        if user.name.is_empty() {
            return Err(ServiceError::Invalid("User name cannot be empty".into()));
        }
        if !is_valid_email(&user.email) {
            return Err(ServiceError::Invalid(format!(
                "`{}` is not a valid email address",
                user.email
            )));
        }
        if user.password.is_empty() {
            return Err(ServiceError::Invalid("Password cannot be empty".into()));
        }
        let duplicate = db
            .users()?
            .iter()
            .any(|other| other.id != user.id && other.email.eq_ignore_ascii_case(&user.email));
        if duplicate {
            return Err(ServiceError::Invalid(format!(
                "A user with email `{}` already exists",
                user.email
            )));
        }
        let saved = db.save_user(user)?;
        info!(user_id = %saved.id, "user saved");
        Ok(saved)
    }

    pub fn delete(db: &mut Database, id: &str) -> ServiceResult<()> {
        let admin = AuthService::require_admin(db)?;
        if admin.id == id {
            return Err(ServiceError::Invalid(
                "You cannot delete the account you are logged in with".into(),
            ));
        }
        if !db.users()?.iter().any(|user| user.id == id) {
            return Err(ServiceError::NotFound(format!("User `{id}`")));
        }
        db.delete_user(id)?;
        Ok(())
    }
}
