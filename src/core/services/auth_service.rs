use tracing::{info, warn};

use crate::core::Database;
use crate::domain::{Role, User};

use super::{ServiceError, ServiceResult};

/// Login, logout and session queries backed by the stored user snapshot.
pub struct AuthService;

impl AuthService {
    /// Logs in the user whose email or name equals `identifier` and whose
    /// password and role match exactly.
    pub fn login(
        db: &mut Database,
        identifier: &str,
        password: &str,
        role: Role,
    ) -> ServiceResult<User> {
        let user = db
            .users()?
            .into_iter()
            .find(|user| {
                user.answers_to(identifier) && user.password == password && user.role == role
            });

        match user {
            Some(user) => {
                db.set_current_user(&user)?;
                info!(user_id = %user.id, role = %user.role, "login succeeded");
                Ok(user)
            }
            None => {
                warn!(identifier, role = %role, "login failed");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }

    pub fn logout(db: &mut Database) -> ServiceResult<()> {
        db.clear_current_user()?;
        info!("logged out");
        Ok(())
    }

    pub fn current_user(db: &Database) -> ServiceResult<Option<User>> {
        Ok(db.current_user()?)
    }

    pub fn is_authenticated(db: &Database) -> ServiceResult<bool> {
        Ok(db.current_user()?.is_some())
    }

    pub fn current_user_id(db: &Database) -> ServiceResult<Option<String>> {
        Ok(db.current_user()?.map(|user| user.id))
    }

    pub fn is_admin(db: &Database) -> ServiceResult<bool> {
        Ok(db.current_user()?.is_some_and(|user| user.is_admin()))
    }

    /// Fails unless an admin is logged in.
    pub fn require_admin(db: &Database) -> ServiceResult<User> {
        match db.current_user()? {
            Some(user) if user.is_admin() => Ok(user),
            Some(_) => Err(ServiceError::Forbidden("admin role required".into())),
            None => Err(ServiceError::NotAuthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::test_support::today;
    use crate::storage::MemoryStore;

    fn seeded() -> Database {
        let mut db = Database::in_memory();
        db.initialize(today()).unwrap();
        db
    }

    #[test]
    fn login_accepts_email_or_name() {
        let mut db = seeded();
        let by_email = AuthService::login(&mut db, "maria@example.com", "123456", Role::User)
            .expect("email login");
        assert_eq!(by_email.id, "u2");

        let by_name =
            AuthService::login(&mut db, "María García", "123456", Role::User).expect("name login");
        assert_eq!(by_name.id, "u2");
        assert_eq!(AuthService::current_user_id(&db).unwrap().as_deref(), Some("u2"));
    }

    #[test]
    fn login_rejects_wrong_password_or_role() {
        let mut db = seeded();
        let err = AuthService::login(&mut db, "juan@example.com", "nope", Role::User)
            .expect_err("wrong password");
        assert_eq!(err.to_string(), "Invalid username or password");

        assert!(matches!(
            AuthService::login(&mut db, "admin@example.com", "admin123", Role::User),
            Err(ServiceError::InvalidCredentials)
        ));
        assert!(!AuthService::is_authenticated(&db).unwrap());
    }

    #[test]
    fn login_identifier_must_match_exactly() {
        let mut db = seeded();
        for identifier in [" juan@example.com", "juan@example.com ", "JUAN@example.com"] {
            assert!(matches!(
                AuthService::login(&mut db, identifier, "123456", Role::User),
                Err(ServiceError::InvalidCredentials)
            ));
        }
        assert!(!AuthService::is_authenticated(&db).unwrap());
    }

    #[test]
    fn failed_login_keeps_previous_session() {
        let mut db = seeded();
        AuthService::login(&mut db, "juan@example.com", "123456", Role::User).unwrap();
        let _ = AuthService::login(&mut db, "carlos@example.com", "bad", Role::User);
        assert_eq!(AuthService::current_user_id(&db).unwrap().as_deref(), Some("u1"));
    }

    #[test]
    fn logout_clears_session() {
        let mut db = seeded();
        AuthService::login(&mut db, "admin@example.com", "admin123", Role::Admin).unwrap();
        assert!(AuthService::is_admin(&db).unwrap());
        AuthService::logout(&mut db).unwrap();
        assert!(!AuthService::is_admin(&db).unwrap());
        assert_eq!(AuthService::current_user(&db).unwrap(), None);
    }

    #[test]
    fn require_admin_distinguishes_missing_and_forbidden() {
        let mut db = Database::new(Box::new(MemoryStore::new()));
        assert!(AuthService::current_user(&db).unwrap().is_none());
        db.initialize(today()).unwrap();
        assert!(matches!(
            AuthService::require_admin(&db),
            Err(ServiceError::NotAuthenticated)
        ));
        AuthService::login(&mut db, "carlos@example.com", "123456", Role::User).unwrap();
        assert!(matches!(
            AuthService::require_admin(&db),
            Err(ServiceError::Forbidden(_))
        ));
    }
}
