//! Admin user domain types.
//!
//! These types represent validated domain objects for back-office
//! authentication, including the failed-attempt lockout counters.

use chrono::{DateTime, Utc};
use serde::Serialize;

use larkspur_core::{AdminUserId, Email, Role};

/// An admin user (domain type).
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Login username.
    pub username: String,
    /// Admin's email address.
    pub email: Email,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Admin's role/permission level.
    pub role: Role,
    /// Deactivated accounts cannot log in.
    pub is_active: bool,
    /// Consecutive failed login attempts since the last success.
    pub failed_login_attempts: i32,
    /// While set and in the future, login attempts are rejected.
    pub locked_until: Option<DateTime<Utc>>,
    /// Last successful login.
    pub last_login_at: Option<DateTime<Utc>>,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
    /// When the admin was last updated.
    pub updated_at: DateTime<Utc>,
}

impl AdminUser {
    /// Whether a lockout is active at `now`.
    #[must_use]
    pub fn is_locked(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }

    /// Whether this account may use the back office at all.
    #[must_use]
    pub fn is_back_office(&self) -> bool {
        self.is_active && self.role.is_admin_class()
    }

    /// The public view of this account, without the hash or counters.
    #[must_use]
    pub fn to_view(&self) -> AdminUserView {
        AdminUserView {
            id: self.id,
            username: self.username.clone(),
            email: self.email.as_str().to_owned(),
            role: self.role,
            is_active: self.is_active,
            last_login_at: self.last_login_at,
            created_at: self.created_at,
        }
    }
}

/// What the admin UI sees when listing accounts.
#[derive(Debug, Clone, Serialize)]
pub struct AdminUserView {
    pub id: AdminUserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(role: Role, locked_until: Option<DateTime<Utc>>) -> AdminUser {
        let now = Utc::now();
        AdminUser {
            id: AdminUserId::new(1),
            username: "maya".to_owned(),
            email: Email::parse("maya@example.com").expect("email"),
            password_hash: "$argon2id$stub".to_owned(),
            role,
            is_active: true,
            failed_login_attempts: 0,
            locked_until,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn future_lockout_is_active() {
        let now = Utc::now();
        let user = sample(Role::Admin, Some(now + Duration::minutes(10)));
        assert!(user.is_locked(now));
    }

    #[test]
    fn past_lockout_is_expired() {
        let now = Utc::now();
        let user = sample(Role::Admin, Some(now - Duration::minutes(1)));
        assert!(!user.is_locked(now));
    }

    #[test]
    fn customers_are_not_back_office() {
        let user = sample(Role::Customer, None);
        assert!(!user.is_back_office());
        assert!(sample(Role::Staff, None).is_back_office());
        assert!(sample(Role::SuperAdmin, None).is_back_office());
    }
}
