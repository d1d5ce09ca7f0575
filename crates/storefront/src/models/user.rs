//! Shopper domain types.
//!
//! These types represent validated domain objects separate from database row
//! types. Shoppers are an identity domain of their own, fully decoupled from
//! the back-office `admin_user` accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larkspur_core::{Email, ShopperId};

/// A shopper account (domain type).
#[derive(Debug, Clone)]
pub struct Shopper {
    /// Unique shopper ID.
    pub id: ShopperId,
    /// Shopper's email address.
    pub email: Email,
    /// Federated login provider, if the account was created via OAuth.
    pub oauth_provider: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The authenticated shopper as stored in the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentShopper {
    /// Shopper ID.
    pub id: ShopperId,
    /// Shopper's email address.
    pub email: Email,
}

impl From<&Shopper> for CurrentShopper {
    fn from(shopper: &Shopper) -> Self {
        Self {
            id: shopper.id,
            email: shopper.email.clone(),
        }
    }
}
