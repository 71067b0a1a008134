//! User account record
//!
//! Login credentials maintained alongside the customer directory. The
//! billing core never reads these; they exist so an authentication layer
//! in front of this service has a consistent credential store. Customer
//! accounts are written through on every customer create/update/delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Customer,
}

/// Stored credential record. Passwords are kept only as bcrypt hashes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub name: String,
    /// Set for customer accounts; links back to the directory entry.
    pub customer_number: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn admin(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            password_hash: password_hash.into(),
            role: UserRole::Admin,
            name: name.into(),
            customer_number: None,
            created_at: Utc::now(),
        }
    }

    pub fn for_customer(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        name: impl Into<String>,
        customer_number: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            password_hash: password_hash.into(),
            role: UserRole::Customer,
            name: name.into(),
            customer_number: Some(customer_number.into()),
            created_at: Utc::now(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_account_has_no_customer_link() {
        let account = UserAccount::admin("admin", "$2b$hash", "Administrator");
        assert_eq!(account.role, UserRole::Admin);
        assert!(account.customer_number.is_none());
    }

    #[test]
    fn customer_account_links_to_the_directory() {
        let account = UserAccount::for_customer("customer1", "$2b$hash", "John Doe", "C001");
        assert_eq!(account.role, UserRole::Customer);
        assert_eq!(account.customer_number.as_deref(), Some("C001"));
    }
}
