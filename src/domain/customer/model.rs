//! Customer domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A metered customer of the utility.
///
/// `tariff_id` is a soft reference to the current rate plan: it is
/// validated when the customer is written, but bills keep their own
/// frozen tariff terms, so the reference may dangle later without
/// corrupting history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: String,
    /// Externally visible customer number ("No. Pel"), unique.
    pub customer_number: String,
    pub name: String,
    /// Login name for the customer portal, unique.
    pub username: String,
    pub address: String,
    pub phone: String,
    pub tariff_id: String,
    pub meter_number: String,
    pub created_at: DateTime<Utc>,
}

impl Customer {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        customer_number: impl Into<String>,
        name: impl Into<String>,
        username: impl Into<String>,
        address: impl Into<String>,
        phone: impl Into<String>,
        tariff_id: impl Into<String>,
        meter_number: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            customer_number: customer_number.into(),
            name: name.into(),
            username: username.into(),
            address: address.into(),
            phone: phone.into(),
            tariff_id: tariff_id.into(),
            meter_number: meter_number.into(),
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive free-text match on name, customer number and phone.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.customer_number.to_lowercase().contains(&term)
            || self.phone.contains(&term)
    }
}

// ── Tests ──────────────────────────────────────────────────────
