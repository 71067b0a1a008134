//! Tariff domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Rate plan for postpaid electricity billing.
///
/// A bill charges `usage × price_per_kwh + basic_fee`, where usage is the
/// difference between two meter readings in kWh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Tariff {
    pub id: String,
    pub name: String,
    /// Price per kWh consumed.
    pub price_per_kwh: Decimal,
    /// Flat fee added to every bill regardless of usage.
    pub basic_fee: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Tariff {
    pub fn new(
        name: impl Into<String>,
        price_per_kwh: Decimal,
        basic_fee: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            price_per_kwh,
            basic_fee,
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive free-text match on name and description.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

/// Frozen copy of the tariff terms a bill was priced with.
///
/// Embedded in the bill at creation/edit time and never refreshed
/// afterwards, so historical bills keep their original pricing even
/// when the live tariff changes or disappears.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TariffSnapshot {
    pub tariff_id: String,
    pub tariff_name: String,
    pub price_per_kwh: Decimal,
    pub basic_fee: Decimal,
}

impl TariffSnapshot {
    pub fn of(tariff: &Tariff) -> Self {
        Self {
            tariff_id: tariff.id.clone(),
            tariff_name: tariff.name.clone(),
            price_per_kwh: tariff.price_per_kwh,
            basic_fee: tariff.basic_fee,
        }
    }

    /// Amount due for the given usage under these terms.
    pub fn charge(&self, usage: Decimal) -> Decimal {
        usage * self.price_per_kwh + self.basic_fee
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tariff(price_per_kwh: Decimal, basic_fee: Decimal) -> Tariff {
        Tariff::new("Rumah Tangga 900VA", price_per_kwh, basic_fee, "900VA households")
    }

    #[test]
    fn charge_without_basic_fee() {
        let t = sample_tariff(Decimal::from(1352), Decimal::ZERO);
        let snap = TariffSnapshot::of(&t);
        // 150 kWh × 1352 = 202800
        assert_eq!(snap.charge(Decimal::from(150)), Decimal::from(202_800));
    }

    #[test]
    fn charge_with_basic_fee_is_exact() {
        let t = sample_tariff(Decimal::new(169_953, 2), Decimal::from(44_000));
        let snap = TariffSnapshot::of(&t);
        // 200 kWh × 1699.53 + 44000 = 383906
        assert_eq!(snap.charge(Decimal::from(200)), Decimal::from(383_906));
    }

    #[test]
    fn charge_with_zero_usage_is_the_basic_fee() {
        let t = sample_tariff(Decimal::new(144_470, 2), Decimal::from(44_000));
        let snap = TariffSnapshot::of(&t);
        assert_eq!(snap.charge(Decimal::ZERO), Decimal::from(44_000));
    }

    #[test]
    fn charge_with_negative_usage_goes_below_the_fee() {
        // Corrected readings may make usage negative; the formula is
        // applied as-is.
        let t = sample_tariff(Decimal::from(1000), Decimal::from(44_000));
        let snap = TariffSnapshot::of(&t);
        assert_eq!(snap.charge(Decimal::from(-10)), Decimal::from(34_000));
    }

    #[test]
    fn search_matches_name_and_description() {
        let t = sample_tariff(Decimal::from(1352), Decimal::ZERO);
        assert!(t.matches_search("rumah"));
        assert!(t.matches_search("900va HOUSE"));
        assert!(!t.matches_search("bisnis"));
    }

    #[test]
    fn snapshot_copies_the_live_terms() {
        let t = sample_tariff(Decimal::new(144_470, 2), Decimal::ZERO);
        let snap = TariffSnapshot::of(&t);
        assert_eq!(snap.tariff_id, t.id);
        assert_eq!(snap.tariff_name, "Rumah Tangga 900VA");
        assert_eq!(snap.price_per_kwh, Decimal::new(144_470, 2));
        assert_eq!(snap.basic_fee, Decimal::ZERO);
    }
}
