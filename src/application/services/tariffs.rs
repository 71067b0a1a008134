//! Tariff catalog operations

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, Tariff};

/// Service for catalog maintenance and lookup.
pub struct TariffService {
    repos: Arc<dyn RepositoryProvider>,
}

impl TariffService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// List tariffs, optionally narrowed by a free-text term matched
    /// against name and description.
    pub async fn list(&self, search: Option<&str>) -> DomainResult<Vec<Tariff>> {
        let mut tariffs = self.repos.tariffs().find_all().await?;
        if let Some(term) = search {
            tariffs.retain(|t| t.matches_search(term));
        }
        Ok(tariffs)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Option<Tariff>> {
        self.repos.tariffs().find_by_id(id).await
    }

    pub async fn create(
        &self,
        name: &str,
        price_per_kwh: Decimal,
        basic_fee: Decimal,
        description: &str,
    ) -> DomainResult<Tariff> {
        validate_rates(price_per_kwh, basic_fee)?;

        let tariff = self
            .repos
            .tariffs()
            .save(Tariff::new(name, price_per_kwh, basic_fee, description))
            .await?;

        info!(tariff_id = %tariff.id, name = %tariff.name, "Tariff created");
        Ok(tariff)
    }

    /// Replace all editable fields of an existing tariff. Bills keep the
    /// snapshot they were issued with.
    pub async fn update(
        &self,
        id: &str,
        name: &str,
        price_per_kwh: Decimal,
        basic_fee: Decimal,
        description: &str,
    ) -> DomainResult<Tariff> {
        validate_rates(price_per_kwh, basic_fee)?;

        let mut tariff = self
            .repos
            .tariffs()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("tariff", "id", id))?;

        tariff.name = name.to_string();
        tariff.price_per_kwh = price_per_kwh;
        tariff.basic_fee = basic_fee;
        tariff.description = description.to_string();

        self.repos.tariffs().update(tariff.clone()).await?;

        info!(tariff_id = %tariff.id, name = %tariff.name, "Tariff updated");
        Ok(tariff)
    }

    /// Unconditional delete. Customers pointing at the tariff dangle
    /// until they are re-assigned.
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.repos.tariffs().delete(id).await?;
        info!(tariff_id = %id, "Tariff deleted");
        Ok(())
    }
}

fn validate_rates(price_per_kwh: Decimal, basic_fee: Decimal) -> DomainResult<()> {
    if price_per_kwh < Decimal::ZERO {
        return Err(DomainError::Validation(
            "price per kWh cannot be negative".to_string(),
        ));
    }
    if basic_fee < Decimal::ZERO {
        return Err(DomainError::Validation(
            "basic fee cannot be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::MemoryStore;

    fn service() -> TariffService {
        TariffService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn create_rejects_negative_rates() {
        let service = service();

        let err = service
            .create("Broken", Decimal::new(-1, 0), Decimal::ZERO, "")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .create("Broken", Decimal::ZERO, Decimal::new(-1, 0), "")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn update_missing_tariff_is_not_found() {
        let service = service();

        let err = service
            .update("missing", "X", Decimal::ONE, Decimal::ZERO, "")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "tariff", .. }));
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_identity() {
        let service = service();
        let tariff = service
            .create("Bisnis 2200VA", Decimal::new(169_953, 2), Decimal::new(44_000, 0), "Usaha")
            .await
            .unwrap();

        let updated = service
            .update(&tariff.id, "Bisnis 2200VA+", Decimal::new(1700, 0), Decimal::new(44_000, 0), "Usaha")
            .await
            .unwrap();

        assert_eq!(updated.id, tariff.id);
        assert_eq!(updated.created_at, tariff.created_at);
        assert_eq!(updated.price_per_kwh, Decimal::new(1700, 0));
    }

    #[tokio::test]
    async fn search_matches_name_and_description() {
        let service = service();
        service
            .create("Rumah Tangga 900VA", Decimal::new(1352, 0), Decimal::ZERO, "rumah tangga kecil")
            .await
            .unwrap();
        service
            .create("Bisnis 2200VA", Decimal::new(169_953, 2), Decimal::new(44_000, 0), "untuk usaha")
            .await
            .unwrap();

        assert_eq!(service.list(Some("bisnis")).await.unwrap().len(), 1);
        assert_eq!(service.list(Some("usaha")).await.unwrap().len(), 1);
        assert_eq!(service.list(Some("900")).await.unwrap().len(), 1);
        assert_eq!(service.list(None).await.unwrap().len(), 2);
        assert!(service.list(Some("zzz")).await.unwrap().is_empty());
    }
}
