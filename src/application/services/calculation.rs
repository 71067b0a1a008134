//! Billing calculation engine

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::{Customer, DomainError, DomainResult, RepositoryProvider, TariffSnapshot};

/// Charges derived from a meter reading pair and the customer's
/// current tariff.
#[derive(Debug, Clone)]
pub struct BillComputation {
    pub customer: Customer,
    pub usage: Decimal,
    pub tariff: TariffSnapshot,
    pub total_amount: Decimal,
}

/// Derives bill charges without writing anything.
///
/// `usage = current - previous` and
/// `total = usage * price_per_kwh + basic_fee`, all in exact decimal
/// arithmetic. The tariff is resolved live at computation time; callers
/// freeze the returned snapshot into the bill.
pub struct CalculationService {
    repos: Arc<dyn RepositoryProvider>,
}

impl CalculationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn compute_bill(
        &self,
        customer_id: &str,
        previous_reading: Decimal,
        current_reading: Decimal,
    ) -> DomainResult<BillComputation> {
        if previous_reading < Decimal::ZERO || current_reading < Decimal::ZERO {
            return Err(DomainError::Validation(
                "meter readings cannot be negative".to_string(),
            ));
        }

        let customer = self
            .repos
            .customers()
            .find_by_id(customer_id)
            .await?
            .ok_or_else(|| DomainError::not_found("customer", "id", customer_id))?;

        let tariff = self
            .repos
            .tariffs()
            .find_by_id(&customer.tariff_id)
            .await?
            .ok_or_else(|| DomainError::not_found("tariff", "id", customer.tariff_id.clone()))?;

        let tariff = TariffSnapshot::of(&tariff);
        let usage = current_reading - previous_reading;
        let total_amount = tariff.charge(usage);

        Ok(BillComputation {
            customer,
            usage,
            tariff,
            total_amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Customer, Tariff};
    use crate::infrastructure::storage::MemoryStore;

    async fn store_with_customer(price_per_kwh: Decimal, basic_fee: Decimal) -> (Arc<MemoryStore>, Customer) {
        let store = Arc::new(MemoryStore::new());
        let tariff = store
            .tariffs()
            .save(Tariff::new("Rumah Tangga 900VA", price_per_kwh, basic_fee, "900 VA"))
            .await
            .unwrap();
        let customer = store
            .customers()
            .save(Customer::new(
                "C001",
                "John Doe",
                "customer1",
                "Jl. Merdeka No. 123, Jakarta",
                "081234567890",
                &tariff.id,
                "M001",
            ))
            .await
            .unwrap();
        (store, customer)
    }

    #[tokio::test]
    async fn computes_usage_and_total_from_readings() {
        let (store, customer) = store_with_customer(Decimal::new(1352, 0), Decimal::ZERO).await;
        let service = CalculationService::new(store);

        let computation = service
            .compute_bill(&customer.id, Decimal::new(1000, 0), Decimal::new(1150, 0))
            .await
            .unwrap();

        assert_eq!(computation.usage, Decimal::new(150, 0));
        assert_eq!(computation.total_amount, Decimal::new(202_800, 0));
        assert_eq!(computation.customer.id, customer.id);
    }

    #[tokio::test]
    async fn basic_fee_is_added_exactly() {
        let (store, customer) =
            store_with_customer(Decimal::new(169_953, 2), Decimal::new(44_000, 0)).await;
        let service = CalculationService::new(store);

        let computation = service
            .compute_bill(&customer.id, Decimal::new(1000, 0), Decimal::new(1200, 0))
            .await
            .unwrap();

        assert_eq!(computation.total_amount, Decimal::new(383_906, 0));
    }

    #[tokio::test]
    async fn missing_customer_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let service = CalculationService::new(store);

        let err = service
            .compute_bill("no-such-customer", Decimal::ZERO, Decimal::ONE)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "customer", .. }));
    }

    #[tokio::test]
    async fn dangling_tariff_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let customer = store
            .customers()
            .save(Customer::new(
                "C009",
                "Ghost",
                "ghost",
                "-",
                "-",
                "deleted-tariff",
                "M009",
            ))
            .await
            .unwrap();
        let service = CalculationService::new(store);

        let err = service
            .compute_bill(&customer.id, Decimal::ZERO, Decimal::ONE)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "tariff", .. }));
    }

    #[tokio::test]
    async fn negative_reading_is_rejected() {
        let (store, customer) = store_with_customer(Decimal::new(1352, 0), Decimal::ZERO).await;
        let service = CalculationService::new(store);

        let err = service
            .compute_bill(&customer.id, Decimal::new(-1, 0), Decimal::new(100, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
