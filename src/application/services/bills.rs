//! Bill lifecycle operations

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use super::calculation::CalculationService;
use crate::domain::{
    Bill, BillStatus, DomainError, DomainResult, PaymentMethod, RepositoryProvider,
};

/// Input for issuing a bill.
#[derive(Debug, Clone)]
pub struct NewBill {
    pub customer_id: String,
    pub period: String,
    pub previous_reading: Decimal,
    pub current_reading: Decimal,
    pub due_date: NaiveDate,
}

/// Input for editing a bill. Omitted fields keep their stored values.
/// `status` is an explicit toggle request: when it differs from the
/// stored status the payment fields move with it, otherwise they are
/// left untouched.
#[derive(Debug, Clone, Default)]
pub struct BillChanges {
    pub customer_id: Option<String>,
    pub period: Option<String>,
    pub previous_reading: Option<Decimal>,
    pub current_reading: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<BillStatus>,
}

/// Service for issuing bills and driving their payment state.
pub struct BillService {
    repos: Arc<dyn RepositoryProvider>,
    calculator: CalculationService,
}

impl BillService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        let calculator = CalculationService::new(repos.clone());
        Self { repos, calculator }
    }

    /// List bills, optionally narrowed by a free-text term (customer
    /// name, customer number, period) and a payment status.
    pub async fn list(
        &self,
        search: Option<&str>,
        status: Option<BillStatus>,
    ) -> DomainResult<Vec<Bill>> {
        let mut bills = self.repos.bills().find_all().await?;
        if let Some(term) = search {
            bills.retain(|b| b.matches_search(term));
        }
        if let Some(status) = status {
            bills.retain(|b| b.status == status);
        }
        Ok(bills)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Option<Bill>> {
        self.repos.bills().find_by_id(id).await
    }

    /// Issue a bill priced with the customer's current tariff. Fails
    /// without persisting anything when the computation fails.
    pub async fn create(&self, input: NewBill) -> DomainResult<Bill> {
        let computation = self
            .calculator
            .compute_bill(&input.customer_id, input.previous_reading, input.current_reading)
            .await?;

        let bill = Bill::new(
            &computation.customer,
            input.period,
            input.previous_reading,
            input.current_reading,
            computation.tariff,
            input.due_date,
        );
        let bill = self.repos.bills().save(bill).await?;

        metrics::counter!("billing_bills_created_total").increment(1);
        info!(
            bill_id = %bill.id,
            customer_number = %bill.customer_number,
            period = %bill.period,
            total_amount = %bill.total_amount,
            "Bill created"
        );
        Ok(bill)
    }

    /// Re-derive a bill from (possibly) new facts, repricing with the
    /// customer's current tariff. Payment state moves only when an
    /// explicit status toggle accompanies the edit.
    pub async fn update(&self, id: &str, changes: BillChanges) -> DomainResult<Bill> {
        let mut bill = self
            .repos
            .bills()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("bill", "id", id))?;

        let customer_id = changes.customer_id.unwrap_or_else(|| bill.customer_id.clone());
        let period = changes.period.unwrap_or_else(|| bill.period.clone());
        let previous_reading = changes.previous_reading.unwrap_or(bill.previous_reading);
        let current_reading = changes.current_reading.unwrap_or(bill.current_reading);
        let due_date = changes.due_date.unwrap_or(bill.due_date);

        let computation = self
            .calculator
            .compute_bill(&customer_id, previous_reading, current_reading)
            .await?;
        bill.reprice(
            &computation.customer,
            period,
            previous_reading,
            current_reading,
            computation.tariff,
            due_date,
        );

        if let Some(status) = changes.status {
            if status != bill.status {
                bill.toggle_status();
            }
        }

        self.repos.bills().update(bill.clone()).await?;

        info!(
            bill_id = %bill.id,
            total_amount = %bill.total_amount,
            status = bill.status.as_str(),
            "Bill updated"
        );
        Ok(bill)
    }

    /// Flip the payment status as an administrative correction.
    pub async fn toggle_status(&self, id: &str) -> DomainResult<Bill> {
        let mut bill = self
            .repos
            .bills()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("bill", "id", id))?;

        bill.toggle_status();
        self.repos.bills().update(bill.clone()).await?;

        if bill.is_paid() {
            metrics::counter!("billing_bills_paid_total").increment(1);
        }
        info!(bill_id = %bill.id, status = bill.status.as_str(), "Bill status toggled");
        Ok(bill)
    }

    /// Settle an unpaid bill with the customer's chosen method.
    pub async fn pay(&self, id: &str, method: Option<PaymentMethod>) -> DomainResult<Bill> {
        let method = method.ok_or_else(|| {
            DomainError::Validation("a payment method is required".to_string())
        })?;

        let mut bill = self
            .repos
            .bills()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("bill", "id", id))?;

        if bill.is_paid() {
            return Err(DomainError::Validation(
                "bill is already paid".to_string(),
            ));
        }

        bill.pay(method);
        self.repos.bills().update(bill.clone()).await?;

        metrics::counter!("billing_bills_paid_total").increment(1);
        info!(
            bill_id = %bill.id,
            customer_number = %bill.customer_number,
            method = method.as_str(),
            "Bill paid"
        );
        Ok(bill)
    }

    /// Hard delete, regardless of payment state.
    pub async fn delete(&self, id: &str) -> DomainResult<()> {
        self.repos.bills().delete(id).await?;
        info!(bill_id = %id, "Bill deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Customer, Tariff};
    use crate::infrastructure::storage::MemoryStore;

    struct Fixture {
        store: Arc<MemoryStore>,
        service: BillService,
        customer: Customer,
        tariff: Tariff,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let tariff = store
            .tariffs()
            .save(Tariff::new("Rumah Tangga 900VA", Decimal::new(1352, 0), Decimal::ZERO, ""))
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
        let service = BillService::new(store.clone());
        Fixture {
            store,
            service,
            customer,
            tariff,
        }
    }

    fn january(customer_id: &str) -> NewBill {
        NewBill {
            customer_id: customer_id.to_string(),
            period: "2024-01".to_string(),
            previous_reading: Decimal::new(1000, 0),
            current_reading: Decimal::new(1150, 0),
            due_date: NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
        }
    }

    #[tokio::test]
    async fn create_prices_with_the_current_tariff() {
        let fx = fixture().await;

        let bill = fx.service.create(january(&fx.customer.id)).await.unwrap();

        assert_eq!(bill.usage, Decimal::new(150, 0));
        assert_eq!(bill.total_amount, Decimal::new(202_800, 0));
        assert_eq!(bill.status, BillStatus::Unpaid);
        assert_eq!(bill.tariff.tariff_id, fx.tariff.id);
    }

    #[tokio::test]
    async fn create_for_missing_customer_persists_nothing() {
        let fx = fixture().await;

        let err = fx.service.create(january("missing")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "customer", .. }));
        assert!(fx.store.bills().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_reprices_with_the_tariff_of_today() {
        let fx = fixture().await;
        let bill = fx.service.create(january(&fx.customer.id)).await.unwrap();

        // Catalog price changes after the bill was issued.
        let mut pricier = fx.tariff.clone();
        pricier.price_per_kwh = Decimal::new(1500, 0);
        fx.store.tariffs().update(pricier).await.unwrap();

        let untouched = fx.service.get(&bill.id).await.unwrap().unwrap();
        assert_eq!(untouched.total_amount, Decimal::new(202_800, 0));

        let edited = fx
            .service
            .update(&bill.id, BillChanges::default())
            .await
            .unwrap();
        assert_eq!(edited.tariff.price_per_kwh, Decimal::new(1500, 0));
        assert_eq!(edited.total_amount, Decimal::new(225_000, 0));
    }

    #[tokio::test]
    async fn edit_keeps_payment_state_without_a_toggle() {
        let fx = fixture().await;
        let bill = fx.service.create(january(&fx.customer.id)).await.unwrap();
        let paid = fx
            .service
            .pay(&bill.id, Some(PaymentMethod::Cash))
            .await
            .unwrap();

        let edited = fx
            .service
            .update(
                &paid.id,
                BillChanges {
                    current_reading: Some(Decimal::new(1200, 0)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.status, BillStatus::Paid);
        assert_eq!(edited.paid_date, paid.paid_date);
        assert_eq!(edited.payment_method, Some(PaymentMethod::Cash));
        assert_eq!(edited.usage, Decimal::new(200, 0));
    }

    #[tokio::test]
    async fn edit_with_explicit_status_applies_the_toggle() {
        let fx = fixture().await;
        let bill = fx.service.create(january(&fx.customer.id)).await.unwrap();

        let edited = fx
            .service
            .update(
                &bill.id,
                BillChanges {
                    status: Some(BillStatus::Paid),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(edited.status, BillStatus::Paid);
        assert!(edited.paid_date.is_some());
        assert_eq!(edited.payment_method, None);
    }

    #[tokio::test]
    async fn double_toggle_restores_the_status() {
        let fx = fixture().await;
        let bill = fx.service.create(january(&fx.customer.id)).await.unwrap();

        let once = fx.service.toggle_status(&bill.id).await.unwrap();
        assert_eq!(once.status, BillStatus::Paid);
        assert!(once.paid_date.is_some());

        let twice = fx.service.toggle_status(&bill.id).await.unwrap();
        assert_eq!(twice.status, BillStatus::Unpaid);
        assert_eq!(twice.paid_date, None);
        assert_eq!(twice.payment_method, None);
    }

    #[tokio::test]
    async fn pay_requires_a_method() {
        let fx = fixture().await;
        let bill = fx.service.create(january(&fx.customer.id)).await.unwrap();

        let err = fx.service.pay(&bill.id, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let unchanged = fx.service.get(&bill.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, BillStatus::Unpaid);
    }

    #[tokio::test]
    async fn pay_twice_is_rejected() {
        let fx = fixture().await;
        let bill = fx.service.create(january(&fx.customer.id)).await.unwrap();

        fx.service
            .pay(&bill.id, Some(PaymentMethod::Ewallet))
            .await
            .unwrap();
        let err = fx
            .service
            .pay(&bill.id, Some(PaymentMethod::Cash))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        // The original method survives the rejected second attempt.
        let bill = fx.service.get(&bill.id).await.unwrap().unwrap();
        assert_eq!(bill.payment_method, Some(PaymentMethod::Ewallet));
    }

    #[tokio::test]
    async fn pay_then_toggle_clears_payment_fields() {
        let fx = fixture().await;
        let bill = fx.service.create(january(&fx.customer.id)).await.unwrap();

        fx.service
            .pay(&bill.id, Some(PaymentMethod::Cash))
            .await
            .unwrap();
        let reverted = fx.service.toggle_status(&bill.id).await.unwrap();

        assert_eq!(reverted.status, BillStatus::Unpaid);
        assert_eq!(reverted.paid_date, None);
        assert_eq!(reverted.payment_method, None);
    }

    #[tokio::test]
    async fn list_filters_by_term_and_status() {
        let fx = fixture().await;
        let first = fx.service.create(january(&fx.customer.id)).await.unwrap();
        let mut feb = january(&fx.customer.id);
        feb.period = "2024-02".to_string();
        fx.service.create(feb).await.unwrap();
        fx.service
            .pay(&first.id, Some(PaymentMethod::Transfer))
            .await
            .unwrap();

        assert_eq!(fx.service.list(None, None).await.unwrap().len(), 2);
        assert_eq!(
            fx.service.list(Some("2024-02"), None).await.unwrap().len(),
            1
        );
        assert_eq!(
            fx.service
                .list(None, Some(BillStatus::Paid))
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            fx.service
                .list(Some("john"), Some(BillStatus::Unpaid))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn delete_removes_paid_bills_too() {
        let fx = fixture().await;
        let bill = fx.service.create(january(&fx.customer.id)).await.unwrap();
        fx.service
            .pay(&bill.id, Some(PaymentMethod::MobileBanking))
            .await
            .unwrap();

        fx.service.delete(&bill.id).await.unwrap();
        assert!(fx.service.get(&bill.id).await.unwrap().is_none());
    }
}
