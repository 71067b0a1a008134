//! Aggregation and reporting engine
//!
//! Everything here is a full recompute over the stored collections at
//! call time; nothing is cached and nothing is mutated. Document
//! assembly produces renderer-ready rows of text, the rendering itself
//! (PDF or otherwise) lives outside this crate.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Bill, BillStatus, DomainError, DomainResult, RepositoryProvider,
};

/// Rows kept in a bills report document.
const BILL_REPORT_ROWS: usize = 20;
/// Rows kept in a customers report document.
const CUSTOMER_REPORT_ROWS: usize = 25;

const UTILITY_NAME: &str = "PT PLN (Persero)";
const REPORT_SUBHEADING: &str = "Electricity Billing System Report";

/// Point-in-time totals for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub total_customers: usize,
    pub total_bills: usize,
    pub paid_bills: usize,
    pub unpaid_bills: usize,
    /// Sum of `total_amount` over paid bills.
    pub total_revenue: Decimal,
    /// Mean usage over all bills, zero when there are none.
    pub average_usage: Decimal,
    pub customers_per_tariff: Vec<TariffCustomerCount>,
}

/// How many customers are currently assigned to a tariff.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TariffCustomerCount {
    pub tariff_id: String,
    pub tariff_name: String,
    pub customers: usize,
}

/// Paid revenue grouped by the tariff the bills were priced with.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TariffRevenue {
    pub tariff_id: String,
    pub tariff_name: String,
    pub bill_count: usize,
    pub revenue: Decimal,
}

/// A customer's bills partitioned by payment state.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerStatement {
    pub customer_number: String,
    pub customer_name: String,
    pub paid: Vec<Bill>,
    pub unpaid: Vec<Bill>,
    /// Sum of `total_amount` over the unpaid partition.
    pub total_outstanding: Decimal,
}

/// Which export document to assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Bills,
    Customers,
    Revenue,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bills => "bills",
            Self::Customers => "customers",
            Self::Revenue => "revenue",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s {
            "bills" => Ok(Self::Bills),
            "customers" => Ok(Self::Customers),
            "revenue" => Ok(Self::Revenue),
            other => Err(DomainError::Validation(format!(
                "unknown report kind '{other}', expected 'bills', 'customers' or 'revenue'"
            ))),
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::Bills => "Bill Report",
            Self::Customers => "Customer Report",
            Self::Revenue => "Revenue Report",
        }
    }
}

/// Filters applied while assembling a report document. The date range
/// matches on creation date; the status filter applies to the bills
/// kind only.
#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<BillStatus>,
}

/// Renderer-ready export document: header lines, summary lines and a
/// bounded table of pre-formatted cells.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDocument {
    pub heading: String,
    pub subheading: String,
    pub title: String,
    pub printed_at: NaiveDate,
    /// Date-range label, present when both bounds were given.
    pub period: Option<String>,
    pub summary: Vec<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// The renderer appends its own extension.
    pub file_stem: String,
}

/// Renderer-ready proof of payment for a single paid bill.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentReceipt {
    pub customer_number: String,
    pub customer_name: String,
    pub period: String,
    pub paid_date: DateTime<Utc>,
    /// Method label; administrative settlements default to "Cash".
    pub payment_method: String,
    pub usage: Decimal,
    pub tariff_name: String,
    pub total_amount: Decimal,
    pub file_stem: String,
}

/// Service computing summaries, statements and export documents.
pub struct ReportService {
    repos: Arc<dyn RepositoryProvider>,
}

impl ReportService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn dashboard_summary(&self) -> DomainResult<DashboardSummary> {
        let bills = self.repos.bills().find_all().await?;
        let customers = self.repos.customers().find_all().await?;
        let mut tariffs = self.repos.tariffs().find_all().await?;
        tariffs.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let paid_bills = bills.iter().filter(|b| b.is_paid()).count();
        let total_revenue: Decimal = bills
            .iter()
            .filter(|b| b.is_paid())
            .map(|b| b.total_amount)
            .sum();
        let average_usage = if bills.is_empty() {
            Decimal::ZERO
        } else {
            bills.iter().map(|b| b.usage).sum::<Decimal>() / Decimal::from(bills.len())
        };

        let customers_per_tariff = tariffs
            .iter()
            .map(|t| TariffCustomerCount {
                tariff_id: t.id.clone(),
                tariff_name: t.name.clone(),
                customers: customers.iter().filter(|c| c.tariff_id == t.id).count(),
            })
            .collect();

        Ok(DashboardSummary {
            total_customers: customers.len(),
            total_bills: bills.len(),
            paid_bills,
            unpaid_bills: bills.len() - paid_bills,
            total_revenue,
            average_usage,
            customers_per_tariff,
        })
    }

    /// Paid revenue grouped by the frozen tariff of each bill. Names are
    /// resolved from the live catalog, falling back to the frozen name
    /// when the tariff has since been deleted.
    pub async fn revenue_by_tariff(&self) -> DomainResult<Vec<TariffRevenue>> {
        let bills = self.repos.bills().find_all().await?;
        let catalog = self.repos.tariffs().find_all().await?;

        let mut groups: BTreeMap<String, TariffRevenue> = BTreeMap::new();
        for bill in bills.iter().filter(|b| b.is_paid()) {
            let entry = groups
                .entry(bill.tariff.tariff_id.clone())
                .or_insert_with(|| TariffRevenue {
                    tariff_id: bill.tariff.tariff_id.clone(),
                    tariff_name: catalog
                        .iter()
                        .find(|t| t.id == bill.tariff.tariff_id)
                        .map(|t| t.name.clone())
                        .unwrap_or_else(|| bill.tariff.tariff_name.clone()),
                    bill_count: 0,
                    revenue: Decimal::ZERO,
                });
            entry.bill_count += 1;
            entry.revenue += bill.total_amount;
        }

        Ok(groups.into_values().collect())
    }

    pub async fn statement(&self, customer_number: &str) -> DomainResult<CustomerStatement> {
        let customer = self
            .repos
            .customers()
            .find_by_customer_number(customer_number)
            .await?
            .ok_or_else(|| {
                DomainError::not_found("customer", "customer_number", customer_number)
            })?;

        let mut bills = self
            .repos
            .bills()
            .find_by_customer_number(customer_number)
            .await?;
        bills.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let (paid, unpaid): (Vec<Bill>, Vec<Bill>) =
            bills.into_iter().partition(|b| b.is_paid());
        let total_outstanding = unpaid.iter().map(|b| b.total_amount).sum();

        Ok(CustomerStatement {
            customer_number: customer.customer_number,
            customer_name: customer.name,
            paid,
            unpaid,
            total_outstanding,
        })
    }

    pub async fn document(
        &self,
        kind: ReportKind,
        filter: ReportFilter,
    ) -> DomainResult<ReportDocument> {
        let (summary, columns, rows) = match kind {
            ReportKind::Bills => self.bills_table(&filter).await?,
            ReportKind::Customers => self.customers_table().await?,
            ReportKind::Revenue => self.revenue_table().await?,
        };

        let today = Utc::now().date_naive();
        let period = match (filter.start_date, filter.end_date) {
            (Some(start), Some(end)) => Some(format!("{start} to {end}")),
            _ => None,
        };

        Ok(ReportDocument {
            heading: UTILITY_NAME.to_string(),
            subheading: REPORT_SUBHEADING.to_string(),
            title: kind.title().to_string(),
            printed_at: today,
            period,
            summary,
            columns,
            rows,
            file_stem: format!("report_{}_{}", kind.as_str(), today),
        })
    }

    /// Assemble the proof-of-payment data for one paid bill.
    pub async fn receipt(&self, bill_id: &str) -> DomainResult<PaymentReceipt> {
        let bill = self
            .repos
            .bills()
            .find_by_id(bill_id)
            .await?
            .ok_or_else(|| DomainError::not_found("bill", "id", bill_id))?;

        let paid_date = match (bill.status, bill.paid_date) {
            (BillStatus::Paid, Some(date)) => date,
            _ => {
                return Err(DomainError::Validation(
                    "a receipt can only be issued for a paid bill".to_string(),
                ))
            }
        };

        Ok(PaymentReceipt {
            file_stem: format!("receipt_{}_{}", bill.customer_number, bill.period),
            customer_number: bill.customer_number,
            customer_name: bill.customer_name,
            period: bill.period,
            paid_date,
            payment_method: bill
                .payment_method
                .map(|m| m.label().to_string())
                .unwrap_or_else(|| "Cash".to_string()),
            usage: bill.usage,
            tariff_name: bill.tariff.tariff_name,
            total_amount: bill.total_amount,
        })
    }

    async fn bills_table(
        &self,
        filter: &ReportFilter,
    ) -> DomainResult<(Vec<String>, Vec<String>, Vec<Vec<String>>)> {
        let mut bills = self.repos.bills().find_all().await?;
        bills.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        if let Some(start) = filter.start_date {
            bills.retain(|b| b.created_at.date_naive() >= start);
        }
        if let Some(end) = filter.end_date {
            bills.retain(|b| b.created_at.date_naive() <= end);
        }
        if let Some(status) = filter.status {
            bills.retain(|b| b.status == status);
        }

        let paid = bills.iter().filter(|b| b.is_paid()).count();
        let revenue: Decimal = bills
            .iter()
            .filter(|b| b.is_paid())
            .map(|b| b.total_amount)
            .sum();
        let summary = vec![
            format!("Total Bills: {}", bills.len()),
            format!("Paid Bills: {paid}"),
            format!("Total Revenue: Rp {revenue}"),
        ];

        let columns = ["Customer No", "Name", "Period", "Usage", "Amount", "Status"]
            .map(String::from)
            .to_vec();
        let rows = bills
            .iter()
            .take(BILL_REPORT_ROWS)
            .map(|b| {
                vec![
                    b.customer_number.clone(),
                    b.customer_name.clone(),
                    b.period.clone(),
                    format!("{} kWh", b.usage),
                    format!("Rp {}", b.total_amount),
                    if b.is_paid() { "Paid" } else { "Unpaid" }.to_string(),
                ]
            })
            .collect();

        Ok((summary, columns, rows))
    }

    async fn customers_table(
        &self,
    ) -> DomainResult<(Vec<String>, Vec<String>, Vec<Vec<String>>)> {
        let mut customers = self.repos.customers().find_all().await?;
        customers.sort_by(|a, b| a.customer_number.cmp(&b.customer_number));
        let catalog = self.repos.tariffs().find_all().await?;

        let summary = vec![format!("Total Customers: {}", customers.len())];
        let columns = ["Customer No", "Name", "Tariff", "Meter No", "Phone"]
            .map(String::from)
            .to_vec();
        let rows = customers
            .iter()
            .take(CUSTOMER_REPORT_ROWS)
            .map(|c| {
                let tariff_name = catalog
                    .iter()
                    .find(|t| t.id == c.tariff_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| "N/A".to_string());
                vec![
                    c.customer_number.clone(),
                    c.name.clone(),
                    tariff_name,
                    c.meter_number.clone(),
                    c.phone.clone(),
                ]
            })
            .collect();

        Ok((summary, columns, rows))
    }

    async fn revenue_table(
        &self,
    ) -> DomainResult<(Vec<String>, Vec<String>, Vec<Vec<String>>)> {
        let bills = self.repos.bills().find_all().await?;
        let mut tariffs = self.repos.tariffs().find_all().await?;
        tariffs.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let paid: Vec<&Bill> = bills.iter().filter(|b| b.is_paid()).collect();
        let total_revenue: Decimal = paid.iter().map(|b| b.total_amount).sum();
        let average = if paid.is_empty() {
            Decimal::ZERO
        } else {
            total_revenue / Decimal::from(paid.len())
        };

        let summary = vec![
            format!("Total Revenue: Rp {total_revenue}"),
            format!("Paid Bills: {}", paid.len()),
            format!("Average Bill: Rp {average}"),
        ];

        let columns = ["Tariff", "Revenue", "Paid Bills"].map(String::from).to_vec();
        let rows = tariffs
            .iter()
            .map(|t| {
                let for_tariff: Vec<&&Bill> = paid
                    .iter()
                    .filter(|b| b.tariff.tariff_id == t.id)
                    .collect();
                let revenue: Decimal = for_tariff.iter().map(|b| b.total_amount).sum();
                vec![
                    t.name.clone(),
                    format!("Rp {revenue}"),
                    for_tariff.len().to_string(),
                ]
            })
            .collect();

        Ok((summary, columns, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Customer, PaymentMethod, Tariff};
    use crate::infrastructure::storage::MemoryStore;

    struct Fixture {
        store: Arc<MemoryStore>,
        service: ReportService,
        tariff: Tariff,
        customer: Customer,
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
        let service = ReportService::new(store.clone());
        Fixture {
            store,
            service,
            tariff,
            customer,
        }
    }

    fn bill(customer: &Customer, tariff: &Tariff, period: &str, usage: i64) -> Bill {
        Bill::new(
            customer,
            period,
            Decimal::new(1000, 0),
            Decimal::new(1000 + usage, 0),
            crate::domain::TariffSnapshot::of(tariff),
            NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
        )
    }

    async fn add_paid_bill(fx: &Fixture, period: &str, usage: i64) -> Bill {
        let mut b = bill(&fx.customer, &fx.tariff, period, usage);
        b.pay(PaymentMethod::Cash);
        fx.store.bills().save(b).await.unwrap()
    }

    #[tokio::test]
    async fn summary_of_an_empty_store_is_all_zeroes() {
        let store = Arc::new(MemoryStore::new());
        let service = ReportService::new(store);

        let summary = service.dashboard_summary().await.unwrap();
        assert_eq!(summary.total_bills, 0);
        assert_eq!(summary.total_revenue, Decimal::ZERO);
        assert_eq!(summary.average_usage, Decimal::ZERO);
        assert!(summary.customers_per_tariff.is_empty());
    }

    #[tokio::test]
    async fn summary_counts_and_revenue() {
        let fx = fixture().await;
        fx.store
            .bills()
            .save(bill(&fx.customer, &fx.tariff, "2024-01", 150))
            .await
            .unwrap();
        add_paid_bill(&fx, "2024-02", 250).await;

        let summary = fx.service.dashboard_summary().await.unwrap();
        assert_eq!(summary.total_customers, 1);
        assert_eq!(summary.total_bills, 2);
        assert_eq!(summary.paid_bills, 1);
        assert_eq!(summary.unpaid_bills, 1);
        // Only the paid 250 kWh bill: 250 * 1352.
        assert_eq!(summary.total_revenue, Decimal::new(338_000, 0));
        // (150 + 250) / 2.
        assert_eq!(summary.average_usage, Decimal::new(200, 0));
        assert_eq!(summary.customers_per_tariff[0].customers, 1);
    }

    #[tokio::test]
    async fn revenue_grouping_falls_back_to_the_frozen_name() {
        let fx = fixture().await;
        add_paid_bill(&fx, "2024-01", 100).await;
        add_paid_bill(&fx, "2024-02", 100).await;
        fx.store.tariffs().delete(&fx.tariff.id).await.unwrap();

        let groups = fx.service.revenue_by_tariff().await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].tariff_name, "Rumah Tangga 900VA");
        assert_eq!(groups[0].bill_count, 2);
        assert_eq!(groups[0].revenue, Decimal::new(270_400, 0));
    }

    #[tokio::test]
    async fn statement_partitions_and_totals_outstanding() {
        let fx = fixture().await;
        fx.store
            .bills()
            .save(bill(&fx.customer, &fx.tariff, "2024-01", 150))
            .await
            .unwrap();
        fx.store
            .bills()
            .save(bill(&fx.customer, &fx.tariff, "2024-02", 100))
            .await
            .unwrap();
        add_paid_bill(&fx, "2024-03", 200).await;

        let statement = fx.service.statement("C001").await.unwrap();
        assert_eq!(statement.customer_name, "John Doe");
        assert_eq!(statement.paid.len(), 1);
        assert_eq!(statement.unpaid.len(), 2);
        // 150 * 1352 + 100 * 1352.
        assert_eq!(statement.total_outstanding, Decimal::new(338_000, 0));
    }

    #[tokio::test]
    async fn statement_for_unknown_customer_is_not_found() {
        let fx = fixture().await;
        let err = fx.service.statement("C999").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn bills_document_caps_rows_and_sums_the_filtered_set() {
        let fx = fixture().await;
        for i in 0..25 {
            add_paid_bill(&fx, &format!("2024-{:02}", i + 1), 100).await;
        }

        let doc = fx
            .service
            .document(ReportKind::Bills, ReportFilter::default())
            .await
            .unwrap();

        assert_eq!(doc.rows.len(), BILL_REPORT_ROWS);
        assert_eq!(doc.columns.len(), 6);
        assert_eq!(doc.summary[0], "Total Bills: 25");
        assert_eq!(doc.summary[1], "Paid Bills: 25");
        // 25 bills * 100 kWh * 1352.
        assert_eq!(doc.summary[2], "Total Revenue: Rp 3380000");
        assert!(doc.file_stem.starts_with("report_bills_"));
        assert_eq!(doc.heading, "PT PLN (Persero)");
    }

    #[tokio::test]
    async fn bills_document_honors_status_filter() {
        let fx = fixture().await;
        fx.store
            .bills()
            .save(bill(&fx.customer, &fx.tariff, "2024-01", 150))
            .await
            .unwrap();
        add_paid_bill(&fx, "2024-02", 100).await;

        let doc = fx
            .service
            .document(
                ReportKind::Bills,
                ReportFilter {
                    status: Some(BillStatus::Unpaid),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.summary[0], "Total Bills: 1");
        assert_eq!(doc.summary[2], "Total Revenue: Rp 0");
        assert_eq!(doc.rows[0][5], "Unpaid");
    }

    #[tokio::test]
    async fn bills_document_date_range_sets_the_period_label() {
        let fx = fixture().await;
        add_paid_bill(&fx, "2024-01", 100).await;

        let doc = fx
            .service
            .document(
                ReportKind::Bills,
                ReportFilter {
                    start_date: NaiveDate::from_ymd_opt(2000, 1, 1),
                    end_date: NaiveDate::from_ymd_opt(2099, 12, 31),
                    status: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(doc.period.as_deref(), Some("2000-01-01 to 2099-12-31"));
        assert_eq!(doc.rows.len(), 1);

        let out_of_range = fx
            .service
            .document(
                ReportKind::Bills,
                ReportFilter {
                    start_date: NaiveDate::from_ymd_opt(1900, 1, 1),
                    end_date: NaiveDate::from_ymd_opt(1900, 12, 31),
                    status: None,
                },
            )
            .await
            .unwrap();
        assert!(out_of_range.rows.is_empty());
        assert_eq!(out_of_range.summary[0], "Total Bills: 0");
    }

    #[tokio::test]
    async fn customers_document_resolves_tariff_names_live() {
        let fx = fixture().await;

        let doc = fx
            .service
            .document(ReportKind::Customers, ReportFilter::default())
            .await
            .unwrap();
        assert_eq!(doc.summary[0], "Total Customers: 1");
        assert_eq!(doc.rows[0][2], "Rumah Tangga 900VA");

        fx.store.tariffs().delete(&fx.tariff.id).await.unwrap();
        let doc = fx
            .service
            .document(ReportKind::Customers, ReportFilter::default())
            .await
            .unwrap();
        assert_eq!(doc.rows[0][2], "N/A");
    }

    #[tokio::test]
    async fn revenue_document_averages_zero_when_nothing_is_paid() {
        let fx = fixture().await;
        fx.store
            .bills()
            .save(bill(&fx.customer, &fx.tariff, "2024-01", 150))
            .await
            .unwrap();

        let doc = fx
            .service
            .document(ReportKind::Revenue, ReportFilter::default())
            .await
            .unwrap();

        assert_eq!(doc.summary[0], "Total Revenue: Rp 0");
        assert_eq!(doc.summary[2], "Average Bill: Rp 0");
        // One row per catalog tariff even when it earned nothing.
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(doc.rows[0][1], "Rp 0");
    }

    #[tokio::test]
    async fn receipt_for_a_paid_bill_carries_the_method_label() {
        let fx = fixture().await;
        let mut b = bill(&fx.customer, &fx.tariff, "2024-01", 150);
        b.pay(PaymentMethod::MobileBanking);
        let saved = fx.store.bills().save(b).await.unwrap();

        let receipt = fx.service.receipt(&saved.id).await.unwrap();
        assert_eq!(receipt.payment_method, "Mobile Banking");
        assert_eq!(receipt.total_amount, Decimal::new(202_800, 0));
        assert_eq!(receipt.file_stem, "receipt_C001_2024-01");
    }

    #[tokio::test]
    async fn receipt_defaults_to_cash_for_admin_settled_bills() {
        let fx = fixture().await;
        let mut b = bill(&fx.customer, &fx.tariff, "2024-02", 100);
        b.toggle_status();
        let saved = fx.store.bills().save(b).await.unwrap();

        let receipt = fx.service.receipt(&saved.id).await.unwrap();
        assert_eq!(receipt.payment_method, "Cash");
    }

    #[tokio::test]
    async fn receipt_for_an_unpaid_bill_is_rejected() {
        let fx = fixture().await;
        let saved = fx
            .store
            .bills()
            .save(bill(&fx.customer, &fx.tariff, "2024-01", 150))
            .await
            .unwrap();

        let err = fx.service.receipt(&saved.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_report_kind_is_a_validation_error() {
        assert!(ReportKind::parse("bills").is_ok());
        assert!(matches!(
            ReportKind::parse("payroll"),
            Err(DomainError::Validation(_))
        ));
    }
}
