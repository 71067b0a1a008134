//! Bill domain entity and payment state machine

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::customer::Customer;
use crate::domain::tariff::TariffSnapshot;

/// Payment status of a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Unpaid,
    Paid,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "unpaid" => Some(Self::Unpaid),
            "paid" => Some(Self::Paid),
            _ => None,
        }
    }
}

/// Payment method selected by a customer when settling a bill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Transfer,
    MobileBanking,
    Ewallet,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Transfer => "transfer",
            Self::MobileBanking => "mobile_banking",
            Self::Ewallet => "ewallet",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cash" => Some(Self::Cash),
            "transfer" => Some(Self::Transfer),
            "mobile_banking" => Some(Self::MobileBanking),
            "ewallet" => Some(Self::Ewallet),
            _ => None,
        }
    }

    /// Human-readable label for receipts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::Transfer => "Bank Transfer",
            Self::MobileBanking => "Mobile Banking",
            Self::Ewallet => "E-Wallet",
        }
    }
}

/// Monthly electricity bill.
///
/// Customer identity and tariff terms are denormalized at creation time:
/// the bill stays accurate even if the customer or tariff is later edited
/// or deleted. `paid_date` is present exactly when `status` is Paid;
/// `payment_method` is present only when the bill was settled through the
/// customer payment flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Bill {
    pub id: String,
    pub customer_id: String,
    pub customer_number: String,
    pub customer_name: String,
    /// Billing period label, e.g. "2024-01".
    pub period: String,
    pub previous_reading: Decimal,
    pub current_reading: Decimal,
    /// Consumed kWh: `current_reading - previous_reading`.
    pub usage: Decimal,
    #[serde(flatten)]
    pub tariff: TariffSnapshot,
    pub total_amount: Decimal,
    pub status: BillStatus,
    pub due_date: NaiveDate,
    pub paid_date: Option<DateTime<Utc>>,
    pub payment_method: Option<PaymentMethod>,
    pub created_at: DateTime<Utc>,
}

impl Bill {
    pub fn new(
        customer: &Customer,
        period: impl Into<String>,
        previous_reading: Decimal,
        current_reading: Decimal,
        tariff: TariffSnapshot,
        due_date: NaiveDate,
    ) -> Self {
        let usage = current_reading - previous_reading;
        let total_amount = tariff.charge(usage);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            customer_id: customer.id.clone(),
            customer_number: customer.customer_number.clone(),
            customer_name: customer.name.clone(),
            period: period.into(),
            previous_reading,
            current_reading,
            usage,
            tariff,
            total_amount,
            status: BillStatus::Unpaid,
            due_date,
            paid_date: None,
            payment_method: None,
            created_at: Utc::now(),
        }
    }

    /// Replace the billable facts and re-derive usage and amount from the
    /// given (current) tariff terms.
    ///
    /// Payment state (`status`, `paid_date`, `payment_method`) and
    /// `created_at` are left untouched.
    pub fn reprice(
        &mut self,
        customer: &Customer,
        period: impl Into<String>,
        previous_reading: Decimal,
        current_reading: Decimal,
        tariff: TariffSnapshot,
        due_date: NaiveDate,
    ) {
        self.customer_id = customer.id.clone();
        self.customer_number = customer.customer_number.clone();
        self.customer_name = customer.name.clone();
        self.period = period.into();
        self.previous_reading = previous_reading;
        self.current_reading = current_reading;
        self.usage = current_reading - previous_reading;
        self.tariff = tariff;
        self.total_amount = self.tariff.charge(self.usage);
        self.due_date = due_date;
    }

    /// Administrator toggle between Unpaid and Paid.
    ///
    /// Becoming Paid stamps `paid_date` without a payment method;
    /// becoming Unpaid clears both `paid_date` and `payment_method`.
    pub fn toggle_status(&mut self) {
        match self.status {
            BillStatus::Unpaid => {
                self.status = BillStatus::Paid;
                self.paid_date = Some(Utc::now());
            }
            BillStatus::Paid => {
                self.status = BillStatus::Unpaid;
                self.paid_date = None;
                self.payment_method = None;
            }
        }
    }

    /// Settle the bill through the customer payment flow.
    pub fn pay(&mut self, method: PaymentMethod) {
        self.status = BillStatus::Paid;
        self.paid_date = Some(Utc::now());
        self.payment_method = Some(method);
    }

    pub fn is_paid(&self) -> bool {
        self.status == BillStatus::Paid
    }

    /// Case-insensitive free-text match on customer name, customer number
    /// and period.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.customer_name.to_lowercase().contains(&term)
            || self.customer_number.to_lowercase().contains(&term)
            || self.period.to_lowercase().contains(&term)
    }
}

// ── Tests ──────────────────────────────────────────────────────
