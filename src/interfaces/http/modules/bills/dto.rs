//! Bill DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{BillStatus, PaymentMethod};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBillRequest {
    pub customer_id: String,
    #[validate(length(min = 1, max = 20, message = "billing period is required"))]
    pub period: String,
    pub previous_reading: Decimal,
    pub current_reading: Decimal,
    pub due_date: NaiveDate,
}

/// Partial edit. Omitted fields keep their stored values; `status` is an
/// explicit toggle request.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBillRequest {
    pub customer_id: Option<String>,
    #[validate(length(min = 1, max = 20, message = "billing period is required"))]
    pub period: Option<String>,
    pub previous_reading: Option<Decimal>,
    pub current_reading: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<BillStatus>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PayBillRequest {
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListBillsParams {
    /// Free-text filter on customer name, customer number and period.
    pub search: Option<String>,
    /// Payment status filter: "paid" or "unpaid".
    pub status: Option<String>,
}
