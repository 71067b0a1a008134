//! Report query parameters

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for the printable report document endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ReportDocumentParams {
    /// Report kind: "bills", "customers" or "revenue"
    pub kind: String,
    /// Only include bills issued on or after this date (bill reports)
    pub start_date: Option<NaiveDate>,
    /// Only include bills issued on or before this date (bill reports)
    pub end_date: Option<NaiveDate>,
    /// Payment status filter: "paid" or "unpaid" (bill reports)
    pub status: Option<String>,
}
