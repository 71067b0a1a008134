//! Tariff DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTariffRequest {
    #[validate(length(min = 1, max = 100, message = "tariff name is required"))]
    pub name: String,
    pub price_per_kwh: Decimal,
    pub basic_fee: Decimal,
    #[serde(default)]
    pub description: String,
}

/// `PUT` replaces every editable field, so the update body mirrors the
/// create body.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateTariffRequest {
    #[validate(length(min = 1, max = 100, message = "tariff name is required"))]
    pub name: String,
    pub price_per_kwh: Decimal,
    pub basic_fee: Decimal,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListTariffsParams {
    /// Free-text filter on name and description.
    pub search: Option<String>,
}
