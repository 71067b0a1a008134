//! Customer DTOs

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 20, message = "customer number is required"))]
    pub customer_number: String,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    pub tariff_id: String,
    #[validate(length(min = 1, max = 20, message = "meter number is required"))]
    pub meter_number: String,
}

/// Full replacement except for the password, which is only rehashed when
/// a new one is supplied.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 20, message = "customer number is required"))]
    pub customer_number: String,
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, max = 50, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    pub tariff_id: String,
    #[validate(length(min = 1, max = 20, message = "meter number is required"))]
    pub meter_number: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListCustomersParams {
    /// Free-text filter on name, customer number and phone.
    pub search: Option<String>,
}
