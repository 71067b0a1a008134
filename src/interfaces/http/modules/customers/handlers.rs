//! Customer API handlers
//!
//! Admin CRUD for the customer directory plus the per-customer bill
//! statement. Delegates to `CustomerService` and `ReportService`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateCustomerRequest, ListCustomersParams, UpdateCustomerRequest};
use crate::application::services::{CustomerStatement, CustomerUpdate, NewCustomer};
use crate::domain::{Customer, DomainError};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "Customers",
    params(ListCustomersParams),
    responses(
        (status = 200, description = "Customer list", body = ApiResponse<Vec<Customer>>)
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<ListCustomersParams>,
) -> Result<Json<ApiResponse<Vec<Customer>>>, (StatusCode, Json<ApiResponse<Vec<Customer>>>)> {
    match state.customer_service.list(params.search.as_deref()).await {
        Ok(customers) => Ok(Json(ApiResponse::success(customers))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer details", body = ApiResponse<Customer>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Customer>>, (StatusCode, Json<ApiResponse<Customer>>)> {
    match state.customer_service.get(&id).await {
        Ok(Some(customer)) => Ok(Json(ApiResponse::success(customer))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Customer '{}' not found", id))),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/customers",
    tag = "Customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse<Customer>),
        (status = 404, description = "Tariff not found"),
        (status = 409, description = "Customer number or username already in use"),
        (status = 422, description = "Malformed body")
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Customer>>), (StatusCode, Json<ApiResponse<Customer>>)>
{
    let input = NewCustomer {
        customer_number: body.customer_number,
        name: body.name,
        username: body.username,
        password: body.password,
        address: body.address,
        phone: body.phone,
        tariff_id: body.tariff_id,
        meter_number: body.meter_number,
    };

    match state.customer_service.create(input).await {
        Ok(customer) => Ok((StatusCode::CREATED, Json(ApiResponse::success(customer)))),
        Err(e) => {
            let status = match &e {
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::Conflict(_) => StatusCode::CONFLICT,
                DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ApiResponse::error(e.to_string()))))
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    params(("id" = String, Path, description = "Customer ID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = ApiResponse<Customer>),
        (status = 404, description = "Not found"),
        (status = 409, description = "Customer number or username already in use")
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>, (StatusCode, Json<ApiResponse<Customer>>)> {
    let changes = CustomerUpdate {
        customer_number: body.customer_number,
        name: body.name,
        username: body.username,
        password: body.password,
        address: body.address,
        phone: body.phone,
        tariff_id: body.tariff_id,
        meter_number: body.meter_number,
    };

    match state.customer_service.update(&id, changes).await {
        Ok(customer) => Ok(Json(ApiResponse::success(customer))),
        Err(e) => {
            let status = match &e {
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::Conflict(_) => StatusCode::CONFLICT,
                DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ApiResponse::error(e.to_string()))))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    tag = "Customers",
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.customer_service.delete(&id).await {
        Ok(()) => Ok(Json(ApiResponse::success(()))),
        Err(e) => {
            let status = match &e {
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ApiResponse::error(e.to_string()))))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}/statement",
    tag = "Customers",
    params(("id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Bills partitioned by payment state", body = ApiResponse<CustomerStatement>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_customer_statement(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CustomerStatement>>, (StatusCode, Json<ApiResponse<CustomerStatement>>)>
{
    let customer = match state.customer_service.get(&id).await {
        Ok(Some(customer)) => customer,
        Ok(None) => {
            return Err((
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(format!("Customer '{}' not found", id))),
            ));
        }
        Err(e) => {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            ));
        }
    };

    match state
        .report_service
        .statement(&customer.customer_number)
        .await
    {
        Ok(statement) => Ok(Json(ApiResponse::success(statement))),
        Err(e) => {
            let status = match &e {
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ApiResponse::error(e.to_string()))))
        }
    }
}
