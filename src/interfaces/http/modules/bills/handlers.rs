//! Bill API handlers
//!
//! Bill CRUD plus the payment operations: admin status toggle, customer
//! payment and the printable receipt. Delegates to `BillService` and
//! `ReportService`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateBillRequest, ListBillsParams, PayBillRequest, UpdateBillRequest};
use crate::application::services::{BillChanges, NewBill, PaymentReceipt};
use crate::domain::{Bill, BillStatus, DomainError};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/bills",
    tag = "Bills",
    params(ListBillsParams),
    responses(
        (status = 200, description = "Bill list", body = ApiResponse<Vec<Bill>>),
        (status = 400, description = "Unknown status filter")
    )
)]
pub async fn list_bills(
    State(state): State<AppState>,
    Query(params): Query<ListBillsParams>,
) -> Result<Json<ApiResponse<Vec<Bill>>>, (StatusCode, Json<ApiResponse<Vec<Bill>>>)> {
    let status = match params.status.as_deref() {
        Some(s) => match BillStatus::from_str(s) {
            Some(status) => Some(status),
            None => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(format!(
                        "unknown status '{}', expected 'paid' or 'unpaid'",
                        s
                    ))),
                ));
            }
        },
        None => None,
    };

    match state
        .bill_service
        .list(params.search.as_deref(), status)
        .await
    {
        Ok(bills) => Ok(Json(ApiResponse::success(bills))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/bills/{id}",
    tag = "Bills",
    params(("id" = String, Path, description = "Bill ID")),
    responses(
        (status = 200, description = "Bill details", body = ApiResponse<Bill>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Bill>>, (StatusCode, Json<ApiResponse<Bill>>)> {
    match state.bill_service.get(&id).await {
        Ok(Some(bill)) => Ok(Json(ApiResponse::success(bill))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Bill '{}' not found", id))),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/bills",
    tag = "Bills",
    request_body = CreateBillRequest,
    responses(
        (status = 201, description = "Bill created", body = ApiResponse<Bill>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Customer not found")
    )
)]
pub async fn create_bill(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateBillRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Bill>>), (StatusCode, Json<ApiResponse<Bill>>)> {
    let input = NewBill {
        customer_id: body.customer_id,
        period: body.period,
        previous_reading: body.previous_reading,
        current_reading: body.current_reading,
        due_date: body.due_date,
    };

    match state.bill_service.create(input).await {
        Ok(bill) => Ok((StatusCode::CREATED, Json(ApiResponse::success(bill)))),
        Err(e) => {
            let status = match &e {
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ApiResponse::error(e.to_string()))))
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/bills/{id}",
    tag = "Bills",
    params(("id" = String, Path, description = "Bill ID")),
    request_body = UpdateBillRequest,
    responses(
        (status = 200, description = "Bill updated and repriced", body = ApiResponse<Bill>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateBillRequest>,
) -> Result<Json<ApiResponse<Bill>>, (StatusCode, Json<ApiResponse<Bill>>)> {
    let changes = BillChanges {
        customer_id: body.customer_id,
        period: body.period,
        previous_reading: body.previous_reading,
        current_reading: body.current_reading,
        due_date: body.due_date,
        status: body.status,
    };

    match state.bill_service.update(&id, changes).await {
        Ok(bill) => Ok(Json(ApiResponse::success(bill))),
        Err(e) => {
            let status = match &e {
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ApiResponse::error(e.to_string()))))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/bills/{id}",
    tag = "Bills",
    params(("id" = String, Path, description = "Bill ID")),
    responses(
        (status = 200, description = "Bill deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.bill_service.delete(&id).await {
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
    post,
    path = "/api/v1/bills/{id}/toggle-status",
    tag = "Bills",
    params(("id" = String, Path, description = "Bill ID")),
    responses(
        (status = 200, description = "Status flipped", body = ApiResponse<Bill>),
        (status = 404, description = "Not found")
    )
)]
pub async fn toggle_bill_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Bill>>, (StatusCode, Json<ApiResponse<Bill>>)> {
    match state.bill_service.toggle_status(&id).await {
        Ok(bill) => Ok(Json(ApiResponse::success(bill))),
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
    post,
    path = "/api/v1/bills/{id}/pay",
    tag = "Bills",
    params(("id" = String, Path, description = "Bill ID")),
    request_body = PayBillRequest,
    responses(
        (status = 200, description = "Bill settled", body = ApiResponse<Bill>),
        (status = 400, description = "Bill is already paid"),
        (status = 404, description = "Not found")
    )
)]
pub async fn pay_bill(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<PayBillRequest>,
) -> Result<Json<ApiResponse<Bill>>, (StatusCode, Json<ApiResponse<Bill>>)> {
    match state.bill_service.pay(&id, body.payment_method).await {
        Ok(bill) => Ok(Json(ApiResponse::success(bill))),
        Err(e) => {
            let status = match &e {
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ApiResponse::error(e.to_string()))))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/bills/{id}/receipt",
    tag = "Bills",
    params(("id" = String, Path, description = "Bill ID")),
    responses(
        (status = 200, description = "Proof of payment", body = ApiResponse<PaymentReceipt>),
        (status = 400, description = "Bill is not paid"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_bill_receipt(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<PaymentReceipt>>, (StatusCode, Json<ApiResponse<PaymentReceipt>>)> {
    match state.report_service.receipt(&id).await {
        Ok(receipt) => Ok(Json(ApiResponse::success(receipt))),
        Err(e) => {
            let status = match &e {
                DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ApiResponse::error(e.to_string()))))
        }
    }
}
