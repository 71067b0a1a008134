//! Report API handlers
//!
//! Dashboard aggregates, per-tariff revenue and the printable report
//! documents. Delegates to `ReportService`.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use super::dto::ReportDocumentParams;
use crate::application::services::{
    DashboardSummary, ReportDocument, ReportFilter, ReportKind, TariffRevenue,
};
use crate::domain::BillStatus;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    tag = "Reports",
    responses(
        (status = 200, description = "Dashboard summary", body = ApiResponse<DashboardSummary>)
    )
)]
pub async fn dashboard_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardSummary>>, (StatusCode, Json<ApiResponse<DashboardSummary>>)>
{
    match state.report_service.dashboard_summary().await {
        Ok(summary) => Ok(Json(ApiResponse::success(summary))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/revenue-by-tariff",
    tag = "Reports",
    responses(
        (status = 200, description = "Collected revenue grouped by tariff", body = ApiResponse<Vec<TariffRevenue>>)
    )
)]
pub async fn revenue_by_tariff(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TariffRevenue>>>, (StatusCode, Json<ApiResponse<Vec<TariffRevenue>>>)>
{
    match state.report_service.revenue_by_tariff().await {
        Ok(rows) => Ok(Json(ApiResponse::success(rows))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/reports/document",
    tag = "Reports",
    params(ReportDocumentParams),
    responses(
        (status = 200, description = "Printable report document", body = ApiResponse<ReportDocument>),
        (status = 400, description = "Unknown report kind or status filter")
    )
)]
pub async fn report_document(
    State(state): State<AppState>,
    Query(params): Query<ReportDocumentParams>,
) -> Result<Json<ApiResponse<ReportDocument>>, (StatusCode, Json<ApiResponse<ReportDocument>>)> {
    let kind = match ReportKind::parse(&params.kind) {
        Ok(kind) => kind,
        Err(e) => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(e.to_string())),
            ));
        }
    };

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

    let filter = ReportFilter {
        start_date: params.start_date,
        end_date: params.end_date,
        status,
    };

    match state.report_service.document(kind, filter).await {
        Ok(document) => Ok(Json(ApiResponse::success(document))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )),
    }
}
