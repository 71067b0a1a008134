//! Tariff API handlers
//!
//! Admin CRUD for the rate plan catalog. Delegates to `TariffService`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CreateTariffRequest, ListTariffsParams, UpdateTariffRequest};
use crate::domain::{DomainError, Tariff};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/tariffs",
    tag = "Tariffs",
    params(ListTariffsParams),
    responses(
        (status = 200, description = "Tariff list", body = ApiResponse<Vec<Tariff>>)
    )
)]
pub async fn list_tariffs(
    State(state): State<AppState>,
    Query(params): Query<ListTariffsParams>,
) -> Result<Json<ApiResponse<Vec<Tariff>>>, (StatusCode, Json<ApiResponse<Vec<Tariff>>>)> {
    match state.tariff_service.list(params.search.as_deref()).await {
        Ok(tariffs) => Ok(Json(ApiResponse::success(tariffs))),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/tariffs/{id}",
    tag = "Tariffs",
    params(("id" = String, Path, description = "Tariff ID")),
    responses(
        (status = 200, description = "Tariff details", body = ApiResponse<Tariff>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_tariff(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Tariff>>, (StatusCode, Json<ApiResponse<Tariff>>)> {
    match state.tariff_service.get(&id).await {
        Ok(Some(tariff)) => Ok(Json(ApiResponse::success(tariff))),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Tariff '{}' not found", id))),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        )),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/tariffs",
    tag = "Tariffs",
    request_body = CreateTariffRequest,
    responses(
        (status = 201, description = "Tariff created", body = ApiResponse<Tariff>),
        (status = 400, description = "Validation error"),
        (status = 422, description = "Malformed body")
    )
)]
pub async fn create_tariff(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<CreateTariffRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Tariff>>), (StatusCode, Json<ApiResponse<Tariff>>)> {
    match state
        .tariff_service
        .create(&body.name, body.price_per_kwh, body.basic_fee, &body.description)
        .await
    {
        Ok(tariff) => Ok((StatusCode::CREATED, Json(ApiResponse::success(tariff)))),
        Err(e) => {
            let status = match &e {
                DomainError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            Err((status, Json(ApiResponse::error(e.to_string()))))
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/tariffs/{id}",
    tag = "Tariffs",
    params(("id" = String, Path, description = "Tariff ID")),
    request_body = UpdateTariffRequest,
    responses(
        (status = 200, description = "Tariff updated", body = ApiResponse<Tariff>),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_tariff(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(body): ValidatedJson<UpdateTariffRequest>,
) -> Result<Json<ApiResponse<Tariff>>, (StatusCode, Json<ApiResponse<Tariff>>)> {
    match state
        .tariff_service
        .update(&id, &body.name, body.price_per_kwh, body.basic_fee, &body.description)
        .await
    {
        Ok(tariff) => Ok(Json(ApiResponse::success(tariff))),
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
    path = "/api/v1/tariffs/{id}",
    tag = "Tariffs",
    params(("id" = String, Path, description = "Tariff ID")),
    responses(
        (status = 200, description = "Tariff deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_tariff(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    match state.tariff_service.delete(&id).await {
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
