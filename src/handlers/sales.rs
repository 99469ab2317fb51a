// src/handlers/sales.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::IncludeQuery,
    middleware::auth::AuthenticatedEmployee,
    models::sales::{NewSale, SalePatch, SaleRelation},
};

// Sem `employeeId` no corpo, a venda fica com quem está autenticado.
pub async fn create_sale(
    State(app_state): State<AppState>,
    AuthenticatedEmployee(employee): AuthenticatedEmployee,
    Json(mut payload): Json<NewSale>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.employee_id.get_or_insert(employee.id);

    let sale = app_state.sale_service.create_sale(payload).await?;
    Ok((StatusCode::CREATED, Json(sale)))
}

pub async fn list_sales(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.sale_service.list_sales().await?))
}

pub async fn get_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<IncludeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let relations = query.relations(&SaleRelation::ALL)?;
    Ok(Json(app_state.sale_service.get_sale(id, &relations).await?))
}

pub async fn update_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SalePatch>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    Ok(Json(app_state.sale_service.update_sale(id, payload).await?))
}

pub async fn delete_sale(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.sale_service.delete_sale(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
