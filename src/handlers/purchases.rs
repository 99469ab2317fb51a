// src/handlers/purchases.rs

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
    models::purchasing::{NewPurchase, PurchasePatch, PurchaseRelation},
};

pub async fn create_purchase(
    State(app_state): State<AppState>,
    Json(payload): Json<NewPurchase>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let purchase = app_state.purchase_service.create_purchase(payload).await?;
    Ok((StatusCode::CREATED, Json(purchase)))
}

pub async fn list_purchases(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.purchase_service.list_purchases().await?))
}

pub async fn get_purchase(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<IncludeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let relations = query.relations(&PurchaseRelation::ALL)?;
    Ok(Json(app_state.purchase_service.get_purchase(id, &relations).await?))
}

pub async fn update_purchase(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PurchasePatch>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    Ok(Json(app_state.purchase_service.update_purchase(id, payload).await?))
}

pub async fn delete_purchase(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.purchase_service.delete_purchase(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
