// src/handlers/employees.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{EmployeePatch, NewEmployeePayload},
};

pub async fn create_employee(
    State(app_state): State<AppState>,
    Json(payload): Json<NewEmployeePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let employee = app_state.auth_service.create_employee(payload).await?;
    tracing::info!("Funcionário '{}' cadastrado", employee.username);
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn list_employees(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let employees = app_state.auth_service.list_employees().await?;
    Ok(Json(employees))
}

pub async fn get_employee(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let employee = app_state.auth_service.get_employee(id).await?;
    Ok(Json(employee))
}

pub async fn update_employee(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmployeePatch>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let employee = app_state.auth_service.update_employee(id, payload).await?;
    Ok(Json(employee))
}

pub async fn delete_employee(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.auth_service.delete_employee(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
