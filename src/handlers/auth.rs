use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedEmployee,
    models::auth::{AuthResponse, Employee, LoginPayload, RegisterPayload},
};

// Handler de registro
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let response = app_state.auth_service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

// Handler de login
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let response = app_state.auth_service.login(payload).await?;
    Ok(Json(response))
}

// Handler da rota protegida /me
pub async fn get_me(AuthenticatedEmployee(employee): AuthenticatedEmployee) -> Json<Employee> {
    Json(employee)
}
