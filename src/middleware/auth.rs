// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{common::error::AppError, config::AppState, models::auth::Employee};

// O middleware em si: valida o Bearer token e guarda o funcionário na requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    let employee = app_state.auth_service.validate_token(bearer.token()).await?;

    // Insere o funcionário nos "extensions" da requisição
    request.extensions_mut().insert(employee);
    Ok(next.run(request).await)
}

// Extrator para obter o funcionário autenticado diretamente nos handlers
pub struct AuthenticatedEmployee(pub Employee);

impl<S> FromRequestParts<S> for AuthenticatedEmployee
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Employee>()
            .cloned()
            .map(AuthenticatedEmployee)
            .ok_or(AppError::InvalidToken)
    }
}
