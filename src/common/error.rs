use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

// Erros do domínio. O `IntoResponse` abaixo traduz cada variante em um status HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regra de negócio violada (campo vazio após trim, status inválido, etc.)
    #[error("{0}")]
    BadRequest(String),

    #[error("{0} não encontrado(a)")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error(
        "Estoque insuficiente para o ingrediente \"{ingredient}\". Necessário: {required}, Disponível: {available}"
    )]
    InsufficientStock {
        ingredient: String,
        required: Decimal,
        available: Decimal,
    },

    #[error("O ingrediente \"{0}\" não possui preço por unidade definido")]
    MissingUnitPrice(String),

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn not_found(what: impl Into<String>) -> Self {
        AppError::NotFound(what.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into())
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::InsufficientStock { .. }
            | AppError::MissingUnitPrice(_)
            | AppError::InvalidStatusTransition { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                })
            }
            AppError::InvalidCredentials => json!({ "error": "Usuário ou senha inválidos." }),
            AppError::InvalidToken => {
                json!({ "error": "Token de autenticação inválido ou ausente." })
            }
            // Erros internos: loga o detalhe e devolve uma mensagem genérica.
            ref e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                json!({ "error": "Ocorreu um erro inesperado." })
            }
            e => json!({ "error": e.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use rust_decimal_macros::dec;

    #[test]
    fn status_code_mapping() {
        assert_eq!(AppError::not_found("Produto").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::bad_request("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::MissingUnitPrice("Queijo".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn insufficient_stock_body_names_the_ingredient() {
        let response = AppError::InsufficientStock {
            ingredient: "Queijo".into(),
            required: dec!(120),
            available: dec!(100),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
        let message = payload["error"].as_str().unwrap();
        assert!(message.contains("\"Queijo\""));
        assert!(message.contains("120"));
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = AppError::InternalServerError(anyhow::anyhow!("pool exhausted")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["error"], "Ocorreu um erro inesperado.");
    }
}
