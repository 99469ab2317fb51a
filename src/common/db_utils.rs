use crate::common::error::AppError;

/// Converte violações de unicidade do Postgres em `AppError::Conflict`.
/// Qualquer outro erro segue como `DatabaseError`.
pub(crate) fn map_unique_violation(e: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflict(message());
        }
    }
    e.into()
}

/// Mesma ideia para violações de chave estrangeira (registro referenciado não existe).
pub(crate) fn map_foreign_key_violation(e: sqlx::Error, what: impl FnOnce() -> String) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() {
            return AppError::NotFound(what());
        }
    }
    e.into()
}

/// Normaliza textos opcionais: aplica trim e descarta strings vazias.
pub(crate) fn clean_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Exige um texto não vazio após o trim.
pub(crate) fn required_text(value: &str, field: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::bad_request(format!("O campo {} é obrigatório", field)));
    }
    Ok(trimmed.to_string())
}
