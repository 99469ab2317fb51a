pub mod auth;
pub mod catalog;
pub mod product;
pub mod purchasing;
pub mod sales;

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::common::error::AppError;

// ---
// Validações customizadas usadas pelos payloads (validator)
// ---

pub(crate) fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("exclusive_min".into(), &0.0);
        err.message = Some("O valor deve ser positivo.".into());
        return Err(err);
    }
    Ok(())
}

// Mesmas regras para campos opcionais, aplicadas no merge dos registros.
pub(crate) fn ensure_not_negative(value: Option<Decimal>, field: &str) -> Result<(), AppError> {
    match value {
        Some(v) if v < Decimal::ZERO => Err(AppError::bad_request(format!(
            "O campo {} não pode ser negativo",
            field
        ))),
        _ => Ok(()),
    }
}

pub(crate) fn ensure_positive(value: Option<Decimal>, field: &str) -> Result<(), AppError> {
    match value {
        Some(v) if v <= Decimal::ZERO => Err(AppError::bad_request(format!(
            "O campo {} deve ser positivo",
            field
        ))),
        _ => Ok(()),
    }
}
