// src/models/sales.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::db_utils::{clean_optional, required_text};
use crate::common::error::AppError;
use crate::models::auth::Employee;
use crate::models::{ensure_not_negative, validate_positive};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sale_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SaleType {
    Online,
    InStore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Qr,
    Debit,
    Cash,
    Card,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sale_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl SaleStatus {
    fn rank(self) -> u8 {
        match self {
            SaleStatus::Pending => 0,
            SaleStatus::Confirmed => 1,
            SaleStatus::Preparing => 2,
            SaleStatus::Ready => 3,
            SaleStatus::Delivered => 4,
            SaleStatus::Cancelled => 5,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, SaleStatus::Delivered | SaleStatus::Cancelled)
    }

    /// O pedido só anda para frente (pode pular etapas) até `delivered`;
    /// qualquer estado não terminal pode ser cancelado.
    pub fn can_transition_to(self, next: SaleStatus) -> bool {
        if self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        next == SaleStatus::Cancelled || next.rank() > self.rank()
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Confirmed => "confirmed",
            SaleStatus::Preparing => "preparing",
            SaleStatus::Ready => "ready",
            SaleStatus::Delivered => "delivered",
            SaleStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub sale_number: String,
    pub employee_id: Option<Uuid>,
    pub sale_type: SaleType,
    pub payment_method: PaymentMethod,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_email: Option<String>,
    pub customer_notes: Option<String>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
    pub status: SaleStatus,
    pub internal_notes: Option<String>,
    pub sold_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub size: Option<String>,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSaleLine {
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 150, message = "O nome do produto é obrigatório (máx. 150)."))]
    pub product_name: String,
    #[validate(length(max = 50))]
    pub size: Option<String>,
    #[validate(custom(function = "validate_positive"))]
    pub unit_price: Decimal,
    #[validate(range(min = 1, message = "A quantidade deve ser positiva."))]
    pub quantity: i32,
    #[validate(custom(function = "validate_positive"))]
    pub subtotal: Decimal,
    pub notes: Option<String>,
}

impl NewSaleLine {
    pub fn into_record(self, sale_id: Uuid, now: DateTime<Utc>) -> SaleLine {
        SaleLine {
            id: Uuid::new_v4(),
            sale_id,
            product_id: self.product_id,
            product_name: self.product_name.trim().to_string(),
            size: clean_optional(self.size),
            unit_price: self.unit_price,
            quantity: self.quantity,
            subtotal: self.subtotal,
            notes: clean_optional(self.notes),
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    #[validate(length(max = 50, message = "O número da venda não deve exceder 50 caracteres."))]
    pub sale_number: Option<String>,
    pub employee_id: Option<Uuid>,
    pub sale_type: SaleType,
    pub payment_method: PaymentMethod,
    #[validate(length(min = 1, max = 100, message = "O nome do cliente é obrigatório (máx. 100)."))]
    pub customer_name: String,
    #[validate(length(min = 1, max = 20, message = "O telefone do cliente é obrigatório (máx. 20)."))]
    pub customer_phone: String,
    #[validate(email(message = "O e-mail fornecido é inválido."), length(max = 100))]
    pub customer_email: Option<String>,
    pub customer_notes: Option<String>,
    #[validate(custom(function = "validate_positive"))]
    pub subtotal: Decimal,
    pub discount: Option<Decimal>,
    #[validate(custom(function = "validate_positive"))]
    pub total: Decimal,
    pub status: Option<SaleStatus>,
    pub internal_notes: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub lines: Vec<NewSaleLine>,
}

impl NewSale {
    /// Monta o cabeçalho da venda (sem os itens) com o número já resolvido.
    pub fn header(&self, sale_number: String, now: DateTime<Utc>) -> Result<Sale, AppError> {
        ensure_not_negative(self.discount, "desconto")?;
        Ok(Sale {
            id: Uuid::new_v4(),
            sale_number,
            employee_id: self.employee_id,
            sale_type: self.sale_type,
            payment_method: self.payment_method,
            customer_name: required_text(&self.customer_name, "nome do cliente")?,
            customer_phone: required_text(&self.customer_phone, "telefone do cliente")?,
            customer_email: clean_optional(self.customer_email.clone()),
            customer_notes: clean_optional(self.customer_notes.clone()),
            subtotal: self.subtotal,
            discount: self.discount.unwrap_or(Decimal::ZERO),
            total: self.total,
            status: self.status.unwrap_or(SaleStatus::Pending),
            internal_notes: clean_optional(self.internal_notes.clone()),
            sold_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Número informado pelo cliente, se houver (vazio conta como ausente).
    pub fn requested_number(&self) -> Option<String> {
        clean_optional(self.sale_number.clone())
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SalePatch {
    pub status: Option<SaleStatus>,
    pub internal_notes: Option<String>,
}

impl Sale {
    pub fn apply(self, patch: SalePatch, now: DateTime<Utc>) -> Result<Sale, AppError> {
        let status = match patch.status {
            Some(next) if !self.status.can_transition_to(next) => {
                return Err(AppError::InvalidStatusTransition {
                    from: self.status.to_string(),
                    to: next.to_string(),
                });
            }
            Some(next) => next,
            None => self.status,
        };
        Ok(Sale {
            status,
            internal_notes: patch
                .internal_notes
                .map_or(self.internal_notes, |n| clean_optional(Some(n))),
            updated_at: now,
            ..self
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleRelation {
    Employee,
    Lines,
}

impl SaleRelation {
    pub const ALL: [SaleRelation; 2] = [SaleRelation::Employee, SaleRelation::Lines];
}

impl FromStr for SaleRelation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "employee" => Ok(SaleRelation::Employee),
            "lines" => Ok(SaleRelation::Lines),
            other => Err(AppError::bad_request(format!("Relação desconhecida: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<SaleLine>>,
}

/// Número legível da venda: SALE-20261019-0007.
pub fn sale_number(day: NaiveDate, existing_rows: i64) -> String {
    format!("SALE-{}-{:04}", day.format("%Y%m%d"), existing_rows + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_number_uses_date_and_running_count() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(sale_number(day, 6), "SALE-20261019-0007");
        assert_eq!(sale_number(day, 0), "SALE-20261019-0001");
    }

    #[test]
    fn status_moves_forward_or_cancels() {
        use SaleStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Delivered));
        assert!(Preparing.can_transition_to(Cancelled));
        assert!(!Ready.can_transition_to(Preparing));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(Delivered.can_transition_to(Delivered));
    }

    #[test]
    fn payload_uses_snake_case_enums_and_defaults() {
        let payload: NewSale = serde_json::from_value(serde_json::json!({
            "saleType": "in_store",
            "paymentMethod": "cash",
            "customerName": "Ana",
            "customerPhone": "77123456",
            "subtotal": 80.0,
            "total": 80.0
        }))
        .unwrap();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.sale_type, SaleType::InStore);
        assert!(payload.lines.is_empty());
        assert_eq!(payload.requested_number(), None);

        let header = payload.header("SALE-20261019-0001".into(), Utc::now()).unwrap();
        assert_eq!(header.status, SaleStatus::Pending);
        assert_eq!(header.discount, Decimal::ZERO);
    }

    #[test]
    fn line_quantity_must_be_positive() {
        let line = NewSaleLine {
            product_id: Uuid::new_v4(),
            product_name: "Pizza".into(),
            size: None,
            unit_price: Decimal::ONE,
            quantity: 0,
            subtotal: Decimal::ONE,
            notes: None,
        };
        assert!(line.validate().is_err());
    }
}
