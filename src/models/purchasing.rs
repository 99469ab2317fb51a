// src/models/purchasing.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::db_utils::clean_optional;
use crate::common::error::AppError;
use crate::models::catalog::Supplier;
use crate::models::validate_positive;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "purchase_status", rename_all = "lowercase")] // Banco
#[serde(rename_all = "lowercase")] // JSON
pub enum PurchaseStatus {
    Pending,
    Received,
    Cancelled,
}

impl PurchaseStatus {
    /// pending -> received | cancelled; received -> cancelled; cancelled é terminal.
    pub fn can_transition_to(self, next: PurchaseStatus) -> bool {
        use PurchaseStatus::*;
        matches!(
            (self, next),
            (Pending, Received) | (Pending, Cancelled) | (Received, Cancelled)
        ) || self == next
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PurchaseStatus::Pending => "pending",
            PurchaseStatus::Received => "received",
            PurchaseStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: Uuid,
    pub purchase_number: String,
    pub supplier_id: Uuid,
    pub status: PurchaseStatus,
    pub total: Decimal,
    pub notes: Option<String>,
    pub purchased_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLine {
    pub id: Uuid,
    pub purchase_id: Uuid,
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub unit_price: Decimal,
    pub quantity: Decimal,
    pub unit_of_measure: Option<String>,
    pub subtotal: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchaseLine {
    pub ingredient_id: Uuid,
    #[validate(length(min = 1, max = 100, message = "O nome do ingrediente é obrigatório (máx. 100)."))]
    pub ingredient_name: String,
    #[validate(custom(function = "validate_positive"))]
    pub unit_price: Decimal,
    #[validate(custom(function = "validate_positive"))]
    pub quantity: Decimal,
    #[validate(length(max = 50))]
    pub unit_of_measure: Option<String>,
    #[validate(custom(function = "validate_positive"))]
    pub subtotal: Decimal,
    pub notes: Option<String>,
}

impl NewPurchaseLine {
    pub fn into_record(self, purchase_id: Uuid, now: DateTime<Utc>) -> PurchaseLine {
        PurchaseLine {
            id: Uuid::new_v4(),
            purchase_id,
            ingredient_id: self.ingredient_id,
            ingredient_name: self.ingredient_name.trim().to_string(),
            unit_price: self.unit_price,
            quantity: self.quantity,
            unit_of_measure: clean_optional(self.unit_of_measure),
            subtotal: self.subtotal,
            notes: clean_optional(self.notes),
            created_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchase {
    pub supplier_id: Uuid,
    pub purchased_at: Option<DateTime<Utc>>,
    pub status: Option<PurchaseStatus>,
    #[validate(custom(function = "validate_positive"))]
    pub total: Decimal,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "A compra deve ter ao menos um item."), nested)]
    pub lines: Vec<NewPurchaseLine>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePatch {
    pub status: Option<PurchaseStatus>,
    pub notes: Option<String>,
}

impl Purchase {
    /// Só status e notas podem mudar depois de criada; os itens são imutáveis.
    pub fn apply(self, patch: PurchasePatch, now: DateTime<Utc>) -> Result<Purchase, AppError> {
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
        Ok(Purchase {
            status,
            notes: patch.notes.map_or(self.notes, |n| clean_optional(Some(n))),
            updated_at: now,
            ..self
        })
    }
}

/// Relações que podem ser carregadas junto com a compra.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseRelation {
    Supplier,
    Lines,
}

impl PurchaseRelation {
    pub const ALL: [PurchaseRelation; 2] = [PurchaseRelation::Supplier, PurchaseRelation::Lines];
}

impl FromStr for PurchaseRelation {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "supplier" => Ok(PurchaseRelation::Supplier),
            "lines" => Ok(PurchaseRelation::Lines),
            other => Err(AppError::bad_request(format!("Relação desconhecida: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseDetail {
    #[serde(flatten)]
    pub purchase: Purchase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Supplier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lines: Option<Vec<PurchaseLine>>,
}

/// Número legível da compra: PUR-000042.
pub fn purchase_number(existing_rows: i64) -> String {
    format!("PUR-{:06}", existing_rows + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn purchase_numbers_are_sequential_and_padded() {
        assert_eq!(purchase_number(0), "PUR-000001");
        assert_eq!(purchase_number(41), "PUR-000042");
    }

    #[test]
    fn status_transitions() {
        use PurchaseStatus::*;
        assert!(Pending.can_transition_to(Received));
        assert!(Received.can_transition_to(Cancelled));
        assert!(Received.can_transition_to(Received));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Received.can_transition_to(Pending));
    }

    #[test]
    fn apply_rejects_illegal_transition() {
        let purchase = Purchase {
            id: Uuid::new_v4(),
            purchase_number: purchase_number(0),
            supplier_id: Uuid::new_v4(),
            status: PurchaseStatus::Cancelled,
            total: dec!(10),
            notes: None,
            purchased_at: Utc::now(),
            updated_at: Utc::now(),
            deleted_at: None,
        };
        let result = purchase.apply(
            PurchasePatch {
                status: Some(PurchaseStatus::Received),
                notes: None,
            },
            Utc::now(),
        );
        assert!(matches!(result, Err(AppError::InvalidStatusTransition { .. })));
    }

    #[test]
    fn relations_parse_from_query_values() {
        assert_eq!("lines".parse::<PurchaseRelation>().unwrap(), PurchaseRelation::Lines);
        assert!("detalles".parse::<PurchaseRelation>().is_err());
    }

    #[test]
    fn payload_requires_at_least_one_line() {
        let payload: NewPurchase = serde_json::from_value(serde_json::json!({
            "supplierId": Uuid::new_v4(),
            "total": 150.0,
            "lines": []
        }))
        .unwrap();
        assert!(payload.validate().is_err());
    }
}
