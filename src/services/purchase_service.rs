// src/services/purchase_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{db_utils::clean_optional, error::AppError},
    db::{finish, SoftDeletable, Store, UnitOfWork},
    models::purchasing::{
        purchase_number, NewPurchase, Purchase, PurchaseDetail, PurchasePatch, PurchaseRelation,
        PurchaseStatus,
    },
    services::soft_delete_in,
};

#[derive(Clone)]
pub struct PurchaseService {
    store: Arc<dyn Store>,
}

impl PurchaseService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Registra a compra e dá entrada no estoque de cada ingrediente, tudo ou nada.
    pub async fn create_purchase(&self, payload: NewPurchase) -> Result<PurchaseDetail, AppError> {
        let mut uow = self.store.begin().await?;
        let result = create_purchase_in(&mut *uow, payload).await;
        finish(uow, result).await
    }

    pub async fn list_purchases(&self) -> Result<Vec<Purchase>, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow.list_purchases().await;
        finish(uow, result).await
    }

    pub async fn get_purchase(&self, id: Uuid, relations: &[PurchaseRelation]) -> Result<PurchaseDetail, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<PurchaseDetail, AppError> = async {
            let purchase = require_purchase(&mut *uow, id).await?;
            hydrate(&mut *uow, purchase, relations).await
        }
        .await;
        finish(uow, result).await
    }

    /// Só status e observações mudam; o estoque não é mexido aqui.
    pub async fn update_purchase(&self, id: Uuid, patch: PurchasePatch) -> Result<Purchase, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<Purchase, AppError> = async {
            let current = require_purchase(&mut *uow, id).await?;
            let merged = current.apply(patch, Utc::now())?;
            uow.update_purchase(&merged).await
        }
        .await;
        finish(uow, result).await
    }

    pub async fn delete_purchase(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let result = soft_delete_in(&mut *uow, SoftDeletable::Purchase, id).await;
        finish(uow, result).await
    }
}

async fn create_purchase_in(uow: &mut dyn UnitOfWork, payload: NewPurchase) -> Result<PurchaseDetail, AppError> {
    let supplier = uow
        .find_supplier(payload.supplier_id)
        .await?
        .ok_or_else(|| AppError::not_found("Fornecedor"))?;

    let now = Utc::now();
    let existing = uow.count_purchases().await?;
    let header = Purchase {
        id: Uuid::new_v4(),
        purchase_number: purchase_number(existing),
        supplier_id: supplier.id,
        status: payload.status.unwrap_or(PurchaseStatus::Received),
        total: payload.total,
        notes: clean_optional(payload.notes),
        purchased_at: payload.purchased_at.unwrap_or(now),
        updated_at: now,
        deleted_at: None,
    };
    let purchase = uow.insert_purchase(&header).await?;

    let mut lines = Vec::with_capacity(payload.lines.len());
    for new_line in payload.lines {
        let ingredient = uow
            .find_ingredient(new_line.ingredient_id)
            .await?
            .ok_or_else(|| AppError::not_found("Ingrediente"))?;
        let line = uow.insert_purchase_line(&new_line.into_record(purchase.id, now)).await?;
        let updated = uow.increment_stock(ingredient.id, line.quantity).await?;
        tracing::debug!(
            "Entrada de estoque: '{}' {} -> {}",
            updated.name,
            ingredient.stock,
            updated.stock
        );
        lines.push(line);
    }

    tracing::info!(
        "Compra {} registrada com {} item(ns)",
        purchase.purchase_number,
        lines.len()
    );

    Ok(PurchaseDetail {
        purchase,
        supplier: Some(supplier),
        lines: Some(lines),
    })
}

async fn require_purchase(uow: &mut dyn UnitOfWork, id: Uuid) -> Result<Purchase, AppError> {
    uow.find_purchase(id)
        .await?
        .ok_or_else(|| AppError::not_found("Compra"))
}

/// Carrega só as relações pedidas.
async fn hydrate(
    uow: &mut dyn UnitOfWork,
    purchase: Purchase,
    relations: &[PurchaseRelation],
) -> Result<PurchaseDetail, AppError> {
    let supplier = if relations.contains(&PurchaseRelation::Supplier) {
        uow.find_supplier(purchase.supplier_id).await?
    } else {
        None
    };
    let lines = if relations.contains(&PurchaseRelation::Lines) {
        Some(uow.purchase_lines(purchase.id).await?)
    } else {
        None
    };
    Ok(PurchaseDetail {
        purchase,
        supplier,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::purchasing::NewPurchaseLine;
    use crate::services::test_support::Fixture;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn line(ingredient_id: Uuid, quantity: Decimal) -> NewPurchaseLine {
        NewPurchaseLine {
            ingredient_id,
            ingredient_name: "Queijo".into(),
            unit_price: dec!(45),
            quantity,
            unit_of_measure: Some("kg".into()),
            subtotal: dec!(45) * quantity,
            notes: None,
        }
    }

    fn purchase(supplier_id: Uuid, lines: Vec<NewPurchaseLine>) -> NewPurchase {
        NewPurchase {
            supplier_id,
            purchased_at: None,
            status: None,
            total: dec!(450),
            notes: Some("  entrega semanal ".into()),
            lines,
        }
    }

    #[tokio::test]
    async fn purchase_increments_stock_and_numbers_sequentially() {
        let fx = Fixture::new().await;
        let service = PurchaseService::new(fx.shared());
        let supplier = fx.supplier().await;
        let cheese = fx.ingredient("Queijo", Some(dec!(50)), dec!(5)).await;
        let flour = fx.ingredient("Farinha", Some(dec!(8)), dec!(0)).await;

        let first = service
            .create_purchase(purchase(supplier, vec![line(cheese, dec!(10)), line(flour, dec!(2.5))]))
            .await
            .unwrap();
        assert_eq!(first.purchase.purchase_number, "PUR-000001");
        assert_eq!(first.purchase.status, PurchaseStatus::Received);
        assert_eq!(first.purchase.notes.as_deref(), Some("entrega semanal"));
        assert_eq!(first.lines.as_ref().map(Vec::len), Some(2));
        assert_eq!(fx.store.ingredient_stock(cheese), dec!(15));
        assert_eq!(fx.store.ingredient_stock(flour), dec!(2.5));

        let second = service
            .create_purchase(purchase(supplier, vec![line(cheese, dec!(1))]))
            .await
            .unwrap();
        assert_eq!(second.purchase.purchase_number, "PUR-000002");
        assert_eq!(fx.store.ingredient_stock(cheese), dec!(16));
    }

    #[tokio::test]
    async fn failing_line_rolls_back_everything() {
        let fx = Fixture::new().await;
        let service = PurchaseService::new(fx.shared());
        let supplier = fx.supplier().await;
        let cheese = fx.ingredient("Queijo", Some(dec!(50)), dec!(5)).await;

        let result = service
            .create_purchase(purchase(supplier, vec![line(cheese, dec!(10)), line(Uuid::new_v4(), dec!(1))]))
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(fx.store.ingredient_stock(cheese), dec!(5));
        let tables = fx.store.snapshot();
        assert!(tables.purchases.is_empty());
        assert!(tables.purchase_lines.is_empty());
    }

    #[tokio::test]
    async fn unknown_supplier_is_not_found() {
        let fx = Fixture::new().await;
        let service = PurchaseService::new(fx.shared());
        let cheese = fx.ingredient("Queijo", Some(dec!(50)), dec!(5)).await;

        let result = service
            .create_purchase(purchase(Uuid::new_v4(), vec![line(cheese, dec!(1))]))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(fx.store.ingredient_stock(cheese), dec!(5));
    }

    #[tokio::test]
    async fn include_controls_hydrated_relations() {
        let fx = Fixture::new().await;
        let service = PurchaseService::new(fx.shared());
        let supplier = fx.supplier().await;
        let cheese = fx.ingredient("Queijo", Some(dec!(50)), dec!(5)).await;
        let created = service
            .create_purchase(purchase(supplier, vec![line(cheese, dec!(1))]))
            .await
            .unwrap();

        let bare = service.get_purchase(created.purchase.id, &[]).await.unwrap();
        assert!(bare.supplier.is_none() && bare.lines.is_none());

        let full = service
            .get_purchase(created.purchase.id, &PurchaseRelation::ALL)
            .await
            .unwrap();
        assert_eq!(full.supplier.map(|s| s.id), Some(supplier));
        assert_eq!(full.lines.map(|l| l.len()), Some(1));
    }

    #[tokio::test]
    async fn status_changes_follow_transition_table() {
        let fx = Fixture::new().await;
        let service = PurchaseService::new(fx.shared());
        let supplier = fx.supplier().await;
        let cheese = fx.ingredient("Queijo", Some(dec!(50)), dec!(5)).await;
        let created = service
            .create_purchase(purchase(supplier, vec![line(cheese, dec!(1))]))
            .await
            .unwrap();
        let id = created.purchase.id;

        let cancelled = service
            .update_purchase(
                id,
                PurchasePatch {
                    status: Some(PurchaseStatus::Cancelled),
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(cancelled.status, PurchaseStatus::Cancelled);

        let result = service
            .update_purchase(
                id,
                PurchasePatch {
                    status: Some(PurchaseStatus::Received),
                    notes: None,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::InvalidStatusTransition { .. })));
    }

    #[tokio::test]
    async fn deleted_purchase_still_counts_for_numbering() {
        let fx = Fixture::new().await;
        let service = PurchaseService::new(fx.shared());
        let supplier = fx.supplier().await;
        let cheese = fx.ingredient("Queijo", Some(dec!(50)), dec!(5)).await;
        let first = service
            .create_purchase(purchase(supplier, vec![line(cheese, dec!(1))]))
            .await
            .unwrap();
        service.delete_purchase(first.purchase.id).await.unwrap();

        assert!(service.list_purchases().await.unwrap().is_empty());
        let second = service
            .create_purchase(purchase(supplier, vec![line(cheese, dec!(1))]))
            .await
            .unwrap();
        assert_eq!(second.purchase.purchase_number, "PUR-000002");
    }
}
