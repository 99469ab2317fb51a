// src/db/purchase_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_foreign_key_violation, map_unique_violation},
        error::AppError,
    },
    models::purchasing::{Purchase, PurchaseLine},
};

#[derive(Clone, Copy, Default)]
pub struct PurchaseRepository;

impl PurchaseRepository {
    /// Conta todas as compras, inclusive as removidas, para gerar o próximo número.
    pub async fn count_all<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    pub async fn insert_purchase<'e, E>(&self, executor: E, p: &Purchase) -> Result<Purchase, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Purchase>(
            r#"
            INSERT INTO purchases (id, purchase_number, supplier_id, status, total, notes, purchased_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(p.id)
        .bind(&p.purchase_number)
        .bind(p.supplier_id)
        .bind(p.status)
        .bind(p.total)
        .bind(&p.notes)
        .bind(p.purchased_at)
        .bind(p.updated_at)
        .fetch_one(executor)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::not_found("Fornecedor"),
            e => map_unique_violation(e, || {
                format!("O número de compra '{}' já existe", p.purchase_number)
            }),
        })
    }

    pub async fn insert_line<'e, E>(&self, executor: E, l: &PurchaseLine) -> Result<PurchaseLine, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PurchaseLine>(
            r#"
            INSERT INTO purchase_lines
                (id, purchase_id, ingredient_id, ingredient_name, unit_price, quantity,
                 unit_of_measure, subtotal, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(l.id)
        .bind(l.purchase_id)
        .bind(l.ingredient_id)
        .bind(&l.ingredient_name)
        .bind(l.unit_price)
        .bind(l.quantity)
        .bind(&l.unit_of_measure)
        .bind(l.subtotal)
        .bind(&l.notes)
        .bind(l.created_at)
        .fetch_one(executor)
        .await
        .map_err(|e| map_foreign_key_violation(e, || "Ingrediente".into()))
    }

    pub async fn list_purchases<'e, E>(&self, executor: E) -> Result<Vec<Purchase>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Purchase>(
            "SELECT * FROM purchases WHERE deleted_at IS NULL ORDER BY purchased_at DESC",
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn find_purchase<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Purchase>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Purchase>(
            "SELECT * FROM purchases WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn update_purchase<'e, E>(&self, executor: E, p: &Purchase) -> Result<Purchase, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Purchase>(
            r#"
            UPDATE purchases SET status = $2, notes = $3, updated_at = $4
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(p.id)
        .bind(p.status)
        .bind(&p.notes)
        .bind(p.updated_at)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found("Compra"))
    }

    pub async fn lines_for<'e, E>(&self, executor: E, purchase_id: Uuid) -> Result<Vec<PurchaseLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, PurchaseLine>(
            "SELECT * FROM purchase_lines WHERE purchase_id = $1 ORDER BY created_at, id",
        )
        .bind(purchase_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
