// src/db/sale_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_foreign_key_violation, map_unique_violation},
        error::AppError,
    },
    models::sales::{Sale, SaleLine},
};

#[derive(Clone, Copy, Default)]
pub struct SaleRepository;

impl SaleRepository {
    pub async fn count_all<'e, E>(&self, executor: E) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    /// Procura pelo número entre todas as vendas (o índice único não ignora as removidas).
    pub async fn number_exists<'e, E>(&self, executor: E, sale_number: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM sales WHERE sale_number = $1)")
            .bind(sale_number)
            .fetch_one(executor)
            .await?;
        Ok(exists)
    }

    pub async fn insert_sale<'e, E>(&self, executor: E, s: &Sale) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales
                (id, sale_number, employee_id, sale_type, payment_method, customer_name,
                 customer_phone, customer_email, customer_notes, subtotal, discount, total,
                 status, internal_notes, sold_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(s.id)
        .bind(&s.sale_number)
        .bind(s.employee_id)
        .bind(s.sale_type)
        .bind(s.payment_method)
        .bind(&s.customer_name)
        .bind(&s.customer_phone)
        .bind(&s.customer_email)
        .bind(&s.customer_notes)
        .bind(s.subtotal)
        .bind(s.discount)
        .bind(s.total)
        .bind(s.status)
        .bind(&s.internal_notes)
        .bind(s.sold_at)
        .bind(s.updated_at)
        .fetch_one(executor)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::not_found("Funcionário"),
            e => map_unique_violation(e, || format!("O número de venda '{}' já existe", s.sale_number)),
        })
    }

    pub async fn insert_line<'e, E>(&self, executor: E, l: &SaleLine) -> Result<SaleLine, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, SaleLine>(
            r#"
            INSERT INTO sale_lines
                (id, sale_id, product_id, product_name, size, unit_price, quantity,
                 subtotal, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(l.id)
        .bind(l.sale_id)
        .bind(l.product_id)
        .bind(&l.product_name)
        .bind(&l.size)
        .bind(l.unit_price)
        .bind(l.quantity)
        .bind(l.subtotal)
        .bind(&l.notes)
        .bind(l.created_at)
        .fetch_one(executor)
        .await
        .map_err(|e| map_foreign_key_violation(e, || "Produto".into()))
    }

    pub async fn list_sales<'e, E>(&self, executor: E) -> Result<Vec<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE deleted_at IS NULL ORDER BY sold_at DESC",
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn find_sale<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn update_sale<'e, E>(&self, executor: E, s: &Sale) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales SET status = $2, internal_notes = $3, updated_at = $4
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(s.id)
        .bind(s.status)
        .bind(&s.internal_notes)
        .bind(s.updated_at)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found("Venda"))
    }

    pub async fn lines_for<'e, E>(&self, executor: E, sale_id: Uuid) -> Result<Vec<SaleLine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, SaleLine>(
            "SELECT * FROM sale_lines WHERE sale_id = $1 ORDER BY created_at, id",
        )
        .bind(sale_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
