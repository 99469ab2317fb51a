// src/db/product_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::map_unique_violation,
        error::AppError,
    },
    models::product::{Product, RecipeCost, RecipeLink, RecipeRequirement},
};

#[derive(Clone, Copy, Default)]
pub struct ProductRepository;

impl ProductRepository {
    pub async fn insert_product<'e, E>(&self, executor: E, p: &Product) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products
                (id, category_id, name, description, base_price, price, available_sizes,
                 image_url, available, featured, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(p.id)
        .bind(p.category_id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.base_price)
        .bind(p.price)
        .bind(&p.available_sizes)
        .bind(&p.image_url)
        .bind(p.available)
        .bind(p.featured)
        .bind(p.created_at)
        .fetch_one(executor)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => AppError::not_found("Categoria"),
            e => map_unique_violation(e, || {
                format!("Já existe um produto chamado '{}' nesta categoria", p.name)
            }),
        })
    }

    pub async fn list_products<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE deleted_at IS NULL ORDER BY name",
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn find_product<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// Atualiza os campos editáveis; `price` fica a cargo de `set_price`.
    pub async fn update_product<'e, E>(&self, executor: E, p: &Product) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET category_id = $2, name = $3, description = $4, base_price = $5,
                available_sizes = $6, image_url = $7, available = $8, featured = $9,
                updated_at = $10
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(p.id)
        .bind(p.category_id)
        .bind(&p.name)
        .bind(&p.description)
        .bind(p.base_price)
        .bind(&p.available_sizes)
        .bind(&p.image_url)
        .bind(p.available)
        .bind(p.featured)
        .bind(p.updated_at)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                format!("Já existe um produto chamado '{}' nesta categoria", p.name)
            })
        })?
        .ok_or_else(|| AppError::not_found("Produto"))
    }

    pub async fn set_price<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        price: Decimal,
        now: DateTime<Utc>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET price = $2, updated_at = $3
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(price)
        .bind(now)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found("Produto"))
    }

    // ---
    // Receitas
    // ---

    pub async fn insert_link<'e, E>(&self, executor: E, l: &RecipeLink) -> Result<RecipeLink, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, RecipeLink>(
            r#"
            INSERT INTO recipe_links (id, product_id, ingredient_id, quantity, notes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(l.id)
        .bind(l.product_id)
        .bind(l.ingredient_id)
        .bind(l.quantity)
        .bind(&l.notes)
        .bind(l.created_at)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, || "O ingrediente já faz parte da receita deste produto".into()))
    }

    pub async fn list_links<'e, E>(&self, executor: E) -> Result<Vec<RecipeLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, RecipeLink>("SELECT * FROM recipe_links ORDER BY created_at")
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn find_link<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<RecipeLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, RecipeLink>("SELECT * FROM recipe_links WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn update_link<'e, E>(&self, executor: E, l: &RecipeLink) -> Result<RecipeLink, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, RecipeLink>(
            r#"
            UPDATE recipe_links
            SET product_id = $2, ingredient_id = $3, quantity = $4, notes = $5, updated_at = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(l.id)
        .bind(l.product_id)
        .bind(l.ingredient_id)
        .bind(l.quantity)
        .bind(&l.notes)
        .bind(l.updated_at)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, || "O ingrediente já faz parte da receita deste produto".into()))?
        .ok_or_else(|| AppError::not_found("Vínculo de receita"))
    }

    pub async fn delete_link<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<RecipeLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, RecipeLink>("DELETE FROM recipe_links WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn delete_link_pair<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        ingredient_id: Uuid,
    ) -> Result<Option<RecipeLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, RecipeLink>(
            "DELETE FROM recipe_links WHERE product_id = $1 AND ingredient_id = $2 RETURNING *",
        )
        .bind(product_id)
        .bind(ingredient_id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn delete_links_for_product<'e, E>(&self, executor: E, product_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM recipe_links WHERE product_id = $1")
            .bind(product_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn links_for_product<'e, E>(&self, executor: E, product_id: Uuid) -> Result<Vec<RecipeLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, RecipeLink>(
            "SELECT * FROM recipe_links WHERE product_id = $1 ORDER BY created_at",
        )
        .bind(product_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn links_for_ingredient<'e, E>(
        &self,
        executor: E,
        ingredient_id: Uuid,
    ) -> Result<Vec<RecipeLink>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, RecipeLink>(
            "SELECT * FROM recipe_links WHERE ingredient_id = $1 ORDER BY created_at",
        )
        .bind(ingredient_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Vínculos do produto já com nome e preço unitário do ingrediente.
    pub async fn recipe_costs<'e, E>(&self, executor: E, product_id: Uuid) -> Result<Vec<RecipeCost>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, RecipeCost>(
            r#"
            SELECT rl.ingredient_id, i.name AS ingredient_name, i.unit_price, rl.quantity
            FROM recipe_links rl
            JOIN ingredients i ON i.id = rl.ingredient_id
            WHERE rl.product_id = $1
            ORDER BY i.name
            "#,
        )
        .bind(product_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn recipe_requirements<'e, E>(
        &self,
        executor: E,
        product_ids: &[Uuid],
    ) -> Result<Vec<RecipeRequirement>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, RecipeRequirement>(
            "SELECT product_id, ingredient_id, quantity FROM recipe_links WHERE product_id = ANY($1)",
        )
        .bind(product_ids)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
