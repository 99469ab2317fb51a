// src/db/catalog_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::catalog::{Category, Customer, Ingredient, Size, Supplier},
};

/// Tabelas simples do catálogo: categorias, tamanhos, ingredientes, fornecedores e clientes.
#[derive(Clone, Copy, Default)]
pub struct CatalogRepository;

impl CatalogRepository {
    // ---
    // Categorias
    // ---

    pub async fn insert_category<'e, E>(&self, executor: E, c: &Category) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories
                (id, name, description, image_url, active, sort_order,
                 requires_customization, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(c.id)
        .bind(&c.name)
        .bind(&c.description)
        .bind(&c.image_url)
        .bind(c.active)
        .bind(c.sort_order)
        .bind(c.requires_customization)
        .bind(c.created_at)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, || format!("Já existe uma categoria chamada '{}'", c.name)))
    }

    pub async fn list_categories<'e, E>(&self, executor: E) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE deleted_at IS NULL ORDER BY sort_order, name",
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn find_category<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn update_category<'e, E>(&self, executor: E, c: &Category) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2, description = $3, image_url = $4, active = $5,
                sort_order = $6, requires_customization = $7, updated_at = $8
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(c.id)
        .bind(&c.name)
        .bind(&c.description)
        .bind(&c.image_url)
        .bind(c.active)
        .bind(c.sort_order)
        .bind(c.requires_customization)
        .bind(c.updated_at)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, || format!("Já existe uma categoria chamada '{}'", c.name)))?
        .ok_or_else(|| AppError::not_found("Categoria"))
    }

    // ---
    // Tamanhos
    // ---

    pub async fn insert_size<'e, E>(&self, executor: E, s: &Size) -> Result<Size, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Size>(
            r#"
            INSERT INTO sizes (id, name, dimension, price_multiplier, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(s.id)
        .bind(&s.name)
        .bind(&s.dimension)
        .bind(s.price_multiplier)
        .bind(s.active)
        .bind(s.created_at)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, || format!("Já existe um tamanho chamado '{}'", s.name)))
    }

    pub async fn list_sizes<'e, E>(&self, executor: E) -> Result<Vec<Size>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Size>(
            "SELECT * FROM sizes WHERE deleted_at IS NULL AND active ORDER BY price_multiplier, name",
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn find_size<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Size>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Size>("SELECT * FROM sizes WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn update_size<'e, E>(&self, executor: E, s: &Size) -> Result<Size, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Size>(
            r#"
            UPDATE sizes
            SET name = $2, dimension = $3, price_multiplier = $4, active = $5, updated_at = $6
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(s.id)
        .bind(&s.name)
        .bind(&s.dimension)
        .bind(s.price_multiplier)
        .bind(s.active)
        .bind(s.updated_at)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, || format!("Já existe um tamanho chamado '{}'", s.name)))?
        .ok_or_else(|| AppError::not_found("Tamanho"))
    }

    // ---
    // Ingredientes
    // ---

    pub async fn insert_ingredient<'e, E>(&self, executor: E, i: &Ingredient) -> Result<Ingredient, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Ingredient>(
            r#"
            INSERT INTO ingredients
                (id, name, description, unit_price, unit_of_measure, stock, image_url,
                 available, is_allergen, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(i.id)
        .bind(&i.name)
        .bind(&i.description)
        .bind(i.unit_price)
        .bind(&i.unit_of_measure)
        .bind(i.stock)
        .bind(&i.image_url)
        .bind(i.available)
        .bind(i.is_allergen)
        .bind(i.created_at)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, || format!("Já existe um ingrediente chamado '{}'", i.name)))
    }

    pub async fn list_ingredients<'e, E>(&self, executor: E) -> Result<Vec<Ingredient>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Ingredient>(
            "SELECT * FROM ingredients WHERE deleted_at IS NULL ORDER BY name",
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn find_ingredient<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Ingredient>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Ingredient>(
            "SELECT * FROM ingredients WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    /// O estoque não é alterado aqui; só compras e vendas mexem nele.
    pub async fn update_ingredient<'e, E>(&self, executor: E, i: &Ingredient) -> Result<Ingredient, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Ingredient>(
            r#"
            UPDATE ingredients
            SET name = $2, description = $3, unit_price = $4, unit_of_measure = $5,
                image_url = $6, available = $7, is_allergen = $8, updated_at = $9
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(i.id)
        .bind(&i.name)
        .bind(&i.description)
        .bind(i.unit_price)
        .bind(&i.unit_of_measure)
        .bind(&i.image_url)
        .bind(i.available)
        .bind(i.is_allergen)
        .bind(i.updated_at)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, || format!("Já existe um ingrediente chamado '{}'", i.name)))?
        .ok_or_else(|| AppError::not_found("Ingrediente"))
    }

    /// Trava as linhas dos ingredientes até o fim da transação.
    /// A ordem por id evita deadlock entre vendas concorrentes.
    pub async fn lock_ingredients<'e, E>(&self, executor: E, ids: &[Uuid]) -> Result<Vec<Ingredient>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Ingredient>(
            r#"
            SELECT * FROM ingredients
            WHERE id = ANY($1) AND deleted_at IS NULL
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn increment_stock<'e, E>(&self, executor: E, id: Uuid, amount: Decimal) -> Result<Ingredient, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Ingredient>(
            r#"
            UPDATE ingredients
            SET stock = stock + $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found("Ingrediente"))
    }

    /// Baixa condicional: `None` quando o estoque não cobre a quantidade.
    pub async fn decrement_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        amount: Decimal,
    ) -> Result<Option<Ingredient>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Ingredient>(
            r#"
            UPDATE ingredients
            SET stock = stock - $2, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL AND stock >= $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    // ---
    // Fornecedores
    // ---

    pub async fn insert_supplier<'e, E>(&self, executor: E, s: &Supplier) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers
                (id, name, company, phone, email, address, city, tax_id, notes,
                 active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(s.id)
        .bind(&s.name)
        .bind(&s.company)
        .bind(&s.phone)
        .bind(&s.email)
        .bind(&s.address)
        .bind(&s.city)
        .bind(&s.tax_id)
        .bind(&s.notes)
        .bind(s.active)
        .bind(s.created_at)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn list_suppliers<'e, E>(&self, executor: E) -> Result<Vec<Supplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Supplier>(
            "SELECT * FROM suppliers WHERE deleted_at IS NULL ORDER BY name",
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn find_supplier<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Supplier>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Supplier>(
            "SELECT * FROM suppliers WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn update_supplier<'e, E>(&self, executor: E, s: &Supplier) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET name = $2, company = $3, phone = $4, email = $5, address = $6,
                city = $7, tax_id = $8, notes = $9, active = $10, updated_at = $11
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(s.id)
        .bind(&s.name)
        .bind(&s.company)
        .bind(&s.phone)
        .bind(&s.email)
        .bind(&s.address)
        .bind(&s.city)
        .bind(&s.tax_id)
        .bind(&s.notes)
        .bind(s.active)
        .bind(s.updated_at)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::not_found("Fornecedor"))
    }

    // ---
    // Clientes
    // ---

    pub async fn insert_customer<'e, E>(&self, executor: E, c: &Customer) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers
                (id, document_number, given_names, first_surname, second_surname,
                 address, phone, email, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(c.id)
        .bind(&c.document_number)
        .bind(&c.given_names)
        .bind(&c.first_surname)
        .bind(&c.second_surname)
        .bind(&c.address)
        .bind(&c.phone)
        .bind(&c.email)
        .bind(c.active)
        .bind(c.created_at)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, || duplicate_document(&c.document_number)))
    }

    pub async fn list_customers<'e, E>(&self, executor: E) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE deleted_at IS NULL ORDER BY document_number",
        )
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn find_customer<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, Customer>(
            "SELECT * FROM customers WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn update_customer<'e, E>(&self, executor: E, c: &Customer) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET document_number = $2, given_names = $3, first_surname = $4, second_surname = $5,
                address = $6, phone = $7, email = $8, active = $9, updated_at = $10
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(c.id)
        .bind(&c.document_number)
        .bind(&c.given_names)
        .bind(&c.first_surname)
        .bind(&c.second_surname)
        .bind(&c.address)
        .bind(&c.phone)
        .bind(&c.email)
        .bind(c.active)
        .bind(c.updated_at)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, || duplicate_document(&c.document_number)))?
        .ok_or_else(|| AppError::not_found("Cliente"))
    }
}

pub(crate) fn duplicate_document(document_number: &str) -> String {
    format!("Já existe um cliente com o documento '{}'", document_number)
}
