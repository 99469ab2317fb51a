// src/db/unit_of_work.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, EmployeeRepository, ProductRepository, PurchaseRepository, SaleRepository},
    models::{
        auth::Employee,
        catalog::{Category, Customer, Ingredient, Size, Supplier},
        product::{Product, RecipeCost, RecipeLink, RecipeRequirement},
        purchasing::{Purchase, PurchaseLine},
        sales::{Sale, SaleLine},
    },
};

/// Registros que só são marcados como removidos (`deleted_at`), nunca apagados.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftDeletable {
    Category,
    Size,
    Ingredient,
    Supplier,
    Customer,
    Product,
    Purchase,
    Sale,
    Employee,
}

impl SoftDeletable {
    pub fn table(self) -> &'static str {
        match self {
            SoftDeletable::Category => "categories",
            SoftDeletable::Size => "sizes",
            SoftDeletable::Ingredient => "ingredients",
            SoftDeletable::Supplier => "suppliers",
            SoftDeletable::Customer => "customers",
            SoftDeletable::Product => "products",
            SoftDeletable::Purchase => "purchases",
            SoftDeletable::Sale => "sales",
            SoftDeletable::Employee => "employees",
        }
    }

    /// Nome usado nas mensagens de erro.
    pub fn label(self) -> &'static str {
        match self {
            SoftDeletable::Category => "Categoria",
            SoftDeletable::Size => "Tamanho",
            SoftDeletable::Ingredient => "Ingrediente",
            SoftDeletable::Supplier => "Fornecedor",
            SoftDeletable::Customer => "Cliente",
            SoftDeletable::Product => "Produto",
            SoftDeletable::Purchase => "Compra",
            SoftDeletable::Sale => "Venda",
            SoftDeletable::Employee => "Funcionário",
        }
    }
}

/// Origem das transações. Os serviços recebem um `Arc<dyn Store>`.
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError>;
}

/// Uma transação aberta. Tudo que passa por ela é confirmado junto no `commit`
/// ou descartado junto no `rollback`.
#[async_trait]
pub trait UnitOfWork: Send {
    // Categorias
    async fn insert_category(&mut self, category: &Category) -> Result<Category, AppError>;
    async fn list_categories(&mut self) -> Result<Vec<Category>, AppError>;
    async fn find_category(&mut self, id: Uuid) -> Result<Option<Category>, AppError>;
    async fn update_category(&mut self, category: &Category) -> Result<Category, AppError>;

    // Tamanhos
    async fn insert_size(&mut self, size: &Size) -> Result<Size, AppError>;
    async fn list_sizes(&mut self) -> Result<Vec<Size>, AppError>;
    async fn find_size(&mut self, id: Uuid) -> Result<Option<Size>, AppError>;
    async fn update_size(&mut self, size: &Size) -> Result<Size, AppError>;

    // Ingredientes e estoque
    async fn insert_ingredient(&mut self, ingredient: &Ingredient) -> Result<Ingredient, AppError>;
    async fn list_ingredients(&mut self) -> Result<Vec<Ingredient>, AppError>;
    async fn find_ingredient(&mut self, id: Uuid) -> Result<Option<Ingredient>, AppError>;
    async fn update_ingredient(&mut self, ingredient: &Ingredient) -> Result<Ingredient, AppError>;
    async fn lock_ingredients(&mut self, ids: &[Uuid]) -> Result<Vec<Ingredient>, AppError>;
    async fn increment_stock(&mut self, id: Uuid, amount: Decimal) -> Result<Ingredient, AppError>;
    async fn decrement_stock(&mut self, id: Uuid, amount: Decimal) -> Result<Option<Ingredient>, AppError>;

    // Fornecedores
    async fn insert_supplier(&mut self, supplier: &Supplier) -> Result<Supplier, AppError>;
    async fn list_suppliers(&mut self) -> Result<Vec<Supplier>, AppError>;
    async fn find_supplier(&mut self, id: Uuid) -> Result<Option<Supplier>, AppError>;
    async fn update_supplier(&mut self, supplier: &Supplier) -> Result<Supplier, AppError>;

    // Clientes
    async fn insert_customer(&mut self, customer: &Customer) -> Result<Customer, AppError>;
    async fn list_customers(&mut self) -> Result<Vec<Customer>, AppError>;
    async fn find_customer(&mut self, id: Uuid) -> Result<Option<Customer>, AppError>;
    async fn update_customer(&mut self, customer: &Customer) -> Result<Customer, AppError>;

    // Produtos
    async fn insert_product(&mut self, product: &Product) -> Result<Product, AppError>;
    async fn list_products(&mut self) -> Result<Vec<Product>, AppError>;
    async fn find_product(&mut self, id: Uuid) -> Result<Option<Product>, AppError>;
    async fn update_product(&mut self, product: &Product) -> Result<Product, AppError>;
    async fn set_product_price(&mut self, id: Uuid, price: Decimal, now: DateTime<Utc>) -> Result<Product, AppError>;

    // Receitas
    async fn insert_recipe_link(&mut self, link: &RecipeLink) -> Result<RecipeLink, AppError>;
    async fn list_recipe_links(&mut self) -> Result<Vec<RecipeLink>, AppError>;
    async fn find_recipe_link(&mut self, id: Uuid) -> Result<Option<RecipeLink>, AppError>;
    async fn update_recipe_link(&mut self, link: &RecipeLink) -> Result<RecipeLink, AppError>;
    async fn delete_recipe_link(&mut self, id: Uuid) -> Result<Option<RecipeLink>, AppError>;
    async fn delete_recipe_link_pair(
        &mut self,
        product_id: Uuid,
        ingredient_id: Uuid,
    ) -> Result<Option<RecipeLink>, AppError>;
    async fn delete_links_for_product(&mut self, product_id: Uuid) -> Result<u64, AppError>;
    async fn links_for_product(&mut self, product_id: Uuid) -> Result<Vec<RecipeLink>, AppError>;
    async fn links_for_ingredient(&mut self, ingredient_id: Uuid) -> Result<Vec<RecipeLink>, AppError>;
    async fn recipe_costs(&mut self, product_id: Uuid) -> Result<Vec<RecipeCost>, AppError>;
    async fn recipe_requirements(&mut self, product_ids: &[Uuid]) -> Result<Vec<RecipeRequirement>, AppError>;

    // Compras
    async fn count_purchases(&mut self) -> Result<i64, AppError>;
    async fn insert_purchase(&mut self, purchase: &Purchase) -> Result<Purchase, AppError>;
    async fn insert_purchase_line(&mut self, line: &PurchaseLine) -> Result<PurchaseLine, AppError>;
    async fn list_purchases(&mut self) -> Result<Vec<Purchase>, AppError>;
    async fn find_purchase(&mut self, id: Uuid) -> Result<Option<Purchase>, AppError>;
    async fn update_purchase(&mut self, purchase: &Purchase) -> Result<Purchase, AppError>;
    async fn purchase_lines(&mut self, purchase_id: Uuid) -> Result<Vec<PurchaseLine>, AppError>;

    // Vendas
    async fn count_sales(&mut self) -> Result<i64, AppError>;
    async fn sale_number_exists(&mut self, sale_number: &str) -> Result<bool, AppError>;
    async fn insert_sale(&mut self, sale: &Sale) -> Result<Sale, AppError>;
    async fn insert_sale_line(&mut self, line: &SaleLine) -> Result<SaleLine, AppError>;
    async fn list_sales(&mut self) -> Result<Vec<Sale>, AppError>;
    async fn find_sale(&mut self, id: Uuid) -> Result<Option<Sale>, AppError>;
    async fn update_sale(&mut self, sale: &Sale) -> Result<Sale, AppError>;
    async fn sale_lines(&mut self, sale_id: Uuid) -> Result<Vec<SaleLine>, AppError>;

    // Funcionários
    async fn insert_employee(&mut self, employee: &Employee) -> Result<Employee, AppError>;
    async fn list_employees(&mut self) -> Result<Vec<Employee>, AppError>;
    async fn find_employee(&mut self, id: Uuid) -> Result<Option<Employee>, AppError>;
    async fn find_employee_by_username(&mut self, username: &str) -> Result<Option<Employee>, AppError>;
    async fn update_employee(&mut self, employee: &Employee) -> Result<Employee, AppError>;

    /// `false` quando o registro não existe ou já estava removido.
    async fn soft_delete(&mut self, kind: SoftDeletable, id: Uuid, now: DateTime<Utc>) -> Result<bool, AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
    async fn rollback(self: Box<Self>) -> Result<(), AppError>;
}

/// Confirma a transação se o trabalho deu certo; caso contrário desfaz
/// explicitamente e devolve o erro original.
pub async fn finish<T>(uow: Box<dyn UnitOfWork>, result: Result<T, AppError>) -> Result<T, AppError> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                tracing::error!("Falha ao desfazer a transação: {:?}", rollback_err);
            }
            Err(err)
        }
    }
}

// ---
// Implementação Postgres
// ---

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork {
            tx,
            catalog: CatalogRepository,
            products: ProductRepository,
            purchases: PurchaseRepository,
            sales: SaleRepository,
            employees: EmployeeRepository,
        }))
    }
}

pub struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
    catalog: CatalogRepository,
    products: ProductRepository,
    purchases: PurchaseRepository,
    sales: SaleRepository,
    employees: EmployeeRepository,
}

async fn soft_delete_row<'e, E>(executor: E, kind: SoftDeletable, id: Uuid, now: DateTime<Utc>) -> Result<bool, AppError>
where
    E: Executor<'e, Database = Postgres>,
{
    // `table()` só devolve nomes fixos, então o format! é seguro.
    let sql = format!(
        "UPDATE {} SET deleted_at = $2, updated_at = $2 WHERE id = $1 AND deleted_at IS NULL",
        kind.table()
    );
    let result = sqlx::query(&sql).bind(id).bind(now).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn insert_category(&mut self, category: &Category) -> Result<Category, AppError> {
        self.catalog.insert_category(&mut *self.tx, category).await
    }
    async fn list_categories(&mut self) -> Result<Vec<Category>, AppError> {
        self.catalog.list_categories(&mut *self.tx).await
    }
    async fn find_category(&mut self, id: Uuid) -> Result<Option<Category>, AppError> {
        self.catalog.find_category(&mut *self.tx, id).await
    }
    async fn update_category(&mut self, category: &Category) -> Result<Category, AppError> {
        self.catalog.update_category(&mut *self.tx, category).await
    }

    async fn insert_size(&mut self, size: &Size) -> Result<Size, AppError> {
        self.catalog.insert_size(&mut *self.tx, size).await
    }
    async fn list_sizes(&mut self) -> Result<Vec<Size>, AppError> {
        self.catalog.list_sizes(&mut *self.tx).await
    }
    async fn find_size(&mut self, id: Uuid) -> Result<Option<Size>, AppError> {
        self.catalog.find_size(&mut *self.tx, id).await
    }
    async fn update_size(&mut self, size: &Size) -> Result<Size, AppError> {
        self.catalog.update_size(&mut *self.tx, size).await
    }

    async fn insert_ingredient(&mut self, ingredient: &Ingredient) -> Result<Ingredient, AppError> {
        self.catalog.insert_ingredient(&mut *self.tx, ingredient).await
    }
    async fn list_ingredients(&mut self) -> Result<Vec<Ingredient>, AppError> {
        self.catalog.list_ingredients(&mut *self.tx).await
    }
    async fn find_ingredient(&mut self, id: Uuid) -> Result<Option<Ingredient>, AppError> {
        self.catalog.find_ingredient(&mut *self.tx, id).await
    }
    async fn update_ingredient(&mut self, ingredient: &Ingredient) -> Result<Ingredient, AppError> {
        self.catalog.update_ingredient(&mut *self.tx, ingredient).await
    }
    async fn lock_ingredients(&mut self, ids: &[Uuid]) -> Result<Vec<Ingredient>, AppError> {
        self.catalog.lock_ingredients(&mut *self.tx, ids).await
    }
    async fn increment_stock(&mut self, id: Uuid, amount: Decimal) -> Result<Ingredient, AppError> {
        self.catalog.increment_stock(&mut *self.tx, id, amount).await
    }
    async fn decrement_stock(&mut self, id: Uuid, amount: Decimal) -> Result<Option<Ingredient>, AppError> {
        self.catalog.decrement_stock(&mut *self.tx, id, amount).await
    }

    async fn insert_supplier(&mut self, supplier: &Supplier) -> Result<Supplier, AppError> {
        self.catalog.insert_supplier(&mut *self.tx, supplier).await
    }
    async fn list_suppliers(&mut self) -> Result<Vec<Supplier>, AppError> {
        self.catalog.list_suppliers(&mut *self.tx).await
    }
    async fn find_supplier(&mut self, id: Uuid) -> Result<Option<Supplier>, AppError> {
        self.catalog.find_supplier(&mut *self.tx, id).await
    }
    async fn update_supplier(&mut self, supplier: &Supplier) -> Result<Supplier, AppError> {
        self.catalog.update_supplier(&mut *self.tx, supplier).await
    }

    async fn insert_customer(&mut self, customer: &Customer) -> Result<Customer, AppError> {
        self.catalog.insert_customer(&mut *self.tx, customer).await
    }
    async fn list_customers(&mut self) -> Result<Vec<Customer>, AppError> {
        self.catalog.list_customers(&mut *self.tx).await
    }
    async fn find_customer(&mut self, id: Uuid) -> Result<Option<Customer>, AppError> {
        self.catalog.find_customer(&mut *self.tx, id).await
    }
    async fn update_customer(&mut self, customer: &Customer) -> Result<Customer, AppError> {
        self.catalog.update_customer(&mut *self.tx, customer).await
    }

    async fn insert_product(&mut self, product: &Product) -> Result<Product, AppError> {
        self.products.insert_product(&mut *self.tx, product).await
    }
    async fn list_products(&mut self) -> Result<Vec<Product>, AppError> {
        self.products.list_products(&mut *self.tx).await
    }
    async fn find_product(&mut self, id: Uuid) -> Result<Option<Product>, AppError> {
        self.products.find_product(&mut *self.tx, id).await
    }
    async fn update_product(&mut self, product: &Product) -> Result<Product, AppError> {
        self.products.update_product(&mut *self.tx, product).await
    }
    async fn set_product_price(&mut self, id: Uuid, price: Decimal, now: DateTime<Utc>) -> Result<Product, AppError> {
        self.products.set_price(&mut *self.tx, id, price, now).await
    }

    async fn insert_recipe_link(&mut self, link: &RecipeLink) -> Result<RecipeLink, AppError> {
        self.products.insert_link(&mut *self.tx, link).await
    }
    async fn list_recipe_links(&mut self) -> Result<Vec<RecipeLink>, AppError> {
        self.products.list_links(&mut *self.tx).await
    }
    async fn find_recipe_link(&mut self, id: Uuid) -> Result<Option<RecipeLink>, AppError> {
        self.products.find_link(&mut *self.tx, id).await
    }
    async fn update_recipe_link(&mut self, link: &RecipeLink) -> Result<RecipeLink, AppError> {
        self.products.update_link(&mut *self.tx, link).await
    }
    async fn delete_recipe_link(&mut self, id: Uuid) -> Result<Option<RecipeLink>, AppError> {
        self.products.delete_link(&mut *self.tx, id).await
    }
    async fn delete_recipe_link_pair(
        &mut self,
        product_id: Uuid,
        ingredient_id: Uuid,
    ) -> Result<Option<RecipeLink>, AppError> {
        self.products.delete_link_pair(&mut *self.tx, product_id, ingredient_id).await
    }
    async fn delete_links_for_product(&mut self, product_id: Uuid) -> Result<u64, AppError> {
        self.products.delete_links_for_product(&mut *self.tx, product_id).await
    }
    async fn links_for_product(&mut self, product_id: Uuid) -> Result<Vec<RecipeLink>, AppError> {
        self.products.links_for_product(&mut *self.tx, product_id).await
    }
    async fn links_for_ingredient(&mut self, ingredient_id: Uuid) -> Result<Vec<RecipeLink>, AppError> {
        self.products.links_for_ingredient(&mut *self.tx, ingredient_id).await
    }
    async fn recipe_costs(&mut self, product_id: Uuid) -> Result<Vec<RecipeCost>, AppError> {
        self.products.recipe_costs(&mut *self.tx, product_id).await
    }
    async fn recipe_requirements(&mut self, product_ids: &[Uuid]) -> Result<Vec<RecipeRequirement>, AppError> {
        self.products.recipe_requirements(&mut *self.tx, product_ids).await
    }

    async fn count_purchases(&mut self) -> Result<i64, AppError> {
        self.purchases.count_all(&mut *self.tx).await
    }
    async fn insert_purchase(&mut self, purchase: &Purchase) -> Result<Purchase, AppError> {
        self.purchases.insert_purchase(&mut *self.tx, purchase).await
    }
    async fn insert_purchase_line(&mut self, line: &PurchaseLine) -> Result<PurchaseLine, AppError> {
        self.purchases.insert_line(&mut *self.tx, line).await
    }
    async fn list_purchases(&mut self) -> Result<Vec<Purchase>, AppError> {
        self.purchases.list_purchases(&mut *self.tx).await
    }
    async fn find_purchase(&mut self, id: Uuid) -> Result<Option<Purchase>, AppError> {
        self.purchases.find_purchase(&mut *self.tx, id).await
    }
    async fn update_purchase(&mut self, purchase: &Purchase) -> Result<Purchase, AppError> {
        self.purchases.update_purchase(&mut *self.tx, purchase).await
    }
    async fn purchase_lines(&mut self, purchase_id: Uuid) -> Result<Vec<PurchaseLine>, AppError> {
        self.purchases.lines_for(&mut *self.tx, purchase_id).await
    }

    async fn count_sales(&mut self) -> Result<i64, AppError> {
        self.sales.count_all(&mut *self.tx).await
    }
    async fn sale_number_exists(&mut self, sale_number: &str) -> Result<bool, AppError> {
        self.sales.number_exists(&mut *self.tx, sale_number).await
    }
    async fn insert_sale(&mut self, sale: &Sale) -> Result<Sale, AppError> {
        self.sales.insert_sale(&mut *self.tx, sale).await
    }
    async fn insert_sale_line(&mut self, line: &SaleLine) -> Result<SaleLine, AppError> {
        self.sales.insert_line(&mut *self.tx, line).await
    }
    async fn list_sales(&mut self) -> Result<Vec<Sale>, AppError> {
        self.sales.list_sales(&mut *self.tx).await
    }
    async fn find_sale(&mut self, id: Uuid) -> Result<Option<Sale>, AppError> {
        self.sales.find_sale(&mut *self.tx, id).await
    }
    async fn update_sale(&mut self, sale: &Sale) -> Result<Sale, AppError> {
        self.sales.update_sale(&mut *self.tx, sale).await
    }
    async fn sale_lines(&mut self, sale_id: Uuid) -> Result<Vec<SaleLine>, AppError> {
        self.sales.lines_for(&mut *self.tx, sale_id).await
    }

    async fn insert_employee(&mut self, employee: &Employee) -> Result<Employee, AppError> {
        self.employees.insert_employee(&mut *self.tx, employee).await
    }
    async fn list_employees(&mut self) -> Result<Vec<Employee>, AppError> {
        self.employees.list_employees(&mut *self.tx).await
    }
    async fn find_employee(&mut self, id: Uuid) -> Result<Option<Employee>, AppError> {
        self.employees.find_employee(&mut *self.tx, id).await
    }
    async fn find_employee_by_username(&mut self, username: &str) -> Result<Option<Employee>, AppError> {
        self.employees.find_by_username(&mut *self.tx, username).await
    }
    async fn update_employee(&mut self, employee: &Employee) -> Result<Employee, AppError> {
        self.employees.update_employee(&mut *self.tx, employee).await
    }

    async fn soft_delete(&mut self, kind: SoftDeletable, id: Uuid, now: DateTime<Utc>) -> Result<bool, AppError> {
        soft_delete_row(&mut *self.tx, kind, id, now).await
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
