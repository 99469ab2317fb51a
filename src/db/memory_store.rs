// src/db/memory_store.rs
//
// Store em memória para os testes: cada unidade de trabalho opera sobre uma
// cópia das tabelas, que só substitui o estado compartilhado no commit.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{catalog_repo::duplicate_document, SoftDeletable, Store, UnitOfWork},
    models::{
        auth::Employee,
        catalog::{Category, Customer, Ingredient, Size, Supplier},
        product::{Product, RecipeCost, RecipeLink, RecipeRequirement},
        purchasing::{Purchase, PurchaseLine},
        sales::{Sale, SaleLine},
    },
};

#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub categories: Vec<Category>,
    pub sizes: Vec<Size>,
    pub ingredients: Vec<Ingredient>,
    pub suppliers: Vec<Supplier>,
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub recipe_links: Vec<RecipeLink>,
    pub purchases: Vec<Purchase>,
    pub purchase_lines: Vec<PurchaseLine>,
    pub sales: Vec<Sale>,
    pub sale_lines: Vec<SaleLine>,
    pub employees: Vec<Employee>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    drained: Arc<Mutex<Vec<Uuid>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cópia do estado confirmado, para as asserções dos testes.
    pub fn snapshot(&self) -> Tables {
        self.tables.lock().unwrap().clone()
    }

    /// Simula outra venda esgotando o ingrediente entre a trava e a baixa:
    /// `decrement_stock` passa a encontrar o estoque zerado.
    pub fn drain_before_decrement(&self, id: Uuid) {
        self.drained.lock().unwrap().push(id);
    }

    pub fn ingredient_stock(&self, id: Uuid) -> Decimal {
        self.snapshot()
            .ingredients
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.stock)
            .unwrap_or_default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        Ok(Box::new(MemoryUnitOfWork {
            shared: self.tables.clone(),
            work: self.snapshot(),
            drained: self.drained.lock().unwrap().clone(),
        }))
    }
}

pub struct MemoryUnitOfWork {
    shared: Arc<Mutex<Tables>>,
    work: Tables,
    drained: Vec<Uuid>,
}

impl MemoryUnitOfWork {
    fn document_taken(&self, customer: &Customer) -> bool {
        self.work.customers.iter().any(|c| {
            c.id != customer.id && c.deleted_at.is_none() && c.document_number == customer.document_number
        })
    }
}

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn live<T: Clone>(rows: &[T], deleted: impl Fn(&T) -> bool) -> Vec<T> {
    rows.iter().filter(|r| !deleted(r)).cloned().collect()
}

/// Substitui a linha com o mesmo id, se ela existir e ainda estiver ativa.
fn replace<T: Clone>(
    rows: &mut [T],
    row: &T,
    same: impl Fn(&T) -> bool,
    deleted: impl Fn(&T) -> bool,
    label: &str,
) -> Result<T, AppError> {
    let slot = rows
        .iter_mut()
        .find(|r| same(r) && !deleted(r))
        .ok_or_else(|| AppError::not_found(label))?;
    *slot = row.clone();
    Ok(row.clone())
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn insert_category(&mut self, category: &Category) -> Result<Category, AppError> {
        let taken = self
            .work
            .categories
            .iter()
            .any(|c| c.deleted_at.is_none() && same_name(&c.name, &category.name));
        if taken {
            return Err(AppError::conflict(format!(
                "Já existe uma categoria chamada '{}'",
                category.name
            )));
        }
        self.work.categories.push(category.clone());
        Ok(category.clone())
    }
    async fn list_categories(&mut self) -> Result<Vec<Category>, AppError> {
        let mut rows = live(&self.work.categories, |c| c.deleted_at.is_some());
        rows.sort_by(|a, b| a.sort_order.cmp(&b.sort_order).then_with(|| a.name.cmp(&b.name)));
        Ok(rows)
    }
    async fn find_category(&mut self, id: Uuid) -> Result<Option<Category>, AppError> {
        Ok(self
            .work
            .categories
            .iter()
            .find(|c| c.id == id && c.deleted_at.is_none())
            .cloned())
    }
    async fn update_category(&mut self, category: &Category) -> Result<Category, AppError> {
        let taken = self.work.categories.iter().any(|c| {
            c.id != category.id && c.deleted_at.is_none() && same_name(&c.name, &category.name)
        });
        if taken {
            return Err(AppError::conflict(format!(
                "Já existe uma categoria chamada '{}'",
                category.name
            )));
        }
        replace(
            &mut self.work.categories,
            category,
            |c| c.id == category.id,
            |c| c.deleted_at.is_some(),
            "Categoria",
        )
    }

    async fn insert_size(&mut self, size: &Size) -> Result<Size, AppError> {
        let taken = self
            .work
            .sizes
            .iter()
            .any(|s| s.deleted_at.is_none() && same_name(&s.name, &size.name));
        if taken {
            return Err(AppError::conflict(format!("Já existe um tamanho chamado '{}'", size.name)));
        }
        self.work.sizes.push(size.clone());
        Ok(size.clone())
    }
    async fn list_sizes(&mut self) -> Result<Vec<Size>, AppError> {
        let mut rows = live(&self.work.sizes, |s| s.deleted_at.is_some() || !s.active);
        rows.sort_by(|a, b| {
            a.price_multiplier
                .cmp(&b.price_multiplier)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(rows)
    }
    async fn find_size(&mut self, id: Uuid) -> Result<Option<Size>, AppError> {
        Ok(self
            .work
            .sizes
            .iter()
            .find(|s| s.id == id && s.deleted_at.is_none())
            .cloned())
    }
    async fn update_size(&mut self, size: &Size) -> Result<Size, AppError> {
        let taken = self
            .work
            .sizes
            .iter()
            .any(|s| s.id != size.id && s.deleted_at.is_none() && same_name(&s.name, &size.name));
        if taken {
            return Err(AppError::conflict(format!("Já existe um tamanho chamado '{}'", size.name)));
        }
        replace(
            &mut self.work.sizes,
            size,
            |s| s.id == size.id,
            |s| s.deleted_at.is_some(),
            "Tamanho",
        )
    }

    async fn insert_ingredient(&mut self, ingredient: &Ingredient) -> Result<Ingredient, AppError> {
        let taken = self
            .work
            .ingredients
            .iter()
            .any(|i| i.deleted_at.is_none() && same_name(&i.name, &ingredient.name));
        if taken {
            return Err(AppError::conflict(format!(
                "Já existe um ingrediente chamado '{}'",
                ingredient.name
            )));
        }
        self.work.ingredients.push(ingredient.clone());
        Ok(ingredient.clone())
    }
    async fn list_ingredients(&mut self) -> Result<Vec<Ingredient>, AppError> {
        Ok(live(&self.work.ingredients, |i| i.deleted_at.is_some()))
    }
    async fn find_ingredient(&mut self, id: Uuid) -> Result<Option<Ingredient>, AppError> {
        Ok(self
            .work
            .ingredients
            .iter()
            .find(|i| i.id == id && i.deleted_at.is_none())
            .cloned())
    }
    async fn update_ingredient(&mut self, ingredient: &Ingredient) -> Result<Ingredient, AppError> {
        let taken = self.work.ingredients.iter().any(|i| {
            i.id != ingredient.id && i.deleted_at.is_none() && same_name(&i.name, &ingredient.name)
        });
        if taken {
            return Err(AppError::conflict(format!(
                "Já existe um ingrediente chamado '{}'",
                ingredient.name
            )));
        }
        // Como no Postgres, o estoque não muda por aqui.
        let current = self
            .work
            .ingredients
            .iter()
            .find(|i| i.id == ingredient.id && i.deleted_at.is_none())
            .map(|i| i.stock)
            .ok_or_else(|| AppError::not_found("Ingrediente"))?;
        let row = Ingredient {
            stock: current,
            ..ingredient.clone()
        };
        replace(
            &mut self.work.ingredients,
            &row,
            |i| i.id == row.id,
            |i| i.deleted_at.is_some(),
            "Ingrediente",
        )
    }
    async fn lock_ingredients(&mut self, ids: &[Uuid]) -> Result<Vec<Ingredient>, AppError> {
        let mut rows: Vec<Ingredient> = self
            .work
            .ingredients
            .iter()
            .filter(|i| ids.contains(&i.id) && i.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by_key(|i| i.id);
        Ok(rows)
    }
    async fn increment_stock(&mut self, id: Uuid, amount: Decimal) -> Result<Ingredient, AppError> {
        let row = self
            .work
            .ingredients
            .iter_mut()
            .find(|i| i.id == id && i.deleted_at.is_none())
            .ok_or_else(|| AppError::not_found("Ingrediente"))?;
        row.stock += amount;
        Ok(row.clone())
    }
    async fn decrement_stock(&mut self, id: Uuid, amount: Decimal) -> Result<Option<Ingredient>, AppError> {
        let drained = self.drained.contains(&id);
        let Some(row) = self
            .work
            .ingredients
            .iter_mut()
            .find(|i| i.id == id && i.deleted_at.is_none())
        else {
            return Ok(None);
        };
        if drained {
            row.stock = Decimal::ZERO;
        }
        if row.stock < amount {
            return Ok(None);
        }
        row.stock -= amount;
        Ok(Some(row.clone()))
    }

    async fn insert_supplier(&mut self, supplier: &Supplier) -> Result<Supplier, AppError> {
        self.work.suppliers.push(supplier.clone());
        Ok(supplier.clone())
    }
    async fn list_suppliers(&mut self) -> Result<Vec<Supplier>, AppError> {
        Ok(live(&self.work.suppliers, |s| s.deleted_at.is_some()))
    }
    async fn find_supplier(&mut self, id: Uuid) -> Result<Option<Supplier>, AppError> {
        Ok(self
            .work
            .suppliers
            .iter()
            .find(|s| s.id == id && s.deleted_at.is_none())
            .cloned())
    }
    async fn update_supplier(&mut self, supplier: &Supplier) -> Result<Supplier, AppError> {
        replace(
            &mut self.work.suppliers,
            supplier,
            |s| s.id == supplier.id,
            |s| s.deleted_at.is_some(),
            "Fornecedor",
        )
    }

    async fn insert_customer(&mut self, customer: &Customer) -> Result<Customer, AppError> {
        if self.document_taken(customer) {
            return Err(AppError::conflict(duplicate_document(&customer.document_number)));
        }
        self.work.customers.push(customer.clone());
        Ok(customer.clone())
    }
    async fn list_customers(&mut self) -> Result<Vec<Customer>, AppError> {
        let mut rows = live(&self.work.customers, |c| c.deleted_at.is_some());
        rows.sort_by(|a, b| a.document_number.cmp(&b.document_number));
        Ok(rows)
    }
    async fn find_customer(&mut self, id: Uuid) -> Result<Option<Customer>, AppError> {
        Ok(self
            .work
            .customers
            .iter()
            .find(|c| c.id == id && c.deleted_at.is_none())
            .cloned())
    }
    async fn update_customer(&mut self, customer: &Customer) -> Result<Customer, AppError> {
        if self.document_taken(customer) {
            return Err(AppError::conflict(duplicate_document(&customer.document_number)));
        }
        replace(
            &mut self.work.customers,
            customer,
            |c| c.id == customer.id,
            |c| c.deleted_at.is_some(),
            "Cliente",
        )
    }

    async fn insert_product(&mut self, product: &Product) -> Result<Product, AppError> {
        if !self.work.categories.iter().any(|c| c.id == product.category_id) {
            return Err(AppError::not_found("Categoria"));
        }
        let taken = self.work.products.iter().any(|p| {
            p.deleted_at.is_none() && p.category_id == product.category_id && same_name(&p.name, &product.name)
        });
        if taken {
            return Err(AppError::conflict(format!(
                "Já existe um produto chamado '{}' nesta categoria",
                product.name
            )));
        }
        self.work.products.push(product.clone());
        Ok(product.clone())
    }
    async fn list_products(&mut self) -> Result<Vec<Product>, AppError> {
        Ok(live(&self.work.products, |p| p.deleted_at.is_some()))
    }
    async fn find_product(&mut self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self
            .work
            .products
            .iter()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .cloned())
    }
    async fn update_product(&mut self, product: &Product) -> Result<Product, AppError> {
        let taken = self.work.products.iter().any(|p| {
            p.id != product.id
                && p.deleted_at.is_none()
                && p.category_id == product.category_id
                && same_name(&p.name, &product.name)
        });
        if taken {
            return Err(AppError::conflict(format!(
                "Já existe um produto chamado '{}' nesta categoria",
                product.name
            )));
        }
        let current = self
            .work
            .products
            .iter()
            .find(|p| p.id == product.id && p.deleted_at.is_none())
            .map(|p| p.price)
            .ok_or_else(|| AppError::not_found("Produto"))?;
        let row = Product {
            price: current,
            ..product.clone()
        };
        replace(
            &mut self.work.products,
            &row,
            |p| p.id == row.id,
            |p| p.deleted_at.is_some(),
            "Produto",
        )
    }
    async fn set_product_price(&mut self, id: Uuid, price: Decimal, now: DateTime<Utc>) -> Result<Product, AppError> {
        let row = self
            .work
            .products
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .ok_or_else(|| AppError::not_found("Produto"))?;
        row.price = price;
        row.updated_at = now;
        Ok(row.clone())
    }

    async fn insert_recipe_link(&mut self, link: &RecipeLink) -> Result<RecipeLink, AppError> {
        let taken = self
            .work
            .recipe_links
            .iter()
            .any(|l| l.product_id == link.product_id && l.ingredient_id == link.ingredient_id);
        if taken {
            return Err(AppError::conflict("O ingrediente já faz parte da receita deste produto"));
        }
        self.work.recipe_links.push(link.clone());
        Ok(link.clone())
    }
    async fn list_recipe_links(&mut self) -> Result<Vec<RecipeLink>, AppError> {
        Ok(self.work.recipe_links.clone())
    }
    async fn find_recipe_link(&mut self, id: Uuid) -> Result<Option<RecipeLink>, AppError> {
        Ok(self.work.recipe_links.iter().find(|l| l.id == id).cloned())
    }
    async fn update_recipe_link(&mut self, link: &RecipeLink) -> Result<RecipeLink, AppError> {
        let taken = self.work.recipe_links.iter().any(|l| {
            l.id != link.id && l.product_id == link.product_id && l.ingredient_id == link.ingredient_id
        });
        if taken {
            return Err(AppError::conflict("O ingrediente já faz parte da receita deste produto"));
        }
        replace(
            &mut self.work.recipe_links,
            link,
            |l| l.id == link.id,
            |_| false,
            "Vínculo de receita",
        )
    }
    async fn delete_recipe_link(&mut self, id: Uuid) -> Result<Option<RecipeLink>, AppError> {
        let pos = self.work.recipe_links.iter().position(|l| l.id == id);
        Ok(pos.map(|p| self.work.recipe_links.remove(p)))
    }
    async fn delete_recipe_link_pair(
        &mut self,
        product_id: Uuid,
        ingredient_id: Uuid,
    ) -> Result<Option<RecipeLink>, AppError> {
        let pos = self
            .work
            .recipe_links
            .iter()
            .position(|l| l.product_id == product_id && l.ingredient_id == ingredient_id);
        Ok(pos.map(|p| self.work.recipe_links.remove(p)))
    }
    async fn delete_links_for_product(&mut self, product_id: Uuid) -> Result<u64, AppError> {
        let before = self.work.recipe_links.len();
        self.work.recipe_links.retain(|l| l.product_id != product_id);
        Ok((before - self.work.recipe_links.len()) as u64)
    }
    async fn links_for_product(&mut self, product_id: Uuid) -> Result<Vec<RecipeLink>, AppError> {
        Ok(self
            .work
            .recipe_links
            .iter()
            .filter(|l| l.product_id == product_id)
            .cloned()
            .collect())
    }
    async fn links_for_ingredient(&mut self, ingredient_id: Uuid) -> Result<Vec<RecipeLink>, AppError> {
        Ok(self
            .work
            .recipe_links
            .iter()
            .filter(|l| l.ingredient_id == ingredient_id)
            .cloned()
            .collect())
    }
    async fn recipe_costs(&mut self, product_id: Uuid) -> Result<Vec<RecipeCost>, AppError> {
        let mut costs = Vec::new();
        for link in self.work.recipe_links.iter().filter(|l| l.product_id == product_id) {
            if let Some(ing) = self.work.ingredients.iter().find(|i| i.id == link.ingredient_id) {
                costs.push(RecipeCost {
                    ingredient_id: ing.id,
                    ingredient_name: ing.name.clone(),
                    unit_price: ing.unit_price,
                    quantity: link.quantity,
                });
            }
        }
        costs.sort_by(|a, b| a.ingredient_name.cmp(&b.ingredient_name));
        Ok(costs)
    }
    async fn recipe_requirements(&mut self, product_ids: &[Uuid]) -> Result<Vec<RecipeRequirement>, AppError> {
        Ok(self
            .work
            .recipe_links
            .iter()
            .filter(|l| product_ids.contains(&l.product_id))
            .map(|l| RecipeRequirement {
                product_id: l.product_id,
                ingredient_id: l.ingredient_id,
                quantity: l.quantity,
            })
            .collect())
    }

    async fn count_purchases(&mut self) -> Result<i64, AppError> {
        Ok(self.work.purchases.len() as i64)
    }
    async fn insert_purchase(&mut self, purchase: &Purchase) -> Result<Purchase, AppError> {
        if !self.work.suppliers.iter().any(|s| s.id == purchase.supplier_id) {
            return Err(AppError::not_found("Fornecedor"));
        }
        if self
            .work
            .purchases
            .iter()
            .any(|p| p.purchase_number == purchase.purchase_number)
        {
            return Err(AppError::conflict(format!(
                "O número de compra '{}' já existe",
                purchase.purchase_number
            )));
        }
        self.work.purchases.push(purchase.clone());
        Ok(purchase.clone())
    }
    async fn insert_purchase_line(&mut self, line: &PurchaseLine) -> Result<PurchaseLine, AppError> {
        if !self.work.ingredients.iter().any(|i| i.id == line.ingredient_id) {
            return Err(AppError::not_found("Ingrediente"));
        }
        self.work.purchase_lines.push(line.clone());
        Ok(line.clone())
    }
    async fn list_purchases(&mut self) -> Result<Vec<Purchase>, AppError> {
        Ok(live(&self.work.purchases, |p| p.deleted_at.is_some()))
    }
    async fn find_purchase(&mut self, id: Uuid) -> Result<Option<Purchase>, AppError> {
        Ok(self
            .work
            .purchases
            .iter()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .cloned())
    }
    async fn update_purchase(&mut self, purchase: &Purchase) -> Result<Purchase, AppError> {
        replace(
            &mut self.work.purchases,
            purchase,
            |p| p.id == purchase.id,
            |p| p.deleted_at.is_some(),
            "Compra",
        )
    }
    async fn purchase_lines(&mut self, purchase_id: Uuid) -> Result<Vec<PurchaseLine>, AppError> {
        Ok(self
            .work
            .purchase_lines
            .iter()
            .filter(|l| l.purchase_id == purchase_id)
            .cloned()
            .collect())
    }

    async fn count_sales(&mut self) -> Result<i64, AppError> {
        Ok(self.work.sales.len() as i64)
    }
    async fn sale_number_exists(&mut self, sale_number: &str) -> Result<bool, AppError> {
        Ok(self.work.sales.iter().any(|s| s.sale_number == sale_number))
    }
    async fn insert_sale(&mut self, sale: &Sale) -> Result<Sale, AppError> {
        if let Some(employee_id) = sale.employee_id {
            if !self.work.employees.iter().any(|e| e.id == employee_id) {
                return Err(AppError::not_found("Funcionário"));
            }
        }
        if self.work.sales.iter().any(|s| s.sale_number == sale.sale_number) {
            return Err(AppError::conflict(format!(
                "O número de venda '{}' já existe",
                sale.sale_number
            )));
        }
        self.work.sales.push(sale.clone());
        Ok(sale.clone())
    }
    async fn insert_sale_line(&mut self, line: &SaleLine) -> Result<SaleLine, AppError> {
        if !self.work.products.iter().any(|p| p.id == line.product_id) {
            return Err(AppError::not_found("Produto"));
        }
        self.work.sale_lines.push(line.clone());
        Ok(line.clone())
    }
    async fn list_sales(&mut self) -> Result<Vec<Sale>, AppError> {
        Ok(live(&self.work.sales, |s| s.deleted_at.is_some()))
    }
    async fn find_sale(&mut self, id: Uuid) -> Result<Option<Sale>, AppError> {
        Ok(self
            .work
            .sales
            .iter()
            .find(|s| s.id == id && s.deleted_at.is_none())
            .cloned())
    }
    async fn update_sale(&mut self, sale: &Sale) -> Result<Sale, AppError> {
        replace(
            &mut self.work.sales,
            sale,
            |s| s.id == sale.id,
            |s| s.deleted_at.is_some(),
            "Venda",
        )
    }
    async fn sale_lines(&mut self, sale_id: Uuid) -> Result<Vec<SaleLine>, AppError> {
        Ok(self
            .work
            .sale_lines
            .iter()
            .filter(|l| l.sale_id == sale_id)
            .cloned()
            .collect())
    }

    async fn insert_employee(&mut self, employee: &Employee) -> Result<Employee, AppError> {
        let taken = self
            .work
            .employees
            .iter()
            .any(|e| e.deleted_at.is_none() && same_name(&e.username, &employee.username));
        if taken {
            return Err(AppError::conflict(format!(
                "O usuário '{}' já está em uso",
                employee.username
            )));
        }
        self.work.employees.push(employee.clone());
        Ok(employee.clone())
    }
    async fn list_employees(&mut self) -> Result<Vec<Employee>, AppError> {
        Ok(live(&self.work.employees, |e| e.deleted_at.is_some()))
    }
    async fn find_employee(&mut self, id: Uuid) -> Result<Option<Employee>, AppError> {
        Ok(self
            .work
            .employees
            .iter()
            .find(|e| e.id == id && e.deleted_at.is_none())
            .cloned())
    }
    async fn find_employee_by_username(&mut self, username: &str) -> Result<Option<Employee>, AppError> {
        Ok(self
            .work
            .employees
            .iter()
            .find(|e| e.deleted_at.is_none() && same_name(&e.username, username))
            .cloned())
    }
    async fn update_employee(&mut self, employee: &Employee) -> Result<Employee, AppError> {
        replace(
            &mut self.work.employees,
            employee,
            |e| e.id == employee.id,
            |e| e.deleted_at.is_some(),
            "Funcionário",
        )
    }

    async fn soft_delete(&mut self, kind: SoftDeletable, id: Uuid, now: DateTime<Utc>) -> Result<bool, AppError> {
        fn mark(deleted_at: &mut Option<DateTime<Utc>>, updated_at: &mut DateTime<Utc>, now: DateTime<Utc>) -> bool {
            if deleted_at.is_some() {
                return false;
            }
            *deleted_at = Some(now);
            *updated_at = now;
            true
        }
        macro_rules! mark_in {
            ($rows:expr) => {
                $rows
                    .iter_mut()
                    .find(|r| r.id == id)
                    .map(|r| mark(&mut r.deleted_at, &mut r.updated_at, now))
            };
        }
        let w = &mut self.work;
        let hit = match kind {
            SoftDeletable::Category => mark_in!(w.categories),
            SoftDeletable::Size => mark_in!(w.sizes),
            SoftDeletable::Ingredient => mark_in!(w.ingredients),
            SoftDeletable::Supplier => mark_in!(w.suppliers),
            SoftDeletable::Customer => mark_in!(w.customers),
            SoftDeletable::Product => mark_in!(w.products),
            SoftDeletable::Purchase => mark_in!(w.purchases),
            SoftDeletable::Sale => mark_in!(w.sales),
            SoftDeletable::Employee => mark_in!(w.employees),
        };
        Ok(hit.unwrap_or(false))
    }

    /// Substitui todas as tabelas pela cópia desta unidade: supõe unidades de
    /// trabalho sequenciais, não há isolamento entre unidades concorrentes.
    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryUnitOfWork { shared, work, .. } = *self;
        *shared.lock().unwrap() = work;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), AppError> {
        Ok(())
    }
}
