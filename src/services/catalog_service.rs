// src/services/catalog_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{finish, SoftDeletable, Store, UnitOfWork},
    models::catalog::{
        Category, CategoryPatch, Customer, CustomerPatch, Ingredient, IngredientPatch, NewCategory,
        NewCustomer, NewIngredient, NewSize, NewSupplier, Size, SizePatch, Supplier, SupplierPatch,
    },
    services::{pricing, soft_delete_in},
};

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // ---
    // Categorias
    // ---

    pub async fn create_category(&self, payload: NewCategory) -> Result<Category, AppError> {
        let record = payload.into_record(Utc::now())?;
        let mut uow = self.store.begin().await?;
        let result = uow.insert_category(&record).await;
        finish(uow, result).await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow.list_categories().await;
        finish(uow, result).await
    }

    pub async fn get_category(&self, id: Uuid) -> Result<Category, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow
            .find_category(id)
            .await
            .and_then(|row| row.ok_or_else(|| AppError::not_found("Categoria")));
        finish(uow, result).await
    }

    pub async fn update_category(&self, id: Uuid, patch: CategoryPatch) -> Result<Category, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<Category, AppError> = async {
            let current = uow
                .find_category(id)
                .await?
                .ok_or_else(|| AppError::not_found("Categoria"))?;
            let merged = current.apply(patch, Utc::now())?;
            uow.update_category(&merged).await
        }
        .await;
        finish(uow, result).await
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let result = soft_delete_in(&mut *uow, SoftDeletable::Category, id).await;
        finish(uow, result).await
    }

    // ---
    // Tamanhos
    // ---

    pub async fn create_size(&self, payload: NewSize) -> Result<Size, AppError> {
        let record = payload.into_record(Utc::now())?;
        let mut uow = self.store.begin().await?;
        let result = uow.insert_size(&record).await;
        finish(uow, result).await
    }

    pub async fn list_sizes(&self) -> Result<Vec<Size>, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow.list_sizes().await;
        finish(uow, result).await
    }

    pub async fn get_size(&self, id: Uuid) -> Result<Size, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow
            .find_size(id)
            .await
            .and_then(|row| row.ok_or_else(|| AppError::not_found("Tamanho")));
        finish(uow, result).await
    }

    pub async fn update_size(&self, id: Uuid, patch: SizePatch) -> Result<Size, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<Size, AppError> = async {
            let current = uow
                .find_size(id)
                .await?
                .ok_or_else(|| AppError::not_found("Tamanho"))?;
            let merged = current.apply(patch, Utc::now())?;
            uow.update_size(&merged).await
        }
        .await;
        finish(uow, result).await
    }

    pub async fn delete_size(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let result = soft_delete_in(&mut *uow, SoftDeletable::Size, id).await;
        finish(uow, result).await
    }

    // ---
    // Ingredientes
    // ---

    pub async fn create_ingredient(&self, payload: NewIngredient) -> Result<Ingredient, AppError> {
        let record = payload.into_record(Utc::now())?;
        let mut uow = self.store.begin().await?;
        let result = uow.insert_ingredient(&record).await;
        finish(uow, result).await
    }

    pub async fn list_ingredients(&self) -> Result<Vec<Ingredient>, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow.list_ingredients().await;
        finish(uow, result).await
    }

    pub async fn get_ingredient(&self, id: Uuid) -> Result<Ingredient, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow
            .find_ingredient(id)
            .await
            .and_then(|row| row.ok_or_else(|| AppError::not_found("Ingrediente")));
        finish(uow, result).await
    }

    /// Mudou o preço por unidade? Todos os produtos que usam o ingrediente
    /// são recalculados na mesma transação.
    pub async fn update_ingredient(&self, id: Uuid, patch: IngredientPatch) -> Result<Ingredient, AppError> {
        let mut uow = self.store.begin().await?;
        let result = update_ingredient_in(&mut *uow, id, patch).await;
        finish(uow, result).await
    }

    /// Ingredientes que ainda fazem parte de alguma receita não podem ser removidos.
    pub async fn delete_ingredient(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<(), AppError> = async {
            let ingredient = uow
                .find_ingredient(id)
                .await?
                .ok_or_else(|| AppError::not_found("Ingrediente"))?;
            let links = uow.links_for_ingredient(id).await?;
            if !links.is_empty() {
                return Err(AppError::conflict(format!(
                    "O ingrediente '{}' é usado em {} receita(s)",
                    ingredient.name,
                    links.len()
                )));
            }
            soft_delete_in(&mut *uow, SoftDeletable::Ingredient, id).await
        }
        .await;
        finish(uow, result).await
    }

    // ---
    // Fornecedores
    // ---

    pub async fn create_supplier(&self, payload: NewSupplier) -> Result<Supplier, AppError> {
        let record = payload.into_record(Utc::now())?;
        let mut uow = self.store.begin().await?;
        let result = uow.insert_supplier(&record).await;
        finish(uow, result).await
    }

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow.list_suppliers().await;
        finish(uow, result).await
    }

    pub async fn get_supplier(&self, id: Uuid) -> Result<Supplier, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow
            .find_supplier(id)
            .await
            .and_then(|row| row.ok_or_else(|| AppError::not_found("Fornecedor")));
        finish(uow, result).await
    }

    pub async fn update_supplier(&self, id: Uuid, patch: SupplierPatch) -> Result<Supplier, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<Supplier, AppError> = async {
            let current = uow
                .find_supplier(id)
                .await?
                .ok_or_else(|| AppError::not_found("Fornecedor"))?;
            let merged = current.apply(patch, Utc::now())?;
            uow.update_supplier(&merged).await
        }
        .await;
        finish(uow, result).await
    }

    pub async fn delete_supplier(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let result = soft_delete_in(&mut *uow, SoftDeletable::Supplier, id).await;
        finish(uow, result).await
    }

    // ---
    // Clientes
    // ---

    pub async fn create_customer(&self, payload: NewCustomer) -> Result<Customer, AppError> {
        let record = payload.into_record(Utc::now())?;
        let mut uow = self.store.begin().await?;
        let result = uow.insert_customer(&record).await;
        finish(uow, result).await
    }

    pub async fn list_customers(&self) -> Result<Vec<Customer>, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow.list_customers().await;
        finish(uow, result).await
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<Customer, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow
            .find_customer(id)
            .await
            .and_then(|row| row.ok_or_else(|| AppError::not_found("Cliente")));
        finish(uow, result).await
    }

    pub async fn update_customer(&self, id: Uuid, patch: CustomerPatch) -> Result<Customer, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<Customer, AppError> = async {
            let current = uow
                .find_customer(id)
                .await?
                .ok_or_else(|| AppError::not_found("Cliente"))?;
            let merged = current.apply(patch, Utc::now())?;
            uow.update_customer(&merged).await
        }
        .await;
        finish(uow, result).await
    }

    pub async fn delete_customer(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let result = soft_delete_in(&mut *uow, SoftDeletable::Customer, id).await;
        finish(uow, result).await
    }
}

async fn update_ingredient_in(
    uow: &mut dyn UnitOfWork,
    id: Uuid,
    patch: IngredientPatch,
) -> Result<Ingredient, AppError> {
    let current = uow
        .find_ingredient(id)
        .await?
        .ok_or_else(|| AppError::not_found("Ingrediente"))?;
    let old_price = current.unit_price;
    let merged = current.apply(patch, Utc::now())?;
    let updated = uow.update_ingredient(&merged).await?;

    if updated.unit_price != old_price {
        let mut product_ids: Vec<Uuid> = uow
            .links_for_ingredient(id)
            .await?
            .into_iter()
            .map(|link| link.product_id)
            .collect();
        product_ids.sort();
        product_ids.dedup();
        for product_id in &product_ids {
            pricing::recalculate_in(uow, *product_id).await?;
        }
        if !product_ids.is_empty() {
            tracing::info!(
                "Preço de '{}' alterado; {} produto(s) recalculado(s)",
                updated.name,
                product_ids.len()
            );
        }
    }

    Ok(updated)
}
