// src/services/product_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{finish, SoftDeletable, Store, UnitOfWork},
    models::product::{
        NewProduct, NewRecipeLink, Product, ProductDetail, ProductPatch, RecipeLink, RecipeLinkDetail,
        RecipeLinkPatch,
    },
    services::{pricing, soft_delete_in},
};

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn Store>,
}

impl ProductService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // ---
    // Produtos
    // ---

    pub async fn create_product(&self, payload: NewProduct) -> Result<Product, AppError> {
        let record = payload.into_record(Utc::now())?;
        let mut uow = self.store.begin().await?;
        let result: Result<Product, AppError> = async {
            require_category(&mut *uow, record.category_id).await?;
            uow.insert_product(&record).await
        }
        .await;
        finish(uow, result).await
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow.list_products().await;
        finish(uow, result).await
    }

    /// Produto com a receita (vínculos + ingrediente de cada um).
    pub async fn get_product(&self, id: Uuid) -> Result<ProductDetail, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<ProductDetail, AppError> = async {
            let product = require_product(&mut *uow, id).await?;
            let ingredients = recipe_of(&mut *uow, id).await?;
            Ok(ProductDetail { product, ingredients })
        }
        .await;
        finish(uow, result).await
    }

    /// Alterar o preço base dispara o recálculo do preço final.
    pub async fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<Product, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<Product, AppError> = async {
            let current = require_product(&mut *uow, id).await?;
            let old_base = current.base_price;
            let old_category = current.category_id;
            let merged = current.apply(patch, Utc::now())?;
            if merged.category_id != old_category {
                require_category(&mut *uow, merged.category_id).await?;
            }
            let updated = uow.update_product(&merged).await?;
            if updated.base_price != old_base {
                pricing::recalculate_in(&mut *uow, id).await
            } else {
                Ok(updated)
            }
        }
        .await;
        finish(uow, result).await
    }

    /// Remove o produto e apaga fisicamente a receita dele; nada é recalculado.
    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<(), AppError> = async {
            require_product(&mut *uow, id).await?;
            let removed = uow.delete_links_for_product(id).await?;
            soft_delete_in(&mut *uow, SoftDeletable::Product, id).await?;
            tracing::debug!("Produto {} removido junto com {} vínculo(s) de receita", id, removed);
            Ok(())
        }
        .await;
        finish(uow, result).await
    }

    pub async fn recalculate_price(&self, id: Uuid) -> Result<Product, AppError> {
        let mut uow = self.store.begin().await?;
        let result = pricing::recalculate_in(&mut *uow, id).await;
        finish(uow, result).await
    }

    pub async fn product_ingredients(&self, id: Uuid) -> Result<Vec<RecipeLinkDetail>, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<Vec<RecipeLinkDetail>, AppError> = async {
            require_product(&mut *uow, id).await?;
            recipe_of(&mut *uow, id).await
        }
        .await;
        finish(uow, result).await
    }

    // ---
    // Vínculos de receita
    // ---

    pub async fn create_link(&self, payload: NewRecipeLink) -> Result<RecipeLink, AppError> {
        let record = payload.into_record(Utc::now())?;
        let mut uow = self.store.begin().await?;
        let result: Result<RecipeLink, AppError> = async {
            require_product(&mut *uow, record.product_id).await?;
            require_ingredient(&mut *uow, record.ingredient_id).await?;
            let link = uow.insert_recipe_link(&record).await?;
            pricing::recalculate_in(&mut *uow, link.product_id).await?;
            Ok(link)
        }
        .await;
        finish(uow, result).await
    }

    pub async fn list_links(&self) -> Result<Vec<RecipeLink>, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow.list_recipe_links().await;
        finish(uow, result).await
    }

    pub async fn get_link(&self, id: Uuid) -> Result<RecipeLinkDetail, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<RecipeLinkDetail, AppError> = async {
            let link = require_link(&mut *uow, id).await?;
            let ingredient = uow.find_ingredient(link.ingredient_id).await?;
            let product = uow.find_product(link.product_id).await?;
            Ok(RecipeLinkDetail {
                link,
                ingredient,
                product,
            })
        }
        .await;
        finish(uow, result).await
    }

    /// Se o vínculo mudar de produto, o produto antigo também é recalculado.
    pub async fn update_link(&self, id: Uuid, patch: RecipeLinkPatch) -> Result<RecipeLink, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<RecipeLink, AppError> = async {
            let current = require_link(&mut *uow, id).await?;
            let old_product = current.product_id;
            let merged = current.apply(patch, Utc::now())?;
            if merged.product_id != old_product {
                require_product(&mut *uow, merged.product_id).await?;
            }
            require_ingredient(&mut *uow, merged.ingredient_id).await?;

            let link = uow.update_recipe_link(&merged).await?;
            pricing::recalculate_in(&mut *uow, link.product_id).await?;
            if link.product_id != old_product {
                pricing::recalculate_in(&mut *uow, old_product).await?;
            }
            Ok(link)
        }
        .await;
        finish(uow, result).await
    }

    pub async fn delete_link(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<(), AppError> = async {
            let link = uow
                .delete_recipe_link(id)
                .await?
                .ok_or_else(|| AppError::not_found("Vínculo de receita"))?;
            reprice_after_unlink(&mut *uow, &link).await
        }
        .await;
        finish(uow, result).await
    }

    pub async fn delete_link_pair(&self, product_id: Uuid, ingredient_id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<(), AppError> = async {
            let link = uow
                .delete_recipe_link_pair(product_id, ingredient_id)
                .await?
                .ok_or_else(|| AppError::not_found("Vínculo de receita"))?;
            reprice_after_unlink(&mut *uow, &link).await
        }
        .await;
        finish(uow, result).await
    }

    /// Produtos que usam o ingrediente (vínculo + produto).
    pub async fn ingredient_products(&self, ingredient_id: Uuid) -> Result<Vec<RecipeLinkDetail>, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<Vec<RecipeLinkDetail>, AppError> = async {
            require_ingredient(&mut *uow, ingredient_id).await?;
            let links = uow.links_for_ingredient(ingredient_id).await?;
            let mut details = Vec::with_capacity(links.len());
            for link in links {
                let product = uow.find_product(link.product_id).await?;
                details.push(RecipeLinkDetail {
                    link,
                    ingredient: None,
                    product,
                });
            }
            Ok(details)
        }
        .await;
        finish(uow, result).await
    }
}

async fn require_category(uow: &mut dyn UnitOfWork, id: Uuid) -> Result<(), AppError> {
    match uow.find_category(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found("Categoria")),
    }
}

async fn require_product(uow: &mut dyn UnitOfWork, id: Uuid) -> Result<Product, AppError> {
    uow.find_product(id)
        .await?
        .ok_or_else(|| AppError::not_found("Produto"))
}

async fn require_ingredient(uow: &mut dyn UnitOfWork, id: Uuid) -> Result<(), AppError> {
    match uow.find_ingredient(id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::not_found("Ingrediente")),
    }
}

async fn require_link(uow: &mut dyn UnitOfWork, id: Uuid) -> Result<RecipeLink, AppError> {
    uow.find_recipe_link(id)
        .await?
        .ok_or_else(|| AppError::not_found("Vínculo de receita"))
}

async fn recipe_of(uow: &mut dyn UnitOfWork, product_id: Uuid) -> Result<Vec<RecipeLinkDetail>, AppError> {
    let links = uow.links_for_product(product_id).await?;
    let mut details = Vec::with_capacity(links.len());
    for link in links {
        let ingredient = uow.find_ingredient(link.ingredient_id).await?;
        details.push(RecipeLinkDetail {
            link,
            ingredient,
            product: None,
        });
    }
    Ok(details)
}

// O produto pode já ter sido removido; nesse caso não há o que recalcular.
async fn reprice_after_unlink(uow: &mut dyn UnitOfWork, link: &RecipeLink) -> Result<(), AppError> {
    if uow.find_product(link.product_id).await?.is_some() {
        pricing::recalculate_in(uow, link.product_id).await?;
    }
    Ok(())
}
