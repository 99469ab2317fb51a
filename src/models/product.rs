// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::db_utils::{clean_optional, required_text};
use crate::common::error::AppError;
use crate::models::catalog::Ingredient;
use crate::models::{ensure_not_negative, validate_not_negative};

// --- Produtos ---
// `price` é sempre derivado: base_price + custo dos ingredientes da receita.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub base_price: Decimal,
    pub price: Decimal,
    pub available_sizes: Vec<String>,
    pub image_url: Option<String>,
    pub available: bool,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub category_id: Uuid,
    #[validate(length(min = 1, max = 150, message = "O nome deve ter entre 1 e 150 caracteres."))]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub base_price: Decimal,
    pub available_sizes: Option<Vec<String>>,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
    pub available: Option<bool>,
    pub featured: Option<bool>,
}

impl NewProduct {
    /// Sem receita ainda, então o preço derivado começa igual ao preço base.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<Product, AppError> {
        ensure_not_negative(Some(self.base_price), "preço base")?;
        Ok(Product {
            id: Uuid::new_v4(),
            category_id: self.category_id,
            name: required_text(&self.name, "nome")?,
            description: clean_optional(self.description),
            base_price: self.base_price,
            price: self.base_price,
            available_sizes: clean_sizes(self.available_sizes.unwrap_or_default()),
            image_url: clean_optional(self.image_url),
            available: self.available.unwrap_or(true),
            featured: self.featured.unwrap_or(false),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price: Option<Decimal>,
    pub available_sizes: Option<Vec<String>>,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
    pub available: Option<bool>,
    pub featured: Option<bool>,
}

impl Product {
    /// O `price` não é tocado aqui: quem chama recalcula depois do merge.
    pub fn apply(self, patch: ProductPatch, now: DateTime<Utc>) -> Result<Product, AppError> {
        ensure_not_negative(patch.base_price, "preço base")?;
        Ok(Product {
            category_id: patch.category_id.unwrap_or(self.category_id),
            name: match patch.name {
                Some(name) => required_text(&name, "nome")?,
                None => self.name,
            },
            description: patch.description.map_or(self.description, |d| clean_optional(Some(d))),
            base_price: patch.base_price.unwrap_or(self.base_price),
            available_sizes: patch
                .available_sizes
                .map_or(self.available_sizes, clean_sizes),
            image_url: patch.image_url.map_or(self.image_url, |u| clean_optional(Some(u))),
            available: patch.available.unwrap_or(self.available),
            featured: patch.featured.unwrap_or(self.featured),
            updated_at: now,
            ..self
        })
    }
}

fn clean_sizes(sizes: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::with_capacity(sizes.len());
    for size in sizes {
        let size = size.trim().to_lowercase();
        if !size.is_empty() && !cleaned.contains(&size) {
            cleaned.push(size);
        }
    }
    cleaned
}

// --- Receita (vínculo produto <-> ingrediente) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLink {
    pub id: Uuid,
    pub product_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipeLink {
    pub product_id: Uuid,
    pub ingredient_id: Uuid,
    #[validate(custom(function = "validate_not_negative"))]
    pub quantity: Decimal,
    pub notes: Option<String>,
}

impl NewRecipeLink {
    pub fn into_record(self, now: DateTime<Utc>) -> Result<RecipeLink, AppError> {
        ensure_not_negative(Some(self.quantity), "quantidade")?;
        Ok(RecipeLink {
            id: Uuid::new_v4(),
            product_id: self.product_id,
            ingredient_id: self.ingredient_id,
            quantity: self.quantity,
            notes: clean_optional(self.notes),
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLinkPatch {
    pub product_id: Option<Uuid>,
    pub ingredient_id: Option<Uuid>,
    pub quantity: Option<Decimal>,
    pub notes: Option<String>,
}

impl RecipeLink {
    pub fn apply(self, patch: RecipeLinkPatch, now: DateTime<Utc>) -> Result<RecipeLink, AppError> {
        ensure_not_negative(patch.quantity, "quantidade")?;
        Ok(RecipeLink {
            product_id: patch.product_id.unwrap_or(self.product_id),
            ingredient_id: patch.ingredient_id.unwrap_or(self.ingredient_id),
            quantity: patch.quantity.unwrap_or(self.quantity),
            notes: patch.notes.map_or(self.notes, |n| clean_optional(Some(n))),
            updated_at: now,
            ..self
        })
    }
}

/// Linha de custo usada pelo cálculo de preço (vínculo + preço do ingrediente).
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RecipeCost {
    pub ingredient_id: Uuid,
    pub ingredient_name: String,
    pub unit_price: Option<Decimal>,
    pub quantity: Decimal,
}

/// Quanto de cada ingrediente uma unidade do produto consome.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RecipeRequirement {
    pub product_id: Uuid,
    pub ingredient_id: Uuid,
    pub quantity: Decimal,
}

// --- Respostas compostas ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeLinkDetail {
    #[serde(flatten)]
    pub link: RecipeLink,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ingredient: Option<Ingredient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub ingredients: Vec<RecipeLinkDetail>,
}
