// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::common::db_utils::{clean_optional, required_text};
use crate::common::error::AppError;
use crate::models::{ensure_not_negative, ensure_positive};

// --- 1. Categorias ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub active: bool,
    pub sort_order: i32,
    pub requires_customization: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    #[validate(length(min = 1, max = 100, message = "O nome deve ter entre 1 e 100 caracteres."))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(max = 255, message = "A URL da imagem não deve exceder 255 caracteres."))]
    pub image_url: Option<String>,
    pub active: Option<bool>,
    pub sort_order: Option<i32>,
    pub requires_customization: Option<bool>,
}

impl NewCategory {
    pub fn into_record(self, now: DateTime<Utc>) -> Result<Category, AppError> {
        Ok(Category {
            id: Uuid::new_v4(),
            name: required_text(&self.name, "nome")?,
            description: clean_optional(self.description),
            image_url: clean_optional(self.image_url),
            active: self.active.unwrap_or(true),
            sort_order: self.sort_order.unwrap_or(0),
            requires_customization: self.requires_customization.unwrap_or(false),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    #[validate(length(min = 1, max = 100, message = "O nome deve ter entre 1 e 100 caracteres."))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 255, message = "A URL da imagem não deve exceder 255 caracteres."))]
    pub image_url: Option<String>,
    pub active: Option<bool>,
    pub sort_order: Option<i32>,
    pub requires_customization: Option<bool>,
}

impl Category {
    /// Aplica o patch e devolve um novo registro já validado.
    pub fn apply(self, patch: CategoryPatch, now: DateTime<Utc>) -> Result<Category, AppError> {
        Ok(Category {
            name: match patch.name {
                Some(name) => required_text(&name, "nome")?,
                None => self.name,
            },
            description: patch.description.map_or(self.description, |d| clean_optional(Some(d))),
            image_url: patch.image_url.map_or(self.image_url, |u| clean_optional(Some(u))),
            active: patch.active.unwrap_or(self.active),
            sort_order: patch.sort_order.unwrap_or(self.sort_order),
            requires_customization: patch
                .requires_customization
                .unwrap_or(self.requires_customization),
            updated_at: now,
            ..self
        })
    }
}

// --- 2. Tamanhos ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub id: Uuid,
    pub name: String,
    pub dimension: Option<String>,
    pub price_multiplier: Decimal,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSize {
    #[validate(length(min = 1, max = 50, message = "O nome deve ter entre 1 e 50 caracteres."))]
    pub name: String,
    #[validate(length(max = 50))]
    pub dimension: Option<String>,
    pub price_multiplier: Option<Decimal>,
    pub active: Option<bool>,
}

impl NewSize {
    pub fn into_record(self, now: DateTime<Utc>) -> Result<Size, AppError> {
        ensure_positive(self.price_multiplier, "multiplicador de preço")?;
        Ok(Size {
            id: Uuid::new_v4(),
            name: required_text(&self.name, "nome")?,
            dimension: clean_optional(self.dimension),
            price_multiplier: self.price_multiplier.unwrap_or(Decimal::ONE),
            active: self.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SizePatch {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(max = 50))]
    pub dimension: Option<String>,
    pub price_multiplier: Option<Decimal>,
    pub active: Option<bool>,
}

impl Size {
    pub fn apply(self, patch: SizePatch, now: DateTime<Utc>) -> Result<Size, AppError> {
        ensure_positive(patch.price_multiplier, "multiplicador de preço")?;
        Ok(Size {
            name: match patch.name {
                Some(name) => required_text(&name, "nome")?,
                None => self.name,
            },
            dimension: patch.dimension.map_or(self.dimension, |d| clean_optional(Some(d))),
            price_multiplier: patch.price_multiplier.unwrap_or(self.price_multiplier),
            active: patch.active.unwrap_or(self.active),
            updated_at: now,
            ..self
        })
    }
}

// --- 3. Ingredientes ---
// O estoque só é alterado pelos fluxos de compra e venda (e pelo valor inicial).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
    pub unit_of_measure: Option<String>,
    pub stock: Decimal,
    pub image_url: Option<String>,
    pub available: bool,
    pub is_allergen: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewIngredient {
    #[validate(length(min = 1, max = 100, message = "O nome deve ter entre 1 e 100 caracteres."))]
    pub name: String,
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
    #[validate(length(max = 50, message = "A unidade de medida não deve exceder 50 caracteres."))]
    pub unit_of_measure: Option<String>,
    pub stock: Option<Decimal>,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
    pub available: Option<bool>,
    pub is_allergen: Option<bool>,
}

impl NewIngredient {
    pub fn into_record(self, now: DateTime<Utc>) -> Result<Ingredient, AppError> {
        ensure_not_negative(self.unit_price, "preço por unidade")?;
        ensure_not_negative(self.stock, "estoque")?;
        Ok(Ingredient {
            id: Uuid::new_v4(),
            name: required_text(&self.name, "nome")?,
            description: clean_optional(self.description),
            unit_price: self.unit_price,
            unit_of_measure: clean_optional(self.unit_of_measure),
            stock: self.stock.unwrap_or(Decimal::ZERO),
            image_url: clean_optional(self.image_url),
            available: self.available.unwrap_or(true),
            is_allergen: self.is_allergen.unwrap_or(false),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct IngredientPatch {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
    #[validate(length(max = 50))]
    pub unit_of_measure: Option<String>,
    #[validate(length(max = 255))]
    pub image_url: Option<String>,
    pub available: Option<bool>,
    pub is_allergen: Option<bool>,
}

impl Ingredient {
    pub fn apply(self, patch: IngredientPatch, now: DateTime<Utc>) -> Result<Ingredient, AppError> {
        ensure_not_negative(patch.unit_price, "preço por unidade")?;
        Ok(Ingredient {
            name: match patch.name {
                Some(name) => required_text(&name, "nome")?,
                None => self.name,
            },
            description: patch.description.map_or(self.description, |d| clean_optional(Some(d))),
            unit_price: patch.unit_price.or(self.unit_price),
            unit_of_measure: patch
                .unit_of_measure
                .map_or(self.unit_of_measure, |u| clean_optional(Some(u))),
            image_url: patch.image_url.map_or(self.image_url, |u| clean_optional(Some(u))),
            available: patch.available.unwrap_or(self.available),
            is_allergen: patch.is_allergen.unwrap_or(self.is_allergen),
            updated_at: now,
            ..self
        })
    }
}

// --- 4. Fornecedores ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub tax_id: Option<String>,
    pub notes: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    #[validate(length(min = 1, max = 150, message = "O nome deve ter entre 1 e 150 caracteres."))]
    pub name: String,
    #[validate(length(max = 200))]
    pub company: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."), length(max = 100))]
    pub email: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 50))]
    pub city: Option<String>,
    #[validate(length(max = 20))]
    pub tax_id: Option<String>,
    pub notes: Option<String>,
    pub active: Option<bool>,
}

impl NewSupplier {
    pub fn into_record(self, now: DateTime<Utc>) -> Result<Supplier, AppError> {
        Ok(Supplier {
            id: Uuid::new_v4(),
            name: required_text(&self.name, "nome")?,
            company: clean_optional(self.company),
            phone: clean_optional(self.phone),
            email: clean_optional(self.email),
            address: clean_optional(self.address),
            city: clean_optional(self.city),
            tax_id: clean_optional(self.tax_id),
            notes: clean_optional(self.notes),
            active: self.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPatch {
    #[validate(length(min = 1, max = 150))]
    pub name: Option<String>,
    #[validate(length(max = 200))]
    pub company: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email, length(max = 100))]
    pub email: Option<String>,
    pub address: Option<String>,
    #[validate(length(max = 50))]
    pub city: Option<String>,
    #[validate(length(max = 20))]
    pub tax_id: Option<String>,
    pub notes: Option<String>,
    pub active: Option<bool>,
}

impl Supplier {
    pub fn apply(self, patch: SupplierPatch, now: DateTime<Utc>) -> Result<Supplier, AppError> {
        let keep = |new: Option<String>, old: Option<String>| new.map_or(old, |v| clean_optional(Some(v)));
        Ok(Supplier {
            name: match patch.name {
                Some(name) => required_text(&name, "nome")?,
                None => self.name,
            },
            company: keep(patch.company, self.company),
            phone: keep(patch.phone, self.phone),
            email: keep(patch.email, self.email),
            address: keep(patch.address, self.address),
            city: keep(patch.city, self.city),
            tax_id: keep(patch.tax_id, self.tax_id),
            notes: keep(patch.notes, self.notes),
            active: patch.active.unwrap_or(self.active),
            updated_at: now,
            ..self
        })
    }
}

// --- 5. Clientes ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    /// Documento de identidade; único entre os clientes não removidos.
    pub document_number: String,
    pub given_names: String,
    pub first_surname: String,
    pub second_surname: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing, default)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    #[validate(length(min = 1, max = 20, message = "O documento deve ter entre 1 e 20 caracteres."))]
    pub document_number: String,
    #[validate(length(min = 1, max = 100, message = "O nome deve ter entre 1 e 100 caracteres."))]
    pub given_names: String,
    #[validate(length(min = 1, max = 50))]
    pub first_surname: String,
    #[validate(length(max = 50))]
    pub second_surname: Option<String>,
    #[validate(length(max = 200))]
    pub address: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."), length(max = 200))]
    pub email: Option<String>,
    pub active: Option<bool>,
}

impl NewCustomer {
    pub fn into_record(self, now: DateTime<Utc>) -> Result<Customer, AppError> {
        Ok(Customer {
            id: Uuid::new_v4(),
            document_number: required_text(&self.document_number, "documento")?,
            given_names: required_text(&self.given_names, "nome")?,
            first_surname: required_text(&self.first_surname, "sobrenome")?,
            second_surname: clean_optional(self.second_surname),
            address: clean_optional(self.address),
            phone: clean_optional(self.phone),
            email: clean_optional(self.email),
            active: self.active.unwrap_or(true),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    #[validate(length(min = 1, max = 20))]
    pub document_number: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub given_names: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub first_surname: Option<String>,
    #[validate(length(max = 50))]
    pub second_surname: Option<String>,
    #[validate(length(max = 200))]
    pub address: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email, length(max = 200))]
    pub email: Option<String>,
    pub active: Option<bool>,
}

impl Customer {
    pub fn apply(self, patch: CustomerPatch, now: DateTime<Utc>) -> Result<Customer, AppError> {
        let required = |new: Option<String>, old: String, field: &str| match new {
            Some(v) => required_text(&v, field),
            None => Ok(old),
        };
        let keep = |new: Option<String>, old: Option<String>| new.map_or(old, |v| clean_optional(Some(v)));
        Ok(Customer {
            document_number: required(patch.document_number, self.document_number, "documento")?,
            given_names: required(patch.given_names, self.given_names, "nome")?,
            first_surname: required(patch.first_surname, self.first_surname, "sobrenome")?,
            second_surname: keep(patch.second_surname, self.second_surname),
            address: keep(patch.address, self.address),
            phone: keep(patch.phone, self.phone),
            email: keep(patch.email, self.email),
            active: patch.active.unwrap_or(self.active),
            updated_at: now,
            ..self
        })
    }
}
