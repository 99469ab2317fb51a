// src/handlers/catalog.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::catalog::{
        CategoryPatch, CustomerPatch, IngredientPatch, NewCategory, NewCustomer, NewIngredient,
        NewSize, NewSupplier, SizePatch, SupplierPatch,
    },
};

// ---
// Categorias
// ---

pub async fn create_category(
    State(app_state): State<AppState>,
    Json(payload): Json<NewCategory>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let category = app_state.catalog_service.create_category(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_categories(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.catalog_service.list_categories().await?))
}

pub async fn get_category(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.catalog_service.get_category(id).await?))
}

pub async fn update_category(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryPatch>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    Ok(Json(app_state.catalog_service.update_category(id, payload).await?))
}

pub async fn delete_category(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Tamanhos
// ---

pub async fn create_size(
    State(app_state): State<AppState>,
    Json(payload): Json<NewSize>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let size = app_state.catalog_service.create_size(payload).await?;
    Ok((StatusCode::CREATED, Json(size)))
}

pub async fn list_sizes(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.catalog_service.list_sizes().await?))
}

pub async fn get_size(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.catalog_service.get_size(id).await?))
}

pub async fn update_size(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SizePatch>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    Ok(Json(app_state.catalog_service.update_size(id, payload).await?))
}

pub async fn delete_size(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_size(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Ingredientes
// ---

pub async fn create_ingredient(
    State(app_state): State<AppState>,
    Json(payload): Json<NewIngredient>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let ingredient = app_state.catalog_service.create_ingredient(payload).await?;
    Ok((StatusCode::CREATED, Json(ingredient)))
}

pub async fn list_ingredients(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.catalog_service.list_ingredients().await?))
}

pub async fn get_ingredient(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.catalog_service.get_ingredient(id).await?))
}

// Mudança de preço recalcula os produtos que usam o ingrediente.
pub async fn update_ingredient(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<IngredientPatch>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    Ok(Json(app_state.catalog_service.update_ingredient(id, payload).await?))
}

pub async fn delete_ingredient(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_ingredient(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Fornecedores
// ---

pub async fn create_supplier(
    State(app_state): State<AppState>,
    Json(payload): Json<NewSupplier>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let supplier = app_state.catalog_service.create_supplier(payload).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn list_suppliers(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.catalog_service.list_suppliers().await?))
}

pub async fn get_supplier(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.catalog_service.get_supplier(id).await?))
}

pub async fn update_supplier(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SupplierPatch>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    Ok(Json(app_state.catalog_service.update_supplier(id, payload).await?))
}

pub async fn delete_supplier(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_supplier(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Clientes
// ---

pub async fn create_customer(
    State(app_state): State<AppState>,
    Json(payload): Json<NewCustomer>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let customer = app_state.catalog_service.create_customer(payload).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn list_customers(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.catalog_service.list_customers().await?))
}

pub async fn get_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.catalog_service.get_customer(id).await?))
}

pub async fn update_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CustomerPatch>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    Ok(Json(app_state.catalog_service.update_customer(id, payload).await?))
}

pub async fn delete_customer(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.catalog_service.delete_customer(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
