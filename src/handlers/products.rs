// src/handlers/products.rs

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
    models::product::{NewProduct, NewRecipeLink, ProductPatch, RecipeLinkPatch},
};

// ---
// Produtos
// ---

pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<NewProduct>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let product = app_state.product_service.create_product(payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.product_service.list_products().await?))
}

pub async fn get_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.product_service.get_product(id).await?))
}

pub async fn update_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProductPatch>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    Ok(Json(app_state.product_service.update_product(id, payload).await?))
}

// Remove também os vínculos da receita.
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.product_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn recalculate_price(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.product_service.recalculate_price(id).await?))
}

pub async fn product_ingredients(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.product_service.product_ingredients(id).await?))
}

// ---
// Receitas (produto x ingrediente)
// ---

pub async fn create_link(
    State(app_state): State<AppState>,
    Json(payload): Json<NewRecipeLink>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let link = app_state.product_service.create_link(payload).await?;
    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn list_links(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.product_service.list_links().await?))
}

pub async fn get_link(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.product_service.get_link(id).await?))
}

pub async fn update_link(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipeLinkPatch>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    Ok(Json(app_state.product_service.update_link(id, payload).await?))
}

pub async fn delete_link(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.product_service.delete_link(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_link_pair(
    State(app_state): State<AppState>,
    Path((product_id, ingredient_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .product_service
        .delete_link_pair(product_id, ingredient_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn ingredient_products(
    State(app_state): State<AppState>,
    Path(ingredient_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(app_state.product_service.ingredient_products(ingredient_id).await?))
}
