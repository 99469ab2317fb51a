// src/services/sale_service.rs

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{finish, SoftDeletable, Store, UnitOfWork},
    models::{
        catalog::Ingredient,
        product::RecipeRequirement,
        sales::{sale_number, NewSale, NewSaleLine, Sale, SaleDetail, SalePatch, SaleRelation},
    },
    services::soft_delete_in,
};

/// Consumo total por ingrediente: Σ (quantidade da receita × quantidade vendida),
/// na ordem em que os ingredientes aparecem.
pub fn aggregate_consumption(lines: &[NewSaleLine], requirements: &[RecipeRequirement]) -> Vec<(Uuid, Decimal)> {
    let mut totals: Vec<(Uuid, Decimal)> = Vec::new();
    for line in lines {
        let sold = Decimal::from(line.quantity);
        for req in requirements.iter().filter(|r| r.product_id == line.product_id) {
            let amount = req.quantity * sold;
            match totals.iter_mut().find(|(id, _)| *id == req.ingredient_id) {
                Some((_, total)) => *total += amount,
                None => totals.push((req.ingredient_id, amount)),
            }
        }
    }
    totals
}

/// Falha no primeiro ingrediente sem estoque suficiente.
pub fn check_stock(consumption: &[(Uuid, Decimal)], ingredients: &[Ingredient]) -> Result<(), AppError> {
    for (ingredient_id, required) in consumption {
        let ingredient = ingredients
            .iter()
            .find(|i| i.id == *ingredient_id)
            .ok_or_else(|| AppError::not_found("Ingrediente"))?;
        if ingredient.stock < *required {
            return Err(AppError::InsufficientStock {
                ingredient: ingredient.name.clone(),
                required: *required,
                available: ingredient.stock,
            });
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct SaleService {
    store: Arc<dyn Store>,
}

impl SaleService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Registra a venda e baixa o estoque dos ingredientes consumidos.
    /// Nada é gravado se faltar estoque para qualquer ingrediente.
    pub async fn create_sale(&self, payload: NewSale) -> Result<SaleDetail, AppError> {
        let mut uow = self.store.begin().await?;
        let result = create_sale_in(&mut *uow, payload).await;
        finish(uow, result).await
    }

    pub async fn list_sales(&self) -> Result<Vec<Sale>, AppError> {
        let mut uow = self.store.begin().await?;
        let result = uow.list_sales().await;
        finish(uow, result).await
    }

    pub async fn get_sale(&self, id: Uuid, relations: &[SaleRelation]) -> Result<SaleDetail, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<SaleDetail, AppError> = async {
            let sale = require_sale(&mut *uow, id).await?;
            hydrate(&mut *uow, sale, relations).await
        }
        .await;
        finish(uow, result).await
    }

    pub async fn update_sale(&self, id: Uuid, patch: SalePatch) -> Result<Sale, AppError> {
        let mut uow = self.store.begin().await?;
        let result: Result<Sale, AppError> = async {
            let current = require_sale(&mut *uow, id).await?;
            let merged = current.apply(patch, Utc::now())?;
            uow.update_sale(&merged).await
        }
        .await;
        finish(uow, result).await
    }

    pub async fn delete_sale(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let result = soft_delete_in(&mut *uow, SoftDeletable::Sale, id).await;
        finish(uow, result).await
    }
}

async fn create_sale_in(uow: &mut dyn UnitOfWork, payload: NewSale) -> Result<SaleDetail, AppError> {
    let now = Utc::now();

    let number = match payload.requested_number() {
        Some(number) => number,
        None => sale_number(now.date_naive(), uow.count_sales().await?),
    };
    if uow.sale_number_exists(&number).await? {
        return Err(AppError::conflict(format!("O número de venda '{}' já existe", number)));
    }

    let employee = match payload.employee_id {
        Some(id) => Some(
            uow.find_employee(id)
                .await?
                .ok_or_else(|| AppError::not_found("Funcionário"))?,
        ),
        None => None,
    };

    let mut product_ids: Vec<Uuid> = Vec::with_capacity(payload.lines.len());
    for line in &payload.lines {
        if product_ids.contains(&line.product_id) {
            continue;
        }
        let product = uow
            .find_product(line.product_id)
            .await?
            .ok_or_else(|| AppError::not_found("Produto"))?;
        if !product.available {
            return Err(AppError::bad_request(format!(
                "O produto '{}' não está disponível",
                product.name
            )));
        }
        product_ids.push(product.id);
    }

    // Verificação e baixa acontecem com as linhas dos ingredientes travadas.
    let requirements = uow.recipe_requirements(&product_ids).await?;
    let consumption = aggregate_consumption(&payload.lines, &requirements);
    let ingredient_ids: Vec<Uuid> = consumption.iter().map(|(id, _)| *id).collect();
    let locked = uow.lock_ingredients(&ingredient_ids).await?;
    check_stock(&consumption, &locked)?;

    let header = payload.header(number, now)?;
    let sale = uow.insert_sale(&header).await?;

    let mut lines = Vec::with_capacity(payload.lines.len());
    for new_line in payload.lines {
        lines.push(uow.insert_sale_line(&new_line.into_record(sale.id, now)).await?);
    }

    for (ingredient_id, amount) in &consumption {
        match uow.decrement_stock(*ingredient_id, *amount).await? {
            Some(updated) => {
                tracing::debug!("Baixa de estoque: '{}' -{} -> {}", updated.name, amount, updated.stock);
            }
            None => {
                let current = locked.iter().find(|i| i.id == *ingredient_id);
                return Err(AppError::InsufficientStock {
                    ingredient: current.map(|i| i.name.clone()).unwrap_or_default(),
                    required: *amount,
                    available: current.map(|i| i.stock).unwrap_or_default(),
                });
            }
        }
    }

    tracing::info!(
        "Venda {} registrada: {} item(ns), {} ingrediente(s) baixado(s)",
        sale.sale_number,
        lines.len(),
        consumption.len()
    );

    Ok(SaleDetail {
        sale,
        employee,
        lines: Some(lines),
    })
}

async fn require_sale(uow: &mut dyn UnitOfWork, id: Uuid) -> Result<Sale, AppError> {
    uow.find_sale(id).await?.ok_or_else(|| AppError::not_found("Venda"))
}

async fn hydrate(uow: &mut dyn UnitOfWork, sale: Sale, relations: &[SaleRelation]) -> Result<SaleDetail, AppError> {
    let employee = match sale.employee_id {
        Some(id) if relations.contains(&SaleRelation::Employee) => uow.find_employee(id).await?,
        _ => None,
    };
    let lines = if relations.contains(&SaleRelation::Lines) {
        Some(uow.sale_lines(sale.id).await?)
    } else {
        None
    };
    Ok(SaleDetail { sale, employee, lines })
}
