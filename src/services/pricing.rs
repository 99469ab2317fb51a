// src/services/pricing.rs

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UnitOfWork,
    models::product::{Product, RecipeCost},
};

/// Custo dos ingredientes de uma receita: Σ preço unitário × quantidade.
/// Receita vazia custa zero; ingrediente sem preço é erro.
pub fn ingredient_cost(costs: &[RecipeCost]) -> Result<Decimal, AppError> {
    costs.iter().try_fold(Decimal::ZERO, |acc, line| {
        let unit_price = line
            .unit_price
            .ok_or_else(|| AppError::MissingUnitPrice(line.ingredient_name.clone()))?;
        Ok(acc + unit_price * line.quantity)
    })
}

/// Recalcula `price = base_price + custo da receita` dentro da transação recebida.
pub async fn recalculate_in(uow: &mut dyn UnitOfWork, product_id: Uuid) -> Result<Product, AppError> {
    let product = uow
        .find_product(product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Produto"))?;

    let costs = uow.recipe_costs(product_id).await?;
    let cost = ingredient_cost(&costs)?;
    let price = (product.base_price + cost).round_dp(2);

    tracing::debug!(
        "Preço recalculado para '{}': base {} + ingredientes {} = {}",
        product.name,
        product.base_price,
        cost,
        price
    );

    uow.set_product_price(product_id, price, Utc::now()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(name: &str, unit_price: Option<Decimal>, quantity: Decimal) -> RecipeCost {
        RecipeCost {
            ingredient_id: Uuid::new_v4(),
            ingredient_name: name.into(),
            unit_price,
            quantity,
        }
    }

    #[test]
    fn empty_recipe_costs_nothing() {
        assert_eq!(ingredient_cost(&[]).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn cost_is_sum_of_price_times_quantity() {
        let costs = vec![
            line("Queijo", Some(dec!(50)), dec!(0.2)),
            line("Tomate", Some(dec!(8.50)), dec!(0.5)),
        ];
        assert_eq!(ingredient_cost(&costs).unwrap(), dec!(14.25));
    }

    #[test]
    fn missing_unit_price_names_the_ingredient() {
        let costs = vec![
            line("Queijo", Some(dec!(50)), dec!(0.2)),
            line("Manjericão", None, dec!(0.01)),
        ];
        match ingredient_cost(&costs) {
            Err(AppError::MissingUnitPrice(name)) => assert_eq!(name, "Manjericão"),
            other => panic!("esperava MissingUnitPrice, veio {:?}", other),
        }
    }
}
