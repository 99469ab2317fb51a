pub mod auth;
pub mod catalog_service;
pub mod pricing;
pub mod product_service;
pub mod purchase_service;
pub mod sale_service;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{SoftDeletable, UnitOfWork},
};

/// Marca o registro como removido; `NotFound` se ele não existir (ou já tiver sido removido).
pub(crate) async fn soft_delete_in(uow: &mut dyn UnitOfWork, kind: SoftDeletable, id: Uuid) -> Result<(), AppError> {
    if uow.soft_delete(kind, id, Utc::now()).await? {
        Ok(())
    } else {
        Err(AppError::not_found(kind.label()))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::{
        db::{MemoryStore, Store},
        models::{
            catalog::{NewCategory, NewIngredient, NewSupplier},
            product::{NewProduct, NewRecipeLink},
        },
        services::{catalog_service::CatalogService, product_service::ProductService},
    };

    /// Catálogo mínimo montado pelos serviços de verdade.
    pub struct Fixture {
        pub store: MemoryStore,
        pub catalog: CatalogService,
        pub products: ProductService,
        pub category_id: Uuid,
    }

    impl Fixture {
        pub async fn new() -> Self {
            let store = MemoryStore::new();
            let shared: Arc<dyn Store> = Arc::new(store.clone());
            let catalog = CatalogService::new(shared.clone());
            let products = ProductService::new(shared);
            let category = catalog
                .create_category(NewCategory {
                    name: "Pizzas".into(),
                    description: None,
                    image_url: None,
                    active: None,
                    sort_order: None,
                    requires_customization: None,
                })
                .await
                .unwrap();
            Self {
                store,
                catalog,
                products,
                category_id: category.id,
            }
        }

        pub async fn ingredient(&self, name: &str, unit_price: Option<Decimal>, stock: Decimal) -> Uuid {
            self.catalog
                .create_ingredient(NewIngredient {
                    name: name.into(),
                    description: None,
                    unit_price,
                    unit_of_measure: Some("kg".into()),
                    stock: Some(stock),
                    image_url: None,
                    available: None,
                    is_allergen: None,
                })
                .await
                .unwrap()
                .id
        }

        pub async fn product(&self, name: &str, base_price: Decimal) -> Uuid {
            self.products
                .create_product(NewProduct {
                    category_id: self.category_id,
                    name: name.into(),
                    description: None,
                    base_price,
                    available_sizes: None,
                    image_url: None,
                    available: None,
                    featured: None,
                })
                .await
                .unwrap()
                .id
        }

        pub async fn link(&self, product_id: Uuid, ingredient_id: Uuid, quantity: Decimal) -> Uuid {
            self.products
                .create_link(NewRecipeLink {
                    product_id,
                    ingredient_id,
                    quantity,
                    notes: None,
                })
                .await
                .unwrap()
                .id
        }

        pub async fn supplier(&self) -> Uuid {
            self.catalog
                .create_supplier(NewSupplier {
                    name: "Laticínios Andes".into(),
                    company: None,
                    phone: None,
                    email: None,
                    address: None,
                    city: None,
                    tax_id: None,
                    notes: None,
                    active: None,
                })
                .await
                .unwrap()
                .id
        }

        pub fn shared(&self) -> Arc<dyn Store> {
            Arc::new(self.store.clone())
        }
    }
}
