//src/main.rs

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::db::PgStore;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let pool = config.connect().await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app_state = AppState::new(Arc::new(PgStore::new(pool)), &config);

    let listener = TcpListener::bind(config.server_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app(app_state)).await?;
    Ok(())
}

/// Monta todas as rotas da API.
pub fn app(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route(
            "/me",
            get(handlers::auth::get_me).route_layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
        );

    let employee_routes = Router::new()
        .route(
            "/",
            post(handlers::employees::create_employee).get(handlers::employees::list_employees),
        )
        .route(
            "/{id}",
            get(handlers::employees::get_employee)
                .patch(handlers::employees::update_employee)
                .delete(handlers::employees::delete_employee),
        );

    let category_routes = Router::new()
        .route(
            "/",
            post(handlers::catalog::create_category).get(handlers::catalog::list_categories),
        )
        .route(
            "/{id}",
            get(handlers::catalog::get_category)
                .patch(handlers::catalog::update_category)
                .delete(handlers::catalog::delete_category),
        );

    let size_routes = Router::new()
        .route("/", post(handlers::catalog::create_size).get(handlers::catalog::list_sizes))
        .route(
            "/{id}",
            get(handlers::catalog::get_size)
                .patch(handlers::catalog::update_size)
                .delete(handlers::catalog::delete_size),
        );

    let ingredient_routes = Router::new()
        .route(
            "/",
            post(handlers::catalog::create_ingredient).get(handlers::catalog::list_ingredients),
        )
        .route(
            "/{id}",
            get(handlers::catalog::get_ingredient)
                .patch(handlers::catalog::update_ingredient)
                .delete(handlers::catalog::delete_ingredient),
        );

    let supplier_routes = Router::new()
        .route(
            "/",
            post(handlers::catalog::create_supplier).get(handlers::catalog::list_suppliers),
        )
        .route(
            "/{id}",
            get(handlers::catalog::get_supplier)
                .patch(handlers::catalog::update_supplier)
                .delete(handlers::catalog::delete_supplier),
        );

    let customer_routes = Router::new()
        .route(
            "/",
            post(handlers::catalog::create_customer).get(handlers::catalog::list_customers),
        )
        .route(
            "/{id}",
            get(handlers::catalog::get_customer)
                .patch(handlers::catalog::update_customer)
                .delete(handlers::catalog::delete_customer),
        );

    let product_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_product).get(handlers::products::list_products),
        )
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .patch(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route("/{id}/recalculate-price", post(handlers::products::recalculate_price))
        .route("/{id}/ingredients", get(handlers::products::product_ingredients));

    let recipe_routes = Router::new()
        .route(
            "/",
            post(handlers::products::create_link).get(handlers::products::list_links),
        )
        .route(
            "/{id}",
            get(handlers::products::get_link)
                .patch(handlers::products::update_link)
                .delete(handlers::products::delete_link),
        )
        .route(
            "/products/{product_id}/ingredients/{ingredient_id}",
            delete(handlers::products::delete_link_pair),
        )
        .route(
            "/ingredients/{ingredient_id}/products",
            get(handlers::products::ingredient_products),
        );

    let purchase_routes = Router::new()
        .route(
            "/",
            post(handlers::purchases::create_purchase).get(handlers::purchases::list_purchases),
        )
        .route(
            "/{id}",
            get(handlers::purchases::get_purchase)
                .patch(handlers::purchases::update_purchase)
                .delete(handlers::purchases::delete_purchase),
        );

    let sale_routes = Router::new()
        .route("/", post(handlers::sales::create_sale).get(handlers::sales::list_sales))
        .route(
            "/{id}",
            get(handlers::sales::get_sale)
                .patch(handlers::sales::update_sale)
                .delete(handlers::sales::delete_sale),
        );

    // Tudo aqui exige um Bearer token válido
    let protected = Router::new()
        .nest("/api/employees", employee_routes)
        .nest("/api/categories", category_routes)
        .nest("/api/sizes", size_routes)
        .nest("/api/ingredients", ingredient_routes)
        .nest("/api/suppliers", supplier_routes)
        .nest("/api/customers", customer_routes)
        .nest("/api/products", product_routes)
        .nest("/api/recipe-links", recipe_routes)
        .nest("/api/purchases", purchase_routes)
        .nest("/api/sales", sale_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .with_state(app_state)
}
