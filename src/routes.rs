// src/routes.rs

use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers};

/// Monta o router completo da API.
pub fn create_router(state: AppState) -> Router {
    let supplier_routes = Router::new()
        .route("/fornecedores", get(handlers::suppliers::list_suppliers))
        .route("/fornecedor", post(handlers::suppliers::create_supplier))
        .route(
            "/fornecedor/{id}",
            put(handlers::suppliers::update_supplier).delete(handlers::suppliers::delete_supplier),
        );

    let product_routes = Router::new()
        .route("/produtos", get(handlers::inventory::list_products))
        .route("/produto", post(handlers::inventory::create_product))
        .route(
            "/produto/{id}",
            put(handlers::inventory::update_product).delete(handlers::inventory::delete_product),
        )
        .route("/estoque", get(handlers::inventory::stock_report));

    let client_routes = Router::new()
        .route("/clientes", get(handlers::crm::list_clients))
        .route("/cliente", post(handlers::crm::create_client))
        .route(
            "/cliente/{id}",
            put(handlers::crm::update_client).delete(handlers::crm::delete_client),
        )
        .route("/clientes/{id}/pedidos", get(handlers::crm::list_client_orders));

    let order_routes = Router::new()
        .route("/pedidos", get(handlers::operations::list_orders))
        .route("/pedido", post(handlers::operations::create_order))
        .route(
            "/pedido/{id}",
            put(handlers::operations::update_order).delete(handlers::operations::delete_order),
        )
        .route("/pedido/{id}/status", patch(handlers::operations::transition_order));

    let finance_routes =
        Router::new().route("/transacoes", get(handlers::finance::list_transactions));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(supplier_routes)
        .merge(product_routes)
        .merge(client_routes)
        .merge(order_routes)
        .merge(finance_routes)
        // O frontend roda em outra origem
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
