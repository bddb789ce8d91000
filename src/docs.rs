// src/docs.rs

use utoipa::OpenApi;

use crate::common::query::SortDirection;
use crate::handlers;
use crate::models;
use crate::services::{
    crm_service::ClientSearchField,
    inventory_service::{ProductSearchField, ProductSortField},
    operation_service::OrderSortField,
    supplier_service::SupplierSortField,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Fornecedores ---
        handlers::suppliers::list_suppliers,
        handlers::suppliers::create_supplier,
        handlers::suppliers::update_supplier,
        handlers::suppliers::delete_supplier,

        // --- Produtos ---
        handlers::inventory::list_products,
        handlers::inventory::stock_report,
        handlers::inventory::create_product,
        handlers::inventory::update_product,
        handlers::inventory::delete_product,

        // --- Clientes ---
        handlers::crm::list_clients,
        handlers::crm::create_client,
        handlers::crm::update_client,
        handlers::crm::delete_client,
        handlers::crm::list_client_orders,

        // --- Pedidos ---
        handlers::operations::list_orders,
        handlers::operations::create_order,
        handlers::operations::update_order,
        handlers::operations::transition_order,
        handlers::operations::delete_order,

        // --- Transações ---
        handlers::finance::list_transactions,
    ),
    components(
        schemas(
            // --- Models ---
            models::suppliers::Supplier,
            models::inventory::Product,
            models::inventory::ProductDetail,
            models::inventory::StockReportEntry,
            models::crm::Client,
            models::crm::ClientRemoval,
            models::operations::OrderStatus,
            models::operations::OrderItem,
            models::operations::Order,
            models::operations::OrderDetail,
            models::finance::TransactionType,
            models::finance::Transaction,
            models::finance::TransactionDetail,

            // --- Filtros ---
            SortDirection,
            SupplierSortField,
            ProductSearchField,
            ProductSortField,
            ClientSearchField,
            OrderSortField,

            // --- Payloads ---
            handlers::suppliers::SupplierPayload,
            handlers::inventory::ProductPayload,
            handlers::crm::ClientPayload,
            handlers::crm::ClientRemovalResponse,
            handlers::operations::OrderItemPayload,
            handlers::operations::CreateOrderPayload,
            handlers::operations::UpdateOrderItemsPayload,
            handlers::operations::UpdateStatusPayload,
        )
    ),
    tags(
        (name = "Fornecedores", description = "Cadastro de fornecedores"),
        (name = "Produtos", description = "Produtos e relatório de estoque"),
        (name = "Clientes", description = "Cadastro de clientes e histórico de pedidos"),
        (name = "Pedidos", description = "Pedidos com baixa de estoque"),
        (name = "Transações", description = "Histórico de entradas e saídas")
    )
)]
pub struct ApiDoc;
