// src/handlers/inventory.rs

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        query::SortDirection,
        validation::{validate_not_blank, validate_positive_price},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::inventory::{NewProduct, Product, ProductDetail, StockReportEntry},
    services::inventory_service::{ProductQuery, ProductSearchField, ProductSortField},
};

// ---
// Payload: Produto (criação e edição)
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(alias = "name")]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Caneta Azul")]
    pub nome: String,

    #[serde(alias = "category")]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Papelaria")]
    pub categoria: String,

    #[serde(alias = "price")]
    #[validate(custom(function = "validate_positive_price"))]
    #[schema(value_type = f64, example = 2.5)]
    pub preco: Decimal,

    #[serde(alias = "stock")]
    #[validate(range(min = 1, max = 1_000_000_000, message = "stock_range"))]
    #[schema(example = 100)]
    pub estoque: i64,

    #[serde(alias = "supplierId", default)]
    #[schema(example = 1717000000000_i64)]
    pub fornecedor_id: Option<i64>,

    #[serde(alias = "image")]
    #[validate(url(message = "invalid_url"))]
    #[schema(example = "https://exemplo.com/caneta.png")]
    pub imagem: String,
}

impl From<ProductPayload> for NewProduct {
    fn from(payload: ProductPayload) -> Self {
        Self {
            name: payload.nome,
            category: payload.categoria,
            price: payload.preco,
            stock: payload.estoque,
            supplier_id: payload.fornecedor_id,
            image: payload.imagem,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListParams {
    #[serde(rename = "busca", alias = "search")]
    pub search: Option<String>,

    /// Campo da busca: nome ou fornecedor
    #[serde(rename = "campo", alias = "field")]
    pub search_field: Option<ProductSearchField>,

    /// Filtro adicional pelo nome do fornecedor
    #[serde(rename = "fornecedor", alias = "supplier")]
    pub supplier: Option<String>,

    #[serde(rename = "ordenarPor", alias = "sortBy")]
    pub sort_by: Option<ProductSortField>,

    #[serde(rename = "direcao", alias = "direction")]
    pub direction: Option<SortDirection>,
}

impl From<ProductListParams> for ProductQuery {
    fn from(params: ProductListParams) -> Self {
        Self {
            search: params.search.unwrap_or_default(),
            search_field: params.search_field.unwrap_or_default(),
            supplier: params.supplier.unwrap_or_default(),
            sort_by: params.sort_by.unwrap_or_default(),
            direction: params.direction.unwrap_or(SortDirection::Asc),
        }
    }
}

// GET /produtos
#[utoipa::path(
    get,
    path = "/produtos",
    tag = "Produtos",
    params(ProductListParams),
    responses(
        (status = 200, description = "Produtos com o nome do fornecedor", body = Vec<ProductDetail>),
        (status = 400, description = "Filtro inválido")
    )
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    params: Result<Query<ProductListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|e| {
        AppError::InvalidFilter(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    let products = app_state
        .inventory_service
        .list_products(&params.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(products)))
}

// GET /estoque
#[utoipa::path(
    get,
    path = "/estoque",
    tag = "Produtos",
    params(ProductListParams),
    responses(
        (status = 200, description = "Relatório de estoque (valor total por produto)", body = Vec<StockReportEntry>),
        (status = 400, description = "Filtro inválido")
    )
)]
pub async fn stock_report(
    State(app_state): State<AppState>,
    locale: Locale,
    params: Result<Query<ProductListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|e| {
        AppError::InvalidFilter(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    let report = app_state
        .inventory_service
        .stock_report(&params.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}

// POST /produto
#[utoipa::path(
    post,
    path = "/produto",
    tag = "Produtos",
    request_body = ProductPayload,
    responses(
        (status = 201, description = "Produto criado", body = Product),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Fornecedor não encontrado")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::InvalidBody(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .inventory_service
        .create_product(payload.into(), Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}

// PUT /produto/{id}
// Mudança de estoque gera transação manual
#[utoipa::path(
    put,
    path = "/produto/{id}",
    tag = "Produtos",
    request_body = ProductPayload,
    params(("id" = i64, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto atualizado", body = Product),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Produto ou fornecedor não encontrado")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::InvalidBody(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .inventory_service
        .update_product(id, payload.into(), Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(product)))
}

// DELETE /produto/{id}
#[utoipa::path(
    delete,
    path = "/produto/{id}",
    tag = "Produtos",
    params(("id" = i64, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto excluído"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .inventory_service
        .delete_product(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
