// src/handlers/operations.rs

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        query::{parse_filter, SortDirection},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::operations::{NewOrder, NewOrderItem, Order, OrderDetail, OrderStatus},
    services::operation_service::{OrderQuery, OrderSortField},
};

// =============================================================================
//  PEDIDOS
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    #[serde(alias = "productId")]
    pub produto_id: i64,

    #[serde(alias = "quantity")]
    #[validate(range(min = 1, max = 1_000_000_000, message = "quantity_range"))]
    #[schema(example = 2)]
    pub quantidade: i64,
}

impl From<OrderItemPayload> for NewOrderItem {
    fn from(payload: OrderItemPayload) -> Self {
        Self {
            product_id: payload.produto_id,
            quantity: payload.quantidade,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[serde(alias = "clientId", default)]
    #[validate(required(message = "client_required"))]
    pub cliente_id: Option<i64>,

    // O preço vem sempre do cadastro do produto
    #[serde(alias = "items", default)]
    #[validate(nested)]
    pub itens: Vec<OrderItemPayload>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderItemsPayload {
    #[serde(alias = "items")]
    #[validate(nested)]
    pub itens: Vec<OrderItemPayload>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusPayload {
    #[schema(example = "completed")]
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListParams {
    /// Número do pedido ou nome do cliente
    #[serde(rename = "busca", alias = "search")]
    pub search: Option<String>,

    /// pending, completed, cancelled ou all
    pub status: Option<String>,

    #[serde(rename = "data", alias = "date")]
    #[param(value_type = Option<String>, format = Date, example = "2024-05-01")]
    pub date: Option<NaiveDate>,

    #[serde(rename = "ordenarPor", alias = "sortBy")]
    pub sort_by: Option<OrderSortField>,

    #[serde(rename = "direcao", alias = "direction")]
    pub direction: Option<SortDirection>,
}

// GET /pedidos
#[utoipa::path(
    get,
    path = "/pedidos",
    tag = "Pedidos",
    params(OrderListParams),
    responses(
        (status = 200, description = "Pedidos com o nome do cliente", body = Vec<OrderDetail>),
        (status = 400, description = "Filtro inválido")
    )
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    params: Result<Query<OrderListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|e| {
        AppError::InvalidFilter(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    let status = parse_filter::<OrderStatus>(params.status.as_deref())
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let query = OrderQuery {
        search: params.search.unwrap_or_default(),
        status,
        date: params.date,
        sort_by: params.sort_by.unwrap_or_default(),
        direction: params.direction.unwrap_or(SortDirection::Desc),
    };

    let orders = app_state
        .operations_service
        .list_orders(&query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(orders)))
}

// POST /pedido
#[utoipa::path(
    post,
    path = "/pedido",
    tag = "Pedidos",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido criado e estoque baixado", body = Order),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Cliente ou produto não encontrado"),
        (status = 422, description = "Estoque insuficiente")
    )
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<CreateOrderPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::InvalidBody(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    // `required` já garantiu o cliente
    let input = NewOrder {
        client_id: payload.cliente_id.unwrap_or_default(),
        items: payload.itens.into_iter().map(Into::into).collect(),
    };

    let order = app_state
        .operations_service
        .create_order(input, Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(order)))
}

// PUT /pedido/{id}
#[utoipa::path(
    put,
    path = "/pedido/{id}",
    tag = "Pedidos",
    request_body = UpdateOrderItemsPayload,
    params(("id" = i64, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Itens alterados e estoque conciliado", body = Order),
        (status = 404, description = "Pedido não encontrado"),
        (status = 422, description = "Pedido não está pendente ou estoque insuficiente")
    )
)]
pub async fn update_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateOrderItemsPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::InvalidBody(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let items = payload.itens.into_iter().map(Into::into).collect();
    let order = app_state
        .operations_service
        .update_order_items(id, items, Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// PATCH /pedido/{id}/status
#[utoipa::path(
    patch,
    path = "/pedido/{id}/status",
    tag = "Pedidos",
    request_body = UpdateStatusPayload,
    params(("id" = i64, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Status alterado", body = Order),
        (status = 404, description = "Pedido não encontrado"),
        (status = 422, description = "Transição inválida")
    )
)]
pub async fn transition_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    payload: Result<Json<UpdateStatusPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::InvalidBody(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    let order = app_state
        .operations_service
        .update_status(id, payload.status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(order)))
}

// DELETE /pedido/{id}
#[utoipa::path(
    delete,
    path = "/pedido/{id}",
    tag = "Pedidos",
    params(("id" = i64, Path, description = "ID do pedido")),
    responses(
        (status = 204, description = "Pedido excluído"),
        (status = 404, description = "Pedido não encontrado"),
        (status = 409, description = "Pedido possui transações")
    )
)]
pub async fn delete_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .operations_service
        .delete_order(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
