// src/handlers/crm.rs

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
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        query::{parse_filter, SortDirection},
        validation::validate_not_blank,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::{
        crm::{Client, ClientRemoval, NewClient},
        operations::{Order, OrderStatus},
    },
    services::crm_service::{ClientQuery, ClientSearchField},
};

// =============================================================================
//  CLIENTES
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    #[serde(alias = "name")]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Maria da Silva")]
    pub nome: String,

    #[serde(alias = "cpf_cnpj")]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "12345678900")]
    pub cpf_cnpj: String,

    #[serde(alias = "contact")]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "(11) 99999-0000")]
    pub contato: String,

    #[serde(alias = "address", default)]
    pub endereco: String,

    // Só faz diferença na edição
    #[serde(alias = "isActive", default)]
    pub ativo: Option<bool>,
}

impl From<ClientPayload> for NewClient {
    fn from(payload: ClientPayload) -> Self {
        Self {
            name: payload.nome,
            cpf_cnpj: payload.cpf_cnpj,
            contact: payload.contato,
            address: payload.endereco,
            is_active: payload.ativo,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClientListParams {
    #[serde(rename = "busca", alias = "search")]
    pub search: Option<String>,

    /// Campo da busca: nome ou cpfCnpj
    #[serde(rename = "campo", alias = "field")]
    pub search_field: Option<ClientSearchField>,

    /// true, false ou all
    #[serde(rename = "ativo", alias = "active")]
    pub active: Option<String>,

    #[serde(rename = "direcao", alias = "direction")]
    pub direction: Option<SortDirection>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClientOrdersParams {
    /// pending, completed, cancelled ou all
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientRemovalResponse {
    #[schema(example = "Cliente excluído.")]
    pub message: String,

    #[serde(rename = "resultado")]
    pub result: ClientRemoval,
}

// GET /clientes
#[utoipa::path(
    get,
    path = "/clientes",
    tag = "Clientes",
    params(ClientListParams),
    responses(
        (status = 200, description = "Lista de clientes", body = Vec<Client>),
        (status = 400, description = "Filtro inválido")
    )
)]
pub async fn list_clients(
    State(app_state): State<AppState>,
    locale: Locale,
    params: Result<Query<ClientListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|e| {
        AppError::InvalidFilter(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    let active = parse_filter::<bool>(params.active.as_deref())
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let query = ClientQuery {
        search: params.search.unwrap_or_default(),
        search_field: params.search_field.unwrap_or_default(),
        active,
        direction: params.direction.unwrap_or(SortDirection::Asc),
    };

    let clients = app_state
        .crm_service
        .list_clients(&query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(clients)))
}

// POST /cliente
#[utoipa::path(
    post,
    path = "/cliente",
    tag = "Clientes",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Cliente criado", body = Client),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CPF/CNPJ já está em uso")
    )
)]
pub async fn create_client(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<ClientPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::InvalidBody(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let client = app_state
        .crm_service
        .create_client(payload.into(), Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(client)))
}

// PUT /cliente/{id}
#[utoipa::path(
    put,
    path = "/cliente/{id}",
    tag = "Clientes",
    request_body = ClientPayload,
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente atualizado", body = Client),
        (status = 404, description = "Cliente não encontrado"),
        (status = 409, description = "CPF/CNPJ já está em uso")
    )
)]
pub async fn update_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    payload: Result<Json<ClientPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::InvalidBody(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let client = app_state
        .crm_service
        .update_client(id, payload.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(client)))
}

// DELETE /cliente/{id}
// Com pedidos o cliente é só desativado
#[utoipa::path(
    delete,
    path = "/cliente/{id}",
    tag = "Clientes",
    params(("id" = i64, Path, description = "ID do cliente")),
    responses(
        (status = 200, description = "Cliente excluído ou desativado", body = ClientRemovalResponse),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn delete_client(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let result = app_state
        .crm_service
        .delete_client(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    let key = match result {
        ClientRemoval::Deleted => "client_deleted",
        ClientRemoval::Deactivated => "client_deactivated",
    };
    let message = app_state.i18n_store.translate(&locale.0, key);

    Ok((StatusCode::OK, Json(ClientRemovalResponse { message, result })))
}

// GET /clientes/{id}/pedidos
#[utoipa::path(
    get,
    path = "/clientes/{id}/pedidos",
    tag = "Clientes",
    params(
        ("id" = i64, Path, description = "ID do cliente"),
        ClientOrdersParams
    ),
    responses(
        (status = 200, description = "Pedidos do cliente", body = Vec<Order>),
        (status = 400, description = "Status inválido"),
        (status = 404, description = "Cliente não encontrado")
    )
)]
pub async fn list_client_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    params: Result<Query<ClientOrdersParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|e| {
        AppError::InvalidFilter(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    let status = parse_filter::<OrderStatus>(params.status.as_deref())
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let orders = app_state
        .crm_service
        .list_client_orders(id, status)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(orders)))
}
