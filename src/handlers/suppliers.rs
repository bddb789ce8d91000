// src/handlers/suppliers.rs

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
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        query::SortDirection,
        validation::{validate_cnpj, validate_not_blank},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::suppliers::{NewSupplier, Supplier},
    services::supplier_service::{SupplierQuery, SupplierSortField},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayload {
    #[serde(alias = "name")]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Acme")]
    pub nome: String,

    #[validate(custom(function = "validate_cnpj"))]
    #[schema(example = "12.345.678/0001-90")]
    pub cnpj: String,

    #[serde(alias = "contact")]
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "contato@acme.com")]
    pub contato: String,

    #[serde(alias = "address", default)]
    #[schema(example = "Rua das Flores, 10")]
    pub endereco: String,
}

impl From<SupplierPayload> for NewSupplier {
    fn from(payload: SupplierPayload) -> Self {
        Self {
            name: payload.nome,
            cnpj: payload.cnpj,
            contact: payload.contato,
            address: payload.endereco,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SupplierListParams {
    /// Termo buscado no nome ou no contato
    #[serde(rename = "busca", alias = "search")]
    pub search: Option<String>,

    #[serde(rename = "ordenarPor", alias = "sortBy")]
    pub sort_by: Option<SupplierSortField>,

    #[serde(rename = "direcao", alias = "direction")]
    pub direction: Option<SortDirection>,
}

// GET /fornecedores
#[utoipa::path(
    get,
    path = "/fornecedores",
    tag = "Fornecedores",
    params(SupplierListParams),
    responses(
        (status = 200, description = "Lista de fornecedores", body = Vec<Supplier>),
        (status = 400, description = "Filtro inválido")
    )
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
    locale: Locale,
    params: Result<Query<SupplierListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|e| {
        AppError::InvalidFilter(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    let query = SupplierQuery {
        search: params.search.unwrap_or_default(),
        sort_by: params.sort_by.unwrap_or_default(),
        direction: params.direction.unwrap_or(SortDirection::Asc),
    };

    let suppliers = app_state
        .supplier_service
        .list_suppliers(&query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(suppliers)))
}

// POST /fornecedor
#[utoipa::path(
    post,
    path = "/fornecedor",
    tag = "Fornecedores",
    request_body = SupplierPayload,
    responses(
        (status = 201, description = "Fornecedor criado", body = Supplier),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CNPJ já cadastrado")
    )
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    payload: Result<Json<SupplierPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::InvalidBody(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .supplier_service
        .create_supplier(payload.into(), Utc::now())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(supplier)))
}

// PUT /fornecedor/{id}
#[utoipa::path(
    put,
    path = "/fornecedor/{id}",
    tag = "Fornecedores",
    request_body = SupplierPayload,
    params(("id" = i64, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor atualizado", body = Supplier),
        (status = 404, description = "Fornecedor não encontrado"),
        (status = 409, description = "CNPJ já cadastrado")
    )
)]
pub async fn update_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
    payload: Result<Json<SupplierPayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::InvalidBody(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .supplier_service
        .update_supplier(id, payload.into())
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(supplier)))
}

// DELETE /fornecedor/{id}
#[utoipa::path(
    delete,
    path = "/fornecedor/{id}",
    tag = "Fornecedores",
    params(("id" = i64, Path, description = "ID do fornecedor")),
    responses(
        (status = 204, description = "Fornecedor excluído"),
        (status = 404, description = "Fornecedor não encontrado")
    )
)]
pub async fn delete_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .supplier_service
        .delete_supplier(id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
