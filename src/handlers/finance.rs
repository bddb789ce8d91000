// src/handlers/finance.rs

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::{
        error::{ApiError, AppError},
        query::parse_filter,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::finance::{TransactionDetail, TransactionType},
    services::finance_service::TransactionQuery,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TransactionListParams {
    /// entrada, saida ou all
    #[serde(rename = "tipo", alias = "type")]
    pub kind: Option<String>,

    #[serde(rename = "data", alias = "date")]
    #[param(value_type = Option<String>, format = Date, example = "2024-05-01")]
    pub date: Option<NaiveDate>,
}

// GET /transacoes
#[utoipa::path(
    get,
    path = "/transacoes",
    tag = "Transações",
    params(TransactionListParams),
    responses(
        (status = 200, description = "Histórico com produto e origem", body = Vec<TransactionDetail>),
        (status = 400, description = "Filtro inválido")
    )
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    locale: Locale,
    params: Result<Query<TransactionListParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|e| {
        AppError::InvalidFilter(e.body_text()).to_api_error(&locale, &app_state.i18n_store)
    })?;

    let kind = parse_filter::<TransactionType>(params.kind.as_deref())
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let query = TransactionQuery {
        kind,
        date: params.date,
    };

    let history = app_state
        .finance_service
        .list_transactions(&query)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(history)))
}
