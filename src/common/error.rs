use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::common::i18n::I18nStore;
use crate::middleware::i18n::Locale;
use crate::models::operations::OrderStatus;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    #[error("CNPJ já cadastrado: {0}")]
    DuplicateCnpj(String),

    #[error("CPF/CNPJ já está em uso: {0}")]
    DuplicateCpfCnpj(String),

    #[error("Fornecedor não encontrado: {0}")]
    SupplierNotFound(i64),

    #[error("Produto não encontrado: {0}")]
    ProductNotFound(i64),

    #[error("Cliente não encontrado: {0}")]
    ClientNotFound(i64),

    #[error("Pedido não encontrado: {0}")]
    OrderNotFound(i64),

    #[error("Estoque insuficiente para o produto {product_id}: disponível {available}, solicitado {requested}")]
    InsufficientStock {
        product_id: i64,
        available: i64,
        requested: i64,
    },

    #[error("Transição de status inválida: {from} -> {to}")]
    InvalidStatusTransition { from: OrderStatus, to: OrderStatus },

    #[error("Pedido não está pendente: {0}")]
    OrderNotEditable(i64),

    #[error("Pedido possui transações: {0}")]
    OrderHasTransactions(i64),

    #[error("Filtro inválido: {0}")]
    InvalidFilter(String),

    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(String),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

/// Erro já traduzido, pronto para virar resposta HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            message: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidFilter(_) | AppError::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::DuplicateCnpj(_)
            | AppError::DuplicateCpfCnpj(_)
            | AppError::OrderHasTransactions(_) => StatusCode::CONFLICT,
            AppError::SupplierNotFound(_)
            | AppError::ProductNotFound(_)
            | AppError::ClientNotFound(_)
            | AppError::OrderNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsufficientStock { .. }
            | AppError::InvalidStatusTransition { .. }
            | AppError::OrderNotEditable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Traduz o erro para o idioma da requisição.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let id_arg = |id: &i64| [("id", id.to_string())];

        let message = match self {
            AppError::ValidationError(errors) => {
                let mut details = BTreeMap::new();
                collect_field_messages("", errors, lang, i18n, &mut details);
                return ApiError {
                    status: self.status(),
                    message: i18n.translate(lang, "validation_failed"),
                    details: Some(details),
                };
            }
            AppError::DuplicateCnpj(_) => i18n.translate(lang, "duplicate_cnpj"),
            AppError::DuplicateCpfCnpj(_) => i18n.translate(lang, "duplicate_cpf_cnpj"),
            AppError::SupplierNotFound(id) => {
                i18n.translate_with(lang, "supplier_not_found", &id_arg(id))
            }
            AppError::ProductNotFound(id) => {
                i18n.translate_with(lang, "product_not_found", &id_arg(id))
            }
            AppError::ClientNotFound(id) => i18n.translate_with(lang, "client_not_found", &id_arg(id)),
            AppError::OrderNotFound(id) => i18n.translate_with(lang, "order_not_found", &id_arg(id)),
            AppError::InsufficientStock {
                product_id,
                available,
                requested,
            } => i18n.translate_with(
                lang,
                "insufficient_stock",
                &[
                    ("id", product_id.to_string()),
                    ("available", available.to_string()),
                    ("requested", requested.to_string()),
                ],
            ),
            AppError::InvalidStatusTransition { from, to } => i18n.translate_with(
                lang,
                "invalid_status_transition",
                &[("from", from.to_string()), ("to", to.to_string())],
            ),
            AppError::OrderNotEditable(id) => {
                i18n.translate_with(lang, "order_not_editable", &id_arg(id))
            }
            AppError::OrderHasTransactions(id) => {
                i18n.translate_with(lang, "order_has_transactions", &id_arg(id))
            }
            AppError::InvalidFilter(value) => {
                i18n.translate_with(lang, "invalid_filter", &[("value", value.clone())])
            }
            AppError::InvalidBody(reason) => {
                i18n.translate_with(lang, "invalid_body", &[("value", reason.clone())])
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                i18n.translate(lang, "internal_error")
            }
        };

        ApiError {
            status: self.status(),
            message,
            details: None,
        }
    }
}

// O validator usa o nome do campo em Rust; a resposta usa o nome do JSON
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

// Achata os erros (inclusive de listas aninhadas, ex: "itens[0].quantidade")
fn collect_field_messages(
    prefix: &str,
    errors: &ValidationErrors,
    lang: &str,
    i18n: &I18nStore,
    out: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let field = camel_case(field);
        let path = if prefix.is_empty() {
            field
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages = field_errors
                    .iter()
                    .map(|e| {
                        let key = e.message.as_deref().unwrap_or("invalid_field");
                        i18n.translate(lang, key)
                    })
                    .collect();
                out.insert(path, messages);
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_field_messages(&path, inner, lang, i18n, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_messages(&format!("{path}[{index}]"), inner, lang, i18n, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    fn store() -> I18nStore {
        I18nStore::load("pt").unwrap()
    }

    #[test]
    fn validation_errors_are_translated_per_field() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("cnpj");
        err.message = Some("invalid_cnpj".into());
        errors.add("cnpj", err);

        let api = AppError::ValidationError(errors).to_api_error(&Locale("en".into()), &store());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "One or more fields are invalid.");
        let details = api.details.unwrap();
        assert_eq!(details["cnpj"], vec!["The CNPJ must contain exactly 14 digits."]);
    }

    #[test]
    fn detail_keys_follow_the_json_field_names() {
        let mut item = ValidationErrors::new();
        let mut err = ValidationError::new("range");
        err.message = Some("quantity_range".into());
        item.add("quantidade", err);

        let mut errors = ValidationErrors::new();
        errors.add("cpf_cnpj", ValidationError::new("blank"));
        errors
            .errors_mut()
            .insert("itens".into(), ValidationErrorsKind::List([(0, Box::new(item))].into()));

        let api = AppError::ValidationError(errors).to_api_error(&Locale("pt".into()), &store());
        let details = api.details.unwrap();
        assert!(details.contains_key("cpfCnpj"));
        assert_eq!(
            details["itens[0].quantidade"],
            vec!["A quantidade deve ser um número inteiro entre 1 e 1000000000."]
        );
    }

    #[test]
    fn malformed_body_is_a_bad_request() {
        let api = AppError::InvalidBody("estoque".into())
            .to_api_error(&Locale("pt".into()), &store());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.message, "Corpo da requisição inválido: estoque");
        assert!(api.details.is_none());
    }

    #[test]
    fn business_errors_map_to_status_codes() {
        let locale = Locale("pt".into());
        let conflict = AppError::DuplicateCnpj("123".into()).to_api_error(&locale, &store());
        assert_eq!(conflict.status, StatusCode::CONFLICT);
        assert_eq!(conflict.message, "CNPJ já cadastrado.");

        let stock = AppError::InsufficientStock {
            product_id: 7,
            available: 1,
            requested: 3,
        }
        .to_api_error(&locale, &store());
        assert_eq!(stock.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(stock.message.contains("#7"));
    }
}
