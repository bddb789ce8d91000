// src/middleware/i18n.rs

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts};

use crate::common::i18n::I18nStore;

// Extrator de idioma
pub struct Locale(pub String);

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
    Arc<I18nStore>: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let i18n = Arc::<I18nStore>::from_ref(state);

        let header_value = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        Ok(Locale(negotiate(header_value, &i18n)))
    }
}

/// Primeiro idioma suportado do cabeçalho ("pt-BR" -> "pt"); senão o padrão.
pub fn negotiate(header_value: &str, i18n: &I18nStore) -> String {
    accept_language::parse(header_value)
        .iter()
        .map(|tag| tag.split('-').next().unwrap_or(tag).to_lowercase())
        .find(|lang| i18n.supports(lang))
        .unwrap_or_else(|| i18n.default_locale().to_string())
}
