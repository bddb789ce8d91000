// src/common/query.rs
//
// Blocos comuns de busca e ordenação usados pelas listagens.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Deserialize;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};
use utoipa::ToSchema;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Busca por substring sem diferenciar maiúsculas. Termo vazio casa com tudo.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

// "Ação" -> "acao"
fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Comparação de textos no estilo `localeCompare`: ignora acentos e caixa,
/// desempatando pelo texto original.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

/// Lê um filtro opcional da query string. `all` (ou vazio) significa sem filtro.
pub fn parse_filter<T: FromStr>(raw: Option<&str>) -> Result<Option<T>, AppError> {
    match raw.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::InvalidFilter(value.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::operations::OrderStatus;

    #[test]
    fn locale_compare_ignores_accents_and_case() {
        let mut names = vec!["Óleo", "abacaxi", "Banana", "ação"];
        names.sort_by(|a, b| locale_compare(a, b));
        assert_eq!(names, vec!["abacaxi", "ação", "Banana", "Óleo"]);
    }

    #[test]
    fn contains_is_case_insensitive() {
        assert!(contains_ignore_case("Papelaria Central", "central"));
        assert!(contains_ignore_case("qualquer", ""));
        assert!(!contains_ignore_case("Acme", "beta"));
    }

    #[test]
    fn parse_filter_handles_all_and_invalid_values() {
        assert_eq!(parse_filter::<OrderStatus>(Some("all")).unwrap(), None);
        assert_eq!(parse_filter::<OrderStatus>(None).unwrap(), None);
        assert_eq!(
            parse_filter::<OrderStatus>(Some("pending")).unwrap(),
            Some(OrderStatus::Pending)
        );
        assert!(matches!(
            parse_filter::<OrderStatus>(Some("shipped")),
            Err(AppError::InvalidFilter(v)) if v == "shipped"
        ));
    }
}
