// src/common/validation.rs
//
// Validações customizadas usadas nos payloads (`#[validate(custom(...))]`).
// A mensagem é sempre uma chave do catálogo de i18n.

use rust_decimal::Decimal;
use validator::ValidationError;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Mantém só os dígitos ("12.345.678/0001-90" -> "12345678000190").
pub fn normalize_digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("not_blank", "not_blank"));
    }
    Ok(())
}

/// Teto de preço unitário. Estoque e quantidades ficam limitados a 1 bilhão
/// nos payloads, então preço x quantidade nunca sai do alcance do `Decimal`.
pub const MAX_PRICE: i64 = 1_000_000_000;

pub fn validate_positive_price(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = error("range", "price_positive");
        err.add_param("min".into(), &0.0);
        return Err(err);
    }
    if *value > Decimal::from(MAX_PRICE) {
        let mut err = error("range", "price_too_high");
        err.add_param("max".into(), &MAX_PRICE);
        return Err(err);
    }
    Ok(())
}

pub fn validate_cnpj(value: &str) -> Result<(), ValidationError> {
    if normalize_digits(value).len() != 14 {
        return Err(error("cnpj", "invalid_cnpj"));
    }
    Ok(())
}
