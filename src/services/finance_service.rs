// src/services/finance_service.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{AppStore, Store},
    models::{
        finance::{Transaction, TransactionDetail, TransactionType},
        inventory::Product,
    },
};

const PRODUCT_NOT_FOUND: &str = "Produto não encontrado";
const MANUAL_MOVEMENT: &str = "Movimentação manual";

pub fn order_description(order_id: i64) -> String {
    format!("Pedido #{}", order_id)
}

/// Preço x quantidade sem estourar. Os payloads limitam os dois lados,
/// então um estouro aqui indica dado inconsistente no estado.
pub fn line_total(unit_price: Decimal, quantity: i64) -> Result<Decimal, AppError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| amount_overflow(unit_price, quantity))
}

pub fn amount_overflow(unit_price: Decimal, quantity: i64) -> AppError {
    AppError::InternalServerError(anyhow::anyhow!(
        "Valor fora do alcance: {} x {}",
        unit_price,
        quantity
    ))
}

/// Movimento de estoque gerado por um pedido (um por item).
pub fn order_movement(
    state: &mut AppStore,
    now: DateTime<Utc>,
    kind: TransactionType,
    product_id: i64,
    quantity: i64,
    unit_price: Decimal,
    order_id: i64,
) -> Result<Transaction, AppError> {
    let total_value = line_total(unit_price, quantity)?;
    Ok(Transaction {
        id: state.next_id(now),
        kind,
        date: now.date_naive(),
        product_id,
        quantity,
        total_value,
        order_id: Some(order_id),
        description: order_description(order_id),
    })
}

/// Ajuste manual de estoque (edição direta do produto).
/// Diferença positiva vira entrada, negativa vira saída; zero não gera nada.
pub fn manual_adjustment(
    state: &mut AppStore,
    now: DateTime<Utc>,
    product: &Product,
    stock_difference: i64,
) -> Result<Option<Transaction>, AppError> {
    if stock_difference == 0 {
        return Ok(None);
    }

    let (kind, description) = if stock_difference > 0 {
        (TransactionType::Entrada, "Adição manual de estoque")
    } else {
        (TransactionType::Saida, "Remoção manual de estoque")
    };
    let quantity = stock_difference.abs();
    let total_value = line_total(product.price, quantity)?;

    Ok(Some(Transaction {
        id: state.next_id(now),
        kind,
        date: now.date_naive(),
        product_id: product.id,
        quantity,
        total_value,
        order_id: None,
        description: description.to_string(),
    }))
}

/// Junta a transação com o nome do produto e a origem (pedido ou manual).
pub fn describe(transaction: &Transaction, products: &[Product]) -> TransactionDetail {
    let product_name = products
        .iter()
        .find(|p| p.id == transaction.product_id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| PRODUCT_NOT_FOUND.to_string());

    let origin = match transaction.order_id {
        Some(order_id) => order_description(order_id),
        None => MANUAL_MOVEMENT.to_string(),
    };

    TransactionDetail {
        transaction: transaction.clone(),
        product_name,
        origin,
    }
}

#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub kind: Option<TransactionType>,
    pub date: Option<NaiveDate>,
}

pub fn history(state: &AppStore, query: &TransactionQuery) -> Vec<TransactionDetail> {
    state
        .transactions
        .iter()
        .filter(|t| query.kind.is_none_or(|kind| t.kind == kind))
        .filter(|t| query.date.is_none_or(|date| t.date == date))
        .map(|t| describe(t, &state.products))
        .collect()
}

#[derive(Clone)]
pub struct FinanceService {
    store: Store,
}

impl FinanceService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Histórico de transações, recalculado a cada chamada.
    pub async fn list_transactions(
        &self,
        query: &TransactionQuery,
    ) -> Result<Vec<TransactionDetail>, AppError> {
        let state = self.store.snapshot().await;
        Ok(history(&state, query))
    }
}
