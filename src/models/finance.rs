// src/models/finance.rs

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Entrada, // Entrada de estoque
    Saida,   // Saída de estoque
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entrada" => Ok(TransactionType::Entrada),
            "saida" => Ok(TransactionType::Saida),
            other => Err(other.to_string()),
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Transaction {
    pub id: i64,

    #[serde(rename = "tipo", alias = "type")]
    pub kind: TransactionType,

    #[serde(rename = "data", alias = "date")]
    #[schema(value_type = String, format = Date, example = "2024-05-01")]
    pub date: NaiveDate,

    #[serde(rename = "produtoId", alias = "productId")]
    pub product_id: i64,

    #[serde(rename = "quantidade", alias = "quantity")]
    pub quantity: i64,

    #[serde(rename = "valorTotal", alias = "totalValue")]
    #[schema(value_type = f64, example = 20.0)]
    pub total_value: Decimal,

    // Vínculo opcional com o pedido que gerou a saída
    #[serde(rename = "pedidoId", alias = "orderId", default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,

    #[serde(rename = "descricao", alias = "description")]
    #[schema(example = "Pedido #1717000000000")]
    pub description: String,
}

// Transação pronta para exibição no histórico
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TransactionDetail {
    #[serde(flatten)]
    pub transaction: Transaction,

    #[serde(rename = "produto")]
    #[schema(example = "Caneta Azul")]
    pub product_name: String,

    #[serde(rename = "origem")]
    #[schema(example = "Movimentação manual")]
    pub origin: String,
}
