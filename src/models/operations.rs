// src/models/operations.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// pending -> completed | cancelled. Os outros dois são terminais.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Completed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(other.to_string()),
        }
    }
}

// --- Structs de Operação ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    #[serde(rename = "produtoId", alias = "productId")]
    pub product_id: i64,

    #[serde(rename = "quantidade", alias = "quantity")]
    #[schema(example = 2)]
    pub quantity: i64,

    // Preço unitário congelado no momento do pedido
    #[serde(rename = "preco", alias = "price")]
    #[schema(value_type = f64, example = 10.0)]
    pub price: Decimal,
}

impl OrderItem {
    /// `None` se o produto estourar o alcance do `Decimal`.
    pub fn subtotal(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i64,

    #[serde(rename = "clienteId", alias = "clientId")]
    pub client_id: i64,

    #[serde(rename = "data", alias = "date")]
    pub date: DateTime<Utc>,

    pub status: OrderStatus,

    #[serde(rename = "itens", alias = "items")]
    pub items: Vec<OrderItem>,

    #[schema(value_type = f64, example = 20.0)]
    pub total: Decimal,
}

/// Soma de preço x quantidade de todos os itens (`None` em caso de estouro).
pub fn order_total(items: &[OrderItem]) -> Option<Decimal> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| total.checked_add(item.subtotal()?))
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub client_id: i64,
    pub items: Vec<NewOrderItem>,
}

// Pedido + nome do cliente para a listagem
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,

    #[serde(rename = "cliente")]
    pub client_name: Option<String>,
}
