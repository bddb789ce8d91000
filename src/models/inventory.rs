// src/models/inventory.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- Produto ---
// O vínculo com o fornecedor é pelo id (fornecedorId), nunca pelo nome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[schema(example = 1717000000000_i64)]
    pub id: i64,

    #[serde(rename = "nome", alias = "name")]
    #[schema(example = "Caneta Azul")]
    pub name: String,

    #[serde(rename = "categoria", alias = "category")]
    #[schema(example = "Papelaria")]
    pub category: String,

    #[serde(rename = "preco", alias = "price")]
    #[schema(value_type = f64, example = 2.5)]
    pub price: Decimal,

    #[serde(rename = "estoque", alias = "stock")]
    #[schema(example = 100)]
    pub stock: i64,

    #[serde(rename = "fornecedorId", alias = "supplierId", default)]
    pub supplier_id: Option<i64>,

    #[serde(rename = "imagem", alias = "image")]
    #[schema(example = "https://exemplo.com/caneta.png")]
    pub image: String,
}

impl Product {
    /// Valor parado em estoque (preço x quantidade). Satura em vez de estourar.
    pub fn stock_value(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.stock))
    }
}

/// Dados de criação/edição de um produto, já validados pelo handler.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub stock: i64,
    pub supplier_id: Option<i64>,
    pub image: String,
}

// Produto com o nome do fornecedor resolvido na leitura
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,

    #[serde(rename = "fornecedor")]
    #[schema(example = "Acme")]
    pub supplier_name: Option<String>,
}

// Linha do relatório de estoque
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StockReportEntry {
    #[serde(flatten)]
    pub detail: ProductDetail,

    #[serde(rename = "valorTotal")]
    #[schema(value_type = f64, example = 250.0)]
    pub total_value: Decimal,
}
