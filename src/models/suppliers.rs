// src/models/suppliers.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Supplier {
    pub id: i64,

    #[serde(rename = "nome", alias = "name")]
    #[schema(example = "Acme")]
    pub name: String,

    // Sempre guardado só com dígitos (14)
    #[schema(example = "12345678901234")]
    pub cnpj: String,

    #[serde(rename = "contato", alias = "contact")]
    #[schema(example = "contato@acme.com")]
    pub contact: String,

    #[serde(rename = "endereco", alias = "address")]
    #[schema(example = "Rua das Flores, 10")]
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct NewSupplier {
    pub name: String,
    pub cnpj: String,
    pub contact: String,
    pub address: String,
}
