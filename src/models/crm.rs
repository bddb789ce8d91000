// src/models/crm.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// --- CLIENTE ---
// `active = false` é a exclusão lógica: o cliente some das operações,
// mas continua ligado ao histórico de pedidos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Client {
    pub id: i64,

    #[serde(rename = "nome", alias = "name")]
    #[schema(example = "Maria da Silva")]
    pub name: String,

    #[serde(rename = "cpfCnpj", alias = "cpf_cnpj")]
    #[schema(example = "12345678900")]
    pub cpf_cnpj: String,

    #[serde(rename = "contato", alias = "contact")]
    #[schema(example = "(11) 99999-0000")]
    pub contact: String,

    #[serde(rename = "endereco", alias = "address")]
    pub address: String,

    #[serde(rename = "ativo", alias = "isActive")]
    #[schema(example = true)]
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub cpf_cnpj: String,
    pub contact: String,
    pub address: String,
    // Só usado na edição (None mantém o valor atual)
    pub is_active: Option<bool>,
}

/// Resultado de um pedido de exclusão de cliente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClientRemoval {
    /// Sem pedidos: removido da coleção.
    Deleted,
    /// Com pedidos: apenas desativado.
    Deactivated,
}
