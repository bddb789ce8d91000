// src/services/crm_service.rs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::{
        error::AppError,
        query::{contains_ignore_case, locale_compare, SortDirection},
    },
    db::{AppStore, Store},
    models::{
        crm::{Client, ClientRemoval, NewClient},
        operations::{Order, OrderStatus},
    },
};

// =========================================================================
//  1. CLIENTES (REDUTORES)
// =========================================================================

fn ensure_unique_document(
    clients: &[Client],
    cpf_cnpj: &str,
    current_id: Option<i64>,
) -> Result<(), AppError> {
    // Vale também para clientes inativos
    if clients
        .iter()
        .any(|c| c.cpf_cnpj == cpf_cnpj && Some(c.id) != current_id)
    {
        return Err(AppError::DuplicateCpfCnpj(cpf_cnpj.to_string()));
    }
    Ok(())
}

pub fn add_client(
    state: &AppStore,
    input: NewClient,
    now: DateTime<Utc>,
) -> Result<(AppStore, Client), AppError> {
    let cpf_cnpj = input.cpf_cnpj.trim().to_string();
    ensure_unique_document(&state.clients, &cpf_cnpj, None)?;

    let mut next = state.clone();
    let client = Client {
        id: next.next_id(now),
        name: input.name.trim().to_string(),
        cpf_cnpj,
        contact: input.contact.trim().to_string(),
        address: input.address,
        is_active: true,
    };

    let mut clients = state.clients.clone();
    clients.push(client.clone());
    Ok((next.with_clients(clients), client))
}

pub fn update_client(
    state: &AppStore,
    id: i64,
    input: NewClient,
) -> Result<(AppStore, Client), AppError> {
    let current = state.find_client(id).ok_or(AppError::ClientNotFound(id))?;

    let cpf_cnpj = input.cpf_cnpj.trim().to_string();
    ensure_unique_document(&state.clients, &cpf_cnpj, Some(id))?;

    let updated = Client {
        id,
        name: input.name.trim().to_string(),
        cpf_cnpj,
        contact: input.contact.trim().to_string(),
        address: input.address,
        is_active: input.is_active.unwrap_or(current.is_active),
    };

    let clients = state
        .clients
        .iter()
        .map(|c| if c.id == id { updated.clone() } else { c.clone() })
        .collect();
    Ok((state.clone().with_clients(clients), updated))
}

/// Cliente com pedidos é apenas desativado; sem pedidos, é removido.
pub fn remove_client(state: &AppStore, id: i64) -> Result<(AppStore, ClientRemoval), AppError> {
    state.find_client(id).ok_or(AppError::ClientNotFound(id))?;

    let has_orders = state.orders.iter().any(|o| o.client_id == id);
    if has_orders {
        let clients = state
            .clients
            .iter()
            .cloned()
            .map(|mut c| {
                if c.id == id {
                    c.is_active = false;
                }
                c
            })
            .collect();
        return Ok((state.clone().with_clients(clients), ClientRemoval::Deactivated));
    }

    let clients = state.clients.iter().filter(|c| c.id != id).cloned().collect();
    Ok((state.clone().with_clients(clients), ClientRemoval::Deleted))
}

// =========================================================================
//  2. BUSCA
// =========================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub enum ClientSearchField {
    #[default]
    #[serde(rename = "nome", alias = "name")]
    Name,
    #[serde(rename = "cpfCnpj", alias = "cpf_cnpj")]
    CpfCnpj,
}

#[derive(Debug, Clone)]
pub struct ClientQuery {
    pub search: String,
    pub search_field: ClientSearchField,
    pub active: Option<bool>,
    pub direction: SortDirection,
}

impl Default for ClientQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            search_field: ClientSearchField::Name,
            active: None,
            direction: SortDirection::Asc,
        }
    }
}

pub fn filter_and_sort(clients: &[Client], query: &ClientQuery) -> Vec<Client> {
    let mut result: Vec<Client> = clients
        .iter()
        .filter(|c| {
            let field = match query.search_field {
                ClientSearchField::Name => &c.name,
                ClientSearchField::CpfCnpj => &c.cpf_cnpj,
            };
            contains_ignore_case(field, &query.search)
        })
        .filter(|c| query.active.is_none_or(|active| c.is_active == active))
        .cloned()
        .collect();

    result.sort_by(|a, b| query.direction.apply(locale_compare(&a.name, &b.name)));
    result
}

/// Pedidos de um cliente, opcionalmente só de um status.
pub fn client_orders(
    state: &AppStore,
    client_id: i64,
    status: Option<OrderStatus>,
) -> Result<Vec<Order>, AppError> {
    state
        .find_client(client_id)
        .ok_or(AppError::ClientNotFound(client_id))?;

    Ok(state
        .orders
        .iter()
        .filter(|o| o.client_id == client_id)
        .filter(|o| status.is_none_or(|s| o.status == s))
        .cloned()
        .collect())
}

// =========================================================================
//  3. SERVIÇO
// =========================================================================

#[derive(Clone)]
pub struct CrmService {
    store: Store,
}

impl CrmService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list_clients(&self, query: &ClientQuery) -> Result<Vec<Client>, AppError> {
        let clients = self.store.clients().await;
        Ok(filter_and_sort(&clients, query))
    }

    pub async fn create_client(&self, input: NewClient, now: DateTime<Utc>) -> Result<Client, AppError> {
        let client = self
            .store
            .dispatch(|state| add_client(state, input, now))
            .await?;
        tracing::info!("Cliente {} cadastrado ({})", client.id, client.name);
        Ok(client)
    }

    pub async fn update_client(&self, id: i64, input: NewClient) -> Result<Client, AppError> {
        let client = self
            .store
            .dispatch(|state| update_client(state, id, input))
            .await?;
        tracing::info!("Cliente {} atualizado", id);
        Ok(client)
    }

    pub async fn delete_client(&self, id: i64) -> Result<ClientRemoval, AppError> {
        let removal = self.store.dispatch(|state| remove_client(state, id)).await?;
        match removal {
            ClientRemoval::Deleted => tracing::info!("Cliente {} excluído", id),
            ClientRemoval::Deactivated => {
                tracing::warn!("Cliente {} possui pedidos: desativado em vez de excluído", id)
            }
        }
        Ok(removal)
    }

    pub async fn list_client_orders(
        &self,
        client_id: i64,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, AppError> {
        let state = self.store.snapshot().await;
        client_orders(&state, client_id, status)
    }
}
