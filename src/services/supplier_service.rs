// src/services/supplier_service.rs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::{
        error::AppError,
        query::{contains_ignore_case, locale_compare, SortDirection},
        validation::normalize_digits,
    },
    db::{AppStore, Store},
    models::suppliers::{NewSupplier, Supplier},
};

// =========================================================================
//  REDUTORES (puros: estado atual -> novo estado)
// =========================================================================

fn ensure_unique_cnpj(
    suppliers: &[Supplier],
    cnpj: &str,
    current_id: Option<i64>,
) -> Result<(), AppError> {
    let taken = suppliers
        .iter()
        .any(|s| s.cnpj == cnpj && Some(s.id) != current_id);
    if taken {
        return Err(AppError::DuplicateCnpj(cnpj.to_string()));
    }
    Ok(())
}

pub fn add_supplier(
    state: &AppStore,
    input: NewSupplier,
    now: DateTime<Utc>,
) -> Result<(AppStore, Supplier), AppError> {
    let cnpj = normalize_digits(&input.cnpj);
    ensure_unique_cnpj(&state.suppliers, &cnpj, None)?;

    let mut next = state.clone();
    let supplier = Supplier {
        id: next.next_id(now),
        name: input.name.trim().to_string(),
        cnpj,
        contact: input.contact.trim().to_string(),
        address: input.address,
    };

    let mut suppliers = state.suppliers.clone();
    suppliers.push(supplier.clone());
    Ok((next.with_suppliers(suppliers), supplier))
}

pub fn update_supplier(
    state: &AppStore,
    id: i64,
    input: NewSupplier,
) -> Result<(AppStore, Supplier), AppError> {
    state.find_supplier(id).ok_or(AppError::SupplierNotFound(id))?;

    let cnpj = normalize_digits(&input.cnpj);
    ensure_unique_cnpj(&state.suppliers, &cnpj, Some(id))?;

    let updated = Supplier {
        id,
        name: input.name.trim().to_string(),
        cnpj,
        contact: input.contact.trim().to_string(),
        address: input.address,
    };

    let suppliers = state
        .suppliers
        .iter()
        .map(|s| if s.id == id { updated.clone() } else { s.clone() })
        .collect();
    Ok((state.clone().with_suppliers(suppliers), updated))
}

/// Exclusão física. Produtos que apontavam para o fornecedor ficam sem vínculo.
pub fn remove_supplier(state: &AppStore, id: i64) -> Result<(AppStore, Supplier), AppError> {
    let removed = state
        .find_supplier(id)
        .cloned()
        .ok_or(AppError::SupplierNotFound(id))?;

    let suppliers = state.suppliers.iter().filter(|s| s.id != id).cloned().collect();
    let products = state
        .products
        .iter()
        .cloned()
        .map(|mut p| {
            if p.supplier_id == Some(id) {
                p.supplier_id = None;
            }
            p
        })
        .collect();

    Ok((
        state.clone().with_suppliers(suppliers).with_products(products),
        removed,
    ))
}

// =========================================================================
//  BUSCA E ORDENAÇÃO
// =========================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub enum SupplierSortField {
    #[default]
    #[serde(rename = "nome", alias = "name")]
    Name,
    #[serde(rename = "contato", alias = "contact")]
    Contact,
}

#[derive(Debug, Clone)]
pub struct SupplierQuery {
    pub search: String,
    pub sort_by: SupplierSortField,
    pub direction: SortDirection,
}

impl Default for SupplierQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_by: SupplierSortField::Name,
            direction: SortDirection::Asc,
        }
    }
}

/// Busca em nome OU contato; ordena pelo campo escolhido.
pub fn filter_and_sort(suppliers: &[Supplier], query: &SupplierQuery) -> Vec<Supplier> {
    let mut result: Vec<Supplier> = suppliers
        .iter()
        .filter(|s| {
            contains_ignore_case(&s.name, &query.search)
                || contains_ignore_case(&s.contact, &query.search)
        })
        .cloned()
        .collect();

    result.sort_by(|a, b| {
        let ordering = match query.sort_by {
            SupplierSortField::Name => locale_compare(&a.name, &b.name),
            SupplierSortField::Contact => locale_compare(&a.contact, &b.contact),
        };
        query.direction.apply(ordering)
    });
    result
}

// =========================================================================
//  SERVIÇO
// =========================================================================

#[derive(Clone)]
pub struct SupplierService {
    store: Store,
}

impl SupplierService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list_suppliers(&self, query: &SupplierQuery) -> Result<Vec<Supplier>, AppError> {
        let suppliers = self.store.suppliers().await;
        Ok(filter_and_sort(&suppliers, query))
    }

    pub async fn create_supplier(
        &self,
        input: NewSupplier,
        now: DateTime<Utc>,
    ) -> Result<Supplier, AppError> {
        let supplier = self
            .store
            .dispatch(|state| add_supplier(state, input, now))
            .await?;
        tracing::info!("Fornecedor {} cadastrado ({})", supplier.id, supplier.name);
        Ok(supplier)
    }

    pub async fn update_supplier(&self, id: i64, input: NewSupplier) -> Result<Supplier, AppError> {
        let supplier = self
            .store
            .dispatch(|state| update_supplier(state, id, input))
            .await?;
        tracing::info!("Fornecedor {} atualizado", id);
        Ok(supplier)
    }

    pub async fn delete_supplier(&self, id: i64) -> Result<Supplier, AppError> {
        let removed = self.store.dispatch(|state| remove_supplier(state, id)).await?;
        tracing::info!("Fornecedor {} excluído", id);
        Ok(removed)
    }
}
