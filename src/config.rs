// src/config.rs

use std::env;
use std::sync::Arc;

use axum::extract::FromRef;

use crate::{
    common::i18n::I18nStore,
    db::Store,
    services::{
        crm_service::CrmService, finance_service::FinanceService,
        inventory_service::InventoryService, operation_service::OperationsService,
        supplier_service::SupplierService,
    },
};

/// Configuração lida do ambiente (`.env` opcional).
#[derive(Debug, Clone)]
pub struct Settings {
    pub server_addr: String,
    pub default_locale: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_addr: "0.0.0.0:3000".to_string(),
            default_locale: "pt".to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            default_locale: env::var("DEFAULT_LOCALE").unwrap_or(defaults.default_locale),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub i18n_store: Arc<I18nStore>,
    pub supplier_service: SupplierService,
    pub inventory_service: InventoryService,
    pub crm_service: CrmService,
    pub operations_service: OperationsService,
    pub finance_service: FinanceService,
}

impl AppState {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let i18n_store = Arc::new(I18nStore::load(&settings.default_locale)?);
        Ok(Self::with_store(Store::new(), i18n_store))
    }

    // --- Monta o gráfico de dependências ---
    // Todos os serviços compartilham o mesmo estado
    pub fn with_store(store: Store, i18n_store: Arc<I18nStore>) -> Self {
        Self {
            supplier_service: SupplierService::new(store.clone()),
            inventory_service: InventoryService::new(store.clone()),
            crm_service: CrmService::new(store.clone()),
            operations_service: OperationsService::new(store.clone()),
            finance_service: FinanceService::new(store),
            i18n_store,
        }
    }
}

impl FromRef<AppState> for Arc<I18nStore> {
    fn from_ref(state: &AppState) -> Self {
        state.i18n_store.clone()
    }
}
