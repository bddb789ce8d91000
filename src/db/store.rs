// src/db/store.rs
//
// Estado da aplicação em memória: as cinco coleções de entidades.
// Toda escrita troca a coleção inteira (sem patch parcial), e as transições
// que mexem em várias coleções passam por `Store::dispatch`, que aplica
// tudo ou nada.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    common::error::AppError,
    models::{
        crm::Client, finance::Transaction, inventory::Product, operations::Order,
        suppliers::Supplier,
    },
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppStore {
    pub products: Vec<Product>,
    pub suppliers: Vec<Supplier>,
    pub clients: Vec<Client>,
    pub orders: Vec<Order>,
    pub transactions: Vec<Transaction>,
    last_id: i64,
}

impl AppStore {
    /// Gera um id a partir do instante de criação (milissegundos).
    /// Nunca repete: se o relógio não andou, usa o último id + 1.
    pub fn next_id(&mut self, now: DateTime<Utc>) -> i64 {
        self.last_id = now.timestamp_millis().max(self.last_id + 1);
        self.last_id
    }

    pub fn with_products(mut self, products: Vec<Product>) -> Self {
        self.products = products;
        self
    }

    pub fn with_suppliers(mut self, suppliers: Vec<Supplier>) -> Self {
        self.suppliers = suppliers;
        self
    }

    pub fn with_clients(mut self, clients: Vec<Client>) -> Self {
        self.clients = clients;
        self
    }

    pub fn with_orders(mut self, orders: Vec<Order>) -> Self {
        self.orders = orders;
        self
    }

    pub fn with_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = transactions;
        self
    }

    pub fn find_product(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn find_supplier(&self, id: i64) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == id)
    }

    pub fn find_client(&self, id: i64) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn find_order(&self, id: i64) -> Option<&Order> {
        self.orders.iter().find(|o| o.id == id)
    }

    // Garante que ids vindos de fora (seed/import) não colidam com os gerados
    fn highest_id(&self) -> i64 {
        let ids = self
            .products
            .iter()
            .map(|p| p.id)
            .chain(self.suppliers.iter().map(|s| s.id))
            .chain(self.clients.iter().map(|c| c.id))
            .chain(self.orders.iter().map(|o| o.id))
            .chain(self.transactions.iter().map(|t| t.id));
        ids.max().unwrap_or(0).max(self.last_id)
    }
}

/// Handle compartilhado do estado. Clonar só copia o `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<AppStore>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cópia consistente de todas as coleções.
    pub async fn snapshot(&self) -> AppStore {
        self.inner.read().await.clone()
    }

    pub async fn products(&self) -> Vec<Product> {
        self.inner.read().await.products.clone()
    }

    pub async fn suppliers(&self) -> Vec<Supplier> {
        self.inner.read().await.suppliers.clone()
    }

    pub async fn clients(&self) -> Vec<Client> {
        self.inner.read().await.clients.clone()
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.inner.read().await.orders.clone()
    }

    pub async fn transactions(&self) -> Vec<Transaction> {
        self.inner.read().await.transactions.clone()
    }

    pub async fn set_products(&self, products: Vec<Product>) {
        self.replace(|state| state.with_products(products)).await;
    }

    pub async fn set_suppliers(&self, suppliers: Vec<Supplier>) {
        self.replace(|state| state.with_suppliers(suppliers)).await;
    }

    pub async fn set_clients(&self, clients: Vec<Client>) {
        self.replace(|state| state.with_clients(clients)).await;
    }

    pub async fn set_orders(&self, orders: Vec<Order>) {
        self.replace(|state| state.with_orders(orders)).await;
    }

    pub async fn set_transactions(&self, transactions: Vec<Transaction>) {
        self.replace(|state| state.with_transactions(transactions)).await;
    }

    async fn replace(&self, update: impl FnOnce(AppStore) -> AppStore) {
        let mut guard = self.inner.write().await;
        let mut next = update((*guard).clone());
        next.last_id = next.highest_id();
        *guard = next;
    }

    /// Aplica uma transição pura sobre o estado atual.
    ///
    /// O redutor recebe o estado corrente e devolve o novo estado completo
    /// junto com um valor de retorno. Em caso de erro nada é alterado.
    pub async fn dispatch<T, F>(&self, reducer: F) -> Result<T, AppError>
    where
        F: FnOnce(&AppStore) -> Result<(AppStore, T), AppError>,
    {
        let mut guard = self.inner.write().await;
        let (next, output) = reducer(&*guard)?;
        *guard = next;
        Ok(output)
    }
}
