// src/services/operation_service.rs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::{
        error::AppError,
        query::{contains_ignore_case, SortDirection},
    },
    db::{AppStore, Store},
    models::{
        finance::TransactionType,
        operations::{order_total, NewOrder, NewOrderItem, Order, OrderDetail, OrderItem, OrderStatus},
    },
    services::finance_service,
};

// Quantidade total pedida por produto (itens repetidos são somados).
// Satura em i64::MAX, que nunca cabe no estoque.
fn sum_per_product(items: impl IntoIterator<Item = (i64, i64)>) -> BTreeMap<i64, i64> {
    let mut totals = BTreeMap::new();
    for (product_id, quantity) in items {
        let total: &mut i64 = totals.entry(product_id).or_insert(0);
        *total = total.saturating_add(quantity);
    }
    totals
}

fn requested_per_product(items: &[NewOrderItem]) -> BTreeMap<i64, i64> {
    sum_per_product(items.iter().map(|i| (i.product_id, i.quantity)))
}

fn quantities_of(items: &[OrderItem]) -> BTreeMap<i64, i64> {
    sum_per_product(items.iter().map(|i| (i.product_id, i.quantity)))
}

fn checked_total(items: &[OrderItem]) -> Result<Decimal, AppError> {
    order_total(items).ok_or_else(|| {
        AppError::InternalServerError(anyhow::anyhow!("Total do pedido fora do alcance"))
    })
}

// Congela o preço atual de cada produto nos itens
fn price_items(state: &AppStore, items: &[NewOrderItem]) -> Result<Vec<OrderItem>, AppError> {
    items
        .iter()
        .map(|item| {
            let product = state
                .find_product(item.product_id)
                .ok_or(AppError::ProductNotFound(item.product_id))?;
            Ok(OrderItem {
                product_id: item.product_id,
                quantity: item.quantity,
                price: product.price,
            })
        })
        .collect()
}

fn ensure_stock(state: &AppStore, product_id: i64, requested: i64) -> Result<(), AppError> {
    let product = state
        .find_product(product_id)
        .ok_or(AppError::ProductNotFound(product_id))?;
    if requested > product.stock {
        return Err(AppError::InsufficientStock {
            product_id,
            available: product.stock,
            requested,
        });
    }
    Ok(())
}

fn adjust_stock(state: &mut AppStore, product_id: i64, delta: i64) {
    if let Some(product) = state.products.iter_mut().find(|p| p.id == product_id) {
        product.stock += delta;
    }
}

// =========================================================================
//  1. PEDIDOS (REDUTORES)
// =========================================================================

/// Cria o pedido, baixa o estoque e registra uma saída por item.
/// Tudo acontece sobre a mesma cópia do estado: ou entra tudo, ou nada.
pub fn place_order(
    state: &AppStore,
    input: NewOrder,
    now: DateTime<Utc>,
) -> Result<(AppStore, Order), AppError> {
    let client = state
        .find_client(input.client_id)
        .ok_or(AppError::ClientNotFound(input.client_id))?;
    if !client.is_active {
        tracing::warn!("Pedido para cliente inativo {}", client.id);
    }

    let items = price_items(state, &input.items)?;
    for (product_id, requested) in requested_per_product(&input.items) {
        ensure_stock(state, product_id, requested)?;
    }

    let mut next = state.clone();
    let order_id = next.next_id(now);

    for item in &items {
        let movement = finance_service::order_movement(
            &mut next,
            now,
            TransactionType::Saida,
            item.product_id,
            item.quantity,
            item.price,
            order_id,
        )?;
        next.transactions.push(movement);
        adjust_stock(&mut next, item.product_id, -item.quantity);
    }

    let order = Order {
        id: order_id,
        client_id: input.client_id,
        date: now,
        status: OrderStatus::Pending,
        total: checked_total(&items)?,
        items,
    };
    next.orders.push(order.clone());
    Ok((next, order))
}

/// Troca os itens de um pedido pendente, conciliando o estoque pela diferença
/// de quantidade de cada produto.
pub fn update_order_items(
    state: &AppStore,
    id: i64,
    items: Vec<NewOrderItem>,
    now: DateTime<Utc>,
) -> Result<(AppStore, Order), AppError> {
    let current = state.find_order(id).ok_or(AppError::OrderNotFound(id))?;
    if current.status != OrderStatus::Pending {
        return Err(AppError::OrderNotEditable(id));
    }

    let new_items = price_items(state, &items)?;
    let before = quantities_of(&current.items);
    let after = requested_per_product(&items);

    let mut product_ids: Vec<i64> = before.keys().chain(after.keys()).copied().collect();
    product_ids.sort_unstable();
    product_ids.dedup();

    let deltas: Vec<(i64, i64)> = product_ids
        .into_iter()
        .map(|pid| {
            let old = before.get(&pid).copied().unwrap_or(0);
            let new = after.get(&pid).copied().unwrap_or(0);
            (pid, new - old)
        })
        .filter(|(_, delta)| *delta != 0)
        .collect();

    for (product_id, delta) in &deltas {
        if *delta > 0 {
            ensure_stock(state, *product_id, *delta)?;
        }
    }

    let mut next = state.clone();
    for (product_id, delta) in deltas {
        // Produto removido do catálogo: nada para devolver
        let Some(product) = next.find_product(product_id) else {
            continue;
        };
        let price = product.price;
        let kind = if delta > 0 {
            TransactionType::Saida
        } else {
            TransactionType::Entrada
        };
        let movement = finance_service::order_movement(
            &mut next,
            now,
            kind,
            product_id,
            delta.abs(),
            price,
            id,
        )?;
        next.transactions.push(movement);
        adjust_stock(&mut next, product_id, -delta);
    }

    let updated = Order {
        total: checked_total(&new_items)?,
        items: new_items,
        ..current.clone()
    };
    let orders = next
        .orders
        .iter()
        .map(|o| if o.id == id { updated.clone() } else { o.clone() })
        .collect();
    Ok((next.with_orders(orders), updated))
}

/// Cancelar não devolve estoque.
pub fn change_status(
    state: &AppStore,
    id: i64,
    status: OrderStatus,
) -> Result<(AppStore, Order), AppError> {
    let current = state.find_order(id).ok_or(AppError::OrderNotFound(id))?;
    if !current.status.can_transition_to(status) {
        return Err(AppError::InvalidStatusTransition {
            from: current.status,
            to: status,
        });
    }

    let updated = Order {
        status,
        ..current.clone()
    };
    let orders = state
        .orders
        .iter()
        .map(|o| if o.id == id { updated.clone() } else { o.clone() })
        .collect();
    Ok((state.clone().with_orders(orders), updated))
}

pub fn remove_order(state: &AppStore, id: i64) -> Result<(AppStore, Order), AppError> {
    let removed = state
        .find_order(id)
        .cloned()
        .ok_or(AppError::OrderNotFound(id))?;
    if state.transactions.iter().any(|t| t.order_id == Some(id)) {
        return Err(AppError::OrderHasTransactions(id));
    }
    let orders = state.orders.iter().filter(|o| o.id != id).cloned().collect();
    Ok((state.clone().with_orders(orders), removed))
}

// =========================================================================
//  2. BUSCA
// =========================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub enum OrderSortField {
    #[default]
    #[serde(rename = "data", alias = "date")]
    Date,
    #[serde(rename = "total")]
    Total,
}

#[derive(Debug, Clone)]
pub struct OrderQuery {
    pub search: String,
    pub status: Option<OrderStatus>,
    pub date: Option<NaiveDate>,
    pub sort_by: OrderSortField,
    pub direction: SortDirection,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
            date: None,
            sort_by: OrderSortField::Date,
            direction: SortDirection::Desc,
        }
    }
}

/// Busca pelo número do pedido ou pelo nome do cliente.
pub fn filter_and_sort(state: &AppStore, query: &OrderQuery) -> Vec<OrderDetail> {
    let mut result: Vec<OrderDetail> = state
        .orders
        .iter()
        .map(|order| OrderDetail {
            client_name: state.find_client(order.client_id).map(|c| c.name.clone()),
            order: order.clone(),
        })
        .filter(|d| {
            let client_name = d.client_name.as_deref().unwrap_or_default();
            d.order.id.to_string().contains(query.search.trim())
                || contains_ignore_case(client_name, &query.search)
        })
        .filter(|d| query.status.is_none_or(|s| d.order.status == s))
        .filter(|d| query.date.is_none_or(|date| d.order.date.date_naive() == date))
        .collect();

    result.sort_by(|a, b| {
        let ordering = match query.sort_by {
            OrderSortField::Date => a.order.date.cmp(&b.order.date),
            OrderSortField::Total => a.order.total.cmp(&b.order.total),
        };
        query.direction.apply(ordering.then(a.order.id.cmp(&b.order.id)))
    });
    result
}

// =========================================================================
//  3. SERVIÇO
// =========================================================================

#[derive(Clone)]
pub struct OperationsService {
    store: Store,
}

impl OperationsService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list_orders(&self, query: &OrderQuery) -> Result<Vec<OrderDetail>, AppError> {
        let state = self.store.snapshot().await;
        Ok(filter_and_sort(&state, query))
    }

    pub async fn create_order(&self, input: NewOrder, now: DateTime<Utc>) -> Result<Order, AppError> {
        let order = self
            .store
            .dispatch(|state| place_order(state, input, now))
            .await?;
        tracing::info!(
            "Pedido {} criado para o cliente {} (total {})",
            order.id,
            order.client_id,
            order.total
        );
        Ok(order)
    }

    pub async fn update_order_items(
        &self,
        id: i64,
        items: Vec<NewOrderItem>,
        now: DateTime<Utc>,
    ) -> Result<Order, AppError> {
        let order = self
            .store
            .dispatch(|state| update_order_items(state, id, items, now))
            .await?;
        tracing::info!("Pedido {} alterado (total {})", id, order.total);
        Ok(order)
    }

    pub async fn update_status(&self, id: i64, status: OrderStatus) -> Result<Order, AppError> {
        let order = self
            .store
            .dispatch(|state| change_status(state, id, status))
            .await?;
        tracing::info!("Pedido {} agora está {}", id, order.status);
        Ok(order)
    }

    pub async fn delete_order(&self, id: i64) -> Result<Order, AppError> {
        let removed = self.store.dispatch(|state| remove_order(state, id)).await?;
        tracing::info!("Pedido {} excluído", id);
        Ok(removed)
    }
}
