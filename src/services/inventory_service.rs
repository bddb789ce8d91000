// src/services/inventory_service.rs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::{
        error::AppError,
        query::{contains_ignore_case, locale_compare, SortDirection},
    },
    db::{AppStore, Store},
    models::inventory::{NewProduct, Product, ProductDetail, StockReportEntry},
    services::finance_service,
};

fn ensure_supplier_exists(state: &AppStore, supplier_id: Option<i64>) -> Result<(), AppError> {
    match supplier_id {
        Some(id) if state.find_supplier(id).is_none() => Err(AppError::SupplierNotFound(id)),
        _ => Ok(()),
    }
}

// --- CREATE PRODUCT ---
pub fn add_product(
    state: &AppStore,
    input: NewProduct,
    now: DateTime<Utc>,
) -> Result<(AppStore, Product), AppError> {
    ensure_supplier_exists(state, input.supplier_id)?;

    let mut next = state.clone();
    let product = Product {
        id: next.next_id(now),
        name: input.name.trim().to_string(),
        category: input.category.trim().to_string(),
        price: input.price,
        stock: input.stock,
        supplier_id: input.supplier_id,
        image: input.image,
    };

    let mut products = state.products.clone();
    products.push(product.clone());
    Ok((next.with_products(products), product))
}

// --- UPDATE PRODUCT ---
// Se o estoque mudou, registra a diferença como movimentação manual
// (entrada ou saída) junto com a troca do produto.
pub fn update_product(
    state: &AppStore,
    id: i64,
    input: NewProduct,
    now: DateTime<Utc>,
) -> Result<(AppStore, Product), AppError> {
    let original = state.find_product(id).ok_or(AppError::ProductNotFound(id))?;
    ensure_supplier_exists(state, input.supplier_id)?;

    let updated = Product {
        id,
        name: input.name.trim().to_string(),
        category: input.category.trim().to_string(),
        price: input.price,
        stock: input.stock,
        supplier_id: input.supplier_id,
        image: input.image,
    };

    let mut next = state.clone();
    let stock_difference = updated.stock - original.stock;
    if let Some(movement) =
        finance_service::manual_adjustment(&mut next, now, &updated, stock_difference)?
    {
        tracing::debug!(
            "Produto {}: ajuste manual de estoque ({:+})",
            id,
            stock_difference
        );
        next.transactions.push(movement);
    }

    let products = state
        .products
        .iter()
        .map(|p| if p.id == id { updated.clone() } else { p.clone() })
        .collect();
    Ok((next.with_products(products), updated))
}

// --- DELETE PRODUCT ---
// O histórico continua apontando para o id; a leitura mostra "Produto não encontrado".
pub fn remove_product(state: &AppStore, id: i64) -> Result<(AppStore, Product), AppError> {
    let removed = state
        .find_product(id)
        .cloned()
        .ok_or(AppError::ProductNotFound(id))?;
    let products = state.products.iter().filter(|p| p.id != id).cloned().collect();
    Ok((state.clone().with_products(products), removed))
}

// =========================================================================
//  BUSCA E ORDENAÇÃO
// =========================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub enum ProductSearchField {
    #[default]
    #[serde(rename = "nome", alias = "name")]
    Name,
    #[serde(rename = "fornecedor", alias = "supplier")]
    Supplier,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub enum ProductSortField {
    #[serde(rename = "nome", alias = "name")]
    Name,
    #[serde(rename = "categoria", alias = "category")]
    Category,
    #[default]
    #[serde(rename = "preco", alias = "price")]
    Price,
    #[serde(rename = "estoque", alias = "stock")]
    Stock,
    // preço x estoque
    #[serde(rename = "total")]
    Total,
}

#[derive(Debug, Clone)]
pub struct ProductQuery {
    pub search: String,
    pub search_field: ProductSearchField,
    /// Filtro extra pelo nome do fornecedor (relatório de estoque).
    pub supplier: String,
    pub sort_by: ProductSortField,
    pub direction: SortDirection,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            search_field: ProductSearchField::Name,
            supplier: String::new(),
            sort_by: ProductSortField::Price,
            direction: SortDirection::Asc,
        }
    }
}

fn detail(product: &Product, state: &AppStore) -> ProductDetail {
    let supplier_name = product
        .supplier_id
        .and_then(|id| state.find_supplier(id))
        .map(|s| s.name.clone());
    ProductDetail {
        product: product.clone(),
        supplier_name,
    }
}

pub fn filter_and_sort(state: &AppStore, query: &ProductQuery) -> Vec<ProductDetail> {
    let mut result: Vec<ProductDetail> = state
        .products
        .iter()
        .map(|p| detail(p, state))
        .filter(|d| {
            let supplier_name = d.supplier_name.as_deref().unwrap_or_default();
            let matches_search = match query.search_field {
                ProductSearchField::Name => contains_ignore_case(&d.product.name, &query.search),
                ProductSearchField::Supplier => contains_ignore_case(supplier_name, &query.search),
            };
            matches_search && contains_ignore_case(supplier_name, &query.supplier)
        })
        .collect();

    result.sort_by(|a, b| {
        let (a, b) = (&a.product, &b.product);
        let ordering = match query.sort_by {
            ProductSortField::Name => locale_compare(&a.name, &b.name),
            ProductSortField::Category => locale_compare(&a.category, &b.category),
            ProductSortField::Price => a.price.cmp(&b.price),
            ProductSortField::Stock => a.stock.cmp(&b.stock),
            ProductSortField::Total => a.stock_value().cmp(&b.stock_value()),
        };
        query.direction.apply(ordering)
    });
    result
}

pub fn stock_report(state: &AppStore, query: &ProductQuery) -> Vec<StockReportEntry> {
    filter_and_sort(state, query)
        .into_iter()
        .map(|detail| StockReportEntry {
            total_value: detail.product.stock_value(),
            detail,
        })
        .collect()
}

// =========================================================================
//  SERVIÇO
// =========================================================================

#[derive(Clone)]
pub struct InventoryService {
    store: Store,
}

impl InventoryService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list_products(&self, query: &ProductQuery) -> Result<Vec<ProductDetail>, AppError> {
        let state = self.store.snapshot().await;
        Ok(filter_and_sort(&state, query))
    }

    pub async fn stock_report(&self, query: &ProductQuery) -> Result<Vec<StockReportEntry>, AppError> {
        let state = self.store.snapshot().await;
        Ok(stock_report(&state, query))
    }

    pub async fn create_product(
        &self,
        input: NewProduct,
        now: DateTime<Utc>,
    ) -> Result<Product, AppError> {
        let product = self
            .store
            .dispatch(|state| add_product(state, input, now))
            .await?;
        tracing::info!("Produto {} cadastrado ({})", product.id, product.name);
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: i64,
        input: NewProduct,
        now: DateTime<Utc>,
    ) -> Result<Product, AppError> {
        let product = self
            .store
            .dispatch(|state| update_product(state, id, input, now))
            .await?;
        tracing::info!("Produto {} atualizado", id);
        Ok(product)
    }

    pub async fn delete_product(&self, id: i64) -> Result<Product, AppError> {
        let removed = self.store.dispatch(|state| remove_product(state, id)).await?;
        tracing::info!("Produto {} excluído", id);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use crate::models::{finance::TransactionType, suppliers::Supplier};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn input(name: &str, price: i64, stock: i64, supplier_id: Option<i64>) -> NewProduct {
        NewProduct {
            name: name.into(),
            category: "Geral".into(),
            price: Decimal::from(price),
            stock,
            supplier_id,
            image: "https://exemplo.com/p.png".into(),
        }
    }

    fn with_supplier() -> AppStore {
        AppStore::default().with_suppliers(vec![Supplier {
            id: 7,
            name: "Acme".into(),
            cnpj: "12345678901234".into(),
            contact: "x".into(),
            address: "y".into(),
        }])
    }

    #[test]
    fn unknown_supplier_is_rejected() {
        let err = add_product(&AppStore::default(), input("Caneta", 2, 5, Some(1)), now()).unwrap_err();
        assert!(matches!(err, AppError::SupplierNotFound(1)));
    }

    #[test]
    fn editing_stock_records_a_manual_transaction() {
        let (state, product) = add_product(&with_supplier(), input("Caneta", 2, 5, Some(7)), now()).unwrap();

        let (state, _) = update_product(&state, product.id, input("Caneta", 2, 8, Some(7)), now()).unwrap();
        assert_eq!(state.products[0].stock, 8);
        assert_eq!(state.transactions.len(), 1);
        assert_eq!(state.transactions[0].kind, TransactionType::Entrada);
        assert_eq!(state.transactions[0].quantity, 3);
        assert_eq!(state.transactions[0].total_value, Decimal::from(6));

        let (state, _) = update_product(&state, product.id, input("Caneta", 2, 1, Some(7)), now()).unwrap();
        assert_eq!(state.transactions.len(), 2);
        assert_eq!(state.transactions[1].kind, TransactionType::Saida);
        assert_eq!(state.transactions[1].quantity, 7);

        // Mesmo estoque: nada a registrar
        let (state, _) = update_product(&state, product.id, input("Caneta Azul", 3, 1, None), now()).unwrap();
        assert_eq!(state.transactions.len(), 2);
        assert_eq!(state.products[0].name, "Caneta Azul");
    }

    #[test]
    fn sorting_by_total_reverses_cleanly() {
        let mut state = with_supplier();
        for (name, price, stock) in [("A", 10, 1), ("B", 1, 3), ("C", 4, 4), ("D", 2, 12)] {
            state = add_product(&state, input(name, price, stock, None), now()).unwrap().0;
        }

        let asc_query = ProductQuery {
            sort_by: ProductSortField::Total,
            ..ProductQuery::default()
        };
        let desc_query = ProductQuery {
            direction: SortDirection::Desc,
            ..asc_query.clone()
        };

        let asc: Vec<i64> = filter_and_sort(&state, &asc_query).iter().map(|d| d.product.id).collect();
        let mut desc: Vec<i64> = filter_and_sort(&state, &desc_query).iter().map(|d| d.product.id).collect();
        desc.reverse();
        assert_eq!(asc, desc);

        let names: Vec<String> = filter_and_sort(&state, &asc_query)
            .into_iter()
            .map(|d| d.product.name)
            .collect();
        assert_eq!(names, vec!["B", "A", "C", "D"]);
    }

    #[test]
    fn search_by_supplier_uses_the_resolved_name() {
        let state = with_supplier();
        let (state, _) = add_product(&state, input("Caneta", 2, 5, Some(7)), now()).unwrap();
        let (state, _) = add_product(&state, input("Lápis", 1, 5, None), now()).unwrap();

        let by_supplier = ProductQuery {
            search: "acm".into(),
            search_field: ProductSearchField::Supplier,
            ..ProductQuery::default()
        };
        let found = filter_and_sort(&state, &by_supplier);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].supplier_name.as_deref(), Some("Acme"));

        let by_name = ProductQuery {
            search: "LÁP".into(),
            ..ProductQuery::default()
        };
        let found = filter_and_sort(&state, &by_name);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].supplier_name, None);
    }

    #[test]
    fn stock_report_carries_price_times_stock() {
        let (state, _) = add_product(&with_supplier(), input("Caneta", 3, 5, Some(7)), now()).unwrap();
        let report = stock_report(&state, &ProductQuery::default());
        assert_eq!(report[0].total_value, Decimal::from(15));
    }
}
