//! Renderers for a field that holds an item.
//!
//! [`ProductValue`] shows the selected product, [`CollectionValue`] shows the
//! first products of the selected collection. Both fetch their entity when
//! loaded and then project whatever the store holds.

use crate::catalog::{CatalogApi, Product};
use crate::extension::PriceLabel;
use crate::store::{FetchOutcome, Status, Store};

/// A product as shown inside a value renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProductCard {
    pub title: String,
    /// Link to the product page; `None` for unpublished products.
    pub url: Option<String>,
    pub description: String,
    pub image_url: String,
    /// Shown as "Product type: …" when present.
    pub product_type: Option<String>,
    pub price: PriceLabel,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            url: product.online_store_url.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            product_type: Some(product.product_type.clone()).filter(|t| !t.is_empty()),
            price: PriceLabel::new(&product.price_range),
        }
    }
}

/// What a value renderer shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueView {
    pub handle: String,
    /// Rendered dimmed while loading.
    pub loading: bool,
    /// Error line shown when the fetch failed.
    pub error: Option<String>,
    pub products: Vec<ProductCard>,
}

impl ValueView {
    fn new(handle: &str, status: Status, products: Vec<ProductCard>) -> Self {
        Self {
            handle: handle.to_string(),
            loading: status == Status::Loading,
            error: (status == Status::Error).then(|| error_message(handle)),
            products,
        }
    }
}

fn error_message(handle: &str) -> String {
    format!("API Error! Could not fetch details for product: {handle}")
}

/// Renderer for a selected product.
#[derive(Debug)]
pub struct ProductValue<'a> {
    store: &'a Store,
    handle: String,
}

impl<'a> ProductValue<'a> {
    pub fn new(store: &'a Store, handle: impl Into<String>) -> Self {
        Self {
            store,
            handle: handle.into(),
        }
    }

    /// Fetches the product.
    pub async fn load<A>(&self, api: &A) -> FetchOutcome
    where
        A: CatalogApi + ?Sized,
    {
        self.store.fetch_product_by_handle(api, &self.handle).await
    }

    #[must_use]
    pub fn view(&self) -> ValueView {
        let lookup = self.store.product(&self.handle);
        let products = lookup.result.iter().map(ProductCard::from).collect();
        ValueView::new(&self.handle, lookup.status, products)
    }
}

/// Renderer for a selected collection.
#[derive(Debug)]
pub struct CollectionValue<'a> {
    store: &'a Store,
    handle: String,
}

impl<'a> CollectionValue<'a> {
    pub fn new(store: &'a Store, handle: impl Into<String>) -> Self {
        Self {
            store,
            handle: handle.into(),
        }
    }

    /// Fetches the collection with its first products.
    pub async fn load<A>(&self, api: &A) -> FetchOutcome
    where
        A: CatalogApi + ?Sized,
    {
        self.store.fetch_collection_by_handle(api, &self.handle).await
    }

    #[must_use]
    pub fn view(&self) -> ValueView {
        let lookup = self.store.collection(&self.handle);
        let products = lookup
            .result
            .iter()
            .flat_map(|collection| collection.products.iter().map(ProductCard::from))
            .collect();
        ValueView::new(&self.handle, lookup.status, products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfetched_value_is_loading() {
        let store = Store::in_memory();
        let view = ProductValue::new(&store, "shirt").view();
        assert!(view.loading);
        assert_eq!(view.error, None);
        assert!(view.products.is_empty());
    }

    #[test]
    fn test_error_message_names_the_handle() {
        let view = ValueView::new("frontpage", Status::Error, Vec::new());
        assert!(!view.loading);
        assert_eq!(
            view.error.as_deref(),
            Some("API Error! Could not fetch details for product: frontpage")
        );
    }
}
