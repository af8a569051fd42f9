//! Normalized catalog entities.
//!
//! These are the shapes the rest of the crate works with after the GraphQL
//! edge/node wrappers have been flattened. They serialize with camelCase keys,
//! which is also the layout of the persisted store.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What kind of entity an [`Item`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// A single product.
    Product,
    /// A collection of products.
    Collection,
}

impl ItemKind {
    /// Returns the name stored in the CMS field.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "Product",
            Self::Collection => "Collection",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reference persisted into the CMS field.
///
/// ```rust
/// use shopify_product::{Item, ItemKind};
///
/// let item = Item::collection("frontpage");
/// assert_eq!(
///     serde_json::to_string(&item).unwrap(),
///     r#"{"handle":"frontpage","type":"Collection"}"#
/// );
/// assert_eq!(item.kind, ItemKind::Collection);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// Shopify handle of the selected entity.
    pub handle: String,
    /// Kind of the selected entity.
    #[serde(rename = "type")]
    pub kind: ItemKind,
}

impl Item {
    /// Creates a product reference.
    #[must_use]
    pub fn product(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            kind: ItemKind::Product,
        }
    }

    /// Creates a collection reference.
    #[must_use]
    pub fn collection(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            kind: ItemKind::Collection,
        }
    }
}

/// A monetary amount.
///
/// `amount` is kept as the decimal string Shopify sends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Decimal amount, e.g. `"29.90"`.
    pub amount: String,
    /// ISO 4217 currency code, e.g. `"EUR"`.
    pub currency_code: String,
}

/// Cheapest and most expensive variant price of a product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    /// Price of the most expensive variant.
    pub max_variant_price: Money,
    /// Price of the cheapest variant.
    pub min_variant_price: Money,
}

/// A Shopify product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Global ID (`gid://shopify/Product/...`).
    #[serde(default)]
    pub id: Option<String>,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub product_type: String,
    /// `None` for products not published to the online store.
    pub online_store_url: Option<String>,
    #[serde(default)]
    pub available_for_sale: bool,
    /// URL of the first product image, or an empty string.
    pub image_url: String,
    pub price_range: PriceRange,
}

/// A Shopify collection with its first products.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    /// Up to ten products, in the order Shopify returned them.
    pub products: Vec<Product>,
}
