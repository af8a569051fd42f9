//! Shopify catalog access.
//!
//! This module turns Storefront GraphQL responses into the entities the field
//! extension works with:
//!
//! - [`ShopifyClient`]: product/collection search and lookup by handle
//! - [`CatalogApi`]: the trait the store and components are written against
//! - [`Product`], [`Collection`], [`Item`]: normalized entities
//! - [`DecodeError`]: structured errors for responses of the wrong shape

mod client;
pub mod decode;
pub mod queries;
mod types;

pub use client::{ApiError, CatalogApi, ShopifyClient};
pub use decode::DecodeError;
pub use types::{Collection, Item, ItemKind, Money, PriceRange, Product};
