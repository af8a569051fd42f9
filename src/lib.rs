//! # Shopify Product Field
//!
//! A headless-CMS field extension that lets an editor pick a Shopify product
//! or collection and stores the choice as a `{handle, type}` reference.
//!
//! ## Overview
//!
//! This crate provides:
//! - Plugin configuration via [`PluginConfig`], read from the host's plugin
//!   parameters or built with [`PluginConfigBuilder`]
//! - A Storefront GraphQL client, [`ShopifyClient`], behind the [`CatalogApi`]
//!   trait
//! - A persisted catalog cache, [`Store`], with per-key loading/success/error
//!   state
//! - Presentation components in [`extension`]: the field entrypoint, the empty
//!   placeholder, browse modals and value renderers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use serde_json::json;
//! use shopify_product::{CatalogApi, FileStorage, PluginConfig, ShopifyClient, Store};
//!
//! let config = PluginConfig::from_parameters(&json!({
//!     "shopifyDomain": "my-store",
//!     "storefrontAccessToken": "storefront-token",
//! }))?;
//! let client = ShopifyClient::new(&config)?;
//! let store = Store::new(Arc::new(FileStorage::new("state")));
//!
//! store.fetch_products_matching(&client, "mens shirts").await;
//! for product in store.current_search().results.unwrap_or_default() {
//!     println!("{} ({})", product.title, product.handle);
//! }
//! ```
//!
//! ## Field Extension
//!
//! ```rust,ignore
//! use shopify_product::extension::{FieldExtension, FieldRender};
//!
//! let field = FieldExtension::new(host);
//! let client = field.client()?;
//! match field.render(&store, &client).await? {
//!     FieldRender::Empty(empty) => { /* show empty.buttons() */ }
//!     FieldRender::Value(view) => { /* show view.products */ }
//!     FieldRender::Nothing => {}
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: the store and the client are passed explicitly
//! - **Fail-fast validation**: configuration newtypes validate on construction
//! - **Thread-safe**: the client and the store are `Send + Sync`
//! - **Last request wins**: a stale response never overwrites a newer one

pub mod catalog;
pub mod clients;
pub mod config;
pub mod error;
pub mod extension;
pub mod store;

// Re-export public types at crate root for convenience
pub use catalog::{
    ApiError, CatalogApi, Collection, DecodeError, Item, ItemKind, Money, PriceRange, Product,
    ShopifyClient,
};
pub use config::{EndpointUrl, PluginConfig, PluginConfigBuilder, ShopDomain, StorefrontAccessToken};
pub use error::ConfigError;
pub use store::{
    FetchOutcome, FileStorage, MemoryStorage, StateStorage, Status, StorageError, Store,
};

// Re-export HTTP client types
pub use clients::{HttpError, HttpResponse, HttpResponseError, InvalidContentTypeError};
