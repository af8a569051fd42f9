//! The catalog API client.
//!
//! [`ShopifyClient`] runs the four catalog operations against the Storefront
//! API and returns decoded entities. The [`CatalogApi`] trait abstracts over
//! it so the store and the presentation components accept any implementation.

use async_trait::async_trait;
use serde_json::json;
use thiserror::Error;

use crate::catalog::decode::{self, DecodeError};
use crate::catalog::queries;
use crate::catalog::types::{Collection, Product};
use crate::clients::{HttpError, HttpResponse, StorefrontClient};
use crate::config::PluginConfig;

/// Error type for catalog operations.
///
/// Callers that only need to know that the call failed (the store does)
/// can treat every variant alike.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request failed on the wire, or the response was not a `200` JSON
    /// response.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The response did not have the expected shape.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// The four catalog operations the field extension needs.
///
/// Implemented by [`ShopifyClient`]; tests provide their own.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Searches products by free text (empty text matches everything).
    async fn products_matching(&self, query: &str) -> Result<Vec<Product>, ApiError>;

    /// Searches collections by free text (empty text matches everything).
    async fn collections_matching(&self, query: &str) -> Result<Vec<Collection>, ApiError>;

    /// Fetches one product by handle.
    async fn product_by_handle(&self, handle: &str) -> Result<Product, ApiError>;

    /// Fetches one collection by handle, with its first products.
    async fn collection_by_handle(&self, handle: &str) -> Result<Collection, ApiError>;
}

/// Storefront-backed implementation of [`CatalogApi`].
///
/// # Example
///
/// ```rust,ignore
/// use shopify_product::{CatalogApi, PluginConfig, ShopifyClient};
///
/// let config = PluginConfig::from_parameters(&parameters)?;
/// let client = ShopifyClient::new(&config)?;
///
/// for product in client.products_matching("mens shirts").await? {
///     println!("{} ({})", product.title, product.handle);
/// }
/// ```
#[derive(Debug)]
pub struct ShopifyClient {
    storefront: StorefrontClient,
}

// Verify ShopifyClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ShopifyClient>();
};

impl ShopifyClient {
    /// Creates a client for the configured shop.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the HTTP client cannot be initialized.
    pub fn new(config: &PluginConfig) -> Result<Self, ApiError> {
        Ok(Self {
            storefront: StorefrontClient::new(config)?,
        })
    }

    /// Returns the URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.storefront.endpoint()
    }

    async fn fetch(
        &self,
        operation: &'static str,
        document: &str,
        variables: serde_json::Value,
    ) -> Result<HttpResponse, ApiError> {
        tracing::debug!(operation, %variables, "sending storefront query");
        let response = self.storefront.query(document, Some(variables)).await?;
        let errors = response.graphql_errors();
        if !errors.is_empty() {
            tracing::debug!(operation, ?errors, "storefront query returned GraphQL errors");
        }
        Ok(response)
    }
}

/// An empty search text is sent as `null` so Shopify applies no filter.
fn search_variables(query: &str) -> serde_json::Value {
    if query.is_empty() {
        json!({ "query": null })
    } else {
        json!({ "query": query })
    }
}

#[async_trait]
impl CatalogApi for ShopifyClient {
    async fn products_matching(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let response = self
            .fetch(
                "products_matching",
                &queries::search_products(),
                search_variables(query),
            )
            .await?;
        Ok(decode::decode_response(&response, |data| {
            decode::products_at(data, "/shop/products")
        })?)
    }

    async fn collections_matching(&self, query: &str) -> Result<Vec<Collection>, ApiError> {
        let response = self
            .fetch(
                "collections_matching",
                &queries::search_collections(),
                search_variables(query),
            )
            .await?;
        Ok(decode::decode_response(&response, |data| {
            decode::collections_at(data, "/collections")
        })?)
    }

    async fn product_by_handle(&self, handle: &str) -> Result<Product, ApiError> {
        let response = self
            .fetch(
                "product_by_handle",
                &queries::product_by_handle(),
                json!({ "handle": handle }),
            )
            .await?;
        Ok(decode::decode_response(&response, |data| {
            decode::product_at(data, "/shop/product")
        })?)
    }

    async fn collection_by_handle(&self, handle: &str) -> Result<Collection, ApiError> {
        let response = self
            .fetch(
                "collection_by_handle",
                &queries::collection_by_handle(),
                json!({ "handle": handle }),
            )
            .await?;
        Ok(decode::decode_response(&response, |data| {
            decode::collection_at(data, "/collection")
        })?)
    }
}
