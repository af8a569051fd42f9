//! Storefront GraphQL client.
//!
//! [`StorefrontClient`] sends a `{query, variables}` body to the shop's
//! Storefront endpoint and hands back the validated [`HttpResponse`]. It knows
//! nothing about products or collections; see [`crate::catalog`] for that.
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_product::clients::StorefrontClient;
//! use serde_json::json;
//!
//! let client = StorefrontClient::new(&config)?;
//! let response = client
//!     .query(
//!         "query getProduct($handle: String!) { shop { product: productByHandle(handle: $handle) { title } } }",
//!         Some(json!({ "handle": "my-product" })),
//!     )
//!     .await?;
//! println!("{:?}", response.data());
//! ```

use crate::clients::errors::HttpError;
use crate::clients::storefront::storefront_http::StorefrontHttpClient;
use crate::clients::HttpResponse;
use crate::config::PluginConfig;

/// GraphQL client for the Shopify Storefront API.
///
/// `StorefrontClient` is `Send + Sync`, so one instance can be shared by all
/// components of the field extension.
#[derive(Debug)]
pub struct StorefrontClient {
    http_client: StorefrontHttpClient,
}

// Verify StorefrontClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StorefrontClient>();
};

impl StorefrontClient {
    /// Creates a new client for the configured shop.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::Network`] if the underlying HTTP client cannot be
    /// initialized (for example when no TLS backend is available).
    pub fn new(config: &PluginConfig) -> Result<Self, HttpError> {
        let http_client = StorefrontHttpClient::new(config)?;
        tracing::debug!(endpoint = http_client.endpoint(), "created storefront client");
        Ok(Self { http_client })
    }

    /// Returns the URL requests are posted to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.http_client.endpoint()
    }

    /// Executes a GraphQL query.
    ///
    /// `variables` is sent as `null` when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for network failures, any status other than
    /// `200`, a response not declared as JSON, or an unparseable body.
    /// GraphQL-level errors arrive with status `200` and are left in
    /// `response.body["errors"]`.
    pub async fn query(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
    ) -> Result<HttpResponse, HttpError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables
        });

        self.http_client.post(&body).await
    }
}
