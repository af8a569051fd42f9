//! Plugin configuration.
//!
//! The CMS host stores the plugin parameters as a JSON object with
//! `shopifyDomain` and `storefrontAccessToken` keys. [`PluginConfig`] is the
//! validated form of those parameters, built either from the host JSON via
//! [`PluginConfig::from_parameters`] or programmatically with
//! [`PluginConfigBuilder`].
//!
//! # Example
//!
//! ```rust
//! use shopify_product::PluginConfig;
//! use serde_json::json;
//!
//! let config = PluginConfig::from_parameters(&json!({
//!     "shopifyDomain": "my-store",
//!     "storefrontAccessToken": "public-token",
//! }))
//! .unwrap();
//!
//! assert_eq!(config.graphql_endpoint(), "https://my-store.myshopify.com/api/graphql");
//! ```

mod newtypes;

pub use newtypes::{EndpointUrl, ShopDomain, StorefrontAccessToken, ACCESS_TOKEN_HEADER};

use serde::Deserialize;

use crate::error::ConfigError;

/// Validated configuration for the Storefront API client.
#[derive(Clone, Debug)]
pub struct PluginConfig {
    shop_domain: ShopDomain,
    access_token: StorefrontAccessToken,
    endpoint: Option<EndpointUrl>,
    user_agent_prefix: Option<String>,
}

/// Raw parameters as the CMS host stores them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PluginParameters {
    shopify_domain: Option<String>,
    storefront_access_token: Option<String>,
}

impl PluginConfig {
    /// Creates a new builder for constructing a `PluginConfig`.
    #[must_use]
    pub fn builder() -> PluginConfigBuilder {
        PluginConfigBuilder::new()
    }

    /// Builds a configuration from the host's plugin parameters.
    ///
    /// Unknown keys are ignored. A `null` parameters object is treated like an
    /// empty one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameters`] if the value is not an
    /// object, [`ConfigError::MissingRequiredField`] if a key is absent or
    /// empty, and the newtype errors if a value does not validate.
    pub fn from_parameters(parameters: &serde_json::Value) -> Result<Self, ConfigError> {
        let parameters = match parameters {
            serde_json::Value::Null => PluginParameters::default(),
            serde_json::Value::Object(_) => PluginParameters::deserialize(parameters).map_err(
                |e| ConfigError::InvalidParameters {
                    reason: e.to_string(),
                },
            )?,
            other => {
                return Err(ConfigError::InvalidParameters {
                    reason: format!("expected a JSON object, got {other}"),
                })
            }
        };

        let domain = parameters
            .shopify_domain
            .filter(|d| !d.trim().is_empty())
            .ok_or(ConfigError::MissingRequiredField {
                field: "shopifyDomain",
            })?;
        let token = parameters
            .storefront_access_token
            .filter(|t| !t.trim().is_empty())
            .ok_or(ConfigError::MissingRequiredField {
                field: "storefrontAccessToken",
            })?;

        Self::builder()
            .shop_domain(ShopDomain::new(domain)?)
            .access_token(StorefrontAccessToken::new(token)?)
            .build()
    }

    /// Returns the shop domain.
    #[must_use]
    pub const fn shop_domain(&self) -> &ShopDomain {
        &self.shop_domain
    }

    /// Returns the Storefront access token.
    #[must_use]
    pub const fn access_token(&self) -> &StorefrontAccessToken {
        &self.access_token
    }

    /// Returns the endpoint override, if configured.
    #[must_use]
    pub const fn endpoint(&self) -> Option<&EndpointUrl> {
        self.endpoint.as_ref()
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the URL every GraphQL request is posted to.
    ///
    /// This is `https://{shop}.myshopify.com/api/graphql` unless an endpoint
    /// override is configured.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        self.endpoint.as_ref().map_or_else(
            || self.shop_domain.graphql_endpoint(),
            EndpointUrl::graphql_endpoint,
        )
    }
}

// Verify PluginConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<PluginConfig>();
};

/// Builder for constructing [`PluginConfig`] instances.
///
/// `shop_domain` and `access_token` are required.
///
/// # Example
///
/// ```rust
/// use shopify_product::{PluginConfig, ShopDomain, StorefrontAccessToken, EndpointUrl};
///
/// let config = PluginConfig::builder()
///     .shop_domain(ShopDomain::new("my-store").unwrap())
///     .access_token(StorefrontAccessToken::new("token").unwrap())
///     .endpoint(EndpointUrl::new("http://localhost:9000").unwrap())
///     .user_agent_prefix("MyCms/2.0")
///     .build()
///     .unwrap();
///
/// assert_eq!(config.graphql_endpoint(), "http://localhost:9000/api/graphql");
/// ```
#[derive(Debug, Default)]
pub struct PluginConfigBuilder {
    shop_domain: Option<ShopDomain>,
    access_token: Option<StorefrontAccessToken>,
    endpoint: Option<EndpointUrl>,
    user_agent_prefix: Option<String>,
}

impl PluginConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the shop domain (required).
    #[must_use]
    pub fn shop_domain(mut self, domain: ShopDomain) -> Self {
        self.shop_domain = Some(domain);
        self
    }

    /// Sets the Storefront access token (required).
    #[must_use]
    pub fn access_token(mut self, token: StorefrontAccessToken) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Routes requests to `endpoint` instead of the shop's own domain.
    #[must_use]
    pub fn endpoint(mut self, endpoint: EndpointUrl) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Builds the [`PluginConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `shop_domain` or
    /// `access_token` are not set.
    pub fn build(self) -> Result<PluginConfig, ConfigError> {
        let shop_domain = self.shop_domain.ok_or(ConfigError::MissingRequiredField {
            field: "shop_domain",
        })?;
        let access_token = self.access_token.ok_or(ConfigError::MissingRequiredField {
            field: "access_token",
        })?;

        Ok(PluginConfig {
            shop_domain,
            access_token,
            endpoint: self.endpoint,
            user_agent_prefix: self.user_agent_prefix,
        })
    }
}
