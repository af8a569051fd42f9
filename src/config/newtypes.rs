//! Validated newtype wrappers for configuration values.
//!
//! These wrappers validate their contents on construction, so the rest of the
//! crate never has to second-guess a domain or a token.

use crate::error::ConfigError;
use std::fmt;

/// HTTP header carrying the Storefront access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// A validated Shopify Storefront access token.
///
/// The `Debug` implementation masks the value so that tokens never end up in
/// logs.
///
/// # Example
///
/// ```rust
/// use shopify_product::StorefrontAccessToken;
///
/// let token = StorefrontAccessToken::new("shpat-123").unwrap();
/// assert_eq!(token.as_ref(), "shpat-123");
/// assert_eq!(format!("{:?}", token), "StorefrontAccessToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct StorefrontAccessToken(String);

impl StorefrontAccessToken {
    /// Creates a new validated access token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyAccessToken`] if the token is empty or
    /// whitespace only.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            return Err(ConfigError::EmptyAccessToken);
        }
        Ok(Self(token.to_string()))
    }

    /// Returns the name of the header the token is sent in.
    #[must_use]
    pub const fn header_name(&self) -> &'static str {
        ACCESS_TOKEN_HEADER
    }
}

impl AsRef<str> for StorefrontAccessToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StorefrontAccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StorefrontAccessToken(*****)")
    }
}

/// A validated Shopify shop domain.
///
/// The plugin is configured with the bare shop name (`my-store`), but the
/// full `my-store.myshopify.com` form is accepted as well.
///
/// # Example
///
/// ```rust
/// use shopify_product::ShopDomain;
///
/// let domain = ShopDomain::new("my-store").unwrap();
/// assert_eq!(domain.as_ref(), "my-store.myshopify.com");
/// assert_eq!(domain.shop_name(), "my-store");
///
/// let domain = ShopDomain::new("My-Store.myshopify.com").unwrap();
/// assert_eq!(domain.shop_name(), "my-store");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShopDomain {
    full_domain: String,
    shop_name_end: usize,
}

impl ShopDomain {
    const SUFFIX: &'static str = ".myshopify.com";

    /// Creates a new validated shop domain.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidShopDomain`] if the domain is invalid.
    pub fn new(domain: impl Into<String>) -> Result<Self, ConfigError> {
        let domain = domain.into();
        let domain = domain.trim().to_lowercase();

        if domain.is_empty() {
            return Err(ConfigError::InvalidShopDomain { domain });
        }

        let (shop_name, full_domain) = if let Some(shop_name) = domain.strip_suffix(Self::SUFFIX) {
            (shop_name.to_string(), domain)
        } else if domain.contains('.') {
            return Err(ConfigError::InvalidShopDomain { domain });
        } else {
            (domain.clone(), format!("{}{}", domain, Self::SUFFIX))
        };

        if !Self::is_valid_shop_name(&shop_name) {
            return Err(ConfigError::InvalidShopDomain {
                domain: full_domain,
            });
        }

        Ok(Self {
            shop_name_end: shop_name.len(),
            full_domain,
        })
    }

    /// Returns the shop name portion of the domain.
    #[must_use]
    pub fn shop_name(&self) -> &str {
        &self.full_domain[..self.shop_name_end]
    }

    /// Returns the Storefront GraphQL endpoint for this shop.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        format!("https://{}/api/graphql", self.full_domain)
    }

    fn is_valid_shop_name(name: &str) -> bool {
        if name.is_empty() || name.starts_with('-') || name.ends_with('-') {
            return false;
        }

        name.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }
}

impl AsRef<str> for ShopDomain {
    fn as_ref(&self) -> &str {
        &self.full_domain
    }
}

/// A validated base URL replacing `https://{shop}.myshopify.com`.
///
/// Used when requests go through a proxy, or against a local mock server in
/// tests. The GraphQL path is appended to it.
///
/// # Example
///
/// ```rust
/// use shopify_product::EndpointUrl;
///
/// let url = EndpointUrl::new("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(url.scheme(), "http");
/// assert_eq!(url.graphql_endpoint(), "http://127.0.0.1:8080/api/graphql");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointUrl {
    url: String,
    scheme_end: usize,
}

impl EndpointUrl {
    /// Creates a new validated endpoint URL.
    ///
    /// Trailing slashes are removed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEndpointUrl`] if the URL has no scheme or
    /// no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let url = url.trim().trim_end_matches('/').to_string();

        let scheme_end = url
            .find("://")
            .ok_or_else(|| ConfigError::InvalidEndpointUrl { url: url.clone() })?;

        let scheme = &url[..scheme_end];
        if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidEndpointUrl { url });
        }

        let remainder = &url[scheme_end + 3..];
        let host = remainder
            .find([':', '/', '?', '#'])
            .map_or(remainder, |i| &remainder[..i]);
        if host.is_empty() {
            return Err(ConfigError::InvalidEndpointUrl { url });
        }

        Ok(Self { url, scheme_end })
    }

    /// Returns the URL scheme (e.g., "https").
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.url[..self.scheme_end]
    }

    /// Returns the GraphQL endpoint under this base URL.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        format!("{}/api/graphql", self.url)
    }
}

impl AsRef<str> for EndpointUrl {
    fn as_ref(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_token_rejects_empty_string() {
        assert!(matches!(
            StorefrontAccessToken::new("   "),
            Err(ConfigError::EmptyAccessToken)
        ));
    }

    #[test]
    fn test_access_token_masks_value_in_debug() {
        let token = StorefrontAccessToken::new("super-secret").unwrap();
        let debug_output = format!("{:?}", token);
        assert_eq!(debug_output, "StorefrontAccessToken(*****)");
        assert!(!debug_output.contains("super-secret"));
    }

    #[test]
    fn test_access_token_header_name() {
        let token = StorefrontAccessToken::new("abc").unwrap();
        assert_eq!(token.header_name(), "X-Shopify-Storefront-Access-Token");
    }

    #[test]
    fn test_shop_domain_normalizes_short_name() {
        let domain = ShopDomain::new("my-store").unwrap();
        assert_eq!(domain.as_ref(), "my-store.myshopify.com");
        assert_eq!(
            domain.graphql_endpoint(),
            "https://my-store.myshopify.com/api/graphql"
        );
    }

    #[test]
    fn test_shop_domain_accepts_full_domain() {
        let domain = ShopDomain::new("  shop42.myshopify.com ").unwrap();
        assert_eq!(domain.shop_name(), "shop42");
    }

    #[test]
    fn test_shop_domain_rejects_foreign_domain() {
        assert!(ShopDomain::new("shop.example.com").is_err());
    }

    #[test]
    fn test_shop_domain_rejects_bad_characters() {
        assert!(ShopDomain::new("my_store").is_err());
        assert!(ShopDomain::new("-store").is_err());
        assert!(ShopDomain::new("").is_err());
    }

    #[test]
    fn test_endpoint_url_requires_scheme_and_host() {
        assert!(EndpointUrl::new("localhost:8080").is_err());
        assert!(EndpointUrl::new("http://").is_err());
        assert!(EndpointUrl::new("1http://host").is_err());
    }

    #[test]
    fn test_endpoint_url_strips_trailing_slash() {
        let url = EndpointUrl::new("https://proxy.example.com/shopify/").unwrap();
        assert_eq!(url.as_ref(), "https://proxy.example.com/shopify");
        assert_eq!(
            url.graphql_endpoint(),
            "https://proxy.example.com/shopify/api/graphql"
        );
    }
}
