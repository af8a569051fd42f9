//! HTTP response type for Storefront API calls.

use std::collections::HashMap;

/// A parsed response from the Storefront API.
///
/// Header names are stored lowercased; a header may occur more than once.
///
/// # Example
///
/// ```rust
/// use shopify_product::HttpResponse;
/// use std::collections::HashMap;
/// use serde_json::json;
///
/// let mut headers = HashMap::new();
/// headers.insert("x-request-id".to_string(), vec!["abc-123".to_string()]);
///
/// let response = HttpResponse::new(200, headers, json!({"data": {"shop": {}}}));
/// assert!(response.is_ok());
/// assert_eq!(response.request_id(), Some("abc-123"));
/// assert!(response.data().is_some());
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercased name.
    pub headers: HashMap<String, Vec<String>>,
    /// Parsed JSON body.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new response.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        Self {
            code,
            headers,
            body,
        }
    }

    /// Returns `true` only for status `200`; the Storefront API answers every
    /// successful GraphQL request with exactly that status.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code == 200
    }

    /// Returns the first value of a header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the `content-type` header value, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Returns the GraphQL `data` object, if present and not `null`.
    #[must_use]
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.body.get("data").filter(|data| !data.is_null())
    }

    /// Returns the messages of the GraphQL `errors` array.
    ///
    /// An error without a `message` is returned as its JSON text.
    #[must_use]
    pub fn graphql_errors(&self) -> Vec<String> {
        self.body
            .get("errors")
            .and_then(serde_json::Value::as_array)
            .map(|errors| {
                errors
                    .iter()
                    .map(|error| {
                        error
                            .get("message")
                            .and_then(serde_json::Value::as_str)
                            .map_or_else(|| error.to_string(), String::from)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
