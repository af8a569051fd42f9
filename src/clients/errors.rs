//! HTTP-specific error types.
//!
//! The Storefront transport is strict: anything other than a `200` response
//! carrying a JSON body is an error.
//!
//! - [`HttpResponseError`]: the response status was not `200`
//! - [`InvalidContentTypeError`]: the response was not declared as JSON
//! - [`HttpError`]: unified error type for everything the transport can fail with
//!
//! # Example
//!
//! ```rust,ignore
//! use shopify_product::clients::{HttpError, StorefrontClient};
//!
//! match client.query("query { shop { name } }", None).await {
//!     Ok(response) => println!("Data: {:?}", response.data()),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::ContentType(e)) => println!("Unexpected payload: {}", e),
//!     Err(HttpError::InvalidBody(e)) => println!("Unreadable JSON: {}", e),
//!     Err(HttpError::Network(e)) => println!("Network error: {}", e),
//! }
//! ```

use thiserror::Error;

/// Error returned when the Storefront API answers with a status other than `200`.
///
/// The message holds a JSON object with the `errors` field of the response (if
/// any) and an `error_reference` built from the `X-Request-Id` header.
///
/// # Example
///
/// ```rust
/// use shopify_product::clients::HttpResponseError;
///
/// let error = HttpResponseError {
///     code: 401,
///     message: r#"{"errors":"Unauthorized"}"#.to_string(),
///     error_reference: None,
/// };
///
/// assert!(error.to_string().starts_with("Invalid status code: 401"));
/// ```
#[derive(Debug, Error)]
#[error("Invalid status code: {code}. {message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Serialized error message in JSON format.
    pub message: String,
    /// Reference ID for error reporting (from X-Request-Id header).
    pub error_reference: Option<String>,
}

/// Error returned when a `200` response is not declared as JSON.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid content type: {}", .content_type.as_deref().unwrap_or("<missing>"))]
pub struct InvalidContentTypeError {
    /// The `content-type` header of the response, if present.
    pub content_type: Option<String>,
}

/// Unified error type for the Storefront transport.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The response status was not `200`.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// The response was not declared as JSON.
    #[error(transparent)]
    ContentType(#[from] InvalidContentTypeError),

    /// The response was declared as JSON but could not be parsed.
    #[error("Invalid JSON body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
