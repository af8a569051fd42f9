//! HTTP client types for Storefront API communication.
//!
//! This module is the transport layer under [`crate::catalog`]:
//!
//! - [`StorefrontClient`]: posts GraphQL documents to the shop's endpoint
//! - [`HttpResponse`]: a validated response (status `200`, JSON body)
//! - [`HttpError`]: everything that can go wrong on the wire
//!
//! There is no retry logic; a failed call is reported once and the caller
//! decides whether to ask again.

mod errors;
mod http_response;
pub mod storefront;

pub use errors::{HttpError, HttpResponseError, InvalidContentTypeError};
pub use http_response::HttpResponse;
pub use storefront::StorefrontClient;

/// Version of this library, sent in the `User-Agent` header.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
