//! Storefront API client.
//!
//! The Storefront API is Shopify's public, read-only GraphQL endpoint for
//! storefront data. The field extension only ever reads products and
//! collections from it.
//!
//! - **Endpoint**: `https://{shop}.myshopify.com/api/graphql`
//! - **Authentication**: `X-Shopify-Storefront-Access-Token` header
//! - **Body**: `{"query": ..., "variables": ...}` as JSON

mod client;
mod storefront_http;

pub use client::StorefrontClient;
