//! Internal HTTP transport for the Storefront GraphQL endpoint.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError, InvalidContentTypeError};
use crate::clients::http_response::HttpResponse;
use crate::clients::SDK_VERSION;
use crate::config::PluginConfig;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Internal HTTP client posting GraphQL bodies to a single endpoint.
///
/// This type is `pub(super)` and not exposed publicly.
#[derive(Debug)]
pub(super) struct StorefrontHttpClient {
    /// The internal reqwest HTTP client.
    client: reqwest::Client,
    /// Full GraphQL URL (e.g., `https://my-store.myshopify.com/api/graphql`).
    endpoint: String,
    /// Default headers to include in all requests.
    default_headers: HashMap<String, String>,
}

// Verify StorefrontHttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<StorefrontHttpClient>();
};

impl StorefrontHttpClient {
    /// Creates a new transport for the configured shop.
    pub(super) fn new(config: &PluginConfig) -> Result<Self, HttpError> {
        let endpoint = config.graphql_endpoint();

        let user_agent_prefix = config
            .user_agent_prefix()
            .map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent = format!(
            "{user_agent_prefix}Shopify Product Field v{SDK_VERSION} | Rust {rust_version}"
        );

        let token = config.access_token();
        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), JSON_CONTENT_TYPE.to_string());
        default_headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());
        default_headers.insert(
            token.header_name().to_string(),
            token.as_ref().to_string(),
        );

        let client = reqwest::Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            endpoint,
            default_headers,
        })
    }

    /// Returns the GraphQL URL requests are posted to.
    pub(super) fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts a JSON body and validates the response.
    ///
    /// Fails unless the status is exactly `200` and the `content-type`
    /// declares JSON.
    pub(super) async fn post(&self, body: &serde_json::Value) -> Result<HttpResponse, HttpError> {
        let mut req_builder = self.client.post(&self.endpoint);
        for (key, value) in &self.default_headers {
            req_builder = req_builder.header(key, value);
        }

        let res = req_builder.body(body.to_string()).send().await?;

        let code = res.status().as_u16();
        let headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;
        let response = HttpResponse::new(code, headers, serde_json::Value::Null);

        if !response.is_ok() {
            let response = HttpResponse {
                body: serde_json::from_str(&body_text).unwrap_or(serde_json::Value::Null),
                ..response
            };
            return Err(HttpError::Response(HttpResponseError {
                code,
                message: Self::serialize_error(&response),
                error_reference: response.request_id().map(String::from),
            }));
        }

        let content_type = response.content_type();
        if !content_type.is_some_and(|value| value.contains(JSON_CONTENT_TYPE)) {
            return Err(InvalidContentTypeError {
                content_type: content_type.map(String::from),
            }
            .into());
        }

        Ok(HttpResponse {
            body: serde_json::from_str(&body_text)?,
            ..response
        })
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Serializes an error response to JSON format.
    fn serialize_error(response: &HttpResponse) -> String {
        let mut error_body = serde_json::Map::new();

        if let Some(errors) = response.body.get("errors") {
            error_body.insert("errors".to_string(), errors.clone());
        }

        if let Some(request_id) = response.request_id() {
            error_body.insert(
                "error_reference".to_string(),
                serde_json::json!(format!(
                    "If you report this error, please include this id: {request_id}."
                )),
            );
        }

        serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
impl StorefrontHttpClient {
    /// Returns the default headers for this client (test helper).
    fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }
}
