//! Decoding of Storefront responses into catalog entities.
//!
//! Every entity is checked at the boundary: a `null` or non-object node, or
//! one missing a required field, is rejected with a [`DecodeError`] naming the
//! entity and its JSON path. Nothing downstream ever sees a half-shaped value.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::types::{Collection, Money, PriceRange, Product};
use crate::clients::HttpResponse;

/// Errors raised while turning a response body into entities.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body had no `data` object.
    #[error("Response carried no data{}", format_graphql_errors(.errors))]
    MissingData {
        /// Messages from the GraphQL `errors` array, if any.
        errors: Vec<String>,
    },

    /// The node at `path` was absent, `null` or not an object.
    #[error("Invalid {entity} at '{path}'{}", format_graphql_errors(.errors))]
    InvalidEntity {
        /// Kind of entity expected.
        entity: &'static str,
        /// JSON pointer of the node.
        path: String,
        /// GraphQL errors sent alongside the `data` object, if any.
        errors: Vec<String>,
    },

    /// The node at `path` was an object of the wrong shape.
    #[error("Malformed {entity} at '{path}': {source}")]
    Malformed {
        /// Kind of entity expected.
        entity: &'static str,
        /// JSON pointer of the node.
        path: String,
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

fn format_graphql_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        String::new()
    } else {
        format!(": {}", errors.join("; "))
    }
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
struct ImageNode {
    src: Option<String>,
}

/// Shopify sends `Decimal` scalars as strings; older schemas used numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Amount {
    Text(String),
    Number(serde_json::Number),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoneyNode {
    amount: Amount,
    currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceRangeNode {
    max_variant_price: MoneyNode,
    min_variant_price: MoneyNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductNode {
    #[serde(default)]
    id: Option<String>,
    handle: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    product_type: Option<String>,
    #[serde(default)]
    online_store_url: Option<String>,
    #[serde(default)]
    available_for_sale: Option<bool>,
    price_range: PriceRangeNode,
    #[serde(default)]
    images: Option<Connection<ImageNode>>,
}

/// Collection products stay raw so each one is validated on its own path.
#[derive(Debug, Deserialize)]
struct CollectionNode {
    id: String,
    handle: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    products: Connection<serde_json::Value>,
}

impl From<MoneyNode> for Money {
    fn from(node: MoneyNode) -> Self {
        let amount = match node.amount {
            Amount::Text(text) => text,
            Amount::Number(number) => number.to_string(),
        };
        Self {
            amount,
            currency_code: node.currency_code,
        }
    }
}

impl From<ProductNode> for Product {
    fn from(node: ProductNode) -> Self {
        let image_url = node
            .images
            .and_then(|images| images.edges.into_iter().next())
            .and_then(|edge| edge.node.src)
            .unwrap_or_default();

        Self {
            id: node.id,
            handle: node.handle,
            title: node.title,
            description: node.description.unwrap_or_default(),
            product_type: node.product_type.unwrap_or_default(),
            online_store_url: node.online_store_url,
            available_for_sale: node.available_for_sale.unwrap_or(false),
            image_url,
            price_range: PriceRange {
                max_variant_price: node.price_range.max_variant_price.into(),
                min_variant_price: node.price_range.min_variant_price.into(),
            },
        }
    }
}

/// Runs `decode` on the `data` object of a response.
///
/// GraphQL errors of the response are attached to a [`DecodeError::MissingData`]
/// or [`DecodeError::InvalidEntity`], so a `null` entity keeps the reason
/// Shopify gave for it.
pub(crate) fn decode_response<T>(
    response: &HttpResponse,
    decode: impl FnOnce(&serde_json::Value) -> Result<T, DecodeError>,
) -> Result<T, DecodeError> {
    let data = response
        .data()
        .filter(|data| data.is_object())
        .ok_or_else(|| DecodeError::MissingData {
            errors: response.graphql_errors(),
        })?;

    decode(data).map_err(|error| match error {
        DecodeError::InvalidEntity { entity, path, .. } => DecodeError::InvalidEntity {
            entity,
            path,
            errors: response.graphql_errors(),
        },
        other => other,
    })
}

/// Looks up an object node and deserializes it.
fn entity<T: DeserializeOwned>(
    root: &serde_json::Value,
    pointer: &str,
    entity: &'static str,
) -> Result<T, DecodeError> {
    let node = root
        .pointer(pointer)
        .filter(|node| node.is_object())
        .ok_or_else(|| DecodeError::InvalidEntity {
            entity,
            path: pointer.to_string(),
            errors: Vec::new(),
        })?;

    T::deserialize(node).map_err(|source| DecodeError::Malformed {
        entity,
        path: pointer.to_string(),
        source,
    })
}

/// Decodes the product at `pointer` inside `root`.
///
/// # Errors
///
/// Returns [`DecodeError`] if the node is missing, not an object, or
/// missing a required field.
pub fn product_at(root: &serde_json::Value, pointer: &str) -> Result<Product, DecodeError> {
    entity::<ProductNode>(root, pointer, "product").map(Product::from)
}

/// Decodes the collection at `pointer` inside `root`, including its products.
///
/// # Errors
///
/// Returns [`DecodeError`] if the collection or any of its products is
/// invalid.
pub fn collection_at(root: &serde_json::Value, pointer: &str) -> Result<Collection, DecodeError> {
    let node = entity::<CollectionNode>(root, pointer, "collection")?;
    let products_pointer = format!("{pointer}/products");

    let products = node
        .products
        .edges
        .iter()
        .enumerate()
        .map(|(i, edge)| product_at(&edge.node, "").map_err(|e| nest(e, &products_pointer, i)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Collection {
        id: node.id,
        handle: node.handle,
        title: node.title,
        description: node.description.unwrap_or_default(),
        products,
    })
}

/// Decodes every node of the connection at `pointer`.
fn connection_at<T>(
    root: &serde_json::Value,
    pointer: &str,
    entity_name: &'static str,
    decode: impl Fn(&serde_json::Value, &str) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    let connection = entity::<Connection<serde_json::Value>>(root, pointer, entity_name)?;

    connection
        .edges
        .iter()
        .enumerate()
        .map(|(i, edge)| decode(&edge.node, "").map_err(|e| nest(e, pointer, i)))
        .collect()
}

/// Decodes the product connection at `pointer`.
///
/// # Errors
///
/// Returns [`DecodeError`] if the connection or any product is invalid.
pub fn products_at(root: &serde_json::Value, pointer: &str) -> Result<Vec<Product>, DecodeError> {
    connection_at(root, pointer, "product connection", product_at)
}

/// Decodes the collection connection at `pointer`.
///
/// # Errors
///
/// Returns [`DecodeError`] if the connection or any collection is invalid.
pub fn collections_at(
    root: &serde_json::Value,
    pointer: &str,
) -> Result<Vec<Collection>, DecodeError> {
    connection_at(root, pointer, "collection connection", collection_at)
}

/// Prefixes the path of an error raised inside edge `index` of `pointer`.
fn nest(error: DecodeError, pointer: &str, index: usize) -> DecodeError {
    let prefix = format!("{pointer}/edges/{index}/node");
    match error {
        DecodeError::InvalidEntity {
            entity,
            path,
            errors,
        } => DecodeError::InvalidEntity {
            entity,
            path: format!("{prefix}{path}"),
            errors,
        },
        DecodeError::Malformed {
            entity,
            path,
            source,
        } => DecodeError::Malformed {
            entity,
            path: format!("{prefix}{path}"),
            source,
        },
        other @ DecodeError::MissingData { .. } => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product_json(handle: &str) -> serde_json::Value {
        json!({
            "id": format!("gid://shopify/Product/{handle}"),
            "title": format!("Title {handle}"),
            "handle": handle,
            "description": "Soft cotton",
            "onlineStoreUrl": format!("https://shop.example/products/{handle}"),
            "availableForSale": true,
            "productType": "Shirts",
            "priceRange": {
                "maxVariantPrice": {"amount": "25.0", "currencyCode": "EUR"},
                "minVariantPrice": {"amount": "19.5", "currencyCode": "EUR"}
            },
            "images": {"edges": [{"node": {"src": format!("https://cdn.example/{handle}.jpg")}}]}
        })
    }

    #[test]
    fn test_product_image_url_from_first_edge() {
        let product = product_at(&product_json("shirt"), "").unwrap();
        assert_eq!(product.image_url, "https://cdn.example/shirt.jpg");
        assert_eq!(product.price_range.min_variant_price.amount, "19.5");
        assert!(product.available_for_sale);
    }

    #[test]
    fn test_product_without_images_has_empty_image_url() {
        let mut node = product_json("bare");
        node["images"] = json!({"edges": []});
        let product = product_at(&node, "").unwrap();
        assert_eq!(product.image_url, "");
    }

    #[test]
    fn test_numeric_amount_is_normalized_to_string() {
        let mut node = product_json("num");
        node["priceRange"]["maxVariantPrice"]["amount"] = json!(30);
        let product = product_at(&node, "").unwrap();
        assert_eq!(product.price_range.max_variant_price.amount, "30");
    }

    #[test]
    fn test_null_product_is_invalid_entity() {
        let data = json!({"shop": {"product": null}});
        let error = product_at(&data, "/shop/product").unwrap_err();
        assert!(matches!(
            error,
            DecodeError::InvalidEntity { entity: "product", ref path, .. } if path == "/shop/product"
        ));
    }

    #[test]
    fn test_product_missing_title_is_malformed() {
        let mut node = product_json("x");
        node.as_object_mut().unwrap().remove("title");
        let error = product_at(&node, "").unwrap_err();
        assert!(matches!(error, DecodeError::Malformed { entity: "product", .. }));
    }

    #[test]
    fn test_collection_with_empty_products() {
        let data = json!({
            "collection": {
                "id": "gid://shopify/Collection/1",
                "handle": "empty",
                "title": "Empty",
                "description": "",
                "products": {"edges": []}
            }
        });
        let collection = collection_at(&data, "/collection").unwrap();
        assert!(collection.products.is_empty());
    }

    #[test]
    fn test_collection_products_keep_order() {
        let data = json!({
            "collection": {
                "id": "gid://shopify/Collection/2",
                "handle": "summer",
                "title": "Summer",
                "description": "Sun",
                "products": {"edges": [
                    {"node": product_json("b")},
                    {"node": product_json("a")}
                ]}
            }
        });
        let collection = collection_at(&data, "/collection").unwrap();
        let handles: Vec<_> = collection.products.iter().map(|p| p.handle.as_str()).collect();
        assert_eq!(handles, ["b", "a"]);
    }

    #[test]
    fn test_non_object_product_in_collection_reports_nested_path() {
        let data = json!({
            "collection": {
                "id": "1",
                "handle": "c",
                "title": "C",
                "products": {"edges": [{"node": product_json("ok")}, {"node": "oops"}]}
            }
        });
        let error = collection_at(&data, "/collection").unwrap_err();
        assert!(matches!(
            error,
            DecodeError::InvalidEntity { ref path, .. } if path == "/collection/products/edges/1/node"
        ));
    }

    #[test]
    fn test_products_connection_flattens_edges() {
        let data = json!({"shop": {"products": {"edges": [
            {"node": product_json("a")},
            {"node": product_json("b")}
        ]}}});
        let products = products_at(&data, "/shop/products").unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].handle, "b");
    }

    fn product_error(body: serde_json::Value) -> DecodeError {
        let response = HttpResponse::new(200, std::collections::HashMap::new(), body);
        decode_response(&response, |data| product_at(data, "/shop/product")).unwrap_err()
    }

    #[test]
    fn test_missing_data_collects_graphql_errors() {
        let body = json!({"errors": [{"message": "Throttled"}]});
        let error = product_error(body);
        assert_eq!(error.to_string(), "Response carried no data: Throttled");

        let error = product_error(json!({}));
        assert_eq!(error.to_string(), "Response carried no data");
    }

    #[test]
    fn test_graphql_error_without_message_is_kept() {
        let body = json!({"errors": [{"extensions": {"code": "THROTTLED"}}]});
        let error = product_error(body);

        let DecodeError::MissingData { errors } = &error else {
            panic!("expected missing data, got {error:?}");
        };
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("THROTTLED"));
        assert!(error.to_string().contains("THROTTLED"));
    }

    #[test]
    fn test_null_entity_carries_graphql_errors() {
        let body = json!({
            "data": {"shop": {"product": null}},
            "errors": [{"message": "Access denied for productByHandle field"}]
        });
        let error = product_error(body);

        assert_eq!(
            error.to_string(),
            "Invalid product at '/shop/product': Access denied for productByHandle field"
        );
    }
}
