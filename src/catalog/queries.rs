//! GraphQL documents sent to the Storefront API.
//!
//! The documents are fixed; only the `$query` / `$handle` variables change
//! between calls.

/// Fields requested for every product.
pub const PRODUCT_FRAGMENT: &str = r"
id
title
handle
description
onlineStoreUrl
availableForSale
productType
priceRange {
  maxVariantPrice {
    amount
    currencyCode
  }
  minVariantPrice {
    amount
    currencyCode
  }
}
images(first: 1) {
  edges {
    node {
      src: transformedSrc(crop: CENTER, maxWidth: 200, maxHeight: 200)
    }
  }
}
";

/// Number of products fetched per collection and results per search.
pub const PAGE_SIZE: usize = 10;

/// Builds the collection fragment, which embeds the product fragment.
fn collection_fragment() -> String {
    format!(
        r"
id
description
handle
title
products(first: {PAGE_SIZE}) {{
  edges {{
    node {{
      {PRODUCT_FRAGMENT}
    }}
  }}
}}
"
    )
}

/// Searches products by free text. Variables: `query` (nullable).
#[must_use]
pub fn search_products() -> String {
    format!(
        r"
query getProducts($query: String) {{
  shop {{
    products(first: {PAGE_SIZE}, query: $query) {{
      edges {{
        node {{
          {PRODUCT_FRAGMENT}
        }}
      }}
    }}
  }}
}}
"
    )
}

/// Searches collections by free text. Variables: `query` (nullable).
#[must_use]
pub fn search_collections() -> String {
    format!(
        r"
query getCollections($query: String) {{
  collections(first: {PAGE_SIZE}, query: $query) {{
    edges {{
      node {{
        {}
      }}
    }}
  }}
}}
",
        collection_fragment()
    )
}

/// Fetches one product. Variables: `handle`.
#[must_use]
pub fn product_by_handle() -> String {
    format!(
        r"
query getProduct($handle: String!) {{
  shop {{
    product: productByHandle(handle: $handle) {{
      {PRODUCT_FRAGMENT}
    }}
  }}
}}
"
    )
}

/// Fetches one collection. Variables: `handle`.
#[must_use]
pub fn collection_by_handle() -> String {
    format!(
        r"
query getCollection($handle: String!) {{
  collection: collectionByHandle(handle: $handle) {{
    {}
  }}
}}
",
        collection_fragment()
    )
}
