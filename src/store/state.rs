//! Serializable store state.
//!
//! This is exactly what gets persisted: the current query plus four keyed
//! maps. Key order and field names follow the camelCase layout of the blob.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Collection, Product};

/// Version tag written next to the persisted state.
pub(crate) const PERSIST_VERSION: u32 = 0;

/// Fetch status of a cache key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// A fetch has been issued and not resolved yet, or nothing was fetched.
    Loading,
    /// The last applied fetch succeeded.
    Success,
    /// The last applied fetch failed.
    Error,
}

/// Cached entity keyed by handle.
///
/// `status` is `None` when the entry was only populated as a side effect of a
/// search; selectors report such entries as [`Status::Loading`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub result: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl<T> Default for CacheEntry<T> {
    fn default() -> Self {
        Self {
            result: None,
            status: None,
        }
    }
}

/// Cached search keyed by query text. `result` holds entity handles in the
/// order the API returned them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub result: Option<Vec<String>>,
    pub status: Status,
}

impl SearchEntry {
    pub(crate) const fn loading() -> Self {
        Self {
            result: Some(Vec::new()),
            status: Status::Loading,
        }
    }
}

/// The whole cache.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreState {
    /// Text of the most recently requested search.
    pub query: String,
    pub searches: HashMap<String, SearchEntry>,
    pub collection_searches: HashMap<String, SearchEntry>,
    pub products: HashMap<String, CacheEntry<Product>>,
    pub collections: HashMap<String, CacheEntry<Collection>>,
}

/// Envelope written to storage.
#[derive(Debug, Deserialize)]
pub(crate) struct PersistedState {
    pub state: StoreState,
    #[serde(default)]
    pub version: u32,
}

/// Borrowing counterpart of [`PersistedState`] used when writing.
#[derive(Debug, Serialize)]
pub(crate) struct PersistedStateRef<'a> {
    pub state: &'a StoreState,
    pub version: u32,
}
