//! Client-side cache of catalog data.
//!
//! The [`Store`] sits between the presentation components and the
//! [`CatalogApi`]. Every cache key (a search text or an entity handle) moves
//! through `absent → loading → {success, error}`:
//!
//! - a fetch action marks its key as loading, awaits the API, then writes the
//!   outcome;
//! - selectors are pure reads and never trigger a fetch;
//! - the whole state is written to the injected [`StateStorage`] after every
//!   change and read back when a store is created.
//!
//! # Overlapping fetches
//!
//! Fetches for the same key may overlap. Each one takes a ticket when it
//! starts; only the holder of the newest ticket for a key may write its
//! outcome. An older fetch that resolves late is dropped and reported as
//! [`FetchOutcome::Superseded`]. The current search text is always the most
//! recently *requested* one.
//!
//! A fetch future dropped before it resolves gives its ticket back. Its key
//! stays [`Status::Loading`] until another fetch for it settles.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use shopify_product::store::{FileStorage, Status, Store};
//!
//! let store = Store::new(Arc::new(FileStorage::new("/var/lib/cms-plugin")));
//! store.fetch_products_matching(&client, "shirts").await;
//!
//! let search = store.current_search();
//! if search.status == Status::Success {
//!     for product in search.results.unwrap_or_default() {
//!         println!("{}", product.title);
//!     }
//! }
//! ```

mod state;
mod storage;

pub use state::{CacheEntry, SearchEntry, Status, StoreState};
pub use storage::{FileStorage, MemoryStorage, StateStorage, StorageError};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::catalog::{CatalogApi, Collection, Product};
use state::{PersistedState, PersistedStateRef, PERSIST_VERSION};

/// Name of the blob the store is persisted under.
pub const STORAGE_NAME: &str = "datocms-plugin-shopify-product";

/// What happened to a fetch once it resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was written and the key is now [`Status::Success`].
    Success,
    /// The failure was written and the key is now [`Status::Error`].
    Error,
    /// A newer fetch for the same key was started; nothing was written.
    Superseded,
}

/// Status and cached value of one entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lookup<T> {
    pub status: Status,
    pub result: Option<T>,
}

/// The search for the current query text, with handles resolved to entities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchView<T> {
    pub query: String,
    pub status: Status,
    /// `None` after a failed search.
    pub results: Option<Vec<T>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum RequestKey {
    Product(String),
    Collection(String),
    ProductSearch(String),
    CollectionSearch(String),
}

#[derive(Debug, Default)]
struct Inner {
    state: StoreState,
    /// Newest ticket handed out per key still in flight.
    latest: HashMap<RequestKey, u64>,
    next_ticket: u64,
}

/// The catalog cache.
///
/// All methods take `&self`; the store can be shared between components and
/// used by several fetches at once. The internal lock is never held across
/// an `.await`.
pub struct Store {
    inner: Mutex<Inner>,
    storage: Arc<dyn StateStorage>,
    name: String,
}

// Verify Store is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Store>();
};

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Store {
    /// Creates a store persisted under [`STORAGE_NAME`], hydrated from
    /// `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self::with_name(storage, STORAGE_NAME)
    }

    /// Creates a store persisted under `name`, hydrated from `storage`.
    ///
    /// A missing blob starts an empty store. So does an unreadable blob or one
    /// written with another version, after logging a warning.
    #[must_use]
    pub fn with_name(storage: Arc<dyn StateStorage>, name: impl Into<String>) -> Self {
        let name = name.into();
        let state = Self::hydrate(storage.as_ref(), &name);

        Self {
            inner: Mutex::new(Inner {
                state,
                ..Inner::default()
            }),
            storage,
            name,
        }
    }

    /// Creates a store backed by a fresh [`MemoryStorage`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    fn hydrate(storage: &dyn StateStorage, name: &str) -> StoreState {
        let blob = match storage.get_item(name) {
            Ok(Some(blob)) => blob,
            Ok(None) => return StoreState::default(),
            Err(error) => {
                tracing::warn!(%error, name, "could not read persisted store");
                return StoreState::default();
            }
        };

        match serde_json::from_str::<PersistedState>(&blob) {
            Ok(persisted) if persisted.version == PERSIST_VERSION => {
                tracing::debug!(name, "hydrated store from storage");
                persisted.state
            }
            Ok(persisted) => {
                tracing::warn!(
                    name,
                    found = persisted.version,
                    expected = PERSIST_VERSION,
                    "discarding persisted store with unknown version"
                );
                StoreState::default()
            }
            Err(error) => {
                tracing::warn!(%error, name, "discarding unreadable persisted store");
                StoreState::default()
            }
        }
    }

    fn persist(&self, state: &StoreState) {
        let snapshot = PersistedStateRef {
            state,
            version: PERSIST_VERSION,
        };
        let result = serde_json::to_string(&snapshot)
            .map_err(|e| e.to_string())
            .and_then(|blob| {
                self.storage
                    .set_item(&self.name, &blob)
                    .map_err(|e| e.to_string())
            });
        if let Err(error) = result {
            tracing::warn!(%error, name = %self.name, "could not persist store");
        }
    }

    /// Hands out a ticket for `key` and applies the loading transition.
    fn begin(&self, key: RequestKey, mark_loading: impl FnOnce(&mut StoreState)) -> InFlight<'_> {
        let mut inner = self.inner.lock();
        inner.next_ticket += 1;
        let ticket = inner.next_ticket;
        tracing::debug!(?key, ticket, "fetch started");
        inner.latest.insert(key.clone(), ticket);
        mark_loading(&mut inner.state);
        self.persist(&inner.state);
        InFlight {
            store: self,
            key,
            ticket,
            settled: false,
        }
    }

    /// Returns a copy of the whole cache.
    #[must_use]
    pub fn snapshot(&self) -> StoreState {
        self.inner.lock().state.clone()
    }

    /// Returns the most recently requested search text.
    #[must_use]
    pub fn query(&self) -> String {
        self.inner.lock().state.query.clone()
    }

    /// Returns the cached product for `handle`.
    ///
    /// Never-fetched handles report [`Status::Loading`] with no result.
    #[must_use]
    pub fn product(&self, handle: &str) -> Lookup<Product> {
        let inner = self.inner.lock();
        lookup(inner.state.products.get(handle))
    }

    /// Returns the cached collection for `handle`.
    ///
    /// Never-fetched handles report [`Status::Loading`] with no result.
    #[must_use]
    pub fn collection(&self, handle: &str) -> Lookup<Collection> {
        let inner = self.inner.lock();
        lookup(inner.state.collections.get(handle))
    }

    /// Returns the product search for the current query text.
    #[must_use]
    pub fn current_search(&self) -> SearchView<Product> {
        let inner = self.inner.lock();
        let state = &inner.state;
        search_view(
            &state.query,
            state.searches.get(&state.query),
            &state.products,
        )
    }

    /// Returns the collection search for the current query text.
    #[must_use]
    pub fn current_collection_search(&self) -> SearchView<Collection> {
        let inner = self.inner.lock();
        let state = &inner.state;
        search_view(
            &state.query,
            state.collection_searches.get(&state.query),
            &state.collections,
        )
    }

    /// Fetches one product and caches it under `handle`.
    pub async fn fetch_product_by_handle<A>(&self, api: &A, handle: &str) -> FetchOutcome
    where
        A: CatalogApi + ?Sized,
    {
        let key = RequestKey::Product(handle.to_string());
        let in_flight = self.begin(key, |state| {
            state.products.entry(handle.to_string()).or_default().status = Some(Status::Loading);
        });

        let result = api.product_by_handle(handle).await;

        in_flight.finish(|state| {
            let entry = state.products.entry(handle.to_string()).or_default();
            match result {
                Ok(product) => {
                    entry.result = Some(product);
                    entry.status = Some(Status::Success);
                    FetchOutcome::Success
                }
                Err(error) => {
                    tracing::warn!(%error, handle, "product fetch failed");
                    entry.result = None;
                    entry.status = Some(Status::Error);
                    FetchOutcome::Error
                }
            }
        })
    }

    /// Fetches one collection and caches it under `handle`.
    pub async fn fetch_collection_by_handle<A>(&self, api: &A, handle: &str) -> FetchOutcome
    where
        A: CatalogApi + ?Sized,
    {
        let key = RequestKey::Collection(handle.to_string());
        let in_flight = self.begin(key, |state| {
            state.collections.entry(handle.to_string()).or_default().status =
                Some(Status::Loading);
        });

        let result = api.collection_by_handle(handle).await;

        in_flight.finish(|state| {
            let entry = state.collections.entry(handle.to_string()).or_default();
            match result {
                Ok(collection) => {
                    entry.result = Some(collection);
                    entry.status = Some(Status::Success);
                    FetchOutcome::Success
                }
                Err(error) => {
                    tracing::warn!(%error, handle, "collection fetch failed");
                    entry.result = None;
                    entry.status = Some(Status::Error);
                    FetchOutcome::Error
                }
            }
        })
    }

    /// Searches products for `query` and makes it the current query.
    ///
    /// Matching products are written into the product cache without touching
    /// their status.
    pub async fn fetch_products_matching<A>(&self, api: &A, query: &str) -> FetchOutcome
    where
        A: CatalogApi + ?Sized,
    {
        let key = RequestKey::ProductSearch(query.to_string());
        let in_flight = self.begin(key, |state| {
            state
                .searches
                .entry(query.to_string())
                .or_insert_with(SearchEntry::loading)
                .status = Status::Loading;
            state.query = query.to_string();
        });

        let result = api.products_matching(query).await;

        in_flight.finish(|state| match result {
            Ok(products) => {
                let handles = products.iter().map(|p| p.handle.clone()).collect();
                for product in products {
                    let handle = product.handle.clone();
                    state.products.entry(handle).or_default().result = Some(product);
                }
                let entry = state
                    .searches
                    .entry(query.to_string())
                    .or_insert_with(SearchEntry::loading);
                entry.result = Some(handles);
                entry.status = Status::Success;
                FetchOutcome::Success
            }
            Err(error) => {
                tracing::warn!(%error, query, "product search failed");
                let entry = state
                    .searches
                    .entry(query.to_string())
                    .or_insert_with(SearchEntry::loading);
                entry.result = None;
                entry.status = Status::Error;
                FetchOutcome::Error
            }
        })
    }

    /// Searches collections for `query` and makes it the current query.
    ///
    /// Matching collections are written into the collection cache without
    /// touching their status.
    pub async fn fetch_collections_matching<A>(&self, api: &A, query: &str) -> FetchOutcome
    where
        A: CatalogApi + ?Sized,
    {
        let key = RequestKey::CollectionSearch(query.to_string());
        let in_flight = self.begin(key, |state| {
            state
                .collection_searches
                .entry(query.to_string())
                .or_insert_with(SearchEntry::loading)
                .status = Status::Loading;
            state.query = query.to_string();
        });

        let result = api.collections_matching(query).await;

        in_flight.finish(|state| match result {
            Ok(collections) => {
                let handles = collections.iter().map(|c| c.handle.clone()).collect();
                for collection in collections {
                    let handle = collection.handle.clone();
                    state.collections.entry(handle).or_default().result = Some(collection);
                }
                let entry = state
                    .collection_searches
                    .entry(query.to_string())
                    .or_insert_with(SearchEntry::loading);
                entry.result = Some(handles);
                entry.status = Status::Success;
                FetchOutcome::Success
            }
            Err(error) => {
                tracing::warn!(%error, query, "collection search failed");
                let entry = state
                    .collection_searches
                    .entry(query.to_string())
                    .or_insert_with(SearchEntry::loading);
                entry.result = None;
                entry.status = Status::Error;
                FetchOutcome::Error
            }
        })
    }
}

/// A started fetch holding its ticket.
///
/// Dropping it unfinished (the fetch future was cancelled) releases the ticket.
/// The key keeps its `Loading` status until the next fetch for it settles.
struct InFlight<'a> {
    store: &'a Store,
    key: RequestKey,
    ticket: u64,
    settled: bool,
}

impl InFlight<'_> {
    /// Applies `apply` if this ticket is still the newest for its key.
    fn finish(mut self, apply: impl FnOnce(&mut StoreState) -> FetchOutcome) -> FetchOutcome {
        self.settled = true;
        let store = self.store;
        let mut inner = store.inner.lock();
        if inner.latest.get(&self.key) != Some(&self.ticket) {
            tracing::debug!(
                key = ?self.key,
                ticket = self.ticket,
                "dropping superseded fetch result"
            );
            return FetchOutcome::Superseded;
        }
        inner.latest.remove(&self.key);
        let outcome = apply(&mut inner.state);
        store.persist(&inner.state);
        outcome
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.store.inner.lock();
        if inner.latest.get(&self.key) == Some(&self.ticket) {
            tracing::debug!(
                key = ?self.key,
                ticket = self.ticket,
                "fetch cancelled before it resolved"
            );
            inner.latest.remove(&self.key);
        }
    }
}

fn lookup<T: Clone>(entry: Option<&CacheEntry<T>>) -> Lookup<T> {
    entry.map_or(
        Lookup {
            status: Status::Loading,
            result: None,
        },
        |entry| Lookup {
            status: entry.status.unwrap_or(Status::Loading),
            result: entry.result.clone(),
        },
    )
}

fn search_view<T: Clone>(
    query: &str,
    search: Option<&SearchEntry>,
    entities: &HashMap<String, CacheEntry<T>>,
) -> SearchView<T> {
    let Some(search) = search else {
        return SearchView {
            query: query.to_string(),
            status: Status::Loading,
            results: Some(Vec::new()),
        };
    };

    let results = search.result.as_ref().map(|handles| {
        handles
            .iter()
            .filter_map(|handle| {
                let entity = entities.get(handle).and_then(|e| e.result.clone());
                if entity.is_none() {
                    tracing::debug!(handle, "search result no longer cached, skipping");
                }
                entity
            })
            .collect()
    });

    SearchView {
        query: query.to_string(),
        status: search.status,
        results,
    }
}
