//! Browse modal: search a catalog and pick one entry.
//!
//! The modal searches with the store's current query as soon as it opens, so
//! reopening it shows the previous search. Submitting the search box runs a
//! new search; picking an entry resolves the modal with an [`Item`].

use crate::catalog::{CatalogApi, Collection, Item, Product};
use crate::extension::{BrowseKind, ModalResolver, PriceLabel};
use crate::store::{FetchOutcome, Status, Store};

/// Notice shown when a search failed.
pub const API_FAILED: &str = "API call failed!";

/// One selectable row of the modal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrowseEntry {
    pub handle: String,
    pub title: String,
    /// Product image; collections have none.
    pub image_url: Option<String>,
    /// Product price; collections have none.
    pub price: Option<PriceLabel>,
}

impl From<&Product> for BrowseEntry {
    fn from(product: &Product) -> Self {
        Self {
            handle: product.handle.clone(),
            title: product.title.clone(),
            image_url: Some(product.image_url.clone()).filter(|url| !url.is_empty()),
            price: Some(PriceLabel::new(&product.price_range)),
        }
    }
}

impl From<&Collection> for BrowseEntry {
    fn from(collection: &Collection) -> Self {
        Self {
            handle: collection.handle.clone(),
            title: collection.title.clone(),
            image_url: None,
            price: None,
        }
    }
}

/// What the modal renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BrowseView {
    pub query: String,
    pub status: Status,
    /// The submit button is disabled while a search is loading.
    pub search_disabled: bool,
    /// Results of the current search; kept visible while a new one loads.
    pub entries: Vec<BrowseEntry>,
    /// Message shown below the results, if any.
    pub notice: Option<&'static str>,
}

/// State of one open browse modal.
#[derive(Debug)]
pub struct BrowseModal<'a, A: ?Sized> {
    kind: BrowseKind,
    store: &'a Store,
    api: &'a A,
    input: String,
}

impl<'a, A> BrowseModal<'a, A>
where
    A: CatalogApi + ?Sized,
{
    /// Creates the modal with an empty search box.
    pub fn new(kind: BrowseKind, store: &'a Store, api: &'a A) -> Self {
        Self {
            kind,
            store,
            api,
            input: String::new(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> BrowseKind {
        self.kind
    }

    /// Runs the search for the store's current query.
    pub async fn open(&self) -> FetchOutcome {
        let query = self.store.query();
        self.search(&query).await
    }

    /// Returns the text in the search box.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the text in the search box.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
    }

    /// Searches for the text in the search box.
    pub async fn submit(&self) -> FetchOutcome {
        self.search(&self.input).await
    }

    async fn search(&self, query: &str) -> FetchOutcome {
        match self.kind {
            BrowseKind::Products => self.store.fetch_products_matching(self.api, query).await,
            BrowseKind::Collections => {
                self.store
                    .fetch_collections_matching(self.api, query)
                    .await
            }
        }
    }

    /// Projects the store's current search.
    #[must_use]
    pub fn view(&self) -> BrowseView {
        let (query, status, entries): (String, Status, Option<Vec<BrowseEntry>>) = match self.kind
        {
            BrowseKind::Products => {
                let search = self.store.current_search();
                let entries = search
                    .results
                    .map(|products| products.iter().map(BrowseEntry::from).collect());
                (search.query, search.status, entries)
            }
            BrowseKind::Collections => {
                let search = self.store.current_collection_search();
                let entries = search
                    .results
                    .map(|collections| collections.iter().map(BrowseEntry::from).collect());
                (search.query, search.status, entries)
            }
        };

        let notice = match status {
            Status::Error => Some(API_FAILED),
            Status::Success if entries.as_ref().is_some_and(Vec::is_empty) => {
                Some(match self.kind {
                    BrowseKind::Products => "No products found!",
                    BrowseKind::Collections => "No collections found!",
                })
            }
            _ => None,
        };

        BrowseView {
            query,
            status,
            search_disabled: status == Status::Loading,
            entries: entries.unwrap_or_default(),
            notice,
        }
    }

    /// Resolves the modal with the entry for `handle`.
    pub fn select(&self, handle: &str, resolver: &dyn ModalResolver) {
        let item = Item {
            handle: handle.to_string(),
            kind: self.kind.item_kind(),
        };
        tracing::debug!(handle, kind = %item.kind, "browse entry selected");
        resolver.resolve(item);
    }
}
