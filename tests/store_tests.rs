//! Integration tests for the catalog store.
//!
//! These tests drive the store through test doubles of `CatalogApi`: a fixed
//! one for plain state transitions and a gated one that lets a test decide
//! when, and in which order, in-flight calls resolve.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use shopify_product::store::{Lookup, STORAGE_NAME};
use shopify_product::{
    ApiError, CatalogApi, Collection, DecodeError, FetchOutcome, FileStorage, MemoryStorage,
    Money, PriceRange, Product, StateStorage, Status, Store,
};
use tokio::sync::{mpsc, oneshot};

fn product(handle: &str, title: &str) -> Product {
    let money = Money {
        amount: "10.0".to_string(),
        currency_code: "USD".to_string(),
    };
    Product {
        id: Some(format!("gid://shopify/Product/{handle}")),
        handle: handle.to_string(),
        title: title.to_string(),
        description: String::new(),
        product_type: String::new(),
        online_store_url: None,
        available_for_sale: true,
        image_url: String::new(),
        price_range: PriceRange {
            max_variant_price: money.clone(),
            min_variant_price: money,
        },
    }
}

fn collection(handle: &str, products: Vec<Product>) -> Collection {
    Collection {
        id: format!("gid://shopify/Collection/{handle}"),
        handle: handle.to_string(),
        title: handle.to_uppercase(),
        description: String::new(),
        products,
    }
}

fn api_error(path: &str) -> ApiError {
    DecodeError::InvalidEntity {
        entity: "product",
        path: path.to_string(),
        errors: Vec::new(),
    }
    .into()
}

// ============================================================================
// Test doubles
// ============================================================================

/// Answers from fixed tables; unknown keys fail.
#[derive(Default)]
struct FixedApi {
    searches: Mutex<HashMap<String, Vec<Product>>>,
    collection_searches: Mutex<HashMap<String, Vec<Collection>>>,
    products: Mutex<HashMap<String, Product>>,
    collections: Mutex<HashMap<String, Collection>>,
}

#[async_trait]
impl CatalogApi for FixedApi {
    async fn products_matching(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        self.searches
            .lock()
            .get(query)
            .cloned()
            .ok_or_else(|| api_error("/shop/products"))
    }

    async fn collections_matching(&self, query: &str) -> Result<Vec<Collection>, ApiError> {
        self.collection_searches
            .lock()
            .get(query)
            .cloned()
            .ok_or_else(|| api_error("/collections"))
    }

    async fn product_by_handle(&self, handle: &str) -> Result<Product, ApiError> {
        self.products
            .lock()
            .get(handle)
            .cloned()
            .ok_or_else(|| api_error("/shop/product"))
    }

    async fn collection_by_handle(&self, handle: &str) -> Result<Collection, ApiError> {
        self.collections
            .lock()
            .get(handle)
            .cloned()
            .ok_or_else(|| api_error("/collection"))
    }
}

enum Reply {
    Products(Result<Vec<Product>, ApiError>),
    Product(Result<Product, ApiError>),
}

/// A call waiting for the test to answer it.
struct PendingCall {
    arg: String,
    reply: oneshot::Sender<Reply>,
}

impl PendingCall {
    fn answer(self, reply: Reply) {
        assert!(self.reply.send(reply).is_ok(), "caller went away");
    }
}

/// Parks every call until the test answers it.
struct GatedApi {
    calls: mpsc::UnboundedSender<PendingCall>,
}

impl GatedApi {
    fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PendingCall>) {
        let (calls, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { calls }), rx)
    }

    async fn wait(&self, arg: &str) -> Reply {
        let (reply, rx) = oneshot::channel();
        self.calls
            .send(PendingCall {
                arg: arg.to_string(),
                reply,
            })
            .expect("test dropped the call receiver");
        rx.await.expect("test dropped a pending call")
    }
}

#[async_trait]
impl CatalogApi for GatedApi {
    async fn products_matching(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        match self.wait(query).await {
            Reply::Products(result) => result,
            Reply::Product(_) => panic!("wrong reply for a product search"),
        }
    }

    async fn collections_matching(&self, _query: &str) -> Result<Vec<Collection>, ApiError> {
        unimplemented!("not gated")
    }

    async fn product_by_handle(&self, handle: &str) -> Result<Product, ApiError> {
        match self.wait(handle).await {
            Reply::Product(result) => result,
            Reply::Products(_) => panic!("wrong reply for a product lookup"),
        }
    }

    async fn collection_by_handle(&self, _handle: &str) -> Result<Collection, ApiError> {
        unimplemented!("not gated")
    }
}

// ============================================================================
// State transitions
// ============================================================================

#[test]
fn test_never_fetched_handles_are_loading() {
    let store = Store::in_memory();
    assert_eq!(
        store.product("nope"),
        Lookup {
            status: Status::Loading,
            result: None
        }
    );
    assert_eq!(
        store.collection("nope"),
        Lookup {
            status: Status::Loading,
            result: None
        }
    );
}

#[tokio::test]
async fn test_fetch_product_success_then_error() {
    let store = Store::in_memory();
    let api = FixedApi::default();
    let shirt = product("shirt", "Shirt");
    api.products.lock().insert("shirt".into(), shirt.clone());

    assert_eq!(
        store.fetch_product_by_handle(&api, "shirt").await,
        FetchOutcome::Success
    );
    assert_eq!(
        store.product("shirt"),
        Lookup {
            status: Status::Success,
            result: Some(shirt)
        }
    );

    api.products.lock().clear();
    assert_eq!(
        store.fetch_product_by_handle(&api, "shirt").await,
        FetchOutcome::Error
    );
    assert_eq!(
        store.product("shirt"),
        Lookup {
            status: Status::Error,
            result: None
        }
    );
}

#[tokio::test]
async fn test_fetch_collection_with_no_products() {
    let store = Store::in_memory();
    let api = FixedApi::default();
    api.collections
        .lock()
        .insert("empty".into(), collection("empty", Vec::new()));

    store.fetch_collection_by_handle(&api, "empty").await;

    let lookup = store.collection("empty");
    assert_eq!(lookup.status, Status::Success);
    assert_eq!(lookup.result.map(|c| c.products), Some(Vec::new()));
}

#[tokio::test]
async fn test_search_lists_results_in_api_order() {
    let store = Store::in_memory();
    let api = FixedApi::default();
    api.searches.lock().insert(
        "shirts".into(),
        vec![product("a", "A"), product("b", "B")],
    );

    assert_eq!(
        store.fetch_products_matching(&api, "shirts").await,
        FetchOutcome::Success
    );

    let search = store.current_search();
    assert_eq!(search.query, "shirts");
    assert_eq!(search.status, Status::Success);
    let handles: Vec<_> = search
        .results
        .unwrap()
        .into_iter()
        .map(|p| p.handle)
        .collect();
    assert_eq!(handles, ["a", "b"]);
}

#[tokio::test]
async fn test_search_updates_entities_without_their_status() {
    let store = Store::in_memory();
    let api = FixedApi::default();
    api.products.lock().insert("a".into(), product("a", "Old A"));
    store.fetch_product_by_handle(&api, "a").await;

    api.searches.lock().insert(
        "all".into(),
        vec![product("a", "New A"), product("b", "B")],
    );
    store.fetch_products_matching(&api, "all").await;

    let a = store.product("a");
    assert_eq!(a.status, Status::Success);
    assert_eq!(a.result.unwrap().title, "New A");

    // Only seen through a search: cached, but never fetched on its own.
    let b = store.product("b");
    assert_eq!(b.status, Status::Loading);
    assert_eq!(b.result.unwrap().title, "B");
}

#[tokio::test]
async fn test_failed_search_has_no_results() {
    let store = Store::in_memory();
    let api = FixedApi::default();

    assert_eq!(
        store.fetch_collections_matching(&api, "broken").await,
        FetchOutcome::Error
    );

    let search = store.current_collection_search();
    assert_eq!(search.query, "broken");
    assert_eq!(search.status, Status::Error);
    assert_eq!(search.results, None);
}

#[tokio::test]
async fn test_collection_search_resolves_cached_collections() {
    let store = Store::in_memory();
    let api = FixedApi::default();
    api.collection_searches.lock().insert(
        String::new(),
        vec![
            collection("frontpage", Vec::new()),
            collection("sale", Vec::new()),
        ],
    );

    store.fetch_collections_matching(&api, "").await;

    let search = store.current_collection_search();
    assert_eq!(search.status, Status::Success);
    let titles: Vec<_> = search
        .results
        .unwrap()
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(titles, ["FRONTPAGE", "SALE"]);
}

// ============================================================================
// Overlapping fetches
// ============================================================================

#[tokio::test]
async fn test_loading_keeps_previous_result() {
    let store = Arc::new(Store::in_memory());
    let (api, mut calls) = GatedApi::new();

    let task = tokio::spawn({
        let (store, api) = (Arc::clone(&store), Arc::clone(&api));
        async move { store.fetch_product_by_handle(&*api, "shirt").await }
    });
    calls
        .recv()
        .await
        .unwrap()
        .answer(Reply::Product(Ok(product("shirt", "Shirt"))));
    assert_eq!(task.await.unwrap(), FetchOutcome::Success);

    let task = tokio::spawn({
        let (store, api) = (Arc::clone(&store), Arc::clone(&api));
        async move { store.fetch_product_by_handle(&*api, "shirt").await }
    });
    let pending = calls.recv().await.unwrap();

    let lookup = store.product("shirt");
    assert_eq!(lookup.status, Status::Loading);
    assert_eq!(lookup.result.unwrap().title, "Shirt");

    pending.answer(Reply::Product(Err(api_error("/shop/product"))));
    assert_eq!(task.await.unwrap(), FetchOutcome::Error);
}

#[tokio::test]
async fn test_stale_resolution_does_not_overwrite_newer_one() {
    let store = Arc::new(Store::in_memory());
    let (api, mut calls) = GatedApi::new();

    let first = tokio::spawn({
        let (store, api) = (Arc::clone(&store), Arc::clone(&api));
        async move { store.fetch_product_by_handle(&*api, "shirt").await }
    });
    let first_call = calls.recv().await.unwrap();

    let second = tokio::spawn({
        let (store, api) = (Arc::clone(&store), Arc::clone(&api));
        async move { store.fetch_product_by_handle(&*api, "shirt").await }
    });
    let second_call = calls.recv().await.unwrap();

    second_call.answer(Reply::Product(Ok(product("shirt", "Newest"))));
    assert_eq!(second.await.unwrap(), FetchOutcome::Success);

    first_call.answer(Reply::Product(Err(api_error("/shop/product"))));
    assert_eq!(first.await.unwrap(), FetchOutcome::Superseded);

    let lookup = store.product("shirt");
    assert_eq!(lookup.status, Status::Success);
    assert_eq!(lookup.result.unwrap().title, "Newest");
}

#[tokio::test]
async fn test_late_search_does_not_change_current_query() {
    let store = Arc::new(Store::in_memory());
    let (api, mut calls) = GatedApi::new();

    let hats = tokio::spawn({
        let (store, api) = (Arc::clone(&store), Arc::clone(&api));
        async move { store.fetch_products_matching(&*api, "hats").await }
    });
    let hats_call = calls.recv().await.unwrap();
    assert_eq!(hats_call.arg, "hats");

    let shirts = tokio::spawn({
        let (store, api) = (Arc::clone(&store), Arc::clone(&api));
        async move { store.fetch_products_matching(&*api, "shirts").await }
    });
    let shirts_call = calls.recv().await.unwrap();
    assert_eq!(store.query(), "shirts");

    shirts_call.answer(Reply::Products(Ok(vec![product("s", "Shirt")])));
    assert_eq!(shirts.await.unwrap(), FetchOutcome::Success);

    // Different key, so the late answer is still recorded for "hats".
    hats_call.answer(Reply::Products(Ok(vec![product("h", "Hat")])));
    assert_eq!(hats.await.unwrap(), FetchOutcome::Success);

    let search = store.current_search();
    assert_eq!(search.query, "shirts");
    assert_eq!(search.results.unwrap()[0].handle, "s");
    assert_eq!(
        store.snapshot().searches["hats"].result,
        Some(vec!["h".to_string()])
    );
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_state_survives_a_new_store_on_the_same_storage() {
    let storage = MemoryStorage::new();
    let api = FixedApi::default();
    api.searches
        .lock()
        .insert("shirts".into(), vec![product("a", "A")]);

    let store = Store::new(Arc::new(storage.clone()));
    store.fetch_products_matching(&api, "shirts").await;
    drop(store);

    let blob: Value = serde_json::from_str(&storage.get_item(STORAGE_NAME).unwrap().unwrap())
        .unwrap();
    assert_eq!(blob["version"], json!(0));
    assert_eq!(blob["state"]["query"], json!("shirts"));
    assert_eq!(
        blob["state"]["searches"]["shirts"],
        json!({"result": ["a"], "status": "success"})
    );

    let rehydrated = Store::new(Arc::new(storage));
    let search = rehydrated.current_search();
    assert_eq!(search.query, "shirts");
    assert_eq!(search.status, Status::Success);
    assert_eq!(search.results.unwrap()[0].title, "A");
}

#[tokio::test]
async fn test_file_storage_round_trip_between_stores() {
    let dir = tempfile::tempdir().unwrap();
    let api = FixedApi::default();
    api.collections
        .lock()
        .insert("sale".into(), collection("sale", vec![product("a", "A")]));

    let store = Store::new(Arc::new(FileStorage::new(dir.path())));
    store.fetch_collection_by_handle(&api, "sale").await;

    assert!(dir
        .path()
        .join(format!("{STORAGE_NAME}.json"))
        .exists());

    let rehydrated = Store::new(Arc::new(FileStorage::new(dir.path())));
    assert_eq!(rehydrated.snapshot(), store.snapshot());
    assert_eq!(rehydrated.collection("sale").status, Status::Success);
}

#[test]
fn test_stores_with_different_names_do_not_share_state() {
    let storage = MemoryStorage::new();
    storage
        .set_item(
            "other-plugin",
            &json!({"state": {"query": "elsewhere"}, "version": 0}).to_string(),
        )
        .unwrap();

    let store = Store::new(Arc::new(storage.clone()));
    assert_eq!(store.query(), "");

    let other = Store::with_name(Arc::new(storage), "other-plugin");
    assert_eq!(other.query(), "elsewhere");
}
