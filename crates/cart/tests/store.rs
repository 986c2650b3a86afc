//! Behavior tests for the cart store over the in-memory backend.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use pocket_market_cart::{
    Cart, CartConfig, CartError, CartProvider, CartStore, MemoryBackend, Product, ProductId,
    StorageBackend, DEFAULT_STORAGE_KEY,
};

fn product(id: &str, price_cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("Product {id}"),
        image_url: format!("https://cdn.example.com/{id}.png"),
        unit_price: Decimal::new(price_cents, 2),
    }
}

async fn mounted_store(backend: Arc<MemoryBackend>) -> CartStore {
    let provider = CartProvider::mount(backend, CartConfig::default())
        .await
        .expect("mount");
    provider.cart()
}

/// Poll the backend until the cart record matches `expected` items, or panic.
///
/// Persistence is fire-and-forget, so tests observe the mirror by waiting
/// for it to catch up rather than awaiting any write.
async fn wait_for_persisted(backend: &MemoryBackend, expected: &Cart) {
    for _ in 0..200 {
        if let Some(payload) = backend.get(DEFAULT_STORAGE_KEY).await.expect("get") {
            let stored: Cart = serde_json::from_str(&payload).expect("stored record decodes");
            if &stored == expected {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("backend never caught up to the in-memory cart");
}

#[tokio::test]
async fn test_add_to_cart_yields_single_item_with_quantity_one() {
    let backend = Arc::new(MemoryBackend::new());
    let store = mounted_store(backend).await;

    store
        .add_to_cart(product("A", 1000))
        .await
        .expect("add_to_cart");

    let cart = store.items().await.expect("items");
    assert_eq!(cart.len(), 1);
    let item = cart.get(&ProductId::new("A")).expect("item present");
    assert_eq!(item.quantity, 1);
    assert_eq!(item.title, "Product A");
    assert_eq!(item.image_url, "https://cdn.example.com/A.png");
    assert_eq!(item.unit_price, Decimal::new(1000, 2));
}

#[tokio::test]
async fn test_mutation_before_load_is_scope_misuse() {
    let backend: Arc<MemoryBackend> = Arc::new(MemoryBackend::new());
    let store = CartStore::new(backend, &CartConfig::default());

    let err = store.add_to_cart(product("A", 1000)).await.unwrap_err();
    assert!(matches!(err, CartError::UsedOutsideProvider));

    let err = store.increment(&ProductId::new("A")).await.unwrap_err();
    assert!(matches!(err, CartError::UsedOutsideProvider));

    let err = store.decrement(&ProductId::new("A")).await.unwrap_err();
    assert!(matches!(err, CartError::UsedOutsideProvider));

    let err = store.items().await.unwrap_err();
    assert!(matches!(err, CartError::UsedOutsideProvider));

    let err = store.subscribe().await.unwrap_err();
    assert!(matches!(err, CartError::UsedOutsideProvider));
}

#[tokio::test]
async fn test_load_is_once_per_store_lifetime() {
    let backend: Arc<MemoryBackend> = Arc::new(MemoryBackend::new());
    let store = CartStore::new(backend, &CartConfig::default());

    store.load().await.expect("first load");
    let err = store.load().await.unwrap_err();
    assert!(matches!(err, CartError::AlreadyLoaded));
}

#[tokio::test]
async fn test_load_with_absent_record_leaves_cart_empty() {
    let store = mounted_store(Arc::new(MemoryBackend::new())).await;
    let cart = store.items().await.expect("items");
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_load_rejects_corrupt_record() {
    let backend = Arc::new(MemoryBackend::new());
    backend
        .set(DEFAULT_STORAGE_KEY, "{ not a cart")
        .await
        .expect("seed");

    let store = CartStore::new(backend, &CartConfig::default());
    let err = store.load().await.unwrap_err();
    assert!(matches!(err, CartError::Corrupt(_)));
}

#[tokio::test]
async fn test_increment_and_decrement_absent_id_are_noops() {
    let store = mounted_store(Arc::new(MemoryBackend::new())).await;
    store.add_to_cart(product("A", 1000)).await.expect("add");
    let before = store.items().await.expect("items");

    store
        .increment(&ProductId::new("missing"))
        .await
        .expect("increment");
    store
        .decrement(&ProductId::new("missing"))
        .await
        .expect("decrement");

    assert_eq!(store.items().await.expect("items"), before);
}

#[tokio::test]
async fn test_decrement_at_quantity_one_removes_item() {
    let store = mounted_store(Arc::new(MemoryBackend::new())).await;
    store.add_to_cart(product("A", 1000)).await.expect("add");

    store.decrement(&ProductId::new("A")).await.expect("decrement");

    assert!(store.items().await.expect("items").is_empty());
}

#[tokio::test]
async fn test_decrement_above_one_reduces_quantity() {
    let store = mounted_store(Arc::new(MemoryBackend::new())).await;
    store.add_to_cart(product("A", 1000)).await.expect("add");
    store.increment(&ProductId::new("A")).await.expect("increment");

    store.decrement(&ProductId::new("A")).await.expect("decrement");

    let cart = store.items().await.expect("items");
    assert_eq!(cart.get(&ProductId::new("A")).expect("present").quantity, 1);
}

#[tokio::test]
async fn test_duplicate_add_creates_second_entry() {
    let store = mounted_store(Arc::new(MemoryBackend::new())).await;
    store.add_to_cart(product("A", 1000)).await.expect("add");
    store.add_to_cart(product("A", 1000)).await.expect("add");

    let cart = store.items().await.expect("items");
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.item_count(), 2);
}

#[tokio::test]
async fn test_subscribers_observe_committed_snapshots() {
    let store = mounted_store(Arc::new(MemoryBackend::new())).await;
    let mut updates = store.subscribe().await.expect("subscribe");
    assert!(updates.borrow_and_update().is_empty());

    store.add_to_cart(product("A", 1000)).await.expect("add");

    updates.changed().await.expect("update published");
    let snapshot = updates.borrow_and_update().clone();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.item_count(), 1);
}

#[tokio::test]
async fn test_mutations_are_mirrored_to_storage() {
    let backend = Arc::new(MemoryBackend::new());
    let store = mounted_store(Arc::clone(&backend)).await;

    store.add_to_cart(product("A", 1000)).await.expect("add");
    store.increment(&ProductId::new("A")).await.expect("increment");

    let expected = store.items().await.expect("items");
    wait_for_persisted(&backend, &expected).await;
}

#[tokio::test]
async fn test_write_failure_is_swallowed_and_state_stays_authoritative() {
    let backend = Arc::new(MemoryBackend::new());
    let store = mounted_store(Arc::clone(&backend)).await;

    store.add_to_cart(product("A", 1000)).await.expect("add");
    let expected = store.items().await.expect("items");
    wait_for_persisted(&backend, &expected).await;

    backend.fail_writes(true);
    store.increment(&ProductId::new("A")).await.expect("increment");

    // The mutation committed in memory even though the mirror write failed.
    let cart = store.items().await.expect("items");
    assert_eq!(cart.get(&ProductId::new("A")).expect("present").quantity, 2);

    // The next successful write recreates consistency.
    backend.fail_writes(false);
    store.increment(&ProductId::new("A")).await.expect("increment");
    let expected = store.items().await.expect("items");
    wait_for_persisted(&backend, &expected).await;
}

#[tokio::test]
async fn test_concurrent_mutations_are_not_lost() {
    let store = mounted_store(Arc::new(MemoryBackend::new())).await;
    store.add_to_cart(product("A", 1000)).await.expect("add");

    // Back-to-back mutations from many tasks against the same handle; each
    // one is a read-modify-write on the latest state, so none overwrites
    // another's effect.
    let tasks: Vec<_> = (0..20)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.increment(&ProductId::new("A")).await })
        })
        .collect();
    for task in tasks {
        task.await.expect("join").expect("increment");
    }

    let cart = store.items().await.expect("items");
    assert_eq!(cart.get(&ProductId::new("A")).expect("present").quantity, 21);
}
