//! Registry Concurrency Tests
//!
//! Tests for:
//! - Parity of concurrent toggles on one pair (never two edges)
//! - Independent pairs toggled in parallel
//! - Readers running alongside writers

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;

use ch_subscriptions::{MemoryEdgeStore, PatternIdentityStore, SubscriptionRegistry};

fn registry(stripes: usize) -> (Arc<SubscriptionRegistry>, Arc<MemoryEdgeStore>) {
    let store = Arc::new(MemoryEdgeStore::new());
    let registry = SubscriptionRegistry::new(
        store.clone(),
        Arc::new(PatternIdentityStore::new(r"^[a-z]+[0-9]+$").unwrap()),
    )
    .with_lock_stripes(stripes);
    (Arc::new(registry), store)
}

async fn toggle_concurrently(registry: &Arc<SubscriptionRegistry>, times: usize) -> (usize, usize) {
    let tasks = (0..times).map(|_| {
        let registry = registry.clone();
        tokio::spawn(async move { registry.toggle_edge("u1", "c1").await })
    });

    let mut created = 0;
    let mut removed = 0;
    for result in join_all(tasks).await {
        if result.unwrap().unwrap().edge_removed() {
            removed += 1;
        } else {
            created += 1;
        }
    }
    (created, removed)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_even_concurrent_toggles_leave_pair_absent() {
    let (registry, store) = registry(64);

    let (created, removed) = toggle_concurrently(&registry, 100).await;

    assert_eq!(created, 50);
    assert_eq!(removed, 50);
    assert!(!registry.edge_exists("u1", "c1").await.unwrap());
    assert!(store.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_odd_concurrent_toggles_leave_one_edge() {
    let (registry, store) = registry(64);

    let (created, removed) = toggle_concurrently(&registry, 101).await;

    assert_eq!(created, 51);
    assert_eq!(removed, 50);
    assert!(registry.edge_exists("u1", "c1").await.unwrap());
    assert_eq!(store.len(), 1);
    assert_eq!(registry.list_subscribers("c1").await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_single_stripe_still_serialises_correctly() {
    let (registry, store) = registry(1);

    let (created, removed) = toggle_concurrently(&registry, 33).await;

    assert_eq!(created - removed, 1);
    assert_eq!(store.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_distinct_pairs_in_parallel() {
    let (registry, store) = registry(64);

    let tasks = (0..50).flat_map(|s| (0..10).map(move |c| (s, c))).map(|(s, c)| {
        let registry = registry.clone();
        tokio::spawn(async move {
            registry
                .toggle_edge(&format!("u{}", s), &format!("c{}", c))
                .await
        })
    });
    for result in join_all(tasks).await {
        assert!(result.unwrap().unwrap().edge().is_some());
    }

    assert_eq!(store.len(), 500);
    for c in 0..10 {
        assert_eq!(registry.list_subscribers(&format!("c{}", c)).await.unwrap().len(), 50);
    }
    for s in 0..50 {
        assert_eq!(
            registry.list_subscribed_channels(&format!("u{}", s)).await.unwrap().len(),
            10
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_readers_never_see_duplicate_edges() {
    let (registry, _) = registry(64);

    let writer = {
        let registry = registry.clone();
        tokio::spawn(async move {
            for _ in 0..500 {
                registry.toggle_edge("u1", "c1").await.unwrap();
                tokio::task::yield_now().await;
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move {
                for _ in 0..500 {
                    let subscribers = registry.list_subscribers("c1").await.unwrap();
                    assert!(subscribers.len() <= 1, "pair must never have two edges");
                    for edge in &subscribers {
                        assert_eq!(edge.subscriber.as_str(), "u1");
                        assert_eq!(edge.channel.as_str(), "c1");
                    }
                    let channels = registry.list_subscribed_channels("u1").await.unwrap();
                    assert!(channels.len() <= 1);
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    tokio::time::timeout(Duration::from_secs(30), async {
        writer.await.unwrap();
        for reader in readers {
            reader.await.unwrap();
        }
    })
    .await
    .expect("readers and writer should finish");

    // 500 toggles: even, so the pair ends absent
    assert!(!registry.edge_exists("u1", "c1").await.unwrap());
}
